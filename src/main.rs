//! `authenticity-checkr`: score product image evidence against a rule set.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load engine config (`config::load_config`).
//! 3. Load and validate the rule set (`rules::validate_rule_set_with`).
//! 4. Load evidence documents concurrently (`source::load_document`).
//! 5. Normalize and score each image (`RawEvidence::normalize`, `engine::score_with`).
//! 6. Render the requested report (`report`).
//! 7. Exit `0` (clean), `1` (a verdict tripped `--fail-on`) or `2` (invalid input).

mod cli;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use authenticity_checkr::config::{load_config, Config};
use authenticity_checkr::engine::score_with;
use authenticity_checkr::evidence::{parse_document, RawEvidence};
use authenticity_checkr::models::ImageAssessment;
use authenticity_checkr::report;
use authenticity_checkr::rules::{validate_rule_set_with, RuleSet};
use authenticity_checkr::source;
use cli::{Cli, ReportFormat};

const EXIT_FAIL_ON: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    // Rule set
    let rules = match load_rules(&client, &cli.rules, &config).await {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(EXIT_INVALID_INPUT);
        }
    };

    if cli.validate_only {
        print_rule_summary(&cli.rules, &rules);
        return Ok(());
    }

    // Evidence
    let documents = load_evidence(&client, &cli.evidence, cli.quiet).await?;

    let mut invalid_input = false;
    let mut assessments = Vec::new();

    for (location, document) in cli.evidence.iter().zip(documents) {
        let images = match document.and_then(|doc| parse_document(&doc).map_err(Into::into)) {
            Ok(images) => images,
            Err(e) => {
                eprintln!("{} {}: {:#}", "invalid evidence".red().bold(), location, e);
                invalid_input = true;
                continue;
            }
        };

        let batched = images.len() > 1;
        for (i, mut raw) in images.into_iter().enumerate() {
            let source = if batched {
                format!("{}#{}", location, i)
            } else {
                location.clone()
            };

            match assess(&mut raw, &source, &rules, &config, cli.brand.as_deref()) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    eprintln!("{} {}: {:#}", "invalid evidence".red().bold(), source, e);
                    invalid_input = true;
                }
            }
        }
    }

    // Resolve effective report format: --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .unwrap_or_else(|| std::path::PathBuf::from("authenticity-report.pdf"));

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&assessments, &cli.rules, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assessments)?);
        }
        ReportFormat::Pdf => {
            report::pdf::render(&assessments, &cli.rules, &config.scoring, &pdf_path)?;
        }
    }

    if invalid_input {
        std::process::exit(EXIT_INVALID_INPUT);
    }

    let tripped = assessments
        .iter()
        .any(|a| cli.fail_on.trips(a.result.verdict));

    if tripped {
        std::process::exit(EXIT_FAIL_ON);
    }

    Ok(())
}

/// `RUST_LOG` wins, then `AUTHENTICITY_LOG`, then `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("AUTHENTICITY_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_rules(client: &Client, location: &str, config: &Config) -> Result<RuleSet> {
    let raw = source::load_document(client, location).await?;
    let rules = validate_rule_set_with(&raw, &config.limits).map_err(|e| {
        anyhow::anyhow!("invalid rule set {} (key: {}): {}", location, e.offending_key(), e)
    })?;
    tracing::info!(rules = location, "rule set validated");
    Ok(rules)
}

fn print_rule_summary(location: &str, rules: &RuleSet) {
    println!("{} {}", "✓".green(), format!("Rule set {} is valid", location).bold());
    println!("  logo check          : {}", on_off(rules.use_logo_check));
    println!("  generic-label check : {}", on_off(rules.use_generic_labels_check));
    println!(
        "  required identifiers: {} ({:?} match)",
        rules.required_identifiers.len(),
        rules.identifier_match
    );
    println!("  identifier patterns : {}", rules.identifier_patterns.len());
    if rules.weights.is_empty() {
        println!("  weights             : defaults");
    } else {
        let weights: Vec<String> = rules
            .weights
            .iter()
            .map(|(factor, weight)| format!("{}={}", factor, weight))
            .collect();
        println!("  weights             : {}", weights.join(", "));
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Fetch every evidence document, keeping the input order.
async fn load_evidence(client: &Client, locations: &[String], quiet: bool) -> Result<Vec<Result<Value>>> {
    use futures::future::join_all;

    const BATCH_SIZE: usize = 16;

    let pb = if !quiet && locations.len() > 1 {
        let pb = ProgressBar::new(locations.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut documents = Vec::with_capacity(locations.len());
    for batch in locations.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|location| source::load_document(client, location))
            .collect();

        for result in join_all(futures).await {
            documents.push(result);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(documents)
}

fn assess(
    raw: &mut RawEvidence,
    source: &str,
    rules: &RuleSet,
    config: &Config,
    brand: Option<&str>,
) -> Result<ImageAssessment> {
    raw.fill_brand(brand);
    let evidence = raw.normalize(&config.limits)?;
    let result = score_with(&evidence, rules, &config.scoring)?;
    tracing::debug!(
        source,
        score = result.composite_score,
        verdict = %result.verdict,
        "image scored"
    );
    Ok(ImageAssessment {
        source: source.to_string(),
        result,
    })
}
