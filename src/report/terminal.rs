use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ImageAssessment, ScoreResult, Verdict};

use super::count_verdict;

/// Render a colored terminal report.
pub fn render(assessments: &[ImageAssessment], rules_source: &str, verbose: bool, quiet: bool) -> Result<()> {
    let total = assessments.len();
    let authentic = count_verdict(assessments, Verdict::Authentic);
    let suspicious = count_verdict(assessments, Verdict::Suspicious);
    let fake = count_verdict(assessments, Verdict::Fake);

    if quiet {
        println!(
            "Total: {}  Authentic: {}  Suspicious: {}  Fake: {}",
            total,
            authentic.to_string().green(),
            suspicious.to_string().yellow(),
            fake.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "authenticity-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Rules: {}\n", rules_source);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Images scored      : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Authentic       : {:>4}", "✓".green(), authentic)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Suspicious      : {:>4}", "⚠".yellow(), suspicious)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Fake            : {:>4}", "✗".red(), fake)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    render_summary_table(assessments);
    println!();

    for assessment in assessments {
        let needs_attention = assessment.result.verdict != Verdict::Authentic;
        if !(verbose || needs_attention) {
            continue;
        }

        let tag = match assessment.result.verdict {
            Verdict::Authentic => "[AUTHENTIC]".green().bold(),
            Verdict::Suspicious => "[SUSPICIOUS]".yellow().bold(),
            Verdict::Fake => "[FAKE]".red().bold(),
        };
        println!(" {} {}\n", tag, assessment.source);

        if verbose && !assessment.result.factor_contributions.is_empty() {
            render_factor_table(&assessment.result);
        }
        for rec in &assessment.result.recommendations {
            println!("   • {}", rec);
        }
        println!();
    }

    Ok(())
}

fn render_summary_table(assessments: &[ImageAssessment]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Image").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Factors").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
        ]);

    for a in assessments {
        let (verdict_str, verdict_color) = verdict_cell(a.result.verdict);
        table.add_row(vec![
            Cell::new(&a.source),
            Cell::new(format!("{:.2}", a.result.composite_score)).set_alignment(CellAlignment::Right),
            Cell::new(a.result.factor_contributions.len()).set_alignment(CellAlignment::Right),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn render_factor_table(result: &ScoreResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Factor").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Weight").add_attribute(Attribute::Bold),
            Cell::new("Contribution").add_attribute(Attribute::Bold),
            Cell::new("Findings").add_attribute(Attribute::Bold),
        ]);

    for c in &result.factor_contributions {
        let risk_color = if c.risk >= 0.75 {
            Color::Red
        } else if c.risk > 0.3 {
            Color::Yellow
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(&c.factor),
            Cell::new(format!("{:.2}", c.risk)).fg(risk_color),
            Cell::new(c.weight).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", c.weighted_contribution)).set_alignment(CellAlignment::Right),
            Cell::new(c.findings.join(", ")),
        ]);
    }

    println!("{}", table);
}

fn verdict_cell(verdict: Verdict) -> (&'static str, Color) {
    match verdict {
        Verdict::Authentic => ("✓ authentic", Color::Green),
        Verdict::Suspicious => ("⚠ suspicious", Color::Yellow),
        Verdict::Fake => ("✗ fake", Color::Red),
    }
}
