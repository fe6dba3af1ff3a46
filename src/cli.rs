use std::path::PathBuf;

use clap::Parser;

use authenticity_checkr::Verdict;

#[derive(Parser, Debug)]
#[command(
    name = "authenticity-checkr",
    about = "Score product image evidence against authenticity rules",
    version
)]
pub struct Cli {
    /// Evidence documents to score (paths or http(s) URLs)
    #[arg(value_name = "EVIDENCE", required_unless_present = "validate_only")]
    pub evidence: Vec<String>,

    /// Rule set for the product (JSON or TOML, path or URL)
    #[arg(long, value_name = "RULES")]
    pub rules: String,

    /// Expected brand, used when the evidence does not name one
    #[arg(long)]
    pub brand: Option<String>,

    /// Engine config file [default: ./.authenticity-checkr/config.toml, fallback ~/.config/authenticity-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to authenticity-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "authenticity-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Exit with status 1 when any image scores at or below this verdict
    #[arg(long, default_value = "fake", value_name = "VERDICT")]
    pub fail_on: FailOn,

    /// Only validate the rule set, then exit
    #[arg(long)]
    pub validate_only: bool,

    /// Show factor breakdown for every image (not just flagged ones)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FailOn {
    Fake,
    Suspicious,
}

impl FailOn {
    /// Whether `verdict` is at or below this failure level.
    pub fn trips(self, verdict: Verdict) -> bool {
        let floor = match self {
            FailOn::Fake => Verdict::Fake,
            FailOn::Suspicious => Verdict::Suspicious,
        };
        verdict.severity() >= floor.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_on_levels() {
        assert!(FailOn::Fake.trips(Verdict::Fake));
        assert!(!FailOn::Fake.trips(Verdict::Suspicious));
        assert!(FailOn::Suspicious.trips(Verdict::Suspicious));
        assert!(FailOn::Suspicious.trips(Verdict::Fake));
        assert!(!FailOn::Suspicious.trips(Verdict::Authentic));
    }

    #[test]
    fn test_validate_only_needs_no_evidence() {
        let cli = Cli::try_parse_from(["authenticity-checkr", "--rules", "r.json", "--validate-only"]).unwrap();
        assert!(cli.evidence.is_empty());
        assert!(Cli::try_parse_from(["authenticity-checkr", "--rules", "r.json"]).is_err());
    }

    #[test]
    fn test_bare_pdf_flag_uses_default_path() {
        let cli = Cli::try_parse_from(["authenticity-checkr", "e.json", "--rules", "r.json", "--pdf"]).unwrap();
        assert_eq!(cli.pdf, Some(PathBuf::from("authenticity-report.pdf")));
    }
}
