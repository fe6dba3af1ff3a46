//! Per-product rule configuration.
//!
//! - [`RuleSet`]: which checks run, what identifiers must appear, the weights.
//! - [`validate`]: the only way to turn administrator input into a [`RuleSet`].

pub mod validate;

use std::collections::{BTreeMap, BTreeSet};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize, Serializer};

pub use validate::{validate_rule_set, validate_rule_set_with};

/// Factor names used as keys in [`RuleSet::weights`].
pub const FACTOR_LOGO: &str = "logo";
pub const FACTOR_GENERIC_LABELS: &str = "genericLabels";
pub const FACTOR_IDENTIFIERS: &str = "identifiers";
pub const FACTOR_PATTERNS: &str = "patterns";
pub const FACTOR_SPOOF: &str = "spoof";

/// How many top labels the generic-label check inspects by default.
pub const DEFAULT_GENERIC_TOP_N: usize = 10;

/// Label descriptions that say nothing about which product is pictured.
pub const DEFAULT_GENERIC_LABELS: &[&str] = &[
    "paper",
    "document",
    "paper product",
    "text",
    "font",
    "handwriting",
    "writing",
    "rectangle",
    "line",
    "parallel",
    "pattern",
    "number",
    "circle",
    "symbol",
    "illustration",
    "graphics",
    "art",
    "design",
    "screenshot",
    "material property",
    "tints and shades",
    "colorfulness",
];

/// Compiled-program budget for identifier patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Strategy for matching label descriptions against the expected brand term.
/// All strategies compare trimmed, lowercased strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogoMatch {
    #[default]
    Exact,
    /// The description contains the brand term.
    Contains,
    /// Jaro-Winkler similarity of at least the given threshold.
    Fuzzy(f64),
}

impl LogoMatch {
    pub fn matches(&self, description: &str, brand: &str) -> bool {
        let description = description.trim().to_lowercase();
        let brand = brand.trim().to_lowercase();
        if description.is_empty() || brand.is_empty() {
            return false;
        }
        match self {
            LogoMatch::Exact => description == brand,
            LogoMatch::Contains => description.contains(&brand),
            LogoMatch::Fuzzy(threshold) => strsim::jaro_winkler(&description, &brand) >= *threshold,
        }
    }
}

/// How required identifiers are looked up in the detected text. Both modes
/// are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierMatch {
    /// Substring, or for alphabetic identifiers the initials of consecutive
    /// words on one line ("rbi" in "RESERVE BANK OF INDIA").
    #[default]
    Initials,
    /// Substring only.
    Substring,
}

/// An identifier pattern, compiled once when the rule set is built.
#[derive(Debug, Clone)]
pub struct IdentifierPattern(Regex);

impl IdentifierPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        compile_pattern(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for IdentifierPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for IdentifierPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A validated rule set. Every update replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub use_logo_check: bool,
    pub use_generic_labels_check: bool,
    /// Lowercased at validation time.
    pub required_identifiers: BTreeSet<String>,
    pub identifier_match: IdentifierMatch,
    /// Identifier name → compiled pattern.
    pub identifier_patterns: BTreeMap<String, IdentifierPattern>,
    /// Open factor-name keys; names without an evaluator are ignored.
    pub weights: BTreeMap<String, u32>,
    pub logo_match: LogoMatch,
    /// Replaces [`DEFAULT_GENERIC_LABELS`] when set. Lowercased.
    pub generic_labels: Option<BTreeSet<String>>,
    pub generic_top_n: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            use_logo_check: false,
            use_generic_labels_check: false,
            required_identifiers: BTreeSet::new(),
            identifier_match: IdentifierMatch::Initials,
            identifier_patterns: BTreeMap::new(),
            weights: BTreeMap::new(),
            logo_match: LogoMatch::Exact,
            generic_labels: None,
            generic_top_n: DEFAULT_GENERIC_TOP_N,
        }
    }
}

impl RuleSet {
    /// Whether `description` belongs to the generic vocabulary in effect.
    pub fn is_generic_label(&self, description: &str) -> bool {
        let needle = description.trim().to_lowercase();
        match &self.generic_labels {
            Some(custom) => custom.contains(&needle),
            None => DEFAULT_GENERIC_LABELS.contains(&needle.as_str()),
        }
    }
}

/// Compile an identifier pattern with the engine's size limits.
fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .dfa_size_limit(PATTERN_SIZE_LIMIT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_match_strategies() {
        assert!(LogoMatch::Exact.matches("Reserve Bank of India", " reserve bank of india"));
        assert!(!LogoMatch::Exact.matches("Reserve Bank of India logo", "Reserve Bank of India"));
        assert!(LogoMatch::Contains.matches("Reserve Bank of India logo", "reserve bank of india"));
        assert!(LogoMatch::Fuzzy(0.9).matches("Adidas", "adidass"));
        assert!(!LogoMatch::Fuzzy(0.9).matches("Puma", "Adidas"));
        assert!(!LogoMatch::Contains.matches("", "adidas"));
    }

    #[test]
    fn test_logo_match_serde_shapes() {
        let exact: LogoMatch = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(exact, LogoMatch::Exact);
        let fuzzy: LogoMatch = serde_json::from_str("{\"fuzzy\": 0.85}").unwrap();
        assert_eq!(fuzzy, LogoMatch::Fuzzy(0.85));
    }

    #[test]
    fn test_identifier_pattern_compiles_once() {
        let pattern = IdentifierPattern::new(r"[0-9][A-Z]{2}\s?[0-9]{6}").unwrap();
        assert!(pattern.is_match("No. 4AB 123456"));
        assert_eq!(pattern, IdentifierPattern::new(r"[0-9][A-Z]{2}\s?[0-9]{6}").unwrap());
        assert_eq!(serde_json::to_value(&pattern).unwrap(), serde_json::json!(r"[0-9][A-Z]{2}\s?[0-9]{6}"));
        assert!(IdentifierPattern::new("(unterminated").is_err());
    }

    #[test]
    fn test_identifier_match_serde_shapes() {
        let strict: IdentifierMatch = serde_json::from_str("\"substring\"").unwrap();
        assert_eq!(strict, IdentifierMatch::Substring);
        assert_eq!(RuleSet::default().identifier_match, IdentifierMatch::Initials);
    }

    #[test]
    fn test_generic_vocabulary() {
        let rules = RuleSet::default();
        assert!(rules.is_generic_label("Paper"));
        assert!(rules.is_generic_label(" DOCUMENT "));
        assert!(!rules.is_generic_label("Banknote"));

        let custom = RuleSet {
            generic_labels: Some(["cardboard".to_string()].into_iter().collect()),
            ..RuleSet::default()
        };
        assert!(custom.is_generic_label("Cardboard"));
        assert!(!custom.is_generic_label("Paper"));
    }
}
