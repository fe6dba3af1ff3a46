use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::engine::ScoringPolicy;

/// Root configuration structure, deserialized from `.authenticity-checkr/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Verdict thresholds and weighting defaults.
    pub scoring: ScoringPolicy,
    /// Input bounds applied before any regular expression runs.
    pub limits: Limits,
}

/// Bounds on caller-supplied input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Detected text beyond this many bytes is truncated at a char boundary.
    pub max_text_bytes: usize,
    /// Identifier patterns longer than this are rejected at validation time.
    pub max_pattern_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_text_bytes: 64 * 1024,
            max_pattern_len: 256,
        }
    }
}

impl Config {
    /// Reject configurations that would make verdicts meaningless.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        for (name, value) in [
            ("authentic_threshold", s.authentic_threshold),
            ("suspicious_threshold", s.suspicious_threshold),
            ("recommendation_risk", s.recommendation_risk),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("scoring.{} must be within [0, 1], got {}", name, value);
            }
        }
        if s.authentic_threshold < s.suspicious_threshold {
            bail!(
                "scoring.authentic_threshold ({}) must not be below scoring.suspicious_threshold ({})",
                s.authentic_threshold,
                s.suspicious_threshold
            );
        }
        if s.default_weight > 100 {
            bail!("scoring.default_weight must be within 0..=100, got {}", s.default_weight);
        }
        if self.limits.max_text_bytes == 0 || self.limits.max_pattern_len == 0 {
            bail!("limits must be greater than zero");
        }
        Ok(())
    }
}

/// Load the engine configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<base_path>/.authenticity-checkr/config.toml`
/// 3. `~/.config/authenticity-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_path.join(".authenticity-checkr").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("authenticity-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.scoring.authentic_threshold, 0.75);
        assert_eq!(cfg.scoring.suspicious_threshold, 0.40);
        assert_eq!(cfg.scoring.default_weight, 25);
        assert_eq!(cfg.scoring.recommendation_risk, 0.3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[scoring]
default_weight = 10

[limits]
max_text_bytes = 1024
"#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.default_weight, 10);
        assert_eq!(cfg.scoring.authentic_threshold, 0.75);
        assert_eq!(cfg.limits.max_text_bytes, 1024);
        assert_eq!(cfg.limits.max_pattern_len, 256);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut cfg = Config::default();
        cfg.scoring.authentic_threshold = 0.3;
        cfg.scoring.suspicious_threshold = 0.6;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_override_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[scoring]\nauthentic_threshold = 0.9\n").unwrap();

        let cfg = load_config(dir.path(), Some(&path)).unwrap();
        assert_eq!(cfg.scoring.authentic_threshold, 0.9);
    }

    #[test]
    fn test_project_local_config_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".authenticity-checkr");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[limits]\nmax_pattern_len = 64\n").unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.limits.max_pattern_len, 64);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[scoring]\ndefault_weight = 400\n").unwrap();

        assert!(load_config(dir.path(), Some(&path)).is_err());
    }
}
