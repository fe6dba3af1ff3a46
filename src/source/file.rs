use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a local document. `.toml` files are parsed as TOML, anything else as JSON.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("toml"));

    if is_toml {
        let doc: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
        Ok(serde_json::to_value(doc)?)
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))
    }
}
