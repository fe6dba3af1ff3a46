//! Loading rule sets and evidence documents.
//!
//! A location is either a local path or an `http(s)://` URL. Both resolve to a
//! JSON value; `.toml` files are converted into the same object model.

pub mod file;
pub mod http;

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;

/// Whether `location` should be fetched over HTTP.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Load a JSON (or TOML) document from a path or URL.
pub async fn load_document(client: &Client, location: &str) -> Result<Value> {
    if is_remote(location) {
        http::fetch_document(client, location).await
    } else {
        file::read_document(std::path::Path::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://catalog.example.com/products/42/rules"));
        assert!(is_remote("HTTP://localhost:8080/evidence.json"));
        assert!(!is_remote("rules/banknote.toml"));
        assert!(!is_remote("./https-notes.json"));
    }
}
