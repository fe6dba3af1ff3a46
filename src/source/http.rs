use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::Value;

/// Fetch a JSON document, e.g. a product's rule set from the catalog service
/// or a stored annotation response.
pub async fn fetch_document(client: &Client, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .header(
            "User-Agent",
            concat!("authenticity-checkr/", env!("CARGO_PKG_VERSION")),
        )
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} returned HTTP {}", url, status);
    }

    response
        .json()
        .await
        .with_context(|| format!("{} did not return JSON", url))
}
