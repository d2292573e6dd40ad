//! Best-effort check for a newer published release.
//!
//! Queries the crates.io API with a short timeout. Any failure degrades
//! to a gray note; the surrounding command always proceeds.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::output;

const REGISTRY_URL: &str = "https://crates.io/api/v1/crates/formship";

#[derive(Deserialize)]
struct RegistryResponse {
    #[serde(rename = "crate")]
    krate: RegistryCrate,
}

#[derive(Deserialize)]
struct RegistryCrate {
    max_version: String,
}

/// Prints an upgrade hint when the registry has a newer version.
pub async fn run() {
    let installed = env!("CARGO_PKG_VERSION");

    match latest_version().await {
        Ok(latest) if latest != installed => {
            println!();
            output::progress(&format!("Update available! v{installed} -> v{latest}"));
            output::meta(&format!(
                "Run {} to update.",
                output::variable("cargo install formship")
            ));
            println!();
        }
        Ok(_) => {}
        Err(e) => {
            debug!(error = ?e, "Version check failed");
            output::meta("Version check failed");
        }
    }
}

async fn latest_version() -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;

    let response = client
        .get(REGISTRY_URL)
        .header(
            reqwest::header::USER_AGENT,
            format!("formship-cli/{}", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .await?
        .error_for_status()?;

    let parsed: RegistryResponse = response.json().await?;
    Ok(parsed.krate.max_version)
}
