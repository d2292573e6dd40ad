//! Deploy pipeline.
//!
//! Sequenced hard gates: acquire raw config, parse, enforce the local
//! secret-reference policy, substitute environment references on the raw
//! text, re-parse, acquire the deploy key, submit, interpret the
//! response. Every failure is terminal for the invocation; a rerun is a
//! fresh invocation.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::Api;
use crate::config;
use crate::error::Error;
use crate::install::Installer;
use crate::output;
use crate::report;
use crate::substitute::{self, EnvLookup};
use crate::validate;

/// Options for a single deploy invocation.
pub struct DeployArgs {
    /// Inline JSON configuration; wins over `file`.
    pub config: Option<String>,
    /// Inline deploy key; wins over the environment.
    pub key: Option<String>,
    /// Path to the local config file.
    pub file: PathBuf,
    /// Skip the secret-reference policy check.
    pub force: bool,
    /// Install the shim package a successful deploy returns.
    pub install_shim: bool,
}

pub async fn run<A, E, I>(args: &DeployArgs, api: &A, env: &E, installer: &I) -> Result<(), Error>
where
    A: Api,
    E: EnvLookup,
    I: Installer,
{
    let raw = config::raw_config(args.config.as_deref(), &args.file).ok_or(Error::ConfigMissing)?;

    // Parse before substitution: the policy check runs against the tree
    // the user actually wrote.
    let written: Value = serde_json::from_str(&raw).map_err(|_| Error::ConfigUnparsable)?;

    if args.force {
        warn!("Skipping secret reference validation (--force)");
    } else {
        let offenders = validate::unverified_secrets(&written);
        if !offenders.is_empty() {
            return Err(Error::UnverifiedSecrets(offenders));
        }
    }

    // Substitution operates on the original raw text, not the parsed
    // tree: references can sit inside string values that only exist
    // pre-parse.
    let substituted = substitute::substitute(&raw, env);
    if !substituted.undefined.is_empty() {
        return Err(Error::UndefinedReferences(substituted.undefined));
    }

    // Substituted values land verbatim, so the text has to parse again.
    let config: Value =
        serde_json::from_str(&substituted.text).map_err(|_| Error::ConfigUnparsable)?;

    let key = config::deploy_key(args.key.as_deref(), env).ok_or(Error::DeployKeyMissing)?;

    output::meta("Deploying...");
    info!("Submitting deployment");

    let response = api.deploy(&config, &key).await.map_err(Error::DeployTransport)?;

    match response.status {
        200 => {
            let data = response.data;
            info!(id = ?data.id, "Deployment succeeded");

            match data.id.as_deref() {
                Some(id) => output::success(&format!("Deployment succeeded ({id})")),
                None => output::success("Deployment succeeded"),
            }
            report::print_deploy_log(&data.log);

            if let Some(reference) = data.shim.as_deref() {
                if args.install_shim {
                    install_shim(installer, reference).await?;
                }
            }

            Ok(())
        }
        401 => Err(Error::DeployKeyInvalid),
        422 => Err(Error::DeployRejected {
            id: response.data.id,
            errors: response.data.errors,
        }),
        status => {
            debug!(status, "Unexpected deploy response status");
            Err(Error::DeployFailed)
        }
    }
}

// The deployment above already succeeded; an install failure carries its
// own error without rolling anything back.
async fn install_shim<I: Installer>(installer: &I, reference: &str) -> Result<(), Error> {
    output::meta(&format!("Installing {}...", output::variable(reference)));

    match installer.install(reference).await {
        Ok(()) => {
            output::success(&format!("Installed {reference}"));
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = ?e, reference, "Shim install failed");
            Err(Error::ShimInstall(reference.to_string()))
        }
    }
}
