//! Secrets CRUD against the remote API.
//!
//! One invocation per operation; no fan-out. 401/404/422 statuses map to
//! domain errors, everything else unexpected maps to a generic failure.

use tracing::info;

use crate::client::Api;
use crate::config;
use crate::error::Error;
use crate::output;
use crate::substitute::EnvLookup;

pub async fn add<A, E>(api: &A, env: &E, name: &str, value: &str, key: Option<&str>) -> Result<(), Error>
where
    A: Api,
    E: EnvLookup,
{
    let deploy_key = config::deploy_key(key, env).ok_or(Error::DeployKeyMissing)?;

    output::progress(&format!(
        "Adding {} to your secrets...",
        output::variable(name)
    ));
    info!(name, "Adding secret");

    let response = api
        .create_secret(name, value, &deploy_key)
        .await
        .map_err(Error::RequestTransport)?;

    match response.status {
        200 => {
            output::success("Secret added");
            Ok(())
        }
        401 => Err(Error::DeployKeyInvalid),
        422 => Err(Error::SecretRejected {
            name: name.to_string(),
            value: Some(value.to_string()),
            errors: response.data.errors,
        }),
        _ => Err(Error::RequestFailed),
    }
}

pub async fn update<A, E>(
    api: &A,
    env: &E,
    name: &str,
    value: Option<&str>,
    key: Option<&str>,
) -> Result<(), Error>
where
    A: Api,
    E: EnvLookup,
{
    let deploy_key = config::deploy_key(key, env).ok_or(Error::DeployKeyMissing)?;

    output::progress(&format!("Updating {}...", output::variable(name)));
    info!(name, "Updating secret");

    let response = api
        .update_secret(name, value, &deploy_key)
        .await
        .map_err(Error::RequestTransport)?;

    match response.status {
        200 => {
            output::success("Secret updated");
            Ok(())
        }
        401 => Err(Error::DeployKeyInvalid),
        404 => Err(Error::SecretNotFound),
        422 => Err(Error::SecretRejected {
            name: name.to_string(),
            value: value.map(str::to_string),
            errors: response.data.errors,
        }),
        _ => Err(Error::RequestFailed),
    }
}

pub async fn delete<A, E>(api: &A, env: &E, name: &str, key: Option<&str>) -> Result<(), Error>
where
    A: Api,
    E: EnvLookup,
{
    let deploy_key = config::deploy_key(key, env).ok_or(Error::DeployKeyMissing)?;

    output::progress(&format!("Deleting {}...", output::variable(name)));
    info!(name, "Deleting secret");

    let response = api
        .delete_secret(name, &deploy_key)
        .await
        .map_err(Error::RequestTransport)?;

    match response.status {
        200 => {
            output::success("Secret deleted");
            Ok(())
        }
        401 => Err(Error::DeployKeyInvalid),
        404 => Err(Error::SecretNotFound),
        422 => Err(Error::SecretRejected {
            name: name.to_string(),
            value: None,
            errors: response.data.errors,
        }),
        _ => Err(Error::RequestFailed),
    }
}
