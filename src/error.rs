//! Domain errors.
//!
//! One variant per user-visible failure. The `Display` text is the
//! headline the user sees; variants carry whatever the reporting layer
//! needs to render remediation detail (offender lists, validation errors,
//! the attempted secret name/value).

use thiserror::Error;

use crate::client::ValidationError;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration not provided")]
    ConfigMissing,

    #[error("Configuration could not be parsed")]
    ConfigUnparsable,

    #[error("The following properties must reference environment variables: {}", .0.join(", "))]
    UnverifiedSecrets(Vec<String>),

    #[error("The following environment variables were referenced but are not defined: {}", .0.join(", "))]
    UndefinedReferences(Vec<String>),

    #[error("Deploy key not found")]
    DeployKeyMissing,

    #[error("Deploy key is not valid")]
    DeployKeyInvalid,

    #[error("Deployment failed due to configuration errors")]
    DeployRejected {
        id: Option<String>,
        errors: Vec<ValidationError>,
    },

    #[error("Deployment failed")]
    DeployFailed,

    #[error("Deployment failed unexpectedly")]
    DeployTransport(#[source] BoxedError),

    #[error("Failed to install `{0}`")]
    ShimInstall(String),

    #[error("Secret not found")]
    SecretNotFound,

    // Headline unused: the reporting layer prints one line per
    // validation error instead.
    #[error("Validation failed")]
    SecretRejected {
        name: String,
        value: Option<String>,
        errors: Vec<ValidationError>,
    },

    #[error("Request failed")]
    RequestFailed,

    #[error("Request failed unexpectedly")]
    RequestTransport(#[source] BoxedError),

    #[error("`{0}` already exists")]
    FormExists(String),

    #[error("{0} could not be parsed")]
    LocalConfig(String),

    #[error("Configuration could not be written")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
