//! Remote API contract and the HTTP client that implements it.
//!
//! The trait is the collaborator seam: request construction, auth header
//! injection, and status-code semantics live behind it, and tests swap in
//! a mock. A 4xx response is data, not an error; only transport-level
//! failures return `Err`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

pub const DEFAULT_ENDPOINT: &str = "https://api.formship.io";

const DEPLOY_KEY_HEADER: &str = "Formship-Deploy-Key";

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// A structured validation error from a 422 response.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted/bracketed locator into the configuration, e.g.
    /// `actions[0].apiKey`.
    pub field: String,
    pub message: String,
    pub detail: ErrorDetail,
}

/// Code-specific payload of a validation error.
///
/// The wire shape is `{code, field, message, properties}`; the properties
/// bag varies by code, so it is modeled as a tagged union rather than an
/// open dictionary. Unknown or missing codes fall back to [`ErrorDetail::Other`],
/// which renders as a bare `field message` line.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A sensitive field held a literal value instead of an `@`-reference
    /// to a server-stored secret.
    SecretReferenceRequired(SecretReferenceProperties),
    /// A referenced secret does not exist on the server yet.
    SecretRequired(SecretProperties),
    /// A value failed the server's format rules.
    Format,
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecretReferenceProperties {
    pub example_value: String,
    pub given_value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecretProperties {
    pub secret_key: String,
    /// Provider sub-type, e.g. `mailchimp_api_key`. Drives remediation.
    #[serde(default)]
    pub secret_type: Option<String>,
}

// Deserialized by hand: a missing or unrecognized code, or a malformed
// properties bag, must degrade to `Other` instead of failing the whole
// response body.
impl<'de> Deserialize<'de> for ValidationError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            code: Option<String>,
            field: String,
            message: String,
            #[serde(default)]
            properties: Value,
        }

        let raw = Raw::deserialize(deserializer)?;

        let detail = match raw.code.as_deref() {
            Some("SECRET_REFERENCE_REQUIRED") => serde_json::from_value(raw.properties)
                .map(ErrorDetail::SecretReferenceRequired)
                .unwrap_or(ErrorDetail::Other),
            Some("SECRET_REQUIRED") => serde_json::from_value(raw.properties)
                .map(ErrorDetail::SecretRequired)
                .unwrap_or(ErrorDetail::Other),
            Some("FORMAT") => ErrorDetail::Format,
            _ => ErrorDetail::Other,
        };

        Ok(ValidationError {
            field: raw.field,
            message: raw.message,
            detail,
        })
    }
}

/// Deploy endpoint response: transport status plus parsed body.
#[derive(Debug, Clone)]
pub struct DeployResponse {
    pub status: u16,
    pub data: DeployData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    #[serde(default)]
    pub log: Vec<String>,
    /// Installable package reference for generated client shims.
    #[serde(default)]
    pub shim: Option<String>,
}

/// Secrets endpoint response.
#[derive(Debug, Clone)]
pub struct SecretResponse {
    pub status: u16,
    pub data: SecretData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretData {
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

/// The remote collaborator contract.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Api: Send + Sync {
    /// Submit a parsed, substituted configuration for deployment.
    async fn deploy(&self, config: &Value, key: &str) -> Result<DeployResponse, TransportError>;

    /// Create a server-side secret.
    async fn create_secret(
        &self,
        name: &str,
        value: &str,
        key: &str,
    ) -> Result<SecretResponse, TransportError>;

    /// Update a server-side secret's value.
    async fn update_secret<'a>(
        &self,
        name: &str,
        value: Option<&'a str>,
        key: &str,
    ) -> Result<SecretResponse, TransportError>;

    /// Delete a server-side secret.
    async fn delete_secret(&self, name: &str, key: &str) -> Result<SecretResponse, TransportError>;
}

/// reqwest-backed client for the Formship API.
pub struct HttpApi {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl HttpApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            user_agent: format!("formship-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    async fn send_secret_request(
        &self,
        request: reqwest::RequestBuilder,
        key: &str,
    ) -> Result<SecretResponse, TransportError> {
        let response = request
            .header(DEPLOY_KEY_HEADER, key)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status().as_u16();
        // 200/401/404 bodies carry nothing the caller needs.
        let data = response.json().await.unwrap_or_default();
        Ok(SecretResponse { status, data })
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn deploy(&self, config: &Value, key: &str) -> Result<DeployResponse, TransportError> {
        let response = self
            .client
            .post(self.url("/cli/v1/deployments"))
            .header(DEPLOY_KEY_HEADER, key)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .json(config)
            .send()
            .await?;

        let status = response.status().as_u16();
        let data = response.json().await.unwrap_or_default();
        Ok(DeployResponse { status, data })
    }

    async fn create_secret(
        &self,
        name: &str,
        value: &str,
        key: &str,
    ) -> Result<SecretResponse, TransportError> {
        let request = self
            .client
            .post(self.url("/cli/v1/secrets"))
            .json(&serde_json::json!({ "key": name, "value": value }));
        self.send_secret_request(request, key).await
    }

    async fn update_secret<'a>(
        &self,
        name: &str,
        value: Option<&'a str>,
        key: &str,
    ) -> Result<SecretResponse, TransportError> {
        let request = self
            .client
            .patch(self.url(&format!("/cli/v1/secrets/{name}")))
            .json(&serde_json::json!({ "value": value }));
        self.send_secret_request(request, key).await
    }

    async fn delete_secret(&self, name: &str, key: &str) -> Result<SecretResponse, TransportError> {
        let request = self.client.delete(self.url(&format!("/cli/v1/secrets/{name}")));
        self.send_secret_request(request, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_secret_reference_required_errors() {
        let error: ValidationError = serde_json::from_value(json!({
            "code": "SECRET_REFERENCE_REQUIRED",
            "field": "actions[0].apiKey",
            "message": "must reference a secret",
            "properties": {
                "example_value": "mailchimp-api-key",
                "given_value": "myinlinekey"
            }
        }))
        .unwrap();

        assert_eq!(error.field, "actions[0].apiKey");
        assert_eq!(
            error.detail,
            ErrorDetail::SecretReferenceRequired(SecretReferenceProperties {
                example_value: "mailchimp-api-key".into(),
                given_value: "myinlinekey".into(),
            })
        );
    }

    #[test]
    fn parses_secret_required_errors_with_provider_type() {
        let error: ValidationError = serde_json::from_value(json!({
            "code": "SECRET_REQUIRED",
            "field": "actions[0].apiKey",
            "message": "secret is missing",
            "properties": {
                "secret_key": "mailchimp-api-key",
                "secret_type": "mailchimp_api_key"
            }
        }))
        .unwrap();

        match error.detail {
            ErrorDetail::SecretRequired(props) => {
                assert_eq!(props.secret_key, "mailchimp-api-key");
                assert_eq!(props.secret_type.as_deref(), Some("mailchimp_api_key"));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_other() {
        let error: ValidationError = serde_json::from_value(json!({
            "code": "REQUIRED",
            "field": "name",
            "message": "is required",
            "properties": {}
        }))
        .unwrap();

        assert_eq!(error.detail, ErrorDetail::Other);
        assert_eq!(error.message, "is required");
    }

    #[test]
    fn missing_code_and_properties_still_parse() {
        let error: ValidationError = serde_json::from_value(json!({
            "field": "key",
            "message": "has already been taken"
        }))
        .unwrap();

        assert_eq!(error.detail, ErrorDetail::Other);
    }

    #[test]
    fn malformed_properties_degrade_to_other() {
        let error: ValidationError = serde_json::from_value(json!({
            "code": "SECRET_REFERENCE_REQUIRED",
            "field": "apiKey",
            "message": "must reference a secret",
            "properties": {"example_value": 42}
        }))
        .unwrap();

        assert_eq!(error.detail, ErrorDetail::Other);
    }

    #[test]
    fn deploy_data_defaults_are_empty() {
        let data: DeployData = serde_json::from_value(json!({"id": "xxxx"})).unwrap();
        assert_eq!(data.id.as_deref(), Some("xxxx"));
        assert!(data.errors.is_empty());
        assert!(data.log.is_empty());
        assert!(data.shim.is_none());
    }
}
