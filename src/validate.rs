//! Local secret-reference policy.
//!
//! Sensitive fields must hold `$VAR` environment references rather than
//! literal values, so raw credentials never land in version control. The
//! check runs before any network call and can be bypassed with `--force`.

use regex::Regex;
use serde_json::Value;

use crate::walk::walk;

/// Configuration keys assumed to hold credentials, wherever they appear.
pub const SENSITIVE_KEYS: [&str; 4] = ["apiKey", "apiSecret", "secretKey", "apiToken"];

const ENV_REFERENCE: &str = r"^\$[A-Za-z0-9_]+$";

/// Collects the keys of sensitive fields whose values are not environment
/// references, in traversal order. Non-string values under a sensitive key
/// are inline literals and therefore offenders too.
pub fn unverified_secrets(config: &Value) -> Vec<String> {
    let reference = Regex::new(ENV_REFERENCE).expect("env reference pattern is valid");
    let mut offenders = Vec::new();

    walk(config, &mut |key, value| {
        if !SENSITIVE_KEYS.contains(&key) {
            return;
        }

        let verified = value
            .as_str()
            .map(|s| reference.is_match(s))
            .unwrap_or(false);

        if !verified {
            offenders.push(key.to_string());
        }
    });

    offenders
}
