//! Environment substitution over raw configuration text.
//!
//! Substitution operates on the unparsed text by contract: `$VAR`
//! references may sit inside string values that only exist in that form,
//! and the substituted value lands verbatim wherever the token stood. The
//! caller re-parses the result afterwards.

use std::collections::HashMap;

use regex::{Captures, Regex};

/// Read-only environment access, injected so substitution stays
/// deterministic under test.
pub trait EnvLookup {
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Result of a full substitution pass.
pub struct Substitution {
    pub text: String,
    /// Referenced variable names with no defined value, first occurrence
    /// first, deduplicated.
    pub undefined: Vec<String>,
}

const ENV_TOKEN: &str = r"(?i)\$([A-Za-z0-9_]+)";

/// Replaces every `$NAME` token in `raw` with the looked-up value.
///
/// Defined variables substitute verbatim (no escaping, and `$`-sequences
/// inside the value are not expanded). Undefined tokens are removed and
/// their names recorded. The pass always covers the whole text so the
/// caller can report every missing name at once rather than the first.
pub fn substitute(raw: &str, env: &dyn EnvLookup) -> Substitution {
    let token = Regex::new(ENV_TOKEN).expect("env token pattern is valid");
    let mut undefined: Vec<String> = Vec::new();

    let text = token.replace_all(raw, |caps: &Captures| {
        let name = &caps[1];
        match env.get(name) {
            Some(value) => value,
            None => {
                if !undefined.iter().any(|seen| seen == name) {
                    undefined.push(name.to_string());
                }
                String::new()
            }
        }
    });

    Substitution {
        text: text.into_owned(),
        undefined,
    }
}
