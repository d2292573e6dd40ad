//! Local configuration plumbing: raw deploy config, the deploy key, and
//! the `formship.json` read/modify/write cycle used by `forms add` and
//! `init`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::Error;
use crate::substitute::EnvLookup;

pub const DEFAULT_CONFIG_FILE: &str = "formship.json";
pub const DEPLOY_KEY_VAR: &str = "FORMSHIP_DEPLOY_KEY";

/// Raw deploy configuration. An inline argument wins over file contents;
/// `None` signals "not provided".
pub fn raw_config(inline: Option<&str>, file: &Path) -> Option<String> {
    if let Some(text) = inline {
        debug!("Using inline configuration");
        return Some(text.to_string());
    }

    match fs::read_to_string(file) {
        Ok(contents) => {
            info!(config_path = ?file, "Read configuration from file");
            Some(contents)
        }
        Err(e) => {
            debug!(error = ?e, config_path = ?file, "No configuration file");
            None
        }
    }
}

/// Deploy key: an inline argument wins, then the environment (a `.env`
/// file in the working directory is loaded at startup).
pub fn deploy_key(inline: Option<&str>, env: &dyn EnvLookup) -> Option<String> {
    inline
        .map(str::to_string)
        .or_else(|| env.get(DEPLOY_KEY_VAR))
}

/// Reads the local config file as a JSON object. A missing file reads as
/// an empty object; an unparsable one is an error.
pub fn read_local(file: &Path) -> Result<Value, Error> {
    match fs::read_to_string(file) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|_| Error::LocalConfig(file.display().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Value::Object(Map::new())),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Writes the config back as pretty-printed JSON.
pub fn write_local(file: &Path, config: &Value) -> Result<(), Error> {
    let pretty = serde_json::to_string_pretty(config)?;
    fs::write(file, pretty)?;
    Ok(())
}

/// Outcome of `init`. Both cases are successes: an existing file is left
/// untouched.
#[derive(Debug, PartialEq, Eq)]
pub enum Scaffold {
    Created,
    AlreadyExists,
}

/// Creates an empty config file unless one already exists.
pub fn scaffold(file: &Path) -> Result<Scaffold, Error> {
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file)
    {
        Ok(mut handle) => {
            handle.write_all(b"{}")?;
            info!(config_path = ?file, "Created config file");
            Ok(Scaffold::Created)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(Scaffold::AlreadyExists),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Adds a form entry under `forms.<key>`, refusing to clobber an existing
/// one.
pub fn add_form(file: &Path, key: &str, name: &str) -> Result<(), Error> {
    let mut config = read_local(file)?;

    {
        let root = config
            .as_object_mut()
            .ok_or_else(|| Error::LocalConfig(file.display().to_string()))?;
        let forms = root
            .entry("forms")
            .or_insert_with(|| Value::Object(Map::new()));
        let forms = forms
            .as_object_mut()
            .ok_or_else(|| Error::LocalConfig(file.display().to_string()))?;

        if forms.contains_key(key) {
            return Err(Error::FormExists(key.to_string()));
        }

        forms.insert(key.to_string(), serde_json::json!({ "name": name }));
    }

    write_local(file, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn inline_config_wins_over_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("formship.json");
        fs::write(&file, "{\"from\":\"file\"}").unwrap();

        assert_eq!(raw_config(Some("{}"), &file).as_deref(), Some("{}"));
    }

    #[test]
    fn missing_file_and_no_inline_is_not_provided() {
        let dir = tempdir().unwrap();
        assert_eq!(raw_config(None, &dir.path().join("formship.json")), None);
    }

    #[test]
    fn deploy_key_prefers_inline_then_env() {
        let with_key = env(&[(DEPLOY_KEY_VAR, "from-env")]);
        assert_eq!(deploy_key(Some("inline"), &with_key).as_deref(), Some("inline"));
        assert_eq!(deploy_key(None, &with_key).as_deref(), Some("from-env"));
        assert_eq!(deploy_key(None, &env(&[])), None);
    }

    #[test]
    fn read_local_treats_missing_file_as_empty_object() {
        let dir = tempdir().unwrap();
        let value = read_local(&dir.path().join("formship.json")).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn read_local_rejects_unparsable_contents() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("formship.json");
        fs::write(&file, "{").unwrap();

        assert!(matches!(read_local(&file), Err(Error::LocalConfig(_))));
    }

    #[test]
    fn scaffold_creates_then_preserves() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("formship.json");

        assert_eq!(scaffold(&file).unwrap(), Scaffold::Created);
        assert_eq!(fs::read_to_string(&file).unwrap(), "{}");

        fs::write(&file, "{\"forms\":{}}").unwrap();
        assert_eq!(scaffold(&file).unwrap(), Scaffold::AlreadyExists);
        assert_eq!(fs::read_to_string(&file).unwrap(), "{\"forms\":{}}");
    }

    #[test]
    fn add_form_inserts_under_forms() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("formship.json");

        add_form(&file, "contact", "Contact Form").unwrap();

        let written = read_local(&file).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"forms": {"contact": {"name": "Contact Form"}}})
        );
    }

    #[test]
    fn add_form_refuses_duplicates() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("formship.json");
        add_form(&file, "contact", "Contact Form").unwrap();

        let result = add_form(&file, "contact", "Another");
        assert!(matches!(result, Err(Error::FormExists(key)) if key == "contact"));
    }
}
