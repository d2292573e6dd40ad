//! Human-facing rendering of failures and remote validation errors.
//!
//! `print_failure` is the single exit point for failed commands: main
//! calls it once with the domain error, and it prints the headline plus
//! any remediation detail the variant carries. Validation errors render
//! as a numbered list on stderr, one entry per error, with a blank line
//! between an entry's title and its body.

use colored::Colorize;

use crate::client::{ErrorDetail, ValidationError};
use crate::config::DEPLOY_KEY_VAR;
use crate::error::Error;
use crate::output;

/// Prints a failed command: headline error plus remediation detail.
pub fn print_failure(err: &Error) {
    match err {
        Error::UnverifiedSecrets(_) => {
            output::error(&err.to_string());
            output::meta(&format!(
                "To override this, use the {} flag.",
                output::variable("-f")
            ));
        }
        Error::DeployKeyMissing => {
            output::error(&err.to_string());
            print_auth_guidance();
        }
        Error::DeployRejected { id, errors } => {
            match id {
                Some(id) => output::error(&format!("{err} ({id})")),
                None => output::error(&err.to_string()),
            }
            print_validation_errors(errors);
        }
        Error::SecretRejected {
            name,
            value,
            errors,
        } => {
            for error in errors {
                print_secret_error(name, value.as_deref(), error);
            }
        }
        _ => output::error(&err.to_string()),
    }
}

/// Maps a validation error to its (title, optional body) pair.
pub fn describe(error: &ValidationError) -> (String, Option<String>) {
    let field = output::variable(&format!("`{}`", error.field));

    match &error.detail {
        ErrorDetail::SecretReferenceRequired(props) => {
            let title = format!(
                "{field} must reference a secret (e.g. {})",
                output::variable(&format!("`@{}`", props.example_value))
            );
            let body = format!(
                "Sensitive values like API keys cannot be stored in your\n\
                 configuration file, where they would end up in version control.\n\
                 Save this value as a secret and reference it instead:\n\
                 \n\
                   $ formship secrets add {example} {given}\n\
                 \n\
                 Then set this field to `@{example}`.",
                example = props.example_value,
                given = props.given_value,
            );
            (title, Some(body))
        }
        ErrorDetail::SecretRequired(props) => {
            let title = format!(
                "{field} requires the {} secret",
                output::variable(&format!("`{}`", props.secret_key))
            );
            let body = match props.secret_type.as_deref() {
                Some("mailchimp_api_key") => format!(
                    "Your Mailchimp API key lives under Account > Extras > API keys\n\
                     in the Mailchimp dashboard. Once you have it, run:\n\
                     \n\
                       $ formship secrets add {} <your-api-key>",
                    props.secret_key
                ),
                Some("mailchimp_audience_id") => format!(
                    "Your audience ID lives under Audience > Settings > Audience\n\
                     name and defaults in the Mailchimp dashboard. Once you have\n\
                     it, run:\n\
                     \n\
                       $ formship secrets add {} <your-audience-id>",
                    props.secret_key
                ),
                _ => format!(
                    "Run the following to add this secret:\n\
                     \n\
                       $ formship secrets add {} <value>",
                    props.secret_key
                ),
            };
            (title, Some(body))
        }
        _ => (format!("{field} {}", error.message), None),
    }
}

/// Numbered validation-error list, to stderr.
pub fn print_validation_errors(errors: &[ValidationError]) {
    eprintln!();
    for (idx, error) in errors.iter().enumerate() {
        let (title, body) = describe(error);
        eprintln!("  {}) {}", idx + 1, title);
        if let Some(body) = body {
            eprintln!();
            for line in body.lines() {
                eprintln!("     {line}");
            }
            eprintln!();
        }
    }
    eprintln!();
}

/// Numbered deploy log, to stdout.
pub fn print_deploy_log(log: &[String]) {
    if log.is_empty() {
        return;
    }

    println!();
    for (idx, line) in log.iter().enumerate() {
        println!("  {}) {line}", idx + 1);
    }
    println!();
}

fn print_secret_error(name: &str, value: Option<&str>, error: &ValidationError) {
    if error.detail == ErrorDetail::Format && error.field == "key" {
        output::error("Secret names may only contain lowercase letters, numbers, and dashes");
        return;
    }

    if error.field == "key" && error.message == "has already been taken" {
        output::error(&format!("{} already exists", output::variable(&format!("`{name}`"))));
        eprintln!();
        eprintln!("  To update its value instead, run:");
        eprintln!();
        eprintln!(
            "    $ formship secrets update {name} {}",
            value.unwrap_or("<value>")
        );
        eprintln!();
        return;
    }

    output::error(&format!("{} {}", humanize_field(&error.field), error.message));
}

fn humanize_field(name: &str) -> &str {
    match name {
        "key" => "Name",
        "value" => "Value",
        other => other,
    }
}

fn print_auth_guidance() {
    let examples_rule = if std::env::var("NO_COLOR").is_err() {
        "-- Examples -----------------------------------------------"
            .yellow()
            .bold()
            .to_string()
    } else {
        "-- Examples -----------------------------------------------".to_string()
    };

    eprintln!();
    eprintln!("Your deploy key can be found under \"Settings\" in the Formship UI.");
    eprintln!("There are a couple ways to use your key:");
    eprintln!();
    eprintln!("- Use the {} flag, or", output::variable("-k"));
    eprintln!("- Set the {} env variable", output::variable(DEPLOY_KEY_VAR));
    eprintln!();
    eprintln!("{examples_rule}");
    eprintln!();
    eprintln!("The inline method looks like this:");
    eprintln!();
    eprintln!("  $ formship deploy -k <your-deploy-key>");
    eprintln!();
    eprintln!("For convenience, you can add it to a {} file.", output::variable(".env"));
    eprintln!("That way, you don't have to copy/paste it every time you run a");
    eprintln!("command:");
    eprintln!();
    eprintln!("  $ echo \"{DEPLOY_KEY_VAR}=<your-deploy-key>\" >> .env");
    eprintln!("  $ formship deploy");
    eprintln!();
    eprintln!("Just be sure to add {} to your {} file,", output::variable(".env"), output::variable(".gitignore"));
    eprintln!("so your deploy key does not end up in version control.");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SecretProperties, SecretReferenceProperties};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn secret_reference_required_names_field_and_example() {
        plain();
        let error = ValidationError {
            field: "actions[0].apiKey".into(),
            message: "must reference a secret".into(),
            detail: ErrorDetail::SecretReferenceRequired(SecretReferenceProperties {
                example_value: "mailchimp-api-key".into(),
                given_value: "myinlinekey".into(),
            }),
        };

        let (title, body) = describe(&error);
        assert!(title.contains("actions[0].apiKey"));
        assert!(title.contains("`@mailchimp-api-key`"));

        let body = body.expect("secret reference errors carry a body");
        assert!(body.contains("formship secrets add mailchimp-api-key myinlinekey"));
        assert!(body.contains("`@mailchimp-api-key`"));
    }

    #[test]
    fn secret_required_branches_on_provider_type() {
        plain();
        let mailchimp = ValidationError {
            field: "actions[0].apiKey".into(),
            message: "secret is missing".into(),
            detail: ErrorDetail::SecretRequired(SecretProperties {
                secret_key: "mailchimp-api-key".into(),
                secret_type: Some("mailchimp_api_key".into()),
            }),
        };
        let (title, body) = describe(&mailchimp);
        assert!(title.contains("`mailchimp-api-key`"));
        assert!(body.unwrap().contains("Mailchimp API key"));

        let audience = ValidationError {
            field: "actions[0].audience".into(),
            message: "secret is missing".into(),
            detail: ErrorDetail::SecretRequired(SecretProperties {
                secret_key: "mailchimp-audience".into(),
                secret_type: Some("mailchimp_audience_id".into()),
            }),
        };
        let (_, body) = describe(&audience);
        assert!(body.unwrap().contains("audience ID"));
    }

    #[test]
    fn secret_required_falls_back_to_generic_guidance() {
        plain();
        let error = ValidationError {
            field: "actions[0].token".into(),
            message: "secret is missing".into(),
            detail: ErrorDetail::SecretRequired(SecretProperties {
                secret_key: "some-token".into(),
                secret_type: Some("unheard_of_provider".into()),
            }),
        };

        let (_, body) = describe(&error);
        assert!(body.unwrap().contains("formship secrets add some-token <value>"));
    }

    #[test]
    fn unknown_codes_render_field_and_message_only() {
        plain();
        let error = ValidationError {
            field: "name".into(),
            message: "is required".into(),
            detail: ErrorDetail::Other,
        };

        let (title, body) = describe(&error);
        assert_eq!(title, "`name` is required");
        assert!(body.is_none());
    }
}
