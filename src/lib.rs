pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
pub mod install;
pub mod output;
pub mod report;
pub mod secrets;
pub mod substitute;
pub mod update_check;
pub mod validate;
pub mod walk;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::client::{HttpApi, DEFAULT_ENDPOINT};
use crate::config::Scaffold;
use crate::error::Error;
use crate::install::PackageInstaller;
use crate::substitute::ProcessEnv;

/// CLI for formship: deploy declarative site/form configuration and
/// manage the secrets it references.
#[derive(Parser)]
#[clap(
    name = "formship",
    version,
    about = "Deploy declarative site and form configuration to Formship"
)]
pub struct Cli {
    /// Skip checking the registry for updates
    #[clap(long, global = true)]
    pub skip_version_check: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploys formship.json
    Deploy {
        /// Site configuration, as inline JSON
        #[clap(short, long)]
        config: Option<String>,

        /// Deploy key
        #[clap(short, long)]
        key: Option<String>,

        /// API endpoint
        #[clap(short, long)]
        endpoint: Option<String>,

        /// Skip verifying that secrets reference environment variables
        #[clap(short, long)]
        force: bool,

        /// Path to the local `formship.json` file
        #[clap(long, default_value = config::DEFAULT_CONFIG_FILE)]
        file: PathBuf,

        /// Skip installing the shim package a successful deploy returns
        #[clap(long)]
        no_shim: bool,
    },

    /// Manage secrets
    Secrets {
        #[clap(subcommand)]
        command: SecretsCommand,
    },

    /// Manage forms in the local config
    Forms {
        #[clap(subcommand)]
        command: FormsCommand,
    },

    /// Creates a formship.json file
    Init,
}

#[derive(Subcommand)]
pub enum SecretsCommand {
    /// Adds a secret
    Add {
        name: String,
        value: String,

        /// Deploy key
        #[clap(short, long)]
        key: Option<String>,

        /// API endpoint
        #[clap(short, long)]
        endpoint: Option<String>,
    },

    /// Updates a secret value
    Update {
        name: String,
        value: Option<String>,

        /// Deploy key
        #[clap(short, long)]
        key: Option<String>,

        /// API endpoint
        #[clap(short, long)]
        endpoint: Option<String>,
    },

    /// Deletes a secret
    Delete {
        name: String,

        /// Deploy key
        #[clap(short, long)]
        key: Option<String>,

        /// API endpoint
        #[clap(short, long)]
        endpoint: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FormsCommand {
    /// Adds a new form to config
    Add {
        key: String,
        name: String,

        /// Path to the local `formship.json` file
        #[clap(long, default_value = config::DEFAULT_CONFIG_FILE)]
        file: PathBuf,
    },
}

fn api_for(endpoint: Option<&str>) -> HttpApi {
    HttpApi::new(endpoint.unwrap_or(DEFAULT_ENDPOINT))
}

/// CLI entrypoint, extracted from main() so the exit code stays there.
pub async fn run(cli: Cli) -> Result<(), Error> {
    output::meta(&format!("Formship CLI v{}", env!("CARGO_PKG_VERSION")));

    if !cli.skip_version_check {
        update_check::run().await;
    }

    match cli.command {
        Commands::Deploy {
            config,
            key,
            endpoint,
            force,
            file,
            no_shim,
        } => {
            let api = api_for(endpoint.as_deref());
            let args = deploy::DeployArgs {
                config,
                key,
                file,
                force,
                install_shim: !no_shim,
            };
            deploy::run(&args, &api, &ProcessEnv, &PackageInstaller).await
        }

        Commands::Secrets { command } => match command {
            SecretsCommand::Add {
                name,
                value,
                key,
                endpoint,
            } => {
                let api = api_for(endpoint.as_deref());
                secrets::add(&api, &ProcessEnv, &name, &value, key.as_deref()).await
            }
            SecretsCommand::Update {
                name,
                value,
                key,
                endpoint,
            } => {
                let api = api_for(endpoint.as_deref());
                secrets::update(&api, &ProcessEnv, &name, value.as_deref(), key.as_deref()).await
            }
            SecretsCommand::Delete {
                name,
                key,
                endpoint,
            } => {
                let api = api_for(endpoint.as_deref());
                secrets::delete(&api, &ProcessEnv, &name, key.as_deref()).await
            }
        },

        Commands::Forms { command } => match command {
            FormsCommand::Add { key, name, file } => {
                config::add_form(&file, &key, &name)?;
                output::success(&format!(
                    "{} added",
                    output::variable(&format!("`{key}`"))
                ));
                Ok(())
            }
        },

        Commands::Init => {
            match config::scaffold(Path::new(config::DEFAULT_CONFIG_FILE))? {
                Scaffold::Created => output::success("formship.json created"),
                Scaffold::AlreadyExists => output::success("formship.json already exists"),
            }
            Ok(())
        }
    }
}
