//! formship - deploy declarative site/form configuration from the
//! command line.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use formship::report;
use formship::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("FORMSHIP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("formship=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = run(cli).await {
        report::print_failure(&e);
        std::process::exit(1);
    }
}
