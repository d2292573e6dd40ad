//! Post-deploy shim installation.
//!
//! A successful deploy may return a package reference for generated
//! client shims. Installation happens through the project's own package
//! manager and never rolls the deployment back.

use std::path::Path;
use std::process::Command;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

pub type InstallError = Box<dyn std::error::Error + Send + Sync>;

/// Installs the package reference returned by a successful deploy.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, reference: &str) -> Result<(), InstallError>;
}

/// Installs shims with the package manager the project already uses:
/// yarn when a `yarn.lock` is present, npm otherwise.
pub struct PackageInstaller;

#[async_trait]
impl Installer for PackageInstaller {
    async fn install(&self, reference: &str) -> Result<(), InstallError> {
        let (program, args) = if Path::new("yarn.lock").exists() {
            ("yarn", ["add", reference])
        } else {
            ("npm", ["install", reference])
        };

        info!(program, reference, "Installing shim package");

        let status = Command::new(program).args(args).status()?;
        if status.success() {
            info!(program, reference, "Shim package installed");
            Ok(())
        } else {
            error!(%status, program, "Package manager exited with non-zero code");
            Err(format!("{program} exited with {status}").into())
        }
    }
}
