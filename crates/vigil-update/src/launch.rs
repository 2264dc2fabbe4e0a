use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use vigil_platform::HostPlatform;

use crate::error::UpdateError;

/// Identity of the running process: the executable and the arguments it was
/// started with (argv[0] excluded). Captured once, so relaunch reproduces
/// the exact invocation.
#[derive(Debug, Clone)]
pub struct ProcessIdentity {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl ProcessIdentity {
    /// # Errors
    /// Returns an error when the current executable path cannot be resolved.
    pub fn capture() -> Result<Self, UpdateError> {
        let executable = std::env::current_exe()
            .map_err(|error| UpdateError::io("failed to resolve current executable", error))?;
        Ok(Self {
            executable,
            args: std::env::args().skip(1).collect(),
        })
    }

    fn executable_name(&self) -> String {
        self.executable
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Fully built updater invocation:
/// `<updater> --Path "<installDir>" --Type "<exeNameOrShim>" --Args "<args>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub updater_executable: PathBuf,
    pub install_dir: PathBuf,
    pub launch_type: String,
    pub launch_args: String,
}

impl LaunchPlan {
    /// Build the handoff command line for the external updater.
    ///
    /// Natively started binaries relaunch as themselves with their original
    /// arguments. Shimmed binaries relaunch through the shim, with the real
    /// executable name prepended to the argument string.
    #[must_use]
    pub fn build(
        updater_executable: &Path,
        install_dir: &Path,
        platform: &HostPlatform,
        process: &ProcessIdentity,
    ) -> Self {
        let exe_name = process.executable_name();
        let joined = process.args.join(" ");

        let (launch_type, launch_args) = match platform {
            HostPlatform::Native => (exe_name, joined),
            HostPlatform::Shimmed { shim } => {
                let args = if joined.is_empty() {
                    exe_name
                } else {
                    format!("{exe_name} {joined}")
                };
                (shim.clone(), args)
            }
        };

        Self {
            updater_executable: updater_executable.to_path_buf(),
            install_dir: install_dir.to_path_buf(),
            launch_type,
            launch_args,
        }
    }
}

/// Start the external updater and terminate this process.
///
/// Two-step protocol: spawn the detached child, then exit with code 0. The
/// child is never waited on and its startup is not verified before exiting;
/// this is an accepted reliability gap of the handoff design.
///
/// # Errors
/// Returns an error only when the updater process cannot be spawned; on
/// success this function does not return.
pub fn launch(plan: &LaunchPlan) -> Result<Infallible, UpdateError> {
    let child = Command::new(&plan.updater_executable)
        .arg("--Path")
        .arg(&plan.install_dir)
        .arg("--Type")
        .arg(&plan.launch_type)
        .arg("--Args")
        .arg(&plan.launch_args)
        .spawn()
        .map_err(UpdateError::Launch)?;

    info!(
        "updater started (pid {}), handing off and exiting",
        child.id()
    );
    std::process::exit(0);
}
