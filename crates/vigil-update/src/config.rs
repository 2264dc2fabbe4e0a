use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::resolver::UNVERSIONED_SENTINEL;

/// Configuration consumed by the update subsystem.
///
/// The host service deserializes this from its settings file; every field
/// has a default so a missing `update` section behaves like a stock install.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    /// Hard switch: when set, no future update cycle contacts the network.
    pub updates_disabled: bool,

    /// Token for authenticated feed access. When present, asset downloads go
    /// through the feed API endpoint instead of the public browser URL.
    pub feed_token: Option<String>,

    pub repo_owner: String,
    pub repo_name: String,

    /// Version embedded in the running binary. The `0.0.0.0` sentinel marks
    /// an unversioned build and never triggers an update.
    pub current_version: String,

    pub check_interval_hours: u64,

    /// External updater executable started during handoff.
    pub updater_executable: PathBuf,

    /// Directory the updater replaces. Defaults to the running executable's
    /// parent directory when unset.
    pub install_dir: Option<PathBuf>,

    /// Development guard: skips update checks entirely, the way an attached
    /// debug session would. Defaults to on for debug builds.
    pub dev_mode: bool,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            updates_disabled: false,
            feed_token: None,
            repo_owner: "vigil-svc".to_string(),
            repo_name: "vigil".to_string(),
            current_version: UNVERSIONED_SENTINEL.to_string(),
            check_interval_hours: 24,
            updater_executable: PathBuf::from("vigil-updater"),
            install_dir: None,
            dev_mode: cfg!(debug_assertions),
        }
    }
}

impl UpdateConfig {
    pub fn new(
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            current_version: current_version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn feed_token(mut self, token: impl Into<String>) -> Self {
        self.feed_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn updates_disabled(mut self, disabled: bool) -> Self {
        self.updates_disabled = disabled;
        self
    }

    #[must_use]
    pub fn dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }

    #[must_use]
    pub fn updater_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.updater_executable = path.into();
        self
    }

    #[must_use]
    pub fn install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(path.into());
        self
    }

    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_hours * 60 * 60)
    }
}
