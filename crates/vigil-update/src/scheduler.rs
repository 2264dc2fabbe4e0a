use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Notify;
use vigil_platform::HostPlatform;

use crate::config::UpdateConfig;
use crate::download::{self, ByteTransport};
use crate::error::UpdateError;
use crate::extract;
use crate::feed::ReleaseFeed;
use crate::launch::{self, LaunchPlan, ProcessIdentity};
use crate::resolver;
use crate::select::select_asset;
use crate::session::UpdateSession;

/// Handle for requesting an update check from other tasks.
#[derive(Clone)]
pub struct SchedulerHandle {
    wake: Arc<Notify>,
}

impl SchedulerHandle {
    /// Request an update check as soon as possible, bypassing the remaining
    /// wait time. Never blocks. The wake signal holds a single slot: calls
    /// made before the next wake coalesce into one, and a trigger arriving
    /// while a check is already running wakes the next wait immediately
    /// rather than starting a second check.
    pub fn trigger_now(&self) {
        self.wake.notify_one();
    }
}

/// Outcome of one update cycle that did not fail outright.
#[derive(Debug)]
enum CycleOutcome {
    /// Updates disabled or dev-mode guard hit; the feed was not contacted.
    Skipped,
    /// The feed listed no releases.
    NoRelease,
    /// The newest release matches the running version.
    UpToDate,
    /// A newer release was downloaded and unpacked; handoff is ready.
    Staged {
        session: UpdateSession,
        plan: LaunchPlan,
    },
}

/// Owns the perpetual check loop. All stages of a cycle run sequentially on
/// this one task, so no two cycles ever overlap.
pub struct UpdateScheduler {
    config: UpdateConfig,
    feed: Arc<dyn ReleaseFeed>,
    transport: Arc<dyn ByteTransport>,
    platform: HostPlatform,
    staging_root: PathBuf,
    process: ProcessIdentity,
    wake: Arc<Notify>,
}

impl UpdateScheduler {
    pub fn new(
        config: UpdateConfig,
        feed: Arc<dyn ReleaseFeed>,
        transport: Arc<dyn ByteTransport>,
        platform: HostPlatform,
        staging_root: PathBuf,
        process: ProcessIdentity,
    ) -> (SchedulerHandle, Self) {
        let wake = Arc::new(Notify::new());
        let handle = SchedulerHandle {
            wake: Arc::clone(&wake),
        };
        let scheduler = Self {
            config,
            feed,
            transport,
            platform,
            staging_root,
            process,
            wake,
        };
        (handle, scheduler)
    }

    /// Drive the unending check loop. Spawn this on a dedicated task; it
    /// never returns. Cycle failures are logged and contained, and on a
    /// successful staging the process hands off to the updater and exits.
    pub async fn run(self) {
        info!(
            "update scheduler started, checking every {}h",
            self.config.check_interval_hours
        );
        loop {
            tokio::select! {
                () = tokio::time::sleep(self.config.check_interval()) => {
                    debug!("update check interval elapsed");
                }
                () = self.wake.notified() => {
                    info!("update check triggered on demand");
                }
            }

            match self.run_cycle().await {
                Ok(CycleOutcome::Staged { session, plan }) => {
                    info!(
                        "update {} staged at {}",
                        session.version,
                        session.staging_dir.display()
                    );
                    // Diverges on success; an error here ends the cycle like
                    // any other stage failure.
                    if let Err(error) = launch::launch(&plan) {
                        warn!("update cycle aborted: {error}");
                    }
                }
                Ok(_) => {}
                Err(error) => warn!("update cycle aborted: {error}"),
            }
        }
    }

    /// One resolve → select → download → extract cycle. Stops short of the
    /// handoff so the caller decides when to leave the process.
    async fn run_cycle(&self) -> Result<CycleOutcome, UpdateError> {
        if self.config.updates_disabled {
            debug!("automatic updates are disabled, skipping check");
            return Ok(CycleOutcome::Skipped);
        }
        if self.config.dev_mode {
            debug!("development build, skipping update check");
            return Ok(CycleOutcome::Skipped);
        }

        let releases = self.feed.list_releases().await?;
        let Some(release) = resolver::latest_release(releases) else {
            return Ok(CycleOutcome::NoRelease);
        };
        if !resolver::update_needed(&release.name, &self.config.current_version) {
            debug!(
                "running version {} is current ({})",
                self.config.current_version, release.name
            );
            return Ok(CycleOutcome::UpToDate);
        }
        info!(
            "release {} supersedes running v{}",
            release.name, self.config.current_version
        );

        let format = self.platform.package_format();
        let Some(asset) = select_asset(&release.assets, format) else {
            return Err(UpdateError::NoMatchingAsset {
                suffix: format.asset_suffix(),
                count: release.assets.len(),
            });
        };

        let bytes = download::fetch(
            self.transport.as_ref(),
            asset,
            self.config.feed_token.as_deref(),
        )
        .await?;

        let session =
            UpdateSession::new(&self.staging_root, release.version(), self.platform.clone());
        extract::extract(&bytes, format, &session.staging_dir)?;

        let plan = LaunchPlan::build(
            &self.config.updater_executable,
            &self.install_dir(),
            &self.platform,
            &self.process,
        );
        Ok(CycleOutcome::Staged { session, plan })
    }

    fn install_dir(&self) -> PathBuf {
        match &self.config.install_dir {
            Some(dir) => dir.clone(),
            None => self
                .process
                .executable
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }
}
