use std::path::{Path, PathBuf};

use chrono::Utc;
use vigil_platform::HostPlatform;

/// State owned by one update cycle from successful download to handoff.
///
/// The staging directory name embeds the target version and a creation
/// timestamp, so at most one cycle's directory per version exists under the
/// staging root at a time. Sessions are never reused across cycles; a stale
/// directory with the same name is wiped by the extractor.
#[derive(Debug, Clone)]
pub struct UpdateSession {
    pub staging_dir: PathBuf,
    pub version: String,
    pub platform: HostPlatform,
}

impl UpdateSession {
    pub fn new(staging_root: &Path, version: impl Into<String>, platform: HostPlatform) -> Self {
        let version = version.into();
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let staging_dir = staging_root.join(format!("vigil_update_{version}_{stamp}"));
        Self {
            staging_dir,
            version,
            platform,
        }
    }
}
