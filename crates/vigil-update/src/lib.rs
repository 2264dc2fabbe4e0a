//! Self-update subsystem for the Vigil background service.
//!
//! One long-lived scheduler task periodically (or on demand) checks the
//! release feed, and when a newer release is published it downloads the
//! platform package, unpacks it into a staging directory, and hands
//! execution off to the external updater that replaces the running binary.
//!
//! The crate is organised around one update cycle:
//! - Release feed models and client, plus the "is an update needed" decision.
//! - Asset selection for the host package format.
//! - Download with manual, hop-capped redirect following.
//! - Extraction into a per-cycle staging session.
//! - Fire-and-forget handoff to the external updater.
//! - The perpetual scheduler loop sequencing the above.

pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod feed;
pub mod launch;
pub mod logging;
pub mod resolver;
pub mod scheduler;
pub mod select;
pub mod session;

pub use config::UpdateConfig;
pub use download::{ByteTransport, FetchResponse, HttpTransport, fetch};
pub use error::UpdateError;
pub use feed::{AssetInfo, GithubFeed, ReleaseFeed, ReleaseInfo};
pub use launch::{LaunchPlan, ProcessIdentity};
pub use resolver::{UNVERSIONED_SENTINEL, latest_release, update_needed};
pub use scheduler::{SchedulerHandle, UpdateScheduler};
pub use select::select_asset;
pub use session::UpdateSession;
