//! Host-platform support for the Vigil service.
//!
//! This crate answers the two platform questions the update subsystem asks:
//! - How is the service binary executed on this host (directly, or through a
//!   runtime shim)?
//! - Where do application files (settings, logs, update staging) live?

mod paths;
mod platform;

pub use paths::{AppPaths, AppPathsError};
pub use platform::{HostPlatform, PackageFormat};
