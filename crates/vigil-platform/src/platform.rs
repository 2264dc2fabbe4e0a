/// Runtime shim used to start the service on posix-like hosts, where the
/// binary ships framework-dependent and cannot be executed directly.
const POSIX_SHIM: &str = "dotnet";

/// How the service binary is executed on the current host.
///
/// The update subsystem branches on this in exactly two places: which release
/// package format to download and unpack, and how the relaunch command handed
/// to the external updater is shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    /// Windows-like host: the binary runs directly.
    Native,
    /// Posix-like host: the binary is started through an interpreter shim,
    /// and relaunch arguments are prefixed with the real executable name.
    Shimmed { shim: String },
}

impl HostPlatform {
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Native
        } else {
            Self::Shimmed {
                shim: POSIX_SHIM.to_string(),
            }
        }
    }

    #[must_use]
    pub fn is_windows_like(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Release package format published for this host class.
    #[must_use]
    pub fn package_format(&self) -> PackageFormat {
        match self {
            Self::Native => PackageFormat::Zip,
            Self::Shimmed { .. } => PackageFormat::TarGz,
        }
    }
}

/// Archive format of a downloadable release package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Zip,
    TarGz,
}

impl PackageFormat {
    /// Filename suffix used to pick the matching release asset.
    #[must_use]
    pub fn asset_suffix(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::TarGz => ".gz",
        }
    }
}
