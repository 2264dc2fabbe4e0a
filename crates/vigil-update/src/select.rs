use vigil_platform::PackageFormat;

use crate::feed::AssetInfo;

/// Choose the downloadable package for the host platform: the first asset in
/// feed order whose filename carries the format's suffix.
///
/// `None` is a hard stop for the update cycle; there is nothing sensible to
/// download for this host.
#[must_use]
pub fn select_asset(assets: &[AssetInfo], format: PackageFormat) -> Option<&AssetInfo> {
    assets
        .iter()
        .find(|asset| asset.name.ends_with(format.asset_suffix()))
}
