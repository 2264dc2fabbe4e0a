use std::io::Cursor;
use std::path::Path;

use log::{debug, warn};
use vigil_platform::PackageFormat;

use crate::error::UpdateError;

/// Unpack a downloaded release package into `staging_dir`.
///
/// The staging directory is wiped and recreated first, so a rerun for the
/// same session leaves only the latest output. Partial output from a failed
/// extraction is left behind; the next cycle's prepare step removes it.
///
/// # Errors
/// Fails on a corrupt archive or filesystem errors.
pub fn extract(bytes: &[u8], format: PackageFormat, staging_dir: &Path) -> Result<(), UpdateError> {
    prepare_staging_dir(staging_dir)?;
    match format {
        PackageFormat::Zip => extract_zip(bytes, staging_dir),
        PackageFormat::TarGz => extract_tar_gz(bytes, staging_dir),
    }
}

fn prepare_staging_dir(dir: &Path) -> Result<(), UpdateError> {
    if dir.exists() {
        debug!("removing stale staging directory {}", dir.display());
        std::fs::remove_dir_all(dir).map_err(|error| {
            UpdateError::io_with_path("failed to remove stale staging directory", dir, &error)
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|error| {
        UpdateError::io_with_path("failed to create staging directory", dir, &error)
    })
}

fn extract_zip(bytes: &[u8], dest: &Path) -> Result<(), UpdateError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|error| UpdateError::zip("failed to read zip package", error))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|error| UpdateError::zip("failed to read zip entry", error))?;
        let Some(name) = entry.enclosed_name() else {
            warn!("skipping zip entry with unsafe path");
            continue;
        };
        let out_path = dest.join(name);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|error| {
                UpdateError::io_with_path("failed to create staged directory", &out_path, &error)
            })?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|error| {
                    UpdateError::io_with_path(
                        "failed to create staged parent directory",
                        parent,
                        &error,
                    )
                })?;
            }
            let mut outfile = std::fs::File::create(&out_path).map_err(|error| {
                UpdateError::io_with_path("failed to create staged file", &out_path, &error)
            })?;
            std::io::copy(&mut entry, &mut outfile).map_err(|error| {
                UpdateError::io_with_path("failed to write staged file", &out_path, &error)
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    let _ =
                        std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
                }
            }
        }
    }

    debug!("zip package extracted to {}", dest.display());
    Ok(())
}

fn extract_tar_gz(bytes: &[u8], dest: &Path) -> Result<(), UpdateError> {
    let decoder = flate2::read::GzDecoder::new(Cursor::new(bytes));
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(dest)
        .map_err(|error| UpdateError::io_with_path("failed to unpack tar.gz package", dest, &error))?;

    debug!("tar.gz package extracted to {}", dest.display());
    Ok(())
}
