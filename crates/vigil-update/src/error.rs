use thiserror::Error;

/// Failure modes of one update cycle.
///
/// Every variant is caught at the cycle boundary by the scheduler, logged
/// with context, and ends the cycle with no update applied. "Already on the
/// latest release" is a normal outcome, not an error.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("release feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("no release asset with suffix '{suffix}' among {count} assets")]
    NoMatchingAsset { suffix: &'static str, count: usize },

    #[error("download failed: {0}")]
    Download(String),

    #[error("redirect chain exceeded {limit} hops, last target {url}")]
    RedirectLoop { limit: usize, url: String },

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Zip {
        context: &'static str,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to launch updater: {0}")]
    Launch(#[source] std::io::Error),
}

impl UpdateError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn zip(context: &'static str, source: zip::result::ZipError) -> Self {
        Self::Zip { context, source }
    }

    pub(crate) fn io_with_path(
        context: &'static str,
        path: &std::path::Path,
        source: &std::io::Error,
    ) -> Self {
        Self::io(
            context,
            std::io::Error::new(source.kind(), format!("{}: {source}", path.display())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateError;

    #[test]
    fn no_matching_asset_display_names_the_suffix() {
        let error = UpdateError::NoMatchingAsset {
            suffix: ".zip",
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "no release asset with suffix '.zip' among 3 assets"
        );
    }

    #[test]
    fn io_with_path_includes_the_path_in_the_source() {
        let source = std::io::Error::other("disk full");
        let error = UpdateError::io_with_path(
            "failed to write staging file",
            std::path::Path::new("/tmp/stage"),
            &source,
        );
        assert!(error.to_string().contains("failed to write staging file"));
        assert!(format!("{error:?}").contains("/tmp/stage"));
    }
}
