use log::{debug, warn};

use crate::feed::ReleaseInfo;

/// Build value marking an unversioned/debug binary. Such builds never
/// trigger an update.
pub const UNVERSIONED_SENTINEL: &str = "0.0.0.0";

/// Pick the most recently created release.
///
/// Exact-timestamp ties keep the earlier feed entry; since feed order is
/// arbitrary, the outcome on such ties is not deterministic.
#[must_use]
pub fn latest_release(releases: Vec<ReleaseInfo>) -> Option<ReleaseInfo> {
    let release = releases
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.created_at > best.created_at {
                candidate
            } else {
                best
            }
        });

    match &release {
        Some(release) => debug!(
            "latest published release is {} (created {})",
            release.name, release.created_at
        ),
        None => warn!("release feed returned no releases"),
    }
    release
}

/// Whether the given release should be installed over the running version.
///
/// True iff the release display name differs from `"v" + current_version`
/// and the running binary is not the unversioned sentinel build.
#[must_use]
pub fn update_needed(release_name: &str, current_version: &str) -> bool {
    if current_version == UNVERSIONED_SENTINEL {
        debug!("running an unversioned build; updates are never applied");
        return false;
    }
    release_name != format!("v{current_version}")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{UNVERSIONED_SENTINEL, latest_release, update_needed};
    use crate::feed::ReleaseInfo;

    fn release(id: u64, name: &str, day: u32) -> ReleaseInfo {
        ReleaseInfo {
            id,
            name: name.to_string(),
            created_at: Utc
                .with_ymd_and_hms(2026, 5, day, 12, 0, 0)
                .single()
                .expect("fixture timestamp should be valid"),
            assets: Vec::new(),
        }
    }

    #[test]
    fn picks_the_most_recently_created_release() {
        let chosen = latest_release(vec![
            release(1, "v1.1.0", 3),
            release(2, "v1.3.0", 9),
            release(3, "v1.2.0", 5),
        ])
        .expect("a release should be chosen");

        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn exact_timestamp_ties_keep_the_earlier_feed_entry() {
        let chosen = latest_release(vec![release(1, "v1.2.0", 5), release(2, "v1.2.1", 5)])
            .expect("a release should be chosen");
        assert_eq!(chosen.id, 1);
    }

    #[test]
    fn empty_feed_yields_no_release() {
        assert!(latest_release(Vec::new()).is_none());
    }

    #[test]
    fn update_needed_requires_a_name_mismatch() {
        assert!(update_needed("v1.3.0", "1.2.3"));
        assert!(!update_needed("v1.2.3", "1.2.3"));
    }

    #[test]
    fn sentinel_build_never_updates() {
        assert!(!update_needed("v9.9.9", UNVERSIONED_SENTINEL));
    }

    #[test]
    fn unprefixed_release_names_count_as_different() {
        // The comparison is string equality against "v" + version, nothing
        // smarter; a feed publishing bare names always looks newer.
        assert!(update_needed("1.2.3", "1.2.3"));
    }
}
