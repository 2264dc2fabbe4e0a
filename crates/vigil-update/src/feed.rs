use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::UpdateError;

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    /// Public browser download URL.
    pub browser_download_url: String,
    /// Feed-API endpoint for this asset. Token-authenticated downloads must
    /// go through this URL; private feeds reject the public one.
    pub url: String,
}

/// Immutable snapshot of one published release, fetched fresh each cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub id: u64,
    /// Display name of the release, `v<version>` by convention.
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
}

impl ReleaseInfo {
    /// Release version without the `v` prefix.
    #[must_use]
    pub fn version(&self) -> &str {
        self.name.strip_prefix('v').unwrap_or(&self.name)
    }
}

/// Source of truth for published releases.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    /// List all releases of the product, in feed order.
    async fn list_releases(&self) -> Result<Vec<ReleaseInfo>, UpdateError>;
}

/// GitHub releases API client.
pub struct GithubFeed {
    client: reqwest::Client,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubFeed {
    pub fn new(
        client: reqwest::Client,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            token,
        }
    }

    fn releases_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases",
            self.owner, self.repo
        )
    }
}

#[async_trait]
impl ReleaseFeed for GithubFeed {
    async fn list_releases(&self) -> Result<Vec<ReleaseInfo>, UpdateError> {
        let mut request = self
            .client
            .get(self.releases_url())
            .header("User-Agent", "vigil")
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|error| UpdateError::FeedUnavailable(error.to_string()))?;

        if !response.status().is_success() {
            return Err(UpdateError::FeedUnavailable(format!(
                "release feed returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|error| UpdateError::FeedUnavailable(format!("invalid feed payload: {error}")))
    }
}
