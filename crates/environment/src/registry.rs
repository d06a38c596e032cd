//! Release-registry client for mixed-version deployments.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde::Deserialize;

/// Default timeout for registry requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One tagged release, most-recent-first in listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

/// Upstream release registry, consumed as an interface so recipes stay
/// testable offline.
pub trait ReleaseRegistry: Send + Sync {
    /// Tagged releases for `owner/repo`, most recent first.
    fn list_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Release>>>;
}

/// GitHub releases API client.
pub struct GithubReleases {
    client: reqwest::Client,
}

impl GithubReleases {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent("testrig")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl ReleaseRegistry for GithubReleases {
    fn list_releases<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Release>>> {
        Box::pin(async move {
            let url = format!("https://api.github.com/repos/{owner}/{repo}/releases");
            let releases = self
                .client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Failed to list releases for {owner}/{repo}"))?
                .error_for_status()
                .context("Release listing returned an error status")?
                .json::<Vec<Release>>()
                .await
                .context("Failed to parse release listing")?;
            Ok(releases)
        })
    }
}

/// Strip the leading non-numeric prefix from a release tag
/// (`"v1.2.3"` -> `"1.2.3"`).
pub fn version_from_tag(tag: &str) -> &str {
    tag.trim_start_matches(|c: char| !c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v1.2.3"), "1.2.3");
        assert_eq!(version_from_tag("release-0.10.8"), "0.10.8");
        assert_eq!(version_from_tag("2.0.0"), "2.0.0");
        assert_eq!(version_from_tag(""), "");
    }
}
