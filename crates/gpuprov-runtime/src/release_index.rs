//! `ReleaseIndexPort` over the NVIDIA repository directory listings.

use std::sync::LazyLock;

use async_trait::async_trait;
use gpuprov_core::ports::{ReleaseIndexError, ReleaseIndexPort};
use gpuprov_core::{CudaRepoCandidate, PackageArch, VersionTarget};
use regex::Regex;
use tracing::debug;

use crate::pkg::{REQUEST_TIMEOUT, http_client, repo_url};

/// `cuda-toolkit-12-9_...deb` and `cuda-toolkit-12-9-...rpm`
static TOOLKIT_PACKAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"cuda-toolkit-(\d+)-(\d+)[_-]").ok());

/// Newest `cuda-toolkit-X-Y` package mentioned in a listing.
pub fn newest_toolkit_in_listing(listing: &str) -> Option<VersionTarget> {
    TOOLKIT_PACKAGE
        .as_ref()?
        .captures_iter(listing)
        .filter_map(|caps| {
            let major = caps.get(1)?.as_str().parse().ok()?;
            let minor = caps.get(2)?.as_str().parse().ok()?;
            Some(VersionTarget::new(major, minor))
        })
        .max()
}

/// Reads repository listings over HTTP.
pub struct HttpReleaseIndex {
    client: reqwest::Client,
    base_url: String,
    arch: PackageArch,
}

impl HttpReleaseIndex {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(REQUEST_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
            arch: PackageArch::current(),
        }
    }

    #[must_use]
    pub const fn with_arch(mut self, arch: PackageArch) -> Self {
        self.arch = arch;
        self
    }
}

#[async_trait]
impl ReleaseIndexPort for HttpReleaseIndex {
    async fn latest_toolkit(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<Option<VersionTarget>, ReleaseIndexError> {
        let url = format!("{}/", repo_url(&self.base_url, repo, self.arch));
        debug!(url = %url, "Fetching repository listing");

        let unreachable = |e: reqwest::Error| ReleaseIndexError::Unreachable {
            repo: repo.to_string(),
            reason: e.to_string(),
        };
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unreachable)?
            .text()
            .await
            .map_err(|e| ReleaseIndexError::Unparseable {
                repo: repo.to_string(),
                reason: e.to_string(),
            })?;

        Ok(newest_toolkit_in_listing(&body))
    }
}
