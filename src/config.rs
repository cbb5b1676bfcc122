//! Harvest configuration.
//!
//! Credentials and endpoint overrides are supplied by the host, either
//! programmatically through the `with_*` builders or through environment
//! variables via [`HarvestConfig::from_env`]:
//!
//! - `GITHUB_TOKEN` - GitHub personal access token
//! - `GITLAB_TOKEN` - GitLab personal/project access token
//! - `HARVEST_GITHUB_API_URL` - GitHub API base (defaults to `https://api.github.com`)
//! - `HARVEST_GITLAB_API_URL` - GitLab API base (defaults to `https://<host>/api/v4`)
//! - `HARVEST_GITLAB_HOSTS` - comma-separated self-hosted GitLab hosts
//! - `HARVEST_SPDX_URL` - SPDX license list JSON
//! - `HARVEST_TIMEOUT_SECS` - per-request timeout
//! - `HARVEST_FETCH_CONTRIBUTORS` - set to `false` to skip contributor lookups

use std::env;
use std::time::Duration;

use crate::error::{HarvestError, Result};

pub(crate) const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub(crate) const DEFAULT_SPDX_LIST_URL: &str =
    "https://raw.githubusercontent.com/spdx/license-list-data/main/json/licenses.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contributor listings stop after this many pages of 100.
pub const DEFAULT_MAX_CONTRIBUTOR_PAGES: u32 = 10;

/// Read-only settings for one or more harvest calls.
#[derive(Clone)]
pub struct HarvestConfig {
    github_token: Option<String>,
    gitlab_token: Option<String>,
    github_api_url: String,
    gitlab_api_url: Option<String>,
    gitlab_hosts: Vec<String>,
    spdx_list_url: String,
    timeout: Duration,
    fetch_contributors: bool,
    max_contributor_pages: u32,
}

impl std::fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("gitlab_token", &self.gitlab_token.as_ref().map(|_| "***"))
            .field("github_api_url", &self.github_api_url)
            .field("gitlab_api_url", &self.gitlab_api_url)
            .field("gitlab_hosts", &self.gitlab_hosts)
            .field("timeout", &self.timeout)
            .field("fetch_contributors", &self.fetch_contributors)
            .finish_non_exhaustive()
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            gitlab_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            gitlab_api_url: None,
            gitlab_hosts: Vec::new(),
            spdx_list_url: DEFAULT_SPDX_LIST_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_contributors: true,
            max_contributor_pages: DEFAULT_MAX_CONTRIBUTOR_PAGES,
        }
    }
}

impl HarvestConfig {
    /// Create a configuration from environment variables.
    ///
    /// Every variable is optional; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `HARVEST_TIMEOUT_SECS` or
    /// `HARVEST_FETCH_CONTRIBUTORS` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.github_token = get("GITHUB_TOKEN");
        config.gitlab_token = get("GITLAB_TOKEN");

        if let Some(url) = get("HARVEST_GITHUB_API_URL") {
            config.github_api_url = url;
        }
        config.gitlab_api_url = get("HARVEST_GITLAB_API_URL");

        if let Some(hosts) = get("HARVEST_GITLAB_HOSTS") {
            config.gitlab_hosts = hosts
                .split(',')
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect();
        }

        if let Some(url) = get("HARVEST_SPDX_URL") {
            config.spdx_list_url = url;
        }

        if let Some(secs) = get("HARVEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                HarvestError::Config(format!("HARVEST_TIMEOUT_SECS must be a number, got '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(flag) = get("HARVEST_FETCH_CONTRIBUTORS") {
            config.fetch_contributors = parse_bool(&flag).ok_or_else(|| {
                HarvestError::Config(format!(
                    "HARVEST_FETCH_CONTRIBUTORS must be true or false, got '{flag}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Set the GitHub token.
    #[must_use]
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Set the GitLab token.
    #[must_use]
    pub fn with_gitlab_token(mut self, token: impl Into<String>) -> Self {
        self.gitlab_token = Some(token.into());
        self
    }

    /// Override the GitHub API base URL.
    #[must_use]
    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }

    /// Override the GitLab API base URL for every GitLab host.
    #[must_use]
    pub fn with_gitlab_api_url(mut self, url: impl Into<String>) -> Self {
        self.gitlab_api_url = Some(url.into());
        self
    }

    /// Treat `host` as a GitLab instance.
    #[must_use]
    pub fn with_gitlab_host(mut self, host: impl Into<String>) -> Self {
        self.gitlab_hosts.push(host.into().to_ascii_lowercase());
        self
    }

    /// Override the SPDX license list location.
    #[must_use]
    pub fn with_spdx_list_url(mut self, url: impl Into<String>) -> Self {
        self.spdx_list_url = url.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable contributor harvesting.
    #[must_use]
    pub fn with_contributors(mut self, enabled: bool) -> Self {
        self.fetch_contributors = enabled;
        self
    }

    /// Cap the number of pages walked when listing contributors.
    #[must_use]
    pub fn with_max_contributor_pages(mut self, pages: u32) -> Self {
        self.max_contributor_pages = pages.max(1);
        self
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    pub fn gitlab_token(&self) -> Option<&str> {
        self.gitlab_token.as_deref()
    }

    pub fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    /// API base for a GitLab instance, honoring the global override.
    ///
    /// `origin` is the instance's scheme and authority, e.g.
    /// `https://code.example.org:8443`.
    pub fn gitlab_api_url(&self, origin: &str) -> String {
        match &self.gitlab_api_url {
            Some(url) => url.clone(),
            None => format!("{}/api/v4", origin.trim_end_matches('/')),
        }
    }

    pub fn gitlab_hosts(&self) -> &[String] {
        &self.gitlab_hosts
    }

    pub fn spdx_list_url(&self) -> &str {
        &self.spdx_list_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_contributors(&self) -> bool {
        self.fetch_contributors
    }

    pub fn max_contributor_pages(&self) -> u32 {
        self.max_contributor_pages
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = HarvestConfig::from_lookup(|_| None).unwrap();
        assert!(config.github_token().is_none());
        assert_eq!(config.github_api_url(), DEFAULT_GITHUB_API_URL);
        assert_eq!(
            config.gitlab_api_url("https://gitlab.com"),
            "https://gitlab.com/api/v4"
        );
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.fetch_contributors());
    }

    #[test]
    fn test_reads_tokens_and_hosts() {
        let config = HarvestConfig::from_lookup(lookup(&[
            ("GITHUB_TOKEN", "gh-secret"),
            ("GITLAB_TOKEN", ""),
            ("HARVEST_GITLAB_HOSTS", "code.example.org, Git.Example.NET ,"),
            ("HARVEST_FETCH_CONTRIBUTORS", "no"),
        ]))
        .unwrap();

        assert_eq!(config.github_token(), Some("gh-secret"));
        assert!(config.gitlab_token().is_none());
        assert_eq!(config.gitlab_hosts(), ["code.example.org", "git.example.net"]);
        assert!(!config.fetch_contributors());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = HarvestConfig::from_lookup(lookup(&[("HARVEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(HarvestError::Config(_))));
    }

    #[test]
    fn test_debug_hides_tokens() {
        let config = HarvestConfig::default()
            .with_github_token("gh-secret")
            .with_gitlab_token("gl-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("gh-secret"));
        assert!(!debug.contains("gl-secret"));
    }
}
