//! The harvest entry point.
//!
//! Hosts either call [`harvest`] directly or hold a [`Harvester`] through
//! the [`HarvestPlugin`] trait. Both take a repository path and return a
//! [`CodeMetaRecord`]; neither merges, persists, or retries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ProviderClient;
use crate::codemeta::CodeMetaRecord;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::models::{GitHubHarvest, GitLabHarvest};
use crate::reference::{ProviderKind, RepositoryReference};

/// Extension-point name this harvester registers under.
pub const PLUGIN_NAME: &str = "githublab";

/// Contract between a host application and a metadata harvester.
#[async_trait]
pub trait HarvestPlugin: Send + Sync {
    /// Name of the extension point the plugin answers to.
    fn name(&self) -> &'static str;

    /// Harvest CodeMeta metadata for the repository at `path`.
    ///
    /// # Errors
    ///
    /// Fails as a whole; no partial record is ever returned.
    async fn harvest(&self, path: &str) -> Result<CodeMetaRecord>;
}

/// GitHub/GitLab metadata harvester.
///
/// Holds only read-only configuration; cheap to clone and share.
///
/// # Example
///
/// ```no_run
/// use githublab_harvest::{CodeMetaField, Harvester};
///
/// # async fn example() -> githublab_harvest::Result<()> {
/// let harvester = Harvester::from_env()?;
/// let record = harvester.harvest("https://github.com/acme/widget").await?;
/// if let Some(license) = record.get(CodeMetaField::License) {
///     println!("license: {license}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harvester {
    config: Arc<HarvestConfig>,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create a harvester configured from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HarvestConfig::from_env()?))
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Resolve `path` to a repository reference without any network access
    /// (a local checkout is read from disk).
    pub fn detect(&self, path: &str) -> Result<RepositoryReference> {
        RepositoryReference::parse(path, &self.config)
    }

    /// Harvest metadata for the repository at `path`.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` / `UnsupportedProvider` if `path` does not name a
    ///   GitHub or GitLab repository
    /// - `NotFound` if the provider does not know the repository
    /// - `ProviderRequest` on network failure or a non-success response
    pub async fn harvest(&self, path: &str) -> Result<CodeMetaRecord> {
        let reference = self.detect(path)?;
        self.harvest_reference(&reference).await
    }

    /// Harvest metadata for an already parsed reference.
    #[tracing::instrument(skip(self), fields(provider = %reference.provider, repository = %reference.full_path()))]
    pub async fn harvest_reference(&self, reference: &RepositoryReference) -> Result<CodeMetaRecord> {
        let client = ProviderClient::for_reference(reference, &self.config)?;
        tracing::debug!(
            base_url = %client.base_url(),
            authenticated = client.is_authenticated(),
            "harvesting"
        );

        let record = match reference.provider {
            ProviderKind::GitHub => GitHubHarvest::collect(&client, reference, &self.config)
                .await?
                .into_codemeta(reference),
            ProviderKind::GitLab => GitLabHarvest::collect(&client, reference, &self.config)
                .await?
                .into_codemeta(reference),
        };

        tracing::info!(fields = record.len(), "harvested {}", reference.web_url);
        Ok(record)
    }

    /// Blocking variant of [`harvest`](Self::harvest) for synchronous hosts.
    ///
    /// Runs the harvest on a private current-thread runtime. Must not be
    /// called from within an async context.
    ///
    /// # Errors
    ///
    /// Same as [`harvest`](Self::harvest), plus `Runtime` if the runtime
    /// cannot be started.
    pub fn harvest_blocking(&self, path: &str) -> Result<CodeMetaRecord> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.harvest(path))
    }
}

#[async_trait]
impl HarvestPlugin for Harvester {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    async fn harvest(&self, path: &str) -> Result<CodeMetaRecord> {
        Harvester::harvest(self, path).await
    }
}

/// Harvest CodeMeta metadata for the repository at `path`.
///
/// This is the plugin entry point: one call, one record, no state kept.
///
/// # Errors
///
/// See [`Harvester::harvest`].
pub async fn harvest(path: &str, config: &HarvestConfig) -> Result<CodeMetaRecord> {
    Harvester::new(config.clone()).harvest(path).await
}
