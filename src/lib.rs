//! CodeMeta harvester for GitHub and GitLab repositories.
//!
//! Given a repository path (a web URL, an SSH remote, or a local checkout
//! with a configured remote), this crate reads the project's metadata from
//! the hosting provider's REST API and maps it onto CodeMeta keys.
//!
//! # Quick Start
//!
//! ```no_run
//! use githublab_harvest::{CodeMetaField, HarvestConfig};
//!
//! #[tokio::main]
//! async fn main() -> githublab_harvest::Result<()> {
//!     // Tokens and endpoints come from the environment
//!     let config = HarvestConfig::from_env()?;
//!
//!     let record = githublab_harvest::harvest("https://gitlab.com/acme/widget", &config).await?;
//!     for (field, value) in &record {
//!         println!("{field}: {value}");
//!     }
//!
//!     if record.contains(CodeMetaField::License) {
//!         println!("licensed");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Provider endpoints are modelled as types implementing two traits:
//!
//! - [`Fetch`] - Fetch a single resource by ID
//! - [`List`] - Fetch paginated collections
//!
//! [`GitHubHarvest`] and [`GitLabHarvest`] collect those resources and map
//! them onto a [`CodeMetaRecord`]. [`Harvester`] dispatches on the
//! detected [`ProviderKind`].
//!
//! # Configuration
//!
//! [`HarvestConfig::from_env`] reads:
//!
//! - `GITHUB_TOKEN` (optional) - GitHub personal access token
//! - `GITLAB_TOKEN` (optional) - GitLab personal access token
//! - `HARVEST_GITHUB_API_URL` (optional) - defaults to `https://api.github.com`
//! - `HARVEST_GITLAB_API_URL` (optional) - defaults to `https://<host>/api/v4`
//! - `HARVEST_GITLAB_HOSTS` (optional) - comma-separated self-hosted GitLab hosts
//! - `HARVEST_SPDX_URL` (optional) - SPDX license list JSON
//! - `HARVEST_TIMEOUT_SECS` (optional) - per-request timeout
//! - `HARVEST_FETCH_CONTRIBUTORS` (optional) - `false` skips contributor lookups

mod client;
mod codemeta;
mod config;
mod error;
mod harvest;
mod models;
mod pagination;
mod reference;
mod spdx;
mod traits;

pub mod cli;
pub mod mcp;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::ProviderClient;
pub use config::{HarvestConfig, DEFAULT_MAX_CONTRIBUTOR_PAGES};
pub use error::{HarvestError, Result};
pub use harvest::{harvest, HarvestPlugin, Harvester, PLUGIN_NAME};
pub use pagination::{Page, PageLinks, PaginationParams};
pub use reference::{ProviderKind, RepositoryReference};

// Re-export CodeMeta types
pub use codemeta::{
    Agent, CodeMetaField, CodeMetaRecord, CodeMetaValue, Organization, Person, CODEMETA_CONTEXT,
};

// Re-export traits
pub use traits::{Fetch, List, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // GitHub types
    GitHubCommit,
    GitHubCommitAuthor,
    GitHubCommitDetail,
    GitHubHarvest,
    GitHubLanguages,
    GitHubLicense,
    GitHubOwner,
    GitHubReadme,
    GitHubRepository,
    // GitLab types
    GitLabContributor,
    GitLabHarvest,
    GitLabLanguages,
    GitLabLicense,
    GitLabNamespace,
    GitLabProject,
};

// Re-export convenience functions
pub use models::{contributors_from_commits, contributors_to_people};
pub use spdx::{SpdxLicense, SpdxLicenseList};
