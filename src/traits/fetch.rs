//! Fetch trait for reading single entities.

use async_trait::async_trait;

use crate::client::ProviderClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for provider models that are read from one
/// endpoint keyed by an identifier (a project path or numeric ID).
///
/// # Example
///
/// ```ignore
/// use githublab_harvest::{Fetch, GitHubRepository, ProviderClient};
///
/// let repo = GitHubRepository::fetch(&client, "acme/widget".to_string()).await?;
/// ```
#[async_trait]
pub trait Fetch: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn fetch(client: &ProviderClient, id: Self::Id) -> Result<Self>;
}
