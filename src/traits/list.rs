//! List trait for fetching paged collections.

use async_trait::async_trait;

use crate::client::ProviderClient;
use crate::error::Result;
use crate::pagination::Page;

/// Default page size for list operations (the maximum both providers allow).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// List entities that belong to a parent resource, page by page.
///
/// # Example
///
/// ```ignore
/// use githublab_harvest::{GitHubCommit, List};
///
/// // Fetch a single page
/// let page = GitHubCommit::list_page(&client, "acme/widget", 1, 100).await?;
///
/// // Fetch at most ten pages
/// let commits = GitHubCommit::list_all(&client, "acme/widget", 10).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Identifies the resource whose children are listed.
    type Parent: Sync + ?Sized;

    /// List one page.
    ///
    /// # Arguments
    ///
    /// * `client` - The provider API client
    /// * `parent` - The owning resource
    /// * `page` - Page number (1-indexed)
    /// * `per_page` - Number of items per page (max 100)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &ProviderClient,
        parent: &Self::Parent,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>>;

    /// List entities across pages, stopping after `max_pages`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails. No partial list is
    /// returned.
    async fn list_all(
        client: &ProviderClient,
        parent: &Self::Parent,
        max_pages: u32,
    ) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = Self::list_page(client, parent, page, DEFAULT_PAGE_SIZE).await?;
            let has_more = result.has_more;
            all_items.extend(result.items);

            if !has_more {
                break;
            }

            if page >= max_pages {
                tracing::warn!(max_pages, "reached pagination limit, listing truncated");
                break;
            }
            page += 1;
        }

        Ok(all_items)
    }
}
