//! Mock GitHub and GitLab APIs for E2E testing.
//!
//! This module provides an in-memory mock server that simulates both
//! providers' REST APIs and the SPDX license list. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests, so a whole harvest runs against one consistent data set.
//!
//! # Example
//!
//! ```ignore
//! use githublab_harvest::mock_server::MockServer;
//! use githublab_harvest::{CodeMetaField, Harvester};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let harvester = Harvester::new(server.harvest_config());
//!
//!     // Server comes with default fixtures
//!     let record = harvester.harvest("https://github.com/acme/widget").await.unwrap();
//!     assert!(record.contains(CodeMetaField::License));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{
    DefaultScenario, Fixtures, DEFAULT_GITHUB_REPO, DEFAULT_GITLAB_PROJECT,
    DEFAULT_GITLAB_PROJECT_ID, EMPTY_GITHUB_REPO,
};
pub use server::MockServer;
pub use state::MockState;
