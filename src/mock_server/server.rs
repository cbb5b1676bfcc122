//! Mock GitHub/GitLab API server.
//!
//! Provides an axum-based HTTP server that serves both providers' REST
//! endpoints and the SPDX license list from one address.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;
use crate::HarvestConfig;

/// An in-process forge answering GitHub and GitLab REST calls.
///
/// Point a [`HarvestConfig`] at it with [`MockServer::harvest_config`].
pub struct MockServer {
    url: String,
    handle: JoinHandle<()>,
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Serve the default scenario (`acme/widget`, `acme/empty` and
    /// `acme/tools/gadget`) on an ephemeral port.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Serve nothing but `/health` and an empty SPDX list.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve the given state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "mock server stopped");
            }
        });

        Self {
            url: format!("http://{addr}"),
            handle,
            state: shared_state,
        }
    }

    /// Base URL, usable as both the GitHub and the GitLab API root.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the SPDX license list served by this server.
    pub fn spdx_url(&self) -> String {
        format!("{}/spdx/licenses.json", self.url)
    }

    /// A configuration that sends every provider request to this server.
    pub fn harvest_config(&self) -> HarvestConfig {
        HarvestConfig::default()
            .with_github_api_url(self.url.clone())
            .with_gitlab_api_url(self.url.clone())
            .with_spdx_list_url(self.spdx_url())
    }

    /// Live state; writes are visible to the next request.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Abort the server task and wait for it to finish.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        state.github_repos.extend(scenario.github_repos);
        state.github_languages.extend(scenario.github_languages);
        state.github_readmes.extend(scenario.github_readmes);
        state.github_commits.extend(scenario.github_commits);

        for project in scenario.gitlab_projects {
            state.gitlab_projects.insert(project.id, project);
        }
        state.gitlab_languages.extend(scenario.gitlab_languages);
        state.gitlab_contributors.extend(scenario.gitlab_contributors);

        state.spdx_licenses = scenario.spdx_licenses;
        state
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // GitHub routes
            .route("/repos/:owner/:repo", get(handlers::get_repository))
            .route("/repos/:owner/:repo/languages", get(handlers::get_languages))
            .route("/repos/:owner/:repo/readme", get(handlers::get_readme))
            .route("/repos/:owner/:repo/commits", get(handlers::list_commits))
            // GitLab routes
            .route("/projects/:id", get(handlers::get_project))
            .route(
                "/projects/:id/languages",
                get(handlers::get_project_languages),
            )
            .route(
                "/projects/:id/repository/contributors",
                get(handlers::list_contributors),
            )
            // License list
            .route("/spdx/licenses.json", get(handlers::get_spdx_licenses))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::fixtures::{DEFAULT_GITHUB_REPO, DEFAULT_GITLAB_PROJECT};
    use crate::{
        Fetch, GitHubRepository, GitLabProject, List, GitHubCommit, ProviderClient, ProviderKind,
    };
    use std::time::Duration;

    fn client(server: &MockServer, provider: ProviderKind) -> ProviderClient {
        ProviderClient::new(provider, server.url(), None, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let response = reqwest::Client::new()
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_fetch_github_repository() {
        let server = MockServer::start().await;
        let client = client(&server, ProviderKind::GitHub);

        let repo = GitHubRepository::fetch(&client, DEFAULT_GITHUB_REPO.to_string())
            .await
            .expect("Failed to fetch repository");
        assert_eq!(repo.name.as_deref(), Some("widget"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_fetch_gitlab_project_by_encoded_path() {
        let server = MockServer::start().await;
        let client = client(&server, ProviderKind::GitLab);

        let project = GitLabProject::fetch(&client, DEFAULT_GITLAB_PROJECT.to_string())
            .await
            .expect("Failed to fetch project");
        assert_eq!(project.name.as_deref(), Some("gadget"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_commits_are_paginated() {
        let server = MockServer::start().await;
        let client = client(&server, ProviderKind::GitHub);

        let page = GitHubCommit::list_page(&client, DEFAULT_GITHUB_REPO, 1, 2)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let all = GitHubCommit::list_all(&client, DEFAULT_GITHUB_REPO, 10).await.unwrap();
        assert_eq!(all.len(), 3);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = client(&server, ProviderKind::GitHub);

        let result = GitHubRepository::fetch(&client, "acme/nothing".to_string()).await;
        assert_eq!(result.unwrap_err().status_code(), Some(404));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_required_token() {
        let state = MockState::new()
            .with_github_repository("acme/secret", Fixtures::minimal_github_repository("acme/secret"))
            .with_required_token("s3cret");
        let server = MockServer::with_state(state).await;

        let anonymous = client(&server, ProviderKind::GitHub);
        let err = GitHubRepository::fetch(&anonymous, "acme/secret".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));

        let authed =
            ProviderClient::new(ProviderKind::GitHub, server.url(), Some("s3cret"), Duration::from_secs(5))
                .unwrap();
        assert!(GitHubRepository::fetch(&authed, "acme/secret".to_string()).await.is_ok());

        server.shutdown().await;
    }
}
