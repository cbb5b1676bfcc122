//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitHub and GitLab APIs.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::RwLock;

use crate::{GitHubCommit, GitHubReadme, GitHubRepository, GitLabContributor, GitLabProject, SpdxLicense};

/// Shared state for the mock server.
///
/// GitHub data is keyed by `owner/repo`, GitLab data by project ID.
/// Wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    pub github_repos: HashMap<String, GitHubRepository>,

    /// Bytes of code per language.
    pub github_languages: HashMap<String, BTreeMap<String, u64>>,

    pub github_readmes: HashMap<String, GitHubReadme>,

    /// Commit history, newest first. A repository without an entry is
    /// served as empty (409).
    pub github_commits: HashMap<String, Vec<GitHubCommit>>,

    pub gitlab_projects: HashMap<u64, GitLabProject>,

    /// Percentage share per language.
    pub gitlab_languages: HashMap<u64, BTreeMap<String, f64>>,

    pub gitlab_contributors: HashMap<u64, Vec<GitLabContributor>>,

    /// Served at `/spdx/licenses.json`.
    pub spdx_licenses: Vec<SpdxLicense>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a GitHub repository under `owner/repo`.
    pub fn with_github_repository(mut self, full_path: &str, repo: GitHubRepository) -> Self {
        self.github_repos.insert(full_path.to_string(), repo);
        self
    }

    pub fn with_github_languages(mut self, full_path: &str, languages: &[(&str, u64)]) -> Self {
        self.github_languages.insert(
            full_path.to_string(),
            languages.iter().map(|(l, b)| (l.to_string(), *b)).collect(),
        );
        self
    }

    pub fn with_github_readme(mut self, full_path: &str, readme: GitHubReadme) -> Self {
        self.github_readmes.insert(full_path.to_string(), readme);
        self
    }

    pub fn with_github_commits(mut self, full_path: &str, commits: Vec<GitHubCommit>) -> Self {
        self.github_commits.insert(full_path.to_string(), commits);
        self
    }

    /// Add a GitLab project, keyed by its ID.
    pub fn with_gitlab_project(mut self, project: GitLabProject) -> Self {
        self.gitlab_projects.insert(project.id, project);
        self
    }

    pub fn with_gitlab_languages(mut self, project_id: u64, languages: &[(&str, f64)]) -> Self {
        self.gitlab_languages.insert(
            project_id,
            languages.iter().map(|(l, s)| (l.to_string(), *s)).collect(),
        );
        self
    }

    pub fn with_gitlab_contributors(
        mut self,
        project_id: u64,
        contributors: Vec<GitLabContributor>,
    ) -> Self {
        self.gitlab_contributors.insert(project_id, contributors);
        self
    }

    pub fn with_spdx_licenses(mut self, licenses: Vec<SpdxLicense>) -> Self {
        self.spdx_licenses = licenses;
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Check request credentials against the required token.
    ///
    /// Accepts GitHub's `Authorization: Bearer` and GitLab's `PRIVATE-TOKEN`.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(required) = self.required_token.as_deref() else {
            return true;
        };

        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let private = headers.get("private-token").and_then(|v| v.to_str().ok());

        bearer == Some(required) || private == Some(required)
    }

    pub fn get_github_repository(&self, full_path: &str) -> Option<&GitHubRepository> {
        self.github_repos.get(full_path)
    }

    /// Find a GitLab project by numeric ID or by `namespace/project` path.
    pub fn find_gitlab_project(&self, id_or_path: &str) -> Option<&GitLabProject> {
        match id_or_path.parse::<u64>() {
            Ok(id) => self.gitlab_projects.get(&id),
            Err(_) => self.gitlab_projects.values().find(|p| {
                p.path_with_namespace
                    .as_deref()
                    .is_some_and(|path| path.eq_ignore_ascii_case(id_or_path))
            }),
        }
    }
}

/// Slice out one 1-indexed page; the flag tells whether more follow.
pub(crate) fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> (Vec<T>, bool) {
    let page = page.max(1) as usize;
    let per_page = per_page.max(1) as usize;
    let slice: Vec<T> = items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    (slice, page * per_page < items.len())
}
