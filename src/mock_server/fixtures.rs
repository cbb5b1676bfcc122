//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic GitHub and GitLab payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::{
    GitHubCommit, GitHubCommitAuthor, GitHubCommitDetail, GitHubLicense, GitHubOwner,
    GitHubReadme, GitHubRepository, GitLabContributor, GitLabLicense, GitLabNamespace,
    GitLabProject, SpdxLicense,
};

/// `owner/repo` of the fully populated GitHub repository in the default scenario.
pub const DEFAULT_GITHUB_REPO: &str = "acme/widget";

/// `owner/repo` of the GitHub repository without any commits.
pub const EMPTY_GITHUB_REPO: &str = "acme/empty";

/// Path of the GitLab project (in a subgroup) in the default scenario.
pub const DEFAULT_GITLAB_PROJECT: &str = "acme/tools/gadget";

/// ID of [`DEFAULT_GITLAB_PROJECT`].
pub const DEFAULT_GITLAB_PROJECT_ID: u64 = 42;

fn timestamp(rfc3339: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(rfc3339).ok()
}

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // GitHub Fixtures
    // =========================================================================

    /// A repository with only a name and an HTML URL.
    pub fn minimal_github_repository(full_path: &str) -> GitHubRepository {
        let name = full_path.rsplit('/').next().unwrap_or(full_path);
        GitHubRepository {
            id: Some(1),
            name: Some(name.to_string()),
            full_name: Some(full_path.to_string()),
            html_url: Some(format!("https://github.com/{full_path}")),
            ..Default::default()
        }
    }

    /// A repository with every field the harvester reads.
    pub fn github_repository(full_path: &str) -> GitHubRepository {
        let owner = full_path.split('/').next().unwrap_or(full_path);
        let mut repo = Self::minimal_github_repository(full_path);
        repo.id = Some(123_456);
        repo.description = Some("Widgets for everyone".to_string());
        repo.homepage = Some("https://widget.example.org".to_string());
        repo.license = Some(GitHubLicense {
            key: Some("mit".to_string()),
            name: Some("MIT License".to_string()),
            spdx_id: Some("MIT".to_string()),
        });
        repo.created_at = timestamp("2019-03-01T10:00:00Z");
        repo.updated_at = timestamp("2024-05-20T08:30:00Z");
        repo.pushed_at = timestamp("2024-05-19T22:15:00Z");
        repo.topics = vec!["codemeta".to_string(), "metadata".to_string()];
        repo.default_branch = Some("main".to_string());
        repo.has_issues = true;
        repo.owner = Some(GitHubOwner {
            login: owner.to_string(),
            owner_type: Some("Organization".to_string()),
            html_url: Some(format!("https://github.com/{owner}")),
        });
        repo
    }

    pub fn github_readme(full_path: &str) -> GitHubReadme {
        GitHubReadme {
            name: Some("README.md".to_string()),
            download_url: Some(format!(
                "https://raw.githubusercontent.com/{full_path}/main/README.md"
            )),
            html_url: Some(format!("https://github.com/{full_path}/blob/main/README.md")),
        }
    }

    pub fn github_commit(sha: &str, author: &str, email: &str) -> GitHubCommit {
        GitHubCommit {
            sha: Some(sha.to_string()),
            commit: GitHubCommitDetail {
                author: Some(GitHubCommitAuthor {
                    name: Some(author.to_string()),
                    email: Some(email.to_string()),
                }),
            },
        }
    }

    // =========================================================================
    // GitLab Fixtures
    // =========================================================================

    /// A project with every field the harvester reads and an MIT license.
    pub fn gitlab_project(id: u64, path: &str) -> GitLabProject {
        let name = path.rsplit('/').next().unwrap_or(path);
        let namespace = path.rsplit_once('/').map(|(ns, _)| ns).unwrap_or(path);
        let web_url = format!("https://gitlab.com/{path}");

        GitLabProject {
            id,
            name: Some(name.to_string()),
            path_with_namespace: Some(path.to_string()),
            description: Some("Gadgets, harvested".to_string()),
            http_url_to_repo: Some(format!("{web_url}.git")),
            readme_url: Some(format!("{web_url}/-/blob/main/README.md")),
            created_at: timestamp("2020-07-14T12:00:00.000+02:00"),
            last_activity_at: timestamp("2024-02-29T23:30:00.000Z"),
            topics: vec!["research".to_string()],
            default_branch: Some("main".to_string()),
            issues_enabled: true,
            namespace: Some(GitLabNamespace {
                name: namespace.rsplit('/').next().unwrap_or(namespace).to_string(),
                kind: Some("group".to_string()),
                web_url: Some(format!("https://gitlab.com/groups/{namespace}")),
            }),
            license: Some(GitLabLicense {
                key: Some("mit".to_string()),
                name: Some("MIT License".to_string()),
                nickname: None,
            }),
            web_url: Some(web_url),
            ..Default::default()
        }
    }

    pub fn gitlab_contributor(name: &str, email: &str, commits: u64) -> GitLabContributor {
        GitLabContributor {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            commits,
        }
    }

    // =========================================================================
    // SPDX Fixtures
    // =========================================================================

    pub fn spdx_license(id: &str, name: &str, deprecated: bool) -> SpdxLicense {
        SpdxLicense {
            license_id: id.to_string(),
            name: name.to_string(),
            is_deprecated_license_id: deprecated,
        }
    }

    /// A small excerpt of the SPDX license list.
    pub fn spdx_licenses() -> Vec<SpdxLicense> {
        vec![
            Self::spdx_license("MIT", "MIT License", false),
            Self::spdx_license("Apache-2.0", "Apache License 2.0", false),
            Self::spdx_license("GPL-3.0-only", "GNU General Public License v3.0 only", false),
            Self::spdx_license("GPL-3.0", "GNU General Public License v3.0 only", true),
            Self::spdx_license("BSD-3-Clause", "BSD 3-Clause \"New\" or \"Revised\" License", false),
        ]
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario covering both providers.
pub struct DefaultScenario {
    pub github_repos: Vec<(String, GitHubRepository)>,
    pub github_languages: Vec<(String, BTreeMap<String, u64>)>,
    pub github_readmes: Vec<(String, GitHubReadme)>,
    pub github_commits: Vec<(String, Vec<GitHubCommit>)>,
    pub gitlab_projects: Vec<GitLabProject>,
    pub gitlab_languages: Vec<(u64, BTreeMap<String, f64>)>,
    pub gitlab_contributors: Vec<(u64, Vec<GitLabContributor>)>,
    pub spdx_licenses: Vec<SpdxLicense>,
}

impl DefaultScenario {
    fn new() -> Self {
        let widget = DEFAULT_GITHUB_REPO.to_string();
        let empty = EMPTY_GITHUB_REPO.to_string();

        let github_repos = vec![
            (widget.clone(), Fixtures::github_repository(&widget)),
            (empty.clone(), Fixtures::minimal_github_repository(&empty)),
        ];

        let github_languages = vec![(
            widget.clone(),
            BTreeMap::from([("Rust".to_string(), 48_213), ("Shell".to_string(), 1_024)]),
        )];

        let github_readmes = vec![(widget.clone(), Fixtures::github_readme(&widget))];

        // Ada appears twice with differently cased email.
        let github_commits = vec![(
            widget,
            vec![
                Fixtures::github_commit("c3", "Grace Hopper", "grace@example.org"),
                Fixtures::github_commit("c2", "Ada Lovelace", "ADA@example.org"),
                Fixtures::github_commit("c1", "Ada Lovelace", "ada@example.org"),
            ],
        )];

        let gitlab_projects = vec![Fixtures::gitlab_project(
            DEFAULT_GITLAB_PROJECT_ID,
            DEFAULT_GITLAB_PROJECT,
        )];

        let gitlab_languages = vec![(
            DEFAULT_GITLAB_PROJECT_ID,
            BTreeMap::from([("C".to_string(), 12.5), ("Python".to_string(), 87.5)]),
        )];

        let gitlab_contributors = vec![(
            DEFAULT_GITLAB_PROJECT_ID,
            vec![
                Fixtures::gitlab_contributor("Margaret Hamilton", "margaret@example.org", 12),
                Fixtures::gitlab_contributor("Alan Turing", "alan@example.org", 3),
            ],
        )];

        Self {
            github_repos,
            github_languages,
            github_readmes,
            github_commits,
            gitlab_projects,
            gitlab_languages,
            gitlab_contributors,
            spdx_licenses: Fixtures::spdx_licenses(),
        }
    }
}
