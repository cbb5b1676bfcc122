//! GitHub REST API models and CodeMeta mapping.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::ProviderClient;
use crate::codemeta::{sort_people, Agent, CodeMetaField, CodeMetaRecord, Organization, Person};
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::pagination::Page;
use crate::reference::RepositoryReference;
use crate::traits::{Fetch, List};

/// GitHub's license placeholder for files it cannot classify.
const NO_ASSERTION: &str = "NOASSERTION";

/// A GitHub repository as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubRepository {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// Project website configured in the repository settings.
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<GitHubLicense>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Time of the last push to any branch.
    #[serde(default)]
    pub pushed_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub owner: Option<GitHubOwner>,
}

/// License summary embedded in a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubLicense {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spdx_id: Option<String>,
}

impl GitHubLicense {
    /// The SPDX identifier, unless GitHub could not classify the license.
    pub fn spdx_id(&self) -> Option<&str> {
        self.spdx_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != NO_ASSERTION)
    }
}

/// Repository owner (user or organization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    /// "User" or "Organization".
    #[serde(rename = "type", default)]
    pub owner_type: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl GitHubOwner {
    pub fn is_organization(&self) -> bool {
        self.owner_type.as_deref() == Some("Organization")
    }

    fn to_agent(&self) -> Agent {
        if self.is_organization() {
            Agent::Organization(Organization {
                name: self.login.clone(),
                url: self.html_url.clone(),
            })
        } else {
            Agent::Person(Person::from_full_name(&self.login, None))
        }
    }
}

/// README location from `GET /repos/{owner}/{repo}/readme`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubReadme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl GitHubReadme {
    /// Fetch the README entry; `None` when the repository has no README.
    #[tracing::instrument(skip(client))]
    pub async fn fetch_optional(client: &ProviderClient, full_path: &str) -> Result<Option<Self>> {
        client
            .get_optional_json(&format!("repos/{full_path}/readme"))
            .await
    }
}

/// Languages of a repository, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitHubLanguages(pub Vec<String>);

#[async_trait]
impl Fetch for GitHubLanguages {
    type Id = String; // "owner/repo"

    #[tracing::instrument(skip(client))]
    async fn fetch(client: &ProviderClient, full_path: String) -> Result<Self> {
        let bytes: BTreeMap<String, u64> = client
            .get_json(&format!("repos/{full_path}/languages"))
            .await?;

        let mut languages: Vec<(String, u64)> = bytes.into_iter().collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(Self(languages.into_iter().map(|(name, _)| name).collect()))
    }
}

#[async_trait]
impl Fetch for GitHubRepository {
    type Id = String; // "owner/repo"

    #[tracing::instrument(skip(client))]
    async fn fetch(client: &ProviderClient, full_path: String) -> Result<Self> {
        client.get_json(&format!("repos/{full_path}")).await
    }
}

/// One entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommit {
    #[serde(default)]
    pub sha: Option<String>,
    pub commit: GitHubCommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommitDetail {
    #[serde(default)]
    pub author: Option<GitHubCommitAuthor>,
}

/// Git author identity recorded in a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubCommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
impl List for GitHubCommit {
    type Parent = str; // "owner/repo"

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &ProviderClient,
        full_path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        match client
            .get_page(&format!("repos/{full_path}/commits"), page, per_page)
            .await
        {
            // An empty repository answers 409 Conflict.
            Err(err) if err.status_code() == Some(409) => {
                Ok(Page::new(Vec::new(), page, per_page, Some(0)))
            }
            result => result,
        }
    }
}

/// Distinct commit authors, deduplicated by lowercased email.
pub fn contributors_from_commits(commits: &[GitHubCommit]) -> Vec<Person> {
    let mut seen = HashSet::new();
    let mut people = Vec::new();

    for author in commits.iter().filter_map(|c| c.commit.author.as_ref()) {
        let (Some(name), Some(email)) = (author.name.as_deref(), author.email.as_deref()) else {
            continue;
        };
        if name.trim().is_empty() || email.trim().is_empty() {
            continue;
        }

        let email = email.trim().to_lowercase();
        if seen.insert(email.clone()) {
            people.push(Person::from_full_name(&clean_author_name(name), Some(email)));
        }
    }

    sort_people(&mut people);
    people
}

/// Commit author names are free text. Keep letters and whitespace only,
/// unless that leaves nothing.
fn clean_author_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    if cleaned.trim().is_empty() {
        name.trim().to_string()
    } else {
        cleaned
    }
}

/// Everything read from GitHub for one repository.
#[derive(Debug, Clone, Default)]
pub struct GitHubHarvest {
    pub repository: GitHubRepository,
    pub languages: GitHubLanguages,
    pub readme: Option<GitHubReadme>,
    pub contributors: Vec<Person>,
}

impl GitHubHarvest {
    /// Read the repository and its secondary endpoints.
    ///
    /// # Errors
    ///
    /// `NotFound` if the repository does not exist; any failure of a
    /// secondary request fails the whole call.
    #[tracing::instrument(skip(client, config), fields(repository = %reference.full_path()))]
    pub async fn collect(
        client: &ProviderClient,
        reference: &RepositoryReference,
        config: &HarvestConfig,
    ) -> Result<Self> {
        let full_path = reference.full_path();

        let repository = GitHubRepository::fetch(client, full_path.clone())
            .await
            .map_err(|e| e.or_not_found(reference))?;
        let languages = GitHubLanguages::fetch(client, full_path.clone()).await?;
        let readme = GitHubReadme::fetch_optional(client, &full_path).await?;

        let contributors = if config.fetch_contributors() {
            let commits =
                GitHubCommit::list_all(client, &full_path, config.max_contributor_pages()).await?;
            tracing::debug!(commits = commits.len(), "walked commit history");
            contributors_from_commits(&commits)
        } else {
            Vec::new()
        };

        Ok(Self {
            repository,
            languages,
            readme,
            contributors,
        })
    }

    /// Map onto CodeMeta keys, omitting anything GitHub did not report.
    pub fn into_codemeta(self, reference: &RepositoryReference) -> CodeMetaRecord {
        let repo = self.repository;
        let mut record = CodeMetaRecord::new();

        let repo_url = repo
            .html_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .unwrap_or_else(|| reference.web_url.clone());
        let homepage = repo
            .homepage
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .and_then(|h| Url::parse(h).ok());

        record.insert_opt(CodeMetaField::Name, repo.name);
        record.insert_opt(CodeMetaField::Identifier, repo.id.map(|id| id.to_string()));
        record.insert_opt(CodeMetaField::Description, repo.description);
        record.insert(CodeMetaField::CodeRepository, repo_url.clone());
        record.insert(CodeMetaField::Url, homepage.unwrap_or_else(|| repo_url.clone()));

        if repo.has_issues {
            record.insert_opt(
                CodeMetaField::IssueTracker,
                Url::parse(&format!("{}/issues", repo_url.as_str().trim_end_matches('/'))).ok(),
            );
        }

        record.insert_opt(
            CodeMetaField::License,
            repo.license.as_ref().and_then(|l| l.spdx_id()).map(str::to_string),
        );

        record.insert_opt(CodeMetaField::DateCreated, repo.created_at.map(|d| d.date_naive()));
        record.insert_opt(CodeMetaField::DateModified, repo.updated_at.map(|d| d.date_naive()));
        record.insert_opt(CodeMetaField::DatePublished, repo.pushed_at.map(|d| d.date_naive()));

        record.insert(CodeMetaField::Keywords, repo.topics);
        record.insert(CodeMetaField::ProgrammingLanguage, self.languages.0);

        if let Some(branch) = repo.default_branch.as_deref().filter(|b| !b.is_empty()) {
            record.insert_opt(
                CodeMetaField::DownloadUrl,
                Url::parse(&format!(
                    "{}/archive/refs/heads/{branch}.zip",
                    repo_url.as_str().trim_end_matches('/')
                ))
                .ok(),
            );
        }

        record.insert_opt(
            CodeMetaField::Readme,
            self.readme
                .and_then(|r| r.download_url.or(r.html_url))
                .and_then(|u| Url::parse(&u).ok()),
        );

        record.insert_opt(
            CodeMetaField::CopyrightHolder,
            repo.owner.as_ref().map(GitHubOwner::to_agent),
        );
        record.insert(
            CodeMetaField::Contributor,
            self.contributors.into_iter().map(Agent::Person).collect::<Vec<_>>(),
        );

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codemeta::CodeMetaValue;
    use chrono::NaiveDate;

    fn reference() -> RepositoryReference {
        RepositoryReference::parse_remote("https://github.com/acme/widget", &HarvestConfig::default())
            .unwrap()
    }

    fn full_repository() -> GitHubRepository {
        serde_json::from_value(serde_json::json!({
            "id": 1296269,
            "name": "widget",
            "full_name": "acme/widget",
            "description": "A widget",
            "html_url": "https://github.com/acme/widget",
            "homepage": "https://widget.example.org",
            "license": {"key": "apache-2.0", "name": "Apache License 2.0", "spdx_id": "Apache-2.0"},
            "created_at": "2011-01-26T19:01:12Z",
            "updated_at": "2024-03-02T10:00:00Z",
            "pushed_at": "2024-03-01T23:59:59Z",
            "topics": ["codemeta", "metadata"],
            "default_branch": "main",
            "has_issues": true,
            "owner": {"login": "acme", "type": "Organization", "html_url": "https://github.com/acme"}
        }))
        .unwrap()
    }

    #[test]
    fn test_full_repository_mapping() {
        let project = GitHubHarvest {
            repository: full_repository(),
            languages: GitHubLanguages(vec!["Rust".into(), "Shell".into()]),
            readme: Some(GitHubReadme {
                name: Some("README.md".into()),
                download_url: Some("https://raw.githubusercontent.com/acme/widget/main/README.md".into()),
                html_url: None,
            }),
            contributors: vec![Person::from_full_name("Ada Lovelace", Some("ada@example.org".into()))],
        };

        let record = project.into_codemeta(&reference());

        assert_eq!(record.len(), 16);
        assert_eq!(record.get(CodeMetaField::Name).unwrap().as_str(), Some("widget"));
        assert_eq!(record.get(CodeMetaField::Identifier).unwrap().as_str(), Some("1296269"));
        assert_eq!(record.get(CodeMetaField::License).unwrap().as_str(), Some("Apache-2.0"));
        assert_eq!(
            record.get(CodeMetaField::Url).unwrap().as_str(),
            Some("https://widget.example.org/")
        );
        assert_eq!(
            record.get(CodeMetaField::IssueTracker).unwrap().as_str(),
            Some("https://github.com/acme/widget/issues")
        );
        assert_eq!(
            record.get(CodeMetaField::DownloadUrl).unwrap().as_str(),
            Some("https://github.com/acme/widget/archive/refs/heads/main.zip")
        );
        assert_eq!(
            record.get(CodeMetaField::DateCreated).unwrap().as_date(),
            NaiveDate::from_ymd_opt(2011, 1, 26)
        );
        assert_eq!(
            record.get(CodeMetaField::DatePublished).unwrap().as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(matches!(
            record.get(CodeMetaField::CopyrightHolder),
            Some(CodeMetaValue::Agent(Agent::Organization(org))) if org.name == "acme"
        ));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let repository: GitHubRepository = serde_json::from_value(serde_json::json!({
            "name": "widget",
            "description": "A widget",
            "license": {"key": "mit", "spdx_id": "MIT"}
        }))
        .unwrap();
        let project = GitHubHarvest {
            repository,
            ..Default::default()
        };

        let record = project.into_codemeta(&reference());
        let fields: Vec<&str> = record.fields().map(|f| f.as_str()).collect();
        assert_eq!(fields, ["codeRepository", "description", "license", "name", "url"]);
        assert_eq!(
            record.get(CodeMetaField::Url).unwrap().as_str(),
            Some("https://github.com/acme/widget")
        );
    }

    #[test]
    fn test_noassertion_license_is_omitted() {
        let mut repository = full_repository();
        repository.license = Some(GitHubLicense {
            key: Some("other".into()),
            name: Some("Other".into()),
            spdx_id: Some(NO_ASSERTION.into()),
        });
        let record = GitHubHarvest {
            repository,
            ..Default::default()
        }
        .into_codemeta(&reference());
        assert!(!record.contains(CodeMetaField::License));
    }

    #[test]
    fn test_empty_homepage_falls_back_to_repository() {
        let mut repository = full_repository();
        repository.homepage = Some(String::new());
        let record = GitHubHarvest {
            repository,
            ..Default::default()
        }
        .into_codemeta(&reference());
        assert_eq!(
            record.get(CodeMetaField::Url).unwrap().as_str(),
            Some("https://github.com/acme/widget")
        );
    }

    #[test]
    fn test_contributors_deduplicated_and_sorted() {
        let commits: Vec<GitHubCommit> = serde_json::from_value(serde_json::json!([
            {"sha": "1", "commit": {"author": {"name": "Zed Shaw", "email": "ZED@example.org"}}},
            {"sha": "2", "commit": {"author": {"name": "Ada Lovelace", "email": "ada@example.org"}}},
            {"sha": "3", "commit": {"author": {"name": "Zed S.", "email": "zed@example.org"}}},
            {"sha": "4", "commit": {"author": {"name": "No Mail"}}},
            {"sha": "5", "commit": {}}
        ]))
        .unwrap();

        let people = contributors_from_commits(&commits);
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].given_name, "Ada");
        assert_eq!(people[1].given_name, "Zed");
        assert_eq!(people[1].email.as_deref(), Some("zed@example.org"));
        assert_eq!(people[1].family_name.as_deref(), Some("Shaw"));
    }

    #[test]
    fn test_author_names_keep_letters_only() {
        let commits: Vec<GitHubCommit> = serde_json::from_value(serde_json::json!([
            {"sha": "1", "commit": {"author": {"name": "José Núñez (2)", "email": "jose@example.org"}}},
            {"sha": "2", "commit": {"author": {"name": "ada99", "email": "ada@example.org"}}},
            {"sha": "3", "commit": {"author": {"name": "1234", "email": "num@example.org"}}}
        ]))
        .unwrap();

        let people = contributors_from_commits(&commits);
        let names: Vec<String> = people.iter().map(Person::display_name).collect();
        assert_eq!(names, ["1234", "ada", "José Núñez"]);
        assert_eq!(people[2].family_name.as_deref(), Some("Núñez"));
    }
}
