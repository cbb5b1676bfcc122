//! GitLab REST API (v4) models and CodeMeta mapping.

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
use crate::spdx::SpdxLicenseList;
use crate::traits::{Fetch, List};

/// A GitLab project as returned by `GET /projects/:path?license=true`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path_with_namespace: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub readme_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Pre-14.0 name of `topics`.
    #[serde(default)]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub issues_enabled: bool,
    #[serde(default)]
    pub namespace: Option<GitLabNamespace>,
    #[serde(default)]
    pub license: Option<GitLabLicense>,
}

/// Group or user namespace that owns a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabNamespace {
    pub name: String,
    /// "group" or "user".
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

impl GitLabNamespace {
    fn to_agent(&self) -> Agent {
        if self.kind.as_deref() == Some("user") {
            Agent::Person(Person::from_full_name(&self.name, None))
        } else {
            Agent::Organization(Organization {
                name: self.name.clone(),
                url: self.web_url.clone(),
            })
        }
    }
}

/// License detected by GitLab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitLabLicense {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[async_trait]
impl Fetch for GitLabProject {
    type Id = String; // "namespace/project"

    #[tracing::instrument(skip(client))]
    async fn fetch(client: &ProviderClient, full_path: String) -> Result<Self> {
        let path = format!("projects/{}", urlencoding::encode(&full_path));
        client
            .get_json_with_query(&path, &[("license", "true")])
            .await
    }
}

/// Languages of a project, largest share first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitLabLanguages(pub Vec<String>);

#[async_trait]
impl Fetch for GitLabLanguages {
    type Id = u64; // project ID

    #[tracing::instrument(skip(client))]
    async fn fetch(client: &ProviderClient, project_id: u64) -> Result<Self> {
        let shares: BTreeMap<String, f64> = client
            .get_json(&format!("projects/{project_id}/languages"))
            .await?;

        let mut languages: Vec<(String, f64)> = shares.into_iter().collect();
        languages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(Self(languages.into_iter().map(|(name, _)| name).collect()))
    }
}

/// One entry of `GET /projects/:id/repository/contributors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabContributor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub commits: u64,
}

#[async_trait]
impl List for GitLabContributor {
    type Parent = u64; // project ID

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &ProviderClient,
        project_id: &u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        client
            .get_page(
                &format!("projects/{project_id}/repository/contributors"),
                page,
                per_page,
            )
            .await
    }
}

/// Distinct contributors, deduplicated by lowercased email.
pub fn contributors_to_people(contributors: &[GitLabContributor]) -> Vec<Person> {
    let mut seen = HashSet::new();
    let mut people = Vec::new();

    for contributor in contributors {
        let name = contributor.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            continue;
        }

        let email = contributor
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let dedup_key = email.clone().unwrap_or_else(|| name.to_lowercase());
        if seen.insert(dedup_key) {
            people.push(Person::from_full_name(name, email));
        }
    }

    sort_people(&mut people);
    people
}

/// Everything read from GitLab for one project.
#[derive(Debug, Clone, Default)]
pub struct GitLabHarvest {
    pub project: GitLabProject,
    pub languages: GitLabLanguages,
    pub contributors: Vec<Person>,
    /// SPDX identifier resolved from the project's license.
    pub license: Option<String>,
}

impl GitLabHarvest {
    /// Read the project and its secondary endpoints.
    ///
    /// The SPDX license list is downloaded only when GitLab reports a
    /// license for the project.
    ///
    /// # Errors
    ///
    /// `NotFound` if the project does not exist or is private; any failure
    /// of a secondary request fails the whole call.
    #[tracing::instrument(skip(client, config), fields(project = %reference.full_path()))]
    pub async fn collect(
        client: &ProviderClient,
        reference: &RepositoryReference,
        config: &HarvestConfig,
    ) -> Result<Self> {
        let project = GitLabProject::fetch(client, reference.full_path())
            .await
            .map_err(|e| e.or_not_found(reference))?;
        let languages = GitLabLanguages::fetch(client, project.id).await?;

        let contributors = if config.fetch_contributors() {
            let listed =
                GitLabContributor::list_all(client, &project.id, config.max_contributor_pages())
                    .await?;
            contributors_to_people(&listed)
        } else {
            Vec::new()
        };

        let license = match &project.license {
            Some(license) => {
                let spdx = SpdxLicenseList::fetch(config.spdx_list_url(), config.timeout()).await?;
                let resolved = spdx
                    .resolve(license.key.as_deref(), license.name.as_deref())
                    .or_else(|| spdx.resolve(None, license.nickname.as_deref()))
                    .map(str::to_string);
                if resolved.is_none() {
                    tracing::warn!(
                        key = ?license.key,
                        name = ?license.name,
                        "no SPDX license matches GitLab license"
                    );
                }
                resolved
            }
            None => None,
        };

        Ok(Self {
            project,
            languages,
            contributors,
            license,
        })
    }

    /// Map onto CodeMeta keys, omitting anything GitLab did not report.
    pub fn into_codemeta(self, reference: &RepositoryReference) -> CodeMetaRecord {
        let project = self.project;
        let mut record = CodeMetaRecord::new();

        let web_url = project
            .web_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .unwrap_or_else(|| reference.web_url.clone());
        let web_base = web_url.as_str().trim_end_matches('/').to_string();
        let repo_url = project
            .http_url_to_repo
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .unwrap_or_else(|| web_url.clone());

        record.insert_opt(CodeMetaField::Name, project.name.clone());
        record.insert(CodeMetaField::Identifier, project.id.to_string());
        record.insert_opt(CodeMetaField::Description, project.description);
        record.insert(CodeMetaField::CodeRepository, repo_url);
        record.insert(CodeMetaField::Url, web_url.clone());

        if project.issues_enabled {
            record.insert_opt(
                CodeMetaField::IssueTracker,
                Url::parse(&format!("{web_base}/-/issues")).ok(),
            );
        }

        record.insert_opt(CodeMetaField::License, self.license);
        record.insert_opt(CodeMetaField::DateCreated, project.created_at.map(|d| d.date_naive()));
        record.insert_opt(
            CodeMetaField::DateModified,
            project.last_activity_at.map(|d| d.date_naive()),
        );

        let keywords = if project.topics.is_empty() {
            project.tag_list
        } else {
            project.topics
        };
        record.insert(CodeMetaField::Keywords, keywords);
        record.insert(CodeMetaField::ProgrammingLanguage, self.languages.0);

        let archive_name = project.name.as_deref().unwrap_or(reference.name.as_str());
        if let Some(branch) = project.default_branch.as_deref().filter(|b| !b.is_empty()) {
            record.insert_opt(
                CodeMetaField::DownloadUrl,
                Url::parse(&format!(
                    "{web_base}/-/archive/{branch}/{archive_name}-{branch}.zip"
                ))
                .ok(),
            );
        }

        record.insert_opt(
            CodeMetaField::Readme,
            project.readme_url.as_deref().and_then(|u| Url::parse(u).ok()),
        );
        record.insert_opt(
            CodeMetaField::CopyrightHolder,
            project.namespace.as_ref().map(GitLabNamespace::to_agent),
        );
        record.insert(
            CodeMetaField::Contributor,
            self.contributors.into_iter().map(Agent::Person).collect::<Vec<_>>(),
        );

        record
    }
}
