//! Repository references and provider detection.

use std::fmt;
use std::path::Path;

use git2::{ErrorCode, Repository};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};

/// A supported source hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    GitHub,
    GitLab,
}

impl ProviderKind {
    /// Classify a host name.
    ///
    /// `github.com` is GitHub. `gitlab.com`, hosts whose first label is
    /// `gitlab`, and hosts registered with
    /// [`HarvestConfig::with_gitlab_host`] are GitLab.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::UnsupportedProvider`] for any other host.
    pub fn detect(host: &str, config: &HarvestConfig) -> Result<Self> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let bare = host.strip_prefix("www.").unwrap_or(&host);

        if bare == "github.com" {
            return Ok(Self::GitHub);
        }

        let first_label = bare.split('.').next().unwrap_or_default();
        if bare == "gitlab.com"
            || (first_label == "gitlab" && bare.contains('.'))
            || config.gitlab_hosts().iter().any(|h| h == bare || *h == host)
        {
            return Ok(Self::GitLab);
        }

        Err(HarvestError::UnsupportedProvider { host })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("GitHub"),
            Self::GitLab => f.write_str("GitLab"),
        }
    }
}

/// A repository on a supported provider.
///
/// Built once per harvest call from a URL, an SSH remote, or a local
/// checkout whose `origin` remote points at GitHub or GitLab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReference {
    /// Hosting provider.
    pub provider: ProviderKind,
    /// Host name, lowercased (e.g. "github.com").
    pub host: String,
    /// Owner or namespace. GitLab namespaces may contain subgroups ("group/sub").
    pub namespace: String,
    /// Repository or project name, without a `.git` suffix.
    pub name: String,
    /// Canonical web URL of the repository.
    pub web_url: Url,
}

impl RepositoryReference {
    /// Parse a repository path.
    ///
    /// Accepts HTTP(S) URLs, `git@host:owner/repo` and `ssh://` remotes, and
    /// local directories inside a git checkout with a remote.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidReference`] if the input cannot be
    /// read as a repository location and [`HarvestError::UnsupportedProvider`]
    /// if the host is not GitHub or GitLab.
    pub fn parse(input: &str, config: &HarvestConfig) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(HarvestError::InvalidReference(input.to_string()));
        }

        if !looks_like_remote(trimmed) {
            let dir = Path::new(trimmed);
            if dir.is_dir() {
                let remote = checkout_remote(dir)?;
                tracing::debug!(path = %dir.display(), %remote, "resolved checkout remote");
                return Self::parse_remote(&remote, config);
            }
        }

        Self::parse_remote(trimmed, config)
    }

    /// Parse a remote URL (no filesystem access).
    pub fn parse_remote(remote: &str, config: &HarvestConfig) -> Result<Self> {
        let invalid = || HarvestError::InvalidReference(remote.to_string());

        let url = normalize_remote(remote).ok_or_else(invalid)?;
        let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
        let provider = ProviderKind::detect(&host, config)?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        let project_path: Vec<&str> = match provider {
            ProviderKind::GitHub => segments.into_iter().take(2).collect(),
            ProviderKind::GitLab => segments.into_iter().take_while(|s| *s != "-").collect(),
        };

        let (name, namespace) = match project_path.split_last() {
            Some((name, namespace)) if !namespace.is_empty() => {
                (strip_git_suffix(name), namespace.join("/"))
            }
            _ => return Err(invalid()),
        };
        if name.is_empty() {
            return Err(invalid());
        }

        let scheme = if url.scheme() == "http" { "http" } else { "https" };
        let authority = match (url.scheme(), url.port()) {
            ("http" | "https", Some(port)) => format!("{host}:{port}"),
            _ => host.clone(),
        };
        let web_url = Url::parse(&format!("{scheme}://{authority}/{namespace}/{name}"))?;

        Ok(Self {
            provider,
            host,
            namespace,
            name: name.to_string(),
            web_url,
        })
    }

    /// Scheme, host and non-default port of the instance serving this
    /// repository, e.g. `https://code.example.org:8443`.
    pub fn origin(&self) -> String {
        self.web_url.origin().ascii_serialization()
    }

    /// `namespace/name`, the project path used by both provider APIs.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.provider, self.web_url)
    }
}

fn looks_like_remote(input: &str) -> bool {
    input.contains("://")
        || input.starts_with("git@")
        || input.starts_with("https:")
        || input.starts_with("http:")
}

/// Turn the accepted remote spellings into a parseable URL.
fn normalize_remote(remote: &str) -> Option<Url> {
    let mut s = remote.trim().replace('\\', "/");

    if let Some(rest) = s.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        s = format!("ssh://git@{host}/{path}");
    }

    for scheme in ["https:", "http:"] {
        if let Some(rest) = s.strip_prefix(scheme) {
            if !rest.starts_with("//") {
                s = format!("{scheme}//{}", rest.trim_start_matches('/'));
            }
            break;
        }
    }

    let url = Url::parse(&s).ok()?;
    match url.scheme() {
        "http" | "https" | "ssh" | "git" => Some(url),
        _ => None,
    }
}

fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}

/// Read the `origin` remote (or the first remote) from a checkout.
///
/// `dir` may be a subdirectory, a worktree, or a submodule; git's own
/// discovery finds the repository.
fn checkout_remote(dir: &Path) -> Result<String> {
    let invalid = |reason: &str| {
        HarvestError::InvalidReference(format!("{} {reason}", dir.display()))
    };

    let repo = Repository::discover(dir).map_err(|err| {
        tracing::debug!(path = %dir.display(), error = %err, "no git repository found");
        invalid("is not a git checkout")
    })?;

    let remote = match repo.find_remote("origin") {
        Ok(remote) => remote,
        Err(err) if err.code() == ErrorCode::NotFound => {
            let names = repo.remotes().map_err(|_| invalid("has unreadable remotes"))?;
            let first = names
                .iter()
                .flatten()
                .next()
                .ok_or_else(|| invalid("has no remote configured"))?;
            repo.find_remote(first)
                .map_err(|_| invalid("has no remote configured"))?
        }
        Err(_) => return Err(invalid("has an unreadable origin remote")),
    };

    remote
        .url()
        .map(str::to_string)
        .ok_or_else(|| invalid("has a remote without a URL"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<RepositoryReference> {
        RepositoryReference::parse_remote(input, &HarvestConfig::default())
    }

    #[test]
    fn test_detect_github_and_gitlab() {
        let config = HarvestConfig::default();
        assert_eq!(ProviderKind::detect("github.com", &config).unwrap(), ProviderKind::GitHub);
        assert_eq!(ProviderKind::detect("WWW.GitHub.com", &config).unwrap(), ProviderKind::GitHub);
        assert_eq!(ProviderKind::detect("gitlab.com", &config).unwrap(), ProviderKind::GitLab);
        assert_eq!(
            ProviderKind::detect("gitlab.example.org", &config).unwrap(),
            ProviderKind::GitLab
        );
    }

    #[test]
    fn test_detect_rejects_other_hosts() {
        let config = HarvestConfig::default();
        for host in ["bitbucket.org", "codeberg.org", "notgithub.com", "github.com.evil.net"] {
            let err = ProviderKind::detect(host, &config).unwrap_err();
            assert!(
                matches!(err, HarvestError::UnsupportedProvider { .. }),
                "{host} should be unsupported"
            );
        }
    }

    #[test]
    fn test_detect_configured_gitlab_host() {
        let config = HarvestConfig::default().with_gitlab_host("code.example.org");
        assert_eq!(
            ProviderKind::detect("code.example.org", &config).unwrap(),
            ProviderKind::GitLab
        );
    }

    #[test]
    fn test_github_url_variants_resolve_identically() {
        let expected = parse("https://github.com/acme/widget").unwrap();
        assert_eq!(expected.namespace, "acme");
        assert_eq!(expected.name, "widget");
        assert_eq!(expected.web_url.as_str(), "https://github.com/acme/widget");

        for variant in [
            "https://github.com/acme/widget/",
            "https://github.com/acme/widget.git",
            "https://github.com/acme/widget/tree/main/src",
            "git@github.com:acme/widget.git",
            "ssh://git@github.com/acme/widget",
            "https:/github.com/acme/widget",
            "https:\\\\github.com\\acme\\widget",
        ] {
            assert_eq!(parse(variant).unwrap(), expected, "variant {variant}");
        }
    }

    #[test]
    fn test_gitlab_subgroups_keep_full_namespace() {
        let reference = parse("https://gitlab.com/group/sub/project/-/issues/4").unwrap();
        assert_eq!(reference.provider, ProviderKind::GitLab);
        assert_eq!(reference.namespace, "group/sub");
        assert_eq!(reference.name, "project");
        assert_eq!(reference.full_path(), "group/sub/project");
        assert_eq!(
            reference.web_url.as_str(),
            "https://gitlab.com/group/sub/project"
        );
    }

    #[test]
    fn test_missing_repository_segment_is_invalid() {
        assert!(matches!(
            parse("https://github.com/acme"),
            Err(HarvestError::InvalidReference(_))
        ));
        assert!(matches!(
            parse("not a url"),
            Err(HarvestError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_unsupported_host_in_url() {
        assert!(matches!(
            parse("https://bitbucket.org/acme/widget"),
            Err(HarvestError::UnsupportedProvider { host }) if host == "bitbucket.org"
        ));
    }

    fn checkout(remotes: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        for (name, url) in remotes {
            repo.remote(name, url).unwrap();
        }
        dir
    }

    fn parse_dir(dir: &Path) -> Result<RepositoryReference> {
        RepositoryReference::parse(dir.to_str().unwrap(), &HarvestConfig::default())
    }

    #[test]
    fn test_local_checkout_uses_origin_remote() {
        let dir = checkout(&[
            ("upstream", "https://github.com/upstream/widget.git"),
            ("origin", "git@gitlab.com:acme/widget.git"),
        ]);

        let reference = parse_dir(dir.path()).unwrap();
        assert_eq!(reference.provider, ProviderKind::GitLab);
        assert_eq!(reference.full_path(), "acme/widget");
    }

    #[test]
    fn test_local_checkout_falls_back_to_first_remote() {
        let dir = checkout(&[("fork", "https://github.com/acme/widget.git")]);

        let reference = parse_dir(dir.path()).unwrap();
        assert_eq!(reference.full_path(), "acme/widget");
    }

    #[test]
    fn test_checkout_without_remote_is_invalid() {
        let dir = checkout(&[]);
        let err = parse_dir(dir.path()).unwrap_err();
        assert!(matches!(err, HarvestError::InvalidReference(ref m) if m.contains("no remote")));
    }

    #[test]
    fn test_config_keys_are_case_insensitive() {
        let dir = checkout(&[]);
        let config = dir.path().join(".git").join("config");
        let mut contents = std::fs::read_to_string(&config).unwrap();
        contents.push_str("[remote \"origin\"]\n\tURL = https://github.com/acme/widget.git\n");
        std::fs::write(&config, contents).unwrap();

        assert_eq!(parse_dir(dir.path()).unwrap().full_path(), "acme/widget");
    }

    #[test]
    fn test_subdirectory_of_checkout() {
        let dir = checkout(&[("origin", "https://github.com/acme/widget")]);
        let nested = dir.path().join("src").join("bin");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(parse_dir(&nested).unwrap().full_path(), "acme/widget");
    }

    #[test]
    fn test_worktree_with_gitdir_file() {
        let main = checkout(&[("origin", "https://gitlab.com/group/sub/project.git")]);
        let worktree = tempfile::tempdir().unwrap();
        std::fs::write(
            worktree.path().join(".git"),
            format!("gitdir: {}\n", main.path().join(".git").display()),
        )
        .unwrap();

        let reference = parse_dir(worktree.path()).unwrap();
        assert_eq!(reference.namespace, "group/sub");
        assert_eq!(reference.name, "project");
    }

    #[test]
    fn test_directory_without_git_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            RepositoryReference::parse(dir.path().to_str().unwrap(), &HarvestConfig::default());
        assert!(matches!(result, Err(HarvestError::InvalidReference(_))));
    }
}
