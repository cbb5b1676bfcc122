//! Error types for harvest operations.

use thiserror::Error;

use crate::reference::{ProviderKind, RepositoryReference};

/// Errors that can occur while harvesting repository metadata.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The input is not a repository URL or a local checkout with a remote.
    #[error("Invalid repository reference '{0}': expected a URL like 'https://github.com/owner/repo'")]
    InvalidReference(String),

    /// The repository host is neither GitHub nor GitLab.
    #[error("Unsupported repository host '{host}': only GitHub and GitLab are supported")]
    UnsupportedProvider { host: String },

    /// The repository does not exist or is not visible with the given credentials.
    #[error("{provider} repository '{repository}' not found or inaccessible")]
    NotFound {
        provider: ProviderKind,
        repository: String,
    },

    /// Network failure, timeout, or non-success response from the provider.
    #[error("provider request failed: {message}")]
    ProviderRequest {
        message: String,
        status_code: Option<u16>,
    },

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The blocking entry point could not start its runtime.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl HarvestError {
    /// Build a `ProviderRequest` error for a response with the given status.
    pub(crate) fn status(status: u16, message: impl Into<String>) -> Self {
        Self::ProviderRequest {
            message: message.into(),
            status_code: Some(status),
        }
    }

    /// Turn a 404 from a project endpoint into [`HarvestError::NotFound`].
    pub(crate) fn or_not_found(self, reference: &RepositoryReference) -> Self {
        match self {
            Self::ProviderRequest {
                status_code: Some(404),
                ..
            } => Self::NotFound {
                provider: reference.provider,
                repository: reference.full_path(),
            },
            other => other,
        }
    }

    /// HTTP status code reported by the provider, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ProviderRequest { status_code, .. } => *status_code,
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HarvestError {
    fn from(err: reqwest::Error) -> Self {
        Self::ProviderRequest {
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()),
        }
    }
}

/// Result type alias for harvest operations.
pub type Result<T> = core::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_reports_404() {
        let err = HarvestError::NotFound {
            provider: ProviderKind::GitHub,
            repository: "acme/missing".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "GitHub repository 'acme/missing' not found or inaccessible"
        );
    }

    #[test]
    fn test_unsupported_provider_message_names_host() {
        let err = HarvestError::UnsupportedProvider {
            host: "bitbucket.org".to_string(),
        };
        assert!(err.to_string().contains("bitbucket.org"));
        assert_eq!(err.status_code(), None);
    }
}
