//! SPDX license list lookup.
//!
//! GitLab reports licenses by its own key and display name. These are
//! resolved to SPDX identifiers against the published SPDX license list.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::{ProviderClient, USER_AGENT};
use crate::error::Result;

/// One entry of the SPDX license list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxLicense {
    pub license_id: String,
    pub name: String,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
}

/// The SPDX license list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpdxLicenseList {
    licenses: Vec<SpdxLicense>,
}

impl SpdxLicenseList {
    /// Build a list from entries.
    pub fn new(licenses: Vec<SpdxLicense>) -> Self {
        Self { licenses }
    }

    /// Download the list.
    ///
    /// # Errors
    ///
    /// Returns `ProviderRequest` if the list cannot be downloaded and
    /// `Parse` if it is not valid SPDX list JSON.
    #[tracing::instrument]
    pub async fn fetch(url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        let response = http.get(url).send().await?;
        let response = ProviderClient::check_response(response).await?;
        let body = response.text().await?;
        let list: Self = serde_json::from_str(&body)?;

        tracing::debug!(licenses = list.licenses.len(), "loaded SPDX license list");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    /// Resolve a provider license key and/or name to an SPDX identifier.
    ///
    /// Tried in order: current identifier equal to `key`, license name
    /// equal to `name`, license name equal to `name` + " only", deprecated
    /// identifier equal to `key`. All comparisons ignore ASCII case.
    pub fn resolve(&self, key: Option<&str>, name: Option<&str>) -> Option<&str> {
        let key = key.map(str::trim).filter(|k| !k.is_empty());
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let by_id = |deprecated: bool| {
            key.and_then(|k| {
                self.licenses.iter().find(|l| {
                    l.is_deprecated_license_id == deprecated && l.license_id.eq_ignore_ascii_case(k)
                })
            })
        };
        let by_name = |wanted: &str| {
            self.licenses
                .iter()
                .filter(|l| !l.is_deprecated_license_id)
                .find(|l| l.name.eq_ignore_ascii_case(wanted))
        };

        by_id(false)
            .or_else(|| name.and_then(by_name))
            .or_else(|| name.and_then(|n| by_name(&format!("{n} only"))))
            .or_else(|| by_id(true))
            .map(|l| l.license_id.as_str())
    }
}
