//! CodeMeta vocabulary and the extracted metadata record.
//!
//! A [`CodeMetaRecord`] only ever holds the sixteen keys enumerated by
//! [`CodeMetaField`]. Empty values are dropped on insert, so an absent
//! provider field never shows up as an empty string or empty list.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// JSON-LD context used by [`CodeMetaRecord::to_document`].
pub const CODEMETA_CONTEXT: &str = "https://w3id.org/codemeta/3.0";

/// The CodeMeta keys a harvest can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeMetaField {
    CodeRepository,
    Contributor,
    CopyrightHolder,
    DateCreated,
    DateModified,
    DatePublished,
    Description,
    DownloadUrl,
    Identifier,
    IssueTracker,
    Keywords,
    License,
    Name,
    ProgrammingLanguage,
    Readme,
    Url,
}

impl CodeMetaField {
    /// Every field, in key order.
    pub const ALL: [CodeMetaField; 16] = [
        Self::CodeRepository,
        Self::Contributor,
        Self::CopyrightHolder,
        Self::DateCreated,
        Self::DateModified,
        Self::DatePublished,
        Self::Description,
        Self::DownloadUrl,
        Self::Identifier,
        Self::IssueTracker,
        Self::Keywords,
        Self::License,
        Self::Name,
        Self::ProgrammingLanguage,
        Self::Readme,
        Self::Url,
    ];

    /// The CodeMeta key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeRepository => "codeRepository",
            Self::Contributor => "contributor",
            Self::CopyrightHolder => "copyrightHolder",
            Self::DateCreated => "dateCreated",
            Self::DateModified => "dateModified",
            Self::DatePublished => "datePublished",
            Self::Description => "description",
            Self::DownloadUrl => "downloadUrl",
            Self::Identifier => "identifier",
            Self::IssueTracker => "issueTracker",
            Self::Keywords => "keywords",
            Self::License => "license",
            Self::Name => "name",
            Self::ProgrammingLanguage => "programmingLanguage",
            Self::Readme => "readme",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for CodeMetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeMetaField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown CodeMeta field '{s}'"))
    }
}

/// A schema.org Person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Person {
    /// Split a display name into given and family name.
    ///
    /// The last word is the family name; everything before it is the given
    /// name. A single word becomes the given name.
    pub fn from_full_name(full_name: &str, email: Option<String>) -> Self {
        let words: Vec<&str> = full_name.split_whitespace().collect();
        let (given_name, family_name) = match words.split_last() {
            Some((last, rest)) if !rest.is_empty() => (rest.join(" "), Some(last.to_string())),
            _ => (words.join(" "), None),
        };

        Self {
            given_name,
            family_name,
            email: email.filter(|e| !e.is_empty()),
        }
    }

    /// Given and family name joined by a space.
    pub fn display_name(&self) -> String {
        match &self.family_name {
            Some(family) => format!("{} {}", self.given_name, family),
            None => self.given_name.clone(),
        }
    }
}

/// A schema.org Organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A person or organization, tagged with its JSON-LD `@type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Agent {
    Person(Person),
    Organization(Organization),
}

impl Agent {
    pub fn display_name(&self) -> String {
        match self {
            Self::Person(p) => p.display_name(),
            Self::Organization(o) => o.name.clone(),
        }
    }
}

/// A value stored under a CodeMeta key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CodeMetaValue {
    Text(String),
    Url(Url),
    Date(NaiveDate),
    List(Vec<String>),
    Agent(Agent),
    Agents(Vec<Agent>),
}

impl CodeMetaValue {
    /// Whether the value carries no information.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|i| i.trim().is_empty()),
            Self::Agents(agents) => agents.is_empty(),
            Self::Url(_) | Self::Date(_) | Self::Agent(_) => false,
        }
    }

    /// String view of text and URL values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Url(u) => Some(u.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_agents(&self) -> Option<&[Agent]> {
        match self {
            Self::Agents(agents) => Some(agents),
            Self::Agent(agent) => Some(std::slice::from_ref(agent)),
            _ => None,
        }
    }
}

impl fmt::Display for CodeMetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Url(u) => f.write_str(u.as_str()),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Agent(agent) => f.write_str(&agent.display_name()),
            Self::Agents(agents) => {
                let names: Vec<String> = agents.iter().map(Agent::display_name).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

impl From<String> for CodeMetaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for CodeMetaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Url> for CodeMetaValue {
    fn from(u: Url) -> Self {
        Self::Url(u)
    }
}

impl From<NaiveDate> for CodeMetaValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<Vec<String>> for CodeMetaValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Agent> for CodeMetaValue {
    fn from(agent: Agent) -> Self {
        Self::Agent(agent)
    }
}

impl From<Vec<Agent>> for CodeMetaValue {
    fn from(agents: Vec<Agent>) -> Self {
        Self::Agents(agents)
    }
}

/// Metadata extracted from one repository, keyed by CodeMeta field.
///
/// Serializes as a flat JSON object of CodeMeta keys. Use
/// [`to_document`](Self::to_document) for a standalone JSON-LD document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CodeMetaRecord {
    fields: BTreeMap<CodeMetaField, CodeMetaValue>,
}

impl CodeMetaRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, skipping it if it is empty.
    ///
    /// Blank entries are dropped from lists. Returns `true` if the value
    /// was stored.
    pub fn insert(&mut self, field: CodeMetaField, value: impl Into<CodeMetaValue>) -> bool {
        let value = match value.into() {
            CodeMetaValue::List(items) => CodeMetaValue::List(
                items.into_iter().filter(|i| !i.trim().is_empty()).collect(),
            ),
            other => other,
        };
        if value.is_empty() {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    /// Store a value if present and non-empty.
    pub fn insert_opt<V: Into<CodeMetaValue>>(&mut self, field: CodeMetaField, value: Option<V>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    pub fn get(&self, field: CodeMetaField) -> Option<&CodeMetaValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: CodeMetaField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn remove(&mut self, field: CodeMetaField) -> Option<CodeMetaValue> {
        self.fields.remove(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The populated fields, in key order.
    pub fn fields(&self) -> impl Iterator<Item = CodeMetaField> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CodeMetaField, &CodeMetaValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Render as a CodeMeta JSON-LD document.
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = serde_json::Map::new();
        doc.insert("@context".to_string(), CODEMETA_CONTEXT.into());
        doc.insert("@type".to_string(), "SoftwareSourceCode".into());
        if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(self) {
            doc.extend(fields);
        }
        serde_json::Value::Object(doc)
    }
}

impl<'a> IntoIterator for &'a CodeMetaRecord {
    type Item = (&'a CodeMetaField, &'a CodeMetaValue);
    type IntoIter = std::collections::btree_map::Iter<'a, CodeMetaField, CodeMetaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Sort people by given name, case-insensitively.
pub(crate) fn sort_people(people: &mut [Person]) {
    people.sort_by_key(|p| p.given_name.to_lowercase());
}
