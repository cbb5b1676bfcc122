//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::{CodeMetaRecord, RepositoryReference};

/// Trait for human-readable output.
///
/// Implemented by harvest results to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// One row of the field/value table.
#[derive(Tabled)]
struct FieldRow {
    field: &'static str,
    value: String,
}

impl PrettyPrint for CodeMetaRecord {
    fn pretty_print(&self) -> String {
        if self.is_empty() {
            return "No metadata harvested.".to_string();
        }

        let rows: Vec<FieldRow> = self
            .iter()
            .map(|(field, value)| FieldRow {
                field: field.as_str(),
                value: value.to_string(),
            })
            .collect();

        Table::new(rows).with(Style::sharp()).to_string()
    }
}

impl PrettyPrint for RepositoryReference {
    fn pretty_print(&self) -> String {
        let header = format!("Repository: {}", self.full_path());
        let divider = "─".repeat(header.len().max(30));

        [
            header,
            divider,
            format!("Provider:       {}", self.provider),
            format!("Host:           {}", self.host),
            format!("Namespace:      {}", self.namespace),
            format!("Name:           {}", self.name),
            format!("URL:            {}", self.web_url),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CodeMetaField, HarvestConfig};

    #[test]
    fn test_record_pretty_print_lists_fields() {
        let mut record = CodeMetaRecord::new();
        record.insert(CodeMetaField::Name, "widget");
        record.insert(
            CodeMetaField::Keywords,
            vec!["a".to_string(), "b".to_string()],
        );

        let output = record.pretty_print();
        assert!(output.contains("name"));
        assert!(output.contains("widget"));
        assert!(output.contains("a, b"));
    }

    #[test]
    fn test_empty_record_pretty_print() {
        assert_eq!(CodeMetaRecord::new().pretty_print(), "No metadata harvested.");
    }

    #[test]
    fn test_reference_pretty_print_format() {
        let reference = RepositoryReference::parse_remote(
            "https://github.com/acme/widget",
            &HarvestConfig::default(),
        )
        .unwrap();

        let output = reference.pretty_print();
        assert!(output.starts_with("Repository: acme/widget"));
        assert!(output.contains("Provider:       GitHub"));
    }
}
