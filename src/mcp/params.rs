//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `harvest` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HarvestParams {
    /// Repository URL (https or SSH) or local checkout path.
    pub path: String,
    /// Whether to list contributors (defaults to the server configuration).
    #[serde(default)]
    pub contributors: Option<bool>,
}

/// Parameters for the `detect` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DetectParams {
    /// Repository URL (https or SSH) or local checkout path.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_params_schema_generates() {
        let schema = schemars::schema_for!(HarvestParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("path"));
        assert!(json.contains("contributors"));
    }

    #[test]
    fn detect_params_schema_generates() {
        let schema = schemars::schema_for!(DetectParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("path"));
    }

    #[test]
    fn harvest_params_deserializes_with_defaults() {
        let json = r#"{"path": "https://github.com/acme/widget"}"#;
        let params: HarvestParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.path, "https://github.com/acme/widget");
        assert!(params.contributors.is_none());
    }

    #[test]
    fn harvest_params_requires_path() {
        let result: Result<HarvestParams, _> = serde_json::from_str(r#"{"contributors": true}"#);
        assert!(result.is_err());
    }
}
