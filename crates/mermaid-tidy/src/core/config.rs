//! Style configuration
//!
//! One immutable [`StyleConfig`] value is built up front and handed to every
//! formatter call. Nothing reads style settings from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::TidyError;

/// Class applied to ordinary content nodes
pub const DEFAULT_CONTENT_CLASS: &str = "chapter";
/// Class applied to workflow nodes
pub const DEFAULT_WORKFLOW_CLASS: &str = "workflowNode";
/// Style bundle of the content class
pub const DEFAULT_CONTENT_PROPERTIES: &str =
    "fill:#fff,stroke:#F1D302,stroke-width:2px,color:#235789,font-size:16px,font-weight:bold";
/// Style bundle of the workflow class
pub const DEFAULT_WORKFLOW_PROPERTIES: &str =
    "fill:#fff,stroke:#C1292E,stroke-width:2px,color:#235789,font-size:16px,font-weight:bold";
/// Link style of solid edges
pub const DEFAULT_MAIN_LINK_PROPERTIES: &str = "stroke:#235789,stroke-width:3px";
/// Link style of dotted arrows
pub const DEFAULT_WORKFLOW_LINK_PROPERTIES: &str =
    "stroke:#F1D302,stroke-width:2.5px,stroke-dasharray:6,5";
/// Link style of labeled dotted edges
pub const DEFAULT_CROSSREF_LINK_PROPERTIES: &str =
    "stroke:#C1292E,stroke-width:2.5px,stroke-dasharray:2,5";

/// Canonical style settings
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs to name what it changes:
///
/// ```
/// use mermaid_tidy::core::StyleConfig;
///
/// let config = StyleConfig::from_json_str(r#"{ "indent_unit": "    " }"#).unwrap();
/// assert_eq!(config.indent_unit, "    ");
/// assert_eq!(config.content_class_name, "chapter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Replace class definitions, class assignments and link styles with the
    /// canonical ones
    pub enforce_standard_colors: bool,
    /// Indentation emitted once per nesting level
    pub indent_unit: String,
    pub content_class_name: String,
    pub workflow_class_name: String,
    pub content_class_properties: String,
    pub workflow_class_properties: String,
    pub main_link_properties: String,
    pub workflow_link_properties: String,
    pub crossref_link_properties: String,
    /// Emitted verbatim before the declaration when set
    pub canonical_init_block: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            enforce_standard_colors: true,
            indent_unit: "  ".to_string(),
            content_class_name: DEFAULT_CONTENT_CLASS.to_string(),
            workflow_class_name: DEFAULT_WORKFLOW_CLASS.to_string(),
            content_class_properties: DEFAULT_CONTENT_PROPERTIES.to_string(),
            workflow_class_properties: DEFAULT_WORKFLOW_PROPERTIES.to_string(),
            main_link_properties: DEFAULT_MAIN_LINK_PROPERTIES.to_string(),
            workflow_link_properties: DEFAULT_WORKFLOW_LINK_PROPERTIES.to_string(),
            crossref_link_properties: DEFAULT_CROSSREF_LINK_PROPERTIES.to_string(),
            canonical_init_block: None,
        }
    }
}

impl StyleConfig {
    /// Default configuration with enforcement switched off
    pub fn passthrough() -> Self {
        Self {
            enforce_standard_colors: false,
            ..Self::default()
        }
    }

    /// Builder-style toggle for color enforcement
    pub fn with_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_standard_colors = enforce;
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, TidyError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TidyError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TidyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TidyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            TidyError::Config { message } => {
                TidyError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    fn validate(&self) -> Result<(), TidyError> {
        if !self.indent_unit.chars().all(|c| c == ' ' || c == '\t') {
            return Err(TidyError::config(
                "indent_unit may only contain spaces and tabs",
            ));
        }
        for (field, name) in [
            ("content_class_name", &self.content_class_name),
            ("workflow_class_name", &self.workflow_class_name),
        ] {
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(TidyError::config(format!(
                    "{} must be a non-empty identifier, got '{}'",
                    field, name
                )));
            }
        }
        Ok(())
    }
}
