#![deny(missing_docs)]

//! # Rule Set
//!
//! The caller-supplied configuration governing one merge run: source list,
//! output info, skip sets, rewrite maps, and output format.
//!
//! Rule sets arrive as JSON or YAML (the CLI and server both deserialize
//! them with serde) and are normalized exactly once per run by
//! [`RuleSet::compile`]: comparison sets and rewrite keys are lowered to a
//! canonical case so every case-insensitive comparison downstream is a plain
//! lookup, and structurally invalid rule sets are rejected before any source
//! is fetched.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Serialization format of the merged artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON (pretty-printed). The default.
    #[default]
    #[serde(rename = "JSON")]
    Json,
    /// YAML.
    #[serde(rename = "YAML")]
    Yaml,
}

impl OutputFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Info block stamped onto the merged output document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputInfo {
    /// Output document title. Required.
    #[serde(default)]
    pub title: String,
    /// Output document version. Required.
    #[serde(default)]
    pub version: String,
    /// Optional output description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The complete caller-supplied configuration for one merge run.
///
/// Immutable for the duration of a run. Source order is load-bearing: it
/// decides the winners of operation-id and schema-name collisions and the
/// order of the merged server list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// Ordered list of document locations. Must be non-empty.
    pub sources: Vec<String>,
    /// Info block for the output document.
    pub output_info: OutputInfo,
    /// Operation ids to remove, compared case-insensitively.
    pub skip_operation_ids: Vec<String>,
    /// Path keys to remove entirely, compared case-insensitively.
    pub skip_paths: Vec<String>,
    /// Content types stripped from every request body and response.
    pub remove_content_types: Vec<String>,
    /// When non-empty, replaces all discovered servers.
    pub server_overrides: Vec<String>,
    /// Tag rename map; keys compared case-insensitively.
    pub tag_rewrite: IndexMap<String, String>,
    /// Substring rewrites applied to path keys (and, without server
    /// overrides, to server URLs). All matching entries apply, in map order.
    pub path_segment_rewrite: IndexMap<String, String>,
    /// Parameter rename map; keys compared case-insensitively. Descriptions
    /// containing the old parameter name are updated to the new name.
    pub parameter_rewrite: IndexMap<String, String>,
    /// Serialization format of the output.
    pub output_format: OutputFormat,
}

impl RuleSet {
    /// Validates the rule set and normalizes every comparison set to
    /// lower-invariant case. Runs once per merge run, before any source is
    /// fetched.
    ///
    /// # Errors
    ///
    /// `AppError::Configuration` when `sources` is empty or the output
    /// title/version is blank.
    pub fn compile(&self) -> AppResult<CompiledRules> {
        if self.sources.is_empty() {
            return Err(AppError::Configuration(
                "rule set must name at least one source".into(),
            ));
        }
        if self.output_info.title.trim().is_empty() {
            return Err(AppError::Configuration(
                "outputInfo.title must be a non-empty string".into(),
            ));
        }
        if self.output_info.version.trim().is_empty() {
            return Err(AppError::Configuration(
                "outputInfo.version must be a non-empty string".into(),
            ));
        }

        Ok(CompiledRules {
            sources: self.sources.clone(),
            output_info: self.output_info.clone(),
            skip_operation_ids: lower_set(&self.skip_operation_ids),
            skip_paths: lower_set(&self.skip_paths),
            remove_content_types: lower_set(&self.remove_content_types),
            server_overrides: self.server_overrides.clone(),
            tag_rewrite: lower_map(&self.tag_rewrite),
            path_segment_rewrite: self
                .path_segment_rewrite
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            parameter_rewrite: lower_map(&self.parameter_rewrite),
            output_format: self.output_format,
        })
    }
}

fn lower_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn lower_map(map: &IndexMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

/// The normalized, validated form of a [`RuleSet`], produced once per run.
///
/// Comparison sets and rewrite keys are lowercased; `path_segment_rewrite`
/// keeps its caller-supplied order (and case) because its entries apply
/// sequentially as literal substring replacements.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    /// Ordered source locations.
    pub sources: Vec<String>,
    /// Output info block.
    pub output_info: OutputInfo,
    /// Lowercased operation-id skip set.
    pub skip_operation_ids: HashSet<String>,
    /// Lowercased path-key skip set.
    pub skip_paths: HashSet<String>,
    /// Lowercased content-type strip set.
    pub remove_content_types: HashSet<String>,
    /// Server override list, verbatim.
    pub server_overrides: Vec<String>,
    /// Tag rename map, keys lowercased.
    pub tag_rewrite: HashMap<String, String>,
    /// Ordered path-segment rewrites, verbatim.
    pub path_segment_rewrite: Vec<(String, String)>,
    /// Parameter rename map, keys lowercased.
    pub parameter_rewrite: HashMap<String, String>,
    /// Output serialization format.
    pub output_format: OutputFormat,
}

impl CompiledRules {
    /// Applies every matching path-segment rewrite to a string, in rule
    /// order. Used for path keys and (without overrides) server URLs.
    pub fn rewrite_segments(&self, value: &str) -> String {
        let mut out = value.to_string();
        for (old, new) in &self.path_segment_rewrite {
            if !old.is_empty() && out.contains(old.as_str()) {
                out = out.replace(old.as_str(), new);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal_rules() -> RuleSet {
        RuleSet {
            sources: vec!["https://example.com/a.json".into()],
            output_info: OutputInfo {
                title: "Unified".into(),
                version: "1.0".into(),
                description: None,
            },
            ..RuleSet::default()
        }
    }

    #[test]
    fn test_compile_rejects_empty_sources() {
        let rules = RuleSet {
            sources: vec![],
            ..minimal_rules()
        };
        let err = rules.compile().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_compile_rejects_blank_title_and_version() {
        let mut rules = minimal_rules();
        rules.output_info.title = "  ".into();
        assert!(rules.compile().is_err());

        let mut rules = minimal_rules();
        rules.output_info.version = String::new();
        assert!(rules.compile().is_err());
    }

    #[test]
    fn test_compile_lowercases_comparison_sets() {
        let mut rules = minimal_rules();
        rules.skip_operation_ids = vec!["GetItem".into()];
        rules.skip_paths = vec!["/Pets".into()];
        rules.tag_rewrite.insert("Store".into(), "Shop".into());
        rules
            .parameter_rewrite
            .insert("ClientId".into(), "client_id".into());

        let compiled = rules.compile().unwrap();
        assert!(compiled.skip_operation_ids.contains("getitem"));
        assert!(compiled.skip_paths.contains("/pets"));
        assert_eq!(compiled.tag_rewrite.get("store"), Some(&"Shop".to_string()));
        assert_eq!(
            compiled.parameter_rewrite.get("clientid"),
            Some(&"client_id".to_string())
        );
    }

    #[test]
    fn test_rewrite_segments_applies_all_matches_in_order() {
        let mut rules = minimal_rules();
        rules
            .path_segment_rewrite
            .insert("/internal".into(), "/api".into());
        rules.path_segment_rewrite.insert("/v1".into(), "/v2".into());
        let compiled = rules.compile().unwrap();

        assert_eq!(
            compiled.rewrite_segments("/internal/v1/pets"),
            "/api/v2/pets"
        );
        assert_eq!(compiled.rewrite_segments("/other"), "/other");
    }

    #[test]
    fn test_rule_set_deserializes_camel_case() {
        let json = r#"{
            "sources": ["https://example.com/a.json"],
            "outputInfo": {"title": "Unified", "version": "1.0"},
            "skipOperationIds": ["getItem"],
            "outputFormat": "YAML"
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.output_format, OutputFormat::Yaml);
        assert_eq!(rules.skip_operation_ids, vec!["getItem".to_string()]);
        assert!(rules.compile().is_ok());
    }
}
