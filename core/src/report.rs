#![deny(missing_docs)]

//! # Source Reporting
//!
//! The two read-only reporting operations built on the validation adapter:
//! a per-source operations listing with reconstructed call URLs, and a
//! per-source validation summary. Neither touches the merge path.

use crate::source::SourceDocument;
use crate::validation::{report_for_source, Diagnostic};
use serde::{Deserialize, Serialize};
use url::Url;

/// One operation row in the methods report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    /// Path key within the source document.
    pub path: String,
    /// Uppercase HTTP verb.
    pub method: String,
    /// Operation id as declared (may be empty).
    pub operation_id: String,
    /// Source-URL prefix joined with the path key: the URL a caller would
    /// actually hit for this operation.
    pub reconstructed_url: String,
}

/// Per-source report: validation summary plus, for the methods report, the
/// operations listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    /// Document title.
    pub title: String,
    /// Source location.
    pub source: String,
    /// True when no diagnostics were raised.
    pub is_valid: bool,
    /// Parse-time and structural findings.
    pub diagnostics: Vec<Diagnostic>,
    /// Operations listing; absent in the validation-only report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<OperationSummary>>,
}

/// Builds the methods report: validation summary plus one row per operation.
pub fn methods_report(sources: &[SourceDocument]) -> Vec<SourceReport> {
    sources
        .iter()
        .map(|source| {
            let prefix = source_url_prefix(&source.location);
            let operations = source
                .document
                .operations()
                .map(|(path, method, op)| OperationSummary {
                    path: path.to_string(),
                    method: method.as_str().to_string(),
                    operation_id: op.operation_id.clone(),
                    reconstructed_url: format!("{}{}", prefix, path),
                })
                .collect();
            let mut report = base_report(source);
            report.operations = Some(operations);
            report
        })
        .collect()
}

/// Builds the validation report: the per-source summary without operations.
pub fn validation_report(sources: &[SourceDocument]) -> Vec<SourceReport> {
    sources.iter().map(base_report).collect()
}

fn base_report(source: &SourceDocument) -> SourceReport {
    let summary = report_for_source(source);
    SourceReport {
        title: summary.title,
        source: summary.source,
        is_valid: summary.is_valid,
        diagnostics: summary.diagnostics,
        operations: None,
    }
}

/// Returns the part of a source URL that precedes its own document path.
///
/// Swagger-style sources conventionally live under a `/swagger` segment
/// (`https://host/service/swagger/v1/swagger.json`); everything before that
/// segment is the service root. For other URLs the scheme and authority are
/// used; for non-URL locations, everything before the last path segment.
pub fn source_url_prefix(location: &str) -> String {
    if let Some(idx) = location.find("/swagger") {
        return location[..idx].to_string();
    }

    if let Ok(url) = Url::parse(location) {
        if let Some(host) = url.host_str() {
            let mut prefix = format!("{}://{}", url.scheme(), host);
            if let Some(port) = url.port() {
                prefix.push_str(&format!(":{}", port));
            }
            return prefix;
        }
    }

    match location.rfind('/') {
        Some(idx) => location[..idx].to_string(),
        None => String::new(),
    }
}
