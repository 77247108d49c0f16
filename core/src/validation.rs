#![deny(missing_docs)]

//! # Validation Adapter
//!
//! Read-only structural checks over a parsed document, reported as
//! inspectable diagnostics. Validation feeds the reporting operations only:
//! the merge engine proceeds regardless of validity, so callers can merge
//! now and review problems separately.

use crate::document::Document;
use crate::source::SourceDocument;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One structural finding about a document. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// Location context, e.g. `paths./pets.get`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without location context.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Creates a diagnostic anchored at a location.
    pub fn at(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}: {}", context, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Per-document pass/fail summary built from parse diagnostics plus the
/// structural validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Document title (may be empty for documents missing an info block).
    pub title: String,
    /// The source location the document was fetched from.
    pub source: String,
    /// True when no diagnostics were raised.
    pub is_valid: bool,
    /// Every finding, parse-time and structural.
    pub diagnostics: Vec<Diagnostic>,
}

/// Validates structural requirements of a single parsed document.
///
/// Checks: non-empty info title/version, `/`-rooted path keys, response keys
/// shaped as status codes / ranges / `default`, operation ids present and
/// unique within the document, and non-empty parameter names.
pub fn validate_document(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if document.info.title.trim().is_empty() {
        diagnostics.push(Diagnostic::at("info.title", "must be a non-empty string"));
    }
    if document.info.version.trim().is_empty() {
        diagnostics.push(Diagnostic::at("info.version", "must be a non-empty string"));
    }

    let status_re = Regex::new(r"^[1-5][0-9]{2}$").expect("Invalid regex constant");
    let range_re = Regex::new(r"^[1-5][xX]{2}$").expect("Invalid regex constant");

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for (path, item) in &document.paths {
        if !path.starts_with('/') {
            diagnostics.push(Diagnostic::at(
                format!("paths.{}", path),
                "path key must start with '/'",
            ));
        }

        for (method, op) in item.operations() {
            let context = format!("paths.{}.{}", path, method.as_str().to_lowercase());

            if op.operation_id.is_empty() {
                diagnostics.push(Diagnostic::at(&context, "operation has no operationId"));
            } else if !seen_ids.insert(op.operation_id.as_str()) {
                diagnostics.push(Diagnostic::at(
                    &context,
                    format!("duplicate operationId '{}'", op.operation_id),
                ));
            }

            for key in op.responses.keys() {
                if key == "default" || status_re.is_match(key) || range_re.is_match(key) {
                    continue;
                }
                diagnostics.push(Diagnostic::at(
                    format!("{}.responses", context),
                    format!("response key '{}' is not an HTTP status code or range", key),
                ));
            }

            for param in &op.parameters {
                if param.name.trim().is_empty() {
                    diagnostics.push(Diagnostic::at(
                        format!("{}.parameters", context),
                        "parameter name must be a non-empty string",
                    ));
                }
            }
        }
    }

    diagnostics
}

/// Builds the pass/fail summary for one fetched source: parse diagnostics
/// first, structural findings after.
pub fn report_for_source(source: &SourceDocument) -> ValidationReport {
    let mut diagnostics = source.diagnostics.clone();
    diagnostics.extend(validate_document(&source.document));
    ValidationReport {
        title: source.document.info.title.clone(),
        source: source.location.clone(),
        is_valid: diagnostics.is_empty(),
        diagnostics,
    }
}
