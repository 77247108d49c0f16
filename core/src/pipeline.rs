#![deny(missing_docs)]

//! # Merge Pipeline
//!
//! Orchestrates one request end to end: compile rules, fetch and parse each
//! source in order, fold them into one document, publish it. Each call owns
//! its whole state; nothing is shared across concurrent runs.

use crate::error::AppResult;
use crate::merge::{merge_documents, SuppressedCollision};
use crate::publish::{publish, ArtifactStore};
use crate::report::{methods_report, validation_report, SourceReport};
use crate::rules::{OutputFormat, RuleSet};
use crate::source::{load_sources, DocumentFetcher};

/// Everything a caller gets back from one merge run.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineResponse {
    /// Freshly generated artifact name.
    pub artifact_name: String,
    /// The serialized merged document.
    pub text: String,
    /// Serialization format of `text`.
    pub format: OutputFormat,
    /// Storage locator; absent when storage failed.
    pub locator: Option<String>,
    /// Human-viewable link; absent without a viewer base or on storage
    /// failure.
    pub viewer_link: Option<String>,
    /// Rendered publish error when storage failed (degraded, not fatal).
    pub storage_error: Option<String>,
    /// Schema-name collisions dropped under the first-wins rule.
    pub suppressed_schemas: Vec<SuppressedCollision>,
    /// Path-key collisions dropped under the first-wins rule.
    pub suppressed_paths: Vec<SuppressedCollision>,
}

/// Runs one complete merge: validate rules (before any fetch), load sources
/// in caller order, merge, publish.
///
/// # Errors
///
/// `Configuration` for malformed rule sets, `SourceUnavailable`/`SourceParse`
/// when any source fails (no partial output is ever published). Store
/// failures do not error; see [`CombineResponse::storage_error`].
pub fn run_combine(
    fetcher: &dyn DocumentFetcher,
    store: &dyn ArtifactStore,
    rules: &RuleSet,
    viewer_base: Option<&str>,
) -> AppResult<CombineResponse> {
    let compiled = rules.compile()?;
    let sources = load_sources(fetcher, &compiled.sources)?;
    let outcome = merge_documents(&sources, &compiled);
    let published = publish(
        &outcome.document,
        compiled.output_format,
        store,
        viewer_base,
    )?;

    Ok(CombineResponse {
        artifact_name: published.artifact_name,
        text: published.text,
        format: compiled.output_format,
        locator: published.locator,
        viewer_link: published.viewer_link,
        storage_error: published.storage_error,
        suppressed_schemas: outcome.suppressed_schemas,
        suppressed_paths: outcome.suppressed_paths,
    })
}

/// Fetches the given sources and builds the methods report.
pub fn run_methods_report(
    fetcher: &dyn DocumentFetcher,
    sources: &[String],
) -> AppResult<Vec<SourceReport>> {
    let loaded = load_sources(fetcher, sources)?;
    Ok(methods_report(&loaded))
}

/// Fetches the given sources and builds the validation report.
pub fn run_validation_report(
    fetcher: &dyn DocumentFetcher,
    sources: &[String],
) -> AppResult<Vec<SourceReport>> {
    let loaded = load_sources(fetcher, sources)?;
    Ok(validation_report(&loaded))
}
