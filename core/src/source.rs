#![deny(missing_docs)]

//! # Source Loading
//!
//! The fetch collaborator boundary and the ordered fetch+parse loop.
//!
//! Sources load strictly in caller order; the first fetch or parse failure
//! aborts the whole run naming the offending source. No retries here; any
//! retry policy belongs to the surrounding service layer.

use crate::document::Document;
use crate::error::{AppError, AppResult};
use crate::parse::parse_document_bytes;
use crate::validation::Diagnostic;
use std::collections::HashMap;

/// Fetches raw document bytes from a location.
///
/// Implementations decide the transport (HTTP, filesystem, in-memory) and
/// report failures as `AppError::SourceUnavailable`.
pub trait DocumentFetcher {
    /// Fetches the bytes behind a location.
    fn fetch(&self, location: &str) -> AppResult<Vec<u8>>;
}

/// One fetched and parsed source, ready for merging.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// The location as supplied by the caller.
    pub location: String,
    /// Last path segment of the location; the server-synthesis fallback.
    pub file_name: String,
    /// The parsed document.
    pub document: Document,
    /// Parse-time diagnostics. Never blocks merging.
    pub diagnostics: Vec<Diagnostic>,
}

/// Returns the last path segment of a location, used as the fallback server
/// URL for sources that declare no servers.
pub fn file_name_of(location: &str) -> String {
    let trimmed = location.trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => location.to_string(),
    }
}

/// Fetches and parses one source.
pub fn load_source(fetcher: &dyn DocumentFetcher, location: &str) -> AppResult<SourceDocument> {
    let bytes = fetcher.fetch(location).map_err(|e| match e {
        err @ (AppError::SourceUnavailable { .. } | AppError::SourceParse { .. }) => err,
        other => AppError::SourceUnavailable {
            source: location.to_string(),
            reason: other.to_string(),
        },
    })?;

    let (document, diagnostics) = parse_document_bytes(location, &bytes)?;

    Ok(SourceDocument {
        location: location.to_string(),
        file_name: file_name_of(location),
        document,
        diagnostics,
    })
}

/// Fetches and parses every source, strictly in the given order.
///
/// The order of the returned list matches `sources`; it is load-bearing for
/// the merge engine's first-wins collision rules.
pub fn load_sources(
    fetcher: &dyn DocumentFetcher,
    sources: &[String],
) -> AppResult<Vec<SourceDocument>> {
    sources
        .iter()
        .map(|location| load_source(fetcher, location))
        .collect()
}

/// Map-backed fetcher serving pre-supplied documents. No network access is
/// performed; used by tests and callers that fetch out of band.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    docs: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    /// Creates an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document under a location.
    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.docs.insert(location.into(), bytes.into());
    }
}

impl DocumentFetcher for StaticFetcher {
    fn fetch(&self, location: &str) -> AppResult<Vec<u8>> {
        self.docs
            .get(location)
            .cloned()
            .ok_or_else(|| AppError::SourceUnavailable {
                source: location.to_string(),
                reason: "no document registered for this location".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
openapi: 3.0.3
info: {title: Minimal, version: "1.0"}
paths: {}
"#;

    #[test]
    fn test_file_name_of() {
        assert_eq!(
            file_name_of("https://example.com/specs/pets.json"),
            "pets.json"
        );
        assert_eq!(file_name_of("pets.yaml"), "pets.yaml");
        assert_eq!(file_name_of("https://example.com/specs/"), "specs");
    }

    #[test]
    fn test_load_sources_in_order() {
        let mut fetcher = StaticFetcher::new();
        fetcher.insert("a.yaml", MINIMAL);
        fetcher.insert("b.yaml", MINIMAL);

        let sources = vec!["b.yaml".to_string(), "a.yaml".to_string()];
        let loaded = load_sources(&fetcher, &sources).unwrap();
        assert_eq!(loaded[0].location, "b.yaml");
        assert_eq!(loaded[1].location, "a.yaml");
        assert_eq!(loaded[0].file_name, "b.yaml");
    }

    #[test]
    fn test_missing_source_aborts_with_source_unavailable() {
        let fetcher = StaticFetcher::new();
        let err = load_sources(&fetcher, &["gone.yaml".to_string()]).unwrap_err();
        match err {
            AppError::SourceUnavailable { source, .. } => assert_eq!(source, "gone.yaml"),
            other => panic!("expected SourceUnavailable, got {}", other),
        }
    }

    #[test]
    fn test_unparseable_source_aborts_with_source_parse() {
        let mut fetcher = StaticFetcher::new();
        fetcher.insert("bad.yaml", "a: [unclosed");
        let err = load_source(&fetcher, "bad.yaml").unwrap_err();
        assert!(matches!(err, AppError::SourceParse { .. }));
    }
}
