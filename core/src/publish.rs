#![deny(missing_docs)]

//! # Publisher
//!
//! Serializes the merged document and hands it to the storage collaborator.
//!
//! Storage failure is degraded, not fatal: the serialized text is always
//! returned to the caller, and the store failure travels alongside it as
//! `storage_error`. Every publication gets a freshly generated unique name,
//! so concurrent publishes never collide on the store.

use crate::document::Document;
use crate::error::{AppError, AppResult};
use crate::rules::OutputFormat;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Unreserved characters stay literal in the viewer query string.
const VIEWER_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// What the storage collaborator hands back for a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Durable locator for the artifact (canonical URI or path).
    pub locator: String,
    /// Optional pre-authorized retrieval target for viewers.
    pub viewer_target: Option<String>,
}

/// Durable storage for published artifacts.
pub trait ArtifactStore {
    /// Writes the artifact text under a unique name.
    fn store(&self, name: &str, text: &str) -> AppResult<StoredArtifact>;

    /// Reads an artifact back, `None` when the name is unknown.
    fn retrieve(&self, name: &str) -> AppResult<Option<Vec<u8>>>;
}

/// The result of publishing one merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Freshly generated artifact name.
    pub artifact_name: String,
    /// The serialized document. Always present, even when storage failed.
    pub text: String,
    /// Storage locator; absent when storage failed.
    pub locator: Option<String>,
    /// Human-viewable link embedding the retrieval target; absent without a
    /// viewer base or on storage failure.
    pub viewer_link: Option<String>,
    /// Rendered `PublishError` when the store write failed.
    pub storage_error: Option<String>,
}

/// Serializes a document to the requested format.
pub fn serialize_document(document: &Document, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(document)
            .map_err(|e| AppError::General(format!("JSON serialization failed: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(document)
            .map_err(|e| AppError::General(format!("YAML serialization failed: {}", e))),
    }
}

/// Generates a fresh unique artifact name for the format.
pub fn unique_artifact_name(format: OutputFormat) -> String {
    format!("{}-openapi.{}", Uuid::new_v4(), format.extension())
}

/// Builds the human-viewable link for a retrieval target.
pub fn viewer_link(viewer_base: &str, target: &str) -> String {
    format!(
        "{}/?uri={}",
        viewer_base.trim_end_matches('/'),
        utf8_percent_encode(target, VIEWER_QUERY)
    )
}

/// Serializes and stores a merged document.
///
/// Serialization failure is fatal; store failure is not: the outcome then
/// carries the text with `storage_error` set and no locator.
pub fn publish(
    document: &Document,
    format: OutputFormat,
    store: &dyn ArtifactStore,
    viewer_base: Option<&str>,
) -> AppResult<PublishOutcome> {
    let text = serialize_document(document, format)?;
    let artifact_name = unique_artifact_name(format);

    match store.store(&artifact_name, &text) {
        Ok(stored) => {
            let link = match (viewer_base, stored.viewer_target.as_deref()) {
                (Some(base), Some(target)) => Some(viewer_link(base, target)),
                (Some(base), None) => Some(viewer_link(base, &stored.locator)),
                (None, _) => None,
            };
            Ok(PublishOutcome {
                artifact_name,
                text,
                locator: Some(stored.locator),
                viewer_link: link,
                storage_error: None,
            })
        }
        Err(e) => Ok(PublishOutcome {
            artifact_name,
            text,
            locator: None,
            viewer_link: None,
            storage_error: Some(AppError::Publish(e.to_string()).to_string()),
        }),
    }
}

/// In-memory store. Used by tests and callers that publish out of band.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.lock().expect("store lock poisoned").len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn store(&self, name: &str, text: &str) -> AppResult<StoredArtifact> {
        self.artifacts
            .lock()
            .expect("store lock poisoned")
            .insert(name.to_string(), text.to_string());
        let locator = format!("memory://{}", name);
        Ok(StoredArtifact {
            viewer_target: Some(locator.clone()),
            locator,
        })
    }

    fn retrieve(&self, name: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self
            .artifacts
            .lock()
            .expect("store lock poisoned")
            .get(name)
            .map(|text| text.as_bytes().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A store that always fails, for degraded-publish tests.
    struct BrokenStore;

    impl ArtifactStore for BrokenStore {
        fn store(&self, _name: &str, _text: &str) -> AppResult<StoredArtifact> {
            Err(AppError::General("disk full".into()))
        }

        fn retrieve(&self, _name: &str) -> AppResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    fn sample_document() -> Document {
        let json = serde_json::json!({
            "openapi": "3.0.3",
            "info": {"title": "Unified", "version": "1.0"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_json_and_yaml_serializations_are_structurally_equivalent() {
        let doc = sample_document();
        let json_text = serialize_document(&doc, OutputFormat::Json).unwrap();
        let yaml_text = serialize_document(&doc, OutputFormat::Yaml).unwrap();

        let from_json: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        let from_yaml: serde_json::Value = serde_yaml::from_str(&yaml_text).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_unique_artifact_names_do_not_collide() {
        let a = unique_artifact_name(OutputFormat::Json);
        let b = unique_artifact_name(OutputFormat::Json);
        assert_ne!(a, b);
        assert!(a.ends_with("-openapi.json"));
        assert!(unique_artifact_name(OutputFormat::Yaml).ends_with("-openapi.yaml"));
    }

    #[test]
    fn test_publish_stores_and_links() {
        let store = MemoryStore::new();
        let outcome = publish(
            &sample_document(),
            OutputFormat::Json,
            &store,
            Some("https://editor.example.com/viewer"),
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        let locator = outcome.locator.unwrap();
        assert!(locator.starts_with("memory://"));
        let link = outcome.viewer_link.unwrap();
        assert!(link.starts_with("https://editor.example.com/viewer/?uri=memory%3A%2F%2F"));
        assert!(outcome.storage_error.is_none());

        let stored = store.retrieve(&outcome.artifact_name).unwrap().unwrap();
        assert_eq!(stored, outcome.text.as_bytes());
    }

    #[test]
    fn test_publish_failure_is_degraded_not_fatal() {
        let outcome = publish(&sample_document(), OutputFormat::Json, &BrokenStore, None).unwrap();

        assert!(outcome.text.contains("listPets"));
        assert_eq!(outcome.locator, None);
        assert_eq!(outcome.viewer_link, None);
        let error = outcome.storage_error.unwrap();
        assert!(error.contains("Publish Error"));
        assert!(error.contains("disk full"));
    }

    #[test]
    fn test_viewer_link_percent_encodes_target() {
        let link = viewer_link(
            "https://editor.example.com/viewer/",
            "https://store.example.com/a b.json",
        );
        assert_eq!(
            link,
            "https://editor.example.com/viewer/?uri=https%3A%2F%2Fstore.example.com%2Fa%20b.json"
        );
    }
}
