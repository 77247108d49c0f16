#![deny(missing_docs)]

//! # oasmerge-core
//!
//! Core library for merging OpenAPI-style API description documents.
//!
//! Takes N parsed documents plus one caller-supplied rule set and produces
//! one consistent, non-colliding, consumer-facing document, then publishes
//! the serialized artifact through a pluggable store. Fetching and storage
//! are trait boundaries; the merge itself is a deterministic fold whose
//! source order decides every first-wins collision rule.

/// Shared error types.
pub mod error;

/// In-memory document model.
pub mod document;

/// Rule set and its compiled (normalized) form.
pub mod rules;

/// Raw bytes -> document model parsing.
pub mod parse;

/// Fetch boundary and ordered source loading.
pub mod source;

/// The merge engine.
pub mod merge;

/// Read-only structural validation.
pub mod validation;

/// Per-source reporting operations.
pub mod report;

/// Serialization and artifact storage.
pub mod publish;

/// End-to-end orchestration of one merge run.
pub mod pipeline;

pub use document::{
    Components, Document, HttpMethod, Info, Operation, ParamLocation, Parameter, PathItem,
    RequestBody, Response, Schema, Server,
};
pub use error::{AppError, AppResult};
pub use merge::{merge_documents, MergeOutcome, SuppressedCollision};
pub use parse::{parse_document, parse_document_bytes};
pub use pipeline::{run_combine, run_methods_report, run_validation_report, CombineResponse};
pub use publish::{
    publish, serialize_document, ArtifactStore, MemoryStore, PublishOutcome, StoredArtifact,
};
pub use report::{methods_report, validation_report, OperationSummary, SourceReport};
pub use rules::{CompiledRules, OutputFormat, OutputInfo, RuleSet};
pub use source::{load_sources, DocumentFetcher, SourceDocument, StaticFetcher};
pub use validation::{validate_document, Diagnostic, ValidationReport};
