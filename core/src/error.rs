#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The rule set is malformed (empty sources, missing output info).
    /// Detected before any source is fetched.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),

    /// A source could not be fetched (network/HTTP/filesystem failure).
    #[from(ignore)]
    #[display("Source '{source}' is unavailable: {reason}")]
    SourceUnavailable {
        /// The source location as supplied by the caller.
        source: String,
        /// The underlying failure message.
        reason: String,
    },

    /// A source was fetched but its bytes do not parse as a document.
    #[from(ignore)]
    #[display("Source '{source}' could not be parsed: {reason}")]
    SourceParse {
        /// The source location as supplied by the caller.
        source: String,
        /// The underlying parser message.
        reason: String,
    },

    /// The merged artifact could not be written to the store.
    #[from(ignore)]
    #[display("Publish Error: {_0}")]
    Publish(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the
/// string-carrying variants do not implement `std::error::Error`, which
/// breaks auto-derived `source()` implementations.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
