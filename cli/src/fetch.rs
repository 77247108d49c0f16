#![deny(missing_docs)]

//! # Source Fetching
//!
//! The CLI's concrete [`DocumentFetcher`]: `http(s)` locations go over the
//! wire (feature `client`), everything else is read from the filesystem.

use oasmerge_core::{AppError, AppResult, DocumentFetcher};
use std::fs;

/// Fetches http(s) URLs remotely and plain paths from disk.
#[derive(Debug, Default)]
pub struct SourceFetcher;

impl DocumentFetcher for SourceFetcher {
    fn fetch(&self, location: &str) -> AppResult<Vec<u8>> {
        if is_remote(location) {
            return fetch_remote(location);
        }

        fs::read(location).map_err(|e| AppError::SourceUnavailable {
            source: location.to_string(),
            reason: e.to_string(),
        })
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(feature = "client")]
fn fetch_remote(location: &str) -> AppResult<Vec<u8>> {
    let mut response = ureq::get(location)
        .call()
        .map_err(|e| AppError::SourceUnavailable {
            source: location.to_string(),
            reason: e.to_string(),
        })?;

    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| AppError::SourceUnavailable {
            source: location.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(not(feature = "client"))]
fn fetch_remote(location: &str) -> AppResult<Vec<u8>> {
    Err(AppError::SourceUnavailable {
        source: location.to_string(),
        reason: "built without the 'client' feature; remote sources are unavailable".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetches_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"openapi: 3.0.3").unwrap();

        let bytes = SourceFetcher
            .fetch(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(bytes, b"openapi: 3.0.3");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = SourceFetcher.fetch("definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.com/openapi.json"));
        assert!(is_remote("http://example.com/openapi.json"));
        assert!(!is_remote("specs/openapi.json"));
    }
}
