#![deny(missing_docs)]

//! # Artifact Storage
//!
//! Directory-backed [`ArtifactStore`]: each published artifact becomes one
//! file under the configured root, with a `file://` retrieval target for
//! viewer links.

use oasmerge_core::{AppResult, ArtifactStore, StoredArtifact};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Stores artifacts as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at a directory. The directory is created on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for DirStore {
    fn store(&self, name: &str, text: &str) -> AppResult<StoredArtifact> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        fs::write(&path, text)?;

        let locator = path.display().to_string();
        Ok(StoredArtifact {
            viewer_target: Some(format!("file://{}", locator)),
            locator,
        })
    }

    fn retrieve(&self, name: &str) -> AppResult<Option<Vec<u8>>> {
        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
