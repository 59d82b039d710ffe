//! Frozen view of the library's export surface for one run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::LibraryConfig;
use crate::core::directory::CanonicalDirectory;
use crate::core::locate::{FileFilter, SourceTree, component_candidates};
use crate::error::{Error, Result};

/// Canonical directory captured once and shared by every extractor.
///
/// Never mutated. [`LibrarySnapshot::refresh`] captures a new snapshot.
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    pub directory: Arc<CanonicalDirectory>,
    pub captured_at: DateTime<Utc>,
}

impl LibrarySnapshot {
    pub fn new(directory: CanonicalDirectory) -> Self {
        Self {
            directory: Arc::new(directory),
            captured_at: Utc::now(),
        }
    }

    /// Read the export manifest and component files from `tree`.
    ///
    /// The manifest is required; a missing one is [`Error::MissingManifest`].
    pub async fn capture(
        tree: &SourceTree,
        library: &LibraryConfig,
        filter: &FileFilter,
    ) -> Result<Self> {
        let manifest = tree
            .read_to_string(&library.manifest)
            .await?
            .ok_or_else(|| Error::MissingManifest {
                path: format!("{}/{}", tree.describe(), library.manifest),
            })?;

        let files = tree.list_files(&library.components_dir, filter).await?;
        let candidates = component_candidates(files);
        let directory = CanonicalDirectory::build(&library.manifest, &manifest, &candidates);

        info!(
            components = directory.len(),
            candidates = candidates.len(),
            "captured library snapshot"
        );

        Ok(Self::new(directory))
    }

    /// Capture a fresh snapshot. `self` is left untouched.
    pub async fn refresh(
        &self,
        tree: &SourceTree,
        library: &LibraryConfig,
        filter: &FileFilter,
    ) -> Result<Self> {
        Self::capture(tree, library, filter).await
    }
}
