//! Source Locator.
//!
//! Finds analyzable source files in host codebases and component candidate
//! files in the library, from a local checkout or a hosted repository.
//!
//! ## Module Structure
//!
//! - `local`: walkdir-based scanning of a filesystem tree
//! - `remote`: GitHub contents API client (worklist expansion, backoff)

pub mod local;
pub mod remote;

use std::{path::PathBuf, sync::Arc};

use glob::Pattern;
use tracing::warn;

pub use local::{ScanResult, scan_files};
pub use remote::{Backoff, GitHubClient, RemoteRepo};

use crate::config::TEST_FILE_PATTERNS;
use crate::core::directory::{file_base_name, is_excluded_component};
use crate::error::Result;

const VENDORED_DIRS: &[&str] = &["node_modules", "bower_components"];

/// Decides which paths are analyzable source files.
#[derive(Debug, Clone)]
pub struct FileFilter {
    patterns: Vec<Pattern>,
}

impl FileFilter {
    /// Compile ignore globs. Invalid patterns are skipped with a warning;
    /// `Config::validate` rejects them earlier for configured values.
    pub fn new(ignores: &[String], ignore_test_files: bool) -> Self {
        let mut patterns: Vec<Pattern> = ignores
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        if ignore_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self { patterns }
    }

    /// Whether a `/`-separated relative path should be analyzed.
    pub fn accepts(&self, path: &str) -> bool {
        is_source_file(path)
            && !is_vendored(path)
            && !self.patterns.iter().any(|p| p.matches(path))
    }
}

fn is_source_file(path: &str) -> bool {
    if path.ends_with(".d.ts") || path.ends_with(".d.tsx") {
        return false;
    }
    matches!(
        path.rsplit_once('.').map(|(_, ext)| ext),
        Some("tsx" | "ts" | "jsx" | "js")
    )
}

fn is_vendored(path: &str) -> bool {
    path.split('/').any(|segment| VENDORED_DIRS.contains(&segment))
}

/// Keep only files that can define an independently usable component.
pub fn component_candidates(files: Vec<String>) -> Vec<String> {
    files
        .into_iter()
        .filter(|path| {
            file_base_name(path).is_some_and(|name| !is_excluded_component(&name, path))
        })
        .collect()
}

/// A tree of source files, local or hosted.
///
/// Paths passed to and returned from a tree are relative to its root and use
/// `/` separators.
#[derive(Clone)]
pub enum SourceTree {
    Local(PathBuf),
    Remote {
        client: Arc<GitHubClient>,
        repo: RemoteRepo,
    },
}

impl SourceTree {
    pub fn describe(&self) -> String {
        match self {
            SourceTree::Local(root) => root.display().to_string(),
            SourceTree::Remote { repo, .. } => repo.to_string(),
        }
    }

    /// Whether `dir` exists in the tree. An empty remote directory counts as missing.
    pub async fn has_dir(&self, dir: &str) -> Result<bool> {
        match self {
            SourceTree::Local(root) => Ok(root.join(dir).is_dir()),
            SourceTree::Remote { client, repo } => client.dir_exists(repo, dir).await,
        }
    }

    /// Every file under `dir` accepted by `filter`, sorted.
    pub async fn list_files(&self, dir: &str, filter: &FileFilter) -> Result<Vec<String>> {
        match self {
            SourceTree::Local(root) => {
                let result = scan_files(root, dir, filter);
                if result.skipped_count > 0 {
                    warn!(
                        "{} path(s) under {} skipped due to access errors",
                        result.skipped_count, dir
                    );
                }
                Ok(result.files)
            }
            SourceTree::Remote { client, repo } => {
                let files = client.list_files(repo, dir).await?;
                Ok(files.into_iter().filter(|f| filter.accepts(f)).collect())
            }
        }
    }

    /// Read one file. `Ok(None)` when it does not exist.
    pub async fn read_to_string(&self, path: &str) -> Result<Option<String>> {
        match self {
            SourceTree::Local(root) => match std::fs::read_to_string(root.join(path)) {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            SourceTree::Remote { client, repo } => client.read_file(repo, path).await,
        }
    }

    /// Read many files, preserving order. Unreadable files are logged and yield `None`.
    pub async fn read_all(&self, paths: &[String]) -> Vec<Option<String>> {
        match self {
            SourceTree::Local(root) => {
                use rayon::prelude::*;

                paths
                    .par_iter()
                    .map(|path| match std::fs::read_to_string(root.join(path)) {
                        Ok(content) => Some(content),
                        Err(e) => {
                            warn!("Failed to read {}: {}", path, e);
                            None
                        }
                    })
                    .collect()
            }
            SourceTree::Remote { client, repo } => client.read_files(repo, paths).await,
        }
    }
}
