use std::{path::PathBuf, sync::Arc};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::aggregate::aggregate;
use crate::core::data::{UnifiedReport, UsageRecord};
use crate::core::extract::{ExtractOptions, extract_usages};
use crate::core::locate::{FileFilter, GitHubClient, SourceTree};
use crate::core::snapshot::LibrarySnapshot;
use crate::core::versions::lookup_versions;
use crate::error::Result;

/// A source file queued for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub host_codebase: String,
    /// Path relative to the host tree root.
    pub path: String,
}

/// Pipeline orchestrator: locate → directory → extract → aggregate.
///
/// # Configuration Priority
///
/// The caller resolves configuration before constructing the context:
/// 1. CLI arguments (e.g., `--host web`)
/// 2. `.kitscoperc.json` config file
/// 3. Built-in defaults
pub struct AnalysisContext {
    pub config: Config,
    /// Where host codebases are read from.
    pub host_tree: SourceTree,
    /// Where the library's manifest and component files are read from.
    pub library_tree: SourceTree,
    /// `(label, directory)` per host codebase, in configuration order.
    pub hosts: Vec<(String, String)>,
    filter: FileFilter,
}

impl AnalysisContext {
    /// Build the source trees described by `config`.
    ///
    /// `token` authenticates remote requests and is never stored in the report.
    pub fn new(config: Config, token: Option<String>) -> Result<Self> {
        let needs_client = config.remote.is_some() || config.library.remote.is_some();
        let client = if needs_client {
            Some(Arc::new(GitHubClient::new(
                &config.api_base,
                token,
                config.remote_concurrency,
            )?))
        } else {
            None
        };

        let tree_for = |remote: Option<&crate::core::locate::RemoteRepo>, local: PathBuf| {
            match (remote, &client) {
                (Some(repo), Some(client)) => SourceTree::Remote {
                    client: Arc::clone(client),
                    repo: repo.clone(),
                },
                _ => SourceTree::Local(local),
            }
        };

        let source_root = PathBuf::from(&config.source_root);
        let host_tree = tree_for(config.remote.as_ref(), source_root.clone());
        let library_tree = match (&config.library.remote, &config.library.root) {
            (Some(repo), _) => tree_for(Some(repo), source_root),
            (None, Some(root)) => SourceTree::Local(PathBuf::from(root)),
            (None, None) => host_tree.clone(),
        };

        let hosts = if config.host_codebases.is_empty() {
            config
                .host_labels()
                .into_iter()
                .map(|label| (label, String::new()))
                .collect()
        } else {
            config
                .host_codebases
                .iter()
                .map(|host| (host.clone(), host.clone()))
                .collect()
        };

        let filter = FileFilter::new(&config.ignores, config.ignore_test_files);

        Ok(Self {
            config,
            host_tree,
            library_tree,
            hosts,
            filter,
        })
    }

    /// Run the whole pipeline.
    pub async fn run(&self) -> Result<UnifiedReport> {
        let snapshot = self.snapshot().await?;
        let files = self.locate().await?;
        let records = self.extract(&snapshot, &files).await?;

        let versions = lookup_versions(
            &self.host_tree,
            &self.hosts,
            &self.config.version_file,
            &self.config.library_package,
        )
        .await;

        let report = aggregate(
            records,
            &self.config,
            snapshot.directory.components(),
            versions,
        );
        info!(
            components_used = report.overall_stats.components_used,
            unused = report.overall_stats.unused_count,
            "aggregation complete"
        );
        Ok(report)
    }

    pub async fn snapshot(&self) -> Result<LibrarySnapshot> {
        LibrarySnapshot::capture(&self.library_tree, &self.config.library, &self.filter).await
    }

    /// Source files of every host codebase. Missing hosts are skipped with a warning.
    pub async fn locate(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        for (label, dir) in &self.hosts {
            if !dir.is_empty() && !self.host_tree.has_dir(dir).await? {
                warn!(
                    "Host codebase '{}' not found in {}",
                    label,
                    self.host_tree.describe()
                );
                continue;
            }
            let paths = self.host_tree.list_files(dir, &self.filter).await?;
            info!(host = %label, files = paths.len(), "located source files");
            files.extend(paths.into_iter().map(|path| SourceFile {
                host_codebase: label.clone(),
                path,
            }));
        }
        Ok(files)
    }

    /// Read and parse `files`, returning their records in file order.
    pub async fn extract(
        &self,
        snapshot: &LibrarySnapshot,
        files: &[SourceFile],
    ) -> Result<Vec<UsageRecord>> {
        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let contents = self.host_tree.read_all(&paths).await;

        let options = ExtractOptions::from_config(&self.config);
        let directory = Arc::clone(&snapshot.directory);

        let parse_all = || -> Vec<UsageRecord> {
            files
                .par_iter()
                .zip(contents.into_par_iter())
                .flat_map_iter(|(file, content)| match content {
                    Some(content) => extract_usages(
                        &file.path,
                        content,
                        &file.host_codebase,
                        &directory,
                        &options,
                    ),
                    None => Vec::new(),
                })
                .collect()
        };

        let records = match self.config.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()?
                .install(parse_all),
            None => parse_all(),
        };

        info!(
            files = files.len(),
            records = records.len(),
            "extracted usages"
        );
        Ok(records)
    }
}
