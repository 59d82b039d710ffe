//! Usage Extractor.
//!
//! Parses one source file and reports every place a library component is
//! invoked, wrapped by a style extension, or only imported. A single AST
//! pass collects import bindings and usage sites; import-only records are
//! appended at the end for components that were never used.

pub mod prop_value;
pub mod usage_collector;

#[cfg(test)]
mod tests;

use tracing::warn;

pub use prop_value::{classify_attr_value, classify_expr, css_declaration_names, object_keys};
pub use usage_collector::UsageCollector;

use crate::config::Config;
use crate::core::data::UsageRecord;
use crate::core::directory::CanonicalDirectory;
use crate::core::parsers::jsx::parse_jsx_source;
use crate::error::Result;

/// Per-run settings the extractor needs from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Import source that identifies the library, matched exactly.
    pub library_package: String,
    pub style_props: Vec<String>,
    pub style_wrappers: Vec<String>,
}

impl ExtractOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            library_package: config.library_package.clone(),
            style_props: config.style_props.clone(),
            style_wrappers: config.style_wrappers.clone(),
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Extract usage records from one file, propagating parse failures.
pub fn try_extract_usages(
    file_path: &str,
    content: String,
    host_codebase: &str,
    directory: &CanonicalDirectory,
    options: &ExtractOptions,
) -> Result<Vec<UsageRecord>> {
    let parsed = parse_jsx_source(content, file_path)?;
    let collector = UsageCollector::new(
        file_path,
        host_codebase,
        &parsed.source_map,
        directory,
        options,
    );
    Ok(collector.collect(&parsed.module))
}

/// Extract usage records from one file.
///
/// A file that fails to parse is logged and contributes nothing.
pub fn extract_usages(
    file_path: &str,
    content: String,
    host_codebase: &str,
    directory: &CanonicalDirectory,
    options: &ExtractOptions,
) -> Vec<UsageRecord> {
    match try_extract_usages(file_path, content, host_codebase, directory, options) {
        Ok(records) => records,
        Err(e) => {
            warn!("Skipping {}: {}", file_path, e);
            Vec::new()
        }
    }
}
