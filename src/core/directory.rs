//! Canonical component directory.
//!
//! Built from the library's export manifest (`src/index.ts` by default), which
//! re-exports each component under its public name:
//!
//! ```text
//! export { default as Button } from "./components/Button";
//! export { default as DatePicker } from "./components/date-picker/Picker";
//! ```
//!
//! Import names, file names and export names do not always agree, so the
//! directory answers lookups by either the canonical name or the defining
//! file's base name through a single [`CanonicalDirectory::resolve`].

use std::{collections::HashMap, path::Path, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::core::data::CanonicalComponent;

/// `export { <local> as <Name> } from "<path>"`, where `<local>` is usually `default`.
static REEXPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"export\s*\{\s*([A-Za-z_$][\w$]*)\s+as\s+([A-Za-z_$][\w$]*)\s*\}\s*from\s*["']([^"']+)["']"#,
    )
    .unwrap()
});

static EXPORT_STATEMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*export\b").unwrap());

const SOURCE_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

/// Whether a library export is not independently usable surface.
///
/// Applied to manifest entries and to the locator's component candidates:
/// prop types, utilities, icons, hooks, and the table's internal parts.
pub fn is_excluded_component(name: &str, path: &str) -> bool {
    name.contains("Props")
        || name.to_lowercase().contains("utils")
        || name.contains("Icon")
        || name.starts_with("use")
        || path.replace('\\', "/").contains("table/components")
}

/// Base name of the file that defines a component.
///
/// `components/Button/index.tsx` is named after its directory (`Button`).
pub fn file_base_name(path: &str) -> Option<String> {
    let path = Path::new(path);
    let stem = path.file_stem()?.to_str()?;
    if stem == "index" {
        return path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string);
    }
    Some(stem.to_string())
}

/// A re-export statement accepted from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    /// Path as written in the manifest, relative to the manifest file.
    pub source: String,
}

/// Extract every accepted re-export from manifest text, before exclusions.
///
/// Only the `export { X as Name } from "path"` shape is accepted. Other
/// export forms are counted and reported at debug level.
pub fn parse_manifest(text: &str) -> Vec<ManifestEntry> {
    let entries: Vec<ManifestEntry> = REEXPORT_REGEX
        .captures_iter(text)
        .map(|caps| ManifestEntry {
            name: caps[2].to_string(),
            source: caps[3].to_string(),
        })
        .collect();

    let statements = EXPORT_STATEMENT_REGEX.find_iter(text).count();
    let rejected = statements.saturating_sub(entries.len());
    if rejected > 0 {
        debug!(rejected, "manifest export statements not in re-export form");
    }

    entries
}

/// Frozen lookup table of the library's canonical components.
#[derive(Debug, Clone, Default)]
pub struct CanonicalDirectory {
    components: Vec<CanonicalComponent>,
    by_name: HashMap<String, usize>,
    by_file_name: HashMap<String, usize>,
}

impl CanonicalDirectory {
    /// Build the directory from the export manifest.
    ///
    /// `manifest_path` and `candidates` are library-relative paths. A manifest
    /// entry whose target matches a candidate file gets that file as its
    /// definition path; otherwise the normalized target path is kept.
    pub fn build(manifest_path: &str, manifest_text: &str, candidates: &[String]) -> Self {
        let manifest_dir = Path::new(manifest_path)
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        let components = parse_manifest(manifest_text)
            .into_iter()
            .filter_map(|entry| {
                let target = join_normalized(&manifest_dir, &entry.source);
                let definition_path = match_candidate(&target, candidates).unwrap_or(target);
                if is_excluded_component(&entry.name, &definition_path) {
                    debug!(name = %entry.name, "excluded from canonical directory");
                    return None;
                }
                Some(CanonicalComponent::new(entry.name, definition_path))
            });

        Self::from_components(components)
    }

    /// Build from already-known components. Later duplicates of a name are ignored.
    pub fn from_components(components: impl IntoIterator<Item = CanonicalComponent>) -> Self {
        let mut directory = Self::default();
        for component in components {
            if directory.by_name.contains_key(&component.name) {
                continue;
            }
            let index = directory.components.len();
            directory.by_name.insert(component.name.clone(), index);
            if let Some(base) = file_base_name(&component.definition_path) {
                directory.by_file_name.entry(base).or_insert(index);
            }
            directory.components.push(component);
        }
        directory
    }

    /// Resolve an identifier to a canonical component.
    ///
    /// Tries the canonical export name first, then the defining file's base name.
    pub fn resolve(&self, identifier: &str) -> Option<&CanonicalComponent> {
        self.by_name
            .get(identifier)
            .or_else(|| self.by_file_name.get(identifier))
            .map(|&index| &self.components[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Components in manifest order.
    pub fn components(&self) -> &[CanonicalComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Join a manifest-relative path onto the manifest directory, resolving `.` and `..`.
fn join_normalized(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn match_candidate(target: &str, candidates: &[String]) -> Option<String> {
    let normalized: Vec<String> = candidates
        .iter()
        .map(|c| c.replace('\\', "/").trim_start_matches("./").to_string())
        .collect();

    let mut wanted = vec![target.to_string()];
    wanted.extend(SOURCE_EXTENSIONS.iter().map(|ext| format!("{target}.{ext}")));
    wanted.extend(
        SOURCE_EXTENSIONS
            .iter()
            .map(|ext| format!("{target}/index.{ext}")),
    );

    wanted
        .iter()
        .find_map(|w| normalized.iter().find(|c| *c == w))
        .cloned()
}
