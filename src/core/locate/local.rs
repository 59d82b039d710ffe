use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use super::FileFilter;

/// Result of scanning a local directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Paths relative to the scan root, with `/` separators, sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Recursively list files under `root/dir` that pass `filter`.
///
/// Returned paths are relative to `root`. A missing directory yields an empty
/// result; callers decide whether that deserves a warning.
pub fn scan_files(root: &Path, dir: &str, filter: &FileFilter) -> ScanResult {
    let mut result = ScanResult::default();
    let base = if dir.is_empty() || dir == "." {
        root.to_path_buf()
    } else {
        root.join(dir)
    };

    if !base.exists() {
        return result;
    }

    for entry in WalkDir::new(&base).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                warn!("Cannot access path: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_path(root, entry.path());
        if filter.accepts(&relative) {
            result.files.push(relative);
        }
    }

    result.files.sort();
    result
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
