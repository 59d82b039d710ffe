//! Installed library version per host codebase.
//!
//! Read from the host's `package.json` (or the configured version file).
//! Any failure degrades to [`NOT_FOUND`].

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::core::data::NOT_FOUND;
use crate::core::locate::SourceTree;

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies", "peerDependencies"];

/// Look up `package` in a package manifest, first hit across dependency sections.
pub fn library_version(manifest: &str, package: &str) -> Option<String> {
    let value: Value = serde_json::from_str(manifest).ok()?;
    DEPENDENCY_SECTIONS.iter().find_map(|section| {
        value
            .get(section)?
            .get(package)?
            .as_str()
            .map(str::to_string)
    })
}

/// Path of a host's version file within its tree.
pub fn version_file_path(host_dir: &str, version_file: &str) -> String {
    let host_dir = host_dir.trim_end_matches('/');
    if host_dir.is_empty() || host_dir == "." {
        version_file.to_string()
    } else {
        format!("{host_dir}/{version_file}")
    }
}

/// Library version for each `(label, dir)` host.
pub async fn lookup_versions(
    tree: &SourceTree,
    hosts: &[(String, String)],
    version_file: &str,
    package: &str,
) -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    for (label, dir) in hosts {
        let path = version_file_path(dir, version_file);
        let version = match tree.read_to_string(&path).await {
            Ok(Some(manifest)) => library_version(&manifest, package),
            Ok(None) => None,
            Err(e) => {
                debug!("Failed to read {}: {}", path, e);
                None
            }
        };
        versions.insert(
            label.clone(),
            version.unwrap_or_else(|| NOT_FOUND.to_string()),
        );
    }
    versions
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_library_version_sections() {
        let manifest = r#"{
            "dependencies": { "react": "^18.2.0" },
            "devDependencies": { "@acme/ui": "2.4.1" },
            "peerDependencies": { "@acme/ui": "^2.0.0" }
        }"#;
        assert_eq!(library_version(manifest, "@acme/ui").as_deref(), Some("2.4.1"));
        assert_eq!(library_version(manifest, "react").as_deref(), Some("^18.2.0"));
        assert_eq!(library_version(manifest, "vue"), None);
        assert_eq!(library_version("not json", "@acme/ui"), None);
    }

    #[test]
    fn test_version_file_path() {
        assert_eq!(version_file_path("", "package.json"), "package.json");
        assert_eq!(version_file_path("apps/web/", "package.json"), "apps/web/package.json");
    }

    #[tokio::test]
    async fn test_lookup_versions_degrades_to_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("web")).unwrap();
        fs::write(
            dir.path().join("web/package.json"),
            r#"{ "dependencies": { "@acme/ui": "^3.1.0" } }"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("admin")).unwrap();
        fs::write(dir.path().join("admin/package.json"), "{").unwrap();

        let tree = SourceTree::Local(dir.path().to_path_buf());
        let hosts = [
            ("web".to_string(), "web".to_string()),
            ("admin".to_string(), "admin".to_string()),
            ("docs".to_string(), "docs".to_string()),
        ];

        let versions = lookup_versions(&tree, &hosts, "package.json", "@acme/ui").await;

        assert_eq!(versions["web"], "^3.1.0");
        assert_eq!(versions["admin"], NOT_FOUND);
        assert_eq!(versions["docs"], NOT_FOUND);
    }
}
