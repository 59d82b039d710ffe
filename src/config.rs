use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::locate::RemoteRepo;

pub const CONFIG_FILE_NAME: &str = ".kitscoperc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

/// Analysis configuration.
///
/// The same value is embedded in every report under `config`, so it must
/// never carry credentials. Tokens are passed separately.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Package identifier that library imports must match exactly.
    #[serde(default = "default_library_package")]
    pub library_package: String,
    /// Host codebase subdirectories of `source_root`. Empty means the root itself.
    #[serde(default)]
    pub host_codebases: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default)]
    pub library: LibraryConfig,
    /// Read host codebases from a remote repository instead of `source_root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteRepo>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Maximum number of remote requests in flight.
    #[serde(default = "default_remote_concurrency")]
    pub remote_concurrency: usize,
    /// JSX attributes treated as inline style overrides.
    #[serde(default = "default_style_props")]
    pub style_props: Vec<String>,
    /// Call names treated as style-extension wrappers, e.g. `styled(Button)`.
    #[serde(default = "default_style_wrappers")]
    pub style_wrappers: Vec<String>,
    #[serde(default)]
    pub keep_raw_usages: bool,
    /// Per-host manifest consulted for the installed library version.
    #[serde(default = "default_version_file")]
    pub version_file: String,
    /// Parser worker threads. Defaults to the number of cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Where the library's export manifest and component files live.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryConfig {
    /// Local library checkout. Defaults to `source_root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_components_dir")]
    pub components_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteRepo>,
}

fn default_library_package() -> String {
    "@acme/ui".to_string()
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_remote_concurrency() -> usize {
    8
}

fn default_style_props() -> Vec<String> {
    ["style", "sx", "css"].map(String::from).to_vec()
}

fn default_style_wrappers() -> Vec<String> {
    vec!["styled".to_string()]
}

fn default_version_file() -> String {
    "package.json".to_string()
}

fn default_manifest() -> String {
    "src/index.ts".to_string()
}

fn default_components_dir() -> String {
    "src/components".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            manifest: default_manifest(),
            components_dir: default_components_dir(),
            remote: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_package: default_library_package(),
            host_codebases: Vec::new(),
            source_root: default_source_root(),
            ignores: default_ignores(),
            ignore_test_files: default_ignore_test_files(),
            library: LibraryConfig::default(),
            remote: None,
            api_base: default_api_base(),
            remote_concurrency: default_remote_concurrency(),
            style_props: default_style_props(),
            style_wrappers: default_style_wrappers(),
            keep_raw_usages: false,
            version_file: default_version_file(),
            jobs: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores`, an empty
    /// library package, or a zero concurrency/jobs setting.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.library_package.trim().is_empty() {
            bail!("'libraryPackage' must not be empty");
        }

        if self.remote_concurrency == 0 {
            bail!("'remoteConcurrency' must be at least 1");
        }

        if self.jobs == Some(0) {
            bail!("'jobs' must be at least 1");
        }

        Ok(())
    }

    /// Host codebase labels in configuration order.
    ///
    /// When no host codebases are configured, the whole source root is a single
    /// host named after its directory.
    pub fn host_labels(&self) -> Vec<String> {
        if !self.host_codebases.is_empty() {
            return self.host_codebases.clone();
        }
        vec![root_label(&self.source_root, self.remote.as_ref())]
    }
}

fn root_label(source_root: &str, remote: Option<&RemoteRepo>) -> String {
    if let Some(remote) = remote {
        return remote.repo.clone();
    }
    let path = Path::new(source_root);
    path.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

/// Pretty-printed JSON for a config file, with a trailing newline.
pub fn config_json(config: &Config) -> Result<String> {
    let json = serde_json::to_string_pretty(config).context("Failed to generate config.")?;
    Ok(json + "\n")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => load_config_file(&path),
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

pub fn load_config_file(path: &Path) -> Result<ConfigLoadResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config.validate()?;
    Ok(ConfigLoadResult {
        config,
        from_file: true,
    })
}
