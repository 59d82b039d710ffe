use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::Value;
use tempfile::TempDir;

mod analyze;
mod init;
mod merge;

const BIN_NAME: &str = "kitscope";

pub const MANIFEST: &str = r#"
export { default as Alpha } from "./components/Alpha";
export { default as Beta } from "./components/Beta";
export { default as AlphaProps } from "./components/Alpha/types";
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A workspace holding the library sources and two host codebases:
    /// `app1` renders Alpha twice, `app2` renders Beta once.
    pub fn with_library() -> Result<Self> {
        let test = Self::new()?;
        test.write_file("src/index.ts", MANIFEST)?;
        test.write_file("src/components/Alpha.tsx", "export default () => null;")?;
        test.write_file("src/components/Beta/index.tsx", "export default () => null;")?;
        test.write_file(
            "app1/page.tsx",
            r#"
import { Alpha } from "@acme/ui";

export default function Page() {
  return (
    <>
      <Alpha variant="primary" />
      <Alpha variant="ghost" sx={{ margin: 0 }} />
    </>
  );
}
"#,
        )?;
        test.write_file(
            "app1/package.json",
            r#"{ "dependencies": { "@acme/ui": "^1.4.0" } }"#,
        )?;
        test.write_file(
            "app2/page.tsx",
            r#"
import { Beta as B } from "@acme/ui";

export const Page = () => <B open />;
"#,
        )?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn analyze_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("analyze");
        cmd
    }

    pub fn merge_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("merge");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn read_json(&self, path: &str) -> Result<Value> {
        let content = self.read_file(path)?;
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {path}"))
    }
}

/// `[(componentName, totalUsages)]` from a report.
pub fn totals(report: &Value) -> Vec<(String, u64)> {
    report["componentStats"]
        .as_array()
        .map(|stats| {
            stats
                .iter()
                .map(|s| {
                    (
                        s["componentName"].as_str().unwrap_or_default().to_string(),
                        s["totalUsages"].as_u64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
