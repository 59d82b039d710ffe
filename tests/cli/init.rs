use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["libraryPackage"], "@acme/ui");
    assert!(
        parsed.get("hostCodebases").is_some(),
        "Config should have 'hostCodebases' field"
    );
    assert_eq!(parsed["library"]["manifest"], "src/index.ts");

    // 2-space indentation
    assert!(content.contains("\n  \""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    insta::assert_snapshot!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        @"✓ Created .kitscoperc.json"
    );
    assert!(test.root().join(".kitscoperc.json").exists());

    let content = test.read_file(".kitscoperc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".kitscoperc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(test.read_file(".kitscoperc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_library()?;

    test.command().arg("init").output()?;

    let output = test.analyze_command().output()?;
    assert!(
        output.status.success(),
        "Analyze should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}

#[test]
fn test_init_with_package_and_hosts() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .command()
        .args(["init", "tools", "--library-package", "@corp/ds"])
        .args(["--host", "web", "--host", "admin"])
        .output()?;

    assert!(output.status.success());
    let config = test.read_json("tools/.kitscoperc.json")?;
    assert_eq!(config["libraryPackage"], "@corp/ds");
    assert_eq!(config["hostCodebases"], serde_json::json!(["web", "admin"]));

    Ok(())
}

#[test]
fn test_init_rejects_blank_package() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .command()
        .args(["init", "--library-package", " "])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join(".kitscoperc.json").exists());

    Ok(())
}
