use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, totals};

#[test]
fn test_analyze_two_hosts() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test
        .analyze_command()
        .args(["--host", "app1", "--host", "app2"])
        .output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = test.read_json("kitscope-report.json")?;

    assert_eq!(
        totals(&report),
        vec![("Alpha".to_string(), 2), ("Beta".to_string(), 1)]
    );
    assert_eq!(report["unusedComponents"], json!([]));
    assert_eq!(
        report["unusedComponentsByHostCodebase"],
        json!({ "app1": ["Beta"], "app2": ["Alpha"] })
    );
    assert_eq!(
        report["libraryVersionsByHostCodebase"],
        json!({ "app1": "^1.4.0", "app2": "not found" })
    );

    let alpha = &report["componentStats"][0];
    assert_eq!(alpha["commonProps"][0], json!({ "name": "variant", "count": 2 }));
    assert_eq!(alpha["customization"]["overrideCount"], 1);
    assert_eq!(alpha["files"], json!(["app1/page.tsx"]));
    assert!(report.get("rawUsages").is_none());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 3 usages of 2 components across 2 host codebases"));

    Ok(())
}

#[test]
fn test_analyze_keep_raw_and_output_path() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test
        .analyze_command()
        .args(["--host", "app2", "--keep-raw", "--output", "out/app2.json"])
        .output()?;

    assert!(output.status.success());
    let report = test.read_json("out/app2.json")?;
    let raw = report["rawUsages"].as_array().cloned().unwrap_or_default();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0]["componentName"], "Beta");
    assert_eq!(raw[0]["lineNumber"], 4);
    assert_eq!(
        raw[0]["props"],
        json!([{ "name": "open", "kind": "boolean", "value": true }])
    );

    Ok(())
}

#[test]
fn test_analyze_reads_config_file() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        ".kitscoperc.json",
        r#"{ "hostCodebases": ["app1"], "keepRawUsages": true }"#,
    )?;

    let output = test.analyze_command().output()?;

    assert!(output.status.success());
    let report = test.read_json("kitscope-report.json")?;
    assert_eq!(report["config"]["hostCodebases"], json!(["app1"]));
    assert_eq!(
        report["unusedComponents"],
        json!([{ "name": "Beta", "definitionPath": "src/components/Beta/index.tsx" }])
    );
    assert_eq!(report["rawUsages"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn test_analyze_missing_host_warns_and_continues() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test
        .analyze_command()
        .args(["--host", "app1", "--host", "ghost"])
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ghost"), "stderr: {stderr}");
    let report = test.read_json("kitscope-report.json")?;
    assert_eq!(
        report["unusedComponentsByHostCodebase"]["ghost"],
        json!(["Alpha", "Beta"])
    );

    Ok(())
}

#[test]
fn test_analyze_missing_manifest_fails() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app1/page.tsx", "export {};")?;

    let output = test.analyze_command().args(["--host", "app1"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Library export manifest not found"));
    assert!(!test.root().join("kitscope-report.json").exists());

    Ok(())
}

#[test]
fn test_analyze_invalid_remote_reference() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test
        .analyze_command()
        .args(["--remote", "not-a-repo"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("merge"));
    assert!(stdout.contains("init"));

    Ok(())
}
