use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, totals};

fn analyze_host(test: &CliTest, host: &str) -> Result<String> {
    let output_path = format!("{host}.json");
    let output = test
        .analyze_command()
        .args(["--host", host, "--output", &output_path])
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(output_path)
}

#[test]
fn test_merge_per_host_reports() -> Result<()> {
    let test = CliTest::with_library()?;
    let app1 = analyze_host(&test, "app1")?;
    let app2 = analyze_host(&test, "app2")?;

    let output = test
        .merge_command()
        .args([app1.as_str(), app2.as_str(), "--output", "merged.json"])
        .output()?;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let merged = test.read_json("merged.json")?;
    assert_eq!(
        totals(&merged),
        vec![("Alpha".to_string(), 2), ("Beta".to_string(), 1)]
    );
    assert_eq!(merged["unusedComponents"], json!([]));
    assert_eq!(
        merged["unusedComponentsByHostCodebase"],
        json!({ "app1": ["Beta"], "app2": ["Alpha"] })
    );
    assert_eq!(merged["config"]["hostCodebases"], json!(["app1", "app2"]));
    assert_eq!(merged["overallStats"]["totalUsages"], 3);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Merged 2 reports"));

    Ok(())
}

#[test]
fn test_merge_requires_two_inputs() -> Result<()> {
    let test = CliTest::with_library()?;
    let app1 = analyze_host(&test, "app1")?;

    let output = test.merge_command().arg(&app1).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("kitscope-merged.json").exists());

    Ok(())
}

#[test]
fn test_merge_missing_input_file() -> Result<()> {
    let test = CliTest::with_library()?;
    let app1 = analyze_host(&test, "app1")?;

    let output = test
        .merge_command()
        .args([app1.as_str(), "missing.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.json"));

    Ok(())
}

#[test]
fn test_merge_rejects_invalid_report() -> Result<()> {
    let test = CliTest::with_library()?;
    let app1 = analyze_host(&test, "app1")?;
    test.write_file("broken.json", "{ \"componentStats\": 3 }")?;

    let output = test
        .merge_command()
        .args([app1.as_str(), "broken.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));

    Ok(())
}
