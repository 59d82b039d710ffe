use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::core::UnifiedReport;

/// Write a report as pretty-printed JSON.
pub fn write_report(report: &UnifiedReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = report.to_json().context("Failed to serialize report")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

pub fn read_report(path: &Path) -> Result<UnifiedReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;
    UnifiedReport::from_json(&content)
        .with_context(|| format!("Failed to parse report: {}", path.display()))
}
