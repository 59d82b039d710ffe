use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::super::args::AnalyzeCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::print_analysis_summary;
use super::helper::write_report;
use crate::config::{CONFIG_FILE_NAME, Config, load_config, load_config_file};
use crate::core::AnalysisContext;

pub fn analyze(cmd: AnalyzeCommand) -> Result<ExitStatus> {
    let config = resolve_config(&cmd)?;
    let ctx = AnalysisContext::new(config, cmd.token.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = runtime.block_on(ctx.run())?;

    write_report(&report, &cmd.output)?;
    print_analysis_summary(&report, &cmd.output);

    Ok(ExitStatus::Success)
}

/// Merge configuration with priority CLI arguments > config file > defaults.
fn resolve_config(cmd: &AnalyzeCommand) -> Result<Config> {
    let search_root = cmd
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match &cmd.config {
        Some(path) => load_config_file(path)?.config,
        None => {
            let result = load_config(&search_root)?;
            if !result.from_file {
                debug!("No {} found, using default configuration", CONFIG_FILE_NAME);
            }
            result.config
        }
    };

    if let Some(source_root) = &cmd.source_root {
        config.source_root = source_root.to_string_lossy().to_string();
    }
    if !cmd.hosts.is_empty() {
        config.host_codebases = cmd.hosts.clone();
    }
    if let Some(library_root) = &cmd.library_root {
        config.library.root = Some(library_root.to_string_lossy().to_string());
    }
    if let Some(manifest) = &cmd.manifest {
        config.library.manifest = manifest.clone();
    }
    if let Some(remote) = &cmd.remote {
        config.remote = Some(remote.clone());
    }
    if cmd.keep_raw {
        config.keep_raw_usages = true;
    }
    if cmd.jobs.is_some() {
        config.jobs = cmd.jobs;
    }

    config.validate()?;
    Ok(config)
}
