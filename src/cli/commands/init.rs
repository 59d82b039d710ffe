use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::args::InitCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, Config, config_json};

/// Write a starter `.kitscoperc.json` into `cmd.path`.
///
/// An existing file is never overwritten.
pub fn init(cmd: InitCommand) -> Result<ExitStatus> {
    let config_path = cmd.path.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            config_path.display()
        );
        return Ok(ExitStatus::Error);
    }

    let mut config = Config::default();
    if let Some(package) = cmd.library_package {
        config.library_package = package;
    }
    config.host_codebases = cmd.hosts;
    config.validate()?;

    fs::create_dir_all(&cmd.path)
        .with_context(|| format!("Failed to create directory: {}", cmd.path.display()))?;
    fs::write(&config_path, config_json(&config)?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    Ok(ExitStatus::Success)
}
