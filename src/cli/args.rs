//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `analyze`: Measure library usage across host codebases and write a report
//! - `merge`: Combine several reports into one
//! - `init`: Initialize kitscope configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::locate::RemoteRepo;

pub const DEFAULT_REPORT_FILE: &str = "kitscope-report.json";
pub const DEFAULT_MERGED_FILE: &str = "kitscope-merged.json";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Analyze(cmd)) => cmd.common.verbose,
            Some(Command::Merge(cmd)) => cmd.common.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeCommand {
    /// Root directory containing the host codebases (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Configuration file (default: search upwards for .kitscoperc.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host codebase subdirectory; repeatable (overrides config file)
    #[arg(long = "host", value_name = "NAME")]
    pub hosts: Vec<String>,

    /// Local library checkout (overrides config file)
    #[arg(long)]
    pub library_root: Option<PathBuf>,

    /// Library export manifest, relative to the library root
    #[arg(long)]
    pub manifest: Option<String>,

    /// Read host codebases from a GitHub repository
    #[arg(long, value_name = "OWNER/REPO[@BRANCH]")]
    pub remote: Option<RemoteRepo>,

    /// GitHub token for remote access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Report output path
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Keep every usage record in the report (`rawUsages`)
    #[arg(long)]
    pub keep_raw: bool,

    /// Parser worker threads (default: number of cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct MergeCommand {
    /// Report files to merge (at least two)
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Merged report output path
    #[arg(short, long, default_value = DEFAULT_MERGED_FILE)]
    pub output: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to write the configuration file into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Package identifier that library imports are matched against
    #[arg(long, value_name = "PACKAGE")]
    pub library_package: Option<String>,

    /// Host codebase subdirectory; repeatable
    #[arg(long = "host", value_name = "NAME")]
    pub hosts: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze component library usage and write a JSON report
    Analyze(AnalyzeCommand),
    /// Merge per-host reports into a single report
    Merge(MergeCommand),
    /// Initialize a new .kitscoperc.json configuration file
    Init(InitCommand),
}
