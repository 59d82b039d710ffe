use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{analyze::analyze, init::init, merge::merge},
    exit_status::ExitStatus,
};

/// Main entry point for the kitscope CLI.
///
/// Dispatches to the appropriate command handler based on the parsed arguments.
/// Prints help and succeeds when no command is given.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Analyze(cmd)) => analyze(cmd),
        Some(Command::Merge(cmd)) => merge(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => Ok(ExitStatus::Success),
    }
}
