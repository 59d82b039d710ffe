use anyhow::Result;
use colored::Colorize;

use super::super::args::MergeCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::print_merge_summary;
use super::helper::{read_report, write_report};
use crate::core::merge as merge_reports;

pub fn merge(cmd: MergeCommand) -> Result<ExitStatus> {
    if cmd.inputs.len() < 2 {
        eprintln!(
            "{} at least two report files are required, got {}",
            "error:".bold().red(),
            cmd.inputs.len()
        );
        return Ok(ExitStatus::Error);
    }

    let reports = cmd
        .inputs
        .iter()
        .map(|path| read_report(path))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_reports(&reports)?;
    write_report(&merged, &cmd.output)?;
    print_merge_summary(&merged, reports.len(), &cmd.output);

    Ok(ExitStatus::Success)
}
