//! Console summaries.
//!
//! The JSON report is the real output; these are short human-readable
//! digests printed after it is written.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{NamedCount, UnifiedReport};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Unused component names listed before falling back to a count.
const MAX_UNUSED_DISPLAY: usize = 10;

pub fn print_analysis_summary(report: &UnifiedReport, output: &Path) {
    print_analysis_summary_to(report, output, &mut io::stdout().lock());
}

pub fn print_analysis_summary_to<W: Write>(report: &UnifiedReport, output: &Path, writer: &mut W) {
    let overall = &report.overall_stats;
    let hosts = overall.usages_by_host_codebase.len();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Found {} {} of {} {} across {} host {}",
            overall.total_usages,
            plural(overall.total_usages, "usage", "usages"),
            overall.components_used,
            plural(overall.components_used, "component", "components"),
            hosts,
            plural(hosts, "codebase", "codebases"),
        )
        .green()
    );

    print_ranking("Top components", &overall.top_components, writer);
    print_ranking("Top props", &overall.top_props, writer);
    print_unused(report, writer);

    let _ = writeln!(writer, "  {} {}", "Report:".bold(), output.display());
}

pub fn print_merge_summary(report: &UnifiedReport, inputs: usize, output: &Path) {
    print_merge_summary_to(report, inputs, output, &mut io::stdout().lock());
}

pub fn print_merge_summary_to<W: Write>(
    report: &UnifiedReport,
    inputs: usize,
    output: &Path,
    writer: &mut W,
) {
    let overall = &report.overall_stats;
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Merged {} reports: {} {} of {} {}",
            inputs,
            overall.total_usages,
            plural(overall.total_usages, "usage", "usages"),
            overall.components_used,
            plural(overall.components_used, "component", "components"),
        )
        .green()
    );
    print_unused(report, writer);
    let _ = writeln!(writer, "  {} {}", "Report:".bold(), output.display());
}

// ============================================================
// Internal Functions
// ============================================================

fn print_ranking<W: Write>(title: &str, ranking: &[NamedCount], writer: &mut W) {
    if ranking.is_empty() {
        return;
    }

    let name_width = ranking
        .iter()
        .map(|entry| UnicodeWidthStr::width(entry.name.as_str()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(writer, "  {}", format!("{title}:").bold());
    for entry in ranking {
        let padding = name_width - UnicodeWidthStr::width(entry.name.as_str());
        let _ = writeln!(
            writer,
            "    {}{}  {}",
            entry.name.cyan(),
            " ".repeat(padding),
            entry.count
        );
    }
}

fn print_unused<W: Write>(report: &UnifiedReport, writer: &mut W) {
    let unused = &report.unused_components;
    if unused.is_empty() {
        let _ = writeln!(writer, "  {} none", "Unused components:".bold());
        return;
    }

    if unused.len() <= MAX_UNUSED_DISPLAY {
        let names: Vec<&str> = unused.iter().map(|c| c.name.as_str()).collect();
        let _ = writeln!(
            writer,
            "  {} {}",
            "Unused components:".bold(),
            names.join(", ").yellow()
        );
    } else {
        let _ = writeln!(
            writer,
            "  {} {}",
            "Unused components:".bold(),
            format!("{} (see report)", unused.len()).yellow()
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
