//! Command-line interface layer.
//!
//! Separate from `core` so kitscope can be used as a library.

pub mod args;
pub mod commands;
pub mod exit_status;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use run::run_cli;
