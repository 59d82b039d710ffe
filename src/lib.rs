//! Kitscope - UI component library usage analysis
//!
//! Kitscope measures how a shared component library is consumed across host
//! codebases: which components are used where, with which props, which ones
//! are restyled, and which ones nobody uses.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (analyze, merge, init)
//! - `config`: Configuration file loading and parsing
//! - `core`: Analysis pipeline (locate, directory, extract, aggregate, merge)
//! - `error`: Error type of the analysis pipeline

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use error::{Error, Result};
