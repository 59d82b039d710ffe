//! Error types for the analysis pipeline.
//!
//! Only structural and precondition failures are represented here. Per-file
//! parse failures and missing optional resources are recovered where they
//! happen and never surface as an `Error`.

use thiserror::Error;

/// Result alias used throughout `kitscope::core`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The library export manifest could not be found. Nothing can be analyzed without it.
    #[error("Library export manifest not found: {path}")]
    MissingManifest { path: String },

    /// A remote repository reference is incomplete or malformed.
    #[error("Invalid remote repository reference '{0}' (expected owner/repo[@branch])")]
    InvalidRemote(String),

    /// The repository host answered with a non-success status other than 404.
    #[error("Remote request to {url} failed with status {status}")]
    RemoteStatus { url: String, status: u16 },

    /// Transport-level failure after retries were exhausted.
    #[error("Remote request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The repository host returned a body that could not be decoded.
    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A source file is not valid TSX.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// Merging requires at least two reports.
    #[error("At least two reports are required to merge, got {0}")]
    NotEnoughReports(usize),

    #[error("Failed to start parser threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }
}
