// src/error.rs
use thiserror::Error;

/// Errors with distinct top-level reporting or recovery behavior.
///
/// Everything here bubbles to the run wrapper in main.rs, which is the
/// single point that prints and picks the exit status. The only error
/// handled below that point is `Unauthorized`, which the completion
/// client retries exactly once.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No supported version control system detected.")]
    NoVcsDetected,

    #[error("Failed to run {command}")]
    CommandFailed { command: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response content from API")]
    EmptyResponse,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Aborted.")]
    Aborted,
}
