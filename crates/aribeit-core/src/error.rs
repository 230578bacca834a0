//! Error taxonomy for the extraction pipeline

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Problems with a configured analyzer command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unterminated {0} quote in analyzer arguments")]
    UnterminatedQuote(char),

    #[error("trailing backslash in analyzer arguments")]
    TrailingEscape,
}

/// The analyzer output could not be read as a JSON object
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("analyzer output is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("analyzer output is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Why no metadata was produced for a file
///
/// Every variant collapses to "no metadata" at the provider boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("analyzer command is not configured")]
    NotConfigured,

    #[error("analyzer command is invalid: {0}")]
    InvalidCommand(#[from] CommandError),

    #[error("not a transport stream: {}", .0.display())]
    IneligibleInput(PathBuf),

    #[error("failed to run analyzer `{command}`: {source}")]
    SpawnFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analyzer `{command}` exited with code {code}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("analyzer produced no output")]
    EmptyOutput { stderr: String },

    #[error("malformed payload from analyzer `{command}`: {source}")]
    MalformedPayload {
        command: String,
        #[source]
        source: DecodeError,
    },

    #[error("cancelled")]
    Cancelled,

    #[error("analyzer timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

impl ExtractError {
    /// Failures worth an error-level log line for offline troubleshooting
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            ExtractError::InvalidCommand(_)
                | ExtractError::SpawnFailure { .. }
                | ExtractError::NonZeroExit { .. }
                | ExtractError::MalformedPayload { .. }
        )
    }

    /// Short machine-readable reason, used in CLI output
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractError::NotConfigured => "not_configured",
            ExtractError::InvalidCommand(_) => "invalid_command",
            ExtractError::IneligibleInput(_) => "ineligible_input",
            ExtractError::SpawnFailure { .. } => "spawn_failure",
            ExtractError::NonZeroExit { .. } => "non_zero_exit",
            ExtractError::EmptyOutput { .. } => "empty_output",
            ExtractError::MalformedPayload { .. } => "malformed_payload",
            ExtractError::Cancelled => "cancelled",
            ExtractError::TimedOut(_) => "timed_out",
        }
    }
}
