//! JSON output formatting

use aribeit_core::{ExtractError, NormalizedMetadata};
use serde::Serialize;
use std::path::Path;

/// One line of `eitmeta` output
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub status: &'static str,
    pub input_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NormalizedMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FileReport {
    pub fn success(path: &Path, metadata: NormalizedMetadata) -> Self {
        Self {
            status: "success",
            input_file: path.display().to_string(),
            metadata: Some(metadata),
            reason: None,
            detail: None,
        }
    }

    pub fn no_metadata(path: &Path, error: &ExtractError) -> Self {
        let detail = match error {
            ExtractError::NonZeroExit { stderr, .. } | ExtractError::EmptyOutput { stderr }
                if !stderr.trim().is_empty() =>
            {
                format!("{}: {}", error, stderr.trim_end())
            }
            _ => error.to_string(),
        };
        Self {
            status: "no_metadata",
            input_file: path.display().to_string(),
            metadata: None,
            reason: Some(error.reason()),
            detail: Some(detail),
        }
    }
}

/// Print a report as JSON
pub fn print_json_report(report: &FileReport, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}
