//! Metadata provider for media-library indexers
//!
//! Runs the whole pipeline for one recording: file-type gate, analyzer
//! invocation, payload decoding. `extract` reports exactly why nothing was
//! produced; `fetch` and `metadata_result` collapse every failure to "no
//! metadata" after logging it, so one bad file never stops a library scan.

use crate::command::CommandSpec;
use crate::config::AnalyzerConfig;
use crate::decoder::decode;
use crate::error::ExtractError;
use crate::format::has_extension;
use crate::metadata::{MetadataResult, NormalizedMetadata};
use crate::runner::{self, ProcessOutcome};
use log::Level;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Stateless per call; share it freely between tasks
#[derive(Debug, Clone)]
pub struct MetadataProvider {
    config: AnalyzerConfig,
}

impl MetadataProvider {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Check if the analyzer should be run against `path`
    pub fn can_handle(&self, path: &Path) -> bool {
        has_extension(path, &self.config.extensions)
    }

    /// Run the pipeline, reporting why no metadata was produced
    pub async fn extract(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<NormalizedMetadata, ExtractError> {
        // The analyzer contract takes the path as text.
        let target = match path.to_str() {
            Some(target) if self.can_handle(path) => target,
            _ => return Err(ExtractError::IneligibleInput(path.to_path_buf())),
        };

        let spec = CommandSpec::from_template(&self.config.command, target)?
            .ok_or(ExtractError::NotConfigured)?;

        log::info!("Parsing: {}", path.display());

        match runner::run(&spec, cancel, self.config.timeout()).await {
            ProcessOutcome::Success { stdout } => {
                decode(&stdout).map_err(|source| ExtractError::MalformedPayload {
                    command: spec.display(),
                    source,
                })
            }
            ProcessOutcome::NonZeroExit { code, stderr } => Err(ExtractError::NonZeroExit {
                command: spec.display(),
                code,
                stderr,
            }),
            ProcessOutcome::EmptyOutput { stderr } => Err(ExtractError::EmptyOutput { stderr }),
            ProcessOutcome::SpawnFailure { cause } => Err(ExtractError::SpawnFailure {
                command: spec.display(),
                source: cause,
            }),
            ProcessOutcome::Cancelled => Err(ExtractError::Cancelled),
            ProcessOutcome::TimedOut { after } => Err(ExtractError::TimedOut(after)),
        }
    }

    /// Run the pipeline; any failure is logged and yields `None`
    pub async fn fetch(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Option<NormalizedMetadata> {
        match self.extract(path, cancel).await {
            Ok(metadata) => {
                log::info!(
                    "Title applied: {}",
                    metadata.title.as_deref().unwrap_or("<none>")
                );
                Some(metadata)
            }
            Err(e) => {
                log_failure(path, &e);
                None
            }
        }
    }

    /// Run the pipeline and map the result onto a library item
    pub async fn metadata_result(&self, path: &Path, cancel: &CancellationToken) -> MetadataResult {
        MetadataResult::from(self.fetch(path, cancel).await)
    }
}

/// Log why `path` produced no metadata
pub fn log_failure(path: &Path, error: &ExtractError) {
    let (level, message) = failure_log(path, error);
    log::log!(level, "{}", message);
}

/// Level and line `log_failure` emits; analyzer failures name the command
/// and carry its stderr
pub fn failure_log(path: &Path, error: &ExtractError) -> (Level, String) {
    match error {
        ExtractError::NonZeroExit {
            command,
            code,
            stderr,
        } if !stderr.trim().is_empty() => (
            Level::Error,
            format!(
                "Analyzer `{}` exited with code {} for {}: {}",
                command,
                code,
                path.display(),
                stderr.trim_end()
            ),
        ),
        ExtractError::EmptyOutput { stderr } if !stderr.trim().is_empty() => (
            Level::Warn,
            format!(
                "No metadata for {}: {}: {}",
                path.display(),
                error,
                stderr.trim_end()
            ),
        ),
        e if e.is_diagnostic() => (Level::Error, format!("{}: {}", path.display(), e)),
        ExtractError::IneligibleInput(_) | ExtractError::NotConfigured => {
            (Level::Debug, format!("Skipping {}: {}", path.display(), error))
        }
        e => (Level::Info, format!("No metadata for {}: {}", path.display(), e)),
    }
}
