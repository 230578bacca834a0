//! AribEit Core - broadcast program metadata for transport-stream recordings
//!
//! This crate runs an external EIT analyzer against a recorded `.ts` file and
//! turns its JSON report into a normalized metadata record.

pub mod command;
pub mod config;
pub mod decoder;
pub mod error;
pub mod format;
pub mod metadata;
pub mod payload;
pub mod provider;
pub mod runner;

pub use command::CommandSpec;
pub use config::{AnalyzerConfig, AribEitConfig};
pub use decoder::decode;
pub use error::{CommandError, DecodeError, ExtractError};
pub use format::is_transport_stream;
pub use metadata::{MetadataResult, NormalizedMetadata, ProgramItem};
pub use provider::{log_failure, MetadataProvider};
pub use runner::ProcessOutcome;

use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Extract program metadata from a recording
pub async fn extract_metadata(
    path: &Path,
    config: &AnalyzerConfig,
) -> Result<NormalizedMetadata, ExtractError> {
    let provider = MetadataProvider::new(config.clone());
    provider.extract(path, &CancellationToken::new()).await
}
