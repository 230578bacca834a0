//! Configuration for the EIT metadata provider
//!
//! Provides TOML-based configuration for the external analyzer command line
//! and the recordings it is run against.

use crate::command::validate_template;
use crate::format::TS_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AribEitConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Analyzer invocation settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalyzerConfig {
    /// Executable followed by fixed arguments; empty disables extraction
    #[serde(default)]
    pub command: String,
    /// Give up on the analyzer after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Recording extensions the analyzer is run against
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            timeout_secs: None,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    TS_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl AnalyzerConfig {
    /// Configuration running `command` with default settings
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.command.trim().is_empty()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_template(&self.command)
            .map_err(|e| anyhow::anyhow!("Invalid analyzer command: {}", e))?;
        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be > 0");
        }
        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            anyhow::bail!("At least one recording extension is required");
        }
        Ok(())
    }
}

impl AribEitConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AribEitConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;
        Ok(config)
    }
}
