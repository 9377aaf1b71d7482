//! CLI configuration file

use anyhow::Context;
use onboard_session::SessionConfig;
use onboard_validation::ValidationConfig;
use serde::Deserialize;
use std::path::Path;

/// Top-level YAML configuration; every section is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub validation: ValidationConfig,
    pub session: SessionConfig,
}

impl CliConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration")
    }

    /// Load configuration from a file, or defaults when no path is given
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }
}
