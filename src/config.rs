//! Engine configuration and explicit process setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusSource, FileSource, RemoteFetcher, RemoteSource};
use crate::error::{ParleyError, Result};
use crate::ml::evaluation::{DEFAULT_SEED, DEFAULT_TEST_RATIO};

/// Default location of the local corpus.
pub const DEFAULT_DATA_PATH: &str = "attached_assets/formatted_dataset.jsonl";

/// Default directory for process-wide resources.
pub const DEFAULT_RESOURCE_DIR: &str = "data";

/// Configuration for a [`SupportEngine`](crate::engine::SupportEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Local JSONL corpus, used when no `drive_url` is set.
    pub data_path: PathBuf,
    /// Share link of a remote corpus; takes precedence over `data_path`.
    pub drive_url: Option<String>,
    /// Directory created by [`initialize`].
    pub resource_dir: PathBuf,
    /// Seed of the evaluation split.
    pub seed: u64,
    /// Share of records held out by evaluation.
    pub test_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            drive_url: None,
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            seed: DEFAULT_SEED,
            test_ratio: DEFAULT_TEST_RATIO,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ParleyError::invalid_config(format!(
                "test_ratio must be between 0 and 1 exclusive, got {}",
                self.test_ratio
            )));
        }
        if self.drive_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(ParleyError::invalid_config("drive_url is empty"));
        }
        Ok(())
    }

    /// The corpus source this configuration points at.
    pub fn source(&self, fetcher: Arc<dyn RemoteFetcher>) -> Arc<dyn CorpusSource> {
        match &self.drive_url {
            Some(url) => Arc::new(RemoteSource::new(url.clone(), fetcher)),
            None => Arc::new(FileSource::new(self.data_path.clone())),
        }
    }
}

/// Prepare the process for engines built from `config`.
///
/// Creates the resource directory if it is missing. Safe to call repeatedly.
pub fn initialize(config: &EngineConfig) -> Result<()> {
    config.validate()?;

    if !config.resource_dir.exists() {
        std::fs::create_dir_all(&config.resource_dir)?;
        info!("Created resource directory {}", config.resource_dir.display());
    }

    Ok(())
}
