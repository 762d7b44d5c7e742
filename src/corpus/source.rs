//! Corpus sources.
//!
//! A [`CorpusSource`] is re-read on every retrain, so implementations must
//! return a fresh [`Dataset`] each time they are asked.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::corpus::record::{Dataset, ParsePolicy, parse_jsonl};
use crate::error::{ParleyError, Result};

/// Something that can produce the current corpus.
pub trait CorpusSource: Send + Sync + Debug {
    /// Load the full dataset.
    fn load(&self) -> Result<Dataset>;

    /// Human-readable description of where the data comes from.
    fn describe(&self) -> String;
}

/// A JSONL corpus on local storage.
///
/// Parsing is strict: one malformed line fails the whole load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    policy: ParsePolicy,
}

impl FileSource {
    /// Create a source reading `path` with the strict parse policy.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSource {
            path: path.into(),
            policy: ParsePolicy::Strict,
        }
    }

    /// Override the parse policy.
    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The corpus path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for FileSource {
    fn load(&self) -> Result<Dataset> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ParleyError::source_unavailable(format!(
                "corpus file not found: {}",
                self.path.display()
            )),
            _ => ParleyError::Io(e),
        })?;

        let dataset = parse_jsonl(&content, self.policy)?;
        log::info!(
            "Loaded {} entries from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// An in-memory corpus.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    /// Wrap an already-built dataset.
    pub fn new(dataset: Dataset) -> Self {
        StaticSource { dataset }
    }
}

impl CorpusSource for StaticSource {
    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} records", self.dataset.len())
    }
}
