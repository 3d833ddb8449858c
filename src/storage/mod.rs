//! Local snapshot of the statistics API.
//!
//! Fighters, events and bouts are stored as JSONL files under the data
//! directory, one entity per line, in the same JSON shape the API serves.

mod jsonl;
mod snapshot;

pub use jsonl::*;
pub use snapshot::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// JSONL file holding one entity type.
    pub fn path_for(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }

    pub fn fighters_path(&self) -> PathBuf {
        self.path_for(EntityType::Fighter)
    }

    pub fn events_path(&self) -> PathBuf {
        self.path_for(EntityType::Event)
    }

    pub fn bouts_path(&self) -> PathBuf {
        self.path_for(EntityType::Bout)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
