//! Page record persistence.
//!
//! The service talks to storage only through [`PageStore`]. The single
//! backend, [`JsonFileStore`], keeps the whole table in one JSON file.

mod json_file;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::models::page::{NewPage, PageRecord};

pub use json_file::JsonFileStore;

/// File name of the table inside the data directory.
pub const TRACKER_FILE: &str = "recruiter-tracker.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Page table at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode page table: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Could not find a free page id after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },

    #[error("A page needs exactly {expected} videos, got {got}")]
    VideoCount { expected: usize, got: usize },
}

/// Key-value access to page records.
///
/// Records are never deleted. `views` and `last_viewed` are written only by
/// `record_view`.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Assigns a fresh id, stamps `created_at`, zeroes the view counter and
    /// persists the record.
    async fn create(&self, page: NewPage) -> Result<PageRecord, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<PageRecord>, StoreError>;

    /// All records in creation order.
    async fn list(&self) -> Result<Vec<PageRecord>, StoreError>;

    /// Counts one view and returns the updated record, or `None` if the id
    /// is unknown.
    async fn record_view(&self, id: &str) -> Result<Option<PageRecord>, StoreError>;
}

/// Ensures `data_dir` exists and opens the tracker file inside it.
pub async fn open_store(data_dir: &Path) -> Result<JsonFileStore, StoreError> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|source| StoreError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;

    let store = JsonFileStore::new(data_dir.join(TRACKER_FILE));
    info!("Page table at {}", store.path().display());
    Ok(store)
}
