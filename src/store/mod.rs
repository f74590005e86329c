//! JSON-file persistence for posts and visited pages
//!
//! Both stores follow the same shape: a single pretty-printed JSON file,
//! loaded whole, merged in memory, written back whole. A missing file reads
//! as empty; a corrupt file is an error rather than silent data loss.

mod posts;
mod visited;

pub use posts::PostStore;
pub use visited::VisitedStore;

use crate::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

async fn read_json_file<T>(path: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(io_error(path, e)),
    }
}

async fn write_json_file<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| io_error(path, e))
}
