//! JSON-file visited-URL store

use crate::store::{read_json_file, write_json_file};
use crate::StoreResult;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Persists the set of already-scanned page URLs
///
/// Kept separate from the post store so an interrupted run can record pages
/// as visited even when no post survived extraction on them.
pub struct VisitedStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl VisitedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the visited set; a missing file is an empty set
    pub async fn load(&self) -> StoreResult<HashSet<String>> {
        Ok(read_json_file::<Vec<String>>(&self.path)
            .await?
            .into_iter()
            .collect())
    }

    /// Unions new URLs into the stored set and writes it back
    ///
    /// Returns the number of URLs that were actually new.
    pub async fn merge_save(&self, visited: &HashSet<String>) -> StoreResult<usize> {
        let _guard = self.write_lock.lock().await;

        let mut merged: Vec<String> = read_json_file(&self.path).await?;
        let mut added = 0;
        for url in visited {
            if !merged.iter().any(|existing| existing == url) {
                merged.push(url.clone());
                added += 1;
            }
        }

        write_json_file(&self.path, &merged).await?;
        Ok(added)
    }
}
