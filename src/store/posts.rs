//! JSON-file post store

use crate::extract::Post;
use crate::store::{read_json_file, write_json_file};
use crate::StoreResult;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Persists scraped posts to a pretty-printed JSON array
///
/// Saving merges with whatever is already on disk: existing posts keep their
/// position and their data, new ids are appended in arrival order. The store
/// serializes its own writes; two merge calls never interleave.
pub struct PostStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all stored posts; a missing file is an empty store
    pub async fn load(&self) -> StoreResult<Vec<Post>> {
        read_json_file(&self.path).await
    }

    /// Merges new posts into the store and writes it back
    ///
    /// Returns the number of posts that were actually new.
    pub async fn merge_save(&self, new_posts: &[Post]) -> StoreResult<usize> {
        let _guard = self.write_lock.lock().await;

        let mut merged = read_json_file::<Vec<Post>>(&self.path).await?;
        let mut added = 0;
        for post in new_posts {
            if !merged.iter().any(|existing| existing.id == post.id) {
                merged.push(post.clone());
                added += 1;
            }
        }

        write_json_file(&self.path, &merged).await?;
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn post(id: &str, author: &str) -> Post {
        Post {
            id: id.to_string(),
            reference: "ref".to_string(),
            author: author.to_string(),
            text: "body".to_string(),
            quotes: vec![],
            download_links: vec!["https://mega.nz/file/a#b".to_string()],
            discogs_links: vec![],
            images: vec![],
            album_titles: vec![],
            hoster: "mega.nz".to_string(),
            link_alive: true,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = PostStore::new(dir.path().join("posts.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_save_roundtrip() {
        let dir = tempdir().unwrap();
        let store = PostStore::new(dir.path().join("posts.json"));

        let added = store.merge_save(&[post("p1", "alice")]).await.unwrap();
        assert_eq!(added, 1);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "p1");
    }

    #[tokio::test]
    async fn test_merge_keeps_existing_and_appends_new() {
        let dir = tempdir().unwrap();
        let store = PostStore::new(dir.path().join("posts.json"));

        store.merge_save(&[post("p1", "alice")]).await.unwrap();
        let added = store
            .merge_save(&[post("p1", "impostor"), post("p2", "bob")])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        // The stored p1 wins over the re-scraped one.
        assert_eq!(loaded[0].author, "alice");
        assert_eq!(loaded[1].id, "p2");
    }

    #[tokio::test]
    async fn test_merge_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = PostStore::new(dir.path().join("nested/deeper/posts.json"));
        store.merge_save(&[post("p1", "alice")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "not json").unwrap();
        let store = PostStore::new(path);
        assert!(store.load().await.is_err());
    }
}
