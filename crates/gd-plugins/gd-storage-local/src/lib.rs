//! # gd-storage-local
//! Local filesystem implementation of `BlobStore`.
//! Object names are timestamp-prefixed, which avoids collisions
//! deterministically without a coordination service.

use async_trait::async_trait;
use chrono::Utc;
use gd_core::traits::{BlobStore, StoredBlob};
use std::path::PathBuf;
use tokio::fs;

pub struct LocalBlobStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root_path: root, url_prefix }
    }

    /// Flattens anything path-like out of client-supplied names so an
    /// upload can never escape its folder.
    fn sanitize(segment: &str) -> String {
        let cleaned: String = segment
            .chars()
            .map(|c| match c {
                '/' | '\\' => '_',
                c => c,
            })
            .collect();
        let trimmed = cleaned.trim_matches('.').trim();
        if trimmed.is_empty() {
            "file".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    /// Saves an upload as `<millis>_<original_name>` under `folder`.
    async fn save(
        &self,
        folder: &str,
        original_name: &str,
        data: Vec<u8>,
    ) -> anyhow::Result<StoredBlob> {
        let name = format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            Self::sanitize(original_name)
        );
        let folder = Self::sanitize(folder);

        let mut target = self.root_path.clone();
        target.push(&folder);
        fs::create_dir_all(&target).await?;
        target.push(&name);
        fs::write(&target, &data).await?;

        let path = format!("{folder}/{name}");
        let url = self.url_for(&path);
        Ok(StoredBlob { path, url })
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let mut target = self.root_path.clone();
        for segment in path.split('/') {
            target.push(Self::sanitize(segment));
        }
        fs::remove_file(&target).await?;
        Ok(())
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> (LocalBlobStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("gd_storage_test_{tag}"));
        let _ = std::fs::remove_dir_all(&root);
        (
            LocalBlobStore::new(root.clone(), "/static/uploads".to_string()),
            root,
        )
    }

    #[tokio::test]
    async fn save_prefixes_a_timestamp_and_returns_a_url() {
        let (store, root) = temp_store("save");

        let before = Utc::now().timestamp_millis();
        let blob = store
            .save("posters", "cap-a.png", b"png bytes".to_vec())
            .await
            .unwrap();
        let after = Utc::now().timestamp_millis();

        let name = blob.path.strip_prefix("posters/").unwrap();
        let (millis, rest) = name.split_once('_').unwrap();
        let millis: i64 = millis.parse().unwrap();
        assert!(millis >= before && millis <= after);
        assert_eq!(rest, "cap-a.png");
        assert_eq!(blob.url, format!("/static/uploads/{}", blob.path));

        let on_disk = std::fs::read(root.join(&blob.path)).unwrap();
        assert_eq!(on_disk, b"png bytes");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn delete_removes_the_object() {
        let (store, root) = temp_store("delete");
        let blob = store
            .save("ebooks", "guide.pdf", b"pdf".to_vec())
            .await
            .unwrap();

        store.delete(&blob.path).await.unwrap();
        assert!(!root.join(&blob.path).exists());
        // Deleting again is an error the caller surfaces as a failed op.
        assert!(store.delete(&blob.path).await.is_err());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn path_like_names_cannot_escape_the_folder() {
        let (store, root) = temp_store("escape");
        let blob = store
            .save("posters", "../../etc/passwd", b"nope".to_vec())
            .await
            .unwrap();

        assert!(blob.path.starts_with("posters/"));
        assert!(root.join(&blob.path).exists());

        let _ = std::fs::remove_dir_all(root);
    }
}
