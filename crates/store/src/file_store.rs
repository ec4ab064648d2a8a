//! JSON file store: documents persisted as a single JSON array.
//!
//! The file uses the dashboard's field names (`caseId`, `type`,
//! `uploadDate`), so exports from the web UI load directly. Documents are
//! read into memory on open and the whole file is rewritten on every
//! mutation.

use async_trait::async_trait;
use lexdesk_core::document::{Document, DocumentPatch};
use lexdesk_core::error::StoreError;
use lexdesk_core::store::DocumentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::in_memory::{insert_front, patch_in_place};

/// A file-backed document store.
pub struct JsonFileStore {
    path: PathBuf,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty (created on first write). Array elements
    /// that are not valid documents are skipped with a warning; a file that
    /// is not a JSON array at all is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let documents = Self::load_from_disk(&path)?;
        debug!(path = %path.display(), count = documents.len(), "JSON document store loaded");
        Ok(Self {
            path,
            documents: Arc::new(RwLock::new(documents)),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Result<Vec<Document>, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))?;

        Ok(raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Document>(value) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed document entry");
                    None
                }
            })
            .collect())
    }

    /// Write `documents` to disk.
    fn persist(&self, documents: &[Document]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Storage(format!("Failed to create document directory: {e}"))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(documents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::Storage(format!("Failed to write document file: {e}")))?;

        Ok(())
    }

    /// Apply `change` to a copy of the documents, write the copy, and only
    /// then replace the in-memory state. `change` reports whether it
    /// modified anything; unmodified copies are not written. A failed write
    /// leaves both the file and memory untouched.
    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut Vec<Document>) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let mut documents = self.documents.write().await;
        let mut next = documents.clone();
        let (outcome, modified) = change(&mut next)?;
        if modified {
            self.persist(&next)?;
            *documents = next;
        }
        Ok(outcome)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn insert(&self, document: Document) -> Result<String, StoreError> {
        self.commit(|documents| Ok((insert_front(documents, document)?, true)))
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.read().await.clone())
    }

    async fn update(&self, id: &str, patch: DocumentPatch) -> Result<bool, StoreError> {
        self.commit(|documents| {
            let updated = patch_in_place(documents, id, patch);
            Ok((updated, updated))
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.commit(|documents| {
            let len_before = documents.len();
            documents.retain(|d| d.id != id);
            let deleted = documents.len() < len_before;
            Ok((deleted, deleted))
        })
        .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.documents.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_core::document::DocumentCategory;

    fn sample(name: &str) -> Document {
        Document::new(name, "case-1", DocumentCategory::Affidavit, "Sworn statement").with_id("")
    }

    #[tokio::test]
    async fn insert_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");

        let store = JsonFileStore::open(&path).unwrap();
        let id = store.insert(sample("Affidavit.pdf")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Affidavit.pdf"));
        assert!(content.contains("\"caseId\""));

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(&id).await.unwrap().unwrap().name, "Affidavit.pdf");
    }

    #[tokio::test]
    async fn delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");

        let store = JsonFileStore::open(&path).unwrap();
        let id = store.insert(sample("gone.pdf")).await.unwrap();
        assert!(store.delete(&id).await.unwrap());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_write_leaves_documents_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");

        let store = JsonFileStore::open(&path).unwrap();
        let id = store.insert(sample("kept.pdf")).await.unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.insert(sample("lost.pdf")).await,
            Err(StoreError::Storage(_))
        ));
        assert!(store
            .update(
                &id,
                DocumentPatch {
                    name: Some("renamed.pdf".into()),
                    ..DocumentPatch::default()
                },
            )
            .await
            .is_err());
        assert!(store.delete(&id).await.is_err());

        assert_eq!(store.count().await.unwrap(), 1);
        let docs = store.list().await.unwrap();
        assert_eq!(docs[0].name, "kept.pdf");
        assert_eq!(store.get(&id).await.unwrap().unwrap().name, "kept.pdf");
    }

    #[tokio::test]
    async fn noop_update_and_delete_do_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert!(!store.update("missing", DocumentPatch::default()).await.unwrap());
        assert!(!store.delete("missing").await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nope.json")).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(
            &path,
            r#"[
                {"id":"doc-1","name":"a.pdf","caseId":"case-1","type":"Contract","content":"x","uploadDate":"2023-01-15T00:00:00Z"},
                {"id":"doc-2","name":"b.pdf"},
                {"id":"doc-3","name":"c.pdf","caseId":"case-2","type":"Motion","content":"y"}
            ]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.get("doc-2").await.unwrap().is_none());
    }

    #[test]
    fn non_array_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
