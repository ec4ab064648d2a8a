//! DocumentStore trait: the repository the assistant reads documents from.
//!
//! Retrieval never holds on to a store; callers list documents and hand the
//! slice to the ranker. Implementations: in-memory, JSON file.

use async_trait::async_trait;
use crate::document::{Document, DocumentPatch};
use crate::error::StoreError;

/// The core DocumentStore trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g., "in_memory", "json_file").
    fn name(&self) -> &str;

    /// Insert a new document. An empty id is replaced with a generated one.
    /// Returns the stored id.
    async fn insert(&self, document: Document) -> std::result::Result<String, StoreError>;

    /// Get a document by id.
    async fn get(&self, id: &str) -> std::result::Result<Option<Document>, StoreError>;

    /// List all documents, most recently inserted first.
    async fn list(&self) -> std::result::Result<Vec<Document>, StoreError>;

    /// List the documents filed under a case.
    async fn list_by_case(&self, case_id: &str) -> std::result::Result<Vec<Document>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|d| d.case_id == case_id)
            .collect())
    }

    /// Apply a partial update. Returns `false` if no document has that id.
    async fn update(&self, id: &str, patch: DocumentPatch) -> std::result::Result<bool, StoreError>;

    /// Delete a document by id. Returns `false` if no document has that id.
    async fn delete(&self, id: &str) -> std::result::Result<bool, StoreError>;

    /// Total document count.
    async fn count(&self) -> std::result::Result<usize, StoreError>;
}
