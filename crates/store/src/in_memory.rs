//! In-memory document store: the dashboard's default, reset on restart.

use async_trait::async_trait;
use lexdesk_core::document::{Document, DocumentPatch};
use lexdesk_core::error::StoreError;
use lexdesk_core::store::DocumentStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory store that keeps documents in a Vec, newest first.
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::from_documents(Vec::new())
    }

    /// Create a store pre-populated with documents, kept in the given order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert at the front, assigning an id when missing. Shared with the file store.
pub(crate) fn insert_front(
    documents: &mut Vec<Document>,
    mut document: Document,
) -> Result<String, StoreError> {
    if document.id.is_empty() {
        document.id = Document::generate_id();
    } else if documents.iter().any(|d| d.id == document.id) {
        return Err(StoreError::Duplicate(document.id));
    }
    let id = document.id.clone();
    documents.insert(0, document);
    Ok(id)
}

/// Apply a patch to the document with the given id. Shared with the file store.
pub(crate) fn patch_in_place(documents: &mut [Document], id: &str, patch: DocumentPatch) -> bool {
    match documents.iter_mut().find(|d| d.id == id) {
        Some(doc) => {
            doc.apply(patch);
            true
        }
        None => false,
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn insert(&self, document: Document) -> Result<String, StoreError> {
        insert_front(&mut *self.documents.write().await, document)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.read().await.clone())
    }

    async fn update(&self, id: &str, patch: DocumentPatch) -> Result<bool, StoreError> {
        Ok(patch_in_place(&mut self.documents.write().await, id, patch))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        let len_before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < len_before)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.documents.read().await.len())
    }
}
