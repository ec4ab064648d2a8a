//! Document store implementations for lexdesk.

pub mod demo;
pub mod file_store;
pub mod in_memory;

pub use demo::demo_documents;
pub use file_store::JsonFileStore;
pub use in_memory::InMemoryDocumentStore;
