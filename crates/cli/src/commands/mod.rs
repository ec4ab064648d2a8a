//! Subcommand implementations.

pub mod ask;
pub mod config_cmd;
pub mod context;
pub mod documents;
pub mod rank;
pub mod validate;

use std::path::Path;

use lexdesk_config::{AppConfig, ScoringPreset};
use lexdesk_core::error::StoreError;
use lexdesk_core::store::DocumentStore;
use lexdesk_store::{InMemoryDocumentStore, JsonFileStore, demo_documents};
use tracing::debug;

/// Load configuration and apply a `--preset` override.
pub fn load_config(preset: Option<ScoringPreset>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(preset) = preset {
        config.retrieval.preset = preset;
    }
    Ok(config)
}

/// Open the document source: `--documents` first, then the configured
/// file, then the demo set (unless disabled), else an empty collection.
pub fn open_store(
    config: &AppConfig,
    documents: Option<&Path>,
) -> Result<Box<dyn DocumentStore>, StoreError> {
    if let Some(path) = documents.or(config.documents.path.as_deref()) {
        debug!(path = %path.display(), "Opening document file");
        return Ok(Box::new(JsonFileStore::open(path)?));
    }

    if config.documents.seed_demo {
        debug!("Using demo documents");
        Ok(Box::new(InMemoryDocumentStore::from_documents(demo_documents())))
    } else {
        Ok(Box::new(InMemoryDocumentStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_documents_by_default() {
        let store = open_store(&AppConfig::default(), None).unwrap();
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_when_demo_disabled() {
        let mut config = AppConfig::default();
        config.documents.seed_demo = false;
        let store = open_store(&config, None).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn documents_flag_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let flagged = dir.path().join("flagged.json");
        std::fs::write(
            &flagged,
            r#"[{"id":"doc-9","name":"Motion.pdf","caseId":"case-7","type":"Motion","content":"Motion to dismiss"}]"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.documents.path = Some(dir.path().join("configured.json"));

        let store = open_store(&config, Some(&flagged)).unwrap();
        assert_eq!(store.name(), "json_file");
        assert!(store.get("doc-9").await.unwrap().is_some());
    }
}
