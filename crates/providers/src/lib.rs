//! Generative-answer providers for lexdesk.
//!
//! All providers implement the `lexdesk_core::Provider` trait.
//! [`build_from_config`] wires the configured one.

pub mod gemini;

pub use gemini::GeminiProvider;

use lexdesk_config::AppConfig;
use lexdesk_core::error::ProviderError;
use lexdesk_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Build the provider described by `config`.
///
/// Fails with `NotConfigured` when no API key is set.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured(
                "no API key; set LEXDESK_API_KEY or GEMINI_API_KEY, or api_key in config.toml"
                    .into(),
            )
        })?;

    let mut provider = GeminiProvider::with_timeout(
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )?;
    if let Some(url) = &config.provider.api_url {
        provider = provider.with_base_url(url);
    }

    debug!(
        provider = "gemini",
        model = %config.default_model,
        "Provider built from config"
    );
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let config = AppConfig::default();
        assert!(matches!(
            build_from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let mut config = AppConfig::default();
        config.api_key = Some("   ".into());
        assert!(build_from_config(&config).is_err());
    }

    #[test]
    fn builds_gemini_provider() {
        let mut config = AppConfig::default();
        config.api_key = Some("test-key".into());
        config.provider.api_url = Some("http://localhost:8080".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
