//! `lexdesk config`: Configuration management commands.

use lexdesk_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Model:      {}", config.default_model);
            println!("   Preset:     {}", config.retrieval.preset);
            println!("   Firm:       {} ({})", config.assistant.firm_name, config.assistant.jurisdiction);
            match &config.documents.path {
                Some(path) => println!("   Documents:  {}", path.display()),
                None if config.documents.seed_demo => println!("   Documents:  demo set"),
                None => println!("   Documents:  none"),
            }
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Problems that do not stop the config from loading.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.has_api_key() {
        warnings.push("No API key set (set LEXDESK_API_KEY or GEMINI_API_KEY)".to_string());
    }

    if let Some(path) = &config.documents.path {
        if !path.exists() {
            warnings.push(format!(
                "Documents file {} does not exist yet (it is created on first write)",
                path.display()
            ));
        }
    } else if !config.documents.seed_demo {
        warnings.push("No documents file and demo documents disabled".to_string());
    }

    if config.retrieval.context_token_budget == Some(0) {
        warnings.push("retrieval.context_token_budget = 0 keeps only the top document".to_string());
    }

    warnings
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("***".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
