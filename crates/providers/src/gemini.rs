//! Google Gemini provider.
//!
//! Uses the `generateContent` endpoint of the Generative Language API.
//!
//! - `x-goog-api-key` header authentication
//! - System messages go to the top-level `systemInstruction`
//! - Assistant turns use the `model` role
//! - Sampling parameters go in `generationConfig`

use async_trait::async_trait;
use lexdesk_core::error::ProviderError;
use lexdesk_core::message::{Message, Role};
use lexdesk_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl GeminiProvider {
    /// Create a provider with the default endpoint and HTTP timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider whose HTTP client gives up after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Point at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Translate a provider request into a `generateContent` body.
    fn build_body(request: &ProviderRequest) -> GenerateContentRequest {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system.join("\n\n"),
                }],
            })
        };

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GeminiContent {
                role: Some(match m.role {
                    Role::Assistant => "model".into(),
                    _ => "user".into(),
                }),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                top_k: request.top_k,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    /// Map a non-success HTTP status to a provider error.
    fn status_error(status: u16, body: String, model: &str, retry_after: Option<u64>) -> ProviderError {
        match status {
            429 => ProviderError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            401 | 403 => ProviderError::AuthenticationFailed("Invalid Gemini API key".into()),
            400 if body.contains("API_KEY_INVALID") => {
                ProviderError::AuthenticationFailed("Invalid Gemini API key".into())
            }
            404 => ProviderError::ModelNotFound(model.to_string()),
            _ => ProviderError::ApiError {
                status_code: status,
                message: body,
            },
        }
    }

    fn response_to_provider_response(
        resp: GenerateContentResponse,
        requested_model: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let Some(candidate) = resp.candidates.into_iter().next() else {
            if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
                warn!(reason = %reason, "Gemini blocked the prompt");
            }
            return Err(ProviderError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            if let Some(reason) = candidate.finish_reason {
                warn!(reason = %reason, "Gemini returned no text");
            }
            return Err(ProviderError::EmptyResponse);
        }

        let usage = resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage,
            model: resp
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let url = self.endpoint(&request.model);
        let body = Self::build_body(&request);

        debug!(provider = "gemini", model = %request.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status = status.as_u16();
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini API error");
            return Err(Self::status_error(status, error_body, &request.model, retry_after));
        }

        let api_resp: GenerateContentResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: status.as_u16(),
                message: format!("Failed to parse Gemini response: {e}"),
            })?;

        Self::response_to_provider_response(api_resp, &request.model)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        let mut req = ProviderRequest::new(
            "gemini-2.5-flash",
            vec![
                Message::system("You are a legal assistant"),
                Message::system("Cite document names"),
                Message::user("Who is the Seller?"),
                Message::assistant("Global Supplies Inc."),
                Message::user("And the Buyer?"),
            ],
        );
        req.top_p = Some(0.8);
        req.top_k = Some(40);
        req
    }

    #[test]
    fn constructor() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn constructor_with_base_url() {
        let provider = GeminiProvider::new("test-key")
            .unwrap()
            .with_base_url("https://proxy.example.com/");
        assert_eq!(
            provider.endpoint("gemini-2.5-flash"),
            "https://proxy.example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let provider = GeminiProvider::new("secret-key-123").unwrap();
        assert!(!format!("{provider:?}").contains("secret-key-123"));
    }

    #[test]
    fn body_splits_system_instruction_and_maps_roles() {
        let body = serde_json::to_value(GeminiProvider::build_body(&request())).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a legal assistant\n\nCite document names"
        );
        assert!(body["systemInstruction"].get("role").is_none());

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Global Supplies Inc.");
    }

    #[test]
    fn body_carries_generation_config() {
        let body = serde_json::to_value(GeminiProvider::build_body(&request())).unwrap();
        let config = &body["generationConfig"];
        assert_eq!(config["topK"], 40);
        assert!((config["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!(config.get("maxOutputTokens").is_none());
    }

    #[test]
    fn body_without_system_messages_omits_instruction() {
        let req = ProviderRequest::new("gemini-2.5-flash", vec![Message::user("hi")]);
        let body = serde_json::to_value(GeminiProvider::build_body(&req)).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn response_text_and_usage() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Kampala "}, {"text": "Industries Ltd."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 8, "totalTokenCount": 128},
            "modelVersion": "gemini-2.5-flash-001"
        }))
        .unwrap();

        let out = GeminiProvider::response_to_provider_response(resp, "gemini-2.5-flash").unwrap();
        assert_eq!(out.message.content, "Kampala Industries Ltd.");
        assert_eq!(out.message.role, Role::Assistant);
        assert_eq!(out.model, "gemini-2.5-flash-001");
        let usage = out.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.total_tokens, 128);
    }

    #[test]
    fn missing_model_version_falls_back_to_requested() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        }))
        .unwrap();
        let out = GeminiProvider::response_to_provider_response(resp, "gemini-2.5-flash").unwrap();
        assert_eq!(out.model, "gemini-2.5-flash");
        assert!(out.usage.is_none());
    }

    #[test]
    fn blocked_prompt_is_empty_response() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(
            GeminiProvider::response_to_provider_response(resp, "m"),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn blank_candidate_is_empty_response() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        assert!(matches!(
            GeminiProvider::response_to_provider_response(resp, "m"),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            GeminiProvider::status_error(429, String::new(), "m", Some(30)),
            ProviderError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(matches!(
            GeminiProvider::status_error(429, String::new(), "m", None),
            ProviderError::RateLimited { retry_after_secs: 5 }
        ));
        assert!(matches!(
            GeminiProvider::status_error(403, String::new(), "m", None),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            GeminiProvider::status_error(400, "{\"reason\":\"API_KEY_INVALID\"}".into(), "m", None),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            GeminiProvider::status_error(404, String::new(), "gemini-x", None),
            ProviderError::ModelNotFound(m) if m == "gemini-x"
        ));
        assert!(matches!(
            GeminiProvider::status_error(500, "boom".into(), "m", None),
            ProviderError::ApiError { status_code: 500, .. }
        ));
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Drain the request so the client sees a clean close.
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn any_2xx_status_is_parsed_as_success() {
        let base_url = serve_once(
            "201 Created",
            r#"{"candidates":[{"content":{"parts":[{"text":"Clause 4 sets the price."}]}}]}"#,
        )
        .await;
        let provider = GeminiProvider::new("test-key").unwrap().with_base_url(base_url);

        let out = provider.complete(request()).await.unwrap();
        assert_eq!(out.message.content, "Clause 4 sets the price.");
        assert_eq!(out.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn error_status_maps_to_provider_error() {
        let base_url = serve_once("404 Not Found", "{}").await;
        let provider = GeminiProvider::new("test-key").unwrap().with_base_url(base_url);

        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound(m) if m == "gemini-2.5-flash"));
    }
}
