//! Anthropic (Claude) service for text generation.
//!
//! Non-streaming client for the Messages API:
//! - POST {endpoint}/v1/messages
//!
//! Authentication uses the `x-api-key` header plus a pinned
//! `anthropic-version`. The system prompt travels in the top-level
//! `system` field rather than as a message.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// API version sent with every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Thin client for the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_messages: String,
}

impl AnthropicService {
    /// Creates a new [`AnthropicService`] from the given config.
    ///
    /// # Errors
    /// Same validation rules as the OpenAI service: provider must match,
    /// API key must be present, endpoint must be http/https.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Anthropic {
            return Err(
                ProviderError::new(Provider::Anthropic, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(Provider::Anthropic, ProviderErrorKind::MissingApiKey)
        })?;

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::new(
                Provider::Anthropic,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    Provider::Anthropic,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_messages = format!("{}/v1/messages", endpoint.trim_end_matches('/'));

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "AnthropicService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_messages,
        })
    }

    /// Sends a single-turn message and returns the concatenated text blocks.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - `Decode` if the body is not a Messages API response
    /// - `EmptyChoices` if no text block is present
    pub async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = MessagesRequest::from_cfg(&self.cfg, prompt, temperature, max_tokens);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_messages
        );

        let resp = self
            .client
            .post(&self.url_messages)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_messages.clone();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Anthropic /v1/messages returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Anthropic,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: MessagesResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Anthropic,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `content[].text`")),
            )
        })?;

        let text = joined_text(out).ok_or_else(|| {
            ProviderError::new(Provider::Anthropic, ProviderErrorKind::EmptyChoices)
        })?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            output_len = text.len(),
            "message completed"
        );

        Ok(text)
    }
}

/// Concatenates all `text` blocks; `None` if there are none.
fn joined_text(out: MessagesResponse) -> Option<String> {
    let text: String = out
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<UserMessage<'a>>,
}

impl<'a> MessagesRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: &cfg.model,
            max_tokens,
            temperature,
            system: cfg.system_prompt.as_deref(),
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "claude-3-5-sonnet-20241022".into(),
            endpoint: "https://api.anthropic.com".into(),
            api_key: Some("key".into()),
            system_prompt: None,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn system_field_is_omitted_when_unset() {
        let cfg = cfg();
        let json = serde_json::to_value(MessagesRequest::from_cfg(&cfg, "hi", 0.2, 100)).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 100);
    }

    #[test]
    fn text_blocks_are_joined() {
        let out: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"[{\"a\":"},{"type":"tool_use"},{"type":"text","text":"1}]"}]}"#,
        )
        .unwrap();
        assert_eq!(joined_text(out).as_deref(), Some(r#"[{"a":1}]"#));
    }

    #[test]
    fn empty_content_yields_none() {
        let out: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(joined_text(out).is_none());
    }

    #[test]
    fn rejects_openai_config() {
        let mut c = cfg();
        c.provider = LlmProvider::OpenAI;
        assert!(AnthropicService::new(c).is_err());
    }
}
