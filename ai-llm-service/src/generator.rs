//! Provider-agnostic text generation.
//!
//! [`TextGenerator`] is the seam the reviewer depends on; [`LlmClient`]
//! dispatches to a concrete backend chosen from [`LlmModelConfig::provider`].

use std::future::Future;

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{anthropic_service::AnthropicService, open_ai_service::OpenAiService},
};

/// Anything that can turn a prompt into text.
///
/// Implementations must be usable across tasks, hence `Send + Sync`.
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`.
    fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, AiLlmError>> + Send;
}

/// Concrete backend selected at startup.
#[derive(Debug)]
pub enum LlmClient {
    OpenAI(OpenAiService),
    Anthropic(AnthropicService),
}

impl LlmClient {
    /// Builds the backend named by `cfg.provider`.
    ///
    /// # Errors
    /// Propagates the backend constructor's validation errors.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        debug!(provider = %cfg.provider, model = %cfg.model, "building LLM client");
        match cfg.provider {
            LlmProvider::OpenAI => Ok(Self::OpenAI(OpenAiService::new(cfg)?)),
            LlmProvider::Anthropic => Ok(Self::Anthropic(AnthropicService::new(cfg)?)),
        }
    }

    /// Provider this client talks to.
    pub fn provider(&self) -> LlmProvider {
        match self {
            Self::OpenAI(_) => LlmProvider::OpenAI,
            Self::Anthropic(_) => LlmProvider::Anthropic,
        }
    }
}

impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiLlmError> {
        match self {
            Self::OpenAI(svc) => svc.generate(prompt, temperature, max_tokens).await,
            Self::Anthropic(svc) => svc.generate(prompt, temperature, max_tokens).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_provider() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "m".into(),
            endpoint: "http://localhost:9".into(),
            api_key: Some("k".into()),
            system_prompt: None,
            timeout_secs: Some(1),
        };
        let client = LlmClient::from_config(cfg).unwrap();
        assert_eq!(client.provider(), LlmProvider::Anthropic);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "m".into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("k".into()),
            system_prompt: None,
            timeout_secs: Some(2),
        };
        let client = LlmClient::from_config(cfg).unwrap();
        let err = client.generate("x", 0.2, 10).await.unwrap_err();
        assert!(matches!(err, AiLlmError::HttpTransport(_)));
    }
}
