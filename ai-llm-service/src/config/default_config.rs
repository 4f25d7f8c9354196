//! Default LLM configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! one per supported provider, and a selector driven by `LLM_PROVIDER`.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = provider kind (`openai` | `anthropic`, default `openai`)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, default 120)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = API key (mandatory)
//! - `OPENAI_MODEL`    = model (default `gpt-4o-mini`)
//! - `OPENAI_BASE_URL` = endpoint (default `https://api.openai.com`)
//!
//! Anthropic-specific:
//! - `ANTHROPIC_API_KEY`  = API key (mandatory)
//! - `ANTHROPIC_MODEL`    = model (default `claude-3-5-sonnet-20241022`)
//! - `ANTHROPIC_BASE_URL` = endpoint (default `https://api.anthropic.com`)
//!
//! Every constructor has a `*_from` twin taking a lookup closure, so callers
//! (and tests) can resolve variables from somewhere other than the process
//! environment.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, opt_u64, must_var, validate_http_endpoint},
};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Resolves the provider named by `LLM_PROVIDER` and builds its config.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown provider name
/// - whatever the provider-specific constructor returns
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from(process_env)
}

/// Same as [`config_from_env`] with an explicit variable lookup.
pub fn config_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(&lookup, "LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
    match LlmProvider::parse(&raw) {
        Some(LlmProvider::OpenAI) => config_openai_from(lookup),
        Some(LlmProvider::Anthropic) => config_anthropic_from(lookup),
        None => Err(ConfigError::UnsupportedProvider(raw).into()),
    }
}

/// Constructs a config for the OpenAI chat completions API.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_MODEL`, `OPENAI_BASE_URL`, `LLM_TIMEOUT_SECS` (optional)
pub fn config_openai() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_from(process_env)
}

/// Same as [`config_openai`] with an explicit variable lookup.
pub fn config_openai_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(&lookup, "OPENAI_API_KEY")?;
    let model = non_empty(&lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
    let endpoint = non_empty(&lookup, "OPENAI_BASE_URL")
        .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.into());
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    let timeout_secs = opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        system_prompt: None,
        timeout_secs,
    })
}

/// Constructs a config for the Anthropic messages API.
///
/// # Env
/// - `ANTHROPIC_API_KEY` (required)
/// - `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`, `LLM_TIMEOUT_SECS` (optional)
pub fn config_anthropic() -> Result<LlmModelConfig, AiLlmError> {
    config_anthropic_from(process_env)
}

/// Same as [`config_anthropic`] with an explicit variable lookup.
pub fn config_anthropic_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(&lookup, "ANTHROPIC_API_KEY")?;
    let model =
        non_empty(&lookup, "ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.into());
    let endpoint = non_empty(&lookup, "ANTHROPIC_BASE_URL")
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_ENDPOINT.into());
    validate_http_endpoint("ANTHROPIC_BASE_URL", &endpoint)?;
    let timeout_secs = opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    Ok(LlmModelConfig {
        provider: LlmProvider::Anthropic,
        model,
        endpoint,
        api_key: Some(api_key),
        system_prompt: None,
        timeout_secs,
    })
}
