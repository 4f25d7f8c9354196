use crate::config::llm_provider::LlmProvider;

/// Configuration for one text-generation backend.
///
/// # Fields
///
/// - `provider`: which backend to call.
/// - `model`: model identifier (e.g. `"gpt-4o-mini"`).
/// - `endpoint`: API base URL without the route (e.g. `"https://api.openai.com"`).
/// - `api_key`: key sent with every request; both supported providers need one.
/// - `system_prompt`: optional system instruction prepended to every request.
/// - `timeout_secs`: optional request timeout in seconds.
///
/// Sampling parameters (temperature, max tokens) are per call and travel
/// through [`crate::TextGenerator::generate`].
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     system_prompt: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.provider, LlmProvider::OpenAI);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend (OpenAI or Anthropic).
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// System instruction sent alongside the user prompt.
    pub system_prompt: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Returns a copy with the given system instruction.
    pub fn with_system_prompt(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }
}
