use std::fmt;

/// Text-generation backend selected for a review run.
///
/// Chosen at startup from `LLM_PROVIDER` (`openai` | `anthropic`).
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// assert_eq!(LlmProvider::parse("Anthropic"), Some(LlmProvider::Anthropic));
/// assert_eq!(LlmProvider::parse("ollama"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI chat completions API.
    OpenAI,
    /// Anthropic messages API.
    Anthropic,
}

impl LlmProvider {
    /// Parses a provider name, case-insensitively. Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI => f.write_str("openai"),
            Self::Anthropic => f.write_str("anthropic"),
        }
    }
}
