//! LLM provider selection
//!
//! All supported providers speak the OpenAI chat-completions protocol; they
//! differ in base URL, default model and the key that unlocks them. The
//! provider is chosen once, at composition time, from whichever key is
//! configured.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A chat-completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Gemini,
    OpenAi,
    Groq,
}

impl LlmProvider {
    /// Providers in selection priority order
    pub const PRIORITY: [LlmProvider; 3] = [LlmProvider::Gemini, LlmProvider::OpenAi, LlmProvider::Groq];

    /// Base URL of the provider's OpenAI-compatible API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-1.5-flash",
            LlmProvider::OpenAi => "gpt-4",
            LlmProvider::Groq => "mixtral-8x7b-32768",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Groq => "groq",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider credentials and overrides, as read from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    /// Overrides the provider's default model
    pub model: Option<String>,
    /// Overrides the provider's base URL
    pub base_url: Option<String>,
}

impl LlmSettings {
    /// Picks the highest-priority provider with a non-blank key
    ///
    /// Returns the provider and its key, or `None` when no key is set.
    pub fn select(&self) -> Option<(LlmProvider, &str)> {
        LlmProvider::PRIORITY.into_iter().find_map(|provider| {
            self.api_key(provider)
                .filter(|key| !key.trim().is_empty())
                .map(|key| (provider, key))
        })
    }

    fn api_key(&self, provider: LlmProvider) -> Option<&str> {
        match provider {
            LlmProvider::Gemini => self.gemini_api_key.as_deref(),
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
            LlmProvider::Groq => self.groq_api_key.as_deref(),
        }
    }
}
