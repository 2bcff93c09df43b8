//! Chat-completion coverage interpreter
//!
//! Sends the interpretation prompt to an OpenAI-compatible
//! `/chat/completions` endpoint and returns the first choice's content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use core_kernel::{AdapterConfig, DomainPort, PortError};
use domain_claims::{CoverageInterpreter, SYSTEM_PROMPT};

use crate::http::{build_client, endpoint, post_json};
use crate::provider::{LlmProvider, LlmSettings};

/// Sampling temperature; low so repeated runs agree
const TEMPERATURE: f32 = 0.1;

/// Connection settings for a chat-completion endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub adapter: AdapterConfig,
}

impl ChatCompletionConfig {
    /// Default endpoint and model for a provider
    pub fn for_provider(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            adapter: AdapterConfig::named(format!("{provider}-chat")),
        }
    }

    /// Builds the config for the highest-priority configured provider
    ///
    /// Returns `None` when no API key is set.
    pub fn from_settings(settings: &LlmSettings) -> Option<Self> {
        let (provider, key) = settings.select()?;
        let mut config = Self::for_provider(provider, key);
        if let Some(model) = settings.model.as_ref().filter(|m| !m.trim().is_empty()) {
            config.model = model.clone();
        }
        if let Some(base_url) = settings.base_url.as_ref().filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.clone();
        }
        Some(config)
    }

    pub fn with_adapter(mut self, adapter: AdapterConfig) -> Self {
        self.adapter = adapter;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// `CoverageInterpreter` backed by a chat-completion API
#[derive(Debug)]
pub struct ChatCompletionInterpreter {
    client: reqwest::Client,
    config: ChatCompletionConfig,
    url: String,
}

impl ChatCompletionInterpreter {
    /// Creates the interpreter
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` when the HTTP client cannot be built
    pub fn new(config: ChatCompletionConfig) -> Result<Self, PortError> {
        let client = build_client(&config.adapter)?;
        let url = endpoint(&config.base_url, "chat/completions");
        Ok(Self { client, config, url })
    }

    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl DomainPort for ChatCompletionInterpreter {}

#[async_trait]
impl CoverageInterpreter for ChatCompletionInterpreter {
    #[instrument(skip(self, prompt), fields(provider = %self.config.provider, model = %self.config.model))]
    async fn interpret(&self, prompt: &str) -> Result<String, PortError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response: ChatResponse = post_json(
            &self.client,
            &self.url,
            Some(&self.config.api_key),
            &request,
            &self.config.adapter,
            "chat completion",
        )
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PortError::transformation("chat completion returned no content"))?;

        debug!(chars = content.len(), "Chat completion received");
        Ok(content)
    }
}
