//! Adapter wiring
//!
//! Builds the claim analyzer from configuration. The interpreter is the
//! chat-completion adapter of the highest-priority configured provider;
//! with no key configured every item resolves to default coverage. Policy
//! passages come from the external search service when a URL is set and
//! from the shared in-memory index otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use core_kernel::{AdapterConfig, DomainPort, PortError};
use domain_claims::{ClaimAnalyzer, CoverageInterpreter};
use domain_policy::{PolicyIndex, PolicyRetriever};
use infra_ai::{ChatCompletionConfig, ChatCompletionInterpreter, HttpPolicyRetriever, RetrieverConfig};

use crate::config::ApiConfig;

/// Interpreter used when no provider key is configured
///
/// Every call fails, so the resolver falls back to default coverage.
#[derive(Debug, Default)]
pub struct UnconfiguredInterpreter;

impl DomainPort for UnconfiguredInterpreter {}

#[async_trait]
impl CoverageInterpreter for UnconfiguredInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String, PortError> {
        Err(PortError::ServiceUnavailable {
            service: "llm (no provider key configured)".to_string(),
        })
    }
}

/// Selects the coverage interpreter for the configuration
pub fn build_interpreter(config: &ApiConfig) -> Result<Arc<dyn CoverageInterpreter>, PortError> {
    match ChatCompletionConfig::from_settings(&config.llm) {
        Some(chat) => {
            let adapter = AdapterConfig {
                timeout_ms: config.analyzer.resolver.interpretation_timeout_ms,
                ..chat.adapter.clone()
            };
            let chat = chat.with_adapter(adapter);
            let interpreter = ChatCompletionInterpreter::new(chat)?;
            info!(
                provider = %interpreter.provider(),
                model = interpreter.model(),
                "Coverage interpreter configured"
            );
            Ok(Arc::new(interpreter))
        }
        None => {
            warn!("No LLM provider key configured; claims will use default coverage");
            Ok(Arc::new(UnconfiguredInterpreter))
        }
    }
}

/// Selects the policy retriever for the configuration
pub fn build_retriever(
    config: &ApiConfig,
    index: Arc<PolicyIndex>,
) -> Result<Arc<dyn PolicyRetriever>, PortError> {
    match config.external_retriever() {
        Some(url) => {
            let mut retriever_config = RetrieverConfig::new(url).with_adapter(AdapterConfig {
                timeout_ms: config.analyzer.resolver.retrieval_timeout_ms,
                ..AdapterConfig::named("policy-search")
            });
            if let Some(key) = config.retriever_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
                retriever_config = retriever_config.with_api_key(key);
            }
            info!(url, "Using external policy search service");
            Ok(Arc::new(HttpPolicyRetriever::new(retriever_config)?))
        }
        None => {
            info!("Using in-memory policy index");
            let retriever: Arc<dyn PolicyRetriever> = index;
            Ok(retriever)
        }
    }
}

/// Builds the analyzer and its adapters
pub fn build_analyzer(config: &ApiConfig, index: Arc<PolicyIndex>) -> Result<ClaimAnalyzer, PortError> {
    let interpreter = build_interpreter(config)?;
    let retriever = build_retriever(config, index)?;
    Ok(ClaimAnalyzer::new(retriever, interpreter, config.analyzer.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_interpreter_is_unavailable() {
        let error = UnconfiguredInterpreter.interpret("prompt").await.unwrap_err();
        assert!(matches!(error, PortError::ServiceUnavailable { .. }));
    }

    #[test]
    fn test_builds_with_default_config() {
        let config = ApiConfig::default();
        assert!(build_analyzer(&config, Arc::new(PolicyIndex::default())).is_ok());
    }

    #[test]
    fn test_builds_remote_adapters() {
        let mut config = ApiConfig::default();
        config.llm.groq_api_key = Some("gsk-test".to_string());
        config.retriever_url = Some("http://127.0.0.1:9".to_string());
        config.retriever_api_key = Some("secret".to_string());
        assert!(build_analyzer(&config, Arc::new(PolicyIndex::default())).is_ok());
    }
}
