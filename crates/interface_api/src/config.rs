//! API configuration

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::CoreError;
use domain_claims::AnalyzerConfig;
use infra_ai::LlmSettings;

/// API configuration
///
/// Every field has a default, so an empty environment yields a server that
/// analyses claims against its in-memory policy index with default coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines instead of the human readable format
    pub log_json: bool,
    /// Chat-completion provider keys and overrides
    pub llm: LlmSettings,
    /// Base URL of an external policy search service
    pub retriever_url: Option<String>,
    pub retriever_api_key: Option<String>,
    /// Timeouts, default coverage and warning thresholds
    pub analyzer: AnalyzerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            llm: LlmSettings::default(),
            retriever_url: None,
            retriever_api_key: None,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `APP_*` environment variables
    ///
    /// Nested fields use a double underscore, e.g.
    /// `APP_LLM__GEMINI_API_KEY` or `APP_ANALYZER__RESOLVER__TOP_K`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the analyzer cannot work with
    pub fn validate(&self) -> Result<(), CoreError> {
        let resolver = &self.analyzer.resolver;
        if resolver.top_k == 0 {
            return Err(CoreError::configuration("analyzer.resolver.top_k must be at least 1"));
        }

        let defaults = &resolver.default_coverage;
        if defaults.coverage_percentage.is_sign_negative()
            || defaults.coverage_percentage > Decimal::ONE_HUNDRED
        {
            return Err(CoreError::configuration(format!(
                "default coverage percentage {} is outside 0-100",
                defaults.coverage_percentage
            )));
        }
        let negative = |value: Option<Decimal>| value.is_some_and(|v| v.is_sign_negative());
        if negative(defaults.deductible) || negative(defaults.annual_limit) {
            return Err(CoreError::configuration(
                "default deductible and annual limit must not be negative",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured retriever URL, ignoring blanks
    pub fn external_retriever(&self) -> Option<&str> {
        self.retriever_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
