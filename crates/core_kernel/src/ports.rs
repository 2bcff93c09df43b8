//! Ports and Adapters Infrastructure
//!
//! Shared vocabulary for the hexagonal boundary between the claim domain and
//! the services it consumes (policy retrieval, LLM interpretation).
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        ClaimAnalyzer         │
//! └──────────────────────────────┘
//!        │                │
//!        ▼                ▼
//!  PolicyRetriever  CoverageInterpreter   (port traits, one per domain)
//!        ▲                ▲
//!        │                │
//!  HttpPolicyRetriever / PolicyIndex   ChatCompletionInterpreter / fakes
//! ```
//!
//! Port traits live in the domain crates and extend [`DomainPort`]; every
//! implementation reports failures as a [`PortError`].

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Failure reported by a retriever or interpreter adapter
///
/// The analyzer never surfaces these to callers; it degrades to default
/// coverage. The variants exist so adapters and logs can tell a missing
/// policy from an exhausted quota.
#[derive(Debug, Error)]
pub enum PortError {
    /// Policy, endpoint or model unknown to the remote side
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A call exceeded its time budget
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Missing or rejected API key
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Provider quota exhausted (HTTP 429)
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// No provider configured, or the provider answered 5xx
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The reply could not be read as coverage or search results
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Timeout for the named operation, e.g. `"interpret"` or `"search"`
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        PortError::Timeout {
            operation: operation.into(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Whether a retry of the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PortError::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Supertrait of `PolicyRetriever` and `CoverageInterpreter`
///
/// Adapters are held behind `Arc<dyn ...>` and shared by every request.
pub trait DomainPort: Send + Sync + 'static {}

/// Timeout and retry limits for one outbound adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Name used in log fields, e.g. `"gemini"` or `"policy-search"`
    pub adapter_id: String,
    pub timeout_ms: u64,
    /// Retries after the first attempt, transient failures only
    pub max_retries: u32,
    /// Backoff base, doubled per attempt
    pub retry_delay_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            adapter_id: "default".to_string(),
            timeout_ms: 30_000,
            max_retries: 2,
            retry_delay_ms: 250,
        }
    }
}

impl AdapterConfig {
    pub fn named(adapter_id: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry `attempt`, counting from 1
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Policy", "HALLESCHE_NK_SELECT_S");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("HALLESCHE_NK_SELECT_S"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::timeout("interpret", Duration::from_secs(5));
        assert!(timeout.is_transient());
        assert!(timeout.is_timeout());
        assert!(timeout.to_string().contains("5000ms"));

        let rate_limited = PortError::RateLimited {
            retry_after_secs: 60,
        };
        assert!(rate_limited.is_transient());

        let transformation = PortError::transformation("missing choices");
        assert!(!transformation.is_transient());
    }

    #[test]
    fn test_adapter_config_backoff_doubles() {
        let config = AdapterConfig::named("llm");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.backoff(1), Duration::from_millis(250));
        assert_eq!(config.backoff(2), Duration::from_millis(500));
        assert_eq!(config.backoff(3), Duration::from_millis(1000));
    }
}
