//! Outbound AI Adapters
//!
//! Implementations of the domain ports that talk to external services over
//! HTTP:
//!
//! - [`ChatCompletionInterpreter`] implements `CoverageInterpreter` against
//!   any OpenAI-compatible chat-completions endpoint (Gemini, OpenAI, Groq)
//! - [`HttpPolicyRetriever`] implements `PolicyRetriever` against a policy
//!   search service
//!
//! # Error Handling
//!
//! HTTP failures are mapped to `PortError` variants:
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Other -> `PortError::Internal`
//!
//! Transient failures are retried with exponential backoff as configured by
//! the adapter's `AdapterConfig`.

pub mod provider;
pub mod http;
pub mod interpreter;
pub mod retriever;

pub use provider::{LlmProvider, LlmSettings};
pub use interpreter::{ChatCompletionConfig, ChatCompletionInterpreter};
pub use retriever::{HttpPolicyRetriever, RetrieverConfig};
