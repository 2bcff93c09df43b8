//! HTTP policy retriever
//!
//! Queries a policy search service that holds the indexed policy passages.
//! The service answers `POST {base_url}/search` with a ranked list of
//! `{text, metadata, distance}` objects.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use core_kernel::{AdapterConfig, DomainPort, PortError};
use domain_policy::{PolicyPassage, PolicyRetriever};

use crate::http::{build_client, endpoint, post_json};

/// Connection settings for the policy search service
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub adapter: AdapterConfig,
}

impl RetrieverConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            adapter: AdapterConfig::named("policy-search"),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterConfig) -> Self {
        self.adapter = adapter;
        self
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    policy_id: &'a str,
    top_k: usize,
}

/// `PolicyRetriever` backed by a remote search service
#[derive(Debug)]
pub struct HttpPolicyRetriever {
    client: reqwest::Client,
    config: RetrieverConfig,
    url: String,
}

impl HttpPolicyRetriever {
    /// Creates the retriever
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` when the HTTP client cannot be built
    pub fn new(config: RetrieverConfig) -> Result<Self, PortError> {
        let client = build_client(&config.adapter)?;
        let url = endpoint(&config.base_url, "search");
        Ok(Self { client, config, url })
    }
}

impl DomainPort for HttpPolicyRetriever {}

#[async_trait]
impl PolicyRetriever for HttpPolicyRetriever {
    #[instrument(skip(self, query))]
    async fn search_policy(
        &self,
        query: &str,
        policy_id: &str,
        top_k: usize,
    ) -> Result<Vec<PolicyPassage>, PortError> {
        let request = SearchRequest {
            query,
            policy_id,
            top_k,
        };

        let mut passages: Vec<PolicyPassage> = post_json(
            &self.client,
            &self.url,
            self.config.api_key.as_deref(),
            &request,
            &self.config.adapter,
            "policy search",
        )
        .await?;

        passages.truncate(top_k);
        debug!(hits = passages.len(), "Policy search completed");
        Ok(passages)
    }
}
