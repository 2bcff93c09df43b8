//! Policy Domain Ports
//!
//! The claim domain asks for policy text through [`PolicyRetriever`]. The
//! in-memory [`crate::index::PolicyIndex`] implements it for local use and
//! tests; `infra_ai` provides an HTTP adapter for an external search service.
//!
//! ```rust,ignore
//! let retriever: Arc<dyn PolicyRetriever> = match config.retriever_url {
//!     Some(url) => Arc::new(HttpPolicyRetriever::new(url, adapter_config)?),
//!     None => Arc::new(PolicyIndex::default()),
//! };
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

use crate::passage::PolicyPassage;

/// Semantic search over previously indexed policy passages
#[async_trait]
pub trait PolicyRetriever: DomainPort {
    /// Returns up to `top_k` passages of `policy_id` ranked by relevance to `query`
    ///
    /// An empty result is not an error.
    async fn search_policy(
        &self,
        query: &str,
        policy_id: &str,
        top_k: usize,
    ) -> Result<Vec<PolicyPassage>, PortError>;
}
