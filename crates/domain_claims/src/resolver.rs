//! Coverage resolution
//!
//! Finds the coverage terms for one claim item: retrieve policy passages,
//! ask the interpreter, parse the reply. Every failure on the way degrades
//! to the configured default coverage and is logged; resolution itself
//! never fails.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use core_kernel::Currency;
use domain_policy::{PolicyPassage, PolicyRetriever};

use crate::claim_item::ClaimItem;
use crate::coverage::{CoverageSource, DefaultCoverage, FallbackReason, PolicyCoverage};
use crate::interpretation::{
    build_interpretation_prompt, parse_interpretation, CoverageInterpreter, InterpretedCoverage,
};

/// Coverage resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Passages requested per item
    pub top_k: usize,
    pub retrieval_timeout_ms: u64,
    pub interpretation_timeout_ms: u64,
    /// Characters of the best passage kept as policy reference
    pub reference_max_chars: usize,
    pub default_coverage: DefaultCoverage,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            retrieval_timeout_ms: 30_000,
            interpretation_timeout_ms: 30_000,
            reference_max_chars: 500,
            default_coverage: DefaultCoverage::default(),
        }
    }
}

impl ResolverConfig {
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_millis(self.retrieval_timeout_ms)
    }

    pub fn interpretation_timeout(&self) -> Duration {
        Duration::from_millis(self.interpretation_timeout_ms)
    }
}

/// Builds the retrieval query for a claim item
pub fn build_retrieval_query(item: &ClaimItem) -> String {
    format!(
        "Coverage for: {}\nMedical code: {}\nService type: outpatient medical service",
        item.description,
        item.code_or_unspecified()
    )
}

/// Resolves coverage terms through the retrieval and interpretation ports
pub struct CoverageResolver {
    retriever: Arc<dyn PolicyRetriever>,
    interpreter: Arc<dyn CoverageInterpreter>,
    config: ResolverConfig,
    currency: Currency,
}

impl CoverageResolver {
    pub fn new(
        retriever: Arc<dyn PolicyRetriever>,
        interpreter: Arc<dyn CoverageInterpreter>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            retriever,
            interpreter,
            config,
            currency: Currency::default(),
        }
    }

    /// Sets the currency amounts are quoted in
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves the coverage for one claim item under a policy
    ///
    /// Returns interpreted terms when passages were found and the reply
    /// parsed; the default coverage otherwise.
    #[instrument(skip(self, item), fields(item = %item.description))]
    pub async fn resolve_coverage(&self, item: &ClaimItem, policy_id: &str) -> PolicyCoverage {
        let query = build_retrieval_query(item);

        let search = self
            .retriever
            .search_policy(&query, policy_id, self.config.top_k);
        let passages = match timeout(self.config.retrieval_timeout(), search).await {
            Ok(Ok(passages)) => passages,
            Ok(Err(e)) if e.is_timeout() => {
                warn!(error = %e, "Policy retrieval timed out, using default coverage");
                return self.fallback(FallbackReason::RetrievalTimedOut);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Policy retrieval failed, using default coverage");
                return self.fallback(FallbackReason::RetrievalFailed);
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.retrieval_timeout_ms,
                    "Policy retrieval timed out, using default coverage"
                );
                return self.fallback(FallbackReason::RetrievalTimedOut);
            }
        };

        let Some(best) = passages.first() else {
            warn!("No policy matches found, using default coverage");
            return self.fallback(FallbackReason::NoPassages);
        };
        debug!(passages = passages.len(), "Policy passages retrieved");

        let prompt = build_interpretation_prompt(item, &passages, self.currency);
        let reply = match timeout(
            self.config.interpretation_timeout(),
            self.interpreter.interpret(&prompt),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) if e.is_timeout() => {
                warn!(error = %e, "Coverage interpretation timed out, using default coverage");
                return self.fallback(FallbackReason::InterpretationTimedOut);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Coverage interpretation failed, using default coverage");
                return self.fallback(FallbackReason::InterpretationFailed);
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.interpretation_timeout_ms,
                    "Coverage interpretation timed out, using default coverage"
                );
                return self.fallback(FallbackReason::InterpretationTimedOut);
            }
        };

        match parse_interpretation(&reply) {
            Ok(terms) => self.interpreted(terms, best),
            Err(failure) => {
                warn!(%failure, "Interpreter reply unusable, using default coverage");
                self.fallback(FallbackReason::Unparsable)
            }
        }
    }

    fn fallback(&self, reason: FallbackReason) -> PolicyCoverage {
        PolicyCoverage::fallback(&self.config.default_coverage, reason)
    }

    fn interpreted(&self, terms: InterpretedCoverage, best: &PolicyPassage) -> PolicyCoverage {
        let defaults = &self.config.default_coverage;

        PolicyCoverage {
            coverage_percentage: terms
                .coverage_percentage
                .unwrap_or(defaults.coverage_percentage),
            deductible: terms.deductible,
            annual_limit: terms.annual_limit,
            conditions: terms.conditions,
            exclusions: terms.exclusions,
            covered: terms.covered.unwrap_or(true),
            reason: terms.reason.unwrap_or_default(),
            policy_reference: truncate_reference(&best.text, self.config.reference_max_chars),
            policy_section: best.section_title().unwrap_or("Unknown section").to_string(),
            source: CoverageSource::Interpreted,
        }
    }
}

/// Cuts a passage to `max_chars` characters, marking the cut with `...`
pub fn truncate_reference(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
