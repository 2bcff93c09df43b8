//! Claim analysis entry point
//!
//! `analyze_claim` runs the whole pipeline for one claim:
//!
//! ```text
//! extracted data -> claim items -> per item: resolve coverage -> calculate
//!                                        -> aggregate -> ClaimAnalysisResult
//! ```
//!
//! Items are processed sequentially in claim order. A failed coverage lookup
//! only degrades that item to default coverage; the analysis itself fails
//! only on contract violations.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use core_kernel::Currency;
use domain_policy::PolicyRetriever;

use crate::aggregation::{ClaimAggregator, ClaimAnalysisResult, WarningThresholds};
use crate::calculator::ReimbursementCalculator;
use crate::error::ClaimError;
use crate::extraction::ExtractedDocument;
use crate::interpretation::CoverageInterpreter;
use crate::ledger::CustomerLedger;
use crate::resolver::{CoverageResolver, ResolverConfig};

/// Settings for claim analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub currency: Currency,
    pub resolver: ResolverConfig,
    pub warnings: WarningThresholds,
}

/// Analyses claims against policy coverage
pub struct ClaimAnalyzer {
    resolver: CoverageResolver,
    calculator: ReimbursementCalculator,
    aggregator: ClaimAggregator,
}

impl ClaimAnalyzer {
    /// Creates an analyzer over the given retrieval and interpretation ports
    pub fn new(
        retriever: Arc<dyn PolicyRetriever>,
        interpreter: Arc<dyn CoverageInterpreter>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            resolver: CoverageResolver::new(retriever, interpreter, config.resolver)
                .with_currency(config.currency),
            calculator: ReimbursementCalculator::new(config.currency),
            aggregator: ClaimAggregator::new(config.warnings, config.currency),
        }
    }

    /// Analyses one claim
    ///
    /// # Arguments
    ///
    /// * `extracted_data` - Document extraction output in any supported shape
    /// * `policy_id` - Policy to resolve coverage under
    /// * `ledger` - The customer's year-to-date deductible and payouts
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` for a negative ledger figure or a
    /// claim line with a quantity below 1.
    #[instrument(skip(self, extracted_data, ledger))]
    pub async fn analyze_claim(
        &self,
        extracted_data: &Value,
        policy_id: &str,
        ledger: &CustomerLedger,
    ) -> Result<ClaimAnalysisResult, ClaimError> {
        ledger.validate()?;

        let document = ExtractedDocument::from_value(extracted_data);
        let items = document.claim_items()?;
        info!(items = items.len(), "Analyzing claim");

        let mut calculations = Vec::with_capacity(items.len());
        for item in &items {
            let coverage = self.resolver.resolve_coverage(item, policy_id).await;
            calculations.push(self.calculator.calculate(item, &coverage, ledger));
        }

        let result = self.aggregator.aggregate(
            policy_id,
            calculations,
            ledger,
            &document.missing_fields,
            Utc::now(),
        );

        info!(
            total_claimed = %result.total_claimed,
            total_approved = %result.total_approved,
            warnings = result.warnings.len(),
            "Claim analyzed"
        );
        Ok(result)
    }
}
