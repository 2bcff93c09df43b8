//! Claim aggregation
//!
//! Folds per-item calculations into a [`ClaimAnalysisResult`]: totals,
//! approval rate, review warnings and the justification report.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{sum_in, Currency};

use crate::calculator::ReimbursementCalculation;
use crate::claim_item::ClaimItem;
use crate::justification::render_justification;
use crate::ledger::CustomerLedger;

/// Limits that trigger review warnings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningThresholds {
    /// Claims above this total are flagged for review
    pub high_value_total: Decimal,
    /// More distinct providers than this are flagged
    pub max_providers: usize,
    /// Excluded item descriptions listed in the warning
    pub excluded_items_listed: usize,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            high_value_total: dec!(5000),
            max_providers: 3,
            excluded_items_listed: 3,
        }
    }
}

/// Complete analysis of one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAnalysisResult {
    pub policy_id: String,
    pub claim_items: Vec<ClaimItem>,
    /// One per claim item, same order
    pub calculations: Vec<ReimbursementCalculation>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_claimed: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_approved: Decimal,
    /// Percentage with one decimal place
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub approval_rate: Decimal,
    pub currency: Currency,
    pub justification: String,
    pub warnings: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

/// Builds analysis results from item calculations
#[derive(Debug, Clone, Default)]
pub struct ClaimAggregator {
    thresholds: WarningThresholds,
    currency: Currency,
}

impl ClaimAggregator {
    pub fn new(thresholds: WarningThresholds, currency: Currency) -> Self {
        Self { thresholds, currency }
    }

    /// Aggregates item calculations into the claim result
    ///
    /// # Arguments
    ///
    /// * `policy_id` - Policy the claim was analysed under
    /// * `calculations` - Item calculations in claim order
    /// * `ledger` - The customer's year-to-date figures
    /// * `missing_fields` - Fields document extraction could not find
    /// * `processed_at` - Timestamp recorded on the result
    pub fn aggregate(
        &self,
        policy_id: &str,
        calculations: Vec<ReimbursementCalculation>,
        ledger: &CustomerLedger,
        missing_fields: &[String],
        processed_at: DateTime<Utc>,
    ) -> ClaimAnalysisResult {
        let claimed = sum_in(self.currency, calculations.iter().map(|c| c.claim_item.amount));
        let approved = sum_in(self.currency, calculations.iter().map(|c| c.final_amount));

        let approval_rate = approval_rate(approved.amount(), claimed.amount());

        let total_claimed = claimed.rounded().amount();
        let total_approved = approved.rounded().amount();
        let warnings = self.warnings(&calculations, claimed.amount(), missing_fields);
        let justification = render_justification(
            &calculations,
            total_claimed,
            total_approved,
            approval_rate,
            ledger,
            self.currency,
        );

        ClaimAnalysisResult {
            policy_id: policy_id.to_string(),
            claim_items: calculations.iter().map(|c| c.claim_item.clone()).collect(),
            calculations,
            total_claimed,
            total_approved,
            approval_rate,
            currency: self.currency,
            justification,
            warnings,
            processed_at,
        }
    }

    /// Review warnings, in fixed order
    pub fn warnings(
        &self,
        calculations: &[ReimbursementCalculation],
        total_claimed: Decimal,
        missing_fields: &[String],
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if total_claimed > self.thresholds.high_value_total {
            warnings.push("High-value claim - may require additional review".to_string());
        }

        let providers: BTreeSet<&str> = calculations
            .iter()
            .filter_map(|c| c.claim_item.provider.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        if providers.len() > self.thresholds.max_providers {
            warnings.push(format!(
                "Multiple providers ({}) - verify all services related",
                providers.len()
            ));
        }

        if !missing_fields.is_empty() {
            warnings.push(format!("Missing information: {}", missing_fields.join(", ")));
        }

        let excluded: Vec<&str> = calculations
            .iter()
            .filter(|c| c.is_excluded())
            .map(|c| c.claim_item.description.as_str())
            .take(self.thresholds.excluded_items_listed)
            .collect();
        if !excluded.is_empty() {
            warnings.push(format!("Excluded items: {}", excluded.join(", ")));
        }

        warnings
    }
}

/// Approved share of the claimed total, as a percentage with one decimal
///
/// Zero when nothing was claimed or the ratio leaves the decimal range,
/// which only happens when negative lines cancel out the claimed total.
fn approval_rate(approved: Decimal, claimed: Decimal) -> Decimal {
    if claimed <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    approved
        .checked_div(claimed)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|rate| rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}
