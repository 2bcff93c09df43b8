//! Reimbursement calculation
//!
//! Pure arithmetic over one claim item, its coverage terms and the customer
//! ledger. Intermediate values keep full precision; the covered amount, the
//! deductible applied and the final amount are rounded to cents when the
//! calculation is reported.
//!
//! ```text
//! covered   = claimed × rate
//! deductible applied = min(max(0, deductible - used), covered)
//! final     = min(covered - deductible applied, max(0, limit - paid))
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{round_money, Currency, Money, Rate};

use crate::claim_item::ClaimItem;
use crate::coverage::PolicyCoverage;
use crate::ledger::CustomerLedger;

/// Outcome of reimbursing one claim item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReimbursementCalculation {
    pub claim_item: ClaimItem,
    /// Applied rate as a fraction, 0.8 for 80%
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub coverage_rate: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub covered_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub deductible_applied: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub final_amount: Decimal,
    pub policy_reference: String,
    /// Human readable steps, in calculation order
    pub calculation_notes: Vec<String>,
}

impl ReimbursementCalculation {
    /// Returns a copy with every money field rounded to cents
    pub fn rounded(&self) -> Self {
        Self {
            covered_amount: round_money(self.covered_amount),
            deductible_applied: round_money(self.deductible_applied),
            final_amount: round_money(self.final_amount),
            ..self.clone()
        }
    }

    /// True when a positive claim ended with nothing reimbursed
    pub fn is_excluded(&self) -> bool {
        self.final_amount.is_zero() && self.claim_item.amount > Decimal::ZERO
    }
}

/// Computes reimbursements in one currency
#[derive(Debug, Clone, Copy, Default)]
pub struct ReimbursementCalculator {
    currency: Currency,
}

impl ReimbursementCalculator {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }

    /// Calculates the reimbursement for one item
    ///
    /// # Arguments
    ///
    /// * `item` - The claim item
    /// * `coverage` - Terms resolved for the item
    /// * `ledger` - Year-to-date deductible and payouts, not modified
    pub fn calculate(
        &self,
        item: &ClaimItem,
        coverage: &PolicyCoverage,
        ledger: &CustomerLedger,
    ) -> ReimbursementCalculation {
        let mut notes = Vec::new();

        if !coverage.covered {
            notes.push(format!("Service not covered: {}", coverage.exclusion_reason()));
            return ReimbursementCalculation {
                claim_item: item.clone(),
                coverage_rate: Decimal::ZERO,
                covered_amount: Decimal::ZERO,
                deductible_applied: Decimal::ZERO,
                final_amount: Decimal::ZERO,
                policy_reference: coverage.policy_reference.clone(),
                calculation_notes: notes,
            };
        }

        let claimed = if item.amount.is_sign_negative() {
            notes.push(format!(
                "Negative claimed amount {} treated as {}",
                self.money(item.amount),
                self.money(Decimal::ZERO)
            ));
            Decimal::ZERO
        } else {
            item.amount
        };

        let rate = Rate::from_percentage(coverage.coverage_percentage.clamp(Decimal::ZERO, dec!(100)));
        let covered_amount = rate.apply(claimed);
        notes.push(format!("Coverage rate: {rate}"));
        notes.push(format!(
            "Covered amount: {} × {} = {}",
            self.money(claimed),
            rate,
            self.money(covered_amount)
        ));

        let deductible = coverage.deductible.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        let remaining_deductible = (deductible - ledger.deductible_used_this_year).max(Decimal::ZERO);
        let deductible_applied = remaining_deductible.min(covered_amount);
        let after_deductible = covered_amount - deductible_applied;

        if deductible_applied > Decimal::ZERO {
            notes.push(format!("Deductible applied: {}", self.money(deductible_applied)));
            notes.push(format!(
                "Remaining annual deductible: {}",
                self.money(remaining_deductible - deductible_applied)
            ));
        }

        // a zero limit means the policy states none
        let final_amount = match coverage.annual_limit.filter(|limit| !limit.is_zero()) {
            Some(limit) => {
                let remaining_limit = limit
                    .saturating_sub(ledger.claims_paid_this_year)
                    .max(Decimal::ZERO);
                if after_deductible > remaining_limit {
                    notes.push(format!(
                        "Annual limit applied: {} remaining of {}",
                        self.money(remaining_limit),
                        self.money(limit)
                    ));
                    remaining_limit
                } else {
                    after_deductible
                }
            }
            None => after_deductible,
        };

        notes.extend(
            coverage
                .conditions
                .iter()
                .map(|condition| format!("Condition: {condition}")),
        );

        ReimbursementCalculation {
            claim_item: item.clone(),
            coverage_rate: rate.as_decimal(),
            covered_amount,
            deductible_applied,
            final_amount,
            policy_reference: coverage.policy_reference.clone(),
            calculation_notes: notes,
        }
        .rounded()
    }
}
