//! Customer year-to-date ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// What the customer has already consumed this policy year
///
/// Read-only during an analysis; the caller persists updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLedger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize")]
    pub deductible_used_this_year: Decimal,
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize")]
    pub claims_paid_this_year: Decimal,
}

impl CustomerLedger {
    pub fn new(deductible_used_this_year: Decimal, claims_paid_this_year: Decimal) -> Self {
        Self {
            customer_id: None,
            deductible_used_this_year,
            claims_paid_this_year,
        }
    }

    /// Rejects negative year-to-date figures
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.deductible_used_this_year.is_sign_negative() {
            return Err(ClaimError::validation(
                "deductible_used_this_year must not be negative",
            ));
        }
        if self.claims_paid_this_year.is_sign_negative() {
            return Err(ClaimError::validation(
                "claims_paid_this_year must not be negative",
            ));
        }
        Ok(())
    }
}
