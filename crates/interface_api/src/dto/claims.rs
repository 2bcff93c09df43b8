//! Claims DTOs

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use domain_claims::CustomerLedger;

/// Body of `POST /api/v1/claims/analyze`
///
/// `extracted_data` is passed through untouched; any of the supported
/// extraction shapes is accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeClaimRequest {
    pub extracted_data: Value,
    #[validate(length(min = 1, message = "policy_id must not be empty"))]
    pub policy_id: String,
    /// Year-to-date figures; absent means nothing used yet
    #[serde(default)]
    pub customer_data: Option<CustomerLedger>,
}

impl AnalyzeClaimRequest {
    pub fn ledger(&self) -> CustomerLedger {
        self.customer_data.clone().unwrap_or_default()
    }
}
