//! Policy indexing DTOs

use serde::Deserialize;
use validator::Validate;

use domain_policy::PolicyPage;

/// Body of `POST /api/v1/policies/:policy_id/index`
#[derive(Debug, Deserialize, Validate)]
pub struct IndexPolicyRequest {
    #[validate(length(min = 1, message = "policy_name must not be empty"))]
    pub policy_name: String,
    #[validate(length(min = 1, message = "at least one page is required"))]
    pub pages: Vec<PolicyPage>,
}
