//! Policy indexing handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use domain_policy::IndexingSummary;

use crate::dto::policies::IndexPolicyRequest;
use crate::{error::ApiError, AppState};

/// Indexes a policy document into the in-memory index
///
/// Rejected with 409 when claims are resolved against an external policy
/// search service, since the local index would never be consulted.
pub async fn index_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
    payload: Result<Json<IndexPolicyRequest>, JsonRejection>,
) -> Result<Json<IndexingSummary>, ApiError> {
    if let Some(url) = state.config.external_retriever() {
        return Err(ApiError::Conflict(format!(
            "policies are served by the search service at {url}"
        )));
    }

    let Json(request) = payload?;
    request.validate()?;

    let summary = state
        .index
        .index_document(&policy_id, &request.policy_name, &request.pages)
        .await?;

    Ok(Json(summary))
}
