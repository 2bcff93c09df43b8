//! Claims handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use domain_claims::ClaimAnalysisResult;

use crate::dto::claims::AnalyzeClaimRequest;
use crate::{error::ApiError, AppState};

/// Analyses one claim against its policy
pub async fn analyze_claim(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeClaimRequest>, JsonRejection>,
) -> Result<Json<ClaimAnalysisResult>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let ledger = request.ledger();
    let result = state
        .analyzer
        .analyze_claim(&request.extracted_data, &request.policy_id, &ledger)
        .await?;

    Ok(Json(result))
}
