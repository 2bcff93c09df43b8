//! HTTP API Layer
//!
//! This crate provides the REST API for claim analysis using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Claim analysis, policy indexing, health
//! - **Middleware**: Tracing, audit logging
//! - **DTOs**: Request data transfer objects
//! - **Composition**: Adapter selection from configuration
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod composition;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::PortError;
use domain_claims::ClaimAnalyzer;
use domain_policy::PolicyIndex;

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{claims, policies, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ClaimAnalyzer>,
    /// In-memory policy index, searched when no external retriever is set
    pub index: Arc<PolicyIndex>,
    pub config: ApiConfig,
}

impl AppState {
    /// Assembles state from an analyzer built elsewhere
    pub fn new(analyzer: ClaimAnalyzer, index: Arc<PolicyIndex>, config: ApiConfig) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            index,
            config,
        }
    }

    /// Wires the adapters selected by the configuration
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` when an HTTP client cannot be built
    pub fn from_config(config: ApiConfig) -> Result<Self, PortError> {
        let index = Arc::new(PolicyIndex::default());
        let analyzer = composition::build_analyzer(&config, index.clone())?;
        Ok(Self::new(analyzer, index, config))
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Analyzer, policy index and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/analyze", post(claims::analyze_claim));

    // Policy routes
    let policy_routes = Router::new()
        .route("/:policy_id/index", post(policies::index_policy));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/policies", policy_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
