//! HTTP API Layer
//!
//! This crate exposes the policy service over REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for policies and health
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Service outcomes mapped to status codes
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, shutdown.clone());
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_policy::PolicyService;

use crate::handlers::{health, policy};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: PolicyService,
    /// Cancelled when the server shuts down; handlers derive child tokens
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: PolicyService, shutdown: CancellationToken) -> Self {
        Self { service, shutdown }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Service and shutdown token
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let policy_routes = Router::new()
        .route(
            "/policies",
            post(policy::create_policy).get(policy::list_policies),
        )
        .route("/policies/export", post(policy::export_data))
        .route("/policies/:id", get(policy::get_policy))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(health_routes)
        .merge(policy_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
