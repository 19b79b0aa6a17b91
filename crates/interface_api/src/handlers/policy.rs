//! Policy handlers
//!
//! Each handler hands the service a child of the server's shutdown token, so
//! a shutdown during an in-flight call surfaces as cancellation.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use core_kernel::PolicyId;

use crate::dto::policy::{CreatePolicyDto, ExportDto, ExportQuery, ReadPolicyDto};
use crate::{error::ApiError, AppState};

/// Creates a policy
///
/// Any failure other than cancellation answers 400 with no body, including
/// a body that does not bind to [`CreatePolicyDto`].
pub async fn create_policy(
    State(state): State<AppState>,
    body: Result<Json<CreatePolicyDto>, JsonRejection>,
) -> Result<Json<ReadPolicyDto>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Create body rejected");
        ApiError::CreateRejected
    })?;
    let cancel = state.shutdown.child_token();

    state
        .service
        .create_policy(request, &cancel)
        .await?
        .map(Json)
        .ok_or(ApiError::CreateRejected)
}

/// Lists every policy
pub async fn list_policies(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReadPolicyDto>>, ApiError> {
    let cancel = state.shutdown.child_token();
    let policies = state.service.read_policies(&cancel).await?;
    Ok(Json(policies))
}

/// Gets a policy by id
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReadPolicyDto>, ApiError> {
    let cancel = state.shutdown.child_token();

    state
        .service
        .read_policy(PolicyId::new(id), &cancel)
        .await?
        .map(Json)
        .ok_or(ApiError::PolicyNotFound)
}

/// Exports policies starting within the query's inclusive range
pub async fn export_data(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<Vec<ExportDto>>, ApiError> {
    let cancel = state.shutdown.child_token();
    let rows = state
        .service
        .export_data(query.start_date, query.end_date, &cancel)
        .await?;
    Ok(Json(rows))
}
