use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use jobportal::{ApplicationStatus, Principal};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn apply(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(request) = payload?;
    let application = state
        .run(move |lc| lc.apply_to_job(&principal, &request.job_id))
        .await?;
    Ok(ApiResponse::ok()
        .message("Application submitted successfully")
        .with("application", &application)?)
}

/// Lists the caller's applications, optionally filtered by `?status=`.
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ApiResponse, ApiError> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;
    let applications = state
        .run(move |lc| lc.list_applications(&principal, status))
        .await?;
    Ok(ApiResponse::ok().with("applications", &applications)?)
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let application = state
        .run(move |lc| lc.get_application(&principal, &id))
        .await?;
    Ok(ApiResponse::ok().with("application", &application)?)
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(request) = payload?;
    let application = state
        .run(move |lc| lc.set_application_status(&principal, &id, &request.status))
        .await?;
    Ok(ApiResponse::ok()
        .message("Application status updated")
        .with("application", &application)?)
}
