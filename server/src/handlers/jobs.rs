use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};

use jobportal::model::NewJob;
use jobportal::Principal;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(new_job) = payload?;
    let job = state
        .run(move |lc| lc.create_job(&principal, new_job))
        .await?;
    Ok(ApiResponse::ok()
        .message("Job created successfully")
        .with("job", &job)?)
}

pub async fn list(State(state): State<AppState>) -> Result<ApiResponse, ApiError> {
    let jobs = state.run(|lc| lc.list_jobs()).await?;
    Ok(ApiResponse::ok().with("jobs", &jobs)?)
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let removed = state
        .run(move |lc| lc.delete_job(&principal, &id))
        .await?;
    Ok(ApiResponse::ok()
        .message("Job deleted successfully")
        .with("applicationsRemoved", &removed)?)
}
