use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use jobportal::model::{ScheduleFields, ScheduleUpdate};
use jobportal::{Interview, Principal};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub application_id: String,
    #[serde(flatten)]
    pub fields: ScheduleFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    #[serde(default)]
    pub company_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

fn interview_response(message: &str, interview: &Interview) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::ok()
        .message(message)
        .with("interview", interview)?)
}

pub async fn schedule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(request) = payload?;
    let interview = state
        .run(move |lc| lc.schedule_interview(&principal, &request.application_id, request.fields))
        .await?;
    interview_response("Interview scheduled successfully", &interview)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<ScheduleUpdate>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(update) = payload?;
    let interview = state
        .run(move |lc| lc.update_interview(&principal, &id, update))
        .await?;
    interview_response("Interview updated successfully", &interview)
}

pub async fn reschedule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<ScheduleFields>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(fields) = payload?;
    let interview = state
        .run(move |lc| lc.reschedule_interview(&principal, &id, fields))
        .await?;
    interview_response("Interview rescheduled successfully", &interview)
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let interview = state
        .run(move |lc| lc.cancel_interview(&principal, &id))
        .await?;
    interview_response("Interview cancelled", &interview)
}

/// The body is optional; when present it may carry `companyFeedback`.
pub async fn complete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiResponse, ApiError> {
    let request: CompleteRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CompleteRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedPayload(e.to_string()))?
    };
    let interview = state
        .run(move |lc| lc.complete_interview(&principal, &id, request.company_feedback))
        .await?;
    interview_response("Interview marked as completed", &interview)
}

pub async fn confirm(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let interview = state
        .run(move |lc| lc.confirm_interview(&principal, &id))
        .await?;
    interview_response("Interview confirmed", &interview)
}

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let detail = state
        .run(move |lc| lc.get_interview(&principal, &id))
        .await?;
    Ok(ApiResponse::ok().with("interview", &detail)?)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiResponse, ApiError> {
    let interviews = state.run(move |lc| lc.list_interviews(&principal)).await?;
    Ok(ApiResponse::ok().with("interviews", &interviews)?)
}

pub async fn feedback(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let Json(request) = payload?;
    let interview = state
        .run(move |lc| lc.add_feedback(&principal, &id, &request.feedback))
        .await?;
    interview_response("Feedback added successfully", &interview)
}
