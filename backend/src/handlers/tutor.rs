//! Tutor chat handler
//!
//! Validates the conversation, relays it through the tutor service and
//! returns the model's text reply.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::models::{TutorReply, TutorRequest};
use crate::utils::error::ApiErrorResponse;
use crate::utils::{ApiError, ApiResult};

/// POST /api/tutor
#[utoipa::path(
    post,
    path = "/api/tutor",
    request_body = TutorRequest,
    responses(
        (status = 200, description = "Tutor reply", body = TutorReply),
        (status = 400, description = "Missing, empty or malformed messages", body = ApiErrorResponse),
        (status = 500, description = "Generation backend unavailable or unexpected fault", body = ApiErrorResponse)
    ),
    tag = "Tutor"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TutorRequest>, JsonRejection>,
) -> ApiResult<Json<TutorReply>> {
    let Json(req) = payload.map_err(|rejection| ApiError::invalid_input(rejection.body_text()))?;
    req.validate()?;

    let reply = state
        .tutor_service
        .reply(&req.messages, req.profile.as_ref(), req.session_info.as_ref())
        .await?;

    Ok(Json(TutorReply { reply: reply.text }))
}
