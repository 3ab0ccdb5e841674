use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_i18n::t;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::i18n::get_locale;
use crate::services::tutor::TutorError;

/// API Error with rich context and automatic error trait implementations
///
/// Each variant carries the detail needed in logs; what reaches the caller
/// is the localized message, which never includes backend internals.
#[derive(Error, Debug)]
pub enum ApiError {
    // Resource errors 3xxx
    #[error("Course {slug} not found")]
    CourseNotFound { slug: String },

    #[error("Lesson {index} of course {slug} not found")]
    LessonNotFound { slug: String, index: usize },

    // Validation errors 4xxx
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // System errors 5xxx
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Helper to create internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Helper to create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn course_not_found(slug: impl Into<String>) -> Self {
        Self::CourseNotFound { slug: slug.into() }
    }

    pub fn lesson_not_found(slug: impl Into<String>, index: usize) -> Self {
        Self::LessonNotFound { slug: slug.into(), index }
    }

    /// Numeric error code carried in the response body
    pub fn error_code(&self) -> i32 {
        match self {
            // Resource errors 3xxx
            Self::CourseNotFound { .. } => 3001,
            Self::LessonNotFound { .. } => 3002,

            // Validation errors 4xxx
            Self::ValidationError(_) => 4001,
            Self::InvalidInput(_) => 4002,

            // System errors 5xxx
            Self::InternalError(_) => 5001,
            Self::BackendUnavailable(_) => 5002,
            Self::Unexpected(_) => 5003,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error_code() {
            3001..=3999 => StatusCode::NOT_FOUND,
            4001..=4999 => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned by every API route
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: i32,
}

impl ApiError {
    /// Get localized error message based on current locale
    pub fn localized_message(&self) -> String {
        let locale = get_locale();
        match self {
            Self::CourseNotFound { slug } => {
                t!("resource.course_not_found", locale = &locale, slug = slug).to_string()
            },
            Self::LessonNotFound { slug, index } => {
                t!("resource.lesson_not_found", locale = &locale, slug = slug, index = index)
                    .to_string()
            },
            Self::ValidationError(details) => {
                t!("validation.failed", locale = &locale, details = details).to_string()
            },
            Self::InvalidInput(details) => {
                t!("validation.invalid_input", locale = &locale, details = details).to_string()
            },
            Self::BackendUnavailable(_) => {
                t!("tutor.backend_unavailable", locale = &locale).to_string()
            },
            Self::Unexpected(_) => t!("tutor.unexpected", locale = &locale).to_string(),
            Self::InternalError(_) => t!("internal.error", locale = &locale).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code, "Request failed: {}", self);
        } else {
            tracing::debug!(code, "Request rejected: {}", self);
        }

        let response = ApiErrorResponse { error: self.localized_message(), code };

        (status, Json(response)).into_response()
    }
}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::EmptyConversation => ApiError::validation_error(err.to_string()),
            TutorError::BackendUnavailable(message) => ApiError::BackendUnavailable(message),
            TutorError::Unexpected(message) => ApiError::Unexpected(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        details.sort();

        ApiError::validation_error(details.join("; "))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
