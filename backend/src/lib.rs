//! Kwanqa Tutor backend
//!
//! Relays learner conversations to a local language model and serves the
//! read-only course catalog behind the Kwanqa site.

// Localized error messages (en, am)
rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    body::Body,
    http::{
        HeaderValue, Method, Request,
        header::{ACCEPT_LANGUAGE, CONTENT_TYPE},
    },
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    set_status::SetStatus,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::config::{Config, CorsConfig, StaticConfig};
use crate::services::{CourseCatalog, GenerationBackend, OllamaClient, TutorService};
use crate::utils::ApiResult;

/// Shared, immutable application state
pub struct AppState {
    pub tutor_service: TutorService,
    pub course_catalog: &'static CourseCatalog,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// State wired to the configured generation backend
    pub fn new(config: &Config) -> ApiResult<Self> {
        let backend = OllamaClient::new(&config.generation);
        tracing::info!(
            "Tutor relay → {} (model: {})",
            backend.endpoint(),
            config.generation.model
        );
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> ApiResult<Self> {
        Ok(Self {
            tutor_service: TutorService::new(backend),
            course_catalog: CourseCatalog::embedded()?,
            started_at: Utc::now(),
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::tutor::chat,
        handlers::course::list_courses,
        handlers::course::get_course,
        handlers::course::get_lesson,
        handlers::health::health,
    ),
    components(schemas(
        models::TutorRequest,
        models::TutorReply,
        models::Turn,
        models::Role,
        models::LearnerProfile,
        models::LearnerLevel,
        models::LearnerGoal,
        models::LearningMode,
        models::SessionContext,
        models::Course,
        models::CourseSummary,
        models::CourseTrack,
        models::LessonSection,
        models::Phrase,
        models::DialogueLine,
        utils::error::ApiErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "Tutor", description = "Chat relay to the local language model"),
        (name = "Courses", description = "Read-only course catalog"),
        (name = "System", description = "Service health")
    ),
    info(title = "Kwanqa Tutor API", description = "Backend for the Kwanqa language tutor")
)]
pub struct ApiDoc;

/// Build the full application router
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/api/tutor", post(handlers::tutor::chat))
        .route("/api/courses", get(handlers::course::list_courses))
        .route("/api/courses/:slug", get(handlers::course::get_course))
        .route("/api/courses/:slug/lessons/:index", get(handlers::course::get_lesson))
        .route("/api/health", get(handlers::health::health))
        .with_state(state);

    let mut app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api);

    if let Some(site) = static_site(&config.static_config) {
        app = app.fallback_service(site);
    }

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %Uuid::new_v4()
        )
    });

    app.layer(axum::middleware::from_fn(middleware::locale_middleware))
        .layer(trace)
        .layer(cors_layer(&config.cors))
}

/// Exported site, served for every path the API does not claim
fn static_site(config: &StaticConfig) -> Option<ServeDir<SetStatus<ServeFile>>> {
    if !config.enabled {
        return None;
    }

    let web_root = PathBuf::from(&config.web_root);
    if !web_root.is_dir() {
        tracing::warn!("Web root {} not found, static site disabled", web_root.display());
        return None;
    }

    tracing::info!("Serving static site from {}", web_root.display());
    let not_found = ServeFile::new(web_root.join("404.html"));
    Some(ServeDir::new(web_root).append_index_html_on_directories(true).not_found_service(not_found))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT_LANGUAGE]);

    if config.allow_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            },
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
