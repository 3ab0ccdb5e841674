use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::{Course, CourseListQuery, CourseSummary, LessonSection};
use crate::utils::ApiResult;
use crate::utils::error::ApiErrorResponse;

// List course cards, optionally for a single track
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Course cards", body = Vec<CourseSummary>)
    ),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
) -> Json<Vec<CourseSummary>> {
    Json(state.course_catalog.list(query.track))
}

// Full course with every lesson section
#[utoipa::path(
    get,
    path = "/api/courses/{slug}",
    params(("slug" = String, Path, description = "Course slug")),
    responses(
        (status = 200, description = "Course detail", body = Course),
        (status = 404, description = "Course not found", body = ApiErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Course>> {
    let course = state.course_catalog.get(&slug)?;
    Ok(Json(course.clone()))
}

// One lesson section, addressed by zero-based index
#[utoipa::path(
    get,
    path = "/api/courses/{slug}/lessons/{index}",
    params(
        ("slug" = String, Path, description = "Course slug"),
        ("index" = usize, Path, description = "Zero-based lesson index")
    ),
    responses(
        (status = 200, description = "Lesson section", body = LessonSection),
        (status = 404, description = "Course or lesson not found", body = ApiErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_lesson(
    State(state): State<Arc<AppState>>,
    Path((slug, index)): Path<(String, usize)>,
) -> ApiResult<Json<LessonSection>> {
    let lesson = state.course_catalog.lesson(&slug, index)?;
    tracing::debug!("Serving lesson {} of {}", index, slug);
    Ok(Json(lesson.clone()))
}
