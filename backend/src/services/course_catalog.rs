//! Read-only course catalog
//!
//! Course content ships with the binary as JSON and is parsed once on first use.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::models::{Course, CourseSummary, CourseTrack, LessonSection};
use crate::utils::{ApiError, ApiResult};

const EMBEDDED_COURSES: &str = include_str!("../../data/courses.json");

static EMBEDDED_CATALOG: Lazy<Result<CourseCatalog, String>> =
    Lazy::new(|| CourseCatalog::from_json(EMBEDDED_COURSES).map_err(|e| e.to_string()));

#[derive(Debug, Deserialize)]
struct CatalogFile {
    courses: Vec<Course>,
}

#[derive(Debug)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    /// The catalog bundled with the binary
    pub fn embedded() -> ApiResult<&'static CourseCatalog> {
        EMBEDDED_CATALOG
            .as_ref()
            .map_err(|e| ApiError::internal_error(format!("Embedded course catalog is invalid: {}", e)))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self { courses: file.courses })
    }

    /// Course cards in catalog order, optionally limited to one track
    pub fn list(&self, track: Option<CourseTrack>) -> Vec<CourseSummary> {
        self.courses
            .iter()
            .filter(|c| track.is_none_or(|t| c.track == t))
            .map(CourseSummary::from)
            .collect()
    }

    pub fn get(&self, slug: &str) -> ApiResult<&Course> {
        self.courses
            .iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| ApiError::course_not_found(slug))
    }

    /// Lesson section by zero-based index, as the course page addresses it
    pub fn lesson(&self, slug: &str, index: usize) -> ApiResult<&LessonSection> {
        self.get(slug)?
            .sections
            .get(index)
            .ok_or_else(|| ApiError::lesson_not_found(slug, index))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
