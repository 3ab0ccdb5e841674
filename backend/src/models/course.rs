use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Which language a course teaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseTrack {
    Amharic,
    English,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Phrase {
    pub amharic: String,
    pub transliteration: String,
    pub english: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DialogueLine {
    /// "A" or "B"
    pub speaker: String,
    pub amharic: String,
    pub transliteration: String,
    pub english: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonSection {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    /// Ready-made message the learner can send to the tutor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub level: String,
    pub audience: String,
    pub track: CourseTrack,
    pub part: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub sections: Vec<LessonSection>,
}

/// Card shown on the course list
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub level: String,
    pub audience: String,
    pub track: CourseTrack,
    pub part: u8,
    pub lesson_count: usize,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            slug: course.slug.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            level: course.level.clone(),
            audience: course.audience.clone(),
            track: course.track,
            part: course.part,
            lesson_count: course.sections.len(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    /// Only list courses of this track
    pub track: Option<CourseTrack>,
}
