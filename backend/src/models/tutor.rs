use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Speaker of a conversation turn
///
/// The chat UI speaks `user`/`assistant`; `learner`/`tutor` are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "user", alias = "learner")]
    Learner,
    #[serde(rename = "assistant", alias = "tutor")]
    Tutor,
}

impl Role {
    /// Label used when serializing history into the prompt
    pub fn prompt_label(self) -> &'static str {
        match self {
            Role::Learner => "User",
            Role::Tutor => "Tutor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub role: Role,
    #[serde(rename = "content", alias = "text")]
    pub text: String,
}

impl Turn {
    pub fn learner(text: impl Into<String>) -> Self {
        Self { role: Role::Learner, text: text.into() }
    }

    pub fn tutor(text: impl Into<String>) -> Self {
        Self { role: Role::Tutor, text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LearnerLevel {
    #[default]
    AbsoluteBeginner,
    ScriptAware,
    Conversational,
}

impl LearnerLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AbsoluteBeginner => "absolute-beginner",
            Self::ScriptAware => "script-aware",
            Self::Conversational => "conversational",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LearnerGoal {
    #[default]
    Heritage,
    Travel,
    Work,
    Curious,
}

impl LearnerGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heritage => "heritage",
            Self::Travel => "travel",
            Self::Work => "work",
            Self::Curious => "curious",
        }
    }
}

/// Direction of learning: which language is the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LearningMode {
    /// Target language is Amharic
    #[default]
    #[serde(rename = "amharic", alias = "target-is-amharic")]
    Amharic,
    /// Target language is English (learner already speaks Amharic)
    #[serde(rename = "english", alias = "target-is-english")]
    English,
}

impl LearningMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amharic => "amharic",
            Self::English => "english",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(LearnerLevel, LearnerGoal, LearningMode);

/// Learner profile as kept by the chat UI
///
/// Missing fields take the UI's default profile values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LearnerProfile {
    pub level: LearnerLevel,
    pub goal: LearnerGoal,
    pub learning_mode: LearningMode,
}

/// Course/lesson the learner came from, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionContext {
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    pub course: Option<String>,
    /// Lesson index; the UI may send it as a number
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    pub lesson: Option<String>,
}

impl SessionContext {
    pub fn course(&self) -> Option<&str> {
        self.course.as_deref().filter(|s| !s.is_empty())
    }

    pub fn lesson(&self) -> Option<&str> {
        self.lesson.as_deref().filter(|s| !s.is_empty())
    }

    /// True when neither course nor lesson carries a value
    pub fn is_empty(&self) -> bool {
        self.course().is_none() && self.lesson().is_none()
    }
}

fn deserialize_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Int(n) => n.to_string(),
        TextOrNumber::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
        TextOrNumber::Float(f) => f.to_string(),
    }))
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing messages array"))]
    pub messages: Vec<Turn>,
    #[serde(default)]
    pub profile: Option<LearnerProfile>,
    #[serde(default)]
    pub session_info: Option<SessionContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TutorReply {
    pub reply: String,
}
