//! Prompt composition for the tutor relay
//!
//! Turns a conversation plus optional learner profile and course context into
//! the single instruction string sent to the generation backend. Pure: the
//! same inputs always give byte-identical output.

use crate::models::{LearnerProfile, Role, SessionContext, Turn};

use super::TutorError;

const PERSONA: &str = "You are \"Kwanqa\", a friendly and patient language tutor.";

/// Behaviour, response structure and correction rules
const GUIDELINES: &str = include_str!("tutor_prompt.md");

pub const PROFILE_MARKER: &str = "Learner profile:";
pub const SESSION_MARKER: &str = "Course context:";
pub const HISTORY_MARKER: &str = "Conversation so far:";
pub const ANCHOR_DIRECTIVE: &str =
    "Tutor: Respond to the latest user message in the required structure.\nLatest user message:";

const UNKNOWN: &str = "unknown";

/// Most recent learner turn, or the last turn when the learner never spoke
pub fn latest_learner_turn(conversation: &[Turn]) -> Option<&Turn> {
    conversation
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Learner)
        .or_else(|| conversation.last())
}

/// Build the prompt for one tutor request
///
/// Layout: persona, optional profile block, optional session block, the fixed
/// guidelines, the serialized history, then the latest learner message again
/// as the anchor to respond to.
pub fn compose(
    conversation: &[Turn],
    profile: Option<&LearnerProfile>,
    session: Option<&SessionContext>,
) -> Result<String, TutorError> {
    let latest = latest_learner_turn(conversation).ok_or(TutorError::EmptyConversation)?;

    let history_len: usize = conversation.iter().map(|t| t.text.len() + 8).sum();
    let mut prompt = String::with_capacity(GUIDELINES.len() + 512 + history_len + latest.text.len());

    prompt.push_str(PERSONA);
    prompt.push_str("\n\n");

    if let Some(profile) = profile {
        push_profile_block(&mut prompt, profile);
    }
    if let Some(session) = session.filter(|s| !s.is_empty()) {
        push_session_block(&mut prompt, session);
    }

    prompt.push('\n');
    prompt.push_str(GUIDELINES.trim_end());

    prompt.push_str("\n\n");
    prompt.push_str(HISTORY_MARKER);
    prompt.push('\n');
    push_history(&mut prompt, conversation);

    prompt.push_str("\n\n");
    prompt.push_str(ANCHOR_DIRECTIVE);
    prompt.push('\n');
    prompt.push_str(&latest.text);
    prompt.push('\n');

    Ok(prompt)
}

fn push_profile_block(prompt: &mut String, profile: &LearnerProfile) {
    prompt.push_str(&format!(
        "{PROFILE_MARKER}\n- Level: {}\n- Goal: {}\n- Learning mode: {}\n",
        profile.level, profile.goal, profile.learning_mode
    ));
}

fn push_session_block(prompt: &mut String, session: &SessionContext) {
    prompt.push_str(&format!(
        "{SESSION_MARKER}\n- Course: {}\n- Lesson index: {}\n\
         Focus on this topic while still having a natural conversation.\n",
        session.course().unwrap_or(UNKNOWN),
        session.lesson().unwrap_or(UNKNOWN)
    ));
}

fn push_history(prompt: &mut String, conversation: &[Turn]) {
    for (i, turn) in conversation.iter().enumerate() {
        if i > 0 {
            prompt.push('\n');
        }
        prompt.push_str(turn.role.prompt_label());
        prompt.push_str(": ");
        prompt.push_str(&turn.text);
    }
}
