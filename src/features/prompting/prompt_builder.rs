//! Turn-frame prompt construction
//!
//! A conversation is stored as one string: the persona, then one
//! `\nHuman: ...\nAI: ...` frame per completed turn. The prompt for the next
//! turn is that string plus an open frame ending in `AI:`.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Completion-style turn frames instead of chat message lists
//! - 1.0.0: Consolidated prompt building into fluent builder API

use crate::core::error::{RejectReason, SessionError};
use crate::features::sessions::Session;

pub const HUMAN_MARKER: &str = "Human:";
pub const AI_MARKER: &str = "AI:";

/// Truncate backend output at the next simulated turn boundary
pub const STOP_SEQUENCES: [&str; 2] = ["\nHuman:", "\nAI:"];

/// Reply used when the backend returns only whitespace
pub const FALLBACK_REPLY: &str = "I don't know what to say.";

/// Quoting glyph of the transport, refused inside user content
pub const FORBIDDEN_CHARACTER: char = '`';

/// Builder for the prompt of a single turn
///
/// # Example
///
/// ```ignore
/// let prompt = PromptBuilder::for_session(&session).build("hello");
/// ```
pub struct PromptBuilder<'a> {
    persona: &'a str,
    history: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Continue the session's transcript, or open it with the persona when empty
    pub fn for_session(session: &'a Session) -> Self {
        Self {
            persona: &session.persona,
            history: &session.history,
        }
    }

    /// Single-turn prompt that ignores any stored transcript
    pub fn stateless(persona: &'a str) -> Self {
        Self {
            persona,
            history: "",
        }
    }

    /// Prompt ending in an open `AI:` frame for `message`
    pub fn build(&self, message: &str) -> String {
        // A non-empty transcript already starts with the persona it was opened with
        let prefix = if self.history.is_empty() {
            self.persona
        } else {
            self.history
        };
        format!("{prefix}\n{HUMAN_MARKER} {message}\n{AI_MARKER}")
    }

    /// Transcript after `reply` closes the frame opened by `build(message)`
    pub fn complete(&self, message: &str, reply: &str) -> String {
        format!("{} {reply}", self.build(message))
    }
}

pub fn build_request(session: &Session, incoming_message: &str) -> String {
    PromptBuilder::for_session(session).build(incoming_message)
}

pub fn validate_message(text: &str) -> Result<(), SessionError> {
    if text.trim().is_empty() {
        return Err(SessionError::Rejected(RejectReason::Empty));
    }
    if text.contains(FORBIDDEN_CHARACTER) {
        return Err(SessionError::Rejected(RejectReason::ForbiddenCharacter));
    }
    Ok(())
}

/// Clean the raw completion into the user reply
pub fn clean_completion(raw_completion_text: &str) -> String {
    let trimmed = raw_completion_text.trim();
    if trimmed.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns `(reply, new_history)` for a successful turn.
///
/// The reply is sent verbatim; in the transcript it follows the `AI:` marker
/// after a single space.
pub fn apply_completion(
    session: &Session,
    incoming_message: &str,
    raw_completion_text: &str,
) -> (String, String) {
    let reply = clean_completion(raw_completion_text);
    let new_history = PromptBuilder::for_session(session).complete(incoming_message, &reply);
    (reply, new_history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(persona: &str, history: &str) -> Session {
        Session {
            user_id: 1,
            persona: persona.to_string(),
            history: history.to_string(),
            message_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_request_without_history() {
        let s = session("You are a pirate.", "");
        assert_eq!(
            build_request(&s, "ahoy"),
            "You are a pirate.\nHuman: ahoy\nAI:"
        );
    }

    #[test]
    fn test_build_request_continues_history() {
        let s = session("P", "P\nHuman: hi\nAI: hello");
        assert_eq!(
            build_request(&s, "how are you?"),
            "P\nHuman: hi\nAI: hello\nHuman: how are you?\nAI:"
        );
    }

    #[test]
    fn test_stateless_ignores_history() {
        let prompt = PromptBuilder::stateless("P").build("q");
        assert_eq!(prompt, "P\nHuman: q\nAI:");
    }

    #[test]
    fn test_validate_empty() {
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(
                validate_message(text),
                Err(SessionError::Rejected(RejectReason::Empty))
            ));
        }
    }

    #[test]
    fn test_validate_forbidden_character() {
        assert!(matches!(
            validate_message("run `rm -rf`"),
            Err(SessionError::Rejected(RejectReason::ForbiddenCharacter))
        ));
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate_message("hello there").is_ok());
        assert!(validate_message("quotes \" and ' are fine").is_ok());
    }

    #[test]
    fn test_apply_completion_strips_and_frames() {
        let s = session("P", "");
        let (reply, history) = apply_completion(&s, "hello", " Hi there!\n");
        assert_eq!(reply, "Hi there!");
        assert_eq!(history, "P\nHuman: hello\nAI: Hi there!");
    }

    #[test]
    fn test_apply_completion_fallback_on_blank() {
        let s = session("P", "");
        let (reply, history) = apply_completion(&s, "hello", "  \n ");
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(history.ends_with("AI: I don't know what to say."));
    }

    #[test]
    fn test_history_is_persona_plus_turn_frames() {
        let mut s = session("P", "");
        let turns = [("one", "1"), ("two", "2"), ("three", "3")];
        for (message, completion) in turns {
            let prompt = build_request(&s, message);
            let (_, history) = apply_completion(&s, message, completion);
            // Stored transcript is the prompt that produced it plus the reply
            assert_eq!(history, format!("{prompt} {completion}"));
            s.history = history;
        }
        assert_eq!(
            s.history,
            "P\nHuman: one\nAI: 1\nHuman: two\nAI: 2\nHuman: three\nAI: 3"
        );
    }
}
