//! Chat transcript view model.

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::{AssistantResponse, SuggestedCommand};

// ============================================================================
// Constants
// ============================================================================

/// Shown when the assistant returned no answer text.
pub const FALLBACK_TEXT: &str = "Sorry, I could not process your request.";

// ============================================================================
// ChatViewModel
// ============================================================================

/// One assistant entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatViewModel {
    /// Markdown answer text.
    pub text: String,
    /// Suggested commands, in backend order. Empty when none.
    pub commands: Vec<SuggestedCommand>,
    /// Follow-up questions, in backend order. Empty when none.
    pub questions: Vec<String>,
}

impl ChatViewModel {
    /// Returns `true` if the entry has a "Suggested Commands" section.
    #[inline]
    #[must_use]
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Returns `true` if the entry has a "Follow-up Questions" section.
    #[inline]
    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}

/// Maps an assistant response to a transcript entry.
///
/// A missing or empty `ai_response` becomes [`FALLBACK_TEXT`].
#[must_use]
pub fn to_chat_entry(response: &AssistantResponse) -> ChatViewModel {
    let text = match response.ai_response.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => FALLBACK_TEXT.to_string(),
    };

    ChatViewModel {
        text,
        commands: response.commands.clone(),
        questions: response.follow_up_questions.clone(),
    }
}

/// Formats a backend or connection error for the transcript.
#[inline]
#[must_use]
pub fn format_error(message: &str) -> String {
    format!("Error: {message}")
}

// ============================================================================
// Tests
// ============================================================================
