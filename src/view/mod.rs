//! Presentation adapters.
//!
//! Pure mappings from protocol payloads to the view models each page needs,
//! plus the [`ViewSink`] seam through which an external renderer receives
//! them. Nothing here produces markup.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `chat` | Transcript entries for assistant answers |
//! | `namespace` | Namespace table rows |
//! | `status` | Status counts and pod phase chart |

// ============================================================================
// Submodules
// ============================================================================

/// Transcript entries for assistant answers.
pub mod chat;

/// Namespace table rows.
pub mod namespace;

/// Status counts and pod phase chart.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use chat::{ChatViewModel, FALLBACK_TEXT, format_error, to_chat_entry};
pub use namespace::{NamespaceRow, namespace_rows};
pub use status::{ChartSlice, StatusChart, StatusViewModel, phase_color, to_status_view};

// ============================================================================
// ViewSink
// ============================================================================

/// Rendering collaborator that receives routed view models.
///
/// Implementations turn view models into visible output. They are called
/// from the session's dispatcher loop, one call at a time.
pub trait ViewSink: Send {
    /// An assistant answer arrived.
    fn chat_entry(&mut self, entry: ChatViewModel);

    /// A status snapshot arrived.
    fn status_view(&mut self, view: StatusViewModel);

    /// A backend or connection error should be shown.
    ///
    /// `message` is already formatted for display.
    fn error_message(&mut self, message: &str);

    /// The user submitted a query. Echoed before it is sent.
    fn user_message(&mut self, _text: &str) {}
}
