//! Callbacks the engine needs from the surrounding editor surface.

use crate::offset_index::TextRange;

/// The editor surface that displays the document.
///
/// All calls happen synchronously on the thread driving the
/// [`EditorSession`](crate::session::EditorSession).
pub trait EditorHost {
    /// Select `range` in the display surface and return input focus to the document.
    fn select_range(&mut self, range: TextRange<'_>);

    /// Show a non-fatal informational message (e.g. "Text not found.").
    fn notify_user(&mut self, message: &str);

    /// Current state of the host's "case sensitive" toggle.
    ///
    /// `None` means the host has no toggle; the session falls back to its configuration.
    fn comparison_mode_requested(&self) -> Option<bool> {
        None
    }
}
