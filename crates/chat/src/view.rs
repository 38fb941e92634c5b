use crate::message::{EntryId, Role};
use crate::pending::PendingIndicator;
use crate::surface::ChatSurface;
use crate::transcript::Transcript;

/// Transcript, indicator and the page surface they are projected onto.
///
/// Every mutation goes through here so the data model and the page cannot drift.
pub struct ChatView<S> {
    transcript: Transcript,
    indicator: PendingIndicator,
    surface: S,
}

impl<S: ChatSurface> ChatView<S> {
    pub fn new(surface: S) -> Self {
        Self {
            transcript: Transcript::new(),
            indicator: PendingIndicator::new(),
            surface,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn indicator(&self) -> PendingIndicator {
        self.indicator
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Records the entry and inserts its node at the end of the transcript view.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> EntryId {
        let entry = self.transcript.append(role, content);
        self.surface.append_entry(entry);
        tracing::debug!(entry = entry.id.0, role = ?role, "transcript entry appended");
        entry.id
    }

    pub fn scroll_to_latest(&mut self) {
        self.surface.scroll_to_latest();
    }

    pub fn read_input(&self) -> String {
        self.surface.read_input()
    }

    pub fn clear_input(&mut self) {
        self.surface.clear_input();
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.surface.set_input_enabled(enabled);
    }

    pub fn show_pending(&mut self) {
        if self.indicator.show() {
            self.surface.set_indicator_visible(true);
        }
    }

    pub fn hide_pending(&mut self) {
        if self.indicator.hide() {
            self.surface.set_indicator_visible(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn append_keeps_transcript_and_surface_in_step() {
        let mut view = ChatView::new(MemorySurface::new());
        view.append(Role::User, "<b>x</b>");
        view.append(Role::Bot, "<p><strong>y</strong></p>");

        assert_eq!(view.transcript().len(), 2);
        assert_eq!(view.surface().nodes.len(), 2);
        assert_eq!(view.surface().inner_html(), view.transcript().render_html());
    }

    #[test]
    fn indicator_changes_reach_the_surface() {
        let mut view = ChatView::new(MemorySurface::new());
        view.show_pending();
        assert!(view.indicator().is_visible());
        assert!(view.surface().indicator_visible);

        view.hide_pending();
        assert!(!view.indicator().is_visible());
        assert!(!view.surface().indicator_visible);
    }
}
