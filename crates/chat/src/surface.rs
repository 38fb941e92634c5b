use crate::message::{MessageEntry, Role};
use crate::render::body_html;

/// Page elements the chat controller drives.
///
/// Implementations wrap the input field, the transcript container and the
/// pending indicator bound at startup.
pub trait ChatSurface {
    fn read_input(&self) -> String;
    fn clear_input(&mut self);
    fn set_input_enabled(&mut self, enabled: bool);
    /// Inserts a node for `entry` after every existing node.
    fn append_entry(&mut self, entry: &MessageEntry);
    fn scroll_to_latest(&mut self);
    fn set_indicator_visible(&mut self, visible: bool);
}

/// Rendered node as kept by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNode {
    pub role: Role,
    pub class: &'static str,
    pub inner_html: String,
}

/// Headless surface that records what a page would show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub input: String,
    pub input_disabled: bool,
    pub nodes: Vec<MemoryNode>,
    pub indicator_visible: bool,
    /// Index of the node the viewport was last scrolled to, if any.
    pub scrolled_to: Option<usize>,
    pub scroll_requests: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn inner_html(&self) -> String {
        self.nodes
            .iter()
            .map(|node| format!("<div class=\"{}\">{}</div>", node.class, node.inner_html))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChatSurface for MemorySurface {
    fn read_input(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_disabled = !enabled;
    }

    fn append_entry(&mut self, entry: &MessageEntry) {
        self.nodes.push(MemoryNode {
            role: entry.role,
            class: entry.role.css_class(),
            inner_html: body_html(&entry.body()),
        });
    }

    fn scroll_to_latest(&mut self) {
        self.scroll_requests += 1;
        self.scrolled_to = self.nodes.len().checked_sub(1);
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        self.indicator_visible = visible;
    }
}
