/// Two-state "awaiting answer" flag. No timers: only exchange completion hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingIndicator {
    visible: bool,
}

impl PendingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true when the state changed.
    pub fn show(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    /// Returns true when the state changed.
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}
