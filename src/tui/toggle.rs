// src/tui/toggle.rs — Open/closed state owned by a single UI element.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggle {
    open: bool,
}

impl Toggle {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }
}
