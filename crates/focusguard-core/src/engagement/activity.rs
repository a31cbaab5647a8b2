//! Input activity tracking.

/// Read-only view of the latest user input, injected into the scorer.
pub trait ActivitySource {
    fn last_key_ms(&self) -> u64;
    fn last_mouse_ms(&self) -> u64;
    fn last_scroll_ms(&self) -> u64;
    fn is_window_focused(&self) -> bool;
}

/// Activity timestamps updated directly by raw input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputActivity {
    last_key_ms: u64,
    last_mouse_ms: u64,
    last_scroll_ms: u64,
    visible: bool,
    window_focused: bool,
}

impl InputActivity {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_key_ms: now_ms,
            last_mouse_ms: now_ms,
            last_scroll_ms: now_ms,
            visible: true,
            window_focused: true,
        }
    }

    /// A keypress also counts as pointer activity.
    pub fn record_key(&mut self, now_ms: u64) {
        self.last_key_ms = now_ms;
        self.last_mouse_ms = now_ms;
    }

    pub fn record_mouse(&mut self, now_ms: u64) {
        self.last_mouse_ms = now_ms;
    }

    pub fn record_scroll(&mut self, now_ms: u64) {
        self.last_scroll_ms = now_ms;
    }

    /// Returns `true` on a visible -> hidden transition. A hidden page also
    /// counts as an unfocused window for the no-input decay.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let became_hidden = self.visible && !visible;
        self.visible = visible;
        self.window_focused = visible;
        became_hidden
    }

    pub fn set_window_focused(&mut self, focused: bool) {
        self.window_focused = focused;
    }
}

impl ActivitySource for InputActivity {
    fn last_key_ms(&self) -> u64 {
        self.last_key_ms
    }

    fn last_mouse_ms(&self) -> u64 {
        self.last_mouse_ms
    }

    fn last_scroll_ms(&self) -> u64 {
        self.last_scroll_ms
    }

    fn is_window_focused(&self) -> bool {
        self.window_focused
    }
}
