//! Terminal overlay state: open/closed, maximized, and a focus trap that
//! restores whatever had focus before the overlay opened.

/// The controls focus may land on while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFocus {
    Input,
    Maximize,
    Close,
}

const FOCUS_ORDER: [OverlayFocus; 3] = [OverlayFocus::Input, OverlayFocus::Maximize, OverlayFocus::Close];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open { maximized: bool, focus: OverlayFocus },
}

/// `F` is the caller's notion of focus (a page element, a mode, ...).
#[derive(Debug, Clone)]
pub struct Overlay<F> {
    state: OverlayState,
    restore: Option<F>,
}

impl<F> Default for Overlay<F> {
    fn default() -> Self {
        Self {
            state: OverlayState::Closed,
            restore: None,
        }
    }
}

impl<F> Overlay<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open { .. })
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self.state, OverlayState::Open { maximized: true, .. })
    }

    pub fn focus(&self) -> Option<OverlayFocus> {
        match self.state {
            OverlayState::Open { focus, .. } => Some(focus),
            OverlayState::Closed => None,
        }
    }

    /// Open and trap focus on the input. A second open keeps the first
    /// recorded focus.
    pub fn open(&mut self, previous: F) {
        if self.is_open() {
            return;
        }
        self.restore = Some(previous);
        self.state = OverlayState::Open {
            maximized: false,
            focus: OverlayFocus::Input,
        };
    }

    /// Close and hand back the focus recorded on open.
    pub fn close(&mut self) -> Option<F> {
        if !self.is_open() {
            return None;
        }
        self.state = OverlayState::Closed;
        self.restore.take()
    }

    /// Change what `close` will hand back. Ignored while closed.
    pub fn retarget(&mut self, previous: F) {
        if self.is_open() {
            self.restore = Some(previous);
        }
    }

    pub fn toggle_maximized(&mut self) {
        if let OverlayState::Open { maximized, .. } = &mut self.state {
            *maximized = !*maximized;
        }
    }

    /// Tab: next control, wrapping.
    pub fn focus_next(&mut self) {
        self.step(1);
    }

    /// Shift+Tab: previous control, wrapping.
    pub fn focus_prev(&mut self) {
        self.step(FOCUS_ORDER.len() - 1);
    }

    fn step(&mut self, by: usize) {
        if let OverlayState::Open { focus, .. } = &mut self.state {
            let idx = FOCUS_ORDER.iter().position(|f| f == focus).unwrap_or(0);
            *focus = FOCUS_ORDER[(idx + by) % FOCUS_ORDER.len()];
        }
    }
}
