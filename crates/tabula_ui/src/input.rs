//! Platform input events and pointer bookkeeping.

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// One platform input event, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved.
    PointerMove {
        /// X position.
        x: f64,
        /// Y position.
        y: f64,
    },
    /// Button pressed.
    PointerDown {
        /// X position.
        x: f64,
        /// Y position.
        y: f64,
        /// Button.
        button: MouseButton,
    },
    /// Button released.
    PointerUp {
        /// X position.
        x: f64,
        /// Y position.
        y: f64,
        /// Button.
        button: MouseButton,
    },
    /// Scroll wheel.
    Wheel {
        /// Wheel delta; positive zooms in.
        dz: f64,
    },
    /// The window lost focus.
    FocusLost,
    /// The window regained focus.
    FocusGained,
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<(f64, f64)> {
        match *self {
            Self::PointerMove { x, y }
            | Self::PointerDown { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((x, y)),
            Self::Wheel { .. } | Self::FocusLost | Self::FocusGained => None,
        }
    }
}

/// Where the pointer is and where it was before the last event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Current X position.
    pub x: f64,
    /// Current Y position.
    pub y: f64,
    /// X position before the last event.
    pub prev_x: f64,
    /// Y position before the last event.
    pub prev_y: f64,
}

impl PointerState {
    /// Creates a pointer at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        if let Some((x, y)) = event.position() {
            self.prev_x = self.x;
            self.prev_y = self.y;
            self.x = x;
            self.y = y;
        }
    }

    /// Movement caused by the last positional event.
    #[must_use]
    pub fn delta(&self) -> (f64, f64) {
        (self.x - self.prev_x, self.y - self.prev_y)
    }
}
