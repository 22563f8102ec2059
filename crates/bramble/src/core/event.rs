//! Input snapshots and the events derived from them.

use std::{collections::BTreeSet, time::Duration};

use crate::geom::Point;

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button.
    Middle,
    /// Secondary button.
    Right,
}

/// A backend-defined key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u32);

/// The state of the input devices at the start of a frame. The pointer is
/// in screen space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Pointer position, if the pointer is over the window.
    pub pointer: Option<Point>,
    /// Buttons currently held.
    pub buttons: BTreeSet<MouseButton>,
    /// Keys currently held.
    pub keys: BTreeSet<KeyCode>,
}

impl InputSnapshot {
    /// A snapshot with only a pointer position.
    pub fn pointer_at(p: impl Into<Point>) -> Self {
        Self {
            pointer: Some(p.into()),
            ..Default::default()
        }
    }

    /// Add a held button.
    pub fn with_button(mut self, b: MouseButton) -> Self {
        self.buttons.insert(b);
        self
    }

    /// Add a held key.
    pub fn with_key(mut self, k: KeyCode) -> Self {
        self.keys.insert(k);
        self
    }

    /// Is the primary button held?
    pub fn primary_down(&self) -> bool {
        self.buttons.contains(&MouseButton::Left)
    }

    /// The events that take `prev` to `self`, in a stable order: pointer
    /// motion, button releases, button presses, key releases, key presses.
    pub fn diff(&self, prev: &Self) -> Vec<Event> {
        let mut events = vec![];
        if let Some(p) = self.pointer
            && self.pointer != prev.pointer
        {
            events.push(Event::PointerMoved { position: p });
        }
        let position = self.pointer.or(prev.pointer).unwrap_or_default();
        for &button in prev.buttons.difference(&self.buttons) {
            events.push(Event::PointerReleased { button, position });
        }
        for &button in self.buttons.difference(&prev.buttons) {
            events.push(Event::PointerPressed { button, position });
        }
        for &key in prev.keys.difference(&self.keys) {
            events.push(Event::KeyReleased(key));
        }
        for &key in self.keys.difference(&prev.keys) {
            events.push(Event::KeyPressed(key));
        }
        events
    }
}

/// An input event. Positions are in the layout space of the element
/// receiving the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The pointer moved.
    PointerMoved {
        /// New position.
        position: Point,
    },
    /// A button went down.
    PointerPressed {
        /// Button.
        button: MouseButton,
        /// Pointer position.
        position: Point,
    },
    /// A button went up.
    PointerReleased {
        /// Button.
        button: MouseButton,
        /// Pointer position.
        position: Point,
    },
    /// A key went down.
    KeyPressed(KeyCode),
    /// A key went up.
    KeyReleased(KeyCode),
}

impl Event {
    /// The pointer position carried by this event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerMoved { position }
            | Self::PointerPressed { position, .. }
            | Self::PointerReleased { position, .. } => Some(*position),
            Self::KeyPressed(_) | Self::KeyReleased(_) => None,
        }
    }

    /// Is this a pointer event?
    pub fn is_pointer(&self) -> bool {
        self.position().is_some()
    }

    /// A copy of this event with its position passed through `f`.
    pub(crate) fn map_position(self, f: impl FnOnce(Point) -> Point) -> Self {
        match self {
            Self::PointerMoved { position } => Self::PointerMoved {
                position: f(position),
            },
            Self::PointerPressed { button, position } => Self::PointerPressed {
                button,
                position: f(position),
            },
            Self::PointerReleased { button, position } => Self::PointerReleased {
                button,
                position: f(position),
            },
            e => e,
        }
    }
}

/// Per-frame arguments passed to update and draw.
#[derive(Debug, Clone, Default)]
pub struct FrameArgs {
    /// Time since the previous frame.
    pub elapsed: Duration,
    /// Input state for this frame.
    pub input: InputSnapshot,
}

impl FrameArgs {
    /// Frame arguments carrying an input snapshot.
    pub fn with_input(input: InputSnapshot) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }
}
