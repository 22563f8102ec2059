//! Built-in widgets.

/// Block widget.
pub mod block;
/// Border component element.
pub mod border;
/// Resize grip component element.
pub mod grip;
/// Panel widget.
pub mod panel;
/// Vertical stack widget.
pub mod vstack;
/// Nested window widget.
pub mod window;

pub use block::Block;
pub use border::Border;
pub use grip::ResizeGrip;
pub use panel::Panel;
pub use vstack::VStack;
pub use window::Window;

use crate::{
    render::Color,
    visual::{Primary, Secondary, VisualState},
};

/// Colours for the built-in widgets, looked up from the Core's resources.
/// Widgets fall back to [`Palette::default`] when none is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Window and panel backgrounds.
    pub background: Color,
    /// Borders and grips.
    pub border: Color,
    /// Selected elements.
    pub selected: Color,
    /// Hovered elements.
    pub hover: Color,
    /// Pressed elements.
    pub pressed: Color,
    /// Disabled elements.
    pub disabled: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x00, 0x2b, 0x36),
            border: Color::rgb(0x58, 0x6e, 0x75),
            selected: Color::rgb(0x26, 0x8b, 0xd2),
            hover: Color::rgb(0x93, 0xa1, 0xa1),
            pressed: Color::rgb(0xcb, 0x4b, 0x16),
            disabled: Color::rgb(0x07, 0x36, 0x42),
        }
    }
}

impl Palette {
    /// Pick the colour for an element in a visual state, starting from its
    /// normal colour.
    pub fn brush(&self, normal: Color, state: VisualState) -> Color {
        match (state.primary, state.secondary) {
            (Primary::Disabled, _) => self.disabled,
            (_, Secondary::Pressed) => self.pressed,
            (_, Secondary::Hovered) => self.hover,
            (Primary::Selected, Secondary::None) => self.selected,
            (Primary::Normal, Secondary::None) => normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush() {
        let p = Palette::default();
        let c = Color::WHITE;
        assert_eq!(p.brush(c, VisualState::derive(true, false, false, false)), c);
        assert_eq!(p.brush(c, VisualState::derive(true, true, false, false)), p.selected);
        assert_eq!(p.brush(c, VisualState::derive(true, true, false, true)), p.hover);
        assert_eq!(p.brush(c, VisualState::derive(true, false, true, true)), p.pressed);
        assert_eq!(p.brush(c, VisualState::derive(false, true, true, true)), p.disabled);
    }
}
