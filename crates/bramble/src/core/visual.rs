//! Visual state derivation.
//!
//! Visual state is never stored: it is computed on demand from the flags
//! that are, so it cannot drift out of sync with them.

/// Primary visual state, from the element's own flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primary {
    /// Enabled and not selected.
    #[default]
    Normal,
    /// Selected.
    Selected,
    /// Disabled, either directly or through an ancestor.
    Disabled,
}

/// Secondary visual state, from pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Secondary {
    /// No pointer interaction.
    #[default]
    None,
    /// The pointer is over the element.
    Hovered,
    /// The element is being pressed.
    Pressed,
}

/// The combined visual state consumed by styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisualState {
    /// Primary state.
    pub primary: Primary,
    /// Secondary state.
    pub secondary: Secondary,
}

impl VisualState {
    /// Derive a visual state. Disabled beats selected; pressed beats hovered.
    pub fn derive(is_enabled: bool, is_selected: bool, is_pressed: bool, is_hovered: bool) -> Self {
        let primary = if !is_enabled {
            Primary::Disabled
        } else if is_selected {
            Primary::Selected
        } else {
            Primary::Normal
        };
        let secondary = if is_pressed {
            Secondary::Pressed
        } else if is_hovered {
            Secondary::Hovered
        } else {
            Secondary::None
        };
        Self { primary, secondary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive() {
        assert_eq!(
            VisualState::derive(false, true, true, true),
            VisualState {
                primary: Primary::Disabled,
                secondary: Secondary::Pressed
            }
        );
        assert_eq!(
            VisualState::derive(true, true, false, true),
            VisualState {
                primary: Primary::Selected,
                secondary: Secondary::Hovered
            }
        );
        assert_eq!(
            VisualState::derive(true, false, false, false),
            VisualState::default()
        );
    }

    #[test]
    fn exhaustive_priority() {
        for bits in 0..16u8 {
            let (e, s, p, h) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let v = VisualState::derive(e, s, p, h);
            assert_eq!(v.primary == Primary::Disabled, !e);
            assert_eq!(v.primary == Primary::Selected, e && s);
            assert_eq!(v.secondary == Secondary::Pressed, p);
            assert_eq!(v.secondary == Secondary::Hovered, !p && h);
        }
    }
}
