use super::{Expanse, Rect};

/// Horizontal placement of a desired size inside available bounds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Anchor at the left edge.
    Left,
    /// Centre, with odd excess going to the right.
    Center,
    /// Anchor at the right edge.
    Right,
    /// Take the full available width.
    #[default]
    Stretch,
}

/// Vertical placement of a desired size inside available bounds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Anchor at the top edge.
    Top,
    /// Centre, with odd excess going to the bottom.
    Center,
    /// Anchor at the bottom edge.
    Bottom,
    /// Take the full available height.
    #[default]
    Stretch,
}

/// Alignment along one axis, shared by both enums.
#[derive(Clone, Copy)]
enum Anchor {
    /// Near edge.
    Start,
    /// Middle.
    Center,
    /// Far edge.
    End,
    /// Full extent.
    Stretch,
}

impl From<HorizontalAlignment> for Anchor {
    fn from(a: HorizontalAlignment) -> Self {
        match a {
            HorizontalAlignment::Left => Self::Start,
            HorizontalAlignment::Center => Self::Center,
            HorizontalAlignment::Right => Self::End,
            HorizontalAlignment::Stretch => Self::Stretch,
        }
    }
}

impl From<VerticalAlignment> for Anchor {
    fn from(a: VerticalAlignment) -> Self {
        match a {
            VerticalAlignment::Top => Self::Start,
            VerticalAlignment::Center => Self::Center,
            VerticalAlignment::Bottom => Self::End,
            VerticalAlignment::Stretch => Self::Stretch,
        }
    }
}

/// Resolve one axis: returns `(start, extent)`.
fn align_axis(start: i32, available: i32, desired: i32, anchor: Anchor) -> (i32, i32) {
    let available = available.max(0);
    if let Anchor::Stretch = anchor {
        return (start, available);
    }
    let extent = desired.clamp(0, available);
    let excess = available - extent;
    let offset = match anchor {
        Anchor::Start | Anchor::Stretch => 0,
        Anchor::Center => excess / 2,
        Anchor::End => excess,
    };
    (start.saturating_add(offset), extent)
}

/// Place `desired` inside `available` according to the two alignments.
///
/// `Stretch` returns the available extent on that axis regardless of the
/// desired size. Every other alignment clamps the desired size into
/// `[0, available]` first.
pub fn apply_alignment(
    available: Rect,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
    desired: Expanse,
) -> Rect {
    let (x, w) = align_axis(available.tl.x, available.w, desired.w, horizontal.into());
    let (y, h) = align_axis(available.tl.y, available.h, desired.h, vertical.into());
    Rect::new(x, y, w, h)
}
