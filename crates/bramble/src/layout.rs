//! Per-element layout properties and measurement results.

use crate::geom::{Expanse, HorizontalAlignment, Thickness, VerticalAlignment};

/// Visibility of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Measured, arranged, updated, drawn and hit-tested.
    #[default]
    Visible,
    /// Reserves layout space and is updated, but is not drawn or hit-tested.
    Hidden,
    /// Takes no space and is skipped by update, draw and hit-testing.
    Collapsed,
}

impl Visibility {
    /// Does this element participate in drawing and hit-testing?
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }

    /// Does this element take up layout space?
    pub fn takes_space(self) -> bool {
        self != Self::Collapsed
    }
}

/// Layout properties for an element.
///
/// Size constraints apply to the element excluding its margin. Negative
/// values are treated as zero wherever they are consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    /// Minimum width.
    pub min_width: Option<i32>,
    /// Maximum width.
    pub max_width: Option<i32>,
    /// Minimum height.
    pub min_height: Option<i32>,
    /// Maximum height.
    pub max_height: Option<i32>,
    /// Preferred width, overriding the measured width.
    pub width: Option<i32>,
    /// Preferred height, overriding the measured height.
    pub height: Option<i32>,
    /// Space outside the element, inside its layout slot.
    pub margin: Thickness,
    /// Space between the element's edge and its components and content.
    pub padding: Thickness,
    /// Horizontal placement within the slot.
    pub horizontal: HorizontalAlignment,
    /// Vertical placement within the slot.
    pub vertical: VerticalAlignment,
}

impl Layout {
    /// A layout with all defaults: stretch on both axes, no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum width.
    pub fn min_width(mut self, v: i32) -> Self {
        self.min_width = Some(v);
        self
    }

    /// Set the maximum width.
    pub fn max_width(mut self, v: i32) -> Self {
        self.max_width = Some(v);
        self
    }

    /// Set the minimum height.
    pub fn min_height(mut self, v: i32) -> Self {
        self.min_height = Some(v);
        self
    }

    /// Set the maximum height.
    pub fn max_height(mut self, v: i32) -> Self {
        self.max_height = Some(v);
        self
    }

    /// Set the preferred width.
    pub fn width(mut self, v: i32) -> Self {
        self.width = Some(v);
        self
    }

    /// Set the preferred height.
    pub fn height(mut self, v: i32) -> Self {
        self.height = Some(v);
        self
    }

    /// Set the preferred size on both axes.
    pub fn size(self, size: Expanse) -> Self {
        self.width(size.w).height(size.h)
    }

    /// Set the margin.
    pub fn margin(mut self, margin: impl Into<Thickness>) -> Self {
        self.margin = margin.into();
        self
    }

    /// Set the padding.
    pub fn padding(mut self, padding: impl Into<Thickness>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Set both alignments.
    pub fn align(mut self, h: HorizontalAlignment, v: VerticalAlignment) -> Self {
        self.horizontal = h;
        self.vertical = v;
        self
    }

    /// Resolve the final width from a measured one: preferred overrides,
    /// then `[min, max]` clamps, with min winning when they are inverted.
    pub(crate) fn resolve_width(&self, measured: i32) -> i32 {
        resolve_axis(measured, self.width, self.min_width, self.max_width)
    }

    /// Resolve the final height from a measured one.
    pub(crate) fn resolve_height(&self, measured: i32) -> i32 {
        resolve_axis(measured, self.height, self.min_height, self.max_height)
    }
}

/// Preferred-then-clamp resolution along one axis.
fn resolve_axis(measured: i32, preferred: Option<i32>, min: Option<i32>, max: Option<i32>) -> i32 {
    let mut v = preferred.unwrap_or(measured).max(0);
    if let Some(max) = max {
        v = v.min(max.max(0));
    }
    if let Some(min) = min {
        v = v.max(min.max(0));
    }
    v
}

/// The result of an element's self-measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfMeasure {
    /// Border-like space the element itself occupies around its content.
    pub thickness: Thickness,
    /// Portion of `thickness` that overlaps the content rather than adding
    /// to it.
    pub shared: Thickness,
}

impl SelfMeasure {
    /// A self-measurement occupying `thickness` with no overlap.
    pub fn new(thickness: impl Into<Thickness>) -> Self {
        Self {
            thickness: thickness.into(),
            shared: Thickness::zero(),
        }
    }
}

/// The result of measuring an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Total size the element wants, margin included.
    pub desired: Expanse,
    /// Space taken around the content: margin, padding, component
    /// reservations and self thickness.
    pub consumed: Thickness,
    /// Size of the primary content.
    pub content: Expanse,
    /// Overlap between components or self thickness and the content.
    pub shared: Thickness,
    /// The element's own thickness from self-measurement.
    pub own: Thickness,
}

impl Measurement {
    /// The measurement of an element that takes no space.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Fold the desired size into a thickness, the form in which a component
    /// element reports its size to its host.
    ///
    /// The near sides keep the consumed thickness and the far sides take
    /// the remainder, so `requested().size() == desired`.
    pub fn requested(&self) -> Thickness {
        let left = self.consumed.left.clamp(0, self.desired.w.max(0));
        let top = self.consumed.top.clamp(0, self.desired.h.max(0));
        Thickness::new(left, top, self.desired.w - left, self.desired.h - top).clamped()
    }
}
