//! Components: auxiliary elements that a host arranges around, over or
//! under its primary content.
//!
//! A component wraps a single element (a border, a header, a resize grip)
//! and tells the host how that element negotiates space with the content:
//! which sides it consumes, which axes it shares with the content, and how
//! its rectangle is derived from the space the host offers it.

use std::fmt;

use crate::geom::{
    HorizontalAlignment, Rect, Side, Thickness, VerticalAlignment, apply_alignment,
};

/// When a component element is updated relative to the host's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UpdatePriority {
    /// Before the host's content.
    BeforeContents,
    /// After the host's content.
    #[default]
    AfterContents,
}

/// When a component element is drawn relative to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DrawPriority {
    /// Before the host's background.
    BeforeBackground,
    /// Between the host's background and the host itself.
    BeforeSelf,
    /// Between the host and its content.
    #[default]
    BeforeContents,
    /// On top of the host's content.
    AfterContents,
}

/// Which sides of the host a component takes space from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Consumes {
    /// Takes space from the left.
    pub left: bool,
    /// Takes space from the top.
    pub top: bool,
    /// Takes space from the right.
    pub right: bool,
    /// Takes space from the bottom.
    pub bottom: bool,
}

impl Consumes {
    /// Consumes nothing: a pure overlay.
    pub const NONE: Self = Self::new(false, false, false, false);
    /// Consumes all four sides, like a border.
    pub const ALL: Self = Self::new(true, true, true, true);

    /// Construct from the four side flags.
    pub const fn new(left: bool, top: bool, right: bool, bottom: bool) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Consume only one side.
    pub const fn side(side: Side) -> Self {
        match side {
            Side::Left => Self::new(true, false, false, false),
            Side::Top => Self::new(false, true, false, false),
            Side::Right => Self::new(false, false, true, false),
            Side::Bottom => Self::new(false, false, false, true),
        }
    }

    /// Does this consume anything?
    pub fn any(&self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

/// Derives a component's rectangle from the available slot and its
/// measured thickness.
pub type ArrangeFn = Box<dyn Fn(Rect, Thickness) -> Rect + Send + Sync>;

/// Arrange a component over the whole available slot.
pub fn fill() -> ArrangeFn {
    Box::new(|available, _| available)
}

/// Arrange a component at its measured size, aligned within the slot.
pub fn aligned(h: HorizontalAlignment, v: VerticalAlignment) -> ArrangeFn {
    Box::new(move |available, measured| apply_alignment(available, h, v, measured.size()))
}

/// Arrange a component as a strip along one edge of the slot, using the
/// measured extent across that edge.
pub fn dock(side: Side) -> ArrangeFn {
    Box::new(move |available, measured| {
        let size = measured.size();
        match side {
            Side::Left => Rect::new(
                available.tl.x,
                available.tl.y,
                size.w.min(available.w),
                available.h,
            ),
            Side::Right => {
                let w = size.w.min(available.w);
                Rect::new(available.right() - w, available.tl.y, w, available.h)
            }
            Side::Top => Rect::new(
                available.tl.x,
                available.tl.y,
                available.w,
                size.h.min(available.h),
            ),
            Side::Bottom => {
                let h = size.h.min(available.h);
                Rect::new(available.tl.x, available.bottom() - h, available.w, h)
            }
        }
    })
}

/// A description of how a wrapped element participates in its host's
/// layout, update and draw passes.
pub struct Component {
    /// Update ordering relative to content.
    pub(crate) update_priority: UpdatePriority,
    /// Draw ordering relative to the host.
    pub(crate) draw_priority: DrawPriority,
    /// Sides this component consumes.
    pub(crate) consumes: Consumes,
    /// Width is shared with the content rather than added to it.
    pub(crate) shares_width: bool,
    /// Height is shared with the content rather than added to it.
    pub(crate) shares_height: bool,
    /// Carved from inside the host's padding rather than outside it.
    pub(crate) uses_owners_padding: bool,
    /// Arrangement function.
    pub(crate) arrange: ArrangeFn,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("update_priority", &self.update_priority)
            .field("draw_priority", &self.draw_priority)
            .field("consumes", &self.consumes)
            .field("shares_width", &self.shares_width)
            .field("shares_height", &self.shares_height)
            .field("uses_owners_padding", &self.uses_owners_padding)
            .finish_non_exhaustive()
    }
}

impl Default for Component {
    fn default() -> Self {
        Self {
            update_priority: UpdatePriority::default(),
            draw_priority: DrawPriority::default(),
            consumes: Consumes::NONE,
            shares_width: false,
            shares_height: false,
            uses_owners_padding: true,
            arrange: fill(),
        }
    }
}

impl Component {
    /// Start building a component.
    pub fn builder() -> ComponentBuilder {
        ComponentBuilder::default()
    }

    /// Update priority.
    pub fn update_priority(&self) -> UpdatePriority {
        self.update_priority
    }

    /// Draw priority.
    pub fn draw_priority(&self) -> DrawPriority {
        self.draw_priority
    }

    /// Consumed sides.
    pub fn consumes(&self) -> Consumes {
        self.consumes
    }

    /// Whether width is shared with the content.
    pub fn shares_width(&self) -> bool {
        self.shares_width
    }

    /// Whether height is shared with the content.
    pub fn shares_height(&self) -> bool {
        self.shares_height
    }

    /// Whether this component is carved inside the host's padding.
    pub fn uses_owners_padding(&self) -> bool {
        self.uses_owners_padding
    }

    /// Does this component take space from the host at all?
    pub fn consumes_any_space(&self) -> bool {
        self.consumes.any()
    }

    /// The thickness this component reserves from its host, given the
    /// thickness its element measured to.
    ///
    /// Consuming both sides of an axis keeps the measured edges as they are.
    /// Consuming one side puts the whole extent on that side. Consuming
    /// neither reserves nothing on that axis.
    pub fn reserve(&self, measured: Thickness) -> Thickness {
        let m = measured.clamped();
        let (left, right) = match (self.consumes.left, self.consumes.right) {
            (true, true) => (m.left, m.right),
            (true, false) => (m.width(), 0),
            (false, true) => (0, m.width()),
            (false, false) => (0, 0),
        };
        let (top, bottom) = match (self.consumes.top, self.consumes.bottom) {
            (true, true) => (m.top, m.bottom),
            (true, false) => (m.height(), 0),
            (false, true) => (0, m.height()),
            (false, false) => (0, 0),
        };
        Thickness::new(left, top, right, bottom)
    }

    /// Compute this component's rectangle within `available`.
    ///
    /// The result is not validated: overlays may extend outside the host.
    pub fn arrange(&self, available: Rect, measured: Thickness) -> Rect {
        (self.arrange)(available, measured)
    }
}

/// Builder for [`Component`].
#[derive(Debug, Default)]
pub struct ComponentBuilder {
    /// Component under construction.
    component: Component,
}

impl ComponentBuilder {
    /// Set the update priority.
    pub fn update_priority(mut self, p: UpdatePriority) -> Self {
        self.component.update_priority = p;
        self
    }

    /// Set the draw priority.
    pub fn draw_priority(mut self, p: DrawPriority) -> Self {
        self.component.draw_priority = p;
        self
    }

    /// Set the consumed sides.
    pub fn consumes(mut self, consumes: Consumes) -> Self {
        self.component.consumes = consumes;
        self
    }

    /// Share width with the content.
    pub fn shares_width(mut self, v: bool) -> Self {
        self.component.shares_width = v;
        self
    }

    /// Share height with the content.
    pub fn shares_height(mut self, v: bool) -> Self {
        self.component.shares_height = v;
        self
    }

    /// Carve this component inside the host's padding.
    pub fn uses_owners_padding(mut self, v: bool) -> Self {
        self.component.uses_owners_padding = v;
        self
    }

    /// Set the arrangement function.
    pub fn arrange(mut self, f: ArrangeFn) -> Self {
        self.component.arrange = f;
        self
    }

    /// Set the arrangement function from a closure.
    pub fn arrange_with<F>(self, f: F) -> Self
    where
        F: Fn(Rect, Thickness) -> Rect + Send + Sync + 'static,
    {
        self.arrange(Box::new(f))
    }

    /// Finish building.
    pub fn build(self) -> Component {
        self.component
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geom::Expanse;

    #[test]
    fn defaults() {
        let c = Component::builder().build();
        assert_eq!(c.update_priority(), UpdatePriority::AfterContents);
        assert_eq!(c.draw_priority(), DrawPriority::BeforeContents);
        assert!(!c.consumes_any_space());
        assert!(!c.shares_width() && !c.shares_height());
        assert!(c.uses_owners_padding());
        assert_eq!(c.reserve(Thickness::uniform(3)), Thickness::zero());
    }

    #[test]
    fn reserve() {
        let m = Thickness::new(1, 2, 3, 4);

        let both = Component::builder().consumes(Consumes::ALL).build();
        assert_eq!(both.reserve(m), m);

        let left = Component::builder()
            .consumes(Consumes::side(Side::Left))
            .build();
        assert_eq!(left.reserve(m), Thickness::new(4, 0, 0, 0));

        let right = Component::builder()
            .consumes(Consumes::side(Side::Right))
            .build();
        assert_eq!(right.reserve(m), Thickness::new(0, 0, 4, 0));

        let bottom = Component::builder()
            .consumes(Consumes::side(Side::Bottom))
            .build();
        assert_eq!(bottom.reserve(m), Thickness::new(0, 0, 0, 6));

        // Negative input never leaks into the reservation.
        assert_eq!(both.reserve(Thickness::uniform(-2)), Thickness::zero());
    }

    #[test]
    fn arrange_fns() {
        let slot = Rect::new(10, 10, 20, 10);
        let m = Thickness::new(0, 0, 4, 2);

        assert_eq!(fill()(slot, m), slot);
        assert_eq!(
            aligned(HorizontalAlignment::Right, VerticalAlignment::Bottom)(slot, m),
            Rect::new(26, 18, 4, 2)
        );
        assert_eq!(dock(Side::Left)(slot, m), Rect::new(10, 10, 4, 10));
        assert_eq!(dock(Side::Right)(slot, m), Rect::new(26, 10, 4, 10));
        assert_eq!(dock(Side::Top)(slot, m), Rect::new(10, 10, 20, 2));
        assert_eq!(dock(Side::Bottom)(slot, m), Rect::new(10, 18, 20, 2));

        // Oversized measurements are held to the slot.
        assert_eq!(
            dock(Side::Right)(slot, Thickness::new(0, 0, 50, 0)),
            slot
        );
    }

    #[test]
    fn custom_arrange() {
        let c = Component::builder()
            .arrange_with(|r, _| r.translate((0, -5).into()))
            .build();
        assert_eq!(
            c.arrange(Rect::new(0, 0, 3, 3), Thickness::zero()),
            Rect::new(0, -5, 3, 3)
        );
    }

    proptest! {
        #[test]
        fn left_only_reserves_full_width(l in 0..100i32, r in 0..100i32, t in 0..100i32, b in 0..100i32) {
            let c = Component::builder().consumes(Consumes::side(Side::Left)).build();
            let res = c.reserve(Thickness::new(l, t, r, b));
            prop_assert_eq!(res, Thickness::new(l + r, 0, 0, 0));
        }

        #[test]
        fn reservation_never_negative(l in -50..50i32, r in -50..50i32, t in -50..50i32, b in -50..50i32,
                                     cl: bool, ct: bool, cr: bool, cb: bool) {
            let c = Component::builder().consumes(Consumes::new(cl, ct, cr, cb)).build();
            let res = c.reserve(Thickness::new(l, t, r, b));
            prop_assert!(res.left >= 0 && res.top >= 0 && res.right >= 0 && res.bottom >= 0);
            prop_assert!(res.size().w <= Expanse::new(l.max(0) + r.max(0), 0).w);
        }
    }
}
