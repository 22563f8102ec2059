use super::{Rect, Thickness};

/// The edge rectangles carved from a rect by a thickness, for drawing
/// borders. Corners belong to the top and bottom edges.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Frame {
    /// Top edge, full width.
    pub top: Rect,
    /// Bottom edge, full width.
    pub bottom: Rect,
    /// Left edge, between top and bottom.
    pub left: Rect,
    /// Right edge, between top and bottom.
    pub right: Rect,
    /// The original outer rect.
    outer: Rect,
    /// The edge widths, clamped to fit.
    thickness: Thickness,
}

impl Frame {
    /// Construct a frame. Edge widths are clamped to be non-negative and to
    /// fit inside the rect, so a small rect yields thinner edges rather than
    /// overlapping ones.
    pub fn new(rect: Rect, thickness: Thickness) -> Self {
        let t = thickness.clamped();
        let top = t.top.min(rect.h);
        let bottom = t.bottom.min(rect.h - top);
        let left = t.left.min(rect.w);
        let right = t.right.min(rect.w - left);
        let middle_h = rect.h - top - bottom;
        let thickness = Thickness::new(left, top, right, bottom);
        Self {
            top: Rect::new(rect.tl.x, rect.tl.y, rect.w, top),
            bottom: Rect::new(rect.tl.x, rect.bottom() - bottom, rect.w, bottom),
            left: Rect::new(rect.tl.x, rect.tl.y + top, left, middle_h),
            right: Rect::new(rect.right() - right, rect.tl.y + top, right, middle_h),
            outer: rect,
            thickness,
        }
    }

    /// The space inside the frame.
    pub fn inner(&self) -> Rect {
        self.outer.shrink(self.thickness)
    }

    /// The original rect passed to [`Frame::new`].
    pub fn outer(&self) -> Rect {
        self.outer
    }

    /// The non-empty edge rectangles, top, right, bottom, left.
    pub fn edges(&self) -> impl Iterator<Item = Rect> + '_ {
        [self.top, self.right, self.bottom, self.left]
            .into_iter()
            .filter(|r| !r.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tframe() {
        let r = Rect::new(10, 10, 10, 10);
        let f = Frame::new(r, Thickness::uniform(1));
        assert_eq!(f.top, Rect::new(10, 10, 10, 1));
        assert_eq!(f.bottom, Rect::new(10, 19, 10, 1));
        assert_eq!(f.left, Rect::new(10, 11, 1, 8));
        assert_eq!(f.right, Rect::new(19, 11, 1, 8));
        assert_eq!(f.inner(), Rect::new(11, 11, 8, 8));
        assert_eq!(f.outer(), r);
        assert_eq!(f.edges().count(), 4);
    }

    #[test]
    fn uneven_and_oversized() {
        let r = Rect::new(0, 0, 6, 4);
        let f = Frame::new(r, Thickness::new(0, 3, 2, 3));
        assert_eq!(f.top, Rect::new(0, 0, 6, 3));
        assert_eq!(f.bottom, Rect::new(0, 3, 6, 1));
        assert_eq!(f.left, Rect::new(0, 3, 0, 0));
        assert_eq!(f.edges().count(), 2);
        assert_eq!(f.inner(), Rect::new(0, 3, 4, 0));
    }
}
