use super::{Expanse, Point, Thickness};

/// A rectangle with a signed origin. Width and height are never negative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Construct a rectangle. Negative sizes are clamped to zero.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            tl: Point { x, y },
            w: w.max(0),
            h: h.max(0),
        }
    }

    /// A zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a rectangle from its top-left and bottom-right corners.
    pub fn from_corners(tl: Point, br: Point) -> Self {
        Self::new(tl.x, tl.y, br.x.saturating_sub(tl.x), br.y.saturating_sub(tl.y))
    }

    /// Does this rect have a zero area?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.tl.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.tl.y.saturating_add(self.h)
    }

    /// Bottom-right corner (exclusive).
    pub fn br(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// The size of this rect.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// True if the point falls inside the rectangle. The right and bottom
    /// edges are exclusive.
    pub fn contains_point(&self, p: impl Into<Point>) -> bool {
        let p = p.into();
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// True if `other` lies entirely within this rect.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Move the rectangle by an offset.
    pub fn translate(&self, by: Point) -> Self {
        Self {
            tl: self.tl + by,
            w: self.w,
            h: self.h,
        }
    }

    /// Move the rectangle so its top-left is at `tl`.
    pub fn at(&self, tl: Point) -> Self {
        Self {
            tl,
            w: self.w,
            h: self.h,
        }
    }

    /// Remove a thickness from the edges of this rect. When an axis does not
    /// fit, the result collapses to zero extent at the near edge's inset,
    /// clamped so it never leaves the original rect.
    pub fn shrink(&self, t: Thickness) -> Self {
        let x = self.tl.x.saturating_add(t.left).min(self.right());
        let y = self.tl.y.saturating_add(t.top).min(self.bottom());
        Self::new(
            x,
            y,
            self.w.saturating_sub(t.horizontal()),
            self.h.saturating_sub(t.vertical()),
        )
    }

    /// Add a thickness around the edges of this rect.
    pub fn grow(&self, t: Thickness) -> Self {
        Self::new(
            self.tl.x.saturating_sub(t.left),
            self.tl.y.saturating_sub(t.top),
            self.w.saturating_add(t.horizontal()),
            self.h.saturating_add(t.vertical()),
        )
    }

    /// The overlapping region of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.tl.x.max(other.tl.x);
        let top = self.tl.y.max(other.tl.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            None
        } else {
            Some(Self::new(left, top, right - left, bottom - top))
        }
    }

    /// Replace the horizontal span of this rect with the span of `other`.
    pub fn with_hspan(&self, other: &Self) -> Self {
        Self::new(other.tl.x, self.tl.y, other.w, self.h)
    }

    /// Replace the vertical span of this rect with the span of `other`.
    pub fn with_vspan(&self, other: &Self) -> Self {
        Self::new(self.tl.x, other.tl.y, self.w, other.h)
    }
}

impl From<Expanse> for Rect {
    fn from(e: Expanse) -> Self {
        e.rect()
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from(v: (i32, i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}
