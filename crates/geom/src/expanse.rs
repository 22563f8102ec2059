use super::{Point, Rect, Thickness};

/// An `Expanse` is a width and height with no location. Measurement works in
/// expanses, and arrangement turns them into `Rect`s.
///
/// Components may be negative while a value is being computed; everything the
/// layout engine stores has passed through [`Expanse::clamped`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Expanse {
    /// Construct an expanse.
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// The zero expanse.
    pub const fn zero() -> Self {
        Self { w: 0, h: 0 }
    }

    /// The area of this expanse, zero if either side is non-positive.
    pub fn area(&self) -> i64 {
        let c = self.clamped();
        c.w as i64 * c.h as i64
    }

    /// Return a copy with negative components clamped to zero.
    pub fn clamped(&self) -> Self {
        Self {
            w: self.w.max(0),
            h: self.h.max(0),
        }
    }

    /// Remove a thickness from this expanse, clamping at zero.
    pub fn shrink(&self, t: Thickness) -> Self {
        Self {
            w: self.w.saturating_sub(t.horizontal()),
            h: self.h.saturating_sub(t.vertical()),
        }
        .clamped()
    }

    /// Add a thickness to this expanse.
    pub fn grow(&self, t: Thickness) -> Self {
        Self {
            w: self.w.saturating_add(t.horizontal()),
            h: self.h.saturating_add(t.vertical()),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// Component-wise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self {
            w: self.w.min(other.w),
            h: self.h.min(other.h),
        }
    }

    /// A `Rect` of this size at the given location.
    pub fn at(&self, tl: Point) -> Rect {
        Rect {
            tl,
            w: self.w.max(0),
            h: self.h.max(0),
        }
    }

    /// A `Rect` of this size at the origin.
    pub fn rect(&self) -> Rect {
        self.at(Point::zero())
    }

    /// True if this expanse can enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(i32, i32)> for Expanse {
    fn from(v: (i32, i32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_clamps() {
        let e = Expanse::new(10, 4);
        assert_eq!(e.shrink(Thickness::uniform(3)), Expanse::new(4, 0));
        assert_eq!(Expanse::new(-3, 2).clamped(), Expanse::new(0, 2));
    }

    #[test]
    fn grow_then_shrink() {
        let t = Thickness::new(1, 2, 3, 4);
        let e = Expanse::new(10, 10);
        assert_eq!(e.grow(t), Expanse::new(14, 16));
        assert_eq!(e.grow(t).shrink(t), e);
    }

    #[test]
    fn area_of_negative_is_zero() {
        assert_eq!(Expanse::new(-1, 5).area(), 0);
        assert_eq!(Expanse::new(3, 5).area(), 15);
    }
}
