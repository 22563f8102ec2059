//! Coordinate spaces and conversion between them.
//!
//! Every element lays out in *layout space*, relative to the nearest
//! ancestor that establishes its own layout space (the window root, or a
//! nested window). Adding that anchor gives *unscaled screen* space, and
//! applying the window's scale and origin gives *screen* space, which is
//! what the renderer and the input snapshot speak.

use tracing::warn;

use crate::geom::{Point, Rect};

/// A coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSpace {
    /// Relative to the element's layout anchor.
    Layout,
    /// Window coordinates before scaling.
    UnscaledScreen,
    /// Final pixel coordinates.
    Screen,
}

/// Everything needed to move a value between coordinate spaces for one
/// element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceTransform {
    /// Accumulated top-left of the ancestors that establish their own
    /// layout space.
    pub anchor: Point,
    /// Window scale.
    pub scale: f64,
    /// Window origin on screen.
    pub origin: Point,
}

impl Default for SpaceTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Replace unusable scales with 1.0.
pub(crate) fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        warn!(scale, "invalid window scale, using 1.0");
        1.0
    }
}

impl SpaceTransform {
    /// A transform under which all spaces coincide.
    pub fn identity() -> Self {
        Self {
            anchor: Point::zero(),
            scale: 1.0,
            origin: Point::zero(),
        }
    }

    /// Construct a transform. Non-finite or non-positive scales become 1.0.
    pub fn new(anchor: Point, scale: f64, origin: Point) -> Self {
        Self {
            anchor,
            scale: sanitize_scale(scale),
            origin,
        }
    }

    /// Scale a value, rounding to the nearest integer.
    fn scale_axis(&self, v: i32) -> i32 {
        (f64::from(v) * self.scale).round() as i32
    }

    /// Invert the scaling of a value.
    fn unscale_axis(&self, v: i32) -> i32 {
        (f64::from(v) / self.scale).round() as i32
    }

    /// Move a point into unscaled screen space.
    fn to_unscaled(&self, from: CoordinateSpace, p: Point) -> Point {
        match from {
            CoordinateSpace::Layout => p + self.anchor,
            CoordinateSpace::UnscaledScreen => p,
            CoordinateSpace::Screen => {
                let p = p - self.origin;
                Point::new(self.unscale_axis(p.x), self.unscale_axis(p.y))
            }
        }
    }

    /// Move a point out of unscaled screen space.
    fn from_unscaled(&self, to: CoordinateSpace, p: Point) -> Point {
        match to {
            CoordinateSpace::Layout => p - self.anchor,
            CoordinateSpace::UnscaledScreen => p,
            CoordinateSpace::Screen => {
                Point::new(self.scale_axis(p.x), self.scale_axis(p.y)) + self.origin
            }
        }
    }

    /// Convert a value between spaces.
    pub fn convert<T: Convert>(&self, from: CoordinateSpace, to: CoordinateSpace, value: T) -> T {
        value.convert(self, from, to)
    }
}

/// Values that can move between coordinate spaces.
pub trait Convert: Sized {
    /// Convert `self` from one space to another under `t`.
    fn convert(self, t: &SpaceTransform, from: CoordinateSpace, to: CoordinateSpace) -> Self;
}

impl Convert for Point {
    fn convert(self, t: &SpaceTransform, from: CoordinateSpace, to: CoordinateSpace) -> Self {
        if from == to {
            return self;
        }
        t.from_unscaled(to, t.to_unscaled(from, self))
    }
}

impl Convert for Rect {
    fn convert(self, t: &SpaceTransform, from: CoordinateSpace, to: CoordinateSpace) -> Self {
        if from == to {
            return self;
        }
        let tl = self.tl.convert(t, from, to);
        let br = self.br().convert(t, from, to);
        Self::from_corners(tl, br)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{CoordinateSpace::*, *};

    #[test]
    fn layout_to_screen() {
        let t = SpaceTransform::new(Point::new(50, 40), 2.0, Point::new(100, 0));
        assert_eq!(
            t.convert(Layout, UnscaledScreen, Point::new(1, 2)),
            Point::new(51, 42)
        );
        assert_eq!(
            t.convert(Layout, Screen, Point::new(1, 2)),
            Point::new(202, 84)
        );
        assert_eq!(
            t.convert(Screen, Layout, Point::new(202, 84)),
            Point::new(1, 2)
        );
        assert_eq!(
            t.convert(Layout, Screen, Rect::new(0, 0, 10, 5)),
            Rect::new(200, 80, 20, 10)
        );
    }

    #[test]
    fn bad_scale() {
        for s in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(SpaceTransform::new(Point::zero(), s, Point::zero()).scale, 1.0);
        }
    }

    #[test]
    fn fractional_scale_rounds() {
        let t = SpaceTransform::new(Point::zero(), 1.5, Point::zero());
        assert_eq!(t.convert(Layout, Screen, Point::new(3, 1)), Point::new(5, 2));
    }

    proptest! {
        #[test]
        fn round_trip_at_unit_scale(
            x in -10_000..10_000i32, y in -10_000..10_000i32,
            ax in -500..500i32, ay in -500..500i32,
            ox in -500..500i32, oy in -500..500i32,
        ) {
            let t = SpaceTransform::new(Point::new(ax, ay), 1.0, Point::new(ox, oy));
            let p = Point::new(x, y);
            let screen = t.convert(Layout, Screen, p);
            prop_assert_eq!(t.convert(Screen, Layout, screen), p);
            let unscaled = t.convert(Layout, UnscaledScreen, p);
            prop_assert_eq!(t.convert(UnscaledScreen, Layout, unscaled), p);
        }

        #[test]
        fn round_trip_integer_scale(x in -1000..1000i32, y in -1000..1000i32, s in 1..5i32) {
            let t = SpaceTransform::new(Point::new(3, 4), f64::from(s), Point::new(7, -2));
            let p = Point::new(x, y);
            prop_assert_eq!(t.convert(Screen, Layout, t.convert(Layout, Screen, p)), p);
        }
    }
}
