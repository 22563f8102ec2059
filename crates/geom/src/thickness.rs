use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use super::{Error, Expanse, Result};

/// Four independent edge widths. Used for margins and padding, and for the
/// border-like space an element consumes around its content.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Thickness {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl Thickness {
    /// Construct a thickness from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same width on every edge.
    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Horizontal edges set to `h`, vertical edges set to `v`.
    pub const fn symmetric(h: i32, v: i32) -> Self {
        Self::new(h, v, h, v)
    }

    /// The zero thickness.
    pub const fn zero() -> Self {
        Self::uniform(0)
    }

    /// Sum of the left and right edges.
    pub fn horizontal(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of the top and bottom edges.
    pub fn vertical(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Alias for [`Thickness::horizontal`], the total width of the edges.
    pub fn width(&self) -> i32 {
        self.horizontal()
    }

    /// Alias for [`Thickness::vertical`], the total height of the edges.
    pub fn height(&self) -> i32 {
        self.vertical()
    }

    /// The total extent of the edges as an expanse.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.horizontal(), self.vertical())
    }

    /// Return a copy with every negative edge clamped to zero.
    pub fn clamped(&self) -> Self {
        Self {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.max(0),
            bottom: self.bottom.max(0),
        }
    }

    /// True if every edge is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Add for Thickness {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self {
            left: self.left.saturating_add(o.left),
            top: self.top.saturating_add(o.top),
            right: self.right.saturating_add(o.right),
            bottom: self.bottom.saturating_add(o.bottom),
        }
    }
}

impl Sub for Thickness {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self {
            left: self.left.saturating_sub(o.left),
            top: self.top.saturating_sub(o.top),
            right: self.right.saturating_sub(o.right),
            bottom: self.bottom.saturating_sub(o.bottom),
        }
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

/// Parses the markup shorthand: `"u"` (uniform), `"h,v"` (symmetric) or
/// `"l,t,r,b"`. Whitespace around each value is ignored.
impl FromStr for Thickness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<i32>()
                    .map_err(|e| Error::Geometry(format!("invalid thickness {s:?}: {e}")))
            })
            .collect::<Result<Vec<i32>>>()?;
        match parts.as_slice() {
            [u] => Ok(Self::uniform(*u)),
            [h, v] => Ok(Self::symmetric(*h, *v)),
            [l, t, r, b] => Ok(Self::new(*l, *t, *r, *b)),
            _ => Err(Error::Geometry(format!(
                "invalid thickness {s:?}: expected 1, 2 or 4 values"
            ))),
        }
    }
}

impl From<i32> for Thickness {
    fn from(v: i32) -> Self {
        Self::uniform(v)
    }
}

impl From<(i32, i32, i32, i32)> for Thickness {
    fn from(v: (i32, i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shorthand() -> Result<()> {
        assert_eq!("3".parse::<Thickness>()?, Thickness::uniform(3));
        assert_eq!("4, 2".parse::<Thickness>()?, Thickness::new(4, 2, 4, 2));
        assert_eq!("1,2,3,4".parse::<Thickness>()?, Thickness::new(1, 2, 3, 4));
        assert!("1,2,3".parse::<Thickness>().is_err());
        assert!("a".parse::<Thickness>().is_err());
        assert!("".parse::<Thickness>().is_err());
        Ok(())
    }

    #[test]
    fn display_roundtrips_through_parse() -> Result<()> {
        let t = Thickness::new(-1, 0, 7, 2);
        assert_eq!(t.to_string().parse::<Thickness>()?, t);
        Ok(())
    }

    #[test]
    fn sums() {
        let t = Thickness::new(4, 2, 4, 2) + Thickness::uniform(1);
        assert_eq!(t, Thickness::new(5, 3, 5, 3));
        assert_eq!(t.width(), 10);
        assert_eq!(t.height(), 6);
        assert_eq!(Thickness::new(-2, 1, 0, -5).clamped(), Thickness::new(0, 1, 0, 0));
    }
}
