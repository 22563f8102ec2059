//! Geometry primitives used across bramble.
//!
//! All types are small `Copy` values over `i32`. Operations that could
//! produce a negative extent clamp to zero instead, so degenerate geometry
//! (a zero-sized window mid-resize, say) flows through layout without errors.

/// Alignment types and alignment application.
mod align;
/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Edge rectangles carved from a thickness.
mod frame;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Four-sided margins.
mod thickness;

pub use align::{HorizontalAlignment, VerticalAlignment, apply_alignment};
pub use error::{Error, Result};
pub use expanse::Expanse;
pub use frame::Frame;
pub use point::Point;
pub use rect::Rect;
pub use thickness::Thickness;

/// The four sides of a rectangle.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Side {
    /// Left edge.
    Left,
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}
