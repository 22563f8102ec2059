//! The rendering seam.
//!
//! The engine never rasterises anything. It walks the tree in draw order and
//! hands screen-space primitives to a [`DrawBatch`] supplied by the host.

use crate::geom::{Rect, Thickness};

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// A colour with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Opaque handle to a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// A sink for draw primitives. All rectangles are in screen space.
pub trait DrawBatch {
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f32);

    /// Stroke the inside edges of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, thickness: Thickness, color: Color, opacity: f32);

    /// Draw a texture stretched over a rectangle.
    fn draw_texture(&mut self, texture: TextureId, dest: Rect, opacity: f32);
}
