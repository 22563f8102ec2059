use crate::{
    core::render::{Color, DrawBatch, TextureId},
    geom::{Rect, Thickness},
};

/// A recorded draw operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A filled rectangle.
    Fill {
        /// Destination.
        rect: Rect,
        /// Colour.
        color: Color,
        /// Opacity.
        opacity: f32,
    },
    /// A stroked rectangle.
    Stroke {
        /// Destination.
        rect: Rect,
        /// Edge widths.
        thickness: Thickness,
        /// Colour.
        color: Color,
        /// Opacity.
        opacity: f32,
    },
    /// A texture.
    Texture {
        /// Texture handle.
        texture: TextureId,
        /// Destination.
        dest: Rect,
        /// Opacity.
        opacity: f32,
    },
}

impl DrawOp {
    /// The destination rectangle of this operation.
    pub fn rect(&self) -> Rect {
        match self {
            Self::Fill { rect, .. } | Self::Stroke { rect, .. } => *rect,
            Self::Texture { dest, .. } => *dest,
        }
    }

    /// The opacity of this operation.
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Fill { opacity, .. }
            | Self::Stroke { opacity, .. }
            | Self::Texture { opacity, .. } => *opacity,
        }
    }
}

/// A draw batch that records every operation in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingBatch {
    /// Operations in draw order.
    pub ops: Vec<DrawOp>,
}

impl RecordingBatch {
    /// Destination rectangles of all fills, in draw order.
    pub fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .map(DrawOp::rect)
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl DrawBatch for RecordingBatch {
    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f32) {
        self.ops.push(DrawOp::Fill {
            rect,
            color,
            opacity,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: Thickness, color: Color, opacity: f32) {
        self.ops.push(DrawOp::Stroke {
            rect,
            thickness,
            color,
            opacity,
        });
    }

    fn draw_texture(&mut self, texture: TextureId, dest: Rect, opacity: f32) {
        self.ops.push(DrawOp::Texture {
            texture,
            dest,
            opacity,
        });
    }
}
