use crate::{
    NodeId, ViewContext,
    error::Result,
    geom::Expanse,
    render::{Color, DrawBatch, TextureId},
    widget::{ContentMode, Measurer, Widget},
    widgets::Palette,
};

/// A leaf with a fixed intrinsic size, drawn as a solid fill or a texture.
#[derive(Debug, Clone)]
pub struct Block {
    /// Intrinsic size.
    size: Expanse,
    /// Fill colour.
    fill: Option<Color>,
    /// Texture drawn over the fill.
    texture: Option<TextureId>,
}

impl Block {
    /// A transparent block of a given size.
    pub fn new(size: impl Into<Expanse>) -> Self {
        Self {
            size: size.into().clamped(),
            fill: None,
            texture: None,
        }
    }

    /// Fill with a colour, adjusted for visual state.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Draw a texture.
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// The intrinsic size.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// Change the intrinsic size. The caller signals the layout change.
    pub fn set_size(&mut self, size: Expanse) {
        self.size = size.clamped();
    }
}

impl Widget for Block {
    fn content_mode(&self) -> ContentMode {
        ContentMode::None
    }

    fn measure_content(
        &self,
        _children: &[NodeId],
        _available: Expanse,
        _m: &mut dyn Measurer,
    ) -> Result<Expanse> {
        Ok(self.size)
    }

    fn draw_self(&mut self, batch: &mut dyn DrawBatch, ctx: &dyn ViewContext) -> Result<()> {
        let dest = ctx.screen_bounds();
        if let Some(color) = self.fill {
            let palette = ctx.resources().get::<Palette>().copied().unwrap_or_default();
            batch.fill_rect(dest, palette.brush(color, ctx.visual_state()), ctx.opacity());
        }
        if let Some(texture) = self.texture {
            batch.draw_texture(texture, dest, ctx.opacity());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "block"
    }
}
