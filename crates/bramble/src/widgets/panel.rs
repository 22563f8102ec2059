use crate::{
    ViewContext,
    error::Result,
    render::{Color, DrawBatch},
    widget::{ContentMode, Widget},
    widgets::Palette,
};

/// A container whose children overlap, each filling the content area
/// according to its own alignment.
#[derive(Debug, Default, Clone)]
pub struct Panel {
    /// Background fill. `None` draws nothing.
    background: Option<Color>,
}

impl Panel {
    /// Construct a transparent panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the panel with the palette background.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

impl Widget for Panel {
    fn content_mode(&self) -> ContentMode {
        ContentMode::Multiple
    }

    fn draw_background(&mut self, batch: &mut dyn DrawBatch, ctx: &dyn ViewContext) -> Result<()> {
        if let Some(color) = self.background {
            let palette = ctx.resources().get::<Palette>().copied().unwrap_or_default();
            let color = palette.brush(color, ctx.visual_state());
            batch.fill_rect(ctx.screen_bounds(), color, ctx.opacity());
        }
        Ok(())
    }
}
