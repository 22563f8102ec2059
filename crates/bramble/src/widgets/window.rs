use crate::{
    ViewContext,
    error::Result,
    render::{Color, DrawBatch},
    widget::{ContentMode, Widget},
    widgets::Palette,
};

/// A nested window. Its content lays out relative to the window's own
/// top-left, so moving the window never re-arranges what is inside it.
#[derive(Debug, Default, Clone)]
pub struct Window {
    /// Background colour. Defaults to the palette background.
    background: Option<Color>,
}

impl Window {
    /// Construct a window with the palette background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill with a fixed colour instead of the palette.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

impl Widget for Window {
    fn content_mode(&self) -> ContentMode {
        ContentMode::Single
    }

    fn own_layout_space(&self) -> bool {
        true
    }

    fn draw_background(&mut self, batch: &mut dyn DrawBatch, ctx: &dyn ViewContext) -> Result<()> {
        let palette = ctx.resources().get::<Palette>().copied().unwrap_or_default();
        let color = self.background.unwrap_or(palette.background);
        batch.fill_rect(ctx.screen_bounds(), color, ctx.opacity());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "window"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Core,
        geom::{Expanse, HorizontalAlignment, Point, Rect, VerticalAlignment},
        layout::Layout,
        space::CoordinateSpace,
        testing::Probe,
    };

    #[test]
    fn content_is_window_relative() -> Result<()> {
        let mut core = Core::new(Expanse::new(50, 50));
        let root = core.root_id();
        let win = core.create_detached(Window::new());
        core.attach(root, win)?;
        core.set_layout(
            win,
            Layout::new()
                .size(Expanse::new(20, 10))
                .margin((5, 7, 0, 0))
                .align(HorizontalAlignment::Left, VerticalAlignment::Top),
        )?;
        let leaf = core.create_detached(Probe::leaf(Expanse::new(4, 2)));
        core.attach(win, leaf)?;
        core.update_layout()?;

        assert_eq!(core.render_bounds(win)?, Rect::new(5, 7, 20, 10));
        assert_eq!(core.render_bounds(leaf)?, Rect::new(0, 0, 20, 10));
        let p = core.convert_coordinate_space(
            leaf,
            CoordinateSpace::Layout,
            CoordinateSpace::Screen,
            Point::new(1, 1),
        )?;
        assert_eq!(p, Point::new(6, 8));
        Ok(())
    }
}
