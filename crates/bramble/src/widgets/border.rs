use crate::{
    Component, Consumes, Core, NodeId, ViewContext,
    component::fill,
    error::Result,
    geom::{Expanse, Frame, Thickness},
    layout::SelfMeasure,
    render::{Color, DrawBatch},
    widget::{ContentMode, Widget},
    widgets::Palette,
};

/// A frame drawn around its bounds.
///
/// A border can host content directly, in which case its thickness is
/// measured as self space around the child. More often it is attached to
/// another element as a component with [`Border::wrap`], reserving its
/// thickness on every side of the host.
#[derive(Debug, Clone)]
pub struct Border {
    /// Edge widths in layout units.
    thickness: Thickness,
    /// Frame colour. Defaults to the palette border colour.
    color: Option<Color>,
}

impl Border {
    /// A border with the given edge widths.
    pub fn new(thickness: impl Into<Thickness>) -> Self {
        Self {
            thickness: thickness.into().clamped(),
            color: None,
        }
    }

    /// Draw with a fixed colour instead of the palette.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Edge widths.
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// The component description for a border: it consumes space on every
    /// side, outside the host's padding, and covers the whole host.
    pub fn component() -> Component {
        Component::builder()
            .consumes(Consumes::ALL)
            .uses_owners_padding(false)
            .arrange(fill())
            .build()
    }

    /// Create a border and attach it to `host` as a component.
    pub fn wrap(
        core: &mut Core,
        host: impl Into<NodeId>,
        thickness: impl Into<Thickness>,
    ) -> Result<NodeId> {
        let border = core.create_detached(Self::new(thickness));
        core.add_component(host, border, Self::component())?;
        Ok(border)
    }
}

/// Scale a layout thickness to screen units, never dropping a non-zero edge
/// to nothing.
fn scaled(t: Thickness, scale: f64) -> Thickness {
    let edge = |v: i32| {
        if v <= 0 {
            0
        } else {
            ((f64::from(v) * scale).round() as i32).max(1)
        }
    };
    Thickness::new(edge(t.left), edge(t.top), edge(t.right), edge(t.bottom))
}

impl Widget for Border {
    fn content_mode(&self) -> ContentMode {
        ContentMode::Single
    }

    fn measure_self(&self, _available: Expanse, _ctx: &dyn ViewContext) -> SelfMeasure {
        SelfMeasure::new(self.thickness)
    }

    fn draw_self(&mut self, batch: &mut dyn DrawBatch, ctx: &dyn ViewContext) -> Result<()> {
        let palette = ctx.resources().get::<Palette>().copied().unwrap_or_default();
        let color = palette.brush(self.color.unwrap_or(palette.border), ctx.visual_state());
        let frame = Frame::new(
            ctx.screen_bounds(),
            scaled(self.thickness, ctx.transform().scale),
        );
        for edge in frame.edges() {
            batch.fill_rect(edge, color, ctx.opacity());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "border"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geom::Rect, testing::Probe};

    #[test]
    fn wraps_host() -> Result<()> {
        let mut core = Core::new(Expanse::new(40, 40));
        let root = core.root_id();
        let host = core.create_detached(Probe::leaf(Expanse::new(10, 4)));
        core.attach(root, host)?;
        let border = Border::wrap(&mut core, host, 1)?;

        let m = core.measure(host, Expanse::new(40, 40))?;
        assert_eq!(m.desired, Expanse::new(12, 6));
        assert_eq!(m.consumed, Thickness::uniform(1));

        core.update_layout()?;
        assert_eq!(core.render_bounds(border)?, Rect::new(0, 0, 40, 40));
        assert_eq!(core.content_bounds(host)?, Rect::new(1, 1, 38, 38));
        Ok(())
    }

    #[test]
    fn scaled_edges() {
        assert_eq!(scaled(Thickness::new(1, 0, 2, 1), 0.25), Thickness::new(1, 0, 1, 1));
        assert_eq!(scaled(Thickness::uniform(2), 1.5), Thickness::uniform(3));
    }
}
