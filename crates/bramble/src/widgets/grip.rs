use crate::{
    Component, Consumes, Context, Core, DrawPriority, NodeId, ViewContext,
    component::aligned,
    error::Result,
    event::{Event, MouseButton},
    geom::{Expanse, HorizontalAlignment, Point, VerticalAlignment},
    render::{Color, DrawBatch},
    widget::{ContentMode, EventOutcome, Measurer, Widget},
    widgets::Palette,
};

/// An in-progress drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    /// Pointer position at the press.
    start: Point,
    /// Host render size at the press.
    size: Expanse,
}

/// A small handle in the bottom-right corner of its host. Dragging it sets
/// the host's preferred width and height.
#[derive(Debug, Clone)]
pub struct ResizeGrip {
    /// Size of the handle.
    size: Expanse,
    /// Handle colour.
    color: Option<Color>,
    /// Active drag, if any.
    drag: Option<Drag>,
}

impl Default for ResizeGrip {
    fn default() -> Self {
        Self::new(Expanse::new(1, 1))
    }
}

impl ResizeGrip {
    /// A grip of the given size.
    pub fn new(size: impl Into<Expanse>) -> Self {
        Self {
            size: size.into().clamped(),
            color: None,
            drag: None,
        }
    }

    /// Draw with a fixed colour instead of the palette.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Is a drag in progress?
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The component description for a grip: no space consumed, aligned to
    /// the bottom-right, drawn over the host's content.
    pub fn component() -> Component {
        Component::builder()
            .consumes(Consumes::NONE)
            .uses_owners_padding(false)
            .draw_priority(DrawPriority::AfterContents)
            .arrange(aligned(HorizontalAlignment::Right, VerticalAlignment::Bottom))
            .build()
    }

    /// Create a grip and attach it to `host` as a component.
    pub fn attach(
        core: &mut Core,
        host: impl Into<NodeId>,
        size: impl Into<Expanse>,
    ) -> Result<NodeId> {
        let grip = core.create_detached(Self::new(size));
        core.add_component(host, grip, Self::component())?;
        Ok(grip)
    }

    /// Resize the host to follow the pointer.
    fn follow(drag: Drag, position: Point, host: NodeId, ctx: &mut dyn Context) -> Result<()> {
        let w = (drag.size.w + position.x - drag.start.x).max(1);
        let h = (drag.size.h + position.y - drag.start.y).max(1);
        ctx.with_layout_of(host, &mut |l| {
            l.width = Some(w);
            l.height = Some(h);
        })
    }
}

impl Widget for ResizeGrip {
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
        let palette = ctx.resources().get::<Palette>().copied().unwrap_or_default();
        let color = palette.brush(self.color.unwrap_or(palette.border), ctx.visual_state());
        batch.fill_rect(ctx.screen_bounds(), color, ctx.opacity());
        Ok(())
    }

    fn on_event(&mut self, event: &Event, ctx: &mut dyn Context) -> Result<EventOutcome> {
        let Some(host) = ctx.parent() else {
            return Ok(EventOutcome::Ignore);
        };
        match *event {
            Event::PointerPressed {
                button: MouseButton::Left,
                position,
            } => {
                let Some(bounds) = ctx.node_render_bounds(host) else {
                    return Ok(EventOutcome::Ignore);
                };
                self.drag = Some(Drag {
                    start: position,
                    size: bounds.expanse(),
                });
                ctx.capture_pointer();
                Ok(EventOutcome::Handle)
            }
            Event::PointerMoved { position } => match self.drag {
                Some(drag) => {
                    Self::follow(drag, position, host, ctx)?;
                    Ok(EventOutcome::Handle)
                }
                None => Ok(EventOutcome::Ignore),
            },
            Event::PointerReleased {
                button: MouseButton::Left,
                position,
            } => match self.drag.take() {
                Some(drag) => {
                    Self::follow(drag, position, host, ctx)?;
                    ctx.release_pointer();
                    Ok(EventOutcome::Handle)
                }
                None => Ok(EventOutcome::Ignore),
            },
            _ => Ok(EventOutcome::Ignore),
        }
    }

    fn name(&self) -> &'static str {
        "grip"
    }
}
