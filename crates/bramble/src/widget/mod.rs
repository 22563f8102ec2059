//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    core::{
        context::{Context, ViewContext},
        event::Event,
        id::NodeId,
        render::DrawBatch,
    },
    error::Result,
    geom::{Expanse, Rect},
    layout::{Layout, Measurement, SelfMeasure},
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was processed without a state change and propagation stops.
    Consume,
    /// The event was not handled and will bubble up the tree.
    Ignore,
}

/// How many content children a widget hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentMode {
    /// A leaf: no content.
    None,
    /// At most one content child.
    Single,
    /// Any number of content children.
    Multiple,
}

impl ContentMode {
    /// Can a host with `current` children accept one more?
    pub fn accepts(self, current: usize) -> bool {
        match self {
            Self::None => false,
            Self::Single => current == 0,
            Self::Multiple => true,
        }
    }
}

/// Measures child elements on behalf of a widget's content hook.
pub trait Measurer {
    /// Measure a node against an available size.
    fn measure(&mut self, node: NodeId, available: Expanse) -> Result<Measurement>;
}

/// Places child elements on behalf of a widget's content hook. Arrangers
/// can also measure, so hooks can re-read child sizes while placing them.
pub trait Arranger: Measurer {
    /// Arrange a node into a slot, in the host's layout space.
    fn arrange(&mut self, node: NodeId, slot: Rect) -> Result<()>;
}

/// Widgets are the behavior attached to nodes in the Core arena.
///
/// Every hook has a default, so a widget only implements what it changes.
/// Layout hooks take `&self`: measurement may run many times per frame and
/// must not change widget state.
pub trait Widget: Any + Send {
    /// Initial layout properties for the node.
    fn layout(&self) -> Layout {
        Layout::new()
    }

    /// How many content children this widget hosts.
    fn content_mode(&self) -> ContentMode {
        ContentMode::Single
    }

    /// Does this widget's subtree lay out relative to its own top-left?
    /// Windows return true.
    fn own_layout_space(&self) -> bool {
        false
    }

    /// Border-like space this widget occupies itself, given the space left
    /// inside its padding.
    fn measure_self(&self, _available: Expanse, _ctx: &dyn ViewContext) -> SelfMeasure {
        SelfMeasure::default()
    }

    /// Measure content. The default overlaps all children and takes the
    /// largest extent on each axis.
    fn measure_content(
        &self,
        children: &[NodeId],
        available: Expanse,
        m: &mut dyn Measurer,
    ) -> Result<Expanse> {
        let mut size = Expanse::zero();
        for child in children {
            size = size.max(m.measure(*child, available)?.desired);
        }
        Ok(size)
    }

    /// Place content within `bounds`. The default gives every child the
    /// whole content area.
    fn arrange_content(
        &self,
        children: &[NodeId],
        bounds: Rect,
        a: &mut dyn Arranger,
    ) -> Result<()> {
        for child in children {
            a.arrange(*child, bounds)?;
        }
        Ok(())
    }

    /// Per-frame update.
    fn update(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Draw behind everything else this widget draws.
    fn draw_background(&mut self, _batch: &mut dyn DrawBatch, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Draw the widget itself. Does not draw content or components.
    fn draw_self(&mut self, _batch: &mut dyn DrawBatch, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Handle events.
    fn on_event(&mut self, _event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
