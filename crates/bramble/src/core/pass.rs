//! The two-pass measure/arrange engine.
//!
//! Measurement runs bottom-up and is cached per node, keyed by the available
//! size, until the node is invalidated. Arrangement runs top-down, writes
//! bounds, and carves each host's rectangle in a fixed order: components
//! outside the padding, the padding, components inside the padding, the
//! host's own thickness, and finally content.

use tracing::trace;

use crate::{
    core::{context::CoreViewContext, id::NodeId, world::Core},
    error::Result,
    geom::{
        Expanse, HorizontalAlignment, Point, Rect, Thickness, VerticalAlignment, apply_alignment,
    },
    layout::{Layout, Measurement},
    widget::{Arranger, Measurer},
};

/// Flags of a hosted component, copied out so the arena stays free to
/// borrow while the component's element is measured.
#[derive(Debug, Clone, Copy)]
struct ComponentInfo {
    /// Position in the host's component list.
    index: usize,
    /// The wrapped element.
    element: NodeId,
    /// Carved inside the host's padding.
    uses_padding: bool,
    /// Shares width with content.
    shares_width: bool,
    /// Shares height with content.
    shares_height: bool,
}

/// A component whose slot has been carved, waiting for content to be
/// arranged before its own arrangement.
#[derive(Debug, Clone, Copy)]
struct PendingComponent {
    /// Component details.
    info: ComponentInfo,
    /// Remaining rectangle at the component's turn.
    available: Rect,
    /// The element's measured thickness.
    measured: Thickness,
}

/// A measure/arrange walk over the Core arena.
pub(crate) struct LayoutPass<'a> {
    /// Core state being laid out.
    core: &'a mut Core,
}

impl<'a> LayoutPass<'a> {
    /// Begin a pass over `core`.
    pub(crate) fn new(core: &'a mut Core) -> Self {
        Self { core }
    }

    /// Snapshot the component flags of a host.
    fn components(&self, id: NodeId) -> Result<Vec<ComponentInfo>> {
        Ok(self
            .core
            .get(id)?
            .components
            .iter()
            .enumerate()
            .map(|(index, c)| ComponentInfo {
                index,
                element: c.element,
                uses_padding: c.component.uses_owners_padding,
                shares_width: c.component.shares_width,
                shares_height: c.component.shares_height,
            })
            .collect())
    }

    /// The space a component reserves given its measured thickness. On an
    /// axis the component shares with the content nothing is reserved: the
    /// shared overlap accounts for it instead.
    fn reserve(&self, host: NodeId, index: usize, measured: Thickness) -> Result<Thickness> {
        let Some(c) = self.core.get(host)?.components.get(index) else {
            return Ok(Thickness::zero());
        };
        let mut reserved = c.component.reserve(measured);
        if c.component.shares_width {
            reserved.left = 0;
            reserved.right = 0;
        }
        if c.component.shares_height {
            reserved.top = 0;
            reserved.bottom = 0;
        }
        Ok(reserved)
    }

    /// Measure a node, consulting the cache first.
    pub(crate) fn measure(&mut self, id: NodeId, available: Expanse) -> Result<Measurement> {
        let available = available.clamped();
        let node = self.core.get(id)?;
        if !node.visibility.takes_space() {
            return Ok(Measurement::zero());
        }
        if let Some((key, m)) = node.measure_cache
            && key == available
        {
            return Ok(m);
        }
        let m = self.measure_uncached(id, available)?;
        trace!(node = ?id, ?available, desired = ?m.desired, "measured");
        self.core.get_mut(id)?.measure_cache = Some((available, m));
        Ok(m)
    }

    /// Measure a node from scratch.
    fn measure_uncached(&mut self, id: NodeId, available: Expanse) -> Result<Measurement> {
        let (layout, children) = {
            let node = self.core.get(id)?;
            (node.layout, node.children.clone())
        };
        let margin = layout.margin.clamped();
        let padding = layout.padding.clamped();
        let outer = available.shrink(margin);
        // An explicit size bounds what the inside can use.
        let constrained = Expanse::new(layout.resolve_width(outer.w), layout.resolve_height(outer.h));

        let inner = constrained.shrink(padding);
        let own = self.core.with_widget(id, |w, core| {
            w.measure_self(inner, &CoreViewContext::new(core, id))
        })?;
        let own_thickness = own.thickness.clamped();

        let mut outside = Thickness::zero();
        let mut inside = Thickness::zero();
        let mut shared_w: Option<i32> = None;
        let mut shared_h: Option<i32> = None;
        for c in self.components(id)? {
            let base = if c.uses_padding {
                constrained.shrink(outside + padding + inside)
            } else {
                constrained.shrink(outside)
            };
            let requested = self.measure(c.element, base)?.requested();
            let reserved = self.reserve(id, c.index, requested)?;
            if c.uses_padding {
                inside = inside + reserved;
            } else {
                outside = outside + reserved;
            }
            if c.shares_width {
                shared_w = Some(shared_w.unwrap_or(0).max(requested.width()));
            }
            if c.shares_height {
                shared_h = Some(shared_h.unwrap_or(0).max(requested.height()));
            }
        }

        let around = outside + padding + inside + own_thickness;
        let content_available = constrained.shrink(around);
        let content = self
            .core
            .with_widget(id, |w, core| {
                w.measure_content(&children, content_available, &mut LayoutPass::new(core))
            })??
            .clamped();

        let overlap = Thickness::new(
            0,
            0,
            shared_w.map_or(0, |w| w.min(content.w)),
            shared_h.map_or(0, |h| h.min(content.h)),
        );
        let shared = own.shared.clamped() + overlap;

        let body = Expanse::new(
            around.horizontal() + content.w + shared_w.unwrap_or(0) - shared.horizontal(),
            around.vertical() + content.h + shared_h.unwrap_or(0) - shared.vertical(),
        )
        .clamped();
        let size = Expanse::new(layout.resolve_width(body.w), layout.resolve_height(body.h));

        Ok(Measurement {
            desired: size.grow(margin),
            consumed: (margin + around).clamped(),
            content,
            shared,
            own: own_thickness,
        })
    }

    /// Arrange a node into a slot in its parent's layout space.
    pub(crate) fn arrange(&mut self, id: NodeId, slot: Rect) -> Result<()> {
        let node = self.core.get_mut(id)?;
        node.layout_bounds = slot;
        node.dirty = false;
        if !node.visibility.takes_space() {
            self.collapse(id, slot.tl);
            return Ok(());
        }

        let m = self.measure(id, slot.expanse())?;
        let (layout, own_space, children) = {
            let node = self.core.get(id)?;
            (node.layout, node.own_layout_space, node.children.clone())
        };

        let render = render_rect(&layout, slot, m.desired);
        let mut rect = if own_space {
            render.at(Point::zero())
        } else {
            render
        };

        let mut pending = vec![];
        let components = self.components(id)?;
        for inside_padding in [false, true] {
            if inside_padding {
                rect = rect.shrink(layout.padding.clamped());
            }
            for c in components.iter().filter(|c| c.uses_padding == inside_padding) {
                let measured = self.measure(c.element, rect.expanse())?.requested();
                pending.push(PendingComponent {
                    info: *c,
                    available: rect,
                    measured,
                });
                rect = rect.shrink(self.reserve(id, c.index, measured)?);
            }
        }
        let content = rect.shrink(m.own);

        {
            let node = self.core.get_mut(id)?;
            node.render_bounds = render;
            node.content_bounds = content;
        }

        self.core.with_widget(id, |w, core| {
            w.arrange_content(&children, content, &mut LayoutPass::new(core))
        })??;

        for p in pending {
            let mut available = p.available;
            if p.info.shares_width {
                available = available.with_hspan(&content);
            }
            if p.info.shares_height {
                available = available.with_vspan(&content);
            }
            let slot = self
                .core
                .get(id)?
                .components
                .get(p.info.index)
                .map(|c| c.component.arrange(available, p.measured))
                .unwrap_or(available);
            self.arrange(p.info.element, slot)?;
        }
        Ok(())
    }

    /// Give a collapsed node and its whole subtree zero bounds at `at`.
    fn collapse(&mut self, id: NodeId, at: Point) {
        let zero = Rect::new(at.x, at.y, 0, 0);
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.core.nodes.get_mut(id) else {
                continue;
            };
            node.layout_bounds = zero;
            node.render_bounds = zero;
            node.content_bounds = zero;
            node.dirty = false;
            stack.extend(node.children.iter().copied());
            stack.extend(node.components.iter().map(|c| c.element));
        }
    }
}

impl Measurer for LayoutPass<'_> {
    fn measure(&mut self, node: NodeId, available: Expanse) -> Result<Measurement> {
        Self::measure(self, node, available)
    }
}

impl Arranger for LayoutPass<'_> {
    fn arrange(&mut self, node: NodeId, slot: Rect) -> Result<()> {
        Self::arrange(self, node, slot)
    }
}

/// The aligned rectangle for a node inside its slot.
///
/// Stretching fills the slot minus margin, but never past an explicit or
/// maximum size: a stretched node held smaller than its slot is centred.
fn render_rect(layout: &Layout, slot: Rect, desired: Expanse) -> Rect {
    let margin = layout.margin.clamped();
    let within = slot.shrink(margin);
    let desired = desired.shrink(margin);

    let (h, w) = match layout.horizontal {
        HorizontalAlignment::Stretch => {
            let w = layout.resolve_width(within.w);
            if w == within.w {
                (HorizontalAlignment::Stretch, w)
            } else {
                (HorizontalAlignment::Center, w)
            }
        }
        other => (other, desired.w),
    };
    let (v, h_) = match layout.vertical {
        VerticalAlignment::Stretch => {
            let h = layout.resolve_height(within.h);
            if h == within.h {
                (VerticalAlignment::Stretch, h)
            } else {
                (VerticalAlignment::Center, h)
            }
        }
        other => (other, desired.h),
    };
    apply_alignment(within, h, v, Expanse::new(w, h_))
}
