//! Context traits handed to widget hooks, and their Core-backed
//! implementations.

use std::time::Duration;

use crate::{
    core::{
        id::NodeId,
        resources::Resources,
        space::{CoordinateSpace, SpaceTransform},
        visual::VisualState,
        world::Core,
    },
    error::Result,
    geom::{Point, Rect},
    layout::Layout,
};

/// Read-only view of a node and its surroundings.
pub trait ViewContext {
    /// The node this context is for.
    fn node_id(&self) -> NodeId;

    /// Slot assigned by the parent, in layout space.
    fn layout_bounds(&self) -> Rect;

    /// Aligned bounds inside the margin, in layout space.
    fn render_bounds(&self) -> Rect;

    /// Content area, in the space this node's children lay out in.
    fn content_bounds(&self) -> Rect;

    /// The transform between this node's layout space and the screen.
    fn transform(&self) -> SpaceTransform;

    /// The derived visual state.
    fn visual_state(&self) -> VisualState;

    /// Shared read-only resources.
    fn resources(&self) -> &Resources;

    /// Effective opacity: this node's opacity times its ancestors'.
    fn opacity(&self) -> f32;

    /// Time since the previous frame.
    fn elapsed(&self) -> Duration;

    /// Does this node have keyboard focus?
    fn is_focused(&self) -> bool;

    /// The pointer position in this node's layout space, if known.
    fn pointer(&self) -> Option<Point>;

    /// Content children of this node.
    fn children(&self) -> Vec<NodeId>;

    /// Parent or host of this node.
    fn parent(&self) -> Option<NodeId>;

    /// Render bounds of another node, in that node's layout space.
    fn node_render_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Convert a rect from this node's layout space to screen space.
    fn to_screen(&self, r: Rect) -> Rect {
        self.transform()
            .convert(CoordinateSpace::Layout, CoordinateSpace::Screen, r)
    }

    /// Render bounds in screen space.
    fn screen_bounds(&self) -> Rect {
        self.to_screen(self.render_bounds())
    }

    /// Content bounds in screen space. Content bounds live in the child
    /// layout space, which differs from this node's own when it establishes
    /// a layout space of its own.
    fn content_screen_bounds(&self) -> Rect;
}

/// Mutable access for update and event hooks.
pub trait Context: ViewContext {
    /// Signal that this node's layout changed.
    fn layout_changed(&mut self, affects_measure: bool) -> Result<()>;

    /// Modify this node's layout properties, invalidating if they changed.
    fn with_layout(&mut self, f: &mut dyn FnMut(&mut Layout)) -> Result<()> {
        let id = self.node_id();
        self.with_layout_of(id, f)
    }

    /// Modify another node's layout properties, invalidating if they changed.
    fn with_layout_of(&mut self, node: NodeId, f: &mut dyn FnMut(&mut Layout)) -> Result<()>;

    /// Set this node's selection flag.
    fn set_selected(&mut self, selected: bool) -> Result<()>;

    /// Give keyboard focus to a node.
    fn set_focus(&mut self, node: NodeId) -> Result<()>;

    /// Focus this node.
    fn focus(&mut self) -> Result<()> {
        let id = self.node_id();
        self.set_focus(id)
    }

    /// Route pointer events to this node wherever the pointer is.
    fn capture_pointer(&mut self);

    /// Release a pointer capture held by this node.
    fn release_pointer(&mut self);
}

/// Read-only context backed by a shared Core reference.
pub(crate) struct CoreViewContext<'a> {
    /// Core state.
    core: &'a Core,
    /// Node the context is for.
    node_id: NodeId,
}

impl<'a> CoreViewContext<'a> {
    /// Construct a view context for a node.
    pub(crate) fn new(core: &'a Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

/// Shared implementation of the read-only context methods.
macro_rules! view_context_impl {
    () => {
        fn node_id(&self) -> NodeId {
            self.node_id
        }

        fn layout_bounds(&self) -> Rect {
            self.core.layout_bounds(self.node_id).unwrap_or_default()
        }

        fn render_bounds(&self) -> Rect {
            self.core.render_bounds(self.node_id).unwrap_or_default()
        }

        fn content_bounds(&self) -> Rect {
            self.core.content_bounds(self.node_id).unwrap_or_default()
        }

        fn transform(&self) -> SpaceTransform {
            self.core.space_transform(self.node_id).unwrap_or_default()
        }

        fn visual_state(&self) -> VisualState {
            self.core.visual_state(self.node_id).unwrap_or_default()
        }

        fn resources(&self) -> &Resources {
            self.core.resources()
        }

        fn opacity(&self) -> f32 {
            self.core.effective_opacity(self.node_id)
        }

        fn elapsed(&self) -> Duration {
            self.core.elapsed()
        }

        fn is_focused(&self) -> bool {
            self.core.focus() == Some(self.node_id)
        }

        fn pointer(&self) -> Option<Point> {
            let p = self.core.input().pointer?;
            self.core
                .convert_coordinate_space(
                    self.node_id,
                    CoordinateSpace::Screen,
                    CoordinateSpace::Layout,
                    p,
                )
                .ok()
        }

        fn children(&self) -> Vec<NodeId> {
            self.core
                .node(self.node_id)
                .map(|n| n.children().to_vec())
                .unwrap_or_default()
        }

        fn parent(&self) -> Option<NodeId> {
            self.core.parent(self.node_id)
        }

        fn node_render_bounds(&self, node: NodeId) -> Option<Rect> {
            self.core.render_bounds(node).ok()
        }

        fn content_screen_bounds(&self) -> Rect {
            self.core
                .child_space_transform(self.node_id)
                .map(|t| {
                    t.convert(
                        CoordinateSpace::Layout,
                        CoordinateSpace::Screen,
                        self.content_bounds(),
                    )
                })
                .unwrap_or_default()
        }
    };
}

impl ViewContext for CoreViewContext<'_> {
    view_context_impl!();
}

/// Mutable context backed by an exclusive Core reference.
pub(crate) struct CoreContext<'a> {
    /// Core state.
    core: &'a mut Core,
    /// Node the context is for.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Construct a mutable context for a node.
    pub(crate) fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl ViewContext for CoreContext<'_> {
    view_context_impl!();
}

impl Context for CoreContext<'_> {
    fn layout_changed(&mut self, affects_measure: bool) -> Result<()> {
        self.core.layout_changed(self.node_id, affects_measure)
    }

    fn with_layout_of(&mut self, node: NodeId, f: &mut dyn FnMut(&mut Layout)) -> Result<()> {
        self.core.with_layout_of(node, |l| f(l))
    }

    fn set_selected(&mut self, selected: bool) -> Result<()> {
        self.core.set_selected(self.node_id, selected)
    }

    fn set_focus(&mut self, node: NodeId) -> Result<()> {
        self.core.set_focus(node)
    }

    fn capture_pointer(&mut self) {
        self.core.capture_pointer(self.node_id);
    }

    fn release_pointer(&mut self) {
        if self.core.pointer_capture() == Some(self.node_id) {
            self.core.release_pointer();
        }
    }
}
