use crate::{
    core::{component::Component, id::NodeId},
    geom::{Expanse, Rect},
    layout::{Layout, Measurement, Visibility},
    widget::{ContentMode, Widget},
};

/// A component attached to a host node.
#[derive(Debug)]
pub(crate) struct HostedComponent {
    /// The wrapped element.
    pub(crate) element: NodeId,
    /// How the element participates in the host's passes.
    pub(crate) component: Component,
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. `None` while the widget is borrowed out
    /// for a call.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Widget name, captured at creation.
    pub(crate) name: &'static str,
    /// Content hosting mode, captured at creation.
    pub(crate) content_mode: ContentMode,

    /// Parent (for content) or host (for component elements).
    pub(crate) parent: Option<NodeId>,
    /// Content children in order.
    pub(crate) children: Vec<NodeId>,
    /// Components in insertion order.
    pub(crate) components: Vec<HostedComponent>,
    /// Set when this node is wrapped by a component of its parent.
    pub(crate) is_component: bool,

    /// Layout properties.
    pub(crate) layout: Layout,
    /// Visibility.
    pub(crate) visibility: Visibility,
    /// Own enablement flag. Effective enablement also depends on ancestors.
    pub(crate) enabled: bool,
    /// Selection flag.
    pub(crate) selected: bool,
    /// Opacity multiplier in `[0, 1]`.
    pub(crate) opacity: f32,
    /// Content can no longer be replaced.
    pub(crate) content_locked: bool,
    /// Subtree lays out relative to this node's top-left.
    pub(crate) own_layout_space: bool,

    /// Slot assigned by the parent, margin included.
    pub(crate) layout_bounds: Rect,
    /// Aligned rectangle inside the margin.
    pub(crate) render_bounds: Rect,
    /// Area left for content after all carving.
    pub(crate) content_bounds: Rect,
    /// Cached measurement keyed by available size.
    pub(crate) measure_cache: Option<(Expanse, Measurement)>,
    /// Layout-invalidated since the last arrangement.
    pub(crate) dirty: bool,
    /// Open deferred-notification scopes.
    pub(crate) init_depth: u32,
    /// Deferred invalidation, with whether it affects measurement.
    pub(crate) pending: Option<bool>,

    /// The pointer is over this node this frame.
    pub(crate) hovered: bool,
    /// This node is being pressed this frame.
    pub(crate) pressed: bool,
}

impl Node {
    /// Build a fresh detached node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        Self {
            name: widget.name(),
            content_mode: widget.content_mode(),
            layout: widget.layout(),
            own_layout_space: widget.own_layout_space(),
            widget: Some(widget),
            parent: None,
            children: vec![],
            components: vec![],
            is_component: false,
            visibility: Visibility::Visible,
            enabled: true,
            selected: false,
            opacity: 1.0,
            content_locked: false,
            layout_bounds: Rect::zero(),
            render_bounds: Rect::zero(),
            content_bounds: Rect::zero(),
            measure_cache: None,
            dirty: true,
            init_depth: 0,
            pending: None,
            hovered: false,
            pressed: false,
        }
    }

    /// Widget name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parent or host.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Content children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Component elements in insertion order.
    pub fn component_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.components.iter().map(|c| c.element)
    }

    /// Is this node a component element?
    pub fn is_component(&self) -> bool {
        self.is_component
    }

    /// Layout properties.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Own enablement flag.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Selection flag.
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Slot assigned by the parent, in layout space.
    pub fn layout_bounds(&self) -> Rect {
        self.layout_bounds
    }

    /// Aligned rectangle inside the margin, in layout space.
    pub fn render_bounds(&self) -> Rect {
        self.render_bounds
    }

    /// Area left for content, in the space this node's children lay out in.
    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Does this node's subtree lay out relative to its own top-left?
    pub fn own_layout_space(&self) -> bool {
        self.own_layout_space
    }

    /// Is this node waiting for a layout pass?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
