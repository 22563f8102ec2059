use std::{any::Any, mem, time::Duration};

use scopeguard::{ScopeGuard, guard};
use slotmap::SlotMap;
use tracing::{debug, trace};

#[cfg(debug_assertions)]
use std::collections::HashSet;

use crate::{
    core::{
        component::{Component, DrawPriority, UpdatePriority},
        context::{CoreContext, CoreViewContext},
        event::{Event, FrameArgs, InputSnapshot},
        id::NodeId,
        node::{HostedComponent, Node},
        pass::LayoutPass,
        render::DrawBatch,
        resources::Resources,
        space::{Convert, CoordinateSpace, SpaceTransform, sanitize_scale},
        visual::VisualState,
    },
    error::{Error, Result},
    geom::{Expanse, HorizontalAlignment, Point, Rect, Thickness, VerticalAlignment},
    layout::{Layout, Measurement, Visibility},
    widget::{ContentMode, EventOutcome, Widget},
};

/// The implicit root window.
struct Root;

impl Widget for Root {
    fn content_mode(&self) -> ContentMode {
        ContentMode::Multiple
    }

    fn own_layout_space(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "root"
    }
}

/// Window-level inputs to layout and coordinate conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    /// Window size in unscaled units.
    size: Expanse,
    /// Screen scale factor.
    scale: f64,
    /// Window origin on screen.
    origin: Point,
}

/// Core state for the arena, layout engine, and input routing.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root window node.
    pub(crate) root: NodeId,
    /// Window size, scale and origin.
    window: Window,
    /// Read-only resources for widgets.
    resources: Resources,
    /// Node receiving key events.
    focus: Option<NodeId>,
    /// Input snapshot from the previous frame.
    input: InputSnapshot,
    /// Path from the node the primary button went down on to the root.
    press_path: Vec<NodeId>,
    /// Node that captures pointer events regardless of pointer position.
    capture: Option<NodeId>,
    /// Time since the previous frame.
    elapsed: Duration,
    /// Number of invalidation signals fired.
    invalidations: u64,
    /// Number of full layout passes run.
    layout_passes: u64,
    /// Window size at the last layout pass.
    arranged_size: Option<Expanse>,
}

impl Core {
    /// Create a Core with an empty root window of the given size.
    pub fn new(window_size: Expanse) -> Self {
        Self::with_resources(window_size, Resources::default())
    }

    /// Create a Core with an empty root window and a set of resources.
    pub fn with_resources(window_size: Expanse, resources: Resources) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Box::new(Root)));
        Self {
            nodes,
            root,
            window: Window {
                size: window_size.clamped(),
                scale: 1.0,
                origin: Point::zero(),
            },
            resources,
            focus: None,
            input: InputSnapshot::default(),
            press_path: vec![],
            capture: None,
            elapsed: Duration::ZERO,
            invalidations: 0,
            layout_passes: 0,
            arranged_size: None,
        }
    }

    /// The root window node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Shared read-only resources.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Time since the previous frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The input snapshot of the most recent frame.
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// Window size.
    pub fn window_size(&self) -> Expanse {
        self.window.size
    }

    /// Window scale.
    pub fn window_scale(&self) -> f64 {
        self.window.scale
    }

    /// Window origin on screen.
    pub fn window_origin(&self) -> Point {
        self.window.origin
    }

    /// Resize the window. Layout re-runs on the next update.
    pub fn set_window_size(&mut self, size: Expanse) {
        let size = size.clamped();
        if size != self.window.size {
            debug!(?size, "window resized");
            self.window.size = size;
        }
    }

    /// Set the window scale. Non-finite or non-positive values become 1.0.
    pub fn set_window_scale(&mut self, scale: f64) {
        let scale = sanitize_scale(scale);
        debug!(scale, "window scale");
        self.window.scale = scale;
    }

    /// Move the window on screen.
    pub fn set_window_origin(&mut self, origin: Point) {
        debug!(?origin, "window origin");
        self.window.origin = origin;
    }

    /// Look up a node.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into())
    }

    /// Look up a node, or fail.
    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably, or fail.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the arena contain this node?
    pub fn contains(&self, node_id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(node_id.into())
    }

    /// Number of nodes in the arena, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Parent or host of a node.
    pub fn parent(&self, node_id: impl Into<NodeId>) -> Option<NodeId> {
        self.nodes.get(node_id.into()).and_then(|n| n.parent)
    }

    /// Content children of a node.
    pub fn children(&self, node_id: impl Into<NodeId>) -> Result<&[NodeId]> {
        Ok(&self.get(node_id.into())?.children)
    }

    /// Component elements of a node, in insertion order.
    pub fn components(&self, node_id: impl Into<NodeId>) -> Result<Vec<NodeId>> {
        Ok(self.get(node_id.into())?.component_elements().collect())
    }

    /// Create a detached node holding a widget.
    pub fn create_detached<W>(&mut self, widget: W) -> NodeId
    where
        W: Widget + 'static,
    {
        self.create_detached_boxed(Box::new(widget))
    }

    /// Create a detached node from a boxed widget.
    pub fn create_detached_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        let id = self.nodes.insert(Node::new(widget));
        debug!(node = ?id, name = self.nodes[id].name, "created");
        id
    }

    /// Create a detached node and configure it inside a deferred-notification
    /// scope, so setup raises at most one invalidation.
    ///
    /// If setup fails, the node and everything attached under it are removed
    /// from the arena before the error is returned.
    pub fn create_with<W, F>(&mut self, widget: W, f: F) -> Result<NodeId>
    where
        W: Widget + 'static,
        F: FnOnce(&mut Self, NodeId) -> Result<()>,
    {
        let id = self.create_detached(widget);
        let setup = {
            let mut scope = self.begin_init(id)?;
            let core: &mut Self = &mut scope;
            f(core, id)
        };
        if let Err(e) = setup {
            self.remove_subtree(id)?;
            return Err(e);
        }
        Ok(id)
    }

    /// Is `ancestor` the node itself or one of its ancestors?
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Check that `child` may be linked under `parent` at all.
    fn check_link(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        let c = self.get(child)?;
        if child == self.root || c.parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        Ok(())
    }

    /// Attach a detached node as content of a host.
    pub fn attach(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        if self.get(child)?.is_component {
            return Err(Error::ComponentElementShared(child));
        }
        self.check_link(parent, child)?;
        let p = self.get(parent)?;
        if p.content_locked {
            return Err(Error::ContentLocked(parent));
        }
        if !p.content_mode.accepts(p.children.len()) {
            return Err(Error::ContentNotAccepted(parent));
        }

        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        debug!(?parent, ?child, "attached");
        self.debug_assert_tree_invariants();
        self.layout_changed(parent, true)
    }

    /// Unlink a node from its parent or host without any checks.
    fn unlink(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get_mut(child)?.parent.take()?;
        let is_component = mem::take(&mut self.nodes[child].is_component);
        if let Some(p) = self.nodes.get_mut(parent) {
            if is_component {
                p.components.retain(|c| c.element != child);
            } else {
                p.children.retain(|id| *id != child);
            }
        }
        Some(parent)
    }

    /// Check that a node can be detached from wherever it is attached.
    fn check_detach(&self, child: NodeId) -> Result<()> {
        if child == self.root {
            return Err(Error::RootRemoval);
        }
        let c = self.get(child)?;
        if let Some(parent) = c.parent
            && !c.is_component
            && self.get(parent)?.content_locked
        {
            return Err(Error::ContentLocked(parent));
        }
        Ok(())
    }

    /// Detach a node from its parent or host. The node and its subtree stay
    /// in the arena. Detaching a detached node is a no-op.
    pub fn detach(&mut self, child: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        self.check_detach(child)?;
        if let Some(parent) = self.unlink(child) {
            debug!(?parent, ?child, "detached");
            self.debug_assert_tree_invariants();
            self.layout_changed(parent, true)?;
        }
        Ok(())
    }

    /// Replace the content of a single-content host, returning the previous
    /// content. The previous content stays in the arena, detached.
    pub fn set_content(
        &mut self,
        host: impl Into<NodeId>,
        content: Option<NodeId>,
    ) -> Result<Option<NodeId>> {
        let host = host.into();
        let h = self.get(host)?;
        if h.content_locked {
            return Err(Error::ContentLocked(host));
        }
        if h.content_mode != ContentMode::Single {
            return Err(Error::ContentNotAccepted(host));
        }
        let previous = h.children.first().copied();
        if previous.is_some() && previous == content {
            return Ok(previous);
        }
        if let Some(c) = content {
            self.check_link(host, c)?;
            if self.get(c)?.is_component {
                return Err(Error::ComponentElementShared(c));
            }
        }

        let mut scope = self.begin_init(host)?;
        if let Some(p) = previous {
            scope.detach(p)?;
        }
        if let Some(c) = content {
            scope.attach(host, c)?;
        }
        Ok(previous)
    }

    /// Lock a host's content so it can no longer be replaced or detached.
    pub fn lock_content(&mut self, host: impl Into<NodeId>) -> Result<()> {
        self.get_mut(host.into())?.content_locked = true;
        Ok(())
    }

    /// Wrap a detached element as a component of a host.
    pub fn add_component(
        &mut self,
        host: impl Into<NodeId>,
        element: impl Into<NodeId>,
        component: Component,
    ) -> Result<()> {
        let host = host.into();
        let element = element.into();
        if self.get(element)?.is_component {
            return Err(Error::ComponentElementShared(element));
        }
        self.check_link(host, element)?;

        let e = self.get_mut(element)?;
        e.parent = Some(host);
        e.is_component = true;
        self.get_mut(host)?
            .components
            .push(HostedComponent { element, component });
        debug!(?host, ?element, "component added");
        self.debug_assert_tree_invariants();
        self.layout_changed(host, true)
    }

    /// Remove a node, its content and its components from the arena.
    pub fn remove_subtree(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let id = node_id.into();
        self.check_detach(id)?;
        let parent = self.unlink(id);

        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                removed += 1;
                stack.extend(node.children);
                stack.extend(node.components.into_iter().map(|c| c.element));
            }
        }
        if self.focus.is_some_and(|f| !self.nodes.contains_key(f)) {
            self.focus = None;
        }
        if self.capture.is_some_and(|c| !self.nodes.contains_key(c)) {
            self.capture = None;
        }
        let nodes = &self.nodes;
        self.press_path.retain(|n| nodes.contains_key(*n));
        debug!(node = ?id, removed, "subtree removed");
        self.debug_assert_tree_invariants();

        if let Some(parent) = parent {
            self.layout_changed(parent, true)?;
        }
        Ok(())
    }

    /// Take a widget out of its slot for a single call, restoring it after.
    pub(crate) fn with_widget<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let mut widget = self
            .get_mut(node_id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        let out = f(widget.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.widget = Some(widget);
        }
        Ok(out)
    }

    /// Borrow a node's widget as a concrete type.
    pub fn widget_ref<W: Widget>(&self, node_id: impl Into<NodeId>) -> Result<&W> {
        let id = node_id.into();
        let widget = self
            .get(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        let any: &dyn Any = widget;
        any.downcast_ref::<W>().ok_or(Error::WidgetType(id))
    }

    /// Mutate a node's widget as a concrete type. The closure also gets the
    /// Core, so it can raise layout invalidation for what it changed.
    pub fn with_widget_mut<W, R>(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut Self) -> R,
    ) -> Result<R>
    where
        W: Widget,
    {
        let id = node_id.into();
        self.with_widget(id, |w, core| {
            let any: &mut dyn Any = w;
            any.downcast_mut::<W>()
                .map(|w| f(w, core))
                .ok_or(Error::WidgetType(id))
        })?
    }

    /// Modify a node's layout properties, invalidating if they changed.
    pub fn with_layout_of(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut Layout),
    ) -> Result<()> {
        let id = node_id.into();
        let node = self.get_mut(id)?;
        let before = node.layout;
        f(&mut node.layout);
        if node.layout != before {
            self.layout_changed(id, true)?;
        }
        Ok(())
    }

    /// Replace a node's layout properties.
    pub fn set_layout(&mut self, node_id: impl Into<NodeId>, layout: Layout) -> Result<()> {
        self.with_layout_of(node_id, |l| *l = layout)
    }

    /// Set a node's margin.
    pub fn set_margin(
        &mut self,
        node_id: impl Into<NodeId>,
        margin: impl Into<Thickness>,
    ) -> Result<()> {
        let margin = margin.into();
        self.with_layout_of(node_id, |l| l.margin = margin)
    }

    /// Set a node's padding.
    pub fn set_padding(
        &mut self,
        node_id: impl Into<NodeId>,
        padding: impl Into<Thickness>,
    ) -> Result<()> {
        let padding = padding.into();
        self.with_layout_of(node_id, |l| l.padding = padding)
    }

    /// Set a node's preferred width.
    pub fn set_width(&mut self, node_id: impl Into<NodeId>, width: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.width = width)
    }

    /// Set a node's preferred height.
    pub fn set_height(&mut self, node_id: impl Into<NodeId>, height: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.height = height)
    }

    /// Set a node's minimum width.
    pub fn set_min_width(&mut self, node_id: impl Into<NodeId>, v: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.min_width = v)
    }

    /// Set a node's minimum height.
    pub fn set_min_height(&mut self, node_id: impl Into<NodeId>, v: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.min_height = v)
    }

    /// Set a node's maximum width.
    pub fn set_max_width(&mut self, node_id: impl Into<NodeId>, v: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.max_width = v)
    }

    /// Set a node's maximum height.
    pub fn set_max_height(&mut self, node_id: impl Into<NodeId>, v: Option<i32>) -> Result<()> {
        self.with_layout_of(node_id, |l| l.max_height = v)
    }

    /// Set a node's alignment within its slot.
    pub fn set_alignment(
        &mut self,
        node_id: impl Into<NodeId>,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Result<()> {
        self.with_layout_of(node_id, |l| {
            l.horizontal = horizontal;
            l.vertical = vertical;
        })
    }

    /// Set a node's visibility. Only collapsing or expanding changes layout.
    pub fn set_visibility(
        &mut self,
        node_id: impl Into<NodeId>,
        visibility: Visibility,
    ) -> Result<()> {
        let id = node_id.into();
        let node = self.get_mut(id)?;
        let before = mem::replace(&mut node.visibility, visibility);
        if before.takes_space() != visibility.takes_space() {
            self.layout_changed(id, true)?;
        }
        Ok(())
    }

    /// Set a node's own enablement flag.
    pub fn set_enabled(&mut self, node_id: impl Into<NodeId>, enabled: bool) -> Result<()> {
        self.get_mut(node_id.into())?.enabled = enabled;
        Ok(())
    }

    /// Set a node's selection flag.
    pub fn set_selected(&mut self, node_id: impl Into<NodeId>, selected: bool) -> Result<()> {
        self.get_mut(node_id.into())?.selected = selected;
        Ok(())
    }

    /// Set a node's opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, node_id: impl Into<NodeId>, opacity: f32) -> Result<()> {
        let opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self.get_mut(node_id.into())?.opacity = opacity;
        Ok(())
    }

    /// Make a node's subtree lay out relative to its own top-left.
    pub fn set_own_layout_space(&mut self, node_id: impl Into<NodeId>, v: bool) -> Result<()> {
        let id = node_id.into();
        let node = self.get_mut(id)?;
        if node.own_layout_space != v {
            node.own_layout_space = v;
            self.layout_changed(id, false)?;
        }
        Ok(())
    }

    /// Signal that a node's layout changed. Inside a deferred-notification
    /// scope for the node the signal is held until the scope closes.
    pub fn layout_changed(
        &mut self,
        node_id: impl Into<NodeId>,
        affects_measure: bool,
    ) -> Result<()> {
        let id = node_id.into();
        let node = self.get_mut(id)?;
        if node.init_depth > 0 {
            node.pending = Some(node.pending.unwrap_or(false) || affects_measure);
            return Ok(());
        }
        self.invalidate(id, affects_measure);
        Ok(())
    }

    /// Mark a node and its ancestors for layout. The walk stops at an
    /// ancestor already marked since the last layout pass that, for measure
    /// changes, also has no cached measurement: everything above it was
    /// marked by the same earlier walk.
    fn invalidate(&mut self, id: NodeId, affects_measure: bool) {
        self.invalidations += 1;
        trace!(node = ?id, affects_measure, count = self.invalidations, "layout invalidated");
        let mut current = Some(id);
        let mut first = true;
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(id) else {
                break;
            };
            let settled = node.dirty && (!affects_measure || node.measure_cache.is_none());
            if settled && !first {
                break;
            }
            node.dirty = true;
            if affects_measure {
                node.measure_cache = None;
            }
            first = false;
            current = node.parent;
        }
    }

    /// Number of invalidation signals fired so far.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations
    }

    /// Number of full layout passes run so far.
    pub fn layout_count(&self) -> u64 {
        self.layout_passes
    }

    /// Open a deferred-notification scope for a node.
    ///
    /// The returned guard dereferences to the Core. While any scope for the
    /// node is open, invalidation for it is recorded but not signalled;
    /// closing the outermost scope fires a single invalidation if any was
    /// recorded.
    pub fn begin_init<'a>(
        &'a mut self,
        node_id: impl Into<NodeId>,
    ) -> Result<ScopeGuard<&'a mut Self, impl FnOnce(&'a mut Self)>> {
        let id = node_id.into();
        self.get_mut(id)?.init_depth += 1;
        Ok(guard(self, move |core: &'a mut Self| core.end_init(id)))
    }

    /// Close one deferred-notification scope.
    fn end_init(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.init_depth = node.init_depth.saturating_sub(1);
        if node.init_depth == 0
            && let Some(affects_measure) = node.pending.take()
        {
            self.invalidate(id, affects_measure);
        }
    }

    /// Is a deferred-notification scope open for this node?
    pub fn is_initializing(&self, node_id: impl Into<NodeId>) -> bool {
        self.node(node_id).is_some_and(|n| n.init_depth > 0)
    }

    /// Measure a node against an available size. Does not write bounds.
    pub fn measure(
        &mut self,
        node_id: impl Into<NodeId>,
        available: Expanse,
    ) -> Result<Measurement> {
        LayoutPass::new(self).measure(node_id.into(), available)
    }

    /// Arrange a node into a slot in its parent's layout space.
    pub fn arrange(&mut self, node_id: impl Into<NodeId>, slot: Rect) -> Result<()> {
        LayoutPass::new(self).arrange(node_id.into(), slot)
    }

    /// Lay out the window if anything changed since the last pass.
    pub fn update_layout(&mut self) -> Result<()> {
        let size = self.window.size;
        if !self.get(self.root)?.dirty && self.arranged_size == Some(size) {
            return Ok(());
        }
        self.layout_passes += 1;
        trace!(?size, pass = self.layout_passes, "layout");
        let root = self.root;
        LayoutPass::new(self).arrange(root, size.rect())?;
        for node in self.nodes.values_mut() {
            node.dirty = false;
        }
        self.arranged_size = Some(size);
        Ok(())
    }

    /// Slot assigned by the parent, in the parent's layout space.
    pub fn layout_bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        Ok(self.get(node_id.into())?.layout_bounds)
    }

    /// Aligned rectangle inside the margin, in the parent's layout space.
    pub fn render_bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        Ok(self.get(node_id.into())?.render_bounds)
    }

    /// Content area, in the layout space of the node's children.
    pub fn content_bounds(&self, node_id: impl Into<NodeId>) -> Result<Rect> {
        Ok(self.get(node_id.into())?.content_bounds)
    }

    /// The transform for a node's own layout space.
    pub fn space_transform(&self, node_id: impl Into<NodeId>) -> Result<SpaceTransform> {
        let id = node_id.into();
        self.anchored_transform(self.get(id)?.parent)
    }

    /// The transform for the layout space a node's children and components
    /// are arranged in.
    pub fn child_space_transform(&self, node_id: impl Into<NodeId>) -> Result<SpaceTransform> {
        let id = node_id.into();
        self.get(id)?;
        self.anchored_transform(Some(id))
    }

    /// Accumulate the anchor from `start` up to the root.
    fn anchored_transform(&self, start: Option<NodeId>) -> Result<SpaceTransform> {
        let mut anchor = Point::zero();
        let mut current = start;
        while let Some(id) = current {
            let node = self.get(id)?;
            if node.own_layout_space {
                anchor = anchor + node.render_bounds.tl;
            }
            current = node.parent;
        }
        Ok(SpaceTransform {
            anchor,
            scale: self.window.scale,
            origin: self.window.origin,
        })
    }

    /// Convert a point or rect between coordinate spaces for a node.
    pub fn convert_coordinate_space<T: Convert>(
        &self,
        node_id: impl Into<NodeId>,
        from: CoordinateSpace,
        to: CoordinateSpace,
        value: T,
    ) -> Result<T> {
        Ok(self.space_transform(node_id)?.convert(from, to, value))
    }

    /// Is the node enabled, along with all of its ancestors?
    pub fn is_enabled(&self, node_id: impl Into<NodeId>) -> bool {
        let mut current = Some(node_id.into());
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(n) if n.enabled => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// The node's opacity multiplied by its ancestors'.
    pub fn effective_opacity(&self, node_id: impl Into<NodeId>) -> f32 {
        let mut opacity = 1.0;
        let mut current = Some(node_id.into());
        while let Some(n) = current.and_then(|id| self.nodes.get(id)) {
            opacity *= n.opacity;
            current = n.parent;
        }
        opacity
    }

    /// Derive a node's visual state from its flags and the pointer.
    pub fn visual_state(&self, node_id: impl Into<NodeId>) -> Result<VisualState> {
        let id = node_id.into();
        let node = self.get(id)?;
        Ok(VisualState::derive(
            self.is_enabled(id),
            node.selected,
            node.pressed,
            node.hovered,
        ))
    }

    /// The node with keyboard focus.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Give keyboard focus to a node.
    pub fn set_focus(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let id = node_id.into();
        self.get(id)?;
        self.focus = Some(id);
        Ok(())
    }

    /// Clear keyboard focus.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// The node capturing pointer events, if any.
    pub fn pointer_capture(&self) -> Option<NodeId> {
        self.capture
    }

    /// Route pointer events to a node regardless of pointer position.
    pub fn capture_pointer(&mut self, node_id: impl Into<NodeId>) {
        let id = node_id.into();
        if self.nodes.contains_key(id) {
            trace!(node = ?id, "pointer captured");
            self.capture = Some(id);
        }
    }

    /// Release any pointer capture.
    pub fn release_pointer(&mut self) {
        self.capture = None;
    }

    /// Run one frame of update: layout if needed, route input, update every
    /// live node, then lay out again if anything changed.
    pub fn update(&mut self, args: &FrameArgs) -> Result<()> {
        self.elapsed = args.elapsed;
        self.update_layout()?;
        self.route_input(&args.input)?;
        let root = self.root;
        self.update_node(root)?;
        self.update_layout()
    }

    /// Update a node, its components and its content in priority order.
    fn update_node(&mut self, id: NodeId) -> Result<()> {
        let node = self.get(id)?;
        if !node.visibility.takes_space() {
            return Ok(());
        }
        let children = node.children.clone();
        let (before, after): (Vec<_>, Vec<_>) = node
            .components
            .iter()
            .map(|c| (c.component.update_priority, c.element))
            .partition(|(p, _)| *p == UpdatePriority::BeforeContents);

        self.with_widget(id, |w, core| w.update(&mut CoreContext::new(core, id)))??;
        for (_, element) in before {
            self.update_node(element)?;
        }
        for child in children {
            self.update_node(child)?;
        }
        for (_, element) in after {
            self.update_node(element)?;
        }
        Ok(())
    }

    /// Draw the window into a batch, in screen space.
    pub fn draw(&mut self, args: &FrameArgs, batch: &mut dyn DrawBatch) -> Result<()> {
        self.elapsed = args.elapsed;
        self.update_layout()?;
        let root = self.root;
        self.draw_node(root, batch)
    }

    /// Draw a node and everything it hosts.
    fn draw_node(&mut self, id: NodeId, batch: &mut dyn DrawBatch) -> Result<()> {
        let node = self.get(id)?;
        if !node.visibility.is_visible() {
            return Ok(());
        }
        let children = node.children.clone();
        let components: Vec<_> = node
            .components
            .iter()
            .map(|c| (c.component.draw_priority, c.element))
            .collect();

        self.draw_components(&components, DrawPriority::BeforeBackground, batch)?;
        self.with_widget(id, |w, core| {
            w.draw_background(batch, &CoreViewContext::new(core, id))
        })??;
        self.draw_components(&components, DrawPriority::BeforeSelf, batch)?;
        self.with_widget(id, |w, core| {
            w.draw_self(batch, &CoreViewContext::new(core, id))
        })??;
        self.draw_components(&components, DrawPriority::BeforeContents, batch)?;
        for child in children {
            self.draw_node(child, batch)?;
        }
        self.draw_components(&components, DrawPriority::AfterContents, batch)
    }

    /// Draw the components at one priority, in insertion order.
    fn draw_components(
        &mut self,
        components: &[(DrawPriority, NodeId)],
        priority: DrawPriority,
        batch: &mut dyn DrawBatch,
    ) -> Result<()> {
        for (_, element) in components.iter().filter(|(p, _)| *p == priority) {
            self.draw_node(*element, batch)?;
        }
        Ok(())
    }

    /// Find the topmost visible node under a screen-space point.
    pub fn locate_node(&self, point: Point) -> Result<Option<NodeId>> {
        let unscaled = SpaceTransform {
            anchor: Point::zero(),
            scale: self.window.scale,
            origin: self.window.origin,
        }
        .convert(CoordinateSpace::Screen, CoordinateSpace::UnscaledScreen, point);
        self.locate_recursive(self.root, unscaled, Point::zero())
    }

    /// Hit-test a subtree. `anchor` is the node's layout anchor, `point` is
    /// in unscaled screen space. Nodes drawn later are tested first.
    fn locate_recursive(&self, id: NodeId, point: Point, anchor: Point) -> Result<Option<NodeId>> {
        let node = self.get(id)?;
        if !node.visibility.is_visible() {
            return Ok(None);
        }
        let local = point - anchor;
        let inner_anchor = if node.own_layout_space {
            anchor + node.render_bounds.tl
        } else {
            anchor
        };
        let components_at = |p: DrawPriority| {
            node.components
                .iter()
                .rev()
                .filter(move |c| c.component.draw_priority == p)
                .map(|c| c.element)
        };

        for element in components_at(DrawPriority::AfterContents) {
            if let Some(hit) = self.locate_recursive(element, point, inner_anchor)? {
                return Ok(Some(hit));
            }
        }
        let inside = node.render_bounds.contains_point(local);
        if inside {
            for child in node.children.iter().rev() {
                if let Some(hit) = self.locate_recursive(*child, point, inner_anchor)? {
                    return Ok(Some(hit));
                }
            }
        }
        for element in components_at(DrawPriority::BeforeContents) {
            if let Some(hit) = self.locate_recursive(element, point, inner_anchor)? {
                return Ok(Some(hit));
            }
        }
        if inside {
            return Ok(Some(id));
        }
        for p in [DrawPriority::BeforeSelf, DrawPriority::BeforeBackground] {
            for element in components_at(p) {
                if let Some(hit) = self.locate_recursive(element, point, inner_anchor)? {
                    return Ok(Some(hit));
                }
            }
        }
        Ok(None)
    }

    /// A node and its ancestors, nearest first.
    fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![];
        let mut current = Some(id);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        path
    }

    /// Update pointer flags from a new snapshot and dispatch the events that
    /// separate it from the previous one.
    fn route_input(&mut self, input: &InputSnapshot) -> Result<()> {
        let prev = mem::replace(&mut self.input, input.clone());
        let hit = match input.pointer {
            Some(p) => self.locate_node(p)?,
            None => None,
        };
        let hover_path = hit.map(|h| self.path_to_root(h)).unwrap_or_default();

        if input.primary_down() && !prev.primary_down() {
            self.press_path = hover_path.clone();
        } else if !input.primary_down() {
            self.press_path.clear();
        }

        for node in self.nodes.values_mut() {
            node.hovered = false;
            node.pressed = false;
        }
        for id in &hover_path {
            if let Some(node) = self.nodes.get_mut(*id) {
                node.hovered = true;
                node.pressed = self.press_path.contains(id);
            }
        }

        for event in input.diff(&prev) {
            let target = if event.is_pointer() {
                self.capture.or(hit)
            } else {
                Some(self.focus.unwrap_or(self.root))
            };
            if let Some(target) = target {
                self.dispatch_event(target, &event)?;
            }
        }
        Ok(())
    }

    /// Dispatch a screen-space event to a node, bubbling to parents while it
    /// is ignored. Disabled nodes are skipped. Each node receives positions
    /// in its own layout space.
    pub fn dispatch_event(
        &mut self,
        start: impl Into<NodeId>,
        event: &Event,
    ) -> Result<EventOutcome> {
        let mut current = Some(start.into());
        while let Some(id) = current {
            let parent = self.get(id)?.parent;
            if self.is_enabled(id) {
                let t = self.space_transform(id)?;
                let local = event.map_position(|p| {
                    t.convert(CoordinateSpace::Screen, CoordinateSpace::Layout, p)
                });
                let outcome = self.with_widget(id, |w, core| {
                    w.on_event(&local, &mut CoreContext::new(core, id))
                })??;
                if outcome != EventOutcome::Ignore {
                    trace!(node = ?id, ?outcome, "event handled");
                    return Ok(outcome);
                }
            }
            current = parent;
        }
        Ok(EventOutcome::Ignore)
    }

    /// Assert structural invariants on the node tree in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_tree_invariants(&self) {
        debug_assert!(self.nodes.contains_key(self.root), "root node missing");
        debug_assert!(self.nodes[self.root].parent.is_none(), "root has a parent");
        for (id, node) in self.nodes.iter() {
            let mut seen = HashSet::new();
            for child in node.children.iter().copied().chain(node.component_elements()) {
                debug_assert!(seen.insert(child), "{child:?} linked twice under {id:?}");
                let c = self.nodes.get(child);
                debug_assert!(c.is_some(), "child {child:?} missing");
                if let Some(c) = c {
                    debug_assert!(c.parent == Some(id), "{child:?} parent mismatch under {id:?}");
                    debug_assert!(
                        c.is_component != node.children.contains(&child),
                        "{child:?} is both content and component"
                    );
                }
            }
            let mut steps = 0;
            let mut current = node.parent;
            while let Some(p) = current {
                steps += 1;
                debug_assert!(steps <= self.nodes.len(), "cycle through {id:?}");
                if steps > self.nodes.len() {
                    break;
                }
                current = self.nodes.get(p).and_then(|n| n.parent);
            }
        }
    }

    /// Assert structural invariants on the node tree in debug builds.
    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_tree_invariants(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::Ordering,
    };

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::{
            component::Consumes,
            context::{Context, ViewContext},
            testing::{Probe, RecordingBatch},
        },
        layout::SelfMeasure,
        widgets::VStack,
    };

    #[test]
    fn attach_errors() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let root = core.root_id();
        let a = core.create_detached(Probe::new());
        let b = core.create_detached(Probe::new());

        core.attach(root, a)?;
        assert_eq!(core.attach(root, a), Err(Error::AlreadyAttached(a)));
        core.attach(a, b)?;
        core.detach(a)?;
        assert_eq!(
            core.attach(b, a),
            Err(Error::WouldCreateCycle { parent: b, child: a })
        );
        assert_eq!(core.attach(a, a), Err(Error::WouldCreateCycle { parent: a, child: a }));
        assert_eq!(core.attach(a, root), Err(Error::AlreadyAttached(root)));
        assert_eq!(core.detach(root), Err(Error::RootRemoval));

        let c = core.create_detached(Probe::new());
        assert_eq!(core.attach(a, c), Err(Error::ContentNotAccepted(a)));

        let leaf = core.create_detached(Probe::leaf(Expanse::new(1, 1)));
        assert_eq!(core.attach(leaf, c), Err(Error::ContentNotAccepted(leaf)));
        Ok(())
    }

    #[test]
    fn component_elements_are_exclusive() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let root = core.root_id();
        let host = core.create_detached(Probe::new());
        let other = core.create_detached(Probe::new());
        let el = core.create_detached(Probe::new());

        core.add_component(host, el, Component::builder().build())?;
        assert_eq!(core.components(host)?, vec![el]);
        assert_eq!(core.parent(el), Some(host));
        assert!(core.children(host)?.is_empty());

        assert_eq!(
            core.add_component(other, el, Component::builder().build()),
            Err(Error::ComponentElementShared(el))
        );
        assert_eq!(core.attach(root, el), Err(Error::ComponentElementShared(el)));

        core.detach(el)?;
        assert!(core.components(host)?.is_empty());
        core.attach(root, el)?;
        Ok(())
    }

    #[test]
    fn set_content_and_lock() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let host = core.create_detached(Probe::new());
        let a = core.create_detached(Probe::new());
        let b = core.create_detached(Probe::new());

        assert_eq!(core.set_content(host, Some(a))?, None);
        assert_eq!(core.set_content(host, Some(b))?, Some(a));
        assert_eq!(core.parent(a), None);
        assert_eq!(core.children(host)?, &[b]);

        core.lock_content(host)?;
        assert_eq!(core.set_content(host, Some(a)), Err(Error::ContentLocked(host)));
        assert_eq!(core.detach(b), Err(Error::ContentLocked(host)));
        assert_eq!(core.set_content(core.root_id(), None), Err(Error::ContentNotAccepted(core.root_id())));
        Ok(())
    }

    #[test]
    fn remove_subtree() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let root = core.root_id();
        let host = core.create_detached(Probe::new());
        let child = core.create_detached(Probe::new());
        let el = core.create_detached(Probe::new());
        core.attach(root, host)?;
        core.attach(host, child)?;
        core.add_component(host, el, Component::builder().build())?;
        core.set_focus(child)?;

        core.remove_subtree(host)?;
        assert!(!core.contains(host) && !core.contains(child) && !core.contains(el));
        assert_eq!(core.node_count(), 1);
        assert_eq!(core.focus(), None);
        assert!(core.children(root)?.is_empty());
        assert_eq!(core.remove_subtree(root), Err(Error::RootRemoval));
        assert_eq!(core.remove_subtree(host), Err(Error::NodeNotFound(host)));
        Ok(())
    }

    #[test]
    fn deferred_scope_fires_once() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let n = core.create_detached(Probe::new());
        let before = core.invalidation_count();
        {
            let mut scope = core.begin_init(n)?;
            scope.set_margin(n, 1)?;
            scope.set_padding(n, 2)?;
            scope.set_min_width(n, Some(3))?;
            {
                let mut inner = scope.begin_init(n)?;
                inner.set_width(n, Some(9))?;
            }
            assert!(scope.is_initializing(n));
            assert_eq!(scope.invalidation_count(), before);
        }
        assert!(!core.is_initializing(n));
        assert_eq!(core.invalidation_count(), before + 1);
        assert_eq!(core.node(n).map(|n| n.layout().padding), Some(Thickness::uniform(2)));

        // A scope with no changes fires nothing.
        {
            let _scope = core.begin_init(n)?;
        }
        assert_eq!(core.invalidation_count(), before + 1);

        // Outside a scope, each change signals.
        core.set_margin(n, 4)?;
        core.set_margin(n, 5)?;
        assert_eq!(core.invalidation_count(), before + 3);
        // No-op changes do not.
        core.set_margin(n, 5)?;
        assert_eq!(core.invalidation_count(), before + 3);
        Ok(())
    }

    #[test]
    fn create_with_defers() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let before = core.invalidation_count();
        let n = core.create_with(Probe::new(), |core, id| {
            core.set_padding(id, 1)?;
            core.set_margin(id, 1)?;
            let el = core.create_detached(Probe::new());
            core.add_component(id, el, Component::builder().build())
        })?;
        assert_eq!(core.invalidation_count(), before + 1);
        assert_eq!(core.components(n)?.len(), 1);
        Ok(())
    }

    #[test]
    fn create_with_failure_removes_node() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let root = core.root_id();
        let count = core.node_count();
        let res = core.create_with(Probe::new(), |core, id| {
            let el = core.create_detached(Probe::new());
            core.add_component(id, el, Component::builder().build())?;
            core.attach(root, id)?;
            Err(Error::Internal("setup failed".into()))
        });
        assert_eq!(res, Err(Error::Internal("setup failed".into())));
        assert_eq!(core.node_count(), count);
        assert!(core.children(root)?.is_empty());
        Ok(())
    }

    #[test]
    fn invalidation_drops_caches_up_the_tree() -> Result<()> {
        let mut core = Core::new(Expanse::new(40, 40));
        let root = core.root_id();
        let host = core.create_detached(Probe::new());
        let leaf = core.create_detached(Probe::leaf(Expanse::new(5, 5)));
        core.attach(root, host)?;
        core.attach(host, leaf)?;
        core.update_layout()?;
        assert!(core.node(host).is_some_and(|n| n.measure_cache.is_some()));

        core.set_margin(leaf, 1)?;
        for id in [leaf, host, root] {
            let n = core.node(id).ok_or(Error::NodeNotFound(id))?;
            assert!(n.is_dirty());
            assert!(n.measure_cache.is_none());
        }
        assert_eq!(core.measure(host, Expanse::new(40, 40))?.desired, Expanse::new(7, 7));
        Ok(())
    }

    #[test]
    fn layout_only_when_needed() -> Result<()> {
        let mut core = Core::new(Expanse::new(20, 20));
        let root = core.root_id();
        let a = core.create_detached(Probe::leaf(Expanse::new(2, 2)));
        core.attach(root, a)?;

        let args = FrameArgs::default();
        core.update(&args)?;
        let passes = core.layout_count();
        core.update(&args)?;
        assert_eq!(core.layout_count(), passes);

        core.set_window_size(Expanse::new(30, 20));
        core.update(&args)?;
        assert_eq!(core.layout_count(), passes + 1);
        assert_eq!(core.render_bounds(a)?, Rect::new(0, 0, 30, 20));

        core.set_padding(a, 1)?;
        core.update(&args)?;
        assert_eq!(core.layout_count(), passes + 2);
        Ok(())
    }

    #[test]
    fn typed_widget_access() -> Result<()> {
        let mut core = Core::new(Expanse::new(10, 10));
        let n = core.create_detached(Probe::leaf(Expanse::new(2, 2)));
        assert_eq!(core.widget_ref::<Probe>(n)?.content, Expanse::new(2, 2));
        core.with_widget_mut(n, |p: &mut Probe, core| {
            p.content = Expanse::new(4, 1);
            core.layout_changed(n, true)
        })??;
        assert_eq!(core.measure(n, Expanse::new(10, 10))?.desired, Expanse::new(4, 1));
        assert_eq!(core.widget_ref::<Root>(n).err(), Some(Error::WidgetType(n)));
        Ok(())
    }

    /// A widget that records the order of its update and draw calls.
    struct Recorder {
        /// Label for this node.
        label: &'static str,
        /// Shared call log.
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Widget for Recorder {
        fn content_mode(&self) -> ContentMode {
            ContentMode::Multiple
        }

        fn update(&mut self, _ctx: &mut dyn Context) -> Result<()> {
            self.push("update");
            Ok(())
        }

        fn draw_background(
            &mut self,
            _batch: &mut dyn DrawBatch,
            _ctx: &dyn ViewContext,
        ) -> Result<()> {
            self.push("background");
            Ok(())
        }

        fn draw_self(&mut self, _batch: &mut dyn DrawBatch, _ctx: &dyn ViewContext) -> Result<()> {
            self.push("self");
            Ok(())
        }
    }

    impl Recorder {
        /// Append a labelled entry to the log.
        fn push(&self, what: &str) {
            self.log
                .lock()
                .map(|mut l| l.push(format!("{}:{what}", self.label)))
                .ok();
        }
    }

    #[test]
    fn traversal_order() -> Result<()> {
        let log = Arc::new(Mutex::new(vec![]));
        let rec = |label| Recorder {
            label,
            log: log.clone(),
        };
        let mut core = Core::new(Expanse::new(10, 10));
        let root = core.root_id();
        let host = core.create_detached(rec("host"));
        let child = core.create_detached(rec("child"));
        let under = core.create_detached(rec("under"));
        let over = core.create_detached(rec("over"));
        let first = core.create_detached(rec("first"));
        core.attach(root, host)?;
        core.attach(host, child)?;
        core.add_component(
            host,
            over,
            Component::builder()
                .draw_priority(DrawPriority::AfterContents)
                .build(),
        )?;
        core.add_component(
            host,
            under,
            Component::builder()
                .draw_priority(DrawPriority::BeforeBackground)
                .update_priority(UpdatePriority::BeforeContents)
                .build(),
        )?;
        core.add_component(
            host,
            first,
            Component::builder()
                .draw_priority(DrawPriority::BeforeSelf)
                .consumes(Consumes::NONE)
                .build(),
        )?;

        core.update(&FrameArgs::default())?;
        let updates: Vec<String> = log.lock().map(|l| l.clone()).unwrap_or_default();
        assert_eq!(
            updates,
            vec!["host:update", "under:update", "child:update", "over:update", "first:update"]
        );

        log.lock().map(|mut l| l.clear()).ok();
        core.draw(&FrameArgs::default(), &mut RecordingBatch::default())?;
        let draws: Vec<String> = log.lock().map(|l| l.clone()).unwrap_or_default();
        assert_eq!(
            draws,
            vec![
                "under:background",
                "under:self",
                "host:background",
                "first:background",
                "first:self",
                "host:self",
                "child:background",
                "child:self",
                "over:background",
                "over:self",
            ]
        );
        Ok(())
    }

    #[test]
    fn hidden_and_collapsed() -> Result<()> {
        let mut core = Core::new(Expanse::new(20, 20));
        let root = core.root_id();
        let stack = core.create_detached(VStack::new());
        let a = core.create_detached(Probe::leaf(Expanse::new(4, 3)));
        let b = core.create_detached(Probe::leaf(Expanse::new(4, 3)));
        core.attach(root, stack)?;
        core.attach(stack, a)?;
        core.attach(stack, b)?;
        core.set_alignment(stack, HorizontalAlignment::Left, VerticalAlignment::Top)?;

        core.set_visibility(a, Visibility::Hidden)?;
        core.update_layout()?;
        assert_eq!(core.render_bounds(stack)?.expanse(), Expanse::new(4, 6));
        assert_eq!(core.render_bounds(b)?.tl, Point::new(0, 3));
        assert_eq!(core.locate_node(Point::new(1, 1))?, Some(stack));

        core.set_visibility(a, Visibility::Collapsed)?;
        core.update_layout()?;
        assert_eq!(core.render_bounds(stack)?.expanse(), Expanse::new(4, 3));
        assert_eq!(core.render_bounds(a)?, Rect::new(0, 0, 0, 0));
        assert_eq!(core.render_bounds(b)?.tl, Point::new(0, 0));
        assert_eq!(
            core.measure(a, Expanse::new(20, 20))?,
            Measurement::zero()
        );
        Ok(())
    }

    #[test]
    fn self_measure_and_measure_cache() -> Result<()> {
        let mut core = Core::new(Expanse::new(50, 50));
        let probe = Probe::leaf(Expanse::new(3, 3)).with_self(SelfMeasure::new(1));
        let calls = probe.measure_calls();
        let n = core.create_detached(probe);
        let m1 = core.measure(n, Expanse::new(50, 50))?;
        let m2 = core.measure(n, Expanse::new(50, 50))?;
        assert_eq!(m1, m2);
        assert_eq!(m1.desired, Expanse::new(5, 5));
        assert_eq!(m1.own, Thickness::uniform(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        core.measure(n, Expanse::new(10, 10))?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
