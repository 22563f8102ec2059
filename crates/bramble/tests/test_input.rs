//! Integration tests for pointer and keyboard routing.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bramble::{
        NodeId,
        error::Result,
        event::{Event, KeyCode, MouseButton},
        geom::{Expanse, HorizontalAlignment, Point, Rect, VerticalAlignment},
        layout::Layout,
        testing::{Harness, Probe},
        visual::{Primary, Secondary},
        widget::EventOutcome,
        widgets::{ResizeGrip, Window},
    };
    use pretty_assertions::assert_eq;

    /// A harness with a panel filling the window and a 10x10 leaf at (5, 5).
    struct Scene {
        /// Harness under test.
        h: Harness,
        /// The full-window panel.
        outer: NodeId,
        /// The leaf inside the panel.
        inner: NodeId,
        /// Events seen by the panel.
        outer_log: Arc<Mutex<Vec<Event>>>,
        /// Events seen by the leaf.
        inner_log: Arc<Mutex<Vec<Event>>>,
    }

    fn scene(inner_outcome: EventOutcome) -> Result<Scene> {
        let mut h = Harness::new(Expanse::new(40, 40));
        let root = h.core.root_id();
        let outer_probe = Probe::panel();
        let inner_probe = Probe::leaf(Expanse::new(10, 10)).with_outcome(inner_outcome);
        let outer_log = outer_probe.events();
        let inner_log = inner_probe.events();

        let outer = h.core.create_detached(outer_probe);
        let inner = h.core.create_detached(inner_probe);
        h.core.attach(root, outer)?;
        h.core.attach(outer, inner)?;
        h.core.set_layout(
            inner,
            Layout::new()
                .margin((5, 5, 0, 0))
                .align(HorizontalAlignment::Left, VerticalAlignment::Top),
        )?;
        h.frame()?;
        Ok(Scene {
            h,
            outer,
            inner,
            outer_log,
            inner_log,
        })
    }

    #[test]
    fn hover_and_press() -> Result<()> {
        let mut s = scene(EventOutcome::Handle)?;
        assert_eq!(s.h.core.render_bounds(s.inner)?, Rect::new(5, 5, 10, 10));

        s.h.pointer((7, 7))?;
        assert_eq!(s.h.core.locate_node(Point::new(7, 7))?, Some(s.inner));
        assert_eq!(s.h.core.visual_state(s.inner)?.secondary, Secondary::Hovered);
        assert_eq!(s.h.core.visual_state(s.outer)?.secondary, Secondary::Hovered);
        assert_eq!(
            Probe::received(&s.inner_log),
            vec![Event::PointerMoved {
                position: Point::new(7, 7)
            }]
        );
        assert!(Probe::received(&s.outer_log).is_empty());

        s.h.press()?;
        assert_eq!(s.h.core.visual_state(s.inner)?.secondary, Secondary::Pressed);

        s.h.pointer((30, 30))?;
        assert_eq!(s.h.core.visual_state(s.inner)?.secondary, Secondary::None);
        assert_eq!(s.h.core.visual_state(s.outer)?.secondary, Secondary::Pressed);

        s.h.release()?;
        assert_eq!(s.h.core.visual_state(s.outer)?.secondary, Secondary::Hovered);
        assert_eq!(
            Probe::received(&s.outer_log),
            vec![
                Event::PointerMoved {
                    position: Point::new(30, 30)
                },
                Event::PointerReleased {
                    button: MouseButton::Left,
                    position: Point::new(30, 30)
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn ignored_events_bubble() -> Result<()> {
        let mut s = scene(EventOutcome::Ignore)?;
        s.h.pointer((6, 6))?;
        assert_eq!(Probe::received(&s.inner_log).len(), 1);
        assert_eq!(Probe::received(&s.outer_log).len(), 1);
        Ok(())
    }

    #[test]
    fn disabled_nodes_are_skipped() -> Result<()> {
        let mut s = scene(EventOutcome::Handle)?;
        s.h.core.set_enabled(s.inner, false)?;
        s.h.pointer((6, 6))?;
        assert_eq!(s.h.core.visual_state(s.inner)?.primary, Primary::Disabled);
        assert!(Probe::received(&s.inner_log).is_empty());
        assert_eq!(Probe::received(&s.outer_log).len(), 1);
        Ok(())
    }

    #[test]
    fn keys_go_to_focus() -> Result<()> {
        let mut s = scene(EventOutcome::Handle)?;
        s.h.core.set_focus(s.inner)?;
        s.h.input.keys.insert(KeyCode(13));
        s.h.frame()?;
        assert_eq!(
            Probe::received(&s.inner_log),
            vec![Event::KeyPressed(KeyCode(13))]
        );

        s.h.core.clear_focus();
        s.h.input.keys.clear();
        s.h.frame()?;
        assert_eq!(Probe::received(&s.inner_log).len(), 1);
        Ok(())
    }

    #[test]
    fn scaled_window_localizes_positions() -> Result<()> {
        let mut h = Harness::new(Expanse::new(80, 80));
        let root = h.core.root_id();
        let win = h.core.create_detached(Window::new());
        h.core.attach(root, win)?;
        h.core.set_layout(
            win,
            Layout::new()
                .size(Expanse::new(20, 20))
                .margin((10, 10, 0, 0))
                .align(HorizontalAlignment::Left, VerticalAlignment::Top),
        )?;
        let probe = Probe::leaf(Expanse::new(1, 1)).with_outcome(EventOutcome::Handle);
        let log = probe.events();
        let leaf = h.core.create_detached(probe);
        h.core.attach(win, leaf)?;
        h.core.set_window_scale(2.0);

        h.pointer((24, 26))?;
        assert_eq!(h.core.locate_node(Point::new(24, 26))?, Some(leaf));
        assert_eq!(
            Probe::received(&log),
            vec![Event::PointerMoved {
                position: Point::new(2, 3)
            }]
        );
        Ok(())
    }

    #[test]
    fn grip_resizes_host() -> Result<()> {
        let mut h = Harness::new(Expanse::new(40, 40));
        let root = h.core.root_id();
        let host = h.core.create_detached(Probe::leaf(Expanse::new(1, 1)));
        h.core.attach(root, host)?;
        h.core.set_layout(
            host,
            Layout::new()
                .size(Expanse::new(10, 6))
                .align(HorizontalAlignment::Left, VerticalAlignment::Top),
        )?;
        let grip = ResizeGrip::attach(&mut h.core, host, (1, 1))?;
        h.frame()?;
        assert_eq!(h.core.render_bounds(grip)?, Rect::new(9, 5, 1, 1));

        h.pointer((9, 5))?;
        h.press()?;
        assert_eq!(h.core.pointer_capture(), Some(grip));
        assert!(h.core.widget_ref::<ResizeGrip>(grip)?.is_dragging());

        h.pointer((15, 9))?;
        assert_eq!(h.core.render_bounds(host)?, Rect::new(0, 0, 16, 10));
        assert_eq!(h.core.render_bounds(grip)?, Rect::new(15, 9, 1, 1));

        // Captured: the grip keeps the pointer even away from itself.
        h.pointer((30, 20))?;
        h.release()?;
        assert_eq!(h.core.pointer_capture(), None);
        assert_eq!(h.core.render_bounds(host)?, Rect::new(0, 0, 31, 21));
        Ok(())
    }
}
