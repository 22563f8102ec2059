use crate::{
    NodeId,
    error::Result,
    geom::{Expanse, Rect},
    widget::{Arranger, ContentMode, Measurer, Widget},
};

/// Stacks children top to bottom, each at its desired height and the full
/// content width.
#[derive(Debug, Default, Clone)]
pub struct VStack {
    /// Gap between adjacent children.
    spacing: i32,
}

impl VStack {
    /// Construct a stack with no spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between adjacent children. Negative values are zero.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing.max(0);
        self
    }

    /// Total spacing for `n` children.
    fn gaps(&self, n: usize) -> i32 {
        i32::try_from(n.saturating_sub(1))
            .unwrap_or(i32::MAX)
            .saturating_mul(self.spacing)
    }
}

impl Widget for VStack {
    fn content_mode(&self) -> ContentMode {
        ContentMode::Multiple
    }

    fn measure_content(
        &self,
        children: &[NodeId],
        available: Expanse,
        m: &mut dyn Measurer,
    ) -> Result<Expanse> {
        let mut size = Expanse::new(0, self.gaps(children.len()));
        for child in children {
            let d = m.measure(*child, available)?.desired;
            size.w = size.w.max(d.w);
            size.h = size.h.saturating_add(d.h);
        }
        Ok(size)
    }

    fn arrange_content(
        &self,
        children: &[NodeId],
        bounds: Rect,
        a: &mut dyn Arranger,
    ) -> Result<()> {
        let mut y = bounds.tl.y;
        for child in children {
            let h = a.measure(*child, bounds.expanse())?.desired.h;
            a.arrange(*child, Rect::new(bounds.tl.x, y, bounds.w, h))?;
            y = y.saturating_add(h).saturating_add(self.spacing);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "vstack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Core, geom::HorizontalAlignment, testing::Probe};

    #[test]
    fn stacks_with_spacing() -> Result<()> {
        let mut core = Core::new(Expanse::new(20, 20));
        let root = core.root_id();
        let stack = core.create_detached(VStack::new().with_spacing(1));
        core.attach(root, stack)?;
        let a = core.create_detached(Probe::leaf(Expanse::new(6, 2)));
        let b = core.create_detached(Probe::leaf(Expanse::new(3, 4)));
        core.attach(stack, a)?;
        core.attach(stack, b)?;
        core.with_layout_of(b, |l| l.horizontal = HorizontalAlignment::Left)?;

        assert_eq!(
            core.measure(stack, Expanse::new(20, 20))?.desired,
            Expanse::new(6, 7)
        );
        core.update_layout()?;
        assert_eq!(core.render_bounds(a)?, Rect::new(0, 0, 20, 2));
        assert_eq!(core.render_bounds(b)?, Rect::new(0, 3, 3, 4));
        Ok(())
    }
}
