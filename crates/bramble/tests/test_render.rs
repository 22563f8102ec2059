//! Integration tests for draw traversal.

#[cfg(test)]
mod tests {
    use bramble::{
        NodeId,
        dump::dump_plain,
        error::Result,
        geom::{Expanse, HorizontalAlignment, Rect, VerticalAlignment},
        layout::{Layout, Visibility},
        render::{Color, TextureId},
        testing::{DrawOp, Harness},
        widgets::{Block, Border, Panel},
    };
    use pretty_assertions::assert_eq;

    /// A panel with a bordered 4x4 block in its top-left corner.
    fn scene() -> Result<(Harness, NodeId, NodeId)> {
        let mut h = Harness::new(Expanse::new(20, 20));
        let root = h.core.root_id();
        let panel = h.core.create_detached(Panel::new().with_background(Color::BLACK));
        h.core.attach(root, panel)?;
        let block = h.core.create_with(
            Block::new((4, 4)).with_fill(Color::rgb(255, 0, 0)),
            |core, id| {
                core.set_alignment(id, HorizontalAlignment::Left, VerticalAlignment::Top)?;
                Border::wrap(core, id, 1)?;
                Ok(())
            },
        )?;
        h.core.attach(panel, block)?;
        Ok((h, panel, block))
    }

    #[test]
    fn draw_order() -> Result<()> {
        let (mut h, _, _) = scene()?;
        h.frame()?;
        assert_eq!(
            h.batch.fills(),
            vec![
                Rect::new(0, 0, 20, 20),
                Rect::new(0, 0, 6, 6),
                Rect::new(0, 0, 6, 1),
                Rect::new(5, 1, 1, 4),
                Rect::new(0, 5, 6, 1),
                Rect::new(0, 1, 1, 4),
            ]
        );
        Ok(())
    }

    #[test]
    fn opacity_multiplies() -> Result<()> {
        let (mut h, panel, block) = scene()?;
        h.core.set_opacity(panel, 0.5)?;
        h.core.set_opacity(block, 0.5)?;
        h.frame()?;
        let opacities: Vec<f32> = h.batch.ops.iter().map(DrawOp::opacity).collect();
        assert_eq!(opacities, vec![0.5, 0.25, 0.25, 0.25, 0.25, 0.25]);
        Ok(())
    }

    #[test]
    fn hidden_is_not_drawn() -> Result<()> {
        let (mut h, _, block) = scene()?;
        h.core.set_visibility(block, Visibility::Hidden)?;
        h.frame()?;
        assert_eq!(h.batch.fills(), vec![Rect::new(0, 0, 20, 20)]);
        assert_eq!(h.core.render_bounds(block)?, Rect::new(0, 0, 6, 6));
        Ok(())
    }

    #[test]
    fn scaled_draw() -> Result<()> {
        let (mut h, _, _) = scene()?;
        h.core.set_window_scale(2.0);
        h.frame()?;
        assert_eq!(
            h.batch.fills(),
            vec![
                Rect::new(0, 0, 40, 40),
                Rect::new(0, 0, 12, 12),
                Rect::new(0, 0, 12, 2),
                Rect::new(10, 2, 2, 8),
                Rect::new(0, 10, 12, 2),
                Rect::new(0, 2, 2, 8),
            ]
        );
        Ok(())
    }

    #[test]
    fn textures() -> Result<()> {
        let mut h = Harness::new(Expanse::new(10, 10));
        let root = h.core.root_id();
        let block = h.core.create_detached(Block::new((3, 2)).with_texture(TextureId(7)));
        h.core.attach(root, block)?;
        h.core.set_layout(
            block,
            Layout::new().align(HorizontalAlignment::Right, VerticalAlignment::Bottom),
        )?;
        h.frame()?;
        assert_eq!(
            h.batch.ops,
            vec![DrawOp::Texture {
                texture: TextureId(7),
                dest: Rect::new(7, 8, 3, 2),
                opacity: 1.0,
            }]
        );
        Ok(())
    }

    #[test]
    fn dump_lists_tree() -> Result<()> {
        let (mut h, _, _) = scene()?;
        h.frame()?;
        let out = dump_plain(&h.core, h.core.root_id())?;
        for name in ["root", "Panel", "block", "border"] {
            assert!(out.contains(name), "{name} missing from:\n{out}");
        }
        Ok(())
    }
}
