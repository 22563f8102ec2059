use bramble::{
    Core, NodeId,
    error::Result,
    geom::{Expanse, HorizontalAlignment, VerticalAlignment},
    layout::Layout,
    render::Color,
    widgets::{Block, Border, Panel, ResizeGrip, VStack, Window},
};
use tracing::debug;

/// Handles to the interesting nodes of the gallery.
#[derive(Debug, Clone, Copy)]
pub struct Gallery {
    /// The nested window.
    pub window: NodeId,
    /// The stack inside the window.
    pub stack: NodeId,
    /// Blocks in the stack, top to bottom.
    pub blocks: [NodeId; 3],
    /// The resizable panel under the window.
    pub panel: NodeId,
    /// The panel's resize grip.
    pub grip: NodeId,
}

/// Build the gallery under the Core's root.
///
/// The window sits at (2, 1) with a border and holds a stack of three
/// bordered blocks. A resizable panel sits in the bottom-right corner.
pub fn build(core: &mut Core) -> Result<Gallery> {
    let root = core.root_id();

    let window = core.create_with(Window::new(), |core, id| {
        core.set_layout(
            id,
            Layout::new()
                .margin((2, 1, 0, 0))
                .padding(1)
                .min_width(24)
                .align(HorizontalAlignment::Left, VerticalAlignment::Top),
        )?;
        Border::wrap(core, id, 1)?;
        Ok(())
    })?;
    core.attach(root, window)?;

    let stack = core.create_detached(VStack::new().with_spacing(1));
    core.attach(window, stack)?;

    let blocks = [
        stacked_block(core, stack, 1, Color::rgb(0xb5, 0x89, 0x00))?,
        stacked_block(core, stack, 2, Color::rgb(0x2a, 0xa1, 0x98))?,
        stacked_block(core, stack, 3, Color::rgb(0xd3, 0x36, 0x82))?,
    ];

    let background = Color::rgb(0x07, 0x36, 0x42);
    let panel = core.create_with(Panel::new().with_background(background), |core, id| {
        core.set_layout(
            id,
            Layout::new()
                .size(Expanse::new(12, 6))
                .margin((0, 0, 2, 1))
                .align(HorizontalAlignment::Right, VerticalAlignment::Bottom),
        )
    })?;
    core.attach(root, panel)?;
    let grip = ResizeGrip::attach(core, panel, (1, 1))?;

    debug!(?window, ?panel, "gallery built");
    Ok(Gallery {
        window,
        stack,
        blocks,
        panel,
        grip,
    })
}

/// Add a left-aligned block of height `n` and width `6n` to a stack, with
/// borders on its sides.
fn stacked_block(core: &mut Core, stack: NodeId, n: i32, color: Color) -> Result<NodeId> {
    let block = core.create_with(Block::new((n * 6, n)).with_fill(color), |core, id| {
        core.set_alignment(id, HorizontalAlignment::Left, VerticalAlignment::Stretch)?;
        Border::wrap(core, id, (1, 0, 1, 0))?;
        Ok(())
    })?;
    core.attach(stack, block)?;
    Ok(block)
}
