//! Build the gallery, run one frame and print the arranged tree.

use std::{io, time::Duration};

use anyhow::Result;
use bramble::{
    Core,
    dump::{dump, dump_plain},
    event::{FrameArgs, InputSnapshot},
    geom::{Expanse, Point, Rect, Thickness},
    render::{Color, DrawBatch, TextureId},
};
use bramble_demos::gallery;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI flags for the layout dump.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Window width in layout units.
    #[clap(long, default_value_t = 60)]
    width: i32,

    /// Window height in layout units.
    #[clap(long, default_value_t = 30)]
    height: i32,

    /// Ratio of screen units to layout units.
    #[clap(long, default_value_t = 1.0)]
    scale: f64,

    /// Screen x of the window's top-left corner.
    #[clap(long, default_value_t = 0)]
    origin_x: i32,

    /// Screen y of the window's top-left corner.
    #[clap(long, default_value_t = 0)]
    origin_y: i32,

    /// Screen x of the pointer.
    #[clap(long, requires = "pointer_y")]
    pointer_x: Option<i32>,

    /// Screen y of the pointer.
    #[clap(long, requires = "pointer_x")]
    pointer_y: Option<i32>,

    /// Disable colour output.
    #[clap(long)]
    plain: bool,
}

/// Counts draw operations without rendering anything.
#[derive(Debug, Default)]
struct CountingBatch {
    /// Operations seen.
    ops: usize,
}

impl DrawBatch for CountingBatch {
    fn fill_rect(&mut self, _rect: Rect, _color: Color, _opacity: f32) {
        self.ops += 1;
    }

    fn stroke_rect(
        &mut self,
        _rect: Rect,
        _thickness: Thickness,
        _color: Color,
        _opacity: f32,
    ) {
        self.ops += 1;
    }

    fn draw_texture(&mut self, _texture: TextureId, _dest: Rect, _opacity: f32) {
        self.ops += 1;
    }
}

/// Run the layout dump.
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut core = Core::new(Expanse::new(args.width, args.height));
    core.set_window_scale(args.scale);
    core.set_window_origin(Point::new(args.origin_x, args.origin_y));
    gallery::build(&mut core)?;

    let input = match (args.pointer_x, args.pointer_y) {
        (Some(x), Some(y)) => InputSnapshot::pointer_at((x, y)),
        _ => InputSnapshot::default(),
    };
    let frame = FrameArgs {
        elapsed: Duration::from_millis(16),
        input,
    };
    let mut batch = CountingBatch::default();
    core.update(&frame)?;
    core.draw(&frame, &mut batch)?;
    info!(ops = batch.ops, passes = core.layout_count(), "frame drawn");

    let root = core.root_id();
    let out = if args.plain {
        dump_plain(&core, root)?
    } else {
        dump(&core, root)?
    };
    print!("{out}");
    Ok(())
}
