use std::time::Duration;

use crate::{
    core::{
        event::{FrameArgs, InputSnapshot, MouseButton},
        testing::render::RecordingBatch,
        world::Core,
    },
    error::Result,
    geom::{Expanse, Point},
};

/// Drives a Core frame by frame with a persistent input state.
pub struct Harness {
    /// Core under test.
    pub core: Core,
    /// Input state sent with the next frame.
    pub input: InputSnapshot,
    /// Operations recorded by the last draw.
    pub batch: RecordingBatch,
}

impl Harness {
    /// A harness around a fresh Core.
    pub fn new(window: Expanse) -> Self {
        Self::with_core(Core::new(window))
    }

    /// A harness around an existing Core.
    pub fn with_core(core: Core) -> Self {
        Self {
            core,
            input: InputSnapshot::default(),
            batch: RecordingBatch::default(),
        }
    }

    /// Run update and draw with the current input.
    pub fn frame(&mut self) -> Result<()> {
        let args = FrameArgs {
            elapsed: Duration::from_millis(16),
            input: self.input.clone(),
        };
        self.core.update(&args)?;
        self.batch.clear();
        self.core.draw(&args, &mut self.batch)
    }

    /// Move the pointer to a screen position and run a frame.
    pub fn pointer(&mut self, p: impl Into<Point>) -> Result<()> {
        self.input.pointer = Some(p.into());
        self.frame()
    }

    /// Press the primary button and run a frame.
    pub fn press(&mut self) -> Result<()> {
        self.input.buttons.insert(MouseButton::Left);
        self.frame()
    }

    /// Release the primary button and run a frame.
    pub fn release(&mut self) -> Result<()> {
        self.input.buttons.remove(&MouseButton::Left);
        self.frame()
    }
}
