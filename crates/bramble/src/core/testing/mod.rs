/// Harness for driving frames in tests.
pub mod harness;
/// Scriptable probe widget.
pub mod probe;
/// Recording draw batch.
pub mod render;

pub use harness::Harness;
pub use probe::Probe;
pub use render::{DrawOp, RecordingBatch};
