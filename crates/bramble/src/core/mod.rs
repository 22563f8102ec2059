//! Core types: the node arena, the layout engine, components, coordinate
//! spaces, input routing and the rendering seam.

/// Components wrapping auxiliary elements.
pub mod component;
/// Widget context traits.
pub mod context;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input snapshots and events.
pub mod event;
/// Node ID types.
pub mod id;
/// Node data stored in the arena.
pub mod node;
/// Rendering interfaces.
pub mod render;
/// Read-only typed resources.
pub mod resources;
/// Coordinate spaces.
pub mod space;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Visual state derivation.
pub mod visual;

/// Measure and arrange passes.
mod pass;
/// Core arena and frame driver.
pub mod world;

pub use context::{Context, ViewContext};
pub use id::NodeId;
pub use world::Core;
