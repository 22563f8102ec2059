//! Bramble: element composition and layout for retained-mode UIs.
//!
//! Bramble keeps a tree of elements in an arena, measures and arranges them
//! in two passes, lets hosts wrap auxiliary elements as *components* that
//! negotiate space with their content, converts between layout and screen
//! coordinates, derives visual state, and routes input. Rasterising is left
//! to the host through the [`render::DrawBatch`] seam.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Core`] - The arena, layout engine and frame driver
//! - [`Widget`] - The trait implemented by all widgets
//! - [`Component`] - How an auxiliary element sits around its host's content
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Expanse, Thickness)
//! - [`layout`] - Per-element layout properties and measurement results
//! - [`widgets`] - Built-in widget implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod geom;
pub mod layout;
pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    Context, Core, NodeId, ViewContext, component, dump, error, event, render, resources,
    space, visual,
};

pub use component::{Component, ComponentBuilder, Consumes, DrawPriority, UpdatePriority};
pub use widget::{EventOutcome, Widget};
