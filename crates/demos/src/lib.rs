//! Sample element trees used by the bramble demos.

/// A small gallery exercising windows, stacks, borders and grips.
pub mod gallery;
