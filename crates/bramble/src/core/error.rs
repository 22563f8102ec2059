use std::result::Result as StdResult;

use thiserror::Error;

use crate::{core::id::NodeId, geom};

/// Result type for bramble operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Everything here is a construction-time misuse of the tree. Degenerate
/// geometry is never an error: layout clamps it to zero and carries on.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node does not exist in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The node already has a parent or host.
    #[error("node already attached: {0:?}")]
    AlreadyAttached(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Intended parent.
        parent: NodeId,
        /// Intended child.
        child: NodeId,
    },

    /// The element's content was locked at construction.
    #[error("content of {0:?} is locked")]
    ContentLocked(NodeId),

    /// The element does not host content, or already holds its single child.
    #[error("{0:?} cannot accept more content")]
    ContentNotAccepted(NodeId),

    /// A component element cannot double as content, and a node can be
    /// wrapped by at most one component.
    #[error("component element shared: {0:?}")]
    ComponentElementShared(NodeId),

    /// The window root cannot be detached or removed.
    #[error("the window root cannot be detached or removed")]
    RootRemoval,

    /// A widget was borrowed while already in use further up the stack.
    #[error("re-entrant widget borrow: {0:?}")]
    ReentrantWidgetBorrow(NodeId),

    /// The widget on a node is not of the requested type.
    #[error("widget type mismatch on {0:?}")]
    WidgetType(NodeId),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
