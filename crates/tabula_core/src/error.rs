//! # Core Error Types

use thiserror::Error;

use crate::scene::WidgetId;

/// Errors raised by the curve tweener.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenError {
    /// The pending keyframe queue is full.
    #[error("keyframe queue full: capacity {capacity}")]
    QueueFull {
        /// Queue capacity.
        capacity: usize,
    },

    /// Growing the pending keyframe queue failed.
    #[error("failed to grow keyframe queue")]
    Allocation,
}

/// Errors raised by scene graph operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The id refers to a node that no longer exists.
    #[error("stale widget id {0:?}")]
    Stale(WidgetId),

    /// The node already has a parent.
    #[error("widget {0:?} is already attached")]
    AlreadyAttached(WidgetId),

    /// The node has no parent.
    #[error("widget {0:?} is not attached")]
    NotAttached(WidgetId),

    /// A node cannot be linked to itself.
    #[error("widget {0:?} cannot be linked to itself")]
    SelfReference(WidgetId),
}

/// Result type for tween operations.
pub type TweenResult<T> = Result<T, TweenError>;

/// Result type for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;
