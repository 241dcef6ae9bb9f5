//! # Engine Error Types
//!
//! Everything the interaction engine can report to its caller. None of these
//! are ever delivered to widget hooks or the script host.

use tabula_core::{SceneError, TweenError, WidgetId};
use thiserror::Error;

/// Errors raised by a widget's own code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// A custom per-frame update failed.
    #[error("update of widget {widget:?} failed: {reason}")]
    Update {
        /// The failing widget.
        widget: WidgetId,
        /// Reason given by the widget.
        reason: String,
    },

    /// A property write was rejected.
    #[error("property `{key}` rejected: {reason}")]
    Property {
        /// Property name.
        key: String,
        /// Reason for the rejection.
        reason: String,
    },
}

impl WidgetError {
    /// Builds an update failure.
    #[must_use]
    pub fn update(widget: WidgetId, reason: impl Into<String>) -> Self {
        Self::Update {
            widget,
            reason: reason.into(),
        }
    }

    /// Builds a rejected property write.
    #[must_use]
    pub fn property(key: &str, reason: impl Into<String>) -> Self {
        Self::Property {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the engine façade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Scene graph failure.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Tween failure.
    #[error(transparent)]
    Tween(#[from] TweenError),

    /// Widget failure.
    #[error(transparent)]
    Widget(#[from] WidgetError),

    /// The parent cannot hold a widget of this kind.
    #[error("{parent:?} cannot hold a {kind}")]
    WrongParent {
        /// Requested parent.
        parent: WidgetId,
        /// Kind of the widget being attached.
        kind: &'static str,
    },

    /// The id does not refer to a live widget.
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),

    /// The board and HUD roots cannot be removed or moved.
    #[error("widget {0:?} is a root")]
    Root(WidgetId),

    /// The pick encoding has run out of ids.
    #[error("too many widgets: at most {max} can be picked")]
    TooManyWidgets {
        /// Largest pickable count.
        max: u32,
    },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// OS error text.
        message: String,
    },

    /// The TOML did not describe a valid configuration.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written as TOML.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
