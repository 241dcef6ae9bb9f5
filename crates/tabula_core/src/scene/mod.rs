//! # Scene
//!
//! Widget hierarchy storage.
//!
//! ```text
//!              root
//!            /      \
//!        zone ──── zone          siblings: doubly linked
//!         |          |           parent:   back-reference
//!       piece      piece
//! ```

mod graph;
mod id;

pub use graph::{Children, Links, SceneGraph};
pub use id::WidgetId;
