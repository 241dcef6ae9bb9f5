//! # TABULA Core
//!
//! Shared building blocks for the widget interaction engine:
//! - Affine geometry descriptor with a camera blend factor
//! - Cubic curve tweening with keyframe queues
//! - Generational ids and an arena-backed scene graph
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 TABULA CORE                   │
//! ├──────────────────────────────────────────────┤
//! │  Geometry ──► Tween ──► SceneGraph<Node>      │
//! │     ↓           ↓             ↓               │
//! │  Affine     Keyframes    WidgetId (gen)       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Nothing here knows about input, scripting or drawing.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod geometry;
pub mod scene;
pub mod tween;

pub use error::{SceneError, SceneResult, TweenError, TweenResult};
pub use geometry::{Affine, Geometry, MIN_SCALE};
pub use scene::{Children, Links, SceneGraph, WidgetId};
pub use tween::{Keyframe, Tween};
