//! # TABULA
//!
//! Tabletop widget interaction: a board of zones and pieces, a HUD of frames
//! and controls, driven by pointer input and game rules.
//!
//! ## Crate Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   tabula                     │
//! │        FrameLoop · EventSender · stats       │
//! ├─────────────────────────────────────────────┤
//! │                 tabula_ui                    │
//! │  InteractionEngine · widgets · pick · moves  │
//! ├─────────────────────────────────────────────┤
//! │                tabula_core                   │
//! │     Geometry · Tween · SceneGraph · ids      │
//! └─────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod frame_loop;

pub use frame_loop::{EventSender, FrameLoop, FrameLoopConfig, FrameStats, QueueError};

/// Re-export of the geometry, tween and scene graph crate.
pub mod scene {
    pub use tabula_core::*;
}

/// Re-export of the engine crate.
pub mod ui {
    pub use tabula_ui::*;
}
