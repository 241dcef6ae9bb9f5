//! # TABULA UI
//!
//! Widget interaction engine for tabletop games:
//! - Board zones holding movable pieces, HUD frames holding controls
//! - Colour-coded offscreen picking
//! - Hover, click, drag, drop and snap with tweened motion
//! - Move validation through a pluggable script host
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    INTERACTION PIPELINE                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  Input Events → State Machine → Work Batch → Draw List    │
//! │       ↓               ↓              ↓            ↓       │
//! │  Pointer State   Pick + Moves   Tween Update   Painter    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//!
//! All scene mutation happens on the thread that owns the
//! [`InteractionEngine`]. Only the per-widget tween jobs run in parallel, and
//! each touches nothing but its own widget.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod interaction;
pub mod moves;
pub mod pick;
pub mod rect;
pub mod render;
pub mod script;
pub mod style;
pub mod widget;
pub mod work;

pub use config::EngineConfig;
pub use engine::InteractionEngine;
pub use error::{ConfigError, EngineError, EngineResult, WidgetError};
pub use input::{InputEvent, MouseButton, PointerState};
pub use interaction::InteractionState;
pub use moves::{DropOutcome, MoveSet};
pub use pick::{PickColor, Picker, ID_SPACE};
pub use rect::Rect;
pub use render::{DrawList, Painter, RenderCommand};
pub use script::{Environment, Namespace, NoScript, ScriptHost, Value};
pub use style::{Color, Palette};
pub use widget::{Button, Callback, DrawContext, Kind, Meeple, Node, Panel, Team, Tile, Widget, ZoneFlags};
pub use work::{BatchReport, InlinePool, Job, ScopedPool, WorkBatch, WorkerPool};
