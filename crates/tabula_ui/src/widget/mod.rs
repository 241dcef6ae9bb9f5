//! Widget system.
//!
//! The authoring contract plus the reference board and HUD widgets.

mod button;
mod core;
mod meeple;
mod panel;
mod team;
mod tile;

pub use button::Button;
pub use self::core::{Callback, DrawContext, Kind, Node, Widget, ZoneFlags};
pub use meeple::Meeple;
pub use panel::Panel;
pub use team::Team;
pub use tile::{Tile, TILE_NAMES};
