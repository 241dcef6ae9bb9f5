//! Board tile: the reference zone.
//!
//! Tinted by team, brighter when highlighted as a legal destination and
//! brightest while a held piece is nominated over it.

use tabula_core::Geometry;

use super::team::Team;
use super::{DrawContext, Widget};
use crate::error::WidgetError;
use crate::rect::Rect;
use crate::render::Painter;
use crate::script::Value;
use crate::style::Color;

/// Tile faces, indexed by tile id.
pub const TILE_NAMES: [&str; 25] = [
    "empty", "bridge", "camp", "castle", "city", "dungeon", "farm", "fort", "hills", "lake",
    "mine", "monolith", "mountains", "oak", "oaks", "pine", "pines", "poi", "quest", "ruins",
    "shipwreck", "skull", "swamp", "tower", "town",
];

/// A square board zone.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    team: Team,
    id: usize,
}

impl Tile {
    /// Default half extent.
    pub const HALF_EXTENT: f64 = 50.0;

    /// An empty, unowned tile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry of a tile centred at `(x, y)`.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Geometry {
        Geometry::at(x, y, Self::HALF_EXTENT, Self::HALF_EXTENT)
    }

    /// Sets the owner.
    #[must_use]
    pub const fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    /// Sets the face by id, wrapping out-of-range values.
    #[must_use]
    pub fn with_tile_id(mut self, id: i64) -> Self {
        self.id = wrap_tile_id(id);
        self
    }

    /// Owner.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Face name.
    #[must_use]
    pub fn tile(&self) -> &'static str {
        TILE_NAMES[self.id]
    }

    fn tint(&self, ctx: &DrawContext<'_>) -> Color {
        let zone = ctx.zone.unwrap_or_default();
        let stage = if zone.nominated {
            2
        } else if zone.highlighted {
            1
        } else {
            0
        };
        let table = match self.team {
            Team::None => [(255, 255, 255), (240, 230, 140), (255, 215, 0)],
            Team::Red => [(255, 99, 71), (220, 20, 60), (165, 42, 42)],
            Team::Blue => [(173, 216, 230), (65, 105, 225), (70, 130, 180)],
        };
        let (r, g, b) = table[stage];
        Color::rgb8(r, g, b)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn wrap_tile_id(id: i64) -> usize {
    id.rem_euclid(TILE_NAMES.len() as i64) as usize
}

impl Widget for Tile {
    fn type_name(&self) -> &'static str {
        "tile"
    }

    fn draw(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        painter.fill_rect(bounds, ctx.palette.recess, 0.0);
        if self.id == 0 {
            return;
        }
        painter.fill_rect(bounds.shrink(ctx.palette.edge_width), self.tint(ctx), 0.0);
        painter.text(self.tile(), 0.0, 0.0, ctx.palette.activated);
    }

    fn mask(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        painter.fill_rect(bounds, Color::WHITE, 0.0);
    }

    #[allow(clippy::cast_precision_loss)]
    fn property(&self, key: &str) -> Option<Value> {
        match key {
            "team" => Some(Value::from(self.team.name())),
            "tile" => Some(Value::from(self.tile())),
            "tile_id" => Some(Value::Number(self.id as f64)),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_property(&mut self, key: &str, value: &Value) -> Option<Result<(), WidgetError>> {
        let result = match key {
            "team" => Team::from_value(key, value).map(|team| self.team = team),
            "tile" => value
                .as_text()
                .and_then(|name| TILE_NAMES.iter().position(|t| *t == name))
                .map(|id| self.id = id)
                .ok_or_else(|| WidgetError::property(key, "unknown tile name")),
            "tile_id" => value
                .as_number()
                .map(|n| self.id = wrap_tile_id(n.floor() as i64))
                .ok_or_else(|| WidgetError::property(key, "expected a number")),
            _ => return None,
        };
        Some(result)
    }
}
