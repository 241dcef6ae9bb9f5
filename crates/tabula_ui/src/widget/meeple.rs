//! Meeple: the reference piece.

use tabula_core::Geometry;

use super::team::Team;
use super::{DrawContext, Widget};
use crate::error::WidgetError;
use crate::render::Painter;
use crate::script::Value;
use crate::style::Color;

/// A round team token.
#[derive(Debug, Clone, Default)]
pub struct Meeple {
    team: Team,
}

impl Meeple {
    /// Default half extent.
    pub const HALF_EXTENT: f64 = 40.0;

    /// Creates a meeple for `team`.
    #[must_use]
    pub const fn new(team: Team) -> Self {
        Self { team }
    }

    /// Geometry of a meeple centred at `(x, y)`.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Geometry {
        Geometry::at(x, y, Self::HALF_EXTENT, Self::HALF_EXTENT)
    }

    /// Owner.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    fn color(&self) -> Color {
        match self.team {
            Team::None => Color::rgb8(255, 192, 203),
            Team::Red => Color::rgb8(139, 0, 0),
            Team::Blue => Color::rgb8(0, 0, 128),
        }
    }
}

fn radius(ctx: &DrawContext<'_>) -> f64 {
    ctx.geometry.hw.min(ctx.geometry.hh)
}

impl Widget for Meeple {
    fn type_name(&self) -> &'static str {
        "meeple"
    }

    fn draw(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        painter.fill_circle(0.0, 0.0, radius(ctx), self.color());
    }

    fn mask(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        painter.fill_circle(0.0, 0.0, radius(ctx), Color::WHITE);
    }

    fn property(&self, key: &str) -> Option<Value> {
        (key == "team").then(|| Value::from(self.team.name()))
    }

    fn set_property(&mut self, key: &str, value: &Value) -> Option<Result<(), WidgetError>> {
        (key == "team").then(|| Team::from_value(key, value).map(|team| self.team = team))
    }
}
