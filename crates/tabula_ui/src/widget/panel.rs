//! Panel: the reference HUD frame.

use super::{DrawContext, Widget};
use crate::rect::Rect;
use crate::render::Painter;
use crate::style::Color;

/// A rounded, outlined backdrop for HUD controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel;

impl Widget for Panel {
    fn type_name(&self) -> &'static str {
        "frame"
    }

    fn draw(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        let p = ctx.palette;
        painter.fill_rect(bounds, p.main, p.edge_radius);
        painter.stroke_rect(bounds, p.edge, p.edge_width, p.edge_radius);
    }

    fn mask(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        painter.fill_rect(bounds, Color::WHITE, ctx.palette.edge_radius);
    }
}
