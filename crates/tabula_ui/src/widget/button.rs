//! Button: the reference HUD control.

use tabula_core::WidgetId;

use super::{Callback, DrawContext, Widget};
use crate::error::WidgetError;
use crate::rect::Rect;
use crate::render::Painter;
use crate::script::Value;
use crate::style::Color;

/// A labelled button that lights up while hovered.
#[derive(Debug, Clone, Default)]
pub struct Button {
    text: String,
    hovered: bool,
    enabled: bool,
}

impl Button {
    /// Creates an enabled button.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hovered: false,
            enabled: true,
        }
    }

    /// Label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the pointer is over the button.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl Widget for Button {
    fn type_name(&self) -> &'static str {
        "button"
    }

    fn draw(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        let p = ctx.palette;
        let fill = if self.hovered { p.highlight } else { p.main };
        let label = if self.enabled { p.activated } else { p.deactivated };

        painter.fill_rect(bounds, fill, p.edge_radius);
        if !self.text.is_empty() {
            painter.text(&self.text, 0.0, 0.0, label);
        }
        painter.stroke_rect(bounds, p.edge, p.edge_width, p.edge_radius);
    }

    fn mask(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter) {
        let bounds = Rect::centered(ctx.geometry.hw, ctx.geometry.hh);
        painter.fill_rect(bounds, Color::WHITE, ctx.palette.edge_radius);
    }

    fn on(&mut self, callback: Callback, _other: Option<WidgetId>) {
        match callback {
            Callback::HoverStart => self.hovered = true,
            Callback::HoverEnd => self.hovered = false,
            _ => {}
        }
    }

    fn property(&self, key: &str) -> Option<Value> {
        match key {
            "text" => Some(Value::from(self.text.as_str())),
            "enabled" => Some(Value::Bool(self.enabled)),
            _ => None,
        }
    }

    fn set_property(&mut self, key: &str, value: &Value) -> Option<Result<(), WidgetError>> {
        let result = match (key, value) {
            ("text", Value::Text(text)) => {
                self.text.clone_from(text);
                Ok(())
            }
            ("enabled", v) => {
                self.enabled = v.truthy();
                Ok(())
            }
            ("text", _) => Err(WidgetError::property(key, "expected a string")),
            _ => return None,
        };
        Some(result)
    }
}
