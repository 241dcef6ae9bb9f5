//! Rendering interface.
//!
//! Widgets draw through [`Painter`] in their own local coordinates; the engine
//! sets the transform before each widget. [`DrawList`] records the frame as
//! [`RenderCommand`]s for a backend to replay, and the pick pass implements the
//! same trait to rasterise masks.

use tabula_core::Affine;

use crate::rect::Rect;
use crate::style::Color;

/// Drawing surface handed to widgets.
pub trait Painter {
    /// Replaces the local-to-screen transform.
    fn set_transform(&mut self, transform: Affine);

    /// Filled rectangle.
    fn fill_rect(&mut self, bounds: Rect, color: Color, corner_radius: f64);

    /// Rectangle outline.
    fn stroke_rect(&mut self, bounds: Rect, color: Color, width: f64, corner_radius: f64);

    /// Filled circle.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    /// Text anchored at its centre.
    fn text(&mut self, text: &str, x: f64, y: f64, color: Color);

    /// Full-screen tint, ignoring the transform.
    fn fill_screen(&mut self, color: Color);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Transform for the following commands.
    Transform(Affine),
    /// Filled rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Rectangle outline.
    RectOutline {
        /// Bounds.
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Line width.
        width: f64,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Filled circle.
    Circle {
        /// Centre X.
        cx: f64,
        /// Centre Y.
        cy: f64,
        /// Radius.
        radius: f64,
        /// Fill color.
        color: Color,
    },
    /// Text.
    Text {
        /// Text content.
        text: String,
        /// X position.
        x: f64,
        /// Y position.
        y: f64,
        /// Text color.
        color: Color,
    },
    /// Full-screen tint.
    Screen {
        /// Tint color.
        color: Color,
    },
}

/// Records a frame's draw calls.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<RenderCommand>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the list empty.
    pub fn take(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Returns the total command count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Painter for DrawList {
    fn set_transform(&mut self, transform: Affine) {
        self.push(RenderCommand::Transform(transform));
    }

    fn fill_rect(&mut self, bounds: Rect, color: Color, corner_radius: f64) {
        self.push(RenderCommand::Rect {
            bounds,
            color,
            corner_radius,
        });
    }

    fn stroke_rect(&mut self, bounds: Rect, color: Color, width: f64, corner_radius: f64) {
        self.push(RenderCommand::RectOutline {
            bounds,
            color,
            width,
            corner_radius,
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.push(RenderCommand::Circle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn text(&mut self, text: &str, x: f64, y: f64, color: Color) {
        self.push(RenderCommand::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }

    fn fill_screen(&mut self, color: Color) {
        self.push(RenderCommand::Screen { color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_frame() {
        let mut list = DrawList::new();

        list.begin_frame();
        list.set_transform(Affine::IDENTITY);
        list.fill_rect(Rect::new(0.0, 0.0, 100.0, 50.0), Color::WHITE, 0.0);
        assert_eq!(list.len(), 2);

        list.begin_frame();
        assert!(list.is_empty());
    }
}
