//! # Colour-Coded Picking
//!
//! Hit testing is a rendering pass, not geometry math. Every pickable widget
//! draws its mask in a flat colour that encodes its position in the traversal:
//!
//! ```text
//!   id ──► base-200 digits ──► RGB bytes ──► mask pass ──► pixel ──► id
//!          (d2, d1, d0)        round(d·255/200)          round(b·200/255)
//! ```
//!
//! The target only covers a 3x3 pixel window around the query point; the
//! centre pixel decides the hit. Later masks overwrite earlier ones, so the
//! traversal order is also the stacking order.

use bytemuck::{Pod, Zeroable};
use tabula_core::{Affine, WidgetId};

use crate::error::{EngineError, EngineResult};
use crate::rect::Rect;
use crate::render::Painter;
use crate::style::Color;

/// Positional radix of the colour encoding.
pub const RADIX: u32 = 200;

/// Number of encodable values, `RADIX³`. Id 0 is reserved for "nothing".
pub const ID_SPACE: u32 = RADIX * RADIX * RADIX;

/// An encoded pick id as stored in a pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PickColor {
    /// Most significant digit.
    pub r: u8,
    /// Middle digit.
    pub g: u8,
    /// Least significant digit.
    pub b: u8,
}

impl PickColor {
    /// Colour of an untouched pixel.
    pub const NONE: Self = Self { r: 0, g: 0, b: 0 };

    /// Encodes `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TooManyWidgets`] when `id` does not fit.
    pub fn encode(id: u32) -> EngineResult<Self> {
        if id >= ID_SPACE {
            return Err(EngineError::TooManyWidgets { max: ID_SPACE - 1 });
        }
        Ok(Self {
            r: digit_to_byte(id / (RADIX * RADIX)),
            g: digit_to_byte((id / RADIX) % RADIX),
            b: digit_to_byte(id % RADIX),
        })
    }

    /// Decodes a pixel back to an id.
    #[must_use]
    pub fn decode(self) -> u32 {
        let r = byte_to_digit(self.r);
        let g = byte_to_digit(self.g);
        let b = byte_to_digit(self.b);
        (r * RADIX + g) * RADIX + b
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn digit_to_byte(digit: u32) -> u8 {
    (f64::from(digit) * 255.0 / f64::from(RADIX)).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn byte_to_digit(byte: u8) -> u32 {
    (f64::from(byte) * f64::from(RADIX) / 255.0).round() as u32
}

const WINDOW: usize = 3;

/// Offscreen target for the mask pass.
///
/// Draw calls ignore their colour argument and paint the current pick colour,
/// the software equivalent of a flat unlit shader.
#[derive(Debug, Clone)]
pub struct PickTarget {
    origin: (f64, f64),
    pixels: [PickColor; WINDOW * WINDOW],
    current: PickColor,
    inverse: Option<Affine>,
}

impl PickTarget {
    /// Creates a target centred on the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: (0.0, 0.0),
            pixels: [PickColor::NONE; WINDOW * WINDOW],
            current: PickColor::NONE,
            inverse: Some(Affine::IDENTITY),
        }
    }

    /// Clears the window and centres it on `(x, y)`.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
        self.pixels = [PickColor::NONE; WINDOW * WINDOW];
        self.current = PickColor::NONE;
    }

    /// Colour used by subsequent draw calls.
    pub fn set_color(&mut self, color: PickColor) {
        self.current = color;
    }

    /// The pixel under the query point.
    #[must_use]
    pub fn read(&self) -> PickColor {
        self.pixels[(WINDOW / 2) * WINDOW + WINDOW / 2]
    }

    #[allow(clippy::cast_precision_loss)]
    fn paint(&mut self, inside: impl Fn(f64, f64) -> bool) {
        let Some(inverse) = self.inverse else {
            return;
        };
        let half = (WINDOW / 2) as f64;
        for row in 0..WINDOW {
            for col in 0..WINDOW {
                let sx = self.origin.0 + col as f64 - half;
                let sy = self.origin.1 + row as f64 - half;
                let (lx, ly) = inverse.apply(sx, sy);
                if inside(lx, ly) {
                    self.pixels[row * WINDOW + col] = self.current;
                }
            }
        }
    }
}

impl Default for PickTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for PickTarget {
    fn set_transform(&mut self, transform: Affine) {
        self.inverse = transform.inverse();
    }

    fn fill_rect(&mut self, bounds: Rect, _color: Color, corner_radius: f64) {
        self.paint(|x, y| bounds.contains_rounded(x, y, corner_radius));
    }

    fn stroke_rect(&mut self, bounds: Rect, _color: Color, width: f64, corner_radius: f64) {
        let inner = bounds.shrink(width);
        self.paint(|x, y| {
            bounds.contains_rounded(x, y, corner_radius) && !inner.contains(x, y)
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, _color: Color) {
        self.paint(|x, y| (x - cx).powi(2) + (y - cy).powi(2) <= radius * radius);
    }

    fn text(&mut self, _text: &str, _x: f64, _y: f64, _color: Color) {}

    fn fill_screen(&mut self, _color: Color) {}
}

/// The mask pass bookkeeping: the target plus the widgets in encode order.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    target: PickTarget,
    order: Vec<WidgetId>,
}

impl Picker {
    /// Creates an idle picker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pass at `(x, y)`.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.target.begin(x, y);
        self.order.clear();
    }

    /// Assigns the next id to `widget` and returns the target to draw its
    /// mask into.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TooManyWidgets`] once the id space is exhausted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next(&mut self, widget: WidgetId, transform: Affine) -> EngineResult<&mut PickTarget> {
        let id = self.order.len() as u32 + 1;
        let color = PickColor::encode(id)?;
        self.order.push(widget);
        self.target.set_color(color);
        self.target.set_transform(transform);
        Ok(&mut self.target)
    }

    /// Finishes the pass and resolves the pixel under the query point.
    ///
    /// # Panics
    ///
    /// Panics if the decoded id is outside the encoded range, which means the
    /// traversal changed between encoding and decoding.
    #[must_use]
    pub fn resolve(&self) -> Option<WidgetId> {
        let id = self.target.read().decode() as usize;
        if id == 0 {
            return None;
        }
        assert!(
            id <= self.order.len(),
            "pick id {id} outside traversal of {} widgets",
            self.order.len()
        );
        Some(self.order[id - 1])
    }
}
