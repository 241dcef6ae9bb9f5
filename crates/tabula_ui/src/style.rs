//! Colours and the board palette.
//!
//! Muted slate panels with lighter highlights; activated/deactivated tints for
//! interactive controls.

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit RGB values with full alpha.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Shared colours and edge metrics used by the reference widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Panel fill.
    pub main: Color,
    /// Hovered or highlighted fill.
    pub highlight: Color,
    /// Recessed fill (wells, inactive tiles).
    pub recess: Color,
    /// Outline colour.
    pub edge: Color,
    /// Outline corner radius.
    pub edge_radius: f64,
    /// Outline width.
    pub edge_width: f64,
    /// Text on an active control.
    pub activated: Color,
    /// Text on an inactive control.
    pub deactivated: Color,
}

impl Palette {
    /// The default tabletop palette.
    #[must_use]
    pub fn tabletop() -> Self {
        Self {
            main: Color::rgb8(72, 91, 122),
            highlight: Color::rgb8(114, 136, 173),
            recess: Color::rgb8(0x6B, 0x81, 0x8C),
            edge: Color::BLACK,
            edge_radius: 10.0,
            edge_width: 2.0,
            activated: Color::BLACK,
            deactivated: Color::rgb8(128, 128, 128),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tabletop()
    }
}
