//! # Widget Geometry
//!
//! Every widget (and the camera) is positioned by the same descriptor:
//!
//! ```text
//! screen = Camera(c) · Translate(dx, dy) · Translate(x, y) · Rotate(a) · Scale(sx, sy) · local
//! ```
//!
//! `c` blends between screen space (0) and camera space (1). The half extents
//! double as the widget's nominal hit box.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Smallest magnitude a scale component may take.
pub const MIN_SCALE: f64 = 1e-6;

/// Affine descriptor for a widget.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// X offset.
    pub x: f64,
    /// Y offset.
    pub y: f64,
    /// X scale.
    pub sx: f64,
    /// Y scale.
    pub sy: f64,
    /// Rotation in radians.
    pub a: f64,
    /// Camera blend factor (0 = screen space, 1 = follows camera).
    pub c: f64,
    /// Secondary X translation, used while dragging.
    pub dx: f64,
    /// Secondary Y translation, used while dragging.
    pub dy: f64,
    /// Half width.
    pub hw: f64,
    /// Half height.
    pub hh: f64,
}

impl Geometry {
    /// Identity transform with zero extents.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        sx: 1.0,
        sy: 1.0,
        a: 0.0,
        c: 0.0,
        dx: 0.0,
        dy: 0.0,
        hw: 0.0,
        hh: 0.0,
    };

    /// Creates a geometry at a position with the given half extents.
    #[must_use]
    pub const fn at(x: f64, y: f64, hw: f64, hh: f64) -> Self {
        Self {
            x,
            y,
            hw,
            hh,
            ..Self::IDENTITY
        }
    }

    /// Returns a copy with a different camera blend factor.
    #[must_use]
    pub const fn with_camera(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Returns a copy with different half extents.
    #[must_use]
    pub const fn with_half_extents(mut self, hw: f64, hh: f64) -> Self {
        self.hw = hw;
        self.hh = hh;
        self
    }

    /// Returns a copy with the secondary translation offset by `(dx, dy)`.
    #[must_use]
    pub fn nudged(mut self, dx: f64, dy: f64) -> Self {
        self.dx += dx;
        self.dy += dy;
        self
    }

    /// Enforces the descriptor invariants.
    ///
    /// Scale never collapses to zero, extents are never negative and the
    /// camera factor stays in `[0, 1]`.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.sx = guard_scale(self.sx);
        self.sy = guard_scale(self.sy);
        self.hw = self.hw.abs();
        self.hh = self.hh.abs();
        self.c = self.c.clamp(0.0, 1.0);
        self
    }

    /// Componentwise linear interpolation, `t = 0` yields `self`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            sx: mix(self.sx, other.sx),
            sy: mix(self.sy, other.sy),
            a: mix(self.a, other.a),
            c: mix(self.c, other.c),
            dx: mix(self.dx, other.dx),
            dy: mix(self.dy, other.dy),
            hw: mix(self.hw, other.hw),
            hh: mix(self.hh, other.hh),
        }
    }

    /// Local-to-world transform, without the camera.
    #[must_use]
    pub fn local_transform(&self) -> Affine {
        Affine::build(self.x, self.y, guard_scale(self.sx), guard_scale(self.sy), self.a)
            .then_translate(self.dx, self.dy)
    }

    /// The camera transform weighted by blend factor `c`.
    #[must_use]
    pub fn camera_transform(&self, c: f64) -> Affine {
        Affine::build(
            self.x * c,
            self.y * c,
            guard_scale(self.sx * c + (1.0 - c)),
            guard_scale(self.sy * c + (1.0 - c)),
            self.a * c,
        )
    }

    /// Full local-to-screen transform when viewed through `camera`.
    #[must_use]
    pub fn screen_transform(&self, camera: &Self) -> Affine {
        self.local_transform().then(&camera.camera_transform(self.c))
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn guard_scale(s: f64) -> f64 {
    if s.abs() >= MIN_SCALE {
        s
    } else if s.is_sign_negative() {
        -MIN_SCALE
    } else {
        MIN_SCALE
    }
}

/// 2D affine transform.
///
/// Maps `(x, y)` to `(m[0]·x + m[2]·y + m[4], m[1]·x + m[3]·y + m[5])`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    /// Column-major coefficients.
    pub m: [f64; 6],
}

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Scale, then rotate, then translate.
    #[must_use]
    pub fn build(x: f64, y: f64, sx: f64, sy: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            m: [cos * sx, sin * sx, -sin * sy, cos * sy, x, y],
        }
    }

    /// Applies `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        let a = &self.m;
        let b = &next.m;
        Self {
            m: [
                b[0] * a[0] + b[2] * a[1],
                b[1] * a[0] + b[3] * a[1],
                b[0] * a[2] + b[2] * a[3],
                b[1] * a[2] + b[3] * a[3],
                b[0] * a[4] + b[2] * a[5] + b[4],
                b[1] * a[4] + b[3] * a[5] + b[5],
            ],
        }
    }

    /// Appends a translation.
    #[must_use]
    pub fn then_translate(mut self, dx: f64, dy: f64) -> Self {
        self.m[4] += dx;
        self.m[5] += dy;
        self
    }

    /// Transforms a point.
    #[inline]
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
    }

    /// Returns the inverse, or `None` when the transform is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.m;
        let det = m[0] * m[3] - m[2] * m[1];
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let a = m[3] * inv;
        let b = -m[1] * inv;
        let c = -m[2] * inv;
        let d = m[0] * inv;
        Some(Self {
            m: [a, b, c, d, -(a * m[4] + c * m[5]), -(b * m[4] + d * m[5])],
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_sanitize_keeps_scale_nonzero() {
        let g = Geometry {
            sx: 0.0,
            sy: -0.0,
            hw: -3.0,
            ..Geometry::IDENTITY
        }
        .sanitized();

        assert!(g.sx.abs() >= MIN_SCALE);
        assert!(g.sy.abs() >= MIN_SCALE);
        assert_eq!(g.hw, 3.0);
    }

    #[test]
    fn test_transform_order() {
        let g = Geometry {
            x: 10.0,
            y: 20.0,
            sx: 2.0,
            sy: 2.0,
            a: std::f64::consts::FRAC_PI_2,
            dx: 1.0,
            ..Geometry::IDENTITY
        };

        // (1, 0) scaled to (2, 0), rotated to (0, 2), moved to (11, 22).
        assert!(close(g.local_transform().apply(1.0, 0.0), (11.0, 22.0)));
    }

    #[test]
    fn test_camera_blend() {
        let camera = Geometry {
            x: 100.0,
            sx: 2.0,
            sy: 2.0,
            ..Geometry::IDENTITY
        };
        let screen = Geometry::at(5.0, 5.0, 1.0, 1.0).with_camera(0.0);
        let world = Geometry::at(5.0, 5.0, 1.0, 1.0).with_camera(1.0);

        assert!(close(screen.screen_transform(&camera).apply(0.0, 0.0), (5.0, 5.0)));
        assert!(close(world.screen_transform(&camera).apply(0.0, 0.0), (110.0, 10.0)));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Affine::build(3.0, -4.0, 1.5, 0.5, 0.7).then_translate(2.0, 2.0);
        let inv = t.inverse().unwrap();
        let p = t.apply(7.0, -1.0);

        assert!(close(inv.apply(p.0, p.1), (7.0, -1.0)));
    }
}
