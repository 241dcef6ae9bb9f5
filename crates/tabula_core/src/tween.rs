//! # Curve Tweener
//!
//! Drives a [`Geometry`] from where it is toward a destination along a cubic
//! curve. The curve is consumed as time advances: each update splits the
//! remaining curve at the elapsed fraction (De Casteljau) and keeps the right
//! half, so the current point is always `P0` and the destination is always
//! `P3`.
//!
//! ```text
//!   P0 ──── P1 ──── P2 ──── P3
//!     \    /  \    /  \    /
//!      Q0 ──── Q1 ──── Q2          split at t, keep [S, R1, Q2, P3]
//!        \    /  \    /
//!         R0 ──── R1
//!           \    /
//!             S
//! ```
//!
//! Once `now >= arrival` the geometry equals the destination exactly.

use std::collections::VecDeque;

use crate::error::{TweenError, TweenResult};
use crate::geometry::Geometry;

/// A destination and the time it should be reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Target geometry.
    pub geometry: Geometry,
    /// Arrival timestamp (seconds).
    pub arrival: f64,
}

impl Keyframe {
    /// Creates a keyframe.
    #[must_use]
    pub const fn new(geometry: Geometry, arrival: f64) -> Self {
        Self { geometry, arrival }
    }
}

/// Per-widget curve state.
#[derive(Clone, Debug)]
pub struct Tween {
    /// Current point (P0).
    current: Geometry,
    /// First control point.
    p1: Geometry,
    /// Second control point.
    p2: Geometry,
    /// Destination (P3).
    destination: Geometry,
    /// Time the curve was last consumed.
    last: f64,
    /// Time the destination is reached.
    arrival: f64,
    /// Keyframes that start once the current segment arrives.
    pending: VecDeque<Keyframe>,
    /// Maximum pending keyframes.
    capacity: usize,
}

impl Tween {
    /// Default pending keyframe capacity.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates a tween resting at `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let g = geometry.sanitized();
        Self {
            current: g,
            p1: g,
            p2: g,
            destination: g,
            last: 0.0,
            arrival: 0.0,
            pending: VecDeque::new(),
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Sets the pending keyframe capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Resets to the identity transform, keeping nothing in flight.
    pub fn reset(&mut self) {
        self.set(Geometry::IDENTITY);
    }

    /// Current geometry.
    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.current
    }

    /// Final destination, including queued keyframes.
    #[must_use]
    pub fn destination(&self) -> Geometry {
        self.pending
            .back()
            .map_or(self.destination, |k| k.geometry)
    }

    /// Arrival time of the current segment.
    #[must_use]
    pub const fn arrival(&self) -> f64 {
        self.arrival
    }

    /// Returns true while the geometry differs from the final destination.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        !self.pending.is_empty() || self.current != self.destination
    }

    /// Number of queued keyframes.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Collapses every curve point onto `target`, cancelling any motion.
    pub fn set(&mut self, target: Geometry) {
        let g = target.sanitized();
        self.current = g;
        self.p1 = g;
        self.p2 = g;
        self.destination = g;
        self.arrival = self.last;
        self.pending.clear();
    }

    /// Replaces the motion with a single segment ending at `target`.
    ///
    /// The new segment starts at the current point. When the widget is
    /// already moving its velocity is carried into the new segment; from rest
    /// the motion is linear.
    pub fn push(&mut self, target: Geometry, arrival: f64, now: f64) {
        self.update(now);
        self.pending.clear();

        let target = target.sanitized();
        let old_window = self.arrival - self.last;
        let new_window = arrival - now;

        let p1 = if self.current != self.destination && old_window > 0.0 && new_window > 0.0 {
            // B'(0) = 3 (P1 - P0) / T, keep it across the restart.
            let ratio = new_window / old_window;
            let tangent = self.current.lerp(&self.p1, ratio);
            // Only positional channels carry momentum; the rest stay linear.
            let linear = self.current.lerp(&target, 1.0 / 3.0);
            Geometry {
                x: tangent.x,
                y: tangent.y,
                dx: tangent.dx,
                dy: tangent.dy,
                ..linear
            }
        } else {
            self.current.lerp(&target, 1.0 / 3.0)
        };

        self.p1 = p1;
        self.p2 = self.current.lerp(&target, 2.0 / 3.0);
        self.destination = target;
        self.last = now;
        self.arrival = arrival;
    }

    /// Queues a keyframe after the final destination.
    ///
    /// # Errors
    ///
    /// Returns [`TweenError::QueueFull`] when the queue is at capacity and
    /// [`TweenError::Allocation`] when the queue cannot grow.
    pub fn enqueue(&mut self, keyframe: Keyframe) -> TweenResult<()> {
        if self.pending.len() >= self.capacity {
            return Err(TweenError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.pending
            .try_reserve(1)
            .map_err(|_| TweenError::Allocation)?;
        self.pending.push_back(Keyframe::new(keyframe.geometry.sanitized(), keyframe.arrival));
        Ok(())
    }

    /// Advances the curve to `now`.
    pub fn update(&mut self, now: f64) {
        loop {
            if self.current == self.destination && self.pending.is_empty() {
                self.last = now;
                self.arrival = self.arrival.max(now);
                return;
            }

            if now >= self.arrival || self.arrival - self.last <= 0.0 {
                self.current = self.destination;
                self.p1 = self.destination;
                self.p2 = self.destination;

                match self.pending.pop_front() {
                    Some(next) => {
                        let start = self.arrival.min(now);
                        self.begin_segment(next, start);
                        continue;
                    }
                    None => {
                        self.last = now;
                        return;
                    }
                }
            }

            let window = self.arrival - self.last;
            let t = ((now - self.last) / window).clamp(0.0, 1.0);
            self.split(t);
            self.last = now;
            return;
        }
    }

    /// Halts the motion exactly where it currently stands at `now`.
    pub fn interrupt(&mut self, now: f64) {
        self.update(now);
        let here = self.current;
        self.set(here);
    }

    fn begin_segment(&mut self, next: Keyframe, start: f64) {
        self.p1 = self.current.lerp(&next.geometry, 1.0 / 3.0);
        self.p2 = self.current.lerp(&next.geometry, 2.0 / 3.0);
        self.destination = next.geometry;
        self.last = start;
        self.arrival = next.arrival;
    }

    fn split(&mut self, t: f64) {
        let q0 = self.current.lerp(&self.p1, t);
        let q1 = self.p1.lerp(&self.p2, t);
        let q2 = self.p2.lerp(&self.destination, t);
        let r0 = q0.lerp(&q1, t);
        let r1 = q1.lerp(&q2, t);

        self.current = r0.lerp(&r1, t).sanitized();
        self.p1 = r1;
        self.p2 = q2;
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(Geometry::IDENTITY)
    }
}
