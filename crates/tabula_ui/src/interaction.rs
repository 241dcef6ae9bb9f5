//! # Pointer Interaction State Machine
//!
//! ```text
//!            pointer down (hit)              threshold, draggable
//!   Idle ◄──► Hover ──────────► PreDrag ─────────────────────► ToDrag ──► Drag
//!    │                            │  threshold, not draggable     ▲ ▲        │
//!    │ pointer down (miss)        └──────────► PostDrag           │ │  drop  │
//!    ▼                                                            │ └─ ToSnap ◄┘
//!   EmptyDrag (camera pan)                                        │     │
//!                                                   leave snap ───┘   Snap
//!
//!   any ── focus lost ──► Suspended ── focus gained ──► Idle
//! ```
//!
//! Every transition is completed before any callback resulting from it runs,
//! so hooks always observe a consistent state.

use tabula_core::WidgetId;

use crate::engine::InteractionEngine;
use crate::input::{InputEvent, MouseButton};
use crate::widget::{Callback, Kind};

/// Pointer interaction states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// Nothing under the pointer.
    #[default]
    Idle,
    /// A widget is under the pointer.
    Hover,
    /// Pressed; waiting to tell a click from a drag.
    PreDragThreshold,
    /// Held past the threshold on a widget that cannot be dragged.
    PostDragThreshold,
    /// The held widget tracks the pointer.
    Drag,
    /// The held widget is tweening toward the pointer.
    ToDrag,
    /// The held widget is tweening onto a snappable target.
    ToSnap,
    /// The held widget rests on a snappable target.
    Snap,
    /// The camera is being panned.
    EmptyDrag,
    /// Focus is lost; input and updates are ignored.
    Suspended,
}

impl InteractionState {
    /// State name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hover => "hover",
            Self::PreDragThreshold => "pre_drag_threshold",
            Self::PostDragThreshold => "post_drag_threshold",
            Self::Drag => "drag",
            Self::ToDrag => "to_drag",
            Self::ToSnap => "to_snap",
            Self::Snap => "snap",
            Self::EmptyDrag => "empty_drag",
            Self::Suspended => "suspended",
        }
    }

    /// Returns true while a widget is held.
    #[must_use]
    pub const fn is_drag_family(self) -> bool {
        matches!(self, Self::Drag | Self::ToDrag | Self::ToSnap | Self::Snap)
    }

    /// Returns true if hover tracking runs in this state.
    #[must_use]
    pub const fn allows_hover(self) -> bool {
        matches!(self, Self::Idle | Self::Hover)
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl InteractionEngine {
    /// Feeds one platform event to the engine.
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);

        if self.state != InteractionState::Suspended {
            for (_, node) in self.graph.iter_mut() {
                if let Some(widget) = node.widget.as_mut() {
                    widget.event_handler(event);
                }
            }
        }

        match *event {
            InputEvent::FocusLost => self.suspend(),
            InputEvent::FocusGained => self.resume(),
            _ if self.state == InteractionState::Suspended => {}
            InputEvent::PointerDown { button, .. } => self.pointer_down(button),
            InputEvent::PointerUp { button, .. } => self.pointer_up(button),
            InputEvent::PointerMove { .. } => {
                if self.state == InteractionState::EmptyDrag {
                    self.pan();
                }
            }
            InputEvent::Wheel { dz } => {
                if self.state.allows_hover() || self.state == InteractionState::EmptyDrag {
                    self.zoom(dz);
                }
            }
        }
    }

    /// Per-frame state machine step: hover and drop tracking, threshold
    /// transitions and tracking of the held widget.
    pub fn update(&mut self) {
        if self.state == InteractionState::Suspended {
            return;
        }
        self.update_pointers();

        if self.now > self.transition_at {
            match self.state {
                InteractionState::PreDragThreshold => self.threshold_elapsed(),
                InteractionState::ToDrag => self.set_state(InteractionState::Drag),
                InteractionState::ToSnap => self.set_state(InteractionState::Snap),
                _ => {}
            }
        }

        match self.state {
            InteractionState::Drag => self.follow_pointer(),
            InteractionState::ToDrag => self.towards_drag(),
            InteractionState::PostDragThreshold => {
                if let Some(held) = self.hover {
                    self.fire(held, Callback::LeftHeld, None);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn set_state(&mut self, next: InteractionState) {
        if self.state != next {
            tracing::debug!("interaction {} -> {}", self.state, next);
            self.state = next;
        }
    }

    // =========================================================================
    // Hover and drop tracking
    // =========================================================================

    fn update_pointers(&mut self) {
        if self.state.allows_hover() {
            let hit = self.pick(self.pointer.x, self.pointer.y);
            if hit != self.hover {
                self.change_hover(hit);
            }
        } else if self.state.is_drag_family() {
            let hit = self.pick(self.pointer.x, self.pointer.y);
            if hit != self.drop {
                self.change_drop(hit);
            }
        }
    }

    /// Moves hover to `next`, ending the old hover first.
    fn change_hover(&mut self, next: Option<WidgetId>) {
        let previous = std::mem::replace(&mut self.hover, next);
        self.set_state(if next.is_some() {
            InteractionState::Hover
        } else {
            InteractionState::Idle
        });

        if let Some(old) = previous {
            self.fire(old, Callback::HoverEnd, None);
            if self.is_piece(old) {
                self.reset_moves();
            }
        }
        if let Some(new) = next {
            self.fire(new, Callback::HoverStart, None);
            if self.is_piece(new) {
                self.query_moves(new);
            }
        }
    }

    fn change_drop(&mut self, next: Option<WidgetId>) {
        let Some(held) = self.hover else {
            return;
        };
        let previous = std::mem::replace(&mut self.drop, next);
        let left_snap = previous.is_some_and(|old| self.is_snappable(old));

        // Engine side of the transition first.
        match next {
            Some(target) if self.is_snappable(target) => self.snap_to(target),
            Some(_) => {
                self.transition_at = self.now + self.config.approach_time;
                self.set_state(InteractionState::ToDrag);
                self.towards_drag();
            }
            None if left_snap => {
                self.transition_at = self.now + self.config.approach_time;
                self.set_state(InteractionState::ToDrag);
                self.towards_drag();
            }
            None => self.set_state(InteractionState::Drag),
        }
        if let Some(old) = previous {
            self.set_nominated(old, false);
        }
        if let Some(new) = next {
            if self.is_piece(held) {
                self.set_nominated(new, true);
            }
        }

        if let Some(old) = previous {
            self.fire(old, Callback::DropEnd, Some(held));
        }
        if let Some(new) = next {
            self.fire(new, Callback::DropStart, Some(held));
        }
    }

    // =========================================================================
    // Button handling
    // =========================================================================

    fn pointer_down(&mut self, button: MouseButton) {
        if self.state.allows_hover() {
            let hit = self.pick(self.pointer.x, self.pointer.y);
            if hit != self.hover {
                self.change_hover(hit);
            }
        }

        let pressed = self.hover;
        if pressed != self.last_click {
            if let Some(previous) = std::mem::replace(&mut self.last_click, pressed) {
                self.fire(previous, Callback::ClickOff, pressed);
            }
        }

        let Some(widget) = pressed else {
            if self.state == InteractionState::Idle && button == MouseButton::Left {
                tracing::debug!("pointer down on empty board at ({}, {})", self.pointer.x, self.pointer.y);
                self.camera.interrupt(self.now);
                self.set_state(InteractionState::EmptyDrag);
            }
            return;
        };

        match button {
            MouseButton::Right => self.fire(widget, Callback::RightClick, None),
            MouseButton::Left if self.state.allows_hover() => self.begin_press(widget),
            MouseButton::Left | MouseButton::Middle => {}
        }
    }

    fn pointer_up(&mut self, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        match self.state {
            InteractionState::EmptyDrag => self.set_state(InteractionState::Idle),
            InteractionState::PreDragThreshold => self.finish_press(true),
            InteractionState::PostDragThreshold => self.finish_press(false),
            state if state.is_drag_family() => self.release_held(),
            _ => {}
        }
    }

    /// Records where the press started and arms the drag threshold.
    fn begin_press(&mut self, widget: WidgetId) {
        let Some(node) = self.graph.get(widget) else {
            return;
        };
        let geometry = *node.geometry();
        let release = node.destination();
        let (px, py) = self.pointer_in_space(geometry.c);

        self.drag_offset = (px - geometry.dx, py - geometry.dy);
        self.release = release;
        self.transition_at = self.now + self.config.drag_threshold;
        self.set_state(InteractionState::PreDragThreshold);
    }

    fn threshold_elapsed(&mut self) {
        let Some(widget) = self.hover else {
            self.set_state(InteractionState::Idle);
            return;
        };
        let draggable = self.graph.get(widget).is_some_and(|n| n.draggable());

        if draggable {
            self.transition_at = self.now + self.config.approach_time;
            self.set_state(InteractionState::ToDrag);
            self.towards_drag();
            self.fire(widget, Callback::DragStart, None);
        } else {
            self.set_state(InteractionState::PostDragThreshold);
            self.fire(widget, Callback::LeftClick, None);
        }
    }

    /// Button released before a drag began.
    fn finish_press(&mut self, clicked: bool) {
        let Some(widget) = self.hover else {
            self.set_state(InteractionState::Idle);
            return;
        };
        self.set_state(InteractionState::Hover);

        if clicked {
            self.fire(widget, Callback::LeftClick, None);
        }
        self.fire(widget, Callback::LeftRelease, None);

        let hit = self.pick(self.pointer.x, self.pointer.y);
        if hit == Some(widget) {
            self.fire(widget, Callback::HoverStart, None);
        } else {
            self.change_hover(hit);
        }
    }

    /// Button released while a widget is held.
    fn release_held(&mut self) {
        let Some(held) = self.hover else {
            self.set_state(InteractionState::Idle);
            return;
        };
        let target = self.drop.take();
        self.return_to_release(held);
        self.set_state(InteractionState::Hover);

        match target {
            Some(target) => {
                self.set_nominated(target, false);
                self.fire(target, Callback::DropEnd, Some(held));
                self.fire(held, Callback::DragEndDrop, Some(target));
                if self.is_piece(held) {
                    self.resolve_drop(held, target);
                }
            }
            None => self.fire(held, Callback::DragEndNoDrop, None),
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    fn suspend(&mut self) {
        let previous = self.state;
        if previous == InteractionState::Suspended {
            return;
        }

        let hovered = self.hover.take();
        let target = self.drop.take();
        if previous.is_drag_family() {
            if let Some(held) = hovered {
                self.return_to_release(held);
            }
        }
        self.set_state(InteractionState::Suspended);
        tracing::info!("focus lost, interaction suspended");

        match (previous, hovered) {
            (InteractionState::PostDragThreshold, Some(widget)) => {
                self.fire(widget, Callback::LeftRelease, None);
            }
            (state, Some(held)) if state.is_drag_family() => {
                if let Some(target) = target {
                    self.set_nominated(target, false);
                    self.fire(target, Callback::DropEnd, Some(held));
                }
                self.fire(held, Callback::DragEndNoDrop, None);
            }
            _ => {}
        }

        if let Some(widget) = hovered {
            self.fire(widget, Callback::HoverEnd, None);
            if self.is_piece(widget) {
                self.reset_moves();
            }
        }
    }

    fn resume(&mut self) {
        if self.state == InteractionState::Suspended {
            self.set_state(InteractionState::Idle);
            tracing::info!("focus regained, interaction resumed");
        }
    }

    // =========================================================================
    // Held widget motion
    // =========================================================================

    /// Where the held widget goes to follow the pointer.
    fn drag_target(&self, held: WidgetId) -> Option<tabula_core::Geometry> {
        let c = self.graph.get(held)?.geometry().c;
        let (px, py) = self.pointer_in_space(c);
        let mut target = self.release;
        target.dx = px - self.drag_offset.0;
        target.dy = py - self.drag_offset.1;
        Some(target)
    }

    pub(crate) fn towards_drag(&mut self) {
        let Some(held) = self.hover else {
            return;
        };
        let Some(target) = self.drag_target(held) else {
            return;
        };
        let now = self.now;
        let arrival = self.transition_at.max(now);
        if let Some(node) = self.graph.get_mut(held) {
            node.tween.interrupt(now);
            node.tween.push(target, arrival, now);
        }
    }

    fn follow_pointer(&mut self) {
        let Some(held) = self.hover else {
            return;
        };
        if let Some(target) = self.drag_target(held) {
            if let Some(node) = self.graph.get_mut(held) {
                node.tween.set(target);
            }
        }
    }

    fn snap_to(&mut self, target: WidgetId) {
        let Some(held) = self.hover else {
            return;
        };
        let (Some(held_node), Some(target_node)) = (self.graph.get(held), self.graph.get(target)) else {
            return;
        };
        let g = *held_node.geometry();
        let [ox, oy] = self.config.snap_offset;
        let snap = target_node
            .destination()
            .with_half_extents(g.hw, g.hh)
            .nudged(ox, oy);

        let now = self.now;
        self.transition_at = now + self.config.approach_time;
        if let Some(node) = self.graph.get_mut(held) {
            node.tween.interrupt(now);
            node.tween.push(snap, self.transition_at, now);
        }
        self.set_state(InteractionState::ToSnap);
    }

    fn return_to_release(&mut self, held: WidgetId) {
        let now = self.now;
        let arrival = now + self.config.release_time;
        let release = self.release;
        if let Some(node) = self.graph.get_mut(held) {
            node.tween.interrupt(now);
            node.tween.push(release, arrival, now);
        }
    }

    // =========================================================================
    // Camera
    // =========================================================================

    fn pan(&mut self) {
        let (dx, dy) = self.pointer.delta();
        let mut camera = *self.camera.geometry();
        camera.x += dx;
        camera.y += dy;
        self.camera.set(camera);
    }

    fn zoom(&mut self, dz: f64) {
        let step = self.config.zoom_step * dz;
        let floor = self.config.min_camera_scale;
        let mut camera = *self.camera.geometry();
        camera.sx = (camera.sx + step).max(floor);
        camera.sy = (camera.sy + step).max(floor);
        self.camera.set(camera);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub(crate) fn is_piece(&self, id: WidgetId) -> bool {
        self.graph
            .get(id)
            .is_some_and(|n| matches!(n.kind(), Kind::Piece { .. }))
    }

    fn is_snappable(&self, id: WidgetId) -> bool {
        self.graph.get(id).is_some_and(|n| n.snappable())
    }

    /// Clears every engine reference to `id` ahead of its destruction.
    /// `doomed` is the whole subtree being removed.
    pub(crate) fn forget(&mut self, id: WidgetId, doomed: &[WidgetId]) {
        if self.hover == Some(id) {
            let was_held = self.state.is_drag_family();
            let pressing = matches!(
                self.state,
                InteractionState::PreDragThreshold | InteractionState::PostDragThreshold
            );
            self.hover = None;
            if was_held {
                if let Some(target) = self.drop.take() {
                    if !doomed.contains(&target) {
                        self.set_nominated(target, false);
                        self.fire(target, Callback::DropEnd, None);
                    }
                }
            }
            if was_held || pressing || self.state.allows_hover() {
                self.set_state(InteractionState::Idle);
            }
        }

        if self.last_click == Some(id) {
            self.last_click = None;
        }

        if self.drop == Some(id) {
            self.drop = None;
            if self.state.is_drag_family() && self.hover.is_some() {
                self.transition_at = self.now + self.config.approach_time;
                self.set_state(InteractionState::ToDrag);
                self.towards_drag();
            }
        }

        if self.moves.piece() == Some(id) {
            self.reset_moves_except(doomed);
        }
    }
}
