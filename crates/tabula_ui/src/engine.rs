//! # Interaction Engine
//!
//! The single context object owned by the frame loop. It holds the two widget
//! forests, the camera, pointer bookkeeping and the interaction state, and is
//! driven once per frame:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ begin_frame(now) → handle_event(..)* → update() → step_work() │
//! │                                                   → draw()    │
//! └───────────────────────────────────────────────────────────────┘
//!
//!   board ─┬─ zone ─┬─ piece          hud ─┬─ frame ─┬─ control
//!          │        └─ piece               │         └─ control
//!          └─ zone                         └─ frame
//! ```
//!
//! Draw and pick traverse zones, then pieces, then frames, then controls.

use tabula_core::{Geometry, Keyframe, SceneGraph, Tween, WidgetId};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, WidgetError};
use crate::input::PointerState;
use crate::interaction::InteractionState;
use crate::moves::MoveSet;
use crate::pick::{Picker, ID_SPACE};
use crate::render::Painter;
use crate::script::{NoScript, ScriptHost, Value};
use crate::style::{Color, Palette};
use crate::widget::{Callback, Kind, Node, Widget, ZoneFlags};
use crate::work::{BatchReport, WorkBatch, WorkerPool};

/// The widget interaction engine.
pub struct InteractionEngine {
    pub(crate) config: EngineConfig,
    pub(crate) palette: Palette,
    pub(crate) graph: SceneGraph<Node>,
    pub(crate) board: WidgetId,
    pub(crate) hud: WidgetId,
    pub(crate) camera: Tween,
    pub(crate) host: Box<dyn ScriptHost>,
    pub(crate) picker: Picker,
    pub(crate) pointer: PointerState,
    pub(crate) state: InteractionState,
    /// Widget under the pointer, or the held widget while dragging.
    pub(crate) hover: Option<WidgetId>,
    /// Widget under the held widget.
    pub(crate) drop: Option<WidgetId>,
    pub(crate) last_click: Option<WidgetId>,
    /// Where the held widget returns to when a drag is released.
    pub(crate) release: Geometry,
    /// Pointer minus the held widget's drag translation, in its camera space.
    pub(crate) drag_offset: (f64, f64),
    pub(crate) transition_at: f64,
    pub(crate) moves: MoveSet,
    pub(crate) now: f64,
}

impl InteractionEngine {
    /// Creates an engine with no script host.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_host(config, NoScript)
    }

    /// Creates an engine bound to a script host.
    #[must_use]
    pub fn with_host(config: EngineConfig, host: impl ScriptHost + 'static) -> Self {
        let config = config.sanitized();
        let mut graph = SceneGraph::with_capacity(256);
        let board = graph.insert(Node::root());
        let hud = graph.insert(Node::root());

        Self {
            config,
            palette: Palette::default(),
            graph,
            board,
            hud,
            camera: Tween::new(Geometry::IDENTITY),
            host: Box::new(host),
            picker: Picker::new(),
            pointer: PointerState::new(),
            state: InteractionState::Idle,
            hover: None,
            drop: None,
            last_click: None,
            release: Geometry::IDENTITY,
            drag_offset: (0.0, 0.0),
            transition_at: 0.0,
            moves: MoveSet::default(),
            now: 0.0,
        }
    }

    /// Replaces the script host.
    pub fn set_host(&mut self, host: Box<dyn ScriptHost>) {
        self.host = host;
    }

    /// Replaces the palette handed to widgets.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    // =========================================================================
    // Frame entry points
    // =========================================================================

    /// Starts a frame at timestamp `now` (seconds). Time never runs backwards.
    pub fn begin_frame(&mut self, now: f64) {
        if now < self.now {
            tracing::warn!("frame time went backwards ({} < {}), holding", now, self.now);
            return;
        }
        self.now = now;
    }

    /// Produces this frame's independent per-widget jobs.
    ///
    /// Each job advances one widget's tween and runs its custom update. The
    /// camera is advanced by its own job. Nothing is produced while suspended.
    pub fn enumerate_work(&mut self) -> WorkBatch<'_> {
        let now = self.now;
        let mut batch = WorkBatch::with_capacity(self.graph.len() + 1);
        if self.state == InteractionState::Suspended {
            return batch;
        }

        let camera = &mut self.camera;
        batch.push(Box::new(move || {
            camera.update(now);
            Ok(())
        }));
        for (id, node) in self.graph.iter_mut() {
            batch.push(Box::new(move || node.advance(id, now)));
        }
        batch
    }

    /// Runs this frame's batch on `pool` and waits for it.
    pub fn step_work(&mut self, pool: &dyn WorkerPool) -> BatchReport {
        let batch = self.enumerate_work();
        let report = pool.run(batch);
        for error in &report.errors {
            tracing::warn!("widget job failed: {error}");
        }
        report
    }

    /// Draws zones, pieces, frames and controls, the held widget last, then
    /// the dimming overlay while suspended.
    pub fn draw(&self, painter: &mut dyn Painter) {
        let held = self.held();
        let camera = *self.camera.geometry();

        for id in self.traversal() {
            if Some(id) != held {
                self.draw_node(id, &camera, painter);
            }
        }
        if let Some(id) = held {
            self.draw_node(id, &camera, painter);
        }

        if self.state == InteractionState::Suspended {
            painter.set_transform(tabula_core::Affine::IDENTITY);
            painter.fill_screen(Color::BLACK.with_alpha(self.config.suspend_dim));
        }
    }

    fn draw_node(&self, id: WidgetId, camera: &Geometry, painter: &mut dyn Painter) {
        let Some(node) = self.graph.get(id) else {
            return;
        };
        let Some(widget) = node.widget.as_ref() else {
            return;
        };
        painter.set_transform(node.geometry().screen_transform(camera));
        widget.draw(&node.draw_context(id, &self.palette), painter);
    }

    /// Resolves the widget under `(x, y)` with a mask pass.
    ///
    /// While a widget is held it is left out, so the result is what lies
    /// beneath it.
    pub fn pick(&mut self, x: f64, y: f64) -> Option<WidgetId> {
        let held = self.held();
        let order = self.traversal();
        let camera = *self.camera.geometry();

        self.picker.begin(x, y);
        for id in order {
            if Some(id) == held {
                continue;
            }
            let Some(node) = self.graph.get(id) else {
                continue;
            };
            let Some(widget) = node.widget.as_ref() else {
                continue;
            };
            let transform = node.geometry().screen_transform(&camera);
            match self.picker.next(id, transform) {
                Ok(target) => widget.mask(&node.draw_context(id, &self.palette), target),
                Err(e) => {
                    tracing::warn!("pick pass truncated: {e}");
                    break;
                }
            }
        }
        self.picker.resolve()
    }

    /// Zones, pieces, frames, controls.
    pub(crate) fn traversal(&self) -> Vec<WidgetId> {
        let mut order = Vec::with_capacity(self.graph.len());
        for root in [self.board, self.hud] {
            let containers: Vec<_> = self.graph.children(root).collect();
            order.extend_from_slice(&containers);
            for container in containers {
                order.extend(self.graph.children(container));
            }
        }
        order
    }

    /// The widget being dragged, if any.
    pub(crate) fn held(&self) -> Option<WidgetId> {
        if self.state.is_drag_family() {
            self.hover
        } else {
            None
        }
    }

    // =========================================================================
    // Scene construction
    // =========================================================================

    /// Adds a zone to the board.
    ///
    /// Board widgets follow the camera: `geometry.c` is replaced by 1. Use
    /// [`Self::set_geometry`] afterwards for a different blend.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TooManyWidgets`] once the pick space is full.
    pub fn spawn_zone(&mut self, widget: impl Widget + 'static, geometry: Geometry) -> EngineResult<WidgetId> {
        let board = self.board;
        self.spawn(board, Kind::Zone(ZoneFlags::default()), Box::new(widget), geometry)
    }

    /// Adds a piece to a zone.
    ///
    /// As with zones, `geometry.c` is replaced by 1.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongParent`] if `zone` is not a zone.
    pub fn spawn_piece(
        &mut self,
        zone: WidgetId,
        widget: impl Widget + 'static,
        geometry: Geometry,
    ) -> EngineResult<WidgetId> {
        self.spawn(zone, Kind::Piece { zone }, Box::new(widget), geometry)
    }

    /// Adds a frame to the HUD.
    ///
    /// HUD widgets live in screen space: `geometry.c` is replaced by 0. Use
    /// [`Self::set_geometry`] afterwards for a different blend.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TooManyWidgets`] once the pick space is full.
    pub fn spawn_frame(&mut self, widget: impl Widget + 'static, geometry: Geometry) -> EngineResult<WidgetId> {
        let hud = self.hud;
        self.spawn(hud, Kind::Frame, Box::new(widget), geometry)
    }

    /// Adds a control to a frame.
    ///
    /// As with frames, `geometry.c` is replaced by 0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongParent`] if `frame` is not a frame.
    pub fn spawn_control(
        &mut self,
        frame: WidgetId,
        widget: impl Widget + 'static,
        geometry: Geometry,
    ) -> EngineResult<WidgetId> {
        self.spawn(frame, Kind::Control, Box::new(widget), geometry)
    }

    /// The camera factor of `geometry` is replaced by the kind's default.
    fn spawn(
        &mut self,
        parent: WidgetId,
        kind: Kind,
        widget: Box<dyn Widget>,
        geometry: Geometry,
    ) -> EngineResult<WidgetId> {
        let parent_kind = *self.node(parent)?.kind();
        let fits = match kind {
            Kind::Zone(_) => parent == self.board,
            Kind::Frame => parent == self.hud,
            Kind::Piece { .. } => matches!(parent_kind, Kind::Zone(_)),
            Kind::Control => parent_kind == Kind::Frame,
            Kind::Root => false,
        };
        if !fits {
            tracing::warn!("refusing to attach a {} under {}", kind.name(), parent);
            return Err(EngineError::WrongParent {
                parent,
                kind: kind.name(),
            });
        }
        if self.widget_count() + 1 >= ID_SPACE as usize {
            return Err(EngineError::TooManyWidgets { max: ID_SPACE - 1 });
        }

        let (_, _, c) = kind.defaults();
        let tween = Tween::new(geometry.with_camera(c)).with_capacity(self.config.max_pending_keyframes);
        let type_name = widget.type_name();
        let id = self.graph.insert(Node::new(kind, Some(widget), tween));
        self.graph.append(parent, id)?;

        tracing::debug!("spawned {} {} ({}) under {}", kind.name(), id, type_name, parent);
        Ok(id)
    }

    /// Destroys a widget and everything it owns.
    ///
    /// Engine references to the doomed widgets are cleared first; afterwards
    /// each receives only its `destroyed` hook.
    ///
    /// # Errors
    ///
    /// Fails for roots and unknown ids.
    pub fn destroy(&mut self, id: WidgetId) -> EngineResult<()> {
        if id == self.board || id == self.hud {
            return Err(EngineError::Root(id));
        }
        if !self.graph.contains(id) {
            return Err(EngineError::UnknownWidget(id));
        }

        let doomed = self.subtree(id);
        for &widget in &doomed {
            self.forget(widget, &doomed);
        }

        let removed = self.graph.destroy(id)?;
        for (widget, mut node) in removed {
            node.notify(Callback::Destroyed, None);
            self.host.widget_destroyed(widget);
        }
        tracing::debug!("destroyed {} ({} widgets)", id, doomed.len());
        Ok(())
    }

    fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            let children: Vec<_> = self.graph.children(out[i]).collect();
            out.extend(children);
            i += 1;
        }
        out
    }

    /// Moves a widget within its siblings: before `before`, or last.
    ///
    /// Sibling order is draw and pick order.
    ///
    /// # Errors
    ///
    /// Fails for roots, unknown ids and siblings with a different parent.
    pub fn reorder(&mut self, id: WidgetId, before: Option<WidgetId>) -> EngineResult<()> {
        if id == self.board || id == self.hud {
            return Err(EngineError::Root(id));
        }
        self.node(id)?;
        self.graph.move_before(id, before)?;
        Ok(())
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Jumps a widget to `geometry`, cancelling any motion.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn set_geometry(&mut self, id: WidgetId, geometry: Geometry) -> EngineResult<()> {
        self.node_mut(id)?.tween.set(geometry);
        Ok(())
    }

    /// Resets a widget to the identity transform.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn reset_geometry(&mut self, id: WidgetId) -> EngineResult<()> {
        self.node_mut(id)?.tween.reset();
        Ok(())
    }

    /// Tweens a widget to `geometry`, arriving at `arrival`.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn push_geometry(&mut self, id: WidgetId, geometry: Geometry, arrival: f64) -> EngineResult<()> {
        let now = self.now;
        self.node_mut(id)?.tween.push(geometry, arrival, now);
        Ok(())
    }

    /// Queues a keyframe after the widget's current motion.
    ///
    /// # Errors
    ///
    /// Returns the tween error when the queue is full or cannot grow.
    pub fn enqueue_keyframe(&mut self, id: WidgetId, keyframe: Keyframe) -> EngineResult<()> {
        self.node_mut(id)?.tween.enqueue(keyframe).map_err(|e| {
            tracing::warn!("dropping keyframe for {id}: {e}");
            EngineError::from(e)
        })
    }

    /// Stops a widget where it currently stands.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn interrupt(&mut self, id: WidgetId) -> EngineResult<()> {
        let now = self.now;
        self.node_mut(id)?.tween.interrupt(now);
        Ok(())
    }

    /// Current camera geometry.
    #[must_use]
    pub fn camera(&self) -> &Geometry {
        self.camera.geometry()
    }

    /// Jumps the camera.
    pub fn set_camera(&mut self, geometry: Geometry) {
        self.camera.set(geometry);
    }

    /// Tweens the camera.
    pub fn push_camera(&mut self, geometry: Geometry, arrival: f64) {
        self.camera.push(geometry, arrival, self.now);
    }

    /// Converts a screen point into a widget's local coordinates.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn screen_to_local(&self, id: WidgetId, x: f64, y: f64) -> EngineResult<(f64, f64)> {
        let transform = self.node(id)?.geometry().screen_transform(self.camera.geometry());
        Ok(transform.inverse().map_or((x, y), |inv| inv.apply(x, y)))
    }

    /// Pointer position in the space of a widget with camera factor `c`.
    pub(crate) fn pointer_in_space(&self, c: f64) -> (f64, f64) {
        let (x, y) = (self.pointer.x, self.pointer.y);
        self.camera
            .geometry()
            .camera_transform(c)
            .inverse()
            .map_or((x, y), |inv| inv.apply(x, y))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Sets whether a widget can be dragged.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn set_draggable(&mut self, id: WidgetId, draggable: bool) -> EngineResult<()> {
        self.node_mut(id)?.draggable = draggable;
        Ok(())
    }

    /// Sets whether held widgets snap onto this one.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn set_snappable(&mut self, id: WidgetId, snappable: bool) -> EngineResult<()> {
        let node = self.node_mut(id)?;
        node.snappable = snappable;
        node.default_snappable = snappable;
        Ok(())
    }

    /// Reads a property: widget hooks first, then geometry, then the
    /// widget's environment.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids.
    pub fn property(&self, id: WidgetId, key: &str) -> EngineResult<Value> {
        let node = self.node(id)?;
        if let Some(value) = node.widget.as_ref().and_then(|w| w.property(key)) {
            return Ok(value);
        }

        let g = node.geometry();
        let value = match key {
            "type" => Value::from(node.type_name()),
            "x" => Value::Number(g.x),
            "y" => Value::Number(g.y),
            "sx" => Value::Number(g.sx),
            "sy" => Value::Number(g.sy),
            "a" => Value::Number(g.a),
            "c" => Value::Number(g.c),
            "dx" => Value::Number(g.dx),
            "dy" => Value::Number(g.dy),
            "width" => Value::Number(2.0 * g.hw),
            "height" => Value::Number(2.0 * g.hh),
            "draggable" => Value::Bool(node.draggable),
            "snappable" => Value::Bool(node.snappable),
            _ => node.env.get(key).cloned().unwrap_or(Value::Nil),
        };
        Ok(value)
    }

    /// Writes a property: widget hooks first, then geometry, then the
    /// widget's environment. Geometry writes jump without tweening.
    ///
    /// # Errors
    ///
    /// Fails for unknown ids and rejected writes.
    pub fn set_property(&mut self, id: WidgetId, key: &str, value: Value) -> EngineResult<()> {
        let node = self.node_mut(id)?;
        if let Some(result) = node.widget.as_mut().and_then(|w| w.set_property(key, &value)) {
            return result.map_err(EngineError::from);
        }

        let mut g = *node.geometry();
        match key {
            "type" => return Err(WidgetError::property(key, "read only").into()),
            "x" => g.x = number_property(key, &value)?,
            "y" => g.y = number_property(key, &value)?,
            "sx" => g.sx = number_property(key, &value)?,
            "sy" => g.sy = number_property(key, &value)?,
            "a" => g.a = number_property(key, &value)?,
            "c" => g.c = number_property(key, &value)?,
            "dx" => g.dx = number_property(key, &value)?,
            "dy" => g.dy = number_property(key, &value)?,
            "width" => g.hw = number_property(key, &value)? * 0.5,
            "height" => g.hh = number_property(key, &value)? * 0.5,
            "draggable" => {
                node.draggable = value.truthy();
                return Ok(());
            }
            "snappable" => {
                node.snappable = value.truthy();
                node.default_snappable = node.snappable;
                return Ok(());
            }
            _ => {
                node.env.set(key, value);
                return Ok(());
            }
        }
        node.tween.set(g);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current palette.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Board root.
    #[must_use]
    pub const fn board(&self) -> WidgetId {
        self.board
    }

    /// HUD root.
    #[must_use]
    pub const fn hud(&self) -> WidgetId {
        self.hud
    }

    /// Current interaction state.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Hovered (or held) widget.
    #[must_use]
    pub const fn hover(&self) -> Option<WidgetId> {
        self.hover
    }

    /// Widget beneath the held widget.
    #[must_use]
    pub const fn drop_target(&self) -> Option<WidgetId> {
        self.drop
    }

    /// Last widget pressed.
    #[must_use]
    pub const fn last_click(&self) -> Option<WidgetId> {
        self.last_click
    }

    /// Legal moves of the hovered piece.
    #[must_use]
    pub const fn moves(&self) -> &MoveSet {
        &self.moves
    }

    /// Pointer bookkeeping.
    #[must_use]
    pub const fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Current frame timestamp.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// A node, if live.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&Node> {
        self.graph.get(id)
    }

    /// Current geometry of a widget.
    #[must_use]
    pub fn geometry(&self, id: WidgetId) -> Option<Geometry> {
        self.graph.get(id).map(|n| *n.geometry())
    }

    /// Parent of a widget.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.graph.parent(id)
    }

    /// Children of a widget in draw order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.graph.children(id).collect()
    }

    /// Move flags of a zone.
    #[must_use]
    pub fn zone_flags(&self, id: WidgetId) -> Option<ZoneFlags> {
        self.graph.get(id).and_then(|n| n.kind().zone())
    }

    /// Number of widgets, roots excluded.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.graph.len() - 2
    }

    /// Returns true if `id` is live.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.graph.contains(id)
    }

    pub(crate) fn node(&self, id: WidgetId) -> EngineResult<&Node> {
        self.graph.get(id).ok_or(EngineError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> EngineResult<&mut Node> {
        self.graph.get_mut(id).ok_or(EngineError::UnknownWidget(id))
    }

    /// Delivers a callback to the widget and then the script host.
    pub(crate) fn fire(&mut self, id: WidgetId, callback: Callback, other: Option<WidgetId>) {
        let Some(node) = self.graph.get_mut(id) else {
            return;
        };
        node.notify(callback, other);
        self.host.invoke(id, callback, other);
        tracing::trace!("{} fired on {}", callback.name(), id);
    }
}

fn number_property(key: &str, value: &Value) -> EngineResult<f64> {
    value
        .as_number()
        .ok_or_else(|| WidgetError::property(key, "expected a number").into())
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for InteractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionEngine")
            .field("state", &self.state)
            .field("widgets", &self.widget_count())
            .field("hover", &self.hover)
            .field("drop", &self.drop)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawList, RenderCommand};
    use crate::widget::{Button, Meeple, Panel, Team, Tile};
    use crate::work::InlinePool;

    fn board() -> (InteractionEngine, WidgetId, WidgetId, WidgetId) {
        let mut engine = InteractionEngine::default();
        let a = engine.spawn_zone(Tile::new(), Tile::at(100.0, 100.0)).unwrap();
        let b = engine.spawn_zone(Tile::new(), Tile::at(300.0, 100.0)).unwrap();
        let p = engine
            .spawn_piece(a, Meeple::new(Team::Red), Meeple::at(100.0, 100.0))
            .unwrap();
        (engine, a, b, p)
    }

    #[test]
    fn test_spawn_enforces_nesting() {
        let (mut engine, a, _, p) = board();
        let frame = engine.spawn_frame(Panel, Geometry::at(50.0, 50.0, 40.0, 20.0)).unwrap();

        assert!(matches!(
            engine.spawn_piece(frame, Meeple::default(), Meeple::at(0.0, 0.0)),
            Err(EngineError::WrongParent { .. })
        ));
        assert!(matches!(
            engine.spawn_control(a, Button::new("x"), Geometry::at(0.0, 0.0, 1.0, 1.0)),
            Err(EngineError::WrongParent { .. })
        ));
        assert!(engine.spawn_control(frame, Button::new("ok"), Geometry::at(0.0, 0.0, 10.0, 5.0)).is_ok());
        assert_eq!(engine.parent(p), Some(a));
        assert_eq!(engine.widget_count(), 5);
    }

    #[test]
    fn test_kind_defaults_applied() {
        let (engine, a, _, p) = board();
        assert_eq!(engine.geometry(a).unwrap().c, 1.0);
        assert!(engine.get(p).unwrap().draggable());
        assert!(!engine.get(a).unwrap().draggable());
        assert!(engine.get(a).unwrap().snappable());
    }

    #[test]
    fn test_spawn_replaces_camera_factor() {
        let (mut engine, _, _, _) = board();
        let pinned = Geometry {
            c: 1.0,
            ..Geometry::at(50.0, 50.0, 40.0, 20.0)
        };
        let frame = engine.spawn_frame(Panel, pinned).unwrap();
        assert_eq!(engine.geometry(frame).unwrap().c, 0.0);

        engine.set_geometry(frame, pinned).unwrap();
        assert_eq!(engine.geometry(frame).unwrap().c, 1.0);
    }

    #[test]
    fn test_traversal_order() {
        let (mut engine, a, b, p) = board();
        let frame = engine.spawn_frame(Panel, Geometry::at(0.0, 0.0, 5.0, 5.0)).unwrap();
        let button = engine.spawn_control(frame, Button::new("b"), Geometry::at(0.0, 0.0, 5.0, 5.0)).unwrap();
        let q = engine.spawn_piece(b, Meeple::default(), Meeple::at(300.0, 100.0)).unwrap();

        assert_eq!(engine.traversal(), vec![a, b, p, q, frame, button]);
    }

    #[test]
    fn test_pick_hits_topmost() {
        let (mut engine, a, b, p) = board();

        assert_eq!(engine.pick(100.0, 100.0), Some(p));
        assert_eq!(engine.pick(145.0, 145.0), Some(a));
        assert_eq!(engine.pick(300.0, 100.0), Some(b));
        assert_eq!(engine.pick(-500.0, 0.0), None);
    }

    #[test]
    fn test_pick_follows_camera() {
        let (mut engine, a, _, _) = board();
        engine.set_camera(Geometry {
            x: 1000.0,
            ..Geometry::IDENTITY
        });

        assert_eq!(engine.pick(145.0, 145.0), None);
        assert_eq!(engine.pick(1145.0, 145.0), Some(a));
    }

    #[test]
    fn test_reorder_changes_stacking() {
        let mut engine = InteractionEngine::default();
        let a = engine.spawn_zone(Tile::new(), Tile::at(0.0, 0.0)).unwrap();
        let b = engine.spawn_zone(Tile::new(), Tile::at(10.0, 0.0)).unwrap();

        assert_eq!(engine.pick(5.0, 0.0), Some(b));
        engine.reorder(b, Some(a)).unwrap();
        assert_eq!(engine.pick(5.0, 0.0), Some(a));
        assert_eq!(engine.reorder(engine.board(), None), Err(EngineError::Root(engine.board())));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let (mut engine, a, b, p) = board();
        engine.destroy(a).unwrap();

        assert!(!engine.contains(a));
        assert!(!engine.contains(p));
        assert_eq!(engine.children(engine.board()), vec![b]);
        assert_eq!(engine.destroy(a), Err(EngineError::UnknownWidget(a)));
        assert_eq!(engine.destroy(engine.hud()), Err(EngineError::Root(engine.hud())));
    }

    #[test]
    fn test_properties() {
        let (mut engine, a, _, p) = board();

        assert_eq!(engine.property(p, "team").unwrap(), Value::from("red"));
        assert_eq!(engine.property(p, "type").unwrap(), Value::from("meeple"));
        assert_eq!(engine.property(a, "width").unwrap(), Value::Number(100.0));

        engine.set_property(a, "x", Value::Number(7.0)).unwrap();
        assert_eq!(engine.geometry(a).unwrap().x, 7.0);

        engine.set_property(a, "owner", Value::from("alice")).unwrap();
        assert_eq!(engine.property(a, "owner").unwrap(), Value::from("alice"));
        assert_eq!(engine.property(a, "missing").unwrap(), Value::Nil);

        assert!(engine.set_property(a, "y", Value::from("up")).is_err());
        assert!(engine.set_property(a, "type", Value::from("x")).is_err());
    }

    #[test]
    fn test_screen_to_local() {
        let (mut engine, a, _, _) = board();
        engine.set_camera(Geometry {
            sx: 2.0,
            sy: 2.0,
            ..Geometry::IDENTITY
        });

        let (x, y) = engine.screen_to_local(a, 210.0, 200.0).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_work_advances_tweens() {
        let (mut engine, a, _, _) = board();
        engine.push_geometry(a, Tile::at(200.0, 100.0), 1.0).unwrap();

        engine.begin_frame(1.0);
        let report = engine.step_work(&InlinePool);

        assert!(report.is_clean());
        assert_eq!(report.completed, engine.widget_count() + 2 + 1);
        assert_eq!(engine.geometry(a).unwrap().x, 200.0);
    }

    #[test]
    fn test_keyframe_queue_overflow_reported() {
        let config = EngineConfig {
            max_pending_keyframes: 1,
            ..EngineConfig::default()
        };
        let mut engine = InteractionEngine::new(config);
        let a = engine.spawn_zone(Tile::new(), Tile::at(0.0, 0.0)).unwrap();

        let k = Keyframe::new(Tile::at(10.0, 0.0), 1.0);
        assert!(engine.enqueue_keyframe(a, k).is_ok());
        assert!(matches!(engine.enqueue_keyframe(a, k), Err(EngineError::Tween(_))));
    }

    #[test]
    fn test_draw_order_and_overlay() {
        let (mut engine, _, _, _) = board();
        let mut list = DrawList::new();
        engine.draw(&mut list);
        let transforms = list
            .commands()
            .iter()
            .filter(|c| matches!(c, RenderCommand::Transform(_)))
            .count();
        assert_eq!(transforms, 3);

        engine.handle_event(&crate::input::InputEvent::FocusLost);
        list.begin_frame();
        engine.draw(&mut list);
        assert!(matches!(list.commands().last(), Some(RenderCommand::Screen { .. })));
    }
}
