//! # Interaction Flow Tests
//!
//! Drives a small board (two tiles, one meeple, a HUD button) through whole
//! pointer gestures and checks the callbacks the game side observes.
//!
//! Run with: cargo test --package tabula_ui --test interaction_flows

use std::sync::Arc;

use parking_lot::Mutex;
use tabula_core::{Geometry, WidgetId};
use tabula_ui::{
    Button, Callback, DrawList, EngineConfig, InlinePool, InputEvent, InteractionEngine, InteractionState,
    Meeple, MouseButton, Panel, RenderCommand, ScriptHost, Team, Tile, ZoneFlags,
};

// ============================================================================
// HARNESS
// ============================================================================

#[derive(Default)]
struct Log {
    callbacks: Vec<(WidgetId, Callback, Option<WidgetId>)>,
    legal: Vec<WidgetId>,
    queries: usize,
    valid: Vec<(WidgetId, WidgetId)>,
    invalid: Vec<(WidgetId, WidgetId)>,
    destroyed: Vec<WidgetId>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Log>>);

impl Recorder {
    fn count(&self, widget: WidgetId, callback: Callback) -> usize {
        self.0
            .lock()
            .callbacks
            .iter()
            .filter(|(w, c, _)| *w == widget && *c == callback)
            .count()
    }

    fn set_legal(&self, zones: Vec<WidgetId>) {
        self.0.lock().legal = zones;
    }
}

impl ScriptHost for Recorder {
    fn invoke(&mut self, widget: WidgetId, callback: Callback, other: Option<WidgetId>) {
        self.0.lock().callbacks.push((widget, callback, other));
    }

    fn moves(&mut self, _piece: WidgetId, _zone: WidgetId) -> Option<Vec<WidgetId>> {
        let mut log = self.0.lock();
        log.queries += 1;
        Some(log.legal.clone())
    }

    fn valid_move(&mut self, piece: WidgetId, zone: WidgetId) {
        self.0.lock().valid.push((piece, zone));
    }

    fn invalid_move(&mut self, piece: WidgetId, zone: WidgetId) {
        self.0.lock().invalid.push((piece, zone));
    }

    fn widget_destroyed(&mut self, widget: WidgetId) {
        self.0.lock().destroyed.push(widget);
    }
}

struct Table {
    engine: InteractionEngine,
    log: Recorder,
    a: WidgetId,
    b: WidgetId,
    p: WidgetId,
    t: f64,
}

impl Table {
    fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    fn with_config(config: EngineConfig) -> Self {
        let log = Recorder::default();
        let mut engine = InteractionEngine::with_host(config, log.clone());
        let a = engine.spawn_zone(Tile::new(), Tile::at(100.0, 100.0)).unwrap();
        let b = engine.spawn_zone(Tile::new(), Tile::at(300.0, 100.0)).unwrap();
        let p = engine
            .spawn_piece(a, Meeple::new(Team::Blue), Meeple::at(100.0, 100.0))
            .unwrap();
        Self {
            engine,
            log,
            a,
            b,
            p,
            t: 0.0,
        }
    }

    /// One frame `dt` seconds after the last, with `events` delivered first.
    fn step(&mut self, dt: f64, events: &[InputEvent]) {
        self.t += dt;
        self.engine.begin_frame(self.t);
        for event in events {
            self.engine.handle_event(event);
        }
        self.engine.update();
        let report = self.engine.step_work(&InlinePool);
        assert!(report.is_clean());
    }

    fn count(&self, widget: WidgetId, callback: Callback) -> usize {
        self.log.count(widget, callback)
    }

    /// Hovers the meeple, presses it and waits out the drag threshold.
    fn pick_up(&mut self) {
        self.step(0.02, &[move_to(100.0, 100.0)]);
        self.step(0.02, &[down(100.0, 100.0, MouseButton::Left)]);
        self.step(0.25, &[]);
    }
}

fn move_to(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove { x, y }
}

fn down(x: f64, y: f64, button: MouseButton) -> InputEvent {
    InputEvent::PointerDown { x, y, button }
}

fn up(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp {
        x,
        y,
        button: MouseButton::Left,
    }
}

// ============================================================================
// HOVER AND CLICK
// ============================================================================

#[test]
fn test_hover_queries_and_highlights_moves() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.step(0.02, &[move_to(100.0, 100.0)]);
    assert_eq!(table.engine.state(), InteractionState::Hover);
    assert_eq!(table.engine.hover(), Some(table.p));
    assert_eq!(table.count(table.p, Callback::HoverStart), 1);

    let flags = table.engine.zone_flags(table.b).unwrap();
    assert!(flags.valid_move);
    assert!(flags.highlighted);
    assert_eq!(table.count(table.b, Callback::HighlightStart), 1);

    table.step(0.02, &[move_to(600.0, 600.0)]);
    assert_eq!(table.engine.state(), InteractionState::Idle);
    assert_eq!(table.count(table.p, Callback::HoverEnd), 1);
    assert_eq!(table.count(table.b, Callback::HighlightEnd), 1);
    assert_eq!(table.engine.zone_flags(table.b).unwrap(), ZoneFlags::default());
    assert!(!table.engine.moves().is_active());
}

#[test]
fn test_click_without_drag() {
    let mut table = Table::new();

    table.step(0.02, &[move_to(100.0, 100.0)]);
    table.step(0.02, &[down(100.0, 100.0, MouseButton::Left)]);
    assert_eq!(table.engine.state(), InteractionState::PreDragThreshold);
    table.step(0.05, &[up(100.0, 100.0)]);

    assert_eq!(table.count(table.p, Callback::LeftClick), 1);
    assert_eq!(table.count(table.p, Callback::LeftRelease), 1);
    assert_eq!(table.count(table.p, Callback::DragStart), 0);
    assert_eq!(table.engine.state(), InteractionState::Hover);
    assert_eq!(table.engine.last_click(), Some(table.p));
}

#[test]
fn test_click_off_on_next_press() {
    let mut table = Table::new();

    table.step(0.02, &[move_to(100.0, 100.0)]);
    table.step(0.02, &[down(100.0, 100.0, MouseButton::Left)]);
    table.step(0.02, &[up(100.0, 100.0)]);
    table.step(0.02, &[down(600.0, 600.0, MouseButton::Left)]);

    assert_eq!(table.count(table.p, Callback::ClickOff), 1);
    assert_eq!(table.engine.state(), InteractionState::EmptyDrag);
    assert_eq!(table.engine.last_click(), None);
}

#[test]
fn test_right_click() {
    let mut table = Table::new();

    table.step(0.02, &[move_to(300.0, 100.0)]);
    table.step(0.02, &[down(300.0, 100.0, MouseButton::Right)]);

    assert_eq!(table.count(table.b, Callback::RightClick), 1);
    assert_eq!(table.engine.state(), InteractionState::Hover);
}

#[test]
fn test_hold_on_undraggable_control() {
    let mut table = Table::new();
    let frame = table
        .engine
        .spawn_frame(Panel, Geometry::at(500.0, 500.0, 100.0, 50.0))
        .unwrap();
    let button = table
        .engine
        .spawn_control(frame, Button::new("End turn"), Geometry::at(500.0, 500.0, 40.0, 20.0))
        .unwrap();

    table.step(0.02, &[move_to(500.0, 500.0)]);
    assert_eq!(table.engine.hover(), Some(button));
    table.step(0.02, &[down(500.0, 500.0, MouseButton::Left)]);
    table.step(0.25, &[]);
    assert_eq!(table.engine.state(), InteractionState::PostDragThreshold);
    assert_eq!(table.count(button, Callback::LeftClick), 1);

    table.step(0.02, &[]);
    assert!(table.count(button, Callback::LeftHeld) >= 2);

    table.step(0.02, &[up(500.0, 500.0)]);
    assert_eq!(table.count(button, Callback::LeftClick), 1);
    assert_eq!(table.count(button, Callback::LeftRelease), 1);
    assert_eq!(table.count(button, Callback::DragStart), 0);
    assert_eq!(table.engine.state(), InteractionState::Hover);
}

// ============================================================================
// DRAG AND DROP
// ============================================================================

#[test]
fn test_drag_onto_legal_zone_moves_piece() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    assert_eq!(table.engine.state(), InteractionState::ToDrag);
    assert_eq!(table.count(table.p, Callback::DragStart), 1);

    table.step(0.02, &[move_to(300.0, 100.0)]);
    assert_eq!(table.engine.state(), InteractionState::ToSnap);
    assert_eq!(table.engine.drop_target(), Some(table.b));
    assert!(table.engine.zone_flags(table.b).unwrap().nominated);

    table.step(0.2, &[]);
    assert_eq!(table.engine.state(), InteractionState::Snap);

    table.step(0.02, &[up(300.0, 100.0)]);
    table.step(0.5, &[]);

    assert_eq!(table.count(table.p, Callback::DragStart), 1);
    assert_eq!(table.count(table.b, Callback::DropStart), 1);
    assert_eq!(table.count(table.b, Callback::DropEnd), 1);
    assert_eq!(table.count(table.p, Callback::DragEndDrop), 1);
    assert_eq!(table.count(table.p, Callback::DragEndNoDrop), 0);
    assert_eq!(table.log.0.lock().valid, vec![(table.p, table.b)]);
    assert!(table.log.0.lock().invalid.is_empty());

    assert_eq!(table.engine.parent(table.p), Some(table.b));
    assert!(table.engine.children(table.a).is_empty());
    let g = table.engine.geometry(table.p).unwrap();
    assert!((g.x - 300.0).abs() < 1e-9);
    assert!(g.dx.abs() < 1e-9);
}

#[test]
fn test_drop_onto_piece_counts_for_its_zone() {
    let mut table = Table::new();
    let q = table
        .engine
        .spawn_piece(table.b, Meeple::new(Team::Red), Meeple::at(300.0, 100.0))
        .unwrap();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    assert_eq!(table.engine.drop_target(), Some(q));
    assert!(table.engine.zone_flags(table.b).unwrap().nominated);
    assert_eq!(table.count(q, Callback::DropStart), 1);

    table.step(0.2, &[]);
    table.step(0.02, &[up(300.0, 100.0)]);
    table.step(0.5, &[]);

    assert_eq!(table.count(q, Callback::DropEnd), 1);
    assert_eq!(table.count(table.p, Callback::DragEndDrop), 1);
    assert_eq!(table.log.0.lock().valid, vec![(table.p, table.b)]);
    assert_eq!(table.engine.parent(table.p), Some(table.b));
    assert_eq!(table.engine.parent(q), Some(table.b));
    assert!(!table.engine.zone_flags(table.b).unwrap().nominated);
}

#[test]
fn test_valid_move_requeries_from_new_zone() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    table.step(0.2, &[]);
    assert_eq!(table.log.0.lock().queries, 1);

    // From b the only legal step leads back to a.
    table.log.set_legal(vec![table.a]);
    table.step(0.02, &[up(300.0, 100.0)]);

    assert_eq!(table.engine.parent(table.p), Some(table.b));
    assert_eq!(table.engine.hover(), Some(table.p));
    assert_eq!(table.log.0.lock().queries, 2);

    let moves = table.engine.moves();
    assert_eq!(moves.piece(), Some(table.p));
    assert_eq!(moves.origin(), Some(table.b));
    assert_eq!(moves.listed().to_vec(), vec![table.a]);

    let a = table.engine.zone_flags(table.a).unwrap();
    assert!(a.valid_move && a.highlighted);
    assert_eq!(table.count(table.a, Callback::HighlightStart), 1);
    assert_eq!(table.count(table.b, Callback::HighlightEnd), 1);
    assert_eq!(table.engine.zone_flags(table.b).unwrap(), ZoneFlags::default());
}

#[test]
fn test_drag_onto_illegal_zone_returns_piece() {
    let mut table = Table::new();
    table.log.set_legal(Vec::new());

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    table.step(0.2, &[]);
    table.step(0.02, &[up(300.0, 100.0)]);
    table.step(0.5, &[]);

    assert_eq!(table.log.0.lock().invalid, vec![(table.p, table.b)]);
    assert!(table.log.0.lock().valid.is_empty());
    assert_eq!(table.engine.parent(table.p), Some(table.a));
    let g = table.engine.geometry(table.p).unwrap();
    assert!((g.x + g.dx - 100.0).abs() < 1e-9);
}

#[test]
fn test_drop_on_home_zone_is_silent() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    table.step(0.02, &[move_to(120.0, 130.0)]);
    assert_eq!(table.engine.drop_target(), Some(table.a));
    table.step(0.2, &[up(120.0, 130.0)]);

    assert_eq!(table.count(table.p, Callback::DragEndDrop), 1);
    assert!(table.log.0.lock().valid.is_empty());
    assert!(table.log.0.lock().invalid.is_empty());
    assert_eq!(table.engine.parent(table.p), Some(table.a));
}

#[test]
fn test_drag_into_empty_space() {
    let mut table = Table::new();

    table.pick_up();
    table.step(0.02, &[move_to(700.0, 700.0)]);
    table.step(0.2, &[]);
    assert_eq!(table.engine.state(), InteractionState::Drag);
    assert_eq!(table.engine.drop_target(), None);

    let g = table.engine.geometry(table.p).unwrap();
    assert!((g.x + g.dx - 700.0).abs() < 1e-9);

    table.step(0.02, &[up(700.0, 700.0)]);
    assert_eq!(table.count(table.p, Callback::DragEndNoDrop), 1);
    assert_eq!(table.count(table.p, Callback::DragEndDrop), 0);

    table.step(0.5, &[]);
    let g = table.engine.geometry(table.p).unwrap();
    assert!((g.x + g.dx - 100.0).abs() < 1e-9);
}

#[test]
fn test_unsnappable_zone_is_followed_not_snapped() {
    let mut table = Table::new();
    table.engine.set_snappable(table.b, false).unwrap();

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    assert_eq!(table.engine.drop_target(), Some(table.b));
    assert_eq!(table.engine.state(), InteractionState::ToDrag);
    table.step(0.2, &[]);
    assert_eq!(table.engine.state(), InteractionState::Drag);
}

#[test]
fn test_auto_snap_makes_legal_zones_snappable() {
    let config = EngineConfig::from_toml_str("auto_snap = true\nauto_highlight = false").unwrap();
    let mut table = Table::with_config(config);
    table.engine.set_snappable(table.b, false).unwrap();
    table.log.set_legal(vec![table.b]);

    table.step(0.02, &[move_to(100.0, 100.0)]);
    assert!(table.engine.get(table.b).unwrap().snappable());
    assert!(!table.engine.zone_flags(table.b).unwrap().highlighted);
    assert_eq!(table.count(table.b, Callback::HighlightStart), 0);

    table.step(0.02, &[move_to(600.0, 600.0)]);
    assert!(!table.engine.get(table.b).unwrap().snappable());
}

// ============================================================================
// FOCUS
// ============================================================================

#[test]
fn test_focus_lost_mid_drag() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    let hover_starts = table.count(table.p, Callback::HoverStart);

    table.step(0.02, &[InputEvent::FocusLost]);
    assert_eq!(table.engine.state(), InteractionState::Suspended);
    assert_eq!(table.count(table.p, Callback::DragEndNoDrop), 1);
    assert_eq!(table.count(table.p, Callback::DragEndDrop), 0);
    assert_eq!(table.count(table.b, Callback::DropEnd), 1);
    assert_eq!(table.count(table.p, Callback::HoverEnd), 1);
    assert_eq!(table.engine.drop_target(), None);

    // Input is ignored until focus returns.
    table.step(0.02, &[down(100.0, 100.0, MouseButton::Left), up(100.0, 100.0)]);
    table.step(0.5, &[]);
    assert_eq!(table.engine.state(), InteractionState::Suspended);
    assert_eq!(table.count(table.p, Callback::LeftClick), 0);
    assert_eq!(table.count(table.p, Callback::HoverStart), hover_starts);

    table.engine.handle_event(&InputEvent::FocusGained);
    assert_eq!(table.engine.state(), InteractionState::Idle);
    assert_eq!(table.count(table.p, Callback::HoverStart), hover_starts);
    assert_eq!(table.count(table.p, Callback::LeftClick), 0);
    assert!(table.log.0.lock().valid.is_empty());
}

#[test]
fn test_focus_lost_before_threshold_cancels_press() {
    let mut table = Table::new();

    table.step(0.02, &[move_to(100.0, 100.0)]);
    table.step(0.02, &[down(100.0, 100.0, MouseButton::Left)]);
    assert_eq!(table.engine.state(), InteractionState::PreDragThreshold);

    table.step(0.02, &[InputEvent::FocusLost]);
    assert_eq!(table.engine.state(), InteractionState::Suspended);
    assert_eq!(table.count(table.p, Callback::HoverEnd), 1);

    table.step(0.5, &[]);
    table.step(0.02, &[InputEvent::FocusGained]);
    assert_eq!(table.engine.state(), InteractionState::Hover);
    for callback in [
        Callback::LeftClick,
        Callback::LeftRelease,
        Callback::LeftHeld,
        Callback::DragStart,
        Callback::DragEndNoDrop,
    ] {
        assert_eq!(table.count(table.p, callback), 0, "{}", callback.name());
    }
}

#[test]
fn test_focus_lost_while_holding_control_releases_it() {
    let mut table = Table::new();
    let frame = table
        .engine
        .spawn_frame(Panel, Geometry::at(500.0, 500.0, 100.0, 50.0))
        .unwrap();
    let button = table
        .engine
        .spawn_control(frame, Button::new("End turn"), Geometry::at(500.0, 500.0, 40.0, 20.0))
        .unwrap();

    table.step(0.02, &[move_to(500.0, 500.0)]);
    table.step(0.02, &[down(500.0, 500.0, MouseButton::Left)]);
    table.step(0.25, &[]);
    assert_eq!(table.engine.state(), InteractionState::PostDragThreshold);

    table.step(0.02, &[InputEvent::FocusLost]);
    assert_eq!(table.engine.state(), InteractionState::Suspended);
    assert_eq!(table.count(button, Callback::LeftClick), 1);
    assert_eq!(table.count(button, Callback::LeftRelease), 1);
    assert_eq!(table.count(button, Callback::HoverEnd), 1);

    // The real release arrives while suspended and is ignored.
    table.step(0.02, &[up(500.0, 500.0)]);
    assert_eq!(table.count(button, Callback::LeftRelease), 1);
    assert_eq!(table.count(button, Callback::LeftClick), 1);
}

#[test]
fn test_focus_regained_restores_hover() {
    let mut table = Table::new();

    table.step(0.02, &[move_to(100.0, 100.0)]);
    table.step(0.02, &[InputEvent::FocusLost]);
    table.step(0.02, &[InputEvent::FocusGained]);

    assert_eq!(table.engine.state(), InteractionState::Hover);
    assert_eq!(table.count(table.p, Callback::HoverStart), 2);
    assert_eq!(table.count(table.p, Callback::HoverEnd), 1);
}

// ============================================================================
// DRAWING
// ============================================================================

#[test]
fn test_held_piece_drawn_above_hud() {
    let mut table = Table::new();
    table
        .engine
        .spawn_frame(Panel, Geometry::at(500.0, 500.0, 100.0, 50.0))
        .unwrap();
    let mut list = DrawList::new();

    table.engine.draw(&mut list);
    assert!(matches!(list.commands().last(), Some(RenderCommand::RectOutline { .. })));

    table.pick_up();
    assert!(table.engine.state().is_drag_family());
    list.begin_frame();
    table.engine.draw(&mut list);
    assert!(matches!(list.commands().last(), Some(RenderCommand::Circle { .. })));
}

// ============================================================================
// CAMERA
// ============================================================================

#[test]
fn test_empty_drag_pans_camera() {
    let mut table = Table::new();

    table.step(0.02, &[down(600.0, 600.0, MouseButton::Left)]);
    assert_eq!(table.engine.state(), InteractionState::EmptyDrag);
    table.step(0.02, &[move_to(650.0, 620.0)]);
    assert_eq!(table.engine.camera().x, 50.0);
    assert_eq!(table.engine.camera().y, 20.0);

    table.step(0.02, &[up(650.0, 620.0)]);
    assert_eq!(table.engine.state(), InteractionState::Idle);

    // The board moved with the camera.
    assert_eq!(table.engine.pick(150.0, 120.0), Some(table.p));
}

#[test]
fn test_wheel_zoom_is_clamped() {
    let mut table = Table::new();

    table.step(0.02, &[InputEvent::Wheel { dz: 10.0 }]);
    assert!((table.engine.camera().sx - 1.1).abs() < 1e-9);

    table.step(0.02, &[InputEvent::Wheel { dz: -1000.0 }]);
    assert_eq!(table.engine.camera().sx, table.engine.config().min_camera_scale);
    assert_eq!(table.engine.camera().sy, table.engine.config().min_camera_scale);
}

// ============================================================================
// DESTRUCTION
// ============================================================================

#[test]
fn test_destroy_held_piece() {
    let mut table = Table::new();
    table.log.set_legal(vec![table.b]);

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    table.engine.destroy(table.p).unwrap();

    assert_eq!(table.engine.state(), InteractionState::Idle);
    assert_eq!(table.engine.hover(), None);
    assert_eq!(table.engine.drop_target(), None);
    assert_eq!(table.count(table.b, Callback::DropEnd), 1);
    assert_eq!(table.count(table.b, Callback::HighlightEnd), 1);
    assert_eq!(table.log.0.lock().destroyed, vec![table.p]);

    table.step(0.02, &[up(300.0, 100.0)]);
    table.step(0.02, &[]);
    assert_eq!(table.count(table.p, Callback::DragEndDrop), 0);
    assert_eq!(table.count(table.p, Callback::DragEndNoDrop), 0);
    assert_eq!(table.engine.hover(), Some(table.b));
}

#[test]
fn test_destroy_drop_target() {
    let mut table = Table::new();

    table.pick_up();
    table.step(0.02, &[move_to(300.0, 100.0)]);
    assert_eq!(table.engine.drop_target(), Some(table.b));

    table.engine.destroy(table.b).unwrap();
    assert_eq!(table.engine.drop_target(), None);
    assert_eq!(table.engine.state(), InteractionState::ToDrag);
    assert_eq!(table.count(table.b, Callback::DropEnd), 0);

    table.step(0.02, &[up(300.0, 100.0)]);
    assert_eq!(table.count(table.p, Callback::DragEndNoDrop), 1);
}

#[test]
fn test_destroy_zone_takes_its_pieces() {
    let mut table = Table::new();
    table.step(0.02, &[move_to(100.0, 100.0)]);

    table.engine.destroy(table.a).unwrap();
    let destroyed = table.log.0.lock().destroyed.clone();
    assert_eq!(destroyed, vec![table.p, table.a]);
    assert_eq!(table.engine.hover(), None);
    assert_eq!(table.engine.state(), InteractionState::Idle);

    table.step(0.02, &[]);
    assert_eq!(table.engine.hover(), None);
}
