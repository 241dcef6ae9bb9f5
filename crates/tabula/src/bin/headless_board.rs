//! # Headless Board
//!
//! Builds a 3x3 board with one meeple and an "End turn" button, replays a
//! scripted pointer session through the frame loop and prints what the game
//! side saw.
//!
//! The meeple may only step to orthogonally adjacent tiles.
//!
//! Usage: headless_board [engine.toml]

use std::sync::Arc;

use parking_lot::Mutex;
use tabula::ui::{
    Button, Callback, DrawList, EngineConfig, InputEvent, InteractionEngine, Meeple, MouseButton, Namespace,
    Panel, Team, Tile,
};
use tabula::{FrameLoop, FrameLoopConfig};
use tabula_core::{Geometry, WidgetId};

const GRID: usize = 3;
const SPACING: f64 = 110.0;
const ORIGIN: f64 = 100.0;
const FRAME_TIME: f64 = 1.0 / 60.0;

fn tile_center(index: usize) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let (col, row) = ((index % GRID) as f64, (index / GRID) as f64);
    (ORIGIN + col * SPACING, ORIGIN + row * SPACING)
}

fn neighbours(index: usize) -> Vec<usize> {
    let (col, row) = (index % GRID, index / GRID);
    let mut out = Vec::with_capacity(4);
    if col > 0 {
        out.push(index - 1);
    }
    if col + 1 < GRID {
        out.push(index + 1);
    }
    if row > 0 {
        out.push(index - GRID);
    }
    if row + 1 < GRID {
        out.push(index + GRID);
    }
    out
}

fn session() -> Vec<(u64, InputEvent)> {
    use InputEvent::{FocusGained, FocusLost, PointerDown, PointerMove, PointerUp};
    let left = MouseButton::Left;
    let (cx, cy) = tile_center(4);
    let (ex, ey) = tile_center(5);
    let (fx, fy) = tile_center(0);

    vec![
        // Legal move: centre to east.
        (1, PointerMove { x: cx, y: cy }),
        (3, PointerDown { x: cx, y: cy, button: left }),
        (25, PointerMove { x: ex, y: ey }),
        (45, PointerUp { x: ex, y: ey, button: left }),
        // Illegal move: east to the far corner.
        (70, PointerDown { x: ex, y: ey, button: left }),
        (95, PointerMove { x: fx, y: fy }),
        (115, PointerUp { x: fx, y: fy, button: left }),
        // HUD click.
        (140, PointerMove { x: 400.0, y: 40.0 }),
        (142, PointerDown { x: 400.0, y: 40.0, button: left }),
        (145, PointerUp { x: 400.0, y: 40.0, button: left }),
        // Focus round trip.
        (160, FocusLost),
        (170, FocusGained),
    ]
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("headless_board: {e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    println!("╔════════════════════════════════════════════╗");
    println!("║          TABULA HEADLESS BOARD             ║");
    println!("╚════════════════════════════════════════════╝");

    // =========================================================================
    // SCENE
    // =========================================================================
    let mut engine = InteractionEngine::new(config);
    let mut tiles = Vec::with_capacity(GRID * GRID);
    for index in 0..GRID * GRID {
        let (x, y) = tile_center(index);
        let team = if index % 2 == 0 { Team::Red } else { Team::Blue };
        #[allow(clippy::cast_possible_wrap)]
        let tile = Tile::new().with_team(team).with_tile_id(index as i64);
        match engine.spawn_zone(tile, Tile::at(x, y)) {
            Ok(id) => tiles.push(id),
            Err(e) => {
                eprintln!("headless_board: {e}");
                std::process::exit(1);
            }
        }
    }
    let (cx, cy) = tile_center(4);
    let spawned = engine
        .spawn_piece(tiles[4], Meeple::new(Team::Red), Meeple::at(cx, cy))
        .and_then(|meeple| {
            let frame = engine.spawn_frame(Panel, Geometry::at(400.0, 40.0, 120.0, 30.0))?;
            let button = engine.spawn_control(frame, Button::new("End turn"), Geometry::at(400.0, 40.0, 50.0, 18.0))?;
            Ok((meeple, button))
        });
    let (meeple, button) = match spawned {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("headless_board: {e}");
            std::process::exit(1);
        }
    };

    // =========================================================================
    // RULES
    // =========================================================================
    let log: Arc<Mutex<Vec<String>>> = Arc::default();
    let tile_index = {
        let tiles = tiles.clone();
        move |zone: WidgetId| tiles.iter().position(|&t| t == zone)
    };

    let mut rules = Namespace::new();
    {
        let tiles = tiles.clone();
        let tile_index = tile_index.clone();
        rules.on_moves(move |_piece, zone| {
            tile_index(zone)
                .map(|i| neighbours(i).into_iter().map(|n| tiles[n]).collect())
                .unwrap_or_default()
        });
    }
    {
        let log = Arc::clone(&log);
        let tile_index = tile_index.clone();
        rules.on_valid_move(move |_piece, zone| {
            log.lock().push(format!("valid move to tile {:?}", tile_index(zone)));
        });
    }
    {
        let log = Arc::clone(&log);
        let tile_index = tile_index.clone();
        rules.on_invalid_move(move |_piece, zone| {
            log.lock().push(format!("invalid move to tile {:?}", tile_index(zone)));
        });
    }
    for callback in [Callback::DragStart, Callback::DragEndDrop, Callback::DragEndNoDrop] {
        let log = Arc::clone(&log);
        rules.on(meeple, callback, move |_, _| log.lock().push(format!("meeple {}", callback.name())));
    }
    {
        let log = Arc::clone(&log);
        rules.on(button, Callback::LeftClick, move |_, _| log.lock().push("end turn".to_string()));
    }
    engine.set_host(Box::new(rules));

    // =========================================================================
    // SESSION
    // =========================================================================
    let mut frames = FrameLoop::new(engine, FrameLoopConfig::default());
    let sender = frames.sender();
    let script = session();
    let mut list = DrawList::new();
    let mut worst_us = 0;

    for frame in 1..=200 {
        for (_, event) in script.iter().filter(|(at, _)| *at == frame) {
            if let Err(e) = sender.send(*event) {
                eprintln!("headless_board: {e}");
            }
        }
        list.begin_frame();
        let stats = frames.tick(FRAME_TIME, &mut list);
        worst_us = worst_us.max(stats.total_us);
    }

    // =========================================================================
    // REPORT
    // =========================================================================
    println!();
    for line in log.lock().iter() {
        println!("  {line}");
    }

    let engine = frames.engine();
    let home = engine.parent(meeple).and_then(&tile_index);
    println!();
    println!("  meeple rests on tile {home:?}");
    println!("  final state         {}", engine.state());
    println!("  draw commands       {}", list.len());
    println!("  worst frame         {worst_us}us");
}
