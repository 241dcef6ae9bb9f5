//! # Move Validation
//!
//! While a piece is hovered the script host is asked which zones it may move
//! to. Those zones are flagged (and optionally highlighted or made snappable)
//! until the hover ends. Dropping the piece on a zone then resolves to one of:
//!
//! ```text
//!   origin zone, not listed ──► home     (nothing happens)
//!   flagged zone             ──► valid    (reparent, tween, notify)
//!   anything else            ──► invalid  (notify, piece returns)
//! ```

use tabula_core::WidgetId;

use crate::engine::InteractionEngine;
use crate::widget::{Callback, Kind, ZoneFlags};

/// Legal destinations of the hovered piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSet {
    piece: Option<WidgetId>,
    origin: Option<WidgetId>,
    listed: Vec<WidgetId>,
}

/// How a drop resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Back onto the originating zone.
    Home,
    /// Onto a legal zone.
    Valid,
    /// Onto a zone that is not legal.
    Invalid,
}

impl MoveSet {
    /// Creates the set for `piece` sitting in `origin`.
    #[must_use]
    pub fn new(piece: WidgetId, origin: WidgetId, listed: Vec<WidgetId>) -> Self {
        Self {
            piece: Some(piece),
            origin: Some(origin),
            listed,
        }
    }

    /// The piece the set was computed for.
    #[must_use]
    pub const fn piece(&self) -> Option<WidgetId> {
        self.piece
    }

    /// The zone the piece sat in when queried.
    #[must_use]
    pub const fn origin(&self) -> Option<WidgetId> {
        self.origin
    }

    /// Zones returned by the rule callback, in order.
    #[must_use]
    pub fn listed(&self) -> &[WidgetId] {
        &self.listed
    }

    /// Returns true if a piece is being tracked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.piece.is_some()
    }

    /// Classifies a drop on `zone` given that zone's flags.
    #[must_use]
    pub fn classify(&self, zone: WidgetId, flags: ZoneFlags, notify_home: bool) -> DropOutcome {
        if !notify_home && self.origin == Some(zone) && !self.listed.contains(&zone) {
            DropOutcome::Home
        } else if flags.valid_move {
            DropOutcome::Valid
        } else {
            DropOutcome::Invalid
        }
    }
}

impl InteractionEngine {
    /// Asks the host for the legal zones of `piece` and flags them.
    pub(crate) fn query_moves(&mut self, piece: WidgetId) {
        let Some(&Kind::Piece { zone: origin }) = self.graph.get(piece).map(|n| n.kind()) else {
            return;
        };
        if self.moves.is_active() {
            self.reset_moves();
        }

        let listed = self.host.moves(piece, origin).unwrap_or_default();
        let mut legal: Vec<WidgetId> = Vec::with_capacity(listed.len() + 1);
        for &zone in &listed {
            let is_zone = self.graph.get(zone).is_some_and(|n| n.kind().zone().is_some());
            if !is_zone {
                tracing::warn!("rule callback returned {zone} for {piece}, which is not a live zone");
            } else if !legal.contains(&zone) {
                legal.push(zone);
            }
        }
        if self.config.notify_home_zone && !legal.contains(&origin) {
            legal.push(origin);
        }
        self.moves = MoveSet::new(piece, origin, listed);

        tracing::debug!("{piece} has {} legal zones", legal.len());
        for zone in legal {
            self.mark_legal(zone, piece);
        }
    }

    fn mark_legal(&mut self, zone: WidgetId, piece: WidgetId) {
        let auto_highlight = self.config.auto_highlight;
        let auto_snap = self.config.auto_snap;
        let Some(node) = self.graph.get_mut(zone) else {
            return;
        };
        let Kind::Zone(flags) = &mut node.kind else {
            return;
        };

        flags.valid_move = true;
        let highlight = auto_highlight && !flags.highlighted;
        if highlight {
            flags.highlighted = true;
        }
        if auto_snap {
            node.snappable = true;
        }
        if highlight {
            self.fire(zone, Callback::HighlightStart, Some(piece));
        }
    }

    /// Clears every zone's move flags and drops the move set.
    pub(crate) fn reset_moves(&mut self) {
        self.reset_moves_except(&[]);
    }

    /// As [`Self::reset_moves`], without hooks for zones in `skip`.
    pub(crate) fn reset_moves_except(&mut self, skip: &[WidgetId]) {
        let zones: Vec<WidgetId> = self.graph.children(self.board).collect();
        let mut unlit = Vec::new();
        for zone in zones {
            let Some(node) = self.graph.get_mut(zone) else {
                continue;
            };
            if let Kind::Zone(flags) = &mut node.kind {
                if flags.highlighted && !skip.contains(&zone) {
                    unlit.push(zone);
                }
                *flags = ZoneFlags::default();
                node.snappable = node.default_snappable;
            }
        }
        self.moves = MoveSet::default();

        for zone in unlit {
            self.fire(zone, Callback::HighlightEnd, None);
        }
    }

    /// The zone a drop on `target` counts for: the zone itself, or the zone
    /// holding a piece. HUD widgets have none.
    pub(crate) fn drop_zone(&self, target: WidgetId) -> Option<WidgetId> {
        match self.graph.get(target).map(|n| *n.kind()) {
            Some(Kind::Zone(_)) => Some(target),
            Some(Kind::Piece { zone }) => Some(zone),
            _ => None,
        }
    }

    /// Marks the legal zone behind drop target `target` as the one a held
    /// piece is over.
    pub(crate) fn set_nominated(&mut self, target: WidgetId, nominated: bool) {
        let Some(zone) = self.drop_zone(target) else {
            return;
        };
        if let Some(Kind::Zone(flags)) = self.graph.get_mut(zone).map(|n| &mut n.kind) {
            flags.nominated = nominated && flags.valid_move;
        }
    }

    /// Validates a piece dropped on `target` and executes the move if legal.
    pub(crate) fn resolve_drop(&mut self, piece: WidgetId, target: WidgetId) {
        let Some(zone) = self.drop_zone(target) else {
            return;
        };
        if self.moves.piece() != Some(piece) {
            self.query_moves(piece);
        }
        let Some(flags) = self.graph.get(zone).and_then(|n| n.kind().zone()) else {
            return;
        };

        match self.moves.classify(zone, flags, self.config.notify_home_zone) {
            DropOutcome::Home => tracing::debug!("{piece} dropped back on its own zone"),
            DropOutcome::Valid => self.execute_move(piece, zone),
            DropOutcome::Invalid => {
                tracing::warn!("illegal move of {piece} to {zone}");
                self.host.invalid_move(piece, zone);
            }
        }
    }

    fn execute_move(&mut self, piece: WidgetId, zone: WidgetId) {
        let from = self.moves.origin();
        if let Err(e) = self.graph.reparent(piece, zone) {
            tracing::warn!("cannot move {piece} to {zone}: {e}");
            return;
        }

        let now = self.now;
        let arrival = now + self.config.move_time;
        let Some(destination) = self.graph.get(zone).map(|n| n.destination()) else {
            return;
        };
        if let Some(node) = self.graph.get_mut(piece) {
            node.kind = Kind::Piece { zone };
            let g = *node.geometry();
            let target = destination.with_half_extents(g.hw, g.hh).with_camera(g.c);
            node.tween.interrupt(now);
            node.tween.push(target, arrival, now);
        }

        match from {
            Some(from) => tracing::info!("moved {piece} from {from} to {zone}"),
            None => tracing::info!("moved {piece} to {zone}"),
        }
        self.host.valid_move(piece, zone);
        self.reset_moves();
        if self.hover == Some(piece) {
            self.query_moves(piece);
        }
    }
}
