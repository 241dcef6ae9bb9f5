//! Core widget types and traits.

use tabula_core::{Geometry, Tween, WidgetId};

use crate::error::WidgetError;
use crate::input::InputEvent;
use crate::render::Painter;
use crate::script::{Environment, Value};
use crate::style::Palette;

/// Named notifications delivered to widgets and the script host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// Pointer entered the widget.
    HoverStart,
    /// Pointer left the widget.
    HoverEnd,
    /// Primary button clicked.
    LeftClick,
    /// Primary button still held after the drag threshold.
    LeftHeld,
    /// Primary button released after a click.
    LeftRelease,
    /// Secondary button pressed.
    RightClick,
    /// Another widget (or nothing) was clicked after this one.
    ClickOff,
    /// Drag began.
    DragStart,
    /// Drag ended without a drop target.
    DragEndNoDrop,
    /// Drag ended over a drop target.
    DragEndDrop,
    /// A held widget entered this one.
    DropStart,
    /// A held widget left this one.
    DropEnd,
    /// This zone became a highlighted legal destination.
    HighlightStart,
    /// This zone stopped being highlighted.
    HighlightEnd,
    /// The widget was destroyed.
    Destroyed,
}

impl Callback {
    /// Name used to resolve the callback in a script environment.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HoverStart => "hover_start",
            Self::HoverEnd => "hover_end",
            Self::LeftClick => "left_click",
            Self::LeftHeld => "left_held",
            Self::LeftRelease => "left_release",
            Self::RightClick => "right_click",
            Self::ClickOff => "click_off",
            Self::DragStart => "drag_start",
            Self::DragEndNoDrop => "drag_end_no_drop",
            Self::DragEndDrop => "drag_end_drop",
            Self::DropStart => "drop_start",
            Self::DropEnd => "drop_end",
            Self::HighlightStart => "highlight_start",
            Self::HighlightEnd => "highlight_end",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Move-validation flags carried by every zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneFlags {
    /// The hovered piece may move here.
    pub valid_move: bool,
    /// The highlight hook has been invoked.
    pub highlighted: bool,
    /// A held piece is currently over this legal zone.
    pub nominated: bool,
}

/// Closed set of widget variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Board or HUD root; owns zones or frames.
    Root,
    /// Board area that holds pieces.
    Zone(ZoneFlags),
    /// Movable token owned by a zone.
    Piece {
        /// Containing zone (non-owning).
        zone: WidgetId,
    },
    /// HUD container.
    Frame,
    /// HUD leaf.
    Control,
}

impl Kind {
    /// Variant name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Zone(_) => "zone",
            Self::Piece { .. } => "piece",
            Self::Frame => "frame",
            Self::Control => "control",
        }
    }

    /// Default `(draggable, snappable, camera factor)` for the variant.
    #[must_use]
    pub const fn defaults(&self) -> (bool, bool, f64) {
        match self {
            Self::Zone(_) => (false, true, 1.0),
            Self::Piece { .. } => (true, true, 1.0),
            Self::Root | Self::Frame | Self::Control => (false, false, 0.0),
        }
    }

    /// Zone flags, if this is a zone.
    #[must_use]
    pub const fn zone(&self) -> Option<ZoneFlags> {
        match self {
            Self::Zone(flags) => Some(*flags),
            _ => None,
        }
    }
}

/// What a widget sees while drawing.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// The widget being drawn.
    pub id: WidgetId,
    /// Its current geometry; draw within `±hw, ±hh`.
    pub geometry: &'a Geometry,
    /// Zone flags when the widget is a zone.
    pub zone: Option<ZoneFlags>,
    /// Shared palette.
    pub palette: &'a Palette,
}

/// Widget authoring contract.
///
/// Only [`Widget::draw`] and [`Widget::mask`] are required. Hooks run on the
/// simulation thread after the engine has finished its own transition; they
/// cannot reach back into the engine.
pub trait Widget: Send {
    /// Type name, exposed as the `type` property.
    fn type_name(&self) -> &'static str;

    /// Draws the widget in local coordinates.
    fn draw(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter);

    /// Draws the hit-test silhouette. Colours are ignored.
    fn mask(&self, ctx: &DrawContext<'_>, painter: &mut dyn Painter);

    /// Custom per-frame update. Runs inside the parallel batch with access to
    /// nothing but this widget.
    ///
    /// # Errors
    ///
    /// A failure is logged after the batch and never aborts the frame.
    fn update(&mut self, _tween: &mut Tween, _now: f64) -> Result<(), String> {
        Ok(())
    }

    /// Receives every platform event while the engine is not suspended.
    fn event_handler(&mut self, _event: &InputEvent) {}

    /// Notification hook.
    fn on(&mut self, _callback: Callback, _other: Option<WidgetId>) {}

    /// Reads a widget-specific property.
    fn property(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Writes a widget-specific property. `None` means the key is not handled
    /// by this widget.
    fn set_property(&mut self, _key: &str, _value: &Value) -> Option<Result<(), WidgetError>> {
        None
    }
}

/// A scene node: header, variant and optional widget payload.
pub struct Node {
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) tween: Tween,
    pub(crate) kind: Kind,
    pub(crate) draggable: bool,
    pub(crate) snappable: bool,
    pub(crate) default_snappable: bool,
    pub(crate) env: Environment,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(Kind::Root, None, Tween::default())
    }

    pub(crate) fn new(kind: Kind, widget: Option<Box<dyn Widget>>, tween: Tween) -> Self {
        let (draggable, snappable, _) = kind.defaults();
        Self {
            widget,
            tween,
            kind,
            draggable,
            snappable,
            default_snappable: snappable,
            env: Environment::new(),
        }
    }

    /// Variant of the node.
    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Current geometry.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        self.tween.geometry()
    }

    /// Final tween destination.
    #[must_use]
    pub fn destination(&self) -> Geometry {
        self.tween.destination()
    }

    /// Curve state.
    #[must_use]
    pub const fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Whether the node can be dragged.
    #[must_use]
    pub const fn draggable(&self) -> bool {
        self.draggable
    }

    /// Whether held widgets snap onto the node.
    #[must_use]
    pub const fn snappable(&self) -> bool {
        self.snappable
    }

    /// Property environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Type name of the widget payload, `"root"` for roots.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.widget.as_ref().map_or("root", |w| w.type_name())
    }

    /// Advances the curve and runs the custom update.
    pub(crate) fn advance(&mut self, id: WidgetId, now: f64) -> Result<(), WidgetError> {
        self.tween.update(now);
        match self.widget.as_mut() {
            Some(widget) => widget
                .update(&mut self.tween, now)
                .map_err(|reason| WidgetError::update(id, reason)),
            None => Ok(()),
        }
    }

    pub(crate) fn notify(&mut self, callback: Callback, other: Option<WidgetId>) {
        if let Some(widget) = self.widget.as_mut() {
            widget.on(callback, other);
        }
    }

    pub(crate) fn draw_context<'a>(&'a self, id: WidgetId, palette: &'a Palette) -> DrawContext<'a> {
        DrawContext {
            id,
            geometry: self.tween.geometry(),
            zone: self.kind.zone(),
            palette,
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.type_name())
            .field("kind", &self.kind)
            .field("geometry", self.tween.geometry())
            .field("draggable", &self.draggable)
            .field("snappable", &self.snappable)
            .finish_non_exhaustive()
    }
}
