//! # Scripting Collaborator
//!
//! The engine never embeds a language. It talks to a [`ScriptHost`] that
//! answers the game-rule query and receives notifications:
//!
//! ```text
//!   engine ── invoke(widget, "hover_start", other) ──► host
//!   engine ── moves(piece, zone) ───────────────────► host ──► [zones]
//!   engine ── valid_move / invalid_move ────────────► host
//! ```
//!
//! [`Namespace`] is a native host that resolves those fixed names to Rust
//! closures.

use std::collections::HashMap;

use tabula_core::WidgetId;

use crate::widget::Callback;

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    Text(String),
    /// Widget reference.
    Widget(WidgetId),
}

impl Value {
    /// Numeric view of the value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness: everything but `Nil` and `false`.
    #[must_use]
    pub const fn truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<WidgetId> for Value {
    fn from(id: WidgetId) -> Self {
        Self::Widget(id)
    }
}

/// Per-widget table of named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Writes a value; `Nil` removes the key.
    pub fn set(&mut self, key: &str, value: Value) {
        if value == Value::Nil {
            self.values.remove(key);
        } else {
            self.values.insert(key.to_string(), value);
        }
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The external scripting host.
///
/// Every method has a no-op default so hosts implement only what they need.
pub trait ScriptHost {
    /// A widget callback fired.
    fn invoke(&mut self, _widget: WidgetId, _callback: Callback, _other: Option<WidgetId>) {}

    /// Legal destination zones for `piece` leaving `zone`. `None` when no
    /// rule is registered.
    fn moves(&mut self, _piece: WidgetId, _zone: WidgetId) -> Option<Vec<WidgetId>> {
        None
    }

    /// A validated move was executed.
    fn valid_move(&mut self, _piece: WidgetId, _zone: WidgetId) {}

    /// A drop onto an illegal zone was attempted.
    fn invalid_move(&mut self, _piece: WidgetId, _zone: WidgetId) {}

    /// A widget was destroyed; any state kept for it should go.
    fn widget_destroyed(&mut self, _widget: WidgetId) {}
}

/// Host that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScript;

impl ScriptHost for NoScript {}

/// Rule callback signature.
pub type MovesFn = Box<dyn FnMut(WidgetId, WidgetId) -> Vec<WidgetId>>;
/// Move notification signature.
pub type MoveNotifyFn = Box<dyn FnMut(WidgetId, WidgetId)>;
/// Widget callback signature.
pub type CallbackFn = Box<dyn FnMut(WidgetId, Option<WidgetId>)>;

/// Native host resolving callbacks by fixed name.
#[derive(Default)]
pub struct Namespace {
    functions: HashMap<&'static str, Function>,
    callbacks: HashMap<(WidgetId, &'static str), CallbackFn>,
}

enum Function {
    Moves(MovesFn),
    Notify(MoveNotifyFn),
}

impl Namespace {
    /// Name of the rule callback.
    pub const MOVES: &'static str = "moves";
    /// Name of the executed-move notification.
    pub const VALID_MOVE: &'static str = "valid_move";
    /// Name of the rejected-move notification.
    pub const INVALID_MOVE: &'static str = "invalid_move";

    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule callback.
    pub fn on_moves(&mut self, f: impl FnMut(WidgetId, WidgetId) -> Vec<WidgetId> + 'static) {
        self.functions.insert(Self::MOVES, Function::Moves(Box::new(f)));
    }

    /// Registers the executed-move notification.
    pub fn on_valid_move(&mut self, f: impl FnMut(WidgetId, WidgetId) + 'static) {
        self.functions
            .insert(Self::VALID_MOVE, Function::Notify(Box::new(f)));
    }

    /// Registers the rejected-move notification.
    pub fn on_invalid_move(&mut self, f: impl FnMut(WidgetId, WidgetId) + 'static) {
        self.functions
            .insert(Self::INVALID_MOVE, Function::Notify(Box::new(f)));
    }

    /// Registers a callback in a widget's environment.
    pub fn on(
        &mut self,
        widget: WidgetId,
        callback: Callback,
        f: impl FnMut(WidgetId, Option<WidgetId>) + 'static,
    ) {
        self.callbacks.insert((widget, callback.name()), Box::new(f));
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn notify(&mut self, name: &'static str, piece: WidgetId, zone: WidgetId) {
        if let Some(Function::Notify(f)) = self.functions.get_mut(name) {
            f(piece, zone);
        }
    }
}

impl ScriptHost for Namespace {
    fn invoke(&mut self, widget: WidgetId, callback: Callback, other: Option<WidgetId>) {
        if let Some(f) = self.callbacks.get_mut(&(widget, callback.name())) {
            f(widget, other);
        }
    }

    fn moves(&mut self, piece: WidgetId, zone: WidgetId) -> Option<Vec<WidgetId>> {
        match self.functions.get_mut(Self::MOVES) {
            Some(Function::Moves(f)) => Some(f(piece, zone)),
            _ => None,
        }
    }

    fn valid_move(&mut self, piece: WidgetId, zone: WidgetId) {
        self.notify(Self::VALID_MOVE, piece, zone);
    }

    fn invalid_move(&mut self, piece: WidgetId, zone: WidgetId) {
        self.notify(Self::INVALID_MOVE, piece, zone);
    }

    fn widget_destroyed(&mut self, widget: WidgetId) {
        self.callbacks.retain(|(owner, _), _| *owner != widget);
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort_unstable();
        f.debug_struct("Namespace")
            .field("functions", &names)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
