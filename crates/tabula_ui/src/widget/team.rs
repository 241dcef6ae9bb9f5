//! Team affiliation shared by tiles and meeples.

use crate::error::WidgetError;
use crate::script::Value;

/// Which side owns a tile or meeple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Team {
    /// Unowned.
    #[default]
    None,
    /// Red side.
    Red,
    /// Blue side.
    Blue,
}

impl Team {
    /// Property spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }

    /// Parses the property spelling.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            _ => None,
        }
    }

    pub(crate) fn from_value(key: &str, value: &Value) -> Result<Self, WidgetError> {
        value
            .as_text()
            .and_then(Self::parse)
            .ok_or_else(|| WidgetError::property(key, "expected \"none\", \"red\" or \"blue\""))
    }
}
