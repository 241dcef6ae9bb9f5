//! Engine configuration.
//!
//! Loaded from TOML at startup. Missing keys take their defaults; unknown keys
//! are an error so typos do not silently fall back.
//!
//! ```toml
//! drag_threshold = 0.25
//! auto_snap = true
//! snap_offset = [4.0, 4.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables of the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Seconds between pointer-down and the drag/click decision.
    pub drag_threshold: f64,
    /// Tween time toward the pointer or a snap target.
    pub approach_time: f64,
    /// Tween time back to the release point.
    pub release_time: f64,
    /// Tween time after a validated move.
    pub move_time: f64,
    /// Offset applied to snap targets so stacked widgets stay visible.
    pub snap_offset: [f64; 2],
    /// Invoke highlight hooks on legal zones.
    pub auto_highlight: bool,
    /// Make legal zones snappable while their piece is hovered.
    pub auto_snap: bool,
    /// Treat a return to the originating zone as an explicit move.
    pub notify_home_zone: bool,
    /// Lower bound for the camera scale.
    pub min_camera_scale: f64,
    /// Camera scale change per wheel unit.
    pub zoom_step: f64,
    /// Capacity of each widget's keyframe queue.
    pub max_pending_keyframes: usize,
    /// Alpha of the overlay drawn while suspended.
    pub suspend_dim: f32,
    /// Largest time step a single frame may take.
    pub max_frame_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 0.2,
            approach_time: 0.1,
            release_time: 0.1,
            move_time: 0.15,
            snap_offset: [5.0, 5.0],
            auto_highlight: true,
            auto_snap: false,
            notify_home_zone: false,
            min_camera_scale: 0.2,
            zoom_step: 0.01,
            max_pending_keyframes: 64,
            suspend_dim: 0.5,
            max_frame_step: 0.25,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config.sanitized())
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Replaces out-of-range values with their defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let times = [
            ("drag_threshold", &mut self.drag_threshold, defaults.drag_threshold),
            ("approach_time", &mut self.approach_time, defaults.approach_time),
            ("release_time", &mut self.release_time, defaults.release_time),
            ("move_time", &mut self.move_time, defaults.move_time),
            ("max_frame_step", &mut self.max_frame_step, defaults.max_frame_step),
        ];
        for (name, value, default) in times {
            if !value.is_finite() || *value < 0.0 {
                tracing::warn!("config {name} = {value} out of range, using {default}");
                *value = default;
            }
        }
        if !(self.min_camera_scale.is_finite() && self.min_camera_scale > 0.0) {
            tracing::warn!(
                "config min_camera_scale = {} out of range, using {}",
                self.min_camera_scale,
                defaults.min_camera_scale
            );
            self.min_camera_scale = defaults.min_camera_scale;
        }
        if !(0.0..=1.0).contains(&self.suspend_dim) {
            tracing::warn!("config suspend_dim = {} out of range, clamping", self.suspend_dim);
            self.suspend_dim = self.suspend_dim.clamp(0.0, 1.0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            "drag_threshold = 0.5\nauto_snap = true\nsnap_offset = [1.0, 2.0]\n",
        )
        .unwrap();

        assert_eq!(config.drag_threshold, 0.5);
        assert!(config.auto_snap);
        assert_eq!(config.snap_offset, [1.0, 2.0]);
        assert_eq!(config.release_time, 0.1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EngineConfig::from_toml_str("drag_treshold = 0.5");
        match result {
            Err(error @ ConfigError::Parse(_)) => assert!(error.to_string().contains("drag_treshold")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_time_falls_back() {
        let config = EngineConfig::from_toml_str("move_time = -1.0").unwrap();
        assert_eq!(config.move_time, 0.15);
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::load("/nonexistent/tabula.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_toml_roundtrip() {
        let text = EngineConfig::default().to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), EngineConfig::default());
    }
}
