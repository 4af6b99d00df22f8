//! Workspace configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::keymap::{Action, KeyMap, KeystrokeError};
use canvas::FitOptions;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use ui::MinimapConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid keymap: {0}")]
    Keymap(#[from] KeystrokeError),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

/// Fixed panel chrome eating into the rendering area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chrome {
    pub left_panel_width: f32,
    pub right_panel_width: f32,
    pub toolbar_height: f32,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            left_panel_width: 240.0,
            right_panel_width: 280.0,
            toolbar_height: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Full rendering area in pixels, chrome included.
    pub surface_size: SurfaceSize,
    pub chrome: Chrome,
    pub fit: FitOptions,
    pub minimap: MinimapConfig,
    /// World units a duplicate is shifted by on both axes.
    pub duplicate_offset: f32,
    /// Let the text and frame tools create objects where the canvas is clicked.
    pub place_on_click: bool,
    /// Keystroke overrides on top of the standard bindings.
    pub keymap: BTreeMap<String, Action>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            surface_size: SurfaceSize {
                width: 1440.0,
                height: 900.0,
            },
            chrome: Chrome::default(),
            fit: FitOptions::default(),
            minimap: MinimapConfig::default(),
            duplicate_offset: 20.0,
            place_on_click: false,
            keymap: BTreeMap::new(),
        }
    }
}

impl WorkspaceConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        log::info!("loaded workspace config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate, including the keymap overrides.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.keymap()?;
        Ok(config)
    }

    pub fn keymap(&self) -> Result<KeyMap, KeystrokeError> {
        KeyMap::with_overrides(&self.keymap)
    }

    /// The visible canvas area: the surface minus panel chrome.
    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(
            self.surface_size.width - self.chrome.left_panel_width - self.chrome.right_panel_width,
            self.surface_size.height - self.chrome.toolbar_height,
        )
        .max(Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = WorkspaceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WorkspaceConfig::default());
        assert_eq!(config.viewport_size(), Vec2::new(920.0, 900.0));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = WorkspaceConfig::from_json_str(
            r#"{ "fit": { "margin": 0 }, "chrome": { "toolbar_height": 48 }, "place_on_click": true }"#,
        )
        .unwrap();
        assert_eq!(config.fit.margin, 0.0);
        assert_eq!(config.fit.fit_fraction, 0.9);
        assert_eq!(config.chrome.left_panel_width, 240.0);
        assert_eq!(config.viewport_size().y, 852.0);
        assert!(config.place_on_click);
    }

    #[test]
    fn bad_keymap_is_rejected() {
        let err = WorkspaceConfig::from_json_str(r#"{ "keymap": { "hyper-x": "delete" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Keymap(_)));

        let err = WorkspaceConfig::from_json_str(r#"{ "keymap": { "x": "explode" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn chrome_wider_than_surface_still_yields_a_viewport() {
        let mut config = WorkspaceConfig::default();
        config.surface_size.width = 100.0;
        assert_eq!(config.viewport_size().x, 1.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WorkspaceConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
