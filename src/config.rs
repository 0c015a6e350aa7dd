// Editor configuration
//
// Stored on disk as RON. Every field has a default, so a partial file (or an
// empty `()`) is a valid configuration.

use crate::command::manager::DEFAULT_MAX_HISTORY;
use crate::model::color::Color;
use log::warn;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound for `frames_before` / `frames_after`
pub const MAX_ONION_SKIN_FRAMES: usize = 32;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept
    pub max_history: usize,
    /// Collapse consecutive mergeable commands (e.g. opacity slider drags)
    pub merge_consecutive: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            merge_consecutive: true,
        }
    }
}

/// Onion skin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnionSkinConfig {
    pub enabled: bool,
    /// Number of earlier frames shown
    pub frames_before: usize,
    /// Number of later frames shown
    pub frames_after: usize,
    /// Opacity of the nearest ghost (0.0 to 1.0); further frames fade out
    pub opacity: f32,
    pub previous_tint: Color,
    pub next_tint: Color,
    /// How far each ghost pixel is pulled toward its tint (0.0 to 1.0)
    pub tint_strength: f32,
}

impl Default for OnionSkinConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            frames_before: 1,
            frames_after: 0,
            opacity: 0.3,
            previous_tint: Color::rgb(255, 64, 64),
            next_tint: Color::rgb(64, 255, 96),
            tint_strength: 0.5,
        }
    }
}

/// Canvas overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub show_grid: bool,
    /// Grid cell size in pixels
    pub grid_spacing: u32,
    pub grid_color: Color,
    pub show_border: bool,
    pub border_color: Color,
    pub show_center_guides: bool,
    pub guide_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_grid: false,
            grid_spacing: 8,
            grid_color: Color::rgba(0, 0, 0, 48),
            show_border: false,
            border_color: Color::rgba(0, 0, 0, 160),
            show_center_guides: false,
            guide_color: Color::rgba(0, 160, 255, 128),
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,
    pub onion_skin: OnionSkinConfig,
    pub overlay: OverlayConfig,
}

impl EditorConfig {
    /// Parse and validate a configuration from RON text
    pub fn from_ron_str(ron_data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron_data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!("Using default config, could not load {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Serialize to pretty-printed RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    /// Write the configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_history == 0 {
            return Err(ConfigError::Invalid(
                "history.max_history must be at least 1".to_string(),
            ));
        }

        let onion = &self.onion_skin;
        if !(0.0..=1.0).contains(&onion.opacity) {
            return Err(ConfigError::Invalid(format!(
                "onion_skin.opacity {} is outside 0.0 - 1.0",
                onion.opacity
            )));
        }
        if onion.frames_before > MAX_ONION_SKIN_FRAMES
            || onion.frames_after > MAX_ONION_SKIN_FRAMES
        {
            return Err(ConfigError::Invalid(format!(
                "onion_skin frame counts ({} before, {} after) exceed {}",
                onion.frames_before, onion.frames_after, MAX_ONION_SKIN_FRAMES
            )));
        }
        if !(0.0..=1.0).contains(&onion.tint_strength) {
            return Err(ConfigError::Invalid(format!(
                "onion_skin.tint_strength {} is outside 0.0 - 1.0",
                onion.tint_strength
            )));
        }

        if self.overlay.grid_spacing == 0 {
            return Err(ConfigError::Invalid(
                "overlay.grid_spacing must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
