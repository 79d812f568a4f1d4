//! Edge style settings
//!
//! Global defaults applied to every edge created by a connect gesture.
//! Settings can be stored as JSON alongside the editor's other preferences.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{LineType, MarkerType};

/// Stroke width given to new edges
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

fn default_stroke_width() -> f32 {
    DEFAULT_STROKE_WIDTH
}

fn default_animated() -> bool {
    true
}

/// Style applied to newly created edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyleSettings {
    /// Arrow head at the target end
    #[serde(default)]
    pub default_marker_type: MarkerType,
    /// Whether new edges request the flow animation
    #[serde(default = "default_animated")]
    pub default_animated: bool,
    /// Path shape for new edges
    #[serde(default)]
    pub default_line_type: LineType,
    /// Stroke width for new edges
    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: f32,
}

impl Default for EdgeStyleSettings {
    fn default() -> Self {
        Self {
            default_marker_type: MarkerType::default(),
            default_animated: default_animated(),
            default_line_type: LineType::default(),
            default_stroke_width: default_stroke_width(),
        }
    }
}

impl EdgeStyleSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, or defaults if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No edge style settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save settings as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        log::info!("Edge style settings saved to {:?}", path);
        Ok(())
    }
}
