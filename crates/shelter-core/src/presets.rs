//! Environment and lighting presets

use serde::{Deserialize, Serialize};

/// Environment preset controlling backdrop and ambient mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EnvironmentPreset {
    /// Open field, daylight
    #[default]
    Field,
    Desert,
    Arctic,
    Night,
    /// Neutral studio backdrop for color evaluation
    Studio,
}

impl EnvironmentPreset {
    pub fn name(&self) -> &'static str {
        match self {
            EnvironmentPreset::Field => "Field",
            EnvironmentPreset::Desert => "Desert",
            EnvironmentPreset::Arctic => "Arctic",
            EnvironmentPreset::Night => "Night",
            EnvironmentPreset::Studio => "Studio",
        }
    }

    /// All presets in display order
    pub fn all() -> [EnvironmentPreset; 5] {
        [
            EnvironmentPreset::Field,
            EnvironmentPreset::Desert,
            EnvironmentPreset::Arctic,
            EnvironmentPreset::Night,
            EnvironmentPreset::Studio,
        ]
    }
}

/// Lighting parameters applied alongside an environment preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Key light intensity
    pub intensity: f32,
    /// Ambient fill amount
    pub ambient: f32,
    /// Key light color (RGB)
    pub color: [f32; 3],
    /// Whether shadow casting is enabled
    pub shadows: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self::for_environment(EnvironmentPreset::Field)
    }
}

impl LightingConfig {
    /// Lighting tuned for the given environment preset
    pub fn for_environment(preset: EnvironmentPreset) -> Self {
        match preset {
            EnvironmentPreset::Field => Self {
                intensity: 1.0,
                ambient: 0.4,
                color: [1.0, 0.98, 0.92],
                shadows: true,
            },
            EnvironmentPreset::Desert => Self {
                intensity: 1.3,
                ambient: 0.5,
                color: [1.0, 0.93, 0.80],
                shadows: true,
            },
            EnvironmentPreset::Arctic => Self {
                intensity: 1.1,
                ambient: 0.6,
                color: [0.92, 0.96, 1.0],
                shadows: true,
            },
            EnvironmentPreset::Night => Self {
                intensity: 0.3,
                ambient: 0.15,
                color: [0.6, 0.7, 1.0],
                shadows: false,
            },
            EnvironmentPreset::Studio => Self {
                intensity: 0.9,
                ambient: 0.7,
                color: [1.0, 1.0, 1.0],
                shadows: false,
            },
        }
    }
}
