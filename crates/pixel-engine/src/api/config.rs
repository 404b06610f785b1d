use serde::{Deserialize, Serialize};

use crate::core::color::Rgba;

/// Framebuffer configuration. Loadable from JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Color the buffer is filled with at startup.
    pub clear_color: Rgba,
    /// Draw without camera offset or viewport culling.
    pub gui_space: bool,
    /// Initial screen-shake magnitude in pixels (0 = none).
    pub shake: i32,
    /// Seed for the shake offsets.
    pub shake_seed: u64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 144,
            clear_color: Rgba::BLACK,
            gui_space: false,
            shake: 0,
            shake_seed: 42,
        }
    }
}

impl ScreenConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-component playback options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Multiplier on elapsed time; higher plays faster.
    pub time_scale: f32,
    /// Keep the source pixel's alpha when a color override applies.
    pub preserve_alpha: bool,
    /// Seed for random frame selection.
    pub seed: u64,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            preserve_alpha: false,
            seed: 1,
        }
    }
}
