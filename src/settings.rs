//! Game settings and tuning
//!
//! Every gameplay constant lives here so a stage can be rebuilt from
//! `(Settings, seed)` alone. Persisted as JSON next to the binary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Screen width (pixels)
    pub width: i32,
    /// Screen height (pixels)
    pub height: i32,
    /// Distance of the floor line above the bottom edge
    pub floor_offset: i32,
    /// X inset of the left/right walls from the screen edges
    pub wall_inset: f32,
    /// Top y of the side walls (above the visible area)
    pub wall_top: f32,
    /// Downward gravity (pixels/s²)
    pub gravity: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_mass: f32,
    pub player_elasticity: f32,
    /// Elasticity of floor, walls and platforms
    pub object_elasticity: f32,
    pub floor_friction: f32,
    /// Horizontal force applied while a direction is held
    pub move_power: f32,
    /// Upward impulse applied on a jump
    pub jump_power: f32,
    /// Tolerance of the on-ground proximity test
    pub jump_margin: f32,

    // === Items ===
    pub item_count: u32,
    pub item_margin_x: i32,
    pub item_margin_top: i32,
    pub item_margin_bottom: i32,
    /// Side of the square item sensor
    pub item_size: f32,
    pub pickup_radius: f32,

    // === Platforms ===
    /// Placement rounds (at most one platform per round)
    pub platform_rounds: u32,
    /// Candidate rectangles tried per round
    pub platform_candidates: u32,
    pub platform_min_width: i32,
    pub platform_max_width: i32,
    pub platform_height: i32,
    pub platform_margin_x: i32,
    pub platform_margin_top: i32,
    pub platform_margin_bottom: i32,
    /// Extra clearance required between platforms on each axis
    pub platform_spacing: f32,

    // === Seeds ===
    /// Once the seed reaches this value a typed digit replaces it
    pub seed_digit_threshold: u64,
    /// Upper bound (inclusive) of freshly drawn stage seeds
    pub new_stage_seed_max: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 160,
            height: 240,
            floor_offset: 5,
            wall_inset: 5.0,
            wall_top: -100.0,
            gravity: 200.0,

            player_radius: 5.0,
            player_mass: 1.0,
            player_elasticity: 0.8,
            object_elasticity: 0.6,
            floor_friction: 0.5,
            move_power: 400.0,
            jump_power: 120.0,
            jump_margin: 5.0,

            item_count: 10,
            item_margin_x: 10,
            item_margin_top: 20,
            item_margin_bottom: 20,
            item_size: 8.0,
            pickup_radius: 8.0,

            platform_rounds: 20,
            platform_candidates: 10,
            platform_min_width: 10,
            platform_max_width: 50,
            platform_height: 6,
            platform_margin_x: 17,
            platform_margin_top: 27,
            platform_margin_bottom: 17,
            platform_spacing: 12.0,

            seed_digit_threshold: 10_000,
            new_stage_seed_max: 100_000,
        }
    }
}

impl Settings {
    /// Floor line in integer pixels (used for RNG bounds)
    pub fn floor_line(&self) -> i32 {
        self.height - self.floor_offset
    }

    /// Floor line y
    pub fn floor_y(&self) -> f32 {
        self.floor_line() as f32
    }

    /// Player center height when resting on the floor
    pub fn floor_contact_y(&self) -> f32 {
        self.floor_y() - self.player_radius - 1.0
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
