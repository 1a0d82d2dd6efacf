//! Bounce Ball - a bouncing-ball platformer with seed-driven stages
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stage generation, physics, gameplay rules)
//! - `session`: Seed handling and full-state resets
//! - `input`: Input-state providers (keyboard, scripted)
//! - `render`: Read-only frame snapshots and the text renderer
//! - `share`: Clear-time share payload and external link opening
//! - `settings`: Data-driven game tuning

pub mod input;
pub mod render;
pub mod session;
pub mod settings;
pub mod share;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frames per second of the game loop (one update + one draw per frame)
    pub const FPS: u32 = 30;
    /// Fixed physics sub-step
    pub const SUB_DT: f32 = 1.0 / 60.0;
    /// Physics sub-steps per frame
    pub const SUBSTEPS: u32 = 2;
}

/// Convert frames to seconds at the fixed frame rate
#[inline]
pub fn frames_to_secs(frames: u64) -> f32 {
    frames as f32 / consts::FPS as f32
}
