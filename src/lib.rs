//! Cash Runner - a falling-coins arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `render`: Per-frame draw list and WebGPU presentation
//! - `frame_loop`: Frame scheduler driven by an injectable clock
//! - `report`: Remote score reporter boundary
//! - `leaderboard`: Client-held leaderboard and ranking
//! - `session`: Menu / playing / game-over flow and score submission

pub mod frame_loop;
pub mod leaderboard;
pub mod render;
pub mod report;
pub mod session;
pub mod settings;
pub mod sim;

pub use frame_loop::{Clock, FrameLoop, FrameStatus, ManualClock, Surface};
pub use leaderboard::Leaderboard;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playing field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player box, spawned near the bottom of the field
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 500.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Horizontal pixels per frame while a movement key is held
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Coins
    pub const COIN_SIZE: f32 = 30.0;
    pub const COIN_SPAWN_Y: f32 = -30.0;
    /// Downward pixels per frame
    pub const COIN_FALL_STEP: f32 = 3.0;
    /// Cosmetic spin per frame (radians)
    pub const COIN_SPIN_STEP: f32 = 0.1;
    pub const COIN_VALUE_COMMON: u64 = 10;
    pub const COIN_VALUE_RARE: u64 = 50;
    /// Probability that a spawned coin is the rare tier
    pub const RARE_COIN_CHANCE: f64 = 0.2;

    /// Obstacles
    pub const OBSTACLE_SIZE: f32 = 40.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -40.0;
    /// Fall speed is uniform in [MIN, MIN + RANGE) pixels per frame
    pub const OBSTACLE_MIN_SPEED: f32 = 2.0;
    pub const OBSTACLE_SPEED_RANGE: f32 = 2.0;

    /// Spawn cadence (milliseconds)
    pub const COIN_SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const OBSTACLE_SPAWN_INTERVAL_MS: f64 = 2000.0;

    /// Nominal frame duration for the headless runner (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Rendering
    pub const GRID_SPACING: f32 = 40.0;
    pub const OBSTACLE_BEVEL: f32 = 6.0;
    pub const PLAYER_BEVEL: f32 = 8.0;
    /// Brightness shift (percent) for the lit top face and shaded right face
    pub const FACE_SHADE_PERCENT: i32 = 30;
}
