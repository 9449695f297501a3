//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame timestamps come from the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, aabb_overlap};
pub use input::{HeldKeys, MoveKey};
pub use spawn::SpawnTimer;
pub use state::{Coin, GameEvent, GamePhase, GameState, Obstacle, Player};
pub use tick::{TickInput, tick};
