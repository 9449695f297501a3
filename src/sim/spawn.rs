//! Entity spawning
//!
//! Coins and obstacles drop in from just above the field at random x
//! positions. Each kind has its own timer polled with the frame timestamp.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Obstacle};
use crate::consts::*;

/// Fires when more than `interval_ms` has elapsed since it last fired.
///
/// A fresh timer counts from the clock origin, so the first frame of a
/// session fires as soon as the clock is past one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    pub interval_ms: f64,
    last_ms: f64,
}

impl SpawnTimer {
    pub const fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: 0.0,
        }
    }

    /// Measure from the clock origin again
    pub fn reset(&mut self) {
        self.last_ms = 0.0;
    }

    /// Poll with the current frame timestamp
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms > self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Uniform x in `[0, field_width - entity_width)`
pub fn random_x<R: Rng + ?Sized>(rng: &mut R, field_width: f32, entity_width: f32) -> f32 {
    let span = field_width - entity_width;
    if span <= 0.0 {
        return 0.0;
    }
    rng.random_range(0.0..span)
}

/// Roll a coin value: rare tier with `RARE_COIN_CHANCE`, otherwise common
pub fn roll_coin_value<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    if rng.random_bool(RARE_COIN_CHANCE) {
        COIN_VALUE_RARE
    } else {
        COIN_VALUE_COMMON
    }
}

pub fn spawn_coin<R: Rng + ?Sized>(rng: &mut R, id: u32, field_width: f32) -> Coin {
    let x = random_x(rng, field_width, COIN_SIZE);
    Coin {
        id,
        pos: Vec2::new(x, COIN_SPAWN_Y),
        size: Vec2::splat(COIN_SIZE),
        value: roll_coin_value(rng),
        rotation: 0.0,
    }
}

pub fn spawn_obstacle<R: Rng + ?Sized>(rng: &mut R, id: u32, field_width: f32) -> Obstacle {
    let x = random_x(rng, field_width, OBSTACLE_SIZE);
    let speed = OBSTACLE_MIN_SPEED + rng.random_range(0.0..OBSTACLE_SPEED_RANGE);
    Obstacle {
        id,
        pos: Vec2::new(x, OBSTACLE_SPAWN_Y),
        size: Vec2::splat(OBSTACLE_SIZE),
        speed,
    }
}
