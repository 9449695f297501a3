//! Game state and core simulation types
//!
//! One owned `GameState` holds everything a session mutates. Input handlers,
//! the tick and the render pass all receive it explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::spawn::{self, SpawnTimer};
use crate::consts::*;

/// Current phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting on the menu screen
    Menu,
    /// Active gameplay, ticks advance entities
    Playing,
    /// An obstacle hit the player; terminal for the session
    GameOver,
}

/// The player's box
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal pixels per tick
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Move horizontally by `axis * speed`, clamped to `[0, field_width - width]`
    pub fn steer(&mut self, axis: f32, field_width: f32) {
        let max_x = (field_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + axis * self.speed).clamp(0.0, max_x);
    }
}

/// A falling coin
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Amount added to both score and cash on pickup
    pub value: u64,
    /// Spin angle in radians (cosmetic)
    pub rotation: f32,
}

impl Coin {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Fall one step and spin
    pub fn advance(&mut self) {
        self.pos.y += COIN_FALL_STEP;
        self.rotation += COIN_SPIN_STEP;
    }

    pub fn is_rare(&self) -> bool {
        self.value == COIN_VALUE_RARE
    }

    pub fn has_left_field(&self, field_height: f32) -> bool {
        self.pos.y > field_height
    }
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward pixels per tick
    pub speed: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn has_left_field(&self, field_height: f32) -> bool {
        self.pos.y > field_height
    }
}

/// Things that happened during a tick, drained by the host for HUD updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinSpawned { id: u32 },
    ObstacleSpawned { id: u32 },
    /// Score and cash after the pickup
    CoinCollected { value: u64, score: u64, cash: u64 },
    /// A coin fell out of the field without being collected
    CoinMissed { id: u32 },
    ObstacleHit { id: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Mirrors every score increment
    pub cash: u64,
    /// Ticks advanced while playing
    pub frame: u64,
    pub player: Player,
    pub coins: Vec<Coin>,
    pub obstacles: Vec<Obstacle>,
    pub coin_timer: SpawnTimer,
    pub obstacle_timer: SpawnTimer,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameState {
    /// Create an idle state sitting on the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            cash: 0,
            frame: 0,
            player: Player::default(),
            coins: Vec::new(),
            obstacles: Vec::new(),
            coin_timer: SpawnTimer::new(COIN_SPAWN_INTERVAL_MS),
            obstacle_timer: SpawnTimer::new(OBSTACLE_SPAWN_INTERVAL_MS),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Begin a fresh session: zero score and cash, clear the field, start playing
    pub fn start(&mut self, seed: u64) {
        *self = Self::new(seed);
        self.phase = GamePhase::Playing;
        log::info!("Session started with seed: {}", seed);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_coin(&mut self) -> u32 {
        let id = self.next_entity_id();
        let coin = spawn::spawn_coin(&mut self.rng, id, FIELD_WIDTH);
        self.coins.push(coin);
        self.events.push(GameEvent::CoinSpawned { id });
        id
    }

    pub fn spawn_obstacle(&mut self) -> u32 {
        let id = self.next_entity_id();
        let obstacle = spawn::spawn_obstacle(&mut self.rng, id, FIELD_WIDTH);
        self.obstacles.push(obstacle);
        self.events.push(GameEvent::ObstacleSpawned { id });
        id
    }

    /// Credit a coin pickup to score and cash together
    pub fn award(&mut self, value: u64) {
        self.score += value;
        self.cash += value;
        self.events.push(GameEvent::CoinCollected {
            value,
            score: self.score,
            cash: self.cash,
        });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of coins and obstacles currently alive
    pub fn live_entities(&self) -> usize {
        self.coins.len() + self.obstacles.len()
    }
}
