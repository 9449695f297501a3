//! Per-frame simulation tick
//!
//! Advances one frame of play: input, spawning, coins, obstacles. Rendering
//! and rescheduling are the frame loop's job.

use super::autopilot;
use super::input::HeldKeys;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement keys held at the start of the tick
    pub keys: HeldKeys,
    /// Idle/demo mode - autopilot steers instead of the keys
    pub autopilot: bool,
}

impl TickInput {
    pub fn from_keys(keys: HeldKeys) -> Self {
        Self {
            keys,
            autopilot: false,
        }
    }
}

/// Advance the game by one frame at timestamp `now_ms`.
///
/// Does nothing unless the session is playing. Every coin and obstacle that
/// is collected, hit, or leaves the field is removed in the same tick.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.frame += 1;

    // Player movement
    let keys = if input.autopilot {
        autopilot::steer(state)
    } else {
        input.keys
    };
    state.player.steer(keys.axis(), FIELD_WIDTH);

    // Spawning
    if state.coin_timer.poll(now_ms) {
        state.spawn_coin();
    }
    if state.obstacle_timer.poll(now_ms) {
        state.spawn_obstacle();
    }

    let player_box = state.player.bounds();

    // Coins: fall, then pickup or prune
    let mut collected = Vec::new();
    let mut missed = Vec::new();
    state.coins.retain_mut(|coin| {
        coin.advance();
        if coin.bounds().overlaps(&player_box) {
            collected.push(coin.value);
            false
        } else if coin.has_left_field(FIELD_HEIGHT) {
            missed.push(coin.id);
            false
        } else {
            true
        }
    });
    for value in collected {
        state.award(value);
    }
    state
        .events
        .extend(missed.into_iter().map(|id| GameEvent::CoinMissed { id }));

    // Obstacles: fall, then first hit ends the session
    let mut hit = None;
    state.obstacles.retain_mut(|obstacle| {
        obstacle.advance();
        if hit.is_none() && obstacle.bounds().overlaps(&player_box) {
            hit = Some(obstacle.id);
            false
        } else {
            !obstacle.has_left_field(FIELD_HEIGHT)
        }
    });

    if let Some(id) = hit {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::ObstacleHit { id });
        log::info!(
            "Game over on frame {}: score {}, cash {}",
            state.frame,
            state.score,
            state.cash
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::MoveKey;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start(seed);
        state
    }

    fn hold(key: MoveKey) -> TickInput {
        let mut keys = HeldKeys::default();
        keys.press(key);
        TickInput::from_keys(keys)
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut state = GameState::new(1);
        tick(&mut state, &hold(MoveKey::Left), 5000.0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
        assert_eq!(state.live_entities(), 0);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = playing(1);
        let input = TickInput::default();
        // Timers count from the clock origin, nothing is due yet
        tick(&mut state, &input, 0.0);
        tick(&mut state, &input, 1000.0);
        assert!(state.coins.is_empty());
        tick(&mut state, &input, 1001.0);
        assert_eq!(state.coins.len(), 1);
        assert!(state.obstacles.is_empty());
        tick(&mut state, &input, 2001.0);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_first_frame_after_page_load_spawns_both() {
        let mut state = playing(1);
        tick(&mut state, &TickInput::default(), 5000.0);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.obstacles.len(), 1);

        // Restarting measures from the origin again
        state.start(2);
        tick(&mut state, &TickInput::default(), 5016.0);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_coin_pickup_awards_value_to_score_and_cash() {
        let mut state = playing(1);
        state.spawn_coin();
        let value = state.coins[0].value;
        // Place the coin just above the player so one fall step overlaps
        state.coins[0].pos = Vec2::new(state.player.pos.x, state.player.pos.y - COIN_SIZE);
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.coins.is_empty());
        assert_eq!(state.score, value);
        assert_eq!(state.cash, value);
        assert!(state.drain_events().contains(&GameEvent::CoinCollected {
            value,
            score: value,
            cash: value
        }));
    }

    #[test]
    fn test_coin_spins_while_falling() {
        let mut state = playing(1);
        state.spawn_coin();
        state.coins[0].pos = Vec2::new(0.0, 0.0);
        state.player.pos.x = 600.0;
        tick(&mut state, &TickInput::default(), 0.0);
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.coins[0].pos.y, 2.0 * COIN_FALL_STEP);
        assert!((state.coins[0].rotation - 2.0 * COIN_SPIN_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_missed_coin_removed_without_scoring() {
        let mut state = playing(1);
        state.spawn_coin();
        let id = state.coins[0].id;
        state.player.pos.x = 0.0;
        state.coins[0].pos = Vec2::new(700.0, FIELD_HEIGHT - 1.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.coins.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.cash, 0);
        assert!(state.drain_events().contains(&GameEvent::CoinMissed { id }));
    }

    #[test]
    fn test_obstacle_leaving_field_is_pruned() {
        let mut state = playing(1);
        state.spawn_obstacle();
        state.player.pos.x = 0.0;
        state.obstacles[0].pos = Vec2::new(700.0, FIELD_HEIGHT);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_obstacle_hit_ends_session() {
        let mut state = playing(1);
        state.spawn_obstacle();
        let id = state.obstacles[0].id;
        state.obstacles[0].pos = Vec2::new(state.player.pos.x, state.player.pos.y - 39.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.obstacles.is_empty());
        assert!(state.drain_events().contains(&GameEvent::ObstacleHit { id }));

        // Further ticks change nothing
        let frame = state.frame;
        state.spawn_coin();
        let before = state.coins.clone();
        tick(&mut state, &TickInput::default(), 10_000.0);
        assert_eq!(state.frame, frame);
        assert_eq!(state.coins, before);
    }

    #[test]
    fn test_only_first_hit_is_reported() {
        let mut state = playing(1);
        state.spawn_obstacle();
        state.spawn_obstacle();
        for obstacle in &mut state.obstacles {
            obstacle.pos = Vec2::new(state.player.pos.x, state.player.pos.y - 30.0);
        }
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.0);
        let hits = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstacleHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_live_entities_stay_bounded() {
        let mut state = playing(5);
        state.player.pos.x = 0.0;
        let input = TickInput::default();
        let mut peak = 0;
        for frame in 0..20_000u32 {
            tick(&mut state, &input, frame as f64 * FRAME_MS);
            if state.phase != GamePhase::Playing {
                state.phase = GamePhase::Playing;
            }
            peak = peak.max(state.live_entities());
        }
        // ~4 s on screen for coins, at most ~7 s for obstacles
        assert!(peak < 16, "peak live entities {}", peak);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99_999);
        let mut b = playing(99_999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for frame in 0..3000u32 {
            let now = frame as f64 * FRAME_MS;
            tick(&mut a, &input, now);
            tick(&mut b, &input, now);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.score, b.score);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.player, b.player);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(moves in proptest::collection::vec(0u8..4, 1..400)) {
            let mut state = playing(3);
            for (i, m) in moves.iter().enumerate() {
                let keys = HeldKeys { left: m & 1 != 0, right: m & 2 != 0 };
                tick(&mut state, &TickInput::from_keys(keys), i as f64 * FRAME_MS);
                state.phase = GamePhase::Playing;
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= FIELD_WIDTH - PLAYER_SIZE);
            }
        }

        #[test]
        fn prop_score_equals_cash(seed in any::<u64>(), frames in 1u32..2000) {
            let mut state = playing(seed);
            prop_assert_eq!(state.score, state.cash);
            let input = TickInput { autopilot: true, ..Default::default() };
            for frame in 0..frames {
                tick(&mut state, &input, frame as f64 * FRAME_MS);
                prop_assert_eq!(state.score, state.cash);
            }
        }
    }
}
