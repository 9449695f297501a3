//! Idle/demo steering
//!
//! Produces held keys from the current state: sidestep the closest obstacle
//! coming down on the player's column, otherwise chase the lowest coin.

use super::input::HeldKeys;
use super::state::GameState;
use crate::consts::*;

/// How far above the player an obstacle counts as a threat (pixels)
const THREAT_LOOKAHEAD: f32 = 220.0;
/// Extra horizontal clearance kept around obstacles
const DODGE_MARGIN: f32 = 12.0;

/// Decide which movement keys to hold this tick
pub fn steer(state: &GameState) -> HeldKeys {
    let player = state.player.bounds();
    let mut keys = HeldKeys::default();

    let threat = state
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .filter(|b| {
            b.bottom() < player.bottom()
                && player.pos.y - b.bottom() < THREAT_LOOKAHEAD
                && b.pos.x < player.right() + DODGE_MARGIN
                && b.right() > player.pos.x - DODGE_MARGIN
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(obstacle) = threat {
        let room_left = player.pos.x;
        let room_right = FIELD_WIDTH - player.right();
        let needed = obstacle.size.x + DODGE_MARGIN;
        let go_left = if obstacle.center().x >= player.center().x {
            room_left >= needed || room_left > room_right
        } else {
            !(room_right >= needed || room_right > room_left)
        };
        keys.left = go_left;
        keys.right = !go_left;
        return keys;
    }

    let target = state
        .coins
        .iter()
        .map(|c| c.bounds())
        .filter(|b| b.bottom() < player.bottom())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(coin) = target {
        let dx = coin.center().x - player.center().x;
        if dx > state.player.speed {
            keys.right = true;
        } else if dx < -state.player.speed {
            keys.left = true;
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_chases_lowest_coin() {
        let mut state = GameState::new(1);
        state.start(1);
        state.spawn_coin();
        state.coins[0].pos = Vec2::new(700.0, 300.0);
        let keys = steer(&state);
        assert!(keys.right && !keys.left);

        state.coins[0].pos = Vec2::new(50.0, 300.0);
        let keys = steer(&state);
        assert!(keys.left && !keys.right);
    }

    #[test]
    fn test_idles_when_aligned() {
        let mut state = GameState::new(1);
        state.start(1);
        state.spawn_coin();
        let px = state.player.pos.x;
        state.coins[0].pos = Vec2::new(px + 5.0, 200.0);
        assert_eq!(steer(&state), HeldKeys::default());
    }

    #[test]
    fn test_dodges_obstacle_overhead() {
        let mut state = GameState::new(1);
        state.start(1);
        state.spawn_obstacle();
        // Slightly right of the player, close above
        state.obstacles[0].pos = Vec2::new(state.player.pos.x + 10.0, 400.0);
        let keys = steer(&state);
        assert!(keys.left && !keys.right);
    }

    #[test]
    fn test_dodges_away_from_wall() {
        let mut state = GameState::new(1);
        state.start(1);
        state.player.pos.x = 0.0;
        state.spawn_obstacle();
        state.obstacles[0].pos = Vec2::new(5.0, 420.0);
        let keys = steer(&state);
        assert!(keys.right && !keys.left);
    }
}
