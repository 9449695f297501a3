//! Held movement keys
//!
//! Key events only flip flags here; the next tick reads whatever is held.

/// Horizontal movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Left,
    Right,
}

impl MoveKey {
    /// Map a DOM `KeyboardEvent.key` name to a movement key
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(MoveKey::Left),
            "ArrowRight" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Set of currently held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: MoveKey, held: bool) {
        match key {
            MoveKey::Left => self.left = held,
            MoveKey::Right => self.right = held,
        }
    }

    pub fn press(&mut self, key: MoveKey) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.set(key, false);
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Left => self.left,
            MoveKey::Right => self.right,
        }
    }

    /// Release everything (focus loss, view teardown)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Net horizontal direction: -1 left, 1 right, 0 for none or both
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
