//! Player-owned flags and jump tuning
//!
//! Position and velocity belong to the physics body; this state only carries
//! what the game rules mutate.

use crate::config::MovementConfig;

/// Which of the two jump strengths is in effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JumpMode {
    /// Normal jump
    #[default]
    Normal,
    /// Power-up jump
    Boosted,
}

/// Flags and counters owned by the player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Set by picking up a key; never cleared within a session
    pub has_key: bool,
    jump_mode: JumpMode,
    normal_jump_velocity: f32,
    boosted_jump_velocity: f32,
}

impl PlayerState {
    /// Create a fresh player using the configured jump velocities
    pub fn new(movement: &MovementConfig) -> Self {
        Self {
            has_key: false,
            jump_mode: JumpMode::Normal,
            normal_jump_velocity: movement.jump_velocity,
            boosted_jump_velocity: movement.boosted_jump_velocity,
        }
    }

    /// Vertical velocity assigned when jumping. Always one of the two
    /// configured values.
    pub fn jump_velocity(&self) -> f32 {
        match self.jump_mode {
            JumpMode::Normal => self.normal_jump_velocity,
            JumpMode::Boosted => self.boosted_jump_velocity,
        }
    }

    /// Current jump mode
    pub fn jump_mode(&self) -> JumpMode {
        self.jump_mode
    }

    /// Switch to the boosted jump
    pub fn boost_jump(&mut self) {
        self.jump_mode = JumpMode::Boosted;
    }

    /// Back to the normal jump
    pub fn reset_jump(&mut self) {
        self.jump_mode = JumpMode::Normal;
    }

    /// Record a key pickup; idempotent
    pub fn pick_up_key(&mut self) {
        self.has_key = true;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_velocity_has_two_values() {
        let mut player = PlayerState::default();
        assert_eq!(player.jump_velocity(), -600.0);

        player.boost_jump();
        assert_eq!(player.jump_mode(), JumpMode::Boosted);
        assert_eq!(player.jump_velocity(), -900.0);

        player.boost_jump();
        assert_eq!(player.jump_velocity(), -900.0);

        player.reset_jump();
        assert_eq!(player.jump_velocity(), -600.0);
    }

    #[test]
    fn test_key_pickup_is_idempotent() {
        let mut player = PlayerState::default();
        assert!(!player.has_key);
        player.pick_up_key();
        player.pick_up_key();
        assert!(player.has_key);
    }
}
