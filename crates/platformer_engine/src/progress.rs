//! Level progress: coin tally, power-up, completion
//!
//! Pure state plus transition rules. The only side effect is posting the
//! power-up expiry timer, which goes through the [`TimerQueue`] handed in by
//! the caller.

use crate::events::{DeferredEvent, Generation, TimerHandle, TimerQueue};
use crate::player::PlayerState;

/// Coins, power-up and completion state for one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressTracker {
    coin_count: u32,
    power_up_active: bool,
    power_up_expiry: Option<TimerHandle>,
    level_complete: bool,
}

impl ProgressTracker {
    /// Fresh tracker: no coins, no power-up, level in progress
    pub fn new() -> Self {
        Self::default()
    }

    /// Coins collected this session
    pub fn coin_count(&self) -> u32 {
        self.coin_count
    }

    /// Whether the jump power-up is running
    pub fn power_up_active(&self) -> bool {
        self.power_up_active
    }

    /// Timer that will end the running power-up
    pub fn power_up_expiry(&self) -> Option<TimerHandle> {
        self.power_up_expiry
    }

    /// Whether the level has been completed
    pub fn level_complete(&self) -> bool {
        self.level_complete
    }

    /// Count one coin and return the new tally
    pub fn collect_coin(&mut self) -> u32 {
        self.coin_count = self.coin_count.saturating_add(1);
        self.coin_count
    }

    /// Whether the tally has reached `threshold` with no power-up running
    pub fn power_up_due(&self, threshold: u32) -> bool {
        self.coin_count >= threshold && !self.power_up_active
    }

    /// Start the power-up: boost the jump and post the expiry timer
    /// `duration` seconds out. Returns false (and does nothing) when one is
    /// already running.
    pub fn activate_power_up(
        &mut self,
        player: &mut PlayerState,
        timers: &mut TimerQueue,
        generation: Generation,
        duration: f64,
    ) -> bool {
        if self.power_up_active {
            return false;
        }
        self.power_up_active = true;
        player.boost_jump();
        self.power_up_expiry = Some(timers.post_after(duration, generation, DeferredEvent::DeactivatePowerUp));
        true
    }

    /// End the power-up and restore the normal jump. Returns false when none
    /// was running.
    pub fn deactivate_power_up(&mut self, player: &mut PlayerState) -> bool {
        if !self.power_up_active {
            return false;
        }
        player.reset_jump();
        self.power_up_active = false;
        self.power_up_expiry = None;
        true
    }

    /// Mark the level complete. Only the first call returns true.
    pub fn complete_level(&mut self) -> bool {
        if self.level_complete {
            return false;
        }
        self.level_complete = true;
        true
    }
}
