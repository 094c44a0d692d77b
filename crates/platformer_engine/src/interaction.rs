//! Overlap rules
//!
//! Each entity kind has its own handler. A handler receives every piece of
//! state it may touch as a parameter, applies the state transition, and
//! returns the side effects the session still has to carry out (despawning,
//! HUD text, timers, restart).

use crate::entities::{EntityKey, EntityKind, InteractiveEntity};
use crate::player::PlayerState;
use crate::progress::ProgressTracker;

/// Command produced by an overlap, applied by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Remove the entity from the world
    DestroyEntity(EntityKey),
    /// Show the new coin tally
    UpdateCoinCount(u32),
    /// Coin threshold reached with no power-up running
    ActivatePowerUp,
    /// Lock opened with a key
    LevelComplete,
    /// Hazard touched; rebuild the whole session
    RestartLevel,
}

/// Maps (player, entity) overlaps to state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionResolver {
    coin_threshold: u32,
}

impl InteractionResolver {
    /// Create a resolver activating the power-up at `coin_threshold` coins
    pub fn new(coin_threshold: u32) -> Self {
        Self { coin_threshold }
    }

    /// Coins needed for the power-up
    pub fn coin_threshold(&self) -> u32 {
        self.coin_threshold
    }

    /// Resolve one overlap report
    pub fn on_overlap(
        &self,
        key: EntityKey,
        entity: &mut InteractiveEntity,
        player: &mut PlayerState,
        tracker: &mut ProgressTracker,
    ) -> Vec<SideEffect> {
        match entity.kind {
            EntityKind::Coin => self.collect_coin(key, entity, tracker),
            EntityKind::Key => Self::collect_key(key, entity, player),
            EntityKind::Lock => Self::unlock(key, entity, player),
            EntityKind::Hazard => Self::touch_hazard(),
        }
    }

    fn collect_coin(
        &self,
        key: EntityKey,
        coin: &mut InteractiveEntity,
        tracker: &mut ProgressTracker,
    ) -> Vec<SideEffect> {
        // The engine may report the same overlap twice before the despawn lands
        if !coin.alive {
            log::debug!("Ignoring overlap with consumed coin {:?}", key);
            return Vec::new();
        }
        coin.alive = false;

        let count = tracker.collect_coin();
        let mut effects = vec![SideEffect::DestroyEntity(key), SideEffect::UpdateCoinCount(count)];
        if tracker.power_up_due(self.coin_threshold) {
            effects.push(SideEffect::ActivatePowerUp);
        }
        effects
    }

    fn collect_key(key: EntityKey, item: &mut InteractiveEntity, player: &mut PlayerState) -> Vec<SideEffect> {
        if !item.alive {
            return Vec::new();
        }
        item.alive = false;
        player.pick_up_key();
        vec![SideEffect::DestroyEntity(key)]
    }

    fn unlock(key: EntityKey, lock: &mut InteractiveEntity, player: &PlayerState) -> Vec<SideEffect> {
        if !lock.alive || !player.has_key {
            return Vec::new();
        }
        lock.alive = false;
        vec![SideEffect::DestroyEntity(key), SideEffect::LevelComplete]
    }

    fn touch_hazard() -> Vec<SideEffect> {
        vec![SideEffect::RestartLevel]
    }
}

impl Default for InteractionResolver {
    fn default() -> Self {
        Self::new(crate::config::ProgressionConfig::default().coin_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityRegistry;
    use crate::events::{Generation, TimerQueue};
    use crate::foundation::math::Vec2;

    struct Fixture {
        registry: EntityRegistry,
        player: PlayerState,
        tracker: ProgressTracker,
        resolver: InteractionResolver,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: EntityRegistry::new(),
                player: PlayerState::default(),
                tracker: ProgressTracker::new(),
                resolver: InteractionResolver::new(15),
            }
        }

        fn spawn(&mut self, kind: EntityKind) -> EntityKey {
            self.registry
                .spawn(InteractiveEntity::new(kind, Vec2::zeros(), Vec2::new(18.0, 18.0)))
        }

        fn overlap(&mut self, key: EntityKey) -> Vec<SideEffect> {
            let entity = self.registry.get_mut(key).unwrap();
            self.resolver.on_overlap(key, entity, &mut self.player, &mut self.tracker)
        }
    }

    #[test]
    fn test_coin_counts_once_under_duplicate_overlap() {
        let mut fx = Fixture::new();
        let coin = fx.spawn(EntityKind::Coin);

        let first = fx.overlap(coin);
        let second = fx.overlap(coin);

        assert_eq!(
            first,
            vec![SideEffect::DestroyEntity(coin), SideEffect::UpdateCoinCount(1)]
        );
        assert!(second.is_empty());
        assert_eq!(fx.tracker.coin_count(), 1);
    }

    #[test]
    fn test_n_coins_count_n() {
        let mut fx = Fixture::new();
        let coins: Vec<_> = (0..7).map(|_| fx.spawn(EntityKind::Coin)).collect();
        for coin in &coins {
            fx.overlap(*coin);
            fx.overlap(*coin);
        }
        assert_eq!(fx.tracker.coin_count(), 7);
    }

    #[test]
    fn test_fifteenth_coin_activates_power_up_once() {
        let mut fx = Fixture::new();
        let mut timers = TimerQueue::new();
        let mut activations = 0;

        for _ in 0..16 {
            let coin = fx.spawn(EntityKind::Coin);
            let effects = fx.overlap(coin);
            if effects.contains(&SideEffect::ActivatePowerUp) {
                activations += 1;
                assert_eq!(fx.tracker.coin_count(), 15);
                fx.tracker
                    .activate_power_up(&mut fx.player, &mut timers, Generation::FIRST, 10.0);
            }
        }
        assert_eq!(activations, 1);
    }

    #[test]
    fn test_key_sets_flag_and_is_consumed() {
        let mut fx = Fixture::new();
        let key = fx.spawn(EntityKind::Key);

        assert_eq!(fx.overlap(key), vec![SideEffect::DestroyEntity(key)]);
        assert!(fx.player.has_key);
        assert!(fx.overlap(key).is_empty());
    }

    #[test]
    fn test_lock_without_key_is_a_no_op() {
        let mut fx = Fixture::new();
        let lock = fx.spawn(EntityKind::Lock);

        assert!(fx.overlap(lock).is_empty());
        assert!(fx.registry.get(lock).unwrap().alive);
        assert!(!fx.tracker.level_complete());
    }

    #[test]
    fn test_lock_with_key_completes_level_once() {
        let mut fx = Fixture::new();
        let key = fx.spawn(EntityKind::Key);
        let lock = fx.spawn(EntityKind::Lock);
        fx.overlap(key);

        assert_eq!(
            fx.overlap(lock),
            vec![SideEffect::DestroyEntity(lock), SideEffect::LevelComplete]
        );
        assert!(fx.overlap(lock).is_empty());
    }

    #[test]
    fn test_hazard_always_restarts() {
        let mut fx = Fixture::new();
        let water = fx.spawn(EntityKind::Hazard);
        assert_eq!(fx.overlap(water), vec![SideEffect::RestartLevel]);
        assert_eq!(fx.overlap(water), vec![SideEffect::RestartLevel]);
    }
}
