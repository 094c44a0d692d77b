//! # Level Session
//!
//! One attempt at a level. A session owns the player flags, the progress
//! tracker and the entity registry, routes overlap reports through the
//! [`InteractionResolver`] and ticks through the [`MovementController`].
//!
//! Restarting never patches a session in place: it is rebuilt from the same
//! level data with the next [`Generation`]. Deferred events carry the
//! generation that posted them and are ignored by any later session.

use crate::config::GameConfig;
use crate::entities::{EntityKey, EntityKind, EntityRegistry};
use crate::events::{DeferredEvent, Generation, TimerQueue};
use crate::foundation::math::Vec2;
use crate::interaction::{InteractionResolver, SideEffect};
use crate::level::{LevelData, LevelError, GROUND_LAYER};
use crate::movement::{InputState, MovementCommands, MovementController};
use crate::physics::PhysicsBody;
use crate::player::PlayerState;
use crate::progress::ProgressTracker;
use crate::render::{ParticleCommand, RenderCommand, RenderQueue, TextSlot};
use std::sync::Arc;

/// What the caller has to do after an overlap was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapOutcome {
    /// Keep processing this tick's overlaps
    Continue,
    /// The session was rebuilt; drop the rest of this tick's overlaps
    Restarted,
}

/// State of one attempt at a level
#[derive(Debug)]
pub struct LevelSession {
    level: Arc<LevelData>,
    config: Arc<GameConfig>,
    generation: Generation,
    player: PlayerState,
    tracker: ProgressTracker,
    registry: EntityRegistry,
    resolver: InteractionResolver,
    movement: MovementController,
    render: RenderQueue,
}

impl LevelSession {
    /// Build the first session for a level
    pub fn load(level: Arc<LevelData>, config: Arc<GameConfig>) -> Result<Self, LevelError> {
        Self::with_generation(level, config, Generation::FIRST)
    }

    fn with_generation(
        level: Arc<LevelData>,
        config: Arc<GameConfig>,
        generation: Generation,
    ) -> Result<Self, LevelError> {
        // Without ground there is no level to play
        level.tile_layer(GROUND_LAYER)?;

        let registry = EntityRegistry::from_level(&level);
        let mut session = Self {
            player: PlayerState::new(&config.movement),
            tracker: ProgressTracker::new(),
            resolver: InteractionResolver::new(config.progression.coin_threshold),
            movement: MovementController::new(&config.movement),
            render: RenderQueue::new(),
            registry,
            generation,
            level,
            config,
        };
        session.populate_scene();

        log::info!(
            "Session {} loaded '{}': {} coins, {} keys, {} locks, {} hazards",
            session.generation,
            session.level.name,
            session.registry.live_count(EntityKind::Coin),
            session.registry.live_count(EntityKind::Key),
            session.registry.live_count(EntityKind::Lock),
            session.registry.live_count(EntityKind::Hazard),
        );
        Ok(session)
    }

    fn populate_scene(&mut self) {
        self.load_background_objects(self.config.level.background_offset_x);

        let spawns: Vec<RenderCommand> = self
            .registry
            .iter()
            .map(|(key, entity)| RenderCommand::SpawnEntity {
                key,
                kind: entity.kind,
                position: entity.position,
                frame: entity.kind.frame(),
            })
            .collect();
        for command in spawns {
            self.render.push(command);
        }

        self.render.push(RenderCommand::SpawnPlayer { position: self.spawn_point() });
        self.render.push(RenderCommand::Particles(ParticleCommand::Stop));
        self.render.set_text(TextSlot::Coins, self.config.display.coin_text(0));
        self.render.set_text(TextSlot::PowerUp, "");
    }

    /// Place the decorative background objects, shifted by `offset_x`.
    /// A level without a background layer just has no decorations.
    pub fn load_background_objects(&mut self, offset_x: f32) -> usize {
        match self.level.background_objects(offset_x) {
            Ok(decorations) => {
                for decoration in &decorations {
                    self.render.push(RenderCommand::SpawnDecoration {
                        position: decoration.position,
                        frame: decoration.frame,
                    });
                }
                decorations.len()
            }
            Err(e) => {
                log::error!("Background layer not found! ({})", e);
                0
            }
        }
    }

    /// Throw this attempt away and rebuild it from the same level data.
    /// Commands not yet drained are kept, followed by `ResetScene` and the
    /// new session's scene.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        let next = self.generation.next();
        log::info!("Restarting '{}' as session {}", self.level.name, next);

        let rebuilt = Self::with_generation(Arc::clone(&self.level), Arc::clone(&self.config), next)?;
        let mut pending = self.render.drain();
        *self = rebuilt;

        pending.push(RenderCommand::ResetScene);
        pending.extend(self.render.drain());
        for command in pending {
            self.render.push(command);
        }
        Ok(())
    }

    /// Resolve this tick's input against the player's body
    pub fn update(&mut self, input: InputState, body: &mut dyn PhysicsBody) -> MovementCommands {
        self.movement.update(input, body, &self.player, &mut self.render)
    }

    /// Handle the player overlapping `key`
    pub fn handle_overlap(&mut self, key: EntityKey, timers: &mut TimerQueue) -> Result<OverlapOutcome, LevelError> {
        let Some(entity) = self.registry.get_mut(key) else {
            log::debug!("Overlap with unknown entity {:?} ignored", key);
            return Ok(OverlapOutcome::Continue);
        };
        let effects = self
            .resolver
            .on_overlap(key, entity, &mut self.player, &mut self.tracker);

        for effect in effects {
            if self.apply(effect, timers) == OverlapOutcome::Restarted {
                self.restart()?;
                return Ok(OverlapOutcome::Restarted);
            }
        }
        Ok(OverlapOutcome::Continue)
    }

    fn apply(&mut self, effect: SideEffect, timers: &mut TimerQueue) -> OverlapOutcome {
        match effect {
            SideEffect::DestroyEntity(key) => {
                if self.registry.despawn(key) {
                    self.render.push(RenderCommand::DespawnEntity(key));
                }
            }
            SideEffect::UpdateCoinCount(count) => {
                self.render.set_text(TextSlot::Coins, self.config.display.coin_text(count));
            }
            SideEffect::ActivatePowerUp => {
                let duration = self.config.progression.power_up_duration();
                if self
                    .tracker
                    .activate_power_up(&mut self.player, timers, self.generation, duration)
                {
                    log::info!("Power-up active for {:.1}s", duration);
                    self.render.set_text(TextSlot::PowerUp, self.config.display.power_up_text.clone());
                }
            }
            SideEffect::LevelComplete => {
                if self.tracker.complete_level() {
                    log::info!("Level '{}' complete", self.level.name);
                    self.render.push(RenderCommand::ShowBanner {
                        text: self.config.display.level_complete_text.clone(),
                    });
                    timers.post_after(
                        self.config.progression.banner_duration(),
                        self.generation,
                        DeferredEvent::RemoveBanner,
                    );
                }
            }
            SideEffect::RestartLevel => return OverlapOutcome::Restarted,
        }
        OverlapOutcome::Continue
    }

    /// Deliver a fired timer. Timers posted by an earlier session are dropped.
    /// Returns whether the event was applied.
    pub fn on_deferred(&mut self, generation: Generation, event: DeferredEvent) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping {:?} from superseded session {} (current {})",
                event,
                generation,
                self.generation
            );
            return false;
        }
        match event {
            DeferredEvent::DeactivatePowerUp => {
                if self.tracker.deactivate_power_up(&mut self.player) {
                    log::info!("Power-up expired");
                    self.render.set_text(TextSlot::PowerUp, "");
                }
            }
            DeferredEvent::RemoveBanner => self.render.push(RenderCommand::RemoveBanner),
        }
        true
    }

    /// Take the presentation commands recorded so far
    pub fn drain_render_commands(&mut self) -> Vec<RenderCommand> {
        self.render.drain()
    }

    /// Commands recorded since the last drain
    pub fn pending_render_commands(&self) -> &[RenderCommand] {
        self.render.as_slice()
    }

    /// Where the player body starts
    pub fn spawn_point(&self) -> Vec2 {
        let (x, y) = self.config.level.player_spawn;
        Vec2::new(x, y)
    }

    /// This session's epoch
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Player flags
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Progress state
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Interactive entities
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Level being played
    pub fn level(&self) -> &Arc<LevelData> {
        &self.level
    }

    /// Active configuration
    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }
}
