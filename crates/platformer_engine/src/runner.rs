//! # Level Runner
//!
//! Drives one [`LevelSession`] against the built-in arcade physics. The host
//! calls [`LevelRunner::tick`] once per frame with the sampled input and
//! hands the returned render commands to its renderer.

use crate::config::GameConfig;
use crate::events::TimerQueue;
use crate::foundation::math::Vec2;
use crate::level::{LevelData, LevelError};
use crate::movement::InputState;
use crate::physics::{ArcadeBody, ArcadeWorld};
use crate::render::RenderCommand;
use crate::session::{LevelSession, OverlapOutcome};
use std::sync::Arc;

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Presentation commands, in the order they were issued
    pub commands: Vec<RenderCommand>,
    /// The session was rebuilt during this tick
    pub restarted: bool,
    /// The level has been completed
    pub level_complete: bool,
}

/// Owns the session, the physics world, the player body and the timers
#[derive(Debug)]
pub struct LevelRunner {
    session: LevelSession,
    world: ArcadeWorld,
    body: ArcadeBody,
    timers: TimerQueue,
    clock: f64,
    frame_count: u64,
}

impl LevelRunner {
    /// Load the level and place the player at the configured spawn point
    pub fn new(level: Arc<LevelData>, config: Arc<GameConfig>) -> Result<Self, LevelError> {
        let world = ArcadeWorld::new(level.collision_grid()?, config.physics.gravity);
        let session = LevelSession::load(level, config)?;
        let body = Self::spawn_body(&session);

        Ok(Self {
            session,
            world,
            body,
            timers: TimerQueue::new(),
            clock: 0.0,
            frame_count: 0,
        })
    }

    fn spawn_body(session: &LevelSession) -> ArcadeBody {
        let (width, height) = session.config().physics.player_size;
        ArcadeBody::new(session.spawn_point(), Vec2::new(width, height))
    }

    /// Advance the level by `delta_time` seconds.
    ///
    /// Due timers fire first, then the restart key, movement, the physics
    /// step and finally overlap resolution. A restart ends the tick.
    pub fn tick(&mut self, input: InputState, delta_time: f32) -> Result<TickReport, LevelError> {
        let delta_time = delta_time.max(0.0);
        self.frame_count += 1;
        self.clock += f64::from(delta_time);
        self.timers.update_time(self.clock);

        for scheduled in self.timers.take_due() {
            self.session.on_deferred(scheduled.generation, scheduled.event);
        }

        if input.restart {
            log::info!("Restart requested at frame {}", self.frame_count);
            self.restart()?;
            return Ok(self.report(true));
        }

        self.session.update(input, &mut self.body);
        self.world.step(&mut self.body, delta_time);

        let mut restarted = false;
        for key in self.world.overlaps(&self.body, self.session.registry()) {
            if self.session.handle_overlap(key, &mut self.timers)? == OverlapOutcome::Restarted {
                // Remaining keys belong to the discarded session
                self.body = Self::spawn_body(&self.session);
                restarted = true;
                break;
            }
        }

        Ok(self.report(restarted))
    }

    fn report(&mut self, restarted: bool) -> TickReport {
        TickReport {
            commands: self.session.drain_render_commands(),
            restarted,
            level_complete: self.session.tracker().level_complete(),
        }
    }

    /// Rebuild the session and put the player back at the spawn point.
    /// Pending timers stay queued and are ignored when they fire.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.session.restart()?;
        self.body = Self::spawn_body(&self.session);
        Ok(())
    }

    /// Current session
    pub fn session(&self) -> &LevelSession {
        &self.session
    }

    /// Player body
    pub fn body(&self) -> &ArcadeBody {
        &self.body
    }

    /// Mutable player body, for hosts that teleport the player
    pub fn body_mut(&mut self) -> &mut ArcadeBody {
        &mut self.body
    }

    /// Physics world
    pub fn world(&self) -> &ArcadeWorld {
        &self.world
    }

    /// Pending deferred events
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Seconds simulated so far
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
