//! # Platformer Engine
//!
//! Level controller for a tile-based 2D platformer. It loads a tilemap
//! description, spawns the player and the interactive entities, and drives
//! per-tick movement plus the interaction and progression rules.
//!
//! ## Features
//!
//! - **Interaction rules**: coins, keys, locks and hazards map overlap events
//!   to state transitions and side-effect commands
//! - **Progression**: coin tally, timed jump power-up, one-shot level completion
//! - **Movement**: stateless per-tick input resolution against a physics body
//! - **Sessions**: wholesale restart with a generation guard for deferred events
//!
//! Rendering, asset decoding, camera and input polling stay outside the crate:
//! the session emits [`render::RenderCommand`]s and consumes
//! [`movement::InputState`] snapshots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platformer_engine::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let level = Arc::new(LevelData::load("assets/level1.ron")?);
//!     let config = Arc::new(GameConfig::default());
//!     let mut runner = LevelRunner::new(level, config)?;
//!
//!     let input = InputState { right: true, ..Default::default() };
//!     let report = runner.tick(input, 1.0 / 60.0)?;
//!     for command in report.commands {
//!         println!("{command:?}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod level;
pub mod physics;
pub mod render;
pub mod entities;
pub mod player;
pub mod progress;
pub mod interaction;
pub mod movement;
pub mod session;
pub mod runner;

#[cfg(test)]
mod tests;

pub use session::{LevelSession, OverlapOutcome};
pub use runner::{LevelRunner, TickReport};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        LevelRunner, LevelSession, TickReport,
        config::{Config, ConfigError, GameConfig},
        entities::{EntityKey, EntityKind, EntityRegistry, InteractiveEntity},
        events::{DeferredEvent, Generation, TimerHandle, TimerQueue},
        foundation::math::Vec2,
        interaction::{InteractionResolver, SideEffect},
        level::{LevelData, LevelError},
        movement::{Facing, InputState, MovementController},
        physics::{ArcadeBody, ArcadeWorld, PhysicsBody},
        player::{JumpMode, PlayerState},
        progress::ProgressTracker,
        render::{Animation, ParticleCommand, RenderCommand, TextSlot},
    };
}
