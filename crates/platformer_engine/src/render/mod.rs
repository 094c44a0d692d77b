//! Rendering command pattern
//!
//! The level controller never draws. It records what the presentation layer
//! should do as [`RenderCommand`]s, which the host drains once per tick and
//! hands to whatever renderer it runs.

use crate::entities::{EntityKey, EntityKind};
use crate::foundation::math::Vec2;

/// Player animation clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Walking loop
    Walk,
    /// Standing still
    Idle,
}

impl Animation {
    /// Clip name in the character atlas
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Idle => "idle",
        }
    }
}

/// Walking dust emitter control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleCommand {
    /// Emit at, and follow, the player
    StartFollow,
    /// Stop emitting
    Stop,
}

/// HUD text slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    /// Coin counter
    Coins,
    /// Power-up status
    PowerUp,
}

/// A single instruction for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Drop everything from the previous session
    ResetScene,
    /// Place the player sprite
    SpawnPlayer {
        /// Spawn point
        position: Vec2,
    },
    /// Place an interactive entity sprite
    SpawnEntity {
        /// Entity handle, used by `DespawnEntity`
        key: EntityKey,
        /// Entity kind
        kind: EntityKind,
        /// Sprite centre
        position: Vec2,
        /// Sprite sheet frame
        frame: u32,
    },
    /// Place a background decoration, anchored at its bottom-right corner
    SpawnDecoration {
        /// Anchor point
        position: Vec2,
        /// Sprite sheet frame
        frame: u32,
    },
    /// Remove an entity sprite
    DespawnEntity(EntityKey),
    /// Switch the player animation
    PlayAnimation {
        /// Clip to play
        animation: Animation,
        /// Keep the current clip running if it is already this one
        ignore_if_playing: bool,
    },
    /// Mirror the player sprite horizontally
    SetFlipX(bool),
    /// Walking particles
    Particles(ParticleCommand),
    /// Replace the text of a HUD slot; an empty string clears it
    SetText {
        /// Target slot
        slot: TextSlot,
        /// New content
        text: String,
    },
    /// Show the centred level banner
    ShowBanner {
        /// Banner text
        text: String,
    },
    /// Remove the level banner
    RemoveBanner,
}

/// Ordered list of commands waiting to be drained
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderQueue {
    commands: Vec<RenderCommand>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Set a HUD slot's text
    pub fn set_text(&mut self, slot: TextSlot, text: impl Into<String>) {
        self.push(RenderCommand::SetText { slot, text: text.into() });
    }

    /// Take every queued command, leaving the queue empty
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands queued so far
    pub fn as_slice(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
