//! Per-tick movement resolution
//!
//! Every tick is derived from scratch out of the current input snapshot and
//! the body's floor contact; nothing from the previous tick feeds in.
//!
//! Horizontal priority is fixed: left is checked first, so holding both
//! directions walks left.

use crate::config::MovementConfig;
use crate::physics::PhysicsBody;
use crate::player::PlayerState;
use crate::render::{Animation, ParticleCommand, RenderCommand, RenderQueue};

/// Input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Jump held
    pub up: bool,
    /// Restart key pressed this tick
    pub restart: bool,
}

/// Sprite facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Walking left; sprite drawn unflipped
    Left,
    /// Walking right; sprite mirrored
    Right,
}

impl Facing {
    /// Horizontal mirror flag for the sprite
    pub const fn flip_x(self) -> bool {
        matches!(self, Self::Right)
    }
}

/// Outcome of one tick's resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementCommands {
    /// Horizontal acceleration to set on the body
    pub acceleration_x: f32,
    /// Drag to set on the body, only when no direction is held
    pub drag_x: Option<f32>,
    /// New facing, only while walking
    pub facing: Option<Facing>,
    /// Animation to play
    pub animation: Animation,
    /// Vertical velocity to assign, only when jumping
    pub jump_velocity: Option<f32>,
}

/// Translates input into body commands and animation selection
#[derive(Debug, Clone, PartialEq)]
pub struct MovementController {
    acceleration: f32,
    drag: f32,
}

impl MovementController {
    /// Create a controller from the movement tuning
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            acceleration: config.acceleration,
            drag: config.drag,
        }
    }

    /// Pure resolution of one tick
    pub fn resolve(&self, input: InputState, grounded: bool, jump_velocity: f32) -> MovementCommands {
        let (acceleration_x, drag_x, facing, animation) = if input.left {
            (-self.acceleration, None, Some(Facing::Left), Animation::Walk)
        } else if input.right {
            (self.acceleration, None, Some(Facing::Right), Animation::Walk)
        } else {
            (0.0, Some(self.drag), None, Animation::Idle)
        };

        MovementCommands {
            acceleration_x,
            drag_x,
            facing,
            animation,
            jump_velocity: (input.up && grounded).then_some(jump_velocity),
        }
    }

    /// Particle emitter state for the given speed
    pub fn particles(speed: f32) -> ParticleCommand {
        if speed > 0.0 {
            ParticleCommand::StartFollow
        } else {
            ParticleCommand::Stop
        }
    }

    /// Resolve the tick and apply it to `body`, recording the presentation
    /// changes in `render`.
    pub fn update(
        &self,
        input: InputState,
        body: &mut dyn PhysicsBody,
        player: &PlayerState,
        render: &mut RenderQueue,
    ) -> MovementCommands {
        let commands = self.resolve(input, body.is_blocked_down(), player.jump_velocity());
        log::trace!("movement {:?} -> {:?}", input, commands);

        body.set_acceleration_x(commands.acceleration_x);
        if let Some(drag) = commands.drag_x {
            body.set_drag_x(drag);
        }
        if let Some(facing) = commands.facing {
            render.push(RenderCommand::SetFlipX(facing.flip_x()));
        }
        render.push(RenderCommand::PlayAnimation {
            animation: commands.animation,
            ignore_if_playing: commands.animation == Animation::Walk,
        });
        render.push(RenderCommand::Particles(Self::particles(body.speed())));

        if let Some(velocity) = commands.jump_velocity {
            body.set_velocity_y(velocity);
        }
        commands
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}
