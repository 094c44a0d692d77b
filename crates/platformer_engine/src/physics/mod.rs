//! Physics boundary
//!
//! The level controller talks to the player's body only through
//! [`PhysicsBody`]. Any engine that can set acceleration, drag and vertical
//! velocity and report floor contact can drive a session. [`ArcadeBody`] and
//! [`ArcadeWorld`] are a small tile-based reference backend used by
//! [`crate::LevelRunner`] and the tests.

pub mod arcade;

pub use arcade::{ArcadeBody, ArcadeWorld};

use crate::foundation::math::Vec2;

/// Accessors the movement rules need from a physics body
pub trait PhysicsBody {
    /// Set horizontal acceleration (px/s²)
    fn set_acceleration_x(&mut self, acceleration: f32);

    /// Set horizontal drag (px/s²); the body keeps it until changed
    fn set_drag_x(&mut self, drag: f32);

    /// Overwrite vertical velocity
    fn set_velocity_y(&mut self, velocity: f32);

    /// Current velocity
    fn velocity(&self) -> Vec2;

    /// Current centre position
    fn position(&self) -> Vec2;

    /// Whether the body is resting on something below it
    fn is_blocked_down(&self) -> bool;

    /// Speed magnitude
    fn speed(&self) -> f32 {
        self.velocity().magnitude()
    }
}
