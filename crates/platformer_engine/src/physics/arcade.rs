//! Tile-based arcade physics
//!
//! Axis-separated Euler integration against a [`CollisionGrid`]. Each axis
//! is swept from the previous position, so a long frame cannot carry the
//! body through or into a tile. Drag only acts while horizontal acceleration
//! is zero. The world rectangle is a hard boundary and its bottom edge counts
//! as floor.

use super::PhysicsBody;
use crate::entities::{EntityKey, EntityKind, EntityRegistry};
use crate::foundation::math::{Aabb, Vec2};
use crate::level::CollisionGrid;

/// Dynamic body for the player
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeBody {
    /// Centre position
    pub position: Vec2,
    /// Hitbox size
    pub size: Vec2,
    /// Velocity in px/s
    pub velocity: Vec2,
    /// Horizontal acceleration in px/s²
    pub acceleration_x: f32,
    /// Horizontal drag in px/s²
    pub drag_x: f32,
    blocked_down: bool,
}

impl ArcadeBody {
    /// Create a body at rest
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::zeros(),
            acceleration_x: 0.0,
            drag_x: 0.0,
            blocked_down: false,
        }
    }

    /// Hitbox
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    fn integrate_velocity(&mut self, gravity: f32, delta_time: f32) {
        if self.acceleration_x != 0.0 {
            self.velocity.x += self.acceleration_x * delta_time;
        } else if self.drag_x != 0.0 {
            let drag = self.drag_x * delta_time;
            if self.velocity.x - drag > 0.0 {
                self.velocity.x -= drag;
            } else if self.velocity.x + drag < 0.0 {
                self.velocity.x += drag;
            } else {
                self.velocity.x = 0.0;
            }
        }
        self.velocity.y += gravity * delta_time;
    }

    /// Stop at the first solid column the leading edge crossed since `previous_x`
    fn resolve_x(&mut self, grid: &CollisionGrid, previous_x: f32) {
        let tile = grid.tile_size().x;
        let half = self.size * 0.5;
        let rows = grid.rows_spanned(self.position.y - half.y, self.position.y + half.y);

        if self.position.x > previous_x {
            let mut entered = (((previous_x + half.x) / tile).ceil() as i32)
                ..=(((self.position.x + half.x) / tile).ceil() as i32 - 1);
            if let Some(column) = entered.find(|c| grid.column_blocked(*c, rows.clone())) {
                self.position.x = column as f32 * tile - half.x;
                self.velocity.x = 0.0;
            }
        } else if self.position.x < previous_x {
            let entered = (((self.position.x - half.x) / tile).floor() as i32)
                ..=(((previous_x - half.x) / tile).floor() as i32 - 1);
            if let Some(column) = entered.rev().find(|c| grid.column_blocked(*c, rows.clone())) {
                self.position.x = (column + 1) as f32 * tile + half.x;
                self.velocity.x = 0.0;
            }
        }
    }

    /// Stop at the first solid row the leading edge crossed since `previous_y`
    fn resolve_y(&mut self, grid: &CollisionGrid, previous_y: f32) {
        let tile = grid.tile_size().y;
        let half = self.size * 0.5;
        let columns = grid.columns_spanned(self.position.x - half.x, self.position.x + half.x);

        if self.position.y > previous_y {
            let mut entered = (((previous_y + half.y) / tile).ceil() as i32)
                ..=(((self.position.y + half.y) / tile).ceil() as i32 - 1);
            if let Some(row) = entered.find(|r| grid.row_blocked(*r, columns.clone())) {
                self.position.y = row as f32 * tile - half.y;
                self.velocity.y = 0.0;
                self.blocked_down = true;
            }
        } else if self.position.y < previous_y {
            let entered = (((self.position.y - half.y) / tile).floor() as i32)
                ..=(((previous_y - half.y) / tile).floor() as i32 - 1);
            if let Some(row) = entered.rev().find(|r| grid.row_blocked(*r, columns.clone())) {
                self.position.y = (row + 1) as f32 * tile + half.y;
                self.velocity.y = 0.0;
            }
        }
    }

    fn clamp_to_world(&mut self, world_size: Vec2) {
        let half = self.size * 0.5;
        if self.position.x - half.x < 0.0 {
            self.position.x = half.x;
            self.velocity.x = 0.0;
        } else if self.position.x + half.x > world_size.x {
            self.position.x = world_size.x - half.x;
            self.velocity.x = 0.0;
        }
        if self.position.y - half.y < 0.0 {
            self.position.y = half.y;
            self.velocity.y = 0.0;
        } else if self.position.y + half.y >= world_size.y {
            self.position.y = world_size.y - half.y;
            self.velocity.y = 0.0;
            self.blocked_down = true;
        }
    }
}

impl PhysicsBody for ArcadeBody {
    fn set_acceleration_x(&mut self, acceleration: f32) {
        self.acceleration_x = acceleration;
    }

    fn set_drag_x(&mut self, drag: f32) {
        self.drag_x = drag;
    }

    fn set_velocity_y(&mut self, velocity: f32) {
        self.velocity.y = velocity;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_blocked_down(&self) -> bool {
        self.blocked_down
    }
}

/// Static level geometry plus gravity
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    grid: CollisionGrid,
    gravity: f32,
}

impl ArcadeWorld {
    /// Create a world over `grid`
    pub fn new(grid: CollisionGrid, gravity: f32) -> Self {
        Self { grid, gravity }
    }

    /// Level geometry
    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    /// Advance `body` by `delta_time` seconds
    pub fn step(&self, body: &mut ArcadeBody, delta_time: f32) {
        body.integrate_velocity(self.gravity, delta_time);
        body.blocked_down = false;

        let previous = body.position;
        body.position.x += body.velocity.x * delta_time;
        body.resolve_x(&self.grid, previous.x);

        body.position.y += body.velocity.y * delta_time;
        body.resolve_y(&self.grid, previous.y);

        body.clamp_to_world(self.grid.size_in_pixels());
    }

    /// Live entities overlapping `body`, grouped in registration order
    /// (coins, keys, locks, hazards)
    pub fn overlaps(&self, body: &ArcadeBody, registry: &EntityRegistry) -> Vec<EntityKey> {
        let bounds = body.bounds();
        EntityKind::ALL
            .into_iter()
            .flat_map(|kind| registry.group(kind))
            .filter(|(_, entity)| entity.bounds().intersects(&bounds))
            .map(|(key, _)| key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InteractiveEntity;
    use crate::level::{LevelData, TileLayer, GROUND_LAYER};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    /// 10x6 cells of 10px, solid floor on the bottom row
    fn world() -> ArcadeWorld {
        world_with(&[])
    }

    /// Same floor plus extra solid `(column, row)` cells
    fn world_with(solid: &[(usize, usize)]) -> ArcadeWorld {
        let mut data = vec![0; 60];
        for cell in &mut data[50..60] {
            *cell = 1;
        }
        for &(column, row) in solid {
            data[row * 10 + column] = 1;
        }
        let level = LevelData {
            name: "physics".to_string(),
            width: 10,
            height: 6,
            tile_width: 10.0,
            tile_height: 10.0,
            colliding_tiles: vec![1],
            tile_layers: vec![TileLayer { name: GROUND_LAYER.to_string(), data }],
            object_layers: Vec::new(),
        };
        ArcadeWorld::new(level.collision_grid().unwrap(), 1500.0)
    }

    #[test]
    fn test_falls_onto_floor() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(50.0, 10.0), Vec2::new(8.0, 8.0));

        for _ in 0..120 {
            world.step(&mut body, DT);
        }
        assert!(body.is_blocked_down());
        assert_relative_eq!(body.position.y, 46.0);
        assert_relative_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_long_step_stops_on_floor_surface() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(50.0, 40.0), Vec2::new(8.0, 8.0));

        world.step(&mut body, 0.1);
        assert!(body.is_blocked_down());
        assert_relative_eq!(body.position.y, 46.0);

        // Resting on the surface, not inside it, so walking still works
        body.set_acceleration_x(400.0);
        world.step(&mut body, DT);
        assert!(body.position.x > 50.0);
        assert_relative_eq!(body.position.y, 46.0);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel_through_platform() {
        let platform = [(3, 2), (4, 2), (5, 2), (6, 2)];
        let world = world_with(&platform);
        let mut body = ArcadeBody::new(Vec2::new(50.0, 5.0), Vec2::new(8.0, 8.0));
        body.velocity.y = 2000.0;

        world.step(&mut body, 0.05);
        assert!(body.is_blocked_down());
        assert_relative_eq!(body.position.y, 16.0);
        assert_relative_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_fast_run_stops_at_wall() {
        let world = world_with(&[(7, 3), (7, 4)]);
        let mut body = ArcadeBody::new(Vec2::new(20.0, 46.0), Vec2::new(8.0, 8.0));
        body.velocity.x = 2000.0;

        world.step(&mut body, 0.05);
        assert_relative_eq!(body.position.x, 66.0);
        assert_relative_eq!(body.velocity.x, 0.0);
        assert_relative_eq!(body.position.y, 46.0);
    }

    #[test]
    fn test_acceleration_then_drag() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(20.0, 46.0), Vec2::new(8.0, 8.0));

        body.set_acceleration_x(400.0);
        world.step(&mut body, 0.1);
        assert_relative_eq!(body.velocity.x, 40.0);

        body.set_acceleration_x(0.0);
        body.set_drag_x(500.0);
        world.step(&mut body, 0.05);
        assert_relative_eq!(body.velocity.x, 15.0);
        world.step(&mut body, 0.05);
        assert_relative_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_drag_ignored_while_accelerating() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(20.0, 46.0), Vec2::new(8.0, 8.0));
        body.set_drag_x(500.0);
        body.set_acceleration_x(-400.0);
        world.step(&mut body, 0.1);
        assert_relative_eq!(body.velocity.x, -40.0);
    }

    #[test]
    fn test_world_bounds() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(5.0, 20.0), Vec2::new(8.0, 8.0));
        body.velocity.x = -300.0;
        world.step(&mut body, DT);
        assert_relative_eq!(body.position.x, 4.0);
        assert_relative_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_jump_leaves_floor() {
        let world = world();
        let mut body = ArcadeBody::new(Vec2::new(50.0, 46.0), Vec2::new(8.0, 8.0));
        world.step(&mut body, DT);
        assert!(body.is_blocked_down());

        body.set_velocity_y(-600.0);
        world.step(&mut body, DT);
        assert!(!body.is_blocked_down());
        assert!(body.position.y < 46.0);
    }

    #[test]
    fn test_overlaps_report_live_entities_in_group_order() {
        let world = world();
        let body = ArcadeBody::new(Vec2::new(50.0, 30.0), Vec2::new(10.0, 10.0));
        let mut registry = EntityRegistry::new();
        let size = Vec2::new(10.0, 10.0);
        let water = registry.spawn(InteractiveEntity::new(EntityKind::Hazard, Vec2::new(55.0, 30.0), size));
        let coin = registry.spawn(InteractiveEntity::new(EntityKind::Coin, Vec2::new(45.0, 30.0), size));
        let far = registry.spawn(InteractiveEntity::new(EntityKind::Coin, Vec2::new(5.0, 5.0), size));

        assert_eq!(world.overlaps(&body, &registry), vec![coin, water]);

        registry.despawn(coin);
        assert_eq!(world.overlaps(&body, &registry), vec![water]);
        assert!(!world.overlaps(&body, &registry).contains(&far));
    }
}
