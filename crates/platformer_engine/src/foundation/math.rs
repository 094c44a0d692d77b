//! Math utilities and types
//!
//! 2D world space: x grows right, y grows down (tilemap convention).

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned bounding box described by its centre and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Centre of the box
    pub center: Vec2,

    /// Half of the width and height
    pub half_extents: Vec2,
}

impl Aabb {
    /// Create a box from its centre and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Minimum (top-left) corner
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Maximum (bottom-right) corner
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Strict intersection test; boxes that only touch along an edge do not overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(8.0, 3.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_corners() {
        let a = Aabb::from_center_size(Vec2::new(5.0, 5.0), Vec2::new(4.0, 2.0));
        assert_eq!(a.min(), Vec2::new(3.0, 4.0));
        assert_eq!(a.max(), Vec2::new(7.0, 6.0));
    }
}
