//! # Axis-Aligned Bounding Boxes
//!
//! Fast rejection volumes for overlap checks.

use glam::DVec3;

use crate::transform::RigidTransform;

/// Axis-aligned bounding box.
///
/// Invariant: `min` components are less than or equal to `max` components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: DVec3,
    max: DVec3,
}

impl Aabb {
    /// Builds the box spanned by two opposite corners, in any order.
    pub fn from_corners(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a box centered at `center` with the given half extents.
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self::from_corners(center - half, center + half)
    }

    /// Builds the minimal box containing all `points`, `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_corners(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> DVec3 {
        self.min
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> DVec3 {
        self.max
    }

    /// Half of the box size along each axis.
    pub fn half_extents(&self) -> DVec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns `true` if the boxes intersect. Touching faces count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Overlapping region of two boxes, `None` when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.intersects(other).then(|| Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }

    /// The box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec3::splat(margin),
            max: self.max + DVec3::splat(margin),
        }
    }

    /// Returns `true` if `point` lies inside or on the box.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Bounds of this box after mapping its eight corners through `transform`.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        let corner = |i: u8| {
            transform.apply_point(DVec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            ))
        };
        let first = corner(0);
        (1..8).map(corner).fold(Self::from_corners(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    #[test]
    fn test_intersects_inclusive() {
        let a = Aabb::from_corners(DVec3::ZERO, DVec3::ONE);
        let b = Aabb::from_corners(DVec3::ONE, DVec3::splat(2.0));
        let c = Aabb::from_corners(DVec3::splat(1.5), DVec3::splat(2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([
            DVec3::new(1.0, -2.0, 0.0),
            DVec3::new(-1.0, 3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min(), DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max(), DVec3::new(1.0, 3.0, 4.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_transformed_translation() {
        let aabb = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        let moved = aabb.transformed(&RigidTransform::from_translation(DVec3::X * 10.0));
        assert_eq!(moved.min(), DVec3::new(9.0, -2.0, -3.0));
        assert_eq!(moved.max(), DVec3::new(11.0, 2.0, 3.0));
    }

    #[test]
    fn test_transformed_rotation_swaps_axes() {
        let aabb = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        let turned = aabb.transformed(&RigidTransform::from_rotation(DQuat::from_rotation_z(
            std::f64::consts::FRAC_PI_2,
        )));
        let half = turned.half_extents();
        assert!((half.x - 2.0).abs() < 1e-12);
        assert!((half.y - 1.0).abs() < 1e-12);
        assert!((half.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_intersection_region() {
        let a = Aabb::from_corners(DVec3::ZERO, DVec3::splat(2.0));
        let b = Aabb::from_corners(DVec3::ONE, DVec3::splat(3.0));
        let region = a.intersection(&b).unwrap();
        assert_eq!(region.min(), DVec3::ONE);
        assert_eq!(region.max(), DVec3::splat(2.0));

        let far = Aabb::from_corners(DVec3::splat(5.0), DVec3::splat(6.0));
        assert!(a.intersection(&far).is_none());
        assert!(far.expanded(3.0).intersection(&a).is_some());
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::ONE);
        assert!(aabb.contains_point(DVec3::ONE));
        assert!(!aabb.contains_point(DVec3::new(1.1, 0.0, 0.0)));
    }
}
