//! # Rigid Transforms
//!
//! Placement frames for physical volumes. A transform maps a point from a
//! child's local frame into its parent's frame:
//!
//! ```text
//! p_parent = R * p_child + t
//! ```
//!
//! Transforms compose one level at a time, child to parent.

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Rotation plus translation, no scale.
///
/// # Example
///
/// ```rust
/// use detector_geometry::transform::RigidTransform;
/// use glam::DVec3;
///
/// let t = RigidTransform::from_euler_deg(DVec3::new(0.0, 0.0, 90.0))
///     .with_translation(DVec3::new(10.0, 0.0, 0.0));
/// let p = t.apply_point(DVec3::X);
/// assert!((p - DVec3::new(10.0, 1.0, 0.0)).length() < 1e-12);
/// assert!((t.apply_inverse_point(p) - DVec3::X).length() < 1e-12);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    rotation: DQuat,
    translation: DVec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    /// No rotation, no translation.
    pub const IDENTITY: Self = Self {
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Creates a transform from a rotation and a translation. The rotation is
    /// normalized.
    pub fn new(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            translation,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            rotation: DQuat::IDENTITY,
            translation,
        }
    }

    /// Pure rotation.
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self::new(rotation, DVec3::ZERO)
    }

    /// Pure rotation from intrinsic X, Y, Z Euler angles in degrees.
    pub fn from_euler_deg(angles: DVec3) -> Self {
        Self::from_rotation(DQuat::from_euler(
            EulerRot::XYZ,
            angles.x.to_radians(),
            angles.y.to_radians(),
            angles.z.to_radians(),
        ))
    }

    /// Replaces the translation.
    #[must_use]
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    /// Rotation component.
    #[inline]
    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    /// Translation component.
    #[inline]
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// Maps a point from the child frame into the parent frame.
    #[inline]
    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Maps a point from the parent frame into the child frame.
    #[inline]
    pub fn apply_inverse_point(&self, point: DVec3) -> DVec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Inverse transform (parent frame into child frame).
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Composes `self` (child in parent) with `outer` (parent in
    /// grandparent), giving the child's frame in the grandparent.
    #[must_use]
    pub fn then(&self, outer: &Self) -> Self {
        Self {
            rotation: (outer.rotation * self.rotation).normalize(),
            translation: outer.apply_point(self.translation),
        }
    }

    /// Returns `true` for the identity within `tolerance`.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.translation.length() <= tolerance
            && self.rotation.abs_diff_eq(DQuat::IDENTITY, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_vec_eq(a: DVec3, b: DVec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-12);
    }

    #[test]
    fn test_identity() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(RigidTransform::IDENTITY.apply_point(p), p);
        assert!(RigidTransform::default().is_identity(0.0));
    }

    #[test]
    fn test_translation_then_rotation_order() {
        let t = RigidTransform::new(
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
            DVec3::new(0.0, 0.0, 5.0),
        );
        // Rotate first, then translate.
        assert_vec_eq(t.apply_point(DVec3::X), DVec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = RigidTransform::from_euler_deg(DVec3::new(10.0, 20.0, 30.0))
            .with_translation(DVec3::new(1.0, -1.0, 2.0));
        let p = DVec3::new(3.0, 4.0, 5.0);
        assert_vec_eq(t.inverse().apply_point(t.apply_point(p)), p);
        assert_vec_eq(t.apply_inverse_point(t.apply_point(p)), p);
    }

    #[test]
    fn test_then_composes_child_to_parent() {
        let child = RigidTransform::from_translation(DVec3::new(1.0, 0.0, 0.0));
        let parent = RigidTransform::new(
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
            DVec3::new(0.0, 0.0, 10.0),
        );
        let global = child.then(&parent);
        let p = DVec3::new(0.5, 0.0, 0.0);
        assert_vec_eq(global.apply_point(p), parent.apply_point(child.apply_point(p)));
        assert_vec_eq(global.apply_point(DVec3::ZERO), DVec3::new(0.0, 1.0, 10.0));
    }
}
