//! # Overlap Validation
//!
//! Checks a candidate placement against siblings already placed under the
//! same parent. Everything is evaluated in the parent's frame.
//!
//! ## Algorithm
//!
//! 1. Reject early when the transformed bounding boxes are disjoint.
//! 2. Sample the candidate's surfaces where they fall inside the overlap of
//!    the two boxes, map each point into the sibling's frame and test
//!    whether it lies at least `tolerance` deep inside.
//! 3. Repeat the other way round, sampling the sibling against the
//!    candidate, so full containment is caught too.
//!
//! Sampling is deterministic: the same placement always yields the same
//! verdict and counter-example.

use config::constants::{GeometryConfig, DEFAULT_WORLD_MARGIN, EPSILON};
use glam::DVec3;

use crate::aabb::Aabb;
use crate::error::Result;
use crate::solid::Solid;
use crate::transform::RigidTransform;

/// A solid together with its transform in the shared parent frame.
#[derive(Debug, Clone, Copy)]
pub struct PlacedSolid<'a> {
    /// The shape.
    pub solid: &'a Solid,
    /// Local frame to parent frame.
    pub transform: RigidTransform,
}

impl<'a> PlacedSolid<'a> {
    /// Pairs a solid with its placement.
    pub fn new(solid: &'a Solid, transform: RigidTransform) -> Self {
        Self { solid, transform }
    }
}

/// Outcome of an overlap check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlapReport {
    /// No sibling intersects the candidate beyond tolerance.
    Clear,
    /// The candidate intersects `siblings[sibling]`.
    Overlap {
        /// Index into the sibling slice that was checked.
        sibling: usize,
        /// First counter-example point found, in the parent frame.
        point: DVec3,
    },
}

impl OverlapReport {
    /// Returns `true` when an overlap was found.
    pub fn is_overlap(&self) -> bool {
        matches!(self, OverlapReport::Overlap { .. })
    }

    /// The first counter-example point, if any.
    pub fn counter_example(&self) -> Option<DVec3> {
        match self {
            OverlapReport::Clear => None,
            OverlapReport::Overlap { point, .. } => Some(*point),
        }
    }
}

/// Sibling overlap checker.
///
/// # Example
///
/// ```rust
/// use detector_geometry::overlap::{OverlapValidator, PlacedSolid};
/// use detector_geometry::solid::SolidFactory;
/// use detector_geometry::transform::RigidTransform;
/// use glam::DVec3;
///
/// let mut factory = SolidFactory::new();
/// let a = factory.create_box("A", 1.0, 1.0, 1.0).unwrap();
/// let b = factory.create_box("B", 1.0, 1.0, 1.0).unwrap();
/// let validator = OverlapValidator::default();
///
/// let first = PlacedSolid::new(&a, RigidTransform::IDENTITY);
/// let near = PlacedSolid::new(&b, RigidTransform::from_translation(DVec3::X * 1.5));
/// let far = PlacedSolid::new(&b, RigidTransform::from_translation(DVec3::X * 5.0));
/// assert!(validator.check(&near, &[first]).is_overlap());
/// assert!(!validator.check(&far, &[first]).is_overlap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapValidator {
    tolerance: f64,
    samples: u32,
}

impl Default for OverlapValidator {
    fn default() -> Self {
        Self::from_config(&GeometryConfig::default())
    }
}

impl OverlapValidator {
    /// Creates a validator with an explicit tolerance (mm) and sample count.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidConfig`](crate::GeometryError::InvalidConfig)
    /// for a negative tolerance or an out-of-range sample count.
    pub fn new(tolerance: f64, samples: u32) -> Result<Self> {
        let config = GeometryConfig::new(tolerance, samples, DEFAULT_WORLD_MARGIN)?;
        Ok(Self::from_config(&config))
    }

    /// Takes tolerance and sample count from a validated configuration.
    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            tolerance: config.overlap_tolerance,
            samples: config.overlap_samples,
        }
    }

    /// Penetration depth (mm) that counts as overlap.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Points sampled per solid.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Checks `candidate` against each sibling in order and reports the first
    /// intersection.
    pub fn check(&self, candidate: &PlacedSolid<'_>, siblings: &[PlacedSolid<'_>]) -> OverlapReport {
        siblings
            .iter()
            .enumerate()
            .find_map(|(index, sibling)| {
                self.intersection(candidate, sibling)
                    .map(|point| OverlapReport::Overlap {
                        sibling: index,
                        point,
                    })
            })
            .unwrap_or(OverlapReport::Clear)
    }

    /// First point (parent frame) showing that `a` and `b` intersect.
    pub fn intersection(&self, a: &PlacedSolid<'_>, b: &PlacedSolid<'_>) -> Option<DVec3> {
        let bounds_a = a.solid.local_bounds().transformed(&a.transform);
        let bounds_b = b.solid.local_bounds().transformed(&b.transform);
        let region = bounds_a.intersection(&bounds_b)?;
        self.first_point_inside(a, b, &region)
            .or_else(|| self.first_point_inside(b, a, &region))
    }

    /// Samples the part of `from`'s surface that falls in `region` (parent
    /// frame) and returns the first point lying inside `into` by at least
    /// the tolerance.
    fn first_point_inside(
        &self,
        from: &PlacedSolid<'_>,
        into: &PlacedSolid<'_>,
        region: &Aabb,
    ) -> Option<DVec3> {
        let local_region = region.transformed(&from.transform.inverse());
        let region = region.expanded(EPSILON);
        from.solid
            .surface_points_within(self.samples as usize, &local_region)
            .into_iter()
            .map(|local| from.transform.apply_point(local))
            .filter(|point| region.contains_point(*point))
            .find(|point| {
                let local = into.transform.apply_inverse_point(*point);
                into.solid.inside_depth(local) >= self.tolerance
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::SolidFactory;
    use glam::DQuat;

    fn boxes() -> (Solid, Solid) {
        let mut factory = SolidFactory::new();
        (
            factory.create_box("A", 1.0, 1.0, 1.0).unwrap(),
            factory.create_box("B", 1.0, 1.0, 1.0).unwrap(),
        )
    }

    #[test]
    fn test_disjoint_bounds_are_clear() {
        let (a, b) = boxes();
        let validator = OverlapValidator::default();
        let first = PlacedSolid::new(&a, RigidTransform::IDENTITY);
        let second = PlacedSolid::new(&b, RigidTransform::from_translation(DVec3::Y * 3.0));
        assert_eq!(validator.check(&second, &[first]), OverlapReport::Clear);
    }

    #[test]
    fn test_touching_faces_respect_tolerance() {
        let (a, b) = boxes();
        let first = PlacedSolid::new(&a, RigidTransform::IDENTITY);
        let touching = PlacedSolid::new(&b, RigidTransform::from_translation(DVec3::X * 2.0));

        let lenient = OverlapValidator::default();
        assert!(!lenient.check(&touching, &[first]).is_overlap());

        let strict = OverlapValidator::new(0.0, 600).unwrap();
        let report = strict.check(&touching, &[first]);
        assert!(report.is_overlap());
        assert!((report.counter_example().unwrap().x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_contained_sibling_is_found() {
        let mut factory = SolidFactory::new();
        let big = factory.create_box("Big", 10.0, 10.0, 10.0).unwrap();
        let small = factory.create_box("Small", 1.0, 1.0, 1.0).unwrap();
        let validator = OverlapValidator::default();
        let small_first = PlacedSolid::new(&small, RigidTransform::IDENTITY);
        let big_later = PlacedSolid::new(&big, RigidTransform::IDENTITY);
        // The candidate's surface never enters the sibling; the reverse
        // sampling catches it.
        assert!(validator.check(&big_later, &[small_first]).is_overlap());
    }

    #[test]
    fn test_rotation_is_honored() {
        let mut factory = SolidFactory::new();
        let bar = factory.create_box("Bar", 10.0, 1.0, 1.0).unwrap();
        let block = factory.create_box("Block", 1.0, 1.0, 1.0).unwrap();
        let validator = OverlapValidator::default();
        let block_at = PlacedSolid::new(&block, RigidTransform::from_translation(DVec3::Y * 6.0));

        let along_x = PlacedSolid::new(&bar, RigidTransform::IDENTITY);
        assert!(!validator.check(&along_x, &[block_at]).is_overlap());

        let along_y = PlacedSolid::new(
            &bar,
            RigidTransform::from_rotation(DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2)),
        );
        assert!(validator.check(&along_y, &[block_at]).is_overlap());
    }

    #[test]
    fn test_reports_first_sibling_index() {
        let mut factory = SolidFactory::new();
        let a = factory.create_box("A", 1.0, 1.0, 1.0).unwrap();
        let b = factory.create_box("B", 1.0, 1.0, 1.0).unwrap();
        let c = factory.create_box("C", 1.0, 1.0, 1.0).unwrap();
        let validator = OverlapValidator::default();
        let siblings = [
            PlacedSolid::new(&a, RigidTransform::from_translation(DVec3::X * -5.0)),
            PlacedSolid::new(&b, RigidTransform::from_translation(DVec3::X * 0.5)),
        ];
        let candidate = PlacedSolid::new(&c, RigidTransform::IDENTITY);
        match validator.check(&candidate, &siblings) {
            OverlapReport::Overlap { sibling, .. } => assert_eq!(sibling, 1),
            OverlapReport::Clear => panic!("expected an overlap"),
        }
    }

    #[test]
    fn test_sector_gap_is_clear() {
        let mut factory = SolidFactory::new();
        // A half pipe open towards -Y and a block sitting in the opening.
        let half_pipe = factory
            .create_tube_sector("HalfPipe", 5.0, 10.0, 5.0, 0.0, 180.0)
            .unwrap();
        let block = factory.create_box("Block", 2.0, 2.0, 2.0).unwrap();
        let validator = OverlapValidator::default();
        let pipe_at = PlacedSolid::new(&half_pipe, RigidTransform::IDENTITY);
        let below = PlacedSolid::new(&block, RigidTransform::from_translation(DVec3::new(7.0, -3.0, 0.0)));
        assert!(!validator.check(&below, &[pipe_at]).is_overlap());
        let above = PlacedSolid::new(&block, RigidTransform::from_translation(DVec3::new(7.0, 3.0, 0.0)));
        assert!(validator.check(&above, &[pipe_at]).is_overlap());
    }

    #[test]
    fn test_crossed_plates_overlap() {
        let mut factory = SolidFactory::new();
        let sheet = factory.create_box("Sheet", 85.0, 150.0, 0.25).unwrap();
        let fin = factory.create_box("Fin", 85.0, 0.25, 150.0).unwrap();
        let validator = OverlapValidator::default();
        let sheet_at = PlacedSolid::new(&sheet, RigidTransform::IDENTITY);
        // The shared band is 0.5 mm wide, far below the full-face grid pitch.
        let fin_at = PlacedSolid::new(&fin, RigidTransform::from_translation(DVec3::new(0.0, 5.0, 5.0)));

        let point = validator
            .check(&fin_at, &[sheet_at])
            .counter_example()
            .unwrap();
        assert!(sheet.inside_depth(point) > 0.0);
        assert!((4.75..=5.25).contains(&point.y));
        assert!(point.z.abs() <= 0.25);
        assert!(validator.check(&sheet_at, &[fin_at]).is_overlap());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(OverlapValidator::new(-1.0, 100).is_err());
        assert!(OverlapValidator::new(0.0, 1).is_err());
    }
}
