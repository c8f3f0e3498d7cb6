//! # Solids
//!
//! Parametrized primitive shapes. A solid is purely geometric: it carries a
//! name and a shape, never a material.
//!
//! All lengths are millimetres and all angles are degrees.
//!
//! ## Shapes
//!
//! - **Box**: centered rectangular prism given by half extents
//! - **TubeSector**: hollow cylinder section around the local Z axis, cut to
//!   the angular span `[start_angle, start_angle + delta_angle]`

mod queries;

use std::collections::HashSet;

use config::constants::FULL_CIRCLE_DEG;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, NameKind, Result};

// =============================================================================
// SHAPE
// =============================================================================

/// Shape parameters of a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Rectangular prism centered at the origin.
    Box {
        /// Half length along X.
        half_x: f64,
        /// Half length along Y.
        half_y: f64,
        /// Half length along Z.
        half_z: f64,
    },
    /// Cylindrical shell sector around the Z axis, centered at the origin.
    TubeSector {
        /// Inner radius, `>= 0`.
        r_min: f64,
        /// Outer radius, `> r_min`.
        r_max: f64,
        /// Half length along Z.
        half_z: f64,
        /// Angle of the first cut plane, degrees from +X.
        start_angle: f64,
        /// Angular span in degrees, within `(0, 360]`.
        delta_angle: f64,
    },
}

impl Shape {
    /// Checks the dimensional constraints of the shape.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidDimension`] naming the violated constraint.
    pub fn validate(&self, name: &str) -> Result<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        match *self {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => {
                for (axis, value) in [("halfX", half_x), ("halfY", half_y), ("halfZ", half_z)] {
                    if !positive(value) {
                        return Err(GeometryError::invalid_dimension(
                            name,
                            format!("{axis} must be positive: {value}"),
                        ));
                    }
                }
            }
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                start_angle,
                delta_angle,
            } => {
                if !r_min.is_finite() || r_min < 0.0 {
                    return Err(GeometryError::invalid_dimension(
                        name,
                        format!("rMin must be >= 0: {r_min}"),
                    ));
                }
                if !r_max.is_finite() || r_min >= r_max {
                    return Err(GeometryError::invalid_dimension(
                        name,
                        format!("rMin must be < rMax: {r_min} >= {r_max}"),
                    ));
                }
                if !positive(half_z) {
                    return Err(GeometryError::invalid_dimension(
                        name,
                        format!("halfZ must be positive: {half_z}"),
                    ));
                }
                if !start_angle.is_finite() {
                    return Err(GeometryError::invalid_dimension(
                        name,
                        format!("startAngle must be finite: {start_angle}"),
                    ));
                }
                if !positive(delta_angle) || delta_angle > FULL_CIRCLE_DEG {
                    return Err(GeometryError::invalid_dimension(
                        name,
                        format!("deltaAngle must be within (0, 360]: {delta_angle}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// SOLID
// =============================================================================

/// A named, validated shape. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    name: String,
    shape: Shape,
}

impl Solid {
    /// Solid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape parameters.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Half extents of a box, `None` for other shapes.
    pub fn half_extents(&self) -> Option<DVec3> {
        match self.shape {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => Some(DVec3::new(half_x, half_y, half_z)),
            Shape::TubeSector { .. } => None,
        }
    }

    /// Enclosed volume in mm3.
    pub fn cubic_volume(&self) -> f64 {
        match self.shape {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => 8.0 * half_x * half_y * half_z,
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                delta_angle,
                ..
            } => delta_angle.to_radians() * (r_max * r_max - r_min * r_min) * half_z,
        }
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// Builds solids and keeps their names unique within its scope.
///
/// # Example
///
/// ```rust
/// use detector_geometry::solid::SolidFactory;
///
/// let mut factory = SolidFactory::new();
/// let sheet = factory.create_box("Mylar", 85.0, 150.0, 0.25).unwrap();
/// assert_eq!(sheet.half_extents().unwrap().z, 0.25);
/// assert!(factory.create_tube_sector("Pipe", 20.0, 70.0, 30.0, 50.0, 210.0).is_ok());
/// assert!(factory.create_box("Mylar", 1.0, 1.0, 1.0).is_err());
/// ```
#[derive(Debug, Default)]
pub struct SolidFactory {
    names: HashSet<String>,
}

impl SolidFactory {
    /// Creates a factory with an empty name scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `shape` and registers a solid under `name`.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidDimension`] when the shape is invalid.
    /// - [`GeometryError::DuplicateName`] when the name is taken.
    pub fn create(&mut self, name: &str, shape: Shape) -> Result<Solid> {
        shape.validate(name)?;
        if !self.names.insert(name.to_string()) {
            return Err(GeometryError::duplicate(NameKind::Solid, name));
        }
        debug!(solid = name, ?shape, "created solid");
        Ok(Solid {
            name: name.to_string(),
            shape,
        })
    }

    /// Creates a box from its half extents.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidDimension`] if any half extent is `<= 0`.
    pub fn create_box(&mut self, name: &str, half_x: f64, half_y: f64, half_z: f64) -> Result<Solid> {
        self.create(
            name,
            Shape::Box {
                half_x,
                half_y,
                half_z,
            },
        )
    }

    /// Creates a tube sector. Angles are degrees.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidDimension`] if `r_min < 0`, `r_min >= r_max`,
    /// `half_z <= 0`, or `delta_angle` is outside `(0, 360]`.
    pub fn create_tube_sector(
        &mut self,
        name: &str,
        r_min: f64,
        r_max: f64,
        half_z: f64,
        start_angle: f64,
        delta_angle: f64,
    ) -> Result<Solid> {
        self.create(
            name,
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                start_angle,
                delta_angle,
            },
        )
    }

    /// Returns `true` if a solid with this name was created here.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
