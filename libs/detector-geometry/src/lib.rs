//! # Detector Geometry
//!
//! Hierarchical detector geometry and material model for a particle
//! transport engine. Builds a world volume holding an envelope holding the
//! detector components, validates dimensions and sibling overlaps, and
//! designates the scoring volume.
//!
//! ## Architecture
//!
//! ```text
//! DetectorLayout
//!       │
//!       ▼
//! GeometryBuilder ──▶ MaterialCatalog (elements, materials)
//!       │         ──▶ SolidFactory    (box, tube sector)
//!       ▼
//! VolumeTree ──▶ OverlapValidator (AABB reject + surface sampling)
//!       │
//!       ▼
//! DetectorGeometry (immutable, Send + Sync)
//! ```
//!
//! ## Units
//!
//! Lengths are millimetres, angles degrees, densities g/cm3 and molar
//! masses g/mole. Convert with [`config::units`] before calling.
//!
//! ## Usage
//!
//! ```rust
//! use detector_geometry::{DetectorLayout, GeometryBuilder};
//!
//! let mut builder = GeometryBuilder::new(DetectorLayout::default());
//! let world = builder.construct().unwrap();
//! let geometry = builder.into_geometry().unwrap();
//! let root = geometry.tree().logical_of(world).unwrap();
//! assert_eq!(root.material().name(), "G4_AIR");
//! ```

pub mod aabb;
pub mod builder;
pub mod error;
pub mod material;
pub mod overlap;
pub mod solid;
pub mod transform;
pub mod volume;

pub use builder::{BuilderState, DetectorGeometry, DetectorLayout, GeometryBuilder};
pub use error::{GeometryError, NameKind, Result};
pub use material::{Element, Material, MaterialCatalog};
pub use overlap::{OverlapReport, OverlapValidator};
pub use solid::{Shape, Solid, SolidFactory};
pub use transform::RigidTransform;
pub use volume::{LogicalVolumeId, PhysicalVolumeId, Placement, VolumeTree};
