//! # Geometry Errors
//!
//! Error types for material, solid and volume construction.

use std::fmt;

use config::ConfigError;
use glam::DVec3;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Registry in which a name collision occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Element registry of a material catalog.
    Element,
    /// Material registry of a material catalog.
    Material,
    /// Solid names of a solid factory.
    Solid,
    /// Logical volumes of a volume tree.
    LogicalVolume,
    /// Physical volumes under one parent (name + copy number).
    PhysicalVolume,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NameKind::Element => "element",
            NameKind::Material => "material",
            NameKind::Solid => "solid",
            NameKind::LogicalVolume => "logical volume",
            NameKind::PhysicalVolume => "physical volume",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while building a detector geometry.
///
/// Every variant aborts the construction pass that raised it; no partially
/// built tree is ever handed out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Non-positive or inconsistent solid parameters.
    #[error("Invalid dimension for solid '{solid}': {message}")]
    InvalidDimension {
        /// Solid name.
        solid: String,
        /// Which constraint failed.
        message: String,
    },

    /// Bad density, atom counts or empty composition.
    #[error("Invalid composition for material '{material}': {message}")]
    InvalidMaterialComposition {
        /// Material name.
        material: String,
        /// Which constraint failed.
        message: String,
    },

    /// Non-positive atomic number or molar mass.
    #[error("Invalid element '{element}': {message}")]
    InvalidElement {
        /// Element name.
        element: String,
        /// Which constraint failed.
        message: String,
    },

    /// Predefined material lookup miss.
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// Element lookup miss.
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    /// Name collision within a registry.
    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName {
        /// Registry that already holds the name.
        kind: NameKind,
        /// Offending name.
        name: String,
    },

    /// A placement intersects an already-placed sibling.
    #[error("Overlap detected: '{candidate}' intersects sibling '{sibling}' at {point}")]
    OverlapDetected {
        /// Physical volume being placed.
        candidate: String,
        /// Earlier sibling it collides with.
        sibling: String,
        /// First counter-example point, in the parent frame.
        point: DVec3,
    },

    /// A second parentless placement was requested.
    #[error("World volume already placed as '{0}'")]
    RootAlreadyPlaced(String),

    /// The placement would make a logical volume its own ancestor.
    #[error("Placing '{child}' inside '{parent}' would create a cycle")]
    CyclicPlacement {
        /// Logical volume being placed.
        child: String,
        /// Requested parent logical volume.
        parent: String,
    },

    /// A volume id that does not belong to this tree.
    #[error("Unknown volume: {0}")]
    UnknownVolume(String),

    /// Construction settings were rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl GeometryError {
    /// Creates an invalid dimension error.
    pub fn invalid_dimension(solid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDimension {
            solid: solid.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid material composition error.
    pub fn invalid_composition(material: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMaterialComposition {
            material: material.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid element error.
    pub fn invalid_element(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidElement {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate name error.
    pub fn duplicate(kind: NameKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
