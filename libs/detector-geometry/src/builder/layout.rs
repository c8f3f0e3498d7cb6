//! # Detector Layout
//!
//! Declarative description of what [`GeometryBuilder`](super::GeometryBuilder)
//! constructs. Serializable so an orchestrator can load it from any serde
//! format.

use config::units::{CM, DEG, G_PER_MOLE, KG_PER_M3, MM, UM};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::solid::Shape;

/// Name of the world volume.
pub const WORLD_NAME: &str = "World";

/// Name of the envelope volume.
pub const ENVELOPE_NAME: &str = "Envelope";

/// Custom element definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Registry name, e.g. `"Iron"`.
    pub name: String,
    /// Chemical symbol.
    pub symbol: String,
    /// Atomic number.
    pub z: f64,
    /// Molar mass in g/mole.
    pub molar_mass: f64,
}

/// One constituent of a composed material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomCount {
    /// Element name or predefined symbol.
    pub element: String,
    /// Atoms per formula unit.
    pub atoms: u32,
}

/// Material composed from elements by atom count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSpec {
    /// Material name.
    pub name: String,
    /// Density in g/cm3.
    pub density: f64,
    /// Constituents in order.
    pub composition: Vec<AtomCount>,
}

/// A detector component placed inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Name shared by the solid, the logical and the physical volume.
    pub name: String,
    /// Shape parameters.
    pub shape: Shape,
    /// Material identifier, predefined or composed.
    pub material: String,
    /// Offset from the envelope center (mm).
    #[serde(default)]
    pub position: DVec3,
    /// XYZ Euler rotation (degrees).
    #[serde(default)]
    pub rotation_deg: DVec3,
    /// Copy number of the placement.
    #[serde(default)]
    pub copy_number: i32,
    /// Designate this component's logical volume for scoring.
    #[serde(default)]
    pub scoring: bool,
}

/// Everything needed to build one detector geometry.
///
/// The default is the reference apparatus: a water envelope in an air
/// world holding a Mylar sheet (the scoring volume) and a steel pipe sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorLayout {
    /// Background material of the world.
    pub world_material: String,
    /// Full envelope extents (mm).
    pub envelope_size: DVec3,
    /// Bulk fill of the envelope.
    pub envelope_material: String,
    /// Custom elements, defined before any composition.
    pub elements: Vec<ElementSpec>,
    /// Composed materials, built in order.
    pub materials: Vec<CompositionSpec>,
    /// Components placed inside the envelope, in order.
    pub components: Vec<ComponentSpec>,
    /// Check each component against the ones placed before it.
    pub check_overlaps: bool,
}

impl Default for DetectorLayout {
    fn default() -> Self {
        Self {
            world_material: "G4_AIR".into(),
            envelope_size: DVec3::new(20.0 * CM, 20.0 * CM, 30.0 * CM),
            envelope_material: "G4_WATER".into(),
            elements: vec![
                ElementSpec {
                    name: "Iron".into(),
                    symbol: "Fe".into(),
                    z: 26.0,
                    molar_mass: 55.845 * G_PER_MOLE,
                },
                ElementSpec {
                    name: "Carbon".into(),
                    symbol: "C".into(),
                    z: 6.0,
                    molar_mass: 12.011 * G_PER_MOLE,
                },
            ],
            materials: vec![CompositionSpec {
                name: "Steel".into(),
                density: 7730.14 * KG_PER_M3,
                composition: vec![
                    AtomCount {
                        element: "Iron".into(),
                        atoms: 3,
                    },
                    AtomCount {
                        element: "Carbon".into(),
                        atoms: 1,
                    },
                ],
            }],
            components: vec![
                ComponentSpec {
                    name: "Mylar".into(),
                    shape: Shape::Box {
                        half_x: 85.0 * MM,
                        half_y: 150.0 * MM,
                        half_z: 250.0 * UM,
                    },
                    material: "G4_MYLAR".into(),
                    position: DVec3::ZERO,
                    rotation_deg: DVec3::ZERO,
                    copy_number: 0,
                    scoring: true,
                },
                ComponentSpec {
                    name: "Pipe1".into(),
                    shape: Shape::TubeSector {
                        r_min: 2.0 * CM,
                        r_max: 7.0 * CM,
                        half_z: 3.0 * CM,
                        start_angle: 50.0 * DEG,
                        delta_angle: 210.0 * DEG,
                    },
                    material: "Steel".into(),
                    // Downstream of the sheet: z spans 50..110 mm.
                    position: DVec3::new(1.0 * MM, -1.0 * MM, 80.0 * MM),
                    rotation_deg: DVec3::ZERO,
                    copy_number: 0,
                    scoring: false,
                },
            ],
            check_overlaps: true,
        }
    }
}

impl DetectorLayout {
    /// Component by name.
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Mutable component by name, for adjusting a layout before building.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut ComponentSpec> {
        self.components.iter_mut().find(|c| c.name == name)
    }

    /// Every material identifier the layout refers to, world first.
    pub fn referenced_materials(&self) -> impl Iterator<Item = &str> {
        [self.world_material.as_str(), self.envelope_material.as_str()]
            .into_iter()
            .chain(self.components.iter().map(|c| c.material.as_str()))
    }
}
