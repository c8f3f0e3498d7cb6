//! # Geometry Builder
//!
//! Drives one construction pass from a [`DetectorLayout`]:
//!
//! ```text
//! materials ─▶ World (root, no check) ─▶ Envelope ─▶ components ─▶ scoring
//! ```
//!
//! Each pass works on a fresh clone of the builder's catalog and a fresh
//! solid scope, so repeated construction yields independent trees. A failed
//! pass exposes nothing and resets the builder.

mod layout;

pub use layout::{
    AtomCount, ComponentSpec, CompositionSpec, DetectorLayout, ElementSpec, ENVELOPE_NAME,
    WORLD_NAME,
};

use std::sync::Arc;

use config::constants::GeometryConfig;
use tracing::{info, warn};

use crate::error::Result;
use crate::material::{Material, MaterialCatalog};
use crate::overlap::OverlapValidator;
use crate::solid::SolidFactory;
use crate::transform::RigidTransform;
use crate::volume::{LogicalVolume, LogicalVolumeId, PhysicalVolume, PhysicalVolumeId, Placement, VolumeTree};

// =============================================================================
// STATE
// =============================================================================

/// Lifecycle of a [`GeometryBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing built, or the last pass failed.
    Uninitialized,
    /// A pass is in progress.
    Building,
    /// The last pass succeeded; its geometry is available.
    Constructed,
}

/// The logical volume designated for scoring. Later designations replace
/// earlier ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringDesignation(Option<LogicalVolumeId>);

impl ScoringDesignation {
    /// Designates `volume`, replacing any previous designation.
    pub fn designate(&mut self, volume: LogicalVolumeId) {
        self.0 = Some(volume);
    }

    /// The designated volume, if any.
    pub fn volume(&self) -> Option<LogicalVolumeId> {
        self.0
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Immutable product of a successful construction pass.
///
/// Holds the volume tree together with the catalog that supplied its
/// materials. `Send + Sync`; share it with `Arc<DetectorGeometry>`.
#[derive(Debug, Clone)]
pub struct DetectorGeometry {
    tree: VolumeTree,
    catalog: MaterialCatalog,
    world: PhysicalVolumeId,
    envelope: LogicalVolumeId,
    scoring: ScoringDesignation,
}

impl DetectorGeometry {
    /// The volume tree.
    pub fn tree(&self) -> &VolumeTree {
        &self.tree
    }

    /// Catalog holding every material the pass used.
    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Id of the root placement.
    pub fn world_id(&self) -> PhysicalVolumeId {
        self.world
    }

    /// The root placement.
    pub fn world(&self) -> Option<&PhysicalVolume> {
        self.tree.physical(self.world)
    }

    /// The envelope logical volume.
    pub fn envelope(&self) -> Option<&LogicalVolume> {
        self.tree.logical(self.envelope)
    }

    /// The scoring designation.
    pub fn scoring(&self) -> ScoringDesignation {
        self.scoring
    }

    /// The designated scoring volume, if any.
    pub fn scoring_volume(&self) -> Option<&LogicalVolume> {
        self.scoring.volume().and_then(|id| self.tree.logical(id))
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds a [`DetectorGeometry`] from a [`DetectorLayout`].
///
/// # Example
///
/// ```rust
/// use detector_geometry::builder::{BuilderState, DetectorLayout, GeometryBuilder};
///
/// let mut builder = GeometryBuilder::new(DetectorLayout::default());
/// let world = builder.construct().unwrap();
/// assert_eq!(builder.state(), BuilderState::Constructed);
/// assert_eq!(builder.scoring_volume().unwrap().name(), "Mylar");
///
/// let geometry = builder.geometry().unwrap();
/// assert_eq!(geometry.world_id(), world);
/// assert_eq!(geometry.tree().depth(), 3);
/// ```
#[derive(Debug)]
pub struct GeometryBuilder {
    layout: DetectorLayout,
    catalog: MaterialCatalog,
    config: GeometryConfig,
    state: BuilderState,
    geometry: Option<DetectorGeometry>,
}

impl GeometryBuilder {
    /// Creates a builder with an empty catalog and default configuration.
    pub fn new(layout: DetectorLayout) -> Self {
        Self {
            layout,
            catalog: MaterialCatalog::new(),
            config: GeometryConfig::default(),
            state: BuilderState::Uninitialized,
            geometry: None,
        }
    }

    /// Seeds every pass with a copy of `catalog`.
    pub fn with_catalog(mut self, catalog: MaterialCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Overrides overlap tolerance, sample count and world margin.
    pub fn with_config(mut self, config: GeometryConfig) -> Self {
        self.config = config;
        self
    }

    /// The layout being built.
    pub fn layout(&self) -> &DetectorLayout {
        &self.layout
    }

    /// Mutable layout. Changes apply from the next [`construct`](Self::construct).
    pub fn layout_mut(&mut self) -> &mut DetectorLayout {
        &mut self.layout
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Runs a full construction pass and returns the root placement.
    ///
    /// Replaces the geometry of any earlier pass.
    ///
    /// # Errors
    ///
    /// The first error raised while resolving materials, building solids or
    /// placing volumes. The builder is then [`BuilderState::Uninitialized`]
    /// and holds no geometry.
    pub fn construct(&mut self) -> Result<PhysicalVolumeId> {
        self.state = BuilderState::Building;
        self.geometry = None;
        info!(
            components = self.layout.components.len(),
            check_overlaps = self.layout.check_overlaps,
            "constructing detector geometry"
        );

        match build(&self.layout, self.catalog.clone(), &self.config) {
            Ok(geometry) => {
                info!(
                    logical_volumes = geometry.tree.logical_volumes().len(),
                    physical_volumes = geometry.tree.physical_volumes().len(),
                    depth = geometry.tree.depth(),
                    scoring = geometry.scoring_volume().map(LogicalVolume::name),
                    materials = ?geometry.catalog.material_names(),
                    "detector geometry constructed"
                );
                let world = geometry.world;
                self.geometry = Some(geometry);
                self.state = BuilderState::Constructed;
                Ok(world)
            }
            Err(err) => {
                warn!(error = %err, "detector construction aborted");
                self.state = BuilderState::Uninitialized;
                Err(err)
            }
        }
    }

    /// Scoring volume of the last successful pass.
    pub fn scoring_volume(&self) -> Option<&LogicalVolume> {
        self.geometry.as_ref().and_then(DetectorGeometry::scoring_volume)
    }

    /// Geometry of the last successful pass.
    pub fn geometry(&self) -> Option<&DetectorGeometry> {
        self.geometry.as_ref()
    }

    /// Consumes the builder, yielding the constructed geometry.
    pub fn into_geometry(self) -> Option<DetectorGeometry> {
        self.geometry
    }
}

/// One construction pass. Touches nothing outside its arguments.
fn build(
    layout: &DetectorLayout,
    mut catalog: MaterialCatalog,
    config: &GeometryConfig,
) -> Result<DetectorGeometry> {
    // Settings may come from a struct literal; reject what `new` would.
    let config = GeometryConfig::new(
        config.overlap_tolerance,
        config.overlap_samples,
        config.world_margin,
    )?;

    // Materials
    for spec in &layout.elements {
        catalog.define_element(&spec.name, &spec.symbol, spec.z, spec.molar_mass)?;
    }
    for spec in &layout.materials {
        let composition = spec
            .composition
            .iter()
            .map(|part| Ok((catalog.element(&part.element)?, part.atoms)))
            .collect::<Result<Vec<_>>>()?;
        catalog.compose_from_elements(&spec.name, spec.density, &composition)?;
    }
    let world_material = catalog.resolve(&layout.world_material)?;
    let envelope_material = catalog.resolve(&layout.envelope_material)?;
    let component_materials: Vec<Arc<Material>> = layout
        .components
        .iter()
        .map(|component| catalog.resolve(&component.material))
        .collect::<Result<_>>()?;

    let mut solids = SolidFactory::new();
    let mut tree = VolumeTree::with_validator(OverlapValidator::from_config(&config));

    // World
    let envelope_half = layout.envelope_size * 0.5;
    let world_half = envelope_half * config.world_margin;
    let world_solid = solids.create_box(WORLD_NAME, world_half.x, world_half.y, world_half.z)?;
    let world_lv = tree.create_logical_volume(WORLD_NAME, world_solid, world_material)?;
    let world = tree.place_volume(Placement::new(WORLD_NAME, world_lv).check_overlaps(false))?;

    // Envelope
    let envelope_solid =
        solids.create_box(ENVELOPE_NAME, envelope_half.x, envelope_half.y, envelope_half.z)?;
    let envelope = tree.create_logical_volume(ENVELOPE_NAME, envelope_solid, envelope_material)?;
    tree.place_volume(Placement::new(ENVELOPE_NAME, envelope).inside(world_lv))?;

    // Components
    let mut scoring = ScoringDesignation::default();
    let mut scored = Vec::new();
    for (component, material) in layout.components.iter().zip(component_materials) {
        let solid = solids.create(&component.name, component.shape)?;
        let logical = tree.create_logical_volume(&component.name, solid, material)?;
        let transform =
            RigidTransform::from_euler_deg(component.rotation_deg).with_translation(component.position);
        tree.place_volume(
            Placement::new(component.name.as_str(), logical)
                .inside(envelope)
                .at(transform)
                .copy_number(component.copy_number)
                .check_overlaps(layout.check_overlaps),
        )?;
        if component.scoring {
            scored.push(logical);
        }
    }

    // Scoring
    if scored.is_empty() {
        warn!("no component flagged for scoring");
    }
    for logical in scored {
        scoring.designate(logical);
    }

    Ok(DetectorGeometry {
        tree,
        catalog,
        world,
        envelope,
        scoring,
    })
}

#[cfg(test)]
mod tests;
