//! # Volume Tree
//!
//! Logical volumes bind a solid to a material; physical volumes place a
//! logical volume inside a parent logical volume's frame.
//!
//! ## Ownership
//!
//! The tree is an arena. Logical and physical volumes live in vectors owned
//! by [`VolumeTree`] and refer to each other through copyable ids:
//!
//! ```text
//! LogicalVolume ──daughters──▶ [PhysicalVolumeId]
//! PhysicalVolume ──logical──▶ LogicalVolumeId
//! PhysicalVolume ──parent───▶ Option<LogicalVolumeId>   (navigation only)
//! ```
//!
//! Nothing is ever removed; the whole tree is dropped at once.

mod placement;

pub use placement::Placement;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{GeometryError, NameKind, Result};
use crate::material::Material;
use crate::overlap::{OverlapReport, OverlapValidator, PlacedSolid};
use crate::solid::Solid;
use crate::transform::RigidTransform;

// =============================================================================
// IDS
// =============================================================================

/// Stable handle of a logical volume within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalVolumeId(usize);

/// Stable handle of a physical volume within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicalVolumeId(usize);

impl LogicalVolumeId {
    /// Position in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl PhysicalVolumeId {
    /// Position in placement order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LogicalVolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lv#{}", self.0)
    }
}

impl fmt::Display for PhysicalVolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pv#{}", self.0)
    }
}

// =============================================================================
// VOLUMES
// =============================================================================

/// A solid bound to a material, independent of where it is placed.
#[derive(Debug, Clone)]
pub struct LogicalVolume {
    id: LogicalVolumeId,
    name: String,
    solid: Solid,
    material: Arc<Material>,
    daughters: Vec<PhysicalVolumeId>,
}

impl LogicalVolume {
    /// Handle of this volume.
    pub fn id(&self) -> LogicalVolumeId {
        self.id
    }

    /// Unique name within the tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owned shape.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// The shared material.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Children in placement order.
    pub fn daughters(&self) -> &[PhysicalVolumeId] {
        &self.daughters
    }
}

/// One placement of a logical volume inside a parent logical volume.
#[derive(Debug, Clone)]
pub struct PhysicalVolume {
    id: PhysicalVolumeId,
    name: String,
    logical: LogicalVolumeId,
    transform: RigidTransform,
    copy_number: i32,
    parent: Option<LogicalVolumeId>,
}

impl PhysicalVolume {
    /// Handle of this placement.
    pub fn id(&self) -> PhysicalVolumeId {
        self.id
    }

    /// Placement name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The placed logical volume.
    pub fn logical(&self) -> LogicalVolumeId {
        self.logical
    }

    /// Frame of this placement relative to the parent's frame.
    pub fn transform(&self) -> &RigidTransform {
        &self.transform
    }

    /// Copy number distinguishing repeated placements.
    pub fn copy_number(&self) -> i32 {
        self.copy_number
    }

    /// Parent logical volume, `None` for the world.
    pub fn parent(&self) -> Option<LogicalVolumeId> {
        self.parent
    }

    /// Returns `true` for the parentless world placement.
    pub fn is_world(&self) -> bool {
        self.parent.is_none()
    }
}

// =============================================================================
// TREE
// =============================================================================

/// Arena holding every logical and physical volume of one geometry.
#[derive(Debug, Clone, Default)]
pub struct VolumeTree {
    logicals: Vec<LogicalVolume>,
    physicals: Vec<PhysicalVolume>,
    names: HashMap<String, LogicalVolumeId>,
    world: Option<PhysicalVolumeId>,
    validator: OverlapValidator,
}

impl VolumeTree {
    /// Creates an empty tree with the default overlap validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree checking overlaps with `validator`.
    pub fn with_validator(validator: OverlapValidator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    /// Binds `solid` and `material` under a new logical volume.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DuplicateName`] if the name is already used.
    pub fn create_logical_volume(
        &mut self,
        name: &str,
        solid: Solid,
        material: Arc<Material>,
    ) -> Result<LogicalVolumeId> {
        if self.names.contains_key(name) {
            return Err(GeometryError::duplicate(NameKind::LogicalVolume, name));
        }
        let id = LogicalVolumeId(self.logicals.len());
        debug!(
            volume = name,
            %id,
            solid = solid.name(),
            material = material.name(),
            "created logical volume"
        );
        self.logicals.push(LogicalVolume {
            id,
            name: name.to_string(),
            solid,
            material,
            daughters: Vec::new(),
        });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Places a logical volume and returns the new physical volume.
    ///
    /// A placement without a parent becomes the world; only one is allowed.
    /// With overlap checking enabled, the candidate is tested against the
    /// siblings placed before it under the same parent. Later siblings are
    /// never re-checked against earlier ones.
    ///
    /// Nothing is committed when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::UnknownVolume`] for ids foreign to this tree.
    /// - [`GeometryError::RootAlreadyPlaced`] for a second world.
    /// - [`GeometryError::CyclicPlacement`] if `logical` would contain itself.
    /// - [`GeometryError::DuplicateName`] if a sibling has the same name and
    ///   copy number.
    /// - [`GeometryError::OverlapDetected`] if checking is enabled and an
    ///   earlier sibling intersects the candidate.
    pub fn place_volume(&mut self, placement: Placement) -> Result<PhysicalVolumeId> {
        let child = self.logical_checked(placement.logical)?;

        match placement.parent {
            None => {
                if let Some(world) = self.world() {
                    return Err(GeometryError::RootAlreadyPlaced(world.name.clone()));
                }
            }
            Some(parent_id) => {
                let parent = self.logical_checked(parent_id)?;
                if self.contains_logical(placement.logical, parent_id) {
                    return Err(GeometryError::CyclicPlacement {
                        child: child.name.clone(),
                        parent: parent.name.clone(),
                    });
                }
                let clash = parent.daughters.iter().any(|pv| {
                    let sibling = &self.physicals[pv.0];
                    sibling.name == placement.name && sibling.copy_number == placement.copy_number
                });
                if clash {
                    return Err(GeometryError::duplicate(
                        NameKind::PhysicalVolume,
                        format!("{}:{}", placement.name, placement.copy_number),
                    ));
                }
                if placement.check_overlaps {
                    self.check_siblings(&placement, parent)?;
                } else {
                    warn!(
                        volume = %placement.name,
                        parent = %parent.name,
                        "overlap check disabled for placement"
                    );
                }
            }
        }

        let id = PhysicalVolumeId(self.physicals.len());
        debug!(
            volume = %placement.name,
            %id,
            copy = placement.copy_number,
            translation = %placement.transform.translation(),
            "placed volume"
        );
        if let Some(parent_id) = placement.parent {
            self.logicals[parent_id.0].daughters.push(id);
        } else {
            self.world = Some(id);
        }
        self.physicals.push(PhysicalVolume {
            id,
            name: placement.name,
            logical: placement.logical,
            transform: placement.transform,
            copy_number: placement.copy_number,
            parent: placement.parent,
        });
        Ok(id)
    }

    fn check_siblings(&self, placement: &Placement, parent: &LogicalVolume) -> Result<()> {
        let candidate = PlacedSolid::new(
            &self.logicals[placement.logical.0].solid,
            placement.transform,
        );
        let siblings: Vec<PlacedSolid<'_>> = parent
            .daughters
            .iter()
            .map(|pv| {
                let sibling = &self.physicals[pv.0];
                PlacedSolid::new(&self.logicals[sibling.logical.0].solid, sibling.transform)
            })
            .collect();

        match self.validator.check(&candidate, &siblings) {
            OverlapReport::Clear => Ok(()),
            OverlapReport::Overlap { sibling, point } => {
                let sibling = &self.physicals[parent.daughters[sibling].0];
                warn!(
                    volume = %placement.name,
                    sibling = %sibling.name,
                    %point,
                    "overlap detected"
                );
                Err(GeometryError::OverlapDetected {
                    candidate: placement.name.clone(),
                    sibling: sibling.name.clone(),
                    point,
                })
            }
        }
    }

    /// Whether `ancestor` is `target` or holds it somewhere below.
    fn contains_logical(&self, ancestor: LogicalVolumeId, target: LogicalVolumeId) -> bool {
        let mut stack = vec![ancestor];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            stack.extend(
                self.logicals[current.0]
                    .daughters
                    .iter()
                    .map(|pv| self.physicals[pv.0].logical),
            );
        }
        false
    }

    fn logical_checked(&self, id: LogicalVolumeId) -> Result<&LogicalVolume> {
        self.logicals
            .get(id.0)
            .ok_or_else(|| GeometryError::UnknownVolume(id.to_string()))
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Logical volume by id.
    pub fn logical(&self, id: LogicalVolumeId) -> Option<&LogicalVolume> {
        self.logicals.get(id.0)
    }

    /// Physical volume by id.
    pub fn physical(&self, id: PhysicalVolumeId) -> Option<&PhysicalVolume> {
        self.physicals.get(id.0)
    }

    /// Logical volume placed by a physical volume.
    pub fn logical_of(&self, id: PhysicalVolumeId) -> Option<&LogicalVolume> {
        self.physical(id).and_then(|pv| self.logical(pv.logical))
    }

    /// Children of a logical volume in placement order.
    pub fn children(&self, id: LogicalVolumeId) -> impl Iterator<Item = &PhysicalVolume> {
        self.logical(id)
            .map(|lv| lv.daughters.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|pv| &self.physicals[pv.0])
    }

    /// Logical volume by name.
    pub fn find_logical(&self, name: &str) -> Option<&LogicalVolume> {
        self.names.get(name).map(|id| &self.logicals[id.0])
    }

    /// First physical volume with the given name.
    pub fn find_physical(&self, name: &str) -> Option<&PhysicalVolume> {
        self.physicals.iter().find(|pv| pv.name == name)
    }

    /// The parentless world placement, once placed.
    pub fn world(&self) -> Option<&PhysicalVolume> {
        self.world.map(|id| &self.physicals[id.0])
    }

    /// All logical volumes in creation order.
    pub fn logical_volumes(&self) -> &[LogicalVolume] {
        &self.logicals
    }

    /// All physical volumes in placement order.
    pub fn physical_volumes(&self) -> &[PhysicalVolume] {
        &self.physicals
    }

    /// Number of placement levels below and including the world. Zero before
    /// the world is placed.
    pub fn depth(&self) -> usize {
        self.world
            .map_or(0, |world| self.depth_below(self.physicals[world.0].logical) + 1)
    }

    fn depth_below(&self, id: LogicalVolumeId) -> usize {
        self.children(id)
            .map(|pv| self.depth_below(pv.logical) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Frame of a physical volume relative to the world.
    ///
    /// Transforms compose one level at a time. Ancestor logical volumes
    /// placed more than once are followed through their first placement.
    pub fn global_transform(&self, id: PhysicalVolumeId) -> Option<RigidTransform> {
        let mut current = self.physical(id)?;
        let mut global = current.transform;
        while let Some(parent) = current.parent {
            current = self.physicals.iter().find(|pv| pv.logical == parent)?;
            global = global.then(&current.transform);
        }
        Some(global)
    }

    /// Placement path from the world down to `id`, following first
    /// placements of ancestors.
    pub fn path_to(&self, id: PhysicalVolumeId) -> Option<Vec<PhysicalVolumeId>> {
        let mut current = self.physical(id)?;
        let mut path = vec![current.id];
        while let Some(parent) = current.parent {
            current = self.physicals.iter().find(|pv| pv.logical == parent)?;
            path.push(current.id);
        }
        path.reverse();
        Some(path)
    }
}
