use crate::transform::RigidTransform;

use super::LogicalVolumeId;

/// Request to place a logical volume, consumed by
/// [`VolumeTree::place_volume`](super::VolumeTree::place_volume).
///
/// Defaults: no parent (world), identity transform, copy number 0, overlap
/// checking enabled.
///
/// ```rust
/// # use detector_geometry::volume::Placement;
/// # use detector_geometry::transform::RigidTransform;
/// # fn demo(envelope: detector_geometry::volume::LogicalVolumeId,
/// #         sheet: detector_geometry::volume::LogicalVolumeId) {
/// let request = Placement::new("Mylar", sheet)
///     .inside(envelope)
///     .at(RigidTransform::IDENTITY)
///     .copy_number(0)
///     .check_overlaps(true);
/// # let _ = request;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Placement {
    pub(super) name: String,
    pub(super) logical: LogicalVolumeId,
    pub(super) parent: Option<LogicalVolumeId>,
    pub(super) transform: RigidTransform,
    pub(super) copy_number: i32,
    pub(super) check_overlaps: bool,
}

impl Placement {
    /// Places `logical` under the name `name`.
    pub fn new(name: impl Into<String>, logical: LogicalVolumeId) -> Self {
        Self {
            name: name.into(),
            logical,
            parent: None,
            transform: RigidTransform::IDENTITY,
            copy_number: 0,
            check_overlaps: true,
        }
    }

    /// Sets the parent logical volume.
    pub fn inside(mut self, parent: LogicalVolumeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the transform relative to the parent.
    pub fn at(mut self, transform: RigidTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the copy number.
    pub fn copy_number(mut self, copy_number: i32) -> Self {
        self.copy_number = copy_number;
        self
    }

    /// Enables or disables sibling overlap checking.
    pub fn check_overlaps(mut self, enabled: bool) -> Self {
        self.check_overlaps = enabled;
        self
    }

    /// Placement name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
