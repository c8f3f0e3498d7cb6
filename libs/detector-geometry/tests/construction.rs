//! End-to-end construction of the reference apparatus.

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use config::units::MM;
use detector_geometry::builder::BuilderState;
use detector_geometry::{DetectorGeometry, DetectorLayout, GeometryBuilder, GeometryError};
use glam::DVec3;

/// Layout with the pipe at its upstream position, crossing the Mylar sheet.
fn crossing_layout(check_overlaps: bool) -> DetectorLayout {
    let mut layout = DetectorLayout::default();
    layout.check_overlaps = check_overlaps;
    if let Some(pipe) = layout.component_mut("Pipe1") {
        pipe.position = DVec3::new(1.0 * MM, -1.0 * MM, 2.0 * MM);
    }
    layout
}

#[test]
fn reference_apparatus_constructs() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    let world = builder.construct().unwrap();
    let geometry = builder.geometry().unwrap();
    let tree = geometry.tree();

    let root = tree.logical_of(world).unwrap();
    assert_eq!(root.material().name(), "G4_AIR");
    assert!(tree.physical(world).unwrap().is_world());
    assert!(tree.depth() >= 3);

    let scoring = builder.scoring_volume().unwrap();
    assert_eq!(scoring.name(), "Mylar");
    assert_eq!(scoring.material().name(), "G4_MYLAR");
    assert_relative_eq!(scoring.solid().half_extents().unwrap().z, 0.25);
}

#[test]
fn steel_keeps_density_and_normalized_fractions() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    builder.construct().unwrap();
    let steel = builder
        .geometry()
        .unwrap()
        .tree()
        .find_logical("Pipe1")
        .unwrap()
        .material()
        .clone();
    assert_relative_eq!(steel.density(), 7730.14e-3, max_relative = 1e-12);
    let total: f64 = steel.constituents().iter().map(|c| c.mass_fraction()).sum();
    assert!((total - 1.0).abs() < 1e-9);
    let iron = 3.0 * 55.845 / (3.0 * 55.845 + 12.011);
    assert_relative_eq!(steel.mass_fraction_of("Fe"), iron, epsilon = 1e-12);
}

#[test]
fn crossing_pipe_rejected_with_overlap_checking() {
    let mut builder = GeometryBuilder::new(crossing_layout(true));
    match builder.construct() {
        Err(GeometryError::OverlapDetected {
            candidate, sibling, ..
        }) => {
            assert_eq!(candidate, "Pipe1");
            assert_eq!(sibling, "Mylar");
        }
        other => panic!("expected an overlap, got {other:?}"),
    }
    assert_eq!(builder.state(), BuilderState::Uninitialized);
    assert!(builder.geometry().is_none());
    assert!(builder.scoring_volume().is_none());
}

#[test]
fn crossing_pipe_accepted_without_overlap_checking() {
    let mut builder = GeometryBuilder::new(crossing_layout(false));
    builder.construct().unwrap();
    let tree = builder.geometry().unwrap().tree();
    let pipe = tree.find_physical("Pipe1").unwrap();
    assert_eq!(pipe.transform().translation(), DVec3::new(1.0, -1.0, 2.0));
}

#[test]
fn repeated_construction_builds_fresh_trees() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    let first = builder.construct().unwrap();
    let first_count = builder.geometry().unwrap().tree().physical_volumes().len();
    let second = builder.construct().unwrap();
    let tree = builder.geometry().unwrap().tree();
    assert_eq!(first, second);
    assert_eq!(tree.physical_volumes().len(), first_count);
    assert_eq!(builder.state(), BuilderState::Constructed);
}

#[test]
fn failed_pass_drops_earlier_geometry() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    builder.construct().unwrap();
    assert!(builder.geometry().is_some());

    builder.layout_mut().world_material = "G4_NOTHING".into();
    assert!(builder.construct().is_err());
    assert!(builder.geometry().is_none());
    assert_eq!(builder.state(), BuilderState::Uninitialized);
}

#[test]
fn geometry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DetectorGeometry>();

    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    builder.construct().unwrap();
    let geometry = Arc::new(builder.into_geometry().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let geometry = Arc::clone(&geometry);
            thread::spawn(move || geometry.scoring_volume().map(|lv| lv.name().to_string()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("Mylar"));
    }
}
