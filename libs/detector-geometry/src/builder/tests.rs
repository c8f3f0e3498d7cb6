use approx::assert_relative_eq;
use config::constants::{ConfigError, GeometryConfig};
use glam::DVec3;

use super::*;
use crate::error::GeometryError;
use crate::material::MaterialOrigin;
use crate::solid::Shape;

#[test]
fn test_default_layout_builds() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    assert_eq!(builder.state(), BuilderState::Uninitialized);
    assert!(builder.scoring_volume().is_none());

    builder.construct().unwrap();
    assert_eq!(builder.state(), BuilderState::Constructed);

    let geometry = builder.geometry().unwrap();
    let tree = geometry.tree();
    assert_eq!(tree.logical_volumes().len(), 4);
    assert_eq!(tree.physical_volumes().len(), 4);
    let envelope = geometry.envelope().unwrap();
    let names: Vec<_> = tree.children(envelope.id()).map(|pv| pv.name()).collect();
    assert_eq!(names, ["Mylar", "Pipe1"]);
}

#[test]
fn test_world_is_envelope_times_margin() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    builder.construct().unwrap();
    let tree = builder.geometry().unwrap().tree();
    let world = tree.find_logical(WORLD_NAME).unwrap();
    let envelope = tree.find_logical(ENVELOPE_NAME).unwrap();
    let world_half = world.solid().half_extents().unwrap();
    let envelope_half = envelope.solid().half_extents().unwrap();
    assert_relative_eq!(envelope_half.x, 100.0);
    assert_relative_eq!(envelope_half.z, 150.0);
    assert_relative_eq!(world_half.x, 120.0);
    assert_relative_eq!(world_half.y, 120.0);
    assert_relative_eq!(world_half.z, 180.0);
    assert_eq!(world.material().name(), "G4_AIR");
    assert_eq!(envelope.material().name(), "G4_WATER");
}

#[test]
fn test_custom_world_margin() {
    let config = GeometryConfig::new(1e-9, 500, 2.0).unwrap();
    let mut builder = GeometryBuilder::new(DetectorLayout::default()).with_config(config);
    builder.construct().unwrap();
    let world = builder
        .geometry()
        .unwrap()
        .tree()
        .find_logical(WORLD_NAME)
        .unwrap()
        .solid()
        .half_extents()
        .unwrap();
    assert_relative_eq!(world.x, 200.0);
}

#[test]
fn test_struct_literal_config_is_validated() {
    let config = GeometryConfig {
        world_margin: 0.5,
        ..GeometryConfig::default()
    };
    let mut builder = GeometryBuilder::new(DetectorLayout::default()).with_config(config);
    let err = builder.construct().unwrap_err();
    assert_eq!(
        err,
        GeometryError::InvalidConfig(ConfigError::InvalidWorldMargin(0.5))
    );
    assert_eq!(builder.state(), BuilderState::Uninitialized);
    assert!(builder.geometry().is_none());
}

#[test]
fn test_seeded_catalog_feeds_every_pass() {
    let mut catalog = MaterialCatalog::new();
    catalog.define_element("Tungsten", "W", 74.0, 183.84).unwrap();

    let mut layout = DetectorLayout::default();
    layout.materials.push(CompositionSpec {
        name: "TungstenBlock".into(),
        density: 19.3,
        composition: vec![AtomCount {
            element: "Tungsten".into(),
            atoms: 1,
        }],
    });
    layout.component_mut("Pipe1").unwrap().material = "TungstenBlock".into();

    let mut builder = GeometryBuilder::new(layout).with_catalog(catalog);
    builder.construct().unwrap();
    let geometry = builder.geometry().unwrap();
    let names = geometry.catalog().material_names();
    assert!(names.contains(&"TungstenBlock"));
    assert!(names.contains(&"G4_MYLAR"));
    let pipe = geometry.tree().find_logical("Pipe1").unwrap();
    assert_relative_eq!(pipe.material().mass_fraction_of("W"), 1.0);

    // The seed is cloned, so a second pass composes the block again.
    builder.construct().unwrap();
    assert!(builder
        .geometry()
        .unwrap()
        .catalog()
        .material_names()
        .contains(&"TungstenBlock"));
}

#[test]
fn test_pipe_is_composed_steel() {
    let mut builder = GeometryBuilder::new(DetectorLayout::default());
    builder.construct().unwrap();
    let geometry = builder.geometry().unwrap();
    let pipe = geometry.tree().find_logical("Pipe1").unwrap();
    let steel = pipe.material();
    assert_eq!(steel.name(), "Steel");
    assert_eq!(steel.origin(), MaterialOrigin::Composed);
    assert_relative_eq!(steel.density(), 7.73014, epsilon = 1e-12);
    assert!(geometry.catalog().material("Steel").is_some());
}

#[test]
fn test_last_scoring_designation_wins() {
    let mut layout = DetectorLayout::default();
    layout.component_mut("Pipe1").unwrap().scoring = true;
    let mut builder = GeometryBuilder::new(layout);
    builder.construct().unwrap();
    assert_eq!(builder.scoring_volume().unwrap().name(), "Pipe1");

    let mut designation = ScoringDesignation::default();
    assert_eq!(designation.volume(), None);
    let ids: Vec<_> = builder
        .geometry()
        .unwrap()
        .tree()
        .logical_volumes()
        .iter()
        .map(|lv| lv.id())
        .collect();
    designation.designate(ids[2]);
    designation.designate(ids[3]);
    assert_eq!(designation.volume(), Some(ids[3]));
}

#[test]
fn test_no_scoring_flag_leaves_designation_empty() {
    let mut layout = DetectorLayout::default();
    layout.component_mut("Mylar").unwrap().scoring = false;
    let mut builder = GeometryBuilder::new(layout);
    builder.construct().unwrap();
    assert!(builder.scoring_volume().is_none());
}

#[test]
fn test_unknown_material_aborts() {
    let mut layout = DetectorLayout::default();
    layout.envelope_material = "G4_UNOBTAINIUM".into();
    let mut builder = GeometryBuilder::new(layout);
    let err = builder.construct().unwrap_err();
    assert_eq!(err, GeometryError::UnknownMaterial("G4_UNOBTAINIUM".into()));
    assert_eq!(builder.state(), BuilderState::Uninitialized);
    assert!(builder.geometry().is_none());
}

#[test]
fn test_invalid_component_shape_aborts() {
    let mut layout = DetectorLayout::default();
    layout.component_mut("Pipe1").unwrap().shape = Shape::TubeSector {
        r_min: 70.0,
        r_max: 20.0,
        half_z: 30.0,
        start_angle: 50.0,
        delta_angle: 210.0,
    };
    let mut builder = GeometryBuilder::new(layout);
    assert!(matches!(
        builder.construct(),
        Err(GeometryError::InvalidDimension { .. })
    ));
}

#[test]
fn test_rotated_component() {
    let mut layout = DetectorLayout::default();
    let pipe = layout.component_mut("Pipe1").unwrap();
    pipe.rotation_deg = DVec3::new(0.0, 0.0, 90.0);
    let mut builder = GeometryBuilder::new(layout);
    builder.construct().unwrap();
    let tree = builder.geometry().unwrap().tree();
    let placed = tree.find_physical("Pipe1").unwrap();
    let rotated = placed.transform().apply_point(DVec3::X);
    assert!((rotated - DVec3::new(1.0, 0.0, 80.0)).length() < 1e-9);
}

#[test]
fn test_layout_component_lookup() {
    let layout = DetectorLayout::default();
    assert!(layout.component("Mylar").is_some());
    assert!(layout.component("Pipe2").is_none());
    let materials: Vec<_> = layout.referenced_materials().collect();
    assert_eq!(materials, ["G4_AIR", "G4_WATER", "G4_MYLAR", "Steel"]);
}
