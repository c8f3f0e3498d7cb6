//! # Material Catalog
//!
//! Explicit registry of elements and materials for one construction pass.
//! Predefined entries are built on first lookup and cached, so repeated
//! lookups share one instance. Custom elements and compositions are
//! registered under their name; names never get overwritten.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{Element, Material, MaterialOrigin};
use crate::error::{GeometryError, NameKind, Result};

// =============================================================================
// PREDEFINED TABLES
// =============================================================================

/// Predefined elements: (symbol, Z, molar mass in g/mole).
const PREDEFINED_ELEMENTS: &[(&str, f64, f64)] = &[
    ("H", 1.0, 1.00794),
    ("C", 6.0, 12.0107),
    ("N", 7.0, 14.0067),
    ("O", 8.0, 15.9994),
    ("Al", 13.0, 26.9815),
    ("Si", 14.0, 28.0855),
    ("Ar", 18.0, 39.948),
    ("Cr", 24.0, 51.9961),
    ("Fe", 26.0, 55.845),
    ("Ni", 28.0, 58.6934),
    ("Pb", 82.0, 207.217),
];

/// How a predefined material is broken down into elements.
enum Recipe {
    /// Atoms per formula unit.
    Atoms(&'static [(&'static str, u32)]),
    /// Mass fractions.
    Fractions(&'static [(&'static str, f64)]),
}

struct PredefinedMaterial {
    name: &'static str,
    /// g/cm3
    density: f64,
    recipe: Recipe,
}

const PREDEFINED_MATERIALS: &[PredefinedMaterial] = &[
    PredefinedMaterial {
        name: "G4_AIR",
        density: 0.00120479,
        recipe: Recipe::Fractions(&[
            ("C", 0.000124),
            ("N", 0.755268),
            ("O", 0.231781),
            ("Ar", 0.012827),
        ]),
    },
    PredefinedMaterial {
        name: "G4_WATER",
        density: 1.0,
        recipe: Recipe::Atoms(&[("H", 2), ("O", 1)]),
    },
    PredefinedMaterial {
        name: "G4_MYLAR",
        density: 1.4,
        recipe: Recipe::Atoms(&[("H", 8), ("C", 10), ("O", 4)]),
    },
    PredefinedMaterial {
        name: "G4_Galactic",
        density: 1e-25,
        recipe: Recipe::Atoms(&[("H", 1)]),
    },
    PredefinedMaterial {
        name: "G4_Al",
        density: 2.699,
        recipe: Recipe::Atoms(&[("Al", 1)]),
    },
    PredefinedMaterial {
        name: "G4_Si",
        density: 2.33,
        recipe: Recipe::Atoms(&[("Si", 1)]),
    },
    PredefinedMaterial {
        name: "G4_Fe",
        density: 7.874,
        recipe: Recipe::Atoms(&[("Fe", 1)]),
    },
    PredefinedMaterial {
        name: "G4_Pb",
        density: 11.35,
        recipe: Recipe::Atoms(&[("Pb", 1)]),
    },
    PredefinedMaterial {
        name: "G4_KAPTON",
        density: 1.42,
        recipe: Recipe::Atoms(&[("H", 10), ("C", 22), ("N", 2), ("O", 5)]),
    },
    PredefinedMaterial {
        name: "G4_STAINLESS-STEEL",
        density: 8.0,
        recipe: Recipe::Atoms(&[("Fe", 74), ("Cr", 18), ("Ni", 9)]),
    },
];

fn predefined_material(name: &str) -> Option<&'static PredefinedMaterial> {
    PREDEFINED_MATERIALS.iter().find(|m| m.name == name)
}

fn predefined_element(symbol: &str) -> Option<&'static (&'static str, f64, f64)> {
    PREDEFINED_ELEMENTS.iter().find(|(s, _, _)| *s == symbol)
}

// =============================================================================
// CATALOG
// =============================================================================

/// Registry of elements and materials.
///
/// One catalog serves one geometry. Cloning is cheap (entries are shared
/// `Arc`s) and gives an independent registry, which is how a builder hands a
/// fresh scope to every construction pass.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    elements: HashMap<String, Arc<Element>>,
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialCatalog {
    /// Creates an empty catalog. Predefined entries are built on demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers accepted by [`lookup_predefined`](Self::lookup_predefined).
    pub fn predefined_materials() -> impl Iterator<Item = &'static str> {
        PREDEFINED_MATERIALS.iter().map(|m| m.name)
    }

    /// Resolves a predefined material, building and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnknownMaterial`] if `name` is not in the predefined
    /// table.
    pub fn lookup_predefined(&mut self, name: &str) -> Result<Arc<Material>> {
        if let Some(material) = self.materials.get(name) {
            if material.origin() == MaterialOrigin::Predefined {
                return Ok(Arc::clone(material));
            }
        }
        let entry =
            predefined_material(name).ok_or_else(|| GeometryError::UnknownMaterial(name.into()))?;

        let material = match entry.recipe {
            Recipe::Atoms(atoms) => {
                let atoms = atoms
                    .iter()
                    .map(|(symbol, n)| Ok((self.element(symbol)?, *n)))
                    .collect::<Result<Vec<_>>>()?;
                Material::from_atoms(
                    entry.name.to_string(),
                    entry.density,
                    MaterialOrigin::Predefined,
                    &atoms,
                )
            }
            Recipe::Fractions(fractions) => {
                let fractions = fractions
                    .iter()
                    .map(|(symbol, w)| Ok((self.element(symbol)?, *w)))
                    .collect::<Result<Vec<_>>>()?;
                Material::from_mass_fractions(
                    entry.name.to_string(),
                    entry.density,
                    MaterialOrigin::Predefined,
                    &fractions,
                )
            }
        };

        debug!(material = entry.name, density = entry.density, "built predefined material");
        let material = Arc::new(material);
        self.materials
            .insert(entry.name.to_string(), Arc::clone(&material));
        Ok(material)
    }

    /// Composes and registers a material from `(element, atom count)` pairs.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidMaterialComposition`] if the name is empty,
    ///   `density <= 0`, the composition is empty, or an atom count is zero.
    /// - [`GeometryError::DuplicateName`] if the name is already registered
    ///   or reserved by the predefined table.
    pub fn compose_from_elements(
        &mut self,
        name: &str,
        density: f64,
        composition: &[(Arc<Element>, u32)],
    ) -> Result<Arc<Material>> {
        if name.is_empty() {
            return Err(GeometryError::invalid_composition(name, "name must not be empty"));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(GeometryError::invalid_composition(
                name,
                format!("density must be positive: {density}"),
            ));
        }
        if composition.is_empty() {
            return Err(GeometryError::invalid_composition(
                name,
                "at least one element is required",
            ));
        }
        if let Some((element, _)) = composition.iter().find(|(_, n)| *n < 1) {
            return Err(GeometryError::invalid_composition(
                name,
                format!("atom count of '{}' must be >= 1", element.name()),
            ));
        }
        if self.materials.contains_key(name) || predefined_material(name).is_some() {
            return Err(GeometryError::duplicate(NameKind::Material, name));
        }

        let material = Arc::new(Material::from_atoms(
            name.to_string(),
            density,
            MaterialOrigin::Composed,
            composition,
        ));
        debug!(
            material = name,
            density,
            constituents = composition.len(),
            "composed material"
        );
        self.materials.insert(name.to_string(), Arc::clone(&material));
        Ok(material)
    }

    /// Defines and registers a custom element.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidElement`] on an empty name or symbol, or a
    ///   non-positive `z` or molar mass.
    /// - [`GeometryError::DuplicateName`] if the name is taken, including by
    ///   a predefined element symbol.
    pub fn define_element(
        &mut self,
        name: &str,
        symbol: &str,
        z: f64,
        molar_mass: f64,
    ) -> Result<Arc<Element>> {
        if name.is_empty() || symbol.is_empty() {
            return Err(GeometryError::invalid_element(
                name,
                "name and symbol must not be empty",
            ));
        }
        if !z.is_finite() || z <= 0.0 {
            return Err(GeometryError::invalid_element(
                name,
                format!("atomic number must be positive: {z}"),
            ));
        }
        if !molar_mass.is_finite() || molar_mass <= 0.0 {
            return Err(GeometryError::invalid_element(
                name,
                format!("molar mass must be positive: {molar_mass}"),
            ));
        }
        if self.elements.contains_key(name) || predefined_element(name).is_some() {
            return Err(GeometryError::duplicate(NameKind::Element, name));
        }

        let element = Arc::new(Element::new(
            name.to_string(),
            symbol.to_string(),
            z,
            molar_mass,
        ));
        debug!(element = name, symbol, z, molar_mass, "defined element");
        self.elements.insert(name.to_string(), Arc::clone(&element));
        Ok(element)
    }

    /// Resolves an element: registered names first, then predefined symbols.
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnknownElement`] when neither matches.
    pub fn element(&mut self, name: &str) -> Result<Arc<Element>> {
        if let Some(element) = self.elements.get(name) {
            return Ok(Arc::clone(element));
        }
        let (symbol, z, a) =
            predefined_element(name).ok_or_else(|| GeometryError::UnknownElement(name.into()))?;
        let element = Arc::new(Element::new(symbol.to_string(), symbol.to_string(), *z, *a));
        self.elements.insert(symbol.to_string(), Arc::clone(&element));
        Ok(element)
    }

    /// Registered material, without falling back to the predefined table.
    pub fn material(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).cloned()
    }

    /// Registered material, else a predefined lookup.
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnknownMaterial`] when neither matches.
    pub fn resolve(&mut self, name: &str) -> Result<Arc<Material>> {
        match self.materials.get(name) {
            Some(material) => Ok(Arc::clone(material)),
            None => self.lookup_predefined(name),
        }
    }

    /// Number of registered materials, predefined ones included once built.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Registered material names, sorted.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
