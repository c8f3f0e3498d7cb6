//! # Materials
//!
//! Elements, materials and the catalog that resolves and composes them.
//!
//! Materials are immutable once built and shared through [`Arc`]: a logical
//! volume references its material, it never owns it.
//!
//! ## Example
//!
//! ```rust
//! use detector_geometry::material::MaterialCatalog;
//! use config::units::{G_PER_MOLE, KG_PER_M3};
//!
//! let mut catalog = MaterialCatalog::new();
//! let fe = catalog.define_element("Iron", "Fe", 26.0, 55.845 * G_PER_MOLE).unwrap();
//! let c = catalog.define_element("Carbon", "C", 6.0, 12.011 * G_PER_MOLE).unwrap();
//! let steel = catalog
//!     .compose_from_elements("Steel", 7730.14 * KG_PER_M3, &[(fe, 3), (c, 1)])
//!     .unwrap();
//! let total: f64 = steel.constituents().iter().map(|c| c.mass_fraction()).sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```

mod catalog;

pub use catalog::MaterialCatalog;

use std::sync::Arc;

// =============================================================================
// ELEMENT
// =============================================================================

/// A chemical element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    symbol: String,
    z: f64,
    molar_mass: f64,
}

impl Element {
    pub(crate) fn new(name: String, symbol: String, z: f64, molar_mass: f64) -> Self {
        Self {
            name,
            symbol,
            z,
            molar_mass,
        }
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chemical symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Atomic number. Fractional for natural isotope mixtures.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Molar mass in g/mole.
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }
}

// =============================================================================
// MATERIAL
// =============================================================================

/// Where a material definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialOrigin {
    /// Built from the predefined table.
    Predefined,
    /// Composed by the caller from elements and atom counts.
    Composed,
}

/// One element of a material with its share of the mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    element: Arc<Element>,
    atoms: Option<u32>,
    mass_fraction: f64,
}

impl Constituent {
    /// The element.
    pub fn element(&self) -> &Arc<Element> {
        &self.element
    }

    /// Atoms per formula unit, when the material was defined by atom count.
    pub fn atoms(&self) -> Option<u32> {
        self.atoms
    }

    /// Fraction of the material mass carried by this element.
    pub fn mass_fraction(&self) -> f64 {
        self.mass_fraction
    }
}

/// A bulk material: name, density and element breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    density: f64,
    origin: MaterialOrigin,
    constituents: Vec<Constituent>,
}

impl Material {
    /// Builds a material from `(element, atom count)` pairs.
    ///
    /// Mass fractions are `n_i * A_i / sum(n_j * A_j)`. Callers validate the
    /// inputs first.
    pub(crate) fn from_atoms(
        name: String,
        density: f64,
        origin: MaterialOrigin,
        atoms: &[(Arc<Element>, u32)],
    ) -> Self {
        let total: f64 = atoms
            .iter()
            .map(|(element, n)| f64::from(*n) * element.molar_mass())
            .sum();
        let constituents = atoms
            .iter()
            .map(|(element, n)| Constituent {
                element: Arc::clone(element),
                atoms: Some(*n),
                mass_fraction: f64::from(*n) * element.molar_mass() / total,
            })
            .collect();
        Self {
            name,
            density,
            origin,
            constituents,
        }
    }

    /// Builds a material from `(element, mass fraction)` pairs, renormalized
    /// so the fractions sum to one.
    pub(crate) fn from_mass_fractions(
        name: String,
        density: f64,
        origin: MaterialOrigin,
        fractions: &[(Arc<Element>, f64)],
    ) -> Self {
        let total: f64 = fractions.iter().map(|(_, w)| w).sum();
        let constituents = fractions
            .iter()
            .map(|(element, w)| Constituent {
                element: Arc::clone(element),
                atoms: None,
                mass_fraction: w / total,
            })
            .collect();
        Self {
            name,
            density,
            origin,
            constituents,
        }
    }

    /// Catalog name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass density in g/cm3.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Predefined or composed.
    pub fn origin(&self) -> MaterialOrigin {
        self.origin
    }

    /// Constituents in definition order.
    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Mass fraction of the element with the given symbol, summed over
    /// repeated entries. Zero when absent.
    pub fn mass_fraction_of(&self, symbol: &str) -> f64 {
        self.constituents
            .iter()
            .filter(|c| c.element.symbol() == symbol)
            .map(|c| c.mass_fraction)
            .sum()
    }

    /// Mean molar mass of one formula unit in g/mole, for atom-defined
    /// materials.
    pub fn formula_mass(&self) -> Option<f64> {
        self.constituents
            .iter()
            .map(|c| c.atoms.map(|n| f64::from(n) * c.element.molar_mass()))
            .sum()
    }
}
