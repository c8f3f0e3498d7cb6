//! # Units
//!
//! The unit system used at every geometry API boundary. Base units are
//! millimetre (length), degree (angle), g/cm3 (mass density) and g/mole
//! (molar mass). Multiply a literal by a constant to express it in base
//! units:
//!
//! ```rust
//! use config::units::{CM, KG_PER_M3, UM};
//!
//! let half_z = 250.0 * UM;
//! assert!((half_z - 0.25).abs() < 1e-12);
//!
//! let steel = 7730.14 * KG_PER_M3;
//! assert!((steel - 7.73014).abs() < 1e-12);
//! # let _ = CM;
//! ```

// =============================================================================
// LENGTH (base: millimetre)
// =============================================================================

/// Millimetre.
pub const MM: f64 = 1.0;
/// Micrometre.
pub const UM: f64 = 1e-3 * MM;
/// Centimetre.
pub const CM: f64 = 10.0 * MM;
/// Metre.
pub const M: f64 = 1000.0 * MM;

// =============================================================================
// ANGLE (base: degree)
// =============================================================================

/// Degree.
pub const DEG: f64 = 1.0;
/// Radian expressed in degrees.
pub const RAD: f64 = 180.0 / std::f64::consts::PI * DEG;

// =============================================================================
// DENSITY (base: g/cm3)
// =============================================================================

/// Gram per cubic centimetre.
pub const G_PER_CM3: f64 = 1.0;
/// Kilogram per cubic metre.
pub const KG_PER_M3: f64 = 1e-3 * G_PER_CM3;

// =============================================================================
// MOLAR MASS (base: g/mole)
// =============================================================================

/// Gram per mole.
pub const G_PER_MOLE: f64 = 1.0;
