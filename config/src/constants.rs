//! # Configuration Constants
//!
//! Centralized constants for detector geometry construction. Solid
//! validation, overlap checking and world sizing all read their defaults
//! from here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Angles**: Full-circle bounds for tube sectors
//! - **Overlap Checking**: Tolerance and sample counts
//! - **World Sizing**: Margin applied around the envelope

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons of lengths (mm).
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Slack used when deciding whether an angle lies inside a sector (degrees).
///
/// Sector edges computed through `atan2` carry rounding noise of a few ulps;
/// this keeps a point sitting exactly on a phi cut plane inside the sector.
pub const ANGLE_EPSILON_DEG: f64 = 1e-9;

// =============================================================================
// ANGLE CONSTANTS
// =============================================================================

/// A full turn in degrees. Upper (inclusive) bound of a tube sector span.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

// =============================================================================
// OVERLAP CHECKING CONSTANTS
// =============================================================================

/// Default overlap tolerance (mm).
///
/// A sampled surface point must lie at least this deep inside a sibling
/// solid to count as an overlap. Zero means touching boundaries overlap.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_OVERLAP_TOLERANCE;
/// assert!(DEFAULT_OVERLAP_TOLERANCE >= 0.0);
/// ```
pub const DEFAULT_OVERLAP_TOLERANCE: f64 = 1e-9;

/// Default number of surface points sampled per solid during overlap checks.
pub const DEFAULT_OVERLAP_SAMPLES: u32 = 1000;

/// Minimum sample count. One point per box face.
pub const MIN_OVERLAP_SAMPLES: u32 = 6;

/// Upper bound on the sample count to keep checks interactive.
pub const MAX_OVERLAP_SAMPLES: u32 = 1_000_000;

// =============================================================================
// WORLD SIZING CONSTANTS
// =============================================================================

/// Multiplicative margin of the world volume over the envelope extents.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_WORLD_MARGIN;
///
/// let envelope_half_z = 150.0;
/// let world_half_z = DEFAULT_WORLD_MARGIN * envelope_half_z;
/// assert!((world_half_z - 180.0).abs() < 1e-9);
/// ```
pub const DEFAULT_WORLD_MARGIN: f64 = 1.2;

// =============================================================================
// GEOMETRY CONFIG
// =============================================================================

/// Immutable snapshot of the settings used by one construction pass.
///
/// # Examples
/// ```
/// use config::constants::GeometryConfig;
/// let config = GeometryConfig::default();
/// assert!(config.overlap_tolerance >= 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Penetration depth (mm) beyond which sampled points count as overlap.
    pub overlap_tolerance: f64,
    /// Surface points sampled per solid during an overlap check.
    pub overlap_samples: u32,
    /// World extents as a multiple of the envelope extents.
    pub world_margin: f64,
}

impl GeometryConfig {
    /// Builds a configuration enforcing strict validation of every field.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GeometryConfig;
    /// let cfg = GeometryConfig::new(0.0, 200, 1.5).expect("valid config");
    /// assert_eq!(cfg.overlap_samples, 200);
    /// ```
    pub fn new(
        overlap_tolerance: f64,
        overlap_samples: u32,
        world_margin: f64,
    ) -> Result<Self, ConfigError> {
        if !overlap_tolerance.is_finite() || overlap_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(overlap_tolerance));
        }
        if !(MIN_OVERLAP_SAMPLES..=MAX_OVERLAP_SAMPLES).contains(&overlap_samples) {
            return Err(ConfigError::InvalidSamples(overlap_samples));
        }
        if !world_margin.is_finite() || world_margin < 1.0 {
            return Err(ConfigError::InvalidWorldMargin(world_margin));
        }
        Ok(Self {
            overlap_tolerance,
            overlap_samples,
            world_margin,
        })
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            overlap_tolerance: DEFAULT_OVERLAP_TOLERANCE,
            overlap_samples: DEFAULT_OVERLAP_SAMPLES,
            world_margin: DEFAULT_WORLD_MARGIN,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when the overlap tolerance is negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the sample count is outside the supported range.
    InvalidSamples(u32),
    /// Raised when the world margin would not enclose the envelope.
    InvalidWorldMargin(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "overlap tolerance must be finite and >= 0: {value}")
            }
            ConfigError::InvalidSamples(value) => write!(
                f,
                "overlap samples must be within {MIN_OVERLAP_SAMPLES}..={MAX_OVERLAP_SAMPLES}: {value}"
            ),
            ConfigError::InvalidWorldMargin(value) => {
                write!(f, "world margin must be finite and >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Wraps an angle in degrees into `[0, 360)`.
///
/// # Example
///
/// ```rust
/// use config::constants::normalize_angle_deg;
///
/// assert_eq!(normalize_angle_deg(-90.0), 270.0);
/// assert_eq!(normalize_angle_deg(720.0), 0.0);
/// ```
#[inline]
pub fn normalize_angle_deg(angle: f64) -> f64 {
    angle.rem_euclid(FULL_CIRCLE_DEG)
}
