//! # Config Crate
//!
//! Centralized configuration for detector geometry construction.
//! Numeric tolerances, overlap sampling defaults and the unit system are
//! defined here so the geometry crates never scatter literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GeometryConfig, DEFAULT_WORLD_MARGIN};
//! use config::units::{CM, MM};
//!
//! // Lengths are expressed in millimetres internally.
//! let envelope_xy = 20.0 * CM;
//! assert_eq!(envelope_xy, 200.0 * MM);
//!
//! let cfg = GeometryConfig::default();
//! assert_eq!(cfg.world_margin, DEFAULT_WORLD_MARGIN);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit Units**: Every dimensional constant states its unit
//! - **Validated Snapshots**: `GeometryConfig::new` rejects nonsense values

pub mod constants;
pub mod units;

pub use constants::{ConfigError, GeometryConfig};
