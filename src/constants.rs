//! # Constants and type definitions for filapose
//!
//! This module centralizes the **numerical tolerances**, **sampling
//! parameters**, and **common type definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Dense-sampling step for arc-length estimation
//! - Tolerances for orthonormality and pose-count rounding
//! - Core type aliases used across the crate
//! - Container types for annotated filaments
//!
//! These definitions are used by the spline, sampling, orientation, and
//! particle-assembly modules.

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Sampling parameters and tolerances
// -------------------------------------------------------------------------------------------------

/// Step (in the scaled coordinate unit, i.e. pixels) of the dense chord
/// sampling used to estimate filament arc length. Independent of the
/// requested particle spacing.
pub const DENSE_SAMPLING_STEP: f64 = 0.1;

/// Maximum element-wise deviation of `Mᵀ·M` from the identity for a matrix
/// to be accepted as a rotation.
pub const ORTHONORMALITY_TOL: f64 = 1e-6;

/// Relative slack applied before flooring `length / spacing`, so that a
/// filament whose length is a near-exact multiple of the spacing still
/// receives its final pose.
pub const POSE_COUNT_EPS: f64 = 1e-9;

/// Psi-flip ratio emitted when filament polarity is declared unknown:
/// both directions along the filament axis are equally likely.
pub const PSI_FLIP_RATIO_AMBIGUOUS: f64 = 0.5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in ångströms
pub type Angstrom = f64;
/// Distance in pixels at the tilt-series pixel size
pub type Pixel = f64;

/// Name identifying a tomogram / tilt series in the run metadata
pub type TomogramName = String;

/// Manifold (cluster) index tagging annotation rows that belong to the
/// same filament
pub type ManifoldId = i64;

/// Ordered control points of one filament backbone, in scaled coordinates
pub type ControlPoints = Vec<Vector3<f64>>;
