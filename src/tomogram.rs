//! Per-tomogram acquisition metadata.
//!
//! Each tomogram of a run contributes two numbers the engine cannot derive
//! itself: the tilt-series pixel size (ångströms per pixel) and the binning
//! factor of the annotation image. They are resolved once per tomogram,
//! by name, from an explicit registry the caller fills in; the engine
//! never reaches for an implicit or global lookup.

use std::collections::HashMap;

use ahash::RandomState;
use serde::Serialize;

use crate::constants::{Angstrom, TomogramName};
use crate::filapose_errors::FilaposeError;

/// Acquisition metadata for one tilt series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TiltSeriesMeta {
    /// Physical pixel size of the tilt series, in ångströms per pixel.
    pub pixel_size: Angstrom,
    /// Binning factor between the annotation image and the tilt series;
    /// annotation coordinates are multiplied by it.
    pub binning: f64,
}

impl TiltSeriesMeta {
    pub fn new(pixel_size: Angstrom, binning: f64) -> Self {
        Self {
            pixel_size,
            binning,
        }
    }
}

/// Lookup table from tomogram name to [`TiltSeriesMeta`].
pub type TomogramRegistry = HashMap<TomogramName, TiltSeriesMeta, RandomState>;

/// Build a registry from `(name, pixel_size, binning)` rows.
pub fn registry_from_rows(
    rows: impl IntoIterator<Item = (TomogramName, Angstrom, f64)>,
) -> TomogramRegistry {
    rows.into_iter()
        .map(|(name, pixel_size, binning)| (name, TiltSeriesMeta::new(pixel_size, binning)))
        .collect()
}

/// Resolve a tomogram's metadata by name.
///
/// Return
/// ----------
/// * The metadata entry, or [`FilaposeError::TomogramNotFound`]: an
///   unknown name is fatal for that tomogram's filaments and must be
///   surfaced, never silently skipped.
pub fn lookup_meta<'a>(
    registry: &'a TomogramRegistry,
    tomo_name: &str,
) -> Result<&'a TiltSeriesMeta, FilaposeError> {
    registry
        .get(tomo_name)
        .ok_or_else(|| FilaposeError::TomogramNotFound(tomo_name.to_string()))
}
