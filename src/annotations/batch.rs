//! Row container for one tomogram's filament annotations.
//!
//! The file layer hands the engine plain numeric arrays: a manifold index
//! per row plus x/y/z coordinates. [`AnnotationBatch`] wraps those arrays
//! without forcing a copy, and [`AnnotationBatch::group_filaments`] turns
//! them into per-filament control-point lists.

use std::borrow::Cow;

use nalgebra::Vector3;

use super::FilamentSet;
use crate::constants::ManifoldId;

/// Annotation rows of a single tomogram.
///
/// Invariants
/// -----------------
/// * `manifold_id.len() == x.len() == y.len() == z.len()`
/// * Rows are in annotation-source order; grouping preserves it.
///
/// Construction
/// -----------------
/// * [`AnnotationBatch::from_rows_borrowed`] – zero-copy over caller slices.
/// * [`AnnotationBatch::from_points_owned`] – convenience for point triples.
#[derive(Debug, Clone)]
pub struct AnnotationBatch<'a> {
    /// Manifold (cluster) index per row; rows sharing an index belong to
    /// the same filament.
    pub manifold_id: Cow<'a, [ManifoldId]>,
    pub x: Cow<'a, [f64]>,
    pub y: Cow<'a, [f64]>,
    pub z: Cow<'a, [f64]>,
}

impl<'a> AnnotationBatch<'a> {
    /// Borrow coordinate columns already laid out by the caller.
    ///
    /// Panics
    /// ----------
    /// * Debug builds only: panics if the slice lengths do not match.
    pub fn from_rows_borrowed(
        manifold_id: &'a [ManifoldId],
        x: &'a [f64],
        y: &'a [f64],
        z: &'a [f64],
    ) -> Self {
        debug_assert_eq!(manifold_id.len(), x.len(), "manifold/x length mismatch");
        debug_assert_eq!(x.len(), y.len(), "x/y length mismatch");
        debug_assert_eq!(x.len(), z.len(), "x/z length mismatch");

        Self {
            manifold_id: Cow::Borrowed(manifold_id),
            x: Cow::Borrowed(x),
            y: Cow::Borrowed(y),
            z: Cow::Borrowed(z),
        }
    }

    /// Build an owning batch from `(manifold, [x, y, z])` rows.
    pub fn from_points_owned(rows: &[(ManifoldId, [f64; 3])]) -> AnnotationBatch<'static> {
        let manifold_id = rows.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        let x = rows.iter().map(|(_, p)| p[0]).collect::<Vec<_>>();
        let y = rows.iter().map(|(_, p)| p[1]).collect::<Vec<_>>();
        let z = rows.iter().map(|(_, p)| p[2]).collect::<Vec<_>>();

        AnnotationBatch {
            manifold_id: Cow::Owned(manifold_id),
            x: Cow::Owned(x),
            y: Cow::Owned(y),
            z: Cow::Owned(z),
        }
    }

    pub fn len(&self) -> usize {
        self.manifold_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifold_id.is_empty()
    }

    /// Group rows into per-filament control-point lists, preserving both
    /// row order inside each filament and the first-seen order of distinct
    /// manifold indices across filaments.
    ///
    /// Arguments
    /// -----------------
    /// * `scale_factor`: per-tomogram binning factor; each coordinate is
    ///   multiplied by it so control points land in pixels at the
    ///   tilt-series pixel size.
    pub fn group_filaments(&self, scale_factor: f64) -> FilamentSet {
        let mut filaments = FilamentSet::default();

        let ids = self.manifold_id.iter().copied();
        let xs = self.x.iter().copied();
        let ys = self.y.iter().copied();
        let zs = self.z.iter().copied();

        for (id, ((x, y), z)) in ids.zip(xs.zip(ys).zip(zs)) {
            filaments
                .entry(id)
                .or_default()
                .push(Vector3::new(x, y, z) * scale_factor);
        }
        filaments
    }
}
