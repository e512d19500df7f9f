//! # Annotations: ingestion and per-filament grouping
//!
//! Facilities to take the raw per-tomogram annotation rows handed over by
//! the (external) file layer and regroup them into one ordered
//! [`ControlPoints`](crate::constants::ControlPoints) list per filament.
//!
//! Modules
//! -----------------
//! * [`batch`](crate::annotations::batch) – Zero-copy row container
//!   ([`AnnotationBatch`]) and the grouping routine.
//!
//! Data Model
//! -----------------
//! * **Row:** one annotated 3D coordinate tagged with a
//!   [`ManifoldId`](crate::constants::ManifoldId) (the cluster index the
//!   annotation tool assigns per filament).
//! * **Set:** [`FilamentSet`] = `IndexMap<ManifoldId, ControlPoints>`.
//!   Insertion order is the first-seen order of the manifold indices, which
//!   is what makes downstream filament-ID assignment deterministic; an
//!   unordered map would not do here.
//!
//! Units
//! -----------------
//! Row coordinates arrive in the annotation-image coordinate system; the
//! grouping step multiplies them by the per-tomogram binning factor so that
//! every control point downstream lives in pixels at the tilt-series pixel
//! size.
//!
//! See also
//! ------------
//! * [`crate::particles`] – Consumes one [`TomogramAnnotations`] per
//!   tomogram and assembles the aggregate particle table.

use indexmap::IndexMap;

use crate::constants::{ControlPoints, ManifoldId, TomogramName};

pub mod batch;

pub use batch::AnnotationBatch;

/// All filaments of one tomogram, keyed by manifold index in first-seen
/// row order.
pub type FilamentSet = IndexMap<ManifoldId, ControlPoints>;

/// The annotation rows of a single tomogram, paired with its name.
#[derive(Debug, Clone)]
pub struct TomogramAnnotations<'a> {
    pub tomo_name: TomogramName,
    pub batch: AnnotationBatch<'a>,
}

impl<'a> TomogramAnnotations<'a> {
    pub fn new(tomo_name: impl Into<TomogramName>, batch: AnnotationBatch<'a>) -> Self {
        Self {
            tomo_name: tomo_name.into(),
            batch,
        }
    }
}
