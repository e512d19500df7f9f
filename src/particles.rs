//! # Particle table assembly across tomograms
//!
//! The end of the pipeline: for every filament of every tomogram, combine
//! the sampled poses, their Euler angles, the per-pose track lengths, and
//! the tomogram identity into one aggregate, order-preserving table of
//! particle rows.
//!
//! ## Overview
//! -----------------
//! [`ParticleAssembler::assemble`] runs one tomogram at a time, and within
//! it one filament to completion before the next: metadata lookup →
//! grouping → spline build → pose sampling → arc-length estimate → angle
//! conversion → row emission. Filaments share no mutable state, so a future
//! parallel implementation only has to keep the merge ordered by input
//! position rather than by arrival; the current one is single-threaded and
//! ordered by construction.
//!
//! ## Row Model
//! -----------------
//! One [`ParticleRow`] per pose: tomogram name, 1-based filament ID
//! (first-seen manifold order within the tomogram), cumulative track length
//! in ångströms, position, and per-pose rot/tilt/psi. The table additionally
//! carries the run-constant prior triple and, only when polarity is
//! declared unknown, the fixed psi-flip ratio. The ratio column is absent
//! entirely for known polarity; its presence is itself a downstream signal.
//!
//! ## Error Semantics
//! -----------------
//! * Unknown tomogram name → [`FilaposeError::TomogramNotFound`], fatal.
//! * Degenerate filament (< 2 distinct points) → skipped with a warning;
//!   the remaining filaments are unaffected and no pose is ever fabricated.
//! * Invalid spacing is rejected when [`SamplingParams`] is built, once per
//!   run.
//!
//! ## See also
//! ------------
//! * [`crate::pose_sampler::HelicalPoseSampler`] – Per-filament sampling.
//! * [`crate::ref_frame::RotatedBasis`] – Angle convention and priors.

use itertools::izip;
use serde::Serialize;

use crate::annotations::TomogramAnnotations;
use crate::arc_length;
use crate::constants::{
    Angstrom, Degree, TomogramName, DENSE_SAMPLING_STEP, PSI_FLIP_RATIO_AMBIGUOUS,
};
use crate::filapose_errors::FilaposeError;
use crate::pose_sampler::HelicalPoseSampler;
use crate::ref_frame::{AngleTriple, RotatedBasis};
use crate::spline::FilamentSpline;
use crate::tomogram::{lookup_meta, TomogramRegistry};

/// Caller-supplied run parameters, validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    spacing_angstroms: Angstrom,
    twist_degrees: Degree,
    polarity_known: bool,
}

impl SamplingParams {
    /// Validate and freeze the run parameters.
    ///
    /// Arguments
    /// -----------------
    /// * `spacing_angstroms`: desired distance between particles along the
    ///   filament, in ångströms. Strictly positive.
    /// * `polarity_known`: whether the annotation direction fixes the
    ///   filament polarity; when `false` every output row carries the
    ///   ambiguous psi-flip ratio.
    pub fn new(spacing_angstroms: Angstrom, polarity_known: bool) -> Result<Self, FilaposeError> {
        if !(spacing_angstroms > 0.0) || !spacing_angstroms.is_finite() {
            return Err(FilaposeError::InvalidSpacing(spacing_angstroms));
        }
        Ok(Self {
            spacing_angstroms,
            twist_degrees: 0.0,
            polarity_known,
        })
    }

    /// Override the helical twist increment (degrees per spacing step).
    /// The annotation pipeline pins this to 0; the sampler supports more.
    pub fn with_twist(mut self, twist_degrees: Degree) -> Self {
        self.twist_degrees = twist_degrees;
        self
    }

    pub fn spacing_angstroms(&self) -> Angstrom {
        self.spacing_angstroms
    }

    pub fn twist_degrees(&self) -> Degree {
        self.twist_degrees
    }

    pub fn polarity_known(&self) -> bool {
        self.polarity_known
    }
}

/// One output row, one sampled pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleRow {
    pub tomo_name: TomogramName,
    /// 1-based, unique per tomogram, assigned in first-seen manifold order.
    pub filament_id: u32,
    /// Cumulative distance along the filament, in ångströms.
    pub track_length: Angstrom,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rot: Degree,
    pub tilt: Degree,
    pub psi: Degree,
}

/// Aggregate particle table for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTable {
    rows: Vec<ParticleRow>,
    prior: AngleTriple,
    psi_flip_ratio: Option<f64>,
}

impl ParticleTable {
    pub fn rows(&self) -> &[ParticleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The shared prior triple, identical for every row of the run.
    pub fn prior_angles(&self) -> AngleTriple {
        self.prior
    }

    /// `Some(0.5)` iff polarity was declared unknown; `None` otherwise.
    /// Persistence layers emit the column only when this is `Some`.
    pub fn psi_flip_ratio(&self) -> Option<f64> {
        self.psi_flip_ratio
    }
}

/// Turns grouped annotations plus per-tomogram metadata into a
/// [`ParticleTable`].
#[derive(Debug, Clone)]
pub struct ParticleAssembler {
    params: SamplingParams,
    basis: RotatedBasis,
}

impl ParticleAssembler {
    pub fn new(params: SamplingParams) -> Self {
        Self {
            params,
            basis: RotatedBasis::new(),
        }
    }

    /// Process every filament of every tomogram, in input order.
    ///
    /// Arguments
    /// -----------------
    /// * `registry`: per-tomogram metadata, resolved by name once per
    ///   tomogram before its filaments are touched.
    /// * `annotations`: one entry per tomogram, in the order the caller
    ///   discovered them; row concatenation preserves this order.
    ///
    /// Return
    /// ----------
    /// * The aggregate table, or the first fatal error (unknown tomogram
    ///   name, non-orthonormal frame).
    pub fn assemble(
        &self,
        registry: &TomogramRegistry,
        annotations: &[TomogramAnnotations<'_>],
    ) -> Result<ParticleTable, FilaposeError> {
        let mut rows = Vec::new();

        for tomo in annotations {
            let meta = lookup_meta(registry, &tomo.tomo_name)?;
            let sampler = HelicalPoseSampler::new(
                self.params.spacing_angstroms / meta.pixel_size,
                self.params.twist_degrees,
            )?;

            let filaments = tomo.batch.group_filaments(meta.binning);
            for (filament_index, (manifold_id, points)) in filaments.iter().enumerate() {
                let spline = match FilamentSpline::new(points.clone()) {
                    Ok(spline) => spline,
                    Err(FilaposeError::DegenerateFilament(n_distinct)) => {
                        log::warn!(
                            "skipping filament (manifold {manifold_id}) in {}: \
                             {n_distinct} distinct control point(s)",
                            tomo.tomo_name
                        );
                        continue;
                    }
                    Err(other) => return Err(other),
                };

                let poses = sampler.sample(&spline);
                let angles = self.basis.to_euler_angles(&poses.orientations())?;

                let total_length =
                    arc_length::estimate_total_length(&spline, DENSE_SAMPLING_STEP)
                        / meta.pixel_size;
                let track = track_lengths(poses.len(), total_length);

                let filament_id = filament_index as u32 + 1;
                for (pose, angle, distance) in izip!(poses.iter(), &angles, &track) {
                    rows.push(ParticleRow {
                        tomo_name: tomo.tomo_name.clone(),
                        filament_id,
                        track_length: *distance,
                        x: pose.position.x,
                        y: pose.position.y,
                        z: pose.position.z,
                        rot: angle.rot,
                        tilt: angle.tilt,
                        psi: angle.psi,
                    });
                }
            }
        }

        Ok(ParticleTable {
            rows,
            prior: self.basis.prior_angles(),
            psi_flip_ratio: (!self.params.polarity_known).then_some(PSI_FLIP_RATIO_AMBIGUOUS),
        })
    }
}

/// Per-pose cumulative track length: poses are equidistant by construction,
/// so the profile is `linspace(0, 1, n) · total_length`.
fn track_lengths(n_poses: usize, total_length: Angstrom) -> Vec<Angstrom> {
    (0..n_poses)
        .map(|i| {
            if n_poses > 1 {
                total_length * i as f64 / (n_poses - 1) as f64
            } else {
                0.0
            }
        })
        .collect()
}
