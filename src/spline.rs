//! Interpolating spline model of a filament backbone.
//!
//! An annotated backbone is an ordered list of 3D control points. The
//! [`FilamentSpline`] threads a C¹ cubic Hermite curve (Catmull-Rom
//! tangents) through them, so that positions sampled between annotations
//! approximate the true filament shape better than the raw clicks do.
//! Control points are consumed in their given order and are never
//! reordered.

use nalgebra::Vector3;

use crate::constants::ControlPoints;
use crate::filapose_errors::FilaposeError;

/// Continuous, immutable model of one filament path.
///
/// The curve is parameterized over `t ∈ [0, 1]`; parameter `i / (n − 1)`
/// lands exactly on control point `i`. Between control points the curve is
/// a cubic Hermite segment with central-difference tangents (one-sided at
/// the ends), which interpolates every control point with a continuous
/// first derivative.
///
/// Construction
/// -----------------
/// * [`FilamentSpline::new`] – fails with
///   [`FilaposeError::DegenerateFilament`] when fewer than 2 **distinct**
///   points are supplied; a path cannot be defined from a single location.
///
/// See also
/// ------------
/// * [`crate::arc_length`] – Dense chord summation over this curve.
/// * [`crate::pose_sampler::HelicalPoseSampler`] – Equidistant pose sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct FilamentSpline {
    points: Vec<Vector3<f64>>,
    /// Per-node Hermite tangents, in per-segment parameter units.
    tangents: Vec<Vector3<f64>>,
}

impl FilamentSpline {
    /// Build a spline through `points`, preserving their order.
    ///
    /// Arguments
    /// -----------------
    /// * `points`: ordered control points of one filament, already scaled
    ///   into the working coordinate unit.
    ///
    /// Return
    /// ----------
    /// * The spline, or [`FilaposeError::DegenerateFilament`] carrying the
    ///   number of distinct points actually found.
    pub fn new(points: ControlPoints) -> Result<Self, FilaposeError> {
        let distinct = count_distinct(&points);
        if distinct < 2 {
            return Err(FilaposeError::DegenerateFilament(distinct));
        }

        let n = points.len();
        let mut tangents = Vec::with_capacity(n);
        tangents.push(points[1] - points[0]);
        for i in 1..n - 1 {
            tangents.push((points[i + 1] - points[i - 1]) * 0.5);
        }
        tangents.push(points[n - 1] - points[n - 2]);

        Ok(Self { points, tangents })
    }

    /// Position on the curve at `t ∈ [0, 1]` (out-of-range `t` clamps to
    /// the domain).
    pub fn position(&self, t: f64) -> Vector3<f64> {
        let (i, s) = self.segment(t);
        let (h00, h10, h01, h11) = hermite_basis(s);
        self.points[i] * h00
            + self.tangents[i] * h10
            + self.points[i + 1] * h01
            + self.tangents[i + 1] * h11
    }

    /// First derivative `dP/dt` at `t ∈ [0, 1]`.
    ///
    /// The magnitude depends on the parameterization; callers interested in
    /// the direction of travel should normalize.
    pub fn derivative(&self, t: f64) -> Vector3<f64> {
        let (i, s) = self.segment(t);
        let (d00, d10, d01, d11) = hermite_basis_derivative(s);
        let per_segment = self.points[i] * d00
            + self.tangents[i] * d10
            + self.points[i + 1] * d01
            + self.tangents[i + 1] * d11;
        per_segment * (self.points.len() - 1) as f64
    }

    /// The control points this curve interpolates.
    pub fn control_points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Length of the control polygon (chord-to-chord). A first-order size
    /// estimate used to choose dense-sampling resolutions, not a substitute
    /// for the arc-length estimate.
    pub(crate) fn polygon_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Map global `t ∈ [0, 1]` to (segment index, local parameter `s`).
    fn segment(&self, t: f64) -> (usize, f64) {
        let n_segments = self.points.len() - 1;
        let u = t.clamp(0.0, 1.0) * n_segments as f64;
        let i = (u as usize).min(n_segments - 1);
        (i, u - i as f64)
    }
}

fn count_distinct(points: &[Vector3<f64>]) -> usize {
    let mut distinct: Vec<&Vector3<f64>> = Vec::new();
    for p in points {
        if !distinct.iter().any(|q| *q == p) {
            distinct.push(p);
        }
    }
    distinct.len()
}

fn hermite_basis(s: f64) -> (f64, f64, f64, f64) {
    let s2 = s * s;
    let s3 = s2 * s;
    (
        2.0 * s3 - 3.0 * s2 + 1.0,
        s3 - 2.0 * s2 + s,
        -2.0 * s3 + 3.0 * s2,
        s3 - s2,
    )
}

fn hermite_basis_derivative(s: f64) -> (f64, f64, f64, f64) {
    let s2 = s * s;
    (
        6.0 * s2 - 6.0 * s,
        3.0 * s2 - 4.0 * s + 1.0,
        -6.0 * s2 + 6.0 * s,
        3.0 * s2 - 2.0 * s,
    )
}

#[cfg(test)]
mod spline_test {
    use super::*;
    use approx::assert_relative_eq;

    fn zigzag() -> ControlPoints {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 5.0, 0.0),
            Vector3::new(20.0, 0.0, 3.0),
            Vector3::new(30.0, -4.0, 6.0),
        ]
    }

    #[test]
    fn test_endpoints_reproduce_control_points() {
        let points = zigzag();
        let spline = FilamentSpline::new(points.clone()).unwrap();

        assert_relative_eq!(spline.position(0.0), points[0], epsilon = 1e-12);
        assert_relative_eq!(spline.position(1.0), points[3], epsilon = 1e-12);
    }

    #[test]
    fn test_interior_control_points_interpolated() {
        let points = zigzag();
        let spline = FilamentSpline::new(points.clone()).unwrap();

        assert_relative_eq!(spline.position(1.0 / 3.0), points[1], epsilon = 1e-12);
        assert_relative_eq!(spline.position(2.0 / 3.0), points[2], epsilon = 1e-12);
    }

    #[test]
    fn test_two_points_is_a_straight_segment() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(5.0, 2.0, 3.0);
        let spline = FilamentSpline::new(vec![a, b]).unwrap();

        assert_relative_eq!(
            spline.position(0.25),
            Vector3::new(2.0, 2.0, 3.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            spline.derivative(0.5).normalize(),
            Vector3::x(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_out_of_range_parameter_clamps() {
        let spline = FilamentSpline::new(zigzag()).unwrap();
        assert_relative_eq!(spline.position(-0.5), spline.position(0.0));
        assert_relative_eq!(spline.position(1.5), spline.position(1.0));
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        assert_eq!(
            FilamentSpline::new(vec![]),
            Err(FilaposeError::DegenerateFilament(0))
        );
        assert_eq!(
            FilamentSpline::new(vec![Vector3::new(1.0, 1.0, 1.0)]),
            Err(FilaposeError::DegenerateFilament(1))
        );

        let same = Vector3::new(4.0, 4.0, 4.0);
        assert_eq!(
            FilamentSpline::new(vec![same, same, same]),
            Err(FilaposeError::DegenerateFilament(1))
        );
    }

    #[test]
    fn test_duplicate_interior_point_is_allowed() {
        let p = Vector3::new(10.0, 0.0, 0.0);
        let spline = FilamentSpline::new(vec![Vector3::zeros(), p, p, Vector3::new(20.0, 0.0, 0.0)]);
        assert!(spline.is_ok());
    }
}
