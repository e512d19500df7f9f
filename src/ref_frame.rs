//! Reference-frame convention for emitted particle orientations.
//!
//! The downstream angle convention is intrinsic Z-Y-Z in degrees, extracted
//! from the **inverse** of each orientation. That convention couples the
//! first and last angle exactly when the middle (tilt) angle is 0 – which is
//! where untreated filament frames naturally sit. Every frame is therefore
//! right-multiplied by a fixed −90° rotation about Y before extraction,
//! moving the working tilt to ≈ 90° for a filament-aligned frame. The same
//! fixed rotation, inverted and pushed through the identical extraction
//! path, yields the constant prior angle triple shared by every output row.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Degree, Radian, ORTHONORMALITY_TOL};
use crate::filapose_errors::FilaposeError;
use serde::Serialize;

/// Euler angles `(rot, tilt, psi)` in degrees, intrinsic Z-Y-Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleTriple {
    pub rot: Degree,
    pub tilt: Degree,
    pub psi: Degree,
}

/// The fixed pre-rotation basis and its derived prior angles.
///
/// An explicitly constructed value, not process-wide state: build it once
/// per run and hand it to whoever converts orientations.
///
/// Fields
/// -----------------
/// * `basis` – the −90° rotation about Y applied to every frame.
/// * `prior` – Z-Y-Z angles of the inverted basis, `(0, 90, 0)`; the tilt
///   and psi components are reused verbatim as priors downstream, the rot
///   component is reported but conventionally not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedBasis {
    basis: Matrix3<f64>,
    prior: AngleTriple,
}

impl RotatedBasis {
    pub fn new() -> Self {
        let basis = axis_rotation(-std::f64::consts::FRAC_PI_2, 1);
        let prior = matrix_to_zyz_degrees(&basis.transpose());
        Self { basis, prior }
    }

    /// The fixed pre-rotation matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.basis
    }

    /// The constant prior triple, identical for every particle of a run.
    pub fn prior_angles(&self) -> AngleTriple {
        self.prior
    }

    /// Convert orientation frames into the downstream angle convention.
    ///
    /// Each matrix is checked for orthonormality, right-multiplied by the
    /// fixed basis, inverted, and decomposed as intrinsic Z-Y-Z. The inverse
    /// is part of the convention and must not be dropped.
    ///
    /// Arguments
    /// -----------------
    /// * `orientations`: proper rotation matrices, e.g. from
    ///   [`crate::pose_sampler::PoseSet::orientations`].
    ///
    /// Return
    /// ----------
    /// * One [`AngleTriple`] per input frame, in order, or
    ///   [`FilaposeError::NonOrthonormalOrientation`] naming the first
    ///   offending frame.
    pub fn to_euler_angles(
        &self,
        orientations: &[Matrix3<f64>],
    ) -> Result<Vec<AngleTriple>, FilaposeError> {
        let mut angles = Vec::with_capacity(orientations.len());
        for (index, orientation) in orientations.iter().enumerate() {
            let deviation = orthonormality_deviation(orientation);
            if deviation > ORTHONORMALITY_TOL || orientation.determinant() < 0.0 {
                return Err(FilaposeError::NonOrthonormalOrientation { index, deviation });
            }
            let rotated = orientation * self.basis;
            angles.push(matrix_to_zyz_degrees(&rotated.transpose()));
        }
        Ok(angles)
    }
}

impl Default for RotatedBasis {
    fn default() -> Self {
        Self::new()
    }
}

/// Right-handed rotation matrix by `alpha` radians about principal axis `k`
/// (0 → X, 1 → Y, 2 → Z).
///
/// Panics if `k > 2`; only three principal axes exist.
pub fn axis_rotation(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("invalid axis index {k} (must be 0,1,2)"),
    };
    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Decompose a rotation matrix as intrinsic Z-Y-Z angles in degrees.
///
/// For `R = Rz(rot)·Ry(tilt)·Rz(psi)`:
///
/// ```text
/// R[0][2] =  cos(rot)·sin(tilt)        R[2][0] = −sin(tilt)·cos(psi)
/// R[1][2] =  sin(rot)·sin(tilt)        R[2][1] =  sin(tilt)·sin(psi)
/// R[2][2] =  cos(tilt)
/// ```
///
/// so `rot = atan2(R[1][2], R[0][2])`, `tilt = atan2(|sin tilt|, R[2][2])`,
/// `psi = atan2(R[2][1], −R[2][0])` away from the singularity. When
/// `sin(tilt) ≈ 0` the first and last rotation share an axis; psi is then
/// pinned to 0 and the combined angle reported as rot.
pub fn matrix_to_zyz_degrees(m: &Matrix3<f64>) -> AngleTriple {
    let sin_tilt = (m[(0, 2)].powi(2) + m[(1, 2)].powi(2)).sqrt();

    let (rot, tilt, psi) = if sin_tilt > 1e-12 {
        (
            m[(1, 2)].atan2(m[(0, 2)]),
            sin_tilt.atan2(m[(2, 2)]),
            m[(2, 1)].atan2(-m[(2, 0)]),
        )
    } else if m[(2, 2)] > 0.0 {
        // tilt ≈ 0: R collapses to Rz(rot + psi)
        (m[(1, 0)].atan2(m[(0, 0)]), 0.0, 0.0)
    } else {
        // tilt ≈ 180: R collapses to Rz(rot − psi)·Ry(π)
        ((-m[(0, 1)]).atan2(m[(1, 1)]), std::f64::consts::PI, 0.0)
    };

    AngleTriple {
        rot: rot.to_degrees(),
        tilt: tilt.to_degrees(),
        psi: psi.to_degrees(),
    }
}

/// Compose an intrinsic Z-Y-Z triple (degrees) back into a rotation matrix.
/// Inverse of [`matrix_to_zyz_degrees`] away from the tilt singularity.
pub fn zyz_degrees_to_matrix(angles: &AngleTriple) -> Matrix3<f64> {
    axis_rotation(angles.rot.to_radians(), 2)
        * axis_rotation(angles.tilt.to_radians(), 1)
        * axis_rotation(angles.psi.to_radians(), 2)
}

/// Largest element-wise deviation of `Mᵀ·M` from the identity.
fn orthonormality_deviation(m: &Matrix3<f64>) -> f64 {
    let gram = m.transpose() * m;
    (gram - Matrix3::identity()).abs().max()
}

#[cfg(test)]
mod ref_frame_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prior_is_tilt_ninety() {
        let basis = RotatedBasis::new();
        let prior = basis.prior_angles();
        assert_relative_eq!(prior.rot, 0.0, epsilon = 1e-9);
        assert_relative_eq!(prior.tilt, 90.0, epsilon = 1e-9);
        assert_relative_eq!(prior.psi, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zyz_round_trip() {
        let cases = [
            (10.0, 35.0, -70.0),
            (-120.0, 150.0, 20.0),
            (87.0, 90.0, -12.0),
            (0.5, 1.0, 0.25),
        ];
        for (rot, tilt, psi) in cases {
            let triple = AngleTriple { rot, tilt, psi };
            let matrix = zyz_degrees_to_matrix(&triple);
            let recovered = matrix_to_zyz_degrees(&matrix);
            assert_relative_eq!(recovered.rot, rot, epsilon = 1e-9);
            assert_relative_eq!(recovered.tilt, tilt, epsilon = 1e-9);
            assert_relative_eq!(recovered.psi, psi, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_singular_tilt_collapses_to_rot() {
        let matrix = zyz_degrees_to_matrix(&AngleTriple {
            rot: 25.0,
            tilt: 0.0,
            psi: 40.0,
        });
        let recovered = matrix_to_zyz_degrees(&matrix);
        assert_relative_eq!(recovered.rot, 65.0, epsilon = 1e-9);
        assert_relative_eq!(recovered.tilt, 0.0, epsilon = 1e-9);
        assert_relative_eq!(recovered.psi, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_orientation_round_trip_through_convention() {
        let basis = RotatedBasis::new();
        let original = zyz_degrees_to_matrix(&AngleTriple {
            rot: 33.0,
            tilt: 75.0,
            psi: -140.0,
        });

        let angles = basis.to_euler_angles(&[original]).unwrap();
        // angles decompose (M · B)⁻¹, so M = zyz(angles)ᵀ · Bᵀ
        let reconstructed = zyz_degrees_to_matrix(&angles[0]).transpose() * basis.matrix().transpose();
        assert_relative_eq!(reconstructed, original, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_frame_maps_to_prior() {
        let basis = RotatedBasis::new();
        let angles = basis.to_euler_angles(&[Matrix3::identity()]).unwrap();
        let prior = basis.prior_angles();
        assert_relative_eq!(angles[0].rot, prior.rot, epsilon = 1e-9);
        assert_relative_eq!(angles[0].tilt, prior.tilt, epsilon = 1e-9);
        assert_relative_eq!(angles[0].psi, prior.psi, epsilon = 1e-9);
    }

    #[test]
    fn test_non_orthonormal_frame_rejected() {
        let basis = RotatedBasis::new();
        let mut skewed = Matrix3::identity();
        skewed[(0, 1)] = 0.05;

        let result = basis.to_euler_angles(&[Matrix3::identity(), skewed]);
        match result {
            Err(FilaposeError::NonOrthonormalOrientation { index, deviation }) => {
                assert_eq!(index, 1);
                assert!(deviation > ORTHONORMALITY_TOL);
            }
            other => panic!("expected NonOrthonormalOrientation, got {other:?}"),
        }
    }

    #[test]
    fn test_reflection_rejected() {
        let basis = RotatedBasis::new();
        let mut mirror = Matrix3::identity();
        mirror[(2, 2)] = -1.0;

        assert!(matches!(
            basis.to_euler_angles(&[mirror]),
            Err(FilaposeError::NonOrthonormalOrientation { .. })
        ));
    }
}
