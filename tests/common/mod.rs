use approx::assert_relative_eq;
use filapose::ref_frame::AngleTriple;
use filapose::tomogram::{registry_from_rows, TomogramRegistry};

pub fn assert_triple_close(actual: &AngleTriple, rot: f64, tilt: f64, psi: f64, epsilon: f64) {
    assert_relative_eq!(actual.rot, rot, epsilon = epsilon);
    assert_relative_eq!(actual.tilt, tilt, epsilon = epsilon);
    assert_relative_eq!(actual.psi, psi, epsilon = epsilon);
}

/// Registry with a single tomogram entry.
pub fn single_tomogram_registry(name: &str, pixel_size: f64, binning: f64) -> TomogramRegistry {
    registry_from_rows([(name.to_string(), pixel_size, binning)])
}
