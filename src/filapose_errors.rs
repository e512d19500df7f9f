use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilaposeError {
    #[error("filament has {0} distinct control point(s), at least 2 are required")]
    DegenerateFilament(usize),

    #[error("no tilt-series metadata found for tomogram: {0}")]
    TomogramNotFound(String),

    #[error("particle spacing must be strictly positive, got {0}")]
    InvalidSpacing(f64),

    #[error("orientation matrix {index} is not orthonormal (deviation {deviation:e})")]
    NonOrthonormalOrientation { index: usize, deviation: f64 },
}
