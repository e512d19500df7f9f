pub mod annotations;
pub mod arc_length;
pub mod constants;
pub mod filapose_errors;
pub mod particles;
pub mod pose_sampler;
pub mod ref_frame;
pub mod spline;
pub mod tomogram;

pub use annotations::{AnnotationBatch, FilamentSet, TomogramAnnotations};
pub use constants::{ControlPoints, ManifoldId, TomogramName};
pub use filapose_errors::FilaposeError;
pub use particles::{ParticleAssembler, ParticleRow, ParticleTable, SamplingParams};
pub use pose_sampler::{HelicalPoseSampler, Pose, PoseSet};
pub use ref_frame::{AngleTriple, RotatedBasis};
pub use spline::FilamentSpline;
pub use tomogram::{registry_from_rows, TiltSeriesMeta, TomogramRegistry};
