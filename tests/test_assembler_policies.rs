use filapose::annotations::{AnnotationBatch, TomogramAnnotations};
use filapose::filapose_errors::FilaposeError;
use filapose::particles::{ParticleAssembler, SamplingParams};
use filapose::ref_frame::RotatedBasis;

mod common;
use common::single_tomogram_registry;

fn curved_annotations(tomo_name: &str) -> Vec<TomogramAnnotations<'static>> {
    let batch = AnnotationBatch::from_points_owned(&[
        (3, [0.0, 0.0, 0.0]),
        (3, [30.0, 12.0, 0.0]),
        (3, [60.0, 0.0, 8.0]),
        (3, [90.0, -10.0, 16.0]),
    ]);
    vec![TomogramAnnotations::new(tomo_name, batch)]
}

#[test]
fn test_prior_angles_constant_and_basis_derived() {
    let registry = single_tomogram_registry("TS_11", 1.35, 1.0);
    let params = SamplingParams::new(12.0, true).unwrap();
    let table = ParticleAssembler::new(params)
        .assemble(&registry, &curved_annotations("TS_11"))
        .unwrap();

    assert!(table.len() > 3);

    // the prior depends on the fixed basis alone, never on filament data
    let from_basis_alone = RotatedBasis::new().prior_angles();
    let prior = table.prior_angles();
    assert_eq!(prior, from_basis_alone);
    assert!((prior.rot).abs() < 1e-9);
    assert!((prior.tilt - 90.0).abs() < 1e-9);
    assert!((prior.psi).abs() < 1e-9);
}

#[test]
fn test_psi_flip_ratio_present_iff_polarity_unknown() {
    let registry = single_tomogram_registry("TS_11", 1.0, 1.0);

    let known = SamplingParams::new(12.0, true).unwrap();
    let table = ParticleAssembler::new(known)
        .assemble(&registry, &curved_annotations("TS_11"))
        .unwrap();
    assert_eq!(table.psi_flip_ratio(), None);

    let unknown = SamplingParams::new(12.0, false).unwrap();
    let table = ParticleAssembler::new(unknown)
        .assemble(&registry, &curved_annotations("TS_11"))
        .unwrap();
    assert_eq!(table.psi_flip_ratio(), Some(0.5));
}

#[test]
fn test_unknown_tomogram_name_is_fatal() {
    let registry = single_tomogram_registry("TS_11", 1.0, 1.0);
    let params = SamplingParams::new(12.0, true).unwrap();

    let result = ParticleAssembler::new(params).assemble(&registry, &curved_annotations("TS_99"));
    assert_eq!(
        result.unwrap_err(),
        FilaposeError::TomogramNotFound("TS_99".to_string())
    );
}

#[test]
fn test_degenerate_filament_skipped_without_aborting_batch() {
    let registry = single_tomogram_registry("TS_12", 1.0, 1.0);

    // manifold 4 collapses to a single distinct point and must be dropped;
    // manifold 7 is fine and keeps its rows
    let batch = AnnotationBatch::from_points_owned(&[
        (4, [5.0, 5.0, 5.0]),
        (4, [5.0, 5.0, 5.0]),
        (7, [0.0, 0.0, 0.0]),
        (7, [0.0, 0.0, 20.0]),
    ]);
    let annotations = vec![TomogramAnnotations::new("TS_12", batch)];

    let params = SamplingParams::new(10.0, true).unwrap();
    let table = ParticleAssembler::new(params)
        .assemble(&registry, &annotations)
        .unwrap();

    assert_eq!(table.len(), 3);
    // the surviving filament keeps the ID its discovery position gave it
    assert!(table.rows().iter().all(|r| r.filament_id == 2));
}

#[test]
fn test_spacing_longer_than_every_filament_still_emits_rows() {
    let registry = single_tomogram_registry("TS_13", 1.0, 1.0);

    let batch = AnnotationBatch::from_points_owned(&[
        (0, [0.0, 0.0, 0.0]),
        (0, [0.0, 0.0, 8.0]),
    ]);
    let annotations = vec![TomogramAnnotations::new("TS_13", batch)];

    let params = SamplingParams::new(500.0, true).unwrap();
    let table = ParticleAssembler::new(params)
        .assemble(&registry, &annotations)
        .unwrap();

    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert!((row.track_length).abs() < 1e-12);
    assert!((row.z).abs() < 1e-9);
}
