//! Compute fill followed by readback verification
//!
//! These tests need a compute-capable adapter and skip themselves otherwise.

mod common;

use common::{try_context, uploaded_texture};
use texfill::{FillDimension, FillPipeline, Float4};
use texfill_scenario::Scenario;
use texfill_verification::harness::{self, FillRequest};
use texfill_verification::{count_mismatched_texels, verify_all_slices};

#[test]
fn test_fill_2d_then_verify() {
    let Some(context) = try_context() else { return };
    let value = Float4::new(1.0, 0.5, 0.25, 0.125);
    // Odd extents exercise both the shader bounds check and row padding
    let texture = texfill::create_fill_target(&context.device, FillDimension::D2, 37, 19, 1).unwrap();
    let pipeline = FillPipeline::builtin(&context.device, FillDimension::D2).unwrap();

    texfill::fill_texture(&context, &pipeline, &texture, value).unwrap();

    assert_eq!(count_mismatched_texels(&context.device, &context.queue, &texture, value, 0).unwrap(), 0);
    assert_eq!(count_mismatched_texels(&context.device, &context.queue, &texture, Float4::ZERO, 0).unwrap(), 37 * 19);
}

#[test]
fn test_fill_3d_overwrites_every_slice() {
    let Some(context) = try_context() else { return };
    let value = Float4::splat(0.75);
    let texture = uploaded_texture(&context, FillDimension::D3, 10, 6, 7, |d| Float4::splat(d as f32));
    let pipeline = FillPipeline::builtin(&context.device, FillDimension::D3).unwrap();

    texfill::fill_texture(&context, &pipeline, &texture, value).unwrap();

    let reports = verify_all_slices(&context.device, &context.queue, &texture, value).unwrap();
    assert_eq!(reports.len(), 7);
    assert!(reports.iter().all(|report| report.is_match() && report.texel_count == 60), "{reports:?}");
}

#[test]
fn test_pipeline_rejects_wrong_dimension() {
    let Some(context) = try_context() else { return };
    let texture = texfill::create_fill_target(&context.device, FillDimension::D2, 8, 8, 1).unwrap();
    let pipeline = FillPipeline::builtin(&context.device, FillDimension::D3).unwrap();

    let err = pipeline.bind(&context.device, &texture, Float4::ZERO).unwrap_err();
    assert!(matches!(err, texfill::Error::DimensionMismatch { pipeline: FillDimension::D3, .. }));
}

#[test]
fn test_bound_fill_dispatch_size() {
    let Some(context) = try_context() else { return };
    let texture = texfill::create_fill_target(&context.device, FillDimension::D3, 16, 9, 5).unwrap();
    let pipeline = FillPipeline::builtin(&context.device, FillDimension::D3).unwrap();

    let bound = pipeline.bind(&context.device, &texture, Float4::ZERO).unwrap();
    assert_eq!(bound.workgroups(), [4, 3, 2]);
}

#[test]
fn test_harness_runs_bundled_scenarios() {
    let Some(context) = try_context() else { return };
    let scenario_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../scenarios");

    for name in ["plane_64x32.yaml", "volume_16.yaml", "volume_custom_shader.yaml"] {
        let scenario = Scenario::from_file(format!("{scenario_dir}/{name}")).unwrap();
        let request = FillRequest::from_scenario(&scenario).unwrap();
        let outcome = harness::run(&context, &request).unwrap();

        assert!(outcome.verified(), "{name}");
        assert_eq!(outcome.slices.len(), scenario.depth() as usize, "{name}");
        assert_eq!(outcome.total_mismatches(), 0, "{name}");
    }
}

#[test]
fn test_harness_without_verification() {
    let Some(context) = try_context() else { return };
    let request = FillRequest {
        dimension: FillDimension::D2,
        width: 8,
        height: 8,
        depth: 1,
        value: Float4::splat(1.0),
        shader: None,
        verify: false,
    };

    let outcome = harness::run(&context, &request).unwrap();
    assert!(!outcome.verified());
    assert_eq!(outcome.total_mismatches(), 0);
}
