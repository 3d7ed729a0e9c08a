//! Fill-and-verify harness shared by the command-line tools
//!
//! A run creates the target texture, builds the fill pipeline, dispatches it,
//! and optionally reads every slice back to count mismatched texels.

use crate::{SliceReport, VerifyError, verify_all_slices};
use std::path::Path;
use std::time::{Duration, Instant};
use texfill::{FillDimension, FillPipeline, FillShader, Float4, GpuContext};
use texfill_scenario::{Dimension, Scenario, ShaderError, ShaderSource};

/// Parameters of one fill run
#[derive(Debug, Clone, PartialEq)]
pub struct FillRequest {
    pub dimension: FillDimension,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub value: Float4,
    /// Custom shader; the built-in one for `dimension` when `None`
    pub shader: Option<FillShader>,
    pub verify: bool,
}

/// Outcome of a fill run
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    /// Per-slice results, empty when verification was skipped
    pub slices: Vec<SliceReport>,
    pub fill_duration: Duration,
    pub verify_duration: Duration,
}

impl FillOutcome {
    pub fn total_mismatches(&self) -> usize {
        self.slices.iter().map(|slice| slice.mismatches).sum()
    }

    pub fn verified(&self) -> bool {
        !self.slices.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Fill(#[from] texfill::Error),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Maps a manifest dimension to the pipeline dimension
pub fn fill_dimension(dimension: Dimension) -> FillDimension {
    match dimension {
        Dimension::D2 => FillDimension::D2,
        Dimension::D3 => FillDimension::D3,
    }
}

/// Depth used when a 3D run does not specify one
pub const DEFAULT_DEPTH: u32 = 16;

/// Resolves an optional requested depth for `dimension`
///
/// 2D targets accept no depth or a depth of 1; anything else is rejected
/// rather than dropped.
pub fn resolve_depth(dimension: FillDimension, depth: Option<u32>) -> Result<u32, texfill::Error> {
    match (dimension, depth) {
        (FillDimension::D2, None | Some(1)) => Ok(1),
        (FillDimension::D2, Some(depth)) => Err(texfill::Error::DepthOn2d { depth }),
        (FillDimension::D3, depth) => Ok(depth.unwrap_or(DEFAULT_DEPTH)),
    }
}

/// Converts a validated shader into a fill shader
pub fn fill_shader_from_source(source: ShaderSource) -> FillShader {
    FillShader {
        label: source.label.into(),
        source: source.code.into(),
        entry_point: source.entry_point.into(),
        workgroup_size: source.workgroup_size,
    }
}

/// Loads a WGSL file as a fill shader
pub fn load_fill_shader<P: AsRef<Path>>(path: P) -> Result<FillShader, ShaderError> {
    ShaderSource::load(path).map(fill_shader_from_source)
}

impl FillRequest {
    /// Builds a request from a scenario manifest, loading its shader if any
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, HarnessError> {
        let shader = scenario.shader.as_deref().map(load_fill_shader).transpose()?;

        Ok(Self {
            dimension: fill_dimension(scenario.dimension),
            width: scenario.width(),
            height: scenario.height(),
            depth: scenario.depth(),
            value: Float4::from(scenario.fill),
            shader,
            verify: scenario.verify,
        })
    }
}

/// Runs one fill request on an open device
pub fn run(context: &GpuContext, request: &FillRequest) -> Result<FillOutcome, HarnessError> {
    let device = &context.device;

    let texture = texfill::create_fill_target(device, request.dimension, request.width, request.height, request.depth)?;
    let pipeline = match &request.shader {
        Some(shader) => FillPipeline::new(device, request.dimension, shader)?,
        None => FillPipeline::builtin(device, request.dimension)?,
    };

    let start = Instant::now();
    texfill::fill_texture(context, &pipeline, &texture, request.value)?;
    let fill_duration = start.elapsed();

    let start = Instant::now();
    let slices = if request.verify {
        verify_all_slices(device, &context.queue, &texture, request.value)?
    } else {
        Vec::new()
    };
    let verify_duration = start.elapsed();

    let outcome = FillOutcome {
        slices,
        fill_duration,
        verify_duration,
    };

    tracing::info!(
        width = request.width,
        height = request.height,
        depth = request.depth,
        mismatches = outcome.total_mismatches(),
        fill = ?outcome.fill_duration,
        verify = ?outcome.verify_duration,
        "fill run finished"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_scenario() {
        let scenario = Scenario::from_yaml("name: v\ndimension: 3d\nsize: [8, 4, 2]\nfill: [0.5, 0.25, 0.125, 1.0]\nverify: false\n").unwrap();
        let request = FillRequest::from_scenario(&scenario).unwrap();

        assert_eq!(request.dimension, FillDimension::D3);
        assert_eq!((request.width, request.height, request.depth), (8, 4, 2));
        assert_eq!(request.value, Float4::new(0.5, 0.25, 0.125, 1.0));
        assert_eq!(request.shader, None);
        assert!(!request.verify);
    }

    #[test]
    fn test_request_from_scenario_missing_shader() {
        let scenario = Scenario::from_yaml("name: v\ndimension: 2d\nsize: [8, 4, 1]\nfill: [0, 0, 0, 0]\nshader: /nonexistent/texfill/fill.wgsl\n").unwrap();
        let err = FillRequest::from_scenario(&scenario).unwrap_err();

        assert!(matches!(err, HarnessError::Shader(ShaderError::Io { .. })));
    }

    #[test]
    fn test_resolve_depth_for_2d() {
        assert_eq!(resolve_depth(FillDimension::D2, None).unwrap(), 1);
        assert_eq!(resolve_depth(FillDimension::D2, Some(1)).unwrap(), 1);

        let err = resolve_depth(FillDimension::D2, Some(8)).unwrap_err();
        assert!(matches!(err, texfill::Error::DepthOn2d { depth: 8 }));
    }

    #[test]
    fn test_resolve_depth_for_3d() {
        assert_eq!(resolve_depth(FillDimension::D3, None).unwrap(), DEFAULT_DEPTH);
        assert_eq!(resolve_depth(FillDimension::D3, Some(5)).unwrap(), 5);
    }

    #[test]
    fn test_outcome_totals() {
        let outcome = FillOutcome {
            slices: vec![
                SliceReport { depth_slice: 0, mismatches: 0, texel_count: 16 },
                SliceReport { depth_slice: 1, mismatches: 3, texel_count: 16 },
            ],
            fill_duration: Duration::ZERO,
            verify_duration: Duration::ZERO,
        };

        assert_eq!(outcome.total_mismatches(), 3);
        assert!(outcome.verified());
    }
}
