//! Texture verification against an expected fill value

use crate::VerifyError;
use crate::compare::count_mismatches;
use crate::readback::StagingSlice;
use texfill::{FILL_TARGET_FORMAT, Float4};

/// Result of verifying one depth slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceReport {
    pub depth_slice: u32,
    pub mismatches: usize,
    pub texel_count: usize,
}

impl SliceReport {
    pub fn is_match(&self) -> bool {
        self.mismatches == 0
    }
}

/// Counts texels in one depth slice of `source` that differ from `expected`
///
/// The slice is copied into a transient staging buffer, the device is waited
/// on until idle, and the mapped copy is compared texel by texel with exact
/// bitwise equality. The source texture is never written.
///
/// # Arguments
/// * `device` - Device that owns `source`
/// * `queue` - Queue used for the copy submission
/// * `source` - `Rgba32Float` texture created with `COPY_SRC`
/// * `expected` - Value every texel should hold
/// * `depth_slice` - Slice index in `0..source.depth_or_array_layers()`
///
/// # Errors
/// Precondition failures are reported before anything is allocated. GPU
/// errors captured during allocation or the copy, a failed wait and a
/// failed mapping are all propagated; mismatches are never errors.
pub fn count_mismatched_texels(device: &wgpu::Device, queue: &wgpu::Queue, source: &wgpu::Texture, expected: Float4, depth_slice: u32) -> Result<usize, VerifyError> {
    let depth = source.depth_or_array_layers();
    if depth_slice >= depth {
        return Err(VerifyError::DepthSliceOutOfRange { depth_slice, depth });
    }
    if source.format() != FILL_TARGET_FORMAT {
        return Err(VerifyError::UnsupportedFormat(source.format()));
    }
    if !source.usage().contains(wgpu::TextureUsages::COPY_SRC) {
        return Err(VerifyError::MissingCopySource);
    }

    let staging = StagingSlice::copy_from(device, queue, source, depth_slice)?;
    device.poll(wgpu::PollType::Wait)?;

    let mapped = staging.map(device)?;
    let mismatches = count_mismatches(&mapped, staging.layout(), expected)?;

    Ok(mismatches)
}

/// Verifies one depth slice and logs the outcome
pub fn verify_slice(device: &wgpu::Device, queue: &wgpu::Queue, source: &wgpu::Texture, expected: Float4, depth_slice: u32) -> Result<SliceReport, VerifyError> {
    let mismatches = count_mismatched_texels(device, queue, source, expected, depth_slice)?;
    let report = SliceReport {
        depth_slice,
        mismatches,
        texel_count: source.width() as usize * source.height() as usize,
    };

    if report.is_match() {
        tracing::debug!(depth_slice, "slice matches");
    } else {
        tracing::warn!(depth_slice, mismatches, texel_count = report.texel_count, %expected, "slice has mismatched texels");
    }

    Ok(report)
}

/// Verifies every depth slice of `source` in order
pub fn verify_all_slices(device: &wgpu::Device, queue: &wgpu::Queue, source: &wgpu::Texture, expected: Float4) -> Result<Vec<SliceReport>, VerifyError> {
    (0..source.depth_or_array_layers())
        .map(|depth_slice| verify_slice(device, queue, source, expected, depth_slice))
        .collect()
}
