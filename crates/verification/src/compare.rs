//! Host-side texel comparison
//!
//! Readback memory holds one texture slice with each row padded up to
//! `wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`. This module describes that layout
//! and counts texels that differ from an expected value, skipping the
//! padding bytes.

use texfill::Float4;

/// Bytes per `Rgba32Float` texel
pub const TEXEL_SIZE: u32 = std::mem::size_of::<Float4>() as u32;

/// Layout of one texture slice in readback memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceLayout {
    pub width: u32,
    pub height: u32,
    /// Bytes of texel data per row
    pub unpadded_bytes_per_row: u32,
    /// Row stride in readback memory
    pub padded_bytes_per_row: u32,
}

impl SliceLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let unpadded_bytes_per_row = width * TEXEL_SIZE;
        let padded_bytes_per_row = wgpu::util::align_to(unpadded_bytes_per_row, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        Self {
            width,
            height,
            unpadded_bytes_per_row,
            padded_bytes_per_row,
        }
    }

    /// Total bytes occupied by the slice in readback memory
    pub fn size(&self) -> u64 {
        self.padded_bytes_per_row as u64 * self.height as u64
    }

    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("slice data is {actual} bytes, layout needs {expected}")]
    TruncatedSlice { expected: u64, actual: usize },
}

/// Iterates the texels of a padded slice in row-major order
pub fn texels(data: &[u8], layout: SliceLayout) -> Result<impl Iterator<Item = Float4> + '_, CompareError> {
    if (data.len() as u64) < layout.size() {
        return Err(CompareError::TruncatedSlice {
            expected: layout.size(),
            actual: data.len(),
        });
    }

    let texels = data
        .chunks((layout.padded_bytes_per_row as usize).max(1))
        .take(layout.height as usize)
        .flat_map(move |row| row[..layout.unpadded_bytes_per_row as usize].chunks_exact(TEXEL_SIZE as usize).map(bytemuck::pod_read_unaligned::<Float4>));

    Ok(texels)
}

/// Counts texels in a padded slice that are not bitwise equal to `expected`
///
/// Every texel is visited; the count is exact.
pub fn count_mismatches(data: &[u8], layout: SliceLayout, expected: Float4) -> Result<usize, CompareError> {
    Ok(texels(data, layout)?.filter(|texel| *texel != expected).count())
}
