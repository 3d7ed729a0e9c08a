//! Error type for texture readback and verification

use crate::compare::CompareError;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("depth slice {depth_slice} is out of range for depth {depth}")]
    DepthSliceOutOfRange { depth_slice: u32, depth: u32 },
    #[error("texture format {0:?} is not supported, expected Rgba32Float")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("source texture was not created with COPY_SRC usage")]
    MissingCopySource,
    #[error("GPU error during {operation}: {source}")]
    Gpu {
        operation: &'static str,
        #[source]
        source: wgpu::Error,
    },
    #[error("failed waiting for the device: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("failed to map staging buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("staging buffer map callback was dropped without a result")]
    MapCallbackDropped,
    #[error(transparent)]
    Compare(#[from] CompareError),
}
