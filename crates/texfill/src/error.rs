//! Error type for device setup and fill operations

use crate::FillDimension;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no {backends:?} adapter available: {source}")]
    AdapterUnavailable {
        backends: wgpu::Backends,
        #[source]
        source: wgpu::RequestAdapterError,
    },
    #[error("adapter '{adapter}' does not support compute shaders")]
    ComputeUnsupported { adapter: String },
    #[error("failed to create device: {0}")]
    DeviceUnavailable(#[from] wgpu::RequestDeviceError),
    #[error("texture extent {width}x{height}x{depth} has a zero dimension")]
    EmptyExtent { width: u32, height: u32, depth: u32 },
    #[error("2D fill target must have depth 1, got {depth}")]
    DepthOn2d { depth: u32 },
    #[error("texture format {0:?} is not supported, expected Rgba32Float")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("{pipeline:?} fill pipeline cannot write a {texture:?} texture")]
    DimensionMismatch { pipeline: FillDimension, texture: wgpu::TextureDimension },
    #[error("texture is missing required usage {0:?}")]
    MissingUsage(wgpu::TextureUsages),
    #[error("depth slice {depth_slice} is out of range for depth {depth}")]
    DepthSliceOutOfRange { depth_slice: u32, depth: u32 },
    #[error("expected {expected} texels for one slice, got {actual}")]
    TexelCountMismatch { expected: usize, actual: usize },
    #[error("shader workgroup size {0:?} has a zero component")]
    InvalidWorkgroupSize([u32; 3]),
    #[error("GPU error during {operation}: {source}")]
    Gpu {
        operation: &'static str,
        #[source]
        source: wgpu::Error,
    },
    #[error("failed waiting for the device: {0}")]
    Poll(#[from] wgpu::PollError),
}
