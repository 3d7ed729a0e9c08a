//! Compute-shader texture fill for wgpu
//!
//! This crate opens a wgpu device for a selectable backend, builds the
//! shader / bind group layout / bind group trio for a constant-value fill
//! shader, and dispatches it over 2D or 3D `Rgba32Float` textures. Reading
//! the result back lives in `texfill-verification`.

mod context;
mod error;
mod error_scope;
mod fill_pipeline;
mod texel;
mod texture;

pub use context::{Backend, GpuContext};
pub use error::Error;
pub use error_scope::{pop_error_scopes, push_error_scopes};
pub use fill_pipeline::{BoundFill, FillDimension, FillPipeline, FillShader, fill_texture};
pub use texel::Float4;
pub use texture::{FILL_TARGET_FORMAT, FILL_TARGET_USAGE, create_fill_target, write_texture_slice};
