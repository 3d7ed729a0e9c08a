//! Scenario manifests and shader loading for texfill
//!
//! This crate holds the host-side configuration of the fill demos: YAML
//! manifests that describe which texture to fill and with what value, and
//! WGSL shader loading with `naga` validation so that a broken shader is
//! reported before any GPU device is opened.

mod scenario;
mod shader;

pub use scenario::{Dimension, Scenario, ScenarioError};
pub use shader::{ShaderError, ShaderSource};
