//! WGSL shader loading
//!
//! Custom fill shaders are parsed and validated with `naga` before they reach
//! a device, and the compute entry point's workgroup size is read from the
//! module so the dispatch size can be derived without duplicating constants.

use std::path::{Path, PathBuf};

/// Preferred compute entry point name
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// A validated WGSL compute shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Label used for the shader module and diagnostics
    pub label: String,
    /// WGSL source text
    pub code: String,
    /// Name of the compute entry point
    pub entry_point: String,
    /// Workgroup size declared by the entry point
    pub workgroup_size: [u32; 3],
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse shader '{label}': {source}")]
    Parse {
        label: String,
        #[source]
        source: naga::front::wgsl::ParseError,
    },
    #[error("shader '{label}' failed validation: {source}")]
    Validation {
        label: String,
        #[source]
        source: naga::WithSpan<naga::valid::ValidationError>,
    },
    #[error("shader '{label}' has no compute entry point")]
    NoComputeEntryPoint { label: String },
    #[error("shader '{label}' has several compute entry points and none is named 'main'")]
    AmbiguousEntryPoint { label: String },
}

impl ShaderSource {
    /// Validates WGSL source and extracts its compute entry point
    pub fn from_wgsl(label: impl Into<String>, code: impl Into<String>) -> Result<Self, ShaderError> {
        let label = label.into();
        let code = code.into();

        let module = naga::front::wgsl::parse_str(&code).map_err(|source| ShaderError::Parse { label: label.clone(), source })?;

        let mut validator = naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all());
        validator.validate(&module).map_err(|source| ShaderError::Validation { label: label.clone(), source })?;

        let compute_entry_points: Vec<_> = module.entry_points.iter().filter(|ep| ep.stage == naga::ShaderStage::Compute).collect();
        let entry_point = match compute_entry_points.as_slice() {
            [] => return Err(ShaderError::NoComputeEntryPoint { label }),
            [only] => *only,
            several => several
                .iter()
                .copied()
                .find(|ep| ep.name == DEFAULT_ENTRY_POINT)
                .ok_or_else(|| ShaderError::AmbiguousEntryPoint { label: label.clone() })?,
        };

        Ok(Self {
            entry_point: entry_point.name.clone(),
            workgroup_size: entry_point.workgroup_size,
            label,
            code,
        })
    }

    /// Reads and validates a WGSL file
    ///
    /// The file name becomes the shader label.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| ShaderError::Io { path: path.to_path_buf(), source })?;
        let label = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string());

        Self::from_wgsl(label, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL_2D: &str = r#"
struct FillParams {
    value: vec4<f32>,
}

@group(0) @binding(0) var<uniform> params: FillParams;
@group(0) @binding(1) var output_texture: texture_storage_2d<rgba32float, write>;

@compute @workgroup_size(8, 8, 1)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    let size = textureDimensions(output_texture);
    if (id.x >= size.x || id.y >= size.y) {
        return;
    }
    textureStore(output_texture, id.xy, params.value);
}
"#;

    #[test]
    fn test_reads_workgroup_size() {
        let shader = ShaderSource::from_wgsl("fill_2d", FILL_2D).unwrap();
        assert_eq!(shader.entry_point, "main");
        assert_eq!(shader.workgroup_size, [8, 8, 1]);
        assert_eq!(shader.label, "fill_2d");
    }

    #[test]
    fn test_single_entry_point_with_other_name() {
        let code = "@compute @workgroup_size(4, 2, 1)\nfn fill() {}\n";
        let shader = ShaderSource::from_wgsl("other", code).unwrap();
        assert_eq!(shader.entry_point, "fill");
        assert_eq!(shader.workgroup_size, [4, 2, 1]);
    }

    #[test]
    fn test_prefers_main_among_several() {
        let code = "@compute @workgroup_size(1)\nfn a() {}\n@compute @workgroup_size(2, 2, 2)\nfn main() {}\n";
        let shader = ShaderSource::from_wgsl("several", code).unwrap();
        assert_eq!(shader.entry_point, "main");
        assert_eq!(shader.workgroup_size, [2, 2, 2]);
    }

    #[test]
    fn test_ambiguous_entry_points() {
        let code = "@compute @workgroup_size(1)\nfn a() {}\n@compute @workgroup_size(1)\nfn b() {}\n";
        let err = ShaderSource::from_wgsl("ambiguous", code).unwrap_err();
        assert!(matches!(err, ShaderError::AmbiguousEntryPoint { .. }));
    }

    #[test]
    fn test_no_compute_entry_point() {
        let code = "@vertex\nfn vs() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }\n";
        let err = ShaderSource::from_wgsl("vertex_only", code).unwrap_err();
        assert!(matches!(err, ShaderError::NoComputeEntryPoint { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = ShaderSource::from_wgsl("broken", "fn main( {").unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));
    }

    #[test]
    fn test_load_bundled_shader() {
        let shader = ShaderSource::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../scenarios/shaders/fill_3d_layered.wgsl")).unwrap();
        assert_eq!(shader.label, "fill_3d_layered.wgsl");
        assert_eq!(shader.workgroup_size, [8, 8, 1]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ShaderSource::load("/nonexistent/texfill/fill.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
