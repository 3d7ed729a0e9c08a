//! Scenario manifest parser
//!
//! A scenario describes one fill-and-verify run. Manifests are YAML files:
//!
//! ```yaml
//! name: volume-16
//! dimension: 3d
//! size: [16, 16, 16]
//! fill: [0.5, 0.25, 0.125, 1.0]
//! shader: fill_3d_custom.wgsl
//! verify: true
//! ```
//!
//! `shader` is optional and resolved relative to the manifest's directory
//! when loaded with [`Scenario::from_file`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Texture dimensionality targeted by a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2d", alias = "2D")]
    D2,
    #[serde(rename = "3d", alias = "3D")]
    D3,
}

fn default_verify() -> bool {
    true
}

/// A single fill scenario loaded from a manifest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Human-readable scenario name
    pub name: String,
    /// 2D or 3D target texture
    pub dimension: Dimension,
    /// Texture extent as `[width, height, depth]`
    pub size: [u32; 3],
    /// Value written to every texel, as `[r, g, b, a]`
    pub fill: [f32; 4],
    /// Optional custom WGSL shader replacing the built-in fill shader
    #[serde(default)]
    pub shader: Option<PathBuf>,
    /// Whether to read the texture back and count mismatched texels
    #[serde(default = "default_verify")]
    pub verify: bool,
}

/// Errors produced while loading or validating a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_norway::Error),
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("scenario '{name}' has a zero extent {size:?}")]
    ZeroExtent { name: String, size: [u32; 3] },
    #[error("2D scenario '{name}' must have depth 1, got {depth}")]
    DepthOn2d { name: String, depth: u32 },
}

impl Scenario {
    /// Parses a scenario from YAML text and validates it
    pub fn from_yaml(yaml_content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_norway::from_str(yaml_content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parses a scenario manifest file
    ///
    /// A relative `shader` path is rewritten to be relative to the
    /// directory containing the manifest.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })?;
        let mut scenario = Self::from_yaml(&content)?;

        if let (Some(shader), Some(base_dir)) = (scenario.shader.as_mut(), path.parent()) {
            if shader.is_relative() {
                *shader = base_dir.join(&*shader);
            }
        }

        Ok(scenario)
    }

    /// Checks structural constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }

        if self.size.contains(&0) {
            return Err(ScenarioError::ZeroExtent {
                name: self.name.clone(),
                size: self.size,
            });
        }

        if self.dimension == Dimension::D2 && self.size[2] != 1 {
            return Err(ScenarioError::DepthOn2d {
                name: self.name.clone(),
                depth: self.size[2],
            });
        }

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn depth(&self) -> u32 {
        self.size[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_3d_scenario() {
        let scenario = Scenario::from_yaml(
            r#"
name: volume-16
dimension: 3d
size: [16, 16, 16]
fill: [0.5, 0.25, 0.125, 1.0]
"#,
        )
        .unwrap();

        assert_eq!(scenario.name, "volume-16");
        assert_eq!(scenario.dimension, Dimension::D3);
        assert_eq!((scenario.width(), scenario.height(), scenario.depth()), (16, 16, 16));
        assert_eq!(scenario.fill, [0.5, 0.25, 0.125, 1.0]);
        assert_eq!(scenario.shader, None);
        // verify defaults to on
        assert!(scenario.verify);
    }

    #[test]
    fn test_parse_2d_scenario_with_shader() {
        let scenario = Scenario::from_yaml(
            r#"
name: plane
dimension: 2D
size: [64, 32, 1]
fill: [1.0, 0.0, 0.0, 1.0]
shader: custom.wgsl
verify: false
"#,
        )
        .unwrap();

        assert_eq!(scenario.dimension, Dimension::D2);
        assert_eq!(scenario.shader.as_deref(), Some(Path::new("custom.wgsl")));
        assert!(!scenario.verify);
    }

    #[test]
    fn test_rejects_zero_extent() {
        let err = Scenario::from_yaml("name: a\ndimension: 3d\nsize: [4, 0, 4]\nfill: [0, 0, 0, 0]\n").unwrap_err();
        assert!(matches!(err, ScenarioError::ZeroExtent { size: [4, 0, 4], .. }));
    }

    #[test]
    fn test_rejects_depth_on_2d() {
        let err = Scenario::from_yaml("name: a\ndimension: 2d\nsize: [4, 4, 2]\nfill: [0, 0, 0, 0]\n").unwrap_err();
        assert!(matches!(err, ScenarioError::DepthOn2d { depth: 2, .. }));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = Scenario::from_yaml("name: '  '\ndimension: 2d\nsize: [4, 4, 1]\nfill: [0, 0, 0, 0]\n").unwrap_err();
        assert!(matches!(err, ScenarioError::EmptyName));
    }

    #[test]
    fn test_rejects_unknown_dimension() {
        let err = Scenario::from_yaml("name: a\ndimension: 4d\nsize: [4, 4, 1]\nfill: [0, 0, 0, 0]\n").unwrap_err();
        assert!(matches!(err, ScenarioError::Yaml(_)));
    }

    #[test]
    fn test_from_file_resolves_shader_relative_to_manifest() {
        let dir = std::env::temp_dir().join(format!("texfill-scenario-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let manifest = dir.join("scenario.yaml");
        std::fs::write(&manifest, "name: a\ndimension: 2d\nsize: [4, 4, 1]\nfill: [0, 0, 0, 0]\nshader: shaders/fill.wgsl\n").unwrap();

        let scenario = Scenario::from_file(&manifest).unwrap();
        assert_eq!(scenario.shader, Some(dir.join("shaders/fill.wgsl")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bundled_scenarios_parse() {
        let scenario_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios");
        let mut count = 0;
        for entry in std::fs::read_dir(&scenario_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                let scenario = Scenario::from_file(&path).unwrap();
                if let Some(shader) = &scenario.shader {
                    assert!(shader.exists(), "{}", shader.display());
                }
                count += 1;
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Scenario::from_file("/nonexistent/texfill/scenario.yaml").unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }
}
