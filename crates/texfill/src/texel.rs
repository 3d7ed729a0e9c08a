//! Texel value type for `Rgba32Float` textures

use std::fmt;

/// One `Rgba32Float` texel
///
/// Layout matches both the texture's texel layout and a WGSL `vec4<f32>`
/// uniform, so the same value can be uploaded as the fill parameter and
/// compared against mapped readback memory.
///
/// Equality is bitwise per channel: two texels are equal only when every
/// channel has the same `f32` bit pattern. A NaN fill compares equal to
/// itself and `0.0` differs from `-0.0`.
#[repr(C)]
#[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Float4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Float4 {
    pub const ZERO: Self = Self::splat(0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same value in all four channels
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn to_bits(self) -> [u32; 4] {
        [self.r.to_bits(), self.g.to_bits(), self.b.to_bits(), self.a.to_bits()]
    }
}

impl From<[f32; 4]> for Float4 {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Float4> for [f32; 4] {
    fn from(value: Float4) -> Self {
        value.to_array()
    }
}

impl PartialEq for Float4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Float4 {}

impl std::hash::Hash for Float4 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl fmt::Debug for Float4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Float4({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Float4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl std::str::FromStr for Float4 {
    type Err = String;

    /// Parses `"r,g,b,a"` or a single value applied to all channels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f32>().map_err(|e| format!("invalid channel '{}': {e}", part.trim())))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [value] => Ok(Self::splat(*value)),
            [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
            _ => Err(format!("expected 1 or 4 comma-separated channels, got {}", parts.len())),
        }
    }
}
