//! Fill target creation and host uploads

use crate::error_scope::{pop_error_scopes, push_error_scopes};
use crate::{Error, FillDimension, Float4};

/// Texel format of every fill target
pub const FILL_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Usage flags for fill targets
///
/// Storage for the compute write, copy source for readback, copy destination
/// for host uploads.
pub const FILL_TARGET_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::STORAGE_BINDING
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::COPY_SRC)
    .union(wgpu::TextureUsages::COPY_DST);

/// Creates an `Rgba32Float` texture that a fill pipeline can write
///
/// # Arguments
/// * `device` - The wgpu device to create the texture on
/// * `dimension` - 2D or 3D
/// * `width`, `height`, `depth` - Extent; `depth` must be 1 for 2D targets
pub fn create_fill_target(device: &wgpu::Device, dimension: FillDimension, width: u32, height: u32, depth: u32) -> Result<wgpu::Texture, Error> {
    if width == 0 || height == 0 || depth == 0 {
        return Err(Error::EmptyExtent { width, height, depth });
    }
    if dimension == FillDimension::D2 && depth != 1 {
        return Err(Error::DepthOn2d { depth });
    }

    tracing::debug!(?dimension, width, height, depth, "creating fill target");

    let label = format!("Fill Target {width}x{height}x{depth}");
    push_error_scopes(device);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: depth,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: dimension.texture_dimension(),
        format: FILL_TARGET_FORMAT,
        usage: FILL_TARGET_USAGE,
        view_formats: &[],
    });
    if let Some(source) = pop_error_scopes(device) {
        return Err(Error::Gpu {
            operation: "fill target creation",
            source,
        });
    }

    Ok(texture)
}

/// Uploads one depth slice of host texels into a texture
///
/// `texels` is row-major and must hold exactly `width * height` values.
pub fn write_texture_slice(queue: &wgpu::Queue, texture: &wgpu::Texture, depth_slice: u32, texels: &[Float4]) -> Result<(), Error> {
    if texture.format() != FILL_TARGET_FORMAT {
        return Err(Error::UnsupportedFormat(texture.format()));
    }
    if !texture.usage().contains(wgpu::TextureUsages::COPY_DST) {
        return Err(Error::MissingUsage(wgpu::TextureUsages::COPY_DST));
    }

    let depth = texture.depth_or_array_layers();
    if depth_slice >= depth {
        return Err(Error::DepthSliceOutOfRange { depth_slice, depth });
    }

    let (width, height) = (texture.width(), texture.height());
    let expected = width as usize * height as usize;
    if texels.len() != expected {
        return Err(Error::TexelCountMismatch { expected, actual: texels.len() });
    }

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: 0, y: 0, z: depth_slice },
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(texels),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * std::mem::size_of::<Float4>() as u32),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    Ok(())
}
