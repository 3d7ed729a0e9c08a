//! Constant-value fill pipeline
//!
//! This module contains the compute pipeline that writes one value into every
//! texel of a storage texture, together with the bind group layout and bind
//! group that connect it to a concrete target.

use crate::error_scope::{pop_error_scopes, push_error_scopes};
use crate::texture::FILL_TARGET_FORMAT;
use crate::{Error, Float4, GpuContext};
use std::borrow::Cow;
use wgpu::util::DeviceExt;

/// Binding of the uniform holding the fill value
const PARAMS_BINDING: u32 = 0;
/// Binding of the write-only storage texture
const OUTPUT_BINDING: u32 = 1;

/// Dimensionality of the texture a fill pipeline writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillDimension {
    D2,
    D3,
}

impl FillDimension {
    pub fn texture_dimension(self) -> wgpu::TextureDimension {
        match self {
            FillDimension::D2 => wgpu::TextureDimension::D2,
            FillDimension::D3 => wgpu::TextureDimension::D3,
        }
    }

    pub fn view_dimension(self) -> wgpu::TextureViewDimension {
        match self {
            FillDimension::D2 => wgpu::TextureViewDimension::D2,
            FillDimension::D3 => wgpu::TextureViewDimension::D3,
        }
    }
}

/// WGSL source and entry point metadata for a fill shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillShader {
    pub label: Cow<'static, str>,
    pub source: Cow<'static, str>,
    pub entry_point: Cow<'static, str>,
    /// Workgroup size declared by `entry_point`, used to size the dispatch
    pub workgroup_size: [u32; 3],
}

impl FillShader {
    /// The shader shipped with this crate for the given dimension
    pub fn builtin(dimension: FillDimension) -> Self {
        match dimension {
            FillDimension::D2 => Self {
                label: Cow::Borrowed("fill_2d"),
                source: Cow::Borrowed(include_str!("../shaders/fill_2d.wgsl")),
                entry_point: Cow::Borrowed("main"),
                workgroup_size: [8, 8, 1],
            },
            FillDimension::D3 => Self {
                label: Cow::Borrowed("fill_3d"),
                source: Cow::Borrowed(include_str!("../shaders/fill_3d.wgsl")),
                entry_point: Cow::Borrowed("main"),
                workgroup_size: [4, 4, 4],
            },
        }
    }
}

/// A fill pipeline bound to a target texture and value, ready to record
#[derive(Debug)]
pub struct BoundFill {
    bind_group: wgpu::BindGroup,
    /// Kept alive for as long as the bind group references it
    _params_buffer: wgpu::Buffer,
    workgroups: [u32; 3],
}

impl BoundFill {
    /// Number of workgroups dispatched per axis
    pub fn workgroups(&self) -> [u32; 3] {
        self.workgroups
    }
}

/// Compute pipeline, bind group layout and shader for one fill dimension
#[derive(Debug)]
pub struct FillPipeline {
    dimension: FillDimension,
    label: Cow<'static, str>,
    workgroup_size: [u32; 3],
    bind_group_layout: wgpu::BindGroupLayout,
    compute_pipeline: wgpu::ComputePipeline,
}

impl FillPipeline {
    /// Creates the shader module, resource layout and compute pipeline
    ///
    /// # Arguments
    /// * `device` - The wgpu device for resource creation
    /// * `dimension` - Dimensionality of the textures this pipeline writes
    /// * `shader` - Fill shader; its bindings must follow the built-in layout
    ///   (uniform `vec4<f32>` at binding 0, storage texture at binding 1)
    pub fn new(device: &wgpu::Device, dimension: FillDimension, shader: &FillShader) -> Result<Self, Error> {
        if shader.workgroup_size.contains(&0) {
            return Err(Error::InvalidWorkgroupSize(shader.workgroup_size));
        }

        push_error_scopes(device);

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&shader.label),
            source: wgpu::ShaderSource::Wgsl(shader.source.clone()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&shader.label),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: PARAMS_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Float4>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: OUTPUT_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: FILL_TARGET_FORMAT,
                        view_dimension: dimension.view_dimension(),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&shader.label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(&shader.label),
            layout: Some(&pipeline_layout),
            module: &shader_module,
            entry_point: Some(&shader.entry_point),
            compilation_options: Default::default(),
            cache: None,
        });

        if let Some(source) = pop_error_scopes(device) {
            return Err(Error::Gpu {
                operation: "fill pipeline creation",
                source,
            });
        }

        tracing::debug!(shader = %shader.label, ?dimension, workgroup_size = ?shader.workgroup_size, "created fill pipeline");

        Ok(Self {
            dimension,
            label: shader.label.clone(),
            workgroup_size: shader.workgroup_size,
            bind_group_layout,
            compute_pipeline,
        })
    }

    /// Creates a pipeline from the built-in shader for `dimension`
    pub fn builtin(device: &wgpu::Device, dimension: FillDimension) -> Result<Self, Error> {
        Self::new(device, dimension, &FillShader::builtin(dimension))
    }

    pub fn dimension(&self) -> FillDimension {
        self.dimension
    }

    /// Binds a target texture and fill value to this pipeline
    pub fn bind(&self, device: &wgpu::Device, texture: &wgpu::Texture, value: Float4) -> Result<BoundFill, Error> {
        if texture.dimension() != self.dimension.texture_dimension() {
            return Err(Error::DimensionMismatch {
                pipeline: self.dimension,
                texture: texture.dimension(),
            });
        }
        if texture.format() != FILL_TARGET_FORMAT {
            return Err(Error::UnsupportedFormat(texture.format()));
        }
        if !texture.usage().contains(wgpu::TextureUsages::STORAGE_BINDING) {
            return Err(Error::MissingUsage(wgpu::TextureUsages::STORAGE_BINDING));
        }

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fill Params"),
            contents: bytemuck::bytes_of(&value),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Fill Target View"),
            dimension: Some(self.dimension.view_dimension()),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&self.label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: PARAMS_BINDING,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: OUTPUT_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
            ],
        });

        let extent = [texture.width(), texture.height(), texture.depth_or_array_layers()];
        let workgroups = workgroup_count(extent, self.workgroup_size);

        Ok(BoundFill {
            bind_group,
            _params_buffer: params_buffer,
            workgroups,
        })
    }

    /// Records the fill dispatch into `encoder`
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, bound: &BoundFill) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(&self.label),
            timestamp_writes: None,
        });

        compute_pass.set_pipeline(&self.compute_pipeline);
        compute_pass.set_bind_group(0, &bound.bind_group, &[]);

        let [x, y, z] = bound.workgroups;
        compute_pass.dispatch_workgroups(x, y, z);
    }
}

/// Workgroups needed to cover `extent` with groups of `workgroup_size`
fn workgroup_count(extent: [u32; 3], workgroup_size: [u32; 3]) -> [u32; 3] {
    [
        extent[0].div_ceil(workgroup_size[0]),
        extent[1].div_ceil(workgroup_size[1]),
        extent[2].div_ceil(workgroup_size[2]),
    ]
}

/// Fills every texel of `texture` with `value` and waits for completion
pub fn fill_texture(context: &GpuContext, pipeline: &FillPipeline, texture: &wgpu::Texture, value: Float4) -> Result<(), Error> {
    let bound = pipeline.bind(&context.device, texture, value)?;
    tracing::debug!(workgroups = ?bound.workgroups(), %value, "dispatching fill");

    let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Fill Encoder") });
    pipeline.record(&mut encoder, &bound);
    context.queue.submit(std::iter::once(encoder.finish()));

    context.wait_idle()
}
