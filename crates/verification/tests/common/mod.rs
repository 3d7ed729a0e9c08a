use texfill::{Backend, Error, FillDimension, Float4, GpuContext};

/// Opens a device, or returns `None` when the machine has no usable adapter
pub fn try_context() -> Option<GpuContext> {
    match GpuContext::new_blocking(Backend::Auto) {
        Ok(context) => Some(context),
        Err(e @ (Error::AdapterUnavailable { .. } | Error::ComputeUnsupported { .. } | Error::DeviceUnavailable(_))) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
        Err(e) => panic!("unexpected error opening device: {e}"),
    }
}

/// Creates a fill target and uploads `slice_value(d)` into every texel of slice `d`
pub fn uploaded_texture(context: &GpuContext, dimension: FillDimension, width: u32, height: u32, depth: u32, slice_value: impl Fn(u32) -> Float4) -> wgpu::Texture {
    let texture = texfill::create_fill_target(&context.device, dimension, width, height, depth).expect("create fill target");
    for depth_slice in 0..depth {
        let texels = vec![slice_value(depth_slice); width as usize * height as usize];
        texfill::write_texture_slice(&context.queue, &texture, depth_slice, &texels).expect("write slice");
    }
    texture
}
