//! wgpu error scopes around resource creation
//!
//! wgpu reports allocation and validation failures asynchronously. Wrapping
//! creation calls in a pair of scopes turns them into a value the caller can
//! propagate.

/// Pushes an OutOfMemory scope and then a Validation scope
pub fn push_error_scopes(device: &wgpu::Device) {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
}

/// Pops the scopes pushed by [`push_error_scopes`], blocking on the result
///
/// Returns the validation error if there was one, otherwise the
/// out-of-memory error.
pub fn pop_error_scopes(device: &wgpu::Device) -> Option<wgpu::Error> {
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());

    validation.or(out_of_memory)
}
