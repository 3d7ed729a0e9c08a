//! Staging readback of single texture slices
//!
//! A [`StagingSlice`] is the host-readable copy of one depth slice: a
//! `MAP_READ` buffer holding one or more `(width, height)` images with padded
//! rows. Mapping it yields a [`MappedSlice`] guard over the requested image
//! that unmaps the buffer when it goes out of scope, whichever way the caller
//! leaves.

use crate::VerifyError;
use crate::compare::SliceLayout;
use std::ops::Deref;

/// Texture region copied to read back one depth slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SliceCopy {
    /// First layer or depth slice of the copy
    origin_z: u32,
    /// Number of images copied; the requested slice is the last one
    images: u32,
}

impl SliceCopy {
    /// Volumes are copied from `z = 0` through the requested slice. The GL
    /// backend reads zeros for 3D copies starting at a nonzero depth, so
    /// only array layers are addressed directly.
    fn for_slice(dimension: wgpu::TextureDimension, depth_slice: u32) -> Self {
        match dimension {
            wgpu::TextureDimension::D3 => Self {
                origin_z: 0,
                images: depth_slice + 1,
            },
            wgpu::TextureDimension::D1 | wgpu::TextureDimension::D2 => Self {
                origin_z: depth_slice,
                images: 1,
            },
        }
    }
}

/// Host-readable copy of one depth slice
#[derive(Debug)]
pub(crate) struct StagingSlice {
    buffer: wgpu::Buffer,
    layout: SliceLayout,
    /// Byte offset of the requested slice within `buffer`
    image_offset: u64,
}

impl StagingSlice {
    /// Allocates a staging buffer and copies `depth_slice` of `source` into it
    ///
    /// The copy is submitted but not waited on.
    pub(crate) fn copy_from(device: &wgpu::Device, queue: &wgpu::Queue, source: &wgpu::Texture, depth_slice: u32) -> Result<Self, VerifyError> {
        let layout = SliceLayout::new(source.width(), source.height());
        let copy = SliceCopy::for_slice(source.dimension(), depth_slice);
        // Padded rows keep every image offset a multiple of the row alignment
        let image_offset = layout.size() * (copy.images - 1) as u64;

        texfill::push_error_scopes(device);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Slice"),
            size: layout.size() * copy.images as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Staging Copy Encoder") });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: source,
                mip_level: 0,
                origin: wgpu::Origin3d { x: 0, y: 0, z: copy.origin_z },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(layout.padded_bytes_per_row),
                    rows_per_image: Some(layout.height),
                },
            },
            wgpu::Extent3d {
                width: layout.width,
                height: layout.height,
                depth_or_array_layers: copy.images,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        if let Some(source) = texfill::pop_error_scopes(device) {
            return Err(VerifyError::Gpu {
                operation: "staging copy",
                source,
            });
        }

        Ok(Self { buffer, layout, image_offset })
    }

    pub(crate) fn layout(&self) -> SliceLayout {
        self.layout
    }

    /// Maps the requested slice for reading and blocks until it is available
    pub(crate) fn map(&self, device: &wgpu::Device) -> Result<MappedSlice<'_>, VerifyError> {
        let buffer_slice = self.buffer.slice(self.image_offset..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only disappears if the caller already bailed out
            let _ = sender.send(result);
        });

        device.poll(wgpu::PollType::Wait)?;
        pollster::block_on(receiver.receive()).ok_or(VerifyError::MapCallbackDropped)??;

        Ok(MappedSlice {
            buffer: &self.buffer,
            view: Some(buffer_slice.get_mapped_range()),
        })
    }
}

/// Read-only view of a mapped [`StagingSlice`]
///
/// Dropping the guard releases the view and unmaps the buffer.
pub(crate) struct MappedSlice<'a> {
    buffer: &'a wgpu::Buffer,
    view: Option<wgpu::BufferView<'a>>,
}

impl Deref for MappedSlice<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.view.as_deref().unwrap_or_default()
    }
}

impl Drop for MappedSlice<'_> {
    fn drop(&mut self) {
        // wgpu requires every view to be gone before unmap
        drop(self.view.take());
        self.buffer.unmap();
    }
}
