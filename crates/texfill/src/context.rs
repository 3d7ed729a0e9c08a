//! GPU device setup
//!
//! Opens a wgpu adapter and device for a selectable backend. Only compute
//! capability is required; no surface is ever created.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Graphics backend to open the device on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Let wgpu pick among every backend compiled in
    #[default]
    Auto,
    Vulkan,
    Metal,
    Dx12,
    Gl,
}

impl Backend {
    pub const ALL: [Backend; 5] = [Backend::Auto, Backend::Vulkan, Backend::Metal, Backend::Dx12, Backend::Gl];

    pub fn backends(self) -> wgpu::Backends {
        match self {
            Backend::Auto => wgpu::Backends::all(),
            Backend::Vulkan => wgpu::Backends::VULKAN,
            Backend::Metal => wgpu::Backends::METAL,
            Backend::Dx12 => wgpu::Backends::DX12,
            Backend::Gl => wgpu::Backends::GL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Vulkan => "vulkan",
            Backend::Metal => "metal",
            Backend::Dx12 => "dx12",
            Backend::Gl => "gl",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "vulkan" | "vk" => Ok(Backend::Vulkan),
            "metal" | "mtl" => Ok(Backend::Metal),
            "dx12" | "d3d12" => Ok(Backend::Dx12),
            "gl" | "opengl" | "gles" => Ok(Backend::Gl),
            _ => Err(format!("Invalid backend '{s}'. Valid backends: auto, vulkan, metal, dx12, gl")),
        }
    }
}

/// An open wgpu device and its queue
#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Opens a compute-capable device on the requested backend
    pub async fn new(backend: Backend) -> Result<Self, Error> {
        let backends = backend.backends();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|source| Error::AdapterUnavailable { backends, source })?;

        let adapter_info = adapter.get_info();
        if !adapter.get_downlevel_capabilities().flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
            return Err(Error::ComputeUnsupported { adapter: adapter_info.name });
        }

        // Downlevel defaults, with the adapter's own texture size limits
        let adapter_limits = adapter.limits();
        let required_limits = wgpu::Limits {
            max_texture_dimension_2d: adapter_limits.max_texture_dimension_2d,
            max_texture_dimension_3d: adapter_limits.max_texture_dimension_3d,
            ..wgpu::Limits::downlevel_defaults()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("texfill device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: Default::default(),
            })
            .await?;

        tracing::info!(adapter = %adapter_info.name, backend = ?adapter_info.backend, "opened GPU device");

        Ok(Self { device, queue, adapter_info })
    }

    /// Blocking variant of [`GpuContext::new`]
    pub fn new_blocking(backend: Backend) -> Result<Self, Error> {
        pollster::block_on(Self::new(backend))
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Blocks until all submitted work has completed
    pub fn wait_idle(&self) -> Result<(), Error> {
        self.device.poll(wgpu::PollType::Wait)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_masks() {
        assert_eq!(Backend::Vulkan.backends(), wgpu::Backends::VULKAN);
        assert_eq!(Backend::Gl.backends(), wgpu::Backends::GL);
        assert!(Backend::Auto.backends().contains(wgpu::Backends::VULKAN | wgpu::Backends::METAL | wgpu::Backends::DX12));
    }

    #[test]
    fn test_backend_round_trips_through_name() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_backend_aliases() {
        assert_eq!("VK".parse::<Backend>().unwrap(), Backend::Vulkan);
        assert_eq!("d3d12".parse::<Backend>().unwrap(), Backend::Dx12);
        assert_eq!("OpenGL".parse::<Backend>().unwrap(), Backend::Gl);
        assert!("glide".parse::<Backend>().is_err());
    }
}
