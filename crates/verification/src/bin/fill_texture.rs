//! Texture fill binary
//!
//! Fills a 2D or 3D `Rgba32Float` texture with a constant value using a
//! compute shader, then reads every slice back and counts texels that do not
//! hold the value.
//!
//! # Usage
//! ```bash
//! fill_texture --dimension 3d --width 16 --height 16 --depth 16 --value 0.5,0.5,0.5,1 --backend vulkan
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use texfill::{Backend, FillDimension, Float4, GpuContext};
use texfill_verification::harness::{self, FillRequest};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DimensionArg {
    #[value(name = "2d")]
    D2,
    #[value(name = "3d")]
    D3,
}

impl From<DimensionArg> for FillDimension {
    fn from(dimension: DimensionArg) -> Self {
        match dimension {
            DimensionArg::D2 => FillDimension::D2,
            DimensionArg::D3 => FillDimension::D3,
        }
    }
}

/// Command-line arguments for the texture fill tool
#[derive(Parser)]
#[command(version, about = "Fill a texture from a compute shader and verify the result")]
struct Args {
    /// Graphics backend (auto, vulkan, metal, dx12, gl)
    #[arg(long, short, default_value = "auto")]
    backend: Backend,

    /// Texture dimensionality
    #[arg(long, value_enum, default_value = "3d")]
    dimension: DimensionArg,

    #[arg(long, default_value_t = 16)]
    width: u32,

    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Depth of a 3D texture (default 16); a 2D texture only accepts 1
    #[arg(long)]
    depth: Option<u32>,

    /// Fill value as "r,g,b,a" or a single value for all channels
    #[arg(long, short, default_value = "0.5,0.5,0.5,1.0")]
    value: Float4,

    /// Custom WGSL fill shader (uniform vec4<f32> at binding 0, storage texture at binding 1)
    #[arg(long, short)]
    shader: Option<PathBuf>,

    /// Skip reading the texture back
    #[arg(long)]
    no_verify: bool,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dimension = FillDimension::from(args.dimension);
    let depth = harness::resolve_depth(dimension, args.depth)?;
    let shader = args.shader.as_deref().map(harness::load_fill_shader).transpose()?;

    let request = FillRequest {
        dimension,
        width: args.width,
        height: args.height,
        depth,
        value: args.value,
        shader,
        verify: !args.no_verify,
    };

    println!("Initializing GPU ({})...", args.backend);
    let context = GpuContext::new_blocking(args.backend)?;
    let info = context.adapter_info();
    println!("Using {} ({:?})", info.name, info.backend);

    println!("Filling {:?} texture {}x{}x{} with {}", dimension, request.width, request.height, request.depth, request.value);
    let outcome = harness::run(&context, &request)?;

    if !outcome.verified() {
        println!("Fill completed in {:.2?} (verification skipped)", outcome.fill_duration);
        return Ok(());
    }

    for slice in outcome.slices.iter().filter(|slice| !slice.is_match()) {
        eprintln!("✗ Slice {}: {} of {} texels mismatched", slice.depth_slice, slice.mismatches, slice.texel_count);
    }

    let total = outcome.total_mismatches();
    if total == 0 {
        println!(
            "✓ All {} slices match (fill: {:.2?}, verify: {:.2?})",
            outcome.slices.len(),
            outcome.fill_duration,
            outcome.verify_duration
        );
        Ok(())
    } else {
        Err(format!("{total} mismatched texels").into())
    }
}
