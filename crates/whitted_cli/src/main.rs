//! whitted CLI - renders the demo scene to a PPM image.
//!
//! Settings come from an optional JSON config file, then command-line flags
//! override individual values.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use whitted_math::Vec3;
use whitted_renderer::{
    render, write_ppm, Camera, Light, Material, Plane, RenderConfig, Scene, Sphere, SplitAxis,
};

#[derive(Parser)]
#[command(name = "whitted")]
#[command(about = "Whitted-style ray tracer writing PPM images", long_about = None)]
struct Cli {
    /// JSON render config; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Maximum reflection depth
    #[arg(short, long)]
    depth: Option<u32>,
    /// Worker threads (default: one per core)
    #[arg(short, long)]
    threads: Option<usize>,
    /// Output PPM file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// BVH split axis policy
    #[arg(long, value_enum, default_value_t = Split::Longest)]
    split: Split,
    /// Seed for the random split policy
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Split {
    Longest,
    Random,
    FixedX,
    FixedY,
    FixedZ,
}

impl Split {
    fn to_axis(self, seed: u64) -> SplitAxis {
        match self {
            Split::Longest => SplitAxis::Longest,
            Split::Random => SplitAxis::Random { seed },
            Split::FixedX => SplitAxis::Fixed(0),
            Split::FixedY => SplitAxis::Fixed(1),
            Split::FixedZ => SplitAxis::Fixed(2),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Three spheres (red, green, mirror) over a grey floor, lit from the upper right.
fn demo_scene() -> Scene {
    let mut scene = Scene::new(Light::new(Vec3::new(5.0, 5.0, 5.0), 1.2));

    scene.add(Box::new(Sphere::new(
        Vec3::new(-1.0, 0.5, 0.0),
        0.5,
        Material::new(Vec3::new(0.9, 0.2, 0.2), Vec3::splat(0.5), 16.0, 0.2),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(1.0, 0.5, -0.5),
        0.5,
        Material::new(Vec3::new(0.2, 0.9, 0.2), Vec3::splat(0.4), 16.0, 0.0),
    )));
    scene.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, -1.5),
        0.7,
        Material::new(Vec3::splat(0.8), Vec3::ONE, 64.0, 0.6),
    )));
    scene.add(Box::new(Plane::new(
        Vec3::ZERO,
        Vec3::Y,
        Material::new(Vec3::splat(0.75), Vec3::splat(0.2), 8.0, 0.0),
    )));

    scene
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if cli.threads.is_some() {
        config.threads = cli.threads;
    }

    if config.width == 0 || config.height == 0 {
        bail!("Image dimensions must be positive, got {}x{}", config.width, config.height);
    }

    let mut scene = demo_scene();
    scene.build_with(cli.split.to_axis(cli.seed))?;

    let camera = Camera::new(
        Vec3::new(0.0, 1.0, 5.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::Y,
        60.0,
        config.aspect_ratio(),
    );

    let image = render(&camera, &scene, &config)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_ppm(&image, BufWriter::new(file))?;
            log::info!("Wrote {}", path.display());
        }
        None => write_ppm(&image, BufWriter::new(io::stdout().lock()))?,
    }

    Ok(())
}
