use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use sphere_tracer::consts::OUT_FILE;
use sphere_tracer::scene::Scene;

/// Renders a scene of spheres to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description; the built-in demo scene is used when omitted
    scene: Option<PathBuf>,

    /// Where to write the rendered image
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Canvas width in pixels
    #[clap(long)]
    width: Option<usize>,

    /// Canvas height in pixels
    #[clap(long)]
    height: Option<usize>,

    /// Maximum number of reflection bounces
    #[clap(long)]
    depth: Option<u32>,

    /// Side of the supersampling grid per pixel
    #[clap(long)]
    samples: Option<usize>,

    /// Seed for jittered supersampling
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("could not load scene {}", path.display()))?,
        None => {
            info!("No scene given, rendering the demo scene.");
            Scene::demo()
        },
    };

    if let Some(width) = args.width {
        scene.canvas_width = width;
    }
    if let Some(height) = args.height {
        scene.canvas_height = height;
    }
    if let Some(depth) = args.depth {
        scene.camera.recursion_depth = depth;
    }
    if let Some(samples) = args.samples {
        scene.camera.samples = samples;
    }
    if args.seed.is_some() {
        scene.camera.seed = args.seed;
    }

    scene.check_canvas()?;
    if scene.camera.samples == 0 {
        anyhow::bail!("samples must be at least 1");
    }

    let canvas = scene.render();
    canvas.save(&args.output)
        .with_context(|| format!("could not write {}", args.output.display()))?;

    info!("Wrote {}.", args.output.display());
    Ok(())
}
