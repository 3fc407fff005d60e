use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use glint_renderer::{render_cancellable, Camera, CameraConfig, Hittable, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

mod scenes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneChoice {
    Cornell,
    Spheres,
}

#[derive(Parser, Debug)]
#[clap(about = "Monte Carlo path tracer with light importance sampling")]
struct Args {
    /// Built-in scene to render
    #[clap(long, value_enum, default_value = "cornell")]
    scene: SceneChoice,

    /// Image width in pixels
    #[clap(short = 'w', long)]
    width: Option<u32>,

    /// Samples per pixel
    #[clap(short = 's', long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[clap(short = 'd', long)]
    depth: Option<u32>,

    /// Base seed for the per-pixel random streams
    #[clap(long)]
    seed: Option<u64>,

    /// Wrap the scene in a bounding volume hierarchy
    #[clap(long, action)]
    bvh: bool,

    /// Camera settings as JSON; unspecified fields keep the scene's values
    #[clap(long)]
    config: Option<PathBuf>,

    /// Output image (.ppm, .png or .jpg)
    #[clap(short = 'o', long, default_value = "render.ppm")]
    output: PathBuf,
}

/// Overlay the fields present in a JSON object onto `base`.
fn apply_json_overrides(base: &CameraConfig, json: &str) -> Result<CameraConfig> {
    let overrides: serde_json::Value = serde_json::from_str(json).context("invalid camera JSON")?;
    let serde_json::Value::Object(fields) = overrides else {
        bail!("camera JSON must be an object");
    };

    let mut merged = serde_json::to_value(base)?;
    if let serde_json::Value::Object(target) = &mut merged {
        target.extend(fields);
    }
    serde_json::from_value(merged).context("invalid camera settings")
}

fn camera_config(args: &Args, scene_default: &CameraConfig) -> Result<CameraConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            apply_json_overrides(scene_default, &json)?
        }
        None => scene_default.clone(),
    };

    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    Ok(config)
}

/// Write a plain-text PPM (P3).
fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    Ok(())
}

fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(image, &mut writer)?;
        writer.flush()?;
    } else {
        image::save_buffer(
            path,
            &image.to_rgb8(),
            image.width,
            image.height,
            image::ColorType::Rgb8,
        )
        .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let start = Instant::now();
    let scene = match args.scene {
        SceneChoice::Cornell => scenes::cornell_box(),
        SceneChoice::Spheres => scenes::spheres(),
    };
    let world: Box<dyn Hittable> = if args.bvh {
        Box::new(scene.world_bvh())
    } else {
        Box::new(scene.world.clone())
    };
    log::info!("Scene {:?} built in {:?} ({} objects)", args.scene, start.elapsed(), scene.world.len());

    let config = camera_config(&args, &scene.camera)?;
    let camera = Camera::new(&config).context("invalid camera configuration")?;

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_cancel = Arc::clone(&cancel);
    ctrlc::set_handler(move || handler_cancel.store(true, Ordering::Relaxed))
        .context("failed to install Ctrl-C handler")?;

    let lights: Option<&dyn Hittable> = if scene.lights.is_empty() {
        None
    } else {
        Some(&scene.lights)
    };

    let Some(image) = render_cancellable(&camera, world.as_ref(), lights, &cancel) else {
        bail!("render cancelled");
    };

    save_image(&image, &args.output)?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
