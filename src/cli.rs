use std::{num::NonZeroU32, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use indicatif::ProgressBar;
use minitrace::{Projection, RenderSettings, config::SceneDescription, render};

/// Render a scene of spheres, parallelograms and a triangle mesh with mirror reflections and hard shadows
#[derive(Parser, Debug)]
#[command(name = "minitrace-cli", version)]
struct Args {
    /// JSON scene description, the built-in demo scene is used when missing
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Triangle mesh (.off or .obj) to add to the scene, replaces the mesh from the description
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Output image, format is given by the extension
    #[arg(short, long, default_value = "raytrace.png")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Use parallel rays instead of a perspective projection
    #[arg(long)]
    orthographic: bool,

    /// Maximal number of mirror reflections followed per primary ray
    #[arg(long)]
    max_bounce: Option<u32>,

    #[arg(long, default_value = "64")]
    tile_size: NonZeroU32,

    /// Log statistics and structure of the mesh BVH
    #[arg(long)]
    print_bvh: bool,

    /// Print the effective scene description as JSON and exit
    #[arg(long)]
    dump_scene: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut description = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Loading scene description {}", path.display()))?,
        None => SceneDescription::default(),
    };

    if let Some(mesh) = args.mesh {
        description.mesh = Some(mesh);
    }
    if let Some(width) = args.width {
        description.camera.width = width;
    }
    if let Some(height) = args.height {
        description.camera.height = height;
    }
    if args.orthographic {
        description.camera.projection = Projection::Orthographic;
    }
    if let Some(max_bounce) = args.max_bounce {
        description.max_bounce = max_bounce;
    }

    if args.dump_scene {
        println!("{}", description.to_json()?);
        return Ok(());
    }

    let scene = description.build_scene().context("Building scene")?;
    let camera = description.build_camera()?;
    let settings = RenderSettings {
        tile_size: args.tile_size,
        ..description.render_settings()
    };

    if args.print_bvh {
        scene.mesh().print_statistics();
        scene.mesh().print_tree();
    }

    let bar = ProgressBar::no_length();
    let (image, _stats) = render(&scene, &camera, &settings, |_, progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.finished as u64);
    });
    bar.finish();

    image
        .save(&args.output)
        .with_context(|| format!("Saving {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
