//! lumen - render JSON scene files to PNG images.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lumen_math::Color;
use lumen_render::{
    CameraBuilder, CameraConfig, ImageWriter, LightSource, RayTracer, RenderConfig, Scene,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod demos;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Recursive ray tracer for JSON scene files", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene file to a PNG image
    Render {
        /// Path to the scene .json file
        scene: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render one of the built-in demo scenes
    Demo {
        /// Demo name (spheres, mirrors, shadows, glossy, primitives)
        name: String,
        /// Also save the demo scene as JSON
        #[arg(long)]
        save_scene: Option<PathBuf>,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Display information about a scene file
    Info {
        /// Path to the scene .json file
        scene: PathBuf,
    },
}

/// Options shared by every rendering subcommand. Flags override the
/// config file.
#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// TOML render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Image file stem (default: scene name)
    #[arg(long)]
    name: Option<String>,
    /// Horizontal resolution in pixels
    #[arg(long)]
    width: Option<usize>,
    /// Vertical resolution in pixels
    #[arg(long)]
    height: Option<usize>,
    /// Thread mode: -2 auto, -1 rayon, 0 serial, n workers
    #[arg(long, allow_negative_numbers = true)]
    threads: Option<i32>,
    /// Progress log interval in percent (0 disables)
    #[arg(long)]
    progress: Option<f64>,
    /// Trace without the voxel grid
    #[arg(long)]
    no_grid: bool,
    /// Voxels per axis of the acceleration grid
    #[arg(long)]
    grid_resolution: Option<usize>,
    /// Overlay grid lines every N pixels
    #[arg(long)]
    grid_lines: Option<usize>,
}

impl RenderArgs {
    /// Config file (or defaults) with the command-line overrides applied.
    fn config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };
        if let Some(dir) = &self.output {
            config.image.output_dir = dir.clone();
        }
        if let Some(name) = &self.name {
            config.image.name = name.clone();
        }
        if let Some(width) = self.width {
            config.image.width_px = width;
        }
        if let Some(height) = self.height {
            config.image.height_px = height;
        }
        if let Some(threads) = self.threads {
            config.camera.threads = threads;
        }
        if let Some(progress) = self.progress {
            config.camera.progress_interval = progress;
        }
        if self.no_grid {
            config.scene.accelerate = false;
        }
        if let Some(resolution) = self.grid_resolution {
            config.scene.grid_resolution = resolution;
        }
        Ok(config)
    }

    /// Image named after the scene unless a name was given.
    fn name_after(&self, config: &mut RenderConfig, scene: &Scene) {
        if self.name.is_none() && self.config.is_none() && !scene.name.is_empty() {
            config.image.name = scene.name.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Render { scene, render } => {
            render_file(&scene, &render)?;
        }
        Commands::Demo {
            name,
            save_scene,
            render,
        } => {
            render_demo(&name, save_scene.as_deref(), &render)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    use simplelog::LevelFilter::{Debug, Info, Off, Warn};
    let level = if cli.verbose {
        Debug
    } else if cli.quiet {
        Warn
    } else {
        Info
    };
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn render_file(path: &Path, args: &RenderArgs) -> Result<PathBuf> {
    let mut scene =
        lumen_scene::read(path).with_context(|| format!("loading scene {}", path.display()))?;
    let mut config = args.config()?;
    // The scene file carries its own grid resolution; only the flag overrides it.
    match args.grid_resolution {
        Some(resolution) => scene = scene.with_grid_resolution(resolution)?,
        None => config.scene.grid_resolution = scene.grid_resolution(),
    }
    args.name_after(&mut config, &scene);
    render_scene(&mut scene, &config, args.grid_lines)
}

fn render_demo(name: &str, save_scene: Option<&Path>, args: &RenderArgs) -> Result<PathBuf> {
    let (scene, camera) = demos::build(name)?;
    let mut config = args.config()?;
    if args.config.is_none() {
        config.camera = CameraConfig {
            threads: config.camera.threads,
            progress_interval: config.camera.progress_interval,
            ..camera
        };
    }
    let mut scene = scene.with_grid_resolution(config.scene.grid_resolution)?;
    if let Some(path) = save_scene {
        lumen_scene::write(&scene, path)
            .with_context(|| format!("saving scene to {}", path.display()))?;
    }
    args.name_after(&mut config, &scene);
    render_scene(&mut scene, &config, args.grid_lines)
}

/// Render `scene` with `config` and save the image, returning its path.
fn render_scene(scene: &mut Scene, config: &RenderConfig, grid_lines: Option<usize>) -> Result<PathBuf> {
    config.validate().context("invalid render configuration")?;
    if config.scene.accelerate {
        scene.build_grid()?;
    }
    let scene = &*scene;

    let tracer = RayTracer::new(scene).with_options(config.tracer);
    let mut writer = ImageWriter::from_config(&config.image);
    let path = writer.path();
    let mut camera = CameraBuilder::from_config(&config.camera)?
        .image_writer(&mut writer)
        .ray_tracer(&tracer)
        .build()?;
    camera.render_image()?;
    if let Some(interval) = grid_lines {
        camera.print_grid(interval, Color::WHITE);
    }
    camera.write_to_image()?;
    Ok(path)
}

fn show_info(path: &Path) -> Result<()> {
    let mut scene =
        lumen_scene::read(path).with_context(|| format!("loading scene {}", path.display()))?;

    println!("Scene: {}", path.display());
    println!("  Name: {}", scene.name);
    println!("  Background: {:?}", scene.background);
    println!("  Ambient: {:?}", scene.ambient.intensity);

    let leaves = scene.leaves();
    println!("  Geometries: {}", leaves.len());
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    let mut transparent = 0;
    let mut reflective = 0;
    for geometry in &leaves {
        *kinds.entry(geometry.surface.kind_name()).or_default() += 1;
        if !geometry.material.kt.is_zero() {
            transparent += 1;
        }
        if !geometry.material.kr.is_zero() {
            reflective += 1;
        }
    }
    for (kind, count) in &kinds {
        println!("    {kind}: {count}");
    }
    println!("    transparent: {transparent}, reflective: {reflective}");

    println!("  Lights: {}", scene.lights.len());
    for light in &scene.lights {
        let kind = match light {
            LightSource::Directional(_) => "directional",
            LightSource::Point(_) => "point",
            LightSource::Spot(_) => "spot",
        };
        println!("    {kind}");
    }

    let grid = scene.build_grid()?;
    println!("  Grid resolution: {}", grid.resolution());
    match grid.bounds() {
        Some(bounds) => println!("  Grid bounds: {:?} .. {:?}", bounds.min, bounds.max),
        None => println!("  Grid bounds: none"),
    }
    println!("  Unbounded geometries: {}", grid.unbounded().len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_render::Threads;

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "lumen", "-v", "render", "scene.json", "-o", "out", "--width", "64", "--threads", "-1",
            "--no-grid", "--grid-lines", "8",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Render { scene, render } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(scene, PathBuf::from("scene.json"));
        assert_eq!(render.grid_lines, Some(8));

        let config = render.config().unwrap();
        assert_eq!(config.image.output_dir, PathBuf::from("out"));
        assert_eq!(config.image.width_px, 64);
        assert_eq!(config.image.height_px, 500);
        assert_eq!(Threads::from_code(config.camera.threads).unwrap(), Threads::Stream);
        assert!(!config.scene.accelerate);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["lumen", "-v", "-q", "info", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["lumen", "render"]).is_err());
    }

    #[test]
    fn test_config_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(
            &path,
            r#"
                [camera]
                location = [0.0, 0.0, 50.0]
                width = 20.0
                threads = 0

                [tracer]
                max_level = 3

                [image]
                name = "from-file"
                width_px = 32
            "#,
        )
        .unwrap();

        let args = RenderArgs {
            config: Some(path),
            height: Some(16),
            ..Default::default()
        };
        let config = args.config().unwrap();
        assert_eq!(config.camera.width, 20.0);
        assert_eq!(config.camera.height, 200.0);
        assert_eq!(config.camera.threads, 0);
        assert_eq!(config.tracer.max_level, 3);
        assert_eq!(config.tracer.min_k, 1e-3);
        assert_eq!(config.image.name, "from-file");
        assert_eq!((config.image.width_px, config.image.height_px), (32, 16));
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[tracer]\nmax_level = \"deep\"\n").unwrap();
        assert!(load_config(&path).is_err());
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_demo_renders_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("spheres.json");
        let args = RenderArgs {
            output: Some(dir.path().to_path_buf()),
            width: Some(24),
            height: Some(24),
            threads: Some(0),
            grid_lines: Some(6),
            ..Default::default()
        };

        let image = render_demo("spheres", Some(&saved), &args).unwrap();
        assert_eq!(image, dir.path().join("spheres.png"));
        assert!(image.exists());

        let named = RenderArgs {
            name: Some("again".into()),
            grid_resolution: Some(4),
            ..args
        };
        let image = render_file(&saved, &named).unwrap();
        assert_eq!(image, dir.path().join("again.png"));
        assert!(image.exists());
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = RenderArgs {
            output: Some(dir.path().to_path_buf()),
            width: Some(0),
            ..Default::default()
        };
        assert!(render_demo("spheres", None, &args).is_err());

        let args = RenderArgs {
            grid_resolution: Some(0),
            ..Default::default()
        };
        assert!(render_demo("spheres", None, &args).is_err());
    }
}
