use std::fs;
use std::path::{ Path, PathBuf };

use anyhow::Context;
use clap::Parser;
use log::{ debug, info };

use csg_tracer::canvas::Canvas;
use csg_tracer::color::Color;
use csg_tracer::error::TracerError;
use csg_tracer::life::Life3D;
use csg_tracer::light::LightSource;
use csg_tracer::scene::Scene;
use csg_tracer::scenefile::SceneFile;
use csg_tracer::solid::Solid;
use csg_tracer::vector::Vector;

/// Renders a 3D Game of Life as ray-traced spheres, one PPM frame per
/// generation; or renders a JSON scene description once.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// Grid size (the cell array is size x size x size)
    #[clap(short, long, default_value_t = 6)]
    size: usize,

    /// Number of generations to render before stopping
    #[clap(short, long, default_value_t = 20)]
    gens: usize,

    /// Proportion of cells seeded alive, 0.0-1.0
    #[clap(short = 'i', long, default_value_t = 0.5)]
    filling: f64,

    /// Image size in pixels (frames are square)
    #[clap(short, long, default_value_t = 256)]
    pixels: usize,

    /// Anti-aliasing quality, 1-4
    #[clap(short, long, default_value_t = 1)]
    quality: usize,

    /// Zoom factor for the projection; the more cells in the grid, the
    /// smaller the zoom needs to be to see them all
    #[clap(short, long, default_value_t = 1.0)]
    zoom: f64,

    /// Directory the frame-NNNN.ppm files are written to
    #[clap(short, long, default_value = "frames")]
    out: PathBuf,

    /// Render this JSON scene description instead of the Life demo
    #[clap(long)]
    scene: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.quality < 1 || args.quality > 4 {
        anyhow::bail!("'quality' argument must be in range 1-4");
    }

    if args.filling < 0.0 || args.filling >= 1.0 {
        anyhow::bail!("'filling' argument must be in range 0.0-1.0");
    }

    match &args.scene {
        Some(path) => render_scene_file(path),
        None => run_life(&args),
    }
}

/// Loads a scene description and renders it to a PPM alongside the file.
fn render_scene_file(path: &Path) -> anyhow::Result<()> {
    let description = SceneFile::load(path)
        .with_context(|| format!("loading scene {}", path.display()))?;

    let (width, height) = (description.width, description.height);
    let (zoom, quality) = (description.zoom, description.quality);
    let scene = description.into_scene()?;

    let mut canvas = Canvas::new(width, height);
    scene.render(&mut canvas, width, height, zoom, quality)?;

    let out = path.with_extension("ppm");
    canvas.save(&out)
        .with_context(|| format!("saving {}", out.display()))?;
    info!("saved render to {}", out.display());

    Ok(())
}

/// Runs the cellular automaton, rendering one frame per generation and
/// reseeding the grid whenever the population dies out.
fn run_life(args: &Args) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let mut rng = rand::thread_rng();
    let mut life = Life3D::new(args.size, args.filling);
    life.seed(&mut rng);

    for frame in 0..args.gens {
        debug!("generation {}", frame);

        let scene = build_life_scene(&life)?;
        let mut canvas = Canvas::new(args.pixels, args.pixels);
        scene.render(
            &mut canvas, args.pixels, args.pixels, args.zoom, args.quality)?;

        let path = args.out.join(format!("frame-{:04}.ppm", frame));
        canvas.save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!("saved {}", path.display());

        life.step();
        if life.is_empty() {
            // All cells dead: start over with a new random population.
            life.seed(&mut rng);
        }
    }

    Ok(())
}

/// Builds a scene with one full-matte sphere per live cell, colored by
/// the cell's age, plus two point lights.
fn build_life_scene(life: &Life3D) -> Result<Scene, TracerError> {
    let n = life.size();
    let mut scene = Scene::new(Color::black());

    // The sphere layout in the grid is determined entirely by the radius
    // and the number of cells.
    let radius = 5.0;
    let spacing = 2.1 * radius;
    let half_space = spacing / 2.0;
    let box_span = (n as f64 + 1.0) * spacing;

    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let age = life.age(x, y, z);
                if age == 0 {
                    continue;
                }

                let center = Vector::new(
                    spacing * x as f64 - box_span / 2.0 + half_space,
                    spacing * y as f64 - box_span / 2.0 + spacing,
                    -spacing * z as f64 - box_span,
                );
                let mut sphere = Solid::sphere(center, radius);
                sphere.set_full_matte(&age_color(age))?;
                scene.add_solid(sphere);
            }
        }
    }

    // A distant key light to the upper left gives hard shadows; the one
    // front and right fills in some of the dark areas.
    scene.add_light_source(LightSource::new(
        Vector::new(50.0, 0.0, 50.0),
        Color::rgb(0.9, 0.9, 0.9),
    ));
    scene.add_light_source(LightSource::new(
        Vector::new(-2.0, 0.0, 5.0),
        Color::rgb(0.5, 0.5, 0.5),
    ));

    Ok(scene)
}

/// New cells are red, becoming more blue as they age.
fn age_color(age: u32) -> Color {
    match age {
        1 => Color::rgb(1.0, 0.0, 0.0),
        2 => Color::rgb(0.8, 0.0, 0.2),
        3 => Color::rgb(0.6, 0.0, 0.4),
        4 => Color::rgb(0.4, 0.0, 0.6),
        5 => Color::rgb(0.2, 0.0, 0.8),
        _ => Color::rgb(0.0, 0.0, 1.0),
    }
}
