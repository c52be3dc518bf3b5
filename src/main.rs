use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{ error, info, LevelFilter };

use minirt::scene::Scene;
use minirt::color::Color;
use minirt::camera::RenderOptions;
use minirt::command::{ Controls, Flow, Session };
use minirt::logger::init_logger;
use minirt::consts::{
    CANVAS_WIDTH, CANVAS_HEIGHT, OUT_FILE, ANGULAR_STEP_DEGREES, LINEAR_STEP,
};
use minirt::error::Result;

/// Renders spheres, planes and cylinders described in an `.rt` or `.json`
/// scene file to a PPM image.
#[derive(Parser, Debug)]
#[clap(name = "minirt", version, about)]
struct Args {
    /// Scene description (`.rt` or `.json`)
    #[clap(parse(from_os_str))]
    scene: PathBuf,

    /// Image width in pixels
    #[clap(long, default_value_t = CANVAS_WIDTH)]
    width: usize,

    /// Image height in pixels
    #[clap(long, default_value_t = CANVAS_HEIGHT)]
    height: usize,

    /// Samples per pixel along each axis (a fixed n*n grid)
    #[clap(short, long, default_value_t = 1)]
    samples: usize,

    /// Render threads; all cores when omitted
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// Output PPM file
    #[clap(short, long, parse(from_os_str), default_value = OUT_FILE)]
    output: PathBuf,

    /// Color of rays that hit nothing, as `r,g,b` or `#RRGGBB`
    #[clap(long, default_value = "0,0,0")]
    background: Color,

    /// Rotation per command, in degrees
    #[clap(long, default_value_t = ANGULAR_STEP_DEGREES)]
    angle_step: f64,

    /// Translation per command, in world units
    #[clap(long, default_value_t = LINEAR_STEP)]
    move_step: f64,

    /// Commands to apply before rendering, separated by `;`
    #[clap(short, long)]
    commands: Option<String>,

    /// Keep reading commands from stdin, writing a frame after each change
    #[clap(short, long)]
    interactive: bool,

    /// Log level; `RUST_LOG` refines it
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(args: Args) -> Result<()> {
    let scene = Scene::load(&args.scene)?;
    info!("loaded {} with {} objects", args.scene.display(),
        scene.world.objects.len());

    let options = RenderOptions {
        width: args.width,
        height: args.height,
        samples: args.samples,
        background: args.background,
    };

    let mut session = Session::new(scene, options, args.output);
    session.controls = Controls::new(args.angle_step, args.move_step);
    session.threads = args.threads;

    let mut exit = false;
    if let Some(script) = &args.commands {
        exit = session.apply_script(script)? == Flow::Exit;
    }

    session.present()?;

    if args.interactive && !exit {
        session.run(io::stdin().lock())?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level);

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}
