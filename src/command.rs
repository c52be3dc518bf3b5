//! Scene commands and the session that applies them.
//!
//! A command names one step of one control: rotate shapes, spin cylinders,
//! move shapes, the light or the camera, or turn the camera. Each step uses
//! the fixed sizes in `Controls`.

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;

use log::{ debug, info, warn };

use crate::tuple::Tuple3D;
use crate::scene::Scene;
use crate::canvas::Canvas;
use crate::camera::RenderOptions;
use crate::shape::ShapeKind;
use crate::parallel::parallel_render_with;
use crate::transform::{
    ShapeFilter, rotate_shapes, rotate_camera, translate_shapes,
    translate_light, translate_camera,
};
use crate::consts::{ ANGULAR_STEP_DEGREES, LINEAR_STEP };
use crate::error::{ RtError, Result };

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A signed world axis, written `x+`, `y-` and so on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Direction {
    pub axis: Axis,
    pub positive: bool,
}

impl Direction {
    /// The unit vector along this direction.
    pub fn unit(&self) -> Tuple3D {
        let sign = if self.positive { 1.0 } else { -1.0 };

        match self.axis {
            Axis::X => Tuple3D::new(sign, 0.0, 0.0),
            Axis::Y => Tuple3D::new(0.0, sign, 0.0),
            Axis::Z => Tuple3D::new(0.0, 0.0, sign),
        }
    }
}

impl FromStr for Direction {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Direction> {
        let (axis, positive) = match s {
            "x+" => (Axis::X, true),
            "x-" => (Axis::X, false),
            "y+" => (Axis::Y, true),
            "y-" => (Axis::Y, false),
            "z+" => (Axis::Z, true),
            "z-" => (Axis::Z, false),
            _ => return Err(RtError::UnknownCommand(
                format!("invalid direction `{}`", s)
            )),
        };

        Ok(Direction { axis, positive })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        };

        write!(f, "{}{}", axis, if self.positive { '+' } else { '-' })
    }
}

/// One step of scene control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `rotate <dir>`: every primitive about `dir`.
    RotateShapes(Direction),

    /// `spin <dir>`: cylinders only, each about its own center.
    RotateCylinders(Direction),

    /// `move <dir>`: every primitive.
    TranslateShapes(Direction),

    /// `light <dir>`
    TranslateLight(Direction),

    /// `camera <dir>`
    TranslateCamera(Direction),

    /// `look <dir>`: turns the camera about `dir`.
    RotateCamera(Direction),

    Exit,
}

/// Parses a command line such as `spin x+` or `exit`.
///
/// # Examples
///
/// ```
/// # use minirt::command::{ Command, Direction, Axis };
/// let cmd: Command = "spin y-".parse().unwrap();
/// let dir = Direction { axis: Axis::Y, positive: false };
///
/// assert_eq!(cmd, Command::RotateCylinders(dir));
/// assert!("spin".parse::<Command>().is_err());
/// ```
impl FromStr for Command {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Command> {
        let tokens: Vec<&str> = s.split_whitespace().collect();

        let cmd = match tokens.as_slice() {
            ["exit"] | ["quit"] => Command::Exit,
            ["rotate", dir] => Command::RotateShapes(dir.parse()?),
            ["spin", dir] => Command::RotateCylinders(dir.parse()?),
            ["move", dir] => Command::TranslateShapes(dir.parse()?),
            ["light", dir] => Command::TranslateLight(dir.parse()?),
            ["camera", dir] => Command::TranslateCamera(dir.parse()?),
            ["look", dir] => Command::RotateCamera(dir.parse()?),
            _ => return Err(RtError::UnknownCommand(s.trim().to_string())),
        };

        Ok(cmd)
    }
}

/// Step sizes applied by one command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Controls {
    /// Rotation per command, in radians.
    pub angular_step: f64,

    /// Translation per command, in world units.
    pub linear_step: f64,
}

impl Default for Controls {
    fn default() -> Controls {
        Controls {
            angular_step: ANGULAR_STEP_DEGREES.to_radians(),
            linear_step: LINEAR_STEP,
        }
    }
}

impl Controls {
    /// Creates controls from an angle in degrees and a distance.
    pub fn new(angle_degrees: f64, distance: f64) -> Controls {
        Controls { angular_step: angle_degrees.to_radians(), linear_step: distance }
    }
}

/// Whether a session should keep going after a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    /// The scene changed and the frame is stale.
    Redraw,

    /// Nothing changed.
    Unchanged,

    Exit,
}

/// A scene being rendered and steered by commands.
pub struct Session {
    pub scene: Scene,
    pub controls: Controls,
    pub options: RenderOptions,

    /// Worker threads for rendering; rayon's global pool when `None`.
    pub threads: Option<usize>,

    /// Where frames are written.
    pub output: PathBuf,
}

impl Session {
    pub fn new(scene: Scene, options: RenderOptions, output: PathBuf)
        -> Session {
        Session {
            scene,
            controls: Default::default(),
            options,
            threads: None,
            output,
        }
    }

    /// Applies one command to the scene.
    ///
    /// A rotation that would degenerate (for example turning the camera to
    /// look straight up) is refused with a warning and leaves the scene as it
    /// was; it is not an error for the session.
    pub fn apply(&mut self, cmd: Command) -> Result<Flow> {
        debug!("applying {:?}", cmd);

        let angle = self.controls.angular_step;
        let step = self.controls.linear_step;

        let rotated = match cmd {
            Command::Exit => return Ok(Flow::Exit),
            Command::RotateShapes(dir) => rotate_shapes(&mut self.scene,
                ShapeFilter::All, dir.unit(), angle),
            Command::RotateCylinders(dir) => rotate_shapes(&mut self.scene,
                ShapeFilter::Only(ShapeKind::Cylinder), dir.unit(), angle),
            Command::RotateCamera(dir) => rotate_camera(&mut self.scene,
                dir.unit(), angle),
            Command::TranslateShapes(dir) => {
                translate_shapes(&mut self.scene, ShapeFilter::All,
                    dir.unit() * step);
                Ok(())
            },
            Command::TranslateLight(dir) => {
                translate_light(&mut self.scene, dir.unit() * step);
                Ok(())
            },
            Command::TranslateCamera(dir) => {
                translate_camera(&mut self.scene, dir.unit() * step);
                Ok(())
            },
        };

        match rotated {
            Ok(()) => Ok(Flow::Redraw),
            Err(RtError::DegenerateVector) => {
                warn!("ignoring {:?}: the result would be degenerate", cmd);
                Ok(Flow::Unchanged)
            },
            Err(e) => Err(e),
        }
    }

    /// Parses and applies one line of input. Blank lines do nothing.
    pub fn apply_line(&mut self, line: &str) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Unchanged);
        }

        self.apply(line.parse()?)
    }

    /// Applies a `;`-separated list of commands, stopping at `exit`.
    ///
    /// The whole script is parsed before anything runs, so a script with an
    /// unknown command leaves the scene untouched. Returns `Flow::Exit` if the
    /// script asked to stop, otherwise whether any command changed the scene.
    pub fn apply_script(&mut self, script: &str) -> Result<Flow> {
        let commands = script.split(';')
            .filter(|line| !line.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Command>>>()?;

        let mut flow = Flow::Unchanged;
        for cmd in commands {
            match self.apply(cmd)? {
                Flow::Exit => return Ok(Flow::Exit),
                Flow::Redraw => flow = Flow::Redraw,
                Flow::Unchanged => {},
            }
        }

        Ok(flow)
    }

    /// Reads commands line by line, writing a new frame after every change.
    ///
    /// Unknown commands are reported and skipped. Stops on `exit` or at the
    /// end of the input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            match self.apply_line(&line?) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Redraw) => { self.present()?; },
                Ok(Flow::Unchanged) => {},
                Err(RtError::UnknownCommand(cmd)) => {
                    warn!("unknown command: {}", cmd);
                },
                Err(e) => return Err(e),
            }
        }

        info!("session ended");
        Ok(())
    }

    /// Renders the current scene.
    pub fn render_frame(&self) -> Result<Canvas> {
        parallel_render_with(&self.scene, &self.options, self.threads)
    }

    /// Renders the current scene and writes it to the output file.
    pub fn present(&self) -> Result<Canvas> {
        let canvas = self.render_frame()?;
        canvas.save(&self.output)?;
        info!("wrote {}x{} frame to {}", canvas.width, canvas.height,
            self.output.display());

        Ok(canvas)
    }
}

#[cfg(test)]
fn test_session() -> Session {
    let scene = Scene::from_rt_str("\
A 0.2 255,255,255
C 0,0,-5 0,0,1 70
L -10,10,-10 0.7
sp 0,0,2 1 255,0,0
cy 1,0,0 0,1,0 0.5 2 0,255,0
").unwrap();
    let options = RenderOptions { width: 8, height: 6, ..Default::default() };

    Session::new(scene, options, std::env::temp_dir().join("minirt-test.ppm"))
}

#[test]
fn parse_commands() {
    let x_plus = Direction { axis: Axis::X, positive: true };
    let z_minus = Direction { axis: Axis::Z, positive: false };

    assert_eq!("rotate x+".parse::<Command>().unwrap(),
        Command::RotateShapes(x_plus));
    assert_eq!("  move   z- ".parse::<Command>().unwrap(),
        Command::TranslateShapes(z_minus));
    assert_eq!("look z-".parse::<Command>().unwrap(),
        Command::RotateCamera(z_minus));
    assert_eq!("exit".parse::<Command>().unwrap(), Command::Exit);

    assert!(matches!("jump x+".parse::<Command>(),
        Err(RtError::UnknownCommand(_))));
    assert!(matches!("light w+".parse::<Command>(),
        Err(RtError::UnknownCommand(_))));
    assert!("camera x+ y+".parse::<Command>().is_err());
}

#[test]
fn direction_units_and_display() {
    let d: Direction = "y-".parse().unwrap();

    assert_eq!(d.unit(), Tuple3D::new(0.0, -1.0, 0.0));
    assert_eq!(d.to_string(), "y-");
}

#[test]
fn default_controls_use_one_degree_and_a_tenth() {
    let c = Controls::default();

    assert!(crate::feq(c.angular_step, std::f64::consts::PI / 180.0));
    assert!(crate::feq(c.linear_step, 0.1));
}

#[test]
fn translate_commands_move_by_one_step() {
    let mut session = test_session();

    assert_eq!(session.apply_line("light y+").unwrap(), Flow::Redraw);
    assert_eq!(session.apply_line("camera x-").unwrap(), Flow::Redraw);
    assert_eq!(session.apply_line("move z+").unwrap(), Flow::Redraw);

    assert_eq!(session.scene.world.light_source.position,
        Tuple3D::new(-10.0, 10.1, -10.0));
    assert_eq!(session.scene.camera.position, Tuple3D::new(-0.1, 0.0, -5.0));
    assert_eq!(session.scene.world.objects[0].position(),
        Tuple3D::new(0.0, 0.0, 2.1));
}

#[test]
fn spin_turns_only_cylinders() {
    let mut session = test_session();
    let sphere = session.scene.world.objects[0].clone();
    let center = session.scene.world.objects[1].cylinder_center().unwrap();

    for _ in 0..90 {
        session.apply_line("spin z+").unwrap();
    }

    let cylinder = &session.scene.world.objects[1];
    assert_eq!(session.scene.world.objects[0], sphere);
    assert_eq!(cylinder.cylinder_center().unwrap(), center);
    match cylinder.ty {
        crate::shape::ShapeType::Cylinder { axis, .. }
            => assert_eq!(axis, Tuple3D::new(-1.0, 0.0, 0.0)),
        _ => panic!("expected a cylinder"),
    }
}

#[test]
fn degenerate_camera_turn_is_ignored() {
    let mut session = test_session();
    session.controls = Controls::new(90.0, 0.1);
    let before = session.scene.camera.clone();

    assert_eq!(session.apply_line("look x-").unwrap(), Flow::Unchanged);
    assert_eq!(session.scene.camera, before);
}

#[test]
fn exit_and_blank_lines() {
    let mut session = test_session();

    assert_eq!(session.apply_line("").unwrap(), Flow::Unchanged);
    assert_eq!(session.apply_line("exit").unwrap(), Flow::Exit);
    assert!(session.apply_line("dance").is_err());
}

#[test]
fn render_frame_uses_options() {
    let session = test_session();
    let canvas = session.render_frame().unwrap();

    assert_eq!((canvas.width, canvas.height), (8, 6));
    assert_eq!(canvas, session.scene.camera.render(&session.scene.world,
        &session.options));
}

#[test]
fn scripts_stop_at_exit() {
    let mut session = test_session();

    assert_eq!(session.apply_script("light x+; light x+").unwrap(),
        Flow::Redraw);
    assert_eq!(session.apply_script("light x+;exit;light x+").unwrap(),
        Flow::Exit);
    assert_eq!(session.scene.world.light_source.position,
        Tuple3D::new(-9.7, 10.0, -10.0));
}

#[test]
fn bad_script_changes_nothing() {
    let mut session = test_session();
    let before = session.scene.clone();

    assert!(matches!(session.apply_script("light x+; spin y+; fly"),
        Err(RtError::UnknownCommand(_))));
    assert_eq!(session.scene, before);
    assert_eq!(session.apply_script(" ; ").unwrap(), Flow::Unchanged);
}

#[test]
fn run_reads_until_exit() {
    let mut session = test_session();
    session.output = std::env::temp_dir().join("minirt-run-test.ppm");
    let input = std::io::Cursor::new("bogus\nlook y+\n\nexit\nlook y+\n");

    session.run(input).unwrap();

    let forward = session.scene.camera.forward();
    assert!(crate::feq(forward.x, (1.0f64).to_radians().sin()));
    assert!(std::fs::metadata(&session.output).is_ok());
}
