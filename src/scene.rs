use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{ Serialize, Deserialize };

use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::shape::Shape;
use crate::world::World;
use crate::camera::Camera;
use crate::light::{ AmbientLight, PointLight };
use crate::error::{ RtError, Result };

/// Everything needed to render a frame: the world and the camera looking at it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Loads a scene file, picking the reader from the file extension.
    ///
    /// `.rt` files use the line-based format read by `from_rt_str`; `.json`
    /// files are read by `from_json_str`.
    pub fn load(path: &Path) -> Result<Scene> {
        let extension = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("rt") => Scene::from_rt_str(&fs::read_to_string(path)?),
            Some("json") => Scene::from_json_str(&fs::read_to_string(path)?),
            _ => Err(RtError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses a scene in the `.rt` format.
    ///
    /// Each non-blank line describes one element; the first token names it:
    ///
    /// ```text
    /// A  ratio r,g,b                    ambient light
    /// C  x,y,z nx,ny,nz fov             camera
    /// L  x,y,z ratio [r,g,b]            point light
    /// sp x,y,z diameter r,g,b           sphere
    /// pl x,y,z nx,ny,nz r,g,b           plane
    /// cy x,y,z nx,ny,nz diameter height r,g,b
    /// ```
    ///
    /// `A`, `C` and `L` must appear exactly once. A cylinder is positioned by
    /// its center. Lines starting with `#` are comments.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minirt::scene::Scene;
    /// let scene = Scene::from_rt_str("\
    /// A 0.2 255,255,255
    /// C 0,0,-5 0,0,1 70
    /// L -10,10,-10 0.7
    /// sp 0,0,0 2 255,0,0
    /// ").unwrap();
    ///
    /// assert_eq!(scene.world.objects.len(), 1);
    /// ```
    pub fn from_rt_str(source: &str) -> Result<Scene> {
        let mut ambient = None;
        let mut camera = None;
        let mut light = None;
        let mut objects = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = text.split_whitespace().collect();
            let element = parse_element(&tokens).map_err(|e| match e {
                RtError::Parse { .. } => e,
                other => RtError::Parse { line, message: other.to_string() },
            })?;

            match element {
                Element::Ambient(a) => set_once(&mut ambient, a, "A", line)?,
                Element::Camera(c) => set_once(&mut camera, c, "C", line)?,
                Element::Light(l) => set_once(&mut light, l, "L", line)?,
                Element::Object(s) => objects.push(s),
            }
        }

        let missing = |what: &str| {
            RtError::InvalidScene(format!("missing `{}` element", what))
        };

        Ok(Scene {
            world: World {
                objects,
                ambient: ambient.ok_or_else(|| missing("A"))?,
                light_source: light.ok_or_else(|| missing("L"))?,
            },
            camera: camera.ok_or_else(|| missing("C"))?,
        })
    }

    /// Parses a scene from its JSON description (see `SceneJson`).
    pub fn from_json_str(source: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(source)?;
        Scene::try_from(scene_json)
    }
}

/// One parsed line of an `.rt` file.
enum Element {
    Ambient(AmbientLight),
    Camera(Camera),
    Light(PointLight),
    Object(Shape),
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &str, line: usize)
    -> Result<()> {
    if slot.is_some() {
        return Err(RtError::Parse {
            line,
            message: format!("`{}` may only appear once", what),
        });
    }

    *slot = Some(value);
    Ok(())
}

fn parse_element(tokens: &[&str]) -> Result<Element> {
    let element = match tokens {
        ["A", ratio, color] => Element::Ambient(
            AmbientLight::new(parse_ratio(ratio)?, color.parse()?)
        ),
        ["C", position, direction, fov] => Element::Camera(
            Camera::new(parse_vector(position)?, parse_vector(direction)?,
                parse_number(fov)?)?
        ),
        ["L", position, ratio] => Element::Light(
            PointLight::new(parse_vector(position)?, parse_ratio(ratio)?,
                Color::white())
        ),
        ["L", position, ratio, color] => Element::Light(
            PointLight::new(parse_vector(position)?, parse_ratio(ratio)?,
                color.parse()?)
        ),
        ["sp", center, diameter, color] => Element::Object(
            Shape::sphere(parse_vector(center)?, parse_number(diameter)?,
                color.parse()?)?
        ),
        ["pl", point, normal, color] => Element::Object(
            Shape::plane(parse_vector(point)?, parse_vector(normal)?,
                color.parse()?)?
        ),
        ["cy", center, axis, diameter, height, color] => Element::Object(
            cylinder_from_center(parse_vector(center)?, parse_vector(axis)?,
                parse_number(diameter)?, parse_number(height)?, color.parse()?)?
        ),
        [id, ..] => return Err(RtError::InvalidScene(
            format!("unknown element or wrong field count for `{}`", id)
        )),
        [] => return Err(RtError::InvalidScene("empty element".into())),
    };

    Ok(element)
}

/// Builds a cylinder described by its center rather than its base.
fn cylinder_from_center(center: Tuple3D, axis: Tuple3D, diameter: f64,
    height: f64, color: Color) -> Result<Shape> {
    let axis = axis.normalize().map_err(|_|
        RtError::DegenerateGeometry("cylinder axis is a zero vector".into())
    )?;

    Shape::cylinder(center - axis * (height / 2.0), axis, diameter, height,
        color)
}

fn parse_number(token: &str) -> Result<f64> {
    f64::from_str(token)
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RtError::InvalidScene(format!("invalid number `{}`", token)))
}

fn parse_ratio(token: &str) -> Result<f64> {
    let ratio = parse_number(token)?;
    check_ratio(ratio)?;
    Ok(ratio)
}

fn check_ratio(ratio: f64) -> Result<()> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(RtError::InvalidScene(
            format!("ratio must lie in [0, 1], got {}", ratio)
        ))
    }
}

fn parse_vector(token: &str) -> Result<Tuple3D> {
    let components = token.split(',')
        .map(parse_number)
        .collect::<Result<Vec<f64>>>()
        .map_err(|_| RtError::InvalidScene(format!("invalid vector `{}`", token)))?;

    match components.as_slice() {
        [x, y, z] => Ok(Tuple3D::new(*x, *y, *z)),
        _ => Err(RtError::InvalidScene(format!("invalid vector `{}`", token))),
    }
}

/// A scene as described in JSON.
///
/// ```json
/// {
///   "ambient": { "ratio": 0.2, "color": [255, 255, 255] },
///   "camera": { "position": [0, 0, -5], "direction": [0, 0, 1], "fov": 70 },
///   "light": { "position": [-10, 10, -10], "ratio": 0.7 },
///   "shapes": [
///     { "type": "sphere", "center": [0, 0, 0], "diameter": 2, "color": [255, 0, 0] }
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    ambient: AmbientJson,
    camera: CameraJson,
    light: LightJson,

    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct AmbientJson {
    ratio: f64,
    color: Color,
}

#[derive(Clone, Serialize, Deserialize)]
struct CameraJson {
    position: [f64; 3],
    direction: [f64; 3],
    fov: f64,
}

#[derive(Clone, Serialize, Deserialize)]
struct LightJson {
    position: [f64; 3],
    ratio: f64,

    #[serde(default = "Color::white")]
    color: Color,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeJson {
    Sphere { center: [f64; 3], diameter: f64, color: Color },
    Plane { point: [f64; 3], normal: [f64; 3], color: Color },
    Cylinder {
        center: [f64; 3],
        axis: [f64; 3],
        diameter: f64,
        height: f64,
        color: Color,
    },
}

impl TryFrom<ShapeJson> for Shape {
    type Error = RtError;

    fn try_from(shape_json: ShapeJson) -> Result<Shape> {
        match shape_json {
            ShapeJson::Sphere { center, diameter, color }
                => Shape::sphere(center.into(), diameter, color),
            ShapeJson::Plane { point, normal, color }
                => Shape::plane(point.into(), normal.into(), color),
            ShapeJson::Cylinder { center, axis, diameter, height, color }
                => cylinder_from_center(center.into(), axis.into(), diameter,
                    height, color),
        }
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = RtError;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        check_ratio(scene_json.ambient.ratio)?;
        check_ratio(scene_json.light.ratio)?;

        let camera = Camera::new(
            scene_json.camera.position.into(),
            scene_json.camera.direction.into(),
            scene_json.camera.fov,
        )?;

        let objects = scene_json.shapes.into_iter()
            .map(Shape::try_from)
            .collect::<Result<Vec<Shape>>>()?;

        let world = World {
            objects,
            ambient: AmbientLight::new(scene_json.ambient.ratio,
                scene_json.ambient.color),
            light_source: PointLight::new(scene_json.light.position.into(),
                scene_json.light.ratio, scene_json.light.color),
        };

        Ok(Scene { world, camera })
    }
}

/* Tests */

#[cfg(test)]
const SAMPLE_RT: &str = "\
# a small test scene
A 0.2 255,255,255

C -50,0,20 0,0,1 70
L -40,0,30 0.7 255,255,255
pl 0,0,0 0,1.0,0 255,0,225
sp 0,0,20 20 255,0,0
cy 50.0,0.0,20.6 0,0,1.0 14.2 21.42 10,0,255
";

#[test]
fn parse_rt_scene() {
    let scene = Scene::from_rt_str(SAMPLE_RT).unwrap();

    assert_eq!(scene.world.ambient, AmbientLight::new(0.2, Color::white()));
    assert_eq!(scene.world.light_source.position, Tuple3D::new(-40.0, 0.0, 30.0));
    assert_eq!(scene.world.light_source.intensity, 0.7);
    assert_eq!(scene.camera.position, Tuple3D::new(-50.0, 0.0, 20.0));
    assert_eq!(scene.camera.forward(), Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(scene.camera.field_of_view, 70.0);

    let kinds: Vec<String> = scene.world.objects.iter()
        .map(|s| s.kind().to_string())
        .collect();
    assert_eq!(kinds, vec!["plane", "sphere", "cylinder"]);
    assert_eq!(scene.world.objects[0].color, Color::rgb(255, 0, 225));
}

#[test]
fn rt_cylinder_is_positioned_by_center() {
    let scene = Scene::from_rt_str(SAMPLE_RT).unwrap();
    let cylinder = &scene.world.objects[2];

    assert_eq!(cylinder.cylinder_center().unwrap(),
        Tuple3D::new(50.0, 0.0, 20.6));
    assert_eq!(cylinder.position(), Tuple3D::new(50.0, 0.0, 20.6 - 10.71));
}

#[test]
fn rt_light_color_is_optional() {
    let scene = Scene::from_rt_str("A 0.1 0,0,0\nC 0,0,0 1,0,0 90\nL 1,2,3 1\n")
        .unwrap();

    assert_eq!(scene.world.light_source.color, Color::white());
    assert!(scene.world.objects.is_empty());
}

#[test]
fn rt_errors_carry_line_numbers() {
    let bad_ratio = "A 1.5 255,255,255\nC 0,0,0 0,0,1 70\nL 0,0,0 1\n";
    let bad_color = "A 0.5 255,255,255\nC 0,0,0 0,0,1 70\nL 0,0,0 1\n\nsp 0,0,0 1 256,0,0\n";
    let duplicate = "A 0.5 255,255,255\nA 0.5 255,255,255\n";
    let unknown = "A 0.5 255,255,255\nxx 1 2 3\n";
    let zero_normal = "pl 0,0,0 0,0,0 1,2,3\n";

    assert!(matches!(Scene::from_rt_str(bad_ratio),
        Err(RtError::Parse { line: 1, .. })));
    assert!(matches!(Scene::from_rt_str(bad_color),
        Err(RtError::Parse { line: 5, .. })));
    assert!(matches!(Scene::from_rt_str(duplicate),
        Err(RtError::Parse { line: 2, .. })));
    assert!(matches!(Scene::from_rt_str(unknown),
        Err(RtError::Parse { line: 2, .. })));
    assert!(matches!(Scene::from_rt_str(zero_normal),
        Err(RtError::Parse { line: 1, .. })));
}

#[test]
fn rt_requires_camera_and_lights() {
    assert!(matches!(Scene::from_rt_str("A 0.2 255,255,255\nL 0,0,0 1\n"),
        Err(RtError::InvalidScene(_))));
    assert!(matches!(Scene::from_rt_str(""), Err(RtError::InvalidScene(_))));
}

#[test]
fn rt_rejects_bad_camera() {
    let vertical = "C 0,0,0 0,1,0 70\n";
    let wide = "C 0,0,0 0,0,1 180\n";

    assert!(Scene::from_rt_str(vertical).is_err());
    assert!(Scene::from_rt_str(wide).is_err());
}

#[test]
fn parse_json_scene() {
    let scene = Scene::from_json_str(r#"{
        "ambient": { "ratio": 0.2, "color": [255, 255, 255] },
        "camera": { "position": [0, 0, -5], "direction": [0, 0, 1], "fov": 70 },
        "light": { "position": [-10, 10, -10], "ratio": 0.7 },
        "shapes": [
            { "type": "sphere", "center": [0, 0, 0], "diameter": 2, "color": [255, 0, 0] },
            { "type": "plane", "point": [0, -1, 0], "normal": [0, 3, 0], "color": [0, 0, 255] },
            { "type": "cylinder", "center": [1, 0, 1], "axis": [0, 1, 0],
              "diameter": 0.5, "height": 2, "color": [0, 255, 0] }
        ]
    }"#).unwrap();

    assert_eq!(scene.world.objects.len(), 3);
    assert_eq!(scene.world.light_source.color, Color::white());
    assert_eq!(scene.world.objects[2].position(), Tuple3D::new(1.0, -1.0, 1.0));

    let rt = Scene::from_rt_str("\
A 0.2 255,255,255
C 0,0,-5 0,0,1 70
L -10,10,-10 0.7
sp 0,0,0 2 255,0,0
pl 0,-1,0 0,3,0 0,0,255
cy 1,0,1 0,1,0 0.5 2 0,255,0
").unwrap();
    assert_eq!(scene, rt);
}

#[test]
fn json_rejects_bad_values() {
    let bad_ratio = r#"{
        "ambient": { "ratio": 2.0, "color": [255, 255, 255] },
        "camera": { "position": [0, 0, 0], "direction": [0, 0, 1], "fov": 70 },
        "light": { "position": [0, 0, 0], "ratio": 0.5 }
    }"#;
    let bad_shape = r#"{
        "ambient": { "ratio": 0.2, "color": [255, 255, 255] },
        "camera": { "position": [0, 0, 0], "direction": [0, 0, 1], "fov": 70 },
        "light": { "position": [0, 0, 0], "ratio": 0.5 },
        "shapes": [ { "type": "cube", "color": [1, 2, 3] } ]
    }"#;

    assert!(matches!(Scene::from_json_str(bad_ratio),
        Err(RtError::InvalidScene(_))));
    assert!(matches!(Scene::from_json_str(bad_shape), Err(RtError::Json(_))));
}

#[test]
fn load_rejects_unknown_extension() {
    assert!(matches!(Scene::load(Path::new("scene.obj")),
        Err(RtError::UnsupportedFormat(_))));
}
