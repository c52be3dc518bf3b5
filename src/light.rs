use crate::color::Color;
use crate::tuple::Tuple3D;

/// Ambient lighting.
///
/// Constant illumination applied to every visible point regardless of
/// geometry or shadows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Brightness in `[0, 1]`.
    pub intensity: f64,
    pub color: Color,
}

impl Default for AmbientLight {
    fn default() -> AmbientLight {
        AmbientLight { intensity: 0.2, color: Color::white() }
    }
}

impl AmbientLight {
    pub fn new(intensity: f64, color: Color) -> AmbientLight {
        AmbientLight { intensity, color }
    }

    /// The ambient contribution to any visible point.
    pub fn contribution(&self) -> Color {
        self.color.scale(self.intensity)
    }
}

/// A point light.
///
/// A very simple light source. Provides a color, a brightness and a position
/// where light is produced from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Tuple3D,

    /// Brightness in `[0, 1]`.
    pub intensity: f64,
    pub color: Color,
}

impl Default for PointLight {
    fn default() -> PointLight {
        PointLight {
            position: Tuple3D::new(-10.0, 10.0, -10.0),
            intensity: 1.0,
            color: Color::white(),
        }
    }
}

impl PointLight {
    pub fn new(position: Tuple3D, intensity: f64, color: Color) -> PointLight {
        PointLight { position, intensity, color }
    }
}

/// Calculate the lighting of a point in an environment.
///
/// Combines the ambient term with a Lambertian diffuse term. The diffuse term
/// scales with the cosine between `normalv` and the direction to the light and
/// does not fall off with distance. If this point is in a shadow (parameter
/// `in_shadow`), only ambient light is used.
///
/// Channels saturate at 255 when the terms are added.
pub fn lighting(surface: Color, ambient: &AmbientLight, light: &PointLight,
    point: Tuple3D, normalv: Tuple3D, in_shadow: bool) -> Color {
    let ambient = ambient.contribution();

    if in_shadow {
        return ambient;
    }

    // A light sitting exactly on the surface gives no usable direction.
    let lightv = match (light.position - point).normalize() {
        Ok(v) => v,
        Err(_) => return ambient,
    };

    let light_dot_normal = lightv.dot(&normalv).max(0.0);
    let diffuse = surface.blend(&light.color)
        .scale(light_dot_normal * light.intensity);

    ambient + diffuse
}

#[cfg(test)]
fn overhead_light() -> PointLight {
    PointLight::new(Tuple3D::new(0.0, 0.0, -10.0), 1.0, Color::white())
}

#[test]
fn light_straight_on() {
    let ambient = AmbientLight::new(0.1, Color::white());
    let res = lighting(Color::rgb(200, 100, 0), &ambient, &overhead_light(),
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), false);

    // 26 ambient + full diffuse
    assert_eq!(res, Color::rgb(226, 126, 26));
}

#[test]
fn light_at_45_degrees() {
    let ambient = AmbientLight::new(0.0, Color::white());
    let light = PointLight::new(Tuple3D::new(0.0, 10.0, -10.0), 1.0,
        Color::white());
    let res = lighting(Color::rgb(200, 200, 200), &ambient, &light,
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), false);

    // 200 * cos(45deg)
    assert_eq!(res, Color::rgb(141, 141, 141));
}

#[test]
fn light_behind_surface() {
    let ambient = AmbientLight::new(0.1, Color::white());
    let light = PointLight::new(Tuple3D::new(0.0, 0.0, 10.0), 1.0,
        Color::white());
    let res = lighting(Color::white(), &ambient, &light,
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), false);

    assert_eq!(res, Color::rgb(26, 26, 26));
}

#[test]
fn shadowed_point_keeps_ambient() {
    let ambient = AmbientLight::new(0.5, Color::rgb(100, 0, 200));
    let res = lighting(Color::white(), &ambient, &overhead_light(),
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), true);

    assert_eq!(res, Color::rgb(50, 0, 100));
}

#[test]
fn light_color_filters_surface() {
    let ambient = AmbientLight::new(0.0, Color::white());
    let light = PointLight::new(Tuple3D::new(0.0, 0.0, -10.0), 0.5,
        Color::rgb(255, 0, 0));
    let res = lighting(Color::rgb(200, 200, 200), &ambient, &light,
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), false);

    assert_eq!(res, Color::rgb(100, 0, 0));
}

#[test]
fn bright_terms_saturate() {
    let ambient = AmbientLight::new(1.0, Color::white());
    let res = lighting(Color::white(), &ambient, &overhead_light(),
        Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0), false);

    assert_eq!(res, Color::white());
}
