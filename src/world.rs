use crate::ray::Ray3D;
use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::shape::{ Shape, ShapeType };
use crate::light::{ AmbientLight, PointLight, lighting };
use crate::intersect::{ Intersection, closest_hit };

/// A world with objects and light.
///
/// Objects are `Shape`s kept in the order they were described in; the order
/// only matters for breaking exact distance ties. Most of the per-pixel logic
/// (closest hit, shadows, shading) lives here.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub objects: Vec<Shape>,
    pub ambient: AmbientLight,
    pub light_source: PointLight,
}

impl Default for World {
    fn default() -> World {
        let s1 = Shape {
            ty: ShapeType::Sphere { center: Tuple3D::zero(), diameter: 2.0 },
            color: Color::rgb(204, 255, 153),
        };
        let s2 = Shape {
            ty: ShapeType::Sphere { center: Tuple3D::zero(), diameter: 1.0 },
            color: Color::white(),
        };

        World {
            objects: vec![s1, s2],
            ambient: Default::default(),
            light_source: Default::default(),
        }
    }
}

impl World {
    /// Creates a default world with two nested spheres.
    pub fn new() -> World {
        Default::default()
    }

    /// Creates an empty world with no objects and the default lights.
    pub fn empty() -> World {
        World {
            objects: Vec::new(),
            ambient: Default::default(),
            light_source: Default::default(),
        }
    }

    /// Finds the closest intersection of a ray with all objects in the world.
    pub fn intersect(&self, r: &Ray3D) -> Option<Intersection> {
        closest_hit(r, &self.objects)
    }

    /// Determines whether a point is shadowed from the light source.
    ///
    /// The point should already be lifted off its surface (see
    /// `Intersection::over_point`).
    pub fn is_shadowed(&self, p: Tuple3D) -> bool {
        let v = self.light_source.position - p;
        let distance = v.magnitude();

        // The point coincides with the light; nothing can sit in between.
        let r = match Ray3D::new(p, v) {
            Ok(r) => r,
            Err(_) => return false,
        };

        match self.intersect(&r) {
            Some(i) => i.t < distance,
            None => false,
        }
    }

    /// Calculates the color for a hit, based on shadows and light.
    pub fn shade_hit(&self, hit: &Intersection) -> Color {
        lighting(hit.color(), &self.ambient, &self.light_source,
            hit.point, hit.normalv, self.is_shadowed(hit.over_point))
    }

    /// Determines a color based on the intersection of a ray and the objects.
    ///
    /// Rays that hit nothing get `background`.
    pub fn color_at(&self, r: &Ray3D, background: Color) -> Color {
        match self.intersect(r) {
            None => background,
            Some(hit) => self.shade_hit(&hit),
        }
    }
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::new();
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    let hit = w.intersect(&r).unwrap();
    assert_eq!(hit.t, 4.0);
    assert_eq!(hit.index, 0);
}

#[test]
fn color_ray_miss() {
    let w = World::new();
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    ).unwrap();

    assert_eq!(w.color_at(&r, Color::rgb(1, 2, 3)), Color::rgb(1, 2, 3));
}

#[test]
fn shade_point_behind_sphere_is_ambient_only() {
    let mut w = World::empty();
    w.ambient = AmbientLight::new(0.2, Color::white());
    w.light_source = PointLight::new(Tuple3D::new(0.0, 0.0, -10.0), 1.0,
        Color::white());

    // An opaque sphere between the light and a wall.
    w.objects.push(
        Shape::sphere(Tuple3D::zero(), 2.0, Color::white()).unwrap()
    );
    w.objects.push(
        Shape::plane(Tuple3D::new(0.0, 0.0, 10.0), Tuple3D::new(0.0, 0.0, 1.0),
            Color::white()).unwrap()
    );

    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.5, 5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    let hit = w.intersect(&r).unwrap();
    assert_eq!(hit.index, 1);
    assert!(w.is_shadowed(hit.over_point));

    let c = w.shade_hit(&hit);
    assert_eq!(c, Color::rgb(51, 51, 51));
    assert_ne!(c, Color::black());
}

#[test]
fn lit_point_gets_diffuse() {
    let mut w = World::empty();
    w.ambient = AmbientLight::new(0.2, Color::white());
    w.light_source = PointLight::new(Tuple3D::new(0.0, 0.0, -10.0), 1.0,
        Color::white());
    w.objects.push(
        Shape::sphere(Tuple3D::zero(), 2.0, Color::rgb(100, 100, 100)).unwrap()
    );

    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();

    assert_eq!(w.color_at(&r, Color::black()), Color::rgb(151, 151, 151));
}

#[test]
fn shadow_collinear_point_and_light() {
    let w = World::new();
    let p = Tuple3D::new(0.0, 10.0, 0.0);

    assert!(!w.is_shadowed(p));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w = World::new();
    let p = Tuple3D::new(10.0, -10.0, 10.0);

    assert!(w.is_shadowed(p));
}

#[test]
fn shadow_object_behind_light() {
    let w = World::new();
    let p = Tuple3D::new(-20.0, 20.0, -20.0);

    assert!(!w.is_shadowed(p));
}

#[test]
fn shadow_object_behind_point() {
    let w = World::new();
    let p = Tuple3D::new(-2.0, 2.0, -2.0);

    assert!(!w.is_shadowed(p));
}

#[test]
fn point_at_light_is_not_shadowed() {
    let w = World::new();

    assert!(!w.is_shadowed(w.light_source.position));
}
