use std::fmt;

use crate::consts::FEQ_EPSILON;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::color::Color;
use crate::quaternion::Quaternion;
use crate::error::{ RtError, Result };

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// A sphere around `center`.
    Sphere { center: Tuple3D, diameter: f64 },

    /// An infinite plane through `point`, with a unit `normal`.
    Plane { point: Tuple3D, normal: Tuple3D },

    /// A finite, uncapped cylinder. Its centerline starts at `base` and runs
    /// `height` units along the unit `axis`.
    Cylinder { base: Tuple3D, axis: Tuple3D, diameter: f64, height: f64 },
}

/// The variant of a `ShapeType`, without its data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Plane,
    Cylinder,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Sphere => write!(f, "sphere"),
            ShapeKind::Plane => write!(f, "plane"),
            ShapeKind::Cylinder => write!(f, "cylinder"),
        }
    }
}

/// A primitive in the scene: geometry plus a flat color.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub color: Color,
}

impl Shape {
    /// Creates a sphere. The diameter must be positive.
    pub fn sphere(center: Tuple3D, diameter: f64, color: Color)
        -> Result<Shape> {
        Self::check_finite("sphere center", center)?;
        Self::check_positive("sphere diameter", diameter)?;

        Ok(Shape { ty: ShapeType::Sphere { center, diameter }, color })
    }

    /// Creates a plane. The normal is normalized; it must be non-zero.
    pub fn plane(point: Tuple3D, normal: Tuple3D, color: Color)
        -> Result<Shape> {
        Self::check_finite("plane point", point)?;
        let normal = normal.normalize().map_err(|_|
            RtError::DegenerateGeometry("plane normal is a zero vector".into())
        )?;

        Ok(Shape { ty: ShapeType::Plane { point, normal }, color })
    }

    /// Creates a cylinder from its base point. The axis is normalized.
    pub fn cylinder(base: Tuple3D, axis: Tuple3D, diameter: f64, height: f64,
        color: Color) -> Result<Shape> {
        Self::check_finite("cylinder base", base)?;
        Self::check_positive("cylinder diameter", diameter)?;
        Self::check_positive("cylinder height", height)?;
        let axis = axis.normalize().map_err(|_|
            RtError::DegenerateGeometry("cylinder axis is a zero vector".into())
        )?;

        Ok(Shape {
            ty: ShapeType::Cylinder { base, axis, diameter, height },
            color,
        })
    }

    fn check_positive(what: &str, value: f64) -> Result<()> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(RtError::DegenerateGeometry(
                format!("{} must be positive, got {}", what, value)
            ))
        }
    }

    fn check_finite(what: &str, position: Tuple3D) -> Result<()> {
        if position.is_finite() {
            Ok(())
        } else {
            Err(RtError::DegenerateGeometry(
                format!("{} must be finite, got {:?}", what, position)
            ))
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self.ty {
            ShapeType::Sphere { .. } => ShapeKind::Sphere,
            ShapeType::Plane { .. } => ShapeKind::Plane,
            ShapeType::Cylinder { .. } => ShapeKind::Cylinder,
        }
    }

    /// The point that positions this shape: sphere center, plane point or
    /// cylinder base.
    pub fn position(&self) -> Tuple3D {
        match self.ty {
            ShapeType::Sphere { center, .. } => center,
            ShapeType::Plane { point, .. } => point,
            ShapeType::Cylinder { base, .. } => base,
        }
    }

    /// The geometric center of a cylinder, halfway along its centerline.
    pub fn cylinder_center(&self) -> Option<Tuple3D> {
        match self.ty {
            ShapeType::Cylinder { base, axis, height, .. }
                => Some(base + axis * (height / 2.0)),
            _ => None,
        }
    }

    /// Moves the shape's position by `delta`. Orientation is unchanged.
    pub fn translate(&mut self, delta: Tuple3D) {
        match self.ty {
            ShapeType::Sphere { ref mut center, .. } => *center += delta,
            ShapeType::Plane { ref mut point, .. } => *point += delta,
            ShapeType::Cylinder { ref mut base, .. } => *base += delta,
        }
    }

    /// Computes this shape's geometry after rotation by the unit quaternion
    /// `q`, without modifying it.
    ///
    /// Spheres and planes move their position about the world origin; a
    /// plane keeps its normal. A cylinder turns about its own center: the axis
    /// is rotated and the base recomputed so that the center stays where it
    /// was.
    pub fn rotated(&self, q: &Quaternion) -> Result<ShapeType> {
        let ty = match self.ty {
            ShapeType::Sphere { center, diameter } => ShapeType::Sphere {
                center: q.rotate(center),
                diameter,
            },
            ShapeType::Plane { point, normal } => ShapeType::Plane {
                point: q.rotate(point),
                normal,
            },
            ShapeType::Cylinder { base, axis, diameter, height } => {
                let center = base + axis * (height / 2.0);
                let axis = q.rotate(axis).normalize()?;

                ShapeType::Cylinder {
                    base: center - axis * (height / 2.0),
                    axis,
                    diameter,
                    height,
                }
            },
        };

        Ok(ty)
    }

    /// Intersects a ray with this shape.
    ///
    /// Returns the nearest strictly positive distance along the ray and the
    /// unit surface normal there, turned to face the ray's origin side. `None`
    /// means the ray misses.
    pub fn intersect(&self, ray: &Ray3D) -> Option<(f64, Tuple3D)> {
        let (t, normal) = match self.ty {
            ShapeType::Sphere { center, diameter }
                => Self::intersect_sphere(ray, center, diameter / 2.0)?,
            ShapeType::Plane { point, normal }
                => Self::intersect_plane(ray, point, normal)?,
            ShapeType::Cylinder { base, axis, diameter, height }
                => Self::intersect_cylinder(ray, base, axis, diameter / 2.0,
                    height)?,
        };

        if normal.dot(&ray.direction) > 0.0 {
            Some((t, -normal))
        } else {
            Some((t, normal))
        }
    }

    /// Solves `|O + tD - C|^2 = r^2`.
    ///
    /// Both roots are computed; the smaller strictly positive one wins. If the
    /// ray starts inside the sphere that is the far root.
    fn intersect_sphere(ray: &Ray3D, center: Tuple3D, radius: f64)
        -> Option<(f64, Tuple3D)> {
        let sphere_to_ray = ray.origin - center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - radius.powi(2);

        let t = Self::nearest_positive_root(a, b, c, |_| true)?;
        let normal = (ray.position(t) - center).normalize().ok()?;

        Some((t, normal))
    }

    /// Solves `dot(O + tD - P, N) = 0`.
    fn intersect_plane(ray: &Ray3D, point: Tuple3D, normal: Tuple3D)
        -> Option<(f64, Tuple3D)> {
        let denom = ray.direction.dot(&normal);

        // A ray parallel to the plane never meets it.
        if denom.abs() < FEQ_EPSILON {
            return None;
        }

        let t = (point - ray.origin).dot(&normal) / denom;
        if t > 0.0 && t.is_finite() {
            Some((t, normal))
        } else {
            None
        }
    }

    /// Intersects the lateral surface of a finite cylinder.
    ///
    /// Origin offset and direction are projected onto the plane perpendicular
    /// to the axis, reducing the problem to a circle. Roots whose height along
    /// the axis falls outside `[0, height]` miss the finite segment.
    fn intersect_cylinder(ray: &Ray3D, base: Tuple3D, axis: Tuple3D,
        radius: f64, height: f64) -> Option<(f64, Tuple3D)> {
        let base_to_ray = ray.origin - base;
        let d = ray.direction.reject(&axis);
        let oc = base_to_ray.reject(&axis);

        let a = d.dot(&d);
        let b = 2.0 * d.dot(&oc);
        let c = oc.dot(&oc) - radius.powi(2);

        let within_segment = |t: f64| {
            let h = (base_to_ray + ray.direction * t).dot(&axis);
            (0.0..=height).contains(&h)
        };

        let t = Self::nearest_positive_root(a, b, c, within_segment)?;
        let normal = (ray.position(t) - base).reject(&axis).normalize().ok()?;

        Some((t, normal))
    }

    /// The smallest strictly positive root of `at^2 + bt + c` accepted by
    /// `accept`.
    ///
    /// A vanishing `a` (degenerate direction, or a ray parallel to a cylinder
    /// axis) is reported as no root rather than divided by.
    fn nearest_positive_root<F>(a: f64, b: f64, c: f64, accept: F)
        -> Option<f64>
        where F: Fn(f64) -> bool {
        if a.abs() < FEQ_EPSILON * FEQ_EPSILON {
            return None;
        }

        let discriminant = b.powi(2) - (4.0 * a * c);
        if !(discriminant >= 0.0) {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let mut t0 = (-b - sqrt_disc) / (2.0 * a);
        let mut t1 = (-b + sqrt_disc) / (2.0 * a);

        // Make sure that t0 is the lowest intersection location.
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        [t0, t1].into_iter()
            .find(|&t| t > 0.0 && t.is_finite() && accept(t))
    }
}

/* Tests */

#[cfg(test)]
fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray3D {
    Ray3D::new(
        Tuple3D::new(origin.0, origin.1, origin.2),
        Tuple3D::new(direction.0, direction.1, direction.2),
    ).unwrap()
}

#[cfg(test)]
fn unit_sphere() -> Shape {
    Shape::sphere(Tuple3D::zero(), 2.0, Color::white()).unwrap()
}

#[test]
fn ray_hits_sphere_from_outside() {
    let s = unit_sphere();
    let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));

    let (t, n) = s.intersect(&r).unwrap();
    assert_eq!(t, 4.0);
    assert_eq!(r.position(t), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(n, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = unit_sphere();
    let r = ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0));

    let (t, n) = s.intersect(&r).unwrap();
    assert_eq!(t, 5.0);
    assert!(n.is_finite());
}

#[test]
fn near_tangent_rays_are_stable() {
    let s = unit_sphere();

    for offset in [-1e-9, -1e-12, 0.0, 1e-12, 1e-9] {
        let r = ray((0.0, 1.0 + offset, -5.0), (0.0, 0.0, 1.0));
        if let Some((t, n)) = s.intersect(&r) {
            assert!(t.is_finite());
            assert!(is_finite_unit(n));
            assert!((t - 5.0).abs() < 1e-3);
        }
    }
}

#[cfg(test)]
fn is_finite_unit(t: Tuple3D) -> bool {
    t.is_finite() && crate::feq(t.magnitude(), 1.0)
}

#[test]
fn ray_misses_sphere() {
    let s = unit_sphere();
    let r = ray((0.0, 2.0, -5.0), (0.0, 0.0, 1.0));

    assert!(s.intersect(&r).is_none());
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let s = unit_sphere();
    let r = ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0));

    let (t, n) = s.intersect(&r).unwrap();
    assert_eq!(t, 1.0);
    // The normal is turned to face the ray origin.
    assert_eq!(n, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn sphere_behind_ray() {
    let s = unit_sphere();
    let r = ray((0.0, 0.0, 5.0), (0.0, 0.0, 1.0));

    assert!(s.intersect(&r).is_none());
}

#[test]
fn ray_hits_plane_from_above() {
    let p = Shape::plane(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0),
        Color::white()).unwrap();
    let r = ray((0.0, 5.0, 0.0), (0.0, -1.0, 0.0));

    let (t, n) = p.intersect(&r).unwrap();
    assert_eq!(t, 5.0);
    assert_eq!(n, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_hits_plane_from_below() {
    let p = Shape::plane(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0),
        Color::white()).unwrap();
    let r = ray((0.0, -1.0, 0.0), (0.0, 1.0, 0.0));

    let (t, n) = p.intersect(&r).unwrap();
    assert_eq!(t, 1.0);
    assert_eq!(n, Tuple3D::new(0.0, -1.0, 0.0));
}

#[test]
fn ray_parallel_to_plane() {
    let p = Shape::plane(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0),
        Color::white()).unwrap();
    let r = ray((0.0, 10.0, 0.0), (0.0, 0.0, 1.0));

    assert!(p.intersect(&r).is_none());
}

#[test]
fn plane_behind_ray() {
    let p = Shape::plane(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0),
        Color::white()).unwrap();
    let r = ray((0.0, 1.0, 0.0), (0.0, 1.0, 0.0));

    assert!(p.intersect(&r).is_none());
}

#[cfg(test)]
fn upright_cylinder() -> Shape {
    Shape::cylinder(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0), 2.0, 2.0,
        Color::white()).unwrap()
}

#[test]
fn ray_hits_cylinder_side() {
    let cy = upright_cylinder();
    let r = ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0));

    let (t, n) = cy.intersect(&r).unwrap();
    assert_eq!(t, 4.0);
    assert_eq!(n, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_misses_cylinder_beyond_height() {
    let cy = upright_cylinder();

    assert!(cy.intersect(&ray((0.0, 2.5, -5.0), (0.0, 0.0, 1.0))).is_none());
    assert!(cy.intersect(&ray((0.0, -0.5, -5.0), (0.0, 0.0, 1.0))).is_none());
}

#[test]
fn ray_along_cylinder_axis_misses() {
    let cy = upright_cylinder();
    let r = ray((0.0, -5.0, 0.0), (0.0, 1.0, 0.0));

    assert!(cy.intersect(&r).is_none());
}

#[test]
fn ray_through_open_end_hits_inner_wall() {
    let cy = upright_cylinder();
    // Enters through the open top, then meets the far wall inside.
    let r = ray((0.0, 3.0, 0.0), (0.0, -2.0, 1.0));

    let (t, n) = cy.intersect(&r).unwrap();
    let p = r.position(t);
    assert_eq!(p, Tuple3D::new(0.0, 1.0, 1.0));
    assert_eq!(n, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn tilted_cylinder_normal_is_perpendicular_to_axis() {
    let axis = Tuple3D::new(1.0, 1.0, 0.0);
    let cy = Shape::cylinder(Tuple3D::zero(), axis, 1.0, 4.0, Color::white())
        .unwrap();
    let r = ray((1.0, 1.0, -5.0), (0.0, 0.0, 1.0));

    let (_, n) = cy.intersect(&r).unwrap();
    assert!(crate::feq(n.dot(&axis.normalize().unwrap()), 0.0));
}

#[test]
fn degenerate_shapes_are_rejected() {
    let c = Color::white();

    assert!(Shape::sphere(Tuple3D::zero(), 0.0, c).is_err());
    assert!(Shape::plane(Tuple3D::zero(), Tuple3D::zero(), c).is_err());
    assert!(Shape::cylinder(Tuple3D::zero(), Tuple3D::up(), -1.0, 1.0, c)
        .is_err());
    assert!(Shape::cylinder(Tuple3D::zero(), Tuple3D::up(), 1.0, 0.0, c)
        .is_err());
    assert!(Shape::cylinder(Tuple3D::zero(), Tuple3D::zero(), 1.0, 1.0, c)
        .is_err());
}

#[test]
fn non_finite_positions_are_rejected() {
    let c = Color::white();
    let nan = Tuple3D::new(f64::NAN, 0.0, 0.0);
    let inf = Tuple3D::new(0.0, f64::INFINITY, 0.0);

    assert!(Shape::sphere(nan, 1.0, c).is_err());
    assert!(Shape::plane(inf, Tuple3D::up(), c).is_err());
    assert!(Shape::cylinder(nan, Tuple3D::up(), 1.0, 1.0, c).is_err());
}

#[test]
fn translate_moves_position_only() {
    let mut cy = upright_cylinder();
    cy.translate(Tuple3D::new(1.0, 2.0, 3.0));

    assert_eq!(cy.position(), Tuple3D::new(1.0, 2.0, 3.0));
    match cy.ty {
        ShapeType::Cylinder { axis, .. }
            => assert_eq!(axis, Tuple3D::new(0.0, 1.0, 0.0)),
        _ => unreachable!(),
    }
}

#[test]
fn rotated_cylinder_keeps_its_center() {
    let cy = upright_cylinder();
    let q = Quaternion::from_axis_angle(Tuple3D::new(0.0, 0.0, 1.0),
        std::f64::consts::FRAC_PI_2);

    let rotated = Shape { ty: cy.rotated(&q).unwrap(), color: cy.color };
    assert_eq!(rotated.cylinder_center(), cy.cylinder_center());
    assert_eq!(rotated.position(), Tuple3D::new(1.0, 1.0, 0.0));
}

#[test]
fn rotated_plane_keeps_its_normal() {
    let p = Shape::plane(Tuple3D::new(0.0, -1.0, 0.0), Tuple3D::up(),
        Color::white()).unwrap();
    let q = Quaternion::from_axis_angle(Tuple3D::new(1.0, 0.0, 0.0),
        std::f64::consts::FRAC_PI_2);

    match p.rotated(&q).unwrap() {
        ShapeType::Plane { point, normal } => {
            assert_eq!(point, Tuple3D::new(0.0, 0.0, -1.0));
            assert_eq!((normal.x, normal.y, normal.z), (0.0, 1.0, 0.0));
        },
        _ => panic!("expected a plane"),
    }
}

#[test]
fn rotated_sphere_orbits_origin() {
    let s = Shape::sphere(Tuple3D::new(1.0, 0.0, 0.0), 1.0, Color::white())
        .unwrap();
    let q = Quaternion::from_axis_angle(Tuple3D::new(0.0, 1.0, 0.0),
        std::f64::consts::PI);

    let ty = s.rotated(&q).unwrap();
    assert_eq!(ty, ShapeType::Sphere {
        center: Tuple3D::new(-1.0, 0.0, 0.0),
        diameter: 1.0,
    });
}
