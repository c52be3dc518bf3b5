use crate::consts::SHADOW_EPSILON;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::color::Color;
use crate::shape::Shape;

/// An intersection.
///
/// This structure assumes that some ray produced a hit. Parameter `t` is the
/// offset of the hit from the ray origin, and `what` borrows the shape that was
/// hit from the world's object list (`index` is its position in that list).
///
/// Intersections are transient: they are created while shading one pixel and
/// dropped right after.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    /// The distance along the ray.
    pub t: f64,

    /// The object being intersected.
    pub what: &'a Shape,

    /// The position of `what` in the world's object list.
    pub index: usize,

    /// The point where the intersection occurs.
    pub point: Tuple3D,

    /// A point slightly above the intersected surface. Used to prevent an
    /// object from shadowing itself (this causes "acne").
    pub over_point: Tuple3D,

    /// The unit normal at `point`, facing the side the ray came from.
    pub normalv: Tuple3D,
}

/// Two intersections are equal if their offsets are equal and they refer to
/// the same object.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.what, other.what)
    }
}

impl<'a> Intersection<'a> {
    /// Fills in a hit record from a ray, a distance and a surface normal.
    pub fn new(r: &Ray3D, t: f64, normalv: Tuple3D, what: &'a Shape,
        index: usize) -> Intersection<'a> {
        let point = r.position(t);
        let over_point = point + normalv * SHADOW_EPSILON;

        Intersection { t, what, index, point, over_point, normalv }
    }

    /// The flat color of the object that was hit.
    pub fn color(&self) -> Color {
        self.what.color
    }
}

/// Finds the nearest hit of a ray among `objects`.
///
/// Every object is tested (a linear scan). The smallest distance wins; when
/// two distances are exactly equal, the object earlier in the list wins.
pub fn closest_hit<'a>(r: &Ray3D, objects: &'a [Shape])
    -> Option<Intersection<'a>> {
    let mut best: Option<(f64, Tuple3D, usize)> = None;

    for (index, obj) in objects.iter().enumerate() {
        if let Some((t, normalv)) = obj.intersect(r) {
            match best {
                Some((best_t, _, _)) if t >= best_t => (),
                _ => best = Some((t, normalv, index)),
            }
        }
    }

    best.map(|(t, normalv, index)|
        Intersection::new(r, t, normalv, &objects[index], index)
    )
}

#[cfg(test)]
fn spheres_at(zs: &[f64]) -> Vec<Shape> {
    zs.iter().map(|&z|
        Shape::sphere(Tuple3D::new(0.0, 0.0, z), 2.0, Color::white()).unwrap()
    ).collect()
}

#[test]
fn closest_hit_prefers_nearer_object() {
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0)).unwrap();

    // Front faces at distances 3 and 5, in both orders.
    for zs in [[4.0, 6.0], [6.0, 4.0]] {
        let objects = spheres_at(&zs);
        let hit = closest_hit(&r, &objects).unwrap();

        assert_eq!(hit.t, 3.0);
        assert_eq!(objects[hit.index].position(), Tuple3D::new(0.0, 0.0, 4.0));
        assert!(std::ptr::eq(hit.what, &objects[hit.index]));
    }
}

#[test]
fn closest_hit_tie_goes_to_first_object() {
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0)).unwrap();
    let mut objects = spheres_at(&[4.0, 4.0]);
    objects[1].color = Color::black();

    let hit = closest_hit(&r, &objects).unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(hit.color(), Color::white());
}

#[test]
fn closest_hit_on_empty_list() {
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0)).unwrap();

    assert!(closest_hit(&r, &[]).is_none());
}

#[test]
fn hit_should_offset_point() {
    let r = Ray3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    ).unwrap();
    let objects = spheres_at(&[0.0]);

    let hit = closest_hit(&r, &objects).unwrap();
    assert_eq!(hit.point, Tuple3D::new(0.0, 0.0, -1.0));
    assert!(hit.over_point.z < hit.point.z);
}
