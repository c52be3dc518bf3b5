//! Rigid transforms applied to a scene in place.
//!
//! Rotations are built from an axis and an angle as unit quaternions, and are
//! renormalized before use so that long runs of small steps do not drift.
//! Every operation either applies completely or leaves the scene untouched.

use crate::tuple::Tuple3D;
use crate::quaternion::Quaternion;
use crate::shape::{ Shape, ShapeKind };
use crate::scene::Scene;
use crate::error::Result;

/// Selects which shapes an operation applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeFilter {
    All,
    Only(ShapeKind),
}

impl ShapeFilter {
    pub fn matches(&self, shape: &Shape) -> bool {
        match self {
            ShapeFilter::All => true,
            ShapeFilter::Only(kind) => shape.kind() == *kind,
        }
    }
}

/// Builds the unit quaternion for a rotation of `angle` radians about `axis`.
fn rotation(axis: Tuple3D, angle: f64) -> Result<Quaternion> {
    Quaternion::from_axis_angle(axis.normalize()?, angle).normalize()
}

/// Rotates every shape matching `filter` by `angle` radians about `axis`.
///
/// See `Shape::rotated` for how each kind of shape turns. Fails with
/// `RtError::DegenerateVector` on a zero axis, or if any rotated direction
/// degenerates; the scene is then unchanged.
pub fn rotate_shapes(scene: &mut Scene, filter: ShapeFilter, axis: Tuple3D,
    angle: f64) -> Result<()> {
    let q = rotation(axis, angle)?;

    let rotated = scene.world.objects.iter()
        .enumerate()
        .filter(|(_, shape)| filter.matches(shape))
        .map(|(i, shape)| shape.rotated(&q).map(|ty| (i, ty)))
        .collect::<Result<Vec<_>>>()?;

    for (i, ty) in rotated {
        scene.world.objects[i].ty = ty;
    }

    Ok(())
}

/// Turns the camera by `angle` radians about `axis`.
///
/// The forward direction is rotated and the right/up basis rebuilt from it.
/// Fails with `RtError::DegenerateVector`, leaving the camera unchanged, if the
/// camera would end up looking straight up or down.
pub fn rotate_camera(scene: &mut Scene, axis: Tuple3D, angle: f64)
    -> Result<()> {
    let q = rotation(axis, angle)?;
    scene.camera.rotate(&q)
}

/// Moves every shape matching `filter` by `delta`.
pub fn translate_shapes(scene: &mut Scene, filter: ShapeFilter,
    delta: Tuple3D) {
    scene.world.objects.iter_mut()
        .filter(|shape| filter.matches(shape))
        .for_each(|shape| shape.translate(delta));
}

/// Moves the point light by `delta`.
pub fn translate_light(scene: &mut Scene, delta: Tuple3D) {
    scene.world.light_source.position += delta;
}

/// Moves the camera by `delta` without changing where it looks.
pub fn translate_camera(scene: &mut Scene, delta: Tuple3D) {
    scene.camera.position += delta;
}

#[cfg(test)]
use crate::shape::ShapeType;

#[cfg(test)]
fn test_scene() -> Scene {
    Scene::from_rt_str("\
A 0.1 255,255,255
C 0,0,-10 0,0,1 60
L 0,10,-10 0.7
sp 1,2,3 1 255,0,0
pl 0,-1,0 0,1,0 0,255,0
cy 2,0,5 0,1,0 1 4 0,0,255
").unwrap()
}

#[test]
fn cylinder_full_turn_keeps_center() {
    let axes = [
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, -1.0, 0.0),
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(1.0, 2.0, -0.5),
    ];

    for axis in axes {
        let mut scene = test_scene();
        let original = scene.world.objects[2].clone();
        let center = original.cylinder_center().unwrap();
        let step = 1.0f64.to_radians();

        for _ in 0..360 {
            rotate_shapes(&mut scene, ShapeFilter::Only(ShapeKind::Cylinder),
                axis, step).unwrap();
            assert_eq!(scene.world.objects[2].cylinder_center().unwrap(),
                center);
        }

        assert_eq!(scene.world.objects[2], original);
    }
}

#[test]
fn cylinder_filter_leaves_other_shapes() {
    let mut scene = test_scene();
    let before = scene.clone();

    rotate_shapes(&mut scene, ShapeFilter::Only(ShapeKind::Cylinder),
        Tuple3D::new(1.0, 0.0, 0.0), 0.5).unwrap();

    assert_eq!(scene.world.objects[0], before.world.objects[0]);
    assert_eq!(scene.world.objects[1], before.world.objects[1]);
    assert_ne!(scene.world.objects[2], before.world.objects[2]);
}

#[test]
fn rotate_all_turns_spheres_about_origin() {
    let mut scene = test_scene();
    let center = scene.world.objects[2].cylinder_center().unwrap();

    rotate_shapes(&mut scene, ShapeFilter::All, Tuple3D::new(0.0, 0.0, 1.0),
        std::f64::consts::FRAC_PI_2).unwrap();

    assert_eq!(scene.world.objects[0].position(), Tuple3D::new(-2.0, 1.0, 3.0));
    assert_eq!(scene.world.objects[1].position(), Tuple3D::new(1.0, 0.0, 0.0));
    assert_eq!(scene.world.objects[2].cylinder_center().unwrap(), center);
}

#[test]
fn rotate_all_slides_planes_without_tilting() {
    let mut scene = test_scene();
    let normal_of = |scene: &Scene| match scene.world.objects[1].ty {
        ShapeType::Plane { normal, .. } => (normal.x, normal.y, normal.z),
        _ => panic!("expected a plane"),
    };
    let before = normal_of(&scene);

    rotate_shapes(&mut scene, ShapeFilter::All, Tuple3D::new(1.0, 0.0, 0.0),
        std::f64::consts::FRAC_PI_2).unwrap();

    assert_eq!(scene.world.objects[1].position(), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(normal_of(&scene), before);
}

#[test]
fn rotate_with_zero_axis_changes_nothing() {
    let mut scene = test_scene();
    let before = scene.clone();

    assert!(rotate_shapes(&mut scene, ShapeFilter::All, Tuple3D::zero(), 1.0)
        .is_err());
    assert_eq!(scene, before);
}

#[test]
fn camera_turns_and_keeps_basis() {
    let mut scene = test_scene();

    rotate_camera(&mut scene, Tuple3D::new(0.0, 1.0, 0.0),
        std::f64::consts::FRAC_PI_2).unwrap();

    assert_eq!(scene.camera.forward(), Tuple3D::new(1.0, 0.0, 0.0));
    let (right, up) = scene.camera.basis();
    assert_eq!(right, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(up, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn camera_refuses_to_look_straight_up() {
    let mut scene = test_scene();
    let before = scene.camera.clone();

    let result = rotate_camera(&mut scene, Tuple3D::new(1.0, 0.0, 0.0),
        -std::f64::consts::FRAC_PI_2);

    assert!(result.is_err());
    assert_eq!(scene.camera, before);
}

#[test]
fn translations_move_positions() {
    let mut scene = test_scene();
    let delta = Tuple3D::new(0.0, 0.1, 0.0);
    let forward = scene.camera.forward();

    translate_shapes(&mut scene, ShapeFilter::All, delta);
    translate_light(&mut scene, delta);
    translate_camera(&mut scene, delta);

    assert_eq!(scene.world.objects[0].position(), Tuple3D::new(1.0, 2.1, 3.0));
    assert_eq!(scene.world.objects[1].position(), Tuple3D::new(0.0, -0.9, 0.0));
    assert_eq!(scene.world.light_source.position,
        Tuple3D::new(0.0, 10.1, -10.0));
    assert_eq!(scene.camera.position, Tuple3D::new(0.0, 0.1, -10.0));
    assert_eq!(scene.camera.forward(), forward);

    translate_shapes(&mut scene, ShapeFilter::Only(ShapeKind::Sphere), delta);
    assert_eq!(scene.world.objects[0].position(), Tuple3D::new(1.0, 2.2, 3.0));
    assert_eq!(scene.world.objects[1].position(), Tuple3D::new(0.0, -0.9, 0.0));
    assert_eq!(scene.world.objects[2].position(), Tuple3D::new(2.0, -1.9, 5.0));
}
