use crate::ray::Ray3D;
use crate::tuple::Tuple3D;
use crate::color::Color;
use crate::world::World;
use crate::canvas::Canvas;
use crate::quaternion::Quaternion;
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT };
use crate::error::{ RtError, Result };

/// A camera record for generating a canvas.
///
/// The camera sits at `position` and looks along `forward`. Its `right` and
/// `up` vectors form an orthonormal basis with `forward` and are recomputed
/// every time `forward` changes, so they can be read freely while rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Tuple3D,

    /// The unit viewing direction.
    forward: Tuple3D,

    right: Tuple3D,
    up: Tuple3D,

    /// The horizontal field of view, in degrees.
    pub field_of_view: f64,
}

/// Per-frame rendering parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// The horizontal size of the resultant canvas.
    pub width: usize,

    /// The vertical size of the resultant canvas.
    pub height: usize,

    /// Samples per pixel along each axis; each pixel averages a fixed
    /// `samples * samples` grid.
    pub samples: usize,

    /// The color of rays that hit nothing.
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            samples: 1,
            background: Color::black(),
        }
    }
}

impl Camera {
    /// Creates a camera.
    ///
    /// `forward` is normalized. Fails if it is zero or points straight up or
    /// down (no basis can be derived), or if the field of view is not strictly
    /// between 0 and 180 degrees.
    pub fn new(position: Tuple3D, forward: Tuple3D, field_of_view: f64)
        -> Result<Camera> {
        if !(field_of_view > 0.0 && field_of_view < 180.0) {
            return Err(RtError::InvalidFieldOfView(field_of_view));
        }

        let forward = forward.normalize()?;
        let (right, up) = Self::basis_for(forward)?;

        Ok(Camera { position, forward, right, up, field_of_view })
    }

    /// Derives `(right, up)` from a unit forward vector and the world up.
    fn basis_for(forward: Tuple3D) -> Result<(Tuple3D, Tuple3D)> {
        let right = forward.cross(&Tuple3D::up()).normalize()?;
        let up = right.cross(&forward).normalize()?;

        Ok((right, up))
    }

    pub fn forward(&self) -> Tuple3D {
        self.forward
    }

    /// The camera's `(right, up)` basis vectors.
    pub fn basis(&self) -> (Tuple3D, Tuple3D) {
        (self.right, self.up)
    }

    /// Points the camera along a new direction, recomputing the basis.
    ///
    /// On failure the camera is left unchanged.
    pub fn set_forward(&mut self, forward: Tuple3D) -> Result<()> {
        let forward = forward.normalize()?;
        let (right, up) = Self::basis_for(forward)?;

        self.forward = forward;
        self.right = right;
        self.up = up;
        Ok(())
    }

    /// Turns the camera by the unit quaternion `q`.
    ///
    /// Fails with `RtError::DegenerateVector`, leaving the camera unchanged,
    /// if the new forward direction is parallel to the world up.
    pub fn rotate(&mut self, q: &Quaternion) -> Result<()> {
        self.set_forward(q.rotate(self.forward))
    }

    /// Maps a position on the canvas to a world-space direction.
    ///
    /// `(x, y)` is measured in pixels from the top-left corner, so the center
    /// of pixel `(px, py)` is `(px + 0.5, py + 0.5)`. The canvas is mapped onto
    /// a viewport one unit in front of the camera, `2 * tan(fov / 2)` units
    /// wide and scaled vertically by the aspect ratio. Canvas rows grow
    /// downwards while `up` points upwards.
    pub fn direction_for(&self, width: usize, height: usize, x: f64, y: f64)
        -> Result<Tuple3D> {
        let viewport_width = 2.0 * (self.field_of_view.to_radians() / 2.0).tan();
        let aspect = (width as f64) / (height as f64);
        let viewport_height = viewport_width / aspect;

        let u = (x / width as f64 - 0.5) * viewport_width;
        let v = (0.5 - y / height as f64) * viewport_height;

        (self.forward + self.right * u + self.up * v).normalize()
    }

    /// The ray through the center of pixel `(px, py)`.
    pub fn ray_for_pixel(&self, width: usize, height: usize, px: usize,
        py: usize) -> Result<Ray3D> {
        let direction = self.direction_for(width, height,
            px as f64 + 0.5, py as f64 + 0.5)?;

        Ok(self.make_ray(direction))
    }

    /// Wraps a unit direction into a ray leaving the camera.
    pub fn make_ray(&self, direction: Tuple3D) -> Ray3D {
        Ray3D { origin: self.position, direction }
    }

    /// Computes the color of one pixel.
    ///
    /// Each pixel averages a fixed `samples * samples` grid of rays, evenly
    /// spaced inside the pixel. Samples whose ray cannot be formed fall back
    /// to the background color.
    pub fn color_for_pixel(&self, world: &World, options: &RenderOptions,
        px: usize, py: usize) -> Color {
        let n = options.samples.max(1);
        let sample = |sx: usize, sy: usize| {
            let x = px as f64 + (sx as f64 + 0.5) / n as f64;
            let y = py as f64 + (sy as f64 + 0.5) / n as f64;

            match self.direction_for(options.width, options.height, x, y) {
                Ok(d) => world.color_at(&self.make_ray(d), options.background),
                Err(_) => options.background,
            }
        };

        if n == 1 {
            return sample(0, 0);
        }

        Color::mean((0..n * n).map(|i| sample(i % n, i / n)))
    }

    /// Renders the world one pixel at a time on the calling thread.
    pub fn render(&self, world: &World, options: &RenderOptions) -> Canvas {
        let mut image = Canvas::new(options.width, options.height);

        for y in 0..options.height {
            for x in 0..options.width {
                let color = self.color_for_pixel(world, options, x, y);
                image.write_pixel(x, y, &color);
            }
        }

        image
    }
}

#[cfg(test)]
fn looking_down_z() -> Camera {
    Camera::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0), 90.0).unwrap()
}

#[test]
fn basis_is_orthonormal_and_right_handed() {
    let forwards = [
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(1.0, 0.2, -0.3),
        Tuple3D::new(-4.0, -3.0, 2.0),
    ];

    for f in forwards {
        let c = Camera::new(Tuple3D::zero(), f, 70.0).unwrap();
        let (right, up) = c.basis();
        let forward = c.forward();

        assert!(crate::feq(right.magnitude(), 1.0));
        assert!(crate::feq(up.magnitude(), 1.0));
        assert!(crate::feq(right.dot(&up), 0.0));
        assert!(crate::feq(right.dot(&forward), 0.0));
        assert!(crate::feq(up.dot(&forward), 0.0));
        assert_eq!(right.cross(&forward), up);
        assert!(up.y > 0.0);
    }
}

#[test]
fn ray_through_center() {
    let c = looking_down_z();
    let r = c.ray_for_pixel(201, 101, 100, 50).unwrap();

    assert_eq!(r.origin, Tuple3D::zero());
    assert_eq!(r.direction, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_top_left_corner() {
    let c = looking_down_z();
    let r = c.direction_for(200, 100, 0.0, 0.0).unwrap();

    // Viewport is 2 wide, 1 tall; right is -x when looking down +z.
    let expected = Tuple3D::new(1.0, 0.5, 1.0).normalize().unwrap();
    assert_eq!(r, expected);
}

#[test]
fn camera_position_is_ray_origin() {
    let c = Camera::new(Tuple3D::new(1.0, 2.0, 3.0), Tuple3D::new(0.0, 0.0, -1.0),
        60.0).unwrap();
    let r = c.ray_for_pixel(10, 10, 3, 7).unwrap();

    assert_eq!(r.origin, Tuple3D::new(1.0, 2.0, 3.0));
    assert!(crate::feq(r.direction.magnitude(), 1.0));
}

#[test]
fn invalid_cameras_are_rejected() {
    let p = Tuple3D::zero();

    assert!(matches!(Camera::new(p, Tuple3D::new(0.0, 0.0, 1.0), 0.0),
        Err(RtError::InvalidFieldOfView(_))));
    assert!(Camera::new(p, Tuple3D::new(0.0, 0.0, 1.0), 180.0).is_err());
    assert!(matches!(Camera::new(p, Tuple3D::zero(), 70.0),
        Err(RtError::DegenerateVector)));
    assert!(matches!(Camera::new(p, Tuple3D::new(0.0, -2.0, 0.0), 70.0),
        Err(RtError::DegenerateVector)));
}

#[test]
fn rotating_onto_world_up_is_rejected() {
    let mut c = looking_down_z();
    let before = c.clone();
    let q = Quaternion::from_axis_angle(Tuple3D::new(1.0, 0.0, 0.0),
        -std::f64::consts::FRAC_PI_2);

    assert!(matches!(c.rotate(&q), Err(RtError::DegenerateVector)));
    assert_eq!(c, before);
}

#[test]
fn supersampling_averages_a_grid() {
    let w = World::new();
    let c = Camera::new(Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0), 90.0).unwrap();
    let single = RenderOptions { width: 11, height: 11, ..Default::default() };
    let grid = RenderOptions { samples: 3, ..single };

    // The center pixel sees the sphere; no corner sample reaches it.
    assert_ne!(c.color_for_pixel(&w, &grid, 5, 5), Color::black());
    assert_eq!(c.color_for_pixel(&w, &grid, 0, 0),
        c.color_for_pixel(&w, &single, 0, 0));
    assert_eq!(c.color_for_pixel(&w, &grid, 0, 0), Color::black());
}

#[test]
fn render_world_with_camera() {
    let w = World::new();
    let c = Camera::new(Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(0.0, 0.0, 1.0), 90.0).unwrap();
    let options = RenderOptions {
        width: 11,
        height: 11,
        samples: 1,
        background: Color::black(),
    };

    let image = c.render(&w, &options);

    // The center ray hits the outer sphere; the corner misses everything.
    assert_ne!(image.read_pixel(5, 5).unwrap(), Color::black());
    assert_eq!(image.read_pixel(0, 0).unwrap(), Color::black());
}
