use std::ops::{ Add, Sub, Neg, Mul, AddAssign };

use crate::feq;
use crate::consts::NORMALIZE_EPSILON;
use crate::error::{ RtError, Result };

/// A 3D tuple, used for both points and directions.
///
/// Equality is approximate: two tuples are equal if each component is within
/// `FEQ_EPSILON` of the other's.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Tuple3D {
    fn eq(&self, other: &Tuple3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Tuple3D {
    fn from(v: [f64; 3]) -> Tuple3D {
        Tuple3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl Tuple3D {
    pub fn new(x: f64, y: f64, z: f64) -> Tuple3D {
        Tuple3D { x, y, z }
    }

    pub fn zero() -> Tuple3D {
        Tuple3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// The world "up" direction, used to derive the camera basis.
    pub fn up() -> Tuple3D {
        Tuple3D { x: 0.0, y: 1.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales a tuple to unit length.
    ///
    /// Fails with `RtError::DegenerateVector` if the tuple is (nearly) zero,
    /// rather than producing NaN components.
    ///
    /// ```
    /// # use minirt::tuple::Tuple3D;
    /// let v = Tuple3D::new(0.0, 3.0, 4.0).normalize().unwrap();
    /// assert_eq!(v, Tuple3D::new(0.0, 0.6, 0.8));
    /// assert!(Tuple3D::zero().normalize().is_err());
    /// ```
    pub fn normalize(&self) -> Result<Tuple3D> {
        let mag = self.magnitude();
        if !(mag >= NORMALIZE_EPSILON) {
            return Err(RtError::DegenerateVector);
        }

        Ok(*self * (1.0 / mag))
    }

    pub fn dot(&self, other: &Tuple3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// The component of `self` perpendicular to the unit vector `axis`.
    pub fn reject(&self, axis: &Tuple3D) -> Tuple3D {
        *self - *axis * self.dot(axis)
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Tuple3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Tuple3D {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Tuple3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Tuple3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a 3D tuple.
///
/// ```
/// use minirt::tuple::Tuple3D;
///
/// let t = Tuple3D::new(1.0, 2.0, 3.0);
/// assert_eq!(t * 5.0, Tuple3D::new(5.0, 10.0, 15.0));
/// ```
impl Mul<f64> for Tuple3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a 3D tuple.
impl Mul<Tuple3D> for f64 {
    type Output = Tuple3D;

    fn mul(self, other: Tuple3D) -> Tuple3D {
        other * self
    }
}

/* Tests */

#[test]
fn add_tuples() {
    let a1 = Tuple3D::new(3.0, -2.0, 5.0);
    let a2 = Tuple3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Tuple3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_tuples() {
    let p1 = Tuple3D::new(3.0, 2.0, 1.0);
    let p2 = Tuple3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Tuple3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_fraction() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 0.5, Tuple3D::new(0.5, -1.0, 1.5));
    assert_eq!(0.5 * a, Tuple3D::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Tuple3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Tuple3D::new(1.0, 2.0, 3.0);
    let e = Tuple3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize().unwrap(), e);
}

#[test]
fn normalize_tiny_vector_is_degenerate() {
    let v = Tuple3D::new(1e-8, 0.0, -1e-8);

    assert!(matches!(v.normalize(), Err(RtError::DegenerateVector)));
}

#[test]
fn normalize_nan_vector_is_degenerate() {
    let v = Tuple3D::new(f64::NAN, 0.0, 0.0);

    assert!(v.normalize().is_err());
}

#[test]
fn dot_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Tuple3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple3D::new(1.0, -2.0, 1.0));
}

#[test]
fn reject_removes_axial_component() {
    let v = Tuple3D::new(3.0, 4.0, 5.0);
    let axis = Tuple3D::new(0.0, 1.0, 0.0);

    assert_eq!(v.reject(&axis), Tuple3D::new(3.0, 0.0, 5.0));
}
