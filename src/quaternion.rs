use std::ops::Mul;

use crate::feq;
use crate::consts::NORMALIZE_EPSILON;
use crate::tuple::Tuple3D;
use crate::error::{ RtError, Result };

/// A quaternion `w + xi + yj + zk`.
///
/// Unit quaternions represent rotations. Composition uses the Hamilton
/// product, which is not commutative: `q2 * q1` applies `q1` first.
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Quaternion) -> bool {
        feq(self.w, other.w) &&
            feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Quaternion {
        Quaternion { w, x, y, z }
    }

    /// The rotation that does nothing.
    #[cfg(test)]
    pub fn identity() -> Quaternion {
        Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Creates a rotation of `angle` radians about `axis`.
    ///
    /// The axis must already be unit length; callers normalize it first.
    ///
    /// ```
    /// # use minirt::quaternion::Quaternion;
    /// # use minirt::tuple::Tuple3D;
    /// let q = Quaternion::from_axis_angle(
    ///     Tuple3D::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
    /// let v = q.rotate(Tuple3D::new(1.0, 0.0, 0.0));
    /// assert_eq!(v, Tuple3D::new(0.0, 1.0, 0.0));
    /// ```
    pub fn from_axis_angle(axis: Tuple3D, angle: f64) -> Quaternion {
        let half = angle / 2.0;
        let s = half.sin();

        Quaternion {
            w: half.cos(),
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
        }
    }

    /// The vector (imaginary) part.
    pub fn vector(&self) -> Tuple3D {
        Tuple3D::new(self.x, self.y, self.z)
    }

    pub fn conjugate(&self) -> Quaternion {
        Quaternion { w: self.w, x: -self.x, y: -self.y, z: -self.z }
    }

    pub fn norm(&self) -> f64 {
        (self.w.powi(2) + self.x.powi(2) + self.y.powi(2) + self.z.powi(2))
            .sqrt()
    }

    /// Rescales to unit norm, countering drift from repeated composition.
    pub fn normalize(&self) -> Result<Quaternion> {
        let n = self.norm();
        if !(n >= NORMALIZE_EPSILON) {
            return Err(RtError::DegenerateVector);
        }

        Ok(Quaternion {
            w: self.w / n,
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
        })
    }

    /// Rotates `v` by this quaternion, computing `q * (0, v) * q*`.
    ///
    /// Only meaningful for unit quaternions, whose conjugate is their inverse.
    pub fn rotate(&self, v: Tuple3D) -> Tuple3D {
        let pure = Quaternion { w: 0.0, x: v.x, y: v.y, z: v.z };
        (*self * pure * self.conjugate()).vector()
    }
}

/// The Hamilton product.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, other: Quaternion) -> Quaternion {
        let v1 = self.vector();
        let v2 = other.vector();

        let w = self.w * other.w - v1.dot(&v2);
        let v = v2 * self.w + v1 * other.w + v1.cross(&v2);

        Quaternion { w, x: v.x, y: v.y, z: v.z }
    }
}

/* Tests */

#[cfg(test)]
fn sample_vectors() -> Vec<Tuple3D> {
    vec![
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, -2.5, 0.0),
        Tuple3D::new(3.0, 4.0, -5.0),
        Tuple3D::new(-0.3, 0.7, 12.0),
    ]
}

#[cfg(test)]
fn sample_axes() -> Vec<Tuple3D> {
    vec![
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
        Tuple3D::new(0.0, 0.0, -1.0),
        Tuple3D::new(1.0, 1.0, 1.0).normalize().unwrap(),
        Tuple3D::new(-2.0, 0.5, 3.0).normalize().unwrap(),
    ]
}

#[test]
fn zero_rotation_is_identity() {
    for axis in sample_axes() {
        let q = Quaternion::from_axis_angle(axis, 0.0);
        for v in sample_vectors() {
            assert_eq!(q.rotate(v), v);
        }
    }
}

#[test]
fn rotation_preserves_magnitude() {
    for axis in sample_axes() {
        for angle in [0.3, 1.0, -2.2, std::f64::consts::PI, 5.9] {
            let q = Quaternion::from_axis_angle(axis, angle);
            for v in sample_vectors() {
                assert!(feq(q.rotate(v).magnitude(), v.magnitude()));
            }
        }
    }
}

#[test]
fn rotation_then_inverse_returns_original() {
    for axis in sample_axes() {
        let forward = Quaternion::from_axis_angle(axis, 0.7);
        let backward = Quaternion::from_axis_angle(axis, -0.7);
        for v in sample_vectors() {
            assert_eq!(backward.rotate(forward.rotate(v)), v);
        }
    }
}

#[test]
fn composition_applies_right_to_left() {
    let x = Quaternion::from_axis_angle(
        Tuple3D::new(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
    let y = Quaternion::from_axis_angle(
        Tuple3D::new(0.0, 1.0, 0.0), std::f64::consts::FRAC_PI_2);
    let v = Tuple3D::new(0.0, 0.0, 1.0);

    // x first: (0,0,1) -> (0,-1,0); y leaves it alone.
    assert_eq!((y * x).rotate(v), Tuple3D::new(0.0, -1.0, 0.0));
    // y first: (0,0,1) -> (1,0,0); x leaves it alone.
    assert_eq!((x * y).rotate(v), Tuple3D::new(1.0, 0.0, 0.0));
}

#[test]
fn hamilton_product_of_basis_units() {
    let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
    let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
    let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    assert_eq!(i * j, k);
    assert_eq!(j * i, Quaternion::new(0.0, 0.0, 0.0, -1.0));
    assert_eq!(i * i, Quaternion::new(-1.0, 0.0, 0.0, 0.0));
}

#[test]
fn normalize_counters_drift() {
    let step = Quaternion::from_axis_angle(
        Tuple3D::new(0.0, 1.0, 0.0), 1.0f64.to_radians());
    let mut q = Quaternion::identity();
    for _ in 0..360 {
        q = (step * q).normalize().unwrap();
    }

    assert!(feq(q.norm(), 1.0));
    assert_eq!(q.rotate(Tuple3D::new(1.0, 2.0, 3.0)), Tuple3D::new(1.0, 2.0, 3.0));
}

#[test]
fn normalize_zero_quaternion_fails() {
    let q = Quaternion::new(0.0, 0.0, 0.0, 0.0);

    assert!(matches!(q.normalize(), Err(RtError::DegenerateVector)));
}
