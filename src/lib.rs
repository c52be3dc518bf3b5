pub mod consts;
pub mod error;
pub mod logger;

pub mod tuple;
pub mod quaternion;
pub mod ray;
pub mod light;

pub mod shape;
pub mod intersect;
pub mod world;
pub mod camera;
pub mod scene;

pub mod color;
pub mod canvas;

pub mod transform;
pub mod command;
pub mod parallel;

use consts::FEQ_EPSILON;

/// Compares two floats within `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
