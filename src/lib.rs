pub mod consts;
pub mod error;

pub mod vector;
pub mod matrix;
pub mod ray;
pub mod color;

pub mod sphere;
pub mod light;
pub mod intersect;
pub mod world;

pub mod sampler;
pub mod camera;
pub mod canvas;

pub mod scene;

use consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
