use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::vector::Vector3;

/// A 3x3 matrix.
///
/// The ray tracer only needs these to orient the camera; a `Matrix3D`
/// rotates the viewport direction of every primary ray into world space.
/// Elements are stored row-major.
///
/// # Examples
///
/// Turning the camera 90 degrees to the left:
///
/// ```
/// # use sphere_tracer::vector::Vector3;
/// # use sphere_tracer::matrix::Matrix3D;
/// let forward = Vector3::new(0.0, 0.0, 1.0);
/// let m = Matrix3D::rotation_y(-std::f64::consts::PI / 2.0);
/// assert_eq!(m * forward, Vector3::new(-1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix3D {
    data: [f64; 9],
}

/// Determines whether two `Matrix3D`s are equal.
///
/// Matrices are compared element-wise. Note that equality is approximate, as
/// `Matrix3D` elements are floating point numbers.
impl PartialEq for Matrix3D {
    fn eq(&self, other: &Matrix3D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix3D {
    fn default() -> Matrix3D {
        Matrix3D::identity()
    }
}

impl Matrix3D {
    /// Creates a new `Matrix3D`. All elements are initialized to `0.0`.
    pub fn new() -> Matrix3D {
        Matrix3D { data: [0.0; 9] }
    }

    /// Instantiates a 3x3 identity matrix.
    pub fn identity() -> Matrix3D {
        let mut buf = [0.0; 9];
        buf[0] = 1.0; buf[4] = 1.0; buf[8] = 1.0;

        Matrix3D { data: buf }
    }

    /// Instantiates a rotation about the X axis.
    ///
    /// Assumes that parameter `r` is in radians.
    pub fn rotation_x(r: f64) -> Matrix3D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation about the Y axis.
    ///
    /// Assumes that parameter `r` is in radians. A negative angle turns a
    /// camera looking down +Z towards -X.
    pub fn rotation_y(r: f64) -> Matrix3D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation about the Z axis.
    ///
    /// Assumes that parameter `r` is in radians.
    pub fn rotation_z(r: f64) -> Matrix3D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Produces the transpose of a matrix, returning a new matrix.
    pub fn transposition(&self) -> Matrix3D {
        let mut buf = *self;

        for r in 0..3 {
            for c in (r+1)..3 {
                buf[(r, c)] = self[(c, r)];
                buf[(c, r)] = self[(r, c)];
            }
        }

        buf
    }

    /// Calculates the determinant of a `Matrix3D`.
    pub fn determinant(&self) -> f64 {
        self[(0, 0)] * (self[(1, 1)] * self[(2, 2)] - self[(1, 2)] * self[(2, 1)])
            - self[(0, 1)] * (self[(1, 0)] * self[(2, 2)] - self[(1, 2)] * self[(2, 0)])
            + self[(0, 2)] * (self[(1, 0)] * self[(2, 1)] - self[(1, 1)] * self[(2, 0)])
    }

    /// Checks whether a matrix is a proper rotation.
    ///
    /// A rotation is orthonormal (its transpose is its inverse) and keeps
    /// handedness (determinant of one). Other matrices still work as camera
    /// orientations, but they stretch or mirror the image.
    pub fn is_rotation(&self) -> bool {
        *self * self.transposition() == Matrix3D::identity()
            && feq(self.determinant(), 1.0)
    }
}

impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 3) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix3D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 3) + index.1]
    }
}

/// Multiplication between two matrices.
///
/// Note that matrix multiplication is not commutative; rotations compose
/// right to left.
impl Mul<Matrix3D> for Matrix3D {
    type Output = Matrix3D;

    fn mul(self, other: Matrix3D) -> Matrix3D {
        let mut res = Matrix3D::new();

        for r in 0..3 {
            for c in 0..3 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
            }
        }

        res
    }
}

/// Multiplication between a matrix and a `Vector3`.
///
/// Vectors are multiplied on the right, as a column.
///
/// # Examples
///
/// ```
/// # use sphere_tracer::vector::Vector3;
/// # use sphere_tracer::matrix::Matrix3D;
/// let v = Vector3::new(1.0, 4.0, 5.0);
/// let m = Matrix3D::from([2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0]);
/// assert_eq!(m * v, Vector3::new(2.0, 8.0, 10.0));
/// ```
impl Mul<Vector3> for Matrix3D {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self[(0, 0)] * other.x + self[(0, 1)] * other.y + self[(0, 2)] * other.z,
            y: self[(1, 0)] * other.x + self[(1, 1)] * other.y + self[(1, 2)] * other.z,
            z: self[(2, 0)] * other.x + self[(2, 1)] * other.y + self[(2, 2)] * other.z,
        }
    }
}

#[test]
fn identity() {
    let v = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(Matrix3D::identity() * v, v);
    assert_eq!(Matrix3D::default(), Matrix3D::identity());
}

#[test]
fn transpose() {
    let m = Matrix3D::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    let t = Matrix3D::from([1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);

    assert_eq!(m.transposition(), t);
}

#[test]
fn determinant() {
    let m = Matrix3D::from([1.0, 2.0, 6.0, -5.0, 8.0, -4.0, 2.0, 6.0, 4.0]);

    assert_eq!(m.determinant(), -196.0);
}

#[test]
fn rotation_x_quarter() {
    let v = Vector3::new(0.0, 1.0, 0.0);
    let m = Matrix3D::rotation_x(std::f64::consts::PI / 2.0);

    assert_eq!(m * v, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn rotation_y_quarter() {
    let v = Vector3::new(1.0, 0.0, 0.0);
    let m = Matrix3D::rotation_y(std::f64::consts::PI / 2.0);

    assert_eq!(m * v, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn rotation_z_quarter() {
    let v = Vector3::new(0.0, 1.0, 0.0);
    let m = Matrix3D::rotation_z(std::f64::consts::PI / 2.0);

    assert_eq!(m * v, Vector3::new(-1.0, 0.0, 0.0));
}

#[test]
fn rotations_compose() {
    let quarter = Matrix3D::rotation_z(std::f64::consts::PI / 4.0);

    assert_eq!(quarter * quarter, Matrix3D::rotation_z(std::f64::consts::PI / 2.0));
}

#[test]
fn detect_rotation() {
    assert!(Matrix3D::rotation_y(0.3).is_rotation());
    assert!((Matrix3D::rotation_x(1.0) * Matrix3D::rotation_z(-2.0)).is_rotation());

    let scale = Matrix3D::from([2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    assert!(!scale.is_rotation());

    let mirror = Matrix3D::from([-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    assert!(!mirror.is_rotation());
}
