use crate::vector::Vector3;
use crate::matrix::Matrix3D;

/// A ray, `origin + t * direction`.
///
/// The direction does not need to be unit length; `t` is measured in
/// multiples of it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (self.direction * t)
    }

    /// Rotates the direction of a ray, leaving the origin in place.
    pub fn rotate(&self, m: Matrix3D) -> Ray {
        Ray {
            origin: self.origin,
            direction: m * self.direction,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_position_unnormalized() {
    let r = Ray::new(
                Vector3::zero(),
                Vector3::new(0.0, 0.0, 2.0)
            );

    assert_eq!(r.position(1.5), Vector3::new(0.0, 0.0, 3.0));
}

#[test]
fn ray_rotation() {
    let r = Ray::new(
                Vector3::new(1.0, 2.0, 3.0),
                Vector3::new(0.0, 1.0, 0.0)
            );
    let m = Matrix3D::rotation_x(std::f64::consts::PI / 2.0);
    let t = r.rotate(m);

    assert_eq!(t.origin, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(t.direction, Vector3::new(0.0, 0.0, 1.0));
}
