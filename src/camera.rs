use log::{ info, trace };

use crate::consts::{ VIEWPORT_WIDTH, VIEWPORT_HEIGHT, PROJECTION_DISTANCE,
    REFLECTION_RECURSION_DEPTH, SAMPLE_GRID_SIZE, PRIMARY_T_MIN };
use crate::vector::Vector3;
use crate::matrix::Matrix3D;
use crate::ray::Ray;
use crate::color::Color;
use crate::world::World;
use crate::canvas::Canvas;
use crate::sampler::Supersampler;

/// A camera record for generating a canvas.
///
/// The camera is a pinhole: every primary ray leaves `position` and passes
/// through a viewport `viewport_width` by `viewport_height` units in size,
/// `projection_distance` units in front of the eye. Without a rotation the
/// camera looks down `+Z` with `+Y` up.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Where the eye sits in the world.
    pub position: Vector3,

    /// Orientation of the camera, applied to every ray direction.
    pub rotation: Option<Matrix3D>,

    pub viewport_width: f64,
    pub viewport_height: f64,
    pub projection_distance: f64,

    /// The color seen by rays that hit nothing.
    pub background: Color,

    /// How many times a ray may bounce off reflective spheres.
    pub recursion_depth: u32,

    /// Side of the supersampling grid; `2` takes four samples per pixel.
    pub samples: usize,

    /// Seed for jittering samples inside their grid cells. Without one,
    /// samples sit at the cell centers.
    pub seed: Option<u64>,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            position: Vector3::zero(),
            rotation: None,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            projection_distance: PROJECTION_DISTANCE,
            background: Color::black(),
            recursion_depth: REFLECTION_RECURSION_DEPTH,
            samples: SAMPLE_GRID_SIZE,
            seed: None,
        }
    }
}

impl Camera {
    /// Creates a camera at `position`, looking down `+Z`.
    pub fn new(position: Vector3) -> Camera {
        Camera { position, ..Default::default() }
    }

    /// Maps a centered canvas coordinate to a point on the viewport.
    ///
    /// Coordinates are in pixels and may be fractional, so sub-pixel samples
    /// go through the same mapping.
    pub fn canvas_to_viewport(&self, x: f64, y: f64, hsize: usize, vsize: usize)
        -> Vector3 {
        Vector3::new(
            x * self.viewport_width / hsize as f64,
            y * self.viewport_height / vsize as f64,
            self.projection_distance,
        )
    }

    /// Builds the primary ray through a centered canvas coordinate.
    pub fn ray_for_pixel(&self, x: f64, y: f64, hsize: usize, vsize: usize) -> Ray {
        let direction = self.canvas_to_viewport(x, y, hsize, vsize);
        let ray = Ray::new(self.position, direction);

        match self.rotation {
            Some(m) => ray.rotate(m),
            None => ray,
        }
    }

    /// Renders a world onto a new `hsize` by `vsize` canvas.
    ///
    /// Every pixel averages the colors of its supersamples, then the average
    /// is clamped as it is written to the canvas.
    pub fn render(&self, w: &World, hsize: usize, vsize: usize) -> Canvas {
        let mut image = Canvas::new(hsize, vsize);
        let mut sampler = Supersampler::new(self.samples, self.seed);

        info!("Rendering {}x{} canvas, {} samples per pixel, recursion depth {}.",
            hsize, vsize, sampler.samples_per_pixel(), self.recursion_depth);

        let mut offsets = Vec::with_capacity(sampler.samples_per_pixel());
        let mut samples = Vec::with_capacity(sampler.samples_per_pixel());
        for sy in 0..vsize {
            for sx in 0..hsize {
                let (x, y) = image.to_centered(sx, sy);

                sampler.offsets(&mut offsets);
                samples.clear();
                for &(dx, dy) in offsets.iter() {
                    let ray = self.ray_for_pixel(x as f64 + dx, y as f64 + dy,
                        hsize, vsize);
                    samples.push(w.trace_ray(&ray, PRIMARY_T_MIN, f64::INFINITY,
                        self.recursion_depth, self.background));
                }

                image.write_pixel(sx, sy, &Color::mean(&samples));
            }

            trace!("Finished row {} of {}.", sy + 1, vsize);
        }

        info!("Finished rendering.");
        image
    }
}

#[cfg(test)]
use crate::sphere::Sphere;
#[cfg(test)]
use crate::light::Light;
#[cfg(test)]
use crate::world::WorldBuilder;

#[cfg(test)]
fn red_sphere_world() -> World {
    WorldBuilder::new()
        .sphere(Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, Color::red()))
        .light(Light::ambient(1.0))
        .build()
}

#[test]
fn ray_through_center() {
    let c = Camera::default();
    let r = c.ray_for_pixel(0.0, 0.0, 100, 100);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::default();
    let r = c.ray_for_pixel(-50.0, 50.0, 100, 100);

    assert_eq!(r.direction, Vector3::new(-0.5, 0.5, 1.0));
}

#[test]
fn viewport_scales_with_aspect() {
    let mut c = Camera::default();
    c.viewport_width = 2.0;
    c.projection_distance = 1.5;

    assert_eq!(c.canvas_to_viewport(100.0, 50.0, 200, 100), Vector3::new(1.0, 0.5, 1.5));
}

#[test]
fn ray_when_camera_moved_and_rotated() {
    let mut c = Camera::new(Vector3::new(3.0, 0.0, 1.0));
    c.rotation = Some(Matrix3D::rotation_y(-std::f64::consts::PI / 2.0));
    let r = c.ray_for_pixel(0.0, 0.0, 100, 100);

    assert_eq!(r.origin, Vector3::new(3.0, 0.0, 1.0));
    assert_eq!(r.direction, Vector3::new(-1.0, 0.0, 0.0));
}

#[test]
fn render_center_pixel_hits_red_sphere() {
    let w = red_sphere_world();
    let mut c = Camera::default();
    c.samples = 1;
    c.background = Color::rgb(10.0, 20.0, 30.0);

    let image = c.render(&w, 100, 100);
    assert_eq!(image.get_pixel(0, 0).unwrap().to_rgb8(), [255, 0, 0]);
    assert_eq!(image.get_pixel(0, -20).unwrap().to_rgb8(), [255, 0, 0]);
}

#[test]
fn render_miss_is_background() {
    let w = red_sphere_world();
    let mut c = Camera::default();
    c.background = Color::rgb(10.0, 20.0, 30.0);

    let image = c.render(&w, 100, 100);
    assert_eq!(image.get_pixel(0, 40).unwrap(), Color::rgb(10.0, 20.0, 30.0));
    assert_eq!(image.get_pixel(-50, 49).unwrap(), Color::rgb(10.0, 20.0, 30.0));
}

#[test]
fn supersampling_softens_edges() {
    let w = red_sphere_world();
    let mut c = Camera::default();
    c.background = Color::black();

    // Top edge of the sphere: half of the 2x2 samples hit, half miss.
    let image = c.render(&w, 100, 100);
    assert_eq!(image.get_pixel(0, 0).unwrap(), Color::rgb(127.5, 0.0, 0.0));
}

#[test]
fn jittered_render_is_reproducible() {
    let w = red_sphere_world();
    let mut c = Camera::default();
    c.samples = 3;
    c.seed = Some(99);

    assert_eq!(c.render(&w, 24, 16), c.render(&w, 24, 16));
}
