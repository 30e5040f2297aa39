use std::convert::TryFrom;
use std::fs;
use std::mem;
use std::path::Path;

use log::{ debug, info, warn };
use serde::{ Serialize, Deserialize };

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, VIEWPORT_WIDTH, VIEWPORT_HEIGHT,
    PROJECTION_DISTANCE, REFLECTION_RECURSION_DEPTH, SAMPLE_GRID_SIZE };
use crate::error::{ Result, SceneError };
use crate::vector::Vector3;
use crate::matrix::Matrix3D;
use crate::color::Color;
use crate::sphere::Sphere;
use crate::light::Light;
use crate::world::{ World, WorldBuilder };
use crate::camera::Camera;
use crate::canvas::Canvas;

/// Everything needed to produce an image: what to draw, where to look from,
/// and how large the result should be.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub canvas_width: usize,
    pub canvas_height: usize,
}

impl Scene {
    /// Parses a JSON scene description.
    pub fn from_json(text: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(text)?;
        Scene::try_from(scene_json)
    }

    /// Reads and parses a JSON scene description from disk.
    pub fn load(path: &Path) -> Result<Scene> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let scene = Scene::from_json(&text)?;
        info!("Loaded scene {} ({} spheres, {} lights).", path.display(),
            scene.world.spheres().len(), scene.world.lights().len());

        Ok(scene)
    }

    /// A small showcase: three glossy spheres resting on a huge yellow one,
    /// lit by one light of each kind, seen from a camera turned 45 degrees.
    pub fn demo() -> Scene {
        let world = WorldBuilder::new()
            .sphere(Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, Color::red())
                .with_specular(500.0).with_reflective(0.2))
            .sphere(Sphere::new(Vector3::new(2.0, 0.0, 4.0), 1.0, Color::blue())
                .with_specular(500.0).with_reflective(0.3))
            .sphere(Sphere::new(Vector3::new(-2.0, 0.0, 4.0), 1.0, Color::green())
                .with_specular(10.0).with_reflective(0.4))
            .sphere(Sphere::new(Vector3::new(0.0, -5001.0, 0.0), 5000.0,
                Color::rgb(255.0, 255.0, 0.0))
                .with_specular(1000.0).with_reflective(0.5))
            .light(Light::ambient(0.2))
            .light(Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)))
            .light(Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0)))
            .build();

        let mut camera = Camera::new(Vector3::new(3.0, 0.0, 1.0));
        camera.rotation = Some(Matrix3D::rotation_y(-std::f64::consts::FRAC_PI_4));
        camera.background = Color::white();

        Scene {
            world,
            camera,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }

    /// Checks that the configured canvas is non-empty and small enough to
    /// allocate. Call again after changing the size by hand.
    pub fn check_canvas(&self) -> Result<()> {
        check_canvas_size(self.canvas_width, self.canvas_height)
    }

    /// Renders the scene at its configured size.
    pub fn render(&self) -> Canvas {
        self.camera.render(&self.world, self.canvas_width, self.canvas_height)
    }
}

/// The on-disk layout of a scene description.
#[derive(Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default = "default_canvas_width")]
    canvas_width: usize,
    #[serde(default = "default_canvas_height")]
    canvas_height: usize,

    #[serde(default)]
    camera: CameraJson,

    #[serde(default)]
    background: Vec<f64>,
    #[serde(default = "default_recursion_depth")]
    recursion_depth: u32,
    #[serde(default = "default_samples")]
    samples: usize,
    #[serde(default)]
    seed: Option<u64>,

    #[serde(default)]
    spheres: Vec<SphereJson>,
    #[serde(default)]
    lights: Vec<LightJson>,
}

#[derive(Clone, Serialize, Deserialize)]
struct CameraJson {
    #[serde(default)]
    position: Vec<f64>,
    #[serde(default)]
    rotation: Option<Vec<f64>>,
    #[serde(default = "default_viewport_width")]
    viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    viewport_height: f64,
    #[serde(default = "default_projection_distance")]
    projection_distance: f64,
}

impl Default for CameraJson {
    fn default() -> CameraJson {
        CameraJson {
            position: Vec::new(),
            rotation: None,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            projection_distance: PROJECTION_DISTANCE,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct SphereJson {
    center: Vec<f64>,
    radius: f64,
    color: Vec<f64>,
    #[serde(default)]
    specular: Option<f64>,
    #[serde(default)]
    reflective: f64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LightJson {
    Ambient { intensity: f64 },
    Point { intensity: f64, position: Vec<f64> },
    Directional { intensity: f64, direction: Vec<f64> },
}

fn default_canvas_width() -> usize { CANVAS_WIDTH }
fn default_canvas_height() -> usize { CANVAS_HEIGHT }
fn default_recursion_depth() -> u32 { REFLECTION_RECURSION_DEPTH }
fn default_samples() -> usize { SAMPLE_GRID_SIZE }
fn default_viewport_width() -> f64 { VIEWPORT_WIDTH }
fn default_viewport_height() -> f64 { VIEWPORT_HEIGHT }
fn default_projection_distance() -> f64 { PROJECTION_DISTANCE }

fn check_canvas_size(width: usize, height: usize) -> Result<()> {
    let fits = width.checked_mul(height)
        .and_then(|n| n.checked_mul(mem::size_of::<Color>()))
        .map_or(false, |bytes| bytes <= isize::MAX as usize);

    if width == 0 || height == 0 || !fits {
        return Err(SceneError::InvalidCanvas { width, height });
    }

    Ok(())
}

/// Reads three components out of a JSON array.
fn vector3(field: &str, v: &[f64]) -> Result<Vector3> {
    match *v {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(SceneError::Arity {
            field: field.to_string(),
            expected: 3,
            found: v.len(),
        }),
    }
}

/// Reads a color, treating an empty array as black.
fn color(field: &str, v: &[f64]) -> Result<Color> {
    if v.is_empty() {
        return Ok(Color::black());
    }

    let c = vector3(field, v)?;
    Ok(Color::rgb(c.x, c.y, c.z))
}

/// Validates one sphere entry, describing what is wrong on failure.
fn sphere_from_json(sphere_json: SphereJson) -> std::result::Result<Sphere, String> {
    let center = vector3("center", &sphere_json.center)
        .map_err(|e| e.to_string())?;
    let color = color("color", &sphere_json.color)
        .map_err(|e| e.to_string())?;

    if !(sphere_json.radius > 0.0 && sphere_json.radius.is_finite()) {
        return Err(format!("radius must be positive, found {}", sphere_json.radius));
    }

    if !(0.0..=1.0).contains(&sphere_json.reflective) {
        return Err(format!("reflective must lie in [0, 1], found {}",
            sphere_json.reflective));
    }

    // -1 is the legacy spelling of "no highlight".
    let specular = match sphere_json.specular {
        Some(s) if s == -1.0 => {
            debug!("Reading specular -1 as no highlight.");
            None
        },
        Some(s) if !(s >= 0.0) => {
            return Err(format!(
                "specular exponent must be non-negative, found {} (use null for none)", s));
        },
        specular => specular,
    };

    Ok(Sphere {
        center,
        radius: sphere_json.radius,
        color,
        specular,
        reflective: sphere_json.reflective,
    })
}

fn light_from_json(light_json: LightJson) -> std::result::Result<Light, String> {
    let light = match light_json {
        LightJson::Ambient { intensity } => Light::ambient(intensity),
        LightJson::Point { intensity, position } => {
            let position = vector3("position", &position)
                .map_err(|e| e.to_string())?;
            Light::point(intensity, position)
        },
        LightJson::Directional { intensity, direction } => {
            let direction = vector3("direction", &direction)
                .map_err(|e| e.to_string())?;
            if direction.length() == 0.0 {
                return Err("direction must not be the zero vector".to_string());
            }

            Light::directional(intensity, direction)
        },
    };

    if !(light.intensity() >= 0.0) {
        return Err(format!("intensity must be non-negative, found {}",
            light.intensity()));
    }

    Ok(light)
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        check_canvas_size(scene_json.canvas_width, scene_json.canvas_height)?;

        // Create the camera.
        let cam = scene_json.camera;
        let position = if cam.position.is_empty() {
            Vector3::zero()
        } else {
            vector3("camera.position", &cam.position)?
        };

        let rotation = match cam.rotation {
            None => None,
            Some(values) => {
                if values.len() != 9 {
                    return Err(SceneError::Arity {
                        field: "camera.rotation".to_string(),
                        expected: 9,
                        found: values.len(),
                    });
                }

                let mut data = [0.0; 9];
                data.copy_from_slice(&values);
                let m = Matrix3D::from(data);
                if !m.is_rotation() {
                    warn!("Camera rotation is not orthonormal; the image will be distorted.");
                }

                Some(m)
            },
        };

        for (name, value) in [
            ("viewport_width", cam.viewport_width),
            ("viewport_height", cam.viewport_height),
            ("projection_distance", cam.projection_distance),
        ].iter() {
            if !(*value > 0.0) {
                return Err(SceneError::InvalidCamera(
                    format!("{} must be positive, found {}", name, value)));
            }
        }

        if scene_json.samples == 0 {
            return Err(SceneError::InvalidCamera(
                "samples must be at least 1".to_string()));
        }

        let camera = Camera {
            position,
            rotation,
            viewport_width: cam.viewport_width,
            viewport_height: cam.viewport_height,
            projection_distance: cam.projection_distance,
            background: color("background", &scene_json.background)?,
            recursion_depth: scene_json.recursion_depth,
            samples: scene_json.samples,
            seed: scene_json.seed,
        };

        // Create the world.
        let mut builder = WorldBuilder::new();
        for (index, sphere_json) in scene_json.spheres.into_iter().enumerate() {
            let sphere = sphere_from_json(sphere_json)
                .map_err(|reason| SceneError::InvalidSphere { index, reason })?;
            builder = builder.sphere(sphere);
        }

        for (index, light_json) in scene_json.lights.into_iter().enumerate() {
            let light = light_from_json(light_json)
                .map_err(|reason| SceneError::InvalidLight { index, reason })?;
            builder = builder.light(light);
        }

        debug!("Camera at {:?}, {} samples per pixel.", camera.position,
            camera.samples * camera.samples);

        Ok(Scene {
            world: builder.build(),
            camera,
            canvas_width: scene_json.canvas_width,
            canvas_height: scene_json.canvas_height,
        })
    }
}

#[test]
fn demo_file_matches_builtin_demo() {
    let scene = Scene::from_json(include_str!("../scenes/demo.json")).unwrap();

    assert_eq!(scene, Scene::demo());
}

#[test]
fn minimal_scene_uses_defaults() {
    let scene = Scene::from_json("{}").unwrap();

    assert_eq!(scene.canvas_width, CANVAS_WIDTH);
    assert_eq!(scene.canvas_height, CANVAS_HEIGHT);
    assert_eq!(scene.camera, Camera::default());
    assert_eq!(scene.world, World::empty());
}

#[test]
fn parse_each_light_kind() {
    let scene = Scene::from_json(r#"{
        "lights": [
            { "type": "ambient", "intensity": 0.2 },
            { "type": "point", "intensity": 0.6, "position": [2, 1, 0] },
            { "type": "directional", "intensity": 0.2, "direction": [1, 4, 4] }
        ]
    }"#).unwrap();

    assert_eq!(scene.world.lights(), &[
        Light::ambient(0.2),
        Light::point(0.6, Vector3::new(2.0, 1.0, 0.0)),
        Light::directional(0.2, Vector3::new(1.0, 4.0, 4.0)),
    ]);
}

#[test]
fn specular_null_means_matte() {
    let scene = Scene::from_json(r#"{
        "spheres": [
            { "center": [0, 0, 3], "radius": 1, "color": [255, 0, 0], "specular": null },
            { "center": [0, 0, 6], "radius": 1, "color": [255, 0, 0], "specular": 20 }
        ]
    }"#).unwrap();

    assert_eq!(scene.world.spheres()[0].specular, None);
    assert_eq!(scene.world.spheres()[1].specular, Some(20.0));
    assert_eq!(scene.world.spheres()[1].reflective, 0.0);
}

#[test]
fn specular_minus_one_means_matte() {
    let scene = Scene::from_json(r#"{
        "spheres": [
            { "center": [0, 0, 3], "radius": 1, "color": [255, 0, 0], "specular": -1 }
        ]
    }"#).unwrap();

    assert_eq!(scene.world.spheres()[0].specular, None);
}

#[test]
fn reject_bad_vector() {
    let err = Scene::from_json(r#"{
        "spheres": [{ "center": [0, 0], "radius": 1, "color": [255, 0, 0] }]
    }"#).unwrap_err();

    match err {
        SceneError::InvalidSphere { index, .. } => assert_eq!(index, 0),
        e => panic!("Unexpected error: {}", e),
    }
}

#[test]
fn reject_bad_sphere_values() {
    let bad = [
        r#"{ "spheres": [{ "center": [0, 0, 3], "radius": 0, "color": [1, 1, 1] }] }"#,
        r#"{ "spheres": [{ "center": [0, 0, 3], "radius": 1, "color": [1, 1, 1], "reflective": 1.5 }] }"#,
        r#"{ "spheres": [{ "center": [0, 0, 3], "radius": 1, "color": [1, 1, 1], "specular": -5 }] }"#,
    ];

    for text in bad.iter() {
        assert!(matches!(Scene::from_json(text), Err(SceneError::InvalidSphere { .. })));
    }
}

#[test]
fn reject_bad_lights() {
    let negative = r#"{ "lights": [{ "type": "ambient", "intensity": -0.5 }] }"#;
    let zero_direction = r#"{ "lights": [
        { "type": "ambient", "intensity": 0.5 },
        { "type": "directional", "intensity": 0.5, "direction": [0, 0, 0] }
    ] }"#;

    assert!(matches!(Scene::from_json(negative),
        Err(SceneError::InvalidLight { index: 0, .. })));
    assert!(matches!(Scene::from_json(zero_direction),
        Err(SceneError::InvalidLight { index: 1, .. })));
}

#[test]
fn reject_unknown_light_kind() {
    let text = r#"{ "lights": [{ "type": "spot", "intensity": 0.5 }] }"#;

    assert!(matches!(Scene::from_json(text), Err(SceneError::Parse(_))));
}

#[test]
fn reject_bad_camera() {
    let rotation = r#"{ "camera": { "rotation": [1, 0, 0, 0, 1, 0] } }"#;
    let viewport = r#"{ "camera": { "viewport_width": 0 } }"#;
    let samples = r#"{ "samples": 0 }"#;
    let canvas = r#"{ "canvas_width": 0 }"#;

    assert!(matches!(Scene::from_json(rotation),
        Err(SceneError::Arity { expected: 9, found: 6, .. })));
    assert!(matches!(Scene::from_json(viewport), Err(SceneError::InvalidCamera(_))));
    assert!(matches!(Scene::from_json(samples), Err(SceneError::InvalidCamera(_))));
    assert!(matches!(Scene::from_json(canvas), Err(SceneError::InvalidCanvas { .. })));
}

#[test]
fn reject_unallocatable_canvas() {
    let huge = r#"{ "canvas_width": 4000000000, "canvas_height": 4000000000 }"#;

    assert!(matches!(Scene::from_json(huge), Err(SceneError::InvalidCanvas { .. })));
}

#[test]
fn check_canvas_after_resize() {
    let mut scene = Scene::demo();
    assert!(scene.check_canvas().is_ok());

    scene.canvas_width = usize::MAX / 2;
    scene.canvas_height = 3;
    assert!(matches!(scene.check_canvas(),
        Err(SceneError::InvalidCanvas { height: 3, .. })));

    scene.canvas_width = 0;
    assert!(scene.check_canvas().is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = Scene::load(Path::new("./does/not/exist.json")).unwrap_err();

    assert!(matches!(err, SceneError::Io { .. }));
    assert!(err.to_string().contains("exist.json"));
}

#[test]
fn end_to_end_red_sphere() {
    let mut scene = Scene::from_json(r#"{
        "canvas_width": 100, "canvas_height": 100,
        "background": [0, 0, 255], "samples": 1,
        "spheres": [{ "center": [0, -1, 3], "radius": 1, "color": [255, 0, 0] }],
        "lights": [{ "type": "ambient", "intensity": 1 }]
    }"#).unwrap();
    scene.camera.recursion_depth = 0;

    let image = scene.render();
    assert_eq!(image.get_pixel(0, 0).unwrap().to_rgb8(), [255, 0, 0]);
    assert_eq!(image.get_pixel(0, 45).unwrap().to_rgb8(), [0, 0, 255]);
}
