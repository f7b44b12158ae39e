use std::fs;
use std::path::{ Path, PathBuf };

use log::info;
use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::consts::{
    MAX_TRACE_DEPTH, AO_SAMPLES, AO_MAX_DISTANCE, AO_REFLECTION_WEIGHT,
    DEFAULT_FOV_DEGREES, DEFAULT_Z_PLANE,
};
use crate::error::{ RenderError, RenderResult };
use crate::geometry::{ BoundingSphere, TriangleInfo };
use crate::light::{ PointLight, Material };
use crate::matrix::Matrix4D;
use crate::matrix_stack::MatrixStack;
use crate::mesh::Mesh;
use crate::obj::ObjParser;
use crate::scene_graph::SceneGraph;
use crate::shape::Shape;
use crate::texture::Texture;
use crate::vector::Vector3;
use crate::world::World;

/// Which per-pixel algorithm shades the scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Blinn-Phong with hard shadows and mirror reflection.
    Whitted,

    /// As `Whitted`, with the ambient term attenuated by sampled ambient
    /// occlusion.
    AmbientOcclusion,
}

impl Default for Integrator {
    fn default() -> Integrator {
        Integrator::Whitted
    }
}

/// Knobs for a single render.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rays at this many bounces or more are black.
    pub max_depth: usize,

    /// When false, every light reaches every surface.
    pub shadows: bool,

    pub integrator: Integrator,

    pub ao_samples: usize,
    pub ao_max_distance: f64,

    /// Weight of the reflected color on reflective surfaces under ambient
    /// occlusion. The material's own reflectiveness only decides whether a
    /// surface reflects at all.
    pub ao_reflection_weight: f64,

    /// Seeds the ambient occlusion sampler.
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            max_depth: MAX_TRACE_DEPTH,
            shadows: true,
            integrator: Integrator::Whitted,
            ao_samples: AO_SAMPLES,
            ao_max_distance: AO_MAX_DISTANCE,
            ao_reflection_weight: AO_REFLECTION_WEIGHT,
            seed: 0,
        }
    }
}

/// Everything needed to make an image.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub world: World,
    pub options: RenderOptions,
}

impl Scene {
    /// Builds one of the numbered scenes at `size` x `size` pixels.
    ///
    /// Meshes and textures are read from `resources`. Bad ids and sizes are
    /// rejected before anything is loaded.
    pub fn builtin<P: AsRef<Path>>(id: u32, size: u32, resources: P)
        -> RenderResult<Scene> {
        let size = check_size(size)?;
        let resources = resources.as_ref();

        let scene = match id {
            1 => spheres(size, false),
            2 => spheres(size, true),
            3 => ellipsoid_and_planes(size),
            4 => mirrors(size),
            5 => obj_mesh(size, &resources.join("bunny.obj"))?,
            6 => textured(size, &resources.join("earth.jpg"))?,
            7 => figure(size)?,
            8 => occlusion(size)?,
            9 => lone_plane(size),
            _ => return Err(RenderError::UnknownScene(id)),
        };

        info!("scene {}: {} shapes, {} lights", id,
            scene.world.objects.len(), scene.world.lights.len());
        Ok(scene)
    }

    /// Reads a JSON scene description. Relative mesh and texture paths are
    /// resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P, size: u32) -> RenderResult<Scene> {
        let path = path.as_ref();
        let size = check_size(size)?;

        let json = fs::read_to_string(path)
            .map_err(|source| RenderError::Io { path: path.to_path_buf(), source })?;
        let description: SceneDescription = serde_json::from_str(&json)
            .map_err(|source| RenderError::SceneFile { path: path.to_path_buf(), source })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let scene = description.build(size, base)?;

        info!("scene {}: {} shapes, {} lights", path.display(),
            scene.world.objects.len(), scene.world.lights.len());
        Ok(scene)
    }

    pub fn render(&self) -> Canvas {
        self.camera.render(&self.world, &self.options)
    }
}

fn check_size(size: u32) -> RenderResult<usize> {
    if size == 0 {
        return Err(RenderError::InvalidImageSize(size));
    }

    Ok(size as usize)
}

fn default_camera(size: usize) -> Camera {
    Camera::along_z(size, size, DEFAULT_FOV_DEGREES, Vector3::new(0.0, 0.0, 5.0),
        DEFAULT_Z_PLANE)
}

fn shiny(diffuse: Color) -> Material {
    Material::new(diffuse, Color::rgb(1.0, 1.0, 0.5), Color::grey(0.1), 100.0)
}

fn matte(diffuse: Color) -> Material {
    Material::new(diffuse, Color::black(), Color::grey(0.1), 1.0)
}

/// Red, green and blue spheres lit from the upper left.
fn spheres(size: usize, shadows: bool) -> Scene {
    let mut world = World::new();
    world.add(Shape::sphere(Vector3::new(-0.5, -1.0, 1.0), 1.0)
        .with_material(shiny(Color::red())));
    world.add(Shape::sphere(Vector3::new(0.5, -1.0, -1.0), 1.0)
        .with_material(shiny(Color::green())));
    world.add(Shape::sphere(Vector3::new(0.0, 1.0, 0.0), 1.0)
        .with_material(shiny(Color::blue())));
    world.add_light(PointLight::new(Vector3::new(-2.0, 1.0, 1.0), 1.0));

    Scene {
        camera: default_camera(size),
        world,
        options: RenderOptions { shadows, ..Default::default() },
    }
}

fn ellipsoid_and_planes(size: usize) -> Scene {
    let mut world = World::new();
    world.add(Shape::ellipsoid(Vector3::new(0.5, 0.0, 0.5), Vector3::new(0.5, 0.6, 0.2))
        .with_material(shiny(Color::red())));
    world.add(Shape::sphere(Vector3::new(-0.5, 0.0, -0.5), 1.0)
        .with_material(shiny(Color::green())));
    world.add(Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::white())));
    world.add(Shape::plane(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0))
        .with_material(matte(Color::white())));
    world.add_light(PointLight::new(Vector3::new(1.0, 2.0, 2.0), 0.5));
    world.add_light(PointLight::new(Vector3::new(-1.0, 2.0, -1.0), 0.5));

    Scene { camera: default_camera(size), world, options: Default::default() }
}

fn mirror_world() -> World {
    let mut world = World::new();
    world.add(Shape::sphere(Vector3::new(0.5, -0.7, 0.5), 0.3)
        .with_material(shiny(Color::red())));
    world.add(Shape::sphere(Vector3::new(1.0, -0.7, 0.0), 0.3)
        .with_material(shiny(Color::blue())));
    world.add(Shape::sphere(Vector3::new(-0.5, 0.0, -0.5), 1.0)
        .with_material(Material::mirror()));
    world.add(Shape::sphere(Vector3::new(1.5, 0.0, -1.5), 1.0)
        .with_material(Material::mirror()));
    world.add(Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::white()).with_reflectiveness(0.3)));
    world.add(Shape::plane(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0))
        .with_material(matte(Color::white())));
    world.add_light(PointLight::new(Vector3::new(-1.0, 2.0, 1.0), 0.5));
    world.add_light(PointLight::new(Vector3::new(0.5, -0.5, 0.0), 0.5));

    world
}

fn mirrors(size: usize) -> Scene {
    Scene { camera: default_camera(size), world: mirror_world(), options: Default::default() }
}

/// A single mesh, gated by its bounding sphere.
fn obj_mesh(size: usize, path: &Path) -> RenderResult<Scene> {
    let mesh = ObjParser::load(path)?;
    let transform = Matrix4D::identity();

    let mut world = World::new();
    world.objects = mesh.triangles(&transform, shiny(Color::blue()));
    world.bounds = mesh.bounding_sphere(&transform);
    world.add_light(PointLight::new(Vector3::new(-1.0, 1.0, 1.0), 1.0));

    Ok(Scene { camera: default_camera(size), world, options: Default::default() })
}

fn textured(size: usize, path: &Path) -> RenderResult<Scene> {
    let texture = Texture::load(path)?;

    let mut world = World::new();
    world.add(Shape::textured_sphere(Vector3::new(-0.6, 0.0, 0.0), 0.8, texture)
        .with_material(Material::new(Color::white(), Color::grey(0.3),
            Color::grey(0.1), 50.0)));
    world.add(Shape::cube(Vector3::new(1.0, -0.6, 0.5), 0.8)
        .with_material(shiny(Color::rgb(1.0, 0.6, 0.2))));
    world.add(Shape::triangle(TriangleInfo::flat(
        Vector3::new(-1.5, -1.0, -1.0),
        Vector3::new(1.5, -1.0, -1.0),
        Vector3::new(0.0, 1.5, -2.0),
    )).with_material(matte(Color::rgb(0.8, 0.8, 0.8))));
    world.add(Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::white())));
    world.add_light(PointLight::new(Vector3::new(2.0, 3.0, 3.0), 1.0));

    Ok(Scene { camera: default_camera(size), world, options: Default::default() })
}

/// The articulated figure, one unit cube per body part.
fn figure(size: usize) -> RenderResult<Scene> {
    let cube = Mesh::unit_cube();
    let material = shiny(Color::rgb(0.9, 0.75, 0.6));

    let mut world = World::new();
    let mut stack = MatrixStack::new();
    stack.translate(Vector3::new(0.0, 0.5, 0.0));

    SceneGraph::figure().traverse(&mut stack, |_, m| {
        world.objects.extend(cube.triangles(m, material));
    })?;

    world.add(Shape::plane(Vector3::new(0.0, -3.8, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::rgb(0.6, 0.6, 0.7))));
    world.add_light(PointLight::new(Vector3::new(5.0, 8.0, 10.0), 0.8));
    world.add_light(PointLight::new(Vector3::new(-6.0, 4.0, 6.0), 0.4));

    let camera = Camera::look_at(size, size, DEFAULT_FOV_DEGREES,
        Vector3::new(3.0, 0.0, 12.0),
        Vector3::new(0.0, -0.5, 0.0),
        Vector3::new(0.0, 1.0, 0.0))?;

    Ok(Scene { camera, world, options: Default::default() })
}

fn occlusion(size: usize) -> RenderResult<Scene> {
    let camera = Camera::look_at(size, size, DEFAULT_FOV_DEGREES,
        Vector3::new(-1.0, 1.5, 5.0),
        Vector3::new(0.0, -0.5, -0.5),
        Vector3::new(0.0, 1.0, 0.0))?;

    Ok(Scene {
        camera,
        world: mirror_world(),
        options: RenderOptions {
            integrator: Integrator::AmbientOcclusion,
            ..Default::default()
        },
    })
}

/// One plane filling the view, with no lights: flat ambient everywhere.
fn lone_plane(size: usize) -> Scene {
    let mut world = World::new();
    world.add(Shape::plane(Vector3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 0.0, 1.0))
        .with_material(matte(Color::white())));

    Scene { camera: default_camera(size), world, options: Default::default() }
}

/// A scene as written in a JSON file.
///
/// ```json
/// {
///   "camera": { "eye": [0, 0, 5], "target": [0, 0, 0] },
///   "lights": [{ "position": [-2, 1, 1], "intensity": 1.0 }],
///   "shapes": [
///     { "type": "sphere", "center": [0, 0, 0], "radius": 1,
///       "material": { "diffuse": [1, 0, 0] } },
///     { "type": "mesh", "path": "bunny.obj", "scale": [2, 2, 2] }
///   ],
///   "options": { "integrator": "ambient_occlusion", "seed": 3 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub lights: Vec<PointLight>,
    pub shapes: Vec<ShapeDescription>,
    pub options: RenderOptions,
}

/// Without a `target` the camera looks down -Z at an image plane at depth
/// `z_plane`; with one, it looks at the target.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub eye: Vector3,
    pub fov: f64,
    pub z_plane: f64,
    pub target: Option<Vector3>,
    pub up: Vector3,
}

impl Default for CameraDescription {
    fn default() -> CameraDescription {
        CameraDescription {
            eye: Vector3::new(0.0, 0.0, 5.0),
            fov: DEFAULT_FOV_DEGREES,
            z_plane: DEFAULT_Z_PLANE,
            target: None,
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

fn unit_scale() -> Vector3 {
    Vector3::splat(1.0)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: Vector3,
        radius: f64,
        #[serde(default)]
        material: Material,
    },
    Ellipsoid {
        center: Vector3,
        radii: Vector3,
        #[serde(default)]
        material: Material,
    },
    Plane {
        point: Vector3,
        normal: Vector3,
        #[serde(default)]
        material: Material,
    },
    Cube {
        center: Vector3,
        edge: f64,
        #[serde(default)]
        material: Material,
    },
    /// Flat shaded unless `normals` are given.
    Triangle {
        vertices: [Vector3; 3],
        #[serde(default)]
        normals: Option<[Vector3; 3]>,
        #[serde(default)]
        material: Material,
    },
    TexturedSphere {
        center: Vector3,
        radius: f64,
        texture: PathBuf,
        #[serde(default)]
        material: Material,
    },
    /// An OBJ file, scaled, then rotated about X, Y and Z (radians), then
    /// translated.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        translate: Vector3,
        #[serde(default)]
        rotate: Vector3,
        #[serde(default = "unit_scale")]
        scale: Vector3,
        #[serde(default)]
        material: Material,
    },
}

impl SceneDescription {
    /// Builds the scene, loading any meshes and textures relative to `base`.
    ///
    /// A scene made of a single mesh is gated by the mesh's bounding sphere,
    /// like the built-in mesh scene.
    pub fn build(self, size: usize, base: &Path) -> RenderResult<Scene> {
        let c = &self.camera;
        let camera = match c.target {
            Some(target) => Camera::look_at(size, size, c.fov, c.eye, target, c.up)?,
            None => Camera::along_z(size, size, c.fov, c.eye, c.z_plane),
        };

        let mut world = World::new();
        world.lights = self.lights;

        let lone_shape = self.shapes.len() == 1;
        for shape in self.shapes {
            let (shapes, bounds) = shape.build_bounded(base)?;
            world.objects.extend(shapes);

            if let (true, Some(bounds)) = (lone_shape, bounds) {
                world.bounds = bounds;
            }
        }

        Ok(Scene { camera, world, options: self.options })
    }
}

impl ShapeDescription {
    /// Most descriptions make one shape; a mesh makes one per triangle.
    pub fn build(self, base: &Path) -> RenderResult<Vec<Shape>> {
        self.build_bounded(base).map(|(shapes, _)| shapes)
    }

    /// Like `build`, also returning a mesh's bounding sphere.
    fn build_bounded(self, base: &Path)
        -> RenderResult<(Vec<Shape>, Option<BoundingSphere>)> {
        let shape = match self {
            ShapeDescription::Sphere { center, radius, material } =>
                Shape::sphere(center, radius).with_material(material),
            ShapeDescription::Ellipsoid { center, radii, material } =>
                Shape::ellipsoid(center, radii).with_material(material),
            ShapeDescription::Plane { point, normal, material } =>
                Shape::plane(point, normal).with_material(material),
            ShapeDescription::Cube { center, edge, material } =>
                Shape::cube(center, edge).with_material(material),
            ShapeDescription::Triangle { vertices: [p1, p2, p3], normals, material } => {
                let info = match normals {
                    Some([n1, n2, n3]) => TriangleInfo::new(p1, p2, p3, n1, n2, n3),
                    None => TriangleInfo::flat(p1, p2, p3),
                };
                Shape::triangle(info).with_material(material)
            },
            ShapeDescription::TexturedSphere { center, radius, texture, material } => {
                let texture = Texture::load(base.join(texture))?;
                Shape::textured_sphere(center, radius, texture).with_material(material)
            },
            ShapeDescription::Mesh { path, translate, rotate, scale, material } => {
                let mesh = ObjParser::load(base.join(path))?;

                let mut stack = MatrixStack::new();
                stack.translate(translate);
                stack.rotate_xyz(rotate);
                stack.scale(scale);

                let bounds = mesh.bounding_sphere(stack.top());
                return Ok((mesh.triangles(stack.top(), material), Some(bounds)));
            },
        };

        Ok((vec![shape], None))
    }
}

#[cfg(test)]
fn pixel(canvas: &Canvas, x: usize, y: usize) -> [u8; 3] {
    canvas.read_pixel(x, y).unwrap().to_rgb8()
}

#[test]
fn three_spheres_without_shadows() {
    let scene = Scene::builtin(1, 64, "resources").unwrap();
    assert!(!scene.options.shadows);

    let image = scene.render();

    // The red sphere sits in the lower left.
    let [r, g, b] = pixel(&image, 10, 24);
    assert!(r > 200 && g < 100 && b < 100);

    // Background corners are pure black.
    for &(x, y) in [(0, 0), (0, 63), (63, 63)].iter() {
        assert_eq!(pixel(&image, x, y), [0, 0, 0]);
    }

    // The green sphere is lit here, since nothing is casting shadows.
    let [_, g, _] = pixel(&image, 36, 28);
    assert!(g > 200);
}

#[test]
fn three_spheres_with_shadows() {
    let image = Scene::builtin(2, 64, "resources").unwrap().render();

    assert_eq!(pixel(&image, 0, 0), [0, 0, 0]);
    assert!(pixel(&image, 10, 24)[0] > 200);

    // The red sphere shadows this part of the green one.
    assert_eq!(pixel(&image, 36, 28), [25, 25, 25]);
}

#[test]
fn lone_plane_is_flat_ambient() {
    let image = Scene::builtin(9, 8, "resources").unwrap().render();

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(pixel(&image, x, y), [25, 25, 25]);
        }
    }
}

#[test]
fn bad_scene_ids_and_sizes() {
    match Scene::builtin(0, 64, "resources") {
        Err(RenderError::UnknownScene(0)) => (),
        other => panic!("expected unknown scene, got {:?}", other.map(|_| ())),
    }

    match Scene::builtin(10, 64, "resources") {
        Err(RenderError::UnknownScene(10)) => (),
        other => panic!("expected unknown scene, got {:?}", other.map(|_| ())),
    }

    // The size is checked before any resource is touched.
    match Scene::builtin(5, 0, "no-such-dir") {
        Err(RenderError::InvalidImageSize(0)) => (),
        other => panic!("expected invalid size, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn mesh_scene_loads_and_bounds_the_mesh() {
    let dir = std::env::temp_dir().join("whitted_scene_mesh");
    fs::create_dir_all(&dir).unwrap();
    fs::copy("./models/tetrahedron.obj", dir.join("bunny.obj")).unwrap();

    let scene = Scene::builtin(5, 16, &dir).unwrap();
    assert_eq!(scene.world.objects.len(), 4);
    assert!(scene.world.bounds.valid);
    assert!((scene.world.bounds.radius - 3f64.sqrt()).abs() < 1e-9);

    match Scene::builtin(5, 16, dir.join("missing")) {
        Err(RenderError::Io { .. }) => (),
        other => panic!("expected an IO error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn textured_scene_loads_texture() {
    let dir = std::env::temp_dir().join("whitted_scene_texture");
    fs::create_dir_all(&dir).unwrap();
    image::RgbImage::from_pixel(8, 4, image::Rgb([0, 0, 255]))
        .save(dir.join("earth.jpg"))
        .unwrap();

    let scene = Scene::builtin(6, 16, &dir).unwrap();
    assert_eq!(scene.world.objects.len(), 4);
    scene.render();

    match Scene::builtin(6, 16, dir.join("missing")) {
        Err(RenderError::Image { .. }) => (),
        other => panic!("expected an image error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn figure_scene_has_ten_cubes() {
    let scene = Scene::builtin(7, 8, "resources").unwrap();

    // Twelve triangles per body part, plus the floor.
    assert_eq!(scene.world.objects.len(), 10 * 12 + 1);
    assert_eq!(scene.camera.plane_z, -1.0);
}

#[test]
fn occlusion_scene_uses_ambient_occlusion() {
    let scene = Scene::builtin(8, 8, "resources").unwrap();
    assert_eq!(scene.options.integrator, Integrator::AmbientOcclusion);

    // Seeded sampling renders the same image twice.
    assert_eq!(scene.render(), scene.render());
}

#[test]
fn scene_description_from_json() {
    let json = r#"{
        "camera": { "eye": [0, 0, 5], "target": [0, 0, 0] },
        "lights": [{ "position": [-2, 1, 1], "intensity": 0.5 }],
        "shapes": [
            { "type": "sphere", "center": [0, 0, 0], "radius": 1,
              "material": { "diffuse": [1, 0, 0], "reflectiveness": 0.25 } },
            { "type": "plane", "point": [0, -1, 0], "normal": [0, 2, 0] },
            { "type": "triangle", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]] },
            { "type": "mesh", "path": "models/tetrahedron.obj", "scale": [2, 2, 2] }
        ],
        "options": { "integrator": "ambient_occlusion", "seed": 3 }
    }"#;

    let description: SceneDescription = serde_json::from_str(json).unwrap();
    let scene = description.build(32, Path::new(".")).unwrap();

    assert_eq!(scene.world.objects.len(), 3 + 4);
    assert_eq!(scene.world.lights[0].intensity, 0.5);
    assert_eq!(scene.world.objects[0].reflectiveness(), 0.25);
    assert_eq!(scene.camera.plane_z, -1.0);

    assert_eq!(scene.options.integrator, Integrator::AmbientOcclusion);
    assert_eq!(scene.options.seed, 3);
    assert_eq!(scene.options.max_depth, MAX_TRACE_DEPTH);

    // Mesh vertices were scaled.
    let ti = scene.world.objects[3].triangle_info().unwrap();
    assert_eq!(ti.p1, Vector3::new(2.0, 2.0, 2.0));

    // Other shapes share the scene, so nothing is gated.
    assert!(!scene.world.bounds.valid);
}

#[test]
fn scene_file_errors() {
    let path = std::env::temp_dir().join("whitted_bad_scene.json");
    fs::write(&path, r#"{ "shapes": [{ "type": "torus" }] }"#).unwrap();

    match Scene::from_file(&path, 16) {
        Err(RenderError::SceneFile { .. }) => (),
        other => panic!("expected a scene file error, got {:?}", other.map(|_| ())),
    }

    fs::write(&path, r#"{ "lights": [{ "position": [0, 5, 5], "intensity": 1 }] }"#).unwrap();
    let scene = Scene::from_file(&path, 16).unwrap();
    assert!(scene.world.objects.is_empty());
    assert_eq!(scene.camera.eye, Vector3::new(0.0, 0.0, 5.0));

    fs::remove_file(&path).ok();
}

#[test]
fn lone_mesh_description_is_bounded() {
    let json = r#"{
        "shapes": [
            { "type": "mesh", "path": "models/tetrahedron.obj",
              "translate": [0, 0, -4], "scale": [2, 2, 2] }
        ]
    }"#;

    let description: SceneDescription = serde_json::from_str(json).unwrap();
    let scene = description.build(8, Path::new(".")).unwrap();

    assert_eq!(scene.world.objects.len(), 4);
    assert!(scene.world.bounds.valid);
    assert!((scene.world.bounds.radius - 2.0 * 3f64.sqrt()).abs() < 1e-9);
    assert_eq!(scene.world.bounds.center.z, -4.0);
}

#[test]
fn degenerate_camera_description_is_an_error() {
    let json = r#"{
        "camera": { "eye": [0, 4, 0], "target": [0, -1, 0], "up": [0, 1, 0] },
        "shapes": [{ "type": "sphere", "center": [0, 0, 0], "radius": 1 }]
    }"#;

    let description: SceneDescription = serde_json::from_str(json).unwrap();
    match description.build(8, Path::new(".")) {
        Err(RenderError::DegenerateCamera { .. }) => (),
        other => panic!("expected a degenerate camera error, got {:?}", other.map(|_| ())),
    }
}
