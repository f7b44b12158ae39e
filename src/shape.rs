use std::f64::consts::PI;

use crate::color::Color;
use crate::consts::{ RAY_EPSILON, PARALLEL_EPSILON };
use crate::geometry::TriangleInfo;
use crate::intersect::Hit;
use crate::light::Material;
use crate::ray::Ray;
use crate::texture::Texture;
use crate::vector::Vector3;

#[derive(Debug, Clone)]
pub enum ShapeType {
    /// A sphere with a uniform radius.
    Sphere { center: Vector3, radius: f64 },

    /// An axis-aligned ellipsoid with a radius per axis.
    Ellipsoid { center: Vector3, radii: Vector3 },

    /// An infinite plane through `point`, facing along `normal`.
    Plane { point: Vector3, normal: Vector3 },

    /// An axis-aligned cube with edges of length `edge`.
    Cube { center: Vector3, edge: f64 },

    /// A triangle with smooth (interpolated) vertex normals.
    Triangle(TriangleInfo),

    /// A sphere whose diffuse color is looked up in a texture, mapped by
    /// longitude (u) and latitude (v).
    TexturedSphere { center: Vector3, radius: f64, texture: Texture },
}

/// A primitive along with its material.
///
/// Shapes live in world space; there is no per-shape transform. Meshes
/// and the articulated figure are transformed into world space before
/// their triangles are built.
#[derive(Debug, Clone)]
pub struct Shape {
    pub ty: ShapeType,
    pub material: Material,
}

impl Shape {
    pub fn new(ty: ShapeType) -> Shape {
        Shape { ty, material: Default::default() }
    }

    pub fn sphere(center: Vector3, radius: f64) -> Shape {
        Shape::new(ShapeType::Sphere { center, radius })
    }

    pub fn ellipsoid(center: Vector3, radii: Vector3) -> Shape {
        Shape::new(ShapeType::Ellipsoid { center, radii })
    }

    /// Creates a plane. The normal is normalized here.
    pub fn plane(point: Vector3, normal: Vector3) -> Shape {
        Shape::new(ShapeType::Plane { point, normal: normal.normalize() })
    }

    pub fn cube(center: Vector3, edge: f64) -> Shape {
        Shape::new(ShapeType::Cube { center, edge })
    }

    /// Creates a triangle. Triangles never reflect, whatever material they
    /// are later given.
    pub fn triangle(info: TriangleInfo) -> Shape {
        Shape::new(ShapeType::Triangle(info))
    }

    pub fn textured_sphere(center: Vector3, radius: f64, texture: Texture)
        -> Shape {
        Shape::new(ShapeType::TexturedSphere { center, radius, texture })
    }

    pub fn with_material(mut self, material: Material) -> Shape {
        self.material = material;
        self
    }

    /// The mirror coefficient used by the tracer.
    pub fn reflectiveness(&self) -> f64 {
        match self.ty {
            ShapeType::Triangle(_) => 0.0,
            _ => self.material.reflectiveness,
        }
    }

    /// Returns a ref. to `TriangleInfo` if this is a triangle.
    pub fn triangle_info(&self) -> Option<&TriangleInfo> {
        match self.ty {
            ShapeType::Triangle(ref ti) => Some(ti),
            _ => None,
        }
    }

    /// Intersects a ray with this shape, returning the nearest hit at a
    /// distance of at least `RAY_EPSILON`.
    ///
    /// Misses, grazing rays and rays parallel to flat surfaces all return
    /// `None`.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self.ty {
            ShapeType::Sphere { center, radius } => {
                let t = Self::intersect_sphere(ray, center, radius)?;
                Some(self.hit(ray, t, None))
            },
            ShapeType::Ellipsoid { center, radii } => {
                let t = Self::intersect_ellipsoid(ray, center, radii)?;
                Some(self.hit(ray, t, None))
            },
            ShapeType::Plane { point, normal } => {
                let t = Self::intersect_plane(ray, point, normal)?;
                Some(self.hit(ray, t, None))
            },
            ShapeType::Cube { center, edge } => {
                let t = Self::intersect_cube(ray, center, edge)?;
                Some(self.hit(ray, t, None))
            },
            ShapeType::Triangle(ref ti) => {
                let (t, u, v) = Self::intersect_triangle(ray, ti)?;
                Some(self.hit(ray, t, Some((u, v))))
            },
            ShapeType::TexturedSphere { center, radius, ref texture } => {
                let t = Self::intersect_sphere(ray, center, radius)?;
                let mut hit = self.hit(ray, t, None);

                let (u, v) = Self::spherical_uv(&(hit.point - center));
                hit.color = Some(texture.color_at(u, v));
                Some(hit)
            },
        }
    }

    /// Obtain the normal vector of a Shape at a point.
    ///
    /// Triangles need the barycentric coordinates of the hit in `uv`; they
    /// fall back to vertex `n1` without them. The returned normal is not
    /// guaranteed to be unit length.
    pub fn normal_at(&self, at: &Vector3, uv: Option<(f64, f64)>) -> Vector3 {
        match self.ty {
            ShapeType::Sphere { center, .. }
                | ShapeType::TexturedSphere { center, .. } => *at - center,

            // Divided by the radii twice: once into unit sphere space, and
            // once more for the inverse transpose of the diagonal scale.
            ShapeType::Ellipsoid { center, radii } => (*at - center) / radii / radii,

            ShapeType::Plane { normal, .. } => normal,

            ShapeType::Cube { center, .. } => Self::normal_at_cube(&(*at - center)),

            ShapeType::Triangle(ref ti) => match uv {
                Some((u, v)) => ti.interpolate_normal(u, v),
                None => ti.n1,
            },
        }
    }

    fn hit(&self, ray: &Ray, t: f64, uv: Option<(f64, f64)>) -> Hit {
        let mut hit = Hit::new(ray, t, Vector3::zero());
        hit.normal = self.normal_at(&hit.point, uv).normalize();
        hit.uv = uv;
        hit
    }

    /// Picks the nearest root of `a*t^2 + b*t + c` that lies ahead of the
    /// ray. The smaller root wins unless it is behind the origin (the ray
    /// started inside the surface).
    fn nearest_root(a: f64, b: f64, c: f64) -> Option<f64> {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        if t1 >= RAY_EPSILON {
            Some(t1)
        } else if t2 >= RAY_EPSILON {
            Some(t2)
        } else {
            None
        }
    }

    fn intersect_sphere(ray: &Ray, center: Vector3, radius: f64) -> Option<f64> {
        let sphere_to_ray = ray.origin - center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - radius * radius;

        Self::nearest_root(a, b, c)
    }

    /// Squashes the ray into the space where the ellipsoid is a unit sphere.
    /// The ray parameter `t` is the same in both spaces.
    fn intersect_ellipsoid(ray: &Ray, center: Vector3, radii: Vector3)
        -> Option<f64> {
        let origin = (ray.origin - center) / radii;
        let direction = ray.direction / radii;

        let a = direction.dot(&direction);
        let b = 2.0 * direction.dot(&origin);
        let c = origin.dot(&origin) - 1.0;

        Self::nearest_root(a, b, c)
    }

    fn intersect_plane(ray: &Ray, point: Vector3, normal: Vector3)
        -> Option<f64> {
        // Negated comparisons so that NaN counts as a miss.
        let denominator = ray.direction.dot(&normal);
        if !(denominator.abs() >= PARALLEL_EPSILON) {
            return None;
        }

        let t = (point - ray.origin).dot(&normal) / denominator;
        if !(t >= RAY_EPSILON) {
            return None;
        }

        Some(t)
    }

    fn intersect_cube(ray: &Ray, center: Vector3, edge: f64) -> Option<f64> {
        if !ray.origin.is_finite() || !ray.direction.is_finite() {
            return None;
        }

        let half = edge / 2.0;
        let lo = center - Vector3::splat(half);
        let hi = center + Vector3::splat(half);

        let mut tmin = std::f64::NEG_INFINITY;
        let mut tmax = std::f64::INFINITY;

        let axes = [
            (ray.origin.x, ray.direction.x, lo.x, hi.x),
            (ray.origin.y, ray.direction.y, lo.y, hi.y),
            (ray.origin.z, ray.direction.z, lo.z, hi.z),
        ];

        for &(origin, direction, lo, hi) in axes.iter() {
            let (t0, t1) = Self::check_cube_axis(origin, direction, lo, hi)?;

            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }

        // A zero direction leaves both bounds infinite.
        if tmin >= RAY_EPSILON && tmin.is_finite() {
            Some(tmin)
        } else if tmax >= RAY_EPSILON && tmax.is_finite() {
            Some(tmax)
        } else {
            None
        }
    }

    /// Returns the entry and exit distances of one slab, smaller first.
    ///
    /// A ray parallel to the slab either lies inside it for its whole length
    /// or misses the cube entirely.
    fn check_cube_axis(origin: f64, direction: f64, lo: f64, hi: f64)
        -> Option<(f64, f64)> {
        if direction.abs() < PARALLEL_EPSILON {
            return if origin < lo || origin > hi {
                None
            } else {
                Some((std::f64::NEG_INFINITY, std::f64::INFINITY))
            };
        }

        let t0 = (lo - origin) / direction;
        let t1 = (hi - origin) / direction;

        if t0 > t1 {
            Some((t1, t0))
        } else {
            Some((t0, t1))
        }
    }

    /// The face normal of the face containing `p` (relative to the center).
    fn normal_at_cube(p: &Vector3) -> Vector3 {
        let xa = p.x.abs();
        let ya = p.y.abs();
        let za = p.z.abs();

        let max_component = xa.max(ya).max(za);
        if max_component == xa {
            Vector3::new(p.x.signum(), 0.0, 0.0)
        } else if max_component == ya {
            Vector3::new(0.0, p.y.signum(), 0.0)
        } else {
            Vector3::new(0.0, 0.0, p.z.signum())
        }
    }

    /// Moller-Trumbore. Returns `(t, u, v)` where `u` weights vertex 2 and
    /// `v` weights vertex 3. Triangles are hit from either side.
    fn intersect_triangle(ray: &Ray, ti: &TriangleInfo)
        -> Option<(f64, f64, f64)> {
        let dir_cross_e2 = ray.direction.cross(&ti.e2);
        let determinant = ti.e1.dot(&dir_cross_e2);

        if !(determinant.abs() >= PARALLEL_EPSILON) {
            return None;
        }

        let f = 1.0 / determinant;
        let p1_to_origin = ray.origin - ti.p1;
        let u = f * p1_to_origin.dot(&dir_cross_e2);
        if !(u >= 0.0 && u <= 1.0) {
            return None;
        }

        let origin_cross_e1 = p1_to_origin.cross(&ti.e1);
        let v = f * ray.direction.dot(&origin_cross_e1);
        if !(v >= 0.0 && u + v <= 1.0) {
            return None;
        }

        let t = f * ti.e2.dot(&origin_cross_e1);
        if !(t >= RAY_EPSILON) {
            return None;
        }

        Some((t, u, v))
    }

    /// Longitude/latitude mapping of an offset from a sphere's center.
    /// `v == 0` is the south pole.
    fn spherical_uv(offset: &Vector3) -> (f64, f64) {
        let n = offset.normalize();
        let u = 0.5 + n.z.atan2(n.x) / (2.0 * PI);
        let v = 0.5 + n.y.max(-1.0).min(1.0).asin() / PI;

        (u, v)
    }
}

/// Diffuse color at a hit, taking texture mapping into account.
pub fn diffuse_at(shape: &Shape, hit: &Hit) -> Color {
    hit.color.unwrap_or(shape.material.diffuse)
}

#[test]
fn ray_aimed_at_sphere_center() {
    let s = Shape::sphere(Vector3::new(1.0, 2.0, -3.0), 1.5);

    for origin in [
        Vector3::new(1.0, 2.0, 10.0),
        Vector3::new(-6.0, 0.0, 4.0),
        Vector3::new(8.0, 9.0, -3.0),
    ].iter() {
        let r = Ray::normalized(*origin, Vector3::new(1.0, 2.0, -3.0) - *origin);
        let hit = s.intersect(&r).unwrap();
        let expected = origin.distance(&Vector3::new(1.0, 2.0, -3.0)) - 1.5;

        assert!((hit.t - expected).abs() < 1e-9);
        assert_eq!(hit.normal, -r.direction);
    }
}

#[test]
fn ray_pointing_away_from_sphere_misses() {
    let s = Shape::sphere(Vector3::zero(), 1.0);
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));

    assert!(s.intersect(&r).is_none());

    let r = Ray::new(Vector3::new(0.0, 2.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    assert!(s.intersect(&r).is_none());
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let s = Shape::sphere(Vector3::zero(), 1.0);
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    let hit = s.intersect(&r).unwrap();

    assert!((hit.t - 1.0).abs() < 1e-9);
    assert_eq!(hit.point, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ellipsoid_hit_and_normal() {
    let s = Shape::ellipsoid(Vector3::zero(), Vector3::new(2.0, 1.0, 1.0));

    let r = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 3.0).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3::new(1.0, 0.0, 0.0));

    // On the surface at 45 degrees in unit space, the normal leans toward
    // the short axis.
    let p = Vector3::new(2.0 / 2f64.sqrt(), 1.0 / 2f64.sqrt(), 0.0);
    let n = s.normal_at(&p, None).normalize();
    assert_eq!(n, Vector3::new(0.5, 1.0, 0.0).normalize());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let s = Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));

    let above = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
    assert!((s.intersect(&above).unwrap().t - 2.0).abs() < 1e-9);

    let below = Ray::new(Vector3::new(0.0, -3.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    assert!((s.intersect(&below).unwrap().t - 2.0).abs() < 1e-9);

    let away = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    assert!(s.intersect(&away).is_none());
}

#[test]
fn ray_parallel_to_plane_misses() {
    let s = Shape::plane(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));
    let r = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

    assert!(s.intersect(&r).is_none());
}

#[test]
fn ray_intersects_cube_faces() {
    let s = Shape::cube(Vector3::new(0.0, 0.0, -5.0), 2.0);

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 4.0).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3::new(0.0, 0.0, 1.0));

    let r = Ray::new(Vector3::new(5.0, 0.5, -5.0), Vector3::new(-1.0, 0.0, 0.0));
    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 4.0).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn ray_inside_cube_hits_exit_face() {
    let s = Shape::cube(Vector3::zero(), 2.0);
    let r = Ray::new(Vector3::new(0.0, 0.5, 0.0), Vector3::new(0.0, 1.0, 0.0));
    let hit = s.intersect(&r).unwrap();

    assert!((hit.t - 0.5).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_misses_cube() {
    let s = Shape::cube(Vector3::zero(), 2.0);

    let cases = [
        (Vector3::new(-2.0, 0.0, 0.0), Vector3::new(0.2673, 0.5345, 0.8018)),
        (Vector3::new(2.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0)),
        (Vector3::new(0.0, 2.0, 2.0), Vector3::new(0.0, -1.0, 0.0)),
        (Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0)),
    ];

    for (origin, direction) in cases.iter() {
        assert!(s.intersect(&Ray::new(*origin, *direction)).is_none());
    }
}

#[test]
fn ray_through_triangle_vertex() {
    let ti = TriangleInfo::flat(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    );
    let s = Shape::triangle(ti);

    let vertices = [ti.p1, ti.p2, ti.p3];
    for (i, p) in vertices.iter().enumerate() {
        // Aim slightly inside so rounding can't push the vertex outside.
        let target = *p + (Vector3::new(0.0, 1.0 / 3.0, 0.0) - *p) * 1e-7;
        let r = Ray::normalized(target + Vector3::new(0.0, 0.0, -2.0),
            Vector3::new(0.0, 0.0, 1.0));
        let hit = s.intersect(&r).unwrap();
        let (u, v) = hit.uv.unwrap();
        let weights = [1.0 - u - v, u, v];

        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        for (j, w) in weights.iter().enumerate() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((w - expected).abs() < 1e-6);
        }
    }
}

#[test]
fn ray_misses_triangle_edges() {
    let s = Shape::triangle(TriangleInfo::flat(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    ));

    for origin in [
        Vector3::new(1.0, 1.0, -2.0),
        Vector3::new(-1.0, 1.0, -2.0),
        Vector3::new(0.0, -1.0, -2.0),
    ].iter() {
        let r = Ray::new(*origin, Vector3::new(0.0, 0.0, 1.0));
        assert!(s.intersect(&r).is_none());
    }

    let parallel = Ray::new(Vector3::new(0.0, -1.0, -2.0), Vector3::new(0.0, 1.0, 0.0));
    assert!(s.intersect(&parallel).is_none());
}

#[test]
fn triangle_normal_is_interpolated() {
    let s = Shape::triangle(TriangleInfo::new(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    )).with_material(Material::default().with_reflectiveness(0.8));

    let r = Ray::new(Vector3::new(-0.2, 0.3, -2.0), Vector3::new(0.0, 0.0, 1.0));
    let hit = s.intersect(&r).unwrap();
    let (u, v) = hit.uv.unwrap();

    assert!((u - 0.45).abs() < 1e-9);
    assert!((v - 0.25).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3::new(-0.2, 0.3, 0.0).normalize());
    assert_eq!(s.reflectiveness(), 0.0);
}

#[test]
fn textured_sphere_overrides_diffuse() {
    let img = image::RgbImage::from_pixel(8, 4, image::Rgb([0, 255, 0]));
    let s = Shape::textured_sphere(Vector3::zero(), 1.0, Texture::from(img))
        .with_material(Material::new(Color::red(), Color::white(), Color::black(), 10.0));
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    let hit = s.intersect(&r).unwrap();

    assert_eq!(hit.color, Some(Color::green()));
    assert_eq!(diffuse_at(&s, &hit), Color::green());

    let plain = Shape::sphere(Vector3::zero(), 1.0)
        .with_material(Material::new(Color::red(), Color::white(), Color::black(), 10.0));
    let hit = plain.intersect(&r).unwrap();
    assert_eq!(diffuse_at(&plain, &hit), Color::red());
}

#[test]
fn nan_rays_never_hit() {
    let shapes = [
        Shape::sphere(Vector3::zero(), 1.0),
        Shape::ellipsoid(Vector3::zero(), Vector3::new(1.0, 2.0, 3.0)),
        Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
        Shape::cube(Vector3::zero(), 2.0),
        Shape::triangle(TriangleInfo::flat(
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        )),
    ];

    let nan = std::f64::NAN;
    let rays = [
        Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(nan, -1.0, 0.0)),
        Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, nan)),
        Ray::new(Vector3::new(nan, 0.0, 5.0), Vector3::new(0.0, -0.1, -1.0)),
    ];

    for s in shapes.iter() {
        for r in rays.iter() {
            assert!(s.intersect(r).is_none(), "{:?} hit by {:?}", s.ty, r);
        }
    }

    // A zero direction never leaves the cube, so it never reaches a face.
    let still = Ray::new(Vector3::zero(), Vector3::zero());
    assert!(Shape::cube(Vector3::zero(), 2.0).intersect(&still).is_none());
}

#[test]
fn spherical_mapping_orients_texture() {
    // Top half red (left) and yellow (right); bottom half blue and cyan.
    let img = image::RgbImage::from_fn(4, 4, |x, y| {
        let right = if x >= 2 { 255 } else { 0 };
        if y < 2 {
            image::Rgb([255, right, 0])
        } else {
            image::Rgb([0, right, 255])
        }
    });
    let s = Shape::textured_sphere(Vector3::zero(), 1.0, Texture::from(img));

    let h = 0.5f64.sqrt();
    let cases = [
        (Vector3::new(0.0, h, h), [255, 255, 0]),
        (Vector3::new(0.0, h, -h), [255, 0, 0]),
        (Vector3::new(0.0, -h, -h), [0, 0, 255]),
        (Vector3::new(0.0, -h, h), [0, 255, 255]),
    ];

    for &(point, rgb) in cases.iter() {
        let r = Ray::normalized(point * 5.0, -point);
        let hit = s.intersect(&r).unwrap();

        assert_eq!(hit.point, point);
        assert_eq!(hit.color, Some(Color::from(image::Rgb(rgb))), "at {:?}", point);
    }
}
