use serde::{ Serialize, Deserialize };

use crate::ray::Ray;
use crate::vector::Vector3;

/// A triangle with per-vertex normals, for smooth shading.
///
/// Edges `e1` (`p2 - p1`) and `e2` (`p3 - p1`) are precomputed since every
/// intersection test needs them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleInfo {
    pub p1: Vector3,
    pub p2: Vector3,
    pub p3: Vector3,

    pub n1: Vector3,
    pub n2: Vector3,
    pub n3: Vector3,

    pub e1: Vector3,
    pub e2: Vector3,
}

impl TriangleInfo {
    pub fn new(p1: Vector3, p2: Vector3, p3: Vector3,
        n1: Vector3, n2: Vector3, n3: Vector3) -> TriangleInfo {
        TriangleInfo {
            p1, p2, p3,
            n1, n2, n3,
            e1: p2 - p1,
            e2: p3 - p1,
        }
    }

    /// A triangle whose three vertex normals all equal the face normal.
    ///
    /// Winding is counter-clockwise: the normal is `e1 x e2`.
    pub fn flat(p1: Vector3, p2: Vector3, p3: Vector3) -> TriangleInfo {
        let n = Self::face_normal(p1, p2, p3);
        Self::new(p1, p2, p3, n, n, n)
    }

    pub fn face_normal(p1: Vector3, p2: Vector3, p3: Vector3) -> Vector3 {
        (p2 - p1).cross(&(p3 - p1)).normalize()
    }

    /// Interpolates the vertex normals with weights `(1 - u - v, u, v)`.
    pub fn interpolate_normal(&self, u: f64, v: f64) -> Vector3 {
        (self.n1 * (1.0 - u - v) + self.n2 * u + self.n3 * v).normalize()
    }
}

/// A coarse sphere enclosing a group of shapes.
///
/// An invalid bounding sphere accepts every ray, so a scene without one
/// is traced exactly like a scene whose bounds cover everything.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vector3,
    pub radius: f64,
    pub valid: bool,
}

impl Default for BoundingSphere {
    fn default() -> BoundingSphere {
        BoundingSphere::none()
    }
}

impl BoundingSphere {
    pub fn new(center: Vector3, radius: f64) -> BoundingSphere {
        BoundingSphere { center, radius, valid: true }
    }

    /// The no-op gate.
    pub fn none() -> BoundingSphere {
        BoundingSphere { center: Vector3::zero(), radius: 0.0, valid: false }
    }

    /// The smallest sphere centered on the centroid of `points` that
    /// contains all of them. Returns the no-op gate for an empty slice.
    pub fn enclosing(points: &[Vector3]) -> BoundingSphere {
        if points.is_empty() {
            return BoundingSphere::none();
        }

        let sum = points.iter().fold(Vector3::zero(), |acc, p| acc + *p);
        let center = sum / points.len() as f64;
        let radius = points.iter()
            .map(|p| p.distance(&center))
            .fold(0.0, f64::max);

        BoundingSphere::new(center, radius)
    }

    /// Whether `ray` could hit anything inside the sphere.
    ///
    /// Rays starting inside the sphere are always accepted, as are rays
    /// whose line touches the sphere ahead of the origin.
    pub fn accepts(&self, ray: &Ray) -> bool {
        if !self.valid {
            return true;
        }

        let oc = ray.origin - self.center;
        let c = oc.dot(&oc) - self.radius * self.radius;
        if c <= 0.0 {
            return true;
        }

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        // Origin is outside, so both roots share a sign; the far one decides.
        (-b + discriminant.sqrt()) / (2.0 * a) >= 0.0
    }
}

#[test]
fn triangle_edges() {
    let t = TriangleInfo::flat(
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    );

    assert_eq!(t.e1, Vector3::new(-1.0, -1.0, 0.0));
    assert_eq!(t.e2, Vector3::new(1.0, -1.0, 0.0));
    assert_eq!(t.n1, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn interpolated_normal_at_vertices() {
    let t = TriangleInfo::new(
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    );

    assert_eq!(t.interpolate_normal(0.0, 0.0), t.n1);
    assert_eq!(t.interpolate_normal(1.0, 0.0), t.n2);
    assert_eq!(t.interpolate_normal(0.0, 1.0), t.n3);
    assert_eq!(t.interpolate_normal(0.5, 0.0),
        Vector3::new(1.0, 1.0, 0.0).normalize());
}

#[test]
fn invalid_bounds_accept_everything() {
    let b = BoundingSphere::none();
    let r = Ray::new(Vector3::new(100.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));

    assert!(b.accepts(&r));
}

#[test]
fn bounds_reject_misses_and_rays_pointing_away() {
    let b = BoundingSphere::new(Vector3::zero(), 1.0);

    let toward = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    let away = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
    let beside = Ray::new(Vector3::new(0.0, 2.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    let inside = Ray::new(Vector3::new(0.0, 0.5, 0.0), Vector3::new(0.0, 0.0, 1.0));

    assert!(b.accepts(&toward));
    assert!(!b.accepts(&away));
    assert!(!b.accepts(&beside));
    assert!(b.accepts(&inside));
}

#[test]
fn enclosing_sphere_contains_points() {
    let points = [
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 3.0, 0.0),
    ];
    let b = BoundingSphere::enclosing(&points);

    assert!(b.valid);
    assert_eq!(b.center, Vector3::new(0.0, 1.0, 0.0));
    assert!(points.iter().all(|p| p.distance(&b.center) <= b.radius + 1e-9));
    assert!(!BoundingSphere::enclosing(&[]).valid);
}
