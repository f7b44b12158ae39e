use crate::color::Color;
use crate::ray::Ray;
use crate::shape::Shape;
use crate::vector::Vector3;

/// The result of a ray striking a surface.
///
/// `t` is measured in multiples of the ray's direction and is always at
/// least `RAY_EPSILON`. A `color` is only present when the surface is
/// texture mapped; it then replaces the material's diffuse color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub t: f64,
    pub point: Vector3,
    pub normal: Vector3,
    pub color: Option<Color>,

    /// Barycentric `(u, v)` of a triangle hit.
    pub uv: Option<(f64, f64)>,
}

impl Hit {
    pub fn new(ray: &Ray, t: f64, normal: Vector3) -> Hit {
        Hit {
            t,
            point: ray.position(t),
            normal,
            color: None,
            uv: None,
        }
    }
}

/// A hit, along with the shape which was hit.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub hit: Hit,
    pub what: &'a Shape,
}

/// Two intersections are equal when they share a distance and the *same*
/// shape (by pointer).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.hit.t == other.hit.t && std::ptr::eq(self.what, other.what)
    }
}

/// Finds the closest hit of `ray` among `shapes`.
///
/// Ties keep the earlier shape.
pub fn nearest<'a>(shapes: &'a [Shape], ray: &Ray) -> Option<Intersection<'a>> {
    let mut best: Option<Intersection<'a>> = None;

    for shape in shapes {
        if let Some(hit) = shape.intersect(ray) {
            if best.map_or(true, |b| hit.t < b.hit.t) {
                best = Some(Intersection { hit, what: shape });
            }
        }
    }

    best
}

/// Whether any of `shapes` is hit by `ray` strictly closer than `max_t`.
pub fn any_closer(shapes: &[Shape], ray: &Ray, max_t: f64) -> bool {
    shapes.iter()
        .filter_map(|s| s.intersect(ray))
        .any(|hit| hit.t < max_t)
}

#[test]
fn nearest_picks_smallest_t() {
    let far = Shape::sphere(Vector3::new(0.0, 0.0, -10.0), 1.0);
    let near = Shape::sphere(Vector3::new(0.0, 0.0, -3.0), 1.0);
    let shapes = vec![far, near];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    let i = nearest(&shapes, &r).unwrap();
    assert!(std::ptr::eq(i.what, &shapes[1]));
    assert!((i.hit.t - 2.0).abs() < 1e-9);
}

#[test]
fn nearest_ignores_shapes_behind() {
    let behind = Shape::sphere(Vector3::new(0.0, 0.0, 5.0), 1.0);
    let shapes = vec![behind];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert!(nearest(&shapes, &r).is_none());
}

#[test]
fn any_closer_is_strict() {
    let shapes = vec![Shape::sphere(Vector3::new(0.0, 0.0, -3.0), 1.0)];
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert!(any_closer(&shapes, &r, 2.5));
    assert!(!any_closer(&shapes, &r, 2.0));
    assert!(!any_closer(&shapes, &r, 1.0));
}
