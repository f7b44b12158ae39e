use crate::vector::Vector3;

/// A half-line starting at `origin` and extending along `direction`.
///
/// Hit distances are measured in multiples of `direction`, so rays built
/// by the camera and the tracer always carry a normalized direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    /// Builds a ray whose direction is normalized.
    pub fn normalized(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// Builds a secondary ray nudged off a surface along its own direction,
    /// so that it does not immediately re-hit the surface it left.
    pub fn offset(origin: Vector3, direction: Vector3, epsilon: f64) -> Ray {
        Ray { origin: origin + direction * epsilon, direction }
    }

    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.direction)
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
fn ray_offset() {
    let r = Ray::offset(
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                0.5
            );

    assert_eq!(r.origin, Vector3::new(0.0, 0.5, 0.0));
    assert_eq!(r.direction, Vector3::new(0.0, 1.0, 0.0));
}
