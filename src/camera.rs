use std::time::Instant;

use log::{ debug, info };
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::canvas::Canvas;
use crate::consts::PARALLEL_EPSILON;
use crate::error::{ RenderError, RenderResult };
use crate::matrix::Matrix4D;
use crate::ray::Ray;
use crate::scene::RenderOptions;
use crate::vector::Vector3;
use crate::world::World;

/// A pinhole camera.
///
/// Rays leave `eye` through the centers of the pixels of an image plane
/// `plane_z` units along the camera's Z axis (negative is in front). The
/// vertical field of view spans the full image height. Pixel rows are
/// counted from the bottom, matching `Canvas`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub width: usize,

    /// The vertical size of the resultant canvas.
    pub height: usize,

    /// Vertical field of view, in degrees.
    pub fov: f64,

    pub eye: Vector3,
    pub plane_z: f64,

    pub half_width: f64,
    pub half_height: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,

    /// Maps camera-space directions into the world.
    pub camera_to_world: Matrix4D,
}

impl Camera {
    fn new(width: usize, height: usize, fov: f64, eye: Vector3, plane_z: f64,
        camera_to_world: Matrix4D) -> Camera {
        let half_height = (fov.to_radians() / 2.0).tan();
        let half_width = half_height * (width as f64 / height as f64);

        Camera {
            width,
            height,
            fov,
            eye,
            plane_z,
            half_width,
            half_height,
            pixel_width: 2.0 * half_width / width as f64,
            pixel_height: 2.0 * half_height / height as f64,
            camera_to_world,
        }
    }

    /// A camera at `eye` looking down negative Z at an image plane at world
    /// depth `z_plane`.
    pub fn along_z(width: usize, height: usize, fov: f64, eye: Vector3,
        z_plane: f64) -> Camera {
        Camera::new(width, height, fov, eye, z_plane - eye.z, Matrix4D::identity())
    }

    /// A camera at `eye` looking at `target`, with the image plane one unit
    /// in front of the eye.
    ///
    /// Fails if the view direction is zero or not finite, or runs parallel
    /// to `up`.
    pub fn look_at(width: usize, height: usize, fov: f64, eye: Vector3,
        target: Vector3, up: Vector3) -> RenderResult<Camera> {
        let degenerate = || RenderError::DegenerateCamera { eye, target, up };

        let forward = target - eye;
        let scale = forward.magnitude() * up.magnitude();
        if !(forward.cross(&up).magnitude() > PARALLEL_EPSILON * scale) {
            return Err(degenerate());
        }

        let camera_to_world = Matrix4D::view_transform(eye, target, up)
            .inverse()
            .ok_or_else(degenerate)?;

        Ok(Camera::new(width, height, fov, eye, -1.0, camera_to_world))
    }

    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        // Offsets from the bottom-left corner to the pixel's center
        let x = -self.half_width + (px as f64 + 0.5) * self.pixel_width;
        let y = -self.half_height + (py as f64 + 0.5) * self.pixel_height;

        let direction = self.camera_to_world
            .transform_vector(Vector3::new(x, y, self.plane_z));

        Ray::normalized(self.eye, direction)
    }

    /// Traces every pixel, one at a time, bottom row first.
    ///
    /// Ambient occlusion draws from a generator seeded with `opts.seed`, so
    /// the same scene and options always give the same image.
    pub fn render(&self, w: &World, opts: &RenderOptions) -> Canvas {
        let mut image = Canvas::new(self.width, self.height);
        let mut rng = StdRng::seed_from_u64(opts.seed);
        let start = Instant::now();

        info!("rendering {}x{} ({} objects, {} lights, {:?})",
            self.width, self.height, w.objects.len(), w.lights.len(),
            opts.integrator);

        for y in 0..self.height {
            for x in 0..self.width {
                let ray = self.ray_for_pixel(x, y);
                let color = w.color_at(&ray, self.eye, opts, &mut rng);
                image.write_pixel(x, y, &color);
            }

            debug!("row {}/{} done", y + 1, self.height);
        }

        info!("rendered in {:.2?}", start.elapsed());
        image
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::along_z(201, 101, 90.0, Vector3::new(0.0, 0.0, 5.0), 4.0);
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Vector3::new(0.0, 0.0, 5.0));
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn bottom_left_pixel_points_down_and_left() {
    let c = Camera::along_z(64, 64, 45.0, Vector3::new(0.0, 0.0, 5.0), 4.0);
    let r = c.ray_for_pixel(0, 0);

    let h = (22.5f64).to_radians().tan();
    let offset = -h + h / 64.0;
    assert_eq!(r.direction, Vector3::new(offset, offset, -1.0).normalize());

    let top_right = c.ray_for_pixel(63, 63);
    assert_eq!(top_right.direction, Vector3::new(-offset, -offset, -1.0).normalize());
}

#[test]
fn wide_images_keep_vertical_fov() {
    let c = Camera::along_z(200, 100, 90.0, Vector3::zero(), -1.0);

    assert!((c.half_height - 1.0).abs() < 1e-9);
    assert!((c.half_width - 2.0).abs() < 1e-9);
    assert!((c.pixel_width - c.pixel_height).abs() < 1e-12);
}

#[test]
fn look_at_down_negative_z_matches_along_z() {
    let eye = Vector3::new(0.0, 0.0, 5.0);
    let a = Camera::along_z(32, 32, 45.0, eye, 4.0);
    let b = Camera::look_at(32, 32, 45.0, eye, Vector3::zero(),
        Vector3::new(0.0, 1.0, 0.0)).unwrap();

    for &(x, y) in [(0, 0), (31, 0), (7, 19), (31, 31)].iter() {
        assert_eq!(a.ray_for_pixel(x, y), b.ray_for_pixel(x, y));
    }
}

#[test]
fn look_at_from_the_side() {
    let c = Camera::look_at(11, 11, 90.0, Vector3::new(5.0, 0.0, 0.0),
        Vector3::zero(), Vector3::new(0.0, 1.0, 0.0)).unwrap();

    let center = c.ray_for_pixel(5, 5);
    assert_eq!(center.origin, Vector3::new(5.0, 0.0, 0.0));
    assert_eq!(center.direction, Vector3::new(-1.0, 0.0, 0.0));

    // Image right is world -Z when looking down -X.
    let right = c.ray_for_pixel(10, 5);
    assert!(right.direction.z < 0.0);
    let top = c.ray_for_pixel(5, 10);
    assert!(top.direction.y > 0.0);
}

#[test]
fn look_at_rejects_degenerate_views() {
    let up = Vector3::new(0.0, 1.0, 0.0);

    // Looking straight down the up vector
    match Camera::look_at(8, 8, 60.0, Vector3::new(0.0, 5.0, 0.0), Vector3::zero(), up) {
        Err(RenderError::DegenerateCamera { .. }) => (),
        other => panic!("expected a degenerate camera error, got {:?}", other),
    }

    let eye = Vector3::new(1.0, 2.0, 3.0);
    assert!(Camera::look_at(8, 8, 60.0, eye, eye, up).is_err());
    assert!(Camera::look_at(8, 8, 60.0, eye, Vector3::zero(), Vector3::zero()).is_err());
    assert!(Camera::look_at(8, 8, 60.0, eye, Vector3::new(std::f64::NAN, 0.0, 0.0), up)
        .is_err());
}
