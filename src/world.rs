use log::debug;
use rand::{ Rng, RngCore };

use crate::color::Color;
use crate::consts::RAY_EPSILON;
use crate::geometry::BoundingSphere;
use crate::intersect::{ Intersection, nearest, any_closer };
use crate::light::{ PointLight, Material, blinn_phong };
use crate::ray::Ray;
use crate::scene::{ RenderOptions, Integrator };
use crate::shape::{ Shape, diffuse_at };
use crate::vector::Vector3;

/// A world with objects and lights.
///
/// Worlds are read-only while rendering. The `bounds` sphere gates primary
/// and reflected rays; it is invalid (accepting every ray) unless a scene
/// sets it.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub objects: Vec<Shape>,
    pub lights: Vec<PointLight>,
    pub bounds: BoundingSphere,
}

impl World {
    pub fn new() -> World {
        Default::default()
    }

    pub fn add(&mut self, shape: Shape) {
        self.objects.push(shape);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Finds the nearest object hit by a ray. The bounds are not consulted.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        nearest(&self.objects, ray)
    }

    /// Determines whether a point is shadowed from a light.
    ///
    /// `light_dir` must be unit length, pointing from `point` toward the
    /// light, which is `light_distance` away. Only hits strictly closer than
    /// the light occlude it.
    pub fn is_shadowed(&self, point: Vector3, light_dir: Vector3,
        light_distance: f64) -> bool {
        let r = Ray::offset(point, light_dir, RAY_EPSILON);
        any_closer(&self.objects, &r, light_distance)
    }

    /// Traces a ray with the integrator selected in `opts`.
    pub fn color_at(&self, ray: &Ray, eye: Vector3, opts: &RenderOptions,
        rng: &mut dyn RngCore) -> Color {
        match opts.integrator {
            Integrator::Whitted => self.trace_ray(ray, eye, 0, opts),
            Integrator::AmbientOcclusion => self.trace_ray_ao(ray, eye, 0, opts, rng),
        }
    }

    /// Recursive Whitted tracing: Blinn-Phong direct light with hard
    /// shadows, plus a mirror bounce blended in by the surface's
    /// reflectiveness.
    ///
    /// `eye` is where the specular highlight is viewed from. Rays beyond
    /// `opts.max_depth` bounces, and rays rejected by the bounds, are black.
    pub fn trace_ray(&self, ray: &Ray, eye: Vector3, depth: usize,
        opts: &RenderOptions) -> Color {
        let i = match self.first_hit(ray, depth, opts) {
            Some(i) => i,
            None => return Color::black(),
        };

        let local = self.direct_lighting(i.what, &i, eye, i.what.material.ambient, opts);

        let k = i.what.reflectiveness();
        if k > 0.0 {
            let reflected = self.trace_ray(&Self::reflect(ray, &i), i.hit.point,
                depth + 1, opts);
            Color::lerp(&local, &reflected, k)
        } else {
            local
        }
    }

    /// Like `trace_ray`, but the ambient term is attenuated by an ambient
    /// occlusion estimate, and reflective surfaces mix in their reflection
    /// with the fixed weight `opts.ao_reflection_weight` rather than their
    /// own reflectiveness.
    pub fn trace_ray_ao(&self, ray: &Ray, eye: Vector3, depth: usize,
        opts: &RenderOptions, rng: &mut dyn RngCore) -> Color {
        let i = match self.first_hit(ray, depth, opts) {
            Some(i) => i,
            None => return Color::black(),
        };

        let ao = self.calculate_ambient_occlusion(i.hit.point, i.hit.normal, opts, rng);
        let ambient = i.what.material.ambient * (1.0 - ao);
        let local = self.direct_lighting(i.what, &i, eye, ambient, opts);

        if i.what.reflectiveness() > 0.0 {
            let reflected = self.trace_ray_ao(&Self::reflect(ray, &i), i.hit.point,
                depth + 1, opts, rng);
            Color::lerp(&local, &reflected, opts.ao_reflection_weight)
        } else {
            local
        }
    }

    /// Estimates the fraction of the hemisphere above `point` that is
    /// blocked by geometry within `opts.ao_max_distance`.
    ///
    /// Directions are drawn uniformly from the unit ball by rejection and
    /// flipped into the hemisphere around `normal`. Always in `[0, 1]`; a
    /// point with nothing nearby scores 0.
    pub fn calculate_ambient_occlusion(&self, point: Vector3, normal: Vector3,
        opts: &RenderOptions, rng: &mut dyn RngCore) -> f64 {
        if opts.ao_samples == 0 {
            return 0.0;
        }

        let n = normal.normalize();
        let origin = point + n * RAY_EPSILON;

        let occluded = (0..opts.ao_samples)
            .filter(|_| {
                let mut dir = Self::random_unit_vector(&mut *rng);
                if dir.dot(&n) < 0.0 {
                    dir = -dir;
                }

                any_closer(&self.objects, &Ray::new(origin, dir), opts.ao_max_distance)
            })
            .count();

        occluded as f64 / opts.ao_samples as f64
    }

    /// The nearest hit, unless the depth cap or the bounds stop the ray.
    fn first_hit(&self, ray: &Ray, depth: usize, opts: &RenderOptions)
        -> Option<Intersection> {
        if depth >= opts.max_depth {
            debug!("reflection depth {} reached", depth);
            return None;
        }

        if !self.bounds.accepts(ray) {
            return None;
        }

        self.intersect(ray)
    }

    /// Sums the contribution of every light at a hit.
    ///
    /// Shadowed lights leave only the ambient term, scaled by the light's
    /// intensity. A world without lights still shows the ambient color once.
    fn direct_lighting(&self, shape: &Shape, i: &Intersection, eye: Vector3,
        ambient: Color, opts: &RenderOptions) -> Color {
        let m = Material { ambient, ..shape.material };
        let diffuse = diffuse_at(shape, &i.hit);
        let point = i.hit.point;

        if self.lights.is_empty() {
            return m.ambient;
        }

        let mut color = Color::black();
        for light in self.lights.iter() {
            let to_light = light.position - point;
            let distance = to_light.magnitude();
            let dir = to_light / distance;

            if !opts.shadows || !self.is_shadowed(point, dir, distance) {
                color += blinn_phong(&m, diffuse, light, point, i.hit.normal, eye);
            } else {
                color += m.ambient * light.intensity;
            }
        }

        color
    }

    /// The mirror ray `D - 2(D.N)N`, nudged off the surface.
    fn reflect(ray: &Ray, i: &Intersection) -> Ray {
        let dir = ray.direction.reflect(&i.hit.normal).normalize();
        Ray::offset(i.hit.point, dir, RAY_EPSILON)
    }

    fn random_unit_vector(rng: &mut dyn RngCore) -> Vector3 {
        loop {
            let v = Vector3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let len_sq = v.dot(&v);
            if len_sq > 1e-6 && len_sq <= 1.0 {
                return v / len_sq.sqrt();
            }
        }
    }
}

#[cfg(test)]
fn test_rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(7)
}

#[cfg(test)]
fn matte(diffuse: Color) -> Material {
    Material::new(diffuse, Color::black(), Color::grey(0.1), 1.0)
}

#[test]
fn shadow_flips_when_light_moves_behind_occluder() {
    let mut w = World::new();
    w.add(Shape::sphere(Vector3::new(0.0, 2.0, 0.0), 0.5));
    let point = Vector3::zero();

    // Light off to the side: clear path.
    let light = Vector3::new(3.0, 4.0, 0.0);
    let v = light - point;
    assert!(!w.is_shadowed(point, v.normalize(), v.magnitude()));

    // Light straight above, beyond the sphere.
    let light = Vector3::new(0.0, 4.0, 0.0);
    let v = light - point;
    assert!(w.is_shadowed(point, v.normalize(), v.magnitude()));

    // Light between the point and the sphere.
    let light = Vector3::new(0.0, 1.0, 0.0);
    let v = light - point;
    assert!(!w.is_shadowed(point, v.normalize(), v.magnitude()));
}

#[test]
fn shadowed_light_contributes_ambient_only() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::white())));
    w.add(Shape::sphere(Vector3::new(0.0, 2.0, 0.0), 0.5));
    w.add_light(PointLight::new(Vector3::new(0.0, 4.0, 0.0), 0.5));

    let eye = Vector3::new(0.0, 1.0, 1.0);
    let r = Ray::normalized(eye, Vector3::new(0.0, -1.0, -1.0));
    let opts = RenderOptions::default();

    assert_eq!(w.trace_ray(&r, eye, 0, &opts), Color::grey(0.05));

    // With shadows disabled the light reaches the plane.
    let no_shadows = RenderOptions { shadows: false, ..opts };
    let lit = w.trace_ray(&r, eye, 0, &no_shadows);
    assert!(lit.r > 0.4);
}

#[test]
fn miss_is_black() {
    let mut w = World::new();
    w.add(Shape::sphere(Vector3::new(0.0, 0.0, -5.0), 1.0));
    w.add_light(PointLight::new(Vector3::new(0.0, 5.0, 0.0), 1.0));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(w.trace_ray(&r, Vector3::zero(), 0, &RenderOptions::default()),
        Color::black());
}

#[test]
fn no_lights_gives_ambient_floor() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::red())));

    let opts = RenderOptions::default();
    for dir in [
        Vector3::new(0.0, -1.0, -1.0),
        Vector3::new(0.3, -1.0, -0.2),
        Vector3::new(-0.5, -0.1, 0.4),
    ].iter() {
        let r = Ray::normalized(Vector3::zero(), *dir);
        assert_eq!(w.trace_ray(&r, Vector3::zero(), 0, &opts), Color::grey(0.1));
    }
}

#[test]
fn bounds_gate_primary_rays() {
    let mut w = World::new();
    w.add(Shape::sphere(Vector3::new(0.0, 0.0, -5.0), 1.0)
        .with_material(matte(Color::red())));
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let opts = RenderOptions::default();

    assert_eq!(w.trace_ray(&r, Vector3::zero(), 0, &opts), Color::grey(0.1));

    w.bounds = BoundingSphere::new(Vector3::new(10.0, 0.0, 0.0), 1.0);
    assert_eq!(w.trace_ray(&r, Vector3::zero(), 0, &opts), Color::black());
}

#[test]
fn depth_cap_returns_black() {
    let mut w = World::new();
    w.add(Shape::sphere(Vector3::new(0.0, 0.0, -5.0), 1.0));
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let opts = RenderOptions::default();

    assert_eq!(w.trace_ray(&r, Vector3::zero(), opts.max_depth, &opts),
        Color::black());
}

#[test]
fn facing_mirrors_terminate_with_finite_color() {
    let mut w = World::new();
    let mirror = Material {
        diffuse: Color::grey(0.2),
        specular: Color::white(),
        ambient: Color::grey(0.1),
        exponent: 50.0,
        reflectiveness: 1.0,
    };
    w.add(Shape::plane(Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0))
        .with_material(mirror));
    w.add(Shape::plane(Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0))
        .with_material(mirror));
    w.add_light(PointLight::new(Vector3::new(0.0, 0.5, 0.0), 1.0));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let opts = RenderOptions::default();
    let c = w.trace_ray(&r, Vector3::zero(), 0, &opts);

    // Every bounce is a perfect mirror, so only the cap ends the recursion.
    assert!(c.is_finite());
    assert_eq!(c, Color::black());

    let mut rng = test_rng();
    let ao_opts = RenderOptions { integrator: Integrator::AmbientOcclusion, ..opts };
    assert!(w.color_at(&r, Vector3::zero(), &ao_opts, &mut rng).is_finite());
}

#[test]
fn partial_reflection_blends() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::black()).with_reflectiveness(0.5)));
    w.add(Shape::sphere(Vector3::new(0.0, 1.0, 0.0), 1.0)
        .with_material(Material::new(Color::black(), Color::black(), Color::red(), 1.0)));

    // Straight down onto the plane, bouncing straight up into the sphere.
    let eye = Vector3::new(0.0, 5.0, 0.0);
    let r = Ray::new(Vector3::new(0.0, -0.5, 0.0), Vector3::new(0.0, -1.0, 0.0));
    let c = w.trace_ray(&r, eye, 0, &RenderOptions::default());

    // Half the plane's ambient, half the sphere's red.
    assert_eq!(c, Color::rgb(0.55, 0.05, 0.05));
}

#[test]
fn lone_plane_has_no_occlusion() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0)));
    let mut rng = test_rng();

    let ao = w.calculate_ambient_occlusion(Vector3::zero(),
        Vector3::new(0.0, 1.0, 0.0), &RenderOptions::default(), &mut rng);
    assert_eq!(ao, 0.0);
}

#[test]
fn occlusion_stays_in_unit_interval() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0)));
    w.add(Shape::sphere(Vector3::new(0.0, 1.2, 0.0), 1.0));
    w.add(Shape::cube(Vector3::new(1.0, 0.5, 0.0), 1.0));
    let opts = RenderOptions::default();
    let mut rng = test_rng();

    for x in [-3.0, -1.0, -0.2, 0.0, 0.3, 2.0].iter() {
        let ao = w.calculate_ambient_occlusion(Vector3::new(*x, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0), &opts, &mut rng);
        assert!(ao >= 0.0 && ao <= 1.0);
    }

    // Under a sphere that covers the whole sky within reach, something is
    // always hit.
    let mut closed = World::new();
    closed.add(Shape::sphere(Vector3::zero(), 1.0));
    let ao = closed.calculate_ambient_occlusion(Vector3::zero(),
        Vector3::new(0.0, 1.0, 0.0), &opts, &mut rng);
    assert_eq!(ao, 1.0);
}

#[test]
fn ambient_occlusion_darkens_ambient() {
    let mut w = World::new();
    w.add(Shape::plane(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0))
        .with_material(matte(Color::white())));
    let eye = Vector3::new(0.0, 1.0, 0.0);
    let r = Ray::new(eye, Vector3::new(0.0, -1.0, 0.0));
    let opts = RenderOptions { integrator: Integrator::AmbientOcclusion, ..Default::default() };
    let mut rng = test_rng();

    // Nothing nearby: identical to the plain integrator.
    assert_eq!(w.color_at(&r, eye, &opts, &mut rng), Color::grey(0.1));

    // A wall right next to the hit point blocks part of the sky.
    w.add(Shape::plane(Vector3::new(0.0, 0.0, -0.2), Vector3::new(0.0, 0.0, 1.0)));
    let c = w.color_at(&r, eye, &opts, &mut rng);
    assert!(c.r < 0.1 && c.r > 0.0);
}
