use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::vector::Vector3;

/// A point light.
///
/// Lights are white; `intensity` scales the white light uniformly. There is
/// no falloff with distance.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vector3,
    pub intensity: f64,
}

impl PointLight {
    pub fn new(position: Vector3, intensity: f64) -> PointLight {
        PointLight { position, intensity }
    }

    /// The color this light shines with.
    pub fn color(&self) -> Color {
        Color::grey(self.intensity)
    }
}

/// A material record.
///
/// Materials use attributes from the Blinn-Phong reflection model, plus a
/// mirror coefficient. `reflectiveness` ranges from 0.0 (matte) to 1.0
/// (a perfect mirror).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub diffuse: Color,
    pub specular: Color,
    pub ambient: Color,
    pub exponent: f64,
    pub reflectiveness: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            diffuse: Color::white(),
            specular: Color::white(),
            ambient: Color::grey(0.1),
            exponent: 100.0,
            reflectiveness: 0.0,
        }
    }
}

impl Material {
    pub fn new(diffuse: Color, specular: Color, ambient: Color, exponent: f64)
        -> Material {
        Material { diffuse, specular, ambient, exponent, reflectiveness: 0.0 }
    }

    /// A perfect black mirror.
    pub fn mirror() -> Material {
        Material {
            diffuse: Color::black(),
            specular: Color::black(),
            ambient: Color::black(),
            exponent: 0.0,
            reflectiveness: 1.0,
        }
    }

    pub fn with_reflectiveness(self, reflectiveness: f64) -> Material {
        Material { reflectiveness, ..self }
    }
}

/// Evaluates Blinn-Phong shading for one light.
///
/// `diffuse` is passed separately from the material so that texture mapped
/// surfaces can substitute their sampled color. The normal does not need to
/// be unit length.
///
/// The result is `ambient + (diffuse * max(N.L, 0) + specular * max(N.H, 0)^e) * light`.
pub fn blinn_phong(m: &Material, diffuse: Color, light: &PointLight,
    point: Vector3, normal: Vector3, eye: Vector3) -> Color {
    let l = (light.position - point).normalize();
    let v = (eye - point).normalize();
    let h = (l + v).normalize();
    let n = normal.normalize();

    let diffuse = diffuse * n.dot(&l).max(0.0);
    let specular = m.specular * n.dot(&h).max(0.0).powf(m.exponent);

    m.ambient + (diffuse + specular) * light.color()
}

#[test]
fn light_straight_on() {
    let m = Material::new(Color::red(), Color::white(), Color::grey(0.1), 100.0);
    let light = PointLight::new(Vector3::new(0.0, 0.0, 10.0), 1.0);
    let eye = Vector3::new(0.0, 0.0, 5.0);

    // N, L, V and H are all aligned.
    let c = blinn_phong(&m, m.diffuse, &light,
        Vector3::zero(), Vector3::new(0.0, 0.0, 2.0), eye);
    assert_eq!(c, Color::rgb(2.1, 1.1, 1.1));
}

#[test]
fn light_behind_surface_leaves_ambient() {
    let m = Material::new(Color::red(), Color::white(), Color::grey(0.1), 100.0);
    let light = PointLight::new(Vector3::new(10.0, 0.0, -10.0), 1.0);
    let eye = Vector3::new(0.0, 0.0, 5.0);

    // N.H is about 0.38, which vanishes at exponent 100.
    let c = blinn_phong(&m, m.diffuse, &light,
        Vector3::zero(), Vector3::new(0.0, 0.0, 1.0), eye);
    assert_eq!(c, Color::grey(0.1));
}

#[test]
fn intensity_scales_direct_terms_only() {
    let m = Material::new(Color::grey(0.5), Color::black(), Color::grey(0.1), 1.0);
    let light = PointLight::new(Vector3::new(0.0, 10.0, 0.0), 0.5);
    let eye = Vector3::new(0.0, 10.0, 0.0);

    let c = blinn_phong(&m, m.diffuse, &light,
        Vector3::zero(), Vector3::new(0.0, 1.0, 0.0), eye);
    assert_eq!(c, Color::grey(0.35));
}

#[test]
fn texture_color_replaces_diffuse() {
    let m = Material::new(Color::red(), Color::black(), Color::black(), 1.0);
    let light = PointLight::new(Vector3::new(0.0, 1.0, 0.0), 1.0);

    let c = blinn_phong(&m, Color::blue(), &light,
        Vector3::zero(), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(c, Color::blue());
}

#[test]
fn material_from_partial_json() {
    let m: Material = serde_json::from_str(
        r#"{ "diffuse": [0.0, 1.0, 0.0], "reflectiveness": 0.5 }"#
    ).unwrap();

    assert_eq!(m.diffuse, Color::green());
    assert_eq!(m.reflectiveness, 0.5);
    assert_eq!(m.ambient, Color::grey(0.1));
}
