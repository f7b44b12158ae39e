use std::ops::{ Add, AddAssign, Sub, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Values are
/// not clamped during shading, so intermediate sums may exceed 1.0; clamping
/// happens only when a color is quantised for output.
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # use whitted::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// ```
///
/// Blend a surface color with a reflection:
///
/// ```
/// # use whitted::color::Color;
/// let local = Color::red();
/// let reflected = Color::blue();
/// let mix = Color::lerp(&local, &reflected, 0.25);
/// assert_eq!(mix, Color::rgb(0.75, 0.0, 0.25));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(c: [f64; 3]) -> Color {
        Color { r: c[0], g: c[1], b: c[2] }
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> [f64; 3] {
        [c.r, c.g, c.b]
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(px: image::Rgb<u8>) -> Color {
        Color {
            r: px[0] as f64 / 255.0,
            g: px[1] as f64 / 255.0,
            b: px[2] as f64 / 255.0,
        }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// A grey with every channel set to `v`.
    pub fn grey(v: f64) -> Color {
        Color { r: v, g: v, b: v }
    }

    pub fn black() -> Color {
        Color::grey(0.0)
    }

    pub fn white() -> Color {
        Color::grey(1.0)
    }

    pub fn red() -> Color {
        Color { r: 1.0, g: 0.0, b: 0.0 }
    }

    pub fn green() -> Color {
        Color { r: 0.0, g: 1.0, b: 0.0 }
    }

    pub fn blue() -> Color {
        Color { r: 0.0, g: 0.0, b: 1.0 }
    }

    /// Computes the Hadamard product of two colors.
    ///
    /// The hadamard product multiplies each component of the two colors, and
    /// yields a new color containing those products.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Linear blend, `(1 - k) * c1 + k * c2`.
    pub fn lerp(c1: &Color, c2: &Color, k: f64) -> Color {
        (1.0 - k) * *c1 + k * *c2
    }

    /// Clamps each channel into `[0, 1]`.
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.max(0.0).min(1.0),
            g: self.g.max(0.0).min(1.0),
            b: self.b.max(0.0).min(1.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Quantises to 8 bits per channel. Channels are clamped and then
    /// truncated, so only exactly 1.0 maps to 255.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [(c.r * 255.0) as u8, (c.g * 255.0) as u8, (c.b * 255.0) as u8]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 0.2, g: 0.5, b: 0.5 };

    assert_eq!(c1 - c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
    assert_eq!(Color::rgb(1.0, 0.2, 0.4) * Color::rgb(0.9, 1.0, 0.1),
        Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn quantise_clamps_then_truncates() {
    assert_eq!(Color::rgb(1.5, -0.2, 0.5).to_rgb8(), [255, 0, 127]);
    assert_eq!(Color::grey(0.999).to_rgb8(), [254, 254, 254]);
}

#[test]
fn texel_to_color() {
    let c: Color = image::Rgb([255u8, 0, 51]).into();

    assert_eq!(c, Color::rgb(1.0, 0.0, 0.2));
}
