use std::path::Path;

use image::RgbImage;
use log::info;

use crate::color::Color;
use crate::error::{ RenderError, RenderResult };

/// A 2D RGB image sampled with wrapping UV coordinates.
///
/// `v == 0` is the bottom row of the image, `v` close to 1 the top row.
#[derive(Clone, Debug)]
pub struct Texture {
    pixels: RgbImage,
}

impl From<RgbImage> for Texture {
    fn from(pixels: RgbImage) -> Texture {
        Texture { pixels }
    }
}

impl Texture {
    /// Decodes an image file of any format `image` understands.
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Texture> {
        let path = path.as_ref();
        let pixels = image::open(path)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        info!("loaded texture {} ({}x{})",
            path.display(), pixels.width(), pixels.height());

        Ok(Texture { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Samples the nearest texel.
    ///
    /// Both coordinates wrap into `[0, 1)`. Coordinates landing exactly on
    /// the image border (such as `v == 0`) index past the last row and
    /// sample black, as does an empty texture.
    pub fn color_at(&self, u: f64, v: f64) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = (u * self.width() as f64) as u32;
        let y = ((1.0 - v) * self.height() as f64) as u32;

        match self.pixels.get_pixel_checked(x, y) {
            Some(px) => Color::from(*px),
            None => Color::black(),
        }
    }
}

#[cfg(test)]
fn checker() -> Texture {
    // 2x2: top row red, green; bottom row blue, white.
    let mut img = RgbImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
    img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
    img.put_pixel(1, 1, image::Rgb([255, 255, 255]));

    Texture::from(img)
}

#[test]
fn v_zero_is_bottom() {
    let t = checker();

    assert_eq!(t.color_at(0.25, 0.25), Color::blue());
    assert_eq!(t.color_at(0.75, 0.25), Color::white());
    assert_eq!(t.color_at(0.25, 0.75), Color::red());
    assert_eq!(t.color_at(0.75, 0.75), Color::green());
}

#[test]
fn coordinates_wrap() {
    let t = checker();

    assert_eq!(t.color_at(1.25, 0.25), t.color_at(0.25, 0.25));
    assert_eq!(t.color_at(-0.25, -0.25), t.color_at(0.75, 0.75));
}

#[test]
fn border_and_empty_sample_black() {
    let t = checker();
    assert_eq!(t.color_at(0.25, 0.0), Color::black());

    let empty = Texture::from(RgbImage::new(0, 0));
    assert_eq!(empty.color_at(0.5, 0.5), Color::black());
}

#[test]
fn load_round_trip() {
    let path = std::env::temp_dir().join("whitted_texture_round_trip.png");
    let img = RgbImage::from_pixel(4, 2, image::Rgb([51, 102, 255]));
    img.save(&path).unwrap();

    let t = Texture::load(&path).unwrap();
    assert_eq!(t.width(), 4);
    assert_eq!(t.height(), 2);
    assert_eq!(t.color_at(0.5, 0.5), Color::rgb(0.2, 0.4, 1.0));

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_missing_file_fails() {
    let path = std::env::temp_dir().join("whitted_no_such_texture.png");

    match Texture::load(&path) {
        Err(RenderError::Image { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected an image error, got {:?}", other),
    }
}
