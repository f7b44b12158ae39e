use std::path::Path;

use image::RgbImage;
use log::info;

use crate::color::Color;
use crate::error::{ RenderError, RenderResult };

/// A canvas for drawing pixels.
///
/// The canvas stores the resultant colors for each pixel ray. Pixel `(0, 0)`
/// is the *bottom-left* corner; rows are flipped when the canvas is encoded,
/// so saved images have the usual top-left origin.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored bottom row first.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new, black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` counts rows up from the bottom
    /// of the image.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted::color::Color;
    /// # use whitted::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`. If the specified pixel
    /// location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Quantises the canvas to 8-bit RGB with the top row first.
    pub fn to_rgb_image(&self) -> RgbImage {
        let (w, h) = (self.width as u32, self.height as u32);

        RgbImage::from_fn(w, h, |x, row| {
            let y = self.height - 1 - row as usize;
            image::Rgb(self.pixels[y * self.width + x as usize].to_rgb8())
        })
    }

    /// Saves the canvas as an image. The format follows the file extension
    /// (PNG for `.png`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_rgb_image()
            .save(path)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?;

        info!("wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert_eq!(c.read_pixel(9, 19), Some(Color::black()));
    assert_eq!(c.read_pixel(10, 0), None);
}

#[test]
fn out_of_bounds_write_is_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::red());
    c.write_pixel(0, 5, &Color::red());

    assert_eq!(c, Canvas::new(2, 2));
}

#[test]
fn encoded_rows_are_flipped() {
    let mut c = Canvas::new(3, 2);
    c.write_pixel(0, 0, &Color::red());
    c.write_pixel(2, 1, &Color::blue());

    let img = c.to_rgb_image();
    assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(2, 0).0, [0, 0, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
}

#[test]
fn save_png_round_trip() {
    let path = std::env::temp_dir().join("whitted_canvas_round_trip.png");
    let mut c = Canvas::new(4, 4);
    c.write_pixel(1, 3, &Color::rgb(1.5, 0.5, 0.0));
    c.save(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.get_pixel(1, 0).0, [255, 127, 0]);

    std::fs::remove_file(&path).ok();
}
