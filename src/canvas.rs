use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray caster: one color per pixel,
/// row by row. Once a frame is finished the canvas is handed to whatever
/// presents it, either as packed `0xRRGGBB` values (`to_packed`) or as a PPM
/// image on disk (`save`).
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a canvas to any writer in plain PPM (P3) format.
    ///
    /// Lines in the PPM output are clamped to 70 columns. If a channel value
    /// would cross the 70 column mark on a line, it is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut line = String::new();
            for pixel in row {
                for channel in [pixel.r, pixel.g, pixel.b] {
                    let value = channel.to_string();
                    if !line.is_empty() && line.len() + 1 + value.len() > 70 {
                        writeln!(out, "{}", line)?;
                        line.clear();
                    }
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(&value);
                }
            }
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = io::BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use minirt::color::Color;
    /// # use minirt::canvas::Canvas;
    /// let purple = Color::rgb(255, 0, 255);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Mutable access to the flattened, row-major pixel storage.
    ///
    /// Renderers split this into disjoint rows to fill them concurrently.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// The frame as packed `0xRRGGBB` values in row-major order.
    pub fn to_packed(&self) -> Vec<u32> {
        self.pixels.iter().map(|c| c.to_hex()).collect()
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.to_packed().len(), 200);
    assert!(c.to_packed().iter().all(|&p| p == 0));
}

#[test]
fn out_of_bounds_access() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());

    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c.read_pixel(0, 2), None);
    assert!(c.to_packed().iter().all(|&p| p == 0));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(0, 0, &Color::rgb(255, 0, 0));
    c.write_pixel(1, 0, &Color::rgb(0, 128, 255));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(),
        "P3\n2 1\n255\n255 0 0 0 128 255\n");
}

#[test]
fn ppm_lines_stay_within_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(255, 204, 153));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert_eq!(text.lines().skip(3).next().unwrap(),
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert!(text.ends_with('\n'));
}
