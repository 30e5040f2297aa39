use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. Once the user
/// specifies the desired image width and height, the `Camera` traces the
/// `World` and writes one color per pixel here.
///
/// Two coordinate systems are supported. *Screen* coordinates start at the
/// top-left corner with `y` growing downwards. *Centered* coordinates put
/// the origin in the middle of the canvas with `y` growing upwards, which is
/// the convention the camera projects from. Screen column `W/2 + x` and row
/// `H/2 - y - 1` hold centered pixel `(x, y)`.
///
/// Once rendering finishes, the `Canvas` can be saved as a PPM image or
/// handed off as raw RGBA bytes.
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
    ///
    /// Panics if `width * height` pixels cannot be allocated; scenes check
    /// their size up front with `Scene::check_canvas`.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Converts centered coordinates to screen coordinates.
    ///
    /// Returns `None` when the pixel falls outside of the canvas.
    pub fn to_screen(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let sx = (self.width / 2) as i64 + x;
        let sy = (self.height / 2) as i64 - y - 1;

        if sx < 0 || sy < 0 || sx >= self.width as i64 || sy >= self.height as i64 {
            return None;
        }

        Some((sx as usize, sy as usize))
    }

    /// Converts screen coordinates to centered coordinates.
    pub fn to_centered(&self, sx: usize, sy: usize) -> (i64, i64) {
        let x = sx as i64 - (self.width / 2) as i64;
        let y = (self.height / 2) as i64 - sy as i64 - 1;

        (x, y)
    }

    /// Writes a color to a location on the `Canvas`, in screen coordinates.
    ///
    /// Out-of-bounds pixels are ignored. The color is clamped into the
    /// displayable range before it is stored.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fifth column, third row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use sphere_tracer::color::Color;
    /// # use sphere_tracer::canvas::Canvas;
    /// let purple = Color::rgb(255.0, 0.0, 255.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel.clamp();
    }

    /// Writes a color to a location on the `Canvas`, in centered coordinates.
    ///
    /// Out-of-bounds pixels are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, pixel: &Color) {
        if let Some((sx, sy)) = self.to_screen(x, y) {
            self.write_pixel(sx, sy, pixel);
        }
    }

    /// Reads a color from a location on the `Canvas`, in screen coordinates.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Reads a color from a location on the `Canvas`, in centered coordinates.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Color> {
        let (sx, sy) = self.to_screen(x, y)?;
        self.read_pixel(sx, sy)
    }

    /// Flattens the canvas into RGBA bytes, row by row from the top.
    ///
    /// Alpha is always fully opaque. This is the layout 2D image buffers on
    /// most display surfaces expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in self.pixels.iter() {
            let [r, g, b] = pixel.to_rgb8();
            buf.extend_from_slice(&[r, g, b, 255]);
        }

        buf
    }

    /// Writes the canvas as a plain (P3) PPM image.
    ///
    /// Lines in the PPM output are clamped to 70 columns. If some color
    /// exceeds the 70 column mark on a line, it is moved to the next line over.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        // Write pixels, making sure that no line exceeds 70 columns
        let mut col = 0;
        for pixel in self.pixels.iter() {
            for channel in pixel.to_rgb8().iter() {
                let s = channel.to_string();

                if col == 0 {
                    write!(out, "{}", s)?;
                    col = s.len();
                } else if col + 1 + s.len() > 70 {
                    write!(out, "\n{}", s)?;
                    col = s.len();
                } else {
                    write!(out, " {}", s)?;
                    col += 1 + s.len();
                }
            }
        }

        // Terminate the PPM file with a newline
        writeln!(out)?;

        Ok(())
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.read_pixel(9, 19), Some(Color::black()));
    assert_eq!(c.read_pixel(10, 0), None);
    assert_eq!(c.read_pixel(0, 20), None);
}

#[test]
fn write_pixel_takes_column_then_row() {
    let mut c = Canvas::new(8, 8);
    c.write_pixel(4, 2, &Color::white());

    let bytes = c.to_rgba8();
    let at = (2 * 8 + 4) * 4;
    assert_eq!(&bytes[at..at + 4], &[255, 255, 255, 255]);
    assert_eq!(bytes.iter().filter(|&&b| b == 255).count(), 8 * 8 + 3);
}

#[test]
fn writes_are_clamped() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(1, 1, &Color::rgb(400.0, -3.0, 20.0));

    assert_eq!(c.read_pixel(1, 1), Some(Color::rgb(255.0, 0.0, 20.0)));
}

#[test]
fn out_of_bounds_writes_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());
    c.put_pixel(1, 0, &Color::white());
    c.put_pixel(0, -2, &Color::white());

    assert_eq!(c, Canvas::new(2, 2));
}

#[test]
fn centered_coordinates() {
    let c = Canvas::new(4, 4);

    assert_eq!(c.to_screen(0, 0), Some((2, 1)));
    assert_eq!(c.to_screen(-2, 1), Some((0, 0)));
    assert_eq!(c.to_screen(1, -2), Some((3, 3)));
    assert_eq!(c.to_screen(2, 0), None);
    assert_eq!(c.to_screen(0, 2), None);

    for sy in 0..4 {
        for sx in 0..4 {
            let (x, y) = c.to_centered(sx, sy);
            assert_eq!(c.to_screen(x, y), Some((sx, sy)));
        }
    }
}

#[test]
fn put_and_get_centered() {
    let mut c = Canvas::new(5, 3);
    c.put_pixel(-2, 0, &Color::red());

    // With an odd height the top row is y = 0 and the bottom row y = -2.
    assert_eq!(c.read_pixel(0, 0), Some(Color::red()));
    assert_eq!(c.get_pixel(-2, 0), Some(Color::red()));
    assert_eq!(c.get_pixel(2, -2), Some(Color::black()));
    assert_eq!(c.get_pixel(0, 1), None);
}

#[test]
fn rgba_bytes() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(1, 0, &Color::rgb(10.0, 20.0, 30.0));

    assert_eq!(c.to_rgba8(), vec![0, 0, 0, 255, 10, 20, 30, 255]);
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(0, 0, &Color::red());
    c.write_pixel(1, 1, &Color::rgb(0.0, 127.6, 300.0));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "P3\n2 2\n255\n255 0 0 0 0 0 0 0 0 0 128 255\n");
}

#[test]
fn ppm_lines_stay_short() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(255.0, 204.0, 153.0));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert!(text.ends_with('\n'));

    let values: Vec<&str> = text.lines().skip(3)
        .flat_map(|l| l.split_whitespace())
        .collect();
    assert_eq!(values.len(), 60);
}
