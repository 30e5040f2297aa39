use std::ops::{ Add, Mul };
use std::iter::Sum;

use crate::feq;
use crate::consts::MAX_CHANNEL;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Displayable
/// values range from 0.0 to 255.0 inclusive, but intermediate colors are
/// free to leave that range; lighting can push a channel well past 255 and
/// only the final `clamp` brings it back.
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # use sphere_tracer::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(255.0, 0.0, 0.0));
/// ```
///
/// Average a set of samples:
///
/// ```
/// # use sphere_tracer::color::Color;
/// let samples = [Color::green(), Color::blue()];
/// let blend = Color::mean(&samples);
/// assert_eq!(blend, Color::rgb(0.0, 127.5, 127.5));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating point
/// error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub const fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    /// The color white.
    pub const fn white() -> Color {
        Color::rgb(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL)
    }

    /// The color red.
    pub const fn red() -> Color {
        Color::rgb(MAX_CHANNEL, 0.0, 0.0)
    }

    /// The color green.
    pub const fn green() -> Color {
        Color::rgb(0.0, MAX_CHANNEL, 0.0)
    }

    /// The color blue.
    pub const fn blue() -> Color {
        Color::rgb(0.0, 0.0, MAX_CHANNEL)
    }

    /// Averages a set of colors.
    ///
    /// Each channel is the unweighted arithmetic mean of that channel across
    /// `colors`. An empty slice averages to black.
    pub fn mean(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::black();
        }

        let total: Color = colors.iter().copied().sum();
        total * (1.0 / colors.len() as f64)
    }

    /// Linearly blends two colors.
    ///
    /// Returns `self * (1 - k) + other * k`.
    pub fn blend(&self, other: &Color, k: f64) -> Color {
        *self * (1.0 - k) + *other * k
    }

    /// Clamps every channel into the displayable range `[0, 255]`.
    ///
    /// ```
    /// # use sphere_tracer::color::Color;
    /// let c = Color::rgb(300.0, -4.0, 12.5);
    /// assert_eq!(c.clamp(), Color::rgb(255.0, 0.0, 12.5));
    /// ```
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, MAX_CHANNEL),
            g: self.g.clamp(0.0, MAX_CHANNEL),
            b: self.b.clamp(0.0, MAX_CHANNEL),
        }
    }

    /// Converts a color to bytes, clamping first and rounding to the nearest
    /// integer.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [c.r.round() as u8, c.g.round() as u8, c.b.round() as u8]
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
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

/// Multiplies a color by a scalar, usually a light intensity.
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

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
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
fn multiply_colors() {
    let c1 = Color::rgb(20.0, 30.0, 40.0);

    assert_eq!(c1 * 2.0, Color::rgb(40.0, 60.0, 80.0));
}

#[test]
fn mean_of_four_samples() {
    let samples = [
        Color::rgb(0.0, 0.0, 0.0),
        Color::rgb(100.0, 0.0, 40.0),
        Color::rgb(200.0, 0.0, 40.0),
        Color::rgb(100.0, 400.0, 40.0),
    ];

    assert_eq!(Color::mean(&samples), Color::rgb(100.0, 100.0, 30.0));
    assert_eq!(Color::mean(&[]), Color::black());
}

#[test]
fn blend_colors() {
    let local = Color::rgb(100.0, 0.0, 0.0);
    let reflected = Color::rgb(0.0, 200.0, 0.0);

    assert_eq!(local.blend(&reflected, 0.0), local);
    assert_eq!(local.blend(&reflected, 1.0), reflected);
    assert_eq!(local.blend(&reflected, 0.25), Color::rgb(75.0, 50.0, 0.0));
}

#[test]
fn clamp_leaves_range_untouched() {
    let c = Color::rgb(0.0, 128.0, 255.0);

    assert_eq!(c.clamp(), c);
}

#[test]
fn color_to_bytes() {
    assert_eq!(Color::rgb(300.0, -1.0, 127.6).to_rgb8(), [255, 0, 128]);
}

