use std::ops::Add;
use std::str::FromStr;

use serde::{ Serialize, Deserialize };

use crate::error::RtError;

/// A color.
///
/// Represented with 8-bit red, green and blue channels, convertible to and
/// from a packed `0xRRGGBB` value. All arithmetic saturates: channels never
/// wrap past 255 or below 0.
///
/// # Examples
///
/// Unpack and repack a color:
///
/// ```
/// # use minirt::color::Color;
/// let orange = Color::from_hex(0xFF8000);
/// assert_eq!(orange, Color::rgb(255, 128, 0));
/// assert_eq!(orange.to_hex(), 0xFF8000);
/// ```
///
/// Add two colors:
///
/// ```
/// # use minirt::color::Color;
/// let sum = Color::rgb(200, 10, 0) + Color::rgb(100, 10, 0);
/// assert_eq!(sum, Color::rgb(255, 20, 0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Color {
        Color { r: c[0], g: c[1], b: c[2] }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> [u8; 3] {
        [c.r, c.g, c.b]
    }
}

/// Parses `r,g,b` (decimal channels) or `#RRGGBB`.
impl FromStr for Color {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Color, RtError> {
        let s = s.trim();
        let invalid = || RtError::InvalidScene(format!("invalid color `{}`", s));

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(invalid());
            }
            let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(Color::from_hex(packed));
        }

        let channels = s.split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| invalid())?;

        match channels.as_slice() {
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color { r: 0, g: 0, b: 0 }
    }

    pub fn white() -> Color {
        Color { r: 255, g: 255, b: 255 }
    }

    /// Unpacks a `0xRRGGBB` value. Bits above the low 24 are ignored.
    pub fn from_hex(packed: u32) -> Color {
        Color {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Packs this color as `0xRRGGBB`.
    pub fn to_hex(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Multiplies each channel by `ratio`, clamping into `[0, 255]`.
    ///
    /// ```
    /// # use minirt::color::Color;
    /// let c = Color::rgb(100, 200, 50);
    /// assert_eq!(c.scale(0.5), Color::rgb(50, 100, 25));
    /// assert_eq!(c.scale(2.0), Color::rgb(200, 255, 100));
    /// assert_eq!(c.scale(-1.0), Color::black());
    /// ```
    pub fn scale(&self, ratio: f64) -> Color {
        Color {
            r: Self::clamp_channel(self.r as f64 * ratio),
            g: Self::clamp_channel(self.g as f64 * ratio),
            b: Self::clamp_channel(self.b as f64 * ratio),
        }
    }

    /// Filters one color through another.
    ///
    /// Each channel is the product of both channels, normalized back into
    /// `[0, 255]`: blending with white leaves a color unchanged, blending with
    /// black yields black.
    pub fn blend(&self, other: &Color) -> Color {
        let mix = |a: u8, b: u8| ((a as u32 * b as u32 + 127) / 255) as u8;

        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Averages colors channel by channel, rounding to the nearest value.
    ///
    /// An empty set averages to black.
    pub fn mean<I>(colors: I) -> Color
        where I: IntoIterator<Item = Color> {
        let (n, r, g, b) = colors.into_iter()
            .fold((0u64, 0u64, 0u64, 0u64), |acc, c| {
                (acc.0 + 1, acc.1 + c.r as u64, acc.2 + c.g as u64,
                    acc.3 + c.b as u64)
            });

        if n == 0 {
            return Color::black();
        }

        Color {
            r: ((r + n / 2) / n) as u8,
            g: ((g + n / 2) / n) as u8,
            b: ((b + n / 2) / n) as u8,
        }
    }

    fn clamp_channel(value: f64) -> u8 {
        if value.is_nan() {
            return 0;
        }

        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Adds two colors together, saturating each channel at 255.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }
}

#[test]
fn add_colors_saturates() {
    let c1 = Color::rgb(250, 128, 3);
    let c2 = Color::rgb(10, 127, 4);

    assert_eq!(c1 + c2, Color::rgb(255, 255, 7));
}

#[test]
fn hex_conversion_ignores_high_bits() {
    assert_eq!(Color::from_hex(0xAB123456), Color::rgb(0x12, 0x34, 0x56));
}

#[test]
fn blend_with_white_is_identity() {
    let c = Color::rgb(12, 200, 77);

    assert_eq!(c.blend(&Color::white()), c);
    assert_eq!(c.blend(&Color::black()), Color::black());
}

#[test]
fn blend_halves() {
    let c = Color::rgb(255, 255, 0);
    let grey = Color::rgb(128, 128, 128);

    assert_eq!(c.blend(&grey), Color::rgb(128, 128, 0));
}

#[test]
fn scale_handles_nan() {
    assert_eq!(Color::white().scale(f64::NAN), Color::black());
}

#[test]
fn mean_of_colors() {
    let colors = [Color::rgb(0, 0, 0), Color::rgb(255, 100, 10)];

    assert_eq!(Color::mean(colors), Color::rgb(128, 50, 5));
    assert_eq!(Color::mean(std::iter::empty()), Color::black());
    assert_eq!(Color::mean(std::iter::repeat(Color::rgb(7, 8, 9)).take(16)),
        Color::rgb(7, 8, 9));
}

#[test]
fn parse_colors() {
    assert_eq!("255,0, 12".parse::<Color>().unwrap(), Color::rgb(255, 0, 12));
    assert_eq!("#00FF7f".parse::<Color>().unwrap(), Color::rgb(0, 255, 127));
    assert!("256,0,0".parse::<Color>().is_err());
    assert!("1,2".parse::<Color>().is_err());
    assert!("#12345".parse::<Color>().is_err());
}
