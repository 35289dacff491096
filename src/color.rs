//! Float RGBA colors and their 8-bit counterpart
//!
//! [`Color`] channels are nominally in `[0, 1]` but HDR values are kept as
//! they are. [`Color32`] is the quantized form used for packing and hex
//! strings.

use crate::error::{MathError, check_index};
use crate::math::quantize::{dequantize_unsigned_8, quantize_unsigned_8};
use crate::math::scalar;
use crate::math::Vector4;
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Dummy)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Dummy)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Slightly warm yellow, not pure `(1, 1, 0)`
    pub const YELLOW: Color = Color::new(1.0, 0.921_568_63, 0.015_686_275, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0, 1.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5, 1.0);
    pub const GREY: Color = Color::GRAY;
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const AQUA: Color = Color::CYAN;
    pub const CREAM: Color = Color::new(1.0, 0.98, 0.94, 1.0);
    pub const FUCHSIA: Color = Color::MAGENTA;
    pub const DARK_GREEN: Color = Color::new(0.0, 0.5, 0.0, 1.0);
    pub const MAROON: Color = Color::new(0.5, 0.0, 0.0, 1.0);
    pub const DARK_BLUE: Color = Color::new(0.0, 0.0, 0.5, 1.0);
    pub const DARK_RED: Color = Color::MAROON;
    pub const OLIVE: Color = Color::new(0.5, 0.5, 0.0, 1.0);
    pub const SILVER: Color = Color::new(0.75, 0.75, 0.75, 1.0);
    pub const TEAL: Color = Color::new(0.0, 0.5, 0.5, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Perceived brightness
    pub fn grayscale(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    pub fn max_color_component(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        Self::lerp_unclamped(a, b, scalar::clamp01(t))
    }

    pub fn lerp_unclamped(a: Color, b: Color, t: f32) -> Color {
        Color::new(
            a.r + (b.r - a.r) * t,
            a.g + (b.g - a.g) * t,
            a.b + (b.b - a.b) * t,
            a.a + (b.a - a.a) * t,
        )
    }

    pub fn get(&self, index: usize) -> Result<f32, MathError> {
        check_index(index, 4).map(|i| self[i])
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), MathError> {
        let i = check_index(index, 4)?;
        self[i] = value;
        Ok(())
    }

    /// Hue, saturation and value, all in `[0, 1]` for LDR input.
    pub fn rgb_to_hsv(&self) -> (f32, f32, f32) {
        if self.b > self.g && self.b > self.r {
            hsv_from_dominant(4.0, self.b, self.r, self.g)
        } else if self.g > self.r {
            hsv_from_dominant(2.0, self.g, self.b, self.r)
        } else {
            hsv_from_dominant(0.0, self.r, self.g, self.b)
        }
    }

    /// Opaque color from hue, saturation and value.
    ///
    /// Without `hdr` the channels are clamped to `[0, 1]`.
    pub fn hsv_to_rgb(h: f32, s: f32, v: f32, hdr: bool) -> Color {
        if s == 0.0 {
            return Color::rgb(v, v, v);
        }
        if v == 0.0 {
            return Color::BLACK;
        }
        let h6 = h * 6.0;
        let sector = h6.floor();
        let f = h6 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as i32 {
            0 | 6 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            5 | -1 => (v, p, q),
            _ => (0.0, 0.0, 0.0),
        };
        if hdr {
            Color::rgb(r, g, b)
        } else {
            Color::rgb(scalar::clamp01(r), scalar::clamp01(g), scalar::clamp01(b))
        }
    }

    /// sRGB encoded copy of a linear color, alpha is left alone.
    pub fn gamma(&self) -> Color {
        let encode = |c: f32| {
            if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        };
        Color::new(encode(self.r), encode(self.g), encode(self.b), self.a)
    }

    /// Linear copy of an sRGB encoded color, alpha is left alone.
    pub fn linear(&self) -> Color {
        let decode = |c: f32| {
            if c <= 0.040_45 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        Color::new(decode(self.r), decode(self.g), decode(self.b), self.a)
    }

    /// Channels packed as `0xAABBGGRR`
    pub fn pack_abgr(&self) -> u32 {
        let c = Color32::from(*self);
        u32::from_le_bytes([c.r, c.g, c.b, c.a])
    }

    pub fn unpack_abgr(value: u32) -> Color {
        let [r, g, b, a] = value.to_le_bytes();
        Color32 { r, g, b, a }.into()
    }

    /// Channels packed as `0xRRGGBBAA`
    pub fn pack_rgba(&self) -> u32 {
        let c = Color32::from(*self);
        u32::from_be_bytes([c.r, c.g, c.b, c.a])
    }

    pub fn unpack_rgba(value: u32) -> Color {
        let [r, g, b, a] = value.to_be_bytes();
        Color32 { r, g, b, a }.into()
    }

    /// `#RRGGBBAA` of the quantized color
    pub fn to_hex(&self) -> String {
        Color32::from(*self).to_hex()
    }

    pub fn from_hex(s: &str) -> Result<Color, MathError> {
        Color32::from_hex(s).map(Color::from)
    }
}

/// Hue, saturation and value given the dominant channel and the other two in
/// hue order. `offset` selects the sextant pair of the dominant channel.
fn hsv_from_dominant(offset: f32, dominant: f32, one: f32, two: f32) -> (f32, f32, f32) {
    let v = dominant;
    if v == 0.0 {
        return (0.0, 0.0, v);
    }
    let min = one.min(two);
    let chroma = v - min;
    let (mut h, s) = if chroma != 0.0 {
        (offset + (one - two) / chroma, chroma / v)
    } else {
        (offset + (one - two), 0.0)
    };
    h /= 6.0;
    if h < 0.0 {
        h += 1.0;
    }
    (h, s, v)
}

impl Color32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b, self.a]))
    }

    /// Parses `#RRGGBB` (opaque) or `#RRGGBBAA`, digits in either case.
    pub fn from_hex(s: &str) -> Result<Color32, MathError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| MathError::InvalidHex(format!("'{s}' lacks the leading #")))?;
        match hex::decode(digits)?.as_slice() {
            [r, g, b] => Ok(Color32::new(*r, *g, *b, 255)),
            [r, g, b, a] => Ok(Color32::new(*r, *g, *b, *a)),
            bytes => Err(MathError::InvalidHex(format!(
                "'{s}' has {} channels",
                bytes.len()
            ))),
        }
    }
}

impl From<Color> for Color32 {
    fn from(c: Color) -> Self {
        Color32::new(
            quantize_unsigned_8(c.r),
            quantize_unsigned_8(c.g),
            quantize_unsigned_8(c.b),
            quantize_unsigned_8(c.a),
        )
    }
}

impl From<Color32> for Color {
    fn from(c: Color32) -> Self {
        Color::new(
            dequantize_unsigned_8(c.r),
            dequantize_unsigned_8(c.g),
            dequantize_unsigned_8(c.b),
            dequantize_unsigned_8(c.a),
        )
    }
}

impl From<Color> for Vector4 {
    fn from(c: Color) -> Self {
        Vector4::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Vector4> for Color {
    fn from(v: Vector4) -> Self {
        Color::new(v.x, v.y, v.z, v.w)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        Vector4::from(*self) == Vector4::from(*other)
    }
}

impl Index<usize> for Color {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            3 => &self.a,
            _ => panic!("invalid Color index {index}"),
        }
    }
}

impl IndexMut<usize> for Color {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.r,
            1 => &mut self.g,
            2 => &mut self.b,
            3 => &mut self.a,
            _ => panic!("invalid Color index {index}"),
        }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

/// Channel wise product, used for tinting
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, rhs: f32) -> Color {
        Color::new(self.r / rhs, self.g / rhs, self.b / rhs, self.a / rhs)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RGBA({:.3}, {:.3}, {:.3}, {:.3})",
            self.r, self.g, self.b, self.a
        )
    }
}

impl std::fmt::Display for Color32 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Serializes a [`Color`] as a `#RRGGBBAA` string instead of four floats.
///
/// Precision is limited to 8 bits per channel and HDR values are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorHex(pub Color);

impl Serialize for ColorHex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ColorHex {
    fn deserialize<D>(deserializer: D) -> Result<ColorHex, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .map(ColorHex)
            .map_err(serde::de::Error::custom)
    }
}
