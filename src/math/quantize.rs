//! Quantization between normalized floats and n-bit unsigned integers.
//!
//! Used to convert HDR float colors into 8-bit channels and back. Inputs
//! outside `[0, 1]` saturate instead of wrapping.

/// Divides in f64 so the result is correctly rounded for all 8/16 bit inputs.
#[inline(always)]
fn precise_divide(a: f32, b: f32) -> f32 {
    (a as f64 / b as f64) as f32
}

#[inline]
pub fn dequantize_unsigned<const BITS: u8>(i: u32) -> f32 {
    let n = (1u32 << BITS) - 1;
    precise_divide(i.min(n) as f32, n as f32)
}

/// Maps `x` onto `0..2^BITS`, using `2^BITS` buckets of equal width.
///
/// NaN and negative values map to 0, values above 1 map to the maximum.
#[inline]
pub fn quantize_unsigned<const BITS: u8>(x: f32) -> u32 {
    let n = (1u32 << BITS) - 1;
    let np1 = 1u32 << BITS;
    if x.is_nan() || x <= 0.0 {
        return 0;
    }
    (x * (np1 as f32)).min(n as f32) as u32
}

#[inline]
pub fn dequantize_unsigned_8(i: u8) -> f32 {
    dequantize_unsigned::<8>(i as u32)
}

#[inline]
pub fn quantize_unsigned_8(x: f32) -> u8 {
    quantize_unsigned::<8>(x) as u8
}
