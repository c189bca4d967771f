//! Reconstructs a viewable grayscale image from raw `PixelData` bytes:
//! per-pixel bit layout, rescale slope/intercept, window/level clipping and
//! scaling to `0..=255`, and photometric inversion.
//!
//! Sequence/SQ decoding, encapsulated (compressed) pixel data, multi-frame
//! images and non-monochrome photometric interpretations are out of scope —
//! see `spec.md` §1.

pub mod error;
pub mod transform;

use dcmview_core::value::Value;
use dcmview_parser::{get_tag_value, Dataset};
use snafu::OptionExt;

pub use error::Error;
pub use transform::{Rescale, WindowLevel};

use error::{MissingAttributeSnafu, MissingPixelDataSnafu, Result};

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::F64(n) => Some(*n),
        Value::F64List(v) => v.first().copied(),
        Value::I64(n) => Some(*n as f64),
        Value::I64List(v) => v.first().copied().map(|n| n as f64),
        _ => None,
    }
}

fn required_u16(dataset: &Dataset, keyword: &'static str) -> Result<u16> {
    get_tag_value(dataset, keyword)
        .and_then(|element| element.value.as_i64())
        .map(|n| n as u16)
        .context(MissingAttributeSnafu { keyword })
}

/// Parses a raw sample value into a signed integer, per `spec.md` §4.8 step
/// 3: unsigned as-is when `pixelRepresentation == 0`, otherwise two's
/// complement over `bit_len` bits. The `0x8000`-style special case (the
/// most negative representable value) is handled explicitly, though it
/// agrees with the general two's-complement formula below — both are kept
/// since the spec calls the case out by name.
fn decode_sample(raw: u64, pixel_representation: u16, bit_len: u32) -> i64 {
    if pixel_representation == 0 {
        return raw as i64;
    }
    let sign_bit = 1u64 << (bit_len - 1);
    if raw == sign_bit {
        return -(sign_bit as i64);
    }
    if raw & sign_bit != 0 {
        let mask = (1u64 << bit_len) - 1;
        return -(((!raw) & mask) as i64 + 1);
    }
    raw as i64
}

/// Decodes `PixelData` into an ordered sequence of `"#RRGGBB"` color
/// strings, one per pixel, row-major as found in the source bytes (no
/// geometry is applied). Implements `spec.md` §4.8 in full.
pub fn decode_pixel_data(dataset: &Dataset) -> Result<Vec<String>> {
    let bits_allocated = required_u16(dataset, "BitsAllocated")?;
    let bits_stored = required_u16(dataset, "BitsStored")?;
    let high_bit = required_u16(dataset, "HighBit")?;
    let pixel_representation = required_u16(dataset, "PixelRepresentation")?;

    let photometric = get_tag_value(dataset, "PhotometricInterpretation")
        .and_then(|element| element.value.as_str())
        .unwrap_or_default()
        .to_string();

    let window_center = get_tag_value(dataset, "WindowCenter")
        .and_then(|element| value_as_f64(&element.value))
        .unwrap_or(610.0);
    let window_width = get_tag_value(dataset, "WindowWidth")
        .and_then(|element| value_as_f64(&element.value))
        .unwrap_or(1221.0);
    let rescale_slope = get_tag_value(dataset, "RescaleSlope")
        .and_then(|element| value_as_f64(&element.value))
        .unwrap_or(1.0);
    let rescale_intercept = get_tag_value(dataset, "RescaleIntercept")
        .and_then(|element| value_as_f64(&element.value))
        .unwrap_or(0.0);

    let pixel_data = get_tag_value(dataset, "PixelData").context(MissingPixelDataSnafu)?;
    let raw = &pixel_data.raw_value;

    let bytes_per_pixel = (bits_allocated as usize + 7) / 8;
    if bytes_per_pixel == 0 {
        tracing::warn!("BitsAllocated is zero; no pixels decoded");
        return Ok(Vec::new());
    }

    let reverse_bytes = (high_bit as u32 + 1) == bits_stored as u32;
    let bit_len = (bytes_per_pixel * 8) as u32;
    let rescale = Rescale::new(rescale_slope, rescale_intercept);
    let window = WindowLevel::new(window_center, window_width);
    let invert = photometric.eq_ignore_ascii_case("MONOCHROME1");

    if raw.len() % bytes_per_pixel != 0 {
        tracing::debug!(
            raw_len = raw.len(),
            bytes_per_pixel,
            "PixelData length is not a multiple of the pixel size; trailing bytes dropped"
        );
    }

    let colors = raw
        .chunks(bytes_per_pixel)
        .filter(|chunk| chunk.len() == bytes_per_pixel)
        .map(|chunk| {
            let ordered: Vec<u8> = if reverse_bytes {
                chunk.iter().rev().copied().collect()
            } else {
                chunk.to_vec()
            };
            let hex: String = ordered.iter().map(|b| format!("{b:02x}")).collect();
            let raw_int = u64::from_str_radix(&hex, 16).unwrap_or(0);

            let sample = decode_sample(raw_int, pixel_representation, bit_len);
            let rescaled = rescale.apply(sample as f64);
            let mut displayed = window.apply(rescaled);
            if invert {
                displayed = 255.0 - displayed;
            }
            let byte = displayed.floor() as u8;
            format!("#{byte:02X}{byte:02X}{byte:02X}")
        })
        .collect();

    Ok(colors)
}
