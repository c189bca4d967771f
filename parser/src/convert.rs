//! Converts a VR and raw bytes into a typed [`Value`].

use dcmview_core::tag::Tag;
use dcmview_core::value::Value;
use dcmview_core::VR;
use smallvec::SmallVec;

use crate::unpack;

fn trim_value(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == '\0' || c == ' ')
        .trim_start_matches(|c: char| c == '\0')
}

fn ascii_multi(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .split('\\')
        .map(|part| trim_value(part).to_string())
        .collect()
}

fn string_value(raw: &[u8]) -> Value {
    let mut parts = ascii_multi(raw);
    if parts.len() == 1 {
        Value::Str(parts.pop().unwrap_or_default())
    } else {
        Value::StrList(SmallVec::from_vec(parts))
    }
}

fn int_string_value(raw: &[u8]) -> Value {
    let parts: Vec<i64> = ascii_multi(raw)
        .iter()
        .filter_map(|p| p.parse::<i64>().ok())
        .collect();
    match parts.len() {
        1 => Value::I64(parts[0]),
        _ => Value::I64List(SmallVec::from_vec(parts)),
    }
}

fn float_string_value(raw: &[u8]) -> Value {
    let parts: Vec<f64> = ascii_multi(raw)
        .iter()
        .filter_map(|p| p.parse::<f64>().ok())
        .collect();
    match parts.len() {
        1 => Value::F64(parts[0]),
        _ => Value::F64List(SmallVec::from_vec(parts)),
    }
}

fn u16_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<i64> = raw
        .chunks_exact(2)
        .map(|c| unpack::unpack_u16(c, little_endian) as i64)
        .collect();
    match values.len() {
        1 => Value::I64(values[0]),
        _ => Value::I64List(SmallVec::from_vec(values)),
    }
}

fn i16_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<i64> = raw
        .chunks_exact(2)
        .map(|c| unpack::unpack_u16(c, little_endian) as i16 as i64)
        .collect();
    match values.len() {
        1 => Value::I64(values[0]),
        _ => Value::I64List(SmallVec::from_vec(values)),
    }
}

fn u32_from_bytes(c: &[u8], little_endian: bool) -> u32 {
    // reuse the element header's u32 decoder; the layout is identical
    crate::unpack::unpack_u32(c, little_endian)
}

fn u32_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<i64> = raw
        .chunks_exact(4)
        .map(|c| u32_from_bytes(c, little_endian) as i64)
        .collect();
    match values.len() {
        1 => Value::I64(values[0]),
        _ => Value::I64List(SmallVec::from_vec(values)),
    }
}

fn i32_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<i64> = raw
        .chunks_exact(4)
        .map(|c| u32_from_bytes(c, little_endian) as i32 as i64)
        .collect();
    match values.len() {
        1 => Value::I64(values[0]),
        _ => Value::I64List(SmallVec::from_vec(values)),
    }
}

fn f32_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<f64> = raw
        .chunks_exact(4)
        .map(|c| f32::from_bits(u32_from_bytes(c, little_endian)) as f64)
        .collect();
    match values.len() {
        1 => Value::F64(values[0]),
        _ => Value::F64List(SmallVec::from_vec(values)),
    }
}

fn f64_array(raw: &[u8], little_endian: bool) -> Value {
    let values: Vec<f64> = raw
        .chunks_exact(8)
        .map(|c| {
            let hi = u32_from_bytes(&c[0..4], little_endian) as u64;
            let lo = u32_from_bytes(&c[4..8], little_endian) as u64;
            let bits = if little_endian { (lo << 32) | hi } else { (hi << 32) | lo };
            f64::from_bits(bits)
        })
        .collect();
    match values.len() {
        1 => Value::F64(values[0]),
        _ => Value::F64List(SmallVec::from_vec(values)),
    }
}

fn tag_ref_array(raw: &[u8], little_endian: bool) -> Value {
    let tags: Vec<Tag> = raw
        .chunks_exact(4)
        .map(|c| {
            let group = unpack::unpack_u16(&c[0..2], little_endian);
            let element = unpack::unpack_u16(&c[2..4], little_endian);
            Tag(group, element)
        })
        .collect();
    match tags.len() {
        1 => Value::TagRef(tags[0]),
        _ => Value::TagRefList(SmallVec::from_vec(tags)),
    }
}

/// Converts raw element bytes into a typed [`Value`] for the given VR, per
/// `spec.md` §4.3.
pub fn convert(vr: VR, raw: &[u8], little_endian: bool) -> Value {
    match vr {
        VR::UI | VR::CS | VR::SH | VR::LO | VR::ST | VR::LT | VR::UT | VR::PN | VR::AE
        | VR::AS | VR::DA | VR::TM | VR::DT => string_value(raw),
        VR::IS => int_string_value(raw),
        VR::DS => float_string_value(raw),
        VR::US => u16_array(raw, little_endian),
        VR::SS => i16_array(raw, little_endian),
        VR::UL => u32_array(raw, little_endian),
        VR::SL => i32_array(raw, little_endian),
        VR::FL => f32_array(raw, little_endian),
        VR::FD => f64_array(raw, little_endian),
        VR::AT => tag_ref_array(raw, little_endian),
        VR::OB | VR::OW | VR::OF | VR::UN => Value::Bytes(raw.to_vec()),
        VR::SQ => Value::Sequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_value_trims_trailing_space() {
        let value = convert(VR::PN, b"DOE^JOHN ", true);
        assert_eq!(value.as_str(), Some("DOE^JOHN"));
    }

    #[test]
    fn us_decodes_little_and_big_endian() {
        assert_eq!(convert(VR::US, &[0x04, 0x00], true).as_i64(), Some(4));
        assert_eq!(convert(VR::US, &[0x00, 0x04], false).as_i64(), Some(4));
    }

    #[test]
    fn is_parses_decimal_integer_string() {
        let value = convert(VR::IS, b"42", true);
        assert_eq!(value.as_i64(), Some(42));
    }

    #[test]
    fn ds_parses_decimal_float_string() {
        let value = convert(VR::DS, b"3.5", true);
        assert_eq!(value.as_f64(), Some(3.5));
    }

    #[test]
    fn ob_keeps_raw_bytes() {
        let value = convert(VR::OB, &[0xDE, 0xAD, 0xBE, 0xEF], true);
        assert_eq!(value.as_bytes(), Some([0xDE, 0xAD, 0xBE, 0xEF].as_slice()));
    }

    #[test]
    fn sq_is_a_sentinel() {
        assert_eq!(convert(VR::SQ, &[], true), Value::Sequence);
    }

    #[test]
    fn multiplicity_greater_than_one_yields_a_list() {
        let value = convert(VR::LO, b"A\\B\\C", true);
        assert_eq!(value.value_multiplicity(), 3);
    }
}
