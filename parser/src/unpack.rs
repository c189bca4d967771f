//! Endian-aware decoding of the fixed-width fields element headers are made
//! of.
//!
//! `spec.md` describes this component as consuming a pattern string such as
//! `<HH2sH`; here the handful of concrete layouts the element parser needs
//! (implicit-VR header, explicit-VR short header, the extra-length
//! follow-up word) are exposed directly as typed functions over
//! [`byteordered`], which is the idiomatic equivalent for a statically typed
//! reader — the set of layouts in play is fixed and small, so there is no
//! benefit to interpreting a format string at run time.

use byteordered::ByteOrdered;
use std::io::Cursor;

use dcmview_core::VR;

fn read_u16(bytes: &[u8; 2], little_endian: bool) -> u16 {
    let cursor = Cursor::new(bytes.as_slice());
    if little_endian {
        ByteOrdered::le(cursor).read_u16().unwrap_or(0)
    } else {
        ByteOrdered::be(cursor).read_u16().unwrap_or(0)
    }
}

fn read_u32(bytes: &[u8; 4], little_endian: bool) -> u32 {
    let cursor = Cursor::new(bytes.as_slice());
    if little_endian {
        ByteOrdered::le(cursor).read_u32().unwrap_or(0)
    } else {
        ByteOrdered::be(cursor).read_u32().unwrap_or(0)
    }
}

/// `{endian}HHL` — the 8-byte implicit-VR element header.
pub fn unpack_implicit_header(bytes: &[u8], little_endian: bool) -> (u16, u16, u32) {
    debug_assert!(bytes.len() >= 8);
    let group = read_u16(&[bytes[0], bytes[1]], little_endian);
    let element = read_u16(&[bytes[2], bytes[3]], little_endian);
    let length = read_u32(&[bytes[4], bytes[5], bytes[6], bytes[7]], little_endian);
    (group, element, length)
}

/// `{endian}HH2sH` — the 8-byte explicit-VR short header. The VR bytes are
/// returned as read, without interpretation, so the caller can apply the
/// "looks like a VR" defensive check before committing to explicit mode.
pub fn unpack_explicit_header_short(bytes: &[u8], little_endian: bool) -> (u16, u16, [u8; 2], u16) {
    debug_assert!(bytes.len() >= 8);
    let group = read_u16(&[bytes[0], bytes[1]], little_endian);
    let element = read_u16(&[bytes[2], bytes[3]], little_endian);
    let vr = [bytes[4], bytes[5]];
    let length = read_u16(&[bytes[6], bytes[7]], little_endian);
    (group, element, vr, length)
}

/// `{endian}L` — the 4-byte extra-length follow-up word used by the
/// `ExtraLengthVRs`.
pub fn unpack_u32(bytes: &[u8], little_endian: bool) -> u32 {
    debug_assert!(bytes.len() >= 4);
    read_u32(&[bytes[0], bytes[1], bytes[2], bytes[3]], little_endian)
}

/// A `u16` field embedded in a value payload (used by the converter for
/// `US`/`SS`/`AT`, and by pixel pipeline callers decoding raw bytes).
pub fn unpack_u16(bytes: &[u8], little_endian: bool) -> u16 {
    debug_assert!(bytes.len() >= 2);
    read_u16(&[bytes[0], bytes[1]], little_endian)
}

/// Attempts to parse two ASCII bytes as a [`VR`] code.
pub fn vr_from_bytes(bytes: [u8; 2]) -> Option<VR> {
    VR::from_binary(bytes)
}
