//! Decodes a single element header from the current cursor.

use dcmview_core::vr::looks_like_vr_bytes;
use dcmview_core::VR;

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::unpack;

/// `length == 0xFFFFFFFF` denotes an undefined length (SQ, or encapsulated
/// `OB`/`OW` pixel data). Recognized, never decoded.
pub const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// What an element header said about its VR. Distinguishes "no VR was ever
/// present to read" (true implicit-VR mode, or a short header whose VR bytes
/// don't even look like a VR) from "explicit VR bytes were present but don't
/// match a known code" — per `spec.md` §7's `UnknownVR` entry, the latter
/// must keep the literal bytes that were on the wire and skip dictionary
/// decoding entirely, rather than being treated the same as a missing VR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrOutcome {
    /// A recognized VR, explicit in the header or to be resolved later.
    Known(VR),
    /// No VR present in the header at all; the caller resolves one via the
    /// dictionary.
    NoneInHeader,
    /// Two uppercase-letter bytes were present but matched no known VR code.
    Unrecognized([u8; 2]),
}

impl VrOutcome {
    /// The VR if, and only if, it was recognized.
    pub fn known(self) -> Option<VR> {
        match self {
            VrOutcome::Known(vr) => Some(vr),
            _ => None,
        }
    }
}

/// The result of decoding one element header: tag, VR outcome, raw length,
/// and how many bytes the header itself occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedHeader {
    pub group: u16,
    pub element: u16,
    pub vr: VrOutcome,
    pub length: u32,
    pub header_size: usize,
}

/// Decodes one element header at `cursor`, following `spec.md` §4.4:
///
/// - implicit VR mode always reads the 8-byte `group/element/length32` form;
/// - explicit VR mode reads the 8-byte short form, falls back to the
///   implicit form if the VR bytes don't look like a VR at all (the
///   defensive fallback for intermixed modes), and reads 4 extra length
///   bytes when the VR is one of the `ExtraLengthVRs`.
pub fn parse_header(
    buf: &[u8],
    cursor: usize,
    implicit_vr: bool,
    little_endian: bool,
) -> Result<ParsedHeader> {
    let header_bytes = ByteCursor::new(buf).slice(cursor, 8)?;

    if implicit_vr {
        let (group, element, length) = unpack::unpack_implicit_header(header_bytes, little_endian);
        return Ok(ParsedHeader {
            group,
            element,
            vr: VrOutcome::NoneInHeader,
            length,
            header_size: 8,
        });
    }

    let (group, element, vr_bytes, length16) =
        unpack::unpack_explicit_header_short(header_bytes, little_endian);

    if !looks_like_vr_bytes(vr_bytes) {
        tracing::debug!(
            group,
            element,
            "VR bytes do not look like a VR code; falling back to implicit decoding"
        );
        let (group, element, length) = unpack::unpack_implicit_header(header_bytes, little_endian);
        return Ok(ParsedHeader {
            group,
            element,
            vr: VrOutcome::NoneInHeader,
            length,
            header_size: 8,
        });
    }

    match unpack::vr_from_bytes(vr_bytes) {
        Some(vr) if vr.is_extra_length() => {
            let extra = ByteCursor::new(buf).slice(cursor + 8, 4)?;
            let length = unpack::unpack_u32(extra, little_endian);
            Ok(ParsedHeader {
                group,
                element,
                vr: VrOutcome::Known(vr),
                length,
                header_size: 12,
            })
        }
        Some(vr) => Ok(ParsedHeader {
            group,
            element,
            vr: VrOutcome::Known(vr),
            length: length16 as u32,
            header_size: 8,
        }),
        None => {
            tracing::warn!(
                group,
                element,
                bytes = ?vr_bytes,
                "unrecognized VR code; keeping literal bytes and passing the value through raw"
            );
            Ok(ParsedHeader {
                group,
                element,
                vr: VrOutcome::Unrecognized(vr_bytes),
                length: length16 as u32,
                header_size: 8,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_vr_header_is_eight_bytes() {
        let bytes = [0x10, 0x00, 0x10, 0x00, 0x08, 0x00, 0x00, 0x00];
        let header = parse_header(&bytes, 0, true, true).unwrap();
        assert_eq!(header.group, 0x0010);
        assert_eq!(header.element, 0x0010);
        assert_eq!(header.vr, VrOutcome::NoneInHeader);
        assert_eq!(header.length, 8);
        assert_eq!(header.header_size, 8);
    }

    #[test]
    fn explicit_vr_short_header_is_eight_bytes() {
        let bytes = [0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00];
        let header = parse_header(&bytes, 0, false, true).unwrap();
        assert_eq!(header.vr, VrOutcome::Known(VR::PN));
        assert_eq!(header.length, 8);
        assert_eq!(header.header_size, 8);
    }

    #[test]
    fn extra_length_vr_consumes_twelve_header_bytes() {
        // (0008,0000) OB, reserved=0000, length=0x00000010 (16)
        let bytes = [
            0x08, 0x00, 0x00, 0x00, b'O', b'B', 0x00, 0x00, 0x10, 0x00, 0x00, 0x00,
        ];
        let header = parse_header(&bytes, 0, false, true).unwrap();
        assert_eq!(header.vr, VrOutcome::Known(VR::OB));
        assert_eq!(header.length, 16);
        assert_eq!(header.header_size, 12);
    }

    #[test]
    fn non_vr_bytes_fall_back_to_implicit() {
        // group/element followed by non-letter "VR" bytes and a plausible length32
        let bytes = [0x09, 0x00, 0x01, 0x10, 0x04, 0x00, 0x00, 0x00];
        let header = parse_header(&bytes, 0, false, true).unwrap();
        assert_eq!(header.vr, VrOutcome::NoneInHeader);
        assert_eq!(header.header_size, 8);
    }

    #[test]
    fn unrecognized_explicit_vr_keeps_the_literal_bytes() {
        // letters that form no known VR code
        let bytes = [0x09, 0x00, 0x01, 0x10, b'Z', b'Z', 0x04, 0x00];
        let header = parse_header(&bytes, 0, false, true).unwrap();
        assert_eq!(header.vr, VrOutcome::Unrecognized([b'Z', b'Z']));
        assert_eq!(header.header_size, 8);
    }
}
