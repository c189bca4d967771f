//! Determines implicit/explicit VR and endianness, either from a decoded
//! Transfer Syntax UID or heuristically from the raw bytes.

use dcmview_core::vr::looks_like_vr_bytes;
use dcmview_core::VR;

use crate::cursor::ByteCursor;
use crate::unpack;

/// Well-known Transfer Syntax UIDs this detector recognizes by exact match.
pub mod uid {
    pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
    pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
    pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
    pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
}

/// A caller-supplied pure predicate over a just-probed element: whether to
/// stop *before* consuming it. No shared state; evaluated on `(group, vr,
/// length)` when a full header is in hand, or on `(group, None, 0)` during
/// the coarser mode-detection probe, which only has the tag bytes to go on.
pub type StopPredicate<'a> = &'a dyn Fn(u16, Option<VR>, u32) -> bool;

/// `_notGroup0002`: stops reading File Meta Information when the first
/// non-meta tag appears.
pub fn not_group_0002(group: u16, _vr: Option<VR>, _length: u32) -> bool {
    group != 0x0002
}

/// `_notGroup0000`: stops reading Command Set elements when the first
/// tag outside group 0 appears.
pub fn not_group_0000(group: u16, _vr: Option<VR>, _length: u32) -> bool {
    group != 0x0000
}

/// Determines whether the element at `cursor` is encoded without an
/// explicit VR, per `spec.md` §4.6.
pub fn is_implicit_vr(
    buf: &[u8],
    cursor: usize,
    assumed: bool,
    little_endian: bool,
    is_sequence: bool,
    stop_when: Option<StopPredicate>,
) -> bool {
    if is_sequence && assumed {
        return true;
    }

    let cur = ByteCursor::new(buf);
    if cur.remaining(cursor) < 6 {
        return assumed;
    }
    let probe = cur.slice(cursor, 6).expect("checked remaining above");
    let tag_bytes = [probe[0], probe[1]];
    let vr_bytes = [probe[4], probe[5]];

    let found_implicit = !looks_like_vr_bytes(vr_bytes);

    if found_implicit != assumed {
        if let Some(stop) = stop_when {
            let group = unpack::unpack_u16(&tag_bytes, little_endian);
            if stop(group, None, 0) {
                return found_implicit;
            }
        }
    }

    if found_implicit && is_sequence {
        return true;
    }

    found_implicit
}

/// Determines `(isImplicitVR, isLittleEndian)` either from a decoded
/// Transfer Syntax UID, or heuristically from the raw bytes when none is
/// known yet, per `spec.md` §4.6. The heuristic probe reads the candidate
/// group number as little-endian: at this point endianness is exactly what
/// is being determined, so this is a weak signal of last resort, preserved
/// as described rather than "fixed".
pub fn detect(buf: &[u8], cursor: usize, transfer_syntax_uid: Option<&str>) -> (bool, bool) {
    let cur = ByteCursor::new(buf);
    if cur.remaining(cursor) == 0 {
        return (true, true);
    }

    match transfer_syntax_uid {
        Some(value) => match value.trim() {
            uid::IMPLICIT_VR_LITTLE_ENDIAN => (true, true),
            uid::EXPLICIT_VR_LITTLE_ENDIAN => (false, true),
            uid::EXPLICIT_VR_BIG_ENDIAN => (false, false),
            uid::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN => {
                tracing::warn!("deflated transfer syntax not implemented; falling back to implicit VR little endian decoding");
                (true, true)
            }
            other => {
                tracing::debug!(uid = other, "unrecognized transfer syntax UID; assuming explicit VR little endian");
                (false, true)
            }
        },
        None => {
            if cur.remaining(cursor) < 6 {
                return (true, true);
            }
            let probe = cur.slice(cursor, 6).expect("checked remaining above");
            let group = unpack::unpack_u16(&[probe[0], probe[1]], true);
            let vr_bytes = [probe[4], probe[5]];
            match VR::from_binary(vr_bytes) {
                Some(_) => {
                    if group >= 0x0400 {
                        (false, false)
                    } else {
                        (false, true)
                    }
                }
                None => (true, true),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_detection_recognizes_explicit_vr() {
        // (0002,0010) UI ... after offset 132, as in spec.md's mode detection example
        let bytes = [0x02, 0x00, 0x10, 0x00, b'U', b'I'];
        assert!(!is_implicit_vr(&bytes, 0, true, true, false, None));
    }

    #[test]
    fn insufficient_bytes_return_the_assumption() {
        let bytes = [0x02, 0x00];
        assert!(is_implicit_vr(&bytes, 0, true, true, false, None));
        assert!(!is_implicit_vr(&bytes, 0, false, true, false, None));
    }

    #[test]
    fn detect_implicit_vr_little_endian_by_uid() {
        assert_eq!(
            detect(&[], 0, Some(uid::IMPLICIT_VR_LITTLE_ENDIAN)),
            (true, true)
        );
    }

    #[test]
    fn detect_explicit_vr_big_endian_by_uid() {
        assert_eq!(
            detect(&[], 0, Some(uid::EXPLICIT_VR_BIG_ENDIAN)),
            (false, false)
        );
    }

    #[test]
    fn detect_unknown_uid_assumes_explicit_little_endian() {
        assert_eq!(detect(&[], 0, Some("1.2.3.4.5")), (false, true));
    }

    #[test]
    fn detect_with_no_bytes_assumes_implicit_little_endian() {
        assert_eq!(detect(&[], 0, None), (true, true));
    }
}
