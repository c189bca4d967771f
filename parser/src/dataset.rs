//! The ordered dataset produced by a read, and the loop that drives
//! [`crate::element::parse_header`] to build one.

use std::collections::HashMap;

use dcmview_core::tag::Tag;
use dcmview_core::value::Value;
use dcmview_core::VR;

use crate::cursor::ByteCursor;
use crate::element::{self, UNDEFINED_LENGTH};
use crate::mode::{self, StopPredicate};

/// A single decoded element, keyed into its [`Dataset`] under a safe key
/// derived from its keyword.
#[derive(Debug, Clone)]
pub struct Element {
    pub group: u16,
    pub element: u16,
    /// The VR as read or inferred; `"Unknown-PrivateTag"` when a private
    /// tag's VR could not be determined at all (implicit VR mode).
    pub vr: String,
    pub length: u32,
    pub raw_value: Vec<u8>,
    pub value: Value,
    pub keyword: String,
    pub name: String,
    pub vm: String,
    pub retired: bool,
}

impl Element {
    pub fn tag(&self) -> Tag {
        Tag(self.group, self.element)
    }
}

/// An ordered mapping from safe key to [`Element`], preserving the order
/// elements were encountered in the byte stream.
///
/// This is a small hand-rolled structure rather than a `BTreeMap<Tag, _>`
/// (the teacher's own `InMemDicomObject` shape): `spec.md` §3 requires
/// insertion order and a string-keyed disambiguation scheme for duplicate
/// keywords, neither of which a tag-ordered map can express — two elements
/// sharing a keyword still need two distinct entries.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    order: Vec<String>,
    by_key: HashMap<String, Element>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.by_key.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.order.iter().map(move |k| (k.as_str(), &self.by_key[k]))
    }

    /// `safeKey`: returns `keyword-1` if unoccupied, else `keyword-2`, and so
    /// on. Always suffixed, even for the first occurrence — preserved
    /// verbatim per `spec.md` §9 rather than "fixed" to use a bare keyword.
    fn safe_key(&self, base: &str) -> String {
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.by_key.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Inserts an element under a freshly computed safe key and returns the
    /// key used.
    pub fn insert(&mut self, keyword: &str, element: Element) -> String {
        let key = self.safe_key(keyword);
        self.order.push(key.clone());
        self.by_key.insert(key.clone(), element);
        key
    }
}

/// The outcome of driving [`element::parse_header`] in a loop over a span of
/// the buffer: the dataset built, where the caller should resume reading,
/// and the VR mode that was actually used.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub dataset: Dataset,
    pub new_cursor: usize,
    pub is_implicit_vr: bool,
}

/// Drives [`element::parse_header`] from `start_cursor`, building a dataset.
/// Used for File Meta, Command Set and the main dataset alike, per
/// `spec.md` §4.5; `stop_when` supplies the block-specific termination
/// predicate (or `None` to read until the buffer is exhausted).
pub fn read_dataset(
    buf: &[u8],
    start_cursor: usize,
    implicit_vr_assumed: bool,
    little_endian: bool,
    stop_when: Option<StopPredicate>,
) -> ReadOutcome {
    let is_implicit_vr = mode::is_implicit_vr(
        buf,
        start_cursor,
        implicit_vr_assumed,
        little_endian,
        true,
        stop_when,
    );

    let mut dataset = Dataset::new();
    let mut offset = 0usize;

    loop {
        let cursor = start_cursor + offset;
        if ByteCursor::new(buf).remaining(cursor) < 8 {
            break;
        }

        let header = match element::parse_header(buf, cursor, is_implicit_vr, little_endian) {
            Ok(header) => header,
            Err(_) => {
                tracing::warn!(offset = cursor, "out of bounds reading element header; terminating read");
                break;
            }
        };

        if let Some(stop) = stop_when {
            if stop(header.group, header.vr.known(), header.length) {
                break;
            }
        }

        offset += header.header_size;

        if header.length == UNDEFINED_LENGTH {
            tracing::debug!(
                tag = %Tag(header.group, header.element),
                "undefined length (SQ or encapsulated pixel data); not decoded, terminating read"
            );
            break;
        }
        if header.length == 0 {
            tracing::debug!(tag = %Tag(header.group, header.element), "zero-length element; terminating read");
            break;
        }

        let value_cursor = start_cursor + offset;
        let raw = match ByteCursor::new(buf).slice(value_cursor, header.length as usize) {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::warn!(
                    offset = value_cursor,
                    length = header.length,
                    "out of bounds reading element value; terminating read"
                );
                break;
            }
        };
        offset += header.length as usize;

        if header.length % 2 != 0 {
            tracing::debug!(tag = %Tag(header.group, header.element), length = header.length, "odd-length value");
        }

        let tag = Tag(header.group, header.element);
        let dict_entry = if tag.is_private() {
            dcmview_dictionary::unknown_private_tag()
        } else if header.element == 0x0000 {
            dcmview_dictionary::group_length()
        } else {
            dcmview_dictionary::resolve(tag)
        };

        let (vr_for_decoding, vr_string): (Option<VR>, String) = match header.vr {
            element::VrOutcome::Known(vr) => (Some(vr), vr.to_str().to_string()),
            // Explicit VR bytes were present but matched no known code: keep
            // the literal bytes as read and skip dictionary-driven decoding
            // entirely, per spec.md §7's UnknownVR contract.
            element::VrOutcome::Unrecognized(bytes) => (None, String::from_utf8_lossy(&bytes).into_owned()),
            element::VrOutcome::NoneInHeader if tag.is_private() => (None, "Unknown-PrivateTag".to_string()),
            element::VrOutcome::NoneInHeader => (Some(dict_entry.vr), dict_entry.vr.to_str().to_string()),
        };

        let value = match vr_for_decoding {
            Some(vr) => crate::convert::convert(vr, raw, little_endian),
            None => Value::Bytes(raw.to_vec()),
        };

        let element_record = Element {
            group: header.group,
            element: header.element,
            vr: vr_string,
            length: header.length,
            raw_value: raw.to_vec(),
            value,
            keyword: dict_entry.keyword.to_string(),
            name: dict_entry.name.to_string(),
            vm: dict_entry.vm.to_string(),
            retired: dict_entry.retired,
        };

        dataset.insert(dict_entry.keyword, element_record);
    }

    ReadOutcome {
        dataset,
        new_cursor: start_cursor + offset,
        is_implicit_vr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit_vr_element(group: u16, elem: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&group.to_le_bytes());
        bytes.extend_from_slice(&elem.to_le_bytes());
        bytes.extend_from_slice(vr);
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        bytes.extend_from_slice(value);
        bytes
    }

    #[test]
    fn reads_a_single_explicit_vr_element() {
        let bytes = explicit_vr_element(0x0010, 0x0010, b"PN", b"DOE^JOHN ");
        let outcome = read_dataset(&bytes, 0, false, true, None);
        assert_eq!(outcome.dataset.len(), 1);
        let element = outcome.dataset.get("PatientName-1").unwrap();
        assert_eq!(element.value.as_str(), Some("DOE^JOHN"));
    }

    #[test]
    fn duplicate_keywords_are_disambiguated_with_suffixes() {
        let mut bytes = Vec::new();
        for _ in 0..3 {
            bytes.extend(explicit_vr_element(0x0010, 0x0010, b"PN", b"A"));
        }
        let outcome = read_dataset(&bytes, 0, false, true, None);
        assert_eq!(outcome.dataset.len(), 3);
        assert!(outcome.dataset.get("PatientName-1").is_some());
        assert!(outcome.dataset.get("PatientName-2").is_some());
        assert!(outcome.dataset.get("PatientName-3").is_some());
    }

    #[test]
    fn private_tag_is_preserved_verbatim() {
        let bytes = explicit_vr_element(0x0009, 0x1001, b"UN", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let outcome = read_dataset(&bytes, 0, false, true, None);
        let element = outcome.dataset.get("Unknown-PrivateTag-1").unwrap();
        assert_eq!(element.keyword, "Unknown-PrivateTag");
        assert_eq!(element.raw_value, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn unrecognized_vr_is_kept_literal_and_passed_through_raw() {
        // "ZZ" is not a known VR code; per spec.md §7's UnknownVR entry the
        // bytes actually on the wire must be kept and the value must not be
        // coerced through the dictionary's idea of this tag's VR.
        let bytes = explicit_vr_element(0x0010, 0x0010, b"ZZ", &[0xAB, 0xCD]);
        let outcome = read_dataset(&bytes, 0, false, true, None);
        let element = outcome.dataset.get("PatientName-1").unwrap();
        assert_eq!(element.vr, "ZZ");
        assert_eq!(element.raw_value, vec![0xAB, 0xCD]);
        assert_eq!(element.value.as_bytes(), Some([0xAB, 0xCD].as_slice()));
    }

    #[test]
    fn unrecognized_vr_on_a_private_tag_keeps_the_literal_code_too() {
        let bytes = explicit_vr_element(0x0009, 0x1001, b"ZZ", &[0x01, 0x02]);
        let outcome = read_dataset(&bytes, 0, false, true, None);
        let element = outcome.dataset.get("Unknown-PrivateTag-1").unwrap();
        assert_eq!(element.keyword, "Unknown-PrivateTag");
        assert_eq!(element.vr, "ZZ");
        assert_eq!(element.raw_value, vec![0x01, 0x02]);
    }

    #[test]
    fn stop_predicate_halts_before_consuming_the_header() {
        let mut bytes = explicit_vr_element(0x0002, 0x0010, b"UI", b"1.2");
        bytes.extend(explicit_vr_element(0x0010, 0x0010, b"PN", b"A"));
        let outcome = read_dataset(&bytes, 0, false, true, Some(&mode::not_group_0002));
        assert_eq!(outcome.dataset.len(), 1);
        assert_eq!(outcome.new_cursor, bytes.len() - explicit_vr_element(0x0010, 0x0010, b"PN", b"A").len());
    }
}
