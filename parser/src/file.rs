//! Top-level orchestration: preamble → meta → command set → mode detection
//! → dataset.

use crate::dataset::{read_dataset, Dataset, Element};
use crate::error::{EmptyInputSnafu, Result};
use crate::lookup::{self, TagQuery};
use crate::mode;
use crate::preamble;

/// The union of main Dataset, File Meta Information and Command Set
/// elements, plus the two flags the mode detector settled on for the main
/// dataset. Per `spec.md` §3, key collisions across the three blocks
/// resolve in favor of the main dataset, then meta, then command set; see
/// [`FullDataset::get`].
#[derive(Debug, Clone)]
pub struct FullDataset {
    pub dataset: Dataset,
    pub meta: Dataset,
    pub command_set: Dataset,
    pub is_implicit_vr: bool,
    pub is_little_endian: bool,
}

impl FullDataset {
    /// Looks up a tag across all three blocks, main dataset first, in the
    /// priority order `spec.md` §3 describes in prose.
    pub fn get<'a>(&self, query: impl Into<TagQuery<'a>>) -> Option<&Element> {
        let query = query.into();
        lookup::get_tag_value(&self.dataset, query)
            .or_else(|| lookup::get_tag_value(&self.meta, query))
            .or_else(|| lookup::get_tag_value(&self.command_set, query))
    }
}

/// Reads a complete file buffer into a [`FullDataset`], per `spec.md` §6.
///
/// Only a totally empty buffer is a hard error; every other malformation
/// (missing magic, undefined lengths, unknown VRs, truncated elements) is
/// logged and recovered from, yielding a partial dataset.
pub fn read_file(bytes: &[u8]) -> Result<FullDataset> {
    if bytes.is_empty() {
        return EmptyInputSnafu.fail();
    }

    let preamble = preamble::read_preamble(bytes);
    tracing::debug!(magic_matched = preamble.magic_matched, cursor = preamble.new_cursor, "preamble read");

    let meta_outcome = read_dataset(bytes, preamble.new_cursor, false, true, Some(&mode::not_group_0002));
    tracing::debug!(elements = meta_outcome.dataset.len(), "file meta information read");

    let command_outcome = read_dataset(
        bytes,
        meta_outcome.new_cursor,
        false,
        true,
        Some(&mode::not_group_0000),
    );
    tracing::debug!(elements = command_outcome.dataset.len(), "command set read");

    let transfer_syntax_uid = lookup::get_tag_value(&meta_outcome.dataset, "TransferSyntaxUID")
        .and_then(|element| element.value.as_str().map(|s| s.to_string()));

    let (implicit_assumed, little_endian) = mode::detect(
        bytes,
        command_outcome.new_cursor,
        transfer_syntax_uid.as_deref(),
    );
    tracing::debug!(implicit_assumed, little_endian, "main dataset mode detected");

    let main_outcome = read_dataset(
        bytes,
        command_outcome.new_cursor,
        implicit_assumed,
        little_endian,
        None,
    );
    tracing::debug!(elements = main_outcome.dataset.len(), "main dataset read");

    Ok(FullDataset {
        dataset: main_outcome.dataset,
        meta: meta_outcome.dataset,
        command_set: command_outcome.dataset,
        is_implicit_vr: main_outcome.is_implicit_vr,
        is_little_endian: little_endian,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit_vr_element(group: u16, elem: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&group.to_le_bytes());
        bytes.extend_from_slice(&elem.to_le_bytes());
        bytes.extend_from_slice(vr);
        let mut value = value.to_vec();
        if value.len() % 2 != 0 {
            value.push(b' ');
        }
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&value);
        bytes
    }

    fn minimal_file(transfer_syntax: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        bytes.extend(explicit_vr_element(0x0002, 0x0010, b"UI", transfer_syntax.as_bytes()));
        bytes.extend(explicit_vr_element(0x0010, 0x0010, b"PN", b"DOE^JOHN "));
        bytes
    }

    #[test]
    fn empty_input_is_the_only_hard_error() {
        assert!(read_file(&[]).is_err());
    }

    #[test]
    fn minimal_valid_file_decodes_patient_name() {
        let bytes = minimal_file(mode::uid::EXPLICIT_VR_LITTLE_ENDIAN);
        let full = read_file(&bytes).unwrap();
        assert!(!full.is_implicit_vr);
        assert!(full.is_little_endian);
        let element = full.dataset.get("PatientName-1").unwrap();
        assert_eq!(element.value.as_str(), Some("DOE^JOHN"));
    }

    #[test]
    fn missing_magic_reparses_from_offset_zero() {
        let mut bytes = vec![0xAB; 132];
        bytes.extend(explicit_vr_element(0x0002, 0x0010, b"UI", mode::uid::EXPLICIT_VR_LITTLE_ENDIAN.as_bytes()));
        // parsing restarted at offset 0 without panicking, so the garbage
        // bytes are consumed as a (partial, malformed) read rather than
        // skipped; this is the permissive behavior spec.md §9 documents as
        // preserved rather than "fixed".
        read_file(&bytes).unwrap();
    }

    #[test]
    fn big_endian_transfer_syntax_flips_endianness() {
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        bytes.extend(explicit_vr_element(0x0002, 0x0010, b"UI", mode::uid::EXPLICIT_VR_BIG_ENDIAN.as_bytes()));
        // (0028,0010) US, value 512 big-endian = 0x02 0x00... wait big endian u16 512 = 0x02,0x00? clarify in-test
        let mut element = Vec::new();
        element.extend_from_slice(&0x0028u16.to_be_bytes());
        element.extend_from_slice(&0x0010u16.to_be_bytes());
        element.extend_from_slice(b"US");
        element.extend_from_slice(&2u16.to_be_bytes());
        element.extend_from_slice(&512u16.to_be_bytes());
        bytes.extend(element);

        let full = read_file(&bytes).unwrap();
        assert!(!full.is_little_endian);
        let rows = full.dataset.get("Rows-1").unwrap();
        assert_eq!(rows.value.as_i64(), Some(512));
    }
}
