//! Static standard attribute dictionary.
//!
//! Run-time dictionaries are queried, never mutated: [`resolve`] looks up a
//! [`Tag`] against the compiled-in [`entries::ENTRIES`] table and returns a
//! [`DictEntry`] describing its VR, VM, name and keyword, following the
//! precedence rules `spec.md` §4.2 describes:
//!
//! 1. Private tags (odd group) never consult the table; they resolve to
//!    [`unknown_private_tag`] regardless of element number.
//! 2. Any non-private tag whose element number is `0x0000` resolves to
//!    [`group_length`], regardless of its group.
//! 3. Otherwise an exact `(group, element)` match in the table is returned.
//! 4. Anything else resolves to [`unknown`].

pub mod entries;

use std::collections::HashMap;

use dcmview_core::{Tag, VR};
use once_cell::sync::Lazy;

pub use entries::DictEntry;

static BY_TAG: Lazy<HashMap<Tag, &'static DictEntry>> =
    Lazy::new(|| entries::ENTRIES.iter().map(|e| (e.tag, e)).collect());

/// The entry produced for any element whose tag is not in the table.
pub fn unknown() -> DictEntry {
    DictEntry {
        tag: Tag(0, 0),
        vr: VR::UN,
        vm: "1",
        name: "Unknown",
        keyword: "Unknown",
        retired: false,
    }
}

/// The entry produced for private (odd-group) tags, which never consult the
/// table at all.
pub fn unknown_private_tag() -> DictEntry {
    DictEntry {
        tag: Tag(0, 0),
        vr: VR::UN,
        vm: "1",
        name: "Unknown-PrivateTag",
        keyword: "Unknown-PrivateTag",
        retired: false,
    }
}

/// The entry substituted whenever `element == 0x0000`, regardless of group.
pub fn group_length() -> DictEntry {
    DictEntry {
        tag: Tag(0, 0),
        vr: VR::UL,
        vm: "1",
        name: "Group Length",
        keyword: "GroupLength",
        retired: false,
    }
}

/// Resolve a tag to its dictionary entry, applying the private-tag,
/// group-length and exact-match precedence described above.
pub fn resolve(tag: Tag) -> DictEntry {
    if tag.is_private() {
        return unknown_private_tag();
    }
    if tag.element() == 0x0000 {
        return group_length();
    }
    BY_TAG.get(&tag).copied().copied().unwrap_or_else(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_tag() {
        let entry = resolve(Tag(0x0010, 0x0010));
        assert_eq!(entry.name, "Patient's Name");
        assert_eq!(entry.keyword, "PatientName");
        assert_eq!(entry.vr, VR::PN);
    }

    #[test]
    fn private_tags_bypass_the_table() {
        let entry = resolve(Tag(0x0009, 0x1001));
        assert_eq!(entry.keyword, "Unknown-PrivateTag");
    }

    #[test]
    fn group_length_applies_regardless_of_group() {
        let entry = resolve(Tag(0x0028, 0x0000));
        assert_eq!(entry.keyword, "GroupLength");
        assert_eq!(entry.vr, VR::UL);
        let entry = resolve(Tag(0x0008, 0x0000));
        assert_eq!(entry.keyword, "GroupLength");
    }

    #[test]
    fn unknown_non_private_tag_falls_back() {
        let entry = resolve(Tag(0x0008, 0x9999));
        assert_eq!(entry.keyword, "Unknown");
    }

    #[test]
    fn smoke_test_table_has_pixel_data() {
        let entry = resolve(Tag(0x7FE0, 0x0010));
        assert_eq!(entry.keyword, "PixelData");
        assert_eq!(entry.vr, VR::OW);
    }
}
