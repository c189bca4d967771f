//! A byte-level reader for a DICOM-like binary interchange format: walks a
//! file buffer and produces an ordered dataset, inferring VR mode and
//! endianness along the way.
//!
//! The entry point is [`file::read_file`]; [`lookup::get_tag_value`] and
//! [`lookup::get_tags_group`] query the resulting [`dataset::Dataset`] or
//! [`file::FullDataset`] afterwards. Sequences (`SQ`) and undefined-length
//! items are recognized but not decoded — see `dataset::read_dataset`'s
//! handling of [`element::UNDEFINED_LENGTH`].

pub mod convert;
pub mod cursor;
pub mod dataset;
pub mod element;
pub mod error;
pub mod file;
pub mod lookup;
pub mod mode;
pub mod preamble;
pub mod unpack;

pub use dataset::{Dataset, Element};
pub use error::Error;
pub use file::{read_file, FullDataset};
pub use lookup::{get_tag_value, get_tags_group, TagQuery};
