//! Core tag, VR and value types shared by the dataset reader and the pixel
//! data decoder.
//!
//! This crate has no I/O and no decoding logic of its own; it only defines
//! the vocabulary ([`Tag`], [`VR`], [`Value`]) the other crates in the
//! workspace decode bytes into.

pub mod error;
pub mod tag;
pub mod value;
pub mod vr;

pub use error::Error;
pub use tag::Tag;
pub use value::Value;
pub use vr::VR;
