//! The parser crate's error type.
//!
//! Most failure modes in `spec.md`'s taxonomy (§7) are not surfaced here at
//! all: preamble mismatches, unknown VRs, undefined lengths and odd lengths
//! are logged and recovered from in place. `Error` only covers the cases
//! that truncate a read outright — out-of-bounds slicing, and the single
//! fatal case of an empty input buffer.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("empty input: no bytes to read"))]
    EmptyInput,

    #[snafu(display(
        "out of bounds: requested {requested} bytes at offset {offset}, only {available} available"
    ))]
    OutOfBounds {
        offset: usize,
        requested: usize,
        available: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
