//! The error type shared by the core tag/VR/value types.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("invalid tag string {value:?}: expected 8 hex digits"))]
    InvalidTagString { value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
