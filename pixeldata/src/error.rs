//! The pixel pipeline's error type: missing the handful of attributes the
//! pipeline cannot proceed without.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("dataset has no PixelData element"))]
    MissingPixelData,

    #[snafu(display("dataset is missing required attribute {keyword}"))]
    MissingAttribute { keyword: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
