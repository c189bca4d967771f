//! Reads the 128-byte preamble and checks the `DICM` magic marker.

use crate::cursor::ByteCursor;

pub const MAGIC: &[u8; 4] = b"DICM";
pub const PREAMBLE_LEN: usize = 128;
pub const HEADER_LEN: usize = PREAMBLE_LEN + MAGIC.len();

/// Outcome of reading the preamble and magic marker.
#[derive(Debug, Clone)]
pub struct PreambleOutcome {
    /// The 128 opaque preamble bytes, or empty when the magic didn't match.
    pub preamble: Vec<u8>,
    /// Where the caller should resume reading: 132 on a match, 0 otherwise.
    pub new_cursor: usize,
    pub magic_matched: bool,
}

/// Reads 132 bytes at offset 0. On a magic mismatch (or a buffer too short
/// to hold preamble + magic), logs the condition and reports a reset to
/// offset 0: parsing proceeds anyway from the start of the buffer, a
/// permissive mode preserved verbatim from the source behavior (see
/// `spec.md` §9 open questions).
pub fn read_preamble(buf: &[u8]) -> PreambleOutcome {
    let cur = ByteCursor::new(buf);
    match cur.slice(0, HEADER_LEN) {
        Ok(bytes) => {
            let preamble = &bytes[..PREAMBLE_LEN];
            let magic = &bytes[PREAMBLE_LEN..HEADER_LEN];
            if magic == MAGIC {
                PreambleOutcome {
                    preamble: preamble.to_vec(),
                    new_cursor: HEADER_LEN,
                    magic_matched: true,
                }
            } else {
                tracing::warn!("DICM magic marker not found; re-parsing from offset 0");
                PreambleOutcome {
                    preamble: Vec::new(),
                    new_cursor: 0,
                    magic_matched: false,
                }
            }
        }
        Err(_) => {
            tracing::warn!("buffer too short for preamble and magic marker; re-parsing from offset 0");
            PreambleOutcome {
                preamble: Vec::new(),
                new_cursor: 0,
                magic_matched: false,
            }
        }
    }
}
