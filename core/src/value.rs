//! The typed value a converted element carries.

use smallvec::SmallVec;
use std::fmt;

use crate::tag::Tag;

/// A decoded element value.
///
/// Mirrors the tagged union `spec.md` §9 calls for: strings, integers and
/// floats each come in a scalar and a list-of variant so that VM = 1 callers
/// are not forced to unwrap a one-element list, while VM > 1 values keep
/// their full ordered sequence. `Bytes` covers VRs the converter leaves
/// untouched (`OB`, `OW`, `OF`, `UN`) and the `SQ` sentinel. `Unknown` is the
/// value of an element whose VR the converter has no mapping for.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    StrList(SmallVec<[String; 2]>),
    I64(i64),
    I64List(SmallVec<[i64; 4]>),
    F64(f64),
    F64List(SmallVec<[f64; 4]>),
    TagRef(Tag),
    TagRefList(SmallVec<[Tag; 2]>),
    Bytes(Vec<u8>),
    Sequence,
    Unknown,
}

impl Value {
    /// The number of values actually decoded, as opposed to the dictionary's
    /// nominal VM string.
    pub fn value_multiplicity(&self) -> usize {
        match self {
            Value::Str(_) | Value::I64(_) | Value::F64(_) | Value::TagRef(_) => 1,
            Value::StrList(v) => v.len(),
            Value::I64List(v) => v.len(),
            Value::F64List(v) => v.len(),
            Value::TagRefList(v) => v.len(),
            Value::Bytes(_) | Value::Sequence | Value::Unknown => 0,
        }
    }

    /// Borrow the value as a single string, if it holds exactly one string
    /// or can be trivially seen as one (a one-element `StrList`).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::StrList(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// Borrow the value as a single integer, if applicable.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            Value::I64List(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// Borrow the value as a single float, if applicable. Integer scalars
    /// also convert, since `DS`/`IS` and `US`/`SS`/... share callers that
    /// just want a numeric read.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(n) => Some(*n),
            Value::F64List(v) if v.len() == 1 => Some(v[0]),
            Value::I64(n) => Some(*n as f64),
            Value::I64List(v) if v.len() == 1 => Some(v[0] as f64),
            _ => None,
        }
    }

    /// Raw bytes, for the VRs the converter leaves undecoded.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::StrList(v) => f.write_str(&v.iter().cloned().collect::<Vec<_>>().join("\\")),
            Value::I64(n) => write!(f, "{n}"),
            Value::I64List(v) => {
                let joined = v.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("\\");
                f.write_str(&joined)
            }
            Value::F64(n) => write!(f, "{n}"),
            Value::F64List(v) => {
                let joined = v.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("\\");
                f.write_str(&joined)
            }
            Value::TagRef(tag) => write!(f, "{tag}"),
            Value::TagRefList(v) => {
                let joined = v.iter().map(|t| t.to_string()).collect::<Vec<_>>().join("\\");
                f.write_str(&joined)
            }
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Sequence => f.write_str("<sequence, not decoded>"),
            Value::Unknown => f.write_str("<unknown>"),
        }
    }
}
