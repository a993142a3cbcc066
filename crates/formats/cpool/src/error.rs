use thiserror::Error;

use crate::kind::PropertyKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid header: expected FF FF FF FF, found {found:02X?}")]
    InvalidHeader { found: [u8; 4] },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    OutOfBounds {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("unknown property type {type_name:?} for property {name:?} at offset {offset:#x}")]
    UnknownPropertyType {
        name: String,
        type_name: String,
        offset: usize,
    },

    #[error("property {name:?} is {found}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: PropertyKind,
        found: PropertyKind,
    },

    #[error("invalid length {len} at offset {offset:#x}")]
    InvalidLength { offset: usize, len: i32 },

    #[error("string at offset {offset:#x} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("wide string at offset {offset:#x} is not valid UTF-16")]
    InvalidWideString { offset: usize },

    #[error("{kind} property cannot be named {name:?}")]
    RosterName { name: String, kind: PropertyKind },

    #[error("length {len} does not fit in a 32-bit length field")]
    LengthOverflow { len: usize },

    #[error("property nesting exceeds {limit} levels at offset {offset:#x}")]
    DepthLimit { offset: usize, limit: usize },

    #[error("decode cancelled after {completed} of {total} roster elements")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
