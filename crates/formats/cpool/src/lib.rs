//! Reader/writer for character pool files.
//!
//! A pool file is four `FF` magic bytes followed by a bag of tagged
//! properties. Decoding then re-encoding an unmodified file reproduces it
//! byte for byte.
//!
//! Layers:
//! - **Layer 1** (`cursor`): little-endian reads and writes, length-prefixed
//!   strings, padding
//! - **Layer 2** (`decode`/`encode`): property envelopes and bags
//! - **Layer 3** (`document`): whole files, plus tree utilities (`display`,
//!   `diff`, `template`)

pub mod cursor;
pub mod decode;
pub mod diff;
pub mod display;
pub mod document;
pub mod encode;
pub mod error;
pub mod kind;
pub mod options;
pub mod property;
pub mod template;
pub mod text;

pub use diff::{Change, ChangeKind, PathSegment, PropertyPath, diff_bags, diff_documents, is_modified};
pub use display::{bags_are_duplicates, canonical_display, is_duplicate};
pub use document::{Document, MAGIC, decode, encode};
pub use error::{Error, Result};
pub use kind::PropertyKind;
pub use options::{DecodeObserver, DecodeOptions};
pub use property::{Property, PropertyBag, PropertyValue, RosterValue, StructValue};
