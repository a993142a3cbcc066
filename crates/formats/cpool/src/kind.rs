use std::fmt;

use serde::Serialize;

/// Property name and type name of the terminating sentinel.
pub const NONE: &str = "None";

/// Property name that turns an `ArrayProperty` into a character roster.
pub const CHARACTER_POOL: &str = "CharacterPool";

/// The closed set of property payload shapes.
///
/// `CharacterRoster` shares the `ArrayProperty` wire type name with `Array`;
/// the two are told apart by the property name (see [`CHARACTER_POOL`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyKind {
    Int32,
    Bool,
    RawBytes,
    Text,
    Name,
    Struct,
    Array,
    CharacterRoster,
    None,
}

impl PropertyKind {
    /// Resolve a wire type name. `property_name` is only consulted for
    /// `ArrayProperty`.
    pub fn from_type_name(type_name: &str, property_name: &str) -> Option<Self> {
        match type_name {
            "IntProperty" => Some(Self::Int32),
            "BoolProperty" => Some(Self::Bool),
            "ByteProperty" => Some(Self::RawBytes),
            "StrProperty" => Some(Self::Text),
            "NameProperty" => Some(Self::Name),
            "StructProperty" => Some(Self::Struct),
            "ArrayProperty" if property_name == CHARACTER_POOL => Some(Self::CharacterRoster),
            "ArrayProperty" => Some(Self::Array),
            NONE => Some(Self::None),
            _ => None,
        }
    }

    /// Wire type name written in the property envelope.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int32 => "IntProperty",
            Self::Bool => "BoolProperty",
            Self::RawBytes => "ByteProperty",
            Self::Text => "StrProperty",
            Self::Name => "NameProperty",
            Self::Struct => "StructProperty",
            Self::Array | Self::CharacterRoster => "ArrayProperty",
            Self::None => NONE,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int32 => "Int32",
            Self::Bool => "Bool",
            Self::RawBytes => "RawBytes",
            Self::Text => "Text",
            Self::Name => "Name",
            Self::Struct => "Struct",
            Self::Array => "Array",
            Self::CharacterRoster => "CharacterRoster",
            Self::None => "None",
        };
        f.write_str(s)
    }
}
