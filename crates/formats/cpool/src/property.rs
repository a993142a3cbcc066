//! The in-memory property tree.
//!
//! Every node owns its children, so `Clone` is a full deep copy: a cloned
//! baseline never shares structure with the tree being edited.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::kind::{CHARACTER_POOL, PropertyKind};

/// One named, typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

/// Payload of a property, one variant per [`PropertyKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyValue {
    Int32(i32),
    Bool(bool),
    RawBytes(Vec<u8>),
    Text(String),
    /// ASCII identifier. Non-ASCII values are written as raw UTF-8 with a
    /// warning; the format has no wide form for names.
    Name(String),
    Struct(StructValue),
    Array(Vec<PropertyBag>),
    CharacterRoster(RosterValue),
    /// A property whose type name is `None`. Carries no payload.
    None,
}

/// Payload of a `StructProperty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructValue {
    /// Struct type name, e.g. `TAppearance`.
    pub type_name: String,
    pub body: PropertyBag,
}

/// Payload of the `CharacterPool` array: a header bag plus one bag per
/// character. Element counts are derived from `elements` on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterValue {
    pub header: PropertyBag,
    pub elements: Vec<PropertyBag>,
}

/// Ordered sequence of properties. Names may repeat; lookups return the
/// first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyBag {
    pub properties: Vec<Property>,
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Int32(_) => PropertyKind::Int32,
            Self::Bool(_) => PropertyKind::Bool,
            Self::RawBytes(_) => PropertyKind::RawBytes,
            Self::Text(_) => PropertyKind::Text,
            Self::Name(_) => PropertyKind::Name,
            Self::Struct(_) => PropertyKind::Struct,
            Self::Array(_) => PropertyKind::Array,
            Self::CharacterRoster(_) => PropertyKind::CharacterRoster,
            Self::None => PropertyKind::None,
        }
    }
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn int32(name: impl Into<String>, v: i32) -> Self {
        Self::new(name, PropertyValue::Int32(v))
    }

    pub fn bool(name: impl Into<String>, v: bool) -> Self {
        Self::new(name, PropertyValue::Bool(v))
    }

    pub fn raw_bytes(name: impl Into<String>, v: impl Into<Vec<u8>>) -> Self {
        Self::new(name, PropertyValue::RawBytes(v.into()))
    }

    pub fn text(name: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::Text(v.into()))
    }

    pub fn name_value(name: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::Name(v.into()))
    }

    pub fn structure(
        name: impl Into<String>,
        type_name: impl Into<String>,
        body: impl Into<PropertyBag>,
    ) -> Self {
        Self::new(
            name,
            PropertyValue::Struct(StructValue {
                type_name: type_name.into(),
                body: body.into(),
            }),
        )
    }

    pub fn array(name: impl Into<String>, elements: Vec<PropertyBag>) -> Self {
        Self::new(name, PropertyValue::Array(elements))
    }

    /// The `CharacterPool` roster. The name is fixed: on the wire only the
    /// name tells a roster apart from a plain array.
    pub fn roster(header: PropertyBag, elements: Vec<PropertyBag>) -> Self {
        Self::new(
            CHARACTER_POOL,
            PropertyValue::CharacterRoster(RosterValue { header, elements }),
        )
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    pub fn as_int32(&self) -> Result<i32> {
        match &self.value {
            PropertyValue::Int32(v) => Ok(*v),
            other => Err(mismatch(&self.name, PropertyKind::Int32, other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match &self.value {
            PropertyValue::Bool(v) => Ok(*v),
            other => Err(mismatch(&self.name, PropertyKind::Bool, other)),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.value {
            PropertyValue::RawBytes(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::RawBytes, other)),
        }
    }

    pub fn as_text(&self) -> Result<&str> {
        match &self.value {
            PropertyValue::Text(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Text, other)),
        }
    }

    pub fn as_text_mut(&mut self) -> Result<&mut String> {
        match &mut self.value {
            PropertyValue::Text(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Text, other)),
        }
    }

    pub fn as_name(&self) -> Result<&str> {
        match &self.value {
            PropertyValue::Name(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Name, other)),
        }
    }

    pub fn as_name_mut(&mut self) -> Result<&mut String> {
        match &mut self.value {
            PropertyValue::Name(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Name, other)),
        }
    }

    pub fn as_struct(&self) -> Result<&StructValue> {
        match &self.value {
            PropertyValue::Struct(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Struct, other)),
        }
    }

    pub fn as_struct_mut(&mut self) -> Result<&mut StructValue> {
        match &mut self.value {
            PropertyValue::Struct(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Struct, other)),
        }
    }

    pub fn as_array(&self) -> Result<&[PropertyBag]> {
        match &self.value {
            PropertyValue::Array(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Array, other)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Vec<PropertyBag>> {
        match &mut self.value {
            PropertyValue::Array(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Array, other)),
        }
    }

    pub fn as_character_roster(&self) -> Result<&RosterValue> {
        match &self.value {
            PropertyValue::CharacterRoster(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::CharacterRoster, other)),
        }
    }

    pub fn as_character_roster_mut(&mut self) -> Result<&mut RosterValue> {
        match &mut self.value {
            PropertyValue::CharacterRoster(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::CharacterRoster, other)),
        }
    }

    /// Text-like value: `Text` or `Name`. Some fields (e.g. `PoolFileName`)
    /// appear as either kind depending on which tool wrote the file.
    pub fn as_text_or_name(&self) -> Result<&str> {
        match &self.value {
            PropertyValue::Text(v) | PropertyValue::Name(v) => Ok(v),
            other => Err(mismatch(&self.name, PropertyKind::Text, other)),
        }
    }
}

fn mismatch(name: &str, expected: PropertyKind, found: &PropertyValue) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// First property with the given name.
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Index of the first property with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}

impl From<Vec<Property>> for PropertyBag {
    fn from(properties: Vec<Property>) -> Self {
        Self { properties }
    }
}

impl FromIterator<Property> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
