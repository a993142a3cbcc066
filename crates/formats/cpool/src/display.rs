//! Canonical display strings and duplicate detection.
//!
//! The display string flattens a value into `name:value` pairs so two
//! records can be compared without caring how they were decoded.

use std::fmt::Write as _;

use crate::property::{Property, PropertyBag, PropertyValue};

/// Render a value as its canonical display string.
///
/// Primitives render as their literal value; containers render as the
/// space-separated `name:display` pairs of their children, in order.
pub fn canonical_display(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Int32(v) => v.to_string(),
        PropertyValue::Bool(v) => v.to_string(),
        PropertyValue::RawBytes(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2);
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out
        }
        PropertyValue::Text(s) | PropertyValue::Name(s) => s.clone(),
        PropertyValue::Struct(s) => join_pairs([&s.body]),
        PropertyValue::Array(elements) => join_pairs(elements),
        PropertyValue::CharacterRoster(roster) => {
            join_pairs(std::iter::once(&roster.header).chain(&roster.elements))
        }
        PropertyValue::None => "null".to_string(),
    }
}

fn join_pairs<'a>(bags: impl IntoIterator<Item = &'a PropertyBag>) -> String {
    let mut out = String::new();
    for property in bags.into_iter().flat_map(|bag| bag.iter()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&property.name);
        out.push(':');
        out.push_str(&canonical_display(&property.value));
    }
    out
}

impl Property {
    /// Canonical display string of this property's value.
    pub fn display(&self) -> String {
        canonical_display(&self.value)
    }
}

/// Whether two properties are duplicates: same name and kind, same
/// canonical string, and for containers the same ordered children, each of
/// which is itself a duplicate.
pub fn is_duplicate(a: &Property, b: &Property) -> bool {
    a.name == b.name && a.kind() == b.kind() && a.display() == b.display() && children_match(a, b)
}

/// Whether two bags hold pairwise duplicate properties in the same order.
/// Used to compare whole character records.
pub fn bags_are_duplicates(a: &PropertyBag, b: &PropertyBag) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| is_duplicate(x, y))
}

fn bag_lists_match(a: &[PropertyBag], b: &[PropertyBag]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| bags_are_duplicates(x, y))
}

fn children_match(a: &Property, b: &Property) -> bool {
    match (&a.value, &b.value) {
        (PropertyValue::Struct(x), PropertyValue::Struct(y)) => {
            x.type_name == y.type_name && bags_are_duplicates(&x.body, &y.body)
        }
        (PropertyValue::Array(x), PropertyValue::Array(y)) => bag_lists_match(x, y),
        (PropertyValue::CharacterRoster(x), PropertyValue::CharacterRoster(y)) => {
            bags_are_duplicates(&x.header, &y.header) && bag_lists_match(&x.elements, &y.elements)
        }
        _ => true,
    }
}
