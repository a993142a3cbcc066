use tracing::warn;

use crate::cursor::{Writer, len_field};
use crate::decode::ROSTER_DECLARED_LEN;
use crate::error::{Error, Result};
use crate::kind::{CHARACTER_POOL, NONE, PropertyKind};
use crate::property::{Property, PropertyBag, PropertyValue};
use crate::text;

/// Encode each property of `bag` in order. The caller writes the sentinel.
pub fn encode_bag(bag: &PropertyBag, w: &mut Writer) -> Result<()> {
    for property in bag {
        encode_property(property, w)?;
    }
    Ok(())
}

/// Write the `None` sentinel that terminates a bag.
pub fn write_sentinel(w: &mut Writer) -> Result<()> {
    w.write_string(NONE)?;
    w.write_padding();
    Ok(())
}

/// Encode one property envelope, recomputing its declared length.
///
/// A `CharacterPool` array is always read back as a roster, so the name and
/// the roster variant must agree; anything else fails with
/// [`Error::RosterName`] before a byte is written.
pub fn encode_property(property: &Property, w: &mut Writer) -> Result<()> {
    let kind = property.kind();
    let named_pool = property.name == CHARACTER_POOL;
    let is_array = matches!(kind, PropertyKind::Array | PropertyKind::CharacterRoster);
    if is_array && named_pool != (kind == PropertyKind::CharacterRoster) {
        return Err(Error::RosterName {
            name: property.name.clone(),
            kind,
        });
    }

    w.write_string(&property.name)?;
    w.write_padding();
    w.write_string(kind.type_name())?;
    w.write_padding();

    if matches!(property.value, PropertyValue::None) {
        return Ok(());
    }

    let len_at = w.position();
    w.write_i32(0);
    w.write_padding();
    let body_start = w.position();

    let declared = match &property.value {
        PropertyValue::Int32(v) => {
            w.write_i32(*v);
            4
        }
        PropertyValue::Bool(v) => {
            w.write_u8(u8::from(*v));
            0
        }
        PropertyValue::RawBytes(bytes) => {
            w.write_len(bytes.len())?;
            w.write_bytes(bytes);
            w.write_padding();
            w.position() - body_start
        }
        PropertyValue::Text(value) => {
            write_text(value, w)?;
            w.position() - body_start
        }
        PropertyValue::Name(value) => {
            if !value.is_ascii() {
                warn!(
                    property = %property.name,
                    value = %value,
                    "non-ASCII name value written as UTF-8"
                );
            }
            w.write_string(value)?;
            w.write_padding();
            w.position() - body_start
        }
        PropertyValue::Struct(s) => {
            w.write_string(&s.type_name)?;
            w.write_padding();
            let bag_start = w.position();
            encode_bag(&s.body, w)?;
            write_sentinel(w)?;
            w.position() - bag_start
        }
        PropertyValue::Array(elements) => {
            w.write_len(elements.len())?;
            for element in elements {
                encode_bag(element, w)?;
                write_sentinel(w)?;
            }
            w.position() - body_start
        }
        PropertyValue::CharacterRoster(roster) => {
            let count = roster.elements.len();
            w.write_len(count)?;
            encode_bag(&roster.header, w)?;
            write_sentinel(w)?;
            w.write_len(count)?;
            for element in &roster.elements {
                encode_bag(element, w)?;
                write_sentinel(w)?;
            }
            ROSTER_DECLARED_LEN as usize
        }
        PropertyValue::None => 0,
    };

    w.patch_i32(len_at, len_field(declared)?);
    Ok(())
}

/// Write a `StrProperty` body: narrow UTF-8 when the value is ASCII,
/// otherwise UTF-16LE with a negated code-unit count.
fn write_text(value: &str, w: &mut Writer) -> Result<()> {
    let value = text::normalize_newlines(value);
    if value.is_empty() {
        w.write_i32(0);
    } else if text::needs_wide_encoding(&value) {
        let units: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();
        w.write_i32(-len_field(units.len())?);
        for unit in units {
            w.write_bytes(&unit.to_le_bytes());
        }
    } else {
        w.write_string(&value)?;
    }
    Ok(())
}

/// Encode a single property to a fresh buffer.
pub fn property_to_bytes(property: &Property) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    encode_property(property, &mut w)?;
    Ok(w.into_bytes())
}

/// Encode a bag followed by its sentinel to a fresh buffer.
pub fn bag_to_bytes(bag: &PropertyBag) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    encode_bag(bag, &mut w)?;
    write_sentinel(&mut w)?;
    Ok(w.into_bytes())
}
