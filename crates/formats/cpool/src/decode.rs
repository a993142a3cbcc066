use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::kind::{NONE, PropertyKind};
use crate::options::{DecodeObserver, DecodeOptions};
use crate::property::{Property, PropertyBag, PropertyValue, RosterValue, StructValue};
use crate::text;

/// Declared data length written for every character roster.
pub const ROSTER_DECLARED_LEN: i32 = 4;

/// Decode one sentinel-terminated bag at the cursor.
///
/// Stops right after the sentinel; bytes that follow belong to the caller.
pub fn decode_bag(c: &mut Cursor<'_>) -> Result<PropertyBag> {
    let options = DecodeOptions::default();
    Decoder::new(c, &options, &mut ()).read_bag()
}

/// Decode one property envelope. Returns `None` when the envelope is the
/// sentinel.
pub fn decode_property(c: &mut Cursor<'_>) -> Result<Option<Property>> {
    let options = DecodeOptions::default();
    Decoder::new(c, &options, &mut ()).read_property()
}

/// Recursive property decoder. Container bodies re-enter `read_bag`, so
/// nesting is bounded by `DecodeOptions::max_depth`.
pub(crate) struct Decoder<'c, 'a> {
    c: &'c mut Cursor<'a>,
    options: &'c DecodeOptions,
    observer: &'c mut dyn DecodeObserver,
    depth: usize,
}

impl<'c, 'a> Decoder<'c, 'a> {
    pub(crate) fn new(
        c: &'c mut Cursor<'a>,
        options: &'c DecodeOptions,
        observer: &'c mut dyn DecodeObserver,
    ) -> Self {
        Self {
            c,
            options,
            observer,
            depth: 0,
        }
    }

    /// Read properties up to and including the sentinel.
    pub(crate) fn read_bag(&mut self) -> Result<PropertyBag> {
        let mut bag = PropertyBag::new();
        while let Some(property) = self.read_property()? {
            bag.push(property);
        }
        Ok(bag)
    }

    /// Like `read_bag`, but a clean end of input at a property boundary also
    /// ends the bag unless the options require the sentinel.
    pub(crate) fn read_root_bag(&mut self) -> Result<PropertyBag> {
        let mut bag = PropertyBag::new();
        loop {
            if self.c.is_empty() && !self.options.require_root_sentinel {
                debug!(properties = bag.len(), "root bag ended without sentinel");
                break;
            }
            match self.read_property()? {
                Some(property) => bag.push(property),
                None => break,
            }
        }
        Ok(bag)
    }

    pub(crate) fn read_property(&mut self) -> Result<Option<Property>> {
        let offset = self.c.position();
        let name = self.c.read_string()?;
        self.c.skip_padding()?;
        if name == NONE {
            return Ok(None);
        }

        let type_name = self.c.read_string()?;
        self.c.skip_padding()?;
        let Some(kind) = PropertyKind::from_type_name(&type_name, &name) else {
            return Err(Error::UnknownPropertyType {
                name,
                type_name,
                offset,
            });
        };
        // A typed None stops after its type name: no length, no body.
        if kind == PropertyKind::None {
            return Ok(Some(Property::new(name, PropertyValue::None)));
        }

        let declared = self.c.read_i32()?;
        self.c.skip_padding()?;
        let body_start = self.c.position();

        let value = match kind {
            PropertyKind::Int32 => PropertyValue::Int32(self.c.read_i32()?),
            // One payload byte, whatever the declared length says.
            PropertyKind::Bool => PropertyValue::Bool(self.c.read_u8()? == 1),
            PropertyKind::RawBytes => {
                let len = self.c.read_len()?;
                let bytes = self.c.read_bytes(len)?.to_vec();
                self.c.skip_padding()?;
                PropertyValue::RawBytes(bytes)
            }
            PropertyKind::Text => PropertyValue::Text(self.read_text()?),
            PropertyKind::Name => {
                let value = self.c.read_string()?;
                self.c.skip_padding()?;
                PropertyValue::Name(value)
            }
            PropertyKind::Struct => PropertyValue::Struct(self.read_struct(&name, declared)?),
            PropertyKind::Array => PropertyValue::Array(self.read_array()?),
            PropertyKind::CharacterRoster => PropertyValue::CharacterRoster(self.read_roster()?),
            PropertyKind::None => PropertyValue::None,
        };

        let consumed = self.c.position() - body_start;
        let expected = match kind {
            PropertyKind::Bool => Some(0),
            PropertyKind::CharacterRoster => Some(ROSTER_DECLARED_LEN as usize),
            // Checked against the bag portion only, inside read_struct.
            PropertyKind::Struct => None,
            _ => Some(consumed),
        };
        if let Some(expected) = expected.filter(|&e| i64::from(declared) != e as i64) {
            debug!(
                property = %name,
                %kind,
                declared,
                expected,
                offset,
                "declared length does not match body"
            );
        }

        Ok(Some(Property { name, value }))
    }

    fn read_text(&mut self) -> Result<String> {
        let len = self.c.read_i32()?;
        let raw = if len < 0 {
            self.c.read_wide_text(len.unsigned_abs() as usize)?
        } else {
            self.c.read_utf8(len as usize)?
        };
        Ok(text::expand_newlines(raw))
    }

    fn read_struct(&mut self, name: &str, declared: i32) -> Result<StructValue> {
        let type_name = self.c.read_string()?;
        self.c.skip_padding()?;
        let start = self.c.position();
        let body = self.read_nested_bag()?;
        let consumed = self.c.position() - start;
        if i64::from(declared) != consumed as i64 {
            debug!(
                property = %name,
                %type_name,
                declared,
                consumed,
                "struct length does not match body"
            );
        }
        Ok(StructValue { type_name, body })
    }

    fn read_array(&mut self) -> Result<Vec<PropertyBag>> {
        let count = self.c.read_len()?;
        let mut elements = Vec::with_capacity(count.min(self.c.remaining()));
        for _ in 0..count {
            elements.push(self.read_nested_bag()?);
        }
        Ok(elements)
    }

    fn read_roster(&mut self) -> Result<RosterValue> {
        let count = self.c.read_len()?;
        let header = self.read_nested_bag()?;

        // The count is repeated after the header; the first one wins.
        let offset = self.c.position();
        let repeated = self.c.read_i32()?;
        if i64::from(repeated) != count as i64 {
            debug!(count, repeated, offset, "roster counts disagree");
        }

        let mut elements = Vec::with_capacity(count.min(self.c.remaining()));
        for index in 0..count {
            if self.observer.is_cancelled() {
                return Err(Error::Cancelled {
                    completed: index,
                    total: count,
                });
            }
            elements.push(self.read_nested_bag()?);
            trace!(index, total = count, "decoded roster element");
            self.observer.element_decoded(index, count);
        }
        Ok(RosterValue { header, elements })
    }

    fn read_nested_bag(&mut self) -> Result<PropertyBag> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimit {
                offset: self.c.position(),
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let bag = self.read_bag();
        self.depth -= 1;
        bag
    }
}
