use serde::Serialize;
use tracing::debug;

use crate::cursor::{Cursor, Writer};
use crate::decode::Decoder;
use crate::encode::{encode_bag, write_sentinel};
use crate::error::{Error, Result};
use crate::kind::CHARACTER_POOL;
use crate::options::{DecodeObserver, DecodeOptions};
use crate::property::{PropertyBag, RosterValue};

/// Magic bytes at the start of every pool file.
pub const MAGIC: [u8; 4] = [0xFF; 4];

/// Name of the roster header property holding the pool's display name.
pub const POOL_FILE_NAME: &str = "PoolFileName";

/// A whole pool file: the magic header plus one root bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub root: PropertyBag,
}

impl Document {
    pub fn new(root: PropertyBag) -> Self {
        Self { root }
    }

    /// Decode a complete file with default options.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with(data, &DecodeOptions::default(), &mut ())
    }

    /// Decode a complete file, reporting roster progress to `observer`.
    ///
    /// Bytes after the root sentinel are ignored.
    pub fn decode_with(
        data: &[u8],
        options: &DecodeOptions,
        observer: &mut dyn DecodeObserver,
    ) -> Result<Self> {
        let mut c = Cursor::new(data);
        let magic = c.read_magic()?;
        if magic != MAGIC {
            return Err(Error::InvalidHeader { found: magic });
        }

        let root = Decoder::new(&mut c, options, observer).read_root_bag()?;
        if !c.is_empty() {
            debug!(
                offset = c.position(),
                trailing = c.remaining(),
                "ignoring bytes after root bag"
            );
        }
        debug!(properties = root.len(), bytes = data.len(), "decoded document");
        Ok(Self { root })
    }

    /// Encode as magic + root bag + sentinel.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.root)
    }

    /// The `CharacterPool` roster, absent in pools with no characters.
    pub fn character_pool(&self) -> Option<&RosterValue> {
        self.root
            .find(CHARACTER_POOL)
            .and_then(|p| p.as_character_roster().ok())
    }

    pub fn character_pool_mut(&mut self) -> Option<&mut RosterValue> {
        self.root
            .find_mut(CHARACTER_POOL)
            .and_then(|p| p.as_character_roster_mut().ok())
    }

    /// Character records in file order.
    pub fn characters(&self) -> &[PropertyBag] {
        self.character_pool()
            .map(|roster| roster.elements.as_slice())
            .unwrap_or_default()
    }

    pub fn character_count(&self) -> usize {
        self.characters().len()
    }

    /// Display name stored in the roster header (`Text` or `Name`).
    pub fn pool_file_name(&self) -> Option<&str> {
        self.character_pool()?
            .header
            .find(POOL_FILE_NAME)?
            .as_text_or_name()
            .ok()
    }
}

impl From<PropertyBag> for Document {
    fn from(root: PropertyBag) -> Self {
        Self { root }
    }
}

/// Decode a pool file and return its root bag.
pub fn decode(data: &[u8]) -> Result<PropertyBag> {
    Document::decode(data).map(|doc| doc.root)
}

/// Encode a root bag as a complete pool file.
///
/// Fails without producing output when the tree could not be decoded back,
/// e.g. a roster under a name other than `CharacterPool`.
pub fn encode(root: &PropertyBag) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    w.write_magic(&MAGIC);
    encode_bag(root, &mut w)?;
    write_sentinel(&mut w)?;
    Ok(w.into_bytes())
}
