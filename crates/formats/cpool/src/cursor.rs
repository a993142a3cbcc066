use crate::error::{Error, Result};

/// Padding that follows most fields in a property envelope.
pub const PADDING: usize = 4;

/// Forward-only read cursor over a byte slice. All reads are little-endian.
///
/// There is no seek: decoding is strictly single-pass, and a failed read
/// leaves the position untouched.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Skip the 4 zero bytes that pad envelope fields.
    pub fn skip_padding(&mut self) -> Result<()> {
        self.ensure(PADDING)?;
        self.pos += PADDING;
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a 4-byte magic/tag.
    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        let mut magic = [0u8; 4];
        magic.copy_from_slice(bytes);
        Ok(magic)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read an `i32` that must not be negative (lengths and counts).
    pub fn read_len(&mut self) -> Result<usize> {
        let offset = self.pos;
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| Error::InvalidLength { offset, len })
    }

    /// Read a length-prefixed string: i32 length + bytes, the last of which
    /// is a NUL terminator. A zero length is the empty string with no bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        self.read_utf8(len)
    }

    /// Read `len` bytes of UTF-8 and drop the trailing terminator byte.
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        if len == 0 {
            return Ok(String::new());
        }
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes[..len - 1].to_vec())
            .map_err(|e| Error::InvalidString { offset, source: e })
    }

    /// Read `units` UTF-16LE code units and drop the trailing terminator unit.
    pub fn read_wide_text(&mut self, units: usize) -> Result<String> {
        if units == 0 {
            return Ok(String::new());
        }
        let offset = self.pos;
        let byte_len = units.checked_mul(2).ok_or(Error::OutOfBounds {
            offset,
            need: usize::MAX,
            have: self.remaining(),
        })?;
        let bytes = self.read_bytes(byte_len)?;
        let code_units: Vec<u16> = bytes
            .chunks_exact(2)
            .take(units - 1)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&code_units).map_err(|_| Error::InvalidWideString { offset })
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::OutOfBounds {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Writer that builds a byte buffer. All writes are little-endian.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_magic(&mut self, magic: &[u8; 4]) {
        self.buf.extend_from_slice(magic);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a length or count field.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_i32(len_field(len)?);
        Ok(())
    }

    pub fn write_padding(&mut self) {
        self.buf.extend_from_slice(&[0; PADDING]);
    }

    /// Write a length-prefixed string: i32 length + bytes + NUL terminator.
    /// The empty string is written as a bare zero length.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            self.write_i32(0);
            return Ok(());
        }
        self.write_len(s.len() + 1)?;
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }

    /// Patch an i32 at a specific position (for backpatching sizes).
    pub fn patch_i32(&mut self, pos: usize, v: i32) {
        let bytes = v.to_le_bytes();
        self.buf[pos..pos + 4].copy_from_slice(&bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Convert a byte or element count to its `i32` wire form.
pub fn len_field(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::LengthOverflow { len })
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_exactly() {
        let data = [0x2A, 0x00, 0x00, 0x00, 0xFF, 0, 0, 0, 0];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_i32().unwrap(), 42);
        assert_eq!(c.position(), 4);
        assert_eq!(c.read_u8().unwrap(), 0xFF);
        c.skip_padding().unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn short_read_fails_without_moving() {
        let data = [1, 2, 3];
        let mut c = Cursor::new(&data);
        c.read_u8().unwrap();
        let err = c.read_i32().unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds {
                offset: 1,
                need: 4,
                have: 2
            }
        ));
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn padding_is_bounds_checked() {
        let data = [0, 0];
        let mut c = Cursor::new(&data);
        assert!(matches!(c.skip_padding(), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn string_drops_terminator() {
        let data = [5, 0, 0, 0, b'N', b'o', b'n', b'e', 0];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_string().unwrap(), "None");
        assert!(c.is_empty());
    }

    #[test]
    fn empty_string_consumes_only_length() {
        let data = [0, 0, 0, 0, 7];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_string().unwrap(), "");
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn negative_string_length_rejected() {
        let data = (-3i32).to_le_bytes();
        let mut c = Cursor::new(&data);
        assert!(matches!(
            c.read_string(),
            Err(Error::InvalidLength { offset: 0, len: -3 })
        ));
    }

    #[test]
    fn wide_text_drops_terminator_unit() {
        // "é" + NUL as UTF-16LE
        let data = [0xE9, 0x00, 0x00, 0x00];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_wide_text(2).unwrap(), "é");
        assert!(c.is_empty());
    }

    #[test]
    fn writer_string_matches_reader() {
        let mut w = Writer::new();
        w.write_string("Rookie").unwrap();
        w.write_string("").unwrap();
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..4], &7i32.to_le_bytes());
        assert_eq!(bytes.len(), 4 + 7 + 4);

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.read_string().unwrap(), "Rookie");
        assert_eq!(c.read_string().unwrap(), "");
    }

    #[test]
    fn oversized_length_is_rejected() {
        let mut w = Writer::new();
        let len = i32::MAX as usize + 1;
        assert!(matches!(
            w.write_len(len),
            Err(Error::LengthOverflow { len: l }) if l == len
        ));
        assert_eq!(w.position(), 0);
        assert_eq!(len_field(7).unwrap(), 7);
    }

    #[test]
    fn patch_overwrites_in_place() {
        let mut w = Writer::new();
        let at = w.position();
        w.write_i32(0);
        w.write_padding();
        w.patch_i32(at, 9);
        assert_eq!(w.into_bytes(), [9, 0, 0, 0, 0, 0, 0, 0]);
    }
}
