//! Newline handling for `StrProperty` values.
//!
//! Files store line breaks as a bare `\r`; in memory they are `\r\n`.

use std::borrow::Cow;

/// `\r\n` → `\r`, applied before encoding.
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if s.contains("\r\n") {
        Cow::Owned(s.replace("\r\n", "\r"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Bare `\r` → `\r\n`, applied after decoding. A `\r` already followed by
/// `\n` is left alone.
pub fn expand_newlines(s: String) -> String {
    if !s.contains('\r') {
        return s;
    }
    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '\r' && chars.peek() != Some(&'\n') {
            out.push('\n');
        }
    }
    out
}

/// Whether a text value must use the UTF-16 encoding.
pub fn needs_wide_encoding(s: &str) -> bool {
    !s.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_round_trips() {
        let original = "line one\r\nline two\r\n";
        let stored = normalize_newlines(original);
        assert_eq!(stored, "line one\rline two\r");
        assert_eq!(expand_newlines(stored.into_owned()), original);
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(normalize_newlines("Rookie"), Cow::Borrowed(_)));
        assert_eq!(expand_newlines("Rookie".to_string()), "Rookie");
    }

    #[test]
    fn expand_leaves_existing_crlf() {
        assert_eq!(expand_newlines("a\r\nb\rc".to_string()), "a\r\nb\r\nc");
    }

    #[test]
    fn wide_selection() {
        assert!(!needs_wide_encoding("Country_China"));
        assert!(needs_wide_encoding("王"));
        assert!(needs_wide_encoding("Zoë"));
    }
}
