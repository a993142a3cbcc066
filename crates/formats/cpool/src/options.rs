/// Limits and strictness for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Maximum container nesting (struct/array/roster bags) below the root.
    pub max_depth: usize,
    /// Require the `None` sentinel at the end of the root bag. Files written
    /// by older tools stop right after the last root property, so this is
    /// off by default.
    pub require_root_sentinel: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            require_root_sentinel: false,
        }
    }
}

impl DecodeOptions {
    /// Default limits, but every bag including the root must be terminated.
    pub fn strict() -> Self {
        Self {
            require_root_sentinel: true,
            ..Self::default()
        }
    }
}

/// Receives progress while a character roster is decoded.
///
/// Notifications are fire-and-forget. `is_cancelled` is polled before each
/// roster element; returning `true` aborts the decode with
/// [`Error::Cancelled`](crate::Error::Cancelled).
pub trait DecodeObserver {
    fn element_decoded(&mut self, _index: usize, _total: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// No-op observer.
impl DecodeObserver for () {}
