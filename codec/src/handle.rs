//! Regions of a [crate::SerialWriter] buffer.

use std::{fmt, ops::Range};

/// An exact byte range previously produced by a write.
///
/// A handle is the only capability needed to read back, overwrite, or invalidate a region. It
/// becomes stale once [crate::SerialWriter::drop] truncates below [Handle::end].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Handle {
    /// Offset of the first byte of the region.
    pub offset: usize,
    /// Length of the region in bytes.
    pub length: usize,
}

impl Handle {
    /// The handle of a value that produced no bytes at all.
    pub const EMPTY: Self = Self {
        offset: 0,
        length: 0,
    };

    /// Creates a new handle.
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Returns the offset one past the last byte of the region.
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Returns true if the region holds no bytes.
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the region as a range of buffer offsets.
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Extends this region with one written after it.
    ///
    /// Empty regions are ignored on either side, so folding the handles of consecutive fields
    /// yields the span from the first non-empty field to the end of the last non-empty one (or
    /// [Handle::EMPTY] if every field was empty).
    pub fn join(self, next: Self) -> Self {
        if next.is_empty() {
            return self;
        }
        if self.is_empty() {
            return next;
        }
        debug_assert!(next.end() >= self.offset, "joined handles out of order");
        Self {
            offset: self.offset,
            length: next.end() - self.offset,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.offset, self.length)
    }
}
