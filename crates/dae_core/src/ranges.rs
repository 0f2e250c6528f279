//! Draw ranges into the combined index buffer.
//!
//! All geometries of a document share one index buffer when drawn, so each
//! submesh's range is positioned after every corner of every submesh that
//! precedes it in declaration order.

use crate::submesh::Submesh;

/// A contiguous slice of the combined index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    /// First index position within the combined buffer.
    pub offset: usize,
    /// Number of indices (face corners).
    pub count: usize,
}

impl DrawRange {
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

/// Running position in the combined index buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeCursor {
    next: usize,
}

impl RangeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position the next range will start at.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Compute ranges for one geometry's submeshes and advance past them.
    pub fn advance(&mut self, submeshes: &[Submesh]) -> Vec<DrawRange> {
        submeshes
            .iter()
            .map(|submesh| {
                let range = DrawRange {
                    offset: self.next,
                    count: submesh.corner_count(),
                };
                self.next = range.end();
                range
            })
            .collect()
    }
}
