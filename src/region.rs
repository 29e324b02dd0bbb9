use std::ops::{Index, Range};

/// Represents an area within template text.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new Region from the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Return the [`Region`] from `begin` to the end of `source`.
    pub fn tail(begin: usize, source: &str) -> Self {
        Self::new(begin..source.len())
    }

    /// Access the literal value of a [`Region`].
    ///
    /// An out of bounds `Region` yields an empty string.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source.get(self.begin..self.end).unwrap_or_default()
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        region.literal(self)
    }
}
