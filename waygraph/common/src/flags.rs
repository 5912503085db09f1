use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Bit-packed raw storage of all encoded properties of one edge.
///
/// The words are stored in storage direction; direction-dependent reads and writes go through the
/// encoded values in [`crate::encoded_value`], never through the raw words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntsRef {
    ints: SmallVec<[u32; 2]>,
}

impl IntsRef {
    /// Creates zeroed flags with `len` words.
    pub fn new(len: usize) -> Self {
        Self {
            ints: SmallVec::from_elem(0, len),
        }
    }

    pub fn from_ints(ints: &[u32]) -> Self {
        Self {
            ints: SmallVec::from_slice(ints),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ints.is_empty()
    }

    /// Returns the word at `index`, or 0 if the flags are shorter.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.ints.get(index).copied().unwrap_or(0)
    }

    /// Returns the word at `index` for writing. The width of the flags never changes, so there
    /// is no word to write past the end.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut u32> {
        self.ints.get_mut(index)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.ints
    }
}

impl fmt::Display for IntsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.ints.iter().map(|i| format!("{i:#x}")).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ints_ref_has_fixed_width() {
        let mut flags = IntsRef::new(2);
        assert_eq!(flags.get(3), 0);
        *flags.get_mut(1).unwrap() = 0xff;
        assert!(flags.get_mut(2).is_none());
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.as_slice(), &[0, 0xff]);
    }

    #[test]
    fn test_ints_ref_display() {
        let flags = IntsRef::from_ints(&[1, 0x10]);
        assert_eq!(flags.to_string(), "[0x1, 0x10]");
    }
}
