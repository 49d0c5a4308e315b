/*!
Sets of bytes and the compressed alphabet they are mapped onto.

A [`ByteSet`] is the workhorse of the acceleration analysis. Escape sets,
the byte classes along a path and the "non-exit" bytes of a region are all
byte sets. They are cheap to copy and never allocate.
*/

use core::fmt;

/// A symbol of a DFA's compressed alphabet.
///
/// Every one of the 256 byte values is mapped to a symbol by the DFA's
/// remap table. Bytes that are never distinguished by the DFA share a
/// symbol, which keeps transition tables small.
pub type Symbol = u16;

/// A simple set of bytes that is reasonably cheap to copy and allocation free.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct ByteSet {
    bits: [u128; 2],
}

impl ByteSet {
    /// Create an empty set of bytes.
    pub const fn empty() -> ByteSet {
        ByteSet { bits: [0; 2] }
    }

    /// Create a set containing all 256 bytes.
    pub const fn full() -> ByteSet {
        ByteSet { bits: [u128::MAX; 2] }
    }

    /// Create a set containing only the given byte.
    pub fn singleton(byte: u8) -> ByteSet {
        let mut set = ByteSet::empty();
        set.add(byte);
        set
    }

    /// Add a byte to this set.
    ///
    /// If the given byte already belongs to this set, then this is a no-op.
    pub fn add(&mut self, byte: u8) {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits[bucket as usize] |= 1 << bit;
    }

    /// Add an inclusive range of bytes.
    pub fn add_all(&mut self, start: u8, end: u8) {
        for b in start..=end {
            self.add(b);
        }
    }

    /// Remove a byte from this set.
    ///
    /// If the given byte is not in this set, then this is a no-op.
    pub fn remove(&mut self, byte: u8) {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits[bucket as usize] &= !(1 << bit);
    }

    /// Return true if and only if the given byte is in this set.
    pub fn contains(&self, byte: u8) -> bool {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits[bucket as usize] & (1 << bit) > 0
    }

    /// Return the number of bytes in this set.
    pub fn len(&self) -> usize {
        (self.bits[0].count_ones() + self.bits[1].count_ones()) as usize
    }

    /// Return true if and only if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits == [0, 0]
    }

    /// Return true if and only if every byte in this set is also in `other`.
    ///
    /// The empty set is a subset of every set.
    pub fn is_subset(&self, other: &ByteSet) -> bool {
        self.bits[0] & !other.bits[0] == 0
            && self.bits[1] & !other.bits[1] == 0
    }

    /// Return the union of this set and `other`.
    pub fn union(&self, other: &ByteSet) -> ByteSet {
        ByteSet {
            bits: [self.bits[0] | other.bits[0], self.bits[1] | other.bits[1]],
        }
    }

    /// Return the intersection of this set and `other`.
    pub fn intersect(&self, other: &ByteSet) -> ByteSet {
        ByteSet {
            bits: [self.bits[0] & other.bits[0], self.bits[1] & other.bits[1]],
        }
    }

    /// Return the set of all bytes not in this set.
    pub fn complement(&self) -> ByteSet {
        ByteSet { bits: [!self.bits[0], !self.bits[1]] }
    }

    /// Returns an iterator over all bytes in this set, in ascending order.
    pub fn iter(&self) -> ByteSetIter<'_> {
        ByteSetIter { set: self, b: 0 }
    }

    /// Returns an iterator over all contiguous ranges of bytes in this set.
    pub fn iter_ranges(&self) -> ByteSetRangeIter<'_> {
        ByteSetRangeIter { set: self, b: 0 }
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteSet([")?;
        for (start, end) in self.iter_ranges() {
            if start == end {
                write!(f, "{:?}", DebugByte(start))?;
            } else {
                write!(f, "{:?}-{:?}", DebugByte(start), DebugByte(end))?;
            }
        }
        write!(f, "])")
    }
}

/// An iterator over the bytes in a [`ByteSet`].
#[derive(Debug)]
pub struct ByteSetIter<'a> {
    set: &'a ByteSet,
    b: usize,
}

impl<'a> Iterator for ByteSetIter<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.b <= 255 {
            let b = self.b as u8;
            self.b += 1;
            if self.set.contains(b) {
                return Some(b);
            }
        }
        None
    }
}

/// An iterator over the contiguous ranges of bytes in a [`ByteSet`].
#[derive(Debug)]
pub struct ByteSetRangeIter<'a> {
    set: &'a ByteSet,
    b: usize,
}

impl<'a> Iterator for ByteSetRangeIter<'a> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<(u8, u8)> {
        while self.b <= 255 {
            let start = self.b as u8;
            self.b += 1;
            if !self.set.contains(start) {
                continue;
            }

            let mut end = start;
            while self.b <= 255 && self.set.contains(self.b as u8) {
                end = self.b as u8;
                self.b += 1;
            }
            return Some((start, end));
        }
        None
    }
}

/// A type that wraps a single byte with a convenient fmt::Debug impl that
/// escapes the byte.
pub(crate) struct DebugByte(pub u8);

impl fmt::Debug for DebugByte {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // 10 bytes is enough to cover any output from ascii::escape_default.
        let mut bytes = [0u8; 10];
        let mut len = 0;
        for (i, mut b) in core::ascii::escape_default(self.0).enumerate() {
            // capitalize \xab to \xAB
            if i >= 2 && b'a' <= b && b <= b'f' {
                b -= 32;
            }
            bytes[len] = b;
            len += 1;
        }
        match core::str::from_utf8(&bytes[..len]) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "\\x{:02X}", self.0),
        }
    }
}
