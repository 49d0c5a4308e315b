/*!
Type definitions for identifier types.

A [`StateID`] identifies a state in a [`RawDFA`](crate::dfa::RawDFA). It
is a thin wrapper around a `u32` whose values are clamped to
[`StateID::MAX`], which guarantees that every state ID is representable as a
`usize` (and an `i32`) on every supported target.

Users of this type may not rely on this clamping for the purpose of memory
safety. Users may, however, rely on it to avoid panics or other types of
logic bugs.
*/

use core::convert::TryFrom;

use alloc::vec::Vec;

/// An identifier for a state in a DFA.
///
/// A state ID is guaranteed to be representable by a `usize`. Similarly, the
/// number of states in any DFA accepted by this crate is guaranteed to be
/// representable by a `usize`.
///
/// # Representation
///
/// This type is always represented internally by a `u32` and is marked as
/// `repr(transparent)`. Thus, this type always has the same representation as
/// a `u32`.
///
/// # Indexing
///
/// For convenience, callers may use a `StateID` to index slices.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct StateID(u32);

impl StateID {
    /// The maximum state ID value.
    pub const MAX: StateID =
        StateID::new_unchecked(core::i32::MAX as usize - 1);

    /// The total number of states that are allowed in any single DFA.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    /// The zero state ID value.
    pub const ZERO: StateID = StateID::new_unchecked(0);

    /// Create a new state ID.
    ///
    /// If the given identifier exceeds [`StateID::MAX`], then this returns
    /// an error.
    #[inline]
    pub fn new(id: usize) -> Result<StateID, StateIDError> {
        StateID::try_from(id)
    }

    /// Create a new state ID without checking whether the given value
    /// exceeds [`StateID::MAX`].
    ///
    /// While this is unchecked, providing an incorrect value must never
    /// sacrifice memory safety.
    #[inline]
    pub const fn new_unchecked(id: usize) -> StateID {
        StateID(id as u32)
    }

    /// Like [`StateID::new`], but panics if the given ID is not valid.
    #[inline]
    pub fn must(id: usize) -> StateID {
        match StateID::new(id) {
            Ok(sid) => sid,
            Err(err) => panic!("{}", err),
        }
    }

    /// Return this state ID as a `usize`.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal u32 of this state ID.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns an iterator over all state IDs from 0 up to and not including
    /// the given length.
    ///
    /// If the given length exceeds [`StateID::LIMIT`], then this panics.
    pub(crate) fn iter(len: usize) -> StateIDIter {
        assert!(
            len <= StateID::LIMIT,
            "cannot create iterator for StateID when number of \
             elements exceed {:?}",
            StateID::LIMIT,
        );
        StateIDIter { rng: 0..len }
    }
}

/// This error occurs when a state ID could not be constructed.
///
/// This occurs when given an integer exceeding the maximum state ID value.
///
/// When the `std` feature is enabled, this implements the `Error` trait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateIDError {
    attempted: u64,
}

impl StateIDError {
    /// Returns the value that failed to constructed a state ID.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateIDError {}

impl core::fmt::Display for StateIDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create StateID from {:?}, which exceeds {:?}",
            self.attempted(),
            StateID::MAX,
        )
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StateIDIter {
    rng: core::ops::Range<usize>,
}

impl Iterator for StateIDIter {
    type Item = StateID;

    fn next(&mut self) -> Option<StateID> {
        // Construction guarantees that every value in the range fits.
        self.rng.next().map(StateID::new_unchecked)
    }
}

impl<T> core::ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl<T> core::ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl TryFrom<usize> for StateID {
    type Error = StateIDError;

    fn try_from(id: usize) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_usize() {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id))
    }
}

impl TryFrom<u32> for StateID {
    type Error = StateIDError;

    fn try_from(id: u32) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_u32() {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id as usize))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for StateID {
    fn arbitrary(gen: &mut quickcheck::Gen) -> StateID {
        use core::cmp::max;

        let id = max(i32::MIN + 1, i32::arbitrary(gen)).abs();
        if id > StateID::MAX.as_u32() as i32 {
            StateID::MAX
        } else {
            StateID::new_unchecked(id as usize)
        }
    }
}
