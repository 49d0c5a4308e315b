use crate::util::{alphabet::Symbol, id::StateID};

/// An error that occurred while assembling a [`RawDFA`](crate::dfa::RawDFA).
///
/// This error does not provide many introspection capabilities. The main
/// thing you can do with it is obtain a human readable message via its
/// `std::fmt::Display` impl.
///
/// Note that the acceleration analysis itself never fails. Once a `RawDFA`
/// has been built, every state has a transition for every symbol and every
/// transition points at a real state, so the analysis has nothing left to
/// report.
///
/// When the `std` feature is enabled, this implements the `std::error::Error`
/// trait.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred while building a DFA.
///
/// Note that this error is non-exhaustive. Adding new variants is not
/// considered a breaking change.
#[derive(Clone, Debug)]
enum ErrorKind {
    /// A DFA must have at least one state: the dead state.
    NoStates,
    /// An error that occurs if more states are added than a `StateID` can
    /// represent.
    TooManyStates,
    /// A byte was remapped to a symbol outside of the alphabet.
    InvalidAlphabet { byte: u8, symbol: Symbol, len: usize },
    /// A state's transition table is not the size of the alphabet.
    TransitionCount { state: StateID, got: usize, expected: usize },
    /// A transition points at a state that does not exist.
    InvalidTransition { state: StateID, symbol: usize, target: StateID },
    /// A start state does not exist.
    InvalidStart { which: &'static str, id: StateID },
    /// The dead state has a transition to some other state.
    DeadStateNotAbsorbing,
}

impl Error {
    /// Return the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn no_states() -> Error {
        Error { kind: ErrorKind::NoStates }
    }

    pub(crate) fn too_many_states() -> Error {
        Error { kind: ErrorKind::TooManyStates }
    }

    pub(crate) fn invalid_alphabet(
        byte: u8,
        symbol: Symbol,
        len: usize,
    ) -> Error {
        Error { kind: ErrorKind::InvalidAlphabet { byte, symbol, len } }
    }

    pub(crate) fn transition_count(
        state: StateID,
        got: usize,
        expected: usize,
    ) -> Error {
        Error { kind: ErrorKind::TransitionCount { state, got, expected } }
    }

    pub(crate) fn invalid_transition(
        state: StateID,
        symbol: usize,
        target: StateID,
    ) -> Error {
        Error { kind: ErrorKind::InvalidTransition { state, symbol, target } }
    }

    pub(crate) fn invalid_start(which: &'static str, id: StateID) -> Error {
        Error { kind: ErrorKind::InvalidStart { which, id } }
    }

    pub(crate) fn dead_state_not_absorbing() -> Error {
        Error { kind: ErrorKind::DeadStateNotAbsorbing }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind() {
            ErrorKind::NoStates => {
                write!(f, "DFA must contain at least the dead state")
            }
            ErrorKind::TooManyStates => write!(
                f,
                "number of DFA states exceeds limit of {}",
                StateID::LIMIT,
            ),
            ErrorKind::InvalidAlphabet { byte, symbol, len } => write!(
                f,
                "byte {:?} maps to symbol {} but the alphabet only has \
                 {} symbols",
                byte, symbol, len,
            ),
            ErrorKind::TransitionCount { state, got, expected } => write!(
                f,
                "state {} has {} transitions, but the alphabet has {} \
                 symbols",
                state.as_usize(),
                got,
                expected,
            ),
            ErrorKind::InvalidTransition { state, symbol, target } => write!(
                f,
                "state {} transitions on symbol {} to state {}, which \
                 does not exist",
                state.as_usize(),
                symbol,
                target.as_usize(),
            ),
            ErrorKind::InvalidStart { which, id } => write!(
                f,
                "{} start state {} does not exist",
                which,
                id.as_usize(),
            ),
            ErrorKind::DeadStateNotAbsorbing => write!(
                f,
                "every transition of the dead state must lead back to it",
            ),
        }
    }
}
