use alloc::{collections::BTreeSet, vec::Vec};

use crate::{
    dfa::Error,
    util::{
        alphabet::{ByteSet, Symbol},
        id::StateID,
    },
};

/// The identifier of a match action attached to a state.
pub type ReportID = u32;

/// The identifier of the dead state.
///
/// Every [`RawDFA`] has a dead state and it is always the first state. All
/// of its transitions lead back to itself and it never reports anything.
pub const DEAD: StateID = StateID::ZERO;

/// The role a DFA plays in a larger compiled pattern set.
///
/// The acceleration analysis only cares about two properties of this role:
/// whether matches are reported through a callback the moment they happen
/// ([`DFAKind::generates_callbacks`]) and whether the engine is only run
/// when some other engine triggers it ([`DFAKind::is_triggered`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DFAKind {
    /// A prefix engine. Its matches are queried by the engine it feeds.
    Prefix,
    /// An infix engine, triggered by a preceding engine and queried by the
    /// following one.
    Infix,
    /// A suffix engine, triggered by a preceding engine. Its matches are
    /// reported directly.
    Suffix,
    /// A standalone engine whose matches are reported directly.
    Outfix,
    /// A prefix engine run backwards over the data when triggered.
    ReversePrefix,
    /// A prefix engine that runs ahead of time and reports directly.
    EagerPrefix,
}

impl DFAKind {
    /// Returns true when a match in a state of this kind of DFA must be
    /// reported the moment the state is entered.
    ///
    /// A scan can never skip over such a state, since doing so would lose a
    /// callback.
    pub fn generates_callbacks(&self) -> bool {
        match *self {
            DFAKind::Suffix
            | DFAKind::Outfix
            | DFAKind::ReversePrefix
            | DFAKind::EagerPrefix => true,
            DFAKind::Prefix | DFAKind::Infix => false,
        }
    }

    /// Returns true when this kind of DFA only runs once something else
    /// has triggered it.
    pub fn is_triggered(&self) -> bool {
        match *self {
            DFAKind::Infix | DFAKind::Suffix | DFAKind::ReversePrefix => true,
            DFAKind::Prefix | DFAKind::Outfix | DFAKind::EagerPrefix => false,
        }
    }
}

/// A single state in a [`RawDFA`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct State {
    next: Vec<StateID>,
    reports: BTreeSet<ReportID>,
    reports_eod: BTreeSet<ReportID>,
}

impl State {
    /// Return the state reached from this one on the given symbol.
    ///
    /// This panics if the symbol is not in the DFA's alphabet, which can
    /// only happen when the symbol did not come from the DFA's remap table.
    pub fn next(&self, symbol: Symbol) -> StateID {
        self.next[usize::from(symbol)]
    }

    /// Return the transition table of this state, indexed by symbol.
    pub fn transitions(&self) -> &[StateID] {
        &self.next
    }

    /// The reports raised when this state is entered in the middle of a
    /// scan.
    pub fn reports(&self) -> &BTreeSet<ReportID> {
        &self.reports
    }

    /// The reports raised when the scan ends in this state.
    pub fn reports_eod(&self) -> &BTreeSet<ReportID> {
        &self.reports_eod
    }

    /// Returns true if this state raises any reports mid-scan.
    pub fn has_reports(&self) -> bool {
        !self.reports.is_empty()
    }

    /// Returns true if this state raises any reports at end of data.
    pub fn has_reports_eod(&self) -> bool {
        !self.reports_eod.is_empty()
    }
}

/// A fully constructed DFA over bytes, as it looks before being compiled
/// into a runtime representation.
///
/// Transitions are stored per state and indexed by a compressed alphabet:
/// each byte is first mapped to a [`Symbol`] through a remap table. A
/// `RawDFA` can only be created through a [`Builder`], which checks that the
/// remap table and every transition are in bounds.
#[derive(Clone, Debug)]
pub struct RawDFA {
    kind: DFAKind,
    states: Vec<State>,
    start_anchored: StateID,
    start_floating: StateID,
    alpha_remap: [Symbol; 256],
    alphabet_len: usize,
}

impl RawDFA {
    /// Return a builder for a DFA of the given kind.
    pub fn builder(kind: DFAKind) -> Builder {
        Builder::new(kind)
    }

    /// The role this DFA plays.
    pub fn kind(&self) -> DFAKind {
        self.kind
    }

    /// The total number of states, including the dead state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false, since every DFA has a dead state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Return the state with the given identifier.
    ///
    /// This panics if the identifier is not a state in this DFA.
    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }

    /// Returns an iterator over every state and its identifier, in order.
    pub fn states(&self) -> impl Iterator<Item = (StateID, &State)> + '_ {
        StateID::iter(self.states.len()).zip(self.states.iter())
    }

    /// The start state used for anchored searches.
    pub fn start_anchored(&self) -> StateID {
        self.start_anchored
    }

    /// The start state used when a match may begin anywhere. This is
    /// [`DEAD`] if the DFA is only ever run anchored.
    pub fn start_floating(&self) -> StateID {
        self.start_floating
    }

    /// Return the symbol the given byte is mapped to.
    pub fn symbol(&self, byte: u8) -> Symbol {
        self.alpha_remap[usize::from(byte)]
    }

    /// The number of symbols in this DFA's alphabet.
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    /// Return the state reached from `id` on the given byte.
    pub fn next(&self, id: StateID, byte: u8) -> StateID {
        self.state(id).next(self.symbol(byte))
    }

    /// Return the distinct symbols that the given bytes map to, in
    /// ascending order.
    pub fn symbols(&self, bytes: &ByteSet) -> Vec<Symbol> {
        let set: BTreeSet<Symbol> =
            bytes.iter().map(|b| self.symbol(b)).collect();
        set.into_iter().collect()
    }

    /// Return the state that best stands in for the floating start state.
    ///
    /// When the DFA has a floating start state, this is it. Otherwise, this
    /// walks forward from the anchored start state looking for the first
    /// state that is reached by some symbol and then loops on that same
    /// symbol, since that state is where a scan tends to spend its time. If
    /// no such state exists, this returns [`DEAD`].
    pub fn sds_or_proxy(&self) -> StateID {
        if self.start_floating != DEAD {
            return self.start_floating;
        }

        let symbols = self.symbols(&ByteSet::full());
        let mut seen = BTreeSet::new();
        let mut s = self.start_anchored;
        while s != DEAD {
            seen.insert(s);
            trace!("looking for sds proxy from {:?}", s);

            let state = self.state(s);
            for &sym in symbols.iter() {
                let t = state.next(sym);
                if t != DEAD && self.state(t).next(sym) == t {
                    return t;
                }
            }
            s = symbols
                .iter()
                .map(|&sym| state.next(sym))
                .find(|t| *t != DEAD && !seen.contains(t))
                .unwrap_or(DEAD);
        }
        DEAD
    }
}

/// A builder for assembling a [`RawDFA`] state by state.
///
/// States are numbered in the order they are added. The first state added
/// must be the dead state.
///
/// By default, the alphabet is the identity mapping over all 256 bytes and
/// both start states are [`DEAD`].
#[derive(Clone, Debug)]
pub struct Builder {
    kind: DFAKind,
    states: Vec<State>,
    start_anchored: StateID,
    start_floating: StateID,
    alpha_remap: [Symbol; 256],
    alphabet_len: usize,
}

impl Builder {
    /// Create a new builder for a DFA of the given kind.
    pub fn new(kind: DFAKind) -> Builder {
        let mut alpha_remap = [0; 256];
        for (b, sym) in alpha_remap.iter_mut().enumerate() {
            *sym = b as Symbol;
        }
        Builder {
            kind,
            states: Vec::new(),
            start_anchored: DEAD,
            start_floating: DEAD,
            alpha_remap,
            alphabet_len: 256,
        }
    }

    /// Set the alphabet. Each byte is mapped to a symbol via `remap`, and
    /// every state must then have exactly `len` transitions.
    ///
    /// A symbol greater than or equal to `len` causes an error on `build`.
    pub fn alphabet<F: FnMut(u8) -> Symbol>(
        &mut self,
        mut remap: F,
        len: usize,
    ) -> &mut Builder {
        for (b, sym) in self.alpha_remap.iter_mut().enumerate() {
            *sym = remap(b as u8);
        }
        self.alphabet_len = len;
        self
    }

    /// Add a state with the given transitions (indexed by symbol), mid-scan
    /// reports and end of data reports. Returns the identifier of the new
    /// state.
    pub fn add_state(
        &mut self,
        next: Vec<StateID>,
        reports: &[ReportID],
        reports_eod: &[ReportID],
    ) -> StateID {
        let id = StateID::new_unchecked(self.states.len());
        self.states.push(State {
            next,
            reports: reports.iter().copied().collect(),
            reports_eod: reports_eod.iter().copied().collect(),
        });
        id
    }

    /// Set the anchored start state.
    pub fn start_anchored(&mut self, id: StateID) -> &mut Builder {
        self.start_anchored = id;
        self
    }

    /// Set the floating start state.
    pub fn start_floating(&mut self, id: StateID) -> &mut Builder {
        self.start_floating = id;
        self
    }

    /// Check every state and transition and build the DFA.
    pub fn build(&self) -> Result<RawDFA, Error> {
        if self.states.is_empty() {
            return Err(Error::no_states());
        }
        if self.states.len() > StateID::LIMIT {
            return Err(Error::too_many_states());
        }
        for (b, &sym) in self.alpha_remap.iter().enumerate() {
            if usize::from(sym) >= self.alphabet_len {
                return Err(Error::invalid_alphabet(
                    b as u8,
                    sym,
                    self.alphabet_len,
                ));
            }
        }
        let len = self.states.len();
        for (id, state) in StateID::iter(len).zip(self.states.iter()) {
            if state.next.len() != self.alphabet_len {
                return Err(Error::transition_count(
                    id,
                    state.next.len(),
                    self.alphabet_len,
                ));
            }
            for (symbol, &target) in state.next.iter().enumerate() {
                if target.as_usize() >= len {
                    return Err(Error::invalid_transition(id, symbol, target));
                }
            }
        }
        if self.states[DEAD].next.iter().any(|&t| t != DEAD) {
            return Err(Error::dead_state_not_absorbing());
        }
        if self.start_anchored.as_usize() >= len {
            return Err(Error::invalid_start("anchored", self.start_anchored));
        }
        if self.start_floating.as_usize() >= len {
            return Err(Error::invalid_start("floating", self.start_floating));
        }
        debug!(
            "built raw DFA with {} states and {} symbols",
            len, self.alphabet_len
        );
        Ok(RawDFA {
            kind: self.kind,
            states: self.states.clone(),
            start_anchored: self.start_anchored,
            start_floating: self.start_floating,
            alpha_remap: self.alpha_remap,
            alphabet_len: self.alphabet_len,
        })
    }
}
