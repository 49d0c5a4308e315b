use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec,
};

use crate::{
    dfa::{find_escape_info, AccelScorer, EscapeInfo, RawDFA, DEAD},
    util::id::StateID,
};

/// The widest escape set accepted for an ordinary state.
pub const ACCEL_DFA_MAX_STOP_CHAR: usize = 160;

/// The widest escape set accepted for the floating start state (or its
/// proxy). This is looser than [`ACCEL_DFA_MAX_STOP_CHAR`] since a scan
/// spends most of its time in that state.
pub const ACCEL_DFA_MAX_FLOATING_STOP_CHAR: usize = 192;

/// The default largest offset considered by the offset search.
pub const ACCEL_DFA_MAX_OFFSET_DEPTH: u32 = 4;

/// The configuration used for acceleration analysis.
///
/// All options default to the values a compiler would use: acceleration is
/// enabled, and the stop character limits are
/// [`ACCEL_DFA_MAX_STOP_CHAR`] and [`ACCEL_DFA_MAX_FLOATING_STOP_CHAR`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    // As with other configuration types, we put all our knobs in options so
    // that we can distinguish between "default" and "not set." See the
    // 'overwrite' method.
    accelerate: Option<bool>,
    max_stop_char: Option<usize>,
    max_floating_stop_char: Option<usize>,
    max_offset: Option<u32>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Enable or disable acceleration entirely. When disabled,
    /// [`populate_acceleration_info`] returns no schemes at all.
    ///
    /// This is enabled by default.
    pub fn accelerate(mut self, yes: bool) -> Config {
        self.accelerate = Some(yes);
        self
    }

    /// Set the widest escape set accepted for ordinary states.
    pub fn max_stop_char(mut self, limit: usize) -> Config {
        self.max_stop_char = Some(limit);
        self
    }

    /// Set the widest escape set accepted for the floating start state.
    pub fn max_floating_stop_char(mut self, limit: usize) -> Config {
        self.max_floating_stop_char = Some(limit);
        self
    }

    /// Set the largest offset considered by the offset search. This is read
    /// by [`McClellanStrategy::configure`].
    pub fn max_offset(mut self, offset: u32) -> Config {
        self.max_offset = Some(offset);
        self
    }

    /// Returns whether acceleration is enabled.
    pub fn get_accelerate(&self) -> bool {
        self.accelerate.unwrap_or(true)
    }

    /// Returns the widest escape set accepted for ordinary states.
    pub fn get_max_stop_char(&self) -> usize {
        self.max_stop_char.unwrap_or(ACCEL_DFA_MAX_STOP_CHAR)
    }

    /// Returns the widest escape set accepted for the floating start state.
    pub fn get_max_floating_stop_char(&self) -> usize {
        self.max_floating_stop_char
            .unwrap_or(ACCEL_DFA_MAX_FLOATING_STOP_CHAR)
    }

    /// Returns the largest offset considered by the offset search.
    pub fn get_max_offset(&self) -> u32 {
        self.max_offset.unwrap_or(ACCEL_DFA_MAX_OFFSET_DEPTH)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub fn overwrite(self, o: Config) -> Config {
        Config {
            accelerate: o.accelerate.or(self.accelerate),
            max_stop_char: o.max_stop_char.or(self.max_stop_char),
            max_floating_stop_char: o
                .max_floating_stop_char
                .or(self.max_floating_stop_char),
            max_offset: o.max_offset.or(self.max_offset),
        }
    }
}

/// A source of escape information for the states of a DFA.
///
/// This is the seam through which a compiler can substitute its own
/// analysis for some or all states. [`McClellanStrategy`] is the default.
pub trait BuildStrategy {
    /// The DFA being analyzed.
    fn dfa(&self) -> &RawDFA;

    /// Return the escape information for the given state.
    fn find_escape_strings(&self, id: StateID) -> EscapeInfo;
}

impl<'a, B: BuildStrategy + ?Sized> BuildStrategy for &'a B {
    fn dfa(&self) -> &RawDFA {
        (**self).dfa()
    }

    fn find_escape_strings(&self, id: StateID) -> EscapeInfo {
        (**self).find_escape_strings(id)
    }
}

/// The default build strategy, which defers to [`find_escape_info`].
#[derive(Clone, Debug)]
pub struct McClellanStrategy<'a, S> {
    dfa: &'a RawDFA,
    scorer: S,
    max_offset: u32,
}

impl<'a, S: AccelScorer> McClellanStrategy<'a, S> {
    /// Create a strategy for the given DFA that scores offset schemes with
    /// `scorer`.
    pub fn new(dfa: &'a RawDFA, scorer: S) -> McClellanStrategy<'a, S> {
        let max_offset = ACCEL_DFA_MAX_OFFSET_DEPTH;
        McClellanStrategy { dfa, scorer, max_offset }
    }

    /// Apply the offset search settings of the given configuration.
    pub fn configure(mut self, config: &Config) -> McClellanStrategy<'a, S> {
        self.max_offset = config.get_max_offset();
        self
    }

    /// The largest offset considered by the offset search.
    pub fn max_allowed_offset(&self) -> u32 {
        self.max_offset
    }
}

impl<'a, S: AccelScorer> BuildStrategy for McClellanStrategy<'a, S> {
    fn dfa(&self) -> &RawDFA {
        self.dfa
    }

    fn find_escape_strings(&self, id: StateID) -> EscapeInfo {
        find_escape_info(self.dfa, id, self.max_offset, &self.scorer)
    }
}

/// Return the states that share `base`'s scanning behavior under `info`.
///
/// These are the states reachable from `base` by bytes that are not in
/// `info`'s escape set, including `base` itself. Only broken schemes are
/// shared, so if `info` has a two byte refinement, this returns just
/// `base`. The dead state is included when a non-exit byte reaches it.
pub fn find_region(
    dfa: &RawDFA,
    base: StateID,
    info: &EscapeInfo,
) -> BTreeSet<StateID> {
    debug!("looking for region around {:?}", base);
    let mut region = BTreeSet::new();
    region.insert(base);
    if !info.outs2_broken() {
        return region;
    }

    debug!("accel {:?} + {}", info.outs(), info.offset());
    let nonexit = dfa.symbols(&info.outs().complement());
    let mut pending = vec![base];
    while let Some(curr) = pending.pop() {
        let state = dfa.state(curr);
        for &sym in nonexit.iter() {
            let t = state.next(sym);
            if region.contains(&t) {
                continue;
            }
            trace!("{:?} is in region", t);
            region.insert(t);
            pending.push(t);
        }
    }
    region
}

/// Compute the acceleration scheme for every state of the strategy's DFA
/// that is worth accelerating.
///
/// A state is skipped when it is the dead state, when it reports through
/// callbacks, or when its escape set is wider than the configured limit
/// (which is looser for the floating start state or its
/// [proxy](RawDFA::sds_or_proxy)).
///
/// Afterwards, the start state's scheme is handed to every state in its
/// [region](find_region) that has no scheme or a worse one. The dead state
/// never receives a scheme, even when it is part of the region.
pub fn populate_acceleration_info<B: BuildStrategy + ?Sized>(
    strat: &B,
    config: &Config,
) -> BTreeMap<StateID, EscapeInfo> {
    let mut rv = BTreeMap::new();
    if !config.get_accelerate() {
        return rv;
    }

    let dfa = strat.dfa();
    let sds_proxy = dfa.sds_or_proxy();
    debug!("sds {:?}", sds_proxy);

    let callbacks = dfa.kind().generates_callbacks();
    for (id, state) in dfa.states() {
        if id == DEAD {
            continue;
        }
        // Callbacks can't be raised while skipping, but engines whose
        // matches are queried don't raise them during the scan at all.
        if callbacks && state.has_reports() {
            continue;
        }

        let info = strat.find_escape_strings(id);
        let limit = if id == sds_proxy {
            config.get_max_floating_stop_char()
        } else {
            config.get_max_stop_char()
        };
        if info.outs().len() > limit {
            trace!(
                "state {:?} is not accelerable, has {}",
                id,
                info.outs().len()
            );
            continue;
        }
        trace!("state {:?} should be accelerable {}", id, info.outs().len());
        rv.insert(id, info);
    }

    if let Some(sds_info) = rv.get(&sds_proxy).cloned() {
        for s in find_region(dfa, sds_proxy, &sds_info) {
            if s == DEAD {
                continue;
            }
            let adopt = match rv.get(&s) {
                None => true,
                Some(cur) => sds_info.is_better_than(cur),
            };
            if adopt {
                rv.insert(s, sds_info.clone());
            }
        }
    }
    rv
}
