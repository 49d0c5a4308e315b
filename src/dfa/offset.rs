use core::convert::TryFrom;

use alloc::{collections::BTreeMap, vec, vec::Vec};

use crate::{
    dfa::{EscapeInfo, RawDFA},
    util::{alphabet::ByteSet, id::StateID},
};

/// The maximum number of paths kept alive between rounds of the offset
/// search. Paths discovered past this limit are dropped.
pub const PATHS_LIMIT: usize = 500;

/// Whether a [`Path`] may still be extended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathEnd {
    /// The path may be extended by following its destination's transitions.
    Open,
    /// The path ends at a state that reports. A scan must stop there, so
    /// nothing past it is relevant.
    Dead,
}

/// A sequence of byte classes leading from the base state of an offset
/// search to a destination state.
///
/// A byte sequence whose `k`th byte is in the `k`th class of a path leads
/// from the base state to the path's destination.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Path {
    classes: Vec<ByteSet>,
    dest: StateID,
    end: PathEnd,
}

impl Path {
    /// Create a path from its parts.
    pub fn new(classes: Vec<ByteSet>, dest: StateID, end: PathEnd) -> Path {
        Path { classes, dest, end }
    }

    /// Create the empty path that starts and ends at `base`.
    pub fn empty(base: StateID) -> Path {
        Path::new(vec![], base, PathEnd::Open)
    }

    /// The byte classes along this path.
    pub fn classes(&self) -> &[ByteSet] {
        &self.classes
    }

    /// The state this path leads to.
    pub fn dest(&self) -> StateID {
        self.dest
    }

    /// Whether this path may still be extended.
    pub fn end(&self) -> PathEnd {
        self.end
    }

    /// Returns true if this path ends at a reporting state.
    pub fn is_dead(&self) -> bool {
        self.end == PathEnd::Dead
    }

    /// The length of this path when compared against other paths. A dead
    /// path counts its dead end as one more step that no byte can take.
    pub fn len(&self) -> usize {
        self.classes.len() + usize::from(self.is_dead())
    }

    /// Returns true if this path has no steps at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The classes of this path from last to first, with the dead end (if
    /// any) represented by an empty class.
    fn reach_rev(&self) -> impl Iterator<Item = ByteSet> + '_ {
        let dead = if self.is_dead() { Some(ByteSet::empty()) } else { None };
        dead.into_iter().chain(self.classes.iter().rev().copied())
    }

    fn append(&self, class: ByteSet, dest: StateID) -> Path {
        let mut classes = Vec::with_capacity(self.classes.len() + 1);
        classes.extend_from_slice(&self.classes);
        classes.push(class);
        Path::new(classes, dest, PathEnd::Open)
    }

    fn to_dead(&self) -> Path {
        Path::new(self.classes.clone(), self.dest, PathEnd::Dead)
    }
}

/// An acceleration scheme chosen from a set of paths: stop at any byte in
/// `cr`, found `offset` bytes ahead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccelScheme {
    cr: ByteSet,
    offset: u32,
}

impl AccelScheme {
    /// Create a new scheme.
    pub fn new(cr: ByteSet, offset: u32) -> AccelScheme {
        AccelScheme { cr, offset }
    }

    /// The bytes a scanner must stop at.
    pub fn cr(&self) -> ByteSet {
        self.cr
    }

    /// How far ahead of the scan position the bytes are checked.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Picks the best acceleration scheme for a set of paths.
///
/// Implementations are free to use any heuristic, but the analysis assumes
/// that a scheme with fewer stop bytes is better.
pub trait AccelScorer {
    /// Return the best scheme covering every path. Bytes in `terminating`
    /// must always be stop bytes.
    fn best_accel_scheme(
        &self,
        paths: &[Path],
        terminating: &ByteSet,
    ) -> AccelScheme;
}

impl<'a, S: AccelScorer + ?Sized> AccelScorer for &'a S {
    fn best_accel_scheme(
        &self,
        paths: &[Path],
        terminating: &ByteSet,
    ) -> AccelScheme {
        (**self).best_accel_scheme(paths, terminating)
    }
}

/// A simple scorer that stops at the same offset on every path.
///
/// For each offset, it takes the union of every path's class at that
/// offset. A path that has already ended at that offset contributes every
/// byte. The offset with the smallest union wins, with ties going to the
/// smaller offset. Given no paths at all, it gives up and returns every
/// byte at offset zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnionScorer(());

impl UnionScorer {
    /// Create a new union scorer.
    pub fn new() -> UnionScorer {
        UnionScorer(())
    }
}

impl AccelScorer for UnionScorer {
    fn best_accel_scheme(
        &self,
        paths: &[Path],
        terminating: &ByteSet,
    ) -> AccelScheme {
        let depth = paths.iter().map(|p| p.classes().len()).max().unwrap_or(0);
        let mut best = AccelScheme::new(ByteSet::full(), 0);
        for (offset, offset32) in (0..depth).zip(0u32..) {
            let mut cr = *terminating;
            for p in paths.iter() {
                match p.classes().get(offset) {
                    Some(class) => cr = cr.union(class),
                    None => {
                        cr = ByteSet::full();
                        break;
                    }
                }
            }
            if cr.len() < best.cr().len() {
                best = AccelScheme::new(cr, offset32);
            }
        }
        best
    }
}

/// Returns true if `path` tells us something that none of the `recorded`
/// paths to the same destination already do.
///
/// A recorded path makes `path` redundant when, lining the two up from
/// their ends, every class of the recorded path is a superset of the
/// corresponding class of `path`. Every recorded path must lead to the same
/// destination as `path` and be no longer than it.
pub fn is_useful_path(recorded: &[Path], path: &Path) -> bool {
    for g in recorded.iter() {
        debug_assert_eq!(g.dest(), path.dest());
        debug_assert!(g.len() <= path.len());
        let mut pairs = g.reach_rev().zip(path.reach_rev());
        if pairs.all(|(gc, pc)| pc.is_subset(&gc)) {
            trace!("{:?} is dominated by {:?}", path, g);
            return false;
        }
    }
    true
}

fn push_capped(out: &mut Vec<Path>, path: Path) -> bool {
    if out.len() >= PATHS_LIMIT {
        trace!("path limit reached, dropping {:?}", path);
        return false;
    }
    out.push(path);
    true
}

fn extend(
    dfa: &RawDFA,
    p: &Path,
    all: &mut BTreeMap<StateID, Vec<Path>>,
    out: &mut Vec<Path>,
) {
    if p.is_dead() {
        push_capped(out, p.clone());
        return;
    }

    let state = dfa.state(p.dest());
    if state.has_reports() && dfa.kind().generates_callbacks() {
        push_capped(out, p.clone());
        return;
    }
    if state.has_reports() || state.has_reports_eod() {
        let dead = p.to_dead();
        if push_capped(out, dead.clone()) {
            all.entry(p.dest()).or_insert_with(Vec::new).push(dead);
        }
    }

    let mut dests: BTreeMap<StateID, ByteSet> = BTreeMap::new();
    for b in 0..=255u8 {
        let succ = state.next(dfa.symbol(b));
        dests.entry(succ).or_insert_with(ByteSet::empty).add(b);
    }
    for (dest, class) in dests {
        let pp = p.append(class, dest);
        let recorded = all.entry(dest).or_insert_with(Vec::new);
        if !is_useful_path(recorded, &pp) {
            continue;
        }
        trace!("useful: {:?}", pp);
        if push_capped(out, pp.clone()) {
            recorded.push(pp);
        }
    }
}

/// Enumerate the paths of up to `len` steps leaving `base`.
///
/// Each round extends every live path by one step, with one new path per
/// distinct successor state. Paths that end at a state reached earlier by
/// a path at least as permissive are pruned, as are paths that return to
/// `base`. Paths that hit a state reporting through callbacks are carried
/// along unchanged. Paths that hit any other reporting state also produce a
/// [dead](PathEnd::Dead) copy.
///
/// No round ever produces more than [`PATHS_LIMIT`] paths, and once a round
/// reaches the limit the search stops.
pub fn generate_paths(dfa: &RawDFA, base: StateID, len: usize) -> Vec<Path> {
    search_paths(dfa, base, len).0
}

/// Like `generate_paths`, but also returns every path recorded for the
/// dominance check, keyed by destination.
fn search_paths(
    dfa: &RawDFA,
    base: StateID,
    len: usize,
) -> (Vec<Path>, BTreeMap<StateID, Vec<Path>>) {
    let mut paths = vec![Path::empty(base)];
    let mut all = BTreeMap::new();
    all.insert(base, vec![Path::empty(base)]);
    for _ in 0..len {
        if paths.len() >= PATHS_LIMIT {
            break;
        }
        let mut next_gen = Vec::new();
        for p in paths.iter() {
            extend(dfa, p, &mut all, &mut next_gen);
        }
        paths = next_gen;
    }
    debug!("generated {} paths from {:?}", paths.len(), base);
    (paths, all)
}

/// Search for an offset acceleration scheme at `base`, considering paths
/// of up to `max_offset + 1` bytes.
///
/// The returned scheme is always an
/// [offset scheme](crate::dfa::Scheme::Offset),
/// even when the scorer picks an offset of zero.
pub fn look_for_offset_accel<S: AccelScorer + ?Sized>(
    dfa: &RawDFA,
    base: StateID,
    max_offset: u32,
    scorer: &S,
) -> EscapeInfo {
    debug!("looking for offset accel for {:?}", base);
    let len = usize::try_from(max_offset).unwrap_or(usize::MAX);
    let paths = generate_paths(dfa, base, len.saturating_add(1));
    let scheme = scorer.best_accel_scheme(&paths, &ByteSet::empty());
    debug!("found {:?} + {}", scheme.cr(), scheme.offset());
    EscapeInfo::with_offset(scheme.cr(), scheme.offset())
}
