use alloc::{collections::BTreeSet, vec::Vec};

use crate::{
    dfa::{
        offset::{look_for_offset_accel, AccelScorer},
        RawDFA, DEAD,
    },
    util::{alphabet::ByteSet, id::StateID},
};

/// The largest number of two byte escape sequences a double byte scheme may
/// track.
pub const MAX_DOUBLE_BYTE_PAIRS: usize = 8;

/// The largest number of first bytes that a usable double byte scheme may
/// treat as escapes regardless of the byte that follows.
pub const MAX_DOUBLE_BYTE_SINGLES: usize = 2;

/// The acceleration scheme computed for a single DFA state.
///
/// Every scheme has a set of single byte escapes, [`EscapeInfo::outs`].
/// What those escapes mean depends on the [`Scheme`]:
///
/// * With [`Scheme::DoubleByte`], they are exactly the bytes that leave the
/// state, and the scheme also carries a (possibly empty or unusable)
/// refinement into two byte sequences.
/// * With [`Scheme::SingleByte`], they are exactly the bytes that leave the
/// state and nothing more is known.
/// * With [`Scheme::Offset`], they are the bytes a scanner must stop at when
/// looking some number of bytes ahead of its current position.
///
/// The last two are referred to as *broken*: their two byte refinement is
/// unavailable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscapeInfo {
    outs: ByteSet,
    scheme: Scheme,
}

/// The shape of an [`EscapeInfo`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scheme {
    /// Two byte analysis succeeded. Whether it is worth using is decided
    /// by [`DoubleByte::is_ok`].
    DoubleByte(DoubleByte),
    /// Two byte analysis was abandoned, either because an escape leads into
    /// a state that must fire a callback, or because too many two byte
    /// sequences were needed.
    SingleByte,
    /// The escapes apply starting the given number of bytes into the scan.
    Offset(u32),
}

/// The two byte refinement of a state's escapes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DoubleByte {
    pairs: BTreeSet<(u8, u8)>,
    single: ByteSet,
}

impl DoubleByte {
    /// The two byte sequences that leave the state.
    pub fn pairs(&self) -> &BTreeSet<(u8, u8)> {
        &self.pairs
    }

    /// First bytes that count as an escape no matter what follows them.
    ///
    /// A first byte ends up here when it would have needed more than
    /// [`MAX_DOUBLE_BYTE_PAIRS`] pairs of its own. None of its pairs are in
    /// [`DoubleByte::pairs`].
    pub fn single(&self) -> &ByteSet {
        &self.single
    }

    /// Returns true when this refinement pays for itself at scan time.
    ///
    /// It must track at least one pair, fewer singles than pairs, at most
    /// [`MAX_DOUBLE_BYTE_SINGLES`] singles and no more than
    /// [`MAX_DOUBLE_BYTE_PAIRS`] entries in total.
    pub fn is_ok(&self) -> bool {
        let singles = self.single.len();
        !self.pairs.is_empty()
            && singles + self.pairs.len() <= MAX_DOUBLE_BYTE_PAIRS
            && singles < self.pairs.len()
            && singles <= MAX_DOUBLE_BYTE_SINGLES
    }
}

impl EscapeInfo {
    /// Create a broken scheme from single byte escapes alone.
    pub fn single_byte(outs: ByteSet) -> EscapeInfo {
        EscapeInfo { outs, scheme: Scheme::SingleByte }
    }

    /// Create a scheme with a two byte refinement.
    ///
    /// If more than [`MAX_DOUBLE_BYTE_PAIRS`] pairs are given, then the
    /// refinement is dropped and this returns a broken single byte scheme
    /// instead.
    pub fn double_byte(
        outs: ByteSet,
        pairs: BTreeSet<(u8, u8)>,
        single: ByteSet,
    ) -> EscapeInfo {
        if pairs.len() > MAX_DOUBLE_BYTE_PAIRS {
            return EscapeInfo::single_byte(outs);
        }
        let db = DoubleByte { pairs, single };
        EscapeInfo { outs, scheme: Scheme::DoubleByte(db) }
    }

    /// Create a scheme whose escapes apply `offset` bytes into the scan.
    pub fn with_offset(outs: ByteSet, offset: u32) -> EscapeInfo {
        EscapeInfo { outs, scheme: Scheme::Offset(offset) }
    }

    /// The single byte escapes of this scheme.
    pub fn outs(&self) -> &ByteSet {
        &self.outs
    }

    /// The shape of this scheme.
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Returns true when this scheme has no two byte refinement.
    pub fn outs2_broken(&self) -> bool {
        !matches!(self.scheme, Scheme::DoubleByte(_))
    }

    /// The two byte refinement, if this scheme is not broken.
    pub fn double(&self) -> Option<&DoubleByte> {
        match self.scheme {
            Scheme::DoubleByte(ref db) => Some(db),
            _ => None,
        }
    }

    /// The number of bytes into the scan at which the escapes apply. This is
    /// zero for everything but an offset scheme.
    pub fn offset(&self) -> u32 {
        match self.scheme {
            Scheme::Offset(offset) => offset,
            _ => 0,
        }
    }

    /// Returns true when this scheme carries a usable two byte refinement.
    pub fn is_double_byte_ok(&self) -> bool {
        self.double().map_or(false, |db| db.is_ok())
    }

    /// Returns true when this scheme should be preferred over `other`.
    ///
    /// A scheme that is not broken always beats a broken one. Otherwise,
    /// when both are broken or both are not, the one with fewer single byte
    /// escapes wins.
    pub fn is_better_than(&self, other: &EscapeInfo) -> bool {
        match (self.outs2_broken(), other.outs2_broken()) {
            (false, true) => true,
            (true, false) => false,
            _ => self.outs.len() < other.outs.len(),
        }
    }
}

/// Compute the escape information for the state `id` in the given DFA.
///
/// Every byte that leaves `id` is a single byte escape. For each of those,
/// the state it leads to is compared against `id` to find the second bytes
/// on which the two diverge, which yields the two byte refinement. The
/// refinement is abandoned when an escape leads to a state that reports via
/// callbacks, or when it needs more than [`MAX_DOUBLE_BYTE_PAIRS`] pairs.
///
/// If the result has no usable two byte refinement and `id` is the floating
/// start state of a DFA that is not triggered, then an offset scheme is
/// searched for with paths of up to `max_offset + 1` bytes. It replaces the
/// local scheme only when it has strictly fewer escapes.
pub fn find_escape_info<S: AccelScorer + ?Sized>(
    dfa: &RawDFA,
    id: StateID,
    max_offset: u32,
    scorer: &S,
) -> EscapeInfo {
    let state = dfa.state(id);
    let callbacks = dfa.kind().generates_callbacks();

    let mut outs = ByteSet::empty();
    let mut pairs = BTreeSet::new();
    let mut single = ByteSet::empty();
    let mut broken = false;
    let mut local = Vec::with_capacity(MAX_DOUBLE_BYTE_PAIRS + 1);
    for i in 0..=255u8 {
        let succ = dfa.next(id, i);
        if succ == id {
            continue;
        }
        outs.add(i);
        trace!("{:?}: {:02X} escapes to {:?}", id, i, succ);

        let next = dfa.state(succ);
        if callbacks && next.has_reports() {
            trace!("{:?}: escape leads to report", id);
            broken = true;
        }
        if broken {
            continue;
        }

        local.clear();
        for j in 0..=255u8 {
            let sym = dfa.symbol(j);
            if next.next(sym) == state.next(sym) {
                continue;
            }
            local.push((i, j));
            if local.len() > MAX_DOUBLE_BYTE_PAIRS {
                break;
            }
        }
        if local.len() > MAX_DOUBLE_BYTE_PAIRS {
            trace!("{:?}: {:02X} is a double byte single", id, i);
            single.add(i);
        } else {
            pairs.extend(local.iter().copied());
        }
        if pairs.len() > MAX_DOUBLE_BYTE_PAIRS {
            trace!("{:?}: too many double byte pairs", id);
            broken = true;
        }
    }

    let mut info = if broken {
        EscapeInfo::single_byte(outs)
    } else {
        EscapeInfo::double_byte(outs, pairs, single)
    };
    if !info.is_double_byte_ok()
        && !dfa.kind().is_triggered()
        && id == dfa.start_floating()
        && id != DEAD
    {
        debug!("looking for offset accel at {:?}", id);
        let offset = look_for_offset_accel(dfa, id, max_offset, scorer);
        debug!(
            "offset accel width {} vs local width {}",
            offset.outs().len(),
            info.outs().len()
        );
        if offset.outs().len() < info.outs().len() {
            debug!("using offset accel for {:?}", id);
            info = offset;
        }
    }
    info
}
