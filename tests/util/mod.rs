use dfa_accel::{
    dfa::{self, AccelScheme, AccelScorer, Builder, DFAKind, Path, RawDFA},
    util::{alphabet::ByteSet, id::StateID},
};

/// A compact way to write down a DFA in a test.
///
/// Symbol `k + 1` is made up of the bytes in `classes[k]` and symbol 0 is
/// every other byte. The dead state is added automatically, so the first
/// state added through `state` has ID 1.
#[derive(Clone, Debug)]
pub struct Table {
    builder: Builder,
    len: usize,
}

impl Table {
    pub fn new<C: AsRef<[u8]>>(kind: DFAKind, classes: &[C]) -> Table {
        let owned: Vec<Vec<u8>> =
            classes.iter().map(|c| c.as_ref().to_vec()).collect();
        let len = owned.len() + 1;
        let mut builder = RawDFA::builder(kind);
        builder.alphabet(
            move |b| {
                owned
                    .iter()
                    .position(|c| c.contains(&b))
                    .map_or(0, |k| (k + 1) as u16)
            },
            len,
        );
        builder.add_state(vec![dfa::DEAD; len], &[], &[]);
        Table { builder, len }
    }

    pub fn state(&mut self, next: &[usize]) -> StateID {
        self.report_state(next, &[])
    }

    pub fn report_state(
        &mut self,
        next: &[usize],
        reports: &[u32],
    ) -> StateID {
        assert_eq!(self.len, next.len(), "one transition per symbol");
        let next = next.iter().map(|&id| StateID::must(id)).collect();
        self.builder.add_state(next, reports, &[])
    }

    pub fn floating(&mut self, id: StateID) -> &mut Table {
        self.builder.start_floating(id);
        self
    }

    pub fn build(&self) -> Result<RawDFA, dfa::Error> {
        self.builder.build()
    }
}

/// A scorer that ignores its paths and always suggests the same scheme.
#[derive(Clone, Debug)]
pub struct FixedScorer(pub AccelScheme);

impl AccelScorer for FixedScorer {
    fn best_accel_scheme(&self, _: &[Path], _: &ByteSet) -> AccelScheme {
        self.0
    }
}

pub fn bytes(set: &[u8]) -> ByteSet {
    let mut s = ByteSet::empty();
    for &b in set {
        s.add(b);
    }
    s
}

pub fn range(start: u8, end: u8) -> ByteSet {
    let mut s = ByteSet::empty();
    s.add_all(start, end);
    s
}
