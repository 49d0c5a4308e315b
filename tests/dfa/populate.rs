use std::{collections::BTreeMap, error::Error};

use dfa_accel::{
    dfa::{
        populate_acceleration_info, BuildStrategy, Config, DFAKind,
        EscapeInfo, McClellanStrategy, RawDFA, UnionScorer,
    },
    util::{alphabet::ByteSet, id::StateID},
};

use crate::util::{bytes, range, Table};

/// A strategy that hands out precomputed schemes. States without one get a
/// scheme that is too wide to ever be accepted.
struct Canned<'a> {
    dfa: &'a RawDFA,
    infos: BTreeMap<StateID, EscapeInfo>,
}

impl<'a> BuildStrategy for Canned<'a> {
    fn dfa(&self) -> &RawDFA {
        self.dfa
    }

    fn find_escape_strings(&self, id: StateID) -> EscapeInfo {
        self.infos
            .get(&id)
            .cloned()
            .unwrap_or_else(|| EscapeInfo::single_byte(ByteSet::full()))
    }
}

// S -a-> A -b-> C and S -b-> B, with every other byte looping and 'x'
// leaving for a reporting state E.
fn region_dfa() -> Result<RawDFA, Box<dyn Error>> {
    let mut t = Table::new(DFAKind::Prefix, &[b"x", b"a", b"b"]);
    let s = t.state(&[1, 5, 2, 3]);
    t.state(&[2, 5, 2, 4]);
    t.state(&[3, 5, 3, 3]);
    t.state(&[4, 5, 4, 4]);
    t.report_state(&[5, 5, 5, 5], &[0]);
    t.floating(s);
    Ok(t.build()?)
}

#[test]
fn disabled_returns_nothing() -> Result<(), Box<dyn Error>> {
    let dfa = region_dfa()?;
    let strat = McClellanStrategy::new(&dfa, UnionScorer::new());
    let config = Config::new().accelerate(false);
    assert!(populate_acceleration_info(&strat, &config).is_empty());
    Ok(())
}

#[test]
fn region_adopts_start_scheme() -> Result<(), Box<dyn Error>> {
    let dfa = region_dfa()?;
    let (s, a, b, c, e) = (
        StateID::must(1),
        StateID::must(2),
        StateID::must(3),
        StateID::must(4),
        StateID::must(5),
    );
    let start = EscapeInfo::with_offset(bytes(b"x"), 1);
    let mut infos = BTreeMap::new();
    infos.insert(s, start.clone());
    infos.insert(a, EscapeInfo::single_byte(bytes(b"bxyz")));
    let strat = Canned { dfa: &dfa, infos };

    let accels = populate_acceleration_info(&strat, &Config::new());
    assert_eq!(4, accels.len());
    for id in [s, a, b, c].iter() {
        assert_eq!(Some(&start), accels.get(id), "state {:?}", id);
    }
    assert!(!accels.contains_key(&e));
    Ok(())
}

#[test]
fn region_keeps_unbroken_schemes() -> Result<(), Box<dyn Error>> {
    let dfa = region_dfa()?;
    let (s, a) = (StateID::must(1), StateID::must(2));
    let start = EscapeInfo::with_offset(bytes(b"x"), 1);
    let own = EscapeInfo::double_byte(
        bytes(b"bx"),
        vec![(b'b', b'q')].into_iter().collect(),
        ByteSet::empty(),
    );
    let mut infos = BTreeMap::new();
    infos.insert(s, start.clone());
    infos.insert(a, own.clone());
    let strat = Canned { dfa: &dfa, infos };

    let accels = populate_acceleration_info(&strat, &Config::new());
    assert_eq!(Some(&own), accels.get(&a));
    assert_eq!(Some(&start), accels.get(&StateID::must(3)));
    Ok(())
}

#[test]
fn unbroken_start_scheme_is_not_shared() -> Result<(), Box<dyn Error>> {
    let dfa = region_dfa()?;
    let s = StateID::must(1);
    let mut infos = BTreeMap::new();
    infos.insert(
        s,
        EscapeInfo::double_byte(
            bytes(b"abx"),
            vec![(b'a', b'b')].into_iter().collect(),
            ByteSet::empty(),
        ),
    );
    let strat = Canned { dfa: &dfa, infos };

    let accels = populate_acceleration_info(&strat, &Config::new());
    assert_eq!(vec![s], accels.keys().copied().collect::<Vec<_>>());
    Ok(())
}

// End to end with the default strategy: the start state finds an offset
// scheme and shares it with the state it bounces through.
#[test]
fn default_strategy_end_to_end() -> Result<(), Box<dyn Error>> {
    let low: Vec<u8> = (0..190).collect();
    let mid: Vec<u8> = (190..200).collect();
    let mut t = Table::new(DFAKind::Prefix, &[&low, &mid]);
    let s = t.state(&[1, 2, 2]);
    let bounce = t.state(&[1, 1, 3]);
    let end = t.state(&[3, 3, 3]);
    t.floating(s);
    let dfa = t.build()?;

    let config = Config::new().max_offset(1);
    let strat =
        McClellanStrategy::new(&dfa, UnionScorer::new()).configure(&config);
    let accels = populate_acceleration_info(&strat, &config);

    let start = &accels[&s];
    assert_eq!(1, start.offset());
    assert_eq!(range(190, 199), *start.outs());
    assert_eq!(Some(start), accels.get(&bounce));
    assert!(accels[&end].outs().is_empty());
    assert!(!accels[&end].outs2_broken());
    Ok(())
}
