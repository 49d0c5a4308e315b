use std::error::Error;

use dfa_accel::dfa::{
    find_escape_info, AccelScheme, BuildStrategy, Config, DFAKind,
    McClellanStrategy, Scheme, UnionScorer,
};

use crate::util::{bytes, range, FixedScorer, Table};

// A state that only leaves on '\n' gets exactly one escape byte and no
// usable two byte refinement.
#[test]
fn single_newline_escape() -> Result<(), Box<dyn Error>> {
    let mut t = Table::new(DFAKind::Outfix, &[b"\n"]);
    let s = t.state(&[1, 2]);
    t.state(&[2, 2]);
    t.floating(s);
    let dfa = t.build()?;

    let strat = McClellanStrategy::new(&dfa, UnionScorer::new());
    let ei = strat.find_escape_strings(s);
    assert_eq!(bytes(b"\n"), *ei.outs());
    assert!(ei.double().map_or(false, |db| db.pairs().is_empty()));
    assert!(!ei.is_double_byte_ok());
    assert!(!ei.outs2_broken());
    assert_eq!(0, ei.offset());
    assert_eq!(1, ei.outs().len());
    Ok(())
}

// When the only escape leads into a state that must fire a callback, two
// byte analysis is abandoned no matter what the pairs look like.
#[test]
fn escape_into_reporting_state() -> Result<(), Box<dyn Error>> {
    let mut t = Table::new(DFAKind::Outfix, &[b"x", b"y"]);
    let s = t.state(&[1, 2, 1]);
    t.report_state(&[1, 2, 3], &[0]);
    t.state(&[3, 3, 3]);
    let dfa = t.build()?;

    let ei = find_escape_info(&dfa, s, 4, &UnionScorer::new());
    assert!(ei.outs2_broken());
    assert_eq!(Scheme::SingleByte, *ei.scheme());
    assert_eq!(bytes(b"x"), *ei.outs());
    Ok(())
}

// The same shape without callbacks keeps its single pair.
#[test]
fn escape_into_queried_reporting_state() -> Result<(), Box<dyn Error>> {
    let mut t = Table::new(DFAKind::Infix, &[b"x", b"y"]);
    let s = t.state(&[1, 2, 1]);
    t.report_state(&[1, 2, 3], &[0]);
    t.state(&[3, 3, 3]);
    let dfa = t.build()?;

    let ei = find_escape_info(&dfa, s, 4, &UnionScorer::new());
    assert!(ei.is_double_byte_ok());
    let pairs: Vec<(u8, u8)> =
        ei.double().unwrap().pairs().iter().copied().collect();
    assert_eq!(vec![(b'x', b'y')], pairs);
    Ok(())
}

fn wide_start_table(kind: DFAKind) -> Table {
    // The start state leaves on 200 bytes. One byte later, only ten bytes
    // lead anywhere other than back to the start.
    let low: Vec<u8> = (0..190).collect();
    let mid: Vec<u8> = (190..200).collect();
    let mut t = Table::new(kind, &[&low, &mid]);
    let s = t.state(&[1, 2, 2]);
    t.state(&[1, 1, 3]);
    t.state(&[3, 3, 3]);
    t.floating(s);
    t
}

// The floating start state of a DFA that is not triggered falls back to an
// offset search when its local scheme is poor.
#[test]
fn offset_search_finds_narrower_scheme() -> Result<(), Box<dyn Error>> {
    let dfa = wide_start_table(DFAKind::Prefix).build()?;
    let s = dfa.start_floating();

    let strat = McClellanStrategy::new(&dfa, UnionScorer::new())
        .configure(&Config::new().max_offset(1));
    let ei = strat.find_escape_strings(s);
    assert_eq!(1, ei.offset());
    assert_eq!(10, ei.outs().len());
    assert_eq!(range(190, 199), *ei.outs());
    assert!(ei.outs2_broken());

    // Without the offset search, all 200 escapes remain.
    let dfa = wide_start_table(DFAKind::Infix).build()?;
    let strat = McClellanStrategy::new(&dfa, UnionScorer::new())
        .configure(&Config::new().max_offset(1));
    let ei = strat.find_escape_strings(dfa.start_floating());
    assert_eq!(200, ei.outs().len());
    assert_eq!(0, ei.offset());
    Ok(())
}

// Any scorer can stand in for the default one, but its scheme only wins
// when it is strictly narrower.
#[test]
fn custom_scorer() -> Result<(), Box<dyn Error>> {
    let dfa = wide_start_table(DFAKind::Prefix).build()?;
    let s = dfa.start_floating();

    let scorer = FixedScorer(AccelScheme::new(bytes(b"q"), 3));
    let ei = find_escape_info(&dfa, s, 4, &scorer);
    assert_eq!(Scheme::Offset(3), *ei.scheme());
    assert_eq!(bytes(b"q"), *ei.outs());

    let scorer = FixedScorer(AccelScheme::new(range(0, 199), 2));
    let ei = find_escape_info(&dfa, s, 4, &scorer);
    assert_eq!(0, ei.offset());
    assert_eq!(200, ei.outs().len());
    Ok(())
}
