/*!
This crate computes acceleration schemes for the states of a byte oriented
DFA.

A DFA search normally consumes one byte at a time. But many states spend
most of their time looping back to themselves: the state for `.*` in
`.*foo`, for example, only cares about `f`. When a state has only a few
*escape bytes* (bytes whose transition leaves the state), a scanner can skip
ahead with a vectorized search for those bytes instead of stepping through
the transition table.

The analysis in this crate decides, for each state of a [`dfa::RawDFA`],
whether such a skip is worth it and what exactly must stop it:

* a set of single escape bytes,
* a small set of two byte sequences that a scanner must verify with one
byte of lookahead, or
* a set of single bytes that is only checked some fixed number of bytes into
the scan (an *offset* scheme), found by a bounded search of the paths
leaving the floating start state.

The main entry point is [`dfa::populate_acceleration_info`], which runs the
per-state analysis over an entire DFA and then lets states that behave like
the start state share its scheme.

# Example

```
use dfa_accel::{
    dfa::{self, Config, DFAKind, McClellanStrategy, RawDFA, UnionScorer},
    util::id::StateID,
};

// Two states besides the dead state: state 1 loops on everything except
// '\n', which moves to state 2.
let mut builder = RawDFA::builder(DFAKind::Outfix);
builder.alphabet(|b| if b == b'\n' { 1 } else { 0 }, 2);
builder.add_state(vec![dfa::DEAD, dfa::DEAD], &[], &[]);
let s1 = builder.add_state(
    vec![StateID::must(1), StateID::must(2)],
    &[],
    &[],
);
builder.add_state(vec![StateID::must(2), StateID::must(2)], &[], &[]);
builder.start_floating(s1);
let raw = builder.build()?;

let strat = McClellanStrategy::new(&raw, UnionScorer::new());
let accels = dfa::populate_acceleration_info(&strat, &Config::new());
assert_eq!(1, accels[&s1].outs().len());

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

#![deny(missing_docs)]
#![no_std]

#[cfg(not(feature = "alloc"))]
compile_error!("dfa-accel requires the 'alloc' feature");

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

#[macro_use]
mod macros;

pub mod dfa;
pub mod util;
