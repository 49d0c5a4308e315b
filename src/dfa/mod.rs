/*!
Acceleration analysis for DFAs.

The analysis works in three layers:

* [`find_escape_info`] characterizes a single state: which bytes leave it,
and whether those escapes can be narrowed down to a handful of two byte
sequences.
* [`look_for_offset_accel`] searches the bounded set of paths leaving a
state and asks an [`AccelScorer`] for a single byte scheme that may be
checked some number of bytes into the scan. It is only consulted for the
floating start state, when the first layer comes up short.
* [`populate_acceleration_info`] runs the first layer (through a
[`BuildStrategy`]) over every state, throws away schemes that are too wide
to pay off, and then shares the start state's scheme with every state in its
[region](find_region).

The input to all of this is a [`RawDFA`], which must be constructed through
its [`Builder`] so that every transition is known to be valid.
*/

pub use self::{
    error::Error,
    escape::{
        find_escape_info, DoubleByte, EscapeInfo, Scheme,
        MAX_DOUBLE_BYTE_PAIRS, MAX_DOUBLE_BYTE_SINGLES,
    },
    offset::{
        generate_paths, is_useful_path, look_for_offset_accel, AccelScheme,
        AccelScorer, Path, PathEnd, UnionScorer, PATHS_LIMIT,
    },
    populate::{
        find_region, populate_acceleration_info, BuildStrategy, Config,
        McClellanStrategy, ACCEL_DFA_MAX_FLOATING_STOP_CHAR,
        ACCEL_DFA_MAX_OFFSET_DEPTH, ACCEL_DFA_MAX_STOP_CHAR,
    },
    raw::{Builder, DFAKind, RawDFA, ReportID, State, DEAD},
};

mod error;
mod escape;
mod offset;
mod populate;
mod raw;
