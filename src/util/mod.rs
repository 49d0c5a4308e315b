/*!
Lower level primitives shared by the acceleration analysis.

These are exposed because they appear in the public API of the [`dfa`]
module: state identifiers and sets of bytes.

[`dfa`]: crate::dfa
*/

pub mod alphabet;
pub mod id;
