/*! Error type for the Lexi Tree maps

# About
`K: Ord` is enforced at compile time by every map's type signature, so
there's no runtime "incomparable keys" case to report (the reference
implementation's Python is duck-typed and can hit a `TypeError` mid-compare;
Rust's trait bound rules that out entirely, which is why this enum has no
`ArgumentError`-shaped variant). The two variants that remain are the two
ways a call can fail at runtime: the key genuinely isn't present, or
`check()` found the tree in a state the rebalancing primitives should never
produce.

Most collections in this crate family return plain `Option` everywhere;
`thiserror` is pulled in here (see `DESIGN.md`) since a map with a
fallible `get`/`remove` surface and a validation entry point benefits
from a real error type instead of bare panics or stringly-typed
`Result<T, String>`.
*/

use thiserror::Error;

/// Errors produced by the Lexi Tree maps.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexiError {
    /// `remove`/`get` (the non-`_or` forms) were called with a key the map
    /// does not contain.
    #[error("key not found")]
    KeyNotFound,

    /// `check()` found the tree violating one of its structural invariants
    /// (BST order, level-list length bound, uniform leaf depth, or — for
    /// `PLMap` — level monotonicity along a descent). Carries a short,
    /// human-readable description of what was violated; never returned by
    /// any path except `check()` itself.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
