/*! Lexi Trees: self-balancing ordered maps built from explicit rebalancing primitives

# About
Three ordered-map variants share one node shape ([`node::Node`]) and one set
of descent/iteration helpers ([`search`]), but each drives its own
insert/remove logic and pairs with its own rebalancing primitive:

- [`d2`] (`D2Map`) is deterministic, keeping level-lists ("chains" of
  same-level siblings joined by [`node::Node::high_right`] edges) no longer
  than 2, rebalanced on insert by [`lift`] and on removal by [`lower2`].
- [`d3`] (`D3Map`) is the 3-wide sibling of `D2Map`, rebalanced by the same
  [`lift`] but [`lower3`], which additionally handles 3-sibling chains.
- [`plexi`] (`PLMap`) is probabilistic: every node gets an explicit level
  drawn at insertion (no `high_right` bookkeeping at all), and rebalancing
  falls out of how the level is chosen rather than an explicit primitive.

All three expose the same map-like surface (`set`/`get`/`remove`/`iter`/
`check`/`height`/`graph`), so a caller picks a variant purely on its
rebalancing-cost/implementation-complexity tradeoff.
*/

pub(crate) mod error;
pub(crate) mod lift;
pub(crate) mod lower2;
pub(crate) mod lower3;
pub(crate) mod node;
pub(crate) mod search;

pub mod d2;
pub mod d3;
pub mod plexi;

#[cfg(test)]
mod property;

pub use d2::D2Map;
pub use d3::D3Map;
pub use error::LexiError;
pub use plexi::PLMap;
pub use search::InOrder;
