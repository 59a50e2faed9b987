/*! # About
Three self-balancing ordered-map variants — Lexi Trees — built on explicit
rebalancing primitives instead of the rotation-based rebalancing classical
AVL/red-black trees use. Nodes are arranged along two orthogonal
dimensions: a key order (the usual BST shape) and a level order (same-level
siblings forming horizontal "lists" that the rebalancing primitives keep
short).

- [`lexi::d2`]: deterministic, same-level sibling chains capped at length 2.
- [`lexi::d3`]: deterministic, same-level sibling chains capped at length 3.
- [`lexi::plexi`]: probabilistic, a skip-list-style drawn level per node.

The hard part, and the reason these three get a shared home instead of
three unrelated modules, is the rebalancing core: `lift` (used by D2/D3 on
insert descent) and the two `lower` operations (one per deterministic
variant, used on removal) perform local pointer surgery on small
neighborhoods while preserving global invariants. See [`lexi`] for the
shared node/search/iteration plumbing all three variants sit on top of.
*/

pub mod lexi;
