/*! The shared node store for all three Lexi Tree variants

# About
Every Lexi Tree variant (`D2Map`, `D3Map`, `PLMap`) is built out of the same
node shape. Children are owned through raw pointers rather than `Box`,
following the same approach as an unsafe linked stack: a node
is allocated with [`Box::into_raw`], threaded into the tree by plain pointer
assignment, and reclaimed with [`Box::from_raw`] exactly once, either by an
explicit removal or by the owning tree's `Drop` impl walking what's left.

The raw-pointer design exists because the rebalancing primitives (`lift`,
`lower2`, `lower3`) need to hold several nodes from one local neighborhood
at once and freely swap their children. `Box`-only ownership can't express
that without repeatedly un-wrapping and re-wrapping the same few nodes, which
obscures the pointer surgery the algorithms are actually doing. A plain
pointer, `unsafe` at the access sites, keeps the surgery readable and mirrors
the reference implementation's raw object-reference mutation one-for-one.

`high_right` is meaningful only for [`crate::lexi::d2`]/[`crate::lexi::d3`]
(it marks a right link as a same-level sibling edge); `level` is meaningful
only for [`crate::lexi::plexi`] (the explicit probabilistic level). Each
variant's driver only ever touches its own field.
*/

/// A possibly-absent child link. `None` is an absent child; `Some(ptr)`
/// points at a heap node owned somewhere in the same tree.
pub(crate) type Link<K, V> = Option<*mut Node<K, V>>;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub key: K,
    pub val: V,
    pub left: Link<K, V>,
    pub right: Link<K, V>,
    /// D2/D3 only: true iff `right` is a same-level sibling, not a child.
    pub high_right: bool,
    /// PL only: the explicit level drawn at insertion time.
    pub level: usize,
}

impl<K, V> Node<K, V> {
    /// Allocates a new, childless node and returns an owning raw pointer.
    pub fn alloc(key: K, val: V, high_right: bool, level: usize) -> *mut Node<K, V> {
        Box::into_raw(Box::new(Node {
            key,
            val,
            left: None,
            right: None,
            high_right,
            level,
        }))
    }

    /// Reclaims a single node, dropping its key and value. Does not touch
    /// `left`/`right` — the caller must have already detached or relinked
    /// whatever they pointed at.
    ///
    /// # Safety
    /// `ptr` must be a live, uniquely-owned node allocated by [`Node::alloc`]
    /// that has not already been freed.
    pub unsafe fn dealloc(ptr: *mut Node<K, V>) -> (K, V) {
        let node = unsafe { Box::from_raw(ptr) };
        (node.key, node.val)
    }
}

/// Frees every node reachable from `link`, including `link` itself. Used by
/// each map's `Drop` impl; also used to free a detached fragment if a
/// primitive ever needs to discard one (it currently never does — every
/// primitive relinks everything it touches).
///
/// # Safety
/// Every node reachable from `link` must be live and must not be reachable
/// from anywhere else (no aliasing frees).
pub(crate) unsafe fn drop_subtree<K, V>(link: Link<K, V>) {
    let mut stack = Vec::new();
    if let Some(ptr) = link {
        stack.push(ptr);
    }
    while let Some(ptr) = stack.pop() {
        unsafe {
            if let Some(l) = (*ptr).left {
                stack.push(l);
            }
            if let Some(r) = (*ptr).right {
                stack.push(r);
            }
            let _ = Node::dealloc(ptr);
        }
    }
}
