/*! Common descent, iteration, and validation primitives

# About
`find`/`contains` and the in-order iterator don't care whether a `right`
link is a same-level (`high_right`) edge or not — BST order only constrains
left and right subtrees relative to `key`, so a single implementation works
for `D2Map`, `D3Map`, and `PLMap` alike. This mirrors the reference
implementation's `DLTree._find`/`__iter__`, which are likewise shared by
both deterministic variants (and `PLTree` reimplements the same two-line
loop, since Python has no shared base across all three).
*/

use crate::lexi::node::{Link, Node};
use std::cmp::Ordering;

/// Descends from `link` following key order; returns the value at `key`, if
/// present. Ported from `DLTree._find`/`PLTree._find`.
pub(crate) unsafe fn find<'a, K: Ord, V>(link: Link<K, V>, key: &K) -> Option<&'a V> {
    let mut cur = link;
    while let Some(ptr) = cur {
        let node = unsafe { &*ptr };
        match key.cmp(&node.key) {
            Ordering::Less => cur = node.left,
            Ordering::Greater => cur = node.right,
            Ordering::Equal => return Some(unsafe { &(*ptr).val }),
        }
    }
    None
}

pub(crate) unsafe fn find_mut<'a, K: Ord, V>(link: Link<K, V>, key: &K) -> Option<&'a mut V> {
    let mut cur = link;
    while let Some(ptr) = cur {
        let node = unsafe { &*ptr };
        match key.cmp(&node.key) {
            Ordering::Less => cur = node.left,
            Ordering::Greater => cur = node.right,
            Ordering::Equal => return Some(unsafe { &mut (*ptr).val }),
        }
    }
    None
}

/// Height for D2/D3: the number of nodes on the leftmost spine, since every
/// leaf sits at level 0 and the leftmost spine never takes a `high_right`
/// edge. Ported from `DLTree.get_height`.
pub(crate) unsafe fn leftmost_spine_height<K, V>(root_link: Link<K, V>) -> usize {
    let mut height = 0;
    let mut cur = root_link;
    while let Some(ptr) = cur {
        height += 1;
        cur = unsafe { (*ptr).left };
    }
    height
}

/// An in-order "snapshot" iterator over borrowed `(key, val)` pairs, shared
/// by all three map types. Not restartable and invalidated by any mutation
/// to the tree it was created from (the caller statically enforces this by
/// borrowing the map for the iterator's lifetime).
pub struct InOrder<'a, K, V> {
    stack: Vec<*mut Node<K, V>>,
    _marker: std::marker::PhantomData<&'a (K, V)>,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn new(root_link: Link<K, V>) -> Self {
        let mut it = InOrder {
            stack: Vec::new(),
            _marker: std::marker::PhantomData,
        };
        it.push_left_spine(root_link);
        it
    }

    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(ptr) = link {
            self.stack.push(ptr);
            link = unsafe { (*ptr).left };
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let ptr = self.stack.pop()?;
        let node = unsafe { &*ptr };
        self.push_left_spine(node.right);
        Some((&node.key, &node.val))
    }
}

/// Detaches `leaf` (the in-order predecessor of a removed key) from its
/// parent `prev_leaf`, then splices it into `node`'s slot — copying `node`'s
/// `left`/`right`/`high_right` across — unless `node` and `leaf` are already
/// the same node. Returns whether a "hole" (a missing level) remains where
/// `leaf` used to hang. Ported from `DLTree._replace_with_leaf`, shared
/// byte-for-byte between `D2Map` and `D3Map` removal.
///
/// # Safety
/// `prev_leaf`/`leaf` and `prev_node`/`node` must each be live, correctly
/// related pairs (`leaf` reachable as a child of `prev_leaf`, `node` as a
/// child of `prev_node`), as collected by the caller's path walk.
pub(crate) unsafe fn replace_with_leaf<K, V>(
    prev_node: *mut Node<K, V>,
    node: *mut Node<K, V>,
    prev_leaf: *mut Node<K, V>,
    leaf: *mut Node<K, V>,
    root_sentinel: *mut Node<K, V>,
) -> bool {
    unsafe {
        let hole = if (*prev_leaf).right == Some(leaf) {
            let h = !(*prev_leaf).high_right
                && (*leaf).right.is_none()
                && prev_leaf != root_sentinel;
            (*prev_leaf).right = (*leaf).right;
            h
        } else {
            let h = (*leaf).right.is_none();
            (*prev_leaf).left = (*leaf).right;
            h
        };

        if node != leaf {
            (*leaf).right = (*node).right;
            (*leaf).high_right = (*node).high_right;
            (*leaf).left = (*node).left;
            if (*prev_node).right == Some(node) {
                (*prev_node).right = Some(leaf);
            } else {
                (*prev_node).left = Some(leaf);
            }
        }
        hole
    }
}

/// Recursively checks BST order and the level-list length bound for D2/D3.
/// Ported from `DLTree._check_sub`. `max_list_len` is 2 for D2, 3 for D3.
/// Returns `Err` describing the first violation found, instead of the
/// Python's bare `assert` — `check()` is a callable diagnostic here, not a
/// debug-only invariant.
pub(crate) unsafe fn validate_d<K: Ord + std::fmt::Debug, V>(
    link: Link<K, V>,
    above_me: Option<&K>,
    below_me: Option<&K>,
    num_high_rights: usize,
    max_list_len: usize,
    cur_height: usize,
    tree_height: usize,
) -> Result<(), String> {
    let Some(ptr) = link else {
        return Ok(());
    };
    let node = unsafe { &*ptr };
    if let Some(b) = below_me {
        if !(&node.key < b) {
            return Err(format!("BST order violated: {:?} >= {:?}", node.key, b));
        }
    }
    if let Some(a) = above_me {
        if !(a < &node.key) {
            return Err(format!("BST order violated: {:?} <= {:?}", a, node.key));
        }
    }
    if node.left.is_some() {
        unsafe {
            validate_d(
                node.left,
                above_me,
                Some(&node.key),
                0,
                max_list_len,
                cur_height + 1,
                tree_height,
            )?;
        }
    } else if cur_height != tree_height {
        return Err(format!(
            "leaf not at uniform depth: {cur_height} != {tree_height}"
        ));
    }
    if node.right.is_some() {
        let num_high_rights = if node.high_right { num_high_rights + 1 } else { 0 };
        if num_high_rights >= max_list_len {
            return Err(format!("level-list exceeds bound of {max_list_len}"));
        }
        let new_height = if node.high_right { cur_height } else { cur_height + 1 };
        unsafe {
            validate_d(
                node.right,
                Some(&node.key),
                below_me,
                num_high_rights,
                max_list_len,
                new_height,
                tree_height,
            )?;
        }
    } else if cur_height != tree_height {
        return Err(format!(
            "leaf not at uniform depth: {cur_height} != {tree_height}"
        ));
    }
    Ok(())
}
