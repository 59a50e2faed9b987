/*! P-Lexi Tree: a probabilistic ordered map with explicit node levels

# About
Unlike `D2Map`/`D3Map`, `PLMap` draws an explicit level for every inserted
node (a geometric trial, same distribution a skip list uses) and keeps no
`high_right` bookkeeping at all: a node's `right` child always has a level
`<=` its own, and its `left` child always has a *strictly lower* level.
Insertion finds where the new level fits along the search path, splits the
existing left/right "chains" it passes through at that level, and splices
the new node in between; removal merges the two chains left dangling by the
removed node back together by descending level.

Ported field-for-field from `original_source/PLTree.py`.
*/

use crate::lexi::error::LexiError;
use crate::lexi::node::{drop_subtree, Node};
use crate::lexi::search::{self, InOrder};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;

/// Matches `PLTree.MaxLevel`.
const MAX_LEVEL: usize = 100;
/// `4*(MAX_LEVEL+1)+3`, the largest `_get_side_pairs` scratch buffer any
/// insertion can need (spec.md §5); allocated once and reused, cleared
/// (not reallocated) on each call.
const PATH_LEN: usize = 4 * (MAX_LEVEL + 1) + 3;

/// A P-Lexi Tree ordered map.
pub struct PLMap<K, V> {
    /// Sentinel at level `MAX_LEVEL + 1`, always above every real node.
    root: *mut Node<K, V>,
    /// -1 when empty, else the level of `root.right`.
    max_level: isize,
    p: f64,
    len: usize,
    path: Vec<Option<*mut Node<K, V>>>,
}

impl<K, V> PLMap<K, V> {
    /// Builds an empty map with trial probability `p` (each level-up trial
    /// succeeds with probability `p`, capped at `MAX_LEVEL`). `any_key`/
    /// `any_val` seed the sentinel and are never observable.
    pub fn new(any_key: K, any_val: V, p: f64) -> Self {
        PLMap {
            root: Node::alloc(any_key, any_val, false, MAX_LEVEL + 1),
            max_level: -1,
            p,
            len: 0,
            path: vec![None; PATH_LEN],
        }
    }

    /// As `new`, with the reference implementation's default `p = 0.5`.
    pub fn with_default_p(any_key: K, any_val: V) -> Self {
        Self::new(any_key, any_val, 0.5)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn root_link(&self) -> Option<*mut Node<K, V>> {
        unsafe { (*self.root).right }
    }

    /// `maxLevel + 1`, per `PLTree.height`.
    pub fn height(&self) -> usize {
        (self.max_level + 1).max(0) as usize
    }

    pub fn iter(&self) -> InOrder<'_, K, V> {
        InOrder::new(self.root_link())
    }

    pub(crate) fn validate(&self) -> Result<(), LexiError>
    where
        K: Ord + fmt::Debug,
    {
        match self.root_link() {
            None => {
                if self.max_level != -1 {
                    return Err(LexiError::InvariantViolation(format!(
                        "empty tree but max_level = {}",
                        self.max_level
                    )));
                }
                Ok(())
            }
            Some(r) => {
                let r_level = unsafe { (*r).level };
                if self.max_level != r_level as isize {
                    return Err(LexiError::InvariantViolation(format!(
                        "max_level {} != root level {}",
                        self.max_level, r_level
                    )));
                }
                unsafe { validate_levels(r, None, None) }.map_err(LexiError::InvariantViolation)
            }
        }
    }

    pub fn check(&self)
    where
        K: Ord + fmt::Debug,
    {
        if let Err(e) = self.validate() {
            panic!("{e}");
        }
    }

    pub fn graph(&self) -> (Vec<(&K, usize)>, Vec<(usize, usize)>)
    where
        K: Clone,
    {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        unsafe fn walk<K, V>(
            ptr: *mut Node<K, V>,
            nodes: &mut Vec<(&K, usize)>,
            edges: &mut Vec<(usize, usize)>,
        ) -> usize {
            let idx = nodes.len();
            nodes.push((&(*ptr).key, (*ptr).level));
            if let Some(l) = (*ptr).left {
                let child = walk(l, nodes, edges);
                edges.push((idx, child));
            }
            if let Some(r) = (*ptr).right {
                let child = walk(r, nodes, edges);
                edges.push((idx, child));
            }
            idx
        }
        if let Some(root) = self.root_link() {
            unsafe {
                walk(root, &mut nodes, &mut edges);
            }
        }
        (nodes, edges)
    }

    /// Draws a level via independent `p`-trials, capped by how tall the
    /// tree already is (never more than one level above the current max),
    /// and by `MAX_LEVEL`. Ported from `PLTree._rand_level`.
    fn rand_level(&self) -> usize {
        let cap = ((self.max_level + 1).max(0) as usize).min(MAX_LEVEL);
        let mut rng = rand::rng(); // Thread-local RNG
        let mut level = 0;
        while level < cap && rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}

impl<K: Ord, V> PLMap<K, V> {
    pub fn contains(&self, key: &K) -> bool {
        unsafe { search::find(self.root_link(), key).is_some() }
    }

    pub fn get(&self, key: &K) -> Result<&V, LexiError> {
        unsafe { search::find(self.root_link(), key) }.ok_or(LexiError::KeyNotFound)
    }

    /// Returns `(prev, cur, prev_cmp, cur_cmp)`: if a node of key `key`
    /// exists, `cur` is it (`cur_cmp == 0`); otherwise `prev -> ... -> cur`
    /// brackets where a node at `level` would be inserted, with `cur_cmp`
    /// telling which side `cur` hangs from (`2` if `cur` is `None`, i.e. we
    /// fell off the tree). Ported from `PLTree._find_insertion_pos`.
    unsafe fn find_insertion_pos(
        &self,
        key: &K,
        level: usize,
    ) -> (*mut Node<K, V>, Option<*mut Node<K, V>>, i8, i8) {
        unsafe {
            let mut prev = self.root;
            let mut prev_cmp: i8 = -1;
            let mut cur = (*prev).right;
            while let Some(c) = cur {
                match key.cmp(&(*c).key) {
                    Ordering::Greater => {
                        if (*c).level < level {
                            return (prev, Some(c), prev_cmp, -1);
                        }
                        prev = c;
                        prev_cmp = -1;
                        cur = (*c).right;
                    }
                    Ordering::Less => {
                        if (*c).level <= level {
                            return (prev, Some(c), prev_cmp, 1);
                        }
                        prev = c;
                        prev_cmp = 1;
                        cur = (*c).left;
                    }
                    Ordering::Equal => {
                        return (prev, Some(c), prev_cmp, 0);
                    }
                }
            }
            (prev, None, prev_cmp, 2)
        }
    }

    /// `find_insertion_pos` without the level tests — a plain search that
    /// also returns the found node's parent. Ported from
    /// `PLTree._get_node_pos`.
    unsafe fn get_node_pos(&self, key: &K) -> (*mut Node<K, V>, Option<*mut Node<K, V>>, i8) {
        unsafe {
            let mut prev = self.root;
            let mut prev_cmp: i8 = -1;
            let mut cur = (*prev).right;
            while let Some(c) = cur {
                match key.cmp(&(*c).key) {
                    Ordering::Greater => {
                        prev = c;
                        prev_cmp = -1;
                        cur = (*c).right;
                    }
                    Ordering::Less => {
                        prev = c;
                        prev_cmp = 1;
                        cur = (*c).left;
                    }
                    Ordering::Equal => return (prev, Some(c), 0),
                }
            }
            (prev, None, prev_cmp)
        }
    }

    /// Fills `nodes` with alternating `(first_j, last_j)` pairs walking one
    /// side of the insertion point, stopping early if `key` turns out to
    /// already be present. Ported from `PLTree._get_side_pairs`.
    unsafe fn get_side_pairs(
        key: &K,
        first1: Option<*mut Node<K, V>>,
        first1_cmp: i8,
        nodes: &mut [Option<*mut Node<K, V>>],
    ) -> Option<*mut Node<K, V>> {
        unsafe {
            debug_assert_ne!(first1_cmp, 0);
            let Some(first1) = first1 else {
                nodes[0] = None;
                nodes[1] = None;
                return None;
            };
            nodes[0] = Some(first1);
            let mut i = 1usize;
            let mut prev = first1;
            let mut prev_cmp = first1_cmp;
            let mut cur = if first1_cmp < 0 {
                (*first1).right
            } else {
                (*first1).left
            };
            while let Some(c) = cur {
                debug_assert_ne!(prev_cmp, 0);
                match key.cmp(&(*c).key) {
                    Ordering::Greater => {
                        if prev_cmp > 0 {
                            nodes[i] = Some(prev);
                            nodes[i + 1] = Some(c);
                            i += 2;
                        }
                        prev = c;
                        prev_cmp = -1;
                        cur = (*c).right;
                    }
                    Ordering::Less => {
                        if prev_cmp < 0 {
                            nodes[i] = Some(prev);
                            nodes[i + 1] = Some(c);
                            i += 2;
                        }
                        prev = c;
                        prev_cmp = 1;
                        cur = (*c).left;
                    }
                    Ordering::Equal => return Some(c),
                }
            }
            nodes[i] = Some(prev);
            nodes[i + 1] = None;
            nodes[i + 2] = None;
            nodes[i + 3] = None;
            None
        }
    }

    /// Insert-or-overwrite, drawing a fresh level. Ported from
    /// `PLTree.insert`/`__setitem__`.
    pub fn set(&mut self, key: K, val: V) {
        self.insert_at_level(key, val, None);
    }

    /// As `set`, but with an explicit level instead of a drawn one — used
    /// by tests that need deterministic structure.
    pub(crate) fn insert_at_level(&mut self, key: K, val: V, level: Option<usize>) {
        unsafe {
            let level = level.unwrap_or_else(|| self.rand_level());
            let (prev, cur, prev_cmp, cur_cmp) = self.find_insertion_pos(&key, level);
            if let Some(c) = cur {
                if cur_cmp == 0 {
                    (*c).val = val;
                    return;
                }
            }

            let max_level_before = self.max_level;
            let required = 4 * ((max_level_before.max(-1) + 1) as usize) + 3;
            for slot in self.path[..required].iter_mut() {
                *slot = None;
            }
            let key_node = Self::get_side_pairs(&key, cur, cur_cmp, &mut self.path[..required]);
            if let Some(kn) = key_node {
                (*kn).val = val;
                return;
            }

            let new = Node::alloc(key, val, false, level);

            if prev_cmp < 0 {
                (*prev).right = Some(new);
            } else {
                (*prev).left = Some(new);
            }

            if cur_cmp < 0 {
                (*new).left = cur;
                (*new).right = self.path[2];
            } else {
                (*new).right = cur;
                (*new).left = self.path[2];
            }

            let mut i = 1usize;
            let mut last_cmp = cur_cmp;
            loop {
                let Some(last) = self.path[i] else { break };
                if last_cmp < 0 {
                    (*last).right = self.path[i + 3];
                } else {
                    (*last).left = self.path[i + 3];
                }
                last_cmp = -last_cmp;
                i += 2;
            }

            self.len += 1;
            if level as isize > self.max_level {
                self.max_level = level as isize;
            }
        }
    }

    /// Removes `key`, returning its value, or `LexiError::KeyNotFound`.
    /// Ported from `PLTree.remove`.
    pub fn remove(&mut self, key: &K) -> Result<V, LexiError> {
        self.remove_impl(key).ok_or(LexiError::KeyNotFound)
    }

    /// As `remove`, but returns `default` instead of an error when `key`
    /// is absent.
    pub fn remove_or(&mut self, key: &K, default: V) -> V {
        self.remove_impl(key).unwrap_or(default)
    }

    fn remove_impl(&mut self, key: &K) -> Option<V> {
        unsafe {
            let (prev0, key_node, cur_cmp0) = self.get_node_pos(key);
            let key_node = key_node?;

            let mut left_cur = (*key_node).left;
            let mut right_cur = (*key_node).right;
            (*key_node).left = None;
            (*key_node).right = None;

            let mut cur = Some(prev0);
            let mut cur_cmp = cur_cmp0;
            let mut done = false;
            while !done {
                let Some(c) = cur else { break };
                let next: Option<*mut Node<K, V>>;
                let next_cmp: i8;
                if right_cur.is_none() || left_cur.is_none() {
                    next = left_cur.or(right_cur);
                    next_cmp = 2;
                    done = true;
                } else {
                    let l = left_cur.unwrap();
                    let r = right_cur.unwrap();
                    if (*l).level >= (*r).level {
                        next = Some(l);
                        next_cmp = -1;
                        left_cur = (*l).right;
                    } else {
                        next = Some(r);
                        next_cmp = 1;
                        right_cur = (*r).left;
                    }
                }

                if cur_cmp < 0 {
                    if (*c).right != next {
                        (*c).right = next;
                    }
                } else if (*c).left != next {
                    (*c).left = next;
                }
                cur = next;
                cur_cmp = next_cmp;
            }

            self.len -= 1;
            self.max_level = match self.root_link() {
                Some(r) => (*r).level as isize,
                None => -1,
            };
            let (_, val) = Node::dealloc(key_node);
            Some(val)
        }
    }
}

/// Recursive BST-order and level-monotonicity check, ported from
/// `PLTree._check_sub`.
unsafe fn validate_levels<K: Ord + fmt::Debug, V>(
    ptr: *mut Node<K, V>,
    above_me: Option<&K>,
    below_me: Option<&K>,
) -> Result<(), String> {
    unsafe {
        let node = &*ptr;
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
        if let Some(l) = node.left {
            if !((*l).level < node.level) {
                return Err(format!(
                    "left child level {} not below parent level {}",
                    (*l).level,
                    node.level
                ));
            }
            validate_levels(l, above_me, Some(&node.key))?;
        }
        if let Some(r) = node.right {
            if !((*r).level <= node.level) {
                return Err(format!(
                    "right child level {} above parent level {}",
                    (*r).level,
                    node.level
                ));
            }
            validate_levels(r, Some(&node.key), below_me)?;
        }
        Ok(())
    }
}

impl<K, V> Drop for PLMap<K, V> {
    fn drop(&mut self) {
        unsafe {
            drop_subtree(Some(self.root));
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PLMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        unsafe fn walk<K: fmt::Debug, V: fmt::Debug>(
            link: Option<*mut Node<K, V>>,
            dbg: &mut fmt::DebugMap<'_, '_>,
        ) {
            if let Some(ptr) = link {
                walk((*ptr).left, dbg);
                dbg.entry(&(*ptr).key, &(*ptr).val);
                walk((*ptr).right, dbg);
            }
        }
        unsafe {
            walk(self.root_link(), &mut dbg);
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_no_entries() {
        let t: PLMap<i32, &str> = PLMap::with_default_p(0, "sentinel");
        assert!(t.is_empty());
        assert_eq!(t.height(), 0);
        assert_eq!(t.get(&5), Err(LexiError::KeyNotFound));
    }

    #[test]
    fn single_insert_and_lookup() {
        let mut t = PLMap::with_default_p(0, "sentinel");
        t.set(10, "ten");
        assert_eq!(t.get(&10), Ok(&"ten"));
        t.check();
    }

    #[test]
    fn overwrite_does_not_grow_len() {
        let mut t = PLMap::with_default_p(0, "sentinel");
        t.set(1, "a");
        t.set(1, "b");
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&1), Ok(&"b"));
    }

    #[test]
    fn deterministic_levels_build_expected_shape() {
        let mut t = PLMap::with_default_p(0, "");
        // A hand-picked level sequence exercising side-chain splicing.
        t.insert_at_level(5, 5, Some(2));
        t.insert_at_level(3, 3, Some(1));
        t.insert_at_level(7, 7, Some(1));
        t.insert_at_level(1, 1, Some(0));
        t.insert_at_level(4, 4, Some(0));
        t.insert_at_level(6, 6, Some(0));
        t.insert_at_level(9, 9, Some(3));
        t.check();
        assert_eq!(t.height(), 4);
        let collected: Vec<_> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(collected, vec![1, 3, 4, 5, 6, 7, 9]);
    }

    #[test]
    fn sequential_insert_with_random_levels_stays_valid() {
        let mut t = PLMap::with_default_p(0, "");
        for i in 0..200 {
            t.set(i, i);
        }
        assert_eq!(t.len(), 200);
        t.check();
        let collected: Vec<_> = t.iter().map(|(k, _)| *k).collect();
        let expected: Vec<_> = (0..200).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn remove_every_key_random_order() {
        let mut t = PLMap::with_default_p(0, "");
        let mut keys: Vec<i32> = (0..150).collect();
        for i in 0..150 {
            t.set(keys[i as usize], keys[i as usize]);
        }
        // deterministic shuffle independent of any RNG crate: reverse+rotate
        keys.reverse();
        for i in 0..75 {
            keys.swap(i, 149 - i);
        }
        for k in &keys {
            assert_eq!(t.remove(k), Ok(*k));
            t.check();
        }
        assert!(t.is_empty());
        assert_eq!(t.height(), 0);
    }

    #[test]
    fn remove_missing_key_reports_not_found() {
        let mut t = PLMap::with_default_p(0, "");
        t.set(1, "a");
        assert_eq!(t.remove(&99), Err(LexiError::KeyNotFound));
        assert_eq!(t.remove_or(&99, "fallback"), "fallback");
    }

    #[test]
    fn interleaved_insert_and_remove() {
        let mut t = PLMap::with_default_p(0, "");
        for i in 0..64 {
            t.set(i, i);
        }
        for i in (0..64).step_by(2) {
            t.remove(&i).unwrap();
        }
        t.check();
        for i in (0..64).step_by(2) {
            t.set(i, i * 100);
        }
        t.check();
        assert_eq!(t.len(), 64);
    }
}
