/*! 2-Lexi Tree: a deterministic ordered map with level-lists of length <= 2

# About
`D2Map` keeps every leaf at the same depth and bounds each level-list (a run
of nodes linked by `high_right` edges) to at most two nodes. Insertion always
lands a new key as a `high_right` sibling of the leaf the search falls off
of, then lazily calls [`lift`] on the way back up the recorded path whenever
that leaves a list too long. Removal substitutes the in-order predecessor
leaf into the removed key's slot and walks back up invoking [`lower2::lower`]
while a "hole" (a missing level) remains.

Ported field-for-field from `original_source/D2LTree.py` (itself built on
`DLTree` for the parts shared with `D3LTree`); the raw-pointer node layout
and the sentinel-root trick are ported from the same file's pure-Python
object graph, adapted to an unsafe linked stack's idiom of explicit
`Box::into_raw`/`Box::from_raw` management.
*/

use crate::lexi::error::LexiError;
use crate::lexi::lift::lift;
use crate::lexi::lower2;
use crate::lexi::node::{drop_subtree, Node};
use crate::lexi::search::{self, InOrder};
use std::cmp::Ordering;
use std::fmt;

/// Matches `D2LTree.MAX_LEVEL`: a depth the reference implementation never
/// expects to approach, used only to size the scratch path buffer.
const MAX_LEVEL: usize = 40;
const PATH_CAP: usize = 2 * (MAX_LEVEL + 1) + 1;

/// A 2-Lexi Tree ordered map.
pub struct D2Map<K, V> {
    /// Sentinel; `root.right` is the real tree root, `root.left` is always
    /// `None`, `root.high_right` is always `false`.
    root: *mut Node<K, V>,
    len: usize,
    /// Scratch buffer reused by `set`/`remove`; `path[0]` is always `root`.
    path: Vec<*mut Node<K, V>>,
}

impl<K, V> D2Map<K, V> {
    /// Builds an empty map. `any_key`/`any_val` seed the sentinel node and
    /// are never observable through the public API.
    pub fn new(any_key: K, any_val: V) -> Self {
        D2Map {
            root: Node::alloc(any_key, any_val, false, 0),
            len: 0,
            path: Vec::with_capacity(PATH_CAP),
        }
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

    pub fn height(&self) -> usize {
        unsafe { search::leftmost_spine_height(self.root_link()) }
    }

    pub fn iter(&self) -> InOrder<'_, K, V> {
        InOrder::new(self.root_link())
    }

    /// Internal, `Result`-returning validation; `check` panics on top of
    /// this. Ported from `DLTree._check`/`_check_sub` with `max_list_len =
    /// 2`.
    pub(crate) fn validate(&self) -> Result<(), LexiError>
    where
        K: Ord + fmt::Debug,
    {
        let height = self.height();
        unsafe { search::validate_d(self.root_link(), None, None, 0, 2, 1, height) }
            .map_err(LexiError::InvariantViolation)
    }

    /// Panics if the tree violates BST order, the level-list bound, or
    /// uniform leaf depth. Matches the Python's bare `assert` in
    /// `DLTree._check_sub`.
    pub fn check(&self)
    where
        K: Ord + fmt::Debug,
    {
        if let Err(e) = self.validate() {
            panic!("{e}");
        }
    }

    /// Node/edge snapshot for external rendering, ported from
    /// `generic.py`'s `Tree.get_graph` (the level-window drawing-tool
    /// parameters aren't carried over; this always returns the whole tree).
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
}

impl<K: Ord, V> D2Map<K, V> {
    pub fn contains(&self, key: &K) -> bool {
        unsafe { search::find(self.root_link(), key).is_some() }
    }

    pub fn get(&self, key: &K) -> Result<&V, LexiError> {
        unsafe { search::find(self.root_link(), key) }.ok_or(LexiError::KeyNotFound)
    }

    /// Insert-or-overwrite. Ported from `D2LTree.__setitem__` plus
    /// `_insert_keynode`.
    pub fn set(&mut self, key: K, val: V) {
        unsafe {
            self.path.clear();
            self.path.push(self.root);
            let mut prev_cmp: i8 = -1;
            let mut cur = (*self.root).right;
            while let Some(ptr) = cur {
                self.path.push(ptr);
                match key.cmp(&(*ptr).key) {
                    Ordering::Greater => {
                        prev_cmp = -1;
                        cur = (*ptr).right;
                    }
                    Ordering::Less => {
                        prev_cmp = 1;
                        cur = (*ptr).left;
                    }
                    Ordering::Equal => {
                        (*ptr).val = val;
                        return;
                    }
                }
            }

            let key_node = Node::alloc(key, val, false, 0);
            self.len += 1;
            let mut last_idx: isize = self.path.len() as isize - 1;
            let prev = self.path[last_idx as usize];
            if last_idx == 0 {
                (*prev).right = Some(key_node);
                return;
            }
            last_idx -= 1;
            let mut prev2 = self.path[last_idx as usize];

            // Ported from `D2LTree._insert_keynode`.
            let (mut prev, mut cur) = if prev_cmp > 0 {
                if (*prev2).right == Some(prev) {
                    (*prev2).right = Some(key_node);
                } else {
                    (*prev2).left = Some(key_node);
                }
                (*key_node).right = Some(prev);
                (*key_node).high_right = true;
                (key_node, prev)
            } else {
                (*key_node).right = (*prev).right;
                (*key_node).high_right = true;
                (*prev).right = Some(key_node);
                (*prev).high_right = true;
                (prev, key_node)
            };
            let mut prev2: Option<*mut Node<K, V>> = Some(prev2);

            loop {
                if (*prev).high_right && (*prev).right == Some(cur) {
                    last_idx -= 1;
                    cur = prev;
                    prev = prev2.expect("prev2 present while prev.high_right holds");
                    prev2 = if last_idx >= 0 {
                        Some(self.path[last_idx as usize])
                    } else {
                        None
                    };
                    continue;
                } else if (*cur).high_right {
                    if let Some(right) = (*cur).right {
                        if (*right).high_right && (*right).right.is_some() {
                            let prev_is_root = prev == self.root;
                            let lifted = lift(prev2, prev, cur, right, prev_is_root);
                            prev = lifted.prev;
                            cur = lifted.cur;
                            continue;
                        }
                    }
                }
                break;
            }
        }
    }

    /// Removes `key`, returning its value, or `LexiError::KeyNotFound`.
    /// Ported from `D2LTree._find_and_collect`/`remove`.
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
            self.path.clear();
            self.path.push(self.root);
            let mut cur = (*self.root).right?;
            let mut key_node = None;
            let mut prev_key_node = None;
            let mut key_node_idx = 0usize;
            loop {
                self.path.push(cur);
                match key.cmp(&(*cur).key) {
                    Ordering::Greater => match (*cur).right {
                        Some(r) => cur = r,
                        None => return None,
                    },
                    Ordering::Less => match (*cur).left {
                        Some(l) => cur = l,
                        None => return None,
                    },
                    Ordering::Equal => {
                        key_node_idx = self.path.len() - 1;
                        key_node = Some(cur);
                        prev_key_node = Some(self.path[key_node_idx - 1]);
                        match (*cur).left {
                            Some(l) => cur = l,
                            None => break,
                        }
                        loop {
                            self.path.push(cur);
                            match (*cur).right {
                                Some(r) => cur = r,
                                None => break,
                            }
                        }
                        break;
                    }
                }
            }
            let key_node = key_node?;
            let prev_key_node = prev_key_node.unwrap();

            self.len -= 1;
            let mut last_idx = self.path.len() - 1;
            let prev_leaf = self.path[last_idx - 1];
            let leaf = self.path[last_idx];
            last_idx -= 1;

            let hole = search::replace_with_leaf(prev_key_node, key_node, prev_leaf, leaf, self.root);
            let (_, val) = Node::dealloc(key_node);
            if !hole {
                return Some(val);
            }
            self.path[key_node_idx] = leaf;

            let mut cur = self.path[last_idx];
            last_idx -= 1;
            let mut prev = self.path[last_idx];
            let mut hole_side_left = (*cur).left.is_none();
            let mut hole = true;
            while hole {
                let other1 = if hole_side_left {
                    let mut o = (*cur).right.expect("lower2: cur.right missing");
                    if (*cur).high_right {
                        o = (*o).left.expect("lower2: r.left missing");
                    }
                    o
                } else {
                    (*cur).left.expect("lower2: cur.left missing")
                };
                let other2 = if (*other1).high_right {
                    (*other1).right
                } else {
                    None
                };
                hole_side_left = (*prev).left == Some(cur);
                hole = lower2::lower(prev, cur, other1, other2);
                if last_idx == 0 {
                    break;
                }
                last_idx -= 1;
                cur = prev;
                prev = self.path[last_idx];
            }
            Some(val)
        }
    }
}

impl<K, V> Drop for D2Map<K, V> {
    fn drop(&mut self) {
        unsafe {
            drop_subtree(Some(self.root));
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for D2Map<K, V> {
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
        let t: D2Map<i32, &str> = D2Map::new(0, "sentinel");
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert!(!t.contains(&5));
        assert_eq!(t.get(&5), Err(LexiError::KeyNotFound));
    }

    #[test]
    fn single_insert_and_lookup() {
        let mut t = D2Map::new(0, "sentinel");
        t.set(10, "ten");
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&10), Ok(&"ten"));
        t.check();
    }

    #[test]
    fn overwrite_does_not_grow_len() {
        let mut t = D2Map::new(0, "sentinel");
        t.set(1, "a");
        t.set(1, "b");
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&1), Ok(&"b"));
    }

    #[test]
    fn sequential_ascending_insert_stays_balanced() {
        let mut t = D2Map::new(0, "");
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
    fn sequential_descending_insert_stays_balanced() {
        let mut t = D2Map::new(0, "");
        for i in (0..200).rev() {
            t.set(i, i);
        }
        t.check();
    }

    #[test]
    fn remove_every_key_in_ascending_order() {
        let mut t = D2Map::new(0, "");
        for i in 0..150 {
            t.set(i, i * 10);
        }
        for i in 0..150 {
            assert_eq!(t.remove(&i), Ok(i * 10));
            t.check();
        }
        assert!(t.is_empty());
    }

    #[test]
    fn remove_every_key_in_descending_order() {
        let mut t = D2Map::new(0, "");
        for i in 0..150 {
            t.set(i, i);
        }
        for i in (0..150).rev() {
            assert_eq!(t.remove(&i), Ok(i));
            t.check();
        }
        assert!(t.is_empty());
    }

    #[test]
    fn remove_missing_key_reports_not_found() {
        let mut t = D2Map::new(0, "");
        t.set(1, "a");
        assert_eq!(t.remove(&99), Err(LexiError::KeyNotFound));
        assert_eq!(t.remove_or(&99, "fallback"), "fallback");
    }

    #[test]
    fn interleaved_insert_and_remove() {
        let mut t = D2Map::new(0, "");
        for i in 0..64 {
            t.set(i, i);
        }
        for i in (0..64).step_by(2) {
            t.remove(&i).unwrap();
        }
        t.check();
        for i in 0..64 {
            if i % 2 == 0 {
                assert!(!t.contains(&i));
            } else {
                assert!(t.contains(&i));
            }
        }
        for i in (0..64).step_by(2) {
            t.set(i, i * 100);
        }
        t.check();
        assert_eq!(t.len(), 64);
    }

    #[test]
    fn graph_reports_every_node_once() {
        let mut t = D2Map::new(0, "");
        for i in 0..20 {
            t.set(i, i);
        }
        let (nodes, edges) = t.graph();
        assert_eq!(nodes.len(), 20);
        assert_eq!(edges.len(), 19);
    }
}
