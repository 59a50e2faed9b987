/*! 3-Lexi Tree: a deterministic ordered map with level-lists of length <= 3

# About
`D3Map` is `D2Map`'s looser sibling: level-lists may run up to three nodes,
which lets insertion lift eagerly *during* descent (`_lift_and_find`) instead
of lazily on the way back up, and lets removal run a lowering pre-pass down
to the leaf *before* splicing anything out. Ported field-for-field from
`original_source/D3LTree.py`.
*/

use crate::lexi::error::LexiError;
use crate::lexi::lift::lift;
use crate::lexi::lower3;
use crate::lexi::node::{drop_subtree, Node};
use crate::lexi::search::{self, InOrder};
use std::cmp::Ordering;
use std::fmt;

const MAX_LEVEL: usize = 40;
const PATH_CAP: usize = 2 * (MAX_LEVEL + 1) + 1;

/// A 3-Lexi Tree ordered map.
pub struct D3Map<K, V> {
    root: *mut Node<K, V>,
    len: usize,
    /// Unused by D3's pointer-chasing drivers directly, but reserved at the
    /// same capacity as `D2Map::path` for symmetry and for any future
    /// path-recording diagnostic (e.g. `graph`'s traversal reuses no
    /// scratch buffer today, but this keeps the two drivers' resource
    /// profile comparable, per spec.md §5's shared sizing formula).
    path: Vec<*mut Node<K, V>>,
}

impl<K, V> D3Map<K, V> {
    pub fn new(any_key: K, any_val: V) -> Self {
        D3Map {
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

    pub(crate) fn validate(&self) -> Result<(), LexiError>
    where
        K: Ord + fmt::Debug,
    {
        let height = self.height();
        unsafe { search::validate_d(self.root_link(), None, None, 0, 3, 1, height) }
            .map_err(LexiError::InvariantViolation)
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
}

impl<K: Ord, V> D3Map<K, V> {
    pub fn contains(&self, key: &K) -> bool {
        unsafe { search::find(self.root_link(), key).is_some() }
    }

    pub fn get(&self, key: &K) -> Result<&V, LexiError> {
        unsafe { search::find(self.root_link(), key) }.ok_or(LexiError::KeyNotFound)
    }

    /// Descends towards `key`, lifting eagerly whenever a length-3
    /// `high_right` list is crossed. Returns `(prev2, prev, key_node,
    /// prev_cmp)`: if `key_node` is `Some`, `prev` is its parent and
    /// `prev2` is meaningless (`None`); otherwise `prev2 -> prev` marks the
    /// insertion point. Ported from `D3LTree._lift_and_find`.
    unsafe fn lift_and_find(
        &self,
        key: &K,
    ) -> (
        Option<*mut Node<K, V>>,
        *mut Node<K, V>,
        Option<*mut Node<K, V>>,
        i8,
    ) {
        unsafe {
            let mut prev2: Option<*mut Node<K, V>> = None;
            let mut prev = self.root;
            let mut prev_cmp: i8 = -1;
            let mut cur = (*prev).right;
            debug_assert!(!(*prev).high_right);

            loop {
                let Some(c) = cur else { break };
                if (*c).high_right {
                    if let Some(right) = (*c).right {
                        if (*right).high_right {
                            if let Some(right2) = (*right).right {
                                let prev_is_root = prev == self.root;
                                let lifted = lift(prev2, prev, c, right, prev_is_root);
                                match key.cmp(&(*right).key) {
                                    Ordering::Less => {
                                        prev = lifted.cur_prev;
                                    }
                                    Ordering::Greater => {
                                        prev = lifted.right2_prev;
                                        cur = Some(right2);
                                    }
                                    Ordering::Equal => {
                                        return (None, lifted.right_prev, Some(right), -1);
                                    }
                                }
                            }
                        }
                    }
                }
                let c = cur.unwrap();
                prev2 = Some(prev);
                prev = c;
                match key.cmp(&(*c).key) {
                    Ordering::Greater => {
                        prev_cmp = -1;
                        cur = (*c).right;
                    }
                    Ordering::Less => {
                        prev_cmp = 1;
                        cur = (*c).left;
                    }
                    Ordering::Equal => {
                        return (None, prev, Some(c), prev_cmp);
                    }
                }
            }
            (prev2, prev, None, prev_cmp)
        }
    }

    /// Insert-or-overwrite. Ported from `D3LTree.__setitem__`.
    pub fn set(&mut self, key: K, val: V) {
        unsafe {
            let (prev2, prev, key_node, prev_cmp) = self.lift_and_find(&key);
            if let Some(kn) = key_node {
                (*kn).val = val;
                return;
            }
            let key_node = Node::alloc(key, val, false, 0);
            self.len += 1;
            match prev2 {
                None => {
                    debug_assert!(prev == self.root && !(*prev).high_right);
                    (*prev).right = Some(key_node);
                }
                Some(prev2) if prev_cmp > 0 => {
                    if (*prev2).right == Some(prev) {
                        (*prev2).right = Some(key_node);
                    } else {
                        (*prev2).left = Some(key_node);
                    }
                    (*key_node).right = Some(prev);
                    (*key_node).high_right = true;
                }
                Some(_) => {
                    (*key_node).right = (*prev).right;
                    (*key_node).high_right = true;
                    (*prev).right = Some(key_node);
                    (*prev).high_right = true;
                }
            }
        }
    }

    /// Walks from the root to the leaf on `key`'s search path, recording
    /// the deepest lowerable ancestor (`lower_me`) along the way. Ported
    /// from `D3LTree._get_lowering_path`.
    unsafe fn get_lowering_path(&self, key: &K) -> Option<LoweringPath<K, V>> {
        unsafe {
            let mut prev = self.root;
            let mut cur = (*prev).right?;
            let mut prev_lower_me = prev;
            let mut lower_me = cur;
            let (mut prev_leaf, mut leaf);
            let mut prev_key_node: Option<*mut Node<K, V>> = None;
            let mut key_node: Option<*mut Node<K, V>> = None;

            loop {
                let cmp = key.cmp(&(*cur).key);
                let (c2, o1) = if cmp == Ordering::Greater {
                    ((*cur).right, (*cur).left)
                } else {
                    if cmp != Ordering::Less {
                        prev_key_node = Some(prev);
                        key_node = Some(cur);
                    }
                    ((*cur).left, (*cur).right)
                };

                let lowerable = ((*prev).right == Some(cur) && (*prev).high_right)
                    || ((*cur).right.is_some() && (*cur).high_right)
                    || o1.is_some_and(|o| (*o).right.is_some() && (*o).high_right);
                if lowerable {
                    prev_lower_me = prev;
                    lower_me = cur;
                }

                match c2 {
                    None => {
                        prev_leaf = prev;
                        leaf = cur;
                        break;
                    }
                    Some(c2) => {
                        prev = cur;
                        cur = c2;
                    }
                }
            }

            Some(LoweringPath {
                prev_leaf,
                leaf,
                prev_lower_me,
                lower_me,
                prev_key_node,
                key_node,
            })
        }
    }

    /// Removes `key`, returning its value, or `LexiError::KeyNotFound`.
    /// Ported from `D3LTree.remove`.
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
            let pd = self.get_lowering_path(key)?;
            let key_node = pd.key_node?;
            let mut prev_key_node = pd
                .prev_key_node
                .expect("prev_key_node present whenever key_node is");
            self.len -= 1;

            let mut p = pd.prev_lower_me;
            let mut c1 = pd.lower_me;
            while c1 != pd.leaf {
                let (c2, o1);
                if c1 == key_node || key < &(*c1).key {
                    let local_c2 = (*c1).left.expect("c1.left missing");
                    let mut local_o1 = (*c1).right.expect("c1.right missing");
                    if (*c1).high_right {
                        local_o1 = (*local_o1).left.expect("c1.right.left missing");
                    }
                    c2 = local_c2;
                    o1 = local_o1;
                } else if (*c1).high_right {
                    p = c1;
                    c1 = (*c1).right.expect("c1.right missing");
                    let local_c2 = (*c1).left.expect("c1.left missing");
                    let mut local_o1 = (*c1).right.expect("c1.right missing");
                    if (*c1).high_right {
                        local_o1 = (*local_o1).left.expect("c1.right.left missing");
                    }
                    c2 = local_c2;
                    o1 = local_o1;
                } else {
                    o1 = (*c1).left.expect("c1.left missing");
                    c2 = (*c1).right.expect("c1.right missing");
                    debug_assert!(!(*c1).high_right);
                }

                let mut o2 = None;
                let mut o3 = None;
                if (*o1).high_right {
                    if let Some(oo2) = (*o1).right {
                        o2 = Some(oo2);
                        if (*oo2).high_right {
                            if let Some(oo3) = (*oo2).right {
                                o3 = Some(oo3);
                            }
                        }
                    }
                }

                let prev_is_root = p == self.root;
                let (prev_c1, prev_c2) = lower3::lower(p, c1, c2, o1, o2, o3, prev_is_root);
                if c1 == key_node {
                    prev_key_node = prev_c1;
                }
                if c2 == key_node {
                    prev_key_node = prev_c2;
                }
                p = prev_c2;
                c1 = c2;
            }
            let prev_leaf = p;

            // `pd.leaf` is fixed; only its fields may have been rewired by
            // the lowering loop above (it can be one of the `other` nodes
            // a `lower3::lower` call touches).
            if (*pd.leaf).right == Some(key_node) {
                debug_assert!(prev_key_node == pd.leaf && (*pd.leaf).high_right);
                (*pd.leaf).right = (*key_node).right;
                let (_, val) = Node::dealloc(key_node);
                return Some(val);
            }

            let _hole =
                search::replace_with_leaf(prev_key_node, key_node, prev_leaf, pd.leaf, self.root);
            let (_, val) = Node::dealloc(key_node);
            Some(val)
        }
    }
}

struct LoweringPath<K, V> {
    prev_leaf: *mut Node<K, V>,
    leaf: *mut Node<K, V>,
    prev_lower_me: *mut Node<K, V>,
    lower_me: *mut Node<K, V>,
    prev_key_node: Option<*mut Node<K, V>>,
    key_node: Option<*mut Node<K, V>>,
}

impl<K, V> Drop for D3Map<K, V> {
    fn drop(&mut self) {
        unsafe {
            drop_subtree(Some(self.root));
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for D3Map<K, V> {
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
        let t: D3Map<i32, &str> = D3Map::new(0, "sentinel");
        assert!(t.is_empty());
        assert_eq!(t.get(&5), Err(LexiError::KeyNotFound));
    }

    #[test]
    fn single_insert_and_lookup() {
        let mut t = D3Map::new(0, "sentinel");
        t.set(10, "ten");
        assert_eq!(t.get(&10), Ok(&"ten"));
        t.check();
    }

    #[test]
    fn overwrite_does_not_grow_len() {
        let mut t = D3Map::new(0, "sentinel");
        t.set(1, "a");
        t.set(1, "b");
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(&1), Ok(&"b"));
    }

    #[test]
    fn sequential_ascending_insert_stays_balanced() {
        let mut t = D3Map::new(0, "");
        for i in 0..300 {
            t.set(i, i);
        }
        assert_eq!(t.len(), 300);
        t.check();
        let collected: Vec<_> = t.iter().map(|(k, _)| *k).collect();
        let expected: Vec<_> = (0..300).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn sequential_descending_insert_stays_balanced() {
        let mut t = D3Map::new(0, "");
        for i in (0..300).rev() {
            t.set(i, i);
        }
        t.check();
    }

    #[test]
    fn remove_every_key_in_ascending_order() {
        let mut t = D3Map::new(0, "");
        for i in 0..180 {
            t.set(i, i * 10);
        }
        for i in 0..180 {
            assert_eq!(t.remove(&i), Ok(i * 10));
            t.check();
        }
        assert!(t.is_empty());
    }

    #[test]
    fn remove_every_key_in_descending_order() {
        let mut t = D3Map::new(0, "");
        for i in 0..180 {
            t.set(i, i);
        }
        for i in (0..180).rev() {
            assert_eq!(t.remove(&i), Ok(i));
            t.check();
        }
        assert!(t.is_empty());
    }

    #[test]
    fn remove_missing_key_reports_not_found() {
        let mut t = D3Map::new(0, "");
        t.set(1, "a");
        assert_eq!(t.remove(&99), Err(LexiError::KeyNotFound));
        assert_eq!(t.remove_or(&99, "fallback"), "fallback");
    }

    #[test]
    fn interleaved_insert_and_remove() {
        let mut t = D3Map::new(0, "");
        for i in 0..96 {
            t.set(i, i);
        }
        for i in (0..96).step_by(3) {
            t.remove(&i).unwrap();
        }
        t.check();
        for i in (0..96).step_by(3) {
            t.set(i, i * 100);
        }
        t.check();
        assert_eq!(t.len(), 96);
    }
}
