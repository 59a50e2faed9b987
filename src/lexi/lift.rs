/*! The lift primitive (D2/D3 insertion)

# About
Reduces a length-3 `high_right` level-list by promoting its middle node one
level up. Operates on the local fragment `prev2 -> prev -> cur -> right ->
right2` (the arrows after `prev` are `high_right` edges) and is a pure
function over that fragment: it only reads and writes the five nodes' own
`left`/`right`/`high_right` fields, nothing else in the tree.

Ported field-for-field from `original_source/lift.py`. The two cases are
split into two functions here instead of Python's single `if/else`, since
the dispatch (`prev.right is cur`) is something the caller already knows by
construction (D2's lazy pass and D3's eager pass both know exactly why they
reached this fragment).
*/

use crate::lexi::node::Node;

/// The five pointers the caller needs after a lift, named to match
/// `lift.py`'s return tuple: `(cur_prev, right_prev, right2_prev, prev,
/// cur)`. D3's eager lift during descent uses `cur_prev`/`right2_prev` to
/// decide whether to continue from the old `cur` or skip to the old
/// `right`'s former right child; D2's lazy lift only needs `prev`/`cur` to
/// keep walking up the collected path.
pub(crate) struct Lifted<K, V> {
    pub cur_prev: *mut Node<K, V>,
    pub right_prev: *mut Node<K, V>,
    pub right2_prev: *mut Node<K, V>,
    pub prev: *mut Node<K, V>,
    pub cur: *mut Node<K, V>,
}

/// Case I: `prev.right is cur` (prev and cur are already on the same list,
/// or prev is the sentinel root). `right` rises to take `prev`'s place as
/// list head; `cur` drops below it.
///
/// ```text
/// P            ==>  P --> r
///  \           ==>       / \
///   c  r  r2   ==>      c   r2
///     /        ==>       \
/// ```
///
/// # Safety
/// `prev`, `cur`, `right` must be live nodes with `prev.right == cur`,
/// `cur.right == right` (via `high_right`), and `right.high_right` must be
/// true with `right.right` present (the length-3 list this primitive
/// exists to shorten).
pub(crate) unsafe fn lift_case_1<K, V>(
    prev: *mut Node<K, V>,
    cur: *mut Node<K, V>,
    right: *mut Node<K, V>,
    prev_is_root: bool,
) -> Lifted<K, V> {
    unsafe {
        (*prev).right = Some(right);
        (*prev).high_right = !prev_is_root;
        (*cur).right = (*right).left;
        (*cur).high_right = false;
        (*right).left = Some(cur);
        (*right).high_right = false;
    }
    Lifted {
        cur_prev: right,
        right_prev: prev,
        right2_prev: right,
        prev,
        cur: right,
    }
}

/// Case II: `prev.left is cur` (prev sits directly above cur, off its left
/// child). `right` rises to replace `prev` entirely in its parent's slot,
/// taking `cur` as its new left child and `prev` as its new right child.
///
/// ```text
/// P2 ------------.   P2  ==>  P2 ---.   .-------- P2
///                 \ /    ==>         \ /
/// P2 ------------> P     ==>  P2 ---> r ---> P
///        _________/      ==>         /      /
///       /                ==>        /      /
///      c   r   r2        ==>       c     r2
///     /   /              ==>      / \
/// ```
///
/// `prev2` can be attached to `prev` through either its `left` or its
/// `right` link (both are drawn above); this function checks which and
/// reattaches that slot to `right`, matching `lift.py`'s contract.
///
/// # Safety
/// `prev`, `cur`, `right` must be live nodes with `prev.left == cur`,
/// `cur.right == right` (via `high_right`), and `right.high_right` true
/// with `right.right` present. `prev2` must be live with `prev` reachable
/// from one of its two child links.
pub(crate) unsafe fn lift_case_2<K, V>(
    prev: *mut Node<K, V>,
    prev2: *mut Node<K, V>,
    cur: *mut Node<K, V>,
    right: *mut Node<K, V>,
) -> Lifted<K, V> {
    unsafe {
        if (*prev2).right == Some(prev) {
            (*prev2).right = Some(right); // keeps same high_right
        } else {
            (*prev2).left = Some(right);
        }
        (*prev).left = (*right).right;
        (*cur).right = (*right).left;
        (*cur).high_right = false;
        (*right).left = Some(cur);
        (*right).right = Some(prev);
    }
    Lifted {
        cur_prev: right,
        right_prev: prev2,
        right2_prev: prev,
        prev: right,
        cur: prev,
    }
}

/// Dispatches to [`lift_case_1`] or [`lift_case_2`] based on which side of
/// `prev` holds `cur`, the same test `lift.py`'s single `lift()` function
/// makes up front.
///
/// # Safety
/// Same preconditions as whichever case applies; if Case II applies,
/// `prev2` must be `Some` (Case II never arises with `prev` at the sentinel
/// root, since the root's `left` link is always absent).
pub(crate) unsafe fn lift<K, V>(
    prev2: Option<*mut Node<K, V>>,
    prev: *mut Node<K, V>,
    cur: *mut Node<K, V>,
    right: *mut Node<K, V>,
    prev_is_root: bool,
) -> Lifted<K, V> {
    unsafe {
        if (*prev).right == Some(cur) {
            lift_case_1(prev, cur, right, prev_is_root)
        } else {
            debug_assert_eq!((*prev).left, Some(cur));
            lift_case_2(
                prev,
                prev2.expect("lift Case II requires prev2"),
                cur,
                right,
            )
        }
    }
}
