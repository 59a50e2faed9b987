/*! The lower-2 primitive (D2 removal)

# About
Pushes `cur1` down one level so it becomes a same-level (`high_right`)
sibling of `other1`, propagating the "hole" left by a removal until it
closes. Ported field-for-field from `original_source/lower2.py`; see that
file's ASCII diagrams for the geometry of each case, reproduced here in
condensed form.
*/

use crate::lexi::node::Node;

/// Lowers `cur1`, given its parent `prev` and the sibling fragment on the
/// other side of the hole (`other1`, and `other2` if `other1` itself has a
/// `high_right` continuation). Returns whether a hole remains above `prev`.
///
/// # Safety
/// `prev`, `cur1`, `other1` (and `other2`, if given) must be live nodes in
/// the configuration `lower2.py` assumes: `cur1` is one of `prev`'s two
/// children, `other1` is a child of `cur1` (on the side opposite the hole),
/// and `other2 = other1.right` iff `other1.high_right`.
pub(crate) unsafe fn lower<K, V>(
    prev: *mut Node<K, V>,
    cur1: *mut Node<K, V>,
    other1: *mut Node<K, V>,
    other2: Option<*mut Node<K, V>>,
) -> bool {
    unsafe {
        match other2 {
            None => {
                // One-sibling cases: Left1, RightHi1, Right1.
                let (high_case, first) = if (*cur1).left == Some(other1) {
                    // Left1
                    //                     P! ---.      .------ P!
                    //                             \    /
                    //                     P ----. |  /
                    //                             \| /
                    //                              o1   c1
                    (*cur1).left = (*other1).right;
                    (*other1).right = Some(cur1);
                    (*other1).high_right = true;
                    (false, other1)
                } else if (*cur1).high_right {
                    // RightHi1: cur1 --> r, r.left is other1.
                    let r = (*cur1).right.expect("RightHi1 requires cur1.right");
                    debug_assert_eq!((*r).left, Some(other1));
                    (*r).left = Some(cur1);
                    (*cur1).right = Some(other1);
                    (true, r)
                } else {
                    // Right1
                    (*cur1).high_right = true;
                    (false, cur1)
                };

                if (*prev).left == Some(cur1) {
                    let hole = !high_case;
                    (*prev).left = Some(first);
                    hole
                } else {
                    let hole = !high_case && !(*prev).high_right;
                    (*prev).right = Some(first);
                    (*prev).high_right = (*prev).high_right && high_case;
                    hole
                }
            }
            Some(other2) => {
                // Two-sibling cases: Left2, Right2. Never leave a hole.
                let first = if (*cur1).left == Some(other1) {
                    // Left2
                    (*other1).right = (*other2).left;
                    (*other1).high_right = false;
                    (*cur1).left = (*other2).right;
                    (*other2).left = Some(other1);
                    (*other2).right = Some(cur1);
                    (*other2).high_right = false;
                    other2
                } else {
                    // Right2
                    let r = (*cur1).right;
                    (*cur1).right = (*other1).left;
                    (*cur1).high_right = false;
                    (*other1).left = Some(cur1);
                    if r != Some(other1) {
                        let r = r.expect("Right2: r present but None");
                        (*other1).right = Some(r);
                        (*r).left = Some(other2);
                    } else {
                        (*other1).high_right = false;
                    }
                    other1
                };

                if (*prev).left == Some(cur1) {
                    (*prev).left = Some(first);
                } else {
                    (*prev).right = Some(first);
                }
                false
            }
        }
    }
}
