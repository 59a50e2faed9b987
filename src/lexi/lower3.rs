/*! The lower-3 primitive (D3 removal)

# About
Same role as [`crate::lexi::lower2`], generalized to level-lists up to
length three on the "other" side, and always given the next node `cur2`
below `cur1` on the removal's key path (so a lowering never needs a second
pass to find it). Ported field-for-field from `original_source/lower3.py`;
see that file's ASCII diagrams for the full geometry of each case.
*/

use crate::lexi::node::Node;

/// Lowers `cur1` towards `cur2`, given the sibling fragment on the other
/// side (`other1`, and `other2`/`other3` if present). Returns the new
/// `(prev_c1, prev_c2)` pair the caller should continue from — unlike
/// [`crate::lexi::lower2::lower`], this never reports a hole: D3's looser
/// bound guarantees one step always finishes the job locally.
///
/// # Safety
/// `cur1.left == cur2` or (`cur1.right == cur2` and `!cur1.high_right`) must
/// hold, and the `other*` chain must match the shape `lower3.py` assumes
/// (each `otherN` is `other(N-1).right` with `other(N-1).high_right` set).
pub(crate) unsafe fn lower<K, V>(
    prev: *mut Node<K, V>,
    cur1: *mut Node<K, V>,
    cur2: *mut Node<K, V>,
    other1: *mut Node<K, V>,
    other2: Option<*mut Node<K, V>>,
    other3: Option<*mut Node<K, V>>,
    prev_is_root: bool,
) -> (*mut Node<K, V>, *mut Node<K, V>) {
    unsafe {
        debug_assert!(
            (*cur1).left == Some(cur2) || ((*cur1).right == Some(cur2) && !(*cur1).high_right)
        );

        if other2.is_none() {
            debug_assert!(other3.is_none());
            // Case Left1 / Right1 / RightHi1: the "other" side is a single node.
            let c1_left = (*cur1).left.expect("lower3: cur1.left must be present");
            let (prev_c1, prev_c2);
            if (*cur1).high_right {
                // RightHi1
                let r = (*cur1).right.expect("RightHi1 requires cur1.right");
                debug_assert_eq!(c1_left, cur2);
                (*r).left = Some(cur2);
                if (*prev).right == Some(cur1) {
                    (*prev).right = Some(r); // keeps same high_right
                } else {
                    (*prev).left = Some(r);
                }
                (*cur1).right = Some(other1);
                prev_c2 = r;
            } else {
                // Left1 or Right1
                debug_assert!((*prev).right == Some(cur1) && ((*prev).high_right || prev_is_root));
                (*prev).right = Some(c1_left);
                (*prev).high_right = false;
                prev_c2 = if (*cur1).right == Some(cur2) { cur1 } else { prev };
            }
            (*cur1).left = (*c1_left).right;
            (*cur1).high_right = true;
            (*c1_left).right = Some(cur1);
            (*c1_left).high_right = true;
            prev_c1 = c1_left;
            (prev_c1, prev_c2)
        } else {
            let other2 = other2.unwrap();
            if (*cur1).left == Some(other1) {
                // Case Left3 / Left2
                let last_other = other3.unwrap_or(other2);
                if (*prev).right == Some(cur1) {
                    (*prev).right = Some(other2); // keeps same high_right
                } else {
                    (*prev).left = Some(other2);
                }
                (*other1).right = (*other2).left;
                (*other1).high_right = false;
                (*other2).left = Some(other1);
                (*other2).high_right = false;
                (*cur1).left = (*last_other).right;
                (*cur1).high_right = true;
                (*last_other).right = Some(cur1);
                (*last_other).high_right = other3 == Some(last_other);
                (last_other, cur1)
            } else {
                debug_assert_eq!((*cur1).left, Some(cur2));
                // Case Right3 / Right2
                let (before_lifted, lifted) = if other3.is_some() {
                    (other1, other2)
                } else {
                    (cur1, other1)
                };
                if (*cur1).high_right {
                    let r = (*cur1).right.expect("Right3/Right2 requires cur1.right");
                    (*r).left = (*lifted).right;
                    (*lifted).right = Some(r);
                    (*cur1).right = Some(before_lifted); // needed if other3 present
                }
                (*before_lifted).right = (*lifted).left;
                (*lifted).left = Some(cur2);
                (*lifted).high_right = (*cur1).high_right;
                (*before_lifted).high_right = false;
                if (*prev).right == Some(cur1) {
                    (*prev).right = Some(lifted); // keeps same high_right
                } else {
                    (*prev).left = Some(lifted);
                }
                (*cur1).left = (*cur2).right;
                (*cur1).high_right = before_lifted != cur1;
                (*cur2).right = Some(cur1);
                (*cur2).high_right = true;
                (cur2, lifted)
            }
        }
    }
}
