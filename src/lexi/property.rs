//! Property-based cross-checks against `std::collections::BTreeMap`, in the
//! spirit of `original_source/test.py`'s `test()` function (which runs every
//! map operation against a plain `dict` oracle). Grounded on
//! `examples/therewillbecode-sqlite-clone`'s `quickcheck` dev-dependency.

use crate::lexi::{D2Map, D3Map, PLMap};
use quickcheck::{quickcheck, TestResult};
use std::collections::BTreeMap;

/// A scripted op: `0` = set, `1` = remove, anything else = get (read-only).
/// Keys are folded into a small range so sets/removes/overwrites actually
/// collide with each other instead of hitting disjoint keys every time.
fn run_ops<F>(ops: &[(u8, i32)], mut apply: F)
where
    F: FnMut(u8, i32),
{
    for &(op, key) in ops {
        apply(op % 3, key.rem_euclid(64));
    }
}

quickcheck! {
    fn d2_matches_btreemap(ops: Vec<(u8, i32)>) -> TestResult {
        let mut oracle: BTreeMap<i32, i32> = BTreeMap::new();
        let mut tree = D2Map::new(i32::MIN, 0);
        run_ops(&ops, |op, key| match op {
            0 => {
                oracle.insert(key, key);
                tree.set(key, key);
            }
            1 => {
                let expect = oracle.remove(&key);
                let got = tree.remove(&key).ok();
                assert_eq!(expect, got, "remove({key}) diverged");
            }
            _ => {
                assert_eq!(oracle.contains_key(&key), tree.contains(&key));
            }
        });
        tree.check();
        let collected: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
        TestResult::from_bool(collected == expected && tree.len() == oracle.len())
    }

    fn d3_matches_btreemap(ops: Vec<(u8, i32)>) -> TestResult {
        let mut oracle: BTreeMap<i32, i32> = BTreeMap::new();
        let mut tree = D3Map::new(i32::MIN, 0);
        run_ops(&ops, |op, key| match op {
            0 => {
                oracle.insert(key, key);
                tree.set(key, key);
            }
            1 => {
                let expect = oracle.remove(&key);
                let got = tree.remove(&key).ok();
                assert_eq!(expect, got, "remove({key}) diverged");
            }
            _ => {
                assert_eq!(oracle.contains_key(&key), tree.contains(&key));
            }
        });
        tree.check();
        let collected: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
        TestResult::from_bool(collected == expected && tree.len() == oracle.len())
    }

    fn plmap_matches_btreemap(ops: Vec<(u8, i32)>) -> TestResult {
        let mut oracle: BTreeMap<i32, i32> = BTreeMap::new();
        let mut tree = PLMap::with_default_p(i32::MIN, 0);
        run_ops(&ops, |op, key| match op {
            0 => {
                oracle.insert(key, key);
                tree.set(key, key);
            }
            1 => {
                let expect = oracle.remove(&key);
                let got = tree.remove(&key).ok();
                assert_eq!(expect, got, "remove({key}) diverged");
            }
            _ => {
                assert_eq!(oracle.contains_key(&key), tree.contains(&key));
            }
        });
        tree.check();
        let collected: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
        TestResult::from_bool(collected == expected && tree.len() == oracle.len())
    }
}
