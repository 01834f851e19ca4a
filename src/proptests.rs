use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    Check(String),
}

fn word_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet in both cases so collisions and case-only duplicates
    // are common.
    "[a-dA-D_]{1,6}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let word = word_strategy();
    let op = prop_oneof![
        60 => word.clone().prop_map(Op::Insert),
        40 => word.prop_map(Op::Check),
    ];
    prop::collection::vec(op, 0..=1500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_tree_matches_set(ops in ops_strategy()) {
        let mut t = RbTree::new();
        let mut m: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(word) => {
                    let inserted = t.insert(&word).1;
                    prop_assert_eq!(inserted, m.insert(word.to_ascii_lowercase()));
                }
                Op::Check(word) => {
                    prop_assert_eq!(t.contains(&word), m.contains(&word.to_ascii_lowercase()));
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        t.validate();
        let got: Vec<String> = t.iter().map(|w| w.to_ascii_lowercase()).collect();
        let expected: Vec<String> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_after_every_insert(words in prop::collection::vec(word_strategy(), 0..=200)) {
        let mut t = RbTree::new();
        for w in &words {
            let (id, _) = t.insert(w);
            t.validate();
            prop_assert_eq!(Some(t.current_root(id)), t.root());
        }
    }

    #[test]
    fn prop_strmap_matches_set(ops in ops_strategy(), capacity in 1usize..64) {
        let mut s = StrMap::new(capacity).unwrap();
        let mut m: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(word) => {
                    prop_assert_eq!(s.insert(&word), m.insert(word.to_ascii_lowercase()));
                }
                Op::Check(word) => {
                    prop_assert_eq!(s.contains(&word), m.contains(&word.to_ascii_lowercase()));
                }
            }
        }

        prop_assert_eq!(s.len(), m.len());
        for bucket in s.buckets() {
            if let Some(tree) = bucket.tree() {
                tree.validate();
                prop_assert_eq!(tree.len(), bucket.count());
            }
        }
    }

    #[test]
    fn prop_dictionary_checks_any_casing(words in prop::collection::vec("[a-zA-Z']{1,45}", 0..300)) {
        let mut dict = Dictionary::new();
        dict.load(&words).unwrap();

        let distinct: BTreeSet<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();
        prop_assert_eq!(dict.size(), distinct.len());
        for w in &words {
            prop_assert!(dict.check(w));
            prop_assert!(dict.check(&w.to_ascii_uppercase()));
            prop_assert!(dict.check(&w.to_ascii_lowercase()));
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["a", "B", "c", "aa", "Ab", "ba", "d"];

    for_each_permutation(&words, |perm| {
        let mut t = RbTree::new();
        for w in &perm {
            assert!(t.insert(w).1);
            t.validate();
        }
        // Every spelling variant is already present.
        for w in &perm {
            assert!(!t.insert(&w.to_ascii_uppercase()).1);
        }
        assert_eq!(t.len(), words.len());

        let got: Vec<String> = t.iter().map(|w| w.to_ascii_lowercase()).collect();
        assert_eq!(got, ["a", "aa", "ab", "b", "ba", "c", "d"]);
    });
}

#[test]
fn adversarial_orders_bounded_height() {
    let n = 1 << 14;
    let keys: Vec<String> = (0..n).map(|i| format!("{i:08}")).collect();
    let bound = 2 * 15;

    // Strictly increasing, strictly decreasing, and alternating ends.
    let increasing: Vec<&String> = keys.iter().collect();
    let decreasing: Vec<&String> = keys.iter().rev().collect();
    let zig_zag: Vec<&String> = (0..n / 2)
        .flat_map(|i| [&keys[i], &keys[n - 1 - i]])
        .collect();

    for order in [increasing, decreasing, zig_zag] {
        let mut t = RbTree::new();
        for k in order {
            t.insert(k);
        }
        t.validate();
        assert_eq!(t.len(), n);
        assert!(t.height() <= bound, "height {} exceeds {}", t.height(), bound);
    }
}
