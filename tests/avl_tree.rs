use draw3d_optimizer::AvlTree;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

fn shuffled(n: i32, seed: u64) -> Vec<i32> {
    let mut values: Vec<i32> = (0..n).collect();
    values.shuffle(&mut StdRng::seed_from_u64(seed));
    values
}

#[test]
fn shuffled_inserts_come_out_sorted() {
    for seed in 0..10 {
        let values = shuffled(100, seed);
        let mut tree = AvlTree::new();
        for &v in &values {
            assert!(tree.insert(v));
        }
        assert!(tree.is_balanced());
        assert_eq!(tree.len(), 100);
        assert_eq!(tree.to_vec(), (0..100).collect::<Vec<_>>());
    }
}

#[test]
fn removing_in_insertion_order_keeps_sorted_remainder() {
    let mut remaining = shuffled(100, 7);
    let mut tree = AvlTree::new();
    tree.extend(remaining.iter().copied());

    while !remaining.is_empty() {
        let victim = remaining.remove(0);
        assert!(tree.remove(&victim), "missing {}", victim);
        assert!(tree.is_balanced());

        let mut expected = remaining.clone();
        expected.sort();
        assert_eq!(tree.to_vec(), expected);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn distinct_instances_comparing_equal_are_all_kept() {
    #[derive(Debug, Clone)]
    struct Item {
        weight: u32,
        name: &'static str,
    }

    let mut tree = AvlTree::with_comparator(|a: &Item, b: &Item| a.weight.cmp(&b.weight));
    for (weight, name) in [(2, "b"), (1, "a"), (2, "c"), (2, "d")] {
        assert!(tree.insert(Item { weight, name }));
    }
    assert_eq!(tree.len(), 4);
    let names: Vec<&str> = tree.iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);

    let probe = Item { weight: 2, name: "?" };
    assert!(tree.remove(&probe));
    assert_eq!(tree.iter().filter(|i| i.weight == 2).count(), 2);
}

#[test]
fn height_is_logarithmic() {
    let tree: AvlTree<i32> = shuffled(10_000, 3).into_iter().collect();
    // AVL bound: h < 1.4405 log2(n + 2)
    assert!(tree.height() <= 19, "height {}", tree.height());
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..40).prop_map(Op::Insert),
        (0u8..40).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_matches_sorted_reference(ops in prop::collection::vec(op(), 0..200)) {
        let mut tree = AvlTree::new();
        let mut reference: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    prop_assert!(tree.insert(v));
                    let at = reference.partition_point(|x| *x <= v);
                    reference.insert(at, v);
                }
                Op::Remove(v) => {
                    let expected = match reference.iter().position(|x| *x == v) {
                        Some(at) => {
                            reference.remove(at);
                            true
                        }
                        None => false,
                    };
                    prop_assert_eq!(tree.remove(&v), expected);
                }
            }
            prop_assert!(tree.is_balanced());
            prop_assert_eq!(tree.len(), reference.len());
            prop_assert_eq!(tree.to_vec(), reference.clone());
        }
    }

    #[test]
    fn prop_remove_all_in_any_order_empties(values in prop::collection::vec(any::<i16>(), 0..100), seed in any::<u64>()) {
        let mut tree: AvlTree<i16> = values.iter().copied().collect();
        let mut order = values.clone();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        for v in &order {
            prop_assert!(tree.remove(v));
            prop_assert!(tree.is_balanced());
        }
        prop_assert!(tree.is_empty());
    }

    #[test]
    fn prop_iteration_is_restartable(values in prop::collection::vec(any::<i32>(), 0..50)) {
        let tree: AvlTree<i32> = values.into_iter().collect();
        let first: Vec<i32> = tree.iter().copied().collect();
        let second: Vec<i32> = tree.iter().copied().collect();
        prop_assert_eq!(first, second);
    }
}
