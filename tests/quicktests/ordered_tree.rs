use ordered_tree::{OrderedTree, TreeError};

use std::collections::BTreeSet;

use crate::{init_test_setup, Op};

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same items in both, and that every
/// operation succeeded or failed exactly when the set says it should.
fn do_ops(ops: &[Op<i8>], tree: &mut OrderedTree<i8>, set: &mut BTreeSet<i8>) -> bool {
    for op in ops {
        let agrees = match op {
            Op::Insert(x) => {
                let expected = if set.len() == tree.capacity() {
                    Err(TreeError::CapacityExceeded {
                        capacity: tree.capacity(),
                    })
                } else if set.insert(*x) {
                    Ok(())
                } else {
                    Err(TreeError::DuplicateItem)
                };
                tree.insert(*x) == expected
            }
            Op::Remove(x) => {
                let expected = set.take(x).ok_or(TreeError::ItemNotFound);
                tree.delete(x) == expected
            }
            Op::Clear => {
                tree.clear();
                set.clear();
                tree.is_empty()
            }
            Op::Iter => tree.iter().eq(set.iter()),
        };
        if !agrees || tree.len() != set.len() {
            return false;
        }
    }

    true
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        init_test_setup();
        let mut tree = OrderedTree::with_capacity(256);
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set) && tree.iter().eq(set.iter())
    }

    fn fuzz_multiple_operations_small_capacity(ops: Vec<Op<i8>>) -> bool {
        init_test_setup();
        let mut tree = OrderedTree::with_capacity(5);
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set) && tree.len() <= 5
    }

    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = OrderedTree::with_capacity(256);
        for x in &xs {
            let _ = tree.insert(*x);
        }

        xs.iter().all(|x| tree.find(x) == Some(x))
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = OrderedTree::with_capacity(256);
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let added: BTreeSet<_> = xs.into_iter().collect();
        let nots: BTreeSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(x))
    }

    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = OrderedTree::with_capacity(256);
        for x in &xs {
            let _ = tree.insert(*x);
        }
        for delete in &deletes {
            let _ = tree.delete(delete);
        }

        let mut still_present = xs;
        still_present.retain(|x| !deletes.contains(x));

        deletes.iter().all(|x| !tree.contains(x))
            && deletes.iter().all(|x| tree.delete(x) == Err(TreeError::ItemNotFound))
            && still_present.iter().all(|x| tree.contains(x))
    }

    fn len_matches_traversal(xs: Vec<i8>) -> bool {
        let mut tree = OrderedTree::with_capacity(256);
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let mut visited = 0;
        tree.traverse(|_| visited += 1);

        visited == tree.len() && tree.iter().len() == tree.len()
    }

    fn clear_always_empties(xs: Vec<i8>) -> bool {
        let mut tree = OrderedTree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        tree.clear();

        tree.is_empty() && tree.len() == 0 && tree.iter().next().is_none()
    }
}
