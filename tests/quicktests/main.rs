//! Property tests exercising the trees through their public API.

mod ordered_tree;

use std::sync::Once;

use quickcheck::{Arbitrary, Gen};
use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Installs a global tracing subscriber once. Set `RUST_LOG=trace` to see every tree operation.
pub(crate) fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init()
            .unwrap_or_else(|e| eprintln!("Error: Failed to set up logging: {}", e));
    });
}

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<T> {
    /// Insert the T into the data structure
    Insert(T),
    /// Remove the T from the data structure
    Remove(T),
    /// Empty the data structure
    Clear,
    /// Compare iterators
    Iter,
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 0, 1, 1, 2, 3, 3]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            2 if bool::arbitrary(g) => Op::Clear,
            2 | 3 => Op::Iter,
            _ => unreachable!(),
        }
    }
}
