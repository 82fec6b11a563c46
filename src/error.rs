//! Errors reported by the trees in this crate.

use thiserror::Error;

/// Why an operation on a tree failed. A failed operation never modifies the tree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The tree already holds as many items as its capacity allows.
    #[error("tree is full ({capacity} items)")]
    CapacityExceeded {
        /// The capacity the tree was built with.
        capacity: usize,
    },

    /// An item comparing equal to the inserted one is already stored.
    #[error("attempted to add duplicate item")]
    DuplicateItem,

    /// No stored item compares equal to the requested one.
    #[error("item not found")]
    ItemNotFound,

    /// Storage for a new node could not be obtained.
    #[error("couldn't allocate tree node")]
    AllocationFailure,

    /// A group in a [`GroupedTree`](crate::grouped::GroupedTree) already holds as many entries
    /// as it allows.
    #[error("group is full ({capacity} entries)")]
    GroupFull {
        /// The per-group entry capacity.
        capacity: usize,
    },
}
