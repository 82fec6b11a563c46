//! This crate exposes a bounded Binary Search Tree (BST) that rejects duplicate items, plus a
//! tree of bounded groups built on top of it.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). The trees here do no rebalancing, so inserting
//! items in sorted order gives a height of `N`. BSTs also naturally support sorted iteration by
//! visiting the left subtree, then the subtree root, then the right subtree.
//!
//! ## Capacity
//!
//! Every tree is built with a fixed capacity. Inserting into a full tree fails with
//! [`TreeError::CapacityExceeded`] and, like every failed operation, leaves the tree untouched.
//!
//! ## Logging
//!
//! Operations emit [`tracing`] events: `trace` for successful changes, `debug` for rejected
//! operations and `error` for allocation failures. Install a subscriber to see them.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod grouped;
pub mod tree;


pub use error::TreeError;
pub use grouped::GroupedTree;
pub use tree::OrderedTree;
