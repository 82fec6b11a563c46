//! A capacity-bounded BST that rejects duplicates. The tree is not self-balancing, so inserting
//! items in sorted order degrades it into a list.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::tree::OrderedTree;
//! use ordered_tree::TreeError;
//!
//! let mut tree = OrderedTree::with_capacity(3);
//!
//! // Nothing in here yet.
//! assert!(tree.is_empty());
//! assert!(!tree.contains(&1));
//!
//! tree.insert(2).unwrap();
//! tree.insert(1).unwrap();
//! assert!(tree.contains(&1));
//!
//! // Equal items are rejected instead of overwritten.
//! assert_eq!(tree.insert(1), Err(TreeError::DuplicateItem));
//!
//! tree.insert(3).unwrap();
//! assert!(tree.is_full());
//! assert_eq!(tree.insert(4), Err(TreeError::CapacityExceeded { capacity: 3 }));
//!
//! // Iteration is always in ascending order.
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//!
//! // Deleting an item hands it back.
//! assert_eq!(tree.delete(&2), Ok(2));
//! assert_eq!(tree.delete(&2), Err(TreeError::ItemNotFound));
//! assert_eq!(tree.len(), 2);
//! ```

use std::alloc::{self, Layout};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr::NonNull;

use tracing::{debug, error, trace};

use crate::error::TreeError;

/// How many items a tree built with [`OrderedTree::new`] can hold.
pub const DEFAULT_CAPACITY: usize = 20;

type Link<T> = Option<Box<Node<T>>>;

/// A Binary Search Tree holding at most `capacity` items, none of which compare equal. Items are
/// ordered by their [`Ord`] implementation, so a payload with several fields breaks ties on the
/// primary field with the ones declared after it.
pub struct OrderedTree<T> {
    root: Link<T>,
    len: usize,
    capacity: usize,
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OrderedTree<T> {
    fn drop(&mut self) {
        self.release_nodes();
    }
}

impl<T> Clone for OrderedTree<T>
where
    T: Clone,
{
    /// Copies the nodes with an explicit work stack so a degenerate tree can't overflow the
    /// stack. The copy has the same shape as `self`.
    fn clone(&self) -> Self {
        let mut root = None;
        let mut pending = Vec::new();
        if let Some(source) = self.root.as_deref() {
            pending.push((source, &mut root));
        }
        while let Some((source, slot)) = pending.pop() {
            let Node { left, right, .. } = &mut **slot.insert(Box::new(Node {
                item: source.item.clone(),
                left: None,
                right: None,
            }));
            if let Some(source_left) = source.left.as_deref() {
                pending.push((source_left, left));
            }
            if let Some(source_right) = source.right.as_deref() {
                pending.push((source_right, right));
            }
        }

        Self {
            root,
            len: self.len,
            capacity: self.capacity,
        }
    }
}

impl<T> fmt::Debug for OrderedTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a OrderedTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> OrderedTree<T> {
    /// Generate a new, empty `OrderedTree` holding up to [`DEFAULT_CAPACITY`] items.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Generate a new, empty `OrderedTree` holding up to `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: None,
            len: 0,
            capacity,
        }
    }

    /// Returns `true` if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if the tree holds as many items as its capacity allows.
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// The number of items in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The maximum number of items the tree can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts `item` into the tree. The tree is left untouched if it is full, if it already
    /// holds an item comparing equal to `item`, or if no storage could be allocated for the new
    /// node. A full tree is reported even when `item` is a duplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::tree::OrderedTree;
    /// use ordered_tree::TreeError;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert_eq!(tree.insert("kitty"), Ok(()));
    /// assert_eq!(tree.insert("kitty"), Err(TreeError::DuplicateItem));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, item: T) -> Result<(), TreeError>
    where
        T: Ord,
    {
        if self.is_full() {
            debug!(capacity = self.capacity, "tree is full");
            return Err(TreeError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let slot = seek_slot(&mut self.root, &item);
        if slot.is_some() {
            debug!("attempted to add duplicate item");
            return Err(TreeError::DuplicateItem);
        }

        *slot = Some(Node::try_new_boxed(item)?);
        self.len += 1;
        trace!(len = self.len, "inserted item");
        Ok(())
    }

    /// Returns `true` if the tree holds an item comparing equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Potentially finds the stored item comparing equal to `key`. This is how to read fields of
    /// the stored item that don't take part in the ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(String::from("walrus")).unwrap();
    ///
    /// assert_eq!(tree.find("walrus").map(String::as_str), Some("walrus"));
    /// assert_eq!(tree.find("narwhal"), None);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.item.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Equal => return Some(&node.item),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    /// Mutable access to the stored item comparing equal to `key`. Callers must not change the
    /// parts of the item that decide its ordering.
    pub(crate) fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        seek_slot(&mut self.root, key)
            .as_deref_mut()
            .map(|node| &mut node.item)
    }

    /// Deletes the item comparing equal to `key` from the tree and returns it.
    ///
    /// A node with two children is replaced by its left subtree, with its right subtree hung off
    /// the rightmost node of that left subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::tree::OrderedTree;
    /// use ordered_tree::TreeError;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.delete(&1), Ok(1));
    /// assert_eq!(tree.delete(&1), Err(TreeError::ItemNotFound));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<T, TreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = seek_slot(&mut self.root, key);
        let Some(node) = slot.take() else {
            debug!("item not found");
            return Err(TreeError::ItemNotFound);
        };

        let Node { item, left, right } = *node;
        *slot = splice(left, right);
        self.len -= 1;
        trace!(len = self.len, "deleted item");
        Ok(item)
    }

    /// Calls `visitor` on every item, in ascending order.
    pub fn traverse<F>(&self, visitor: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(visitor);
    }

    /// Returns an iterator over the items in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Deletes every item, leaving an empty tree with the same capacity.
    pub fn clear(&mut self) {
        let released = self.release_nodes();
        trace!(released, "cleared tree");
    }

    /// Frees every node without recursing, so a degenerate tree can't overflow the stack. Each
    /// node's children are detached before the node itself is dropped.
    fn release_nodes(&mut self) -> usize {
        let released = self.len;
        let mut pending: Vec<Box<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.len = 0;
        released
    }
}

/// Descends from `slot` towards `key` and returns the slot holding the equal item, or the empty
/// slot where it would be attached.
fn seek_slot<'a, T, Q>(mut slot: &'a mut Link<T>, key: &Q) -> &'a mut Link<T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    loop {
        let ordering = slot.as_deref().map(|node| key.cmp(node.item.borrow()));
        slot = match (ordering, slot) {
            (Some(Ordering::Less), Some(node)) => &mut node.left,
            (Some(Ordering::Greater), Some(node)) => &mut node.right,
            (_, found) => return found,
        };
    }
}

/// Joins the two subtrees of a removed node into the single subtree that takes its place.
fn splice<T>(left: Link<T>, right: Link<T>) -> Link<T> {
    match (left, right) {
        (None, only) | (only, None) => only,
        (Some(mut left), Some(right)) => {
            // The rightmost node of `left` is the removed item's predecessor, so everything in
            // `right` orders after it.
            let mut slot = &mut left.right;
            while let Some(node) = slot {
                slot = &mut node.right;
            }
            *slot = Some(right);
            Some(left)
        }
    }
}

struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    /// Allocates a leaf holding `item`, reporting allocation failure instead of aborting.
    fn try_new_boxed(item: T) -> Result<Box<Self>, TreeError> {
        let layout = Layout::new::<Self>();
        // SAFETY: A `Node` always holds two links, so `layout` is never zero-sized.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(ptr) = NonNull::new(ptr) else {
            error!(size = layout.size(), "couldn't allocate tree node");
            return Err(TreeError::AllocationFailure);
        };

        // SAFETY: `ptr` was just allocated by the global allocator with the layout of `Self`, so
        // it is aligned and valid for writes. `Box` frees it later with that same layout.
        unsafe {
            ptr.as_ptr().write(Node {
                item,
                left: None,
                right: None,
            });
            Ok(Box::from_raw(ptr.as_ptr()))
        }
    }
}

/// An in-order iterator over the items of an [`OrderedTree`]. Created by [`OrderedTree::iter`].
pub struct Iter<'a, T> {
    /// Nodes whose item and right subtree are still to be visited. The next item is on top.
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
