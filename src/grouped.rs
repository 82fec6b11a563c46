//! A tree of groups. Entries are filed under a key; every key owns one node of an
//! [`OrderedTree`] and that node holds a bounded, insertion-ordered list of the key's entries.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::grouped::GroupedTree;
//! use ordered_tree::TreeError;
//!
//! let mut pets = GroupedTree::with_capacity(10, 2);
//!
//! pets.insert("rover", "dog").unwrap();
//! pets.insert("rover", "cat").unwrap();
//! pets.insert("biscuit", "hamster").unwrap();
//!
//! assert_eq!(pets.get(&"rover"), Some(&["dog", "cat"][..]));
//! assert_eq!(pets.group_count(), 2);
//! assert_eq!(pets.item_count(), 3);
//!
//! assert_eq!(pets.insert("rover", "dog"), Err(TreeError::DuplicateItem));
//! assert_eq!(pets.insert("rover", "parrot"), Err(TreeError::GroupFull { capacity: 2 }));
//!
//! // Removing the last entry of a group removes the group.
//! assert_eq!(pets.delete(&"biscuit", &"hamster"), Ok("hamster"));
//! assert_eq!(pets.get(&"biscuit"), None);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, error, trace};

use crate::error::TreeError;
use crate::tree::{self, OrderedTree};

/// How many groups a tree built with [`GroupedTree::new`] can hold.
pub const DEFAULT_GROUP_CAPACITY: usize = 10;

/// How many entries each group of a tree built with [`GroupedTree::new`] can hold.
pub const DEFAULT_ENTRY_CAPACITY: usize = 20;

/// A key and the entries filed under it. Groups compare by key alone.
#[derive(Clone)]
struct Group<K, V> {
    key: K,
    entries: Vec<V>,
}

impl<K: Ord, V> PartialEq for Group<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for Group<K, V> {}

impl<K: Ord, V> PartialOrd for Group<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for Group<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for Group<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

/// A bounded collection of entries grouped by key. At most `group_capacity` distinct keys are
/// stored and each key holds at most `entry_capacity` distinct entries.
#[derive(Clone)]
pub struct GroupedTree<K, V> {
    groups: OrderedTree<Group<K, V>>,
    entry_capacity: usize,
    item_count: usize,
}

impl<K, V> Default for GroupedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for GroupedTree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> GroupedTree<K, V> {
    /// Generate a new, empty `GroupedTree` with [`DEFAULT_GROUP_CAPACITY`] groups of
    /// [`DEFAULT_ENTRY_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_GROUP_CAPACITY, DEFAULT_ENTRY_CAPACITY)
    }

    /// Generate a new, empty `GroupedTree` holding up to `group_capacity` keys with up to
    /// `entry_capacity` entries each.
    pub fn with_capacity(group_capacity: usize, entry_capacity: usize) -> Self {
        Self {
            groups: OrderedTree::with_capacity(group_capacity),
            entry_capacity,
            item_count: 0,
        }
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `true` if no further keys can be added. Existing groups may still have room.
    pub fn is_full(&self) -> bool {
        self.groups.is_full()
    }

    /// The number of distinct keys.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The number of entries across all groups.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// The maximum number of distinct keys.
    pub fn group_capacity(&self) -> usize {
        self.groups.capacity()
    }

    /// The maximum number of entries per key.
    pub fn entry_capacity(&self) -> usize {
        self.entry_capacity
    }

    /// Files `entry` under `key`, creating the key's group if it has none yet.
    ///
    /// Fails without changing anything if the group already holds an equal entry, if the group
    /// is full, or if a new group is needed and the tree is full. A new key on a full tree is
    /// reported as [`TreeError::CapacityExceeded`] even when groups can't hold any entries.
    pub fn insert(&mut self, key: K, entry: V) -> Result<(), TreeError>
    where
        K: Ord,
        V: PartialEq,
    {
        if let Some(group) = self.groups.find_mut(&key) {
            if group.entries.contains(&entry) {
                debug!("attempted to add duplicate entry");
                return Err(TreeError::DuplicateItem);
            }
            if group.entries.len() >= self.entry_capacity {
                debug!(capacity = self.entry_capacity, "group is full");
                return Err(TreeError::GroupFull {
                    capacity: self.entry_capacity,
                });
            }
            group.entries.try_reserve(1).map_err(|_| {
                error!("couldn't grow group");
                TreeError::AllocationFailure
            })?;
            group.entries.push(entry);
        } else {
            if self.groups.is_full() {
                debug!(capacity = self.groups.capacity(), "tree is full");
                return Err(TreeError::CapacityExceeded {
                    capacity: self.groups.capacity(),
                });
            }
            if self.entry_capacity == 0 {
                debug!("group is full");
                return Err(TreeError::GroupFull { capacity: 0 });
            }
            let mut entries = Vec::new();
            entries.try_reserve(1).map_err(|_| {
                error!("couldn't allocate group");
                TreeError::AllocationFailure
            })?;
            entries.push(entry);
            self.groups.insert(Group { key, entries })?;
        }

        self.item_count += 1;
        trace!(items = self.item_count, "inserted entry");
        Ok(())
    }

    /// The entries filed under `key`, in insertion order.
    pub fn get(&self, key: &K) -> Option<&[V]>
    where
        K: Ord,
    {
        self.groups.find(key).map(|group| group.entries.as_slice())
    }

    /// Returns `true` if `entry` is filed under `key`.
    pub fn contains(&self, key: &K, entry: &V) -> bool
    where
        K: Ord,
        V: PartialEq,
    {
        self.get(key).is_some_and(|entries| entries.contains(entry))
    }

    /// Removes `entry` from the group of `key` and returns it. A group left without entries is
    /// removed from the tree.
    pub fn delete(&mut self, key: &K, entry: &V) -> Result<V, TreeError>
    where
        K: Ord,
        V: PartialEq,
    {
        let Some(group) = self.groups.find_mut(key) else {
            debug!("group not found");
            return Err(TreeError::ItemNotFound);
        };
        let Some(position) = group.entries.iter().position(|e| e == entry) else {
            debug!("entry not found");
            return Err(TreeError::ItemNotFound);
        };

        let removed = group.entries.remove(position);
        if group.entries.is_empty() {
            self.groups.delete(key)?;
        }
        self.item_count -= 1;
        trace!(items = self.item_count, "deleted entry");
        Ok(removed)
    }

    /// Removes the whole group of `key` and returns its entries.
    pub fn delete_group(&mut self, key: &K) -> Result<Vec<V>, TreeError>
    where
        K: Ord,
    {
        let group = self.groups.delete(key)?;
        self.item_count -= group.entries.len();
        trace!(items = self.item_count, "deleted group");
        Ok(group.entries)
    }

    /// Calls `visitor` on every key and its entries, in ascending key order.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &[V]),
    {
        self.iter().for_each(|(key, entries)| visitor(key, entries));
    }

    /// Returns an iterator over the keys and their entries in ascending key order.
    pub fn iter(&self) -> Groups<'_, K, V> {
        Groups {
            inner: self.groups.iter(),
        }
    }

    /// Deletes every group.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.item_count = 0;
    }
}

impl<'a, K, V> IntoIterator for &'a GroupedTree<K, V> {
    type Item = (&'a K, &'a [V]);
    type IntoIter = Groups<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the groups of a [`GroupedTree`]. Created by [`GroupedTree::iter`].
pub struct Groups<'a, K, V> {
    inner: tree::Iter<'a, Group<K, V>>,
}

impl<K, V> Clone for Groups<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Groups<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|group| (&group.key, group.entries.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Groups<'_, K, V> {}

impl<K, V> FusedIterator for Groups<'_, K, V> {}
