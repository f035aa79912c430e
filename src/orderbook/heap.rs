//! Binary heap whose entries know where they are.
//!
//! ## Layout
//!
//! ```text
//! slots: Slab<T>      handle -> entry (entry.position = index in `order`)
//! order: Vec<usize>   heap array of handles, best entry at index 0
//! ```
//!
//! Entries live in a slab arena and never move once inserted; the heap array
//! only shuffles `usize` handles. Every swap rewrites the stored position of
//! both entries involved, so an entry found through its handle can be removed
//! or re-sifted in O(log n) without scanning the array.
//!
//! Handles are slab keys: stable while the entry is in the heap, reusable
//! after it leaves.

use slab::Slab;
use std::fmt;
use std::marker::PhantomData;

/// An entry that stores its own heap position.
pub trait HeapEntry {
    /// Position last written by the heap
    fn position(&self) -> usize;

    /// Called by the heap whenever the entry moves
    fn set_position(&mut self, position: usize);
}

/// Ordering policy: which of two entries belongs closer to the root.
pub trait HeapOrder<T> {
    /// True when `a` must be placed above `b`
    fn better(a: &T, b: &T) -> bool;
}

/// Array-backed binary heap over slab-allocated, self-indexing entries.
pub struct IndexedHeap<T, O> {
    slots: Slab<T>,
    order: Vec<usize>,
    _order: PhantomData<fn() -> O>,
}

impl<T, O> IndexedHeap<T, O>
where
    T: HeapEntry,
    O: HeapOrder<T>,
{
    /// Create an empty heap
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            _order: PhantomData,
        }
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the heap holds no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert an entry and return its handle
    pub fn push(&mut self, entry: T) -> usize {
        let handle = self.slots.insert(entry);
        let position = self.order.len();
        self.order.push(handle);
        self.slots[handle].set_position(position);
        self.sift_up(position);
        debug_assert_eq!(self.order.len(), self.slots.len());
        handle
    }

    /// The best entry, if any
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.order.first().map(|&handle| &self.slots[handle])
    }

    /// Remove and return the best entry
    pub fn pop_root(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    /// Remove the entry at array position `index`.
    ///
    /// The last entry takes its place and is sifted in whichever direction
    /// restores the heap property.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        let len = self.order.len();
        if index >= len {
            return None;
        }

        let last = len - 1;
        if index != last {
            self.swap(index, last);
        }
        let handle = self.order.pop()?;
        let entry = self.slots.remove(handle);

        if index < self.order.len() && !self.sift_up(index) {
            self.sift_down(index);
        }
        debug_assert_eq!(self.order.len(), self.slots.len());
        Some(entry)
    }

    /// Remove the entry behind `handle`
    pub fn remove(&mut self, handle: usize) -> Option<T> {
        let position = self.slots.get(handle)?.position();
        debug_assert_eq!(self.order.get(position), Some(&handle));
        self.remove_at(position)
    }

    /// Restore heap order at `index` after its entry's ordering key changed
    pub fn fix_at(&mut self, index: usize) {
        if index < self.order.len() && !self.sift_down(index) {
            self.sift_up(index);
        }
    }

    /// Restore heap order around the entry behind `handle`.
    ///
    /// Returns `false` when the handle is not in the heap.
    pub fn fix(&mut self, handle: usize) -> bool {
        match self.slots.get(handle) {
            Some(entry) => {
                let position = entry.position();
                self.fix_at(position);
                true
            }
            None => false,
        }
    }

    /// Entry behind `handle`
    #[inline]
    pub fn get(&self, handle: usize) -> Option<&T> {
        self.slots.get(handle)
    }

    /// Mutable entry behind `handle`.
    ///
    /// Changing anything the ordering depends on must be followed by
    /// [`IndexedHeap::fix`].
    #[inline]
    pub fn get_mut(&mut self, handle: usize) -> Option<&mut T> {
        self.slots.get_mut(handle)
    }

    /// Entry at array position `index`
    #[inline]
    pub fn at(&self, index: usize) -> Option<&T> {
        self.order.get(index).map(|&handle| &self.slots[handle])
    }

    /// Entries in array order (root first, otherwise unsorted)
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().map(move |&handle| &self.slots[handle])
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.order.clear();
        self.slots.clear();
    }

    /// Full scan: every stored position matches the array and no child
    /// ranks above its parent.
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.slots.len() {
            return false;
        }
        for (index, &handle) in self.order.iter().enumerate() {
            match self.slots.get(handle) {
                Some(entry) if entry.position() == index => {}
                _ => return false,
            }
            if index > 0 && self.less(index, (index - 1) / 2) {
                return false;
            }
        }
        true
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        O::better(&self.slots[self.order[i]], &self.slots[self.order[j]])
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        let (hi, hj) = (self.order[i], self.order[j]);
        self.slots[hi].set_position(i);
        self.slots[hj].set_position(j);
    }

    /// Returns true if the entry moved
    fn sift_up(&mut self, mut index: usize) -> bool {
        let start = index;
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index != start
    }

    /// Returns true if the entry moved
    fn sift_down(&mut self, mut index: usize) -> bool {
        let start = index;
        let len = self.order.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len && self.less(right, left) {
                best = right;
            }
            if !self.less(best, index) {
                break;
            }
            self.swap(index, best);
            index = best;
        }
        index != start
    }
}

impl<T, O> Default for IndexedHeap<T, O>
where
    T: HeapEntry,
    O: HeapOrder<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, O> fmt::Debug for IndexedHeap<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.order.iter().map(|&handle| &self.slots[handle]))
            .finish()
    }
}
