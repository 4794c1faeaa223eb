// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use std::io::{Read, Write};

use log::{debug, trace, warn};

use super::base::{Iter, Node};
use super::config::{Config, InsertMode, SearchMode};
use crate::codec;
use crate::error::{Error, Result};
use crate::stat::Stat;
use crate::traits::{Callbacks, Direction};

/// A circular doubly linked list that owns its payloads.
///
/// Besides the ring itself, the handler maintains three positions:
///
/// * The *head*, where a head-to-tail walk starts and where LRU hits are moved to.
/// * The *cursor*, which is repositioned by insertions, removals, searches and iteration, and
///   which is the starting point of non-LRU searches and of [`Config::INSERT_NEXT`] /
///   [`Config::INSERT_PREV`] insertions.
/// * The iteration bookmarks used by [`Cll::iterate`] after a [`Cll::rewind`].
///   Removing an element repairs any bookmark referring to it, so elements may be deleted while
///   an iteration is in progress.
///
/// See the [module-level documentation](crate::cll) for more details.
pub struct Cll<T> {
    cursor: *mut Node<T>,
    head: *mut Node<T>,
    iterate_cur: *mut Node<T>,
    iterate_end: *mut Node<T>,
    iterate_primed: bool,
    iterate_reverse: bool,
    count: u32,
    config: Config,
    callbacks: Callbacks<T>,
    stat: Stat,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> Cll<T> {
    /// Creates an empty list with the default configuration (`SEARCH_LRU | INSERT_HEAD`).
    ///
    /// Fails with [`Error::InvalidArgument`] if `callbacks` has no destroy callback.
    pub fn new(callbacks: Callbacks<T>) -> Result<Self> {
        if callbacks.destroy.is_none() {
            return Err(Error::InvalidArgument("a destroy callback is required"));
        }

        debug!("Creating circular linked list with {:?}", callbacks);

        Ok(Self {
            cursor: ptr::null_mut(),
            head: ptr::null_mut(),
            iterate_cur: ptr::null_mut(),
            iterate_end: ptr::null_mut(),
            iterate_primed: false,
            iterate_reverse: false,
            count: 0,
            config: Config::default(),
            callbacks,
            stat: Stat::default(),
            marker: PhantomData,
        })
    }

    /// Removes all elements from the list, passing each of them to the destroy callback.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn collapse(&mut self) {
        let mut current = self.head;
        let count = self.count;

        // Make the list appear empty before handing out any payload.
        // A panicking destroy callback then cannot lead to a payload being destroyed twice.
        self.reset_positions();
        self.count = 0;
        self.stat.collapse += 1;

        trace!("Collapsing circular linked list with {} elements", count);

        for _ in 0..count {
            unsafe {
                let next = (*current).next;
                let data = Node::free(current);
                current = next;
                self.callbacks.destroy_payload(data);
            }
        }
    }

    /// Returns the current element count and accounts for the call in the statistics.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn count(&mut self) -> u32 {
        self.stat.count += 1;
        self.count
    }

    /// Provides a reference to the element at the cursor, or `None` if the list is empty.
    pub fn cursor(&self) -> Option<&T> {
        (!self.cursor.is_null()).then(|| unsafe { &(*self.cursor).data })
    }

    /// Deletes an element comparing equal to `key` and passes it to the destroy callback.
    ///
    /// Fails with [`Error::NotFound`] if there is no such element.
    pub fn delete(&mut self, key: &T) -> Result<()> {
        match self.unlink(key) {
            Some(data) => {
                self.stat.del += 1;
                self.callbacks.destroy_payload(data);
                Ok(())
            }
            None => {
                self.stat.del_nf += 1;
                Err(Error::NotFound)
            }
        }
    }

    /// Appends the elements of a frame written by [`Cll::serialize`].
    ///
    /// Decoded elements are linked at the tail whatever the configured insertion discipline,
    /// so an empty list ends up in the serialized head-to-tail order.
    /// Each of them counts as an insertion.
    ///
    /// On failure, the elements decoded so far remain in the list.
    pub fn deserialize<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let Some(deserialize) = self.callbacks.deserialize.clone() else {
            self.stat.unserialize_err += 1;
            return Err(Error::Unsupported("no deserialize callback"));
        };

        let result = codec::read_frame(&mut reader, &*deserialize, |data| {
            self.insert_with(data, InsertMode::Tail)
        });

        match result {
            Ok(()) => {
                self.stat.unserialize += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Deserializing circular linked list failed: {}", e);
                self.stat.unserialize_err += 1;
                Err(e)
            }
        }
    }

    /// Returns the current configuration word and accounts for the call in the statistics.
    pub fn get_config(&mut self) -> Config {
        self.stat.get_config += 1;
        self.config
    }

    /// Provides a reference to the head element, or `None` if the list is empty.
    pub fn head(&self) -> Option<&T> {
        (!self.head.is_null()).then(|| unsafe { &(*self.head).data })
    }

    /// Inserts `data` according to the configured insertion discipline.
    ///
    /// Fails with [`Error::OutOfMemory`] if no node can be allocated, or with
    /// [`Error::Unsupported`] if sorted insertion is configured without a compare callback.
    /// In both cases `data` is dropped without invoking the destroy callback.
    ///
    /// This operation computes in *O*(*1*) time, except for sorted insertion, which computes
    /// in *O*(*n*) time.
    pub fn insert(&mut self, data: T) -> Result<()> {
        self.insert_with(data, self.config.insert_mode())
    }

    /// Returns `true` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    /// Returns an iterator yielding references to each element from head to tail.
    ///
    /// The iterator neither moves the cursor nor touches the iteration bookmarks.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.head, self.count)
    }

    /// Yields the next element of the iteration started by [`Cll::rewind`].
    ///
    /// A forward iteration starts at the head and a reverse iteration at the tail.
    /// Every element is yielded once, after which `None` is returned until the next rewind.
    /// The cursor follows the yielded element.
    pub fn iterate(&mut self) -> Option<&T> {
        if self.head.is_null() {
            self.stat.iterate += 1;
            return None;
        }

        unsafe {
            if !self.iterate_primed {
                let tail = (*self.head).prev;
                (self.iterate_cur, self.iterate_end) = if self.iterate_reverse {
                    (tail, self.head)
                } else {
                    (self.head, tail)
                };
                self.iterate_primed = true;
            }

            let node = self.iterate_cur;
            if node.is_null() {
                self.stat.iterate += 1;
                return None;
            }

            self.iterate_cur = if node == self.iterate_end {
                ptr::null_mut()
            } else {
                Node::step(node, self.iterate_reverse)
            };
            self.cursor = node;

            Some(&(*node).data)
        }
    }

    /// Returns the element count without touching the statistics.
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Removes the head element and returns it without invoking the destroy callback,
    /// or returns `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn poph(&mut self) -> Option<T> {
        if self.head.is_null() {
            self.stat.poph_nf += 1;
            return None;
        }

        let data = unsafe { self.detach(self.head) };
        self.stat.poph += 1;
        Some(data)
    }

    /// Removes an element comparing equal to `key` and returns it without invoking the
    /// destroy callback, or returns `None` if there is no such element.
    pub fn pope(&mut self, key: &T) -> Option<T> {
        match self.unlink(key) {
            Some(data) => {
                self.stat.pope += 1;
                Some(data)
            }
            None => {
                self.stat.pope_nf += 1;
                None
            }
        }
    }

    /// Resets the iteration bookmarks, so that the next [`Cll::iterate`] starts over in the
    /// given direction.
    pub fn rewind(&mut self, direction: Direction) {
        self.iterate_cur = ptr::null_mut();
        self.iterate_end = ptr::null_mut();
        self.iterate_primed = false;
        self.iterate_reverse = direction.is_reverse();
        self.stat.rewind += 1;
    }

    /// Searches for an element comparing equal to `key` according to the configured search
    /// discipline.
    ///
    /// Under [`Config::SEARCH_LRU`], a hit is moved to the head.
    /// In any case, the cursor is left at the hit.
    /// Without a compare callback, every search misses.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn search(&mut self, key: &T) -> Option<&T> {
        let Some(node) = self.locate(key) else {
            self.stat.search_nf += 1;
            return None;
        };

        unsafe {
            if self.config.search_mode() == SearchMode::Lru && node != self.head {
                Node::unlink(node);
                Node::link_before(node, self.head);
                self.head = node;
            }

            self.cursor = node;
            self.stat.search += 1;

            Some(&(*node).data)
        }
    }

    /// Writes the element count followed by every element from head to tail.
    ///
    /// Fails with [`Error::Unsupported`] if there is no serialize callback.
    pub fn serialize<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let Some(serialize) = self.callbacks.serialize.clone() else {
            self.stat.serialize_err += 1;
            return Err(Error::Unsupported("no serialize callback"));
        };

        match codec::write_frame(&mut writer, &*serialize, self.count, self.iter()) {
            Ok(()) => {
                self.stat.serialize += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Serializing circular linked list failed: {}", e);
                self.stat.serialize_err += 1;
                Err(e.into())
            }
        }
    }

    /// Installs a new configuration word and returns the previous one.
    pub fn set_config(&mut self, config: Config) -> Config {
        let old_config = self.config;
        self.config = config;
        self.stat.set_config += 1;

        debug!(
            "Reconfigured circular linked list from {:?} to {:?}",
            old_config, config
        );

        old_config
    }

    /// Returns the statistics after refreshing the current element count.
    pub fn stat(&mut self) -> &Stat {
        self.stat.snapshot(self.count)
    }

    /// Zeroes all statistics counters.
    pub fn stat_reset(&mut self) {
        self.stat = Stat::default();
    }

    /// Splices `node` out of the ring and releases it.
    ///
    /// The cursor moves to the successor of `node`.
    /// If `node` is the next element to be yielded, that bookmark advances in the iteration
    /// direction.
    /// If it is the last element to be yielded, that bookmark retreats against it.
    /// An iteration in progress therefore neither skips nor repeats any surviving element.
    unsafe fn detach(&mut self, node: *mut Node<T>) -> T {
        if (*node).next == node {
            self.reset_positions();
        } else {
            let next = (*node).next;

            if self.iterate_cur == node {
                self.iterate_cur = if node == self.iterate_end {
                    ptr::null_mut()
                } else {
                    Node::step(node, self.iterate_reverse)
                };
            }

            if self.iterate_end == node {
                self.iterate_end = Node::step(node, !self.iterate_reverse);
            }

            Node::unlink(node);

            if self.head == node {
                self.head = next;
            }

            self.cursor = next;
        }

        self.count -= 1;
        Node::free(node)
    }

    /// Links `data` according to `mode` and moves the cursor to it.
    fn insert_with(&mut self, data: T, mode: InsertMode) -> Result<()> {
        if mode == InsertMode::Sorted && self.callbacks.compare.is_none() {
            self.stat.insert_err += 1;
            return Err(Error::Unsupported("sorted insertion needs a compare callback"));
        }

        let node = match Node::alloc(data) {
            Ok(node) => node,
            Err(e) => {
                self.stat.insert_err += 1;
                return Err(e);
            }
        };

        unsafe {
            if self.head.is_null() {
                self.head = node;
            } else {
                match mode {
                    InsertMode::Head => {
                        Node::link_before(node, self.head);
                        self.head = node;
                    }
                    InsertMode::Tail => Node::link_before(node, self.head),
                    InsertMode::Sorted => self.link_sorted(node),
                    InsertMode::Next => Node::link_after(node, self.cursor),
                    InsertMode::Prev => Node::link_before(node, self.cursor),
                }
            }
        }

        self.cursor = node;
        self.count += 1;
        self.stat.record_insert(self.count);

        Ok(())
    }

    /// Inserts the self-linked `node` in front of the first element that is not less than it.
    ///
    /// The walk starts at the cursor and goes backward or forward depending on how the cursor
    /// compares to the new element.
    unsafe fn link_sorted(&mut self, node: *mut Node<T>) {
        let Some(compare) = self.callbacks.compare.as_deref() else {
            return;
        };

        let data = &(*node).data;
        let tail = (*self.head).prev;
        let mut current = self.cursor;

        if compare(&(*current).data, data) == Ordering::Greater {
            loop {
                current = (*current).prev;

                if current == tail || compare(&(*current).data, data) != Ordering::Greater {
                    break;
                }
            }

            Node::link_after(node, current);

            if (*node).next == self.head {
                self.head = node;
            }
        } else {
            loop {
                current = (*current).next;

                if current == self.head || compare(&(*current).data, data) != Ordering::Less {
                    break;
                }
            }

            Node::link_before(node, current);
        }
    }

    /// Finds the node holding an element comparing equal to `key`.
    ///
    /// Under [`Config::SEARCH_LRU`], the walk starts at the head and goes forward.
    /// Otherwise it starts at the cursor and goes in the configured direction, where
    /// [`Config::SEARCH_AUTO`] first decides on the direction by comparing the cursor with
    /// the key.
    fn locate(&mut self, key: &T) -> Option<*mut Node<T>> {
        let compare = self.callbacks.compare.as_deref()?;

        if self.head.is_null() {
            return None;
        }

        let (start, backward) = match self.config.search_mode() {
            SearchMode::Lru => (self.head, false),
            SearchMode::Auto => {
                let cursor_data = unsafe { &(*self.cursor).data };
                let backward = compare(cursor_data, key) == Ordering::Greater;
                self.config.set(Config::SEARCH_BACKWARD, backward);
                (self.cursor, backward)
            }
            SearchMode::Backward => (self.cursor, true),
            SearchMode::Forward => (self.cursor, false),
        };

        let mut current = start;

        loop {
            unsafe {
                if compare(key, &(*current).data) == Ordering::Equal {
                    return Some(current);
                }

                current = Node::step(current, backward);
            }

            if current == start {
                return None;
            }
        }
    }

    fn reset_positions(&mut self) {
        self.cursor = ptr::null_mut();
        self.head = ptr::null_mut();
        self.iterate_cur = ptr::null_mut();
        self.iterate_end = ptr::null_mut();
        self.iterate_primed = false;
    }

    /// Removes an element comparing equal to `key` and returns its payload.
    fn unlink(&mut self, key: &T) -> Option<T> {
        let node = self.locate(key)?;
        Some(unsafe { self.detach(node) })
    }
}

impl<T> Drop for Cll<T> {
    fn drop(&mut self) {
        self.collapse();
    }
}

impl<T: fmt::Debug> fmt::Debug for Cll<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
