// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use std::io::{Read, Write};
use std::rc::Rc;

use log::{debug, trace, warn};

use super::tree::{self, Iter, Node};
use crate::codec;
use crate::error::{Error, Result};
use crate::stat::Stat;
use crate::traits::{Callbacks, CompareFn, Direction};

/// An unbalanced binary search tree that owns its payloads.
///
/// The tree is an ordered multiset: elements comparing equal to existing ones are kept and
/// placed after them.
/// Removing an element relinks the surrounding nodes without moving any payload, so a stateful
/// iteration started by [`Bst::rewind`] survives the removal of any element.
pub struct Bst<T> {
    root: *mut Node<T>,
    count: u32,
    iterate_next: *mut Node<T>,
    iterate_started: bool,
    iterate_reverse: bool,
    compare: Rc<CompareFn<T>>,
    callbacks: Callbacks<T>,
    stat: Stat,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> Bst<T> {
    /// Creates an empty tree.
    ///
    /// Fails with [`Error::InvalidArgument`] if `callbacks` lacks a compare or a destroy
    /// callback.
    pub fn new(callbacks: Callbacks<T>) -> Result<Self> {
        let Some(compare) = callbacks.compare.clone() else {
            return Err(Error::InvalidArgument("a compare callback is required"));
        };

        if callbacks.destroy.is_none() {
            return Err(Error::InvalidArgument("a destroy callback is required"));
        }

        debug!("Creating binary search tree with {:?}", callbacks);

        Ok(Self {
            root: ptr::null_mut(),
            count: 0,
            iterate_next: ptr::null_mut(),
            iterate_started: false,
            iterate_reverse: false,
            compare,
            callbacks,
            stat: Stat::default(),
            marker: PhantomData,
        })
    }

    /// Removes all elements in ascending order, passing each of them to the destroy callback.
    ///
    /// Unlike [`Bst::delete`], this does not touch the `del` counter.
    pub fn collapse(&mut self) {
        let root = self.root;
        let count = self.count;

        self.root = ptr::null_mut();
        self.count = 0;
        self.iterate_next = ptr::null_mut();
        self.stat.collapse += 1;

        trace!("Collapsing binary search tree with {} elements", count);

        let callbacks = &self.callbacks;
        unsafe { tree::drain(root, |data| callbacks.destroy_payload(data)) };
    }

    /// Returns the current element count and accounts for the call in the statistics.
    pub fn count(&mut self) -> u32 {
        self.stat.count += 1;
        self.count
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

    /// Refills the tree from a frame written by [`Bst::serialize`].
    ///
    /// On failure, the elements decoded so far remain in the tree.
    pub fn deserialize<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let Some(deserialize) = self.callbacks.deserialize.clone() else {
            self.stat.unserialize_err += 1;
            return Err(Error::Unsupported("no deserialize callback"));
        };

        match codec::read_frame(&mut reader, &*deserialize, |data| self.insert(data)) {
            Ok(()) => {
                self.stat.unserialize += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Deserializing binary search tree failed: {}", e);
                self.stat.unserialize_err += 1;
                Err(e)
            }
        }
    }

    /// Provides a reference to the smallest element, or `None` if the tree is empty.
    pub fn first(&self) -> Option<&T> {
        unsafe {
            let node = Node::first(self.root);
            (!node.is_null()).then(|| &(*node).data)
        }
    }

    /// Inserts `data` at its ordered position.
    ///
    /// Fails with [`Error::OutOfMemory`] if no node can be allocated.
    /// In that case `data` is dropped without invoking the destroy callback.
    ///
    /// This operation computes in *O*(*h*) time, where *h* is the height of the tree.
    pub fn insert(&mut self, data: T) -> Result<()> {
        let node = match Node::alloc(data) {
            Ok(node) => node,
            Err(e) => {
                self.stat.insert_err += 1;
                return Err(e);
            }
        };

        unsafe { tree::attach(&mut self.root, node, &*self.compare) };

        self.count += 1;
        self.stat.record_insert(self.count);

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Returns an iterator yielding references to each element in ascending order.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.root, self.count)
    }

    /// Yields the next element of the iteration started by [`Bst::rewind`].
    ///
    /// A forward iteration yields the elements in non-decreasing order, a reverse iteration in
    /// non-increasing order.
    pub fn iterate(&mut self) -> Option<&T> {
        unsafe {
            if !self.iterate_started {
                self.iterate_started = true;
                self.iterate_next = if self.iterate_reverse {
                    Node::last(self.root)
                } else {
                    Node::first(self.root)
                };
            }

            let node = self.iterate_next;
            if node.is_null() {
                self.stat.iterate += 1;
                return None;
            }

            self.iterate_next = Node::step(node, self.iterate_reverse);
            Some(&(*node).data)
        }
    }

    /// Provides a reference to the largest element, or `None` if the tree is empty.
    pub fn last(&self) -> Option<&T> {
        unsafe {
            let node = Node::last(self.root);
            (!node.is_null()).then(|| &(*node).data)
        }
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    /// Removes the smallest element and returns it without invoking the destroy callback,
    /// or returns `None` if the tree is empty.
    pub fn poph(&mut self) -> Option<T> {
        let node = unsafe { Node::first(self.root) };
        if node.is_null() {
            self.stat.poph_nf += 1;
            return None;
        }

        self.stat.poph += 1;
        Some(unsafe { self.detach(node) })
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

    /// Resets the iteration, so that the next [`Bst::iterate`] starts over at the smallest
    /// ([`Direction::Forward`]) or largest ([`Direction::Reverse`]) element.
    pub fn rewind(&mut self, direction: Direction) {
        self.iterate_started = false;
        self.iterate_next = ptr::null_mut();
        self.iterate_reverse = direction.is_reverse();
        self.stat.rewind += 1;
    }

    /// Searches for an element comparing equal to `key`.
    ///
    /// This operation computes in *O*(*h*) time, where *h* is the height of the tree.
    pub fn search(&mut self, key: &T) -> Option<&T> {
        let node = unsafe { tree::find(self.root, key, &*self.compare) };

        if node.is_null() {
            self.stat.search_nf += 1;
            None
        } else {
            self.stat.search += 1;
            Some(unsafe { &(*node).data })
        }
    }

    /// Writes the element count followed by every element in ascending order.
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
                warn!("Serializing binary search tree failed: {}", e);
                self.stat.serialize_err += 1;
                Err(e.into())
            }
        }
    }

    /// Returns the statistics after refreshing the current element count.
    pub fn stat(&mut self) -> &Stat {
        self.stat.snapshot(self.count)
    }

    /// Zeroes all statistics counters.
    pub fn stat_reset(&mut self) {
        self.stat = Stat::default();
    }

    /// Unlinks and releases `node`, advancing the iteration bookmark if it refers to `node`.
    unsafe fn detach(&mut self, node: *mut Node<T>) -> T {
        if self.iterate_next == node {
            self.iterate_next = Node::step(node, self.iterate_reverse);
        }

        tree::detach(&mut self.root, node);
        self.count -= 1;

        Node::free(node)
    }

    fn unlink(&mut self, key: &T) -> Option<T> {
        let node = unsafe { tree::find(self.root, key, &*self.compare) };
        (!node.is_null()).then(|| unsafe { self.detach(node) })
    }
}

impl<T> Drop for Bst<T> {
    fn drop(&mut self) {
        self.collapse();
    }
}

impl<T: fmt::Debug> fmt::Debug for Bst<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;
    use std::cell::RefCell;

    #[derive(Debug, Element, PartialEq)]
    struct Entry {
        #[key]
        id: u32,
        tag: &'static str,
    }

    fn entry(id: u32) -> Entry {
        Entry { id, tag: "" }
    }

    fn new_tree(destroyed: &Rc<RefCell<Vec<u32>>>) -> Bst<Entry> {
        let destroyed = destroyed.clone();
        let callbacks = Callbacks::for_element()
            .destroy(move |entry: Entry| destroyed.borrow_mut().push(entry.id))
            .serialize(|writer, entry: &Entry| writer.write_all(&entry.id.to_be_bytes()))
            .deserialize(|reader| {
                let mut buf = [0u8; 4];
                reader.read_exact(&mut buf)?;
                Ok(entry(u32::from_be_bytes(buf)))
            });
        Bst::new(callbacks).unwrap()
    }

    fn filled_tree(destroyed: &Rc<RefCell<Vec<u32>>>, ids: &[u32]) -> Bst<Entry> {
        let mut tree = new_tree(destroyed);
        for id in ids {
            tree.insert(entry(*id)).unwrap();
        }
        tree
    }

    fn iterate_ids(tree: &mut Bst<Entry>, direction: Direction) -> Vec<u32> {
        let mut ids = Vec::new();
        tree.rewind(direction);

        while let Some(entry) = tree.iterate() {
            ids.push(entry.id);
        }

        ids
    }

    #[test]
    fn test_callbacks_required() {
        let result = Bst::<u32>::new(Callbacks::<u32>::new().destroy(drop));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let result = Bst::<u32>::new(Callbacks::<u32>::new().compare(|a, b| a.cmp(b)));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_iterate_ordered() {
        let destroyed = Rc::default();
        let mut tree = filled_tree(&destroyed, &[5, 1, 3, 2, 4, 8, 6]);

        assert_eq!(
            iterate_ids(&mut tree, Direction::Forward),
            [1, 2, 3, 4, 5, 6, 8]
        );
        assert_eq!(
            iterate_ids(&mut tree, Direction::Reverse),
            [8, 6, 5, 4, 3, 2, 1]
        );
        assert!(tree.iterate().is_none());

        assert_eq!(tree.first().unwrap().id, 1);
        assert_eq!(tree.last().unwrap().id, 8);
        assert_eq!(tree.iter().rev().next().unwrap().id, 8);

        let stat = tree.stat();
        assert_eq!(stat.rewind, 2);
        assert_eq!(stat.iterate, 3);
    }

    #[test]
    fn test_duplicates() {
        let destroyed = Rc::default();
        let mut tree = new_tree(&destroyed);

        for (id, tag) in [(2, "a"), (1, "b"), (2, "c"), (2, "d")] {
            tree.insert(Entry { id, tag }).unwrap();
        }

        let tags = tree.iter().map(|entry| entry.tag).collect::<Vec<_>>();
        assert_eq!(tags, ["b", "a", "c", "d"]);

        assert_eq!(tree.pope(&entry(2)).unwrap().id, 2);
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_search_and_delete() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut tree = filled_tree(&destroyed, &[50, 30, 70, 20, 40]);

        assert_eq!(tree.search(&entry(40)).unwrap().id, 40);
        assert!(tree.search(&entry(45)).is_none());

        tree.delete(&entry(30)).unwrap();
        assert!(matches!(tree.delete(&entry(30)), Err(Error::NotFound)));
        assert_eq!(
            tree.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            [20, 40, 50, 70]
        );
        assert_eq!(*destroyed.borrow(), [30]);

        let stat = tree.stat();
        assert_eq!(stat.search, 1);
        assert_eq!(stat.search_nf, 1);
        assert_eq!(stat.del, 1);
        assert_eq!(stat.del_nf, 1);
        assert_eq!(stat.elem_count_cur, 4);
        assert_eq!(stat.elem_count_max, 5);
    }

    #[test]
    fn test_poph_pops_smallest() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut tree = filled_tree(&destroyed, &[3, 1, 2]);

        assert_eq!(tree.poph().unwrap().id, 1);
        assert_eq!(tree.poph().unwrap().id, 2);
        assert_eq!(tree.poph().unwrap().id, 3);
        assert!(tree.poph().is_none());
        assert!(destroyed.borrow().is_empty());

        let stat = tree.stat();
        assert_eq!(stat.poph, 3);
        assert_eq!(stat.poph_nf, 1);
    }

    #[test]
    fn test_delete_while_iterating() {
        let destroyed = Rc::default();
        let mut tree = filled_tree(&destroyed, &[50, 30, 70, 20, 40, 60, 80]);

        // Delete the yielded element and the one after it.
        tree.rewind(Direction::Forward);
        let mut seen = Vec::new();

        while let Some(id) = tree.iterate().map(|entry| entry.id) {
            seen.push(id);
            tree.delete(&entry(id)).unwrap();

            if id == 40 {
                tree.delete(&entry(50)).unwrap();
            }
        }

        assert_eq!(seen, [20, 30, 40, 60, 70, 80]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_while_iterating_reverse() {
        let destroyed = Rc::default();
        let mut tree = filled_tree(&destroyed, &[50, 30, 70, 20, 40, 60, 80]);

        tree.rewind(Direction::Reverse);
        assert_eq!(tree.iterate().unwrap().id, 80);
        tree.delete(&entry(70)).unwrap();
        tree.delete(&entry(50)).unwrap();

        let mut rest = Vec::new();
        while let Some(entry) = tree.iterate() {
            rest.push(entry.id);
        }

        assert_eq!(rest, [60, 40, 30, 20]);
    }

    #[test]
    fn test_collapse() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut tree = filled_tree(&destroyed, &[4, 2, 6, 1, 3, 5, 7]);

        tree.collapse();
        tree.collapse();

        assert_eq!(tree.count(), 0);
        assert_eq!(*destroyed.borrow(), [1, 2, 3, 4, 5, 6, 7]);

        let stat = tree.stat();
        assert_eq!(stat.collapse, 2);
        assert_eq!(stat.del, 0);
    }

    #[test]
    fn test_drop_destroys() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        drop(filled_tree(&destroyed, &[2, 1]));
        assert_eq!(*destroyed.borrow(), [1, 2]);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let destroyed = Rc::default();
        let mut tree = filled_tree(&destroyed, &[9, 4, 7, 1, 12]);

        let mut buf = Vec::new();
        tree.serialize(&mut buf).unwrap();
        assert_eq!(buf[..8], [0, 0, 0, 5, 0, 0, 0, 1]);

        let mut copy = new_tree(&destroyed);
        copy.deserialize(buf.as_slice()).unwrap();
        assert_eq!(
            copy.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            [1, 4, 7, 9, 12]
        );
        assert_eq!(copy.stat().unserialize, 1);
    }

    #[test]
    fn test_codec_unsupported() {
        let callbacks = Callbacks::<u32>::new().compare(|a, b| a.cmp(b)).destroy(drop);
        let mut tree = Bst::new(callbacks).unwrap();

        assert!(matches!(
            tree.serialize(Vec::new()),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            tree.deserialize(&[0u8, 0, 0, 0][..]),
            Err(Error::Unsupported(_))
        ));
    }
}
