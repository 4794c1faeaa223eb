// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr;

use crate::error::Result;
use crate::memory;
use crate::traits::CompareFn;

/// A tree node holding one payload.
pub(crate) struct Node<T> {
    pub(crate) data: T,
    left: *mut Node<T>,
    right: *mut Node<T>,
    parent: *mut Node<T>,
}

impl<T> Node<T> {
    /// Allocates a detached leaf for `data`.
    pub(crate) fn alloc(data: T) -> Result<*mut Self> {
        memory::alloc_node(Self {
            data,
            left: ptr::null_mut(),
            right: ptr::null_mut(),
            parent: ptr::null_mut(),
        })
    }

    /// Releases a node that is no longer part of any tree and returns its payload.
    pub(crate) unsafe fn free(node: *mut Self) -> T {
        memory::free_node(node).data
    }

    /// Returns the smallest node of the subtree rooted at `node`.
    pub(crate) unsafe fn first(mut node: *mut Self) -> *mut Self {
        if !node.is_null() {
            while !(*node).left.is_null() {
                node = (*node).left;
            }
        }

        node
    }

    /// Returns the largest node of the subtree rooted at `node`.
    pub(crate) unsafe fn last(mut node: *mut Self) -> *mut Self {
        if !node.is_null() {
            while !(*node).right.is_null() {
                node = (*node).right;
            }
        }

        node
    }

    /// Returns the in-order successor of `node`, or null if `node` is the largest one.
    pub(crate) unsafe fn successor(mut node: *mut Self) -> *mut Self {
        if !(*node).right.is_null() {
            return Self::first((*node).right);
        }

        let mut parent = (*node).parent;
        while !parent.is_null() && node == (*parent).right {
            node = parent;
            parent = (*parent).parent;
        }

        parent
    }

    /// Returns the in-order predecessor of `node`, or null if `node` is the smallest one.
    pub(crate) unsafe fn predecessor(mut node: *mut Self) -> *mut Self {
        if !(*node).left.is_null() {
            return Self::last((*node).left);
        }

        let mut parent = (*node).parent;
        while !parent.is_null() && node == (*parent).left {
            node = parent;
            parent = (*parent).parent;
        }

        parent
    }

    /// Returns the in-order neighbour of `node` in the given walking direction.
    pub(crate) unsafe fn step(node: *mut Self, backward: bool) -> *mut Self {
        if backward {
            Self::predecessor(node)
        } else {
            Self::successor(node)
        }
    }
}

/// Links the detached leaf `node` into the tree rooted at `root`.
///
/// Elements comparing equal to existing ones are placed after them in in-order sequence.
pub(crate) unsafe fn attach<T>(
    root: &mut *mut Node<T>,
    node: *mut Node<T>,
    compare: &CompareFn<T>,
) {
    let mut parent = ptr::null_mut();
    let mut current = *root;
    let mut go_left = false;

    while !current.is_null() {
        parent = current;
        go_left = compare(&(*node).data, &(*current).data) == Ordering::Less;
        current = if go_left {
            (*current).left
        } else {
            (*current).right
        };
    }

    (*node).parent = parent;

    if parent.is_null() {
        *root = node;
    } else if go_left {
        (*parent).left = node;
    } else {
        (*parent).right = node;
    }
}

/// Finds a node comparing equal to `key`, or returns null.
pub(crate) unsafe fn find<T>(
    root: *mut Node<T>,
    key: &T,
    compare: &CompareFn<T>,
) -> *mut Node<T> {
    let mut current = root;

    while !current.is_null() {
        current = match compare(key, &(*current).data) {
            Ordering::Less => (*current).left,
            Ordering::Greater => (*current).right,
            Ordering::Equal => return current,
        };
    }

    current
}

/// Unlinks `node` from the tree rooted at `root`, leaving every other node in place.
pub(crate) unsafe fn detach<T>(root: &mut *mut Node<T>, node: *mut Node<T>) {
    if (*node).left.is_null() {
        transplant(root, node, (*node).right);
    } else if (*node).right.is_null() {
        transplant(root, node, (*node).left);
    } else {
        let heir = Node::first((*node).right);

        if (*heir).parent != node {
            transplant(root, heir, (*heir).right);
            (*heir).right = (*node).right;
            (*(*heir).right).parent = heir;
        }

        transplant(root, node, heir);
        (*heir).left = (*node).left;
        (*(*heir).left).parent = heir;
    }

    (*node).left = ptr::null_mut();
    (*node).right = ptr::null_mut();
    (*node).parent = ptr::null_mut();
}

/// Replaces the subtree rooted at `old` by the one rooted at `new` in the eyes of `old`'s parent.
unsafe fn transplant<T>(root: &mut *mut Node<T>, old: *mut Node<T>, new: *mut Node<T>) {
    let parent = (*old).parent;

    if parent.is_null() {
        *root = new;
    } else if old == (*parent).left {
        (*parent).left = new;
    } else {
        (*parent).right = new;
    }

    if !new.is_null() {
        (*new).parent = parent;
    }
}

/// Unlinks and releases every node of the tree rooted at `root` in ascending order, passing each
/// payload to `f`.
///
/// Right rotations flatten the tree on the way, so no stack is needed.
pub(crate) unsafe fn drain<T, F: FnMut(T)>(root: *mut Node<T>, mut f: F) {
    let mut current = root;

    while !current.is_null() {
        let left = (*current).left;

        if left.is_null() {
            let right = (*current).right;
            f(Node::free(current));
            current = right;
        } else {
            (*current).left = (*left).right;
            (*left).right = current;
            current = left;
        }
    }
}

/// Iterator over the elements of a [`Bst`] in ascending order.
///
/// This iterator is returned from the [`Bst::iter`] function.
///
/// [`Bst`]: super::Bst
/// [`Bst::iter`]: super::Bst::iter
pub struct Iter<'a, T> {
    front: *mut Node<T>,
    back: *mut Node<T>,
    remaining: u32,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: *mut Node<T>, len: u32) -> Self {
        unsafe {
            Self {
                front: Node::first(root),
                back: Node::last(root),
                remaining: len,
                marker: PhantomData,
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        unsafe {
            let element = &(*self.front).data;
            self.remaining -= 1;
            if self.remaining > 0 {
                self.front = Node::successor(self.front);
            }
            Some(element)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        unsafe {
            let element = &(*self.back).data;
            self.remaining -= 1;
            if self.remaining > 0 {
                self.back = Node::predecessor(self.back);
            }
            Some(element)
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}
