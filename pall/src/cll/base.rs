// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr;

use crate::error::Result;
use crate::memory;

/// A ring member holding one payload.
///
/// A node that is not part of a ring links to itself, which is also the shape of a ring with a
/// single member.
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) next: *mut Node<T>,
    pub(crate) prev: *mut Node<T>,
}

impl<T> Node<T> {
    /// Allocates a self-linked node for `data`.
    pub(crate) fn alloc(data: T) -> Result<*mut Self> {
        let node = memory::alloc_node(Self {
            data,
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        })?;

        unsafe {
            (*node).next = node;
            (*node).prev = node;
        }

        Ok(node)
    }

    /// Releases a node that is no longer linked into any ring and returns its payload.
    pub(crate) unsafe fn free(node: *mut Self) -> T {
        memory::free_node(node).data
    }

    /// Links the self-linked `node` into the ring right before `at`.
    pub(crate) unsafe fn link_before(node: *mut Self, at: *mut Self) {
        let old_prev = (*at).prev;
        (*node).next = at;
        (*node).prev = old_prev;
        (*old_prev).next = node;
        (*at).prev = node;
    }

    /// Links the self-linked `node` into the ring right after `at`.
    pub(crate) unsafe fn link_after(node: *mut Self, at: *mut Self) {
        Self::link_before(node, (*at).next);
    }

    /// Splices `node` out of its ring and makes it self-linked again.
    pub(crate) unsafe fn unlink(node: *mut Self) {
        let old_next = (*node).next;
        let old_prev = (*node).prev;
        (*old_next).prev = old_prev;
        (*old_prev).next = old_next;
        (*node).next = node;
        (*node).prev = node;
    }

    /// Returns the neighbour of `node` in the given walking direction.
    pub(crate) unsafe fn step(node: *mut Self, backward: bool) -> *mut Self {
        if backward {
            (*node).prev
        } else {
            (*node).next
        }
    }
}

/// Iterator over the elements of a [`Cll`] from head to tail.
///
/// Unlike the stateful [`Cll::iterate`], this iterator neither moves the cursor nor touches any
/// statistics counter.
///
/// This iterator is returned from the [`Cll::iter`] function.
///
/// [`Cll`]: super::Cll
/// [`Cll::iter`]: super::Cll::iter
/// [`Cll::iterate`]: super::Cll::iterate
pub struct Iter<'a, T> {
    flink: *const Node<T>,
    blink: *const Node<T>,
    remaining: u32,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(head: *const Node<T>, len: u32) -> Self {
        let blink = if head.is_null() {
            head
        } else {
            unsafe { (*head).prev as *const Node<T> }
        };

        Self {
            flink: head,
            blink,
            remaining: len,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            None
        } else {
            unsafe {
                let element = &(*self.flink).data;
                self.flink = (*self.flink).next;
                self.remaining -= 1;
                Some(element)
            }
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
            None
        } else {
            unsafe {
                let element = &(*self.blink).data;
                self.blink = (*self.blink).prev;
                self.remaining -= 1;
                Some(element)
            }
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn ring_values(start: *mut Node<i32>, backward: bool) -> Vec<i32> {
        let mut values = Vec::new();
        let mut current = start;

        loop {
            values.push((*current).data);
            current = Node::step(current, backward);

            if current == start {
                break;
            }
        }

        values
    }

    #[test]
    fn test_link_and_unlink() {
        unsafe {
            let a = Node::alloc(1).unwrap();
            let b = Node::alloc(2).unwrap();
            let c = Node::alloc(3).unwrap();

            Node::link_after(b, a);
            Node::link_before(c, a);
            assert_eq!(ring_values(a, false), [1, 2, 3]);
            assert_eq!(ring_values(a, true), [1, 3, 2]);

            Node::unlink(b);
            assert_eq!(ring_values(a, false), [1, 3]);
            assert_eq!((*b).next, b);
            assert_eq!((*b).prev, b);

            let iter = Iter::new(a, 2);
            assert_eq!(iter.len(), 2);
            assert_eq!(iter.rev().copied().collect::<Vec<_>>(), [3, 1]);

            Node::unlink(c);
            assert_eq!(ring_values(a, true), [1]);

            assert_eq!(Node::free(a), 1);
            assert_eq!(Node::free(b), 2);
            assert_eq!(Node::free(c), 3);
        }
    }

    #[test]
    fn test_empty_iter() {
        let mut iter = Iter::<i32>::new(ptr::null(), 0);
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }
}
