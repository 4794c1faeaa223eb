// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::marker::PhantomData;
use std::io::{Read, Write};

use log::debug;

use super::QueueType;
use crate::cll::{Cll, Iter};
use crate::error::Result;
use crate::stat::QueueStat;
use crate::traits::{Callbacks, Direction};

/// A queue whose pop order is selected by the [`QueueType`] parameter.
///
/// Any compare callback in the supplied [`Callbacks`] is ignored.
pub struct Queue<T, Q: QueueType> {
    list: Cll<T>,
    stat: QueueStat,
    marker: PhantomData<Q>,
}

impl<T, Q: QueueType> Queue<T, Q> {
    /// Creates an empty queue.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) if `callbacks` has
    /// no destroy callback.
    pub fn new(callbacks: Callbacks<T>) -> Result<Self> {
        let mut list = Cll::new(callbacks.without_compare())?;
        list.set_config(Q::CONFIG);
        list.stat_reset();

        debug!("Created queue with {:?}", Q::CONFIG);

        Ok(Self {
            list,
            stat: QueueStat::default(),
            marker: PhantomData,
        })
    }

    /// Destroys all elements.
    pub fn collapse(&mut self) {
        self.list.collapse();
    }

    /// Returns the element count and accounts for the call in the statistics.
    pub fn count(&mut self) -> u32 {
        self.list.count()
    }

    /// Refills the queue from a frame written by [`Queue::serialize`].
    ///
    /// The decoded elements are appended in frame order, so an empty queue of either flavor
    /// pops them in the order they were serialized.
    pub fn deserialize<R: Read>(&mut self, reader: R) -> Result<()> {
        self.list.deserialize(reader)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Yields the next element of the iteration started by [`Queue::rewind`], in pop order
    /// for [`Direction::Forward`].
    pub fn iterate(&mut self) -> Option<&T> {
        self.list.iterate()
    }

    /// Returns an iterator over the elements in pop order.
    pub fn iter(&self) -> Iter<T> {
        self.list.iter()
    }

    pub fn len(&self) -> u32 {
        self.list.len()
    }

    /// Returns the element the next [`Queue::pop`] would return.
    pub fn peek(&self) -> Option<&T> {
        self.list.head()
    }

    /// Removes the next element in pop order and hands it back to the caller.
    pub fn pop(&mut self) -> Option<T> {
        self.list.poph()
    }

    /// Adds an element.
    pub fn push(&mut self, data: T) -> Result<()> {
        self.list.insert(data)
    }

    pub fn rewind(&mut self, direction: Direction) {
        self.list.rewind(direction);
    }

    /// Writes the element count followed by every element in pop order.
    pub fn serialize<W: Write>(&mut self, writer: W) -> Result<()> {
        self.list.serialize(writer)
    }

    /// Returns the statistics, refreshed from the counters of the underlying list.
    pub fn stat(&mut self) -> &QueueStat {
        let inner = *self.list.stat();
        self.stat.project(&inner);
        self.stat.stat += 1;
        &self.stat
    }

    /// Zeroes all statistics counters, including those of the underlying list.
    pub fn stat_reset(&mut self) {
        self.list.stat_reset();
        self.stat = QueueStat::default();
    }
}

impl<T: fmt::Debug, Q: QueueType> fmt::Debug for Queue<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
