// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::{Read, Write};

use crate::bst::Bst;
use crate::cll::Cll;
use crate::error::Result;
use crate::private::Sealed;
use crate::stat::Stat;
use crate::traits::{Callbacks, Direction};

/// The container operations an [`Hmbt`](super::Hmbt) dispatches to its buckets.
///
/// This trait is sealed and implemented by [`Cll`] and [`Bst`] only.
/// All methods behave exactly like the inherent methods of the same name.
pub trait Bucket<T>: Sealed + Sized {
    /// Creates an empty bucket sharing the caller's callbacks.
    fn with_callbacks(callbacks: Callbacks<T>) -> Result<Self>;

    fn insert(&mut self, data: T) -> Result<()>;
    fn search(&mut self, key: &T) -> Option<&T>;
    fn delete(&mut self, key: &T) -> Result<()>;
    fn pope(&mut self, key: &T) -> Option<T>;
    fn poph(&mut self) -> Option<T>;

    /// Returns the element count without touching the statistics.
    fn len(&self) -> u32;

    fn collapse(&mut self);
    fn rewind(&mut self, direction: Direction);
    fn iterate(&mut self) -> Option<&T>;

    fn serialize<W: Write>(&mut self, writer: &mut W) -> Result<()>;
    fn deserialize<R: Read>(&mut self, reader: &mut R) -> Result<()>;

    fn stat(&mut self) -> &Stat;
    fn stat_reset(&mut self);
}

impl<T> Sealed for Cll<T> {}

impl<T> Bucket<T> for Cll<T> {
    fn with_callbacks(callbacks: Callbacks<T>) -> Result<Self> {
        Cll::new(callbacks)
    }

    fn insert(&mut self, data: T) -> Result<()> {
        Cll::insert(self, data)
    }

    fn search(&mut self, key: &T) -> Option<&T> {
        Cll::search(self, key)
    }

    fn delete(&mut self, key: &T) -> Result<()> {
        Cll::delete(self, key)
    }

    fn pope(&mut self, key: &T) -> Option<T> {
        Cll::pope(self, key)
    }

    fn poph(&mut self) -> Option<T> {
        Cll::poph(self)
    }

    fn len(&self) -> u32 {
        Cll::len(self)
    }

    fn collapse(&mut self) {
        Cll::collapse(self)
    }

    fn rewind(&mut self, direction: Direction) {
        Cll::rewind(self, direction)
    }

    fn iterate(&mut self) -> Option<&T> {
        Cll::iterate(self)
    }

    fn serialize<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        Cll::serialize(self, writer)
    }

    fn deserialize<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        Cll::deserialize(self, reader)
    }

    fn stat(&mut self) -> &Stat {
        Cll::stat(self)
    }

    fn stat_reset(&mut self) {
        Cll::stat_reset(self)
    }
}

impl<T> Sealed for Bst<T> {}

impl<T> Bucket<T> for Bst<T> {
    fn with_callbacks(callbacks: Callbacks<T>) -> Result<Self> {
        Bst::new(callbacks)
    }

    fn insert(&mut self, data: T) -> Result<()> {
        Bst::insert(self, data)
    }

    fn search(&mut self, key: &T) -> Option<&T> {
        Bst::search(self, key)
    }

    fn delete(&mut self, key: &T) -> Result<()> {
        Bst::delete(self, key)
    }

    fn pope(&mut self, key: &T) -> Option<T> {
        Bst::pope(self, key)
    }

    fn poph(&mut self) -> Option<T> {
        Bst::poph(self)
    }

    fn len(&self) -> u32 {
        Bst::len(self)
    }

    fn collapse(&mut self) {
        Bst::collapse(self)
    }

    fn rewind(&mut self, direction: Direction) {
        Bst::rewind(self, direction)
    }

    fn iterate(&mut self) -> Option<&T> {
        Bst::iterate(self)
    }

    fn serialize<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        Bst::serialize(self, writer)
    }

    fn deserialize<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        Bst::deserialize(self, reader)
    }

    fn stat(&mut self) -> &Stat {
        Bst::stat(self)
    }

    fn stat_reset(&mut self) {
        Bst::stat_reset(self)
    }
}
