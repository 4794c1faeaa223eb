// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use std::io::{Read, Write};
use std::rc::Rc;

use log::{debug, trace, warn};

use super::bucket::Bucket;
use crate::bst::Bst;
use crate::cll::{Cll, Config};
use crate::codec;
use crate::error::{Error, Result};
use crate::stat::HmbtStat;
use crate::traits::{Callbacks, Direction, HashFn};

/// Bucket count used when `0` is passed to [`Hmbt::new`].
pub const DEFAULT_BUCKETS: u32 = 127;

/// A fixed array of buckets, each element living in bucket `hash(element) % N`.
///
/// Key-based operations hash the key and are dispatched to the selected bucket, whereas
/// [`Hmbt::count`], [`Hmbt::collapse`] and the stateful iteration span all buckets.
/// The buckets keep their own statistics, which [`Hmbt::stat`] aggregates.
pub struct Hmbt<T, B: Bucket<T>> {
    buckets: Vec<B>,
    hash: Rc<HashFn<T>>,
    iterate_pos: Option<usize>,
    iterate_reverse: bool,
    stat: HmbtStat,
}

/// A composite of [`Cll`] buckets.
pub type HmbtCll<T> = Hmbt<T, Cll<T>>;

/// A composite of [`Bst`] buckets.
pub type HmbtBst<T> = Hmbt<T, Bst<T>>;

impl<T, B: Bucket<T>> Hmbt<T, B> {
    /// Creates a composite of `buckets` empty buckets, or [`DEFAULT_BUCKETS`] if `buckets`
    /// is `0`.
    ///
    /// Every bucket shares the supplied callbacks.
    /// Fails with [`Error::InvalidArgument`] if `callbacks` lacks a hash callback or any
    /// callback the bucket type requires, and with [`Error::OutOfMemory`] if the bucket array
    /// cannot be allocated.
    pub fn new(callbacks: Callbacks<T>, buckets: u32) -> Result<Self> {
        let Some(hash) = callbacks.hash.clone() else {
            return Err(Error::InvalidArgument("a hash callback is required"));
        };

        let n = if buckets == 0 { DEFAULT_BUCKETS } else { buckets };

        let mut array = Vec::new();
        array
            .try_reserve_exact(n as usize)
            .map_err(|_| Error::OutOfMemory)?;

        for _ in 0..n {
            array.push(B::with_callbacks(callbacks.clone())?);
        }

        debug!("Created hashed multi-bucket container with {} buckets", n);

        Ok(Self {
            buckets: array,
            hash,
            iterate_pos: Some(0),
            iterate_reverse: false,
            stat: HmbtStat::with_buckets(n as usize),
        })
    }

    /// Returns the index of the bucket that holds elements comparing equal to `key`.
    pub fn bucket_index(&self, key: &T) -> usize {
        (self.hash)(key) as usize % self.buckets.len()
    }

    /// Provides the buckets in index order.
    pub fn buckets(&self) -> &[B] {
        &self.buckets
    }

    /// Collapses every bucket.
    pub fn collapse(&mut self) {
        trace!("Collapsing {} buckets", self.buckets.len());

        for bucket in &mut self.buckets {
            bucket.collapse();
        }

        self.stat.collapse += 1;
    }

    /// Returns the sum of all bucket element counts and accounts for the call in the
    /// statistics.
    pub fn count(&mut self) -> u32 {
        self.stat.count += 1;
        self.len()
    }

    /// Deletes an element comparing equal to `key` from its bucket.
    pub fn delete(&mut self, key: &T) -> Result<()> {
        let index = self.bucket_index(key);
        self.buckets[index].delete(key)
    }

    /// Refills the buckets from a stream written by [`Hmbt::serialize`].
    ///
    /// The stream must have been written by a composite with the same bucket count, otherwise
    /// [`Error::BucketMismatch`] is returned before any element is read.
    /// Every element returns to the bucket it was serialized from.
    pub fn deserialize<R: Read>(&mut self, mut reader: R) -> Result<()> {
        match self.deserialize_buckets(&mut reader) {
            Ok(()) => {
                self.stat.unserialize += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Deserializing hashed multi-bucket container failed: {}", e);
                self.stat.unserialize_err += 1;
                Err(e)
            }
        }
    }

    /// Inserts `data` into its bucket.
    pub fn insert(&mut self, data: T) -> Result<()> {
        let index = self.bucket_index(&data);
        self.buckets[index].insert(data)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.len() == 0)
    }

    /// Yields the next element of the iteration started by [`Hmbt::rewind`].
    ///
    /// The elements are yielded bucket by bucket, in the order of the bucket's own iteration.
    /// The element just yielded may be deleted before the next call.
    pub fn iterate(&mut self) -> Option<&T> {
        while let Some(pos) = self.iterate_pos {
            // Convert to a pointer to end the borrow of the bucket on a miss.
            if let Some(data) = self.buckets[pos].iterate().map(|data| data as *const T) {
                return Some(unsafe { &*data });
            }

            self.iterate_pos = if self.iterate_reverse {
                pos.checked_sub(1)
            } else {
                Some(pos + 1).filter(|&next| next < self.buckets.len())
            };
        }

        self.stat.iterate += 1;
        None
    }

    /// Returns the sum of all bucket element counts without touching the statistics.
    pub fn len(&self) -> u32 {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    /// Removes an element comparing equal to `key` from its bucket and hands it back.
    pub fn pope(&mut self, key: &T) -> Option<T> {
        let index = self.bucket_index(key);
        self.buckets[index].pope(key)
    }

    /// Removes the head element of the bucket `key` hashes to.
    ///
    /// The removed element does not need to compare equal to `key`.
    pub fn poph_elem(&mut self, key: &T) -> Option<T> {
        let index = self.bucket_index(key);
        let data = self.buckets[index].poph();

        if data.is_some() {
            self.stat.poph_elem += 1;
        } else {
            self.stat.poph_elem_nf += 1;
        }

        data
    }

    /// Removes the head element of bucket `index`.
    ///
    /// An index past the last bucket counts as a miss.
    pub fn poph_index(&mut self, index: usize) -> Option<T> {
        let data = self.buckets.get_mut(index).and_then(|bucket| bucket.poph());

        if data.is_some() {
            self.stat.poph_index += 1;
        } else {
            self.stat.poph_index_nf += 1;
        }

        data
    }

    /// Rewinds every bucket and restarts the iteration at bucket 0 ([`Direction::Forward`])
    /// or bucket `N - 1` ([`Direction::Reverse`]).
    pub fn rewind(&mut self, direction: Direction) {
        for bucket in &mut self.buckets {
            bucket.rewind(direction);
        }

        self.iterate_reverse = direction.is_reverse();
        self.iterate_pos = Some(if self.iterate_reverse {
            self.buckets.len() - 1
        } else {
            0
        });
        self.stat.rewind += 1;
    }

    /// Searches the bucket `key` hashes to.
    pub fn search(&mut self, key: &T) -> Option<&T> {
        let index = self.bucket_index(key);
        self.buckets[index].search(key)
    }

    /// Writes the bucket count followed by the frame of every bucket in index order.
    pub fn serialize<W: Write>(&mut self, mut writer: W) -> Result<()> {
        match self.serialize_buckets(&mut writer) {
            Ok(()) => {
                self.stat.serialize += 1;
                Ok(())
            }
            Err(e) => {
                warn!("Serializing hashed multi-bucket container failed: {}", e);
                self.stat.serialize_err += 1;
                Err(e)
            }
        }
    }

    /// Recomputes the aggregated counters and the element distribution from the buckets and
    /// returns the statistics.
    pub fn stat(&mut self) -> &HmbtStat {
        self.stat.clear_aggregates();

        for (index, bucket) in self.buckets.iter_mut().enumerate() {
            let len = bucket.len();
            let bucket_stat = *bucket.stat();
            self.stat.accumulate(index, &bucket_stat, len);
        }

        self.stat.node_elem_count_avg =
            self.stat.elem_count_cur as f32 / self.buckets.len() as f32;
        self.stat.stat += 1;

        &self.stat
    }

    /// Zeroes all statistics counters, including those of every bucket.
    pub fn stat_reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.stat_reset();
        }

        self.stat.reset();
    }

    fn bucket_count(&self) -> u32 {
        self.buckets.len() as u32
    }

    fn deserialize_buckets<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let found = codec::read_count(reader)?;
        let expected = self.bucket_count();

        if found != expected {
            return Err(Error::BucketMismatch { expected, found });
        }

        for bucket in &mut self.buckets {
            bucket.deserialize(reader)?;
        }

        Ok(())
    }

    fn serialize_buckets<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        codec::write_count(writer, self.bucket_count())?;

        for bucket in &mut self.buckets {
            bucket.serialize(writer)?;
        }

        Ok(())
    }
}

impl<T> Hmbt<T, Cll<T>> {
    /// Installs a new configuration word in every bucket and returns the previous one.
    pub fn set_config(&mut self, config: Config) -> Config {
        let mut old_config = Config::default();

        for bucket in &mut self.buckets {
            old_config = bucket.set_config(config);
        }

        self.stat.set_config += 1;
        old_config
    }

    /// Returns the configuration word shared by all buckets.
    pub fn get_config(&mut self) -> Config {
        self.stat.get_config += 1;
        self.buckets[0].get_config()
    }
}

impl<T, B: Bucket<T> + fmt::Debug> fmt::Debug for Hmbt<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmbt")
            .field("buckets", &self.buckets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;
    use std::cell::RefCell;

    #[derive(Debug, Element)]
    struct Record {
        #[key]
        id: u32,
    }

    fn record(id: u32) -> Record {
        Record { id }
    }

    fn callbacks(destroyed: &Rc<RefCell<Vec<u32>>>) -> Callbacks<Record> {
        let destroyed = destroyed.clone();
        Callbacks::for_element()
            .destroy(move |record: Record| destroyed.borrow_mut().push(record.id))
            .serialize(|writer, record: &Record| writer.write_all(&record.id.to_be_bytes()))
            .deserialize(|reader| {
                let mut buf = [0u8; 4];
                reader.read_exact(&mut buf)?;
                Ok(record(u32::from_be_bytes(buf)))
            })
    }

    fn iterate_ids<B: Bucket<Record>>(
        hmbt: &mut Hmbt<Record, B>,
        direction: Direction,
    ) -> Vec<u32> {
        let mut ids = Vec::new();
        hmbt.rewind(direction);

        while let Some(record) = hmbt.iterate() {
            ids.push(record.id);
        }

        ids
    }

    fn bucket_ids(bucket: &Cll<Record>) -> Vec<u32> {
        bucket.iter().map(|record| record.id).collect()
    }

    #[test]
    fn test_callbacks_required() {
        let result = HmbtCll::<u32>::new(Callbacks::<u32>::new().destroy(drop), 11);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let result = HmbtCll::<u32>::new(Callbacks::<u32>::new().hash(|id| *id), 11);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let callbacks = Callbacks::<u32>::new().hash(|id| *id).destroy(drop);
        let result = HmbtBst::<u32>::new(callbacks, 11);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_default_buckets() {
        let destroyed = Rc::default();
        let hmbt = HmbtCll::new(callbacks(&destroyed), 0).unwrap();
        assert_eq!(hmbt.buckets().len(), DEFAULT_BUCKETS as usize);
    }

    #[test]
    fn test_partition() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 11).unwrap();

        for id in [0, 11, 22, 3] {
            hmbt.insert(record(id)).unwrap();
        }

        assert_eq!(bucket_ids(&hmbt.buckets()[0]), [22, 11, 0]);
        assert_eq!(bucket_ids(&hmbt.buckets()[3]), [3]);
        assert_eq!(hmbt.count(), 4);

        let stat = hmbt.stat();
        assert_eq!(stat.insert, 4);
        assert_eq!(stat.elem_count_cur, 4);
        assert_eq!(stat.node_elem_count[0], 3);
        assert_eq!(stat.node_elem_count[3], 1);
        assert_eq!(stat.node_elem_count_min, 0);
        assert_eq!(stat.node_elem_count_max, 3);
        assert!((stat.node_elem_count_avg - 4.0 / 11.0).abs() < f32::EPSILON);
        assert_eq!(stat.count, 1);

        let ids = iterate_ids(&mut hmbt, Direction::Forward);
        assert_eq!(ids, [22, 11, 0, 3]);

        let ids = iterate_ids(&mut hmbt, Direction::Reverse);
        assert_eq!(ids, [3, 0, 11, 22]);
    }

    #[test]
    fn test_dispatch() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 5).unwrap();

        for id in 0..20 {
            hmbt.insert(record(id)).unwrap();
        }

        assert_eq!(hmbt.search(&record(7)).unwrap().id, 7);
        assert!(hmbt.search(&record(70)).is_none());
        hmbt.delete(&record(7)).unwrap();
        assert!(matches!(hmbt.delete(&record(7)), Err(Error::NotFound)));
        assert_eq!(hmbt.pope(&record(8)).unwrap().id, 8);
        assert!(hmbt.pope(&record(8)).is_none());
        assert_eq!(*destroyed.borrow(), [7]);

        // Bucket 2 holds 17, 12, 2 from head to tail after 7 was deleted.
        assert_eq!(hmbt.poph_elem(&record(22)).unwrap().id, 17);
        assert_eq!(hmbt.poph_index(2).unwrap().id, 12);
        assert!(hmbt.poph_index(5).is_none());
        assert_eq!(hmbt.len(), 16);

        let stat = hmbt.stat();
        assert_eq!(stat.search, 1);
        assert_eq!(stat.search_nf, 1);
        assert_eq!(stat.del, 1);
        assert_eq!(stat.del_nf, 1);
        assert_eq!(stat.pope, 1);
        assert_eq!(stat.pope_nf, 1);
        assert_eq!(stat.poph_elem, 1);
        assert_eq!(stat.poph_index, 1);
        assert_eq!(stat.poph_index_nf, 1);
        assert_eq!(stat.elem_count_max, 20);
    }

    #[test]
    fn test_delete_while_iterating() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 3).unwrap();

        for id in 0..9 {
            hmbt.insert(record(id)).unwrap();
        }

        let mut seen = Vec::new();
        hmbt.rewind(Direction::Forward);

        while let Some(id) = hmbt.iterate().map(|record| record.id) {
            seen.push(id);
            hmbt.delete(&record(id)).unwrap();
        }

        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
        assert!(hmbt.is_empty());
    }

    #[test]
    fn test_iterate_empty() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 4).unwrap();

        assert!(hmbt.iterate().is_none());
        assert!(iterate_ids(&mut hmbt, Direction::Reverse).is_empty());
        assert!(hmbt.iterate().is_none());
        assert_eq!(hmbt.stat().iterate, 3);
    }

    #[test]
    fn test_config_lockstep() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 4).unwrap();

        let old = hmbt.set_config(Config::SEARCH_FORWARD | Config::INSERT_SORTED);
        assert_eq!(old, Config::default());
        assert_eq!(
            hmbt.get_config(),
            Config::SEARCH_FORWARD | Config::INSERT_SORTED
        );

        for id in [9, 1, 5, 13] {
            hmbt.insert(record(id)).unwrap();
        }
        assert_eq!(bucket_ids(&hmbt.buckets()[1]), [1, 5, 9, 13]);

        let stat = hmbt.stat();
        assert_eq!(stat.set_config, 1);
        assert_eq!(stat.get_config, 1);
    }

    #[test]
    fn test_collapse() {
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 7).unwrap();

        for id in 0..10 {
            hmbt.insert(record(id)).unwrap();
        }

        hmbt.collapse();
        hmbt.collapse();

        assert_eq!(hmbt.count(), 0);
        assert_eq!(destroyed.borrow().len(), 10);
        assert_eq!(hmbt.stat().collapse, 2);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 11).unwrap();

        for id in 0..50 {
            hmbt.insert(record(id * 7)).unwrap();
        }

        let mut buf = Vec::new();
        hmbt.serialize(&mut buf).unwrap();
        assert_eq!(buf[..4], [0, 0, 0, 11]);

        let mut copy = HmbtCll::new(callbacks(&destroyed), 11).unwrap();
        copy.deserialize(buf.as_slice()).unwrap();

        assert_eq!(copy.count(), 50);
        for (original, restored) in hmbt.buckets().iter().zip(copy.buckets()) {
            assert_eq!(bucket_ids(original), bucket_ids(restored));
        }

        assert_eq!(hmbt.stat().serialize, 1);
        assert_eq!(copy.stat().unserialize, 1);
    }

    #[test]
    fn test_deserialize_bucket_mismatch() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 3).unwrap();
        hmbt.insert(record(1)).unwrap();

        let mut buf = Vec::new();
        hmbt.serialize(&mut buf).unwrap();

        let mut copy = HmbtCll::new(callbacks(&destroyed), 5).unwrap();
        assert!(matches!(
            copy.deserialize(buf.as_slice()),
            Err(Error::BucketMismatch {
                expected: 5,
                found: 3
            })
        ));
        assert!(copy.is_empty());
        assert_eq!(copy.stat().unserialize_err, 1);
    }

    #[test]
    fn test_bst_buckets() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtBst::new(callbacks(&destroyed), 4).unwrap();

        for id in [12, 4, 8, 0, 5, 1] {
            hmbt.insert(record(id)).unwrap();
        }

        // Bucket 0 is ordered, bucket 1 as well.
        assert_eq!(
            iterate_ids(&mut hmbt, Direction::Forward),
            [0, 4, 8, 12, 1, 5]
        );
        assert_eq!(
            iterate_ids(&mut hmbt, Direction::Reverse),
            [5, 1, 12, 8, 4, 0]
        );

        assert_eq!(hmbt.poph_index(0).unwrap().id, 0);
        assert_eq!(hmbt.search(&record(8)).unwrap().id, 8);

        let mut buf = Vec::new();
        hmbt.serialize(&mut buf).unwrap();

        let mut copy = HmbtBst::new(callbacks(&destroyed), 4).unwrap();
        copy.deserialize(buf.as_slice()).unwrap();
        assert_eq!(
            iterate_ids(&mut copy, Direction::Forward),
            [4, 8, 12, 1, 5]
        );
    }

    #[test]
    fn test_stat_reset() {
        let destroyed = Rc::default();
        let mut hmbt = HmbtCll::new(callbacks(&destroyed), 2).unwrap();
        hmbt.insert(record(1)).unwrap();
        hmbt.poph_index(0);
        hmbt.stat_reset();

        let stat = hmbt.stat();
        assert_eq!(stat.insert, 0);
        assert_eq!(stat.poph_index_nf, 0);
        assert_eq!(stat.elem_count_cur, 1);
        assert_eq!(stat.node_elem_count, vec![0, 1]);
        assert_eq!(stat.stat, 1);
    }
}
