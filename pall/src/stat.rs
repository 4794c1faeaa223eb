// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Operation counters of a [`Cll`] or [`Bst`] handler.
///
/// Every counter is monotonically non-decreasing until the handler's `stat_reset` zeroes it.
/// `elem_count_cur` is refreshed from the live element count whenever `stat` is called, and
/// `elem_count_max` is the high watermark of the element count since the last reset.
///
/// [`Bst`]: crate::bst::Bst
/// [`Cll`]: crate::cll::Cll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stat {
    pub insert: u64,
    pub insert_err: u64,
    pub del: u64,
    pub del_nf: u64,
    pub search: u64,
    pub search_nf: u64,
    pub serialize: u64,
    pub serialize_err: u64,
    pub unserialize: u64,
    pub unserialize_err: u64,
    pub stat: u64,
    pub count: u64,
    pub pope: u64,
    pub pope_nf: u64,
    pub poph: u64,
    pub poph_nf: u64,
    pub collapse: u64,
    pub iterate: u64,
    pub rewind: u64,
    pub set_config: u64,
    pub get_config: u64,

    pub elem_count_cur: u64,
    pub elem_count_max: u64,
}

impl Stat {
    /// Records a successful insertion that brought the element count to `count`.
    pub(crate) fn record_insert(&mut self, count: u32) {
        self.insert += 1;
        self.elem_count_max = self.elem_count_max.max(u64::from(count));
    }

    /// Refreshes `elem_count_cur` and accounts for the `stat` call itself.
    pub(crate) fn snapshot(&mut self, count: u32) -> &Self {
        self.elem_count_cur = u64::from(count);
        self.stat += 1;
        self
    }
}

/// Operation counters of a [`Queue`].
///
/// All fields except `stat` are projected from the counters of the underlying list:
/// `push`/`push_err` mirror its insertions and `pop`/`pop_nf` its head removals.
///
/// [`Queue`]: crate::queue::Queue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStat {
    pub push: u64,
    pub push_err: u64,
    pub pop: u64,
    pub pop_nf: u64,
    pub serialize: u64,
    pub serialize_err: u64,
    pub unserialize: u64,
    pub unserialize_err: u64,
    pub stat: u64,
    pub count: u64,
    pub collapse: u64,
    pub iterate: u64,
    pub rewind: u64,

    pub elem_count_cur: u64,
    pub elem_count_max: u64,
}

impl QueueStat {
    /// Refreshes all projected fields from the counters of the underlying list.
    pub(crate) fn project(&mut self, inner: &Stat) {
        self.push = inner.insert;
        self.push_err = inner.insert_err;
        self.pop = inner.poph;
        self.pop_nf = inner.poph_nf;
        self.serialize = inner.serialize;
        self.serialize_err = inner.serialize_err;
        self.unserialize = inner.unserialize;
        self.unserialize_err = inner.unserialize_err;
        self.count = inner.count;
        self.collapse = inner.collapse;
        self.iterate = inner.iterate;
        self.rewind = inner.rewind;
        self.elem_count_cur = inner.elem_count_cur;
        self.elem_count_max = inner.elem_count_max;
    }
}

/// Operation counters of an [`Hmbt`] composite.
///
/// `insert` through `pope_nf` as well as `elem_count_cur` and `elem_count_max` are sums over
/// all buckets, recomputed by every `stat` call.
/// The remaining counters account for operations on the composite itself.
///
/// `node_elem_count` holds the element count of every bucket, and `node_elem_count_min`,
/// `node_elem_count_avg` and `node_elem_count_max` summarize how evenly the hash spreads the
/// elements.
///
/// [`Hmbt`]: crate::hmbt::Hmbt
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HmbtStat {
    pub insert: u64,
    pub insert_err: u64,
    pub del: u64,
    pub del_nf: u64,
    pub search: u64,
    pub search_nf: u64,
    pub pope: u64,
    pub pope_nf: u64,

    pub serialize: u64,
    pub serialize_err: u64,
    pub unserialize: u64,
    pub unserialize_err: u64,
    pub stat: u64,
    pub count: u64,
    pub poph_elem: u64,
    pub poph_elem_nf: u64,
    pub poph_index: u64,
    pub poph_index_nf: u64,
    pub collapse: u64,
    pub iterate: u64,
    pub rewind: u64,
    pub set_config: u64,
    pub get_config: u64,

    pub elem_count_cur: u64,
    pub elem_count_max: u64,

    pub node_elem_count_min: u64,
    pub node_elem_count_avg: f32,
    pub node_elem_count_max: u64,
    pub node_elem_count: Vec<u64>,
}

impl HmbtStat {
    pub(crate) fn with_buckets(buckets: usize) -> Self {
        Self {
            node_elem_count: vec![0; buckets],
            ..Default::default()
        }
    }

    /// Zeroes the fields that [`HmbtStat::accumulate`] recomputes.
    pub(crate) fn clear_aggregates(&mut self) {
        self.insert = 0;
        self.insert_err = 0;
        self.del = 0;
        self.del_nf = 0;
        self.search = 0;
        self.search_nf = 0;
        self.pope = 0;
        self.pope_nf = 0;
        self.elem_count_cur = 0;
        self.elem_count_max = 0;
        self.node_elem_count_min = u64::MAX;
        self.node_elem_count_avg = 0.0;
        self.node_elem_count_max = 0;
        self.node_elem_count.iter_mut().for_each(|count| *count = 0);
    }

    /// Adds the counters of bucket `index` holding `len` elements.
    pub(crate) fn accumulate(&mut self, index: usize, bucket: &Stat, len: u32) {
        self.insert += bucket.insert;
        self.insert_err += bucket.insert_err;
        self.del += bucket.del;
        self.del_nf += bucket.del_nf;
        self.search += bucket.search;
        self.search_nf += bucket.search_nf;
        self.pope += bucket.pope;
        self.pope_nf += bucket.pope_nf;
        self.elem_count_cur += bucket.elem_count_cur;
        self.elem_count_max += bucket.elem_count_max;

        let len = u64::from(len);
        self.node_elem_count[index] = len;
        self.node_elem_count_min = self.node_elem_count_min.min(len);
        self.node_elem_count_max = self.node_elem_count_max.max(len);
    }

    pub(crate) fn reset(&mut self) {
        let buckets = self.node_elem_count.len();
        *self = Self::with_buckets(buckets);
    }
}
