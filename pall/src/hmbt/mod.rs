// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hashed multi-bucket containers.
//!
//! An [`Hmbt`] spreads its elements over a fixed number of [`Cll`](crate::cll::Cll) or
//! [`Bst`](crate::bst::Bst) buckets, keeping every bucket short as long as the hash callback
//! distributes well.
//!
//! ```
//! use pall::hmbt::HmbtCll;
//! use pall::{Callbacks, Direction};
//!
//! let callbacks = Callbacks::<u32>::new()
//!     .compare(|a, b| a.cmp(b))
//!     .destroy(drop)
//!     .hash(|id| *id);
//! let mut hmbt = HmbtCll::new(callbacks, 11).unwrap();
//!
//! for id in [0, 11, 22, 3] {
//!     hmbt.insert(id).unwrap();
//! }
//!
//! assert_eq!(hmbt.buckets()[0].len(), 3);
//! assert_eq!(hmbt.stat().node_elem_count[3], 1);
//!
//! hmbt.rewind(Direction::Forward);
//! assert_eq!(hmbt.iterate(), Some(&22));
//! ```

mod bucket;
mod handler;

pub use bucket::Bucket;
pub use handler::*;
