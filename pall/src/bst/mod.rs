// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An unbalanced binary search tree with the same operational surface as the lists.
//!
//! ```
//! use pall::bst::Bst;
//! use pall::{Callbacks, Direction};
//!
//! let callbacks = Callbacks::<u32>::new().compare(|a, b| a.cmp(b)).destroy(drop);
//! let mut tree = Bst::new(callbacks).unwrap();
//!
//! for id in [5, 1, 3] {
//!     tree.insert(id).unwrap();
//! }
//!
//! tree.rewind(Direction::Reverse);
//! assert_eq!(tree.iterate(), Some(&5));
//! assert_eq!(tree.iterate(), Some(&3));
//! ```

mod handler;
mod tree;

pub use handler::Bst;
pub use tree::Iter;
