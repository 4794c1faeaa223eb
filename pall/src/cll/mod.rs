// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A circular doubly linked list with configurable insertion and search disciplines.
//!
//! ```
//! use pall::cll::{Cll, Config};
//! use pall::Callbacks;
//!
//! let callbacks = Callbacks::<u32>::new().compare(|a, b| a.cmp(b)).destroy(drop);
//! let mut list = Cll::new(callbacks).unwrap();
//!
//! for id in [10, 20, 30] {
//!     list.insert(id).unwrap();
//! }
//!
//! // The default configuration inserts at the head and moves search hits to the head.
//! assert_eq!(list.search(&10), Some(&10));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [10, 30, 20]);
//!
//! list.set_config(Config::SEARCH_FORWARD | Config::INSERT_SORTED);
//! list.insert(15).unwrap();
//! ```

mod base;
mod config;
mod handler;

pub use base::Iter;
pub use config::Config;
pub use handler::Cll;
