// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-in-first-out and last-in-first-out queues.
//!
//! Both flavors are thin wrappers around a [`Cll`](crate::cll::Cll) without a compare callback,
//! which pins the insertion discipline and pops from the head.
//!
//! ```
//! use pall::queue::FifoQueue;
//! use pall::Callbacks;
//!
//! let mut queue = FifoQueue::new(Callbacks::new().destroy(drop)).unwrap();
//! queue.push('A').unwrap();
//! queue.push('B').unwrap();
//!
//! assert_eq!(queue.pop(), Some('A'));
//! assert_eq!(queue.pop(), Some('B'));
//! assert_eq!(queue.pop(), None);
//! ```

mod handler;

pub use handler::*;

use crate::cll::Config;
use crate::private::Sealed;

/// Designates the pop order of a [`Queue`].
///
/// This trait is sealed and implemented by [`Fifo`] and [`Lifo`] only.
pub trait QueueType: Sealed {
    /// The list configuration realizing the pop order.
    const CONFIG: Config;
}

/// Type parameter for a [`Queue`] that pops the oldest element first.
#[derive(Debug)]
pub enum Fifo {}

impl Sealed for Fifo {}

impl QueueType for Fifo {
    const CONFIG: Config = Config::INSERT_TAIL;
}

/// Type parameter for a [`Queue`] that pops the newest element first.
#[derive(Debug)]
pub enum Lifo {}

impl Sealed for Lifo {}

impl QueueType for Lifo {
    const CONFIG: Config = Config::INSERT_HEAD;
}

/// A queue popping the oldest element first.
pub type FifoQueue<T> = Queue<T, Fifo>;

/// A queue popping the newest element first.
pub type LifoQueue<T> = Queue<T, Lifo>;
