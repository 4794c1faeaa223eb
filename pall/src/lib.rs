// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Portable abstracted linked lists.
//!
//! This crate provides a family of in-memory containers that share one operational surface:
//!
//! * [`Cll`](cll::Cll), a circular doubly linked list with configurable insertion and search
//!   disciplines (including LRU move-to-front) and a cursor-safe iteration bookmark.
//! * [`Queue`](queue::Queue) in its [`Fifo`](queue::Fifo) and [`Lifo`](queue::Lifo) flavors,
//!   built on top of a [`Cll`](cll::Cll) with a fixed insertion discipline.
//! * [`Bst`](bst::Bst), an unbalanced binary search tree.
//! * [`Hmbt`](hmbt::Hmbt), a fixed array of [`Cll`](cll::Cll) or [`Bst`](bst::Bst) buckets
//!   selected by `hash(element) % N`.
//!
//! All containers store opaque payloads and delegate comparison, destruction, hashing and
//! (de)serialization to the [`Callbacks`] supplied at construction time.
//! A container owns a payload from a successful insert until it is handed back by a pop
//! operation, or until it is passed to the destroy callback by a delete, a collapse or the
//! container being dropped.

// Required for deriving our traits when testing.
#[cfg(test)]
extern crate self as pall;

pub mod bst;
pub mod cll;
mod codec;
mod error;
pub mod hmbt;
mod memory;
mod private;
pub mod queue;
mod stat;
mod traits;

pub use error::*;
pub use stat::*;
pub use traits::*;
