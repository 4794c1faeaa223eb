// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallible node allocation.
//!
//! `Box::new` aborts the process when the allocator fails, but insertions must
//! report an out-of-memory condition to the caller instead.
//! These helpers allocate through the global allocator directly and hand out raw pointers
//! compatible with `Box::from_raw`.

use std::alloc::{self, Layout};
use std::ptr;

use crate::error::{Error, Result};

/// Moves `value` to a fresh heap allocation and returns the pointer to it.
///
/// On allocation failure, `value` is dropped and [`Error::OutOfMemory`] is returned.
pub(crate) fn alloc_node<N>(value: N) -> Result<*mut N> {
    let layout = Layout::new::<N>();
    if layout.size() == 0 {
        return Ok(Box::into_raw(Box::new(value)));
    }

    // SAFETY: The layout has a non-zero size.
    let raw = unsafe { alloc::alloc(layout) }.cast::<N>();
    if raw.is_null() {
        return Err(Error::OutOfMemory);
    }

    // SAFETY: `raw` is a fresh, properly aligned allocation for exactly one `N`.
    unsafe { ptr::write(raw, value) };
    Ok(raw)
}

/// Releases an allocation made by [`alloc_node`] and returns the value stored in it.
///
/// # Safety
///
/// `node` must come from [`alloc_node`] and must not be used afterwards.
pub(crate) unsafe fn free_node<N>(node: *mut N) -> N {
    // The allocation was made with the global allocator and `Layout::new::<N>()`, which is
    // exactly what `Box` uses.
    *Box::from_raw(node)
}
