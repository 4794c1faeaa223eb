// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io;

use thiserror::Error;

/// Errors reported by the containers of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A callback required by the container is missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A node or the bucket array could not be allocated.
    #[error("out of memory")]
    OutOfMemory,

    /// No element compares equal to the given key.
    ///
    /// This is an expected outcome rather than a failure, but it is still accounted for in the
    /// `*_nf` statistics counters.
    #[error("element not found")]
    NotFound,

    /// The operation requires a callback that was not supplied.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A serialized composite was written with a different bucket count.
    #[error("bucket count mismatch: expected {expected}, found {found}")]
    BucketMismatch { expected: u32, found: u32 },

    /// The reader or writer passed to a codec operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
