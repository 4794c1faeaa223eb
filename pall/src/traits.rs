// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::fmt;
use std::io::{self, Read, Write};
use std::rc::Rc;

/// Total order on payloads.
pub type CompareFn<T> = dyn Fn(&T, &T) -> Ordering;

/// Releases the resources associated with a payload owned by a container.
pub type DestroyFn<T> = dyn Fn(T);

/// Maps a payload to a bucket-selecting hash value.
pub type HashFn<T> = dyn Fn(&T) -> u32;

/// Writes the body of a single payload.
pub type SerializeFn<T> = dyn Fn(&mut dyn Write, &T) -> io::Result<()>;

/// Reads the body of a single payload.
pub type DeserializeFn<T> = dyn Fn(&mut dyn Read) -> io::Result<T>;

/// The set of caller-supplied operations a container invokes on its payloads.
///
/// Only `destroy` is mandatory for every container.
/// `compare` is needed for searching, deleting and sorted insertion, `hash` for the
/// [`Hmbt`] composites, and `serialize`/`deserialize` for the respective codec operations,
/// which fail with [`Error::Unsupported`] when their callback is absent.
///
/// The callbacks are reference-counted, so cloning a `Callbacks` is cheap and every bucket of
/// an [`Hmbt`] shares the caller's closures.
///
/// ```
/// use pall::Callbacks;
///
/// struct Item {
///     id: u32,
/// }
///
/// let callbacks = Callbacks::<Item>::new()
///     .compare(|a, b| a.id.cmp(&b.id))
///     .destroy(drop)
///     .hash(|item| item.id);
/// ```
///
/// [`Error::Unsupported`]: crate::Error::Unsupported
/// [`Hmbt`]: crate::hmbt::Hmbt
pub struct Callbacks<T> {
    pub(crate) compare: Option<Rc<CompareFn<T>>>,
    pub(crate) destroy: Option<Rc<DestroyFn<T>>>,
    pub(crate) hash: Option<Rc<HashFn<T>>>,
    pub(crate) serialize: Option<Rc<SerializeFn<T>>>,
    pub(crate) deserialize: Option<Rc<DeserializeFn<T>>>,
}

impl<T> Callbacks<T> {
    /// Creates an empty callback set.
    pub fn new() -> Self {
        Self {
            compare: None,
            destroy: None,
            hash: None,
            serialize: None,
            deserialize: None,
        }
    }

    /// Sets the comparison callback.
    pub fn compare<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.compare = Some(Rc::new(f));
        self
    }

    /// Sets the destroy callback.
    ///
    /// It is invoked exactly once for every payload that is still owned by a container when
    /// the payload is deleted, collapsed or the container is dropped.
    pub fn destroy<F>(mut self, f: F) -> Self
    where
        F: Fn(T) + 'static,
    {
        self.destroy = Some(Rc::new(f));
        self
    }

    /// Sets the hash callback.
    ///
    /// The hash must be deterministic for equal payloads, otherwise an [`Hmbt`] cannot find
    /// elements again.
    ///
    /// [`Hmbt`]: crate::hmbt::Hmbt
    pub fn hash<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> u32 + 'static,
    {
        self.hash = Some(Rc::new(f));
        self
    }

    /// Sets the callback writing the body of a single payload.
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Write, &T) -> io::Result<()> + 'static,
    {
        self.serialize = Some(Rc::new(f));
        self
    }

    /// Sets the callback reading the body of a single payload.
    pub fn deserialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut dyn Read) -> io::Result<T> + 'static,
    {
        self.deserialize = Some(Rc::new(f));
        self
    }

    /// Returns a copy of this set without the comparison callback.
    pub(crate) fn without_compare(&self) -> Self {
        Self {
            compare: None,
            ..self.clone()
        }
    }

    /// Hands a payload over to the destroy callback.
    pub(crate) fn destroy_payload(&self, data: T) {
        match &self.destroy {
            Some(destroy) => destroy(data),
            None => drop(data),
        }
    }
}

impl<T: Element + 'static> Callbacks<T> {
    /// Creates a callback set for an [`Element`] type.
    ///
    /// Comparison and hashing are taken from the [`Element`] implementation, and payloads are
    /// destroyed by dropping them.
    pub fn for_element() -> Self {
        Self::new()
            .compare(<T as Element>::compare)
            .destroy(drop)
            .hash(<T as Element>::hash)
    }
}

impl<T> Clone for Callbacks<T> {
    fn clone(&self) -> Self {
        Self {
            compare: self.compare.clone(),
            destroy: self.destroy.clone(),
            hash: self.hash.clone(),
            serialize: self.serialize.clone(),
            deserialize: self.deserialize.clone(),
        }
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("compare", &self.compare.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("hash", &self.hash.is_some())
            .field("serialize", &self.serialize.is_some())
            .field("deserialize", &self.deserialize.is_some())
            .finish()
    }
}

/// Direction of a stateful iteration started by `rewind`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Head to tail for lists, ascending order for trees, bucket 0 to N-1 for composites.
    #[default]
    Forward,
    /// The opposite of [`Direction::Forward`].
    Reverse,
}

impl Direction {
    pub(crate) fn is_reverse(self) -> bool {
        self == Direction::Reverse
    }
}

/// Designates a structure as a payload type with a built-in key.
///
/// The easiest way to implement this trait is to use `derive` and mark the key field:
///
/// ```
/// use pall::Element;
///
/// #[derive(Element)]
/// struct Item {
///     #[key]
///     id: u32,
///     name: String,
/// }
/// ```
///
/// [`Callbacks::for_element`] then builds a callback set from it.
pub trait Element {
    /// Compares the keys of two payloads.
    fn compare(&self, other: &Self) -> Ordering;

    /// Hashes the key of this payload.
    fn hash(&self) -> u32;
}

pub use pall_macros::Element;

/// Reduces a key to the 32-bit value used for bucket selection.
///
/// Integers of up to 32 bits hash to themselves, so a composite with `N` buckets places the key
/// `k` into bucket `k % N`.
pub trait KeyHash {
    fn key_hash(&self) -> u32;
}

macro_rules! impl_key_hash_narrow {
    ($($ty:ty),*) => {
        $(
            impl KeyHash for $ty {
                fn key_hash(&self) -> u32 {
                    *self as u32
                }
            }
        )*
    };
}

macro_rules! impl_key_hash_wide {
    ($($ty:ty),*) => {
        $(
            impl KeyHash for $ty {
                fn key_hash(&self) -> u32 {
                    let value = *self as u64;
                    (value ^ (value >> 32)) as u32
                }
            }
        )*
    };
}

impl_key_hash_narrow!(u8, u16, u32, i8, i16, i32);
impl_key_hash_wide!(u64, i64, usize, isize);

impl KeyHash for bool {
    fn key_hash(&self) -> u32 {
        *self as u32
    }
}

impl KeyHash for char {
    fn key_hash(&self) -> u32 {
        *self as u32
    }
}

impl KeyHash for [u8] {
    fn key_hash(&self) -> u32 {
        // 32-bit FNV-1a
        self.iter().fold(0x811c_9dc5u32, |hash, byte| {
            (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
        })
    }
}

impl KeyHash for str {
    fn key_hash(&self) -> u32 {
        self.as_bytes().key_hash()
    }
}

impl KeyHash for String {
    fn key_hash(&self) -> u32 {
        self.as_str().key_hash()
    }
}

impl<K: KeyHash + ?Sized> KeyHash for &K {
    fn key_hash(&self) -> u32 {
        (**self).key_hash()
    }
}
