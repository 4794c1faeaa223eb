// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bitflags::bitflags;

bitflags! {
    /// Configuration word of a [`Cll`](super::Cll).
    ///
    /// The word combines one insertion discipline and one search discipline.
    /// If several bits of the same axis are set, the first one in the following order wins:
    ///
    /// * Insertion: [`INSERT_TAIL`], [`INSERT_HEAD`], [`INSERT_SORTED`], [`INSERT_NEXT`],
    ///   otherwise [`INSERT_PREV`].
    /// * Search: [`SEARCH_LRU`], [`SEARCH_AUTO`], [`SEARCH_BACKWARD`], otherwise
    ///   [`SEARCH_FORWARD`].
    ///
    /// The default is `SEARCH_LRU | INSERT_HEAD`.
    ///
    /// [`INSERT_TAIL`]: Config::INSERT_TAIL
    /// [`INSERT_HEAD`]: Config::INSERT_HEAD
    /// [`INSERT_SORTED`]: Config::INSERT_SORTED
    /// [`INSERT_NEXT`]: Config::INSERT_NEXT
    /// [`INSERT_PREV`]: Config::INSERT_PREV
    /// [`SEARCH_LRU`]: Config::SEARCH_LRU
    /// [`SEARCH_AUTO`]: Config::SEARCH_AUTO
    /// [`SEARCH_BACKWARD`]: Config::SEARCH_BACKWARD
    /// [`SEARCH_FORWARD`]: Config::SEARCH_FORWARD
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Config: u32 {
        /// Walk from the cursor towards the tail.
        const SEARCH_FORWARD = 0x01;

        /// Walk from the cursor towards the head.
        const SEARCH_BACKWARD = 0x02;

        /// Pick the walking direction by comparing the cursor with the key.
        ///
        /// The decision is stored in the `SEARCH_BACKWARD` bit of the handler's configuration.
        const SEARCH_AUTO = 0x04;

        /// Walk from the head towards the tail and move every hit to the head.
        const SEARCH_LRU = 0x08;

        /// Keep the list in non-decreasing order from head to tail.
        const INSERT_SORTED = 0x10;

        /// Insert right after the cursor.
        const INSERT_NEXT = 0x20;

        /// Insert right before the cursor.
        const INSERT_PREV = 0x40;

        /// Insert as the new tail.
        const INSERT_TAIL = 0x80;

        /// Insert as the new head.
        const INSERT_HEAD = 0x100;
    }
}

impl Config {
    pub(crate) fn insert_mode(self) -> InsertMode {
        if self.contains(Self::INSERT_TAIL) {
            InsertMode::Tail
        } else if self.contains(Self::INSERT_HEAD) {
            InsertMode::Head
        } else if self.contains(Self::INSERT_SORTED) {
            InsertMode::Sorted
        } else if self.contains(Self::INSERT_NEXT) {
            InsertMode::Next
        } else {
            InsertMode::Prev
        }
    }

    pub(crate) fn search_mode(self) -> SearchMode {
        if self.contains(Self::SEARCH_LRU) {
            SearchMode::Lru
        } else if self.contains(Self::SEARCH_AUTO) {
            SearchMode::Auto
        } else if self.contains(Self::SEARCH_BACKWARD) {
            SearchMode::Backward
        } else {
            SearchMode::Forward
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::SEARCH_LRU | Self::INSERT_HEAD
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InsertMode {
    Head,
    Tail,
    Sorted,
    Next,
    Prev,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchMode {
    Lru,
    Auto,
    Backward,
    Forward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.bits(), 0x108);
        assert_eq!(config.insert_mode(), InsertMode::Head);
        assert_eq!(config.search_mode(), SearchMode::Lru);
    }

    #[test]
    fn test_insert_precedence() {
        assert_eq!(
            (Config::INSERT_HEAD | Config::INSERT_TAIL).insert_mode(),
            InsertMode::Tail
        );
        assert_eq!(
            (Config::INSERT_SORTED | Config::INSERT_HEAD).insert_mode(),
            InsertMode::Head
        );
        assert_eq!(
            (Config::INSERT_NEXT | Config::INSERT_SORTED).insert_mode(),
            InsertMode::Sorted
        );
        assert_eq!(Config::INSERT_NEXT.insert_mode(), InsertMode::Next);
        assert_eq!(Config::SEARCH_FORWARD.insert_mode(), InsertMode::Prev);
        assert_eq!(Config::empty().insert_mode(), InsertMode::Prev);
    }

    #[test]
    fn test_search_precedence() {
        assert_eq!(
            (Config::SEARCH_AUTO | Config::SEARCH_LRU).search_mode(),
            SearchMode::Lru
        );
        assert_eq!(
            (Config::SEARCH_AUTO | Config::SEARCH_BACKWARD).search_mode(),
            SearchMode::Auto
        );
        assert_eq!(Config::SEARCH_BACKWARD.search_mode(), SearchMode::Backward);
        assert_eq!(Config::INSERT_TAIL.search_mode(), SearchMode::Forward);
    }
}
