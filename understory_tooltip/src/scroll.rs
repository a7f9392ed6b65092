// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-counted scroll listeners.
//!
//! Many anchors usually share a handful of scroll containers. The registry keeps exactly
//! one scroll listener per distinct container and counts how many registrations share it.
//!
//! Invariant: a container has a live scroll listener iff it has an entry here. The entry
//! is created with a count of `1` and removed, detaching the listener, when the last
//! registration goes away.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::host::EventSource;
use crate::types::{EventKind, ListenOptions, ScrollContainer};

/// Scroll containers with live listeners and the number of registrations sharing each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollRegistry<K> {
    entries: Vec<(ScrollContainer<K>, u32)>,
}

impl<K> Default for ScrollRegistry<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Debug> ScrollRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `container`.
    ///
    /// Attaches the scroll listener on first registration. Returns true if a listener
    /// was attached.
    pub fn register(
        &mut self,
        container: ScrollContainer<K>,
        events: &mut impl EventSource<K>,
    ) -> bool {
        if let Some((_, count)) = self.entries.iter_mut().find(|(c, _)| *c == container) {
            *count += 1;
            tracing::trace!(?container, count = *count, "scroll container shared");
            return false;
        }
        events.listen(container.target(), EventKind::Scroll, ListenOptions::empty());
        self.entries.push((container, 1));
        tracing::trace!(?container, "scroll listener attached");
        true
    }

    /// Drop one registration of `container`.
    ///
    /// Detaches the listener when the last registration goes away. Unknown containers
    /// are ignored. Returns true if a listener was detached.
    pub fn unregister(
        &mut self,
        container: ScrollContainer<K>,
        events: &mut impl EventSource<K>,
    ) -> bool {
        let Some(i) = self.entries.iter().position(|(c, _)| *c == container) else {
            return false;
        };
        let count = &mut self.entries[i].1;
        if *count > 1 {
            *count -= 1;
            tracing::trace!(?container, count = *count, "scroll container released");
            return false;
        }
        self.entries.swap_remove(i);
        events.unlisten(container.target(), EventKind::Scroll, ListenOptions::empty());
        tracing::trace!(?container, "scroll listener detached");
        true
    }

    /// Number of registrations sharing `container`, or `0` if it has no listener.
    pub fn count(&self, container: ScrollContainer<K>) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == container)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Returns true if `container` currently has a scroll listener.
    pub fn contains(&self, container: ScrollContainer<K>) -> bool {
        self.count(container) > 0
    }

    /// Number of containers with a live listener.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate containers with a live listener.
    pub fn containers(&self) -> impl Iterator<Item = ScrollContainer<K>> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }
}
