// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener bookkeeping and routing for hosts without a native event system.
//!
//! ## Routing
//!
//! [`ListenerTable::route`] turns an [`InputEvent`] into the ordered list of listeners
//! that fire for it:
//!
//! - `PointerEnter`, `PointerLeave`, `Scroll`: only listeners on the event's own target.
//! - `Click`: capture listeners outer→inner (window, document, then root→target),
//!   followed by bubble listeners inner→outer (target→root, document, window).
//!
//! Listeners registered with [`ListenOptions::ONCE`] are removed as they are routed.
//! The list is computed up front, so listeners added while handling an event do not
//! fire for that same event.

use alloc::vec::Vec;

use crate::types::{EventKind, EventTarget, InputEvent, ListenOptions, ParentLookup};

/// One attached listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Listener<K> {
    /// Where it is attached.
    pub target: EventTarget<K>,
    /// What it listens for.
    pub kind: EventKind,
    /// Capture/once options.
    pub options: ListenOptions,
}

/// Attached listeners, deduplicated by identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerTable<K> {
    listeners: Vec<Listener<K>>,
}

impl<K> Default for ListenerTable<K> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> ListenerTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. Returns false if an identical one is already attached.
    pub fn listen(
        &mut self,
        target: EventTarget<K>,
        kind: EventKind,
        options: ListenOptions,
    ) -> bool {
        let l = Listener {
            target,
            kind,
            options,
        };
        if self.listeners.contains(&l) {
            return false;
        }
        self.listeners.push(l);
        true
    }

    /// Detach a listener. Returns false if it was not attached.
    pub fn unlisten(
        &mut self,
        target: EventTarget<K>,
        kind: EventKind,
        options: ListenOptions,
    ) -> bool {
        let l = Listener {
            target,
            kind,
            options,
        };
        let before = self.listeners.len();
        self.listeners.retain(|x| *x != l);
        self.listeners.len() != before
    }

    /// Detach every listener on `target`.
    pub fn remove_target(&mut self, target: EventTarget<K>) {
        self.listeners.retain(|l| l.target != target);
    }

    /// Returns true if any listener of `kind` is attached to `target`.
    pub fn has(&self, target: EventTarget<K>, kind: EventKind) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.kind == kind)
    }

    /// Number of attached listeners of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    /// Total number of attached listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Iterate attached listeners in attach order.
    pub fn iter(&self) -> impl Iterator<Item = &Listener<K>> {
        self.listeners.iter()
    }

    /// Listeners that fire for `event`, in firing order.
    pub fn route(
        &mut self,
        event: &InputEvent<K>,
        parents: &impl ParentLookup<K>,
    ) -> Vec<Listener<K>> {
        let kind = event.kind();
        let mut out = Vec::new();
        match *event {
            InputEvent::PointerEnter(n) | InputEvent::PointerLeave(n) => {
                self.take(EventTarget::Node(n), kind, None, &mut out);
            }
            InputEvent::Scroll(c) => self.take(c.target(), kind, None, &mut out),
            InputEvent::Click(n) => {
                let path = path_to_root(n, parents);
                // Capture: outer→inner.
                self.take(EventTarget::Window, kind, Some(true), &mut out);
                self.take(EventTarget::Document, kind, Some(true), &mut out);
                for &p in path.iter().rev() {
                    self.take(EventTarget::Node(p), kind, Some(true), &mut out);
                }
                // Bubble: inner→outer.
                for &p in &path {
                    self.take(EventTarget::Node(p), kind, Some(false), &mut out);
                }
                self.take(EventTarget::Document, kind, Some(false), &mut out);
                self.take(EventTarget::Window, kind, Some(false), &mut out);
            }
        }
        out
    }

    fn take(
        &mut self,
        target: EventTarget<K>,
        kind: EventKind,
        capture: Option<bool>,
        out: &mut Vec<Listener<K>>,
    ) {
        let matches = |l: &Listener<K>| {
            l.target == target
                && l.kind == kind
                && capture.is_none_or(|c| l.options.contains(ListenOptions::CAPTURE) == c)
        };
        out.extend(self.listeners.iter().copied().filter(|l| matches(l)));
        self.listeners
            .retain(|l| !(matches(l) && l.options.contains(ListenOptions::ONCE)));
    }
}

/// Target→root path, target first.
fn path_to_root<K: Copy>(target: K, parents: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    // Collect to root; caller ensures acyclic ancestry.
    loop {
        out.push(cur);
        match parents.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out
}
