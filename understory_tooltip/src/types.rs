// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core event types: listener targets, event kinds, listen options, and input events.
//!
//! ## Overview
//!
//! These types describe the low-level listener protocol between the tooltip and its host.
//! The [`anchor`](crate::anchor) module asks the host to attach listeners through
//! [`EventSource`](crate::host::EventSource), and the host reports fired listeners back
//! with a [`EventTarget`] and the [`InputEvent`] that triggered them.

use bitflags::bitflags;

/// Where a listener is attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventTarget<K> {
    /// A node in the host's visual tree.
    Node(K),
    /// The document root; receives clicks from every node.
    Document,
    /// The global window; receives viewport scrolls.
    Window,
}

/// The kind of low-level input a listener reacts to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Pointer entered the node. Does not bubble.
    PointerEnter,
    /// Pointer left the node. Does not bubble.
    PointerLeave,
    /// Click or tap. Captures from the document down and bubbles back up.
    Click,
    /// Scroll of a container or the viewport. Does not bubble.
    Scroll,
}

bitflags! {
    /// Options attached to a listener registration.
    ///
    /// Together with the [`EventTarget`] and [`EventKind`] these form the identity of a
    /// listener: listening twice with the same triple is a no-op.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenOptions: u8 {
        /// Fire during the capture phase, before target and bubble listeners.
        const CAPTURE = 0b0000_0001;
        /// Remove the listener after it fires once.
        const ONCE    = 0b0000_0010;
    }
}

/// A scrollable region: either a container node or the viewport itself.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScrollContainer<K> {
    /// The global viewport.
    Viewport,
    /// A scrollable ancestor node.
    Node(K),
}

impl<K> ScrollContainer<K> {
    /// The listener target receiving scroll events for this container.
    pub fn target(self) -> EventTarget<K> {
        match self {
            Self::Viewport => EventTarget::Window,
            Self::Node(k) => EventTarget::Node(k),
        }
    }
}

/// A raw input event as seen by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputEvent<K> {
    /// The pointer entered `K`.
    PointerEnter(K),
    /// The pointer left `K`.
    PointerLeave(K),
    /// A click or tap landed on `K` (the innermost node under the pointer).
    Click(K),
    /// A scroll container (or the viewport) scrolled.
    Scroll(ScrollContainer<K>),
}

impl<K> InputEvent<K> {
    /// The listener kind this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerEnter(_) => EventKind::PointerEnter,
            Self::PointerLeave(_) => EventKind::PointerLeave,
            Self::Click(_) => EventKind::Click,
            Self::Scroll(_) => EventKind::Scroll,
        }
    }
}

/// Look up the parent of a node to walk towards the root.
///
/// Used to find an anchor's scroll container and to decide whether a click landed
/// inside an anchor's subtree.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A no‑op parent provider for flat hosts.
///
/// All calls to [`ParentLookup::parent_of`] return `None`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}
