// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborator traits.
//!
//! The tooltip does not own a visual tree. It needs three things from whoever does:
//! - the current viewport rectangle of an anchor ([`Geometry`]),
//! - parent links and scroll-container flags ([`ScrollLookup`]),
//! - a way to attach and detach low-level listeners ([`EventSource`]).
//!
//! [`Host`] bundles all three and is implemented automatically.
//! See [`Scene`](crate::scene::Scene) for an in-memory implementation.

use kurbo::{Rect, Size};

use crate::types::{EventKind, EventTarget, ListenOptions, ParentLookup};

/// Viewport-relative geometry of live nodes.
pub trait Geometry<K> {
    /// Current bounding rectangle of `node` in viewport coordinates.
    ///
    /// Returns `None` when the node is no longer attached.
    fn rect_of(&self, node: &K) -> Option<Rect>;

    /// Size of the viewport.
    fn viewport(&self) -> Size;
}

/// Parent links plus knowledge of which nodes scroll their content.
pub trait ScrollLookup<K>: ParentLookup<K> {
    /// Returns true if `node` is a scroll container.
    fn is_scroll_container(&self, node: &K) -> bool;
}

/// Attach and detach low-level input listeners.
///
/// A listener is identified by `(target, kind, options)`. Listening twice with the
/// same identity must be a no-op, and unlistening an unknown identity must be a no-op.
pub trait EventSource<K> {
    /// Attach a listener.
    fn listen(&mut self, target: EventTarget<K>, kind: EventKind, options: ListenOptions);

    /// Detach a listener.
    fn unlisten(&mut self, target: EventTarget<K>, kind: EventKind, options: ListenOptions);
}

/// Everything the tooltip needs from its host.
pub trait Host<K>: Geometry<K> + ScrollLookup<K> + EventSource<K> {}

impl<K, T> Host<K> for T where T: Geometry<K> + ScrollLookup<K> + EventSource<K> {}
