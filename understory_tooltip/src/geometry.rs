// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless helpers: scroll-container discovery, subtree tests, and device class.

use bitflags::bitflags;

use crate::host::ScrollLookup;
use crate::types::ParentLookup;

/// Nearest scrollable ancestor of `node`, excluding `node` itself.
///
/// Returns `None` when only the viewport scrolls the node.
pub fn scroll_parent<K: Copy>(node: K, lookup: &impl ScrollLookup<K>) -> Option<K> {
    let mut cur = lookup.parent_of(&node);
    // Caller ensures acyclic ancestry.
    while let Some(p) = cur {
        if lookup.is_scroll_container(&p) {
            return Some(p);
        }
        cur = lookup.parent_of(&p);
    }
    None
}

/// Returns true if `node` is `ancestor` or one of its descendants.
pub fn is_within<K: Copy + Eq>(node: K, ancestor: K, lookup: &impl ParentLookup<K>) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == ancestor {
            return true;
        }
        cur = lookup.parent_of(&n);
    }
    false
}

bitflags! {
    /// Input capabilities reported by the platform.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DeviceCapabilities: u8 {
        /// A primary input that can hover (mouse, trackpad, stylus with hover).
        const HOVER        = 0b0000_0001;
        /// A precise pointing device.
        const FINE_POINTER = 0b0000_0010;
        /// A touch screen.
        const TOUCH        = 0b0000_0100;
    }
}

/// How anchors are activated.
///
/// Resolved once when the [`Controller`](crate::controller::Controller) is created.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DeviceClass {
    /// Show on pointer enter, hide on pointer leave.
    #[default]
    Pointer,
    /// Show on tap, hide on the next tap outside the anchor.
    Touch,
}

impl DeviceClass {
    /// Classify a device: touch-only devices (no hover) tap, everything else hovers.
    pub fn detect(caps: DeviceCapabilities) -> Self {
        if caps.contains(DeviceCapabilities::TOUCH) && !caps.contains(DeviceCapabilities::HOVER) {
            Self::Touch
        } else {
            Self::Pointer
        }
    }
}
