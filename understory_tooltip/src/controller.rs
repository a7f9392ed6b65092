// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared controller between many anchors and the single overlay.
//!
//! ## Lifecycle
//!
//! A [`Controller`] starts inert. [`Controller::bind`] mounts the one overlay and
//! attaches the viewport scroll listener; [`Controller::unbind`] hands the overlay back,
//! detaches that listener, and forgets the active anchor. Rebinding afterwards starts
//! from a clean state. Pushing anything while unbound is reported as
//! [`TooltipError::NotMounted`].
//!
//! ## Ownership
//!
//! At most one anchor owns the overlay at a time. [`Controller::activate`] transfers
//! ownership unconditionally; [`Controller::deactivate_if_owner`] only hides the overlay
//! if the caller still owns it, so a late leave from a previous owner is harmless.
//!
//! ## Layout
//!
//! Every base placement push marks a layout read as pending. Once the host has laid the
//! overlay out it calls [`Controller::after_layout`] with the measured text box, which
//! runs [`correct_placement`] and pushes the corrections. Corrections do not mark a new
//! read as pending, so the pass runs at most once per base push.

use core::fmt::Debug;

use kurbo::Rect;

use crate::error::TooltipError;
use crate::geometry::DeviceClass;
use crate::host::{EventSource, Geometry};
use crate::overlay::Overlay;
use crate::position::{Placement, PlacementResult, PointerStyle, TextOffset, correct_placement};
use crate::scroll::ScrollRegistry;
use crate::types::ScrollContainer;

/// Owned singleton mediating between anchors and the overlay.
pub struct Controller<K, O> {
    device: DeviceClass,
    overlay: Option<O>,
    active: Option<K>,
    hovering: bool,
    layout_pending: bool,
    scroll: ScrollRegistry<K>,
}

impl<K: Debug, O> Debug for Controller<K, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("device", &self.device)
            .field("bound", &self.overlay.is_some())
            .field("active", &self.active)
            .field("hovering", &self.hovering)
            .field("layout_pending", &self.layout_pending)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Debug, O: Overlay> Controller<K, O> {
    /// Create an unbound controller for `device`.
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            overlay: None,
            active: None,
            hovering: false,
            layout_pending: false,
            scroll: ScrollRegistry::new(),
        }
    }

    /// Device class anchors use to pick their listeners.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Mount `overlay`.
    ///
    /// Fails with [`TooltipError::AlreadyMounted`] if an overlay is already bound; the
    /// bound overlay is kept and `overlay` is dropped.
    pub fn bind(
        &mut self,
        events: &mut impl EventSource<K>,
        overlay: O,
    ) -> Result<(), TooltipError> {
        if self.overlay.is_some() {
            tracing::error!("tooltip overlay can only be mounted once");
            return Err(TooltipError::AlreadyMounted);
        }
        self.reset();
        self.overlay = Some(overlay);
        self.scroll.register(ScrollContainer::Viewport, events);
        tracing::debug!("tooltip overlay mounted");
        Ok(())
    }

    /// Unmount the overlay and return it. No-op if nothing is bound.
    pub fn unbind(&mut self, events: &mut impl EventSource<K>) -> Option<O> {
        let overlay = self.overlay.take()?;
        self.scroll.unregister(ScrollContainer::Viewport, events);
        self.reset();
        tracing::debug!("tooltip overlay unmounted");
        Some(overlay)
    }

    /// Returns true if an overlay is bound.
    pub fn is_bound(&self) -> bool {
        self.overlay.is_some()
    }

    /// The bound overlay, if any.
    pub fn overlay(&self) -> Option<&O> {
        self.overlay.as_ref()
    }

    /// The bound overlay, if any.
    pub fn overlay_mut(&mut self) -> Option<&mut O> {
        self.overlay.as_mut()
    }

    /// Anchor currently driving the overlay.
    pub fn active_anchor(&self) -> Option<K> {
        self.active
    }

    /// Returns true if the overlay should be visible.
    pub fn is_visible(&self) -> bool {
        self.hovering
    }

    /// Returns true if a base placement was pushed and not yet corrected.
    pub fn needs_layout(&self) -> bool {
        self.layout_pending
    }

    /// Scroll containers with a live listener.
    pub fn scroll_registry(&self) -> &ScrollRegistry<K> {
        &self.scroll
    }

    pub(crate) fn scroll_registry_mut(&mut self) -> &mut ScrollRegistry<K> {
        &mut self.scroll
    }

    /// Make `node` the owner and show `text` above it.
    ///
    /// Clears any correction left over from a previous activation. A detached `node`
    /// is ignored.
    pub fn activate(
        &mut self,
        geometry: &impl Geometry<K>,
        node: K,
        text: &str,
    ) -> Result<(), TooltipError> {
        let overlay = self.slots()?;
        let Some(rect) = geometry.rect_of(&node) else {
            tracing::debug!(?node, "ignoring activation of detached anchor");
            return Ok(());
        };
        overlay.set_text(text);
        Self::push_base(overlay, Placement::above(rect, geometry.viewport()));
        self.active = Some(node);
        self.hovering = true;
        self.layout_pending = true;
        tracing::debug!(?node, "tooltip activated");
        Ok(())
    }

    /// Hide the overlay if `node` still owns it. Returns true if it did.
    pub fn deactivate_if_owner(&mut self, node: K) -> bool {
        if !self.hovering || self.active != Some(node) {
            return false;
        }
        self.active = None;
        self.hovering = false;
        self.layout_pending = false;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_placement(Placement::Hidden);
        }
        tracing::debug!(?node, "tooltip deactivated");
        true
    }

    /// Scroll handler shared by every scroll listener.
    ///
    /// Re-reads the owner's rectangle and pushes a fresh, uncorrected placement.
    pub fn on_scroll(&mut self, geometry: &impl Geometry<K>) -> Result<(), TooltipError> {
        let Some(node) = self.active.filter(|_| self.hovering) else {
            return Ok(());
        };
        let Some(rect) = geometry.rect_of(&node) else {
            self.deactivate_if_owner(node);
            return Ok(());
        };
        let overlay = self.slots()?;
        Self::push_base(overlay, Placement::above(rect, geometry.viewport()));
        self.layout_pending = true;
        tracing::trace!(?node, "placement refreshed after scroll");
        Ok(())
    }

    /// Post-layout correction pass.
    ///
    /// `text_box` is the rendered text box in viewport coordinates. Does nothing unless
    /// a base placement push is pending. Returns the corrections that were pushed.
    pub fn after_layout(
        &mut self,
        geometry: &impl Geometry<K>,
        text_box: Rect,
    ) -> Result<PlacementResult, TooltipError> {
        if !core::mem::take(&mut self.layout_pending) {
            return Ok(PlacementResult::default());
        }
        let Some(node) = self.active.filter(|_| self.hovering) else {
            return Ok(PlacementResult::default());
        };
        let Some(anchor) = geometry.rect_of(&node) else {
            return Ok(PlacementResult::default());
        };
        let overlay = self.slots()?;
        let result = correct_placement(text_box, anchor, geometry.viewport(), overlay.config());
        if let Some(placement) = result.placement {
            overlay.amend_placement(placement);
        }
        if let Some(offset) = result.text_offset {
            overlay.set_text_offset(offset);
        }
        if let Some(pointer) = result.pointer {
            overlay.set_pointer_style(pointer);
        }
        if !result.is_empty() {
            tracing::trace!(?node, ?result, "placement corrected");
        }
        Ok(result)
    }

    fn push_base(overlay: &mut O, placement: Placement) {
        overlay.set_text_offset(TextOffset::default());
        overlay.set_pointer_style(PointerStyle::default());
        overlay.set_placement(placement);
    }

    fn slots(&mut self) -> Result<&mut O, TooltipError> {
        match self.overlay.as_mut() {
            Some(overlay) => Ok(overlay),
            None => {
                tracing::error!("tooltip overlay has not been mounted yet");
                Err(TooltipError::NotMounted)
            }
        }
    }

    fn reset(&mut self) {
        self.active = None;
        self.hovering = false;
        self.layout_pending = false;
    }
}
