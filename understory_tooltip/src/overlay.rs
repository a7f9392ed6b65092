// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay side of the contract: the push slots the controller drives, the
//! cosmetic configuration, and a headless [`OverlayModel`].
//!
//! ## Two placements
//!
//! An overlay tracks a *base* placement and an *effective* one.
//! [`Overlay::set_placement`] replaces both and is what schedules a layout read.
//! [`Overlay::amend_placement`] only replaces the effective placement; it is how the
//! positioning pass applies a correction without scheduling another pass.

use alloc::string::String;
use kurbo::{Rect, Size};

use crate::position::{Placement, PointerStyle, TextOffset};

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Construct from components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Static, per-overlay cosmetics.
///
/// Only `corner_radius` and the pointer size affect positioning; the rest is handed
/// to whatever draws the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Fill of the text box and pointer.
    pub background: Rgba8,
    /// Corner radius of the text box. Feeds [`safe_offset_x`](crate::position::safe_offset_x).
    pub corner_radius: f64,
    /// Stacking order above ordinary content.
    pub z_index: i32,
    /// Padding between the outer box and its contents.
    pub offset: f64,
    /// Padding inside the text box.
    pub text_padding: f64,
    /// Font size of the label.
    pub font_size: f64,
    /// Maximum width of the text box.
    pub max_width: f64,
    /// Label color.
    pub text_color: Rgba8,
    /// Width of the pointer graphic, unrotated.
    pub pointer_width: f64,
    /// Height of the pointer graphic, unrotated.
    pub pointer_height: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            background: Rgba8::new(0, 0, 0, 204),
            corner_radius: 12.0,
            z_index: 99,
            offset: 4.0,
            text_padding: 8.0,
            font_size: 14.0,
            max_width: 320.0,
            text_color: Rgba8::new(255, 255, 255, 255),
            pointer_width: 20.0,
            pointer_height: 7.0,
        }
    }
}

/// Push slots bound into the [`Controller`](crate::controller::Controller) when the
/// single overlay mounts.
pub trait Overlay {
    /// Cosmetic configuration of this overlay.
    fn config(&self) -> &OverlayConfig;

    /// Replace the base placement (and the effective one). Schedules a layout read.
    fn set_placement(&mut self, placement: Placement);

    /// Replace only the effective placement.
    fn amend_placement(&mut self, placement: Placement);

    /// Replace the text box nudge.
    fn set_text_offset(&mut self, offset: TextOffset);

    /// Replace the pointer style.
    fn set_pointer_style(&mut self, style: PointerStyle);

    /// Replace the label.
    fn set_text(&mut self, text: &str);
}

/// Laid-out rectangles of a visible overlay, in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayLayout {
    /// The outer, padded box.
    pub outer: Rect,
    /// The text box, after any nudge.
    pub text: Rect,
    /// The painted extent of the pointer graphic.
    pub pointer: Rect,
}

/// A headless overlay: stores what the controller pushes and lays it out.
#[derive(Clone, Debug, Default)]
pub struct OverlayModel {
    config: OverlayConfig,
    text: String,
    base: Placement,
    placement: Placement,
    text_offset: TextOffset,
    pointer: PointerStyle,
}

impl OverlayModel {
    /// Create a hidden overlay.
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Current label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placement last pushed by the controller, before corrections.
    pub fn base_placement(&self) -> Placement {
        self.base
    }

    /// Placement in effect, corrections included.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Current text box nudge.
    pub fn text_offset(&self) -> TextOffset {
        self.text_offset
    }

    /// Current pointer style.
    pub fn pointer_style(&self) -> PointerStyle {
        self.pointer
    }

    /// Returns true if the overlay is shown.
    pub fn is_visible(&self) -> bool {
        self.placement.is_visible()
    }

    /// Lay out the overlay around a measured text box of size `text_box`.
    ///
    /// Returns `None` while hidden.
    pub fn layout(&self, viewport: Size, text_box: Size) -> Option<OverlayLayout> {
        let o = self.config.offset;
        let tw = text_box.width.min(self.config.max_width);
        let th = text_box.height;
        // The pointer box keeps its unrotated size; the inline margin offsets quarter turns.
        let fw = self.config.pointer_width + 2.0 * self.pointer.inline_margin;
        let fh = self.config.pointer_height;

        let (text, footprint) = match self.placement {
            Placement::Hidden => return None,
            Placement::Above { bottom, center_x } => {
                let y1 = viewport.height - bottom - o;
                let footprint = Rect::new(center_x - fw / 2.0, y1 - fh, center_x + fw / 2.0, y1);
                let text = Rect::new(
                    center_x - tw / 2.0,
                    footprint.y0 - th,
                    center_x + tw / 2.0,
                    footprint.y0,
                );
                (text, footprint)
            }
            Placement::Below { top, center_x } => {
                let y0 = top + o;
                let footprint = Rect::new(center_x - fw / 2.0, y0, center_x + fw / 2.0, y0 + fh);
                let text = Rect::new(
                    center_x - tw / 2.0,
                    footprint.y1,
                    center_x + tw / 2.0,
                    footprint.y1 + th,
                );
                (text, footprint)
            }
            Placement::RightOf { left, center_y } => {
                let x0 = left + o;
                let footprint = Rect::new(x0, center_y - fh / 2.0, x0 + fw, center_y + fh / 2.0);
                let text = Rect::new(
                    footprint.x1,
                    center_y - th / 2.0,
                    footprint.x1 + tw,
                    center_y + th / 2.0,
                );
                (text, footprint)
            }
            Placement::LeftOf { right, center_y } => {
                let x1 = viewport.width - right - o;
                let footprint = Rect::new(x1 - fw, center_y - fh / 2.0, x1, center_y + fh / 2.0);
                let text = Rect::new(
                    footprint.x0 - tw,
                    center_y - th / 2.0,
                    footprint.x0,
                    center_y + th / 2.0,
                );
                (text, footprint)
            }
        };

        let outer = text.union(footprint).inflate(o, o);
        let text = text + kurbo::Vec2::new(self.text_offset.dx, 0.0);
        let pointer = if self.pointer.direction.is_sideways() {
            Rect::from_center_size(
                footprint.center(),
                Size::new(self.config.pointer_height, self.config.pointer_width),
            )
        } else {
            footprint
        };
        Some(OverlayLayout {
            outer,
            text,
            pointer,
        })
    }
}

impl Overlay for OverlayModel {
    fn config(&self) -> &OverlayConfig {
        &self.config
    }

    fn set_placement(&mut self, placement: Placement) {
        self.base = placement;
        self.placement = placement;
    }

    fn amend_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    fn set_text_offset(&mut self, offset: TextOffset) {
        self.text_offset = offset;
    }

    fn set_pointer_style(&mut self, style: PointerStyle) {
        self.pointer = style;
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}
