// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioning engine: default placement and viewport collision correction.
//!
//! ## Overview
//!
//! The overlay is first placed above its anchor, horizontally centred on it
//! ([`Placement::above`]). After that placement is laid out, the rendered text box is
//! measured and handed to [`correct_placement`], which decides whether the overlay
//! overflows the viewport and how to fix it:
//!
//! - Top overflow: flip below the anchor and turn the pointer up.
//! - Left overflow: nudge the text box right if the overflow is within
//!   [`safe_offset_x`], otherwise flip to the anchor's right side.
//! - Right overflow: the mirror image, nudging left or flipping to the left side.
//!
//! Vertical and horizontal corrections are independent and come back as separate
//! patches in a [`PlacementResult`]. A side flip replaces a vertical flip's placement
//! and pointer patches; a nudge combines with it.
//!
//! Correction is single-pass: a corrected placement is never measured again.

use kurbo::{Rect, Size};

use crate::overlay::OverlayConfig;

/// Where the overlay's outer box is pinned, in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Placement {
    /// Not shown.
    #[default]
    Hidden,
    /// Above the anchor; text on top, pointer below it pointing down.
    Above {
        /// Distance from the viewport bottom to the overlay's bottom edge.
        bottom: f64,
        /// Horizontal centre of the overlay.
        center_x: f64,
    },
    /// Below the anchor; pointer on top pointing up, text below it.
    Below {
        /// The overlay's top edge.
        top: f64,
        /// Horizontal centre of the overlay.
        center_x: f64,
    },
    /// Right of the anchor; pointer on the left pointing left.
    RightOf {
        /// The overlay's left edge.
        left: f64,
        /// Vertical centre of the overlay.
        center_y: f64,
    },
    /// Left of the anchor; pointer on the right pointing right.
    LeftOf {
        /// Distance from the viewport's right edge to the overlay's right edge.
        right: f64,
        /// Vertical centre of the overlay.
        center_y: f64,
    },
}

impl Placement {
    /// Default placement: above `anchor`, horizontally centred on it.
    pub fn above(anchor: Rect, viewport: Size) -> Self {
        Self::Above {
            bottom: viewport.height - anchor.y0,
            center_x: anchor.x0 + anchor.width() / 2.0,
        }
    }

    /// Below `anchor`, horizontally centred on it.
    pub fn below(anchor: Rect) -> Self {
        Self::Below {
            top: anchor.y1,
            center_x: anchor.x0 + anchor.width() / 2.0,
        }
    }

    /// Against the right edge of `anchor`, vertically centred on it.
    pub fn right_of(anchor: Rect) -> Self {
        Self::RightOf {
            left: anchor.x1,
            center_y: anchor.y0 + anchor.height() / 2.0,
        }
    }

    /// Against the left edge of `anchor`, vertically centred on it.
    pub fn left_of(anchor: Rect, viewport: Size) -> Self {
        Self::LeftOf {
            right: viewport.width - anchor.x0,
            center_y: anchor.y0 + anchor.height() / 2.0,
        }
    }

    /// Returns true unless [`Placement::Hidden`].
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Direction the pointer graphic points.
///
/// The graphic is drawn pointing down; other directions are rotations of it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PointerDirection {
    /// Unrotated.
    #[default]
    Down,
    /// Rotated 180°.
    Up,
    /// Rotated 90° clockwise.
    Left,
    /// Rotated 90° counter-clockwise.
    Right,
}

impl PointerDirection {
    /// Clockwise rotation applied to the graphic, in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Self::Down => 0.0,
            Self::Up => 180.0,
            Self::Left => 90.0,
            Self::Right => -90.0,
        }
    }

    /// Returns true for the quarter turns used by side placements.
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Style override for the pointer graphic.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerStyle {
    /// Rotation of the graphic.
    pub direction: PointerDirection,
    /// Margin added on both inline sides of the pointer box.
    ///
    /// A quarter turn is paint-only, so the box keeps its unrotated width; this
    /// margin shrinks it back to the rotated extent.
    pub inline_margin: f64,
}

impl PointerStyle {
    /// Pointer style for `direction` with the compensation `config` calls for.
    pub fn pointing(direction: PointerDirection, config: &OverlayConfig) -> Self {
        let inline_margin = if direction.is_sideways() {
            -(config.pointer_width - config.pointer_height) / 2.0
        } else {
            0.0
        };
        Self {
            direction,
            inline_margin,
        }
    }
}

/// Horizontal shift of the text box relative to its laid-out position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextOffset {
    /// Positive moves right.
    pub dx: f64,
}

/// Corrections computed by one positioning pass. `None` fields are left untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlacementResult {
    /// Replacement placement for the outer box.
    pub placement: Option<Placement>,
    /// Nudge for the text box.
    pub text_offset: Option<TextOffset>,
    /// Pointer rotation and compensation.
    pub pointer: Option<PointerStyle>,
}

impl PlacementResult {
    /// True if no correction is needed.
    pub fn is_empty(&self) -> bool {
        self.placement.is_none() && self.text_offset.is_none() && self.pointer.is_none()
    }
}

/// Horizontal overflow tolerated as a nudge before flipping to the side.
///
/// Half the straight part of the text box's edge, less a small margin, so the
/// pointer never ends up past the box's rounded corner.
pub fn safe_offset_x(text_width: f64, corner_radius: f64) -> f64 {
    (text_width - 2.0 * corner_radius) / 2.0 - 10.0
}

/// Compute the corrections for a laid-out text box.
///
/// - `text_box`: the rendered text box in viewport coordinates.
/// - `anchor`: the active anchor's current rectangle.
///
/// Returns an empty result when the box already fits.
pub fn correct_placement(
    text_box: Rect,
    anchor: Rect,
    viewport: Size,
    config: &OverlayConfig,
) -> PlacementResult {
    let mut out = PlacementResult::default();
    let overflow_right = text_box.x1 - viewport.width;
    if text_box.x0 >= 0.0 && overflow_right <= 0.0 && text_box.y0 > 0.0 {
        return out;
    }
    let safe = safe_offset_x(text_box.width(), config.corner_radius);

    if text_box.y0 < 0.0 {
        out.placement = Some(Placement::below(anchor));
        out.pointer = Some(PointerStyle::pointing(PointerDirection::Up, config));
    }

    if text_box.x0 < 0.0 {
        let overflow = -text_box.x0;
        if overflow > safe {
            out.placement = Some(Placement::right_of(anchor));
            out.pointer = Some(PointerStyle::pointing(PointerDirection::Left, config));
        } else {
            out.text_offset = Some(TextOffset { dx: overflow });
        }
    } else if overflow_right > 0.0 {
        if overflow_right > safe {
            out.placement = Some(Placement::left_of(anchor, viewport));
            out.pointer = Some(PointerStyle::pointing(PointerDirection::Right, config));
        } else {
            out.text_offset = Some(TextOffset {
                dx: -overflow_right,
            });
        }
    }
    out
}
