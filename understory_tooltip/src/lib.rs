// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tooltip: one shared tooltip overlay for many anchors, `no_std` and headless.
//!
//! ## Overview
//!
//! An application mounts a single overlay and any number of anchors register against it.
//! When an anchor is hovered (or tapped, on touch-only devices) the overlay shows that
//! anchor's text just above it. After the host lays the overlay out, a positioning pass
//! flips it below or beside the anchor, or nudges it sideways, so it stays on screen.
//!
//! ## Pieces
//!
//! - [`Controller`](crate::controller::Controller): owns the overlay, the active anchor,
//!   and the scroll registry.
//! - [`Anchors`](crate::anchor::Anchors): registers anchors, attaches their listeners,
//!   and turns fired listeners into controller calls.
//!   [`TooltipRef`](crate::anchor::TooltipRef) is the declarative wrapper.
//! - [`correct_placement`](crate::position::correct_placement): the pure flip/nudge rules.
//! - [`ScrollRegistry`](crate::scroll::ScrollRegistry): one listener per scroll container,
//!   reference-counted across anchors.
//! - [`Host`](crate::host::Host): what the tooltip needs from the visual tree.
//!   [`Scene`](crate::scene::Scene) is an in-memory implementation.
//!
//! ## Workflow
//!
//! 1) Detect the [`DeviceClass`](crate::geometry::DeviceClass) and create a controller.
//! 2) [`bind`](crate::controller::Controller::bind) the overlay.
//! 3) Register anchors.
//! 4) Forward fired listeners to [`Anchors::handle_event`](crate::anchor::Anchors::handle_event).
//! 5) After each layout, call [`after_layout`](crate::controller::Controller::after_layout)
//!    with the measured text box while [`needs_layout`](crate::controller::Controller::needs_layout)
//!    is true.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_tooltip::anchor::Anchors;
//! use understory_tooltip::controller::Controller;
//! use understory_tooltip::geometry::{DeviceCapabilities, DeviceClass};
//! use understory_tooltip::overlay::{OverlayConfig, OverlayModel};
//! use understory_tooltip::position::Placement;
//! use understory_tooltip::scene::Scene;
//! use understory_tooltip::types::InputEvent;
//!
//! let device = DeviceClass::detect(DeviceCapabilities::HOVER | DeviceCapabilities::FINE_POINTER);
//! let mut scene = Scene::new(Size::new(800.0, 600.0));
//! let root = scene.insert(None, Rect::new(0.0, 0.0, 800.0, 600.0));
//! // Too close to the top for the tooltip to fit above.
//! let save = scene.insert(Some(root), Rect::new(20.0, 4.0, 100.0, 32.0));
//!
//! let mut ctl = Controller::new(device);
//! ctl.bind(&mut scene, OverlayModel::new(OverlayConfig::default())).unwrap();
//! let mut anchors = Anchors::new();
//! anchors.register(&mut ctl, &mut scene, save, "Save", true);
//!
//! scene.dispatch(&mut anchors, &mut ctl, InputEvent::PointerEnter(save)).unwrap();
//! scene.settle(&mut ctl, Size::new(60.0, 30.0)).unwrap();
//! assert!(matches!(ctl.overlay().unwrap().placement(), Placement::Below { .. }));
//!
//! scene.dispatch(&mut anchors, &mut ctl, InputEvent::PointerLeave(save)).unwrap();
//! assert!(!ctl.is_visible());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod anchor;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod listeners;
pub mod overlay;
pub mod position;
pub mod scene;
pub mod scroll;
pub mod types;

pub use anchor::{AnchorId, Anchors, TooltipRef};
pub use controller::Controller;
pub use error::TooltipError;
pub use overlay::{Overlay, OverlayConfig};
pub use position::Placement;
