// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltips on a pointer device.
//!
//! Two anchors share the overlay: one in the middle of the viewport, one pressed against
//! its right edge inside a scrolling sidebar. Shows the default placement, the side flip,
//! and the refresh after a scroll.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=trace cargo run -p understory_tooltip_demos --example tooltip_hover`

use kurbo::{Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_tooltip::anchor::Anchors;
use understory_tooltip::controller::Controller;
use understory_tooltip::geometry::{DeviceCapabilities, DeviceClass};
use understory_tooltip::overlay::{OverlayConfig, OverlayModel};
use understory_tooltip::position::Placement;
use understory_tooltip::scene::Scene;
use understory_tooltip::types::{InputEvent, ScrollContainer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let view = Size::new(800.0, 600.0);
    let mut scene = Scene::new(view);
    let root = scene.insert(None, Rect::new(0.0, 0.0, 800.0, 600.0));
    let sidebar = scene.insert_scroll_container(Some(root), Rect::new(700.0, 0.0, 800.0, 600.0));
    let help = scene.insert(Some(root), Rect::new(350.0, 280.0, 450.0, 320.0));
    let settings = scene.insert(Some(sidebar), Rect::new(770.0, 200.0, 800.0, 230.0));

    let device = DeviceClass::detect(DeviceCapabilities::HOVER | DeviceCapabilities::FINE_POINTER);
    tracing::info!(?device, "device detected");
    let mut ctl = Controller::new(device);
    ctl.bind(&mut scene, OverlayModel::new(OverlayConfig::default()))
        .expect("first mount");
    let mut anchors = Anchors::new();
    anchors.register(&mut ctl, &mut scene, help, "Open the help center", true);
    anchors.register(&mut ctl, &mut scene, settings, "Settings", true);

    let text_box = Size::new(140.0, 30.0);

    scene
        .dispatch(&mut anchors, &mut ctl, InputEvent::PointerEnter(help))
        .expect("bound");
    let fix = scene.settle(&mut ctl, text_box).expect("bound");
    let overlay = ctl.overlay().expect("bound");
    println!("help: {:?} corrections={:?}", overlay.placement(), fix);
    assert!(fix.is_empty());

    scene
        .dispatch(&mut anchors, &mut ctl, InputEvent::PointerEnter(settings))
        .expect("bound");
    // The stale leave from `help` arrives after the enter.
    scene
        .dispatch(&mut anchors, &mut ctl, InputEvent::PointerLeave(help))
        .expect("bound");
    let fix = scene.settle(&mut ctl, text_box).expect("bound");
    let overlay = ctl.overlay().expect("bound");
    println!("settings: {:?} pointer={:?}", overlay.placement(), overlay.pointer_style());
    assert!(matches!(overlay.placement(), Placement::LeftOf { .. }));
    assert!(fix.pointer.is_some());

    let ev = scene.scroll_by(ScrollContainer::Node(sidebar), Vec2::new(0.0, 120.0));
    scene.dispatch(&mut anchors, &mut ctl, ev).expect("bound");
    let overlay = ctl.overlay().expect("bound");
    println!("after scroll: {:?}", overlay.base_placement());
    assert!(ctl.needs_layout());

    scene
        .dispatch(&mut anchors, &mut ctl, InputEvent::PointerLeave(settings))
        .expect("bound");
    assert!(!ctl.is_visible());
    println!("hidden; {} scroll listeners live", ctl.scroll_registry().len());
}
