// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap tooltips on a touch-only device.
//!
//! A tap shows the tooltip, a tap inside the anchor keeps it open, and the next tap
//! anywhere else hides it. A [`TooltipRef`] drives the binding.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=debug cargo run -p understory_tooltip_demos --example tooltip_touch`

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_tooltip::anchor::{Anchors, TooltipRef};
use understory_tooltip::controller::Controller;
use understory_tooltip::geometry::{DeviceCapabilities, DeviceClass};
use understory_tooltip::overlay::{OverlayConfig, OverlayModel};
use understory_tooltip::scene::{NodeId, Scene};
use understory_tooltip::types::InputEvent;

const TEXT_BOX: Size = Size::new(150.0, 30.0);

fn tap(
    scene: &mut Scene,
    anchors: &mut Anchors<NodeId>,
    ctl: &mut Controller<NodeId, OverlayModel>,
    node: NodeId,
) {
    scene
        .dispatch(anchors, ctl, InputEvent::Click(node))
        .expect("bound");
    let fix = scene.settle(ctl, TEXT_BOX).expect("bound");
    println!(
        "tap {node:?}: visible={} placement={:?} nudge={:?}",
        ctl.is_visible(),
        ctl.overlay().map(|o| o.placement()),
        fix.text_offset
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut scene = Scene::new(Size::new(390.0, 844.0));
    let root = scene.insert(None, Rect::new(0.0, 0.0, 390.0, 844.0));
    let card = scene.insert(Some(root), Rect::new(20.0, 400.0, 370.0, 480.0));
    let info = scene.insert(Some(card), Rect::new(330.0, 410.0, 360.0, 440.0));
    let glyph = scene.insert(Some(info), Rect::new(338.0, 418.0, 352.0, 432.0));

    let device = DeviceClass::detect(DeviceCapabilities::TOUCH);
    assert_eq!(device, DeviceClass::Touch);
    tracing::info!(?device, "device detected");
    let mut ctl = Controller::new(device);
    ctl.bind(&mut scene, OverlayModel::new(OverlayConfig::default()))
        .expect("first mount");
    let mut anchors = Anchors::new();
    let mut tip = TooltipRef::new("Prices include tax", true);
    tip.set_element(&mut anchors, &mut ctl, &mut scene, Some(info));

    tap(&mut scene, &mut anchors, &mut ctl, info);
    assert!(ctl.is_visible());
    tap(&mut scene, &mut anchors, &mut ctl, glyph);
    assert!(ctl.is_visible(), "taps inside the anchor keep it open");
    tap(&mut scene, &mut anchors, &mut ctl, card);
    assert!(!ctl.is_visible());

    tip.sync(&mut anchors, &mut ctl, &mut scene, Some(info), "Prices include tax", false);
    assert!(anchors.is_empty());
    tip.release(&mut anchors, &mut ctl, &mut scene);
    let overlay = ctl.unbind(&mut scene).expect("bound");
    println!("unmounted overlay last showed {:?}", overlay.text());
}
