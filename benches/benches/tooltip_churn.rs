// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_tooltip::anchor::Anchors;
use understory_tooltip::controller::Controller;
use understory_tooltip::geometry::DeviceClass;
use understory_tooltip::overlay::{OverlayConfig, OverlayModel};
use understory_tooltip::scene::{NodeId, Scene};
use understory_tooltip::types::InputEvent;

/// A scene with `panes` scroll containers holding `per_pane` anchor nodes each.
fn gen_scene(panes: usize, per_pane: usize) -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new(Size::new(1280.0, 720.0));
    let root = scene.insert(None, Rect::new(0.0, 0.0, 1280.0, 720.0));
    let mut nodes = Vec::with_capacity(panes * per_pane);
    for p in 0..panes {
        let x0 = p as f64 * 100.0;
        let pane = scene.insert_scroll_container(Some(root), Rect::new(x0, 0.0, x0 + 100.0, 720.0));
        for i in 0..per_pane {
            let y0 = i as f64 * 24.0;
            nodes.push(scene.insert(Some(pane), Rect::new(x0, y0, x0 + 90.0, y0 + 20.0)));
        }
    }
    (scene, nodes)
}

fn bound(scene: &mut Scene) -> Controller<NodeId, OverlayModel> {
    let mut ctl = Controller::new(DeviceClass::Pointer);
    ctl.bind(scene, OverlayModel::new(OverlayConfig::default()))
        .expect("first mount");
    ctl
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchors");
    for &(panes, per_pane) in &[(4usize, 64usize), (16, 64)] {
        let n = panes * per_pane;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("register_unregister_n{}", n), |b| {
            b.iter_batched(
                || {
                    let (mut scene, nodes) = gen_scene(panes, per_pane);
                    let ctl = bound(&mut scene);
                    (scene, ctl, nodes)
                },
                |(mut scene, mut ctl, nodes)| {
                    let mut anchors = Anchors::new();
                    let ids: Vec<_> = nodes
                        .iter()
                        .map(|&n| anchors.register(&mut ctl, &mut scene, n, "tip", true))
                        .collect();
                    black_box(ctl.scroll_registry().len());
                    for id in ids {
                        anchors.unregister(&mut ctl, &mut scene, id);
                    }
                    black_box(anchors.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_hover_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("hover");
    let (mut scene, nodes) = gen_scene(8, 32);
    let mut ctl = bound(&mut scene);
    let mut anchors = Anchors::new();
    for &n in &nodes {
        anchors.register(&mut ctl, &mut scene, n, "tip", true);
    }
    group.throughput(Throughput::Elements(nodes.len() as u64));
    group.bench_function("enter_settle_leave", |b| {
        b.iter(|| {
            for &n in &nodes {
                let _ = scene.dispatch(&mut anchors, &mut ctl, InputEvent::PointerEnter(n));
                let _ = black_box(scene.settle(&mut ctl, Size::new(120.0, 30.0)));
                let _ = scene.dispatch(&mut anchors, &mut ctl, InputEvent::PointerLeave(n));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_register, bench_hover_sweep);
criterion_main!(benches);
