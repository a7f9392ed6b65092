// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_tooltip::overlay::OverlayConfig;
use understory_tooltip::position::correct_placement;

const VIEW: Size = Size::new(1280.0, 720.0);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Anchor and laid-out text box pairs, with the box above the anchor as first pushed.
fn gen_cases(count: usize, margin: f64) -> Vec<(Rect, Rect)> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0x7007_71B5_CAFE_F00D);
    for _ in 0..count {
        // Spill past the viewport edges by up to `margin`.
        let x0 = rng.next_f64() * (VIEW.width + 2.0 * margin) - margin;
        let y0 = rng.next_f64() * (VIEW.height + 2.0 * margin) - margin;
        let anchor = Rect::from_origin_size((x0, y0), (80.0, 28.0));
        let w = 40.0 + rng.next_f64() * 240.0;
        let cx = anchor.center().x;
        let text = Rect::new(cx - w / 2.0, y0 - 4.0 - 7.0 - 30.0, cx + w / 2.0, y0 - 11.0);
        out.push((anchor, text));
    }
    out
}

fn bench_correct_placement(c: &mut Criterion) {
    let config = OverlayConfig::default();
    let mut group = c.benchmark_group("correct_placement");
    for &(label, margin) in &[("inside", 0.0), ("edges", 200.0)] {
        let cases = gen_cases(4096, margin);
        group.throughput(Throughput::Elements(cases.len() as u64));
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut flips = 0_usize;
                for &(anchor, text) in &cases {
                    let r = correct_placement(black_box(text), anchor, VIEW, &config);
                    flips += usize::from(r.placement.is_some());
                }
                black_box(flips)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_correct_placement);
criterion_main!(benches);
