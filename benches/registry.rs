//! Benchmarks for registry and lifecycle hot paths
//!
//! Run with: cargo bench registry

use overlay_engine::config::EngineConfig;
use overlay_engine::geometry::{Rect, Size};
use overlay_engine::messages::Key;
use overlay_engine::model::{
    AnchorHandle, ElementAnchor, OverlayFlags, OverlayId, OverlayKind, OverlayRegistry,
};
use overlay_engine::runtime::Runtime;
use overlay_engine::surface::{Modal, Tooltip};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn modal_flags() -> OverlayFlags {
    OverlayFlags {
        close_on_backdrop_click: true,
        close_on_escape: true,
        locks_scroll: true,
    }
}

// ============================================================================
// Registry operations
// ============================================================================

#[divan::bench(args = [10, 100, 1000])]
fn register_unregister(count: u64) {
    let mut registry = OverlayRegistry::new();
    for i in 0..count {
        registry.register(OverlayId(i), OverlayKind::Modal, modal_flags());
    }
    for i in 0..count {
        registry.unregister(divan::black_box(OverlayId(i)));
    }
}

#[divan::bench(args = [10, 100, 1000])]
fn topmost_escape_target(bencher: divan::Bencher, count: u64) {
    let mut registry = OverlayRegistry::new();
    for i in 0..count {
        let flags = OverlayFlags {
            close_on_escape: i == 0,
            ..modal_flags()
        };
        registry.register(OverlayId(i), OverlayKind::Modal, flags);
    }

    // Worst case: only the bottom overlay is eligible
    bencher.bench_local(|| registry.topmost(|e| e.flags.close_on_escape));
}

// ============================================================================
// Full update cycles
// ============================================================================

#[divan::bench(args = [1, 10, 50])]
fn open_then_escape_all(count: usize) {
    let mut rt = Runtime::headless(EngineConfig::default(), 1920.0, 1080.0);
    for _ in 0..count {
        rt.open(
            Modal::new("bench")
                .content_size(Size::new(400.0, 300.0))
                .spec(),
        );
    }
    for _ in 0..count {
        rt.key_down(Key::Escape);
    }
    divan::black_box(rt.take_events());
}

#[divan::bench(args = [1, 10, 100])]
fn scroll_reposition(bencher: divan::Bencher, count: usize) {
    let mut rt = Runtime::headless(EngineConfig::default(), 1920.0, 1080.0);
    let anchors: Vec<_> = (0..count)
        .map(|i| ElementAnchor::new(Rect::new((i * 19 % 1800) as f32, 500.0, 40.0, 20.0)))
        .collect();
    for anchor in &anchors {
        rt.hover_enter(
            Tooltip::new("bench")
                .delay_ms(0)
                .content_size(Size::new(120.0, 30.0))
                .spec(AnchorHandle::new(anchor)),
        );
    }

    let mut offset = 0.0;
    bencher.bench_local(|| {
        offset += 1.0;
        for (i, anchor) in anchors.iter().enumerate() {
            anchor.set_rect(Rect::new((i * 19 % 1800) as f32, 500.0 - offset % 400.0, 40.0, 20.0));
        }
        rt.scroll();
        rt.run_until_idle();
        rt.take_events()
    });
}
