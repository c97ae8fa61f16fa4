//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::rc::Rc;

use overlay_engine::config::EngineConfig;
use overlay_engine::geometry::{Rect, Size};
use overlay_engine::model::{AnchorHandle, ElementAnchor, OverlayId};
use overlay_engine::runtime::{HeadlessHost, Runtime};
use overlay_engine::surface::{Modal, Tooltip};

pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// Headless runtime over an 800x600 viewport with default config
pub fn test_runtime() -> Runtime<HeadlessHost> {
    Runtime::headless(EngineConfig::default(), VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
}

/// Headless runtime with a custom config
pub fn test_runtime_with(config: EngineConfig) -> Runtime<HeadlessHost> {
    Runtime::headless(config, VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
}

/// A mounted anchor element
pub fn anchor_at(x: f32, y: f32, width: f32, height: f32) -> Rc<ElementAnchor> {
    ElementAnchor::new(Rect::new(x, y, width, height))
}

/// Hover a 60x20 tooltip onto `anchor`
pub fn hover_tooltip(rt: &mut Runtime<HeadlessHost>, anchor: &Rc<ElementAnchor>) -> OverlayId {
    let spec = Tooltip::new("tooltip")
        .content_size(Size::new(60.0, 20.0))
        .spec(AnchorHandle::new(anchor));
    rt.hover_enter(spec)
}

/// Open a 200x100 modal closable by Escape and backdrop click
pub fn open_modal(rt: &mut Runtime<HeadlessHost>) -> OverlayId {
    rt.open(
        Modal::new("modal")
            .content_size(Size::new(200.0, 100.0))
            .spec(),
    )
}
