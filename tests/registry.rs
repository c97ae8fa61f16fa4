//! Overlay registry tests
//!
//! Stacking order, scroll-lock reference counting, shared listeners and the
//! global Escape / outside-click handlers.

mod common;

use common::{anchor_at, hover_tooltip, open_modal, test_runtime};

use overlay_engine::commands::OverlayEvent;
use overlay_engine::geometry::Size;
use overlay_engine::messages::{CloseReason, Key};
use overlay_engine::model::{
    ListenerKind, OverlayFlags, OverlayId, OverlayKind, OverlayRegistry, Transition, Visibility,
};
use overlay_engine::runtime::HostEffect;
use overlay_engine::surface::{Drawer, Modal};

fn flags(close_on_escape: bool) -> OverlayFlags {
    OverlayFlags {
        close_on_backdrop_click: false,
        close_on_escape,
        locks_scroll: false,
    }
}

// ========================================================================
// Registry Unit Behavior
// ========================================================================

#[test]
fn test_ranks_strictly_increase_and_never_reuse() {
    let mut registry = OverlayRegistry::new();
    let a = registry.register(OverlayId(1), OverlayKind::Modal, flags(true));
    let b = registry.register(OverlayId(2), OverlayKind::Modal, flags(true));
    registry.unregister(OverlayId(2));
    let c = registry.register(OverlayId(3), OverlayKind::Modal, flags(true));

    assert!(a < b);
    assert!(b < c, "rank of a closed overlay is not handed out again");
}

#[test]
fn test_topmost_is_most_recent_eligible() {
    let mut registry = OverlayRegistry::new();
    registry.register(OverlayId(1), OverlayKind::Modal, flags(true));
    registry.register(OverlayId(2), OverlayKind::Modal, flags(true));
    registry.register(OverlayId(3), OverlayKind::Tooltip, flags(false));

    assert_eq!(
        registry.topmost(|e| e.flags.close_on_escape),
        Some(OverlayId(2))
    );
    assert_eq!(registry.topmost(|_| true), Some(OverlayId(3)));
}

#[test]
fn test_scroll_lock_never_negative() {
    let mut registry = OverlayRegistry::new();
    assert_eq!(registry.release_scroll_lock(), Transition::Unchanged);
    assert_eq!(registry.scroll_lock_count(), 0);

    assert_eq!(registry.acquire_scroll_lock(), Transition::Activated);
    assert_eq!(registry.acquire_scroll_lock(), Transition::Unchanged);
    assert_eq!(registry.release_scroll_lock(), Transition::Unchanged);
    assert_eq!(registry.release_scroll_lock(), Transition::Deactivated);
    assert!(!registry.is_scroll_locked());
}

// ========================================================================
// Scroll Lock Scenarios
// ========================================================================

#[test]
fn test_two_modals_share_scroll_lock() {
    let mut rt = test_runtime();

    let a = open_modal(&mut rt);
    assert_eq!(rt.model().registry.scroll_lock_count(), 1);
    let b = open_modal(&mut rt);
    assert_eq!(rt.model().registry.scroll_lock_count(), 2);

    rt.close(b);
    assert_eq!(rt.model().registry.scroll_lock_count(), 1);
    assert!(rt.host().is_scroll_locked(), "A still holds the lock");

    rt.close(a);
    assert_eq!(rt.model().registry.scroll_lock_count(), 0);
    assert!(!rt.host().is_scroll_locked());

    let lock_effects: Vec<HostEffect> = rt
        .host()
        .effects()
        .iter()
        .copied()
        .filter(|e| matches!(e, HostEffect::ScrollLock(_)))
        .collect();
    assert_eq!(
        lock_effects,
        vec![HostEffect::ScrollLock(true), HostEffect::ScrollLock(false)]
    );
}

#[test]
fn test_close_order_does_not_matter_for_lock() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = rt.open(Drawer::new("nav").spec());

    rt.close(a);
    assert!(rt.host().is_scroll_locked());
    rt.close(b);
    assert!(!rt.host().is_scroll_locked());
}

#[test]
fn test_tooltip_never_locks_scroll() {
    let mut rt = test_runtime();
    let anchor = anchor_at(100.0, 100.0, 50.0, 20.0);
    hover_tooltip(&mut rt, &anchor);
    rt.advance(200);

    assert_eq!(rt.model().registry.scroll_lock_count(), 0);
    assert!(!rt.host().is_scroll_locked());
}

// ========================================================================
// Shared Listener Tests
// ========================================================================

#[test]
fn test_one_listener_per_class() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = open_modal(&mut rt);

    let installs = rt
        .host()
        .effects()
        .iter()
        .filter(|e| **e == HostEffect::InstallListener(ListenerKind::KeyDown))
        .count();
    assert_eq!(installs, 1);
    assert_eq!(rt.model().registry.listener_count(ListenerKind::KeyDown), 2);

    rt.close(a);
    assert!(rt.host().has_listener(ListenerKind::KeyDown));
    rt.close(b);
    assert!(rt.host().listeners().is_empty());
}

#[test]
fn test_tooltip_installs_only_geometry_listeners() {
    let mut rt = test_runtime();
    let anchor = anchor_at(100.0, 100.0, 50.0, 20.0);
    hover_tooltip(&mut rt, &anchor);
    rt.advance(200);

    assert!(rt.host().has_listener(ListenerKind::Scroll));
    assert!(rt.host().has_listener(ListenerKind::Resize));
    assert!(!rt.host().has_listener(ListenerKind::KeyDown));
    assert!(!rt.host().has_listener(ListenerKind::PointerDown));
}

// ========================================================================
// Escape Tests
// ========================================================================

#[test]
fn test_escape_closes_only_topmost() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = open_modal(&mut rt);
    let c = open_modal(&mut rt);

    rt.key_down(Key::Escape);
    assert_eq!(rt.visibility(c), Visibility::Closed);
    assert_eq!(rt.visibility(b), Visibility::Open);
    assert_eq!(rt.visibility(a), Visibility::Open);

    rt.key_down(Key::Escape);
    assert_eq!(rt.visibility(b), Visibility::Closed);
    assert_eq!(rt.visibility(a), Visibility::Open);
}

#[test]
fn test_escape_skips_overlays_that_ignore_it() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = rt.open(Modal::new("sticky").close_on_escape(false).spec());

    rt.take_events();
    rt.key_down(Key::Escape);

    assert_eq!(rt.visibility(a), Visibility::Closed);
    assert_eq!(rt.visibility(b), Visibility::Open);
    assert_eq!(
        rt.take_events(),
        vec![OverlayEvent::Closed {
            id: a,
            reason: CloseReason::Escape
        }]
    );
}

#[test]
fn test_escape_with_nothing_open() {
    let mut rt = test_runtime();
    rt.key_down(Key::Escape);
    assert!(rt.take_events().is_empty());
}

// ========================================================================
// Outside Click Tests
// ========================================================================

#[test]
fn test_outside_click_closes_topmost_only() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = open_modal(&mut rt);

    rt.pointer_down(5.0, 5.0);

    assert_eq!(rt.visibility(b), Visibility::Closed);
    assert_eq!(rt.visibility(a), Visibility::Open);
}

#[test]
fn test_click_inside_overlay_above_target_is_inside() {
    let mut rt = test_runtime();
    let modal = open_modal(&mut rt);
    // Sticky drawer stacked above the modal
    let drawer = rt.open(
        Drawer::new("panel")
            .size(100.0)
            .close_on_backdrop_click(false)
            .spec(),
    );

    // Inside the drawer, outside the modal
    rt.pointer_down(750.0, 20.0);
    assert_eq!(rt.visibility(modal), Visibility::Open);
    assert_eq!(rt.visibility(drawer), Visibility::Open);

    // Outside both
    rt.pointer_down(20.0, 20.0);
    assert_eq!(rt.visibility(modal), Visibility::Closed);
    assert_eq!(rt.visibility(drawer), Visibility::Open);
}

#[test]
fn test_backdrop_click_disabled() {
    let mut rt = test_runtime();
    let id = rt.open(
        Modal::new("checkout")
            .close_on_backdrop_click(false)
            .content_size(Size::new(200.0, 100.0))
            .spec(),
    );

    rt.pointer_down(5.0, 5.0);
    assert_eq!(rt.visibility(id), Visibility::Open);
}

// ========================================================================
// Stacking Tests
// ========================================================================

#[test]
fn test_later_overlay_stacks_above() {
    let mut rt = test_runtime();
    let a = open_modal(&mut rt);
    let b = open_modal(&mut rt);

    let model = rt.model();
    let za = model.registry.get(a).unwrap().z_rank;
    let zb = model.registry.get(b).unwrap().z_rank;
    assert!(zb > za);
    assert_eq!(model.open_overlays(), vec![a, b]);
}
