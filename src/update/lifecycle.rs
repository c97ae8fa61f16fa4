//! Overlay lifecycle update handlers
//!
//! Drives each overlay through `Closed -> Opening -> Open -> Closing -> Closed`.
//! Every kind (tooltip, modal, drawer) goes through the same functions; the
//! differences come from the overlay's flags, trigger and placement.

use crate::commands::{Cmd, OverlayEvent, TimerKey};
use crate::geometry::Position;
use crate::messages::{CloseReason, OverlayMsg, TimerMsg};
use crate::model::{
    EngineModel, ListenerKind, Overlay, OverlayId, OverlaySpec, PortalContent, Transition,
    Trigger, Visibility,
};
use crate::surface::resolve_position;

/// Handle per-overlay lifecycle messages
pub fn update_overlay(model: &mut EngineModel, msg: OverlayMsg) -> Option<Cmd> {
    match msg {
        OverlayMsg::HoverEnter { id, spec } => begin_hover(model, id, spec),

        OverlayMsg::HoverLeave { id } => {
            let overlay = model.overlays.get(&id)?;
            if !overlay.is_hover_triggered() {
                tracing::debug!("Ignoring hover-leave for non-hover overlay {:?}", id);
                return None;
            }
            close_overlay(model, id, CloseReason::HoverLeave)
        }

        OverlayMsg::Open { id, spec } => request_open(model, id, spec),

        OverlayMsg::Close { id } => close_overlay(model, id, CloseReason::Explicit),

        OverlayMsg::ContentMeasured { id, size } => {
            let overlay = model.overlays.get_mut(&id)?;
            overlay.content_size = Some(size);
            if !overlay.is_open() {
                return None;
            }
            reposition(model, id)
        }

        OverlayMsg::Teardown { id } => close_overlay(model, id, CloseReason::Unmounted),
    }
}

/// Handle timer deliveries
pub fn update_timer(model: &mut EngineModel, msg: TimerMsg) -> Option<Cmd> {
    match msg {
        TimerMsg::OpenDelayElapsed(key) => {
            let Some(overlay) = model.overlays.get_mut(&key.overlay) else {
                tracing::debug!("Dropping open timer for destroyed overlay {:?}", key.overlay);
                return None;
            };

            // Skip if the overlay left `Opening` since the timer was started
            if overlay.visibility != Visibility::Opening || overlay.open_timer != Some(key) {
                tracing::debug!(
                    "Dropping stale open timer: overlay {:?} generation {} != timer generation {}",
                    key.overlay,
                    overlay.generation,
                    key.generation
                );
                return None;
            }

            overlay.open_timer = None;
            overlay.generation += 1;
            open_overlay(model, key.overlay)
        }
    }
}

/// Hover entered an anchor: create the overlay in `Opening` and start its delay
fn begin_hover(model: &mut EngineModel, id: OverlayId, spec: OverlaySpec) -> Option<Cmd> {
    if model.overlays.contains_key(&id) {
        tracing::debug!("Hover-enter on live overlay {:?} ignored", id);
        return None;
    }

    let delay_ms = match spec.trigger {
        Trigger::Hover { delay_ms } => delay_ms.unwrap_or(model.config.hover_delay_ms),
        Trigger::Explicit => 0,
    };

    let mut overlay = Overlay::new(id, spec);
    overlay.visibility = Visibility::Opening;

    if delay_ms == 0 {
        model.overlays.insert(id, overlay);
        return open_overlay(model, id);
    }

    let key = TimerKey {
        overlay: id,
        generation: overlay.generation,
    };
    overlay.open_timer = Some(key);
    model.overlays.insert(id, overlay);

    tracing::debug!("Overlay {:?} opening in {}ms", id, delay_ms);
    Some(Cmd::StartTimer { key, delay_ms })
}

/// Explicit open: skip any pending delay and open now
fn request_open(model: &mut EngineModel, id: OverlayId, spec: OverlaySpec) -> Option<Cmd> {
    let mut cmds = Vec::new();

    match model.overlays.get_mut(&id) {
        Some(overlay) if overlay.visibility == Visibility::Opening => {
            cmds.extend(cancel_open_timer(overlay));
        }
        Some(_) => {
            tracing::debug!("Open requested for live overlay {:?}, ignored", id);
            return None;
        }
        None => {
            let mut overlay = Overlay::new(id, spec);
            overlay.visibility = Visibility::Opening;
            model.overlays.insert(id, overlay);
        }
    }

    cmds.extend(open_overlay(model, id));
    Some(Cmd::batch(cmds))
}

/// Cancel and forget a pending open timer, invalidating its generation
fn cancel_open_timer(overlay: &mut Overlay) -> Option<Cmd> {
    let key = overlay.open_timer.take()?;
    overlay.generation += 1;
    tracing::debug!("Cancelled open timer for overlay {:?}", overlay.id);
    Some(Cmd::CancelTimer(key))
}

/// `Opening -> Open`: register, lock, mount, position, listen, notify
fn open_overlay(model: &mut EngineModel, id: OverlayId) -> Option<Cmd> {
    let overlay = model.overlays.get(&id)?;
    if overlay.visibility != Visibility::Opening {
        return None;
    }

    // An anchored overlay whose anchor is already gone never opens
    if overlay.placement.needs_anchor()
        && overlay
            .anchor
            .as_ref()
            .and_then(|anchor| anchor.measure())
            .is_none()
    {
        tracing::debug!("Overlay {:?} has no measurable anchor, not opening", id);
        model.overlays.remove(&id);
        return None;
    }

    let mut cmds = Vec::new();
    let overlay = model.overlays.get_mut(&id)?;

    let z_rank = model.registry.register(id, overlay.kind, overlay.flags);
    overlay.z_rank = Some(z_rank);

    if overlay.flags.locks_scroll {
        overlay.holds_scroll_lock = true;
        if model.registry.acquire_scroll_lock() == Transition::Activated {
            cmds.push(Cmd::SetScrollLock(true));
        }
    }

    let handle = model.portal.mount(PortalContent {
        overlay: id,
        body: overlay.content.clone(),
    });
    model
        .portal
        .set_z_index(handle, model.config.z_index_base + z_rank.0);
    overlay.portal = Some(handle);
    overlay.visibility = Visibility::Open;
    let flags = overlay.flags;

    tracing::debug!(
        "Overlay {:?} ({:?}) open at rank {}",
        id,
        overlay.kind,
        z_rank.0
    );

    // First position is part of opening, not a move
    let anchor_lost = matches!(measure(model, id), Measurement::AnchorLost);

    for kind in ListenerKind::required_by(&flags) {
        if model.registry.acquire_listener(kind) == Transition::Activated {
            cmds.push(Cmd::InstallListener(kind));
        }
    }

    cmds.push(Cmd::Notify(OverlayEvent::Opened { id }));
    cmds.push(Cmd::Redraw);

    if anchor_lost {
        cmds.extend(close_overlay(model, id, CloseReason::AnchorLost));
    }

    Some(Cmd::batch(cmds))
}

/// Result of measuring one open overlay
enum Measurement {
    /// Position changed
    Moved(Position),
    /// Nothing new (unchanged, or content not measured yet)
    Unchanged,
    /// Anchor gone; the overlay must close
    AnchorLost,
}

/// Recompute one open overlay's position from fresh measurements.
///
/// Closes the overlay if its anchor is gone; never opens anything.
pub(crate) fn reposition(model: &mut EngineModel, id: OverlayId) -> Option<Cmd> {
    match measure(model, id) {
        Measurement::Moved(position) => Some(Cmd::batch(vec![
            Cmd::Notify(OverlayEvent::Moved { id, position }),
            Cmd::Redraw,
        ])),
        Measurement::Unchanged => None,
        Measurement::AnchorLost => close_overlay(model, id, CloseReason::AnchorLost),
    }
}

fn measure(model: &mut EngineModel, id: OverlayId) -> Measurement {
    let viewport = model.viewport();
    let Some(overlay) = model.overlays.get_mut(&id) else {
        return Measurement::Unchanged;
    };
    if !overlay.is_open() {
        return Measurement::Unchanged;
    }

    let anchor = overlay.anchor.as_ref().and_then(|a| a.measure());
    if overlay.placement.needs_anchor() && anchor.is_none() {
        return Measurement::AnchorLost;
    }

    let Some(content) = overlay.content_size else {
        tracing::trace!("Overlay {:?} waiting for content measurement", id);
        return Measurement::Unchanged;
    };

    let Some(position) =
        resolve_position(overlay.placement, anchor, content, viewport, &model.config)
    else {
        return Measurement::AnchorLost;
    };

    if !position.is_visible() {
        tracing::debug!("Overlay {:?} suppressed: degenerate viewport", id);
    }
    if let Some(anchor) = anchor {
        if position.overlaps(&anchor) {
            tracing::trace!("Overlay {:?} overlaps its anchor after clamping", id);
        }
    }

    if overlay.position == Some(position) {
        return Measurement::Unchanged;
    }

    overlay.position = Some(position);
    if let Some(handle) = overlay.portal {
        model.portal.set_position(handle, Some(position));
    }

    Measurement::Moved(position)
}

/// `-> Closing -> Closed`: release everything the overlay holds and destroy it.
///
/// Idempotent: closing an overlay that is closing, closed or unknown is a no-op.
pub(crate) fn close_overlay(
    model: &mut EngineModel,
    id: OverlayId,
    reason: CloseReason,
) -> Option<Cmd> {
    let Some(overlay) = model.overlays.get_mut(&id) else {
        tracing::debug!("Close ({:?}) for unknown overlay {:?} ignored", reason, id);
        return None;
    };
    if overlay.is_closing() {
        return None;
    }

    let was_open = overlay.is_open();
    overlay.visibility = Visibility::Closing;

    let mut cmds = Vec::new();
    cmds.extend(cancel_open_timer(overlay));

    if model.registry.unregister(id).is_some() {
        for kind in ListenerKind::required_by(&overlay.flags) {
            if model.registry.release_listener(kind) == Transition::Deactivated {
                cmds.push(Cmd::RemoveListener(kind));
            }
        }
    }

    if overlay.holds_scroll_lock {
        overlay.holds_scroll_lock = false;
        if model.registry.release_scroll_lock() == Transition::Deactivated {
            cmds.push(Cmd::SetScrollLock(false));
        }
    }

    if let Some(handle) = overlay.portal.take() {
        model.portal.unmount(handle);
    }

    overlay.visibility = Visibility::Closed;
    model.overlays.remove(&id);

    if was_open {
        tracing::debug!("Overlay {:?} closed ({:?})", id, reason);
        cmds.push(Cmd::Notify(OverlayEvent::Closed { id, reason }));
        cmds.push(Cmd::Redraw);
    } else {
        tracing::debug!("Overlay {:?} cancelled before opening ({:?})", id, reason);
    }

    Some(Cmd::batch(cmds))
}
