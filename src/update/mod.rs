//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod host;
mod lifecycle;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::EngineModel;

#[cfg(debug_assertions)]
use crate::tracing::RegistrySnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use host::update_host;
pub use lifecycle::{update_overlay, update_timer};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Overlay(m) => lifecycle::update_overlay(model, m),
        Msg::Host(m) => host::update_host(model, m),
        Msg::Timer(m) => lifecycle::update_timer(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after registry state, logs the diff and checks
/// cross-structure invariants after every message.
#[cfg(debug_assertions)]
fn update_traced(model: &mut EngineModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::HostMsg;

    // Scroll storms are coalesced anyway; don't log each one
    let is_noisy = matches!(&msg, Msg::Host(HostMsg::Scroll));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = RegistrySnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = RegistrySnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "registry", %diff, "state changed");
    }

    model.assert_invariants(&msg_name);

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Overlay::Close { id: OverlayId(3) }`
/// - `Host::KeyDown(Escape)`
/// - `Timer::OpenDelayElapsed(..)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::OverlayMsg;

    match msg {
        // Specs carry anchors and content; the id is enough
        Msg::Overlay(OverlayMsg::HoverEnter { id, .. }) => {
            format!("Overlay::HoverEnter({:?})", id)
        }
        Msg::Overlay(OverlayMsg::Open { id, .. }) => format!("Overlay::Open({:?})", id),
        Msg::Overlay(m) => format!("Overlay::{:?}", m),
        Msg::Host(m) => format!("Host::{:?}", m),
        Msg::Timer(m) => format!("Timer::{:?}", m),
    }
}
