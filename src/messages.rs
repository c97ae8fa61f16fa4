//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use serde::{Deserialize, Serialize};

use crate::commands::TimerKey;
use crate::geometry::Size;
use crate::model::{OverlayId, OverlaySpec};

/// Keys the global key handler distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Other,
}

/// Why an overlay closed, reported through `on_close`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Pointer left the anchor of a hover-triggered overlay
    HoverLeave,
    /// Explicit close call from the collaborator
    Explicit,
    /// Pointer-down outside the overlay
    OutsideClick,
    /// Escape key while this overlay was the topmost escape-closable one
    Escape,
    /// Anchor was unmounted or became unmeasurable
    AnchorLost,
    /// Owning collaborator went away without closing
    Unmounted,
}

/// Per-overlay lifecycle messages, sent by triggers and collaborators
#[derive(Debug, Clone)]
pub enum OverlayMsg {
    /// Pointer entered the anchor; starts the open delay
    HoverEnter { id: OverlayId, spec: OverlaySpec },
    /// Pointer left the anchor
    HoverLeave { id: OverlayId },
    /// Open immediately
    Open { id: OverlayId, spec: OverlaySpec },
    /// Close on request
    Close { id: OverlayId },
    /// Content was rendered and measured
    ContentMeasured { id: OverlayId, size: Size },
    /// The collaborator unmounted; tear everything down
    Teardown { id: OverlayId },
}

/// Events coming from the host environment's global listeners
#[derive(Debug, Clone, PartialEq)]
pub enum HostMsg {
    /// Page scrolled
    Scroll,
    /// Viewport resized
    Resize { width: f32, height: f32 },
    /// Coalesced reposition task scheduled by a scroll or resize
    Reposition,
    /// Key pressed
    KeyDown(Key),
    /// Pointer pressed at viewport coordinates
    PointerDown { x: f32, y: f32 },
}

/// Timer deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMsg {
    /// Hover open delay elapsed
    OpenDelayElapsed(TimerKey),
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Overlay(OverlayMsg),
    Host(HostMsg),
    Timer(TimerMsg),
}
