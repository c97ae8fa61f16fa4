//! Overlay entity and its configuration

use serde::{Deserialize, Serialize};

use super::anchor::AnchorHandle;
use super::portal::PortalHandle;
use super::registry::ZRank;
use crate::commands::TimerKey;
use crate::geometry::{Placement, Position, Size};

/// Opaque identity of one overlay mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Tooltip,
    Modal,
    Drawer,
}

/// Visibility state machine: `Closed -> Opening -> Open -> Closing -> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Viewport edge a drawer slides in from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Where an overlay goes on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPlacement {
    /// Next to an anchor, on the given side
    Anchored(Placement),
    /// Centered in the viewport
    Centered,
    /// Flush with a viewport edge; `size` runs along the perpendicular axis
    /// (`None` uses the configured drawer size)
    Edge { edge: Edge, size: Option<f32> },
}

impl OverlayPlacement {
    pub fn needs_anchor(&self) -> bool {
        matches!(self, OverlayPlacement::Anchored(_))
    }
}

/// Behavior flags consulted by the global key and pointer handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlayFlags {
    pub close_on_backdrop_click: bool,
    pub close_on_escape: bool,
    pub locks_scroll: bool,
}

/// What makes an overlay start opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Pointer hover, gated by a delay (`None` uses the configured default)
    Hover { delay_ms: Option<u64> },
    /// Explicit open call, no delay
    Explicit,
}

/// Everything a collaborator hands the engine to request an overlay
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    pub kind: OverlayKind,
    pub placement: OverlayPlacement,
    pub flags: OverlayFlags,
    pub trigger: Trigger,
    pub anchor: Option<AnchorHandle>,
    /// Content to render on the portal surface
    pub content: String,
    /// Content size, if already known; otherwise supplied after first render
    pub content_size: Option<Size>,
}

impl OverlaySpec {
    /// Attach an anchor (builder pattern)
    pub fn with_anchor(mut self, anchor: AnchorHandle) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Provide the content size up front (builder pattern)
    pub fn with_content_size(mut self, size: Size) -> Self {
        self.content_size = Some(size);
        self
    }
}

/// A mounted overlay, alive from the trigger request until it reaches `Closed`
#[derive(Debug, Clone)]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub placement: OverlayPlacement,
    pub flags: OverlayFlags,
    pub trigger: Trigger,
    pub anchor: Option<AnchorHandle>,
    pub content: String,
    pub content_size: Option<Size>,
    /// `None` until the first successful measurement
    pub position: Option<Position>,
    pub visibility: Visibility,
    pub z_rank: Option<ZRank>,
    pub portal: Option<PortalHandle>,
    /// Pending open-delay timer, only ever set while `Opening`
    pub open_timer: Option<TimerKey>,
    /// Bumped on every transition out of `Opening`; stale timer deliveries
    /// carry an older generation and are dropped
    pub generation: u64,
    pub holds_scroll_lock: bool,
}

impl Overlay {
    pub fn new(id: OverlayId, spec: OverlaySpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            placement: spec.placement,
            flags: spec.flags,
            trigger: spec.trigger,
            anchor: spec.anchor,
            content: spec.content,
            content_size: spec.content_size,
            position: None,
            visibility: Visibility::Closed,
            z_rank: None,
            portal: None,
            open_timer: None,
            generation: 0,
            holds_scroll_lock: false,
        }
    }

    pub fn is_hover_triggered(&self) -> bool {
        matches!(self.trigger, Trigger::Hover { .. })
    }

    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    /// Closing or already closed; further close requests are no-ops
    pub fn is_closing(&self) -> bool {
        matches!(self.visibility, Visibility::Closing | Visibility::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> OverlaySpec {
        OverlaySpec {
            kind: OverlayKind::Tooltip,
            placement: OverlayPlacement::Anchored(Placement::Top),
            flags: OverlayFlags::default(),
            trigger: Trigger::Hover { delay_ms: None },
            anchor: None,
            content: "hint".to_string(),
            content_size: None,
        }
    }

    #[test]
    fn test_new_overlay_starts_closed_and_unpositioned() {
        let overlay = Overlay::new(OverlayId(7), spec());
        assert_eq!(overlay.visibility, Visibility::Closed);
        assert!(overlay.position.is_none());
        assert!(overlay.z_rank.is_none());
    }

    #[test]
    fn test_only_anchored_placement_needs_anchor() {
        assert!(OverlayPlacement::Anchored(Placement::Left).needs_anchor());
        assert!(!OverlayPlacement::Centered.needs_anchor());
        assert!(!OverlayPlacement::Edge {
            edge: Edge::Right,
            size: Some(300.0)
        }
        .needs_anchor());
    }
}
