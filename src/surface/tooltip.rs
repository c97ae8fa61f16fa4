//! Tooltip: hover-triggered, anchored, never locks scroll

use crate::geometry::{Placement, Size};
use crate::model::{
    AnchorHandle, OverlayFlags, OverlayKind, OverlayPlacement, OverlaySpec, Trigger,
};

/// Configuration for a tooltip
///
/// # Example
/// ```ignore
/// let spec = Tooltip::new("Enroll now")
///     .placement(Placement::Bottom)
///     .delay_ms(300)
///     .spec(AnchorHandle::new(&button));
/// let id = runtime.hover_enter(spec);
/// ```
#[derive(Debug, Clone)]
pub struct Tooltip {
    text: String,
    placement: Placement,
    delay_ms: Option<u64>,
    content_size: Option<Size>,
}

impl Tooltip {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placement: Placement::Top,
            delay_ms: None,
            content_size: None,
        }
    }

    /// Side of the anchor to show on (default `Top`)
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Hover delay before opening; defaults to the engine's configured delay
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Known content size, if the caller measured it already
    pub fn content_size(mut self, size: Size) -> Self {
        self.content_size = Some(size);
        self
    }

    pub fn spec(self, anchor: AnchorHandle) -> OverlaySpec {
        OverlaySpec {
            kind: OverlayKind::Tooltip,
            placement: OverlayPlacement::Anchored(self.placement),
            flags: OverlayFlags {
                close_on_backdrop_click: false,
                close_on_escape: false,
                locks_scroll: false,
            },
            trigger: Trigger::Hover {
                delay_ms: self.delay_ms,
            },
            anchor: Some(anchor),
            content: self.text,
            content_size: self.content_size,
        }
    }
}
