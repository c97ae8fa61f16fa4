//! Overlay geometry calculator
//!
//! Pure functions that turn an anchor box, a content size, a requested
//! placement and a viewport snapshot into an absolute, clamped position.
//! Nothing in here touches engine state, so every function can be tested
//! and benchmarked in isolation.

use serde::{Deserialize, Serialize};

/// Gap between an anchored overlay and its anchor, in pixels
pub const DEFAULT_GAP: f32 = 8.0;

/// Minimum distance kept between an overlay and the viewport edge, in pixels
pub const DEFAULT_VIEWPORT_PADDING: f32 = 8.0;

// ============================================================================
// Boxes and sizes
// ============================================================================

/// Axis-aligned box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge X coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge Y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// True when the two boxes share a region of positive area.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Measured size of an overlay's content
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Snapshot of the visible rendering area
///
/// Built fresh for every position query; never kept across frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Edge padding overlays must stay clear of
    #[serde(default = "default_padding")]
    pub padding: f32,
}

fn default_padding() -> f32 {
    DEFAULT_VIEWPORT_PADDING
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            padding: DEFAULT_VIEWPORT_PADDING,
        }
    }

    /// Set the edge padding (builder pattern)
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// A viewport with no usable area, as seen during intermediate layout passes
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// ============================================================================
// Placement
// ============================================================================

/// Side of the anchor an overlay is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

/// Resolved overlay box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    /// Placement that was applied. Always the requested one: there is no auto-flip.
    /// Edge layouts report their edge's side, centered layouts report `Top`.
    pub placement: Placement,
}

impl Position {
    /// The zero-area result used while the viewport is degenerate
    pub fn suppressed(placement: Placement) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: 0.0,
            height: 0.0,
            placement,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// False for the zero-area result of a degenerate viewport
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether the resolved box covers part of the anchor.
    ///
    /// Happens when clamping pushes an anchored overlay back over its anchor,
    /// e.g. a `Top` tooltip on an anchor touching the viewport's top edge.
    pub fn overlaps(&self, anchor: &Rect) -> bool {
        self.rect().intersects(anchor)
    }
}

// ============================================================================
// Position computation
// ============================================================================

/// Compute the clamped position of `content` next to `anchor`, using the
/// default gap.
///
/// Deterministic: identical inputs always yield identical outputs.
pub fn compute_position(
    anchor: Rect,
    content: Size,
    placement: Placement,
    viewport: Viewport,
) -> Position {
    compute_position_with_gap(anchor, content, placement, viewport, DEFAULT_GAP)
}

/// Same as [`compute_position`] with an explicit gap between anchor and content
pub fn compute_position_with_gap(
    anchor: Rect,
    content: Size,
    placement: Placement,
    viewport: Viewport,
    gap: f32,
) -> Position {
    if viewport.is_degenerate() {
        return Position::suppressed(placement);
    }

    let (top, left) = match placement {
        Placement::Top => (
            anchor.y - gap - content.height,
            anchor.center_x() - content.width / 2.0,
        ),
        Placement::Bottom => (
            anchor.bottom() + gap,
            anchor.center_x() - content.width / 2.0,
        ),
        Placement::Left => (
            anchor.center_y() - content.height / 2.0,
            anchor.x - gap - content.width,
        ),
        Placement::Right => (
            anchor.center_y() - content.height / 2.0,
            anchor.right() + gap,
        ),
    };

    Position {
        top: clamp_axis(top, content.height, viewport.height, viewport.padding),
        left: clamp_axis(left, content.width, viewport.width, viewport.padding),
        width: content.width,
        height: content.height,
        placement,
    }
}

/// Like [`compute_position_with_gap`], but an unmeasurable anchor yields no
/// position at all instead of a stale one.
pub fn try_compute_position(
    anchor: Option<Rect>,
    content: Size,
    placement: Placement,
    viewport: Viewport,
    gap: f32,
) -> Option<Position> {
    anchor.map(|anchor| compute_position_with_gap(anchor, content, placement, viewport, gap))
}

/// Center `content` in the viewport, clamped to the padding
pub fn center_in_viewport(content: Size, viewport: Viewport) -> Position {
    if viewport.is_degenerate() {
        return Position::suppressed(Placement::Top);
    }

    let top = (viewport.height - content.height) / 2.0;
    let left = (viewport.width - content.width) / 2.0;

    Position {
        top: clamp_axis(top, content.height, viewport.height, viewport.padding),
        left: clamp_axis(left, content.width, viewport.width, viewport.padding),
        width: content.width,
        height: content.height,
        placement: Placement::Top,
    }
}

/// Keep `[start, start + extent]` within `[padding, viewport_extent - padding]`.
///
/// When the box does not fit it is pinned to the leading padding edge.
/// Never returns a negative coordinate for non-negative padding.
/// A NaN bound counts as not fitting, so this never panics.
#[inline]
pub fn clamp_axis(start: f32, extent: f32, viewport_extent: f32, padding: f32) -> f32 {
    let min = padding;
    let max = viewport_extent - padding - extent;
    if max.is_nan() || max < min {
        min
    } else {
        start.clamp(min, max)
    }
}
