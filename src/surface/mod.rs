//! Surface primitives
//!
//! Tooltip, Modal and Drawer are configuration only: each builds an
//! [`OverlaySpec`](crate::model::OverlaySpec) (kind + placement + flags +
//! trigger) that the one shared lifecycle controller consumes. This module
//! also resolves each placement kind to an absolute position.

pub mod drawer;
pub mod modal;
pub mod tooltip;

pub use drawer::Drawer;
pub use modal::Modal;
pub use tooltip::Tooltip;

use crate::config::EngineConfig;
use crate::geometry::{
    center_in_viewport, try_compute_position, Placement, Position, Rect, Size, Viewport,
};
use crate::model::{Edge, OverlayPlacement};

/// Resolve an overlay's placement to a position.
///
/// Returns `None` only when an anchored placement has no measurable anchor.
/// `anchor` is ignored by the centered and edge layouts.
pub fn resolve_position(
    placement: OverlayPlacement,
    anchor: Option<Rect>,
    content: Size,
    viewport: Viewport,
    config: &EngineConfig,
) -> Option<Position> {
    match placement {
        OverlayPlacement::Anchored(side) => {
            try_compute_position(anchor, content, side, viewport, config.gap)
        }
        OverlayPlacement::Centered => Some(center_in_viewport(content, viewport)),
        OverlayPlacement::Edge { edge, size } => Some(edge_position(
            edge,
            size.unwrap_or(config.drawer_size),
            viewport,
        )),
    }
}

/// Flush a panel against a viewport edge.
///
/// The panel spans the whole viewport along the edge; `size` is its extent
/// away from the edge, capped at the viewport. Padding does not apply.
pub fn edge_position(edge: Edge, size: f32, viewport: Viewport) -> Position {
    let side = match edge {
        Edge::Left => Placement::Left,
        Edge::Right => Placement::Right,
        Edge::Top => Placement::Top,
        Edge::Bottom => Placement::Bottom,
    };
    if viewport.is_degenerate() {
        return Position::suppressed(side);
    }

    let size = size.max(0.0);
    match edge {
        Edge::Left | Edge::Right => {
            let width = size.min(viewport.width);
            let left = if edge == Edge::Left {
                0.0
            } else {
                viewport.width - width
            };
            Position {
                top: 0.0,
                left,
                width,
                height: viewport.height,
                placement: side,
            }
        }
        Edge::Top | Edge::Bottom => {
            let height = size.min(viewport.height);
            let top = if edge == Edge::Top {
                0.0
            } else {
                viewport.height - height
            };
            Position {
                top,
                left: 0.0,
                width: viewport.width,
                height,
                placement: side,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_right_drawer_is_flush() {
        let pos = edge_position(Edge::Right, 320.0, viewport());
        assert_eq!(pos.left, 480.0);
        assert_eq!(pos.top, 0.0);
        assert_eq!(pos.width, 320.0);
        assert_eq!(pos.height, 600.0);
    }

    #[test]
    fn test_bottom_drawer_size_capped_at_viewport() {
        let pos = edge_position(Edge::Bottom, 900.0, viewport());
        assert_eq!(pos.top, 0.0);
        assert_eq!(pos.height, 600.0);
        assert_eq!(pos.width, 800.0);
    }

    #[test]
    fn test_edge_uses_configured_default_size() {
        let config = EngineConfig {
            drawer_size: 250.0,
            ..EngineConfig::default()
        };
        let pos = resolve_position(
            OverlayPlacement::Edge {
                edge: Edge::Left,
                size: None,
            },
            None,
            Size::default(),
            viewport(),
            &config,
        )
        .unwrap();
        assert_eq!(pos.left, 0.0);
        assert_eq!(pos.width, 250.0);
    }

    #[test]
    fn test_anchored_without_anchor_has_no_position() {
        let pos = resolve_position(
            OverlayPlacement::Anchored(Placement::Bottom),
            None,
            Size::new(10.0, 10.0),
            viewport(),
            &EngineConfig::default(),
        );
        assert!(pos.is_none());
    }

    #[test]
    fn test_centered_ignores_anchor() {
        let pos = resolve_position(
            OverlayPlacement::Centered,
            None,
            Size::new(200.0, 100.0),
            viewport(),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(pos.left, 300.0);
        assert_eq!(pos.top, 250.0);
    }

    #[test]
    fn test_degenerate_viewport_suppresses_drawer() {
        let pos = edge_position(Edge::Top, 200.0, Viewport::new(800.0, 0.0));
        assert!(!pos.is_visible());
    }
}
