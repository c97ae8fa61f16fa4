//! Drawer: explicitly opened panel flush with a viewport edge

use crate::geometry::Size;
use crate::model::{Edge, OverlayFlags, OverlayKind, OverlayPlacement, OverlaySpec, Trigger};

#[derive(Debug, Clone)]
pub struct Drawer {
    content: String,
    edge: Edge,
    size: Option<f32>,
    close_on_backdrop_click: bool,
    close_on_escape: bool,
}

impl Drawer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            edge: Edge::Right,
            size: None,
            close_on_backdrop_click: true,
            close_on_escape: true,
        }
    }

    /// Edge to slide in from (default `Right`)
    pub fn edge(mut self, edge: Edge) -> Self {
        self.edge = edge;
        self
    }

    /// Extent away from the edge; defaults to the configured drawer size
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn close_on_backdrop_click(mut self, enabled: bool) -> Self {
        self.close_on_backdrop_click = enabled;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    pub fn spec(self) -> OverlaySpec {
        OverlaySpec {
            kind: OverlayKind::Drawer,
            placement: OverlayPlacement::Edge {
                edge: self.edge,
                size: self.size,
            },
            flags: OverlayFlags {
                close_on_backdrop_click: self.close_on_backdrop_click,
                close_on_escape: self.close_on_escape,
                locks_scroll: true,
            },
            trigger: Trigger::Explicit,
            anchor: None,
            content: self.content,
            // Edge layouts take their box from the viewport, not the content
            content_size: Some(Size::default()),
        }
    }
}
