//! Modal: explicitly opened, centered, locks page scroll

use crate::geometry::Size;
use crate::model::{OverlayFlags, OverlayKind, OverlayPlacement, OverlaySpec, Trigger};

#[derive(Debug, Clone)]
pub struct Modal {
    content: String,
    close_on_backdrop_click: bool,
    close_on_escape: bool,
    content_size: Option<Size>,
}

impl Modal {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            close_on_backdrop_click: true,
            close_on_escape: true,
            content_size: None,
        }
    }

    pub fn close_on_backdrop_click(mut self, enabled: bool) -> Self {
        self.close_on_backdrop_click = enabled;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    pub fn content_size(mut self, size: Size) -> Self {
        self.content_size = Some(size);
        self
    }

    pub fn spec(self) -> OverlaySpec {
        OverlaySpec {
            kind: OverlayKind::Modal,
            placement: OverlayPlacement::Centered,
            flags: OverlayFlags {
                close_on_backdrop_click: self.close_on_backdrop_click,
                close_on_escape: self.close_on_escape,
                locks_scroll: true,
            },
            trigger: Trigger::Explicit,
            anchor: None,
            content: self.content,
            content_size: self.content_size,
        }
    }
}
