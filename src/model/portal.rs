//! Portal surface
//!
//! Every overlay's content is mounted onto one shared top-level surface that
//! sits outside the page's content root, so clipping or stacking contexts of
//! the trigger's ancestors never truncate an overlay. Paint order comes from
//! each layer's z-index, never from mount order.

use serde::Serialize;

use super::overlay::OverlayId;
use crate::geometry::Position;

/// Identifies one mounted layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PortalHandle(pub u64);

/// Content handed to the portal for mounting
#[derive(Debug, Clone, PartialEq)]
pub struct PortalContent {
    pub overlay: OverlayId,
    pub body: String,
}

/// A mounted layer on the shared surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalLayer {
    pub handle: PortalHandle,
    pub overlay: OverlayId,
    pub body: String,
    /// Style property controlling paint order
    pub z_index: u64,
    /// Where to paint; `None` until positioned
    pub position: Option<Position>,
}

#[derive(Debug, Clone)]
pub struct PortalSurface {
    /// Identifier of the surface container, distinct from the content root
    root_id: String,
    /// Layers in mount order
    layers: Vec<PortalLayer>,
    next_handle: u64,
}

impl PortalSurface {
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            layers: Vec::new(),
            next_handle: 1,
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Append content to the surface
    pub fn mount(&mut self, content: PortalContent) -> PortalHandle {
        let handle = PortalHandle(self.next_handle);
        self.next_handle += 1;
        self.layers.push(PortalLayer {
            handle,
            overlay: content.overlay,
            body: content.body,
            z_index: 0,
            position: None,
        });
        tracing::trace!("Portal {}: mounted {:?}", self.root_id, handle);
        handle
    }

    /// Remove a layer; unknown handles are ignored
    pub fn unmount(&mut self, handle: PortalHandle) -> Option<PortalLayer> {
        let index = self.layers.iter().position(|l| l.handle == handle)?;
        tracing::trace!("Portal {}: unmounted {:?}", self.root_id, handle);
        Some(self.layers.remove(index))
    }

    pub fn set_z_index(&mut self, handle: PortalHandle, z_index: u64) {
        if let Some(layer) = self.layer_mut(handle) {
            layer.z_index = z_index;
        }
    }

    pub fn set_position(&mut self, handle: PortalHandle, position: Option<Position>) {
        if let Some(layer) = self.layer_mut(handle) {
            layer.position = position;
        }
    }

    pub fn layer(&self, handle: PortalHandle) -> Option<&PortalLayer> {
        self.layers.iter().find(|l| l.handle == handle)
    }

    fn layer_mut(&mut self, handle: PortalHandle) -> Option<&mut PortalLayer> {
        self.layers.iter_mut().find(|l| l.handle == handle)
    }

    /// Layers in mount order
    pub fn layers(&self) -> &[PortalLayer] {
        &self.layers
    }

    /// Layers in paint order (lowest z-index first). Stable for equal z-indices.
    pub fn stacked(&self) -> Vec<&PortalLayer> {
        let mut layers: Vec<&PortalLayer> = self.layers.iter().collect();
        layers.sort_by_key(|l| l.z_index);
        layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(id: u64) -> PortalContent {
        PortalContent {
            overlay: OverlayId(id),
            body: format!("overlay {}", id),
        }
    }

    #[test]
    fn test_mount_and_unmount() {
        let mut portal = PortalSurface::new("overlay-root");
        let a = portal.mount(content(1));
        let b = portal.mount(content(2));
        assert_ne!(a, b);
        assert_eq!(portal.len(), 2);

        let removed = portal.unmount(a).unwrap();
        assert_eq!(removed.overlay, OverlayId(1));
        assert!(portal.unmount(a).is_none());
        assert_eq!(portal.len(), 1);
    }

    #[test]
    fn test_paint_order_follows_z_index_not_mount_order() {
        let mut portal = PortalSurface::new("overlay-root");
        let first = portal.mount(content(1));
        let second = portal.mount(content(2));
        portal.set_z_index(first, 1002);
        portal.set_z_index(second, 1001);

        let order: Vec<_> = portal.stacked().iter().map(|l| l.overlay).collect();
        assert_eq!(order, vec![OverlayId(2), OverlayId(1)]);
    }
}
