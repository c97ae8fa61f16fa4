//! Engine model - the complete state of the overlay engine
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod anchor;
pub mod overlay;
pub mod portal;
pub mod registry;

use std::collections::BTreeMap;

pub use anchor::{Anchor, AnchorHandle, ElementAnchor};
pub use overlay::{
    Edge, Overlay, OverlayFlags, OverlayId, OverlayKind, OverlayPlacement, OverlaySpec, Trigger,
    Visibility,
};
pub use portal::{PortalContent, PortalHandle, PortalLayer, PortalSurface};
pub use registry::{ListenerKind, OverlayRegistry, RegistryEntry, Transition, ZRank};

use crate::config::EngineConfig;
use crate::geometry::{Position, Size, Viewport};

/// The complete engine model
#[derive(Debug)]
pub struct EngineModel {
    /// Every overlay between its trigger request and reaching `Closed`
    pub overlays: BTreeMap<OverlayId, Overlay>,
    /// Stacking order, scroll lock and listener bookkeeping
    pub registry: OverlayRegistry,
    /// Shared top-level surface overlays are mounted on
    pub portal: PortalSurface,
    /// Engine configuration
    pub config: EngineConfig,
    /// Latest viewport size reported by the host
    pub viewport_size: Size,
    /// A reposition task is queued and has not run yet
    pub reposition_scheduled: bool,
    next_overlay_id: u64,
}

impl EngineModel {
    /// Create a new engine model for a viewport of the given size
    pub fn new(config: EngineConfig, viewport_width: f32, viewport_height: f32) -> Self {
        let portal = PortalSurface::new(config.portal_root.clone());
        Self {
            overlays: BTreeMap::new(),
            registry: OverlayRegistry::new(),
            portal,
            config,
            viewport_size: Size::new(viewport_width, viewport_height),
            reposition_scheduled: false,
            next_overlay_id: 1,
        }
    }

    /// Allocate a fresh overlay identity. Identities are never reused.
    pub fn allocate_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_overlay_id);
        self.next_overlay_id += 1;
        id
    }

    /// Fresh viewport snapshot for a position query
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_size.width, self.viewport_size.height)
            .with_padding(self.config.viewport_padding)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Visibility of an overlay; destroyed or unknown overlays are `Closed`
    pub fn visibility(&self, id: OverlayId) -> Visibility {
        self.overlays
            .get(&id)
            .map(|o| o.visibility)
            .unwrap_or(Visibility::Closed)
    }

    /// Resolved position, `None` while not yet positioned
    pub fn position(&self, id: OverlayId) -> Option<Position> {
        self.overlays.get(&id).and_then(|o| o.position)
    }

    /// Ids of open overlays, bottom of the stack first
    pub fn open_overlays(&self) -> Vec<OverlayId> {
        self.registry.entries().iter().map(|e| e.id).collect()
    }

    /// Drop every overlay and all shared bookkeeping
    pub fn reset(&mut self) {
        self.overlays.clear();
        self.registry.reset();
        self.portal = PortalSurface::new(self.config.portal_root.clone());
        self.reposition_scheduled = false;
    }

    /// Check cross-structure consistency (debug builds only)
    ///
    /// Panics with a descriptive message if any invariant is violated.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self, context: &str) {
        let open: Vec<&Overlay> = self.overlays.values().filter(|o| o.is_open()).collect();

        assert_eq!(
            self.registry.len(),
            open.len(),
            "[{}] registry has {} entries but {} overlays are open",
            context,
            self.registry.len(),
            open.len()
        );
        assert_eq!(
            self.portal.len(),
            open.len(),
            "[{}] portal has {} layers but {} overlays are open",
            context,
            self.portal.len(),
            open.len()
        );

        let lock_holders = open.iter().filter(|o| o.holds_scroll_lock).count();
        assert_eq!(
            self.registry.scroll_lock_count(),
            lock_holders,
            "[{}] scroll lock count {} does not match {} holders",
            context,
            self.registry.scroll_lock_count(),
            lock_holders
        );

        let ranks: Vec<ZRank> = self.registry.entries().iter().map(|e| e.z_rank).collect();
        assert!(
            ranks.windows(2).all(|w| w[0] < w[1]),
            "[{}] z-ranks not strictly increasing: {:?}",
            context,
            ranks
        );

        for overlay in self.overlays.values() {
            assert!(
                overlay.visibility != Visibility::Closed && overlay.visibility != Visibility::Closing,
                "[{}] overlay {:?} left in the model after closing",
                context,
                overlay.id
            );
            assert!(
                overlay.open_timer.is_none() || overlay.visibility == Visibility::Opening,
                "[{}] overlay {:?} has a pending timer while {:?}",
                context,
                overlay.id,
                overlay.visibility
            );
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    pub fn assert_invariants(&self, _context: &str) {}
}
