//! Overlay registry
//!
//! Bookkeeping shared by every overlay: the stacking order, the scroll-lock
//! reference count and the reference counts of the global host listeners.
//! One instance lives in the engine model and is reached by reference from
//! every update; nothing here is a process global.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::overlay::{OverlayFlags, OverlayId, OverlayKind};

/// Stacking rank; higher ranks render above lower ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZRank(pub u64);

/// Class of global listener installed on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerKind {
    Scroll,
    Resize,
    KeyDown,
    PointerDown,
}

impl ListenerKind {
    /// Listener classes an open overlay with these flags depends on
    pub fn required_by(flags: &OverlayFlags) -> Vec<ListenerKind> {
        let mut kinds = vec![ListenerKind::Scroll, ListenerKind::Resize];
        if flags.close_on_escape {
            kinds.push(ListenerKind::KeyDown);
        }
        if flags.close_on_backdrop_click {
            kinds.push(ListenerKind::PointerDown);
        }
        kinds
    }
}

/// One active overlay as seen by the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistryEntry {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub flags: OverlayFlags,
    pub z_rank: ZRank,
}

/// Reference-count transition reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 0 -> 1: apply the shared effect
    Activated,
    /// 1 -> 0: remove the shared effect
    Deactivated,
    /// Count changed but the effect stays as it was
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    /// Active overlays in ascending z-rank (registration order)
    entries: Vec<RegistryEntry>,
    /// Last rank handed out; ranks are never reused
    last_rank: u64,
    scroll_lock_count: usize,
    listener_counts: HashMap<ListenerKind, usize>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an overlay and assign it the next stacking rank.
    ///
    /// Re-registering an id that is already active keeps its current rank.
    pub fn register(&mut self, id: OverlayId, kind: OverlayKind, flags: OverlayFlags) -> ZRank {
        if let Some(entry) = self.entries.iter().find(|e| e.id == id) {
            tracing::warn!("Overlay {:?} registered twice, keeping rank", id);
            return entry.z_rank;
        }

        self.last_rank += 1;
        let z_rank = ZRank(self.last_rank);
        self.entries.push(RegistryEntry {
            id,
            kind,
            flags,
            z_rank,
        });
        z_rank
    }

    /// Remove an overlay; unknown ids are ignored
    pub fn unregister(&mut self, id: OverlayId) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: OverlayId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.get(id).is_some()
    }

    /// The highest-ranked active overlay satisfying `predicate`
    pub fn topmost<F>(&self, predicate: F) -> Option<OverlayId>
    where
        F: Fn(&RegistryEntry) -> bool,
    {
        self.entries.iter().rev().find(|e| predicate(e)).map(|e| e.id)
    }

    /// Active overlays from the bottom of the stack to the top
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Active overlays ranked strictly above `id`, bottom to top
    pub fn above(&self, id: OverlayId) -> impl Iterator<Item = &RegistryEntry> {
        let start = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .map(|i| i + 1)
            .unwrap_or(self.entries.len());
        self.entries[start..].iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // === Scroll lock ===

    pub fn acquire_scroll_lock(&mut self) -> Transition {
        self.scroll_lock_count += 1;
        if self.scroll_lock_count == 1 {
            Transition::Activated
        } else {
            Transition::Unchanged
        }
    }

    /// Release one scroll-lock reference. Releasing at zero is ignored.
    pub fn release_scroll_lock(&mut self) -> Transition {
        match self.scroll_lock_count {
            0 => {
                tracing::warn!("Scroll lock released with no holders");
                Transition::Unchanged
            }
            1 => {
                self.scroll_lock_count = 0;
                Transition::Deactivated
            }
            _ => {
                self.scroll_lock_count -= 1;
                Transition::Unchanged
            }
        }
    }

    pub fn scroll_lock_count(&self) -> usize {
        self.scroll_lock_count
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock_count > 0
    }

    // === Global listeners ===

    pub fn acquire_listener(&mut self, kind: ListenerKind) -> Transition {
        let count = self.listener_counts.entry(kind).or_insert(0);
        *count += 1;
        if *count == 1 {
            Transition::Activated
        } else {
            Transition::Unchanged
        }
    }

    pub fn release_listener(&mut self, kind: ListenerKind) -> Transition {
        match self.listener_counts.get_mut(&kind) {
            Some(count) if *count > 1 => {
                *count -= 1;
                Transition::Unchanged
            }
            Some(_) => {
                self.listener_counts.remove(&kind);
                Transition::Deactivated
            }
            None => {
                tracing::warn!("Listener {:?} released with no users", kind);
                Transition::Unchanged
            }
        }
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listener_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Drop all state. Intended for tests and host resets.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
