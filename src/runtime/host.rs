//! Host environment seam
//!
//! The engine never touches a document directly. Shared effects (page scroll
//! lock, global listeners) go through a [`Host`], applied exactly on the
//! reference-count transitions the registry reports.

use serde::Serialize;

use crate::model::ListenerKind;

pub trait Host {
    fn set_scroll_locked(&mut self, locked: bool);
    fn install_listener(&mut self, kind: ListenerKind);
    fn remove_listener(&mut self, kind: ListenerKind);
}

/// One effect applied to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum HostEffect {
    ScrollLock(bool),
    InstallListener(ListenerKind),
    RemoveListener(ListenerKind),
}

/// Host that records effects instead of applying them
#[derive(Debug, Default)]
pub struct HeadlessHost {
    scroll_locked: bool,
    listeners: Vec<ListenerKind>,
    effects: Vec<HostEffect>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn listeners(&self) -> &[ListenerKind] {
        &self.listeners
    }

    /// Every effect applied so far, in order
    pub fn effects(&self) -> &[HostEffect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }
}

impl Host for HeadlessHost {
    fn set_scroll_locked(&mut self, locked: bool) {
        if self.scroll_locked == locked {
            tracing::warn!("Scroll lock set to {} twice in a row", locked);
        }
        self.scroll_locked = locked;
        self.effects.push(HostEffect::ScrollLock(locked));
    }

    fn install_listener(&mut self, kind: ListenerKind) {
        if self.listeners.contains(&kind) {
            tracing::warn!("Listener {:?} installed twice", kind);
        } else {
            self.listeners.push(kind);
        }
        self.effects.push(HostEffect::InstallListener(kind));
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.listeners.retain(|k| *k != kind);
        self.effects.push(HostEffect::RemoveListener(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_host_records_effects() {
        let mut host = HeadlessHost::new();
        host.set_scroll_locked(true);
        host.install_listener(ListenerKind::KeyDown);
        host.remove_listener(ListenerKind::KeyDown);

        assert!(host.is_scroll_locked());
        assert!(!host.has_listener(ListenerKind::KeyDown));
        assert_eq!(
            host.effects(),
            &[
                HostEffect::ScrollLock(true),
                HostEffect::InstallListener(ListenerKind::KeyDown),
                HostEffect::RemoveListener(ListenerKind::KeyDown),
            ]
        );
    }
}
