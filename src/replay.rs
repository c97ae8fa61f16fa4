//! Scenario replay
//!
//! Loads a YAML script of interactions, drives a headless runtime through it
//! and records what happened after every step. Used to reproduce interaction
//! bugs outside a real host.
//!
//! ```yaml
//! viewport: { width: 800, height: 600 }
//! anchors:
//!   button: { x: 100, y: 100, width: 50, height: 20 }
//! steps:
//!   - do: hover_enter
//!     name: tip
//!     anchor: button
//!     text: Enroll now
//!   - do: advance
//!     ms: 200
//!   - do: key
//!     key: escape
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::commands::OverlayEvent;
use crate::config::EngineConfig;
use crate::geometry::{Placement, Position, Rect, Size};
use crate::messages::Key;
use crate::model::{AnchorHandle, Edge, ElementAnchor, OverlayId, Visibility};
use crate::runtime::{HeadlessHost, HostEffect, OverlayGuard, Runtime};
use crate::surface::{Drawer, Modal, Tooltip};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

/// A replay scenario
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub viewport: ViewportSpec,
    /// Overrides the loaded engine config when present
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Named anchor elements and their initial bounding boxes
    #[serde(default)]
    pub anchors: BTreeMap<String, Rect>,
    pub steps: Vec<Step>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum Step {
    HoverEnter {
        name: String,
        anchor: String,
        text: String,
        #[serde(default)]
        placement: Option<Placement>,
        #[serde(default)]
        delay_ms: Option<u64>,
        #[serde(default)]
        size: Option<Size>,
    },
    HoverLeave {
        name: String,
    },
    OpenModal {
        name: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        size: Option<Size>,
        #[serde(default = "default_true")]
        close_on_escape: bool,
        #[serde(default = "default_true")]
        close_on_backdrop_click: bool,
    },
    OpenDrawer {
        name: String,
        #[serde(default)]
        content: String,
        edge: Edge,
        #[serde(default)]
        size: Option<f32>,
        #[serde(default = "default_true")]
        close_on_escape: bool,
        #[serde(default = "default_true")]
        close_on_backdrop_click: bool,
    },
    Close {
        name: String,
    },
    Measured {
        name: String,
        width: f32,
        height: f32,
    },
    /// Owning collaborator disappears without closing
    Unmount {
        name: String,
    },
    Advance {
        ms: u64,
    },
    Scroll {
        #[serde(default = "default_scroll_count")]
        count: usize,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Key {
        key: Key,
    },
    Pointer {
        x: f32,
        y: f32,
    },
    MoveAnchor {
        anchor: String,
        rect: Rect,
    },
    DetachAnchor {
        anchor: String,
    },
    /// Run queued tasks (coalesced repositions, teardowns)
    Flush,
}

fn default_scroll_count() -> usize {
    1
}

impl Step {
    /// Short label for trace output
    fn label(&self) -> String {
        match self {
            Step::HoverEnter { name, anchor, .. } => format!("hover_enter {} on {}", name, anchor),
            Step::HoverLeave { name } => format!("hover_leave {}", name),
            Step::OpenModal { name, .. } => format!("open_modal {}", name),
            Step::OpenDrawer { name, edge, .. } => format!("open_drawer {} ({:?})", name, edge),
            Step::Close { name } => format!("close {}", name),
            Step::Measured {
                name,
                width,
                height,
            } => format!("measured {} {}x{}", name, width, height),
            Step::Unmount { name } => format!("unmount {}", name),
            Step::Advance { ms } => format!("advance {}ms", ms),
            Step::Scroll { count } => format!("scroll x{}", count),
            Step::Resize { width, height } => format!("resize {}x{}", width, height),
            Step::Key { key } => format!("key {:?}", key),
            Step::Pointer { x, y } => format!("pointer ({}, {})", x, y),
            Step::MoveAnchor { anchor, .. } => format!("move_anchor {}", anchor),
            Step::DetachAnchor { anchor } => format!("detach_anchor {}", anchor),
            Step::Flush => "flush".to_string(),
        }
    }
}

/// State of one named overlay after a step
#[derive(Debug, Clone, Serialize)]
pub struct OverlayState {
    pub name: String,
    pub visibility: Visibility,
    pub z_index: Option<u64>,
    pub position: Option<Position>,
}

/// What one step did
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub step: usize,
    pub action: String,
    pub at_ms: u64,
    pub events: Vec<NamedEvent>,
    pub effects: Vec<HostEffect>,
    pub overlays: Vec<OverlayState>,
    pub scroll_locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedEvent {
    pub overlay: String,
    #[serde(flatten)]
    pub event: OverlayEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub entries: Vec<TraceEntry>,
}

impl Script {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("Invalid replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("In {}", path.display()))
    }
}

/// Live state of a replay
struct Session {
    runtime: Runtime<HeadlessHost>,
    anchors: BTreeMap<String, Rc<ElementAnchor>>,
    overlays: BTreeMap<String, OverlayId>,
    guards: BTreeMap<String, OverlayGuard>,
}

impl Session {
    fn anchor(&self, name: &str) -> Result<&Rc<ElementAnchor>> {
        self.anchors
            .get(name)
            .ok_or_else(|| anyhow!("Unknown anchor '{}'", name))
    }

    fn overlay(&self, name: &str) -> Result<OverlayId> {
        self.overlays
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Unknown overlay '{}'", name))
    }

    fn track(&mut self, name: String, id: OverlayId) {
        let guard = self.runtime.guard(id);
        // Replacing a guard for a reused name must not tear the old overlay down
        if let Some(old) = self.guards.insert(name.clone(), guard) {
            old.disarm();
        }
        self.overlays.insert(name, id);
    }

    fn apply(&mut self, step: Step) -> Result<()> {
        match step {
            Step::HoverEnter {
                name,
                anchor,
                text,
                placement,
                delay_ms,
                size,
            } => {
                let handle = AnchorHandle::new(self.anchor(&anchor)?);
                let mut tooltip = Tooltip::new(text);
                if let Some(placement) = placement {
                    tooltip = tooltip.placement(placement);
                }
                if let Some(delay_ms) = delay_ms {
                    tooltip = tooltip.delay_ms(delay_ms);
                }
                if let Some(size) = size {
                    tooltip = tooltip.content_size(size);
                }
                let id = self.runtime.hover_enter(tooltip.spec(handle));
                self.track(name, id);
            }
            Step::HoverLeave { name } => {
                let id = self.overlay(&name)?;
                self.runtime.hover_leave(id);
            }
            Step::OpenModal {
                name,
                content,
                size,
                close_on_escape,
                close_on_backdrop_click,
            } => {
                let mut modal = Modal::new(content)
                    .close_on_escape(close_on_escape)
                    .close_on_backdrop_click(close_on_backdrop_click);
                if let Some(size) = size {
                    modal = modal.content_size(size);
                }
                let id = self.runtime.open(modal.spec());
                self.track(name, id);
            }
            Step::OpenDrawer {
                name,
                content,
                edge,
                size,
                close_on_escape,
                close_on_backdrop_click,
            } => {
                let mut drawer = Drawer::new(content)
                    .edge(edge)
                    .close_on_escape(close_on_escape)
                    .close_on_backdrop_click(close_on_backdrop_click);
                if let Some(size) = size {
                    drawer = drawer.size(size);
                }
                let id = self.runtime.open(drawer.spec());
                self.track(name, id);
            }
            Step::Close { name } => {
                let id = self.overlay(&name)?;
                self.runtime.close(id);
            }
            Step::Measured {
                name,
                width,
                height,
            } => {
                let id = self.overlay(&name)?;
                self.runtime.measured(id, Size::new(width, height));
            }
            Step::Unmount { name } => {
                if self.guards.remove(&name).is_none() {
                    bail!("Unknown overlay '{}'", name);
                }
                self.runtime.run_until_idle();
            }
            Step::Advance { ms } => self.runtime.advance(ms),
            Step::Scroll { count } => {
                for _ in 0..count {
                    self.runtime.scroll();
                }
            }
            Step::Resize { width, height } => self.runtime.resize(width, height),
            Step::Key { key } => self.runtime.key_down(key),
            Step::Pointer { x, y } => self.runtime.pointer_down(x, y),
            Step::MoveAnchor { anchor, rect } => self.anchor(&anchor)?.set_rect(rect),
            Step::DetachAnchor { anchor } => {
                // Dropping the only strong reference unmounts the element
                if self.anchors.remove(&anchor).is_none() {
                    bail!("Unknown anchor '{}'", anchor);
                }
            }
            Step::Flush => self.runtime.run_until_idle(),
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<OverlayState> {
        let model = self.runtime.model();
        self.overlays
            .iter()
            .map(|(name, &id)| {
                let overlay = model.overlay(id);
                OverlayState {
                    name: name.clone(),
                    visibility: model.visibility(id),
                    z_index: overlay
                        .and_then(|o| o.portal)
                        .and_then(|h| model.portal.layer(h))
                        .map(|layer| layer.z_index),
                    position: model.position(id),
                }
            })
            .collect()
    }

    fn name_of(&self, id: OverlayId) -> String {
        self.overlays
            .iter()
            .find(|(_, &oid)| oid == id)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| format!("#{}", id.0))
    }
}

/// Run a script to completion and collect its trace
pub fn run(script: Script, config: EngineConfig) -> Result<Trace> {
    let config = script.config.unwrap_or(config);
    let mut session = Session {
        runtime: Runtime::headless(config, script.viewport.width, script.viewport.height),
        anchors: script
            .anchors
            .into_iter()
            .map(|(name, rect)| (name, ElementAnchor::new(rect)))
            .collect(),
        overlays: BTreeMap::new(),
        guards: BTreeMap::new(),
    };

    let mut entries = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.into_iter().enumerate() {
        let action = step.label();
        tracing::debug!(step = index + 1, %action, "replay step");

        session
            .apply(step)
            .with_context(|| format!("Step {} ({})", index + 1, action))?;

        let events = session
            .runtime
            .take_events()
            .into_iter()
            .map(|event| NamedEvent {
                overlay: session.name_of(event.id()),
                event,
            })
            .collect();

        entries.push(TraceEntry {
            step: index + 1,
            action,
            at_ms: session.runtime.now_ms(),
            events,
            effects: session.runtime.host_mut().take_effects(),
            overlays: session.snapshot(),
            scroll_locked: session.runtime.host().is_scroll_locked(),
        });
    }

    // Scripted overlays are owned by the script; don't tear them down on exit
    for (_, guard) in std::mem::take(&mut session.guards) {
        guard.disarm();
    }

    Ok(Trace { entries })
}

impl Trace {
    /// Human-readable rendering, one block per step
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "[{:>3}] t={}ms {}\n",
                entry.step, entry.at_ms, entry.action
            ));
            for named in &entry.events {
                let line = match &named.event {
                    OverlayEvent::Opened { .. } => "opened".to_string(),
                    OverlayEvent::Moved { position, .. } => format!(
                        "moved to ({}, {}) {}x{}",
                        position.left, position.top, position.width, position.height
                    ),
                    OverlayEvent::Closed { reason, .. } => format!("closed ({:?})", reason),
                };
                out.push_str(&format!("      {} {}\n", named.overlay, line));
            }
            for effect in &entry.effects {
                out.push_str(&format!("      host {:?}\n", effect));
            }
            for state in &entry.overlays {
                if state.visibility == Visibility::Closed {
                    continue;
                }
                out.push_str(&format!(
                    "      = {} {:?} z={}\n",
                    state.name,
                    state.visibility,
                    state
                        .z_index
                        .map(|z| z.to_string())
                        .unwrap_or_else(|| "-".to_string())
                ));
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize trace")
    }

    /// Last recorded state of a named overlay
    pub fn final_state(&self, name: &str) -> Option<&OverlayState> {
        self.entries
            .last()?
            .overlays
            .iter()
            .find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_script() {
        let script = Script::from_yaml(
            r#"
viewport: { width: 800, height: 600 }
steps:
  - do: open_modal
    name: a
  - do: key
    key: escape
"#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 2);
        assert!(script.config.is_none());
        assert!(matches!(
            script.steps[0],
            Step::OpenModal {
                close_on_escape: true,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_overlay_is_an_error() {
        let script = Script::from_yaml(
            r#"
viewport: { width: 800, height: 600 }
steps:
  - do: close
    name: ghost
"#,
        )
        .unwrap();
        let err = run(script, EngineConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("ghost"));
    }

    #[test]
    fn test_unmount_tears_down() {
        let script = Script::from_yaml(
            r#"
viewport: { width: 800, height: 600 }
steps:
  - do: open_modal
    name: a
  - do: unmount
    name: a
"#,
        )
        .unwrap();
        let trace = run(script, EngineConfig::default()).unwrap();
        assert_eq!(
            trace.final_state("a").unwrap().visibility,
            Visibility::Closed
        );
        assert!(!trace.entries[1].scroll_locked);
    }
}
