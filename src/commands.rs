//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them against its timer queue, task queue and host.

use serde::Serialize;

use crate::geometry::Position;
use crate::messages::CloseReason;
use crate::model::{ListenerKind, OverlayId};

/// Identifies one scheduled open-delay timer.
///
/// The generation ties the timer to a single stay of its overlay in
/// `Opening`; a delivery with an older generation is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerKey {
    pub overlay: OverlayId,
    pub generation: u64,
}

/// Lifecycle notifications delivered to collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// Overlay reached `Open`
    Opened { id: OverlayId },
    /// Resolved position changed
    Moved { id: OverlayId, position: Position },
    /// Overlay reached `Closed`
    Closed { id: OverlayId, reason: CloseReason },
}

impl OverlayEvent {
    pub fn id(&self) -> OverlayId {
        match self {
            OverlayEvent::Opened { id }
            | OverlayEvent::Moved { id, .. }
            | OverlayEvent::Closed { id, .. } => *id,
        }
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Portal surface changed and needs repainting
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),

    // === Timers ===
    /// Schedule an open-delay timer; delivers `TimerMsg::OpenDelayElapsed`
    StartTimer { key: TimerKey, delay_ms: u64 },
    /// Unregister a pending timer so it never fires
    CancelTimer(TimerKey),

    // === Tasks ===
    /// Queue one coalesced `HostMsg::Reposition` task
    ScheduleReposition,

    // === Host effects ===
    /// Apply (true) or remove (false) the page-scroll lock
    SetScrollLock(bool),
    /// Install a global listener of this class
    InstallListener(ListenerKind),
    /// Remove the global listener of this class
    RemoveListener(ListenerKind),

    // === Collaborator notifications ===
    Notify(OverlayEvent),
}

impl Cmd {
    /// Create a batch of commands, dropping no-ops.
    /// Collapses to `Cmd::None` or the single command when possible.
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| *c != Cmd::None).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Whether executing this command repaints the portal surface.
    ///
    /// The runtime counts one repaint per dispatch, not one per `Redraw`.
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Timers and tasks redraw once they deliver and change state
            Cmd::StartTimer { .. } => false,
            Cmd::CancelTimer(_) => false,
            Cmd::ScheduleReposition => false,
            // Host effects don't touch the portal surface
            Cmd::SetScrollLock(_) => false,
            Cmd::InstallListener(_) => false,
            Cmd::RemoveListener(_) => false,
            Cmd::Notify(_) => false,
        }
    }

    /// Flatten nested batches into execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }
}
