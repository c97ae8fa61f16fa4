//! Runtime module - single-threaded cooperative scheduler
//!
//! Drives the update loop for a host environment:
//! - `timers` - virtual-clock timer queue with cancellable keys
//! - `host` - the `Host` seam for scroll lock and global listeners
//!
//! Every input becomes a `Msg`, processed to completion; the returned `Cmd`
//! is executed against the timer queue, the task queue and the host.

pub mod host;
pub mod timers;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub use host::{HeadlessHost, Host, HostEffect};
pub use timers::TimerQueue;

use crate::commands::{Cmd, OverlayEvent};
use crate::config::EngineConfig;
use crate::geometry::{Position, Size};
use crate::messages::{CloseReason, HostMsg, Key, Msg, OverlayMsg, TimerMsg};
use crate::model::{EngineModel, OverlayId, OverlaySpec, Visibility};
use crate::update::update;

type OpenCallback = Box<dyn FnMut(OverlayId)>;
type CloseCallback = Box<dyn FnMut(OverlayId, CloseReason)>;

/// Collaborator callbacks for one overlay
#[derive(Default)]
pub struct LifecycleCallbacks {
    pub on_open: Option<OpenCallback>,
    pub on_close: Option<CloseCallback>,
}

impl LifecycleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl FnMut(OverlayId) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnMut(OverlayId, CloseReason) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

/// Overlays whose owning collaborator went away, awaiting teardown
type TeardownInbox = Rc<RefCell<Vec<OverlayId>>>;

/// Tears its overlay down when dropped.
///
/// Hand one to the collaborator that owns the overlay; if the collaborator
/// disappears without closing, the overlay is still destroyed on the next
/// runtime turn.
#[derive(Debug)]
pub struct OverlayGuard {
    id: OverlayId,
    inbox: TeardownInbox,
    armed: bool,
}

impl OverlayGuard {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Give up teardown responsibility without closing the overlay
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        if self.armed {
            self.inbox.borrow_mut().push(self.id);
        }
    }
}

pub struct Runtime<H: Host> {
    model: EngineModel,
    host: H,
    timers: TimerQueue,
    tasks: VecDeque<Msg>,
    teardown_inbox: TeardownInbox,
    callbacks: HashMap<OverlayId, LifecycleCallbacks>,
    events: Vec<OverlayEvent>,
    redraws: usize,
}

impl Runtime<HeadlessHost> {
    /// Runtime over a recording host
    pub fn headless(config: EngineConfig, viewport_width: f32, viewport_height: f32) -> Self {
        Self::new(
            EngineModel::new(config, viewport_width, viewport_height),
            HeadlessHost::new(),
        )
    }
}

impl<H: Host> Runtime<H> {
    pub fn new(model: EngineModel, host: H) -> Self {
        Self {
            model,
            host,
            timers: TimerQueue::new(),
            tasks: VecDeque::new(),
            teardown_inbox: Rc::new(RefCell::new(Vec::new())),
            callbacks: HashMap::new(),
            events: Vec::new(),
            redraws: 0,
        }
    }

    // === Collaborator API ===

    /// Pointer entered an anchor: start opening a hover-triggered overlay
    pub fn hover_enter(&mut self, spec: OverlaySpec) -> OverlayId {
        self.hover_enter_with(spec, LifecycleCallbacks::default())
    }

    pub fn hover_enter_with(
        &mut self,
        spec: OverlaySpec,
        callbacks: LifecycleCallbacks,
    ) -> OverlayId {
        let id = self.model.allocate_id();
        self.callbacks.insert(id, callbacks);
        self.dispatch(Msg::Overlay(OverlayMsg::HoverEnter { id, spec }));
        id
    }

    pub fn hover_leave(&mut self, id: OverlayId) {
        self.dispatch(Msg::Overlay(OverlayMsg::HoverLeave { id }));
    }

    /// Open an overlay immediately
    pub fn open(&mut self, spec: OverlaySpec) -> OverlayId {
        self.open_with(spec, LifecycleCallbacks::default())
    }

    pub fn open_with(&mut self, spec: OverlaySpec, callbacks: LifecycleCallbacks) -> OverlayId {
        let id = self.model.allocate_id();
        self.callbacks.insert(id, callbacks);
        self.dispatch(Msg::Overlay(OverlayMsg::Open { id, spec }));
        id
    }

    pub fn close(&mut self, id: OverlayId) {
        self.dispatch(Msg::Overlay(OverlayMsg::Close { id }));
    }

    /// Report the rendered content size of an overlay
    pub fn measured(&mut self, id: OverlayId, size: Size) {
        self.dispatch(Msg::Overlay(OverlayMsg::ContentMeasured { id, size }));
    }

    /// Teardown guard for an overlay
    pub fn guard(&self, id: OverlayId) -> OverlayGuard {
        OverlayGuard {
            id,
            inbox: Rc::clone(&self.teardown_inbox),
            armed: true,
        }
    }

    // === Host input ===

    pub fn scroll(&mut self) {
        self.dispatch(Msg::Host(HostMsg::Scroll));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.dispatch(Msg::Host(HostMsg::Resize { width, height }));
    }

    pub fn key_down(&mut self, key: Key) {
        self.dispatch(Msg::Host(HostMsg::KeyDown(key)));
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dispatch(Msg::Host(HostMsg::PointerDown { x, y }));
    }

    // === Scheduling ===

    /// Queue a message as a task for the next `run_until_idle`
    pub fn post(&mut self, msg: Msg) {
        self.tasks.push_back(msg);
    }

    /// Process one message to completion and execute its commands
    ///
    /// Teardowns from dropped guards are applied first, so an orphaned
    /// overlay never sees another event.
    pub fn dispatch(&mut self, msg: Msg) {
        self.process_teardowns();
        if let Some(cmd) = update(&mut self.model, msg) {
            // One repaint per dispatch, however many overlays changed
            if cmd.needs_redraw() {
                self.redraws += 1;
            }
            self.process_cmd(cmd);
        }
        // Overlays cancelled before opening never emit Closed
        let overlays = &self.model.overlays;
        self.callbacks.retain(|id, _| overlays.contains_key(id));
    }

    /// Drain pending teardowns and queued tasks
    pub fn run_until_idle(&mut self) {
        loop {
            self.process_teardowns();
            let Some(msg) = self.tasks.pop_front() else {
                break;
            };
            self.dispatch(msg);
        }
    }

    /// Advance the virtual clock, firing due timers in deadline order
    pub fn advance(&mut self, ms: u64) {
        let target = self.timers.now_ms().saturating_add(ms);
        self.run_until_idle();
        while let Some(key) = self.timers.pop_due(target) {
            self.dispatch(Msg::Timer(TimerMsg::OpenDelayElapsed(key)));
            self.run_until_idle();
        }
        self.timers.set_now(target);
    }

    fn process_teardowns(&mut self) {
        let ids: Vec<OverlayId> = self.teardown_inbox.borrow_mut().drain(..).collect();
        for id in ids {
            tracing::debug!("Tearing down overlay {:?} after owner went away", id);
            self.dispatch(Msg::Overlay(OverlayMsg::Teardown { id }));
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Redraw => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::StartTimer { key, delay_ms } => self.timers.schedule(key, delay_ms),
            Cmd::CancelTimer(key) => {
                if !self.timers.cancel(key) {
                    tracing::debug!("Timer {:?} already gone when cancelled", key);
                }
            }
            Cmd::ScheduleReposition => self.tasks.push_back(Msg::Host(HostMsg::Reposition)),
            Cmd::SetScrollLock(locked) => self.host.set_scroll_locked(locked),
            Cmd::InstallListener(kind) => self.host.install_listener(kind),
            Cmd::RemoveListener(kind) => self.host.remove_listener(kind),
            Cmd::Notify(event) => self.notify(event),
        }
    }

    fn notify(&mut self, event: OverlayEvent) {
        match &event {
            OverlayEvent::Opened { id } => {
                if let Some(on_open) = self
                    .callbacks
                    .get_mut(id)
                    .and_then(|c| c.on_open.as_mut())
                {
                    on_open(*id);
                }
            }
            OverlayEvent::Closed { id, reason } => {
                if let Some(mut callbacks) = self.callbacks.remove(id) {
                    if let Some(on_close) = callbacks.on_close.as_mut() {
                        on_close(*id, *reason);
                    }
                }
            }
            OverlayEvent::Moved { .. } => {}
        }
        self.events.push(event);
    }

    // === Queries ===

    pub fn model(&self) -> &EngineModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn visibility(&self, id: OverlayId) -> Visibility {
        self.model.visibility(id)
    }

    pub fn position(&self, id: OverlayId) -> Option<Position> {
        self.model.position(id)
    }

    /// Events emitted since the last call
    pub fn take_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::model::{AnchorHandle, ElementAnchor};
    use crate::surface::{Modal, Tooltip};

    fn runtime() -> Runtime<HeadlessHost> {
        Runtime::headless(EngineConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn test_hover_delay_opens_after_timer() {
        let mut rt = runtime();
        let anchor = ElementAnchor::new(Rect::new(100.0, 100.0, 40.0, 20.0));
        let id = rt.hover_enter(Tooltip::new("hint").spec(AnchorHandle::new(&anchor)));

        rt.advance(199);
        assert_eq!(rt.visibility(id), Visibility::Opening);
        rt.advance(1);
        assert_eq!(rt.visibility(id), Visibility::Open);
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn test_callbacks_fire_once() {
        let opened = Rc::new(RefCell::new(0));
        let closed = Rc::new(RefCell::new(Vec::new()));
        let mut rt = runtime();

        let callbacks = LifecycleCallbacks::new()
            .on_open({
                let opened = Rc::clone(&opened);
                move |_| *opened.borrow_mut() += 1
            })
            .on_close({
                let closed = Rc::clone(&closed);
                move |_, reason| closed.borrow_mut().push(reason)
            });
        let id = rt.open_with(Modal::new("m").spec(), callbacks);
        rt.key_down(Key::Escape);
        rt.close(id);

        assert_eq!(*opened.borrow(), 1);
        assert_eq!(*closed.borrow(), vec![CloseReason::Escape]);
    }

    #[test]
    fn test_dropped_guard_tears_down() {
        let mut rt = runtime();
        let id = rt.open(Modal::new("m").spec());
        let guard = rt.guard(id);
        assert!(rt.host().is_scroll_locked());

        drop(guard);
        rt.run_until_idle();

        assert_eq!(rt.visibility(id), Visibility::Closed);
        assert!(!rt.host().is_scroll_locked());
        assert!(rt.host().listeners().is_empty());
    }

    #[test]
    fn test_disarmed_guard_leaves_overlay_open() {
        let mut rt = runtime();
        let id = rt.open(Modal::new("m").spec());
        rt.guard(id).disarm();
        rt.run_until_idle();
        assert_eq!(rt.visibility(id), Visibility::Open);
    }

    #[test]
    fn test_dropped_guard_applies_before_next_escape() {
        let mut rt = runtime();
        let a = rt.open(Modal::new("a").spec());
        let b = rt.open(Modal::new("b").spec());

        drop(rt.guard(b));
        rt.key_down(Key::Escape);

        assert_eq!(rt.visibility(b), Visibility::Closed);
        assert_eq!(rt.visibility(a), Visibility::Closed);
        assert!(!rt.host().is_scroll_locked());
    }

    #[test]
    fn test_one_redraw_per_reposition_pass() {
        let mut rt = runtime();
        for name in ["a", "b", "c"] {
            rt.open(Modal::new(name).content_size(Size::new(200.0, 100.0)).spec());
        }
        assert_eq!(rt.redraw_count(), 3);

        rt.resize(1000.0, 600.0);
        assert_eq!(rt.redraw_count(), 3, "reposition is deferred");
        rt.run_until_idle();

        assert_eq!(rt.redraw_count(), 4);
    }
}
