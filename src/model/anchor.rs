//! Anchor references
//!
//! An anchor is owned by the collaborator that rendered it. The engine only
//! keeps a weak, one-way handle to the anchor's measurement function, so an
//! overlay can never keep its anchor alive or dereference one that is gone.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::geometry::Rect;

/// Something rendered on screen whose bounding box can be queried
pub trait Anchor {
    /// Current bounding box in viewport coordinates, or `None` when the
    /// element is no longer measurable (unmounted, hidden, detached)
    fn bounding_box(&self) -> Option<Rect>;
}

/// Non-owning handle to an [`Anchor`]
#[derive(Clone)]
pub struct AnchorHandle {
    inner: Weak<dyn Anchor>,
}

impl AnchorHandle {
    pub fn new<A: Anchor + 'static>(anchor: &Rc<A>) -> Self {
        let inner: Weak<A> = Rc::downgrade(anchor);
        Self { inner }
    }

    /// Measure the anchor now. `None` if it was dropped or is unmeasurable.
    pub fn measure(&self) -> Option<Rect> {
        self.inner.upgrade()?.bounding_box()
    }

    /// Whether the anchor still exists (it may still be unmeasurable)
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for AnchorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// An anchor whose box is pushed in by the host after each layout pass
#[derive(Debug, Default)]
pub struct ElementAnchor {
    rect: Cell<Option<Rect>>,
}

impl ElementAnchor {
    pub fn new(rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            rect: Cell::new(Some(rect)),
        })
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(Some(rect));
    }

    /// Mark the element as unmeasurable without dropping it
    pub fn detach(&self) {
        self.rect.set(None);
    }
}

impl Anchor for ElementAnchor {
    fn bounding_box(&self) -> Option<Rect> {
        self.rect.get()
    }
}
