//! Focus trapping for modal containers
//!
//! While active, Tab and Shift+Tab wrap between the first and last
//! focusable element of the container instead of leaving it.
//!
//! The focusable list is a snapshot taken at construction. Elements added
//! to the container later are not part of the boundaries; build a new
//! trap if the container's content changes.

use fos_dom::{Document, DomEvent, EventType, ListenerId, NodeId};

use crate::{PageKitError, Result};

/// First and last focusable element of a trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundaries {
    first: NodeId,
    last: NodeId,
}

impl Boundaries {
    fn handle_key(&self, doc: &mut Document, event: &mut DomEvent) {
        if !event.is_key("Tab") {
            return;
        }
        let active = doc.active_element();
        let wrap_to = if event.shift_key {
            (active == Some(self.first)).then_some(self.last)
        } else {
            (active == Some(self.last)).then_some(self.first)
        };
        if let Some(target) = wrap_to {
            event.prevent_default();
            doc.focus(target);
            tracing::trace!(?target, backwards = event.shift_key, "focus wrapped inside trap");
        }
    }
}

/// Keyboard focus trap over one container element.
///
/// Lifecycle: `new` → `activate` → `deactivate`. Activating an active
/// trap or deactivating an idle one is a caller error and is rejected
/// without side effects.
#[derive(Debug)]
pub struct FocusTrap {
    container: NodeId,
    focusable: Vec<NodeId>,
    boundaries: Option<Boundaries>,
    previous_active: Option<NodeId>,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    /// Snapshot the container's focusable descendants
    pub fn new(doc: &Document, container: NodeId) -> Self {
        let focusable = doc.focusable_elements(container);
        let boundaries = match (focusable.first(), focusable.last()) {
            (Some(&first), Some(&last)) => Some(Boundaries { first, last }),
            _ => None,
        };
        if boundaries.is_none() {
            tracing::debug!(?container, "focus trap container has no focusable elements");
        }
        Self {
            container,
            focusable,
            boundaries,
            previous_active: None,
            listener: None,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The focusable elements captured at construction
    pub fn focusable_elements(&self) -> &[NodeId] {
        &self.focusable
    }

    pub fn first_focusable(&self) -> Option<NodeId> {
        self.boundaries.map(|b| b.first)
    }

    pub fn last_focusable(&self) -> Option<NodeId> {
        self.boundaries.map(|b| b.last)
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Remember the current focus, start intercepting Tab at document
    /// scope and move focus to the first focusable element.
    pub fn activate(&mut self, doc: &mut Document) -> Result<()> {
        if self.is_active() {
            return Err(PageKitError::TrapAlreadyActive);
        }

        self.previous_active = doc.active_element();
        let boundaries = self.boundaries;
        self.listener = Some(doc.add_event_listener(
            NodeId::ROOT,
            EventType::KeyDown,
            move |doc: &mut Document, event: &mut DomEvent| {
                if let Some(b) = boundaries {
                    b.handle_key(doc, event);
                }
            },
        ));

        if let Some(first) = self.first_focusable() {
            doc.focus(first);
        }
        tracing::debug!(container = ?self.container, focusable = self.focusable.len(), "focus trap activated");
        Ok(())
    }

    /// Handle a keydown event as the active trap would
    pub fn handle_key(&self, doc: &mut Document, event: &mut DomEvent) {
        if let Some(b) = self.boundaries {
            b.handle_key(doc, event);
        }
    }

    /// Stop intercepting Tab and give focus back to whatever had it
    /// before activation (if it is still in the document).
    pub fn deactivate(&mut self, doc: &mut Document) -> Result<()> {
        let listener = self.listener.take().ok_or(PageKitError::TrapNotActive)?;
        doc.remove_event_listener(listener);

        if let Some(previous) = self.previous_active.take() {
            if !doc.focus(previous) {
                tracing::debug!(?previous, "previously focused element is gone; focus not restored");
            }
        }
        tracing::debug!(container = ?self.container, "focus trap deactivated");
        Ok(())
    }
}
