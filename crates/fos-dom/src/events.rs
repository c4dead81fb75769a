//! DOM Events
//!
//! Event objects, listener registration and dispatch. Dispatch walks
//! target → ancestors → document (bubbling events only past the target).

use std::rc::Rc;

use crate::{Document, NodeId};

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    Click,
    Submit,
    Focus,
    Blur,
    Input,
    Change,
    DOMContentLoaded,
    Load,
}

impl EventType {
    /// Check if this event type can bubble
    pub fn bubbles(&self) -> bool {
        !matches!(self, EventType::Focus | EventType::Blur | EventType::Load)
    }

    /// Check if `preventDefault` has an effect
    pub fn cancelable(&self) -> bool {
        matches!(self,
            EventType::KeyDown |
            EventType::KeyUp |
            EventType::Click |
            EventType::Submit
        )
    }
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: NodeId,
    /// `KeyboardEvent.key`
    pub key: Option<String>,
    /// `KeyboardEvent.shiftKey`
    pub shift_key: bool,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Host clock at dispatch
    pub timestamp_ms: u64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create an event with the type's default flags
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            shift_key: false,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            timestamp_ms: 0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create keydown event
    pub fn key_down(target: NodeId, key: &str, shift_key: bool) -> Self {
        Self {
            key: Some(key.to_string()),
            shift_key,
            ..Self::new(EventType::KeyDown, target)
        }
    }

    /// Create submit event for a form
    pub fn submit(form: NodeId) -> Self {
        Self::new(EventType::Submit, form)
    }

    /// Create DOMContentLoaded event (targets the document)
    pub fn content_loaded() -> Self {
        Self::new(EventType::DOMContentLoaded, NodeId::ROOT)
    }

    /// Check the pressed key
    pub fn is_key(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Something that can receive dispatched events.
///
/// Listeners get the document mutably, so they can move focus, create
/// nodes or schedule timers while handling the event.
pub trait EventListener {
    fn handle_event(&self, doc: &mut Document, event: &mut DomEvent);
}

impl<F> EventListener for F
where
    F: Fn(&mut Document, &mut DomEvent),
{
    fn handle_event(&self, doc: &mut Document, event: &mut DomEvent) {
        self(doc, event)
    }
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

struct RegisteredListener {
    id: ListenerId,
    target: NodeId,
    event_type: EventType,
    listener: Rc<dyn EventListener>,
}

/// Listener table owned by a document
#[derive(Default)]
pub(crate) struct EventRegistry {
    entries: Vec<RegisteredListener>,
    next_id: u64,
}

impl EventRegistry {
    fn add(&mut self, target: NodeId, event_type: EventType, listener: Rc<dyn EventListener>) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(RegisteredListener { id, target, event_type, listener });
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn snapshot(&self, target: NodeId, event_type: EventType) -> Vec<(ListenerId, Rc<dyn EventListener>)> {
        self.entries.iter()
            .filter(|e| e.target == target && e.event_type == event_type)
            .map(|e| (e.id, Rc::clone(&e.listener)))
            .collect()
    }

    fn count(&self, target: NodeId, event_type: EventType) -> usize {
        self.entries.iter()
            .filter(|e| e.target == target && e.event_type == event_type)
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Document {
    /// `addEventListener`. Use `NodeId::ROOT` for document scope.
    pub fn add_event_listener<L>(&mut self, target: NodeId, event_type: EventType, listener: L) -> ListenerId
    where
        L: EventListener + 'static,
    {
        self.add_shared_listener(target, event_type, Rc::new(listener))
    }

    /// Register an already shared listener
    pub fn add_shared_listener(&mut self, target: NodeId, event_type: EventType, listener: Rc<dyn EventListener>) -> ListenerId {
        let id = self.listeners.add(target, event_type, listener);
        tracing::trace!(?target, ?event_type, listener = id.0, "listener added");
        id
    }

    /// `removeEventListener`; returns whether the listener was registered
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        tracing::trace!(listener = id.0, removed, "listener removed");
        removed
    }

    /// Number of listeners of a type on a target
    pub fn listener_count(&self, target: NodeId, event_type: EventType) -> usize {
        self.listeners.count(target, event_type)
    }

    /// Dispatch an event and return it for inspection.
    ///
    /// Listeners removed by an earlier listener during the same dispatch
    /// are skipped.
    pub fn dispatch_event(&mut self, mut event: DomEvent) -> DomEvent {
        event.timestamp_ms = self.timers.now_ms();

        let mut path = vec![event.target];
        if event.bubbles {
            path.extend(self.tree.ancestors(event.target));
        }

        for node in path {
            event.current_target = node;
            for (id, listener) in self.listeners.snapshot(node, event.event_type) {
                if self.listeners.contains(id) {
                    listener.handle_event(self, &mut event);
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        tracing::trace!(
            event = ?event.event_type,
            target = ?event.target,
            prevented = event.is_default_prevented(),
            "event dispatched"
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_keydown_is_cancelable() {
        let mut event = DomEvent::key_down(NodeId::ROOT, "Tab", true);
        assert!(event.is_key("Tab"));
        event.prevent_default();
        assert!(event.is_default_prevented());

        let mut loaded = DomEvent::content_loaded();
        loaded.prevent_default();
        assert!(!loaded.is_default_prevented());
    }

    #[test]
    fn test_bubbles_to_document() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        doc.add_event_listener(NodeId::ROOT, EventType::KeyDown, move |_: &mut Document, e: &mut DomEvent| {
            assert_eq!(e.current_target, NodeId::ROOT);
            counter.set(counter.get() + 1);
        });

        doc.dispatch_event(DomEvent::key_down(body, "a", false));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stop_propagation() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let reached_root = Rc::new(Cell::new(false));

        doc.add_event_listener(body, EventType::Submit, |_: &mut Document, e: &mut DomEvent| {
            e.stop_propagation();
            e.prevent_default();
        });
        let flag = Rc::clone(&reached_root);
        doc.add_event_listener(NodeId::ROOT, EventType::Submit, move |_: &mut Document, _: &mut DomEvent| {
            flag.set(true);
        });

        let event = doc.dispatch_event(DomEvent::submit(body));
        assert!(event.is_default_prevented());
        assert!(!reached_root.get());
    }

    #[test]
    fn test_removed_listener_not_called() {
        let mut doc = Document::default();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let id = doc.add_event_listener(NodeId::ROOT, EventType::KeyDown, move |_: &mut Document, _: &mut DomEvent| {
            counter.set(counter.get() + 1);
        });
        assert_eq!(doc.listener_count(NodeId::ROOT, EventType::KeyDown), 1);
        assert!(doc.remove_event_listener(id));
        assert!(!doc.remove_event_listener(id));

        doc.dispatch_event(DomEvent::key_down(NodeId::ROOT, "Tab", false));
        assert_eq!(hits.get(), 0);
    }
}
