//! Document - High-level document API

use std::fmt;

use crate::events::EventRegistry;
use crate::timers::TimerQueue;
use crate::{
    DOMTokenList, DomError, DomEvent, DomResult, DomTree, ElementData, MediaPreferences, NodeId,
    PlatformFeatures, Selector, StyleDeclaration,
};

/// Document loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

/// HTML Document plus the host services scripts interact with
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    pub(crate) focused: NodeId,
    pub(crate) listeners: EventRegistry,
    pub(crate) timers: TimerQueue,
    pub(crate) media: Option<MediaPreferences>,
    pub(crate) features: PlatformFeatures,
    pub(crate) ready_state: ReadyState,
    pub(crate) submitted: Vec<NodeId>,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh nodes under the root can't violate the hierarchy
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: NodeId::NONE,
            listeners: EventRegistry::default(),
            timers: TimerQueue::default(),
            media: Some(MediaPreferences::default()),
            features: PlatformFeatures::default(),
            ready_state: ReadyState::Loading,
            submitted: Vec::new(),
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let find_child = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.is(tag)))
                .map_or(NodeId::NONE, |(id, _)| id)
        };

        self.html_element = find_child(&self.tree, NodeId::ROOT, "html");
        if self.html_element.is_valid() {
            self.head_element = find_child(&self.tree, self.html_element, "head");
            self.body_element = find_child(&self.tree, self.html_element, "body");
        }
        tracing::trace!(
            html = self.html_element.is_valid(),
            body = self.body_element.is_valid(),
            "document finalized"
        );
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| {
                self.tree.children(head)
                    .find(|(_, n)| n.as_element().is_some_and(|e| e.is("title")))
                    .map(|(id, _)| self.tree.text_content(id).trim().to_string())
            })
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    // === Nodes ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.append_child(parent, child)
    }

    /// Remove a node from the tree (`node.remove()`). No-op if detached.
    pub fn remove(&mut self, id: NodeId) {
        self.tree.detach(id);
        if self.focused.is_valid() && !self.tree.is_connected(self.focused) {
            self.focused = NodeId::NONE;
        }
    }

    /// Whether the node is attached to this document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent_element(id)
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.element(id).ok_or(DomError::NotAnElement(id))?;
        self.tree.clear_children(id);
        if !text.is_empty() {
            let text_node = self.tree.create_text(text);
            self.tree.append_child(id, text_node)?;
        }
        Ok(())
    }

    // === Elements & attributes ===

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id).and_then(|n| n.as_element())
    }

    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.tree.get_mut(id)
            .and_then(|n| n.as_element_mut())
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    /// Snapshot of the element's class list
    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        DOMTokenList::parse(self.get_attribute(id, "class").unwrap_or(""))
    }

    /// Write a class list back to the `class` attribute
    pub fn set_class_list(&mut self, id: NodeId, list: &DOMTokenList) -> DomResult<()> {
        self.set_attribute(id, "class", &list.value())
    }

    /// `classList.add`; returns whether the class was newly added
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let mut list = self.class_list(id);
        let added = list.add(class);
        if added {
            self.set_class_list(id, &list)?;
        }
        Ok(added)
    }

    /// `classList.remove`; returns whether the class was present
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let mut list = self.class_list(id);
        let removed = list.remove(class);
        if removed {
            self.set_class_list(id, &list)?;
        }
        Ok(removed)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes().any(|c| c == class))
    }

    /// Parsed inline style
    pub fn style(&self, id: NodeId) -> StyleDeclaration {
        StyleDeclaration::parse(self.get_attribute(id, "style").unwrap_or(""))
    }

    /// `element.style.setProperty`
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let mut style = self.style(id);
        style.set(name, value);
        self.set_attribute(id, "style", &style.css_text())
    }

    // === Queries ===

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(NodeId::ROOT)
            .find(|&n| self.element(n).is_some_and(|e| e.id() == Some(id)))
    }

    /// All matching descendants of `root`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(root, &selector).collect())
    }

    /// First matching descendant of `root`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(root, &selector).next())
    }

    /// Iterate descendants matching a parsed selector
    pub fn select<'a>(&'a self, root: NodeId, selector: &'a Selector) -> impl Iterator<Item = NodeId> + 'a {
        self.tree.descendants(root)
            .filter(move |&n| self.element(n).is_some_and(|e| selector.matches(e)))
    }

    /// `element.matches(selector)`
    pub fn matches(&self, id: NodeId, selector: &str) -> DomResult<bool> {
        let selector = Selector::parse(selector)?;
        Ok(self.element(id).is_some_and(|e| selector.matches(e)))
    }

    /// `element.closest(selector)`: the element itself or nearest ancestor
    pub fn closest(&self, id: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .find(|&n| self.element(n).is_some_and(|e| selector.matches(e))))
    }

    // === Lifecycle ===

    /// Fire `DOMContentLoaded` on the document. Only the first call fires.
    pub fn dispatch_content_loaded(&mut self) -> bool {
        if self.ready_state != ReadyState::Loading {
            return false;
        }
        self.ready_state = ReadyState::Interactive;
        tracing::debug!(url = %self.url, "DOMContentLoaded");
        self.dispatch_event(DomEvent::content_loaded());
        true
    }

    /// Forms whose submission was allowed to proceed, in order
    pub fn submitted_forms(&self) -> &[NodeId] {
        &self.submitted
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("ready_state", &self.ready_state)
            .field("listeners", &self.listeners.len())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
