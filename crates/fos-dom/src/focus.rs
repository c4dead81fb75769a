//! Focus Management
//!
//! Active element tracking and sequential (Tab) navigation.

use crate::{Document, DomEvent, ElementData, NodeId};

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Unparsable `tabindex`
    NotFocusable,
    /// Negative `tabindex`: focusable by script, skipped by Tab
    Programmatic(i32),
    /// `tabindex="0"` or positive
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n >= 0 => Self::Sequential(n),
            Ok(n) => Self::Programmatic(n),
            Err(_) => Self::NotFocusable,
        }
    }

    /// Reachable with Tab
    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// Reachable with `focus()`
    pub fn accepts_focus(&self) -> bool {
        !matches!(self, Self::NotFocusable)
    }
}

/// Whether an element takes part in sequential focus navigation:
/// buttons, anything with `href`, form controls, or a non-negative
/// `tabindex`.
pub fn is_focusable(elem: &ElementData) -> bool {
    const CONTROLS: &[&str] = &["button", "input", "select", "textarea"];

    CONTROLS.iter().any(|tag| elem.is(tag))
        || elem.has_attr("href")
        || elem.get_attr("tabindex").is_some_and(|v| TabIndex::parse(v).is_focusable())
}

/// Whether `focus()` may move focus to an element: anything sequentially
/// focusable, any element with an integer `tabindex`, and `<body>`.
pub fn can_receive_focus(elem: &ElementData) -> bool {
    is_focusable(elem)
        || elem.is("body")
        || elem.get_attr("tabindex").is_some_and(|v| TabIndex::parse(v).accepts_focus())
}

impl Document {
    /// `document.activeElement`: the focused element, else `<body>`
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused.to_option().or_else(|| self.body())
    }

    /// Focus an element. Detached nodes, non-elements and elements that
    /// cannot take focus are refused.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.element(id).is_some_and(can_receive_focus) || !self.tree.is_connected(id) {
            tracing::trace!(?id, "focus refused");
            return false;
        }
        self.focused = id;
        tracing::trace!(?id, "focus moved");
        true
    }

    /// Drop focus back to the body
    pub fn blur(&mut self) {
        self.focused = NodeId::NONE;
    }

    /// Focusable descendants of `root`, in document order
    pub fn focusable_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.tree.descendants(root)
            .filter(|&n| self.element(n).is_some_and(is_focusable))
            .collect()
    }

    /// Simulate a key press on the active element.
    ///
    /// Dispatches `keydown`; an unprevented Tab then moves focus to the
    /// next (or, with Shift, previous) focusable element, wrapping around.
    /// Returns false if a listener prevented the default action.
    pub fn press_key(&mut self, key: &str, shift_key: bool) -> bool {
        let target = self.active_element().unwrap_or(NodeId::ROOT);
        let event = self.dispatch_event(DomEvent::key_down(target, key, shift_key));
        if event.is_default_prevented() {
            return false;
        }
        if key == "Tab" {
            self.navigate_sequentially(shift_key);
        }
        true
    }

    fn navigate_sequentially(&mut self, backwards: bool) {
        let order = self.focusable_elements(NodeId::ROOT);
        if order.is_empty() {
            return;
        }
        let last = order.len() - 1;
        let current = self.focused.to_option().and_then(|f| order.iter().position(|&n| n == f));

        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => last,
            (Some(p), false) => if p == last { 0 } else { p + 1 },
            (Some(p), true) => if p == 0 { last } else { p - 1 },
        };
        self.focus(order[next]);
    }
}
