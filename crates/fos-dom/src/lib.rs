//! fOS DOM - Document Object Model host
//!
//! Arena-based DOM tree plus the platform services page scripts rely on:
//! focus, event dispatch, timers, media queries and form validation.

mod node;
mod tree;
mod document;
mod classlist;
mod style;
mod selector;
mod events;
mod timers;
mod focus;
mod media;
pub mod forms;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Descendants, Ancestors};
pub use document::{Document, ReadyState};
pub use classlist::DOMTokenList;
pub use style::StyleDeclaration;
pub use selector::{Selector, CompoundSelector, AttrMatch, AttrOperator};
pub use events::{EventType, DomEvent, EventListener, ListenerId};
pub use timers::{TimerId, TimerQueue};
pub use focus::{TabIndex, can_receive_focus, is_focusable};
pub use media::{MediaPreferences, ContrastPreference, ColorScheme, PlatformFeatures};
pub use forms::{ValidityState, ValidationConstraints, SubmitOutcome};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert to `Option`, mapping the sentinel to `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("hierarchy request error: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}
