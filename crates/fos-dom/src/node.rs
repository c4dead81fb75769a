//! DOM Node
//!
//! Nodes link to each other through `NodeId`s (4 bytes) instead of
//! pointers, so the whole tree lives in one arena.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self::with_data(NodeData::Comment(content.to_string()))
    }

    /// Create a doctype node
    pub fn doctype(name: &str) -> Self {
        Self::with_data(NodeData::Doctype { name: name.to_string() })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercased local tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Check the tag name (case-insensitive)
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(pos).value)
    }

    /// `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Iterate the whitespace-separated `class` tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or("").split_whitespace()
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_case_insensitive() {
        let mut elem = ElementData::new("IMG");
        assert_eq!(elem.tag, "img");

        elem.set_attr("SRC", "a.png");
        assert_eq!(elem.get_attr("src"), Some("a.png"));

        elem.set_attr("src", "b.png");
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.remove_attr("Src"), Some("b.png".to_string()));
        assert!(!elem.has_attr("src"));
    }

    #[test]
    fn test_classes() {
        let mut elem = ElementData::new("i");
        elem.set_attr("class", "  bi bi-house  ");
        let classes: Vec<_> = elem.classes().collect();
        assert_eq!(classes, vec!["bi", "bi-house"]);
    }
}
