//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so `NodeId`s
//! held by callers stay valid (the node is just disconnected).

use crate::{DomError, DomResult, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound(parent))?;
        if !matches!(parent_node.data, NodeData::Document | NodeData::Element(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if child == NodeId::ROOT || child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
        Ok(child)
    }

    /// Unlink a node from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Remove every child of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        for child in children {
            self.detach(child);
        }
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Parent only if it is an element (like `parentElement`)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.get(p).is_some_and(Node::is_element))
    }

    /// Direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// All descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants { tree: self, root: id, next }
    }

    /// Ancestors from the parent upward, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.parent);
        Ancestors { tree: self, next }
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the subtree root
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else { break NodeId::NONE };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

/// Ancestor iterator
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p1 = tree.create_element("p");
        let p2 = tree.create_element("p");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p1).unwrap();
        tree.append_child(p1, text).unwrap();
        tree.append_child(div, p2).unwrap();
        (tree, div, p1, p2, text)
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, div, p1, p2, text) = sample();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, p1, text, p2]);

        let inner: Vec<_> = tree.descendants(p1).collect();
        assert_eq!(inner, vec![text]);
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let (mut tree, div, p1, p2, _) = sample();
        tree.detach(p1);

        let children: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(children, vec![p2]);
        assert!(!tree.is_connected(p1));
        assert!(tree.is_connected(p2));
    }

    #[test]
    fn test_append_moves_node() {
        let (mut tree, div, p1, p2, _) = sample();
        tree.append_child(p2, p1).unwrap();
        assert_eq!(tree.parent(p1), Some(p2));
        assert_eq!(tree.children(div).count(), 1);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, div, p1, _, text) = sample();
        assert!(matches!(
            tree.append_child(p1, div),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(tree.append_child(text, div).is_err());
    }

    #[test]
    fn test_text_content() {
        let (tree, div, ..) = sample();
        assert_eq!(tree.text_content(div), "hi");
    }
}
