//! HTML5 Parser implementation
//!
//! Parses into html5ever's RcDom, then copies the result into our arena.

use fos_dom::{Document, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser {
    keep_comments: bool,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comment nodes (dropped by default)
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!(url, bytes = html.len(), "parsing HTML document");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        self.convert_node(&dom.document, &mut document, NodeId::ROOT)?;
        document.finalize();

        tracing::debug!(nodes = document.tree().len(), "parsed HTML document");
        Ok(document)
    }

    /// Copy an RcDom node (and its subtree) under `parent`
    fn convert_node(&self, handle: &Handle, doc: &mut Document, parent: NodeId) -> Result<(), ParseError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, parent)?;
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = doc.tree_mut().create_doctype(name);
                doc.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                // Whitespace-only text is dropped outside <body> only
                let structural = parent == NodeId::ROOT || matches!(doc.tag_name(parent), Some("html" | "head"));
                if !(structural && text.trim().is_empty()) {
                    let id = doc.create_text(&text);
                    doc.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                if self.keep_comments {
                    let id = doc.tree_mut().create_comment(contents);
                    doc.append_child(parent, id)?;
                }
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = doc.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    doc.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                doc.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, id)?;
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        let p = doc.query_selector(NodeId::ROOT, "p").unwrap().unwrap();
        assert_eq!(doc.text_content(p), "Hello");
    }

    #[test]
    fn test_fragment_gets_body() {
        let doc = HtmlParser::new().parse("<img src=a.png>").unwrap();
        let body = doc.body().expect("html5ever synthesizes <body>");
        let img = doc.query_selector(body, "img").unwrap().unwrap();
        assert_eq!(doc.get_attribute(img, "src"), Some("a.png"));
    }

    #[test]
    fn test_comments_optional() {
        let html = "<body><!-- note --><p>x</p></body>";
        let plain = HtmlParser::new().parse(html).unwrap();
        let kept = HtmlParser::new().keep_comments(true).parse(html).unwrap();
        assert_eq!(kept.tree().len(), plain.tree().len() + 1);
    }
}
