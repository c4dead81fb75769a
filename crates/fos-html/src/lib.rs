//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, producing `fos_dom::Document`s.

mod parser;

pub use parser::HtmlParser;

use fos_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build DOM: {0}")]
    Dom(#[from] fos_dom::DomError),
}
