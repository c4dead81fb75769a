//! Parsing tests for fos-html
//!
//! Checks that real-world page markup lands in the arena intact.

use fos_dom::NodeId;
use fos_html::{parse, HtmlParser};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head><title>  Контакты </title></head>
<body>
  <nav><a href="/"><i class="bi bi-house"></i></a></nav>
  <form id="contact" action="/send">
    <label>Email <input type="email" name="email" required></label>
    <textarea name="msg">Привет</textarea>
    <button type="submit">Send</button>
  </form>
  <img src="/img/team.jpg" alt="Team">
</body>
</html>"#;

#[test]
fn test_structure_is_located() {
    let doc = parse(PAGE).unwrap();

    assert_eq!(doc.title(), "Контакты");
    let html = doc.document_element().unwrap();
    assert_eq!(doc.get_attribute(html, "lang"), Some("ru"));
    assert!(doc.head().is_some());
    assert!(doc.body().is_some());
}

#[test]
fn test_attributes_preserved() {
    let doc = parse(PAGE).unwrap();

    let form = doc.get_element_by_id("contact").unwrap();
    assert_eq!(doc.get_attribute(form, "action"), Some("/send"));

    let email = doc.query_selector(form, "input[type=email]").unwrap().unwrap();
    assert!(doc.has_attribute(email, "required"));

    let icon = doc.query_selector(NodeId::ROOT, "[class*=\"bi-\"]").unwrap().unwrap();
    assert_eq!(doc.tag_name(icon), Some("i"));
    assert!(doc.closest(icon, "a").unwrap().is_some());
}

#[test]
fn test_text_preserved() {
    let doc = parse(PAGE).unwrap();
    let textarea = doc.query_selector(NodeId::ROOT, "textarea").unwrap().unwrap();
    assert_eq!(doc.control_value(textarea), "Привет");
}

#[test]
fn test_document_order() {
    let doc = parse(PAGE).unwrap();
    let focusable = doc.focusable_elements(NodeId::ROOT);
    let tags: Vec<_> = focusable.iter().filter_map(|&id| doc.tag_name(id)).collect();
    assert_eq!(tags, vec!["a", "input", "textarea", "button"]);
}

#[test]
fn test_url_is_recorded() {
    let doc = HtmlParser::new()
        .parse_with_url("<p>x</p>", "https://example.test/page")
        .unwrap();
    assert_eq!(doc.url(), "https://example.test/page");
}

#[test]
fn test_whitespace_textarea_value() {
    let doc = parse("<form><textarea id=\"note\" required> </textarea></form>").unwrap();
    let textarea = doc.get_element_by_id("note").unwrap();
    assert_eq!(doc.control_value(textarea), " ");
    assert!(doc.validity(textarea).is_valid());
}

#[test]
fn test_inline_spacing_kept() {
    let doc = parse("<p id=\"p\"><b>a</b> <i>b</i></p><pre id=\"pre\">  x\n  y</pre>").unwrap();
    assert_eq!(doc.text_content(doc.get_element_by_id("p").unwrap()), "a b");
    assert_eq!(doc.text_content(doc.get_element_by_id("pre").unwrap()), "  x\n  y");
}

#[test]
fn test_head_whitespace_dropped() {
    let doc = parse("<html>\n<head>\n  <title>t</title>\n</head>\n<body></body></html>").unwrap();
    let head = doc.head().unwrap();
    assert_eq!(doc.tree().children(head).count(), 1);
    assert!(doc.tree().children(doc.document_element().unwrap()).all(|(_, n)| n.is_element()));
}
