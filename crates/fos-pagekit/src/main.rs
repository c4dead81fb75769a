//! PageKit demo - wires a page and replays a few interactions
//!
//! Usage: `pagekit-demo [page.html] [config.json]`

use anyhow::Context;
use fos_dom::{Document, MediaPreferences, NodeId};
use fos_pagekit::{install_on_ready, FocusTrap, PageKitConfig};
use tracing_subscriber::EnvFilter;

const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head><title>PageKit demo</title></head>
<body>
  <header><span><i class="bi bi-telephone"></i></span> +7 (495) 123-45-67</header>
  <img src="/img/office.jpg" alt="Office">
  <form action="/feedback">
    <input type="email" name="email" required>
    <button type="submit">Send</button>
  </form>
  <div role="dialog" id="cookies">
    <p>We use cookies.</p>
    <button>Accept</button>
    <a href="/privacy">Details</a>
  </div>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let html = match args.next() {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => SAMPLE_PAGE.to_string(),
    };
    let config = match args.next() {
        Some(path) => PageKitConfig::from_path(&path).with_context(|| format!("loading config {path}"))?,
        None => PageKitConfig::default(),
    };
    let fade_window = config.notification.duration_ms.max(0) as u64 + config.notification.fade_ms;

    let mut doc = fos_html::parse(&html).context("parsing page")?;
    doc.set_media_preferences(Some(MediaPreferences::new().with_reduced_motion(true)));

    install_on_ready(&mut doc, config);
    doc.dispatch_content_loaded();
    report(&doc, "after DOMContentLoaded");

    if let Some(form) = doc.query_selector(NodeId::ROOT, "form")? {
        let outcome = doc.request_submit(form)?;
        println!("submit attempt: {outcome:?}");
        report(&doc, "after submit");
    }

    if let Some(dialog) = doc.query_selector(NodeId::ROOT, "[role=dialog]")? {
        let mut trap = FocusTrap::new(&doc, dialog);
        trap.activate(&mut doc)?;
        doc.press_key("Tab", true);
        println!("focus trap: shift+tab from first moved focus to {:?}", describe(&doc, doc.active_element()));
        trap.deactivate(&mut doc)?;
    }

    doc.advance_time(fade_window);
    report(&doc, &format!("after {fade_window}ms"));
    Ok(())
}

fn describe(doc: &Document, id: Option<NodeId>) -> String {
    id.and_then(|id| doc.tag_name(id).map(|tag| format!("<{tag}> {}", doc.text_content(id).trim())))
        .unwrap_or_else(|| "nothing".to_string())
}

fn report(doc: &Document, stage: &str) {
    println!("== {stage}");
    let Some(body) = doc.body() else { return };
    println!("body classes: {}", doc.class_list(body));
    println!("focused: {}", describe(doc, doc.active_element()));
    if let Ok(labelled) = doc.query_selector_all(NodeId::ROOT, "[aria-label]") {
        for id in labelled {
            println!("labelled <{}>: {}", doc.tag_name(id).unwrap_or("?"), doc.get_attribute(id, "aria-label").unwrap_or(""));
        }
    }
    if let Ok(live) = doc.query_selector_all(body, "[aria-live]") {
        for id in live {
            println!("live region ({}): {}", doc.get_attribute(id, "role").unwrap_or("?"), doc.text_content(id));
        }
    }
}
