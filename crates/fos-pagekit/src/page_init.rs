//! Page-load wiring
//!
//! One pass over a loaded document that applies the page-wide behaviors:
//! 1. lazy loading for images without a `loading` attribute
//! 2. accessible feedback for invalid form submissions
//! 3. `aria-label`s for text-less icon glyphs, derived from the icon class
//! 4. body classes for high-contrast and reduced-motion preferences
//!
//! The host runs this once per document, either directly or through
//! `install_on_ready`. Attributes already present are left alone, but a
//! second run attaches a second submit listener to every form.

use fos_dom::{AttrMatch, AttrOperator, CompoundSelector, Document, DomEvent, EventType, ListenerId, NodeId, Selector};

use crate::notification::{create_notification_with, Severity};
use crate::{NotificationConfig, PageKitConfig, PageKitError, Result};

const CONTRAST_QUERY: &str = "(prefers-contrast: more)";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// What a wiring pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSummary {
    pub images_tagged: usize,
    pub forms_wired: usize,
    pub icons_labelled: usize,
    pub body_classes_added: usize,
}

/// Apply all page-wide accessibility behaviors to `doc`
pub fn initialize_accessibility_behaviors(doc: &mut Document, config: &PageKitConfig) -> Result<InitSummary> {
    let body = doc.body().ok_or(PageKitError::Environment("document has no <body>"))?;

    let summary = InitSummary {
        images_tagged: lazy_load_images(doc)?,
        forms_wired: wire_forms(doc, config)?,
        icons_labelled: label_icons(doc, &config.icons.class_prefix)?,
        body_classes_added: apply_media_classes(doc, body, config)?,
    };
    tracing::info!(
        images = summary.images_tagged,
        forms = summary.forms_wired,
        icons = summary.icons_labelled,
        body_classes = summary.body_classes_added,
        "accessibility behaviors initialized"
    );
    Ok(summary)
}

/// Run `initialize_accessibility_behaviors` when `DOMContentLoaded` fires
pub fn install_on_ready(doc: &mut Document, config: PageKitConfig) -> ListenerId {
    doc.add_event_listener(
        NodeId::ROOT,
        EventType::DOMContentLoaded,
        move |doc: &mut Document, _: &mut DomEvent| {
            if let Err(err) = initialize_accessibility_behaviors(doc, &config) {
                tracing::warn!(%err, "page accessibility wiring failed");
            }
        },
    )
}

fn lazy_load_images(doc: &mut Document) -> Result<usize> {
    let images = doc.query_selector_all(NodeId::ROOT, "img")?;
    let mut tagged = 0;
    for img in images {
        if !doc.has_attribute(img, "loading") {
            doc.set_attribute(img, "loading", "lazy")?;
            tagged += 1;
        }
    }
    Ok(tagged)
}

fn wire_forms(doc: &mut Document, config: &PageKitConfig) -> Result<usize> {
    let forms = doc.query_selector_all(NodeId::ROOT, "form")?;
    for &form in &forms {
        doc.set_attribute(form, "novalidate", "true")?;

        let message = config.forms.invalid_message.clone();
        let notification = config.notification.clone();
        doc.add_event_listener(form, EventType::Submit, move |doc: &mut Document, event: &mut DomEvent| {
            report_invalid_submission(doc, event, &message, &notification);
        });
    }
    Ok(forms.len())
}

/// Submit listener body: block an invalid form and tell the user why
fn report_invalid_submission(doc: &mut Document, event: &mut DomEvent, message: &str, notification: &NotificationConfig) {
    let form = event.current_target;
    if doc.check_validity(form) {
        return;
    }
    event.prevent_default();
    event.stop_propagation();

    if let Some(invalid) = doc.first_invalid_control(form) {
        doc.focus(invalid);
        if let Err(err) = create_notification_with(doc, message, Severity::Warning, notification) {
            tracing::warn!(%err, "could not announce invalid form");
        }
        tracing::debug!(?form, ?invalid, "invalid form submission blocked");
    }
}

/// Label for an icon class: prefix stripped, first `-` turned into a space
/// (`bi-arrow-left` → `arrow left`)
pub(crate) fn icon_label(class: &str, prefix: &str) -> Option<String> {
    let name = class.strip_prefix(prefix)?;
    (!name.is_empty()).then(|| name.replacen('-', " ", 1))
}

fn label_icons(doc: &mut Document, prefix: &str) -> Result<usize> {
    if prefix.is_empty() {
        return Ok(0);
    }
    let selector = Selector {
        alternatives: vec![CompoundSelector {
            attrs: vec![AttrMatch {
                name: "class".to_string(),
                op: AttrOperator::Contains,
                value: prefix.to_string(),
            }],
            ..Default::default()
        }],
    };
    let icons: Vec<NodeId> = doc.select(NodeId::ROOT, &selector).collect();

    let mut labelled = 0;
    for icon in icons {
        if !doc.text_content(icon).trim().is_empty() {
            continue;
        }
        // Controls get their accessible name from their own content
        if doc.closest(icon, "button, a")?.is_some() {
            continue;
        }
        let Some(parent) = doc.parent_element(icon) else { continue };
        if doc.get_attribute(parent, "aria-label").is_some_and(|l| !l.is_empty()) {
            continue;
        }
        let label = doc.class_list(icon)
            .find(|c| c.starts_with(prefix))
            .and_then(|c| icon_label(c, prefix));
        if let Some(label) = label {
            doc.set_attribute(parent, "aria-label", &label)?;
            tracing::trace!(?icon, ?parent, %label, "icon labelled");
            labelled += 1;
        }
    }
    Ok(labelled)
}

fn apply_media_classes(doc: &mut Document, body: NodeId, config: &PageKitConfig) -> Result<usize> {
    let mut added = 0;
    if doc.match_media(CONTRAST_QUERY) == Some(true) && doc.add_class(body, &config.media.high_contrast_class)? {
        added += 1;
    }
    if doc.match_media(REDUCED_MOTION_QUERY) == Some(true) && doc.add_class(body, &config.media.reduced_motion_class)? {
        added += 1;
    }
    Ok(added)
}
