//! Accessible notifications
//!
//! Transient live-region elements appended to `<body>`. Assistive
//! technology announces them on insertion; after the configured duration
//! they fade out and remove themselves.

use std::fmt;
use std::str::FromStr;

use fos_dom::{Document, NodeId};

use crate::{NotificationConfig, PageKitError, Result};

/// Notification severity; selects the `alert-<severity>` class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    /// Urgent: announced assertively with `role="alert"`
    Alert,
    Primary,
    Secondary,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Alert => "alert",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// ARIA role of the live region
    pub fn role(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            _ => "status",
        }
    }

    /// `aria-live` politeness
    pub fn politeness(&self) -> &'static str {
        match self {
            Self::Alert => "assertive",
            _ => "polite",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "info" => Self::Info,
            "success" => Self::Success,
            "warning" => Self::Warning,
            "danger" => Self::Danger,
            "alert" => Self::Alert,
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            "light" => Self::Light,
            "dark" => Self::Dark,
            other => return Err(format!("unknown severity `{other}`")),
        })
    }
}

/// Create a notification with the default positioning and 300ms fade.
///
/// `duration_ms <= 0` keeps the element until the caller removes it.
pub fn create_notification(doc: &mut Document, message: &str, severity: Severity, duration_ms: i64) -> Result<NodeId> {
    let config = NotificationConfig {
        duration_ms,
        ..NotificationConfig::default()
    };
    create_notification_with(doc, message, severity, &config)
}

/// Create a notification using explicit settings
pub fn create_notification_with(
    doc: &mut Document,
    message: &str,
    severity: Severity,
    config: &NotificationConfig,
) -> Result<NodeId> {
    let body = doc.body().ok_or(PageKitError::Environment("document has no <body>"))?;

    let notification = doc.create_element("div");
    doc.set_attribute(notification, "role", severity.role())?;
    doc.set_attribute(notification, "aria-live", severity.politeness())?;
    doc.set_attribute(notification, "aria-atomic", "true")?;

    let mut class = format!("alert alert-{severity}");
    for extra in &config.position_classes {
        class.push(' ');
        class.push_str(extra);
    }
    doc.set_attribute(notification, "class", &class)?;

    // Text node only: the message is never interpreted as markup
    doc.set_text_content(notification, message)?;
    doc.append_child(body, notification)?;

    tracing::debug!(
        ?notification,
        %severity,
        duration_ms = config.duration_ms,
        "notification shown"
    );

    if config.duration_ms > 0 {
        schedule_dismissal(doc, notification, config.duration_ms as u64, config.fade_ms);
    }

    Ok(notification)
}

/// Fade after `duration_ms`, then remove after a further `fade_ms`.
/// An element the page removed in the meantime is left alone.
fn schedule_dismissal(doc: &mut Document, notification: NodeId, duration_ms: u64, fade_ms: u64) {
    doc.set_timeout(duration_ms, move |doc| {
        if !doc.is_connected(notification) {
            return;
        }
        let transition = format!("opacity {}s ease", fade_ms as f64 / 1000.0);
        let faded = doc.set_style_property(notification, "opacity", "0")
            .and_then(|_| doc.set_style_property(notification, "transition", &transition));
        if let Err(err) = faded {
            tracing::warn!(%err, ?notification, "failed to fade notification");
        }

        doc.set_timeout(fade_ms, move |doc| {
            doc.remove(notification);
            tracing::trace!(?notification, "notification removed");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_roles() {
        assert_eq!(Severity::Alert.role(), "alert");
        assert_eq!(Severity::Alert.politeness(), "assertive");
        assert_eq!(Severity::Warning.role(), "status");
        assert_eq!(Severity::Info.politeness(), "polite");
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" alert ".parse::<Severity>(), Ok(Severity::Alert));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_attributes() {
        let mut doc = Document::default();
        let n = create_notification(&mut doc, "Saved", Severity::Success, 0).unwrap();

        assert_eq!(doc.get_attribute(n, "role"), Some("status"));
        assert_eq!(doc.get_attribute(n, "aria-live"), Some("polite"));
        assert_eq!(doc.get_attribute(n, "aria-atomic"), Some("true"));
        assert_eq!(
            doc.get_attribute(n, "class"),
            Some("alert alert-success position-fixed top-0 start-50 translate-middle-x mt-3")
        );
        assert_eq!(doc.parent_element(n), doc.body());
        assert_eq!(doc.text_content(n), "Saved");
    }

    #[test]
    fn test_alert_is_assertive() {
        let mut doc = Document::default();
        let n = create_notification(&mut doc, "Session expired", Severity::Alert, 0).unwrap();
        assert_eq!(doc.get_attribute(n, "role"), Some("alert"));
        assert_eq!(doc.get_attribute(n, "aria-live"), Some("assertive"));
    }

    #[test]
    fn test_message_is_not_markup() {
        let mut doc = Document::default();
        let n = create_notification(&mut doc, "<img src=x onerror=alert(1)>", Severity::Info, 0).unwrap();
        assert_eq!(doc.text_content(n), "<img src=x onerror=alert(1)>");
        assert!(doc.query_selector(n, "img").unwrap().is_none());
    }

    #[test]
    fn test_fade_then_remove() {
        let mut doc = Document::default();
        let n = create_notification(&mut doc, "Bye", Severity::Info, 1000).unwrap();

        doc.advance_time(999);
        assert!(doc.is_connected(n));
        assert!(doc.style(n).get("opacity").is_none());

        doc.advance_time(1);
        assert!(doc.is_connected(n));
        assert_eq!(doc.style(n).get("opacity"), Some("0"));
        assert_eq!(doc.style(n).get("transition"), Some("opacity 0.3s ease"));

        doc.advance_time(299);
        assert!(doc.is_connected(n));
        doc.advance_time(1);
        assert!(!doc.is_connected(n));
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn test_non_positive_duration_persists() {
        let mut doc = Document::default();
        let zero = create_notification(&mut doc, "stay", Severity::Info, 0).unwrap();
        let negative = create_notification(&mut doc, "stay too", Severity::Info, -5).unwrap();

        assert_eq!(doc.pending_timers(), 0);
        doc.advance_time(1_000_000);
        assert!(doc.is_connected(zero));
        assert!(doc.is_connected(negative));
    }

    #[test]
    fn test_removed_early_is_left_alone() {
        let mut doc = Document::default();
        let n = create_notification(&mut doc, "x", Severity::Info, 100).unwrap();
        doc.remove(n);

        doc.advance_time(500);
        assert!(!doc.is_connected(n));
        assert!(doc.style(n).get("opacity").is_none());
    }

    #[test]
    fn test_requires_body() {
        let mut doc = Document::empty("about:blank");
        let err = create_notification(&mut doc, "x", Severity::Info, 0).unwrap_err();
        assert!(matches!(err, PageKitError::Environment(_)));
    }
}
