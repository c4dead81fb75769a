//! PageKit configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```json
//! { "forms": { "invalid_message": "Please fill in all required fields" } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageKitConfig {
    pub notification: NotificationConfig,
    pub forms: FormConfig,
    pub icons: IconConfig,
    pub media: MediaClassConfig,
}

impl PageKitConfig {
    /// Parse from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded PageKit configuration");
        Ok(config)
    }
}

/// Notification defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Time before the fade starts; `<= 0` keeps notifications until removed
    pub duration_ms: i64,
    /// Fade transition length before removal
    pub fade_ms: u64,
    /// Positioning classes appended after `alert alert-<severity>`
    pub position_classes: Vec<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            fade_ms: 300,
            position_classes: ["position-fixed", "top-0", "start-50", "translate-middle-x", "mt-3"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Form feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Announced when a submitted form fails validation
    pub invalid_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            invalid_message: "Пожалуйста, заполните все обязательные поля правильно".to_string(),
        }
    }
}

/// Icon font conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Class prefix identifying icon glyphs (Bootstrap Icons: `bi-`)
    pub class_prefix: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self { class_prefix: "bi-".to_string() }
    }
}

/// Body classes mirroring user media preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaClassConfig {
    pub high_contrast_class: String,
    pub reduced_motion_class: String,
}

impl Default for MediaClassConfig {
    fn default() -> Self {
        Self {
            high_contrast_class: "high-contrast".to_string(),
            reduced_motion_class: "reduced-motion".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageKitConfig::default();
        assert_eq!(config.notification.duration_ms, 5000);
        assert_eq!(config.notification.fade_ms, 300);
        assert_eq!(config.icons.class_prefix, "bi-");
        assert_eq!(config.media.high_contrast_class, "high-contrast");
    }

    #[test]
    fn test_partial_json() {
        let config = PageKitConfig::from_json_str(
            r#"{ "forms": { "invalid_message": "Fix the form" }, "notification": { "duration_ms": 0 } }"#,
        )
        .unwrap();

        assert_eq!(config.forms.invalid_message, "Fix the form");
        assert_eq!(config.notification.duration_ms, 0);
        assert_eq!(config.notification.fade_ms, 300);
        assert_eq!(config.icons, IconConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = PageKitConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::PageKitError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PageKitConfig::from_path("/nonexistent/pagekit.json").unwrap_err();
        assert!(matches!(err, crate::PageKitError::Io(_)));
    }
}
