//! Media Preferences and platform features
//!
//! `matchMedia` for user preference features and the capability flags
//! scripts probe before using newer element attributes.

use crate::Document;

/// `prefers-contrast`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContrastPreference {
    #[default]
    NoPreference,
    More,
    Less,
    Custom,
}

/// `prefers-color-scheme`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Combined user preferences exposed through media queries
#[derive(Debug, Clone, Default)]
pub struct MediaPreferences {
    /// prefers-reduced-motion: reduce
    pub reduced_motion: bool,
    /// prefers-contrast
    pub contrast: ContrastPreference,
    /// prefers-color-scheme
    pub color_scheme: ColorScheme,
    /// forced-colors: active
    pub forced_colors: bool,
}

impl MediaPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reduced_motion(mut self, reduce: bool) -> Self {
        self.reduced_motion = reduce;
        self
    }

    pub fn with_contrast(mut self, contrast: ContrastPreference) -> Self {
        self.contrast = contrast;
        self
    }

    /// Evaluate a single media feature query such as
    /// `(prefers-contrast: more)`. Unknown features never match.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        let inner = query.strip_prefix('(')
            .and_then(|q| q.strip_suffix(')'))
            .unwrap_or(query)
            .to_ascii_lowercase();

        let (feature, value) = match inner.split_once(':') {
            Some((f, v)) => (f.trim().to_string(), Some(v.trim().to_string())),
            None => (inner.trim().to_string(), None),
        };

        match (feature.as_str(), value.as_deref()) {
            ("prefers-reduced-motion", Some("reduce")) | ("prefers-reduced-motion", None) => self.reduced_motion,
            ("prefers-reduced-motion", Some("no-preference")) => !self.reduced_motion,

            ("prefers-contrast", None) => self.contrast != ContrastPreference::NoPreference,
            ("prefers-contrast", Some("more")) => self.contrast == ContrastPreference::More,
            ("prefers-contrast", Some("less")) => self.contrast == ContrastPreference::Less,
            ("prefers-contrast", Some("custom")) => self.contrast == ContrastPreference::Custom,
            ("prefers-contrast", Some("no-preference")) => self.contrast == ContrastPreference::NoPreference,

            ("prefers-color-scheme", Some("dark")) => self.color_scheme == ColorScheme::Dark,
            ("prefers-color-scheme", Some("light")) => self.color_scheme == ColorScheme::Light,

            ("forced-colors", Some("active")) | ("forced-colors", None) => self.forced_colors,
            ("forced-colors", Some("none")) => !self.forced_colors,

            _ => false,
        }
    }
}

/// Element features the host supports (feature detection)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFeatures {
    /// `HTMLImageElement.loading`
    pub native_lazy_loading: bool,
    /// `HTMLImageElement.srcset`
    pub srcset: bool,
}

impl PlatformFeatures {
    /// A host without either feature
    pub fn legacy() -> Self {
        Self { native_lazy_loading: false, srcset: false }
    }
}

impl Default for PlatformFeatures {
    fn default() -> Self {
        Self { native_lazy_loading: true, srcset: true }
    }
}

impl Document {
    /// `window.matchMedia(query).matches`; `None` when the host has no
    /// media query support
    pub fn match_media(&self, query: &str) -> Option<bool> {
        self.media.as_ref().map(|m| m.matches(query))
    }

    pub fn media_preferences(&self) -> Option<&MediaPreferences> {
        self.media.as_ref()
    }

    /// Replace the preferences; `None` removes media query support
    pub fn set_media_preferences(&mut self, prefs: Option<MediaPreferences>) {
        self.media = prefs;
    }

    pub fn features(&self) -> PlatformFeatures {
        self.features
    }

    pub fn set_features(&mut self, features: PlatformFeatures) {
        self.features = features;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_query() {
        let prefs = MediaPreferences::new().with_contrast(ContrastPreference::More);
        assert!(prefs.matches("(prefers-contrast: more)"));
        assert!(prefs.matches("(PREFERS-CONTRAST:MORE)"));
        assert!(!prefs.matches("(prefers-contrast: less)"));
        assert!(prefs.matches("(prefers-contrast)"));
    }

    #[test]
    fn test_reduced_motion_query() {
        let prefs = MediaPreferences::new();
        assert!(!prefs.matches("(prefers-reduced-motion: reduce)"));
        assert!(prefs.matches("(prefers-reduced-motion: no-preference)"));

        let prefs = prefs.with_reduced_motion(true);
        assert!(prefs.matches("(prefers-reduced-motion: reduce)"));
    }

    #[test]
    fn test_unknown_feature() {
        assert!(!MediaPreferences::new().matches("(min-width: 600px)"));
    }

    #[test]
    fn test_document_without_media_support() {
        let mut doc = Document::default();
        assert_eq!(doc.match_media("(prefers-contrast: more)"), Some(false));
        doc.set_media_preferences(None);
        assert_eq!(doc.match_media("(prefers-contrast: more)"), None);
    }
}
