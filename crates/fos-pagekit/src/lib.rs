//! fOS PageKit
//!
//! Accessibility helpers for pages hosted on an fOS document:
//! - Focus trapping for modal containers
//! - Screen-reader notifications through ARIA live regions
//! - Email and phone format validators
//! - Lazy and density-responsive image loading
//! - One-shot page wiring (lazy images, form feedback, icon labels,
//!   contrast and motion preference classes)

pub mod config;
pub mod focus_trap;
pub mod notification;
pub mod validators;
pub mod responsive_image;
pub mod page_init;

pub use config::{PageKitConfig, NotificationConfig, FormConfig, IconConfig, MediaClassConfig};
pub use focus_trap::FocusTrap;
pub use notification::{create_notification, create_notification_with, Severity};
pub use validators::{is_valid_email, is_valid_phone};
pub use responsive_image::{apply_responsive_loading, density_variant, is_opaque_source};
pub use page_init::{initialize_accessibility_behaviors, install_on_ready, InitSummary};

/// PageKit error
#[derive(Debug, thiserror::Error)]
pub enum PageKitError {
    #[error("no UI document available: {0}")]
    Environment(&'static str),

    #[error("<{element}> has no usable `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: &'static str },

    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement { expected: &'static str, found: String },

    #[error("focus trap is already active")]
    TrapAlreadyActive,

    #[error("focus trap is not active")]
    TrapNotActive,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] fos_dom::DomError),
}

pub type Result<T, E = PageKitError> = std::result::Result<T, E>;
