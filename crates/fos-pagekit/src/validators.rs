//! Input format validators
//!
//! Deliberately simple shape checks for form fields, not RFC parsers.
//! Both functions are total: any string, including empty or garbage
//! input, yields a boolean.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld`, none of the parts containing whitespace or `@`
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// `+7 (495) 123-45-67` and its unspaced / undashed variants
static RU_PHONE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+7\s?\(?[0-9]{3}\)?\s?[0-9]{3}-?[0-9]{2}-?[0-9]{2}$").ok());

/// Basic email shape check
pub fn is_valid_email(s: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(s))
}

/// Russian phone number check (`+7` country code required)
pub fn is_valid_phone(s: &str) -> bool {
    RU_PHONE.as_ref().is_some_and(|re| re.is_match(s))
}
