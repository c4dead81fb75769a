//! Form Validation
//!
//! Constraint Validation API: per-control constraints read from element
//! attributes, checked against the control's current value.

use std::sync::LazyLock;

use regex::Regex;

use crate::ElementData;

/// HTML "valid e-mail address" production
static HTML_EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

/// Absolute URL: scheme followed by a non-empty remainder
static ABSOLUTE_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:\S+$").ok());

/// Validity state for form controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    /// The element's value is missing (for required)
    pub value_missing: bool,
    /// The element's value doesn't match the type
    pub type_mismatch: bool,
    /// The element's value doesn't match the pattern
    pub pattern_mismatch: bool,
    /// The element's value is too long
    pub too_long: bool,
    /// The element's value is too short
    pub too_short: bool,
    /// The element's value is below the minimum
    pub range_underflow: bool,
    /// The element's value is above the maximum
    pub range_overflow: bool,
    /// The element has a bad input format
    pub bad_input: bool,
}

impl ValidityState {
    /// Check if the element is valid
    pub fn is_valid(&self) -> bool {
        !self.value_missing &&
        !self.type_mismatch &&
        !self.pattern_mismatch &&
        !self.too_long &&
        !self.too_short &&
        !self.range_underflow &&
        !self.range_overflow &&
        !self.bad_input
    }
}

/// Value type implied by `<input type>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Text,
    Email,
    Url,
    Number,
}

/// Validation constraints
#[derive(Debug, Clone, Default)]
pub struct ValidationConstraints {
    pub required: bool,
    pub value_type: ValueType,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ValidationConstraints {
    /// Read constraints from a control's attributes.
    /// Unparsable numeric attributes are ignored.
    pub fn from_element(elem: &ElementData) -> Self {
        let number = |name: &str| elem.get_attr(name).and_then(|v| v.trim().parse::<f64>().ok());
        let length = |name: &str| elem.get_attr(name).and_then(|v| v.trim().parse::<usize>().ok());

        let value_type = match elem.get_attr("type").map(str::to_ascii_lowercase).as_deref() {
            Some("email") if elem.is("input") => ValueType::Email,
            Some("url") if elem.is("input") => ValueType::Url,
            Some("number") if elem.is("input") => ValueType::Number,
            _ => ValueType::Text,
        };

        Self {
            required: elem.has_attr("required"),
            value_type,
            pattern: elem.get_attr("pattern").map(str::to_string),
            min: number("min"),
            max: number("max"),
            min_length: length("minlength"),
            max_length: length("maxlength"),
        }
    }

    /// Validate a string value. Empty values only fail `required`.
    pub fn validate(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();

        if value.is_empty() {
            state.value_missing = self.required;
            return state;
        }

        let len = value.chars().count();
        if let Some(max) = self.max_length {
            state.too_long = len > max;
        }
        if let Some(min) = self.min_length {
            state.too_short = len < min;
        }

        match self.value_type {
            ValueType::Text => {}
            ValueType::Email => {
                state.type_mismatch = !HTML_EMAIL.as_ref().is_some_and(|re| re.is_match(value));
            }
            ValueType::Url => {
                state.type_mismatch = !ABSOLUTE_URL.as_ref().is_some_and(|re| re.is_match(value));
            }
            ValueType::Number => match value.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    state.range_underflow = self.min.is_some_and(|min| n < min);
                    state.range_overflow = self.max.is_some_and(|max| n > max);
                }
                _ => state.bad_input = true,
            },
        }

        if let Some(pattern) = &self.pattern {
            // An invalid pattern is ignored, like browsers do
            if let Ok(re) = Regex::new(&format!("^(?:{pattern})$")) {
                state.pattern_mismatch = !re.is_match(value);
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(attrs: &[(&str, &str)]) -> ElementData {
        let mut e = ElementData::new("input");
        for (k, v) in attrs {
            e.set_attr(k, v);
        }
        e
    }

    #[test]
    fn test_validity_state_invalid() {
        let state = ValidityState {
            value_missing: true,
            ..Default::default()
        };
        assert!(!state.is_valid());
        assert!(ValidityState::default().is_valid());
    }

    #[test]
    fn test_required() {
        let constraints = ValidationConstraints::from_element(&input(&[("required", "")]));
        assert!(constraints.validate("").value_missing);
        assert!(constraints.validate("x").is_valid());

        let optional = ValidationConstraints::from_element(&input(&[("type", "email")]));
        assert!(optional.validate("").is_valid());
    }

    #[test]
    fn test_lengths() {
        let constraints = ValidationConstraints::from_element(&input(&[("minlength", "3"), ("maxlength", "5")]));
        assert!(constraints.validate("ab").too_short);
        assert!(constraints.validate("abcdef").too_long);
        assert!(constraints.validate("абв").is_valid());
    }

    #[test]
    fn test_email_type() {
        let constraints = ValidationConstraints::from_element(&input(&[("type", "EMAIL")]));
        assert!(constraints.validate("user@example.com").is_valid());
        assert!(constraints.validate("user@").type_mismatch);
    }

    #[test]
    fn test_number_range() {
        let constraints = ValidationConstraints::from_element(&input(&[("type", "number"), ("min", "1"), ("max", "10")]));
        assert!(constraints.validate("0").range_underflow);
        assert!(constraints.validate("11").range_overflow);
        assert!(constraints.validate("ten").bad_input);
        assert!(constraints.validate("5").is_valid());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let constraints = ValidationConstraints::from_element(&input(&[("pattern", "[0-9]{3}")]));
        assert!(constraints.validate("123").is_valid());
        assert!(constraints.validate("1234").pattern_mismatch);

        let broken = ValidationConstraints::from_element(&input(&[("pattern", "[")]));
        assert!(broken.validate("anything").is_valid());
    }
}
