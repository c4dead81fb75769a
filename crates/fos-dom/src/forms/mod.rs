//! Form Elements Module
//!
//! Constraint validation and submission for `<form>` and its controls.

mod validation;
mod form;

pub use validation::{ValidityState, ValidationConstraints, ValueType};
pub use form::SubmitOutcome;
