//! Form submission
//!
//! `checkValidity`, `:invalid` lookup and `requestSubmit` on `Document`.

use crate::{Document, DomError, DomEvent, DomResult, ElementData, NodeId, ValidationConstraints, ValidityState};

/// Input types that never take part in constraint validation
const BARRED_INPUT_TYPES: &[&str] = &["hidden", "button", "submit", "reset", "image"];

fn is_radio(elem: &ElementData) -> bool {
    elem.is("input") && elem.get_attr("type").is_some_and(|t| t.eq_ignore_ascii_case("radio"))
}

/// Result of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submit event ran to completion; the form would navigate
    Submitted,
    /// A submit listener called `preventDefault`
    Cancelled,
    /// Interactive validation failed before any submit event fired
    Blocked,
}

impl Document {
    /// Controls owned by a form, in document order
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        self.tree.descendants(form)
            .filter(|&n| {
                self.element(n).is_some_and(|e| e.is("input") || e.is("select") || e.is("textarea"))
            })
            .collect()
    }

    /// Whether a control is a candidate for constraint validation
    pub fn will_validate(&self, control: NodeId) -> bool {
        let Some(elem) = self.element(control) else { return false };
        if elem.has_attr("disabled") {
            return false;
        }
        let disabled_fieldset = self.tree.ancestors(control)
            .any(|a| self.element(a).is_some_and(|e| e.is("fieldset") && e.has_attr("disabled")));
        if disabled_fieldset {
            return false;
        }
        if elem.is("input") {
            let ty = elem.get_attr("type").unwrap_or("text").to_ascii_lowercase();
            if BARRED_INPUT_TYPES.contains(&ty.as_str()) || elem.has_attr("readonly") {
                return false;
            }
        }
        if elem.is("textarea") && elem.has_attr("readonly") {
            return false;
        }
        true
    }

    /// Current value of a form control
    pub fn control_value(&self, control: NodeId) -> String {
        let Some(elem) = self.element(control) else { return String::new() };

        if elem.is("textarea") {
            return self.tree.text_content(control);
        }
        if elem.is("select") {
            let options: Vec<NodeId> = self.tree.descendants(control)
                .filter(|&n| self.element(n).is_some_and(|e| e.is("option")))
                .collect();
            let chosen = options.iter()
                .copied()
                .find(|&o| self.has_attribute(o, "selected"))
                .or_else(|| options.first().copied());
            return chosen.map_or_else(String::new, |o| {
                self.get_attribute(o, "value")
                    .map_or_else(|| self.tree.text_content(o).trim().to_string(), str::to_string)
            });
        }

        let ty = elem.get_attr("type").unwrap_or("text").to_ascii_lowercase();
        if ty == "checkbox" || ty == "radio" {
            return if elem.has_attr("checked") {
                elem.get_attr("value").unwrap_or("on").to_string()
            } else {
                String::new()
            };
        }
        elem.get_attr("value").unwrap_or("").to_string()
    }

    /// Set an input's value (the `value` content attribute)
    pub fn set_control_value(&mut self, control: NodeId, value: &str) -> DomResult<()> {
        if self.element(control).is_some_and(|e| e.is("textarea")) {
            self.set_text_content(control, value)
        } else {
            self.set_attribute(control, "value", value)
        }
    }

    /// `element.validity`
    pub fn validity(&self, control: NodeId) -> ValidityState {
        if !self.will_validate(control) {
            return ValidityState::default();
        }
        let Some(elem) = self.element(control) else { return ValidityState::default() };
        let mut constraints = ValidationConstraints::from_element(elem);

        if !is_radio(elem) {
            return constraints.validate(&self.control_value(control));
        }

        // A radio group is required if any member is, and satisfied by any checked member
        let group = self.radio_group(control);
        constraints.required = group.iter()
            .any(|&r| self.has_attribute(r, "required"));
        let value = group.iter()
            .find(|&&r| self.has_attribute(r, "checked"))
            .map_or_else(String::new, |&r| self.control_value(r));
        constraints.validate(&value)
    }

    /// Radios sharing `radio`'s `name` within the same form owner (or the
    /// document, for radios outside any form). An unnamed radio is its own group.
    pub fn radio_group(&self, radio: NodeId) -> Vec<NodeId> {
        let name = match self.get_attribute(radio, "name") {
            Some(name) if !name.is_empty() => name,
            _ => return vec![radio],
        };
        let owner = self.form_owner(radio);
        let scope = owner.unwrap_or(NodeId::ROOT);

        self.tree.descendants(scope)
            .filter(|&n| {
                self.element(n).is_some_and(|e| is_radio(e) && e.get_attr("name") == Some(name))
                    && self.form_owner(n) == owner
            })
            .collect()
    }

    /// Nearest `<form>` ancestor
    pub fn form_owner(&self, control: NodeId) -> Option<NodeId> {
        self.tree.ancestors(control)
            .find(|&a| self.element(a).is_some_and(|e| e.is("form")))
    }

    /// `form.checkValidity()`
    pub fn check_validity(&self, form: NodeId) -> bool {
        self.first_invalid_control(form).is_none()
    }

    /// `form.querySelector(':invalid')`
    pub fn first_invalid_control(&self, form: NodeId) -> Option<NodeId> {
        self.form_controls(form)
            .into_iter()
            .find(|&c| !self.validity(c).is_valid())
    }

    /// `form.requestSubmit()`.
    ///
    /// Without `novalidate`, an invalid form is blocked before the submit
    /// event fires and the first invalid control gets focus.
    pub fn request_submit(&mut self, form: NodeId) -> DomResult<SubmitOutcome> {
        if !self.element(form).is_some_and(|e| e.is("form")) {
            return Err(DomError::NotAnElement(form));
        }

        if !self.has_attribute(form, "novalidate") {
            if let Some(invalid) = self.first_invalid_control(form) {
                self.focus(invalid);
                tracing::debug!(?form, ?invalid, "submission blocked by constraint validation");
                return Ok(SubmitOutcome::Blocked);
            }
        }

        let event = self.dispatch_event(DomEvent::submit(form));
        if event.is_default_prevented() {
            tracing::debug!(?form, "submission cancelled by listener");
            return Ok(SubmitOutcome::Cancelled);
        }

        self.submitted.push(form);
        tracing::debug!(?form, "form submitted");
        Ok(SubmitOutcome::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_form(doc: &mut Document) -> NodeId {
        let form = doc.create_element("form");
        doc.append_child(doc.body().unwrap(), form).unwrap();
        form
    }

    fn control(doc: &mut Document, form: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = doc.create_element(tag);
        for (k, v) in attrs {
            doc.set_attribute(id, k, v).unwrap();
        }
        doc.append_child(form, id).unwrap();
        id
    }

    #[test]
    fn test_first_invalid_control() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        control(&mut doc, form, "input", &[("name", "ok"), ("value", "x"), ("required", "")]);
        let missing = control(&mut doc, form, "input", &[("name", "missing"), ("required", "")]);
        let textarea = control(&mut doc, form, "textarea", &[("required", "")]);

        assert!(!doc.check_validity(form));
        assert_eq!(doc.first_invalid_control(form), Some(missing));

        doc.set_control_value(missing, "filled").unwrap();
        assert_eq!(doc.first_invalid_control(form), Some(textarea));
        doc.set_control_value(textarea, "text").unwrap();
        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_barred_controls_skipped() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        control(&mut doc, form, "input", &[("type", "hidden"), ("required", "")]);
        control(&mut doc, form, "input", &[("disabled", ""), ("required", "")]);
        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_checkbox_required() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let checkbox = control(&mut doc, form, "input", &[("type", "checkbox"), ("required", "")]);
        assert!(!doc.check_validity(form));
        doc.set_attribute(checkbox, "checked", "").unwrap();
        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_required_radio_group() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let email = control(&mut doc, form, "input", &[("type", "radio"), ("name", "contact"), ("value", "email"), ("required", "")]);
        let phone = control(&mut doc, form, "input", &[("type", "radio"), ("name", "contact"), ("value", "phone")]);

        assert_eq!(doc.radio_group(phone), vec![email, phone]);
        assert!(doc.validity(phone).value_missing);
        assert_eq!(doc.first_invalid_control(form), Some(email));

        // Checking any member satisfies the whole group
        doc.set_attribute(phone, "checked", "").unwrap();
        assert!(doc.validity(email).is_valid());
        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_radio_groups_scoped_by_form() {
        let mut doc = Document::default();
        let first = new_form(&mut doc);
        let second = new_form(&mut doc);
        let checked = control(&mut doc, first, "input", &[("type", "radio"), ("name", "plan"), ("checked", "")]);
        let other = control(&mut doc, second, "input", &[("type", "radio"), ("name", "plan"), ("required", "")]);
        let unnamed = control(&mut doc, second, "input", &[("type", "radio"), ("required", "")]);

        assert_eq!(doc.radio_group(checked), vec![checked]);
        assert_eq!(doc.radio_group(unnamed), vec![unnamed]);
        assert!(doc.check_validity(first));
        assert_eq!(doc.first_invalid_control(second), Some(other));
    }

    #[test]
    fn test_whitespace_value_is_present() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let textarea = control(&mut doc, form, "textarea", &[("required", "")]);
        doc.set_control_value(textarea, " ").unwrap();
        control(&mut doc, form, "input", &[("required", ""), ("value", "  ")]);

        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_required_select_placeholder() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let select = control(&mut doc, form, "select", &[("required", "")]);
        let mut options = Vec::new();
        for value in ["", "msk", "spb"] {
            let option = doc.create_element("option");
            doc.set_attribute(option, "value", value).unwrap();
            doc.append_child(select, option).unwrap();
            options.push(option);
        }

        assert!(doc.validity(select).value_missing);
        doc.set_attribute(options[2], "selected", "").unwrap();
        assert!(doc.check_validity(form));
    }

    #[test]
    fn test_select_value() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let select = control(&mut doc, form, "select", &[]);
        for (value, selected) in [("a", false), ("b", true)] {
            let option = doc.create_element("option");
            doc.set_attribute(option, "value", value).unwrap();
            if selected {
                doc.set_attribute(option, "selected", "").unwrap();
            }
            doc.append_child(select, option).unwrap();
        }
        assert_eq!(doc.control_value(select), "b");
    }

    #[test]
    fn test_request_submit_outcomes() {
        let mut doc = Document::default();
        let form = new_form(&mut doc);
        let input = control(&mut doc, form, "input", &[("required", "")]);

        assert_eq!(doc.request_submit(form).unwrap(), SubmitOutcome::Blocked);
        assert_eq!(doc.active_element(), Some(input));
        assert!(doc.submitted_forms().is_empty());

        doc.set_attribute(form, "novalidate", "true").unwrap();
        assert_eq!(doc.request_submit(form).unwrap(), SubmitOutcome::Submitted);
        assert_eq!(doc.submitted_forms(), &[form]);

        assert!(doc.request_submit(input).is_err());
    }
}
