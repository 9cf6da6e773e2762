//! Form affordances: focus glow, floating labels, live validation, press
//! feedback on buttons and a loading state on submit.

use std::time::Duration;

use log::trace;
use once_cell::sync::Lazy;
use pagecss::{NodeStates, SelectorList, parse_selectors};
use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::events::TimerTask;
use crate::timer::{TimerHandle, TimerQueue};

pub const FOCUSED_CLASS: &str = "form-focused";
pub const FLOATING_CLASS: &str = "floating-label";
pub const ACTIVE_CLASS: &str = "active";
pub const VALID_CLASS: &str = "valid";
pub const INVALID_CLASS: &str = "invalid";

const FOCUS_SHADOW: &str = "0 8px 25px rgba(99, 102, 241, 0.15)";
const SUBMIT_SELECTOR: &str = r#"button[type="submit"], input[type="submit"]"#;
const LOADING_LABEL: &str = "Processing...";

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\+966|0)?[5-9][0-9]{8}$").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Checks `value` against the rule for an input of `input_type`.
///
/// Returns `None` for an empty value, which is neither valid nor invalid.
pub fn validate(input_type: &str, value: &str) -> Option<bool> {
    if value.is_empty() {
        return None;
    }
    let valid = match input_type {
        "email" => EMAIL.is_match(value),
        "tel" => PHONE.is_match(&WHITESPACE.replace_all(value, "")),
        "password" => value.chars().count() >= 6,
        _ => value.chars().count() >= 2,
    };
    Some(valid)
}

#[derive(Debug)]
struct PendingSubmit {
    button: NodeId,
    original_text: String,
    _restore: TimerHandle,
}

#[derive(Debug)]
pub struct FormEnhancer {
    submit_selector: SelectorList,
    restore_after: Duration,
    controls: Vec<NodeId>,
    labels: Vec<(NodeId, NodeId)>,
    buttons: Vec<NodeId>,
    forms: Vec<NodeId>,
    pending: Vec<PendingSubmit>,
}

impl FormEnhancer {
    pub fn new(restore_after: Duration) -> Result<Self> {
        Ok(Self {
            submit_selector: parse_selectors(SUBMIT_SELECTOR)?,
            restore_after,
            controls: Vec::new(),
            labels: Vec::new(),
            buttons: Vec::new(),
            forms: Vec::new(),
            pending: Vec::new(),
        })
    }

    /// Wires `.form-control` inputs: floating labels get their initial state.
    pub fn install_controls(&mut self, document: &mut Document, controls: impl IntoIterator<Item = NodeId>) {
        for input in controls {
            if self.controls.contains(&input) {
                continue;
            }
            self.controls.push(input);
            if let Some(label) = document
                .previous_element_sibling(input)
                .filter(|label| document.node(*label).is_some_and(|n| n.tag() == "label"))
            {
                document.add_class(label, FLOATING_CLASS);
                self.labels.push((input, label));
                self.update_label(document, input);
            }
        }
    }

    pub fn install_buttons(&mut self, buttons: impl IntoIterator<Item = NodeId>) {
        self.buttons.extend(buttons);
    }

    pub fn install_forms(&mut self, forms: impl IntoIterator<Item = NodeId>) {
        self.forms.extend(forms);
    }

    pub fn label_for(&self, input: NodeId) -> Option<NodeId> {
        self.labels
            .iter()
            .find(|(i, _)| *i == input)
            .map(|(_, label)| *label)
    }

    fn update_label(&self, document: &mut Document, input: NodeId) {
        if let Some(label) = self.label_for(input) {
            let active = !document.value(input).is_empty()
                || document.states(input).contains(NodeStates::FOCUS);
            document.set_class(label, ACTIVE_CLASS, active);
        }
    }

    pub fn on_focus(&mut self, document: &mut Document, target: NodeId) -> bool {
        if !self.controls.contains(&target) {
            return false;
        }
        document.set_state(target, NodeStates::FOCUS, true);
        if let Some(parent) = document.parent(target) {
            document.add_class(parent, FOCUSED_CLASS);
        }
        document.set_style(target, "transform", "translateY(-2px)");
        document.set_style(target, "box-shadow", FOCUS_SHADOW);
        self.update_label(document, target);
        true
    }

    pub fn on_blur(&mut self, document: &mut Document, target: NodeId) -> bool {
        if !self.controls.contains(&target) {
            return false;
        }
        document.set_state(target, NodeStates::FOCUS, false);
        if let Some(parent) = document.parent(target) {
            document.remove_class(parent, FOCUSED_CLASS);
        }
        document.set_style(target, "transform", "translateY(0)");
        document.set_style(target, "box-shadow", "none");
        self.update_label(document, target);
        true
    }

    /// Stores the new value and re-validates the control.
    pub fn on_input(&mut self, document: &mut Document, target: NodeId, value: &str) -> bool {
        if !self.controls.contains(&target) {
            return false;
        }
        document.set_value(target, value);
        document.remove_class(target, VALID_CLASS);
        document.remove_class(target, INVALID_CLASS);

        let input_type = document.attribute(target, "type").unwrap_or("text").to_string();
        if let Some(valid) = validate(&input_type, value) {
            document.add_class(target, if valid { VALID_CLASS } else { INVALID_CLASS });
        }
        self.update_label(document, target);
        true
    }

    fn pressed_button(&self, document: &Document, target: NodeId) -> Option<NodeId> {
        std::iter::once(target)
            .chain(document.ancestors(target))
            .find(|node| self.buttons.contains(node))
    }

    pub fn on_mouse_down(&self, document: &mut Document, target: NodeId) -> bool {
        let Some(button) = self.pressed_button(document, target) else {
            return false;
        };
        document.set_style(button, "transform", "scale(0.95)");
        true
    }

    /// Mouse-up and mouse-leave both release the press.
    pub fn on_release(&self, document: &mut Document, target: NodeId) -> bool {
        let Some(button) = self.pressed_button(document, target) else {
            return false;
        };
        document.set_style(button, "transform", "scale(1)");
        true
    }

    /// Puts the form's submit button into its loading state.
    pub fn on_submit(
        &mut self,
        document: &mut Document,
        timers: &mut TimerQueue<TimerTask>,
        form: NodeId,
    ) -> Option<NodeId> {
        if !self.forms.contains(&form) {
            return None;
        }
        let button = document.query_within(form, &self.submit_selector)?;
        if self.pending.iter().any(|p| p.button == button) {
            return Some(button);
        }

        let original_text = document.text(button).to_string();
        let width = document.rect(button).width;
        document.set_style(button, "width", &format!("{width}px"));
        document.set_text(button, LOADING_LABEL);
        document.set_disabled(button, true);
        trace!("submit {button:?} loading");

        self.pending.push(PendingSubmit {
            button,
            original_text,
            _restore: timers.schedule(self.restore_after, TimerTask::RestoreSubmit(button)),
        });
        Some(button)
    }

    pub fn is_loading(&self, button: NodeId) -> bool {
        self.pending.iter().any(|p| p.button == button)
    }

    /// Restores a submit button once its timer fires.
    pub fn on_timer(&mut self, document: &mut Document, task: &TimerTask) -> bool {
        let TimerTask::RestoreSubmit(button) = *task else {
            return false;
        };
        let Some(index) = self.pending.iter().position(|p| p.button == button) else {
            return true;
        };
        let pending = self.pending.remove(index);
        document.set_text(button, &pending.original_text);
        document.set_disabled(button, false);
        document.set_style(button, "width", "auto");
        true
    }

    /// Drops every listener target and pending restore.
    pub fn dispose(&mut self) {
        self.controls.clear();
        self.labels.clear();
        self.buttons.clear();
        self.forms.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::geometry::Rect;

    #[test]
    fn validation_rules() {
        assert_eq!(validate("email", ""), None);
        assert_eq!(validate("email", "a@b.co"), Some(true));
        assert_eq!(validate("email", "a@b"), Some(false));
        assert_eq!(validate("email", "a b@c.d"), Some(false));
        assert_eq!(validate("tel", "0551234567"), Some(true));
        assert_eq!(validate("tel", "+966 55 123 4567"), Some(true));
        assert_eq!(validate("tel", "551234567"), Some(true));
        assert_eq!(validate("tel", "0412345678"), Some(false));
        assert_eq!(validate("password", "12345"), Some(false));
        assert_eq!(validate("password", "123456"), Some(true));
        assert_eq!(validate("text", "a"), Some(false));
        assert_eq!(validate("text", "ab"), Some(true));
        assert_eq!(validate("text", "نص"), Some(true));
    }

    fn form_page() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.insert(body, Element::new("form"));
        let group = doc.insert(form, Element::new("div").with_class("mb-3"));
        let label = doc.insert(group, Element::new("label").with_text("Email"));
        let input = doc.insert(
            group,
            Element::new("input")
                .with_class("form-control")
                .with_attr("type", "email"),
        );
        let submit = doc.insert(
            form,
            Element::new("button")
                .with_class("btn")
                .with_attr("type", "submit")
                .with_text("Send")
                .with_rect(Rect::new(0.0, 0.0, 120.0, 40.0)),
        );
        let _ = label;
        (doc, form, group, input, submit)
    }

    #[test]
    fn focus_and_blur_style_the_control() {
        let (mut doc, _, group, input, _) = form_page();
        let mut forms = FormEnhancer::new(Duration::from_secs(5)).unwrap();
        forms.install_controls(&mut doc, [input]);
        let label = forms.label_for(input).unwrap();
        assert!(doc.has_class(label, FLOATING_CLASS));
        assert!(!doc.has_class(label, ACTIVE_CLASS));

        forms.on_focus(&mut doc, input);
        assert!(doc.has_class(group, FOCUSED_CLASS));
        assert!(doc.has_class(label, ACTIVE_CLASS));
        assert_eq!(doc.style(input, "transform"), Some("translateY(-2px)"));

        forms.on_blur(&mut doc, input);
        assert!(!doc.has_class(group, FOCUSED_CLASS));
        assert!(!doc.has_class(label, ACTIVE_CLASS));
        assert_eq!(doc.style(input, "box-shadow"), Some("none"));
    }

    #[test]
    fn input_validates_and_keeps_label_raised() {
        let (mut doc, _, _, input, _) = form_page();
        let mut forms = FormEnhancer::new(Duration::from_secs(5)).unwrap();
        forms.install_controls(&mut doc, [input]);
        let label = forms.label_for(input).unwrap();

        forms.on_input(&mut doc, input, "nobody");
        assert!(doc.has_class(input, INVALID_CLASS));
        assert!(doc.has_class(label, ACTIVE_CLASS));

        forms.on_input(&mut doc, input, "nobody@example.com");
        assert!(doc.has_class(input, VALID_CLASS));
        assert!(!doc.has_class(input, INVALID_CLASS));

        forms.on_input(&mut doc, input, "");
        assert!(!doc.has_class(input, VALID_CLASS));
        assert!(!doc.has_class(input, INVALID_CLASS));
        assert!(!doc.has_class(label, ACTIVE_CLASS));
    }

    #[test]
    fn press_feedback() {
        let (mut doc, _, _, _, submit) = form_page();
        let mut forms = FormEnhancer::new(Duration::from_secs(5)).unwrap();
        forms.install_buttons([submit]);
        assert!(forms.on_mouse_down(&mut doc, submit));
        assert_eq!(doc.style(submit, "transform"), Some("scale(0.95)"));
        assert!(forms.on_release(&mut doc, submit));
        assert_eq!(doc.style(submit, "transform"), Some("scale(1)"));
        let body = doc.body();
        assert!(!forms.on_mouse_down(&mut doc, body));
    }

    #[test]
    fn submit_shows_loading_then_restores() {
        let (mut doc, form, _, _, submit) = form_page();
        let mut timers = TimerQueue::new();
        let mut forms = FormEnhancer::new(Duration::from_millis(5000)).unwrap();
        forms.install_forms([form]);

        assert_eq!(forms.on_submit(&mut doc, &mut timers, form), Some(submit));
        assert_eq!(doc.text(submit), LOADING_LABEL);
        assert_eq!(doc.style(submit, "width"), Some("120px"));
        assert!(doc.states(submit).contains(NodeStates::DISABLED));

        assert!(timers.advance(Duration::from_millis(4999)).is_empty());
        for task in timers.advance(Duration::from_millis(1)) {
            assert!(forms.on_timer(&mut doc, &task));
        }
        assert_eq!(doc.text(submit), "Send");
        assert!(!doc.states(submit).contains(NodeStates::DISABLED));
        assert_eq!(doc.attribute(submit, "disabled"), None);
        assert!(!forms.is_loading(submit));
    }
}
