//! conditional-field rules
//!
//! a [`ConditionalField`] watches one trigger field and, whenever its value
//! changes, decides whether the affected fields (or their block) are shown.
//! hidden fields drop their `required` attribute and may be cleared.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::conditions::{evaluate, evaluate_any, Operator, TriggerValue};
use crate::config::RuleConfig;
use crate::dom::{Document, ElementRef};
use crate::error::{Error, Result};
use crate::field::{create_field, Field, FieldSpec};
use crate::styles;

pub struct ConditionalField {
    trigger: Field,
    operator: Operator,
    values: Vec<TriggerValue>,
    hide_on_empty: bool,
    clear_on_hide: bool,
    initial_check: bool,
    affected_fields: Vec<Field>,
    affected_block: Option<ElementRef>,
    /// outcome of the last completed check
    visible: Cell<Option<bool>>,
    checking: Cell<bool>,
}

impl fmt::Debug for ConditionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalField")
            .field("trigger", &self.trigger)
            .field("operator", &self.operator)
            .field("values", &self.values)
            .field("hide_on_empty", &self.hide_on_empty)
            .field("clear_on_hide", &self.clear_on_hide)
            .field("initial_check", &self.initial_check)
            .field("affected_fields", &self.affected_fields)
            .field("affected_block", &self.affected_block.is_some())
            .field("visible", &self.visible.get())
            .finish()
    }
}

impl ConditionalField {
    /// build a rule against `document` and wire it up
    ///
    /// registers the trigger listener, runs the initial check when enabled
    /// and installs the utility stylesheet. the listener keeps the rule alive
    /// for as long as the document holds it.
    pub fn new(document: &dyn Document, config: &RuleConfig) -> Result<Rc<Self>> {
        let trigger = create_field(document, FieldSpec::new(&config.trigger.selector))?;

        let operator = config.trigger.operator.clone();
        if !operator.is_known() {
            log::warn!(
                "unknown operator '{}' for trigger '{}', comparing for equality",
                operator,
                config.trigger.selector
            );
        }

        let values = config.trigger.value.to_vec();

        let default_parent = config.affected.parent_selector.as_ref();
        let affected_fields = config
            .affected
            .fields
            .iter()
            .map(|f| create_field(document, f.to_field_spec(default_parent)))
            .collect::<Result<Vec<_>>>()?;

        let affected_block = match &config.affected.block {
            Some(selector) => {
                let block = document
                    .query_selector(selector)?
                    .ok_or_else(|| Error::selector_not_found(selector))?;
                styles::mark_animated(&block);
                Some(block)
            }
            None => None,
        };

        let rule = Rc::new(Self {
            trigger,
            operator,
            values,
            hide_on_empty: config.hide_on_empty,
            clear_on_hide: config.clear_on_hide,
            initial_check: config.initial_check,
            affected_fields,
            affected_block,
            visible: Cell::new(None),
            checking: Cell::new(false),
        });
        rule.initialize();
        styles::install(document);

        log::debug!(
            "installed rule on '{}' ({} {:?}), {} affected field(s){}",
            rule.trigger.selector(),
            rule.operator,
            rule.values.iter().map(ToString::to_string).collect::<Vec<_>>(),
            rule.affected_fields.len(),
            if rule.affected_block.is_some() { " in block" } else { "" }
        );
        Ok(rule)
    }

    fn initialize(self: &Rc<Self>) {
        let rule = Rc::clone(self);
        let listening = self.trigger.add_event_listener(Rc::new(move || {
            rule.check(None, true);
        }));
        if !listening {
            log::debug!(
                "trigger '{}' has no change event, evaluating once",
                self.trigger.selector()
            );
        }

        if self.initial_check {
            self.check(None, false);
        }
    }

    /// evaluate the condition and apply visibility, required state and clearing
    ///
    /// `value` overrides the trigger's current values when non-empty.
    /// `interacted` is false for the initial render so no animation plays.
    /// returns whether the affected fields are now shown.
    pub fn check(&self, value: Option<&str>, interacted: bool) -> bool {
        // clearing can re-fire this rule's trigger through a cycle of rules
        if self.checking.replace(true) {
            log::debug!("skipping nested check of '{}'", self.trigger.selector());
            return self.visible.get().unwrap_or(false);
        }

        let show = self.evaluate(value);
        self.visible.set(Some(show));

        self.update_visibility(show, interacted);
        self.update_required(show);
        if !show && self.clear_on_hide {
            self.clear_fields();
        }

        self.checking.set(false);
        show
    }

    fn evaluate(&self, value: Option<&str>) -> bool {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return self
                .values
                .iter()
                .any(|expected| evaluate(value, expected, &self.operator));
        }

        let observed: Vec<String> = self
            .trigger
            .values()
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        if observed.is_empty() {
            return !self.hide_on_empty;
        }
        evaluate_any(&observed, &self.values, &self.operator)
    }

    /// the block when configured, otherwise each affected field
    fn update_visibility(&self, show: bool, interacted: bool) {
        match &self.affected_block {
            Some(block) => styles::set_hidden(block, !show, interacted),
            None => {
                for field in &self.affected_fields {
                    field.toggle_visibility(show, interacted);
                }
            }
        }
    }

    fn update_required(&self, show: bool) {
        for field in &self.affected_fields {
            field.set_required(show);
        }
    }

    fn clear_fields(&self) {
        for field in &self.affected_fields {
            field.clear();
        }
    }

    pub fn trigger(&self) -> &Field {
        &self.trigger
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// configured values, a single value read as a list of one
    pub fn values(&self) -> &[TriggerValue] {
        &self.values
    }

    pub fn hide_on_empty(&self) -> bool {
        self.hide_on_empty
    }

    pub fn clear_on_hide(&self) -> bool {
        self.clear_on_hide
    }

    pub fn initial_check(&self) -> bool {
        self.initial_check
    }

    pub fn affected_fields(&self) -> &[Field] {
        &self.affected_fields
    }

    pub fn affected_block(&self) -> Option<&ElementRef> {
        self.affected_block.as_ref()
    }

    /// result of the last check, `None` before the first one
    pub fn is_visible(&self) -> Option<bool> {
        self.visible.get()
    }
}
