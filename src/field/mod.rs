//! form fields: a group of elements behind one selector
//!
//! every field answers the same questions (current values, how to clear,
//! which event signals a change) and accepts the same effects (required,
//! visibility). the answers depend on the field kind, decided once at
//! construction from the first matched element.

mod element;
pub mod factory;
mod input;
mod parent;
mod select;
mod textarea;

pub use factory::create_field;
pub use parent::ParentSelector;

use crate::dom::{Document, ElementKind, ElementRef, Listener};
use crate::error::{Error, Result};
use crate::styles;

/// the closed set of field variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` of any type
    Input,
    Select,
    Textarea,
    /// read-only fallback for any other element
    Element,
}

impl From<ElementKind> for FieldKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Input => FieldKind::Input,
            ElementKind::Select => FieldKind::Select,
            ElementKind::Textarea => FieldKind::Textarea,
            ElementKind::Other => FieldKind::Element,
        }
    }
}

/// how to build a field
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    pub selector: String,
    /// only fields declared required may become required when shown
    pub required: bool,
    /// selectors of elements (labels, hints) that follow the field's visibility
    pub associated_elements: Vec<String>,
    pub parent_selector: Option<ParentSelector>,
}

impl FieldSpec {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn associated<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associated_elements = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn parent(mut self, parent_selector: ParentSelector) -> Self {
        self.parent_selector = Some(parent_selector);
        self
    }
}

/// a located group of form elements
pub struct Field {
    selector: String,
    kind: FieldKind,
    elements: Vec<ElementRef>,
    required: bool,
    associated_elements: Vec<ElementRef>,
    parent_selector: Option<ParentSelector>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("selector", &self.selector)
            .field("kind", &self.kind)
            .field("elements", &self.elements.len())
            .field("required", &self.required)
            .field("associated_elements", &self.associated_elements.len())
            .field("parent_selector", &self.parent_selector)
            .finish()
    }
}

impl Field {
    /// locate the field's elements and mark them for animated toggling
    ///
    /// fails with [`Error::SelectorNotFound`] when the selector (or the
    /// associated elements list) matches nothing.
    pub fn new(document: &dyn Document, kind: FieldKind, spec: FieldSpec) -> Result<Self> {
        let elements = locate(document, &spec.selector)?;
        let associated_elements = if spec.associated_elements.is_empty() {
            Vec::new()
        } else {
            locate(document, &spec.associated_elements.join(","))?
        };

        let field = Self {
            selector: spec.selector,
            kind,
            elements,
            required: spec.required,
            associated_elements,
            parent_selector: spec.parent_selector,
        };
        field.mark_animated();
        Ok(field)
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    pub fn associated_elements(&self) -> &[ElementRef] {
        &self.associated_elements
    }

    /// declared required flag, not the live attribute
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn parent_selector(&self) -> Option<&ParentSelector> {
        self.parent_selector.as_ref()
    }

    /// current values, in element order
    pub fn values(&self) -> Vec<String> {
        match self.kind {
            FieldKind::Input => input::values(&self.elements),
            FieldKind::Select => select::values(&self.elements),
            FieldKind::Textarea => textarea::values(&self.elements),
            FieldKind::Element => element::values(&self.elements),
        }
    }

    /// event that signals a value change, `None` when the field cannot trigger
    pub fn event_name(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Input => Some(input::event_name(&self.elements)),
            FieldKind::Select => Some(select::EVENT_NAME),
            FieldKind::Textarea => Some(textarea::EVENT_NAME),
            FieldKind::Element => None,
        }
    }

    /// reset every element to its empty state and announce the change
    ///
    /// the change notification lets rules triggered by this field re-run.
    pub fn clear(&self) {
        let Some(event) = self.event_name() else {
            return;
        };
        for element in &self.elements {
            match self.kind {
                FieldKind::Input => input::clear(element),
                FieldKind::Select => select::clear(element),
                FieldKind::Textarea => textarea::clear(element),
                FieldKind::Element => {}
            }
            element.dispatch_event(event);
        }
    }

    /// push the `required` attribute to every element
    ///
    /// ignored for checkbox groups, and a field not declared required
    /// never becomes required.
    pub fn set_required(&self, required: bool) {
        if self.kind == FieldKind::Input && !input::accepts_required(&self.elements) {
            return;
        }
        if required && !self.required {
            return;
        }
        for element in &self.elements {
            element.set_required(required);
        }
    }

    /// show or hide the field (or its containers) and associated elements
    pub fn toggle_visibility(&self, show: bool, interacted: bool) {
        for element in self.elements.iter().chain(&self.associated_elements) {
            styles::set_hidden(&self.target(element), !show, interacted);
        }
    }

    /// register `listener` for the field's change event on every element
    ///
    /// returns false when the field has no change event.
    pub fn add_event_listener(&self, listener: Listener) -> bool {
        let Some(event) = self.event_name() else {
            return false;
        };
        for element in &self.elements {
            element.add_event_listener(event, listener.clone());
        }
        true
    }

    /// element receiving visibility styling: the resolved parent or itself
    fn target(&self, element: &ElementRef) -> ElementRef {
        self.parent_selector
            .as_ref()
            .and_then(|p| p.resolve(element))
            .unwrap_or_else(|| element.clone())
    }

    fn mark_animated(&self) {
        for element in &self.elements {
            styles::mark_animated(element);
        }
        if let Some(parent_selector) = &self.parent_selector {
            for element in &self.elements {
                if let Some(parent) = parent_selector.resolve(element) {
                    styles::mark_animated(&parent);
                }
            }
        }
        for element in &self.associated_elements {
            styles::mark_animated(element);
        }
    }
}

/// query `selector`, failing when nothing matches
pub(crate) fn locate(document: &dyn Document, selector: &str) -> Result<Vec<ElementRef>> {
    let elements = document.query_selector_all(selector)?;
    if elements.is_empty() {
        return Err(Error::selector_not_found(selector));
    }
    Ok(elements)
}
