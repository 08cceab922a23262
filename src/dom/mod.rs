//! element locator capability
//!
//! the rule engine never talks to a concrete DOM. it locates and mutates
//! elements through the [`Document`] and [`Element`] traits, so the same
//! fields and rules run against a browser binding or the in-memory
//! [`memory::MemoryDocument`] used by the CLI and the tests.

pub mod memory;
pub mod selector;

use std::rc::Rc;

use crate::error::Result;

/// shared handle to an element owned by a document
pub type ElementRef = Rc<dyn Element>;

/// change-notification callback registered on an element
pub type Listener = Rc<dyn Fn()>;

/// element kinds the field factory distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Input,
    Select,
    Textarea,
    /// any other element (div, span, output, ...)
    Other,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("input") {
            ElementKind::Input
        } else if tag.eq_ignore_ascii_case("select") {
            ElementKind::Select
        } else if tag.eq_ignore_ascii_case("textarea") {
            ElementKind::Textarea
        } else {
            ElementKind::Other
        }
    }
}

/// a live element: attributes, classes, form state and listeners
///
/// all mutators take `&self`; implementations use interior mutability the
/// way a browser element handle does.
pub trait Element {
    /// lowercase tag name
    fn tag_name(&self) -> String;

    fn get_attribute(&self, name: &str) -> Option<String>;

    /// current form value (input/textarea text, selected option of a select)
    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);

    /// select the option at `index` (selects only)
    fn set_selected_index(&self, index: usize);

    /// concatenated text of the element and its descendants
    fn text_content(&self) -> String;

    fn is_required(&self) -> bool;
    fn set_required(&self, required: bool);

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// read a `data-*` value, `key` without the `data-` prefix
    fn dataset(&self, key: &str) -> Option<String>;
    fn set_dataset(&self, key: &str, value: &str);

    fn add_event_listener(&self, event: &str, listener: Listener);
    fn dispatch_event(&self, event: &str);

    /// nearest inclusive ancestor matching `selector`
    fn closest(&self, selector: &str) -> Option<ElementRef>;

    fn kind(&self) -> ElementKind {
        ElementKind::from_tag(&self.tag_name())
    }

    /// lowercase `type` attribute of an input, "text" when absent
    fn input_type(&self) -> String {
        self.get_attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    /// add the class when `force` is true, remove it otherwise
    fn toggle_class(&self, class: &str, force: bool) {
        if force {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }
}

/// the injected element locator
pub trait Document {
    /// all elements matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef>>;

    fn get_element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// append a `<style>` block with the given id to the document head
    fn append_stylesheet(&self, id: &str, css: &str);

    /// first element matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<ElementRef>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }
}
