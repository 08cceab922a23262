//! `<textarea>` fields

use crate::dom::ElementRef;

pub(super) fn values(elements: &[ElementRef]) -> Vec<String> {
    elements.iter().map(|textarea| textarea.value()).collect()
}

pub(super) fn clear(textarea: &ElementRef) {
    textarea.set_value("");
}

pub(super) const EVENT_NAME: &str = "input";
