//! `<select>` fields

use crate::dom::ElementRef;

pub(super) fn values(elements: &[ElementRef]) -> Vec<String> {
    elements.iter().map(|select| select.value()).collect()
}

/// back to the first option
pub(super) fn clear(select: &ElementRef) {
    select.set_selected_index(0);
}

pub(super) const EVENT_NAME: &str = "change";
