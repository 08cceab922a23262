//! `<input>` fields: text-like, file, checkbox and radio

use crate::dom::ElementRef;

fn is_toggle(input_type: &str) -> bool {
    input_type == "checkbox" || input_type == "radio"
}

/// checked values of checkboxes/radios, raw values of everything else
pub(super) fn values(elements: &[ElementRef]) -> Vec<String> {
    elements
        .iter()
        .filter(|input| !is_toggle(&input.input_type()) || input.is_checked())
        .map(|input| input.value())
        .collect()
}

pub(super) fn clear(input: &ElementRef) {
    if is_toggle(&input.input_type()) {
        input.set_checked(false);
    } else {
        input.set_value("");
    }
}

/// the group's type is decided by its first input
pub(super) fn event_name(elements: &[ElementRef]) -> &'static str {
    match elements.first().map(|e| e.input_type()).as_deref() {
        Some("checkbox") | Some("radio") | Some("file") => "change",
        _ => "input",
    }
}

/// a checkbox group never receives `required` programmatically: the
/// browser would demand every box be checked
pub(super) fn accepts_required(elements: &[ElementRef]) -> bool {
    elements
        .first()
        .map_or(true, |e| e.input_type() != "checkbox")
}
