//! generic read-only elements (div, span, output, ...)
//!
//! they expose their text as a value, cannot be cleared and have no change
//! event, so they never drive a rule.

use crate::dom::ElementRef;

pub(super) fn values(elements: &[ElementRef]) -> Vec<String> {
    elements.iter().map(|e| e.text_content()).collect()
}
