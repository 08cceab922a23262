//! styling contract shared with the page
//!
//! hidden elements carry [`HIDDEN_CLASS`]. elements that can be toggled carry
//! [`ANIMATED_CLASS`], and the `data-dcf-interacted` flag keeps the transition
//! from playing on first render.

use crate::dom::{Document, ElementRef};

pub const HIDDEN_CLASS: &str = "dcf__hidden";
pub const ANIMATED_CLASS: &str = "dcf__animated";
/// `data-*` key, without the prefix
pub const INTERACTED_KEY: &str = "dcf-interacted";
pub const STYLESHEET_ID: &str = "dcf-utility-styles";

pub const STYLESHEET: &str = concat!(
    ".dcf__hidden{display:none!important}",
    ".dcf__animated[data-dcf-interacted=true]{animation:dcf__appear .5s ease-in-out 1;",
    "transition-property:display,max-height;transition-duration:.5s;",
    "transition-behavior:allow-discrete;max-height:1000px}",
    ".dcf__animated.dcf__hidden[data-dcf-interacted=true]{animation:dcf__disappear .5s ease-in-out 1;max-height:0}",
    "@keyframes dcf__appear{0%{opacity:0;max-height:0}to{opacity:1;max-height:1000px}}",
    "@keyframes dcf__disappear{0%{opacity:1;max-height:1000px;display:block!important}",
    "to{opacity:0;max-height:0;display:none!important}}",
);

/// add the utility stylesheet unless the document already has it
///
/// returns true when the stylesheet was added by this call.
pub fn install(document: &dyn Document) -> bool {
    if document.get_element_by_id(STYLESHEET_ID).is_some() {
        return false;
    }
    document.append_stylesheet(STYLESHEET_ID, STYLESHEET);
    log::debug!("installed utility stylesheet #{}", STYLESHEET_ID);
    true
}

/// opt an element into animated toggling, not yet interacted
pub fn mark_animated(element: &ElementRef) {
    element.add_class(ANIMATED_CLASS);
    element.set_dataset(INTERACTED_KEY, "false");
}

/// set (not flip) the hidden state and stamp the interacted flag
pub fn set_hidden(element: &ElementRef, hidden: bool, interacted: bool) {
    element.toggle_class(HIDDEN_CLASS, hidden);
    element.set_dataset(INTERACTED_KEY, if interacted { "true" } else { "false" });
}
