//! in-memory document
//!
//! a small element tree implementing [`Document`]/[`Element`] with browser-like
//! form semantics. the CLI replays interactions against it and the tests use
//! it as their DOM.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::selector::Selectors;
use super::{Document, Element, ElementKind, ElementRef, Listener};
use crate::error::{Error, Result};

/// serializable description of an element subtree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    /// `<input type=.. name=.. value=..>`
    pub fn input(input_type: &str, name: &str, value: &str) -> Self {
        Self::new("input")
            .attr("type", input_type)
            .attr("name", name)
            .attr("value", value)
    }

    /// `<select id=..>` with one `<option>` per value
    pub fn select(id: &str, options: &[&str]) -> Self {
        Self::new("select").id(id).children(
            options
                .iter()
                .map(|v| NodeSpec::new("option").attr("value", *v).text(*v)),
        )
    }
}

#[derive(Debug, Default)]
struct ElementState {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    value: String,
    checked: bool,
    required: bool,
    selected_index: Option<usize>,
    /// false until the selection is first resolved or changed
    selection_settled: bool,
}

/// element node of a [`MemoryDocument`]
pub struct MemoryElement {
    this: Weak<MemoryElement>,
    parent: RefCell<Weak<MemoryElement>>,
    children: RefCell<Vec<Rc<MemoryElement>>>,
    state: RefCell<ElementState>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryElement")
            .field("tag", &state.tag)
            .field("attributes", &state.attributes)
            .field("classes", &state.classes)
            .finish()
    }
}

impl MemoryElement {
    fn create(spec: &NodeSpec) -> Rc<Self> {
        let tag = spec.tag.to_ascii_lowercase();
        let mut attributes = BTreeMap::new();
        let mut classes = Vec::new();
        for (name, value) in &spec.attributes {
            let name = name.to_ascii_lowercase();
            if name == "class" {
                for class in value.split_whitespace() {
                    if !classes.iter().any(|c| c == class) {
                        classes.push(class.to_string());
                    }
                }
            } else {
                attributes.insert(name, value.clone());
            }
        }

        let kind = ElementKind::from_tag(&tag);
        let value = match kind {
            ElementKind::Input => attributes.get("value").cloned().unwrap_or_else(|| {
                let input_type = attributes.get("type").map(|t| t.to_ascii_lowercase());
                match input_type.as_deref() {
                    Some("checkbox") | Some("radio") => "on".to_string(),
                    _ => String::new(),
                }
            }),
            ElementKind::Textarea => spec.text.clone().unwrap_or_default(),
            _ => String::new(),
        };

        let state = ElementState {
            checked: attributes.contains_key("checked"),
            required: attributes.contains_key("required"),
            tag,
            attributes,
            classes,
            text: spec.text.clone(),
            value,
            selected_index: None,
            selection_settled: false,
        };

        Rc::new_cyclic(|this| MemoryElement {
            this: this.clone(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        })
    }

    fn rc(&self) -> Option<Rc<MemoryElement>> {
        self.this.upgrade()
    }

    pub fn parent(&self) -> Option<Rc<MemoryElement>> {
        self.parent.borrow().upgrade()
    }

    pub fn child_elements(&self) -> Vec<Rc<MemoryElement>> {
        self.children.borrow().clone()
    }

    fn append_child(&self, child: Rc<MemoryElement>) {
        *child.parent.borrow_mut() = self.this.clone();
        self.children.borrow_mut().push(child);
    }

    /// this element and its descendants in document order
    fn descendants_inclusive(self: &Rc<Self>, out: &mut Vec<Rc<MemoryElement>>) {
        out.push(self.clone());
        for child in self.children.borrow().iter() {
            child.descendants_inclusive(out);
        }
    }

    /// `<option>` descendants of a select
    fn options(self: &Rc<Self>) -> Vec<Rc<MemoryElement>> {
        let mut all = Vec::new();
        self.descendants_inclusive(&mut all);
        all.into_iter()
            .filter(|e| e.state.borrow().tag == "option")
            .collect()
    }

    fn option_value(&self) -> String {
        let state = self.state.borrow();
        match state.attributes.get("value") {
            Some(v) => v.clone(),
            None => state.text.clone().unwrap_or_default(),
        }
    }

    /// selected option index of a select, resolving the initial selection lazily
    pub fn selected_index(&self) -> Option<usize> {
        let this = self.rc()?;
        {
            let state = self.state.borrow();
            if state.selection_settled {
                return state.selected_index;
            }
        }
        let options = this.options();
        let initial = if options.is_empty() {
            None
        } else {
            Some(
                options
                    .iter()
                    .position(|o| o.state.borrow().attributes.contains_key("selected"))
                    .unwrap_or(0),
            )
        };
        self.select_index(initial);
        initial
    }

    fn select_index(&self, index: Option<usize>) {
        let mut state = self.state.borrow_mut();
        state.selected_index = index;
        state.selection_settled = true;
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
        for child in self.children.borrow().iter() {
            child.clear_listeners();
        }
    }

    /// type-erased handle for the [`Document`] api
    pub fn handle(self: &Rc<Self>) -> ElementRef {
        self.clone()
    }
}

impl Element for MemoryElement {
    fn tag_name(&self) -> String {
        self.state.borrow().tag.clone()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        let state = self.state.borrow();
        if name.eq_ignore_ascii_case("class") {
            if state.classes.is_empty() {
                return None;
            }
            return Some(state.classes.join(" "));
        }
        state.attributes.get(&name.to_ascii_lowercase()).cloned()
    }

    fn value(&self) -> String {
        if ElementKind::from_tag(&self.tag_name()) != ElementKind::Select {
            return self.state.borrow().value.clone();
        }
        let Some(this) = self.rc() else {
            return String::new();
        };
        match self.selected_index() {
            Some(index) => this
                .options()
                .get(index)
                .map(|o| o.option_value())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    fn set_value(&self, value: &str) {
        if ElementKind::from_tag(&self.tag_name()) != ElementKind::Select {
            self.state.borrow_mut().value = value.to_string();
            return;
        }
        let Some(this) = self.rc() else {
            return;
        };
        // no matching option leaves nothing selected, like a browser
        let index = this.options().iter().position(|o| o.option_value() == value);
        self.select_index(index);
    }

    fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.state.borrow_mut().checked = checked;
    }

    fn set_selected_index(&self, index: usize) {
        let Some(this) = self.rc() else {
            return;
        };
        let count = this.options().len();
        self.select_index((index < count).then_some(index));
    }

    fn text_content(&self) -> String {
        let mut text = self.state.borrow().text.clone().unwrap_or_default();
        for child in self.children.borrow().iter() {
            text.push_str(&child.text_content());
        }
        text
    }

    fn is_required(&self) -> bool {
        self.state.borrow().required
    }

    fn set_required(&self, required: bool) {
        self.state.borrow_mut().required = required;
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        let mut state = self.state.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.state.borrow_mut().classes.retain(|c| c != class);
    }

    fn dataset(&self, key: &str) -> Option<String> {
        self.state
            .borrow()
            .attributes
            .get(&format!("data-{}", key))
            .cloned()
    }

    fn set_dataset(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(format!("data-{}", key), value.to_string());
    }

    fn add_event_listener(&self, event: &str, listener: Listener) {
        self.listeners
            .borrow_mut()
            .push((event.to_string(), listener));
    }

    fn dispatch_event(&self, event: &str) {
        // handlers may mutate this element or dispatch further events
        let handlers: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, l)| l.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    fn closest(&self, selector: &str) -> Option<ElementRef> {
        let list = match Selectors::parse(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("closest: {}", e);
                return None;
            }
        };
        let mut current = self.rc();
        while let Some(element) = current {
            if list.matches(&element) {
                return Some(element.handle());
            }
            current = element.parent();
        }
        None
    }
}

/// state of one element, as reported by [`MemoryDocument::snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    pub required: bool,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interacted: Option<String>,
}

impl ElementSnapshot {
    /// short label: `#id`, `[name=..]` or the tag
    pub fn label(&self) -> String {
        match (&self.id, &self.name, &self.input_type) {
            (Some(id), _, _) => format!("#{}", id),
            (None, Some(name), Some(t)) if t == "checkbox" || t == "radio" => {
                format!("[name={}][value={}]", name, self.value)
            }
            (None, Some(name), _) => format!("[name={}]", name),
            _ => self.tag.clone(),
        }
    }
}

/// in-memory document: `<html><head/><body/></html>`
pub struct MemoryDocument {
    root: Rc<MemoryElement>,
    head: Rc<MemoryElement>,
    body: Rc<MemoryElement>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let root = MemoryElement::create(&NodeSpec::new("html"));
        let head = MemoryElement::create(&NodeSpec::new("head"));
        let body = MemoryElement::create(&NodeSpec::new("body"));
        root.append_child(head.clone());
        root.append_child(body.clone());
        Self { root, head, body }
    }

    /// document whose body contains `spec`
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let doc = Self::new();
        doc.append(&doc.body, spec);
        doc
    }

    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a NodeSpec>) -> Self {
        let doc = Self::new();
        for spec in specs {
            doc.append(&doc.body, spec);
        }
        doc
    }

    pub fn head(&self) -> Rc<MemoryElement> {
        self.head.clone()
    }

    pub fn body(&self) -> Rc<MemoryElement> {
        self.body.clone()
    }

    /// build `spec` and append it under `parent`
    pub fn append(&self, parent: &Rc<MemoryElement>, spec: &NodeSpec) -> Rc<MemoryElement> {
        let element = MemoryElement::create(spec);
        for child in &spec.children {
            self.append(&element, child);
        }
        parent.append_child(element.clone());
        element
    }

    fn all_elements(&self) -> Vec<Rc<MemoryElement>> {
        let mut out = Vec::new();
        self.root.descendants_inclusive(&mut out);
        out
    }

    /// concrete elements matching `selector`
    pub fn select_all(&self, selector: &str) -> Result<Vec<Rc<MemoryElement>>> {
        let list = Selectors::parse(selector)?;
        Ok(self
            .all_elements()
            .into_iter()
            .filter(|e| list.matches(e))
            .collect())
    }

    /// first concrete element matching `selector`
    pub fn element(&self, selector: &str) -> Result<Rc<MemoryElement>> {
        self.select_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::selector_not_found(selector))
    }

    /// replace the value of a text-like control and fire `input`
    pub fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.element(selector)?;
        element.set_value(text);
        element.dispatch_event("input");
        Ok(())
    }

    /// choose the option with `value` in a select and fire `change`
    pub fn select_value(&self, selector: &str, value: &str) -> Result<()> {
        let element = self.element(selector)?;
        element.set_value(value);
        element.dispatch_event("change");
        Ok(())
    }

    /// check or uncheck a checkbox/radio and fire `change`
    ///
    /// checking a radio unchecks the other radios sharing its name.
    pub fn set_checked(&self, selector: &str, checked: bool) -> Result<()> {
        let element = self.element(selector)?;
        if checked && element.input_type() == "radio" {
            if let Some(name) = element.get_attribute("name") {
                for other in self.all_elements() {
                    if !Rc::ptr_eq(&other, &element)
                        && other.kind() == ElementKind::Input
                        && other.input_type() == "radio"
                        && other.get_attribute("name").as_deref() == Some(name.as_str())
                    {
                        other.set_checked(false);
                    }
                }
            }
        }
        element.set_checked(checked);
        element.dispatch_event("change");
        Ok(())
    }

    /// set a control's value the way a user would for its kind
    ///
    /// selects pick an option, checkboxes/radios are checked when `value`
    /// is truthy, everything else receives typed text.
    pub fn interact(&self, selector: &str, value: &str) -> Result<()> {
        let element = self.element(selector)?;
        match element.kind() {
            ElementKind::Select => self.select_value(selector, value),
            ElementKind::Input if matches!(element.input_type().as_str(), "checkbox" | "radio") => {
                let checked = !matches!(value, "" | "false" | "0" | "off");
                self.set_checked(selector, checked)
            }
            _ => self.type_text(selector, value),
        }
    }

    /// form controls and animated elements with their current state
    pub fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.all_elements()
            .into_iter()
            .filter(|e| {
                e.kind() != ElementKind::Other || Element::has_class(&**e, "dcf__animated")
            })
            .map(|e| {
                let is_toggle = e.kind() == ElementKind::Input
                    && matches!(e.input_type().as_str(), "checkbox" | "radio");
                ElementSnapshot {
                    tag: e.tag_name(),
                    id: e.get_attribute("id"),
                    name: e.get_attribute("name"),
                    input_type: (e.kind() == ElementKind::Input).then(|| e.input_type()),
                    value: e.value(),
                    checked: is_toggle.then(|| e.is_checked()),
                    required: e.is_required(),
                    hidden: Element::has_class(&*e, "dcf__hidden"),
                    interacted: e.dataset("dcf-interacted"),
                }
            })
            .collect()
    }
}

impl Document for MemoryDocument {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef>> {
        Ok(self
            .select_all(selector)?
            .iter()
            .map(MemoryElement::handle)
            .collect())
    }

    fn get_element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.all_elements()
            .into_iter()
            .find(|e| e.get_attribute("id").as_deref() == Some(id))
            .map(|e| e.handle())
    }

    fn append_stylesheet(&self, id: &str, css: &str) {
        self.append(&self.head, &NodeSpec::new("style").id(id).text(css));
    }
}

impl Drop for MemoryDocument {
    fn drop(&mut self) {
        // listeners own their rules, which own element handles
        self.root.clear_listeners();
    }
}
