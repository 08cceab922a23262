//! css selectors over the in-memory document
//!
//! parsing and matching are done by the `selectors` crate on top of
//! `cssparser`. this module supplies the glue: string types for the selector
//! implementation, a parser that knows the form pseudo-classes and a
//! `selectors::Element` view of [`MemoryElement`].
//!
//! everything the grammar allows works, including attribute operators
//! (`[name^=topic]`), sibling combinators (`+`, `~`) and structural
//! pseudo-classes. of the non-structural pseudo-classes only the form states
//! are known: `:checked`, `:disabled`, `:enabled`, `:required` and `:optional`.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

use cssparser::{
    BasicParseErrorKind, CowRcStr, ParseError, ParseErrorKind, Parser as CssParser, ParserInput,
    SourceLocation, ToCss,
};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    matches_selector, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext,
    MatchingMode, NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{NthIndexCache, OpaqueElement};

use super::memory::MemoryElement;
use super::{Element, ElementKind};
use crate::error::{Error, Result};

/// a parsed, comma separated selector list
#[derive(Debug, Clone)]
pub struct Selectors(SelectorList<FormSelectors>);

impl Selectors {
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser_input = ParserInput::new(input);
        let mut parser = CssParser::new(&mut parser_input);
        SelectorList::parse(&FormSelectorParser, &mut parser, ParseRelative::No)
            .map(Selectors)
            .map_err(|e| Error::invalid_selector(input, describe(&e)))
    }

    /// whether any selector of the list matches `element`
    pub fn matches(&self, element: &Rc<MemoryElement>) -> bool {
        let node = FormNode(element.clone());
        let mut nth_index_cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );

        let SelectorList(selectors) = &self.0;
        selectors
            .iter()
            .any(|selector| matches_selector(selector, 0, None, &node, &mut context))
    }
}

/// check that a selector parses, without matching anything
pub fn validate(input: &str) -> Result<()> {
    Selectors::parse(input).map(|_| ())
}

fn describe(err: &ParseError<'_, SelectorParseErrorKind<'_>>) -> String {
    let reason = match &err.kind {
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of input".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {:?}", token)
        }
        ParseErrorKind::Basic(other) => format!("{:?}", other),
        ParseErrorKind::Custom(SelectorParseErrorKind::EmptySelector) => {
            "empty selector".to_string()
        }
        ParseErrorKind::Custom(SelectorParseErrorKind::DanglingCombinator) => {
            "combinator without a selector after it".to_string()
        }
        ParseErrorKind::Custom(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)) => {
            format!("unsupported pseudo-class ':{}'", &**name)
        }
        ParseErrorKind::Custom(other) => format!("{:?}", other),
    };
    format!("{} at column {}", reason, err.location.column)
}

// ============================================================================
// Selector implementation
// ============================================================================

/// identifiers, local names and attribute values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CssString(pub String);

impl<'a> From<&'a str> for CssString {
    fn from(s: &'a str) -> Self {
        CssString(s.to_string())
    }
}

impl Borrow<str> for CssString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl PrecomputedHash for CssString {
    /// FNV-1a; only feeds ancestor bloom filters, which matching never uses
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0x811c_9dc5, |hash, b| (hash ^ u32::from(b)).wrapping_mul(0x0100_0193))
    }
}

/// documents here have no namespaces
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NoNamespace;

impl PrecomputedHash for NoNamespace {
    fn precomputed_hash(&self) -> u32 {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormSelectors;

impl selectors::SelectorImpl for FormSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssString;
    type LocalName = CssString;
    type NamespacePrefix = CssString;
    type NamespaceUrl = NoNamespace;
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = NoNamespace;
    type NonTSPseudoClass = FormState;
    type PseudoElement = NoPseudoElement;
}

/// form-state pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
}

impl FormState {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "checked" => Some(Self::Checked),
            "disabled" => Some(Self::Disabled),
            "enabled" => Some(Self::Enabled),
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Checked => "checked",
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::Required => "required",
            Self::Optional => "optional",
        }
    }
}

impl selectors::parser::NonTSPseudoClass for FormState {
    type Impl = FormSelectors;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for FormState {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char(':')?;
        dest.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NoPseudoElement {}

impl selectors::parser::PseudoElement for NoPseudoElement {
    type Impl = FormSelectors;
}

impl ToCss for NoPseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

struct FormSelectorParser;

impl<'i> selectors::parser::Parser<'i> for FormSelectorParser {
    type Impl = FormSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> std::result::Result<FormState, ParseError<'i, SelectorParseErrorKind<'i>>> {
        FormState::from_name(&name).ok_or_else(|| {
            location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(
                name,
            ))
        })
    }
}

// ============================================================================
// Element view
// ============================================================================

/// a [`MemoryElement`] as the matcher sees it
#[derive(Debug, Clone)]
struct FormNode(Rc<MemoryElement>);

impl FormNode {
    fn siblings(&self) -> Vec<Rc<MemoryElement>> {
        self.0
            .parent()
            .map(|parent| parent.child_elements())
            .unwrap_or_default()
    }

    fn position(&self, siblings: &[Rc<MemoryElement>]) -> Option<usize> {
        siblings.iter().position(|s| Rc::ptr_eq(s, &self.0))
    }

    fn is_form_control(&self) -> bool {
        ElementKind::from_tag(&self.0.tag_name()) != ElementKind::Other
    }

    fn is_disabled(&self) -> bool {
        self.0.get_attribute("disabled").is_some()
    }
}

fn equals(a: &str, b: &str, case_sensitivity: CaseSensitivity) -> bool {
    match case_sensitivity {
        CaseSensitivity::CaseSensitive => a == b,
        CaseSensitivity::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
    }
}

impl selectors::Element for FormNode {
    type Impl = FormSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(&*self.0)
    }

    fn parent_element(&self) -> Option<Self> {
        self.0.parent().map(FormNode)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = self.position(&siblings)?;
        index
            .checked_sub(1)
            .and_then(|i| siblings.get(i).cloned())
            .map(FormNode)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = self.position(&siblings)?;
        siblings.get(index + 1).cloned().map(FormNode)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.child_elements().into_iter().next().map(FormNode)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name() == local_name
    }

    fn has_namespace(&self, _ns: &NoNamespace) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.0.tag_name() == other.0.tag_name()
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&NoNamespace>,
        local_name: &CssString,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        self.0
            .get_attribute(&local_name.0)
            .is_some_and(|value| operation.eval_str(&value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &FormState,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match pc {
            FormState::Checked => {
                matches!(self.0.input_type().as_str(), "checkbox" | "radio") && self.0.is_checked()
            }
            FormState::Disabled => self.is_form_control() && self.is_disabled(),
            FormState::Enabled => self.is_form_control() && !self.is_disabled(),
            FormState::Required => self.is_form_control() && self.0.is_required(),
            FormState::Optional => self.is_form_control() && !self.0.is_required(),
        }
    }

    fn match_pseudo_element(
        &self,
        pe: &NoPseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        self.0.tag_name() == "a" && self.0.get_attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.0
            .get_attribute("id")
            .is_some_and(|own| equals(&own, &id.0, case_sensitivity))
    }

    fn has_class(&self, name: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.0.get_attribute("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| equals(class, &name.0, case_sensitivity))
        })
    }

    fn imported_part(&self, _name: &CssString) -> Option<CssString> {
        None
    }

    fn is_part(&self, _name: &CssString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.0.child_elements().is_empty() && self.0.text_content().is_empty()
    }

    fn is_root(&self) -> bool {
        self.0.parent().is_none()
    }
}
