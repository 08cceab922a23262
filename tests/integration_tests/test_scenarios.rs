// end-to-end rule behaviour against the in-memory document

use conditional_fields::dom::memory::{MemoryDocument, NodeSpec};
use conditional_fields::dom::{Document, Element};
use conditional_fields::styles::{HIDDEN_CLASS, INTERACTED_KEY, STYLESHEET_ID};
use conditional_fields::{
    setup_conditional_fields, AffectedConfig, AffectedFieldConfig, Error, ParentSelector,
    RuleConfig, TriggerConfig,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hidden(doc: &MemoryDocument, selector: &str) -> bool {
    doc.element(selector).unwrap().has_class(HIDDEN_CLASS)
}

// ============================================================================
// select trigger
// ============================================================================

#[test]
fn test_select_trigger_shows_requires_and_clears() {
    init_logging();
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::select("choice", &["A", "B"]),
        NodeSpec::new("input").id("details").attr("type", "text"),
    ]));
    let rule = RuleConfig::new(
        TriggerConfig::new("#choice", "A"),
        AffectedConfig::fields([AffectedFieldConfig::new("#details").required(true)]),
    );
    let setup = setup_conditional_fields(&doc, &[rule]).unwrap();
    assert_eq!(setup.installed(), 1);

    // the first option is selected by default
    assert!(!hidden(&doc, "#details"));
    assert!(doc.element("#details").unwrap().is_required());
    assert_eq!(
        doc.element("#details").unwrap().dataset(INTERACTED_KEY).as_deref(),
        Some("false")
    );

    doc.type_text("#details", "some text").unwrap();
    doc.select_value("#choice", "B").unwrap();
    let details = doc.element("#details").unwrap();
    assert!(details.has_class(HIDDEN_CLASS));
    assert!(!details.is_required());
    assert_eq!(details.value(), "");
    assert_eq!(details.dataset(INTERACTED_KEY).as_deref(), Some("true"));

    doc.select_value("#choice", "A").unwrap();
    assert!(!hidden(&doc, "#details"));
    assert!(doc.element("#details").unwrap().is_required());
}

// ============================================================================
// checkbox group trigger
// ============================================================================

fn newsletter_form() -> MemoryDocument {
    MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::input("checkbox", "topics", "news"),
        NodeSpec::input("checkbox", "topics", "offers"),
        NodeSpec::new("fieldset").id("frequency-block").children([
            NodeSpec::input("radio", "frequency", "daily").id("daily"),
            NodeSpec::input("radio", "frequency", "weekly").id("weekly"),
        ]),
    ]))
}

#[test]
fn test_checkbox_group_empty_shows_when_hide_on_empty_disabled() {
    init_logging();
    let doc = newsletter_form();
    let rule = RuleConfig::new(
        TriggerConfig::new("[name=topics]", "news"),
        AffectedConfig::fields([AffectedFieldConfig::new("[name=frequency]")])
            .block("#frequency-block"),
    )
    .hide_on_empty(false);
    setup_conditional_fields(&doc, &[rule]).unwrap();

    // nothing checked: empty means shown
    assert!(!hidden(&doc, "#frequency-block"));

    doc.set_checked("[name=topics][value=offers]", true).unwrap();
    assert!(hidden(&doc, "#frequency-block"));

    doc.set_checked("[name=topics][value=news]", true).unwrap();
    assert!(!hidden(&doc, "#frequency-block"));

    doc.set_checked("[name=topics][value=news]", false).unwrap();
    doc.set_checked("[name=topics][value=offers]", false).unwrap();
    assert!(!hidden(&doc, "#frequency-block"));
}

#[test]
fn test_checkbox_group_hidden_block_clears_radios() {
    init_logging();
    let doc = newsletter_form();
    let rule = RuleConfig::new(
        TriggerConfig::new("[name=topics]", "news"),
        AffectedConfig::fields([AffectedFieldConfig::new("[name=frequency]")])
            .block("#frequency-block"),
    );
    setup_conditional_fields(&doc, &[rule]).unwrap();
    assert!(hidden(&doc, "#frequency-block"));

    doc.set_checked("[name=topics][value=news]", true).unwrap();
    doc.set_checked("#weekly", true).unwrap();
    assert!(doc.element("#weekly").unwrap().is_checked());

    doc.set_checked("[name=topics][value=news]", false).unwrap();
    assert!(hidden(&doc, "#frequency-block"));
    assert!(!doc.element("#weekly").unwrap().is_checked());
    assert!(!doc.element("#daily").unwrap().is_checked());
}

#[test]
fn test_prefix_attribute_selector_trigger() {
    init_logging();
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::input("checkbox", "topic", "a").attr("checked", ""),
        NodeSpec::new("input").id("details"),
    ]));
    let rule = RuleConfig::new(
        TriggerConfig::new("input[name^=top]", "a"),
        AffectedConfig::fields([AffectedFieldConfig::new("#details")]),
    );
    let setup = setup_conditional_fields(&doc, &[rule]).unwrap();
    assert_eq!(setup.installed(), 1);
    assert!(!hidden(&doc, "#details"));

    doc.set_checked("input:checked", false).unwrap();
    assert!(hidden(&doc, "#details"));
}

// ============================================================================
// setup
// ============================================================================

#[test]
fn test_bad_rule_does_not_block_good_rule() {
    init_logging();
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::select("choice", &["", "A"]),
        NodeSpec::new("input").id("details"),
    ]));
    let bad = RuleConfig::new(
        TriggerConfig::new("#missing", "A"),
        AffectedConfig::fields([AffectedFieldConfig::new("#details")]),
    );
    let good = RuleConfig::new(
        TriggerConfig::new("#choice", "A"),
        AffectedConfig::fields([AffectedFieldConfig::new("#details")]),
    );

    let setup = setup_conditional_fields(&doc, &[bad, good]).unwrap();
    assert_eq!(setup.installed(), 1);
    assert!(matches!(setup.failures(), [Error::RuleFailed { index: 0, .. }]));

    assert!(hidden(&doc, "#details"));
    doc.select_value("#choice", "A").unwrap();
    assert!(!hidden(&doc, "#details"));
}

#[test]
fn test_empty_configuration_is_an_error() {
    let doc = MemoryDocument::new();
    assert!(matches!(
        setup_conditional_fields(&doc, &[]),
        Err(Error::ConfigurationMissing)
    ));
}

#[test]
fn test_stylesheet_installed_once() {
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::select("choice", &["A", "B"]),
        NodeSpec::new("input").id("one"),
        NodeSpec::new("input").id("two"),
    ]));
    let rules = [
        RuleConfig::new(
            TriggerConfig::new("#choice", "A"),
            AffectedConfig::fields([AffectedFieldConfig::new("#one")]),
        ),
        RuleConfig::new(
            TriggerConfig::new("#choice", "B"),
            AffectedConfig::fields([AffectedFieldConfig::new("#two")]),
        ),
    ];
    setup_conditional_fields(&doc, &rules).unwrap();
    setup_conditional_fields(&doc, &rules).unwrap();

    assert!(doc.get_element_by_id(STYLESHEET_ID).is_some());
    assert_eq!(doc.select_all("style").unwrap().len(), 1);
}

// ============================================================================
// cascading rules
// ============================================================================

#[test]
fn test_clearing_a_trigger_cascades() {
    init_logging();
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::select("has-vehicle", &["", "yes", "no"]),
        NodeSpec::select("vehicle", &["", "car", "bike"]),
        NodeSpec::new("input").id("plate").attr("value", "AB-123"),
    ]));
    let rules = [
        RuleConfig::new(
            TriggerConfig::new("#has-vehicle", "yes"),
            AffectedConfig::fields([AffectedFieldConfig::new("#vehicle")]),
        ),
        RuleConfig::new(
            TriggerConfig::new("#vehicle", "car"),
            AffectedConfig::fields([AffectedFieldConfig::new("#plate").required(true)]),
        )
        .initial_check(false),
    ];
    setup_conditional_fields(&doc, &rules).unwrap();

    doc.select_value("#has-vehicle", "yes").unwrap();
    doc.select_value("#vehicle", "car").unwrap();
    doc.type_text("#plate", "XY-987").unwrap();
    assert!(!hidden(&doc, "#plate"));
    assert!(doc.element("#plate").unwrap().is_required());

    // hiding #vehicle resets it, which re-runs the rule it triggers
    doc.select_value("#has-vehicle", "no").unwrap();
    assert!(hidden(&doc, "#vehicle"));
    assert_eq!(doc.element("#vehicle").unwrap().value(), "");
    assert!(hidden(&doc, "#plate"));
    assert!(!doc.element("#plate").unwrap().is_required());
    assert_eq!(doc.element("#plate").unwrap().value(), "");
}

// ============================================================================
// parent selectors and associated elements
// ============================================================================

#[test]
fn test_custom_parent_and_associated_elements() {
    let doc = MemoryDocument::from_spec(&NodeSpec::new("form").children([
        NodeSpec::new("input").id("age").attr("type", "number"),
        NodeSpec::new("div").id("row").children([
            NodeSpec::new("input").id("guardian"),
        ]),
        NodeSpec::new("small").id("guardian-hint").text("required for minors"),
    ]));
    // a custom resolver instead of a closest() selector string
    let parent = ParentSelector::new(|element| element.closest("#row"));
    let rule = RuleConfig::new(
        TriggerConfig::new("#age", 18).operator("lessThan"),
        AffectedConfig::fields([AffectedFieldConfig::new("#guardian")
            .associated("#guardian-hint")
            .parent(parent)]),
    );
    setup_conditional_fields(&doc, &[rule]).unwrap();

    assert!(hidden(&doc, "#row"));
    assert!(hidden(&doc, "#guardian-hint"));
    assert!(!hidden(&doc, "#guardian"));

    doc.type_text("#age", "15").unwrap();
    assert!(!hidden(&doc, "#row"));
    assert!(!hidden(&doc, "#guardian-hint"));

    doc.type_text("#age", "40").unwrap();
    assert!(hidden(&doc, "#row"));
}
