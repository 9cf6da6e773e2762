//! Integration tests for matching parsed selectors against node metadata.

use pagecss::parser::parse_selectors;
use pagecss::{NodeMeta, NodeStates};

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_selector_list_matches_any_member() {
    let list = parse_selectors(".card, .alert").unwrap();
    let alert = owned(&["alert", "alert-success"]);
    let node = NodeMeta {
        classes: &alert,
        ..NodeMeta::element("div")
    };
    assert!(list.matches(&node, &[]));
    assert!(!list.matches(&NodeMeta::element("div"), &[]));
}

#[test]
fn test_attribute_value_must_be_equal() {
    let list = parse_selectors("input[type=submit]").unwrap();
    let submit = attrs(&[("type", "submit")]);
    let text = attrs(&[("type", "text")]);

    let a = NodeMeta {
        attributes: &submit,
        ..NodeMeta::element("input")
    };
    let b = NodeMeta {
        attributes: &text,
        ..NodeMeta::element("input")
    };
    assert!(list.matches(&a, &[]));
    assert!(!list.matches(&b, &[]));
}

#[test]
fn test_attribute_presence_ignores_value() {
    let list = parse_selectors("[title]").unwrap();
    let empty = attrs(&[("title", "")]);
    let node = NodeMeta {
        attributes: &empty,
        ..NodeMeta::element("span")
    };
    assert!(list.matches(&node, &[]));
}

#[test]
fn test_type_match_is_case_insensitive() {
    let list = parse_selectors("label").unwrap();
    assert!(list.matches(&NodeMeta::element("LABEL"), &[]));
}

#[test]
fn test_id_selector() {
    let list = parse_selectors("#main-nav").unwrap();
    let node = NodeMeta {
        id: Some("main-nav"),
        ..NodeMeta::element("nav")
    };
    assert!(list.matches(&node, &[]));
}

#[test]
fn test_descendant_through_intermediate_nodes() {
    let list = parse_selectors(".stats-section .col").unwrap();
    let col = owned(&["col"]);
    let section = owned(&["stats-section"]);
    let node = NodeMeta {
        classes: &col,
        ..NodeMeta::element("div")
    };
    let row = NodeMeta::element("div");
    let section = NodeMeta {
        classes: &section,
        ..NodeMeta::element("section")
    };

    assert!(list.matches(&node, &[row, section, NodeMeta::element("body")]));
    assert!(!list.matches(&node, &[row, NodeMeta::element("body")]));
}

#[test]
fn test_disabled_state() {
    let list = parse_selectors("button:disabled").unwrap();
    let node = NodeMeta {
        states: NodeStates::DISABLED,
        ..NodeMeta::element("button")
    };
    assert!(list.matches(&node, &[]));
}
