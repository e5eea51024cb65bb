//! Contract tests for navigation resolution.
//!
//! These tests verify the navigation contracts:
//! - Schema attributes are offered in declaration order
//! - Bindings follow attributes and are marked as query-bound
//! - `seq` contexts offer a count entry

use rex_query::domain::AggregateFunction;
use rex_query::infer::infer_type;
use rex_query::navigation::{get_navigation, COUNT_NAVIGATION};
use rex_query::query::{Query, QueryOp};
use rex_query::Context;
use rex_query::types::{opt_type, seq_type, Card, Type};

use super::create_test_domain;

fn navigation_keys(query: &Query) -> Vec<String> {
    let typed = infer_type(&create_test_domain(), query);
    get_navigation(typed.context().unwrap()).into_keys().collect()
}

#[test]
fn test_root_offers_every_entity() {
    let keys = navigation_keys(&Query::here());
    assert_eq!(keys, ["study", "site", "individual", "customer"]);

    let typed = infer_type(&create_test_domain(), &Query::here());
    let nav = get_navigation(typed.context().unwrap());
    assert_eq!(nav["customer"].label, "Customer");
    assert_eq!(nav["customer"].ty, seq_type(Type::entity("customer")));
    assert!(!nav["customer"].from_query);
}

#[test]
fn test_entity_attributes_in_declaration_order() {
    let keys = navigation_keys(&Query::navigate("study"));
    assert_eq!(
        keys,
        [
            "code",
            "title",
            "status",
            "start_date",
            "enrolled",
            "name",
            "site",
            "lead",
            COUNT_NAVIGATION
        ]
    );
}

#[test]
fn test_navigation_types_follow_context_card() {
    // Row of a study: attribute cards are the declared ones
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::select([("row", Query::here())]),
    ]);
    let typed = infer_type(&create_test_domain(), &query);
    let nav = get_navigation(select_row(&typed));
    assert_eq!(nav["title"].ty, opt_type(Type::text()));
    assert_eq!(nav["lead"].ty, opt_type(Type::entity("individual")));
    assert_eq!(nav["site"].ty, seq_type(Type::entity("site")));
    assert!(!nav.contains_key(COUNT_NAVIGATION));

    // From the seq of studies every attribute is seq
    let typed = infer_type(&create_test_domain(), &Query::navigate("study"));
    let nav = get_navigation(typed.context().unwrap());
    assert!(nav.values().all(|n| n.ty.card == Card::Seq || n.value == COUNT_NAVIGATION));
    assert_eq!(nav[COUNT_NAVIGATION].ty, Type::number());
}

/// Returns the context of the `row` field of the select ending `typed`.
fn select_row(typed: &Query) -> &Context {
    let QueryOp::Pipeline { pipeline } = &typed.op else {
        panic!("expected pipeline");
    };
    let QueryOp::Select { select, .. } = &pipeline[1].op else {
        panic!("expected select");
    };
    select["row"].context().unwrap()
}

#[test]
fn test_bindings_marked_from_query() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define(
            "site_count",
            Query::pipeline([
                Query::navigate("site"),
                Query::aggregate(AggregateFunction::Count, None),
            ]),
        ),
    ]);
    let typed = infer_type(&create_test_domain(), &query);
    let nav = get_navigation(typed.context().unwrap());

    let keys: Vec<&str> = nav.keys().map(String::as_str).collect();
    assert_eq!(keys[keys.len() - 2..], ["site_count", COUNT_NAVIGATION]);
    let binding = &nav["site_count"];
    assert!(binding.from_query);
    assert_eq!(binding.value, "site_count");
    assert_eq!(binding.ty, seq_type(Type::number()));
}

#[test]
fn test_binding_shadows_attribute_entry() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("name", Query::navigate("enrolled")),
    ]);
    let typed = infer_type(&create_test_domain(), &query);
    let nav = get_navigation(typed.context().unwrap());

    assert_eq!(nav.keys().filter(|k| *k == "name").count(), 1);
    assert!(nav["name"].from_query);
    assert_eq!(nav["name"].ty, seq_type(Type::number()));
    // shadowed entry moves after the schema attributes
    let position = nav.get_index_of("name").unwrap();
    assert!(position > nav.get_index_of("lead").unwrap());
}

#[test]
fn test_navigate_resets_bindings() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("x", Query::navigate("code")),
        Query::navigate("site"),
    ]);
    let keys = navigation_keys(&query);
    assert!(!keys.iter().any(|k| k == "x"));
    assert_eq!(keys, ["name", "size", "study", COUNT_NAVIGATION]);
}

#[test]
fn test_scalar_context_has_no_navigation() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::aggregate(AggregateFunction::Count, None),
    ]);
    assert!(navigation_keys(&query).is_empty());
}

#[test]
fn test_navigation_is_pure() {
    let typed = infer_type(&create_test_domain(), &Query::navigate("individual"));
    let ctx = typed.context().unwrap();
    assert_eq!(get_navigation(ctx), get_navigation(ctx));
}
