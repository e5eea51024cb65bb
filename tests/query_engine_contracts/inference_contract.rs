//! Contract tests for type inference.
//!
//! These tests verify the inference contracts:
//! - Unknown names produce `invalid` types instead of errors
//! - Cardinality composes along navigation
//! - Bindings shadow schema attributes
//! - Inference is deterministic

use rex_query::domain::AggregateFunction;
use rex_query::infer::{infer_type, TypeChecker};
use rex_query::query::{Expr, Query, QueryOp, SortDirection};
use rex_query::types::{seq_type, Card, Type, TypeKind};

use super::create_test_domain;

fn result_type(query: &Query) -> Type {
    let typed = infer_type(&create_test_domain(), query);
    typed.ty().cloned().expect("typed query has a context")
}

#[test]
fn test_unknown_root_navigation_is_invalid() {
    // Contract: navigating to a name the domain does not define yields invalid
    let typed = infer_type(&create_test_domain(), &Query::navigate("nonexistent"));
    let ctx = typed.context().unwrap();

    assert_eq!(ctx.ty.kind.name(), "invalid");
    assert!(ctx.has_invalid_type);
    assert_eq!(ctx.title.as_deref(), Some("nonexistent"));
}

#[test]
fn test_invalid_propagates_downstream() {
    // Contract: steps after an invalid step are invalid too
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::navigate("missing"),
        Query::navigate("code"),
        Query::select([("x", Query::navigate("code"))]),
    ]);
    let typed = infer_type(&create_test_domain(), &query);

    let QueryOp::Pipeline { pipeline } = &typed.op else {
        panic!("expected pipeline");
    };
    assert!(!pipeline[0].context().unwrap().has_invalid_type);
    for step in &pipeline[1..] {
        let ctx = step.context().unwrap();
        assert!(ctx.is_invalid(), "step {} should be invalid", step.op.name());
        assert!(ctx.has_invalid_type);
    }
}

#[test]
fn test_navigation_card_composition() {
    assert_eq!(
        result_type(&Query::navigate("study")),
        seq_type(Type::entity("study"))
    );

    let lead = Query::pipeline([Query::navigate("study"), Query::navigate("lead")]);
    assert_eq!(result_type(&lead).card, Card::Seq);

    // opt attribute of a plain row stays opt
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::select([("lead", Query::navigate("lead"))]),
    ]);
    let ty = result_type(&query);
    let TypeKind::Record { attributes, .. } = &ty.kind else {
        panic!("expected record");
    };
    assert_eq!(attributes["lead"].ty.card, Card::Opt);
}

#[test]
fn test_count_over_seq_is_plain_number() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::aggregate(AggregateFunction::Count, None),
    ]);
    let ty = result_type(&query);
    assert_eq!(ty, Type::number());
    assert_eq!(ty.card, Card::One);
}

#[test]
fn test_count_over_plain_is_invalid() {
    // Contract: aggregating a non-seq value is a user error, not a panic
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::select([(
            "n",
            Query::pipeline([
                Query::navigate("code"),
                Query::aggregate(AggregateFunction::Count, None),
            ]),
        )]),
    ]);
    let typed = infer_type(&create_test_domain(), &query);
    assert!(typed.context().unwrap().has_invalid_type);
}

#[test]
fn test_aggregate_applicability() {
    let sum_sizes = Query::pipeline([
        Query::navigate("site"),
        Query::aggregate(AggregateFunction::Sum, Some("size")),
    ]);
    assert_eq!(result_type(&sum_sizes), Type::number());

    let sum_names = Query::pipeline([
        Query::navigate("site"),
        Query::aggregate(AggregateFunction::Sum, Some("name")),
    ]);
    assert!(result_type(&sum_names).is_invalid());

    let latest = Query::pipeline([
        Query::navigate("study"),
        Query::aggregate(AggregateFunction::Max, Some("start_date")),
    ]);
    assert_eq!(result_type(&latest), Type::date());

    let any = Query::pipeline([
        Query::navigate("study"),
        Query::aggregate(AggregateFunction::Exists, None),
    ]);
    assert_eq!(result_type(&any), Type::boolean());
}

#[test]
fn test_binding_shadows_attribute() {
    // Contract: after define("name", X), navigate("name") resolves to X
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define(
            "name",
            Query::pipeline([
                Query::navigate("site"),
                Query::aggregate(AggregateFunction::Count, None),
            ]),
        ),
        Query::select([("name", Query::navigate("name"))]),
    ]);
    let ty = result_type(&query);
    let TypeKind::Record { attributes, .. } = &ty.kind else {
        panic!("expected record");
    };
    assert_eq!(attributes["name"].ty, Type::number());
}

#[test]
fn test_navigate_to_binding_composes_card() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("label", Query::navigate("code")),
        Query::navigate("label"),
    ]);
    assert_eq!(result_type(&query), seq_type(Type::text()));
}

#[test]
fn test_define_passes_type_through() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("x", Query::navigate("code")),
    ]);
    assert_eq!(result_type(&query), seq_type(Type::entity("study")));
}

#[test]
fn test_invalid_binding_taints_define() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("x", Query::navigate("missing")),
    ]);
    let typed = infer_type(&create_test_domain(), &query);
    let ctx = typed.context().unwrap();
    assert!(!ctx.is_invalid());
    assert!(ctx.has_invalid_type);
}

#[test]
fn test_select_fields_are_independent() {
    // Contract: a field is checked against the select's input, not its siblings
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::select([
            ("site", Query::navigate("site")),
            ("code", Query::navigate("code")),
        ]),
    ]);
    let ty = result_type(&query);
    let TypeKind::Record { attributes, .. } = &ty.kind else {
        panic!("expected record");
    };
    assert_eq!(attributes["site"].ty, seq_type(Type::entity("site")));
    assert_eq!(attributes["code"].ty, Type::text());
    assert_eq!(attributes["code"].title, "Code");
    assert_eq!(ty.card, Card::Seq);
}

#[test]
fn test_select_sort_must_name_scalar_field() {
    let base = || {
        Query::select([
            ("code", Query::navigate("code")),
            ("site", Query::navigate("site")),
        ])
    };

    let query = Query::pipeline([
        Query::navigate("study"),
        base().with_sort("code", SortDirection::Desc),
    ]);
    assert!(!result_type(&query).is_invalid());

    let query = Query::pipeline([
        Query::navigate("study"),
        base().with_sort("site", SortDirection::Asc),
    ]);
    assert!(result_type(&query).is_invalid());

    let query = Query::pipeline([
        Query::navigate("study"),
        base().with_sort("missing", SortDirection::Asc),
    ]);
    assert!(result_type(&query).is_invalid());
}

#[test]
fn test_filter_predicates() {
    let filtered = |predicate: Expr| {
        result_type(&Query::pipeline([
            Query::navigate("study"),
            Query::filter(predicate),
        ]))
    };

    let ok = filtered(Expr::and(vec![
        Expr::greater(Expr::navigate("enrolled"), Expr::value(10i64)),
        Expr::equal(
            Expr::navigate("status"),
            Expr::value(vec!["active".to_string(), "completed".to_string()]),
        ),
        Expr::less(Expr::navigate("start_date"), Expr::value("2020-01-01")),
        Expr::exists(Expr::navigate("lead")),
    ]));
    assert_eq!(ok, seq_type(Type::entity("study")));

    // number compared with text
    assert!(filtered(Expr::equal(Expr::navigate("enrolled"), Expr::value("ten"))).is_invalid());
    // ordering on booleans
    assert!(filtered(Expr::less(Expr::value(true), Expr::value(false))).is_invalid());
    // list literal with an ordering operator
    assert!(filtered(Expr::less(
        Expr::navigate("code"),
        Expr::value(vec!["a".to_string()])
    ))
    .is_invalid());
    // not over a non-boolean
    assert!(filtered(Expr::not(Expr::navigate("code"))).is_invalid());
    // unknown attribute inside the predicate
    assert!(filtered(Expr::exists(Expr::navigate("missing"))).is_invalid());
}

#[test]
fn test_filter_with_subquery() {
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::filter(Expr::greater(
            Expr::query(Query::pipeline([
                Query::navigate("site"),
                Query::aggregate(AggregateFunction::Count, None),
            ])),
            Expr::value(2i64),
        )),
    ]);
    assert_eq!(result_type(&query), seq_type(Type::entity("study")));
}

#[test]
fn test_limit_requires_seq() {
    let ok = Query::pipeline([Query::navigate("study"), Query::limit(5)]);
    assert_eq!(result_type(&ok), seq_type(Type::entity("study")));

    let bad = Query::pipeline([
        Query::navigate("study"),
        Query::aggregate(AggregateFunction::Count, None),
        Query::limit(5),
    ]);
    assert!(result_type(&bad).is_invalid());
}

#[test]
fn test_group_then_aggregate() {
    let query = Query::pipeline([
        Query::navigate("individual"),
        Query::group(["sex"]),
        Query::select([
            ("sex", Query::navigate("sex")),
            (
                "total",
                Query::pipeline([
                    Query::navigate("individual"),
                    Query::aggregate(AggregateFunction::Count, None),
                ]),
            ),
        ]),
    ]);
    let ty = result_type(&query);
    assert!(ty.is_seq());
    let TypeKind::Record { attributes, .. } = &ty.kind else {
        panic!("expected record");
    };
    assert!(matches!(attributes["sex"].ty.kind, TypeKind::Enumeration { .. }));
    assert_eq!(attributes["total"].ty, Type::number());
}

#[test]
fn test_inference_is_idempotent() {
    // Contract: inferring the same raw query twice gives identical trees
    let domain = create_test_domain();
    let query = Query::pipeline([
        Query::navigate("study"),
        Query::define("n", Query::navigate("code")),
        Query::filter(Expr::contains(Expr::navigate("n"), Expr::value("A"))),
        Query::select([("n", Query::navigate("n")), ("site", Query::navigate("site"))]),
    ]);

    let first = infer_type(&domain, &query);
    let second = infer_type(&domain, &query);
    assert_eq!(first, second);
}

#[test]
fn test_check_in_continues_context() {
    let domain = create_test_domain();
    let checker = TypeChecker::new(domain);
    let study = checker.check(&Query::navigate("study"));

    let code = checker.check_in(study.context().unwrap(), &Query::navigate("code"));
    assert_eq!(code.ty(), Some(&seq_type(Type::text())));
}
