//! Tests for `$orderby` and `$select` lists and for the JSON shape of
//! parsed trees.

mod common;
use common::*;

use oxide_odata_core::ast::{Expr, OrderDirection};
use oxide_odata_core::resolve::FieldMapResolver;
use oxide_odata_core::{OpenDataParser, ParseError};
use serde_json::json;

// ===================================================================
// $orderby
// ===================================================================

#[tokio::test]
async fn order_by_directions() {
    let items = OpenDataParser::new()
        .parse_order_by("name, created desc, price asc")
        .await
        .unwrap();
    let directions: Vec<_> = items.iter().map(|item| item.direction).collect();
    assert_eq!(
        directions,
        vec![OrderDirection::Asc, OrderDirection::Desc, OrderDirection::Asc]
    );
    assert_eq!(items[1].expr, Expr::member("created"));
}

#[tokio::test]
async fn order_by_expressions() {
    let items = OpenDataParser::new()
        .parse_order_by("tolower(author/name) desc, price mul quantity")
        .await
        .unwrap();
    assert_eq!(
        items[0].expr,
        Expr::method("toLower", vec![Expr::member("author/name")])
    );
    assert_eq!(items[1].direction, OrderDirection::Asc);
}

#[tokio::test]
async fn order_by_empty() {
    assert!(OpenDataParser::new().parse_order_by("").await.unwrap().is_empty());
}

#[tokio::test]
async fn order_by_errors() {
    let parser = OpenDataParser::new();
    let err = parser.parse_order_by("name desc desc").await.unwrap_err();
    assert_eq!(err.as_syntax().map(|e| e.token_index), Some(2));

    let err = parser.parse_order_by("name,").await.unwrap_err();
    assert_eq!(err.as_syntax().map(|e| e.token_index), Some(2));
}

#[tokio::test]
async fn order_by_resolves_members() {
    let parser = OpenDataParser::new()
        .with_member_resolver(FieldMapResolver::new().alias("created", "created_at"));
    let items = parser.parse_order_by("created desc").await.unwrap();
    assert_eq!(items[0].expr, Expr::member("created_at"));

    let err = parser.parse_order_by("secret").await.unwrap_err();
    assert!(matches!(err, ParseError::Resolution(_)));
}

// ===================================================================
// $select
// ===================================================================

#[tokio::test]
async fn select_with_aliases() {
    let items = OpenDataParser::new()
        .parse_select("id, author/name as writer, toupper(title) as shout")
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].alias, None);
    assert_eq!(items[1].expr, Expr::member("author/name"));
    assert_eq!(items[1].alias.as_deref(), Some("writer"));
    assert_eq!(
        items[2].expr,
        Expr::method("toUpper", vec![Expr::member("title")])
    );
}

#[tokio::test]
async fn select_alias_must_be_plain_identifier() {
    let parser = OpenDataParser::new();
    for text in ["name as", "name as 'x'", "name as a/b", "name as eq"] {
        let err = parser.parse_select(text).await.unwrap_err();
        assert!(err.as_syntax().is_some(), "{text} gave {err:?}");
    }
}

// ===================================================================
// JSON shape
// ===================================================================

#[tokio::test]
async fn filter_serializes_to_json() {
    let expr = parse("name eq 'x'").await;
    assert_eq!(
        serde_json::to_value(&expr).unwrap(),
        json!({
            "binary": {
                "left": { "member": { "path": ["name"] } },
                "op": "$eq",
                "right": { "literal": { "string": "x" } }
            }
        })
    );
}

#[tokio::test]
async fn operators_serialize_with_canonical_names() {
    let expr = parse("not (a ge 1) or b in (1, null)").await;
    assert_eq!(
        serde_json::to_value(&expr).unwrap(),
        json!({
            "binary": {
                "left": {
                    "unary": {
                        "op": "$not",
                        "operand": {
                            "binary": {
                                "left": { "member": { "path": ["a"] } },
                                "op": "$gte",
                                "right": { "literal": { "int": 1 } }
                            }
                        }
                    }
                },
                "op": "$or",
                "right": {
                    "binary": {
                        "left": { "member": { "path": ["b"] } },
                        "op": "$in",
                        "right": { "collection": [
                            { "literal": { "int": 1 } },
                            { "literal": "null" }
                        ] }
                    }
                }
            }
        })
    );
}

#[tokio::test]
async fn method_calls_serialize_with_arguments() {
    let expr = parse("startswith(author/name, 'A')").await;
    assert_eq!(
        serde_json::to_value(&expr).unwrap(),
        json!({
            "methodCall": {
                "name": "startswith",
                "args": [
                    { "member": { "path": ["author", "name"] } },
                    { "literal": { "string": "A" } }
                ]
            }
        })
    );
}

#[tokio::test]
async fn query_items_serialize() {
    let parser = OpenDataParser::new();
    let order = parser.parse_order_by("name desc").await.unwrap();
    assert_eq!(
        serde_json::to_value(&order).unwrap(),
        json!([{ "expr": { "member": { "path": ["name"] } }, "direction": "desc" }])
    );

    let select = parser.parse_select("name as n").await.unwrap();
    assert_eq!(
        serde_json::to_value(&select).unwrap(),
        json!([{ "expr": { "member": { "path": ["name"] } }, "alias": "n" }])
    );
}
