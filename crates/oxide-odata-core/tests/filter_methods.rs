//! Tests for method calls: the default string, math and date strategies,
//! argument handling and custom registries.

mod common;
use common::*;

use oxide_odata_core::ast::{Expr, MethodCall, Operator};
use oxide_odata_core::resolve::{MethodSpec, MethodTable, StrategyRegistry};
use oxide_odata_core::{OpenDataParser, ParseError, ResolutionError};

fn call(expr: Expr) -> MethodCall {
    match expr {
        Expr::MethodCall(call) => call,
        other => panic!("Expected method call, got {other:?}"),
    }
}

// ===================================================================
// String methods
// ===================================================================

#[tokio::test]
async fn string_methods_map_to_canonical_names() {
    for (source, canonical) in [
        ("startsWith(name,'A')", "startswith"),
        ("endsWith(name,'z')", "endswith"),
        ("toLowerCase(name)", "toLower"),
        ("tolower(name)", "toLower"),
        ("toLocaleUpperCase(name)", "toUpper"),
        ("indexOf(name,'x')", "indexOfBytes"),
        ("substring(name,1)", "substr"),
        ("substr(name,1,2)", "substr"),
        ("trim(name)", "trim"),
        ("includes(name,'x')", "contains"),
        ("length(name)", "length"),
    ] {
        assert_eq!(call(parse(source).await).name, canonical, "method {source}");
    }
}

#[tokio::test]
async fn method_names_ignore_case() {
    assert_eq!(call(parse("STARTSWITH(name,'A')").await).name, "startswith");
}

#[tokio::test]
async fn qualified_method_names() {
    assert_eq!(call(parse("Math.round(price)").await).name, "round");
    assert_eq!(call(parse("String.trim(name)").await).name, "trim");
}

#[tokio::test]
async fn substringof_swaps_arguments() {
    assert_eq!(
        parse("substringof('x', name)").await,
        Expr::method("contains", vec![Expr::member("name"), Expr::string("x")])
    );
}

#[tokio::test]
async fn concat_is_variadic() {
    let concat = call(parse("concat(a, b, c, 'd')").await);
    assert_eq!(concat.name, "concat");
    assert_eq!(concat.args.len(), 4);
}

// ===================================================================
// Math and date methods
// ===================================================================

#[tokio::test]
async fn math_methods() {
    assert_eq!(
        parse("round(price) eq 3").await,
        Expr::binary(
            Expr::method("round", vec![Expr::member("price")]),
            Operator::Eq,
            Expr::int(3)
        )
    );
    assert_eq!(call(parse("ceiling(price)").await).name, "ceil");
    assert_eq!(call(parse("floor(price)").await).name, "floor");
    assert_eq!(call(parse("bitAnd(flags, 4)").await).name, "bitAnd");
}

#[tokio::test]
async fn date_methods() {
    assert_eq!(call(parse("getFullYear(created)").await).name, "year");
    assert_eq!(call(parse("year(created)").await).name, "year");
    assert_eq!(call(parse("getHours(created)").await).name, "hour");
    let now = call(parse("now()").await);
    assert_eq!(now.name, "now");
    assert!(now.args.is_empty());
}

#[tokio::test]
async fn operator_named_methods() {
    assert_eq!(
        parse("add(price, tax) gt 10").await,
        Expr::binary(
            Expr::method("add", vec![Expr::member("price"), Expr::member("tax")]),
            Operator::Gt,
            Expr::int(10)
        )
    );
}

#[tokio::test]
async fn rendered_calls_parse_back() {
    for text in [
        "startsWith(name,'A')",
        "endsWith(name,'z')",
        "toLowerCase(name) eq 'x'",
        "toUpperCase(name) eq 'X'",
        "indexOf(name,'x') eq 2",
        "substring(name,1,2) eq 'b'",
        "trim(name) eq 'x'",
        "concat(a,b,c) eq 'abc'",
        "includes(name,'x')",
        "substringof('x',name)",
        "length(name) gt 3",
        "round(price,2) eq 1",
        "ceiling(price) eq 1",
        "floor(price) eq 1",
        "add(price,tax) gt 10",
        "subtract(price,tax) gt 10",
        "multiply(price,2) gt 10",
        "divide(price,2) gt 10",
        "bitAnd(flags,4) eq 4",
        "getFullYear(created) eq 2024",
        "getMonth(created) eq 5",
        "getDate(created) eq 1",
        "getHours(created) eq 1",
        "getMinutes(created) eq 1",
        "getSeconds(created) eq 1",
        "date(created) eq 2024-05-01",
        "time(created) eq time'10:00:00'",
        "now() gt created",
    ] {
        round_trip(text).await;
    }
}

// ===================================================================
// Arguments
// ===================================================================

#[tokio::test]
async fn arguments_are_full_expressions() {
    assert_eq!(
        parse("round(price mul 1.2) gt 10").await,
        Expr::binary(
            Expr::method(
                "round",
                vec![Expr::binary(
                    Expr::member("price"),
                    Operator::Mul,
                    Expr::literal(oxide_odata_core::Literal::Double(1.2))
                )]
            ),
            Operator::Gt,
            Expr::int(10)
        )
    );
}

#[tokio::test]
async fn nested_method_calls() {
    assert_eq!(
        parse("startswith(tolower(name), 'a')").await,
        Expr::method(
            "startswith",
            vec![
                Expr::method("toLower", vec![Expr::member("name")]),
                Expr::string("a")
            ]
        )
    );
}

#[tokio::test]
async fn wrong_argument_count() {
    let err = parse_err("startswith(name)").await;
    assert_eq!(
        err,
        ParseError::Resolution(ResolutionError::arity("startswith", "2", 1))
    );

    let err = parse_err("round()").await;
    assert!(matches!(err, ParseError::Resolution(e) if e.target == "round"));
}

// ===================================================================
// Unknown methods
// ===================================================================

#[tokio::test]
async fn unknown_method_lists_strategies() {
    let ParseError::UnknownMethod(err) = parse_err("frobnicate(name)").await else {
        panic!("expected an unknown-method error");
    };
    assert_eq!(err.method, "frobnicate");
    assert_eq!(err.strategies, vec!["string", "math", "date"]);
    assert!(err.to_string().contains("frobnicate"));
}

// ===================================================================
// Custom registries
// ===================================================================

#[tokio::test]
async fn custom_strategy_extends_defaults() {
    let mut registry = StrategyRegistry::with_defaults();
    registry.register(MethodTable::new("geo").method("distance", MethodSpec::exact("geoDistance", 2)));
    let parser = OpenDataParser::new().with_method_resolver(registry);

    let expr = parse_with(&parser, "distance(location, home) lt 10 and startsWith(name,'A')").await;
    let Expr::Binary { left, right, .. } = expr else {
        panic!("expected a binary expression");
    };
    let Expr::Binary { left: distance, .. } = *left else {
        panic!("expected a comparison");
    };
    assert_eq!(call(*distance).name, "geoDistance");
    assert_eq!(call(*right).name, "startswith");
}

#[tokio::test]
async fn earlier_strategy_wins() {
    let mut registry = StrategyRegistry::new();
    registry.register(MethodTable::new("legacy").method("trim", MethodSpec::exact("strip", 1)));
    registry.register(MethodTable::string());
    let parser = OpenDataParser::new().with_method_resolver(registry);

    assert_eq!(call(parse_with(&parser, "trim(name)").await).name, "strip");
    assert_eq!(
        call(parse_with(&parser, "toupper(name)").await).name,
        "toUpper"
    );
}

#[tokio::test]
async fn removed_strategy_is_not_consulted() {
    let mut registry = StrategyRegistry::with_defaults();
    assert!(registry.remove("date").is_some());
    let parser = OpenDataParser::new().with_method_resolver(registry);

    let err = parser.parse("year(created) eq 2024").await.unwrap_err();
    let ParseError::UnknownMethod(err) = err else {
        panic!("expected an unknown-method error");
    };
    assert_eq!(err.strategies, vec!["string", "math"]);
}

#[tokio::test]
async fn empty_registry_rejects_every_method() {
    let parser = OpenDataParser::new().with_method_resolver(StrategyRegistry::new());
    let err = parser.parse("trim(name)").await.unwrap_err();
    assert!(matches!(err, ParseError::UnknownMethod(e) if e.strategies.is_empty()));
}
