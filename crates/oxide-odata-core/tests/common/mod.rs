#![allow(dead_code)]

use oxide_odata_core::ast::Expr;
use oxide_odata_core::{OpenDataParser, ParseError, ParsedExpression};

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub async fn parse_with(parser: &OpenDataParser, text: &str) -> Expr {
    match parser.parse(text).await {
        Ok(ParsedExpression::Tree(expr)) => expr,
        Ok(ParsedExpression::Empty) => panic!("Expected a tree for: {text}"),
        Err(e) => panic!("Failed to parse: {text}\nError: {e:?}"),
    }
}

pub async fn parse(text: &str) -> Expr {
    parse_with(&OpenDataParser::new(), text).await
}

pub async fn parse_err(text: &str) -> ParseError {
    OpenDataParser::new()
        .parse(text)
        .await
        .expect_err(&format!("Expected parse error for: {text}"))
}

/// Verifies that rendering a tree and parsing the rendered text gives the
/// same tree back.
pub async fn round_trip(text: &str) {
    let tree = parse(text).await;
    let rendered = tree.to_string();
    let reparsed = parse(&rendered).await;
    assert_eq!(
        tree, reparsed,
        "Round-trip failed.\n  Input:    {text}\n  Rendered: {rendered}"
    );
}
