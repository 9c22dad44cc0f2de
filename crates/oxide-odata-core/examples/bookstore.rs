//! Bookstore - Query Translation Example
//!
//! This example demonstrates translating OData query options against a
//! small bookstore schema:
//! - Field aliases that rename public fields to storage columns
//! - A custom method strategy registered next to the defaults
//! - `$filter`, `$orderby` and `$select` trees rendered as JSON
//!
//! Run with: cargo run --example bookstore

use oxide_odata_core::resolve::{FieldMapResolver, MethodSpec, MethodTable, StrategyRegistry};
use oxide_odata_core::{OpenDataParser, ParseError};

// =============================================================================
// SCHEMA
// =============================================================================

fn bookstore_fields() -> FieldMapResolver {
    FieldMapResolver::new()
        .field("title")
        .field("price")
        .field("stock")
        .alias("published", "published_at")
        .alias("author/name", "author/full_name")
        .alias("author/country", "author/country_code")
}

fn bookstore_methods() -> StrategyRegistry {
    let mut registry = StrategyRegistry::with_defaults();
    registry.register(
        MethodTable::new("catalog")
            .method("isbn13", MethodSpec::exact("normalizeIsbn", 1))
            .method("discounted", MethodSpec::new("applyDiscount", 1, 2)),
    );
    registry
}

#[tokio::main]
async fn main() -> Result<(), ParseError> {
    let parser = OpenDataParser::new()
        .with_member_resolver(bookstore_fields())
        .with_method_resolver(bookstore_methods());

    // -------------------------------------------------------------------------
    // $filter
    // -------------------------------------------------------------------------
    let filters = [
        "price lt 20.00m and stock gt 0",
        "startswith(author/name, 'Le Guin') or author/country in ('GB', 'IE')",
        "discounted(price, 0.1) le 15 and published ge 2001-01-01",
        "not (tolower(title) eq 'dune')",
    ];
    for filter in filters {
        let tree = parser.parse(filter).await?;
        println!("$filter={filter}");
        if let Some(expr) = tree.into_option() {
            println!("  rendered: {expr}");
            println!("  json:     {}", serde_json::to_string(&expr).unwrap_or_default());
        }
        println!();
    }

    // -------------------------------------------------------------------------
    // $orderby and $select
    // -------------------------------------------------------------------------
    let order = parser.parse_order_by("published desc, title").await?;
    println!("$orderby={}", serde_json::to_string(&order).unwrap_or_default());

    let select = parser
        .parse_select("title, author/name as author, isbn13(title) as isbn")
        .await?;
    println!("$select={}", serde_json::to_string(&select).unwrap_or_default());
    println!();

    // -------------------------------------------------------------------------
    // Rejected queries
    // -------------------------------------------------------------------------
    for bad in ["password eq 'x'", "price lt", "frobnicate(title)", "title eq 'open"] {
        match parser.parse(bad).await {
            Ok(_) => println!("{bad}: accepted"),
            Err(err) => println!("{bad}: {err}"),
        }
    }

    Ok(())
}
