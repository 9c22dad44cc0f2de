//! OData Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Member and method references are resolved asynchronously while the tree
//! is built.

mod options;
mod parser;
mod pratt;
mod session;

pub use options::ParserOptions;
pub use parser::{OpenDataParser, ParsedExpression};
pub use session::ParserState;
