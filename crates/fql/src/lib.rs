//! FQL: the `SELECT f1, f2 WHERE <expr>` query language front end.
//!
//! Tokenizes and parses a query string into a [`Query`] — a field
//! projection plus a [`model::PredicateNode`] — with a recursive-descent
//! parser mirroring the workspace's existing query-language crate
//! structure: a [`lexer`] module, a [`parser`] module, and an [`ast`]
//! module of node types.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Query;
pub use parser::{parse, ParseError};
