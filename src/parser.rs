//! Parsing: token stream to AST, one sub-module per dialect.

pub(crate) mod cell;
pub(crate) mod v1;

use crate::ast::Expr;
use crate::dialect::Dialect;
use crate::error::ParseError;
use crate::lexer::Token;

/// Parses a token stream into a program's top-level statements, using the
/// grammar of `dialect`.
pub fn parse(tokens: &[Token], dialect: Dialect) -> Result<Vec<Expr>, ParseError> {
    match dialect {
        Dialect::V1 => v1::parse_v1(tokens),
        Dialect::Cell => cell::parse_cell(tokens),
    }
}
