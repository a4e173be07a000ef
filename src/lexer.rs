//! Lexing: source text to token stream, one sub-module per dialect.

pub(crate) mod cell;
pub(crate) mod cursor;
pub mod token;
pub(crate) mod v1;

use crate::dialect::Dialect;
use crate::error::LexError;
pub use token::{Op, Token, TokenKind};

/// Scans `source` into a token stream using the rules of `dialect`.
pub fn lex(source: &str, dialect: Dialect) -> Result<Vec<Token>, LexError> {
    match dialect {
        Dialect::V1 => v1::lex_v1(source),
        Dialect::Cell => cell::lex_cell(source),
    }
}
