//! Lexer for the terse `v1` dialect.

use super::cursor::Cursor;
use super::token::{Op, Token, TokenKind};
use crate::error::LexError;

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_symbol_cont(c: char) -> bool {
    is_symbol_start(c)
}

fn is_digit_or_dot(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Scans an entire `v1` source file into a flat token list.
///
/// Whitespace carries no meaning in `v1` (statements are separated by `;`)
/// and is skipped silently.
pub fn lex_v1(source: &str) -> Result<Vec<Token>, LexError> {
    let mut cur = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(c) = cur.peek() {
        let position = cur.position();
        if c.is_whitespace() {
            cur.bump();
            continue;
        }
        let kind = if is_digit_or_dot(c) {
            let mut raw = String::new();
            cur.take_while(&mut raw, is_digit_or_dot);
            TokenKind::Number(raw)
        } else if c == '^' {
            cur.bump();
            TokenKind::Label
        } else if c == ':' {
            cur.bump();
            TokenKind::V1Call
        } else if c == '~' {
            cur.bump();
            TokenKind::Continuation
        } else if c == ';' {
            cur.bump();
            TokenKind::StatementSeparator
        } else if c == '{' {
            cur.bump();
            TokenKind::OpenBrace
        } else if c == '}' {
            cur.bump();
            TokenKind::CloseBrace
        } else if let Some(op) = match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '/' => Some(Op::Div),
            '=' => Some(Op::Assign),
            _ => None,
        } {
            cur.bump();
            TokenKind::Operator(op)
        } else if is_symbol_start(c) {
            let mut raw = String::new();
            cur.take_while(&mut raw, is_symbol_cont);
            TokenKind::Symbol(raw)
        } else {
            return Err(LexError::UnknownChar { ch: c, position });
        };
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex_v1(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_juxtaposed_multiply_and_call() {
        assert_eq!(
            kinds("2d:S"),
            vec![
                TokenKind::Number("2".into()),
                TokenKind::Symbol("d".into()),
                TokenKind::V1Call,
                TokenKind::Symbol("S".into()),
            ]
        );
    }

    #[test]
    fn lexes_label_and_continuation() {
        assert_eq!(
            kinds("^+d~+s"),
            vec![
                TokenKind::Label,
                TokenKind::Operator(Op::Add),
                TokenKind::Symbol("d".into()),
                TokenKind::Continuation,
                TokenKind::Operator(Op::Add),
                TokenKind::Symbol("s".into()),
            ]
        );
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(kinds(" :S ; :S "), kinds(":S;:S"));
    }

    #[test]
    fn unknown_char_is_an_error() {
        assert!(matches!(lex_v1("#"), Err(LexError::UnknownChar { ch: '#', .. })));
    }
}
