//! Lexer for the C-like `cell` dialect.

use super::cursor::Cursor;
use super::token::{Op, Token, TokenKind};
use crate::error::LexError;

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_symbol_cont(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit()
}

fn is_digit_or_dot(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Scans an entire `cell` source file into a flat token list.
///
/// Unlike `v1`, whitespace is meaningful here: any run of spaces or newlines
/// becomes a single [`TokenKind::StatementSeparator`]. Tab characters are
/// rejected outright.
pub fn lex_cell(source: &str) -> Result<Vec<Token>, LexError> {
    let mut cur = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        let Some(c) = cur.peek() else { break };

        if c == ' ' || c == '\n' {
            let position = cur.position();
            while matches!(cur.peek(), Some(' ') | Some('\n')) {
                cur.bump();
            }
            tokens.push(Token {
                kind: TokenKind::StatementSeparator,
                position,
            });
            continue;
        }

        let position = cur.position();

        let kind = if c == '\t' {
            return Err(LexError::IllegalTab { position });
        } else if c == '(' {
            cur.bump();
            TokenKind::OpenParen
        } else if c == ')' {
            cur.bump();
            TokenKind::CloseParen
        } else if c == '{' {
            cur.bump();
            TokenKind::OpenBrace
        } else if c == '}' {
            cur.bump();
            TokenKind::CloseBrace
        } else if c == '[' {
            cur.bump();
            TokenKind::OpenBracket
        } else if c == ']' {
            cur.bump();
            TokenKind::CloseBracket
        } else if c == ',' {
            cur.bump();
            TokenKind::Comma
        } else if c == ':' {
            cur.bump();
            TokenKind::Colon
        } else if c == '^' {
            cur.bump();
            TokenKind::Label
        } else if c == '\'' || c == '"' {
            TokenKind::String(scan_string(&mut cur, c)?)
        } else if c == '=' {
            cur.bump();
            if cur.peek() == Some('=') {
                cur.bump();
                TokenKind::Operator(Op::Eq)
            } else {
                TokenKind::Operator(Op::Assign)
            }
        } else if c == '<' {
            cur.bump();
            if cur.peek() == Some('=') {
                cur.bump();
                TokenKind::Operator(Op::Le)
            } else {
                TokenKind::Operator(Op::Lt)
            }
        } else if c == '>' {
            cur.bump();
            if cur.peek() == Some('=') {
                cur.bump();
                TokenKind::Operator(Op::Ge)
            } else {
                TokenKind::Operator(Op::Gt)
            }
        } else if let Some(op) = match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            _ => None,
        } {
            cur.bump();
            if cur.peek() == Some('=') {
                cur.bump();
                TokenKind::CompoundAssign(op)
            } else {
                TokenKind::Operator(op)
            }
        } else if is_digit_or_dot(c) {
            let mut raw = String::new();
            cur.take_while(&mut raw, is_digit_or_dot);
            TokenKind::Number(raw)
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

fn scan_string(cur: &mut Cursor<'_>, delim: char) -> Result<String, LexError> {
    let position = cur.position();
    cur.bump();
    let mut out = String::new();
    loop {
        match cur.peek() {
            None => return Err(LexError::UnterminatedString { position }),
            Some(c) if c == delim => {
                cur.bump();
                return Ok(out);
            }
            Some(c) => {
                out.push(c);
                cur.bump();
            }
        }
    }
}
