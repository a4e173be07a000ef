//! Parser for the C-like `cell` dialect.
//!
//! Expressions fold strictly left-to-right with no precedence: `a+b+c`
//! parses as `(a+b)+c`. Whitespace is the statement separator, so within one
//! statement tokens must butt up against each other (`d+=10`, not `d += 10`).

use crate::ast::Expr;
use crate::error::ParseError;
use crate::lexer::{Op, Token, TokenKind};

struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), Some(TokenKind::StatementSeparator)) {
            self.bump();
        }
    }
}

/// Parses a full `cell` program into its top-level statements.
pub fn parse_cell(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let mut cur = TokenCursor::new(tokens);
    parse_statements_until(&mut cur, None)
}

fn parse_statements_until(
    cur: &mut TokenCursor,
    end: Option<TokenKind>,
) -> Result<Vec<Expr>, ParseError> {
    let mut statements = Vec::new();
    loop {
        cur.skip_separators();
        match cur.peek_kind() {
            None => break,
            Some(k) if Some(k) == end.as_ref() => break,
            _ => {}
        }
        if let Some(expr) = parse_statement(cur)? {
            statements.push(expr);
        }
    }
    Ok(statements)
}

/// One statement: a bare expression, or `symbol = value` / `symbol op= value`.
fn parse_statement(cur: &mut TokenCursor) -> Result<Option<Expr>, ParseError> {
    let Some(first) = parse_value(cur)? else {
        return Ok(None);
    };
    match cur.peek_kind() {
        Some(TokenKind::Operator(Op::Assign)) => {
            cur.bump();
            let Expr::Symbol(target) = first else {
                return Err(ParseError::AssignToNonSymbol);
            };
            let value = parse_value(cur)?.ok_or(ParseError::UnexpectedEof {
                expected: "a value after '='",
            })?;
            Ok(Some(Expr::Assignment {
                target,
                value: Box::new(value),
            }))
        }
        Some(TokenKind::CompoundAssign(op)) => {
            let op = *op;
            cur.bump();
            let Expr::Symbol(target) = first else {
                return Err(ParseError::AssignToNonSymbol);
            };
            let value = parse_value(cur)?.ok_or(ParseError::UnexpectedEof {
                expected: "a value after a compound assignment",
            })?;
            Ok(Some(Expr::Modify {
                op,
                target,
                value: Box::new(value),
            }))
        }
        _ => Ok(Some(first)),
    }
}

/// Folds a flat chain of binary operators left to right. Stops (without
/// consuming) at anything that isn't a plain operator: `=`, `+=` and
/// friends, list/body delimiters, statement separators, or end of input.
fn parse_value(cur: &mut TokenCursor) -> Result<Option<Expr>, ParseError> {
    if matches!(cur.peek_kind(), None | Some(TokenKind::StatementSeparator)) {
        return Ok(None);
    }
    let mut prev = parse_leading_term(cur)?;
    loop {
        match cur.peek_kind() {
            Some(TokenKind::Operator(op)) if *op != Op::Assign => {
                let op = *op;
                cur.bump();
                let rhs = parse_atom(cur)?;
                prev = Expr::Operation {
                    op,
                    left: Box::new(prev),
                    right: Box::new(rhs),
                };
            }
            _ => break,
        }
    }
    Ok(Some(prev))
}

fn parse_leading_term(cur: &mut TokenCursor) -> Result<Expr, ParseError> {
    if matches!(cur.peek_kind(), Some(TokenKind::Operator(Op::Sub))) {
        cur.bump();
        let inner = parse_atom(cur)?;
        return Ok(Expr::Negative(Box::new(inner)));
    }
    parse_atom(cur)
}

/// A primary term, plus any immediately-following `(...)` call sugar.
fn parse_atom(cur: &mut TokenCursor) -> Result<Expr, ParseError> {
    let mut expr = parse_primary(cur)?;
    while matches!(cur.peek_kind(), Some(TokenKind::OpenParen)) {
        cur.bump();
        let args = parse_comma_list(cur, &TokenKind::CloseParen, parse_value)?;
        expr = Expr::FunctionCall {
            callee: Box::new(expr),
            args,
            repeat: None,
        };
    }
    Ok(expr)
}

fn parse_primary(cur: &mut TokenCursor) -> Result<Expr, ParseError> {
    let tok = cur.bump().ok_or(ParseError::UnexpectedEof {
        expected: "an expression",
    })?;
    match &tok.kind {
        TokenKind::Number(raw) => {
            let value: f64 = raw.parse().map_err(|_| ParseError::UnexpectedToken {
                found: raw.clone(),
                context: "numeric literal",
            })?;
            Ok(Expr::Number { value, negative: false })
        }
        TokenKind::String(s) => Ok(Expr::String(s.clone())),
        TokenKind::Symbol(name) => Ok(Expr::Symbol(name.clone())),
        TokenKind::Label => Ok(Expr::Label),
        TokenKind::OpenBracket => {
            let elements = parse_comma_list(cur, &TokenKind::CloseBracket, parse_value)?;
            Ok(Expr::Array(elements))
        }
        TokenKind::OpenBrace => {
            let body = parse_statements_until(cur, Some(TokenKind::CloseBrace))?;
            expect(cur, &TokenKind::CloseBrace, "'}'")?;
            Ok(Expr::FunctionDef { params: Vec::new(), body })
        }
        TokenKind::OpenParen => parse_paren_group_or_function_def(cur),
        other => Err(ParseError::UnexpectedToken {
            found: other.to_string(),
            context: "cell expression",
        }),
    }
}

/// After consuming `(`, this is either a parenthesised sub-expression
/// `(expr)` or the start of a function literal's parameter list
/// `(a, b): { ... }`. We commit to the parameter-list reading only once we
/// see the `:` that follows a clean, symbols-only list.
fn parse_paren_group_or_function_def(cur: &mut TokenCursor) -> Result<Expr, ParseError> {
    let checkpoint = cur.pos;
    if let Some(params) = try_parse_param_list(cur) {
        if matches!(cur.peek_kind(), Some(TokenKind::Colon)) {
            cur.bump();
            expect(cur, &TokenKind::OpenBrace, "'{' after a parameter list")?;
            let body = parse_statements_until(cur, Some(TokenKind::CloseBrace))?;
            expect(cur, &TokenKind::CloseBrace, "'}'")?;
            return Ok(Expr::FunctionDef { params, body });
        }
    }
    cur.pos = checkpoint;
    let inner = parse_value(cur)?.ok_or(ParseError::UnexpectedEof {
        expected: "an expression inside '('",
    })?;
    expect(cur, &TokenKind::CloseParen, "')'")?;
    Ok(inner)
}

fn try_parse_param_list(cur: &mut TokenCursor) -> Option<Vec<String>> {
    let mut params = Vec::new();
    cur.skip_separators();
    if matches!(cur.peek_kind(), Some(TokenKind::CloseParen)) {
        cur.bump();
        return Some(params);
    }
    loop {
        cur.skip_separators();
        let TokenKind::Symbol(name) = cur.peek_kind()?.clone() else {
            return None;
        };
        cur.bump();
        params.push(name);
        cur.skip_separators();
        match cur.peek_kind() {
            Some(TokenKind::Comma) => {
                cur.bump();
            }
            Some(TokenKind::CloseParen) => {
                cur.bump();
                return Some(params);
            }
            _ => return None,
        }
    }
}

fn parse_comma_list(
    cur: &mut TokenCursor,
    close: &TokenKind,
    mut parse_item: impl FnMut(&mut TokenCursor) -> Result<Option<Expr>, ParseError>,
) -> Result<Vec<Expr>, ParseError> {
    let mut items = Vec::new();
    cur.skip_separators();
    if cur.peek_kind() == Some(close) {
        cur.bump();
        return Ok(items);
    }
    loop {
        cur.skip_separators();
        let item = parse_item(cur)?.ok_or(ParseError::UnexpectedEof {
            expected: "a list item",
        })?;
        items.push(item);
        cur.skip_separators();
        match cur.bump().map(|t| &t.kind) {
            Some(TokenKind::Comma) => continue,
            Some(k) if k == close => break,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    context: "list separator",
                })
            }
            None => return Err(ParseError::UnexpectedEof { expected: "','  or closing bracket" }),
        }
    }
    Ok(items)
}

fn expect(cur: &mut TokenCursor, want: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
    match cur.bump() {
        Some(t) if &t.kind == want => Ok(()),
        Some(t) => Err(ParseError::UnexpectedToken {
            found: t.kind.to_string(),
            context: expected,
        }),
        None => Err(ParseError::UnexpectedEof { expected }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::cell::lex_cell;

    fn parse(src: &str) -> Vec<Expr> {
        parse_cell(&lex_cell(src).unwrap()).unwrap()
    }

    #[test]
    fn plain_assignment_and_compound_assignment() {
        let stmts = parse("d=90 s+=5");
        assert_eq!(
            stmts,
            vec![
                Expr::Assignment {
                    target: "d".to_string(),
                    value: Box::new(Expr::number(90.0)),
                },
                Expr::Modify {
                    op: Op::Add,
                    target: "s".to_string(),
                    value: Box::new(Expr::number(5.0)),
                },
            ]
        );
    }

    #[test]
    fn call_with_no_args() {
        let stmts = parse("S()");
        assert_eq!(
            stmts,
            vec![Expr::FunctionCall {
                callee: Box::new(Expr::Symbol("S".to_string())),
                args: Vec::new(),
                repeat: None,
            }]
        );
    }

    #[test]
    fn left_to_right_folding_with_no_precedence() {
        let stmts = parse("a+b*c");
        let expected = Expr::Operation {
            op: Op::Mul,
            left: Box::new(Expr::Operation {
                op: Op::Add,
                left: Box::new(Expr::Symbol("a".to_string())),
                right: Box::new(Expr::Symbol("b".to_string())),
            }),
            right: Box::new(Expr::Symbol("c".to_string())),
        };
        assert_eq!(stmts, vec![expected]);
    }

    #[test]
    fn zero_param_function_literal() {
        let stmts = parse("T(3,{S()})");
        let Expr::FunctionCall { args, .. } = &stmts[0] else {
            panic!("expected a call")
        };
        assert!(matches!(args[1], Expr::FunctionDef { .. }));
    }

    #[test]
    fn array_literal() {
        let stmts = parse("[1,2,3]");
        assert_eq!(
            stmts,
            vec![Expr::Array(vec![
                Expr::number(1.0),
                Expr::number(2.0),
                Expr::number(3.0),
            ])]
        );
    }

    #[test]
    fn assigning_to_non_symbol_is_an_error() {
        let tokens = lex_cell("1=d").unwrap();
        assert!(matches!(
            parse_cell(&tokens),
            Err(ParseError::AssignToNonSymbol)
        ));
    }
}
