//! Parser for the terse `v1` dialect.
//!
//! `v1` statements are built up flat, token by token: a running `so_far`
//! absorbs each token until it reaches a "terminal" shape (a function call,
//! a modification, or a bare symbol reference) and the next token isn't a
//! `~` continuation, at which point the statement is complete.

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
}

fn is_terminal(expr: &Option<Expr>) -> bool {
    matches!(
        expr,
        Some(Expr::FunctionCall { .. }) | Some(Expr::Modify { .. }) | Some(Expr::Symbol(_))
    )
}

/// Parses a full `v1` program into its top-level statements.
pub fn parse_v1(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let mut cur = TokenCursor::new(tokens);
    let mut statements = Vec::new();
    loop {
        skip_separators(&mut cur);
        if cur.peek_kind().is_none() {
            break;
        }
        if let Some(expr) = parse_statement(&mut cur, None)? {
            statements.push(expr);
        }
    }
    Ok(statements)
}

fn skip_separators(cur: &mut TokenCursor) {
    while matches!(cur.peek_kind(), Some(TokenKind::StatementSeparator)) {
        cur.bump();
    }
}

fn parse_statement(
    cur: &mut TokenCursor,
    end: Option<&TokenKind>,
) -> Result<Option<Expr>, ParseError> {
    let mut so_far: Option<Expr> = None;
    loop {
        if is_terminal(&so_far) {
            match cur.peek_kind() {
                // `~` means "don't stop here" — swallow it and fall through
                // to fold the next token into the same statement.
                Some(TokenKind::Continuation) => {
                    cur.bump();
                }
                _ => return Ok(so_far),
            }
        }
        match cur.peek_kind() {
            None => return Ok(so_far),
            Some(k) if Some(k) == end => return Ok(so_far),
            _ => {}
        }
        let tok = cur.bump().expect("just peeked");
        if matches!(tok.kind, TokenKind::Continuation) {
            continue;
        }
        if matches!(tok.kind, TokenKind::StatementSeparator) {
            return Ok(so_far);
        }
        so_far = Some(parse_token(cur, so_far, tok, end)?);
    }
}

fn parse_single(cur: &mut TokenCursor, end: Option<&TokenKind>) -> Result<Expr, ParseError> {
    match cur.peek_kind() {
        None => return Err(ParseError::UnexpectedEof { expected: "an expression" }),
        Some(k) if Some(k) == end => {
            return Err(ParseError::UnexpectedEof { expected: "an expression" })
        }
        _ => {}
    }
    let tok = cur.bump().expect("just peeked");
    if matches!(tok.kind, TokenKind::Continuation) {
        return parse_single(cur, end);
    }
    parse_token(cur, None, tok, end)
}

fn parse_block(cur: &mut TokenCursor) -> Result<Vec<Expr>, ParseError> {
    let mut body = Vec::new();
    loop {
        skip_separators(cur);
        match cur.peek_kind() {
            Some(TokenKind::CloseBrace) => {
                cur.bump();
                break;
            }
            None => return Err(ParseError::UnexpectedEof { expected: "'}'" }),
            _ => {}
        }
        if let Some(expr) = parse_statement(cur, Some(&TokenKind::CloseBrace))? {
            body.push(expr);
        }
    }
    Ok(body)
}

fn parse_token(
    cur: &mut TokenCursor,
    so_far: Option<Expr>,
    tok: &Token,
    end: Option<&TokenKind>,
) -> Result<Expr, ParseError> {
    match &tok.kind {
        TokenKind::Number(raw) => {
            if so_far.is_some() {
                return Err(ParseError::UnexpectedToken {
                    found: raw.clone(),
                    context: "a number cannot follow another expression without an operator",
                });
            }
            let value: f64 = raw.parse().map_err(|_| ParseError::UnexpectedToken {
                found: raw.clone(),
                context: "numeric literal",
            })?;
            Ok(Expr::Number { value, negative: false })
        }
        TokenKind::Label => Ok(Expr::Label),
        TokenKind::V1Call => {
            let callee = parse_single(cur, end)?;
            Ok(Expr::FunctionCall {
                callee: Box::new(callee),
                args: Vec::new(),
                repeat: so_far.map(Box::new),
            })
        }
        TokenKind::Operator(op) => parse_operator(cur, so_far, *op, end),
        TokenKind::Symbol(name) => match so_far {
            None => Ok(Expr::Symbol(name.clone())),
            Some(value @ (Expr::Number { .. } | Expr::Symbol(_) | Expr::Negative(_))) => Ok(Expr::Modify {
                op: Op::Mul,
                target: name.clone(),
                value: Box::new(value),
            }),
            Some(_) => Err(ParseError::UnexpectedToken {
                found: name.clone(),
                context: "juxtaposition target must follow a number or symbol",
            }),
        },
        TokenKind::OpenBrace => {
            let body = parse_block(cur)?;
            Ok(Expr::FunctionDef { params: Vec::new(), body })
        }
        other => Err(ParseError::UnexpectedToken {
            found: other.to_string(),
            context: "v1 statement",
        }),
    }
}

fn parse_operator(
    cur: &mut TokenCursor,
    so_far: Option<Expr>,
    op: Op,
    end: Option<&TokenKind>,
) -> Result<Expr, ParseError> {
    if so_far.is_none() && op == Op::Sub && matches!(cur.peek_kind(), Some(TokenKind::Number(_))) {
        let literal = parse_single(cur, end)?;
        let Expr::Number { value, .. } = literal else {
            unreachable!("peeked a NumberToken")
        };
        return Ok(Expr::Number { value, negative: true });
    }

    let rhs = parse_single(cur, end).map_err(|e| match e {
        ParseError::UnexpectedEof { .. } => ParseError::TrailingOperator { op: op.to_string() },
        other => other,
    })?;
    let Expr::Symbol(target) = rhs else {
        return Err(ParseError::AssignToNonSymbol);
    };
    let value = so_far.unwrap_or(Expr::number(10.0));
    Ok(Expr::Modify {
        op,
        target,
        value: Box::new(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::v1::lex_v1;

    fn parse(src: &str) -> Vec<Expr> {
        parse_v1(&lex_v1(src).unwrap()).unwrap()
    }

    #[test]
    fn bare_plus_defaults_operand_to_ten() {
        let stmts = parse("+d");
        assert_eq!(
            stmts,
            vec![Expr::Modify {
                op: Op::Add,
                target: "d".to_string(),
                value: Box::new(Expr::number(10.0)),
            }]
        );
    }

    #[test]
    fn juxtaposition_is_a_multiply_modify() {
        let stmts = parse("2d");
        assert_eq!(
            stmts,
            vec![Expr::Modify {
                op: Op::Mul,
                target: "d".to_string(),
                value: Box::new(Expr::number(2.0)),
            }]
        );
    }

    #[test]
    fn call_with_repeat_count() {
        let stmts = parse("3:S");
        assert_eq!(
            stmts,
            vec![Expr::FunctionCall {
                callee: Box::new(Expr::Symbol("S".to_string())),
                args: Vec::new(),
                repeat: Some(Box::new(Expr::number(3.0))),
            }]
        );
    }

    #[test]
    fn call_without_repeat_defaults_to_none() {
        let stmts = parse(":S");
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
    fn leading_minus_negates_a_literal() {
        let stmts = parse("-5=d");
        assert_eq!(
            stmts,
            vec![Expr::Modify {
                op: Op::Assign,
                target: "d".to_string(),
                value: Box::new(Expr::Number { value: 5.0, negative: true }),
            }]
        );
    }

    #[test]
    fn continuation_feeds_previous_symbol_into_next_call() {
        let stmts = parse(":S~:S");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn function_def_body_is_parsed() {
        let stmts = parse(":{:S;+d}");
        let Expr::FunctionCall { callee, .. } = &stmts[0] else {
            panic!("expected a call")
        };
        let Expr::FunctionDef { body, .. } = callee.as_ref() else {
            panic!("expected a function def")
        };
        assert_eq!(body.len(), 2);
    }
}
