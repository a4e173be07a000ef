//! The shared AST both dialects parse into.

use crate::lexer::Op;

/// One parsed statement or expression. Both dialects produce this same tree;
/// a handful of variants are only ever produced by one of them (noted below).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A numeric literal. `negative` records a leading unary minus folded in
    /// by the parser, distinct from [`Expr::Negative`] wrapping a sub-expression.
    Number {
        /// The literal's value.
        value: f64,
        /// Whether a leading `-` was applied directly to this literal.
        negative: bool,
    },
    /// A string literal (`cell` only).
    String(String),
    /// A bare identifier reference.
    Symbol(String),
    /// A binary operation, e.g. `a + b` or v1's juxtaposed `2d`.
    Operation {
        /// The operator.
        op: Op,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// In-place modification of a symbol: cell's `x += 1` family, v1's `+d`
    /// family (`target` is modified by `op` applied with `value`).
    Modify {
        /// The operator driving the modification.
        op: Op,
        /// The symbol being modified.
        target: String,
        /// The right-hand operand.
        value: Box<Expr>,
    },
    /// `target = value` (`cell` only; v1 expresses assignment via `Modify`
    /// with [`Op::Assign`]).
    Assignment {
        /// The symbol being assigned.
        target: String,
        /// The new value.
        value: Box<Expr>,
    },
    /// Invocation of `callee` with `args`. In `v1`, a call `3:S` produces a
    /// `repeat` of `3`; `cell` calls always have `repeat == 1`.
    FunctionCall {
        /// The expression evaluating to a callable.
        callee: Box<Expr>,
        /// Evaluated argument expressions.
        args: Vec<Expr>,
        /// How many times to perform the call in sequence (`v1` only).
        repeat: Option<Box<Expr>>,
    },
    /// A function literal: `{ ... }` (v1) or `(a, b): { ... }` (cell).
    FunctionDef {
        /// Parameter names, in positional order.
        params: Vec<String>,
        /// The function body, evaluated in sequence.
        body: Vec<Expr>,
    },
    /// `[a, b, c]` (`cell` only).
    Array(Vec<Expr>),
    /// The `^` jump-back marker.
    Label,
    /// Unary minus applied to an arbitrary sub-expression.
    Negative(Box<Expr>),
}

impl Expr {
    /// Shorthand for a positive numeric literal.
    pub fn number(value: f64) -> Self {
        Expr::Number {
            value,
            negative: false,
        }
    }
}
