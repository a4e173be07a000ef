//! Error types produced by the lexer, parser and evaluator.

use thiserror::Error;

/// A position in the source text, used to annotate lex and parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPosition {
    /// The line number of the position, starting at 1.
    pub line: usize,
    /// The column number of the position, counted in chars, starting at 1.
    pub col: usize,
}

impl TextPosition {
    /// Creates a new [`TextPosition`].
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

/// An error occurred while scanning source text into tokens.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexError {
    /// An unrecognised character was found.
    #[error("unknown character '{ch}' at {position}")]
    UnknownChar {
        /// The offending character.
        ch: char,
        /// Where it was found.
        position: TextPosition,
    },
    /// A string literal (`cell` dialect) was never closed.
    #[error("unterminated string starting at {position}")]
    UnterminatedString {
        /// Where the opening quote was found.
        position: TextPosition,
    },
    /// A tab character was found; only the `cell` dialect rejects these.
    #[error("illegal tab character at {position}")]
    IllegalTab {
        /// Where the tab was found.
        position: TextPosition,
    },
}

/// An error occurred while turning a token stream into an AST.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// Ran out of tokens while something else was still expected.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected instead.
        expected: &'static str,
    },
    /// A token was found where it made no sense.
    #[error("unexpected token `{found}` while parsing {context}")]
    UnexpectedToken {
        /// The textual form of the offending token.
        found: String,
        /// A short description of what was being parsed.
        context: &'static str,
    },
    /// An assignment's left-hand side was not a bare symbol.
    #[error("cannot assign to anything but a symbol")]
    AssignToNonSymbol,
    /// A function's parameter list contained something other than symbols.
    #[error("malformed parameter list")]
    MalformedParamList,
    /// An operator sat at the end of an expression with nothing following it.
    #[error("operator `{op}` has nothing to operate on")]
    TrailingOperator {
        /// The dangling operator.
        op: String,
    },
    /// A `~` continuation marker had no preceding expression to extend.
    #[error("`~` has no preceding expression to continue")]
    OrphanContinuation,
}

/// An error occurred while evaluating the AST.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalError {
    /// A symbol was called as a function but is not bound to one.
    #[error("`{name}` is not a function")]
    NotAFunction {
        /// The offending symbol.
        name: String,
    },
    /// An unknown operator string reached the evaluator.
    #[error("unknown operator '{op}'")]
    UnknownOperator {
        /// The offending operator.
        op: String,
    },
    /// Two operands had incompatible types for an operation.
    #[error("type mismatch: {message}")]
    TypeMismatch {
        /// A description of the mismatch.
        message: String,
    },
    /// A function call passed the wrong number of arguments.
    #[error("{name} takes {expected} argument(s), got {got}")]
    Arity {
        /// The function's name, for diagnostics.
        name: String,
        /// How many arguments it wants.
        expected: usize,
        /// How many arguments it got.
        got: usize,
    },
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A `^` label appeared inside a function body.
    #[error("labels are not allowed inside function bodies")]
    LabelInFunction,
    /// A symbol that is already bound in the local scope was declared again.
    #[error("`{name}` is already declared in this scope")]
    ReassignmentForbidden {
        /// The offending symbol.
        name: String,
    },
    /// An array index or similar builtin argument had the wrong shape.
    #[error("builtin `{name}` got a bad argument: {message}")]
    BadArgument {
        /// The builtin's name.
        name: String,
        /// What was wrong with it.
        message: String,
    },
}

/// The union of every error this crate can produce while turning source text
/// into a running program.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraftError {
    /// See [`LexError`].
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    /// See [`ParseError`].
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// See [`EvalError`].
    #[error("eval error: {0}")]
    Eval(#[from] EvalError),
}

#[cfg(feature = "diagnostics")]
impl GraftError {
    /// Renders this error as a human-facing diagnostic using `ariadne`.
    ///
    /// `source_id` and `source` are the name and contents of the file the
    /// error came from; callers without a real file can pass any label.
    pub fn to_report(&self, source_id: &str, source: &str) -> String {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let (span, message) = match self {
            GraftError::Lex(LexError::UnknownChar { position, .. })
            | GraftError::Lex(LexError::UnterminatedString { position })
            | GraftError::Lex(LexError::IllegalTab { position }) => {
                (char_offset(source, *position), self.to_string())
            }
            _ => (0..source.len().max(1), self.to_string()),
        };

        let mut buf = Vec::new();
        let _ = Report::build(ReportKind::Error, (source_id, span.clone()))
            .with_message(&message)
            .with_label(
                Label::new((source_id, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((source_id, Source::from(source)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(feature = "diagnostics")]
fn char_offset(source: &str, position: TextPosition) -> std::ops::Range<usize> {
    let mut line = 1usize;
    let mut col = 1usize;
    for (idx, ch) in source.char_indices() {
        if line == position.line && col == position.col {
            return idx..(idx + ch.len_utf8()).min(source.len());
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    let len = source.len();
    len.saturating_sub(1)..len
}
