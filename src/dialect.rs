//! The two surface syntaxes that compile down to the same AST and runtime.

/// Which concrete syntax a source file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// The terse, juxtaposition-multiplies dialect (`:S~+d`).
    V1,
    /// The C-like dialect (`S() d+=10`). This is the default.
    Cell,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Cell
    }
}
