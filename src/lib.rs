//! A small turtle-graphics programming environment.
//!
//! Programs are written in one of two dialects that share a single AST and
//! evaluator: a terse, juxtaposition-heavy `v1` dialect, and a C-like `cell`
//! dialect with explicit operators and parentheses. Evaluating a program
//! drives a turtle around a canvas, recording the strokes it draws; programs
//! can also fork themselves into multiple concurrently-running copies, which
//! a scheduler interleaves one step at a time.
//!
//! # Usage
//!
//! ```
//! use strokelang_core::{dialect::Dialect, lexer, parser, eval, program_env::ProgramEnv, rng};
//!
//! let source = "d=90 s=25 S()";
//! let tokens = lexer::lex(source, Dialect::Cell).unwrap();
//! let program = parser::parse(&tokens, Dialect::Cell).unwrap();
//!
//! let pe = ProgramEnv::new(rng::fixed_rng_handle(vec![0.0]));
//! strokelang_core::builtins::install_turtle_builtins(&pe.env);
//! strokelang_core::builtins::install_cell_library(&pe.env);
//! eval::eval_sequence(&pe, Dialect::Cell, &program).unwrap();
//! assert_eq!(pe.strokes.borrow().len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod animation;
pub mod ast;
pub mod builtins;
pub mod cell_stdlib;
pub mod config;
pub mod dialect;
pub mod error;
pub mod env;
pub mod eval;
pub mod lexer;
pub mod optimiser;
pub mod parser;
pub mod program_env;
pub mod rng;
pub mod scheduler;
pub mod turtle;
pub mod value;
pub mod window_animator;

pub use error::GraftError;
