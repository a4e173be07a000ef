//! A small standard library, written in `cell` itself, loaded into every
//! fresh environment after the native builtins are installed.
//!
//! Each definition is ordinary `cell` source: no special loader magic, just
//! `lex` → `parse` → `eval_sequence` run once against the target
//! environment. Callers must install [`crate::builtins::install_cell_library`]
//! first, since these definitions are built out of `If`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dialect::Dialect;
use crate::env::EnvRef;
use crate::error::GraftError;
use crate::eval::eval_sequence;
use crate::lexer::lex;
use crate::parser::parse;
use crate::program_env::ProgramEnv;
use crate::rng::fixed_rng_handle;

/// The library's source. Written without internal whitespace per statement,
/// since `cell` treats any run of whitespace as a statement separator.
pub const SOURCE: &str = "\
Abs=(n):{If(n<0,():{0-n},():{n})} \
Max=(a,b):{If(a>b,():{a},():{b})} \
Min=(a,b):{If(a<b,():{a},():{b})} \
Clamp=(n,lo,hi):{Min(Max(n,lo),hi)} \
Sign=(n):{If(n==0,():{0},():{If(n>0,():{1},():{-1})})}";

/// Evaluates [`SOURCE`] against `env`, binding `Abs`, `Max`, `Min`, `Clamp`
/// and `Sign`.
pub fn install(env: &EnvRef) -> Result<(), GraftError> {
    let tokens = lex(SOURCE, Dialect::Cell)?;
    let statements = parse(&tokens, Dialect::Cell)?;
    let pe = ProgramEnv {
        env: Rc::clone(env),
        rng: fixed_rng_handle(vec![0.0]),
        strokes: Rc::new(RefCell::new(Vec::new())),
        fork_requests: Rc::new(Cell::new(0)),
    };
    eval_sequence(&pe, Dialect::Cell, &statements)?;
    Ok(())
}
