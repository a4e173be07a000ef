//! [`ProgramEnv`]: an [`Env`] plus the per-fork amenities builtins need —
//! a random source, a way to request a fork, and the buffer strokes land in.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::env::{Env, EnvRef};
use crate::rng::RngRef;
use crate::turtle::Stroke;
use crate::value::Value;

/// The magic variables a [`ProgramEnv::set`] snapshots before overwriting.
const X: &str = "x";
const Y: &str = "y";
const X_PREV: &str = "xprev";
const Y_PREV: &str = "yprev";

/// The evaluation context threaded through one running fork: a lexical
/// environment, a shared RNG, an append-only stroke buffer, and a counter of
/// pending fork requests the scheduler drains after each statement.
#[derive(Clone)]
pub struct ProgramEnv {
    /// The lexical scope currently in effect.
    pub env: EnvRef,
    /// Shared random source (not cloned on fork; siblings draw from the same
    /// stream).
    pub rng: RngRef,
    /// Strokes appended during the current statement. Shared with any child
    /// scope created by [`ProgramEnv::make_child`] so that a called
    /// function's strokes attribute to the caller's fork.
    pub strokes: Rc<RefCell<Vec<Stroke>>>,
    /// Incremented by the `fork` builtin; drained by the scheduler once the
    /// current statement finishes.
    pub fork_requests: Rc<Cell<u32>>,
}

impl ProgramEnv {
    /// Creates a fresh, top-level program environment.
    pub fn new(rng: RngRef) -> Self {
        Self {
            env: Env::root(),
            rng,
            strokes: Rc::new(RefCell::new(Vec::new())),
            fork_requests: Rc::new(Cell::new(0)),
        }
    }

    /// Looks up a variable, auto-vivifying a `0` on a total miss.
    pub fn get(&self, name: &str) -> Value {
        Env::get(&self.env, name)
    }

    /// Writes a variable in the current scope. Writing `x` or `y` first
    /// snapshots the old value into `xprev`/`yprev`.
    pub fn set(&self, name: &str, value: Value) {
        if name == X {
            let old_x = Env::get(&self.env, X);
            Env::set(&self.env, X_PREV, old_x);
        } else if name == Y {
            let old_y = Env::get(&self.env, Y);
            Env::set(&self.env, Y_PREV, old_y);
        }
        Env::set(&self.env, name, value);
    }

    /// Appends a stroke produced by the current statement.
    pub fn push_stroke(&self, stroke: Stroke) {
        self.strokes.borrow_mut().push(stroke);
    }

    /// Requests that the scheduler fork this program after the current
    /// statement completes.
    pub fn request_fork(&self) {
        self.fork_requests.set(self.fork_requests.get() + 1);
    }

    /// Creates a child scope for a function call, sharing this env's
    /// strokes, RNG and fork-request counter (so nested calls still
    /// attribute to the same fork).
    pub fn make_child(&self) -> ProgramEnv {
        ProgramEnv {
            env: Env::make_child(&self.env),
            rng: Rc::clone(&self.rng),
            strokes: Rc::clone(&self.strokes),
            fork_requests: Rc::clone(&self.fork_requests),
        }
    }

    /// Deep-clones the env chain and gives the clone a fresh, independent
    /// stroke buffer and fork-request counter. Used when a fork is admitted:
    /// parent and child must never share mutable turtle state again.
    pub fn clone_for_fork(&self) -> ProgramEnv {
        ProgramEnv {
            env: Env::clone_chain(&self.env),
            rng: Rc::clone(&self.rng),
            strokes: Rc::new(RefCell::new(Vec::new())),
            fork_requests: Rc::new(Cell::new(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::fixed_rng_handle;

    #[test]
    fn writing_x_snapshots_previous_value() {
        let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
        pe.set("x", Value::Number(5.0));
        pe.set("x", Value::Number(9.0));
        assert_eq!(pe.get("xprev"), Value::Number(5.0));
        assert_eq!(pe.get("x"), Value::Number(9.0));
    }

    #[test]
    fn child_scope_shares_stroke_buffer() {
        let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
        let child = pe.make_child();
        child.push_stroke(Stroke::Dot {
            pos: crate::turtle::Pt::new(0.0, 0.0),
            color: crate::turtle::Color::default_black(),
            size: 1.0,
        });
        assert_eq!(pe.strokes.borrow().len(), 1);
    }

    #[test]
    fn fork_clone_has_independent_state() {
        let pe = ProgramEnv::new(fixed_rng_handle(vec![0.0]));
        pe.set("x", Value::Number(1.0));
        let forked = pe.clone_for_fork();
        forked.set("x", Value::Number(2.0));
        assert_eq!(pe.get("x"), Value::Number(1.0));
        assert_eq!(forked.get("x"), Value::Number(2.0));
        pe.push_stroke(Stroke::Dot {
            pos: crate::turtle::Pt::new(0.0, 0.0),
            color: crate::turtle::Color::default_black(),
            size: 1.0,
        });
        assert!(forked.strokes.borrow().is_empty());
    }
}
