//! Lexically-scoped variable storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalError;
use crate::value::Value;

/// Shared handle to an [`Env`]. Environments are reference-counted because
/// `UserFunction` closures and child scopes both need to outlive the
/// expression that created them.
pub type EnvRef = Rc<RefCell<Env>>;

/// One lexical scope: a name-to-value map with an optional parent.
///
/// Lookup walks the parent chain. A miss is not an error: the language
/// treats every undeclared variable as `0`, and — matching the reference
/// implementation this is grounded on — that zero is written back into the
/// topmost scope of the chain as a side effect, so the same miss doesn't
/// keep falling all the way through on every subsequent read.
#[derive(Debug, Default)]
pub struct Env {
    items: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Env {
    /// Creates a fresh, parentless scope.
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Env {
            items: HashMap::new(),
            parent: None,
        }))
    }

    /// Creates a new scope whose parent is `this`.
    pub fn make_child(this: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Env {
            items: HashMap::new(),
            parent: Some(Rc::clone(this)),
        }))
    }

    /// Looks up `name`, walking the parent chain. Auto-vivifies a `0` in the
    /// root scope on a total miss.
    pub fn get(this: &EnvRef, name: &str) -> Value {
        if let Some(v) = this.borrow().items.get(name).cloned() {
            return v;
        }
        let parent = this.borrow().parent.clone();
        match parent {
            Some(p) => Env::get(&p, name),
            None => {
                let v = Value::Number(0.0);
                this.borrow_mut().items.insert(name.to_string(), v.clone());
                v
            }
        }
    }

    /// Writes `name` in `this`'s own scope, shadowing any outer binding.
    pub fn set(this: &EnvRef, name: &str, value: Value) {
        this.borrow_mut().items.insert(name.to_string(), value);
    }

    /// Like [`Env::set`], but fails if `name` is already bound in this exact
    /// scope. Used to catch duplicate parameter names in a function's
    /// freshly-made argument scope.
    pub fn set_new(this: &EnvRef, name: &str, value: Value) -> Result<(), EvalError> {
        let mut env = this.borrow_mut();
        if env.items.contains_key(name) {
            return Err(EvalError::ReassignmentForbidden {
                name: name.to_string(),
            });
        }
        env.items.insert(name.to_string(), value);
        Ok(())
    }

    /// Whether `name` is bound in this exact scope (parents not consulted).
    pub fn contains_local(this: &EnvRef, name: &str) -> bool {
        this.borrow().items.contains_key(name)
    }

    /// Deep-clones the entire parent chain. Used when a program forks, so
    /// that the new fork's variables are fully independent of the parent's.
    pub fn clone_chain(this: &EnvRef) -> EnvRef {
        let parent = this.borrow().parent.as_ref().map(Env::clone_chain);
        let items = this.borrow().items.clone();
        Rc::new(RefCell::new(Env { items, parent }))
    }
}
