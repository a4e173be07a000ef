//! Native functions installed into every fresh environment: the turtle
//! drawing primitives (`S`, `J`, `D`, `L`, `R`, `F`) and the `cell` dialect's
//! control-flow and math library.

use std::rc::Rc;

use crate::dialect::Dialect;
use crate::env::Env;
use crate::error::EvalError;
use crate::eval::call_value;
use crate::program_env::ProgramEnv;
use crate::turtle::{Color, Pt, Stroke};
use crate::value::{NativeFunction, Value};

fn native(name: &'static str, func: impl Fn(&ProgramEnv, &[Value]) -> Result<Value, EvalError> + 'static) -> Value {
    Value::NativeFunction(Rc::new(NativeFunction {
        name,
        func: Box::new(func),
    }))
}

fn arity(name: &str, expected: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::Arity {
            name: name.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn turtle_color(pe: &ProgramEnv) -> Color {
    Color::new(
        pe.get("r").as_number("color").unwrap_or(0.0),
        pe.get("g").as_number("color").unwrap_or(0.0),
        pe.get("b").as_number("color").unwrap_or(0.0),
        pe.get("a").as_number("color").unwrap_or(100.0),
    )
}

fn brush_size(pe: &ProgramEnv) -> f64 {
    pe.get("z").as_number("brush size").unwrap_or(5.0)
}

fn pos(pe: &ProgramEnv) -> Pt {
    Pt::new(
        pe.get("x").as_number("x").unwrap_or(0.0),
        pe.get("y").as_number("y").unwrap_or(0.0),
    )
}

fn prev_pos(pe: &ProgramEnv) -> Pt {
    Pt::new(
        pe.get("xprev").as_number("xprev").unwrap_or(0.0),
        pe.get("yprev").as_number("yprev").unwrap_or(0.0),
    )
}

/// Moves the turtle forward by `s` along heading `d` (degrees), snapshotting
/// `xprev`/`yprev`. Returns the new position, without recording a stroke —
/// shared by `step` (which does record one) and `jump` (which doesn't).
fn advance(pe: &ProgramEnv) -> (Pt, Pt) {
    let old = pos(pe);
    let d = pe.get("d").as_number("d").unwrap_or(0.0);
    let s = pe.get("s").as_number("s").unwrap_or(10.0);
    let theta = d.to_radians();
    let new = Pt::new(old.x + s * theta.sin(), old.y + s * theta.cos());
    pe.set("x", Value::Number(new.x));
    pe.set("y", Value::Number(new.y));
    (old, new)
}

fn step(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("S", 0, args)?;
    let (old, new) = advance(pe);
    pe.push_stroke(Stroke::Line {
        start: old,
        end: new,
        color: turtle_color(pe),
        size: brush_size(pe),
    });
    Ok(Value::None)
}

fn jump(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("J", 0, args)?;
    advance(pe);
    Ok(Value::None)
}

fn dot(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("D", 0, args)?;
    pe.push_stroke(Stroke::Dot {
        pos: pos(pe),
        color: turtle_color(pe),
        size: brush_size(pe),
    });
    Ok(Value::None)
}

fn line_to(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("L", 0, args)?;
    pe.push_stroke(Stroke::Line {
        start: prev_pos(pe),
        end: pos(pe),
        color: turtle_color(pe),
        size: brush_size(pe),
    });
    Ok(Value::None)
}

fn random(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("R", 0, args)?;
    let value = pe.rng.borrow_mut().uniform(-10.0, 10.0);
    Ok(Value::Number(value))
}

fn fork(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("F", 0, args)?;
    pe.request_fork();
    Ok(Value::None)
}

/// Installs the turtle-specific builtins and the reserved turtle variables
/// into `env` (this is the graft-specific half of a fresh environment; see
/// [`install_cell_library`] for the dialect-shared control-flow/math half).
pub fn install_turtle_builtins(env: &crate::env::EnvRef) {
    Env::set(env, "f", Value::Number(0.0));
    Env::set(env, "x", Value::Number(0.0));
    Env::set(env, "y", Value::Number(0.0));
    Env::set(env, "d", Value::Number(0.0));
    Env::set(env, "s", Value::Number(10.0));
    Env::set(env, "r", Value::Number(0.0));
    Env::set(env, "g", Value::Number(0.0));
    Env::set(env, "b", Value::Number(0.0));
    Env::set(env, "a", Value::Number(100.0));
    Env::set(env, "z", Value::Number(5.0));
    Env::set(env, "S", native("S", step));
    Env::set(env, "J", native("J", jump));
    Env::set(env, "D", native("D", dot));
    Env::set(env, "L", native("L", line_to));
    Env::set(env, "R", native("R", random));
    Env::set(env, "F", native("F", fork));
}

fn wrap_math1(name: &'static str, f: impl Fn(f64) -> f64 + 'static) -> Value {
    native(name, move |_pe, args| {
        arity(name, 1, args)?;
        let n = args[0].as_number(name)?;
        Ok(Value::Number(f(n)))
    })
}

fn wrap_math2(name: &'static str, f: impl Fn(f64, f64) -> f64 + 'static) -> Value {
    native(name, move |_pe, args| {
        arity(name, 2, args)?;
        let a = args[0].as_number(name)?;
        let b = args[1].as_number(name)?;
        Ok(Value::Number(f(a, b)))
    })
}

fn cell_if(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("If", 3, args)?;
    let cond = args[0].as_number("If")?;
    let branch = if cond != 0.0 { args[1].clone() } else { args[2].clone() };
    call_value(pe, Dialect::Cell, branch, Vec::new())
}

fn cell_times(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("T", 2, args)?;
    let reps = args[0].as_number("T")? as i64;
    let fn_val = args[1].clone();
    let mut result = Value::None;
    for _ in 0..reps.max(0) {
        result = call_value(pe, Dialect::Cell, fn_val.clone(), Vec::new())?;
    }
    Ok(result)
}

fn cell_for(pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("For", 2, args)?;
    let body = args[1].clone();
    let items: Vec<Value> = match &args[0] {
        Value::Array(arr) => arr.borrow().clone(),
        iter @ (Value::UserFunction(_) | Value::NativeFunction(_)) => {
            let mut collected = Vec::new();
            loop {
                let produced = call_value(pe, Dialect::Cell, iter.clone(), Vec::new())?;
                if produced == Value::EndOfLoop {
                    break;
                }
                collected.push(produced);
            }
            collected
        }
        other => {
            return Err(EvalError::BadArgument {
                name: "For".to_string(),
                message: format!("expected an array or iterator function, got {}", other.type_name()),
            })
        }
    };
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        results.push(call_value(pe, Dialect::Cell, body.clone(), vec![item])?);
    }
    Ok(Value::array(results))
}

fn cell_get(_pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("Get", 2, args)?;
    let Value::Array(arr) = &args[0] else {
        return Err(EvalError::BadArgument {
            name: "Get".to_string(),
            message: "first argument must be an array".to_string(),
        });
    };
    let index = args[1].as_number("Get")? as i64;
    let items = arr.borrow();
    if items.is_empty() {
        return Err(EvalError::BadArgument {
            name: "Get".to_string(),
            message: "array is empty".to_string(),
        });
    }
    let len = items.len() as i64;
    let wrapped = index.rem_euclid(len) as usize;
    Ok(items[wrapped].clone())
}

fn cell_add(_pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("Add", 2, args)?;
    let Value::Array(arr) = &args[0] else {
        return Err(EvalError::BadArgument {
            name: "Add".to_string(),
            message: "first argument must be an array".to_string(),
        });
    };
    arr.borrow_mut().push(args[1].clone());
    Ok(args[0].clone())
}

fn cell_len(_pe: &ProgramEnv, args: &[Value]) -> Result<Value, EvalError> {
    arity("Len", 1, args)?;
    let Value::Array(arr) = &args[0] else {
        return Err(EvalError::BadArgument {
            name: "Len".to_string(),
            message: "argument must be an array".to_string(),
        });
    };
    Ok(Value::Number(arr.borrow().len() as f64))
}

/// Installs `cell`'s control-flow builtins (`If`, `T`, `For`, `Get`, `Add`,
/// `Len`) and its degree-based math library. Shared by both dialects: `v1`
/// programs may call these too via `:If` etc., though they're idiomatic to
/// `cell`.
pub fn install_cell_library(env: &crate::env::EnvRef) {
    Env::set(env, "endofloop", Value::EndOfLoop);
    Env::set(env, "If", native("If", cell_if));
    Env::set(env, "T", native("T", cell_times));
    Env::set(env, "For", native("For", cell_for));
    Env::set(env, "Get", native("Get", cell_get));
    Env::set(env, "Add", native("Add", cell_add));
    Env::set(env, "Len", native("Len", cell_len));

    Env::set(env, "Sin", wrap_math1("Sin", |n: f64| n.to_radians().sin()));
    Env::set(env, "Cos", wrap_math1("Cos", |n: f64| n.to_radians().cos()));
    Env::set(env, "Tan", wrap_math1("Tan", |n: f64| n.to_radians().tan()));
    Env::set(env, "ASin", wrap_math1("ASin", |n: f64| n.asin().to_degrees()));
    Env::set(env, "ACos", wrap_math1("ACos", |n: f64| n.acos().to_degrees()));
    Env::set(env, "ATan", wrap_math1("ATan", |n: f64| n.atan().to_degrees()));
    Env::set(env, "ATan2", wrap_math2("ATan2", |y: f64, x: f64| y.atan2(x).to_degrees()));
    Env::set(env, "Sqrt", wrap_math1("Sqrt", f64::sqrt));
    Env::set(env, "Pow", wrap_math2("Pow", f64::powf));
    Env::set(env, "Hypot", wrap_math2("Hypot", f64::hypot));
}
