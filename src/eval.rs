//! The tree-walking evaluator. One `eval_expr` dispatches on AST variant for
//! both dialects; the handful of places dialects actually differ (how a
//! `FunctionCall`'s repeat count behaves) are the only branches on
//! [`Dialect`].

use crate::ast::Expr;
use crate::dialect::Dialect;
use crate::env::Env;
use crate::error::EvalError;
use crate::lexer::Op;
use crate::program_env::ProgramEnv;
use crate::value::{UserFunction, Value};

/// Evaluates one expression, returning its value and appending any strokes
/// it produced into `pe`'s buffer.
pub fn eval_expr(pe: &ProgramEnv, dialect: Dialect, expr: &Expr) -> Result<Value, EvalError> {
    log::trace!("dispatching {expr:?}");
    match expr {
        Expr::Number { value, negative } => {
            Ok(Value::Number(if *negative { -value } else { *value }))
        }
        Expr::String(s) => Ok(Value::String(s.clone())),
        Expr::Symbol(name) => Ok(pe.get(name)),
        Expr::Negative(inner) => {
            let v = eval_expr(pe, dialect, inner)?;
            Ok(Value::Number(-v.as_number("unary minus")?))
        }
        Expr::Operation { op, left, right } => {
            let l = eval_expr(pe, dialect, left)?;
            let r = eval_expr(pe, dialect, right)?;
            apply_operator(*op, &l, &r)
        }
        Expr::Modify { op, target, value } => {
            let current = pe.get(target);
            let rhs = eval_expr(pe, dialect, value)?;
            let updated = apply_operator(*op, &current, &rhs)?;
            pe.set(target, updated.clone());
            Ok(updated)
        }
        Expr::Assignment { target, value } => {
            let v = eval_expr(pe, dialect, value)?;
            pe.set(target, v.clone());
            Ok(v)
        }
        Expr::FunctionDef { params, body } => Ok(Value::UserFunction(std::rc::Rc::new(UserFunction {
            params: params.clone(),
            body: body.clone(),
            captured_env: pe.env.clone(),
        }))),
        Expr::FunctionCall { callee, args, repeat } => {
            let callee_val = eval_expr(pe, dialect, callee)?;
            let arg_vals = args
                .iter()
                .map(|a| eval_expr(pe, dialect, a))
                .collect::<Result<Vec<_>, _>>()?;
            let repeat_count = match (dialect, repeat) {
                (Dialect::V1, Some(r)) => eval_expr(pe, dialect, r)?.as_number("repeat count")? as i64,
                _ => 1,
            };
            let repeat_count = repeat_count.max(0);
            let mut result = Value::None;
            for _ in 0..repeat_count {
                result = call_value(pe, dialect, callee_val.clone(), arg_vals.clone())?;
            }
            Ok(result)
        }
        Expr::Array(elements) => {
            let values = elements
                .iter()
                .map(|e| eval_expr(pe, dialect, e))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(values))
        }
        Expr::Label => Err(EvalError::LabelInFunction),
    }
}

/// Evaluates a sequence of expressions, returning the last one's value (or
/// [`Value::None`] for an empty sequence).
pub fn eval_sequence(pe: &ProgramEnv, dialect: Dialect, body: &[Expr]) -> Result<Value, EvalError> {
    let mut result = Value::None;
    for expr in body {
        result = eval_expr(pe, dialect, expr)?;
    }
    Ok(result)
}

/// Applies a function or native function value to already-evaluated
/// arguments.
pub fn call_value(
    pe: &ProgramEnv,
    dialect: Dialect,
    callee: Value,
    args: Vec<Value>,
) -> Result<Value, EvalError> {
    match callee {
        Value::UserFunction(uf) => {
            if uf.params.len() != args.len() {
                return Err(EvalError::Arity {
                    name: "<function>".to_string(),
                    expected: uf.params.len(),
                    got: args.len(),
                });
            }
            let call_env = Env::make_child(&uf.captured_env);
            for (param, arg) in uf.params.iter().zip(args) {
                Env::set_new(&call_env, param, arg)?;
            }
            let call_pe = ProgramEnv {
                env: call_env,
                rng: pe.rng.clone(),
                strokes: pe.strokes.clone(),
                fork_requests: pe.fork_requests.clone(),
            };
            eval_sequence(&call_pe, dialect, &uf.body)
        }
        Value::NativeFunction(nf) => (nf.func)(pe, &args),
        other => Err(EvalError::NotAFunction {
            name: other.type_name().to_string(),
        }),
    }
}

fn apply_operator(op: Op, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let l = left.as_number("operator left operand")?;
    let r = right.as_number("operator right operand")?;
    let result = match op {
        Op::Assign => r,
        Op::Add => l + r,
        Op::Sub => l - r,
        Op::Mul => l * r,
        Op::Div => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            l / r
        }
        Op::Eq => bool_to_num(l == r),
        Op::Lt => bool_to_num(l < r),
        Op::Gt => bool_to_num(l > r),
        Op::Le => bool_to_num(l <= r),
        Op::Ge => bool_to_num(l >= r),
    };
    Ok(Value::Number(result))
}

fn bool_to_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
