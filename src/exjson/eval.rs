//! The exJSON evaluator: dispatch by value tag, special forms that see
//! their operands unevaluated, and built-in/closure application over
//! everything else.

use std::fmt::{Display, Formatter};

use crate::value::{equal, Closure, EnvArena, EnvHandle, Reference, Value, ValueArena, ValueHandle};

use super::builtins;

/// An evaluation failure (undefined symbol, wrong arity, type mismatch,
/// division by zero, no matching `case` clause...). Internal plumbing
/// propagates this with `?`; [`eval_top_level`] is the only place it
/// gets folded into an ordinary `{"error": "<message>"}` object value.
#[derive(Debug, Clone)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

const SPECIAL_FORMS: &[&[u8]] = &[b"quote", b"define", b"set!", b"if", b"lambda", b"case"];

pub fn is_special_form(name: &[u8]) -> bool {
    SPECIAL_FORMS.contains(&name)
}

/// Run [`eval`], and if it fails, return an ordinary
/// `{"error": "<message>"}` object instead of propagating a Rust error —
/// evaluation errors fold back into the value stream rather than
/// unwinding past the top level.
pub fn eval_top_level<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    value: ValueHandle,
    env: EnvHandle,
) -> ValueHandle {
    match eval(arena, envs, value, env) {
        Ok(result) => result,
        Err(err) => {
            let object = arena.empty_object();
            let message = arena.alloc(Value::String(Reference::owned(err.message.into_bytes())));
            arena.object_push(object, Reference::Borrowed(b"error"), message);
            object
        }
    }
}

/// Evaluate `value` in `env`. `if` and `case` tail positions loop instead
/// of recursing, so a long chain of `if`/`case` tail calls does not grow
/// the native stack.
pub fn eval<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    value: ValueHandle,
    env: EnvHandle,
) -> Result<ValueHandle, EvalError> {
    let mut value = value;
    let mut env = env;
    loop {
        match arena.get(value).clone() {
            Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Object(_)
            | Value::Closure(_) => return Ok(arena.deep_copy(value)),
            Value::Symbol(sym) => {
                return envs
                    .lookup(env, sym.as_bytes())
                    .ok_or_else(|| EvalError::new(format!("undefined symbol \"{}\"", sym.as_str())));
            }
            Value::Array(arr) => {
                if arr.head.is_none() {
                    return Ok(arena.deep_copy(value));
                }
                let items: Vec<ValueHandle> = arena.iter_array(value).collect();
                let head = items[0];

                if let Value::Symbol(sym) = arena.get(head).clone() {
                    match sym.as_bytes() {
                        b"quote" => {
                            require_arity(&items, 2, "quote")?;
                            return Ok(arena.deep_copy(items[1]));
                        }
                        b"define" => return eval_define(arena, envs, &items, env),
                        b"set!" => return eval_set(arena, envs, &items, env),
                        b"if" => {
                            require_arity(&items, 4, "if")?;
                            let cond = eval(arena, envs, items[1], env)?;
                            value = if truthy(arena, cond) { items[2] } else { items[3] };
                            continue;
                        }
                        b"lambda" => return eval_lambda(arena, &items, env),
                        b"case" => {
                            value = eval_case_tail(arena, envs, &items, env)?;
                            continue;
                        }
                        name if builtins::is_builtin(name) => {
                            let mut args = Vec::with_capacity(items.len() - 1);
                            for &item in &items[1..] {
                                args.push(eval(arena, envs, item, env)?);
                            }
                            return builtins::apply(arena, name, &args);
                        }
                        _ => {}
                    }
                }

                let mut evaluated = Vec::with_capacity(items.len());
                for &item in &items {
                    evaluated.push(eval(arena, envs, item, env)?);
                }
                return apply_closure(arena, envs, evaluated[0], &evaluated[1..]);
            }
        }
    }
}

fn truthy(arena: &ValueArena, value: ValueHandle) -> bool {
    match arena.get(value) {
        Value::Null => false,
        Value::Boolean(r) => r.as_bytes() != b"false",
        _ => true,
    }
}

fn require_arity(items: &[ValueHandle], arity: usize, form: &str) -> Result<(), EvalError> {
    if items.len() != arity {
        return Err(EvalError::new(format!(
            "{form} expects {} operand(s), got {}",
            arity - 1,
            items.len() - 1
        )));
    }
    Ok(())
}

fn eval_define<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    items: &[ValueHandle],
    env: EnvHandle,
) -> Result<ValueHandle, EvalError> {
    require_arity(items, 3, "define")?;
    match arena.get(items[1]).clone() {
        Value::Symbol(name) => {
            let val = eval(arena, envs, items[2], env)?;
            envs.define(env, name, val);
            Ok(val)
        }
        Value::Array(_) => {
            let parts: Vec<ValueHandle> = arena.iter_array(items[1]).collect();
            let name = match parts.first().map(|&p| arena.get(p).clone()) {
                Some(Value::Symbol(s)) => s,
                _ => return Err(EvalError::new("define: function name must be a symbol")),
            };
            let params = arena.empty_array();
            for &p in &parts[1..] {
                let copied = arena.deep_copy(p);
                arena.array_push(params, copied);
            }
            let body = arena.deep_copy(items[2]);
            let closure = arena.alloc(Value::Closure(Closure { params, body, env }));
            envs.define(env, name, closure);
            Ok(closure)
        }
        _ => Err(EvalError::new("define: expected a symbol or a function signature")),
    }
}

fn eval_set<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    items: &[ValueHandle],
    env: EnvHandle,
) -> Result<ValueHandle, EvalError> {
    require_arity(items, 3, "set!")?;
    let name = match arena.get(items[1]).clone() {
        Value::Symbol(s) => s,
        _ => return Err(EvalError::new("set!: expected a symbol")),
    };
    let val = eval(arena, envs, items[2], env)?;
    if envs.set(env, name.as_bytes(), val) {
        Ok(val)
    } else {
        Err(EvalError::new(format!("set!: undefined symbol \"{}\"", name.as_str())))
    }
}

fn eval_lambda<'a>(
    arena: &mut ValueArena<'a>,
    items: &[ValueHandle],
    env: EnvHandle,
) -> Result<ValueHandle, EvalError> {
    require_arity(items, 3, "lambda")?;
    let params = arena.deep_copy(items[1]);
    let body = arena.deep_copy(items[2]);
    Ok(arena.alloc(Value::Closure(Closure { params, body, env })))
}

/// Evaluate every non-final form of the matching `case` clause, then
/// return the final form's handle for the caller's loop to tail-evaluate.
fn eval_case_tail<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    items: &[ValueHandle],
    env: EnvHandle,
) -> Result<ValueHandle, EvalError> {
    if items.len() < 3 {
        return Err(EvalError::new("case expects a key and at least one clause"));
    }
    let key = eval(arena, envs, items[1], env)?;

    for &clause in &items[2..] {
        let parts: Vec<ValueHandle> = arena.iter_array(clause).collect();
        let Some(&pattern) = parts.first() else {
            return Err(EvalError::new("case: empty clause"));
        };
        let is_else = matches!(arena.get(pattern), Value::Symbol(s) if s.as_bytes() == b"else");
        if is_else || equal(arena, pattern, key) {
            let body = &parts[1..];
            if body.is_empty() {
                return Ok(arena.alloc(Value::Null));
            }
            for &form in &body[..body.len() - 1] {
                eval(arena, envs, form, env)?;
            }
            return Ok(body[body.len() - 1]);
        }
    }
    Err(EvalError::new("case: no matching clause"))
}

fn apply_closure<'a>(
    arena: &mut ValueArena<'a>,
    envs: &mut EnvArena<'a>,
    callee: ValueHandle,
    args: &[ValueHandle],
) -> Result<ValueHandle, EvalError> {
    let closure = match arena.get(callee).clone() {
        Value::Closure(c) => c,
        _ => return Err(EvalError::new("attempt to call a non-function value")),
    };
    let child = envs.create(Some(closure.env));
    let params: Vec<ValueHandle> = arena.iter_array(closure.params).collect();
    for (&param, &arg) in params.iter().zip(args.iter()) {
        if let Value::Symbol(name) = arena.get(param).clone() {
            envs.define(child, name, arg);
        }
    }
    eval(arena, envs, closure.body, child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exjson::sexpr::parse_form;
    use crate::json::scanner::skip_whitespace;

    /// Parse and evaluate every whitespace-separated top-level form in
    /// `source` against one shared arena/environment, as a REPL would,
    /// returning the last form's rendered result.
    fn run(source: &[u8]) -> String {
        let mut arena = ValueArena::new(source);
        let mut envs = EnvArena::new();
        let global = envs.create(None);
        let mut pos = skip_whitespace(source, 0);
        let mut last = arena.alloc(Value::Null);
        while pos < source.len() {
            let (form, end) = parse_form(source, pos, &mut arena).unwrap();
            last = eval_top_level(&mut arena, &mut envs, form, global);
            pos = skip_whitespace(source, end);
        }
        match arena.get(last) {
            Value::Number(r) => r.as_str().to_string(),
            Value::String(r) => r.as_str().to_string(),
            Value::Boolean(r) => r.as_str().to_string(),
            Value::Symbol(r) => r.as_str().to_string(),
            Value::Null => "null".to_string(),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn quote_returns_its_argument_unevaluated() {
        assert_eq!(run(b"(quote foo)"), "foo");
    }

    #[test]
    fn identity_lambda_matches_argument_evaluation() {
        assert_eq!(run(b"((lambda (x) x) 5)"), "5");
    }

    #[test]
    fn factorial_via_recursive_define() {
        assert_eq!(
            run(b"(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 5)"),
            "120"
        );
    }

    #[test]
    fn case_picks_the_matching_clause() {
        assert_eq!(run(b"(case 2 (1 \"one\") (2 \"two\") (else \"?\"))"), "two");
    }

    #[test]
    fn set_bang_updates_the_enclosing_binding() {
        assert_eq!(run(b"(define x 1) (set! x 2)"), "2");
    }

    #[test]
    fn undefined_symbol_folds_into_an_error_object() {
        let mut arena = ValueArena::new(b"");
        let mut envs = EnvArena::new();
        let global = envs.create(None);
        let symbol = arena.alloc(Value::Symbol(Reference::Borrowed(b"nope")));
        let result = eval_top_level(&mut arena, &mut envs, symbol, global);
        assert!(arena.object_has_key(result, b"error"));
    }
}
