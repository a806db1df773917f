//! Native built-in routines: dispatched ahead of environment lookup
//! whenever the applied symbol matches one of these names exactly.

use crate::value::{equal, Reference, Value, ValueArena, ValueHandle};

use super::eval::EvalError;

/// Names recognized as built-ins before falling back to environment
/// lookup.
pub const NAMES: &[&str] = &[
    "+", "-", "*", "/", "=", "<", ">", "cons", "car", "cdr", "list", "null?", "length",
    "get-value", "has-key?", "string-append",
];

pub fn is_builtin(name: &[u8]) -> bool {
    NAMES.iter().any(|n| n.as_bytes() == name)
}

/// Apply the built-in named `name` to already-evaluated `args`.
pub fn apply<'a>(
    arena: &mut ValueArena<'a>,
    name: &[u8],
    args: &[ValueHandle],
) -> Result<ValueHandle, EvalError> {
    match name {
        b"+" => arithmetic(arena, args, 0.0, |acc, x| acc + x, |x| x),
        b"-" => subtract(arena, args),
        b"*" => arithmetic(arena, args, 1.0, |acc, x| acc * x, |x| x),
        b"/" => divide(arena, args),
        b"=" => {
            require_arity(args, 2, "=")?;
            Ok(arena.alloc(Value::Boolean(bool_ref(equal(arena, args[0], args[1])))))
        }
        b"<" => compare(arena, args, "<", |a, b| a < b),
        b">" => compare(arena, args, ">", |a, b| a > b),
        b"cons" => {
            require_arity(args, 2, "cons")?;
            let list = arena.deep_copy(args[1]);
            let item = arena.deep_copy(args[0]);
            let new_list = arena.empty_array();
            arena.array_push(new_list, item);
            for element in arena.iter_array(list).collect::<Vec<_>>() {
                arena.array_push(new_list, element);
            }
            Ok(new_list)
        }
        b"car" => {
            require_arity(args, 1, "car")?;
            arena
                .iter_array(args[0])
                .next()
                .ok_or_else(|| EvalError::new("car of empty list"))
        }
        b"cdr" => {
            require_arity(args, 1, "cdr")?;
            let mut items = arena.iter_array(args[0]);
            items
                .next()
                .ok_or_else(|| EvalError::new("cdr of empty list"))?;
            let rest: Vec<ValueHandle> = items.collect();
            let new_list = arena.empty_array();
            for element in rest {
                arena.array_push(new_list, element);
            }
            Ok(new_list)
        }
        b"list" => {
            let new_list = arena.empty_array();
            for &arg in args {
                let copied = arena.deep_copy(arg);
                arena.array_push(new_list, copied);
            }
            Ok(new_list)
        }
        b"null?" => {
            require_arity(args, 1, "null?")?;
            let is_null = matches!(arena.get(args[0]), Value::Null) || arena.array_len(args[0]) == 0
                && matches!(arena.get(args[0]), Value::Array(_));
            Ok(arena.alloc(Value::Boolean(bool_ref(is_null))))
        }
        b"length" => {
            require_arity(args, 1, "length")?;
            let len = match arena.get(args[0]) {
                Value::Array(_) => arena.array_len(args[0]),
                Value::String(r) => r.len(),
                _ => return Err(EvalError::new("length expects a list or string")),
            };
            Ok(arena.alloc(Value::Number(Reference::owned(format_number(len as f64)))))
        }
        b"get-value" => {
            require_arity(args, 2, "get-value")?;
            let key = expect_string(arena, args[1], "get-value")?;
            Ok(arena
                .object_get(args[0], &key)
                .unwrap_or_else(|| arena.alloc(Value::Null)))
        }
        b"has-key?" => {
            require_arity(args, 2, "has-key?")?;
            let key = expect_string(arena, args[1], "has-key?")?;
            Ok(arena.alloc(Value::Boolean(bool_ref(arena.object_has_key(args[0], &key)))))
        }
        b"string-append" => {
            let mut out = Vec::new();
            for &arg in args {
                out.extend_from_slice(&expect_string(arena, arg, "string-append")?);
            }
            Ok(arena.alloc(Value::String(Reference::owned(out))))
        }
        _ => Err(EvalError::new(format!(
            "unknown built-in {}",
            String::from_utf8_lossy(name)
        ))),
    }
}

fn bool_ref(value: bool) -> Reference<'static> {
    Reference::Borrowed(if value { b"true" } else { b"false" })
}

fn require_arity(args: &[ValueHandle], arity: usize, name: &str) -> Result<(), EvalError> {
    if args.len() != arity {
        return Err(EvalError::new(format!(
            "{name} expects {arity} argument(s), got {}",
            args.len()
        )));
    }
    Ok(())
}

fn expect_number(arena: &ValueArena, handle: ValueHandle, name: &str) -> Result<f64, EvalError> {
    match arena.get(handle) {
        Value::Number(r) => r
            .as_str()
            .trim()
            .parse()
            .map_err(|_| EvalError::new(format!("{name}: invalid number literal"))),
        _ => Err(EvalError::new(format!("{name} expects a number"))),
    }
}

fn expect_string(arena: &ValueArena, handle: ValueHandle, name: &str) -> Result<Vec<u8>, EvalError> {
    match arena.get(handle) {
        Value::String(r) | Value::Symbol(r) => Ok(r.as_bytes().to_vec()),
        _ => Err(EvalError::new(format!("{name} expects a string"))),
    }
}

fn arithmetic<'a>(
    arena: &mut ValueArena<'a>,
    args: &[ValueHandle],
    identity: f64,
    fold: impl Fn(f64, f64) -> f64,
    unary: impl Fn(f64) -> f64,
) -> Result<ValueHandle, EvalError> {
    if args.is_empty() {
        return Err(EvalError::new("arithmetic built-ins require at least one argument"));
    }
    let values: Result<Vec<f64>, EvalError> = args
        .iter()
        .map(|&a| expect_number(arena, a, "arithmetic"))
        .collect();
    let values = values?;
    let result = if values.len() == 1 {
        unary(values[0])
    } else {
        values.into_iter().fold(identity, fold)
    };
    Ok(arena.alloc(Value::Number(Reference::owned(format_number(result)))))
}

/// Unlike `+`/`*`, subtraction isn't associative, so it can't fold the
/// identity in as if it were an operand (`(- 5 1)` is `5 - 1`, not
/// `0 - 5 - 1`). Seeds the accumulator with the first operand instead,
/// the same shape `divide` below already uses for `/`.
fn subtract<'a>(arena: &mut ValueArena<'a>, args: &[ValueHandle]) -> Result<ValueHandle, EvalError> {
    if args.is_empty() {
        return Err(EvalError::new("- requires at least one argument"));
    }
    let values: Result<Vec<f64>, EvalError> = args.iter().map(|&a| expect_number(arena, a, "-")).collect();
    let values = values?;
    let result = if values.len() == 1 {
        -values[0]
    } else {
        let mut acc = values[0];
        for &v in &values[1..] {
            acc -= v;
        }
        acc
    };
    Ok(arena.alloc(Value::Number(Reference::owned(format_number(result)))))
}

fn divide<'a>(arena: &mut ValueArena<'a>, args: &[ValueHandle]) -> Result<ValueHandle, EvalError> {
    if args.is_empty() {
        return Err(EvalError::new("/ requires at least one argument"));
    }
    let values: Result<Vec<f64>, EvalError> = args.iter().map(|&a| expect_number(arena, a, "/")).collect();
    let values = values?;
    let result = if values.len() == 1 {
        if values[0] == 0.0 {
            return Err(EvalError::new("division by zero"));
        }
        1.0 / values[0]
    } else {
        let mut acc = values[0];
        for &v in &values[1..] {
            if v == 0.0 {
                return Err(EvalError::new("division by zero"));
            }
            acc /= v;
        }
        acc
    };
    Ok(arena.alloc(Value::Number(Reference::owned(format_number(result)))))
}

fn compare<'a>(
    arena: &mut ValueArena<'a>,
    args: &[ValueHandle],
    name: &str,
    cmp: impl Fn(f64, f64) -> bool,
) -> Result<ValueHandle, EvalError> {
    require_arity(args, 2, name)?;
    let a = expect_number(arena, args[0], name)?;
    let b = expect_number(arena, args[1], name)?;
    Ok(arena.alloc(Value::Boolean(bool_ref(cmp(a, b)))))
}

/// Format like C's `"%g"` with the default precision of 6 significant
/// digits: fixed-point when the decimal exponent falls in `[-4,
/// precision)`, scientific notation outside that range, trailing zeros
/// (and a bare trailing `.`) stripped in both cases.
fn format_number(value: f64) -> String {
    format_g(value, 6)
}

fn format_g(value: f64, precision: i32) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }

    let sci = format!("{:.*e}", (precision - 1).max(0) as usize, value);
    let (mantissa, exponent) = sci.split_once('e').expect("scientific notation always has an exponent");
    let exponent: i32 = exponent.parse().expect("exponent is always a valid integer");

    if exponent < -4 || exponent >= precision {
        format!(
            "{}e{}{:02}",
            trim_trailing(mantissa),
            if exponent < 0 { "-" } else { "+" },
            exponent.abs()
        )
    } else {
        let decimals = (precision - 1 - exponent).max(0) as usize;
        trim_trailing(&format!("{value:.decimals$}")).to_string()
    }
}

/// Strip trailing zeros from a formatted decimal, then the decimal point
/// itself if nothing but zeros followed it (`"120.000"` -> `"120"`).
fn trim_trailing(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_and_formats_integral_results() {
        let mut arena = ValueArena::new(b"");
        let a = arena.alloc(Value::Number(Reference::Borrowed(b"2")));
        let b = arena.alloc(Value::Number(Reference::Borrowed(b"3")));
        let sum = apply(&mut arena, b"+", &[a, b]).unwrap();
        match arena.get(sum) {
            Value::Number(r) => assert_eq!(r.as_str(), "5"),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn car_and_cdr_split_a_list() {
        let mut arena = ValueArena::new(b"");
        let list = arena.empty_array();
        let one = arena.alloc(Value::Number(Reference::Borrowed(b"1")));
        let two = arena.alloc(Value::Number(Reference::Borrowed(b"2")));
        arena.array_push(list, one);
        arena.array_push(list, two);
        let head = apply(&mut arena, b"car", &[list]).unwrap();
        assert!(matches!(arena.get(head), Value::Number(_)));
        let tail = apply(&mut arena, b"cdr", &[list]).unwrap();
        assert_eq!(arena.array_len(tail), 1);
    }

    #[test]
    fn multi_argument_subtract_folds_left_from_the_first_operand() {
        let mut arena = ValueArena::new(b"");
        let numbers = |arena: &mut ValueArena, lits: &[&[u8]]| -> Vec<ValueHandle> {
            lits.iter()
                .map(|&lit| arena.alloc(Value::Number(Reference::Borrowed(lit))))
                .collect()
        };
        let args = numbers(&mut arena, &[b"5", b"1"]);
        let result = apply(&mut arena, b"-", &args).unwrap();
        match arena.get(result) {
            Value::Number(r) => assert_eq!(r.as_str(), "4"),
            other => panic!("expected number, got {other:?}"),
        }

        let args = numbers(&mut arena, &[b"10", b"2", b"3"]);
        let result = apply(&mut arena, b"-", &args).unwrap();
        match arena.get(result) {
            Value::Number(r) => assert_eq!(r.as_str(), "5"),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn unary_subtract_still_negates() {
        let mut arena = ValueArena::new(b"");
        let five = arena.alloc(Value::Number(Reference::Borrowed(b"5")));
        let result = apply(&mut arena, b"-", &[five]).unwrap();
        match arena.get(result) {
            Value::Number(r) => assert_eq!(r.as_str(), "-5"),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn format_g_matches_cs_percent_g_default_precision() {
        assert_eq!(format_g(120.0, 6), "120");
        assert_eq!(format_g(1.0 / 3.0, 6), "0.333333");
        assert_eq!(format_g(1e16, 6), "1e+16");
        assert_eq!(format_g(1_000_000.0, 6), "1e+06");
        assert_eq!(format_g(100_000.0, 6), "100000");
        assert_eq!(format_g(-6.0, 6), "-6");
        assert_eq!(format_g(0.0001, 6), "0.0001");
        assert_eq!(format_g(0.00001, 6), "1e-05");
    }
}
