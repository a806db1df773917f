use super::{Value, ValueArena, ValueHandle};

/// Structural equality: tags must match; scalars
/// compare by slice bytes; arrays compare element-by-element in order;
/// objects compare order-insensitively — every key in `a` must exist in
/// `b` with an equal value, and vice versa so the relation stays
/// symmetric.
pub fn equal<'a>(arena: &ValueArena<'a>, a: ValueHandle, b: ValueHandle) -> bool {
    match (arena.get(a), arena.get(b)) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x.as_bytes() == y.as_bytes(),
        (Value::Number(x), Value::Number(y)) => {
            x.as_bytes() == y.as_bytes() || parse_f64(x.as_str()) == parse_f64(y.as_str())
        }
        (Value::String(x), Value::String(y)) => x.as_bytes() == y.as_bytes(),
        (Value::Symbol(x), Value::Symbol(y)) => x.as_bytes() == y.as_bytes(),
        (Value::Array(_), Value::Array(_)) => {
            let mut left = arena.iter_array(a);
            let mut right = arena.iter_array(b);
            loop {
                match (left.next(), right.next()) {
                    (None, None) => return true,
                    (Some(lv), Some(rv)) => {
                        if !equal(arena, lv, rv) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        (Value::Object(_), Value::Object(_)) => {
            let a_len = arena.iter_object(a).count();
            let b_len = arena.iter_object(b).count();
            if a_len != b_len {
                return false;
            }
            arena.iter_object(a).all(|(key, value)| {
                arena
                    .object_get(b, key.as_bytes())
                    .map_or(false, |other| equal(arena, value, other))
            })
        }
        (Value::Closure(_), Value::Closure(_)) => false,
        _ => false,
    }
}

fn parse_f64(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}
