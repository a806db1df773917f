//! Pretty/compact serialization (spec §4.6): strings, numbers, booleans
//! and null echo their raw source bytes verbatim — no re-escaping or
//! numeric re-encoding, since nothing in this layer ever decoded them in
//! the first place.

use crate::value::{Value, ValueArena, ValueHandle};
use std::io::{self, Write};

const INDENT_WIDTH: usize = 4;

/// Render `value` with one object key per line, four-space indentation
/// per nesting depth. Arrays are always rendered compact, matching the
/// spec's explicit pretty/compact asymmetry.
pub fn to_string_pretty(arena: &ValueArena, value: ValueHandle) -> String {
    let mut out = Vec::new();
    write_pretty(arena, value, &mut out).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(out).expect("serialized output is always valid UTF-8")
}

/// Render `value` as `{k: v, k: v}` / `[v, v]`, single spaces after `:`
/// and `,`, no newlines.
pub fn to_string_compact(arena: &ValueArena, value: ValueHandle) -> String {
    let mut out = Vec::new();
    write_compact(arena, value, &mut out).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(out).expect("serialized output is always valid UTF-8")
}

pub fn write_pretty<W: Write>(arena: &ValueArena, value: ValueHandle, out: &mut W) -> io::Result<()> {
    write_pretty_at(arena, value, out, 0)
}

pub fn write_compact<W: Write>(arena: &ValueArena, value: ValueHandle, out: &mut W) -> io::Result<()> {
    match arena.get(value) {
        Value::Null => out.write_all(b"null"),
        Value::Boolean(r) => out.write_all(r.as_bytes()),
        Value::Number(r) => out.write_all(r.as_bytes()),
        Value::String(r) => write_quoted(out, r.as_bytes()),
        Value::Symbol(r) => write_quoted(out, r.as_bytes()),
        Value::Array(_) => {
            out.write_all(b"[")?;
            for (i, item) in arena.iter_array(value).enumerate() {
                if i > 0 {
                    out.write_all(b", ")?;
                }
                write_compact(arena, item, out)?;
            }
            out.write_all(b"]")
        }
        Value::Object(_) => {
            out.write_all(b"{")?;
            for (i, (key, item)) in arena.iter_object(value).enumerate() {
                if i > 0 {
                    out.write_all(b", ")?;
                }
                write_quoted(out, key.as_bytes())?;
                out.write_all(b": ")?;
                write_compact(arena, item, out)?;
            }
            out.write_all(b"}")
        }
        Value::Closure(_) => out.write_all(b"\"<closure>\""),
    }
}

fn write_pretty_at<W: Write>(
    arena: &ValueArena,
    value: ValueHandle,
    out: &mut W,
    depth: usize,
) -> io::Result<()> {
    match arena.get(value) {
        Value::Object(_) => {
            let mut entries = arena.iter_object(value).peekable();
            if entries.peek().is_none() {
                return out.write_all(b"{}");
            }
            out.write_all(b"{\n")?;
            let inner_indent = " ".repeat((depth + 1) * INDENT_WIDTH);
            while let Some((key, item)) = entries.next() {
                out.write_all(inner_indent.as_bytes())?;
                write_quoted(out, key.as_bytes())?;
                out.write_all(b": ")?;
                write_pretty_at(arena, item, out, depth + 1)?;
                if entries.peek().is_some() {
                    out.write_all(b",")?;
                }
                out.write_all(b"\n")?;
            }
            out.write_all(" ".repeat(depth * INDENT_WIDTH).as_bytes())?;
            out.write_all(b"}")
        }
        // Arrays are always compact, even under write_pretty (spec §4.6).
        Value::Array(_) | Value::Null | Value::Boolean(_) | Value::Number(_) | Value::String(_)
        | Value::Symbol(_) | Value::Closure(_) => write_compact(arena, value, out),
    }
}

fn write_quoted<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(b"\"")?;
    out.write_all(bytes)?;
    out.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::recursive::parse;

    #[test]
    fn compact_round_trips_structure() {
        let doc = parse(br#"{"a":1,"b":[2,3],"c":"x"}"#).unwrap();
        let rendered = to_string_compact(&doc.arena, doc.root);
        assert_eq!(rendered, r#"{"a": 1, "b": [2, 3], "c": "x"}"#);
    }

    #[test]
    fn pretty_indents_objects_but_keeps_arrays_compact() {
        let doc = parse(br#"{"a":1,"b":{"c":2}}"#).unwrap();
        let rendered = to_string_pretty(&doc.arena, doc.root);
        assert_eq!(rendered, "{\n    \"a\": 1,\n    \"b\": {\n        \"c\": 2\n    }\n}");
    }

    #[test]
    fn pretty_renders_empty_object_compact() {
        let doc = parse(b"{}").unwrap();
        assert_eq!(to_string_pretty(&doc.arena, doc.root), "{}");
    }

    #[test]
    fn strings_are_echoed_without_re_escaping() {
        let doc = parse(br#"{"a":"line\nbreak"}"#).unwrap();
        assert_eq!(to_string_compact(&doc.arena, doc.root), r#"{"a": "line\nbreak"}"#);
    }
}
