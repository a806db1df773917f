//! S-expression parser: layered on the JSON scanner. A form
//! opening with `(` parses as an `Array` value of whitespace-separated
//! tokens; anything else delegates straight to the JSON recursive parser.

use crate::error::{ErrorCode, ParseError};
use crate::json::recursive::parse_value as parse_json_value;
use crate::json::scanner::{is_symbol_char, match_literal, scan_number, scan_string, skip_whitespace};
use crate::json::Document;
use crate::value::{Reference, Value, ValueArena, ValueHandle};

/// Parse a single top-level exJSON form: an S-expression, or any JSON
/// value. Per the unified trailing-content rule (documented in
/// `DESIGN.md`), any non-whitespace left over after the form is rejected,
/// matching the JSON parser's own end-of-input discipline.
pub fn parse(text: &[u8]) -> Result<Document<'_>, ParseError> {
    if text.is_empty() {
        return Err(ParseError::new(ErrorCode::NoData, 0, "empty input"));
    }
    let mut arena = ValueArena::new(text);
    let start = skip_whitespace(text, 0);
    if start >= text.len() {
        return Err(ParseError::new(ErrorCode::NoData, start, "no data after whitespace"));
    }
    let (root, end) = parse_form(text, start, &mut arena)?;
    let end = skip_whitespace(text, end);
    if end != text.len() {
        return Err(ParseError::new(
            ErrorCode::MalformedJson,
            end,
            "trailing data after root form",
        ));
    }
    Ok(Document { arena, root })
}

/// Parse a single form (S-expression or bare JSON value) starting at
/// `pos`, returning its handle and the index just past it. Used
/// internally by [`parse`] for the single-top-level-form entry point, and
/// exposed directly for callers (a REPL, the CLI driver) that need to
/// read one form at a time out of a buffer holding several.
pub fn parse_form<'a>(
    bytes: &'a [u8],
    pos: usize,
    arena: &mut ValueArena<'a>,
) -> Result<(ValueHandle, usize), ParseError> {
    match bytes.get(pos) {
        Some(b'(') => parse_list(bytes, pos, arena),
        Some(b'"') => {
            let (body_start, body_end, end) = scan_string(bytes, pos)?;
            let handle = arena.alloc(Value::String(Reference::Borrowed(&bytes[body_start..body_end])));
            Ok((handle, end))
        }
        Some(b't') if match_literal(bytes, pos, b"true") => {
            let handle = arena.alloc(Value::Boolean(Reference::Borrowed(&bytes[pos..pos + 4])));
            Ok((handle, pos + 4))
        }
        Some(b'f') if match_literal(bytes, pos, b"false") => {
            let handle = arena.alloc(Value::Boolean(Reference::Borrowed(&bytes[pos..pos + 5])));
            Ok((handle, pos + 5))
        }
        Some(b'n') if match_literal(bytes, pos, b"null") => {
            let handle = arena.alloc(Value::Null);
            Ok((handle, pos + 4))
        }
        Some(&byte) if byte.is_ascii_digit() || is_negative_number_start(bytes, pos) => {
            let end = scan_number(bytes, pos)?;
            let handle = arena.alloc(Value::Number(Reference::Borrowed(&bytes[pos..end])));
            Ok((handle, end))
        }
        Some(&byte) if is_symbol_char(byte) => {
            let end = scan_symbol(bytes, pos);
            let handle = arena.alloc(Value::Symbol(Reference::Borrowed(&bytes[pos..end])));
            Ok((handle, end))
        }
        Some(b'{') | Some(b'[') => parse_json_value(bytes, pos, arena),
        Some(_) => Err(ParseError::new(ErrorCode::InvalidJson, pos, "unexpected character in form")),
        None => Err(ParseError::new(ErrorCode::NoData, pos, "unexpected end of input")),
    }
}

fn is_negative_number_start(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos) == Some(&b'-') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
}

fn scan_symbol(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while bytes.get(i).is_some_and(|&b| is_symbol_char(b)) {
        i += 1;
    }
    i
}

fn parse_list<'a>(
    bytes: &'a [u8],
    pos: usize,
    arena: &mut ValueArena<'a>,
) -> Result<(ValueHandle, usize), ParseError> {
    debug_assert_eq!(bytes.get(pos), Some(&b'('));
    let list = arena.empty_array();
    let mut i = skip_whitespace(bytes, pos + 1);
    if bytes.get(i) == Some(&b')') {
        return Ok((list, i + 1));
    }
    loop {
        let (value, after) = parse_form(bytes, i, arena)?;
        arena.array_push(list, value);
        i = skip_whitespace(bytes, after);
        match bytes.get(i) {
            Some(b')') => return Ok((list, i + 1)),
            Some(_) => continue,
            None => {
                return Err(ParseError::new(
                    ErrorCode::MalformedJson,
                    i,
                    "unterminated S-expression",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn parses_flat_call_form() {
        let doc = parse(b"(+ 1 2)").unwrap();
        let Value::Array(_) = doc.value() else {
            panic!("expected array");
        };
        assert_eq!(doc.arena.array_len(doc.root), 3);
        let head = doc.arena.iter_array(doc.root).next().unwrap();
        assert!(matches!(doc.arena.get(head), Value::Symbol(_)));
    }

    #[test]
    fn parses_nested_forms() {
        let doc = parse(b"(define (f x) (* x x))").unwrap();
        assert_eq!(doc.arena.array_len(doc.root), 3);
    }

    #[test]
    fn delegates_bare_json_values_to_the_json_parser() {
        let doc = parse(br#"{"a":1}"#).unwrap();
        assert!(matches!(doc.value(), Value::Object(_)));
    }

    #[test]
    fn rejects_unterminated_list() {
        assert!(parse(b"(+ 1 2").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse(b"(+ 1 2) 3").is_err());
    }
}
