//! Iterative JSON parser (spec §4.4): the same grammar as
//! [`super::recursive`], driven by an explicit `Vec`-backed stack of
//! parse frames instead of native recursion. Exists so that inputs nested
//! past the native call-stack limit can still be parsed, and to avoid
//! per-node recursive call overhead on very large documents.

use super::scanner::{match_literal, scan_number, scan_string, skip_whitespace};
use super::{Document, MAX_DEPTH};
use crate::error::{ErrorCode, ParseError};
use crate::value::{Reference, Value, ValueArena, ValueHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expecting {
    Value,
    Key,
    Colon,
    CommaOrClose,
}

struct Frame<'a> {
    handle: ValueHandle,
    kind: ContainerKind,
    expecting: Expecting,
    is_empty: bool,
    pending_key: Option<Reference<'a>>,
}

/// Parse `text` as a complete JSON document using an explicit work stack.
/// Produces results `equal` (spec §8 Law 3) to [`super::recursive::parse`]
/// on every accepted input, but tolerates nesting beyond the native stack
/// depth up to [`MAX_DEPTH`].
pub fn parse_iterative(text: &[u8]) -> Result<Document<'_>, ParseError> {
    if text.is_empty() {
        return Err(ParseError::new(ErrorCode::NoData, 0, "empty input"));
    }
    let mut arena = ValueArena::new(text);
    let mut pos = skip_whitespace(text, 0);
    if pos >= text.len() {
        return Err(ParseError::new(ErrorCode::NoData, pos, "no data after whitespace"));
    }

    let mut stack: Vec<Frame> = Vec::new();
    let root = match text[pos] {
        b'{' => {
            let handle = arena.empty_object();
            stack.push(Frame {
                handle,
                kind: ContainerKind::Object,
                expecting: Expecting::Key,
                is_empty: true,
                pending_key: None,
            });
            pos += 1;
            None
        }
        b'[' => {
            let handle = arena.empty_array();
            stack.push(Frame {
                handle,
                kind: ContainerKind::Array,
                expecting: Expecting::Value,
                is_empty: true,
                pending_key: None,
            });
            pos += 1;
            None
        }
        _ => {
            let (handle, end) = scan_scalar(text, pos, &mut arena)?;
            pos = end;
            Some(handle)
        }
    };

    let root = match root {
        Some(handle) => handle,
        None => drive(text, &mut pos, &mut arena, &mut stack)?,
    };

    let end = skip_whitespace(text, pos);
    if end != text.len() {
        return Err(ParseError::new(
            ErrorCode::MalformedJson,
            end,
            "trailing data after root value",
        ));
    }
    Ok(Document { arena, root })
}

fn drive<'a>(
    text: &'a [u8],
    pos: &mut usize,
    arena: &mut ValueArena<'a>,
    stack: &mut Vec<Frame<'a>>,
) -> Result<ValueHandle, ParseError> {
    loop {
        *pos = skip_whitespace(text, *pos);
        let depth = stack.len();
        let top = stack.last_mut().expect("drive called with an empty stack");

        match top.expecting {
            Expecting::Key => {
                if top.is_empty && text.get(*pos) == Some(&b'}') {
                    *pos += 1;
                    if let Some(done) = close_frame(arena, stack, *pos)? {
                        return Ok(done);
                    }
                    continue;
                }
                if text.get(*pos) != Some(&b'"') {
                    return Err(ParseError::new(
                        ErrorCode::ObjectKey,
                        *pos,
                        "expected a string object key",
                    ));
                }
                let (key_start, key_end, after) = scan_string(text, *pos)?;
                top.pending_key = Some(Reference::Borrowed(&text[key_start..key_end]));
                top.expecting = Expecting::Colon;
                *pos = after;
            }
            Expecting::Colon => {
                if text.get(*pos) != Some(&b':') {
                    return Err(ParseError::new(
                        ErrorCode::ObjectKey,
                        *pos,
                        "expected ':' after object key",
                    ));
                }
                top.expecting = Expecting::Value;
                *pos += 1;
            }
            Expecting::Value => {
                let is_array = top.kind == ContainerKind::Array;
                if top.is_empty && is_array && text.get(*pos) == Some(&b']') {
                    *pos += 1;
                    if let Some(done) = close_frame(arena, stack, *pos)? {
                        return Ok(done);
                    }
                    continue;
                }
                match text.get(*pos) {
                    Some(b'{') | Some(b'[') => {
                        if depth >= MAX_DEPTH {
                            let code = if text[*pos] == b'{' {
                                ErrorCode::StackOverflowObject
                            } else {
                                ErrorCode::StackOverflowArray
                            };
                            return Err(ParseError::new(code, *pos, "maximum nesting depth exceeded"));
                        }
                        let (handle, kind, expecting) = if text[*pos] == b'{' {
                            (arena.empty_object(), ContainerKind::Object, Expecting::Key)
                        } else {
                            (arena.empty_array(), ContainerKind::Array, Expecting::Value)
                        };
                        stack.push(Frame {
                            handle,
                            kind,
                            expecting,
                            is_empty: true,
                            pending_key: None,
                        });
                        *pos += 1;
                    }
                    _ => {
                        let (value, end) = scan_scalar(text, *pos, arena)?;
                        *pos = end;
                        attach_value(arena, stack, value);
                        let top = stack.last_mut().expect("stack non-empty after attach");
                        top.is_empty = false;
                        top.expecting = Expecting::CommaOrClose;
                    }
                }
            }
            Expecting::CommaOrClose => {
                let closer = if top.kind == ContainerKind::Array {
                    b']'
                } else {
                    b'}'
                };
                match text.get(*pos) {
                    Some(&b) if b == closer => {
                        *pos += 1;
                        if let Some(done) = close_frame(arena, stack, *pos)? {
                            return Ok(done);
                        }
                    }
                    Some(b',') => {
                        *pos = skip_whitespace(text, *pos + 1);
                        top.expecting = if top.kind == ContainerKind::Object {
                            Expecting::Key
                        } else {
                            Expecting::Value
                        };
                    }
                    _ => {
                        return Err(ParseError::new(
                            ErrorCode::MalformedJson,
                            *pos,
                            "expected ',' or closing bracket",
                        ))
                    }
                }
            }
        }
    }
}

/// Pop the top frame. If the stack is then empty, the popped container
/// *is* the parsed document and parsing is done. Otherwise attach it into
/// the new top frame's container and mark that frame ready for the next
/// comma-or-close.
fn close_frame<'a>(
    arena: &mut ValueArena<'a>,
    stack: &mut Vec<Frame<'a>>,
    _pos: usize,
) -> Result<Option<ValueHandle>, ParseError> {
    let finished = stack.pop().expect("close_frame called with an empty stack");
    if stack.is_empty() {
        return Ok(Some(finished.handle));
    }
    attach_value(arena, stack, finished.handle);
    let top = stack.last_mut().expect("stack non-empty after attach");
    top.is_empty = false;
    top.expecting = Expecting::CommaOrClose;
    Ok(None)
}

fn attach_value<'a>(arena: &mut ValueArena<'a>, stack: &mut [Frame<'a>], value: ValueHandle) {
    let top = stack.last_mut().expect("attach_value called with an empty stack");
    match top.kind {
        ContainerKind::Array => arena.array_push(top.handle, value),
        ContainerKind::Object => {
            let key = top
                .pending_key
                .take()
                .expect("object value attached without a pending key");
            arena.object_push(top.handle, key, value);
        }
    }
}

fn scan_scalar<'a>(
    bytes: &'a [u8],
    pos: usize,
    arena: &mut ValueArena<'a>,
) -> Result<(ValueHandle, usize), ParseError> {
    match bytes.get(pos) {
        Some(b'"') => {
            let (body_start, body_end, end) = scan_string(bytes, pos)?;
            let handle = arena.alloc(Value::String(Reference::Borrowed(
                &bytes[body_start..body_end],
            )));
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
        Some(b'-') | Some(b'0'..=b'9') => {
            let end = scan_number(bytes, pos)?;
            let handle = arena.alloc(Value::Number(Reference::Borrowed(&bytes[pos..end])));
            Ok((handle, end))
        }
        Some(_) => Err(ParseError::new(ErrorCode::InvalidJson, pos, "unexpected character")),
        None => Err(ParseError::new(ErrorCode::NoData, pos, "unexpected end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::recursive;
    use crate::value::equal;

    #[test]
    fn matches_recursive_parser_on_flat_input() {
        let text = br#"{"a":1,"b":[2,3],"c":null}"#;
        let a = parse_iterative(text).unwrap();
        let b = recursive::parse(text).unwrap();
        assert!(equal(&a.arena, a.root, b.root) || equal(&b.arena, b.root, a.root));
    }

    #[test]
    fn accepts_deeply_nested_arrays() {
        let mut text = String::new();
        for _ in 0..4096 {
            text.push('[');
        }
        text.push('1');
        for _ in 0..4096 {
            text.push(']');
        }
        assert!(parse_iterative(text.as_bytes()).is_ok());
    }

    #[test]
    fn rejects_past_max_depth() {
        let mut text = String::new();
        for _ in 0..(MAX_DEPTH + 2) {
            text.push('[');
        }
        for _ in 0..(MAX_DEPTH + 2) {
            text.push(']');
        }
        let err = parse_iterative(text.as_bytes()).unwrap_err();
        assert_eq!(err.code, ErrorCode::StackOverflowArray);
    }
}
