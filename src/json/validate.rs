//! Tree-free structural validation (spec §4.6): confirms an input is
//! well-formed JSON without allocating a single [`Value`](crate::value::Value)
//! node. Shares the scanner with the two parsers so that "validates" and
//! "parses successfully" never disagree (spec §8 Law 4).

use super::scanner::{match_literal, scan_number, scan_string, skip_whitespace};
use super::MAX_DEPTH;
use crate::error::{ErrorCode, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
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

/// Validate `text` as a complete JSON document, returning `Ok(())` iff
/// [`super::recursive::parse`] (and [`super::iterative::parse_iterative`])
/// would also accept it.
pub fn validate(text: &[u8]) -> Result<(), ParseError> {
    if text.is_empty() {
        return Err(ParseError::new(ErrorCode::NoData, 0, "empty input"));
    }
    let mut pos = skip_whitespace(text, 0);
    if pos >= text.len() {
        return Err(ParseError::new(ErrorCode::NoData, pos, "no data after whitespace"));
    }

    let mut stack: Vec<(Kind, Expecting, bool)> = Vec::new();
    match text[pos] {
        b'{' => {
            stack.push((Kind::Object, Expecting::Key, true));
            pos += 1;
        }
        b'[' => {
            stack.push((Kind::Array, Expecting::Value, true));
            pos += 1;
        }
        _ => {
            pos = validate_scalar(text, pos)?;
        }
    }

    while let Some(&(kind, expecting, is_empty)) = stack.last() {
        pos = skip_whitespace(text, pos);
        match expecting {
            Expecting::Key => {
                if is_empty && text.get(pos) == Some(&b'}') {
                    pos += 1;
                    stack.pop();
                    mark_nonempty_and_advance(&mut stack);
                    continue;
                }
                if text.get(pos) != Some(&b'"') {
                    return Err(ParseError::new(
                        ErrorCode::ObjectKey,
                        pos,
                        "expected a string object key",
                    ));
                }
                let (_, _, after) = scan_string(text, pos)?;
                pos = after;
                set_top(&mut stack, kind, Expecting::Colon, is_empty);
            }
            Expecting::Colon => {
                if text.get(pos) != Some(&b':') {
                    return Err(ParseError::new(ErrorCode::ObjectKey, pos, "expected ':' after object key"));
                }
                pos += 1;
                set_top(&mut stack, kind, Expecting::Value, is_empty);
            }
            Expecting::Value => {
                if is_empty && kind == Kind::Array && text.get(pos) == Some(&b']') {
                    pos += 1;
                    stack.pop();
                    mark_nonempty_and_advance(&mut stack);
                    continue;
                }
                match text.get(pos) {
                    Some(b'{') | Some(b'[') => {
                        if stack.len() >= MAX_DEPTH {
                            let code = if text[pos] == b'{' {
                                ErrorCode::StackOverflowObject
                            } else {
                                ErrorCode::StackOverflowArray
                            };
                            return Err(ParseError::new(code, pos, "maximum nesting depth exceeded"));
                        }
                        let child_kind = if text[pos] == b'{' { Kind::Object } else { Kind::Array };
                        let child_expecting = if child_kind == Kind::Object {
                            Expecting::Key
                        } else {
                            Expecting::Value
                        };
                        stack.push((child_kind, child_expecting, true));
                        pos += 1;
                    }
                    _ => {
                        pos = validate_scalar(text, pos)?;
                        set_top(&mut stack, kind, Expecting::CommaOrClose, false);
                    }
                }
            }
            Expecting::CommaOrClose => {
                let closer = if kind == Kind::Array { b']' } else { b'}' };
                match text.get(pos) {
                    Some(&b) if b == closer => {
                        pos += 1;
                        stack.pop();
                        mark_nonempty_and_advance(&mut stack);
                    }
                    Some(b',') => {
                        pos += 1;
                        let next_expecting = if kind == Kind::Object {
                            Expecting::Key
                        } else {
                            Expecting::Value
                        };
                        set_top(&mut stack, kind, next_expecting, is_empty);
                    }
                    _ => {
                        return Err(ParseError::new(
                            ErrorCode::MalformedJson,
                            pos,
                            "expected ',' or closing bracket",
                        ))
                    }
                }
            }
        }
    }

    let end = skip_whitespace(text, pos);
    if end != text.len() {
        return Err(ParseError::new(
            ErrorCode::MalformedJson,
            end,
            "trailing data after root value",
        ));
    }
    Ok(())
}

fn set_top(stack: &mut [(Kind, Expecting, bool)], kind: Kind, expecting: Expecting, is_empty: bool) {
    if let Some(top) = stack.last_mut() {
        *top = (kind, expecting, is_empty);
    }
}

fn mark_nonempty_and_advance(stack: &mut [(Kind, Expecting, bool)]) {
    if let Some(top) = stack.last_mut() {
        top.1 = Expecting::CommaOrClose;
        top.2 = false;
    }
}

fn validate_scalar(bytes: &[u8], pos: usize) -> Result<usize, ParseError> {
    match bytes.get(pos) {
        Some(b'"') => {
            let (_, _, end) = scan_string(bytes, pos)?;
            Ok(end)
        }
        Some(b't') if match_literal(bytes, pos, b"true") => Ok(pos + 4),
        Some(b'f') if match_literal(bytes, pos, b"false") => Ok(pos + 5),
        Some(b'n') if match_literal(bytes, pos, b"null") => Ok(pos + 4),
        Some(b'-') | Some(b'0'..=b'9') => scan_number(bytes, pos),
        Some(_) => Err(ParseError::new(ErrorCode::InvalidJson, pos, "unexpected character")),
        None => Err(ParseError::new(ErrorCode::NoData, pos, "unexpected end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{parse, parse_iterative};

    #[test]
    fn accepts_what_recursive_parser_accepts() {
        let text = br#"{"a":[1,2,3],"b":"hi","c":null,"d":true}"#;
        assert!(validate(text).is_ok());
        assert!(parse(text).is_ok());
    }

    #[test]
    fn rejects_what_both_parsers_reject() {
        for text in [&b"{"[..], b"[1,]", b"{\"a\"}", b"tru"] {
            assert!(validate(text).is_err());
            assert!(parse(text).is_err());
            assert!(parse_iterative(text).is_err());
        }
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(validate(b"1 2").is_err());
    }
}
