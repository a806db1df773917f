//! Byte-level scanning primitives (spec §4.2): whitespace skipping,
//! literal byte-prefix matching, the five-state string scanner, and the
//! number lexer. Shared by the recursive parser, the iterative parser,
//! the validator, and the exJSON S-expression front end.

use crate::error::{ErrorCode, ParseError};

#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

pub fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Byte-prefix equality followed by consumption, as spec §4.2 describes
/// literal matching.
pub fn match_literal(bytes: &[u8], pos: usize, literal: &'static [u8]) -> bool {
    bytes.len() >= pos + literal.len() && &bytes[pos..pos + literal.len()] == literal
}

/// Characters allowed in an exJSON symbol (spec §4.7): alphanumeric plus
/// `_ - ? ! + * / < > =`.
#[inline]
pub fn is_symbol_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'_' | b'-' | b'?' | b'!' | b'+' | b'*' | b'/' | b'<' | b'>' | b'='
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringState {
    Initial,
    EscapeStart,
    /// `n` counts which of the four required hex digits is expected next.
    EscapeUnicodeByte(u8),
}

/// Scan a JSON string literal starting at the opening `"` at `pos`.
/// Returns `(body_start, body_end, end)`: the raw (un-decoded) body span
/// `[body_start, body_end)` between the quotes, and `end`, the index just
/// past the closing quote. Escapes are validated but not expanded — the
/// body span includes the raw escape bytes verbatim (spec §3, §4.2).
pub fn scan_string(bytes: &[u8], pos: usize) -> Result<(usize, usize, usize), ParseError> {
    debug_assert_eq!(bytes.get(pos), Some(&b'"'));
    let body_start = pos + 1;
    let mut i = body_start;
    let mut state = StringState::Initial;
    loop {
        let Some(&byte) = bytes.get(i) else {
            return Err(ParseError::new(
                ErrorCode::InvalidJson,
                i,
                "unterminated string literal",
            ));
        };
        match state {
            StringState::Initial => {
                if byte == b'"' {
                    return Ok((body_start, i, i + 1));
                }
                if byte == b'\\' {
                    state = StringState::EscapeStart;
                } else if byte < 0x20 {
                    return Err(ParseError::new(
                        ErrorCode::InvalidJson,
                        i,
                        "unescaped control character in string",
                    ));
                }
                i += 1;
            }
            StringState::EscapeStart => {
                match byte {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                        state = StringState::Initial;
                        i += 1;
                    }
                    b'u' => {
                        state = StringState::EscapeUnicodeByte(1);
                        i += 1;
                    }
                    _ => {
                        return Err(ParseError::new(
                            ErrorCode::InvalidJson,
                            i,
                            "invalid escape sequence",
                        ))
                    }
                }
            }
            StringState::EscapeUnicodeByte(n) => {
                if !byte.is_ascii_hexdigit() {
                    return Err(ParseError::new(
                        ErrorCode::InvalidJson,
                        i,
                        "invalid hex digit in \\u escape",
                    ));
                }
                state = if n == 4 {
                    StringState::Initial
                } else {
                    StringState::EscapeUnicodeByte(n + 1)
                };
                i += 1;
            }
        }
    }
}

/// Scan a JSON number at `pos`, returning the end index (exclusive). The
/// payload slice is `[pos, end)`; decoding to `f64` happens on demand via
/// [`str::parse`], never during scanning (spec's explicit non-goal on full
/// numeric decoding).
pub fn scan_number(bytes: &[u8], pos: usize) -> Result<usize, ParseError> {
    let mut i = pos;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    let digits_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if i == digits_start {
        return Err(ParseError::new(ErrorCode::InvalidJson, pos, "invalid number"));
    }
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > frac_start {
            i = j;
        }
    }
    if matches!(bytes.get(i), Some(&b'e') | Some(&b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(&b'+') | Some(&b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_string() {
        let (start, end, after) = scan_string(br#""hello""#, 0).unwrap();
        assert_eq!(&br#""hello""#[start..end], b"hello");
        assert_eq!(after, 7);
    }

    #[test]
    fn preserves_raw_surrogate_escapes() {
        let input: &[u8] = b"\"\\uD83D\\uDE00\"";
        let (start, end, _) = scan_string(input, 0).unwrap();
        assert_eq!(end - start, 12);
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(scan_string(br#""abc"#, 0).is_err());
    }

    #[test]
    fn rejects_bad_escape() {
        assert!(scan_string(br#""\q""#, 0).is_err());
    }

    #[test]
    fn scans_integer_and_float_and_exponent() {
        assert_eq!(scan_number(b"123,", 0).unwrap(), 3);
        assert_eq!(scan_number(b"-12.50]", 0).unwrap(), 6);
        assert_eq!(scan_number(b"1e10 ", 0).unwrap(), 4);
        assert_eq!(scan_number(b"-2.5e-3}", 0).unwrap(), 7);
    }
}
