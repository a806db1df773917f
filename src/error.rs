//! Error taxonomy for the JSON/exJSON engine (spec §6-7).
//!
//! [`ErrorCode`] mirrors the original `E_*` enumeration one-for-one so that
//! an FFI boundary or a caller used to the C numbering can still map a
//! result back to a familiar name. [`ParseError`] is the richer sum type
//! §9 asks for: a code plus a byte offset into the source plus a message,
//! rather than a bare integer.

use crate::util::Position;
use std::fmt::{Display, Formatter};

/// Named parse/validation failure kinds, matching the `E_*` table of spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,
    NoData,
    InvalidJson,
    InvalidJsonData,
    StackOverflowObject,
    StackOverflowArray,
    ObjectKey,
    ObjectValue,
    ExpectedObject,
    ExpectedArray,
    ExpectedString,
    ExpectedBoolean,
    ExpectedNull,
    InvalidData,
    MalformedJson,
    UnknownError,
    Null,
}

impl ErrorCode {
    /// The fixed human-readable string for this error kind (the `E_*`
    /// string table of spec §6).
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::NoError => "No error occurred",
            ErrorCode::NoData => "No data provided or empty input",
            ErrorCode::InvalidJson => "Invalid JSON structure",
            ErrorCode::InvalidJsonData => "Invalid data within JSON structure",
            ErrorCode::StackOverflowObject => "Stack overflow while parsing object",
            ErrorCode::StackOverflowArray => "Stack overflow while parsing array",
            ErrorCode::ObjectKey => "Invalid object key format",
            ErrorCode::ObjectValue => "Invalid object value",
            ErrorCode::ExpectedObject => "Expected object but found different type",
            ErrorCode::ExpectedArray => "Expected array but found different type",
            ErrorCode::ExpectedString => "Expected string but found different type",
            ErrorCode::ExpectedBoolean => "Expected boolean but found different type",
            ErrorCode::ExpectedNull => "Expected null but found different type",
            ErrorCode::InvalidData => "Invalid data format",
            ErrorCode::MalformedJson => "Malformed JSON structure",
            ErrorCode::UnknownError => "Unknown or unexpected error",
            ErrorCode::Null => "Null pointer encountered",
        }
    }

    pub fn is_no_error(&self) -> bool {
        matches!(self, ErrorCode::NoError)
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A parse or validation failure, carrying the byte offset it was detected
/// at so a caller can resolve it to a [`Position`] via [`Code`](crate::util::Code).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub code: ErrorCode,
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(code: ErrorCode, pointer: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            pointer,
            message: message.into(),
        }
    }

    pub fn at_position(&self, position: Position) -> String {
        format!("{} at {}: {}", self.code, position, self.message)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}: {}", self.code, self.pointer, self.message)
    }
}

impl std::error::Error for ParseError {}
