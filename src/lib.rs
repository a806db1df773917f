//! exJSON: a zero-copy JSON parser/serializer and a small Lisp-family
//! interpreter ("exJSON") that extends JSON syntax with parenthesized
//! S-expressions evaluated over the same value tree.
//!
//! # Overview
//!
//! The crate is built from two layers that share one data model
//! ([`value`]):
//!
//! - [`json`] — a scanner, two parser front ends (a direct recursive
//!   descent and an explicit-stack iterative variant for inputs nested
//!   past the native call stack), a tree-free validator, and pretty/
//!   compact serializers. Every scalar stores a slice into the original
//!   input rather than an owned, decoded copy: numbers stay textual until
//!   a caller asks for a value, and string escapes are preserved verbatim
//!   rather than expanded.
//! - [`exjson`] — an S-expression front end layered on the JSON scanner,
//!   and a tree-walking evaluator with lexical environments, special
//!   forms, first-class closures, and a small arithmetic/list/object
//!   builtin library.
//!
//! # Example
//!
//! ```
//! use exjson::json;
//!
//! let doc = json::parse(br#"{"a": 1, "b": [2, 3]}"#).unwrap();
//! assert_eq!(json::to_string_compact(&doc.arena, doc.root), r#"{"a": 1, "b": [2, 3]}"#);
//! ```
//!
//! ```
//! use exjson::exjson as ex;
//! use exjson::json;
//! use exjson::value::{EnvArena, ValueArena};
//!
//! let source = b"(define (square x) (* x x)) (square 5)";
//! let mut arena = ValueArena::new(source);
//! let mut envs = EnvArena::new();
//! let global = ex::create_global_env(&mut envs);
//!
//! let mut pos = 0;
//! let mut result = arena.alloc(exjson::value::Value::Null);
//! while pos < source.len() {
//!     pos = json::scanner::skip_whitespace(source, pos);
//!     if pos >= source.len() {
//!         break;
//!     }
//!     let (form, end) = ex::sexpr::parse_form(source, pos, &mut arena).unwrap();
//!     result = ex::eval_top_level(&mut arena, &mut envs, form, global);
//!     pos = end;
//! }
//! assert_eq!(json::to_string_compact(&arena, result), "25");
//! ```

pub mod api;
pub mod error;
pub mod exjson;
pub mod json;
pub mod util;
pub mod value;

pub use error::{ErrorCode, ParseError};
pub use exjson::{eval, eval_top_level, EvalError};
pub use json::{parse, parse_iterative, validate, Document};
pub use value::{equal, EnvArena, Value, ValueArena};
