//! A flat, collaborator-facing surface gathered in one place so a caller
//! who only wants "parse a string, get pretty text back" never has to
//! reach into [`crate::value`] internals directly.
//!
//! Most of this module is a thin restatement of functions that already
//! live closer to their data (`json::parse`, `value::equal`, ...),
//! re-exported here under one fixed verb set (`parse`, `validate`,
//! `equal`, `stringify`, `print`, `free`, `reset`, `cleanup`) so a caller
//! can reach the whole engine through a single module.

use crate::error::ParseError;
use crate::json::{self, Document};
use crate::value::{Value, ValueArena, ValueHandle};
use std::io::{self, Write};

/// Default buffer size for [`serialize_into`]'s caller-supplied sink;
/// growing the buffer and retrying is the caller's own responsibility.
pub const MAX_BUFFER_SIZE: usize = 256;

/// Recursive-descent parse. Alias of [`json::parse`].
pub fn parse(text: &[u8]) -> Result<Document<'_>, ParseError> {
    json::parse(text)
}

/// Explicit-stack parse bounded by [`json::MAX_DEPTH`]. Alias
/// of [`json::parse_iterative`].
pub fn parse_iterative(text: &[u8]) -> Result<Document<'_>, ParseError> {
    json::parse_iterative(text)
}

/// Tree-free structural validation. Alias of [`json::validate`].
pub fn validate(text: &[u8]) -> Result<(), ParseError> {
    json::validate(text)
}

/// Structural equality. Alias of [`crate::value::equal`].
pub fn equal(arena: &ValueArena, a: ValueHandle, b: ValueHandle) -> bool {
    crate::value::equal(arena, a, b)
}

/// Pretty-print `value` to a freshly allocated `String`.
pub fn stringify(arena: &ValueArena, value: ValueHandle) -> String {
    json::to_string_pretty(arena, value)
}

/// Pretty-print `value` to a caller-supplied byte sink.
pub fn print<W: Write>(arena: &ValueArena, value: ValueHandle, out: &mut W) -> io::Result<()> {
    json::write_pretty(arena, value, out)
}

/// Serialize `value` (compact form) into `buf`, returning the number of
/// bytes written, or `Err` if `buf` is too small.
pub fn serialize_into(arena: &ValueArena, value: ValueHandle, buf: &mut [u8]) -> Result<usize, ()> {
    let mut cursor = io::Cursor::new(&mut buf[..]);
    match json::write_compact(arena, value, &mut cursor) {
        Ok(()) => Ok(cursor.position() as usize),
        Err(_) => Err(()),
    }
}

/// Walk-and-release. A single [`ValueArena`] owns every node it allocates
/// and there is no per-value heap payload for a caller to leak
/// (evaluator-synthesized scalars are reference-counted
/// [`crate::value::Reference::Owned`] bytes dropped with their last
/// handle's backing [`Value`]), so there is nothing to walk: releasing a
/// value tree is exactly dropping (or [`reset`]ting) the arena that owns
/// it. Kept as a named no-op so that verb has a home for callers used to
/// an explicit free step.
pub fn free(_arena: &mut ValueArena, _value: ValueHandle) {}

/// Bulk pool reclaim. Alias of [`ValueArena::reset`].
pub fn reset(arena: &mut ValueArena) {
    arena.reset();
}

/// Zero-and-reset. Alias of [`ValueArena::cleanup`].
pub fn cleanup(arena: &mut ValueArena) {
    arena.cleanup();
}

/// A borrowed `(arena, handle)` pair that implements [`ptree::TreeItem`],
/// letting any value tree be rendered with `ptree::print_tree`. A
/// [`Value`] doesn't own its children directly — they're arena handles —
/// so `children()` re-collects each node's handles into a small owned
/// `Vec` of fresh `TreeView`s rather than borrowing a stored child list.
#[derive(Clone)]
pub struct TreeView<'arena, 'a> {
    arena: &'arena ValueArena<'a>,
    handle: ValueHandle,
    label: Option<String>,
}

impl<'arena, 'a> TreeView<'arena, 'a> {
    pub fn new(arena: &'arena ValueArena<'a>, handle: ValueHandle) -> Self {
        Self {
            arena,
            handle,
            label: None,
        }
    }

    fn labeled(arena: &'arena ValueArena<'a>, handle: ValueHandle, label: String) -> Self {
        Self {
            arena,
            handle,
            label: Some(label),
        }
    }
}

impl<'arena, 'a> ptree::TreeItem for TreeView<'arena, 'a> {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        match self.arena.get(self.handle) {
            Value::Null => write!(f, "null"),
            Value::Boolean(r) => write!(f, "bool {}", r.as_str()),
            Value::Number(r) => write!(f, "number {}", r.as_str()),
            Value::String(r) => write!(f, "string {:?}", r.as_str()),
            Value::Symbol(r) => write!(f, "symbol {}", r.as_str()),
            Value::Closure(_) => write!(f, "closure"),
            Value::Array(_) => write!(f, "array"),
            Value::Object(_) => write!(f, "object"),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        let kids: Vec<Self> = match self.arena.get(self.handle) {
            Value::Array(_) => self
                .arena
                .iter_array(self.handle)
                .map(|h| TreeView::new(self.arena, h))
                .collect(),
            Value::Object(_) => self
                .arena
                .iter_object(self.handle)
                .map(|(key, h)| TreeView::labeled(self.arena, h, key.as_str().to_string()))
                .collect(),
            _ => Vec::new(),
        };
        std::borrow::Cow::from(kids)
    }
}

/// Print `value`'s shape as an indented tree (distinct from
/// [`stringify`]'s JSON text). Backs the CLI's `--tree` debug flag.
pub fn print_tree(arena: &ValueArena, value: ValueHandle) -> io::Result<()> {
    ptree::print_tree(&TreeView::new(arena, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_and_reparse_round_trips() {
        let doc = parse(br#"{"a":1,"b":[2,3]}"#).unwrap();
        let text = stringify(&doc.arena, doc.root);
        let reparsed = parse(text.as_bytes()).unwrap();
        assert!(equal(&reparsed.arena, reparsed.root, doc.root) || equal(&doc.arena, doc.root, reparsed.root));
    }

    #[test]
    fn serialize_into_reports_overflow_on_a_too_small_buffer() {
        let doc = parse(br#"{"a":1,"b":[2,3]}"#).unwrap();
        let mut tiny = [0u8; 4];
        assert!(serialize_into(&doc.arena, doc.root, &mut tiny).is_err());
        let mut big = [0u8; 256];
        assert!(serialize_into(&doc.arena, doc.root, &mut big).is_ok());
    }

    #[test]
    fn reset_clears_the_arena() {
        let mut doc = parse(br#"[1,2,3]"#).unwrap();
        assert!(doc.arena.len() > 0);
        reset(&mut doc.arena);
        assert_eq!(doc.arena.len(), 0);
    }

    #[test]
    fn tree_view_walks_objects_and_arrays_without_panicking() {
        use ptree::TreeItem;
        let doc = parse(br#"{"a":1,"b":[2,3]}"#).unwrap();
        let view = TreeView::new(&doc.arena, doc.root);
        assert_eq!(view.children().len(), 2);
    }
}
