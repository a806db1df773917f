//! End-to-end scenarios against the public API, one per spec law/scenario
//! table rather than unit-level round trips (those live beside the code
//! in `src/json/*.rs`).

use exjson::value::Value;
use exjson::{api, json};

#[test]
fn object_with_nested_array_parses_and_reports_correct_length() {
    let doc = json::parse(br#"{"a":1,"b":[2,3]}"#).unwrap();
    let b = doc.arena.object_get(doc.root, b"b").expect("key b present");
    assert_eq!(doc.arena.array_len(b), 2);

    let rendered = json::to_string_compact(&doc.arena, doc.root);
    let reparsed = json::parse(rendered.as_bytes()).unwrap();
    assert!(exjson::equal(&doc.arena, doc.root, reparsed.root));
}

#[test]
fn object_equality_is_order_insensitive() {
    let a = json::parse(br#"{"a":1,"b":2}"#).unwrap();
    let b = json::parse(br#"{"b":2,"a":1}"#).unwrap();
    assert!(exjson::equal(&a.arena, a.root, b.root));
}

#[test]
fn unbalanced_open_bracket_is_rejected_by_parse_and_validate() {
    assert!(json::parse(b"[").is_err());
    assert!(json::validate(b"[").is_err());
}

#[test]
fn surrogate_pair_escape_is_preserved_as_twelve_raw_bytes() {
    let doc = json::parse(br#"{"a":"😀"}"#).unwrap();
    let value = doc.arena.object_get(doc.root, b"a").unwrap();
    match doc.arena.get(value) {
        Value::String(r) => assert_eq!(r.len(), 12),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn iterative_parser_accepts_depth_the_recursive_parser_may_reject() {
    let mut text = String::new();
    for _ in 0..4096 {
        text.push('[');
    }
    text.push('1');
    for _ in 0..4096 {
        text.push(']');
    }
    // Both outcomes are admissible for the recursive parser (spec §8
    // scenario 5) — only the iterative parser's success is a hard
    // requirement.
    assert!(json::parse_iterative(text.as_bytes()).is_ok());
}

#[test]
fn recursive_and_iterative_parsers_agree_on_accepted_input() {
    let text = br#"{"a":1,"b":[2,3,{"c":null}],"d":"hi","e":true,"f":false}"#;
    let a = json::parse(text).unwrap();
    let b = json::parse_iterative(text).unwrap();
    assert!(exjson::equal(&a.arena, a.root, b.root));
}

#[test]
fn validate_and_parse_agree_on_acceptance() {
    let inputs: &[&[u8]] = &[
        br#"{"a":1}"#,
        b"[1,2,3]",
        b"\"hi\"",
        b"true",
        b"null",
        b"1.5e10",
        b"{",
        b"[1,]",
        b"",
        b"   ",
    ];
    for input in inputs {
        assert_eq!(
            json::validate(input).is_ok(),
            json::parse(input).is_ok(),
            "validate/parse disagreed on {input:?}"
        );
    }
}

#[test]
fn reset_followed_by_reparse_behaves_like_a_fresh_arena() {
    let mut doc = json::parse(br#"{"a":1}"#).unwrap();
    let first_len = doc.arena.len();
    api::reset(&mut doc.arena);
    assert_eq!(doc.arena.len(), 0);

    let reparsed = json::parse(br#"{"a":1}"#).unwrap();
    assert_eq!(reparsed.arena.len(), first_len);
}

#[test]
fn pretty_print_keeps_arrays_compact_inside_indented_objects() {
    let doc = json::parse(br#"{"list":[1,2,3]}"#).unwrap();
    let rendered = api::stringify(&doc.arena, doc.root);
    assert!(rendered.contains("\"list\": [1, 2, 3]"));
}

/// Cross-check this crate's compact serializer against an independent
/// JSON implementation: `serde_json` must accept the text this crate
/// produces, and must read back the same scalars from it.
#[test]
fn compact_output_is_accepted_and_matches_under_serde_json() {
    let doc = json::parse(br#"{"a":1,"b":[2.5,"three",null,true,false],"c":{"d":"e"}}"#).unwrap();
    let rendered = json::to_string_compact(&doc.arena, doc.root);

    let parsed: serde_json::Value =
        serde_json::from_str(&rendered).expect("this crate's compact output must be valid JSON");

    assert_eq!(parsed["a"], serde_json::json!(1));
    assert_eq!(parsed["b"], serde_json::json!([2.5, "three", null, true, false]));
    assert_eq!(parsed["c"]["d"], serde_json::json!("e"));
}

/// Same cross-check for the pretty printer: indentation and newlines
/// must not change what the text parses to.
#[test]
fn pretty_output_is_accepted_and_matches_under_serde_json() {
    let doc = json::parse(br#"{"nested":{"x":[1,2,3],"y":"z"}}"#).unwrap();
    let rendered = api::stringify(&doc.arena, doc.root);

    let parsed: serde_json::Value =
        serde_json::from_str(&rendered).expect("this crate's pretty output must be valid JSON");

    assert_eq!(parsed["nested"]["x"], serde_json::json!([1, 2, 3]));
    assert_eq!(parsed["nested"]["y"], serde_json::json!("z"));
}
