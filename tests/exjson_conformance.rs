//! End-to-end exJSON evaluator scenarios (spec §8).

use exjson::exjson as ex;
use exjson::value::{EnvArena, Value, ValueArena};
use exjson::{equal, json};

/// Evaluate every whitespace-separated top-level form in `source` against
/// one shared arena/environment, returning the last form's result as
/// compact JSON text, the way a REPL or the CLI's `--eval` mode would.
fn eval_source(source: &'static [u8]) -> String {
    let mut arena = ValueArena::new(source);
    let mut envs = EnvArena::new();
    let global = ex::create_global_env(&mut envs);

    let mut pos = json::scanner::skip_whitespace(source, 0);
    let mut last = arena.alloc(Value::Null);
    while pos < source.len() {
        let (form, end) = ex::sexpr::parse_form(source, pos, &mut arena).unwrap();
        last = ex::eval_top_level(&mut arena, &mut envs, form, global);
        pos = json::scanner::skip_whitespace(source, end);
    }
    json::to_string_compact(&arena, last)
}

#[test]
fn sums_a_flat_argument_list() {
    assert_eq!(eval_source(b"(+ 1 2 3)"), "6");
}

#[test]
fn recursive_factorial_via_define_and_if() {
    assert_eq!(
        eval_source(b"(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 5)"),
        "120"
    );
}

#[test]
fn case_dispatches_to_the_matching_clause() {
    assert_eq!(
        eval_source(br#"(case 2 (1 "one") (2 "two") (else "?"))"#),
        "\"two\""
    );
}

#[test]
fn quote_returns_its_argument_unevaluated_for_every_shape() {
    assert_eq!(eval_source(b"(quote foo)"), "foo");
    assert_eq!(eval_source(b"(quote (1 2 3))"), "[1, 2, 3]");
    assert_eq!(eval_source(br#"(quote "a string")"#), "\"a string\"");
}

#[test]
fn identity_lambda_matches_direct_argument_evaluation() {
    assert_eq!(eval_source(b"((lambda (x) x) 42)"), "42");
}

#[test]
fn closures_capture_their_defining_environment_lexically() {
    // `make-adder` returns a closure over `n`; applying it later, from a
    // call site where `n` is not in scope, must still see the captured
    // binding (spec §9's lexical-scoping resolution of the Open Question).
    assert_eq!(
        eval_source(
            b"(define (make-adder n) (lambda (x) (+ x n))) \
              (define add5 (make-adder 5)) \
              (add5 10)"
        ),
        "15"
    );
}

#[test]
fn division_by_zero_folds_into_an_error_object_instead_of_panicking() {
    let rendered = eval_source(b"(/ 1 0)");
    assert!(rendered.contains("\"error\""));
}

#[test]
fn undefined_symbol_folds_into_an_error_object() {
    let rendered = eval_source(b"nope");
    assert!(rendered.contains("\"error\""));
}

#[test]
fn arity_mismatch_truncates_silently_per_spec() {
    // Extra params remain unbound, extra args are dropped — not an error.
    assert_eq!(eval_source(b"((lambda (x y) x) 1 2 3)"), "1");
}

#[test]
fn list_builtins_compose() {
    assert_eq!(eval_source(b"(car (cons 1 (list 2 3)))"), "1");
    assert_eq!(eval_source(b"(length (list 1 2 3))"), "3");
    assert_eq!(eval_source(b"(null? (list))"), "true");
}

#[test]
fn object_builtins_read_parsed_json_data() {
    assert_eq!(
        eval_source(br#"(get-value (quote {"a": 1}) "a")"#),
        "1"
    );
    assert_eq!(
        eval_source(br#"(has-key? (quote {"a": 1}) "b")"#),
        "false"
    );
}

#[test]
fn string_append_allocates_a_new_owned_string() {
    assert_eq!(
        eval_source(br#"(string-append "foo" "bar")"#),
        "\"foobar\""
    );
}

#[test]
fn structural_equality_matches_quoted_data_regardless_of_key_order() {
    assert_eq!(
        eval_source(br#"(= (quote {"a": 1, "b": 2}) (quote {"b": 2, "a": 1}))"#),
        "true"
    );
}

#[test]
fn trailing_content_after_a_single_top_level_form_is_rejected() {
    // Unified trailing-content rule (spec §9's second Open Question).
    assert!(exjson::exjson::parse(b"(+ 1 2) 3").is_err());
}

#[test]
fn bare_json_values_delegate_to_the_json_parser_within_exjson() {
    let doc = exjson::exjson::parse(br#"{"a":1}"#).unwrap();
    let other = json::parse(br#"{"a":1}"#).unwrap();
    assert!(equal(&doc.arena, doc.root, other.root));
}
