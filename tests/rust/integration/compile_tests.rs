//! End-to-end compilation tests with golden SPARQL output.

use lisp2sparql::{compile, compile_with_options, CompilerOptions, SparqlQueryGeneratorError};

fn lines(parts: &[&str]) -> String {
    parts.join("\n")
}

#[test]
fn test_compile_simple_join_query() {
    let query = compile("(JOIN location.location.containedby m.02_286)").expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:location.location.containedby ns:m.02_286 .",
            "FILTER (?x != ns:m.02_286)",
            "}",
        ])
    );
}

#[test]
fn test_compile_join_with_inverse_suffix() {
    // `_inv` is a legacy encoding of a reverse relation; the normalizer turns
    // it into an (R ...) wrapper, which swaps subject and object.
    let query = compile("(JOIN people.person.parents_inv m.0h5k)").expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "ns:m.0h5k ns:people.person.parents ?x .",
            "FILTER (?x != ns:m.0h5k)",
            "}",
        ])
    );
}

#[test]
fn test_compile_conjunction_query() {
    let query = compile("(AND common.topic (JOIN location.location.containedby m.02_286))")
        .expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:location.location.containedby ns:m.02_286 .",
            "?x ns:type.object.type ns:common.topic .",
            "FILTER (?x != ns:m.02_286)",
            "}",
        ])
    );
}

#[test]
fn test_compile_count_query() {
    let query = compile("(COUNT (AND common.topic (JOIN location.location.containedby m.02_286)))")
        .expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT COUNT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:location.location.containedby ns:m.02_286 .",
            "?x ns:type.object.type ns:common.topic .",
            "FILTER (?x != ns:m.02_286)",
            "}",
        ])
    );
}

#[test]
fn test_compile_superlative_query() {
    let query = compile("(ARGMAX common.topic topic.alias)").expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "?x ns:type.object.type ns:common.topic .",
            "?x ns:topic.alias ?sk0 .",
            "{SELECT ?sk0",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:type.object.type ns:common.topic .",
            "?x ns:topic.alias ?sk0 .",
            "}",
            "ORDER BY DESC(?sk0)",
            "LIMIT 1",
            "}",
            "}",
        ])
    );
}

#[test]
fn test_compile_superlative_with_relation_chain() {
    // A multi-element superlative is first folded into one nested JOIN, then
    // unfolded into a relation chain walked hop by hop.
    let query = compile("(ARGMIN common.topic r1 r2)").expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "?x ns:type.object.type ns:common.topic .",
            "?x ns:r1 ?c0 .",
            "?c0 ns:r2 ?sk0 .",
            "{SELECT ?sk0",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:type.object.type ns:common.topic .",
            "?x ns:r1 ?c0 .",
            "?c0 ns:r2 ?sk0 .",
            "}",
            "ORDER BY ?sk0",
            "LIMIT 1",
            "}",
            "}",
        ])
    );
}

#[test]
fn test_compile_temporal_containment_query() {
    let query = compile("(TC (JOIN a m.1) government.position_held.from 2011)")
        .expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:a ns:m.1 .",
            "FILTER(NOT EXISTS {?x ns:government.position_held.from ?sk0} || ",
            "EXISTS {?x ns:government.position_held.from ?sk1 . ",
            "FILTER(xsd:datetime(?sk1) <= \"2011-12-31\"^^xsd:dateTime) })",
            "FILTER(NOT EXISTS {?x ns:government.position_held.to ?sk2} || ",
            "EXISTS {?x ns:government.position_held.to ?sk3 . ",
            "FILTER(xsd:datetime(?sk3) >= \"2011-01-01\"^^xsd:dateTime) })",
            "FILTER (?x != ns:m.1)",
            "}",
        ])
    );
}

#[test]
fn test_compile_comparative_query() {
    let query = compile(
        "(AND common.topic (lt topic.measurement 9.2^^http://www.w3.org/2001/XMLSchema#float))",
    )
    .expect("should compile");
    assert_eq!(
        query,
        lines(&[
            "PREFIX ns: <http://rdf.freebase.com/ns/>",
            "SELECT DISTINCT ?x",
            "WHERE {",
            "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))",
            "?x ns:topic.measurement ?y0 .",
            "FILTER (?y0 < \"9.2\"^^<http://www.w3.org/2001/XMLSchema#float>)",
            "?x ns:type.object.type ns:common.topic .",
            "}",
        ])
    );
}

#[test]
fn test_compile_non_numeric_literal_gets_utc_offset() {
    let query = compile(
        "(JOIN topic.date 1990-05^^http://www.w3.org/2001/XMLSchema#gYearMonth)",
    )
    .expect("should compile");
    assert!(
        query.contains("\"1990-05-08:00\"^^<http://www.w3.org/2001/XMLSchema#gYearMonth>"),
        "non-numeric literal must carry the corpus offset:\n{}",
        query
    );
}

#[test]
fn test_compile_is_deterministic() {
    let logical_form =
        "(AND (JOIN a m.2) (AND (JOIN b m.1) (TC (JOIN c m.2) topic.from 2001)))";
    let first = compile(logical_form).expect("should compile");
    let second = compile(logical_form).expect("should compile");
    assert_eq!(first, second);
}

#[test]
fn test_compile_with_custom_options() {
    let options = CompilerOptions {
        kb_prefix: "http://example.org/kb/".to_string(),
        now_instant: "2020-01-01".to_string(),
        ..Default::default()
    };
    let query = compile_with_options("(TC (JOIN a m.1) topic.from NOW)", &options)
        .expect("should compile");
    assert!(query.starts_with("PREFIX ns: <http://example.org/kb/>"));
    assert!(
        query.contains("\"2020-01-01\"^^xsd:dateTime"),
        "NOW must resolve to the configured instant:\n{}",
        query
    );
}

#[test]
fn test_compile_rejects_unbalanced_input() {
    let err = compile("(JOIN a b").expect_err("unbalanced input must fail");
    assert!(matches!(err, SparqlQueryGeneratorError::MalformedExpression(_)));
}

#[test]
fn test_compile_rejects_unknown_operator() {
    let err = compile("(FOO a m.1)").expect_err("unknown operator must fail");
    match err {
        SparqlQueryGeneratorError::UnsupportedOperator(op) => assert_eq!(op, "FOO"),
        other => panic!("Expected UnsupportedOperator, got {:?}", other),
    }
}

#[test]
fn test_compile_rejects_nested_count() {
    let err = compile("(COUNT (COUNT (JOIN a m.1)))").expect_err("nested COUNT must fail");
    assert!(matches!(err, SparqlQueryGeneratorError::CountNotOutermost(_)));
}

#[test]
fn test_compile_rejects_bad_literal() {
    let err = compile("(JOIN topic.date v^^garbage)").expect_err("bad literal must fail");
    assert!(matches!(err, SparqlQueryGeneratorError::InvalidLiteralFormat(_)));
}
