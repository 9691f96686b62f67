use super::errors::SparqlQueryGeneratorError;
use crate::sexpr_parser::{parse_lisp, Expression};

/// Right-associative fold of `elements` under a binary operator:
/// `(op a (op b (op c d)))`. With `types_along_path`, each nesting level
/// additionally carries its tag as a second operand:
/// `(op tag0 a (op tag1 b c))`.
pub fn binary_nesting(
    function: &str,
    elements: &[String],
    types_along_path: Option<&[String]>,
) -> Result<String, SparqlQueryGeneratorError> {
    if elements.len() < 2 {
        return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
            "binary nesting of '{}' needs at least 2 elements, got {}",
            function,
            elements.len()
        )));
    }
    match types_along_path {
        None => {
            if elements.len() == 2 {
                Ok(format!("({} {} {})", function, elements[0], elements[1]))
            } else {
                let rest = binary_nesting(function, &elements[1..], None)?;
                Ok(format!("({} {} {})", function, elements[0], rest))
            }
        }
        Some(tags) => {
            if tags.len() < elements.len() - 1 {
                return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
                    "binary nesting of '{}' got {} tags for {} elements",
                    function,
                    tags.len(),
                    elements.len()
                )));
            }
            if elements.len() == 2 {
                Ok(format!(
                    "({} {} {} {})",
                    function, tags[0], elements[0], elements[1]
                ))
            } else {
                let rest = binary_nesting(function, &elements[1..], Some(&tags[1..]))?;
                Ok(format!("({} {} {} {})", function, tags[0], elements[0], rest))
            }
        }
    }
}

/// Rewrite legacy encodings in a raw logical form:
/// - a superlative with more than 3 top-level elements gets its relation
///   chain folded into one nested JOIN, then truncated to 3 elements;
/// - every `_inv`-suffixed token becomes an explicit `(R base)` wrapper.
pub fn normalize(raw_lisp: &str) -> Result<String, SparqlQueryGeneratorError> {
    let expression = parse_lisp(raw_lisp)
        .map_err(|e| SparqlQueryGeneratorError::MalformedExpression(e.to_string()))?;

    let mut serialized = raw_lisp.to_string();
    if let Expression::Application(items) = &expression {
        let superlative = matches!(items.first().and_then(Expression::atom), Some("ARGMAX" | "ARGMIN"));
        if superlative && items.len() > 3 {
            let chain: Vec<String> = items[2..].iter().map(Expression::to_lisp).collect();
            let folded = binary_nesting("JOIN", &chain, None)?;
            serialized = format!("({} {} {})", items[0], items[1], folded);
        }
    }

    // Suffix rewriting has to see the textual token stream: the `_inv` marker
    // can sit directly against a closing paren.
    let rewritten: Vec<String> = serialized
        .split(' ')
        .map(|token| {
            if token.len() > 4 && token.ends_with("_inv") {
                format!("(R {})", &token[..token.len() - 4])
            } else if token.len() > 5 && token.ends_with("_inv)") {
                format!("(R {}))", &token[..token.len() - 5])
            } else {
                token.to_string()
            }
        })
        .collect();
    Ok(rewritten.join(" "))
}

/// Flatten the relation chain of a top-level superlative: `(ARGMAX base
/// (JOIN r1 (JOIN r2 r3)))` becomes `(ARGMAX base r1 r2 r3)`, so the clause
/// generator can walk the chain hop by hop instead of treating the
/// superlative as a binary function.
pub fn flatten_superlative(expression: Expression) -> Expression {
    match expression {
        Expression::Application(items)
            if matches!(items.first().and_then(Expression::atom), Some("ARGMAX" | "ARGMIN"))
                && items.len() >= 3
                && matches!(items[2], Expression::Application(_)) =>
        {
            let mut flattened = vec![items[0].clone(), items[1].clone()];
            collect_relations(&items[2], &mut flattened);
            Expression::Application(flattened)
        }
        other => other,
    }
}

fn collect_relations(expression: &Expression, out: &mut Vec<Expression>) {
    match expression {
        Expression::Atom(token) if token == "JOIN" => {}
        Expression::Atom(_) => out.push(expression.clone()),
        Expression::Application(items) => match items.first().and_then(Expression::atom) {
            Some("R") => out.push(expression.clone()),
            Some("JOIN") => {
                for item in items {
                    collect_relations(item, out);
                }
            }
            _ => {}
        },
    }
}
