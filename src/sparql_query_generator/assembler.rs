use super::clause_generator::GeneratedClauses;
use super::var_unifier::VariableUnifier;
use crate::config::CompilerOptions;

/// Rewrite clauses to canonical variables, rename the question variable to
/// the public `?x`, append the language and entity-exclusion filters, and
/// wrap everything in the right top-level shape. Counting queries get a
/// `SELECT COUNT DISTINCT` header; superlative queries additionally nest a
/// `{SELECT ?sk0 ...}` subquery that repeats the pattern clauses and owns
/// the ORDER BY/LIMIT pair.
pub fn assemble(
    generated: GeneratedClauses,
    question_var: usize,
    unifier: &VariableUnifier,
    options: &CompilerOptions,
) -> String {
    let GeneratedClauses {
        mut clauses,
        order_clauses,
        entities,
        is_count,
        is_superlative,
    } = generated;

    // Every ?x<k> occurrence ends with a space in the emitted clauses, which
    // keeps ?x1 from matching inside ?x10. Sorted alias order makes the
    // rewrite deterministic.
    for clause in clauses.iter_mut() {
        for var in unifier.aliased_ids() {
            *clause = clause.replace(
                &format!("?x{} ", var),
                &format!("?x{} ", unifier.find(var)),
            );
        }
    }

    let question_var = unifier.find(question_var);
    for clause in clauses.iter_mut() {
        *clause = clause.replace(&format!("?x{} ", question_var), "?x ");
    }

    // The subquery of a superlative repeats the pattern clauses without the
    // entity filters, so clone before appending them.
    let arg_clauses = if is_superlative {
        clauses.clone()
    } else {
        Vec::new()
    };

    for entity in &entities {
        clauses.push(format!("FILTER (?x != ns:{})", entity));
    }
    clauses.insert(
        0,
        "FILTER (!isLiteral(?x) OR lang(?x) = '' OR langMatches(lang(?x), 'en'))".to_string(),
    );
    clauses.insert(0, "WHERE {".to_string());
    if is_count {
        clauses.insert(0, "SELECT COUNT DISTINCT ?x".to_string());
    } else if is_superlative {
        clauses.insert(0, "{SELECT ?sk0".to_string());
        let mut outer = arg_clauses;
        outer.append(&mut clauses);
        clauses = outer;
        clauses.insert(0, "WHERE {".to_string());
        clauses.insert(0, "SELECT DISTINCT ?x".to_string());
    } else {
        clauses.insert(0, "SELECT DISTINCT ?x".to_string());
    }
    clauses.insert(0, format!("PREFIX ns: <{}>", options.kb_prefix));

    clauses.push("}".to_string());
    clauses.extend(order_clauses);
    if is_superlative {
        clauses.push("}".to_string());
        clauses.push("}".to_string());
    }
    clauses.join("\n")
}
