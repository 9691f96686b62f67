use log::debug;

use super::errors::SparqlQueryGeneratorError;
use super::linearizer::{Arg, SubFormula};
use super::var_unifier::VariableUnifier;
use crate::config::CompilerOptions;

/// Datatypes whose literal values pass through unmodified. Everything else
/// gets the corpus UTC offset appended (see `CompilerOptions`).
const PASSTHROUGH_DATATYPES: [&str; 4] = ["integer", "float", "dateTime", "double"];

/// Output of the single generation pass over the sub-formula arena.
#[derive(Debug, Default)]
pub struct GeneratedClauses {
    /// Triple patterns and FILTER/EXISTS fragments, in emission order.
    pub clauses: Vec<String>,
    /// ORDER BY / LIMIT lines, kept apart so the assembler can place them.
    pub order_clauses: Vec<String>,
    /// Entity ids referenced by the query, first-seen order, no duplicates.
    pub entities: Vec<String>,
    pub is_count: bool,
    pub is_superlative: bool,
}

/// Walk the sub-formulas in increasing id order and emit clauses per
/// operator, recording variable unifications on the way. Earlier ids are
/// guaranteed already processed, so every back-reference resolves.
pub fn generate(
    sub_formulas: &[SubFormula],
    unifier: &mut VariableUnifier,
    options: &CompilerOptions,
) -> Result<GeneratedClauses, SparqlQueryGeneratorError> {
    let mut generated = GeneratedClauses::default();

    for (i, sub_formula) in sub_formulas.iter().enumerate() {
        match sub_formula.operator.as_str() {
            "JOIN" => generate_join(sub_formula, i, &mut generated, options)?,
            "AND" => {
                let args = expect_args(sub_formula, i, 2)?;
                let var1 = resolve_reference(&args[1], i)?;
                unifier.union(i, var1);
                if args[0].back_reference().is_some() {
                    let var2 = resolve_reference(&args[0], i)?;
                    unifier.union(i, var2);
                } else {
                    let class = plain_token(&args[0], sub_formula, i)?;
                    generated
                        .clauses
                        .push(format!("?x{} ns:type.object.type ns:{} .", i, class));
                }
            }
            "le" | "lt" | "ge" | "gt" => {
                let args = expect_args(sub_formula, i, 2)?;
                let relation = plain_token(&args[0], sub_formula, i)?;
                let value_token = plain_token(&args[1], sub_formula, i)?;
                generated
                    .clauses
                    .push(format!("?x{} ns:{} ?y{} .", i, relation, i));
                let op = match sub_formula.operator.as_str() {
                    "le" => "<=",
                    "lt" => "<",
                    "ge" => ">=",
                    _ => ">",
                };
                let value = retype_literal(value_token, options)?;
                generated
                    .clauses
                    .push(format!("FILTER (?y{} {} {})", i, op, value));
            }
            "TC" => generate_temporal_containment(sub_formula, i, unifier, &mut generated, options)?,
            "ARGMAX" | "ARGMIN" => {
                generate_superlative(sub_formula, i, unifier, &mut generated)?
            }
            "COUNT" => {
                if generated.is_count {
                    return Err(SparqlQueryGeneratorError::CountNotOutermost(i));
                }
                let args = expect_args(sub_formula, i, 1)?;
                let var = resolve_reference(&args[0], i)?;
                unifier.alias_count(i, var)?;
                generated.is_count = true;
            }
            other => {
                return Err(SparqlQueryGeneratorError::UnsupportedOperator(
                    other.to_string(),
                ))
            }
        }
    }

    debug!(
        "generated {} clauses, {} order clauses, {} entities (count={}, superlative={})",
        generated.clauses.len(),
        generated.order_clauses.len(),
        generated.entities.len(),
        generated.is_count,
        generated.is_superlative
    );
    Ok(generated)
}

/// One triple pattern. Subject/object roles follow from what the operands
/// are: a reverse relation swaps them, entities become `ns:` ids, `#k`
/// back-references become `?x<k>` variables, and typed literals are retyped.
fn generate_join(
    sub_formula: &SubFormula,
    i: usize,
    generated: &mut GeneratedClauses,
    options: &CompilerOptions,
) -> Result<(), SparqlQueryGeneratorError> {
    let args = expect_args(sub_formula, i, 2)?;
    let object = plain_token(&args[1], sub_formula, i)?;
    match &args[0] {
        Arg::Reverse(relation) => {
            if args[1].is_entity() {
                generated
                    .clauses
                    .push(format!("ns:{} ns:{} ?x{} .", object, relation, i));
                record_entity(&mut generated.entities, object);
            } else if args[1].back_reference().is_some() {
                let reference = resolve_reference(&args[1], i)?;
                generated
                    .clauses
                    .push(format!("?x{} ns:{} ?x{} .", reference, relation, i));
            } else {
                // Literals only ever appear in object position; with the
                // relation reversed the literal takes the subject slot.
                let literal = retype_literal(object, options)?;
                generated
                    .clauses
                    .push(format!("{} ns:{} ?x{} .", literal, relation, i));
            }
        }
        Arg::Token(relation) => {
            if args[1].is_entity() {
                generated
                    .clauses
                    .push(format!("?x{} ns:{} ns:{} .", i, relation, object));
                record_entity(&mut generated.entities, object);
            } else if args[1].back_reference().is_some() {
                let reference = resolve_reference(&args[1], i)?;
                generated
                    .clauses
                    .push(format!("?x{} ns:{} ?x{} .", i, relation, reference));
            } else if object.contains("^^") {
                let literal = retype_literal(object, options)?;
                generated
                    .clauses
                    .push(format!("?x{} ns:{} {} .", i, relation, literal));
            } else {
                // Bare string object (WebQSP-style): bind it and compare by
                // string value rather than emitting an untyped literal.
                generated.clauses.push(format!("?x ns:{} ?obj .", relation));
                generated
                    .clauses
                    .push(format!("FILTER (str(?obj) = \"{}\") .", object));
            }
        }
    }
    Ok(())
}

/// Temporal containment: the interval named by a `from`/`to` relation pair
/// must contain the given year (or the reference instant for `NOW`). Each
/// bound is "relation absent, or its value on the right side of the year".
fn generate_temporal_containment(
    sub_formula: &SubFormula,
    i: usize,
    unifier: &mut VariableUnifier,
    generated: &mut GeneratedClauses,
    options: &CompilerOptions,
) -> Result<(), SparqlQueryGeneratorError> {
    let args = expect_args(sub_formula, i, 3)?;
    let var = resolve_reference(&args[0], i)?;
    unifier.union(i, var);

    let from_relation = plain_token(&args[1], sub_formula, i)?;
    let year = plain_token(&args[2], sub_formula, i)?;
    let (from_para, to_para) = if year == "NOW" {
        (
            format!("\"{}\"^^xsd:dateTime", options.now_instant),
            format!("\"{}\"^^xsd:dateTime", options.now_instant),
        )
    } else {
        (
            format!("\"{}-12-31\"^^xsd:dateTime", year),
            format!("\"{}-01-01\"^^xsd:dateTime", year),
        )
    };

    let to_relation = if let Some(stem) = from_relation.strip_suffix("from_date") {
        format!("{}to_date", stem)
    } else if let Some(stem) = from_relation.strip_suffix("from") {
        format!("{}to", stem)
    } else {
        return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
            "TC relation '{}' does not end in 'from' or 'from_date'",
            from_relation
        )));
    };

    generated
        .clauses
        .push(format!("FILTER(NOT EXISTS {{?x{} ns:{} ?sk0}} || ", i, from_relation));
    generated
        .clauses
        .push(format!("EXISTS {{?x{} ns:{} ?sk1 . ", i, from_relation));
    generated
        .clauses
        .push(format!("FILTER(xsd:datetime(?sk1) <= {}) }})", from_para));
    generated
        .clauses
        .push(format!("FILTER(NOT EXISTS {{?x{} ns:{} ?sk2}} || ", i, to_relation));
    generated
        .clauses
        .push(format!("EXISTS {{?x{} ns:{} ?sk3 . ", i, to_relation));
    generated
        .clauses
        .push(format!("FILTER(xsd:datetime(?sk3) >= {}) }})", to_para));
    Ok(())
}

/// ARGMAX/ARGMIN: type or unify the base, walk the relation chain with a
/// fresh variable per hop so the last hop binds the sort key `?sk0`, and
/// emit the ordering clauses the assembler will place.
fn generate_superlative(
    sub_formula: &SubFormula,
    i: usize,
    unifier: &mut VariableUnifier,
    generated: &mut GeneratedClauses,
) -> Result<(), SparqlQueryGeneratorError> {
    generated.is_superlative = true;
    if sub_formula.args.len() < 2 {
        return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
            "{} in sub-formula {} expects a base and at least one relation, got {} operands",
            sub_formula.operator,
            i,
            sub_formula.args.len()
        )));
    }
    let args = &sub_formula.args;

    if args[0].back_reference().is_some() {
        let var = resolve_reference(&args[0], i)?;
        unifier.union(i, var);
    } else {
        let class = plain_token(&args[0], sub_formula, i)?;
        generated
            .clauses
            .push(format!("?x{} ns:type.object.type ns:{} .", i, class));
    }

    let subject = format!("x{}", i);
    if args.len() == 2 {
        push_hop(&mut generated.clauses, &subject, &args[1], "sk0");
    } else {
        let chain = &args[1..args.len() - 1];
        let mut previous = subject;
        for (j, relation) in chain.iter().enumerate() {
            let next = format!("c{}", j);
            push_hop(&mut generated.clauses, &previous, relation, &next);
            previous = next;
        }
        push_hop(&mut generated.clauses, &previous, &args[args.len() - 1], "sk0");
    }

    if sub_formula.operator == "ARGMIN" {
        generated.order_clauses.push("ORDER BY ?sk0".to_string());
    } else {
        generated.order_clauses.push("ORDER BY DESC(?sk0)".to_string());
    }
    generated.order_clauses.push("LIMIT 1".to_string());
    Ok(())
}

fn push_hop(clauses: &mut Vec<String>, subject: &str, relation: &Arg, object: &str) {
    match relation {
        Arg::Reverse(relation) => {
            clauses.push(format!("?{} ns:{} ?{} .", object, relation, subject))
        }
        Arg::Token(relation) => clauses.push(format!("?{} ns:{} ?{} .", subject, relation, object)),
    }
}

/// Apply the typed-literal rule: `value^^datatype` becomes
/// `"value"^^<datatype>`, with the corpus UTC offset appended to the value
/// for every datatype outside the numeric/dateTime set. Tokens without a
/// `^^` tag pass through untouched.
fn retype_literal(
    token: &str,
    options: &CompilerOptions,
) -> Result<String, SparqlQueryGeneratorError> {
    let Some((value, datatype)) = token.split_once("^^") else {
        return Ok(token.to_string());
    };
    let local_name = datatype
        .split_once('#')
        .map(|(_, local)| local)
        .filter(|local| !local.is_empty())
        .ok_or_else(|| SparqlQueryGeneratorError::InvalidLiteralFormat(token.to_string()))?;
    if PASSTHROUGH_DATATYPES.contains(&local_name) {
        Ok(format!("\"{}\"^^<{}>", value, datatype))
    } else {
        Ok(format!(
            "\"{}{}\"^^<{}>",
            value, options.literal_utc_offset, datatype
        ))
    }
}

fn record_entity(entities: &mut Vec<String>, entity: &str) {
    if !entities.iter().any(|seen| seen == entity) {
        entities.push(entity.to_string());
    }
}

fn expect_args<'a>(
    sub_formula: &'a SubFormula,
    i: usize,
    count: usize,
) -> Result<&'a [Arg], SparqlQueryGeneratorError> {
    if sub_formula.args.len() != count {
        return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
            "{} in sub-formula {} expects {} operands, got {}",
            sub_formula.operator,
            i,
            count,
            sub_formula.args.len()
        )));
    }
    Ok(&sub_formula.args)
}

fn resolve_reference(arg: &Arg, formula: usize) -> Result<usize, SparqlQueryGeneratorError> {
    match arg.back_reference() {
        Some(reference) if reference < formula => Ok(reference),
        Some(reference) => {
            Err(SparqlQueryGeneratorError::UnresolvedVariableReference { reference, formula })
        }
        None => Err(SparqlQueryGeneratorError::MalformedExpression(format!(
            "expected a variable reference in sub-formula {}, got '{}'",
            formula, arg
        ))),
    }
}

fn plain_token<'a>(
    arg: &'a Arg,
    sub_formula: &SubFormula,
    i: usize,
) -> Result<&'a str, SparqlQueryGeneratorError> {
    arg.token().ok_or_else(|| {
        SparqlQueryGeneratorError::MalformedExpression(format!(
            "{} in sub-formula {} does not accept a reverse relation here: {}",
            sub_formula.operator, i, arg
        ))
    })
}
